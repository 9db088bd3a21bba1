use criterion::{criterion_group, criterion_main, Criterion};
use quarry_core::tokenizer::{StemmingTokenizer, Tokenizer};

const TEXT: &str = "an experimental study of a wing in a propeller slipstream was made in order to \
determine the spanwise distribution of the lift increase due to slipstream at different angles of \
attack of the wing and at different free stream to slipstream velocity ratios";

fn bench_tokenize(c: &mut Criterion) {
    let tokenizer = StemmingTokenizer::new();
    c.bench_function("tokenize_abstract", |b| b.iter(|| tokenizer.tokenize(TEXT)));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
