use anyhow::Result;
use axum::Router;
use clap::Parser;
use server::{build_app_with, ServerOptions};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Index directory path
    #[arg(long, default_value = "./index")]
    index: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Default number of results when a request omits `k`
    #[arg(long, default_value_t = 10)]
    top_k: usize,
    /// Characters of document text per result
    #[arg(long, default_value_t = 280)]
    excerpt_chars: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let options = ServerOptions { top_k: args.top_k, excerpt_chars: args.excerpt_chars };
    let app: Router = build_app_with(&args.index, options)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
