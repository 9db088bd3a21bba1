use anyhow::{Context, Result};
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use quarry_core::config::RankingConfig;
use quarry_core::persist::{load_snapshot, IndexPaths};
use quarry_core::render::excerpt;
use quarry_core::{DocId, QueryEngine, QueryVector, StemmingTokenizer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const MAX_K: usize = 100;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub k: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
    pub excerpt: String,
}

/// Shared read-only state; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QueryEngine>,
    pub docs: Arc<HashMap<DocId, String>>,
    pub tokenizer: StemmingTokenizer,
    pub excerpt_chars: usize,
}

#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub top_k: usize,
    pub excerpt_chars: usize,
}

impl Default for ServerOptions {
    fn default() -> Self {
        let ranking = RankingConfig::default();
        Self { top_k: ranking.top_k, excerpt_chars: ranking.excerpt_chars }
    }
}

impl ServerOptions {
    pub fn validate(&self) -> Result<()> {
        RankingConfig { top_k: self.top_k, excerpt_chars: self.excerpt_chars }
            .validate()
            .context("invalid server options")
    }
}

pub fn build_app(index_dir: &str) -> Result<Router> {
    build_app_with(index_dir, ServerOptions::default())
}

pub fn build_app_with(index_dir: &str, options: ServerOptions) -> Result<Router> {
    options.validate()?;
    // Load the whole snapshot once; it is never modified while serving
    let snapshot = load_snapshot(&IndexPaths::new(index_dir))?;
    let tokenizer = snapshot.meta.tokenizer.tokenizer();
    let engine = QueryEngine::new(Arc::new(snapshot.index)).with_top_k(options.top_k);
    let app_state = AppState {
        engine: Arc::new(engine),
        docs: Arc::new(snapshot.docs),
        tokenizer,
        excerpt_chars: options.excerpt_chars,
    };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let k = params.k.unwrap_or(state.engine.top_k()).clamp(1, MAX_K);
    let query = QueryVector::from_text(&state.tokenizer, &params.q);
    let ranking = state.engine.rank_top(&query, k);

    let results = ranking
        .hits
        .into_iter()
        .map(|hit| {
            let text = state.docs.get(&hit.doc_id).map(String::as_str).unwrap_or("");
            SearchHit { excerpt: excerpt(text, state.excerpt_chars).to_string(), doc_id: hit.doc_id, score: hit.score }
        })
        .collect();

    let elapsed = start.elapsed();
    tracing::debug!(q = %params.q, total_hits = ranking.total_hits, took_s = elapsed.as_secs_f64(), "search");
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits: ranking.total_hits, results })
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    match state.docs.get(&doc_id) {
        Some(text) => Ok(Json(serde_json::json!({ "doc_id": doc_id, "text": text }))),
        None => Err((StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" })))),
    }
}
