use axum::{extract::{Query, State}, response::Response};
use serde::Deserialize;

use crate::domain::fingerprint::Fingerprint;
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::web::utils::{escaped_hash, html_bytes};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page_hash: Option<String>,
}

pub async fn health() -> &'static str { "ok" }

pub async fn load_page(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Result<Response> {
    let raw = query.page_hash.unwrap_or_default();
    if raw.trim().is_empty() {
        tracing::info!("page request without hash");
        return Err(AppError::EmptyHash);
    }

    let hash = escaped_hash(&raw);
    let page = match Fingerprint::parse(&raw) {
        Some(key) => state.store.get(&key).await,
        None => None,
    };

    match page {
        Some(page) => {
            tracing::info!(page_hash = %hash, bytes = page.content.len(), "served shortlived page");
            Ok(html_bytes(page.content))
        }
        None => {
            tracing::info!(page_hash = %hash, "no such page");
            Err(AppError::NoSuchPage(hash))
        }
    }
}
