//! Publishing rendered reports into the page store.
//!
//! Rendering happens elsewhere; this takes the finished HTML, derives its
//! fingerprint and hands back the link a user can open while the page lives.

use bytes::Bytes;
use tracing::info;

use crate::domain::{fingerprint::Fingerprint, page::CachedPage};
use crate::error::{AppError, Result};
use crate::services::storage::PageStore;

/// Which report a shared page holds. Decides the link path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    Spendings,
    Statistics,
}

impl ReportKind {
    pub const ALL: [ReportKind; 2] = [ReportKind::Spendings, ReportKind::Statistics];

    pub fn path(self) -> &'static str {
        match self {
            ReportKind::Spendings => "/spendings",
            ReportKind::Statistics => "/statistics",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Published {
    pub key: Fingerprint,
    /// False when an identical page was still live and got reused.
    pub fresh: bool,
}

pub async fn publish(store: &PageStore, content: impl Into<Bytes>, ttl_secs: u64) -> Result<Published> {
    let content = content.into();
    if content.is_empty() {
        return Err(AppError::EmptyPage);
    }

    let key = Fingerprint::of(&content);
    let page = CachedPage::new(content, ttl_secs);
    let deadline = page.deadline();

    let fresh = store.add(key.clone(), page).await;
    if fresh {
        info!(page_hash = %key, %deadline, "added shortlived page");
    } else {
        info!(page_hash = %key, "page already shared, reusing it");
    }
    Ok(Published { key, fresh })
}

pub fn share_link(hostname: &str, kind: ReportKind, key: &Fingerprint) -> String {
    format!("https://{hostname}{}?page_hash={key}", kind.path())
}
