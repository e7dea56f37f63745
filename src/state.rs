use crate::error::Result;
use crate::services::producer::{publish, share_link, ReportKind};
use crate::services::storage::PageStore;
use bytes::Bytes;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: PageStore,
    pub public_hostname: Arc<str>,
    pub page_ttl_secs: u64,
}

impl AppState {
    /// Publishes a rendered report and returns the link to hand out.
    pub async fn share(&self, kind: ReportKind, html: impl Into<Bytes>) -> Result<String> {
        let published = publish(&self.store, html, self.page_ttl_secs).await?;
        Ok(share_link(&self.public_hostname, kind, &published.key))
    }
}
