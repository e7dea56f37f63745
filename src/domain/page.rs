use bytes::Bytes;
use std::time::Duration;
use time::OffsetDateTime;

pub const PAGE_TTL_SECS: u64 = 600;
pub const CLEANUP_EVERY: Duration = Duration::from_secs(1);

/// A rendered report held in memory until its deadline passes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedPage {
    pub content: Bytes,
    pub created_at: OffsetDateTime,
    pub ttl_secs: u64,
}

impl CachedPage {
    pub fn new(content: impl Into<Bytes>, ttl_secs: u64) -> Self {
        Self { content: content.into(), created_at: OffsetDateTime::now_utc(), ttl_secs }
    }

    /// `created_at + ttl_secs`. TTL is always whole seconds.
    pub fn deadline(&self) -> OffsetDateTime {
        let ttl = i64::try_from(self.ttl_secs).unwrap_or(i64::MAX);
        self.created_at.saturating_add(time::Duration::seconds(ttl))
    }

    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.deadline() <= now
    }
}
