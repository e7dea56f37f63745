use crate::domain::{fingerprint::Fingerprint, page::CachedPage};
use std::collections::HashMap;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::RwLock;

/// In-memory map of shared pages keyed by fingerprint.
///
/// Cloning is cheap and every clone sees the same map. One reader-writer
/// lock guards the whole map: lookups and scans share it, inserts and
/// removals take it exclusively.
#[derive(Clone, Default)]
pub struct PageStore {
    pages: Arc<RwLock<HashMap<Fingerprint, CachedPage>>>,
}

impl PageStore {
    pub fn new() -> Self { Self::default() }

    /// Returns the live page for `key`. A page past its deadline reads as
    /// absent even if the sweep has not removed it yet.
    pub async fn get(&self, key: &Fingerprint) -> Option<CachedPage> {
        self.get_at(key, OffsetDateTime::now_utc()).await
    }

    pub async fn get_at(&self, key: &Fingerprint, now: OffsetDateTime) -> Option<CachedPage> {
        let pages = self.pages.read().await;
        pages.get(key).filter(|p| !p.is_expired_at(now)).cloned()
    }

    /// Inserts only when `key` holds no live page. Returns false and leaves
    /// the stored page untouched otherwise. An expired page that has not been
    /// swept yet is replaced.
    pub async fn add(&self, key: Fingerprint, page: CachedPage) -> bool {
        self.add_at(key, page, OffsetDateTime::now_utc()).await
    }

    pub async fn add_at(&self, key: Fingerprint, page: CachedPage, now: OffsetDateTime) -> bool {
        let mut pages = self.pages.write().await;
        if pages.get(&key).is_some_and(|p| !p.is_expired_at(now)) {
            return false;
        }
        pages.insert(key, page);
        true
    }

    pub async fn remove(&self, key: &Fingerprint) -> Option<CachedPage> {
        self.pages.write().await.remove(key)
    }

    /// Removes `key` only if the page stored there is still expired at `now`.
    /// A page re-added since the caller looked is left alone.
    pub async fn remove_expired(&self, key: &Fingerprint, now: OffsetDateTime) -> Option<CachedPage> {
        let mut pages = self.pages.write().await;
        if !pages.get(key).is_some_and(|p| p.is_expired_at(now)) {
            return None;
        }
        pages.remove(key)
    }

    /// Keys whose deadline is at or before `now`, with that deadline.
    pub async fn expired_at(&self, now: OffsetDateTime) -> Vec<(Fingerprint, OffsetDateTime)> {
        let pages = self.pages.read().await;
        pages
            .iter()
            .filter(|(_, p)| p.is_expired_at(now))
            .map(|(k, p)| (k.clone(), p.deadline()))
            .collect()
    }

    /// Physically stored entries, expired or not.
    pub async fn len(&self) -> usize {
        self.pages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pages.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::page::PAGE_TTL_SECS;
    use time::Duration;

    fn key(n: u64) -> Fingerprint {
        Fingerprint::parse(&format!("{n:016x}")).unwrap()
    }

    fn page(html: &'static str) -> CachedPage {
        CachedPage::new(html, PAGE_TTL_SECS)
    }

    #[tokio::test]
    async fn unknown_key_is_absent() {
        let store = PageStore::new();
        assert_eq!(store.get(&key(1)).await, None);
        assert_eq!(store.remove(&key(1)).await, None);
    }

    #[tokio::test]
    async fn add_then_get() {
        let store = PageStore::new();
        let k = Fingerprint::parse("aaaaaaaaaaaa1111").unwrap();
        assert!(store.add(k.clone(), page("<html>A</html>")).await);

        let got = store.get(&k).await.unwrap();
        assert_eq!(&got.content[..], b"<html>A</html>");
    }

    #[tokio::test]
    async fn second_add_does_not_overwrite() {
        let store = PageStore::new();
        let k = key(7);
        assert!(store.add(k.clone(), page("X")).await);
        assert!(!store.add(k.clone(), page("Y")).await);

        assert_eq!(&store.get(&k).await.unwrap().content[..], b"X");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn remove_returns_page_once() {
        let store = PageStore::new();
        let k = key(9);
        let x = page("X");
        assert!(store.add(k.clone(), x.clone()).await);

        assert_eq!(store.remove(&k).await, Some(x));
        assert_eq!(store.remove(&k).await, None);
        assert_eq!(store.get(&k).await, None);
    }

    #[tokio::test]
    async fn empty_page_is_not_absent() {
        let store = PageStore::new();
        let k = key(3);
        assert!(store.add(k.clone(), page("")).await);
        let got = store.get(&k).await;
        assert!(got.is_some());
        assert!(got.unwrap().content.is_empty());
    }

    #[tokio::test]
    async fn expired_page_reads_as_absent_before_sweep() {
        let store = PageStore::new();
        let k = key(4);
        let mut stale = page("old");
        stale.created_at -= Duration::seconds(PAGE_TTL_SECS as i64 + 1);
        assert!(store.add(k.clone(), stale).await);

        assert_eq!(store.get(&k).await, None);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn add_replaces_expired_unswept_page() {
        let store = PageStore::new();
        let k = key(5);
        let mut stale = page("old");
        stale.created_at -= Duration::seconds(PAGE_TTL_SECS as i64 + 1);
        assert!(store.add(k.clone(), stale).await);

        let fresh = page("new");
        assert!(store.add(k.clone(), fresh.clone()).await);
        assert_eq!(store.get(&k).await, Some(fresh));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn add_at_keeps_page_until_its_deadline() {
        let store = PageStore::new();
        let k = key(6);
        let first = page("first");
        let t0 = first.created_at;
        assert!(store.add_at(k.clone(), first.clone(), t0).await);

        assert!(!store.add_at(k.clone(), page("second"), t0 + Duration::seconds(599)).await);
        assert_eq!(store.get_at(&k, t0).await, Some(first));

        let third = page("third");
        assert!(store.add_at(k.clone(), third.clone(), t0 + Duration::seconds(600)).await);
        assert_eq!(store.get_at(&k, t0).await, Some(third));
    }

    #[tokio::test]
    async fn remove_expired_spares_a_page_re_added_meanwhile() {
        let store = PageStore::new();
        let k = key(8);
        let mut stale = page("old");
        stale.created_at -= Duration::seconds(700);
        store.add(k.clone(), stale).await;

        let now = OffsetDateTime::now_utc();
        let expired = store.expired_at(now).await;
        assert_eq!(expired.len(), 1);

        // someone else replaces the slot between the scan and the eviction
        store.remove(&k).await;
        let fresh = page("new");
        assert!(store.add(k.clone(), fresh.clone()).await);

        assert_eq!(store.remove_expired(&k, now).await, None);
        assert_eq!(store.get(&k).await, Some(fresh));
    }

    #[tokio::test]
    async fn remove_expired_takes_stale_page() {
        let store = PageStore::new();
        let k = key(10);
        let mut stale = page("old");
        stale.created_at -= Duration::seconds(700);
        store.add(k.clone(), stale.clone()).await;

        assert_eq!(store.remove_expired(&k, OffsetDateTime::now_utc()).await, Some(stale));
        assert!(store.is_empty().await);
        assert_eq!(store.remove_expired(&k, OffsetDateTime::now_utc()).await, None);
    }

    #[tokio::test]
    async fn expired_at_reports_deadlines() {
        let store = PageStore::new();
        let fresh = page("fresh");
        let now = fresh.created_at;
        let mut stale = page("stale");
        stale.created_at = now - Duration::seconds(700);
        let deadline = stale.deadline();

        store.add(key(1), fresh).await;
        store.add(key(2), stale).await;

        assert_eq!(store.expired_at(now).await, vec![(key(2), deadline)]);
    }

    #[tokio::test]
    async fn concurrent_adds_distinct_keys_all_win() {
        let store = PageStore::new();
        let mut tasks = Vec::new();
        for n in 0..64u64 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.add(key(n), CachedPage::new(format!("page {n}"), PAGE_TTL_SECS)).await
            }));
        }
        for t in tasks {
            assert!(t.await.unwrap());
        }
        for n in 0..64u64 {
            let got = store.get(&key(n)).await.unwrap();
            assert_eq!(got.content, format!("page {n}").into_bytes());
        }
    }

    #[tokio::test]
    async fn concurrent_adds_same_key_exactly_one_wins() {
        let store = PageStore::new();
        let k = key(42);
        let mut tasks = Vec::new();
        for n in 0..32u64 {
            let store = store.clone();
            let k = k.clone();
            tasks.push(tokio::spawn(async move {
                store.add(k, CachedPage::new(format!("v{n}"), PAGE_TTL_SECS)).await
            }));
        }
        let mut wins = 0;
        for t in tasks {
            if t.await.unwrap() { wins += 1; }
        }
        assert_eq!(wins, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn instances_are_independent() {
        let a = PageStore::new();
        let b = PageStore::new();
        a.add(key(1), page("A")).await;
        assert!(b.get(&key(1)).await.is_none());
        assert!(b.is_empty().await);
    }
}
