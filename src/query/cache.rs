//! Result cache with an explicit time-to-live.
//!
//! Pages keep their own cache instance and hand a clone of the
//! [`CacheHandle`] to whatever mutates the underlying records, so writes can
//! invalidate stale pages instead of relying on ambient global storage.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};
use tokio::time::Instant;

use crate::pagination::ResultPage;
use crate::query::descriptor::{FilterKey, QueryDescriptor};
use crate::query::fetch::{FetchResult, ListFetchService};

#[derive(Debug)]
struct Entry<V> {
    stored_at: Instant,
    value: V,
}

/// String-keyed cache whose entries expire `ttl` after insertion.
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: HashMap<String, Entry<V>>,
}

impl<V> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the entry if it is younger than the TTL at `now`.
    pub fn get(&self, key: &str, now: Instant) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|entry| now.saturating_duration_since(entry.stored_at) < self.ttl)
            .map(|entry| &entry.value)
    }

    /// Stores `value` under `key` and drops whatever has expired at `now`.
    pub fn insert(&mut self, key: impl Into<String>, value: V, now: Instant) {
        self.purge_expired(now);
        self.entries.insert(
            key.into(),
            Entry {
                stored_at: now,
                value,
            },
        );
    }

    pub fn invalidate(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    /// Drops every entry that has expired at `now`.
    pub fn purge_expired(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.stored_at) < ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared handle to the cache behind a [`CachedFetcher`].
pub type CacheHandle<T> = Rc<RefCell<TtlCache<ResultPage<T>>>>;

/// Serves fresh pages from a [`TtlCache`] and fills it from the wrapped fetcher.
pub struct CachedFetcher<S, T> {
    inner: S,
    cache: CacheHandle<T>,
}

impl<S, T> CachedFetcher<S, T> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Rc::new(RefCell::new(TtlCache::new(ttl))),
        }
    }

    pub fn cache(&self) -> CacheHandle<T> {
        Rc::clone(&self.cache)
    }
}

impl<K, S, T> ListFetchService<K> for CachedFetcher<S, T>
where
    K: FilterKey,
    S: ListFetchService<K, Item = T>,
    T: Clone + 'static,
{
    type Item = T;

    fn fetch(&self, query: &QueryDescriptor<K>) -> LocalBoxFuture<'static, FetchResult<T>> {
        let key = match query.to_query_string() {
            Ok(key) => key,
            Err(err) => {
                log::warn!("Bypassing cache for unencodable query: {err}");
                return self.inner.fetch(query);
            }
        };

        if let Some(page) = self.cache.borrow().get(&key, Instant::now()) {
            log::debug!("Serving `{key}` from cache");
            return future::ready(Ok(page.clone())).boxed_local();
        }

        let cache = Rc::clone(&self.cache);
        let request = self.inner.fetch(query);
        async move {
            let result = request.await;
            if let Ok(page) = &result {
                cache.borrow_mut().insert(key, page.clone(), Instant::now());
            }
            result
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::query::config::QueryConfig;
    use crate::query::filters::CatalogFilter;

    struct CountingFetcher {
        calls: Rc<Cell<usize>>,
    }

    impl ListFetchService<CatalogFilter> for CountingFetcher {
        type Item = u32;

        fn fetch(
            &self,
            query: &QueryDescriptor<CatalogFilter>,
        ) -> LocalBoxFuture<'static, FetchResult<u32>> {
            self.calls.set(self.calls.get() + 1);
            let page = ResultPage::new(vec![query.page() as u32], 100, query.page(), 10);
            future::ready(Ok(page)).boxed_local()
        }
    }

    #[test]
    fn entries_expire_after_the_ttl() {
        let start = Instant::now();
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("page=1", 1, start);

        assert_eq!(cache.get("page=1", start + Duration::from_secs(59)), Some(&1));
        assert_eq!(cache.get("page=1", start + Duration::from_secs(60)), None);

        cache.purge_expired(start + Duration::from_secs(61));
        assert!(cache.is_empty());
    }

    #[test]
    fn insert_drops_expired_entries() {
        let start = Instant::now();
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("page=1", 1, start);
        cache.insert("page=2", 2, start + Duration::from_secs(30));

        cache.insert("page=3", 3, start + Duration::from_secs(70));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("page=2", start + Duration::from_secs(70)), Some(&2));
    }

    #[tokio::test(start_paused = true)]
    async fn second_fetch_of_the_same_query_is_served_from_cache() {
        let calls = Rc::new(Cell::new(0));
        let fetcher = CachedFetcher::new(
            CountingFetcher {
                calls: Rc::clone(&calls),
            },
            Duration::from_secs(30),
        );
        let query = QueryDescriptor::<CatalogFilter>::initial(&QueryConfig::default());

        let first = fetcher.fetch(&query).await.unwrap();
        let second = fetcher.fetch(&query).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);

        fetcher.cache().borrow_mut().invalidate_all();
        fetcher.fetch(&query).await.unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_triggers_a_new_fetch() {
        let calls = Rc::new(Cell::new(0));
        let fetcher = CachedFetcher::new(
            CountingFetcher {
                calls: Rc::clone(&calls),
            },
            Duration::from_secs(30),
        );
        let query = QueryDescriptor::<CatalogFilter>::initial(&QueryConfig::default());

        fetcher.fetch(&query).await.unwrap();
        tokio::time::advance(Duration::from_secs(31)).await;
        fetcher.fetch(&query).await.unwrap();

        assert_eq!(calls.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_pages_do_not_pile_up_while_paging() {
        let fetcher = CachedFetcher::new(
            CountingFetcher {
                calls: Rc::new(Cell::new(0)),
            },
            Duration::from_secs(30),
        );
        let initial = QueryDescriptor::<CatalogFilter>::initial(&QueryConfig::default());

        for page in 1..=5 {
            fetcher.fetch(&initial.clone().with_page(page)).await.unwrap();
            tokio::time::advance(Duration::from_secs(20)).await;
        }

        // Only the pages stored within the last 30 seconds survive.
        assert_eq!(fetcher.cache().borrow().len(), 2);
    }
}
