//! Per-host robots policy cache
//!
//! Each distinct host has its policy document fetched and parsed at most once
//! per process run; every later query for that host is served from memory.
//! Transport failures of any kind are absorbed here and replaced by an empty
//! document, so the parser and the gate never see them.

use crate::fetch::RobotsFetcher;
use crate::robots::parser::parse_robots;
use crate::robots::policy::RobotsPolicy;
use crate::url::HostKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Lazily filled map from host identity to its resolved policy
///
/// Entries are created once and never mutated or expired afterwards. The map
/// itself sits behind a single mutex; the lock is never held across an await
/// point, so concurrent first-time resolutions of the same host may both
/// fetch, but the first completed insertion wins and readers always observe
/// either no entry or a fully constructed policy.
pub struct PolicyCache {
    fetcher: Arc<dyn RobotsFetcher>,
    search_path: String,
    policies: Mutex<HashMap<HostKey, Arc<RobotsPolicy>>>,
}

impl PolicyCache {
    /// Creates a cache backed by the given transport
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Injected transport used to retrieve policy documents
    /// * `search_path` - Absolute path of the policy document on each host,
    ///   usually `/robots.txt`
    pub fn new(fetcher: Arc<dyn RobotsFetcher>, search_path: impl Into<String>) -> Self {
        Self {
            fetcher,
            search_path: search_path.into(),
            policies: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves the policy for a host, fetching and parsing it on first use
    ///
    /// Idempotent per host for the process lifetime. Never fails: an
    /// unfetchable document resolves to a policy with no rules.
    pub async fn resolve(&self, host: &HostKey) -> Arc<RobotsPolicy> {
        if let Some(policy) = self.policies.lock().unwrap().get(host) {
            return Arc::clone(policy);
        }

        let robots_url = host.robots_url(&self.search_path);
        tracing::debug!(url = %robots_url, "downloading robots policy document");

        let text = self.fetch_or_empty(&robots_url).await;
        let policy = Arc::new(parse_robots(&text));
        tracing::trace!(
            host = %host,
            has_rules = policy.has_rules(),
            "robots policy resolved"
        );

        let mut policies = self.policies.lock().unwrap();
        Arc::clone(policies.entry(host.clone()).or_insert(policy))
    }

    /// Fetches the document text, converting any transport failure into
    /// empty text
    ///
    /// The absence of a robots document is not a crawl-blocking error, so
    /// network failures, timeouts and non-success statuses all collapse into
    /// the same fallback.
    async fn fetch_or_empty(&self, robots_url: &str) -> String {
        match self.fetcher.fetch(robots_url).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(url = %robots_url, error = %e, "robots fetch failed, treating as empty");
                String::new()
            }
        }
    }

    /// Number of hosts with a resolved policy
    pub fn len(&self) -> usize {
        self.policies.lock().unwrap().len()
    }

    /// Whether any host has been resolved yet
    pub fn is_empty(&self) -> bool {
        self.policies.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FetchError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a canned document and counts how many times it was asked
    struct CountingFetcher {
        body: Option<String>,
        calls: AtomicUsize,
    }

    impl CountingFetcher {
        fn with_body(body: &str) -> Self {
            Self {
                body: Some(body.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                body: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RobotsFetcher for CountingFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.body {
                Some(body) => Ok(body.clone()),
                None => Err(FetchError::Status(503)),
            }
        }
    }

    #[tokio::test]
    async fn test_fetches_once_per_host() {
        let fetcher = Arc::new(CountingFetcher::with_body("User-agent: *\nDisallow: /private"));
        let cache = PolicyCache::new(Arc::clone(&fetcher) as Arc<dyn RobotsFetcher>, "/robots.txt");

        let host = HostKey::from_str("https://example.com/first").unwrap();
        let first = cache.resolve(&host).await;
        let second = cache.resolve(&host).await;

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(!first.is_path_allowed("TestBot", "https://example.com/private/page"));
    }

    #[tokio::test]
    async fn test_distinct_hosts_fetch_separately() {
        let fetcher = Arc::new(CountingFetcher::with_body("User-agent: *\nAllow: /"));
        let cache = PolicyCache::new(Arc::clone(&fetcher) as Arc<dyn RobotsFetcher>, "/robots.txt");

        let a = HostKey::from_str("https://a.example.com/").unwrap();
        let b = HostKey::from_str("https://b.example.com/").unwrap();
        cache.resolve(&a).await;
        cache.resolve(&b).await;

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_yields_rule_free_policy() {
        let fetcher = Arc::new(CountingFetcher::failing());
        let cache = PolicyCache::new(Arc::clone(&fetcher) as Arc<dyn RobotsFetcher>, "/robots.txt");

        let host = HostKey::from_str("https://down.example.com/").unwrap();
        let policy = cache.resolve(&host).await;

        assert!(!policy.has_rules());
        assert!(policy.is_path_allowed("TestBot", "https://down.example.com/anything"));

        // The failure result is cached too; no refetch on the next query
        cache.resolve(&host).await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_search_path_used_for_fetch() {
        struct PathAssertingFetcher;

        #[async_trait]
        impl RobotsFetcher for PathAssertingFetcher {
            async fn fetch(&self, url: &str) -> Result<String, FetchError> {
                assert_eq!(url, "https://example.com/crawler-policy.txt");
                Ok(String::new())
            }
        }

        let cache = PolicyCache::new(Arc::new(PathAssertingFetcher), "/crawler-policy.txt");
        let host = HostKey::from_str("https://example.com/page").unwrap();
        cache.resolve(&host).await;
    }

    #[tokio::test]
    async fn test_concurrent_resolutions_share_one_entry() {
        let fetcher = Arc::new(CountingFetcher::with_body("User-agent: *\nDisallow: /x"));
        let cache = Arc::new(PolicyCache::new(
            Arc::clone(&fetcher) as Arc<dyn RobotsFetcher>,
            "/robots.txt",
        ));

        let host = HostKey::from_str("https://example.com/").unwrap();
        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let host = host.clone();
            handles.push(tokio::spawn(async move { cache.resolve(&host).await }));
        }

        let mut policies = Vec::new();
        for handle in handles {
            policies.push(handle.await.unwrap());
        }

        // Duplicate in-flight fetches are allowed; the cache must still end
        // up with exactly one entry and hand every caller the same policy
        assert_eq!(cache.len(), 1);
        let first = &policies[0];
        for policy in &policies {
            assert!(Arc::ptr_eq(first, policy));
        }
    }
}
