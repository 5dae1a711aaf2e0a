//! The pipeline-facing politeness gate
//!
//! Given a candidate URL and a user-agent string, the gate resolves the
//! host's robots policy through the cache, absorbs the declared crawl-delay
//! as an awaited (cancellable) sleep, and returns the allow/deny verdict.
//! The wait happens once per check call; it delays the current call as the
//! politeness pause before the next fetch to that host, and is not a
//! cross-call rate limiter.
//!
//! The gate never fails: malformed host identities, unreachable policy
//! documents and garbled documents all fall open to "allowed, no delay".

use crate::config::GateConfig;
use crate::fetch::RobotsFetcher;
use crate::robots::PolicyCache;
use crate::url::HostKey;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Annotation key under which the gate records its verdict on the step
/// context
pub const ROBOTS_IS_PATH_ALLOWED: &str = "RobotsIsPathAllowed";

/// Outcome of a politeness check
///
/// Produced per call, never persisted. `waited` is the crawl-delay that was
/// already paid before the verdict was returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    /// Whether the robots policy permits fetching the URL
    pub allowed: bool,
    /// How long the call was suspended to honor the host's crawl-delay
    pub waited: Duration,
}

/// Per-URL context shared across pipeline steps
///
/// Carries the candidate URL, the active user-agent string, and an
/// annotations bag that steps write their results into.
#[derive(Debug, Clone)]
pub struct StepContext {
    pub url: Url,
    pub user_agent: String,
    pub annotations: HashMap<String, Value>,
}

impl StepContext {
    /// Creates a context for one candidate URL
    pub fn new(url: Url, user_agent: impl Into<String>) -> Self {
        Self {
            url,
            user_agent: user_agent.into(),
            annotations: HashMap::new(),
        }
    }
}

/// A stage of the crawl pipeline
///
/// Steps receive the shared per-URL context, annotate it, and return whether
/// the pipeline should continue with this URL.
#[async_trait]
pub trait PipelineStep: Send + Sync {
    /// Processes one URL, annotating the context as a side effect
    async fn process(&self, ctx: &mut StepContext) -> bool;

    /// How many concurrent invocations the step supports
    fn max_parallelism(&self) -> usize;
}

/// Politeness gate over a shared per-host policy cache
pub struct PolitenessGate {
    cache: Arc<PolicyCache>,
}

impl PolitenessGate {
    /// Creates a gate with its own cache backed by the given transport
    ///
    /// # Arguments
    ///
    /// * `config` - Gate configuration (robots document search path)
    /// * `fetcher` - Injected transport for policy document retrieval
    pub fn new(config: &GateConfig, fetcher: Arc<dyn RobotsFetcher>) -> Self {
        Self {
            cache: Arc::new(PolicyCache::new(fetcher, config.search_path.clone())),
        }
    }

    /// Creates a gate over an existing cache
    ///
    /// Several gate instances may share one cache; the cache stays
    /// consistent under concurrent resolution.
    pub fn with_cache(cache: Arc<PolicyCache>) -> Self {
        Self { cache }
    }

    /// Creates a gate with the default HTTP transport
    ///
    /// Validates the configuration and builds a reqwest-backed
    /// [`HttpFetcher`](crate::fetch::HttpFetcher) presenting `fetch_user_agent`
    /// when retrieving policy documents. The user agent evaluated against the
    /// rules is still supplied per check call.
    ///
    /// # Returns
    ///
    /// * `Ok(PolitenessGate)` - Ready-to-use gate
    /// * `Err(TeineiError)` - Invalid configuration or client build failure
    pub fn from_config(config: &GateConfig, fetch_user_agent: &str) -> crate::Result<Self> {
        crate::config::validate(config)?;
        let fetcher = crate::fetch::HttpFetcher::new(config, fetch_user_agent)?;
        Ok(Self::new(config, Arc::new(fetcher)))
    }

    /// Checks a candidate URL, waiting out the host's crawl-delay first
    ///
    /// 1. Derive the host identity from `url`; on failure, fail open.
    /// 2. Resolve the host's policy (cache hit or fetch+parse).
    /// 3. A policy without rules is allowed immediately, zero wait.
    /// 4. A positive crawl-delay suspends this call for that duration.
    /// 5. Evaluate the path-allow verdict.
    ///
    /// Both the policy fetch and the delay are awaited suspension points;
    /// dropping the future cancels them.
    pub async fn check(&self, url: &Url, user_agent: &str) -> Verdict {
        let host = match HostKey::from_url(url) {
            Ok(host) => host,
            Err(e) => {
                tracing::trace!(url = %url, error = %e, "no host identity, failing open");
                return Verdict {
                    allowed: true,
                    waited: Duration::ZERO,
                };
            }
        };

        let policy = self.cache.resolve(&host).await;

        if !policy.has_rules() {
            return Verdict {
                allowed: true,
                waited: Duration::ZERO,
            };
        }

        let mut waited = Duration::ZERO;
        if let Some(delay) = policy.crawl_delay(user_agent) {
            // try_from rejects values too large for a Duration
            if let Ok(pause) = Duration::try_from_secs_f64(delay) {
                if !pause.is_zero() {
                    tracing::trace!(host = %host, ?pause, "honoring crawl-delay");
                    tokio::time::sleep(pause).await;
                    waited = pause;
                }
            }
        }

        Verdict {
            allowed: policy.is_path_allowed(user_agent, url.as_str()),
            waited,
        }
    }

    /// Convenience wrapper returning only the boolean verdict
    pub async fn check_and_wait(&self, url: &Url, user_agent: &str) -> bool {
        self.check(url, user_agent).await.allowed
    }
}

#[async_trait]
impl PipelineStep for PolitenessGate {
    /// Runs the check and records the verdict under
    /// [`ROBOTS_IS_PATH_ALLOWED`] on the context
    async fn process(&self, ctx: &mut StepContext) -> bool {
        let verdict = self.check(&ctx.url, &ctx.user_agent).await;
        ctx.annotations
            .insert(ROBOTS_IS_PATH_ALLOWED.to_string(), Value::Bool(verdict.allowed));
        verdict.allowed
    }

    /// The pipeline serializes calls into this stage
    fn max_parallelism(&self) -> usize {
        1
    }
}
