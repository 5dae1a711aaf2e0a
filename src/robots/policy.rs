//! Structured robots rule set and allow/deny evaluation
//!
//! The types here are produced by the parser and are immutable afterwards.
//! Evaluation follows standard robots-exclusion precedence: the most specific
//! matching user-agent group is selected, and within it the longest matching
//! path pattern decides, with Allow winning length ties.

use url::Url;

/// Kind of a path rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Allow,
    Disallow,
}

/// A single path rule inside a group
#[derive(Debug, Clone)]
pub struct Rule {
    pub kind: RuleKind,
    /// Literal path prefix the rule applies to
    pub pattern: String,
}

/// Rules declared for one or more user-agent tokens
///
/// Agent tokens are stored lowercased; `*` marks the wildcard/default group.
#[derive(Debug, Clone, Default)]
pub struct RuleGroup {
    pub agents: Vec<String>,
    pub rules: Vec<Rule>,
    /// Seconds between requests, fractional allowed
    pub crawl_delay: Option<f64>,
}

impl RuleGroup {
    /// Returns the longest agent token matching the given (lowercased) user
    /// agent, or None. `*` matches any agent but reports zero specificity.
    fn match_specificity(&self, user_agent_lower: &str) -> Option<usize> {
        let mut best: Option<usize> = None;
        for token in &self.agents {
            let len = if token == "*" {
                Some(0)
            } else if user_agent_lower.contains(token.as_str()) {
                Some(token.len())
            } else {
                None
            };
            if let Some(len) = len {
                if best.map_or(true, |b| len > b) {
                    best = Some(len);
                }
            }
        }
        best
    }
}

/// In-memory robots policy for one host, parsed from one document
///
/// Owns the rule groups and the document's sitemap URLs. An empty or
/// unfetchable document produces a policy with no groups, which evaluates as
/// "everything allowed, no delay".
#[derive(Debug, Clone, Default)]
pub struct RobotsPolicy {
    groups: Vec<RuleGroup>,
    sitemaps: Vec<String>,
}

impl RobotsPolicy {
    pub(crate) fn new(groups: Vec<RuleGroup>, sitemaps: Vec<String>) -> Self {
        Self { groups, sitemaps }
    }

    /// Whether the document yielded at least one usable rule group
    ///
    /// False for empty or unfetchable documents; the gate treats such a
    /// policy as "everything allowed, no delay".
    pub fn has_rules(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Sitemap URLs declared by the document
    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    /// Checks whether a URL path is allowed for the given user agent
    ///
    /// Selects the most specific matching group: any named-token match beats
    /// the `*` group, and the longest matching token wins between named
    /// groups. Within the group, every pattern that is a path prefix of the
    /// URL's path is considered and the longest one decides; on a length tie
    /// Allow wins. No matching group or pattern means allowed.
    ///
    /// Pure function of (policy, user agent, url): no I/O, no interior state.
    ///
    /// # Arguments
    ///
    /// * `user_agent` - The user agent string presented by the crawler
    /// * `url` - Full URL or absolute path to check
    pub fn is_path_allowed(&self, user_agent: &str, url: &str) -> bool {
        let group = match self.select_group(user_agent) {
            Some(g) => g,
            None => return true,
        };

        let path = extract_path(url);

        let mut verdict = true;
        let mut best_len = 0usize;
        for rule in &group.rules {
            if !path.starts_with(rule.pattern.as_str()) {
                continue;
            }
            let len = rule.pattern.len();
            if len > best_len {
                best_len = len;
                verdict = rule.kind == RuleKind::Allow;
            } else if len == best_len && rule.kind == RuleKind::Allow {
                // Equal-length Allow and Disallow: Allow wins
                verdict = true;
            }
        }
        verdict
    }

    /// Returns the crawl delay declared for the given user agent, in seconds
    ///
    /// None when the selected group declares no delay, no group matches, or
    /// the policy has no rules at all.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        self.select_group(user_agent).and_then(|g| g.crawl_delay)
    }

    /// Selects the most specific group matching the user agent
    fn select_group(&self, user_agent: &str) -> Option<&RuleGroup> {
        let ua = user_agent.to_lowercase();

        let mut best: Option<(&RuleGroup, usize)> = None;
        for group in &self.groups {
            if let Some(specificity) = group.match_specificity(&ua) {
                if best.map_or(true, |(_, s)| specificity > s) {
                    best = Some((group, specificity));
                }
            }
        }
        best.map(|(g, _)| g)
    }
}

/// Extracts the path component from a full URL, or passes a bare path through
fn extract_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    }
}
