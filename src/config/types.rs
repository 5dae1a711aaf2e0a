use serde::Deserialize;

/// Configuration for the politeness gate
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Absolute path of the robots policy document on each host
    #[serde(rename = "search-path")]
    pub search_path: String,

    /// Overall timeout for a policy document fetch (seconds)
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// Connect timeout for a policy document fetch (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            search_path: "/robots.txt".to_string(),
            fetch_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl GateConfig {
    /// Returns a config with the given robots document path
    ///
    /// # Example
    ///
    /// ```
    /// use teinei::GateConfig;
    ///
    /// let config = GateConfig::with_search_path("/crawler-policy.txt");
    /// assert_eq!(config.search_path, "/crawler-policy.txt");
    /// ```
    pub fn with_search_path(search_path: impl Into<String>) -> Self {
        Self {
            search_path: search_path.into(),
            ..Self::default()
        }
    }
}
