//! URL identity handling for the politeness gate
//!
//! A robots policy applies to a whole host, not to a single page, so the
//! cache is keyed by a normalized scheme+authority identity rather than by
//! the full URL. This module derives that identity.

use crate::UrlError;
use url::Url;

/// Normalized scheme+authority identity of a host
///
/// Two URLs that differ only in path, query or fragment map to the same
/// `HostKey`. The key is the cache identity for robots policies and also the
/// base used to build the policy document URL.
///
/// # Normalization
///
/// 1. Scheme lowercased; only `http` and `https` are accepted
/// 2. Host lowercased
/// 3. Port kept only when it differs from the scheme default
/// 4. Path, query, fragment and credentials discarded
///
/// # Examples
///
/// ```
/// use url::Url;
/// use teinei::url::HostKey;
///
/// let a = HostKey::from_url(&Url::parse("https://Example.COM/a/page?q=1").unwrap()).unwrap();
/// let b = HostKey::from_url(&Url::parse("https://example.com/other").unwrap()).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "https://example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostKey(String);

impl HostKey {
    /// Derives the host identity from a parsed URL
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to derive the identity from
    ///
    /// # Returns
    ///
    /// * `Ok(HostKey)` - Normalized scheme+authority identity
    /// * `Err(UrlError)` - The URL has no host or a non-HTTP(S) scheme
    pub fn from_url(url: &Url) -> Result<Self, UrlError> {
        let scheme = url.scheme().to_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(UrlError::InvalidScheme(scheme));
        }

        let host = url.host_str().ok_or(UrlError::MissingHost)?.to_lowercase();

        // Url::port() is None for the scheme default, so the default port
        // never appears in the key.
        let key = match url.port() {
            Some(port) => format!("{}://{}:{}", scheme, host, port),
            None => format!("{}://{}", scheme, host),
        };

        Ok(Self(key))
    }

    /// Parses a URL string and derives the host identity from it
    pub fn from_str(url_str: &str) -> Result<Self, UrlError> {
        let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
        Self::from_url(&url)
    }

    /// Returns the normalized scheme+authority string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the policy document URL for this host
    ///
    /// # Arguments
    ///
    /// * `search_path` - Absolute path of the robots document, e.g. `/robots.txt`
    pub fn robots_url(&self, search_path: &str) -> String {
        format!("{}{}", self.0, search_path)
    }
}

impl std::fmt::Display for HostKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
