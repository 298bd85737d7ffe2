//! Backend connection settings.

use std::time::Duration;

use reqwest::Url;

use crate::{Error, Result};

/// Environment variable holding the backend project URL.
pub const URL_ENV: &str = "WRITERSPHERE_URL";
/// Environment variable holding the public anon key.
pub const ANON_KEY_ENV: &str = "WRITERSPHERE_ANON_KEY";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the backend lives and how to identify to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Project base URL.
    pub url: Url,
    /// Public anon key, sent as `apikey` on every request.
    pub anon_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Build a config, rejecting a blank or malformed URL and a blank key.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Result<Self> {
        let raw = url.into().trim().to_string();
        let anon_key = anon_key.into().trim().to_string();

        if raw.is_empty() {
            return Err(Error::config(format!("{URL_ENV} is missing.")));
        }
        if anon_key.is_empty() {
            return Err(Error::config(format!("{ANON_KEY_ENV} is missing.")));
        }

        let url = Url::parse(&raw)
            .map_err(|e| Error::config(format!("{URL_ENV} '{raw}' is not a valid URL: {e}")))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "{URL_ENV} '{raw}' must be an http(s) URL."
            )));
        }

        Ok(Self {
            url,
            anon_key,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Build from `WRITERSPHERE_URL` and `WRITERSPHERE_ANON_KEY`.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(URL_ENV).unwrap_or_default();
        let anon_key = std::env::var(ANON_KEY_ENV).unwrap_or_default();
        Self::new(url, anon_key)
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The base URL with `segments` appended, each one percent-encoded.
    pub(crate) fn endpoint<'s, I>(&self, segments: I) -> Url
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut url = self.url.clone();
        // `new` rejects URLs that cannot take a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
