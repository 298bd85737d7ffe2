//! The `writersphere` configuration file.
//!
//! Lives at `<config dir>/writersphere/config.toml` unless `--config` points
//! elsewhere. Every key has a default, so a missing file is not an error;
//! `WRITERSPHERE_*` environment variables override whatever the file says.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use writersphere_client::config::{ANON_KEY_ENV, DEFAULT_TIMEOUT, URL_ENV};
use writersphere_client::{ClientConfig, SessionStore};
use writersphere_core::rules::DEFAULT_MIN_TAGS;
use writersphere_core::{ConfigManager, PublishRequirements, Result};
use writersphere_studio::DEFAULT_LIST_LIMIT;
use writersphere_studio::articles::SEARCH_DEBOUNCE;
use writersphere_studio::editor::AUTOSAVE_INTERVAL;

const TIMEOUT_ENV: &str = "WRITERSPHERE_TIMEOUT_SECS";
const AUTOSAVE_ENV: &str = "WRITERSPHERE_AUTOSAVE_SECS";
const DEBOUNCE_ENV: &str = "WRITERSPHERE_SEARCH_DEBOUNCE_MS";
const LIST_LIMIT_ENV: &str = "WRITERSPHERE_LIST_LIMIT";
const MIN_TAGS_ENV: &str = "WRITERSPHERE_MIN_TAGS";
const SESSION_PATH_ENV: &str = "WRITERSPHERE_SESSION_PATH";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WritersphereConfig {
    /// Where the backend is.
    pub backend: BackendConfig,
    /// Editor and list behaviour.
    pub editor: EditorConfig,
    /// Session persistence.
    pub session: SessionConfig,
}

/// `[backend]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project URL.
    pub url: String,
    /// Public anon key.
    pub anon_key: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// `[editor]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Seconds between autosave ticks.
    pub autosave_secs: u64,
    /// Quiet period before a search refetch, in milliseconds.
    pub search_debounce_ms: u64,
    /// Rows per article list.
    pub list_limit: usize,
    /// Distinct tags needed before publishing, unpublishing, or archiving.
    pub min_tags: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_secs: AUTOSAVE_INTERVAL.as_secs(),
            search_debounce_ms: SEARCH_DEBOUNCE.as_millis() as u64,
            list_limit: DEFAULT_LIST_LIMIT,
            min_tags: DEFAULT_MIN_TAGS,
        }
    }
}

/// `[session]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session file; the platform data directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl WritersphereConfig {
    /// Apply overrides from `lookup`, which maps variable names to values.
    ///
    /// Values that do not parse are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(URL_ENV) {
            self.backend.url = url;
        }
        if let Some(key) = lookup(ANON_KEY_ENV) {
            self.backend.anon_key = key;
        }
        if let Some(path) = lookup(SESSION_PATH_ENV) {
            self.session.path = Some(PathBuf::from(path));
        }
        override_parsed(&lookup, TIMEOUT_ENV, &mut self.backend.timeout_secs);
        override_parsed(&lookup, AUTOSAVE_ENV, &mut self.editor.autosave_secs);
        override_parsed(&lookup, DEBOUNCE_ENV, &mut self.editor.search_debounce_ms);
        override_parsed(&lookup, LIST_LIMIT_ENV, &mut self.editor.list_limit);
        override_parsed(&lookup, MIN_TAGS_ENV, &mut self.editor.min_tags);
    }

    /// Connection settings for the backend client.
    pub fn client_config(&self) -> writersphere_client::Result<ClientConfig> {
        Ok(ClientConfig::new(&self.backend.url, &self.backend.anon_key)?
            .with_timeout(Duration::from_secs(self.backend.timeout_secs.max(1))))
    }

    /// Where the session is kept.
    pub fn session_store(&self) -> writersphere_client::Result<SessionStore> {
        match &self.session.path {
            Some(path) => Ok(SessionStore::new(path)),
            None => SessionStore::at_default_path(),
        }
    }

    /// Autosave tick period, at least one second.
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.editor.autosave_secs.max(1))
    }

    /// Search debounce delay.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.editor.search_debounce_ms)
    }

    /// Publish requirements for the editor.
    pub fn publish_requirements(&self) -> PublishRequirements {
        PublishRequirements {
            min_tags: self.editor.min_tags,
        }
    }
}

fn override_parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    target: &mut T,
) {
    if let Some(raw) = lookup(name) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(_) => tracing::warn!(variable = name, value = %raw, "ignoring unparsable override"),
        }
    }
}

impl ConfigManager for WritersphereConfig {
    fn project_name() -> &'static str {
        "writersphere"
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let mut vars = vec![
            (URL_ENV.to_string(), self.backend.url.clone()),
            (ANON_KEY_ENV.to_string(), self.backend.anon_key.clone()),
            (TIMEOUT_ENV.to_string(), self.backend.timeout_secs.to_string()),
            (AUTOSAVE_ENV.to_string(), self.editor.autosave_secs.to_string()),
            (DEBOUNCE_ENV.to_string(), self.editor.search_debounce_ms.to_string()),
            (LIST_LIMIT_ENV.to_string(), self.editor.list_limit.to_string()),
            (MIN_TAGS_ENV.to_string(), self.editor.min_tags.to_string()),
        ];
        if let Some(path) = &self.session.path {
            vars.push((SESSION_PATH_ENV.to_string(), path.display().to_string()));
        }
        Ok(vars)
    }
}
