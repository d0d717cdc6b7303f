use crate::error::ConfigError;
use reqwest::Url;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://xoxocomic.com";

/// Mobile Safari, as the site serves the lighter layout to it
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 15_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.0 Mobile/15E148 Safari/604.1";

/// Which search URL layout the site answers to.
///
/// The site has moved between the two over time; `Keyword` is the current one.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchUrlStyle {
    /// `{base}/search?keyword={term}&page={n}`
    #[default]
    Keyword,
    /// `{base}/page/{n}/?s={term}`
    WordPress,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Site root without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    #[serde(default)]
    pub search_style: SearchUrlStyle,
}

fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }
fn default_user_agent() -> String { DEFAULT_USER_AGENT.to_string() }
fn default_accept_language() -> String { "en-US,en;q=0.5".to_string() }

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            search_style: SearchUrlStyle::default(),
        }
    }
}

impl Config {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(content)?;
        cfg.validated()
    }

    /// Read a config file, falling back to defaults when it is missing or invalid
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|content| Self::from_toml_str(&content))
        {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Use a different site root, e.g. a mirror or a local test server
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
        .validated()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        match Url::parse(&trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {
                self.base_url = trimmed;
                Ok(self)
            }
            _ => Err(ConfigError::InvalidBaseUrl(self.base_url)),
        }
    }
}
