//! Configuration management for vfood using the prefer crate.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{RateSourceKind, Store};
use crate::scrapers::{FetcherConfig, SiteConfig};
use crate::services::exchange::DEFAULT_MONITOR_ACCOUNT;
use crate::services::DEFAULT_TERM_PAUSE;

/// Default database filename.
pub const DEFAULT_DATABASE_FILENAME: &str = "vfood.db";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Per-store overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteOverride {
    /// Search URL template; must contain `{query}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_url: Option<String>,
}

/// Telegram bot credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
}

/// Social-media rate monitor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
}

/// Configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (may start with `~`; relative paths resolve against
    /// the config file's directory).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Database filename inside the data directory, or an absolute path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// Most response headers accepted before a response is rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_response_headers: Option<usize>,
    /// Pause between search terms in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_pause_secs: Option<u64>,
    /// Default rate source: "bcv" or "monitor".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_source: Option<String>,
    /// Overrides keyed by store id (`gama`, `plazas`, ...).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub sites: HashMap<String, SiteOverride>,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// File this config was loaded from.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer's file discovery.
    /// Falls back to defaults when no file is found or it can't be parsed.
    pub async fn load() -> Self {
        match prefer::load("vfood").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            warn!("{}", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let mut config = Self::parse(&contents, path)?;
        config.source_path = Some(path.to_path_buf());
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, String> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        match ext {
            "toml" => {
                toml::from_str(contents).map_err(|e| format!("Failed to parse TOML config: {}", e))
            }
            "yaml" | "yml" => serde_yaml::from_str(contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e)),
            _ => serde_json::from_str(contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e)),
        }
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = self.resolve_path(data_dir, base_dir);
        }
        if let Some(ref database) = self.database {
            settings.database = database.clone();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = Some(user_agent.clone());
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(max) = self.max_response_headers {
            settings.max_response_headers = max;
        }
        if let Some(pause) = self.term_pause_secs {
            settings.term_pause_secs = pause;
        }
        if let Some(ref source) = self.rate_source {
            match RateSourceKind::from_str(source) {
                Some(kind) => settings.rate_source = kind,
                None => warn!("Unknown rate source {:?} in config", source),
            }
        }
        for (id, site) in &self.sites {
            match (Store::from_str(id), &site.search_url) {
                (Some(store), Some(url)) => {
                    settings.search_urls.insert(store, url.clone());
                }
                (None, _) => warn!("Unknown store {:?} in config", id),
                _ => {}
            }
        }
        if self.telegram.token.is_some() {
            settings.telegram_token = self.telegram.token.clone();
        }
        if self.telegram.chat_id.is_some() {
            settings.telegram_chat_id = self.telegram.chat_id.clone();
        }
        if let Some(ref account) = self.monitor.account {
            settings.monitor_account = account.clone();
        }
        if self.monitor.bearer_token.is_some() {
            settings.monitor_bearer_token = self.monitor.bearer_token.clone();
        }
    }
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Database filename (or absolute path).
    pub database: String,
    /// User agent override for HTTP requests.
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    pub max_response_headers: usize,
    /// Pause between search terms in seconds.
    pub term_pause_secs: u64,
    pub rate_source: RateSourceKind,
    /// Search URL templates replacing the built-in ones.
    pub search_urls: HashMap<Store, String>,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub monitor_account: String,
    pub monitor_bearer_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        // ~/.local/share/vfood, falling back to the home dir, then the CWD
        let data_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vfood");

        let fetcher = FetcherConfig::default();
        Self {
            data_dir,
            database: DEFAULT_DATABASE_FILENAME.to_string(),
            user_agent: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_response_headers: fetcher.max_response_headers,
            term_pause_secs: DEFAULT_TERM_PAUSE.as_secs(),
            rate_source: RateSourceKind::Bcv,
            search_urls: HashMap::new(),
            telegram_token: None,
            telegram_chat_id: None,
            monitor_account: DEFAULT_MONITOR_ACCOUNT.to_string(),
            monitor_bearer_token: None,
        }
    }
}

impl Settings {
    /// Full path to the price database.
    pub fn database_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.database);
        let path = Path::new(expanded.as_ref());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)
    }

    /// HTTP fetcher configuration.
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            timeout: Duration::from_secs(self.request_timeout),
            user_agent: self.user_agent.clone(),
            max_response_headers: self.max_response_headers,
        }
    }

    pub fn term_pause(&self) -> Duration {
        Duration::from_secs(self.term_pause_secs)
    }

    /// Store configurations with any search URL overrides applied.
    pub fn sites(&self) -> Vec<SiteConfig> {
        SiteConfig::all()
            .into_iter()
            .map(|site| match self.search_urls.get(&site.store) {
                Some(url) => site.with_search_url(url.clone()),
                None => site,
            })
            .collect()
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, get: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        if let Some(database) = get("VFOOD_DATABASE") {
            self.database = database;
        }
        if let Some(token) = get("TELEGRAM_TOKEN") {
            self.telegram_token = Some(token);
        }
        if let Some(chat_id) = get("TELEGRAM_CHAT_ID") {
            self.telegram_chat_id = Some(chat_id);
        }
        if let Some(token) = get("TWITTER_BEARER_TOKEN") {
            self.monitor_bearer_token = Some(token);
        }
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
}

/// Load settings: config file, then environment overrides.
pub async fn load_settings_with_options(options: LoadOptions) -> (Settings, Config) {
    let config = match options.config_path {
        Some(ref path) => match Config::load_from_path(path).await {
            Ok(config) => config,
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                Config::default()
            }
        },
        None => Config::load().await,
    };

    let mut settings = Settings::default();
    let base_dir = config
        .base_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    config.apply_to_settings(&mut settings, &base_dir);
    settings.apply_env_overrides();

    (settings, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_by_extension() {
        let toml = Config::parse(
            "term_pause_secs = 0\nrate_source = \"monitor\"\n[telegram]\nchat_id = \"42\"\n",
            Path::new("vfood.toml"),
        )
        .unwrap();
        assert_eq!(toml.term_pause_secs, Some(0));
        assert_eq!(toml.telegram.chat_id.as_deref(), Some("42"));

        let yaml = Config::parse(
            "sites:\n  gama:\n    search_url: http://localhost/?q={query}\n",
            Path::new("vfood.yml"),
        )
        .unwrap();
        assert!(yaml.sites.contains_key("gama"));

        let json = Config::parse(r#"{"request_timeout": 5}"#, Path::new("vfood.json")).unwrap();
        assert_eq!(json.request_timeout, Some(5));
    }

    #[test]
    fn test_default_term_pause_matches_aggregator() {
        assert_eq!(Settings::default().term_pause(), DEFAULT_TERM_PAUSE);
    }

    #[test]
    fn test_apply_to_settings() {
        let mut config = Config::default();
        config.data_dir = Some("data".to_string());
        config.rate_source = Some("monitor".to_string());
        config.sites.insert(
            "plan_suarez".to_string(),
            SiteOverride {
                search_url: Some("http://localhost/s?q={query}".to_string()),
            },
        );

        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, Path::new("/srv/vfood"));

        assert_eq!(settings.data_dir, PathBuf::from("/srv/vfood/data"));
        assert_eq!(settings.rate_source, RateSourceKind::SocialMonitor);
        assert_eq!(
            settings.database_path(),
            PathBuf::from("/srv/vfood/data/vfood.db")
        );

        let sites = settings.sites();
        let suarez = sites.iter().find(|s| s.store == Store::PlanSuarez).unwrap();
        assert_eq!(suarez.search_url("pan"), "http://localhost/s?q=pan");
        let gama = sites.iter().find(|s| s.store == Store::Gama).unwrap();
        assert!(gama.search_url.starts_with("https://gamaenlinea.com"));
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        settings.apply_overrides_from(|key| match key {
            "VFOOD_DATABASE" => Some("/tmp/prices.db".to_string()),
            "TELEGRAM_TOKEN" => Some("abc".to_string()),
            "TELEGRAM_CHAT_ID" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(settings.database_path(), PathBuf::from("/tmp/prices.db"));
        assert_eq!(settings.telegram_token.as_deref(), Some("abc"));
        assert_eq!(settings.telegram_chat_id, None);
    }

    #[tokio::test]
    async fn test_load_from_path_records_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vfood.toml");
        std::fs::write(&path, "database = \"prices.db\"\n").unwrap();

        let (settings, config) = load_settings_with_options(LoadOptions {
            config_path: Some(path.clone()),
        })
        .await;
        assert_eq!(config.source_path, Some(path));
        assert_eq!(settings.database, "prices.db");
    }
}
