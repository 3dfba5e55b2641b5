use crate::cli::{API_URL_ENV, DEFAULT_API_BASE_URL};
use crate::domain::models::ConfigReport;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub detail: DetailSection,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiSection {
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailSection {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
}

fn default_poll_interval() -> u64 {
    5
}

fn default_max_polls() -> u32 {
    12
}

impl Default for DetailSection {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            max_polls: default_max_polls(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlSource {
    Flag,
    Env,
    File,
    Default,
}

impl UrlSource {
    fn as_str(self) -> &'static str {
        match self {
            UrlSource::Flag => "flag",
            UrlSource::Env => "env",
            UrlSource::File => "file",
            UrlSource::Default => "default",
        }
    }
}

/// Effective settings after layering flag > env > file > default.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub base_url_source: UrlSource,
    pub poll_interval_secs: u64,
    pub max_polls: u32,
}

pub fn config_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/priorauth/config.toml"))
}

pub fn load_config_file() -> anyhow::Result<ConfigFile> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let raw = std::fs::read_to_string(&path)?;
    toml::from_str(&raw).map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

pub fn resolve(flag: Option<&str>, env: Option<&str>, file: &ConfigFile) -> Settings {
    let non_empty = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
    let (raw, source) = if let Some(v) = non_empty(flag) {
        (v, UrlSource::Flag)
    } else if let Some(v) = non_empty(env) {
        (v, UrlSource::Env)
    } else if let Some(v) = non_empty(file.api.base_url.as_deref()) {
        (v, UrlSource::File)
    } else {
        (DEFAULT_API_BASE_URL.to_string(), UrlSource::Default)
    };
    Settings {
        base_url: normalize_base_url(&raw),
        base_url_source: source,
        poll_interval_secs: file.detail.poll_interval_secs,
        max_polls: file.detail.max_polls,
    }
}

pub fn load_settings(flag: Option<&str>) -> anyhow::Result<Settings> {
    let file = load_config_file()?;
    let env = std::env::var(API_URL_ENV).ok();
    Ok(resolve(flag, env.as_deref(), &file))
}

impl Settings {
    pub fn report(&self) -> anyhow::Result<ConfigReport> {
        Ok(ConfigReport {
            base_url: self.base_url.clone(),
            base_url_source: self.base_url_source.as_str().to_string(),
            config_path: config_path()?.to_string_lossy().to_string(),
            poll_interval_secs: self.poll_interval_secs,
            max_polls: self.max_polls,
        })
    }
}
