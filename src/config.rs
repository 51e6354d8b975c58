//! Settings file and environment handling.
//!
//! Settings come from an optional TOML file, `STATUSWATCH_*` environment
//! variables, and the standard Datadog variables, in increasing priority:
//!
//! ```toml
//! [datadog]
//! site = "datadoghq.com"
//! api_key = "..."
//! app_key = "..."
//! timeout = "10s"
//!
//! [[monitors]]
//! id = "3741790"
//! title = "Public API"
//!
//! [page]
//! title = "Acme Status"
//! timezone = "local"   # or "utc"
//! refresh = "60s"
//! ```
//!
//! `DATADOG_API_KEY`, `DATADOG_APP_KEY` and `DATADOG_API_SITE` override the
//! file. Nested keys can also be set as `STATUSWATCH_PAGE__TITLE`.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::data::duration::parse_duration;

/// Datadog site used when none is configured.
pub const DEFAULT_SITE: &str = "datadoghq.com";

/// Top-level settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub datadog: DatadogSettings,

    /// Monitors shown on the page, in display order.
    #[serde(default)]
    pub monitors: Vec<MonitorConfig>,

    #[serde(default)]
    pub page: PageSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DatadogSettings {
    #[serde(default = "default_site")]
    pub site: String,
    pub api_key: Option<String>,
    pub app_key: Option<String>,
    /// Per-request timeout, e.g. "10s".
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

impl Default for DatadogSettings {
    fn default() -> Self {
        Self {
            site: default_site(),
            api_key: None,
            app_key: None,
            timeout: default_timeout(),
        }
    }
}

/// A monitor to show on the page.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Datadog monitor id.
    pub id: String,
    pub title: Option<String>,
}

impl MonitorConfig {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
        }
    }

    /// The configured title, or `Monitor <id>`.
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Monitor {}", self.id))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PageSettings {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub timezone: PageTimeZone,
    /// How often to refetch, e.g. "60s".
    #[serde(default = "default_refresh")]
    pub refresh: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            timezone: PageTimeZone::default(),
            refresh: default_refresh(),
        }
    }
}

/// Time zone whose calendar days make up the heatmap.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PageTimeZone {
    /// The time zone of the machine running statuswatch.
    #[default]
    Local,
    Utc,
}

impl PageTimeZone {
    pub fn label(self) -> &'static str {
        match self {
            PageTimeZone::Local => "local time",
            PageTimeZone::Utc => "UTC",
        }
    }

    /// Render an instant in this zone.
    pub fn format(self, time: DateTime<Utc>, fmt: &str) -> String {
        match self {
            PageTimeZone::Local => time.with_timezone(&Local).format(fmt).to_string(),
            PageTimeZone::Utc => time.format(fmt).to_string(),
        }
    }
}

/// Values that override the settings file, normally read from the
/// standard Datadog environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub app_key: Option<String>,
    pub site: Option<String>,
}

impl Overrides {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            api_key: var("DATADOG_API_KEY"),
            app_key: var("DATADOG_APP_KEY"),
            site: var("DATADOG_API_SITE"),
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = Self::from_sources(path, Overrides::from_env())
            .with_context(|| match path {
                Some(p) => format!("Failed to load config from {}", p.display()),
                None => "Failed to load config from environment".to_string(),
            })?;
        tracing::debug!(monitors = settings.monitors.len(), "loaded settings");
        Ok(settings)
    }

    /// Build settings from an optional file and explicit overrides.
    pub fn from_sources(path: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(
                Environment::with_prefix("STATUSWATCH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("datadog.api_key", overrides.api_key)?
            .set_override_option("datadog.app_key", overrides.app_key)?
            .set_override_option("datadog.site", overrides.site)?
            .build()?
            .try_deserialize()
    }

    /// Both keys are needed to query Datadog.
    pub fn has_credentials(&self) -> bool {
        let set = |k: &Option<String>| k.as_deref().is_some_and(|k| !k.is_empty());
        set(&self.datadog.api_key) && set(&self.datadog.app_key)
    }

    pub fn refresh_interval(&self) -> Result<Duration> {
        parse_duration(&self.page.refresh)
            .with_context(|| format!("Invalid page.refresh: {}", self.page.refresh))
    }

    pub fn request_timeout(&self) -> Result<Duration> {
        parse_duration(&self.datadog.timeout)
            .with_context(|| format!("Invalid datadog.timeout: {}", self.datadog.timeout))
    }
}

fn default_site() -> String {
    DEFAULT_SITE.to_string()
}

fn default_timeout() -> String {
    "10s".to_string()
}

fn default_title() -> String {
    "Status".to_string()
}

fn default_refresh() -> String {
    "60s".to_string()
}
