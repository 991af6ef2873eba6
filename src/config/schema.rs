/// Configuration schema and defaults for trendlens.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[backend]`, `[dashboard]`, `[storage]` and `[logging]`.
///
/// Every field has a sensible built-in default. Users only need to set the
/// values they want to override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level trendlens configuration.
///
/// Maps directly to the `~/.trendlens/config.toml` and `.trendlens.toml`
/// file schemas. All sections and fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendlensConfig {
    pub backend: BackendConfig,
    pub dashboard: DashboardConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [backend]
// ---------------------------------------------------------------------------

/// Where the trends service lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL the `/weeks`, `/uptrends`, `/series` and `/reindex` paths
    /// are appended to.
    pub base_url: String,
    /// Per-request timeout (milliseconds).
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_ms: 15_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [dashboard]
// ---------------------------------------------------------------------------

/// Operating mode of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Restricted mode: term filters disabled, history truncated.
    #[default]
    Demo,
    /// Full access.
    Pro,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Demo => write!(f, "demo"),
            Self::Pro => write!(f, "pro"),
        }
    }
}

/// Dashboard behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// `demo` or `pro`.
    pub mode: Mode,
    /// Size of the trailing week window selected by default.
    pub default_window: usize,
    /// How many of the newest weeks stay selectable in demo mode.
    pub demo_week_limit: usize,
    /// How long a toast notification stays visible (milliseconds).
    pub toast_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            default_window: 6,
            demo_week_limit: 8,
            toast_ms: 2600,
        }
    }
}

// ---------------------------------------------------------------------------
// [storage]
// ---------------------------------------------------------------------------

/// Filter persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Persist filter selections to `~/.trendlens/storage.json`.
    pub persist: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { persist: true }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Diagnostics log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append events to `~/.trendlens/events.jsonl`.
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ---------------------------------------------------------------------------
// Default TOML template
// ---------------------------------------------------------------------------

impl TrendlensConfig {
    /// Annotated default config written by `trendlens config init`.
    pub fn default_toml() -> &'static str {
        r#"# trendlens configuration
# Precedence: defaults < ~/.trendlens/config.toml < .trendlens.toml < TRENDLENS_* env

[backend]
# Base URL of the trends service
base_url = "http://127.0.0.1:8000"
# Per-request timeout in milliseconds
timeout_ms = 15000

[dashboard]
# "demo" disables term filters and keeps only the newest weeks; "pro" unlocks all
mode = "demo"
# Trailing window (in weeks) selected when no saved filters exist
default_window = 6
# Weeks kept selectable in demo mode
demo_week_limit = 8
# Toast notification lifetime in milliseconds
toast_ms = 2600

[storage]
# Remember the last filter selection between sessions
persist = true

[logging]
# Append diagnostics to ~/.trendlens/events.jsonl
enabled = true
"#
    }
}
