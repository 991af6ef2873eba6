/// Configuration system for trendlens.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: [`schema::TrendlensConfig::default()`]
/// 2. **User global config**: `~/.trendlens/config.toml`
/// 3. **Project local config**: `.trendlens.toml` in the current directory
/// 4. **Environment variables**: `TRENDLENS_*` overrides (highest precedence)
///
/// Layers are merged key by key, so a file that only sets
/// `dashboard.mode` leaves every other value from the layer below intact.
/// Malformed files are skipped.
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::{Mode, TrendlensConfig};

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
pub fn load() -> TrendlensConfig {
    let mut layers = Vec::new();
    if let Some(global) = load_toml_value(global_config_path()) {
        layers.push(global);
    }
    if let Some(project) = load_toml_value(project_config_path()) {
        layers.push(project);
    }

    let mut config = resolve_layers(&layers);
    apply_env_overrides(&mut config);
    config
}

/// Merge TOML layers over the built-in defaults, lowest precedence first.
fn resolve_layers(layers: &[toml::Value]) -> TrendlensConfig {
    let Ok(mut merged) = toml::Value::try_from(TrendlensConfig::default()) else {
        return TrendlensConfig::default();
    };
    for layer in layers {
        merge_value(&mut merged, layer);
    }
    merged.try_into().unwrap_or_default()
}

/// Read a TOML file as an untyped value. `None` if missing or malformed.
fn load_toml_value(path: Option<PathBuf>) -> Option<toml::Value> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively overlay `overlay` onto `base`. Tables merge, everything
/// else is replaced.
fn merge_value(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        base_table.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// The per-user state directory: `~/.trendlens`.
pub fn state_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".trendlens"))
}

fn global_config_path() -> Option<PathBuf> {
    state_dir().map(|dir| dir.join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".trendlens.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `TRENDLENS_URL`: backend base URL
/// - `TRENDLENS_TIMEOUT_MS`: request timeout
/// - `TRENDLENS_MODE`: `demo` or `pro`
/// - `TRENDLENS_PERSIST`: filter persistence (`1`/`true`/`yes`/`on`)
/// - `TRENDLENS_LOG`: diagnostics log
fn apply_env_overrides(config: &mut TrendlensConfig) {
    if let Ok(val) = std::env::var("TRENDLENS_URL")
        && !val.is_empty()
    {
        config.backend.base_url = val;
    }
    if let Ok(val) = std::env::var("TRENDLENS_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.backend.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("TRENDLENS_MODE")
        && let Some(mode) = parse_mode(&val)
    {
        config.dashboard.mode = mode;
    }
    if let Ok(val) = std::env::var("TRENDLENS_PERSIST") {
        config.storage.persist = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("TRENDLENS_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parse a mode string.
pub fn parse_mode(val: &str) -> Option<Mode> {
    match val.trim().to_ascii_lowercase().as_str() {
        "demo" => Some(Mode::Demo),
        "pro" | "full" => Some(Mode::Pro),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.trendlens/config.toml`.
///
/// Returns an error if the file already exists unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.trendlens/ directory")?;
    }

    fs::write(&path, TrendlensConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single dotted key (e.g. `dashboard.mode`) in the global config.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let mut root: toml::Value = if path.exists() {
        let content = fs::read_to_string(&path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config as TOML value")?
    } else {
        toml::Value::try_from(TrendlensConfig::default())
            .context("failed to serialize default config")?
    };

    set_toml_value(&mut root, key, value)?;

    // Reject values that would no longer load as a config.
    root.clone()
        .try_into::<TrendlensConfig>()
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((leaf, sections)) = parts.split_last() else {
        anyhow::bail!("empty config key");
    };

    let mut current = root;
    for &part in sections {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table for '{key}'"))?;

    let new_value = match table.get(*leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("config key not found: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
