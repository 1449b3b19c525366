use crate::error::AppError;
use crate::terminal::OutputKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "config.json";
pub const CONFIG_ENV_VAR: &str = "TASKLIST_CONFIG_PATH";

#[derive(Debug, Clone)]
pub struct Palette {
    pub error: &'static str,
    pub success: &'static str,
    pub command: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub const PLAIN: Palette = Palette {
        error: "",
        success: "",
        command: "",
        muted: "",
        reset: "",
    };

    fn wrap(&self, color: &str, text: &str) -> String {
        if color.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", color, text, self.reset)
        }
    }

    pub fn paint(&self, kind: OutputKind, text: &str) -> String {
        match kind {
            OutputKind::Output => text.to_string(),
            OutputKind::Error => self.wrap(self.error, text),
            OutputKind::Success => self.wrap(self.success, text),
            OutputKind::Command => self.wrap(self.command, text),
        }
    }

    pub fn mutedize(&self, text: &str) -> String {
        self.wrap(self.muted, text)
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match theme.and_then(canonical_theme_name).as_deref() {
        Some("noir") => Palette {
            error: "\x1b[38;5;203m",
            success: "\x1b[38;5;114m",
            command: "\x1b[38;5;80m",
            muted: "\x1b[38;5;245m",
            reset: "\x1b[0m",
        },
        Some("solarized") => Palette {
            error: "\x1b[38;5;160m",
            success: "\x1b[38;5;106m",
            command: "\x1b[38;5;37m",
            muted: "\x1b[38;5;246m",
            reset: "\x1b[0m",
        },
        _ => Palette::PLAIN,
    }
}

pub fn canonical_theme_name(raw: &str) -> Option<String> {
    let cleaned = canonical_key(raw);
    if cleaned.is_empty() {
        return Some("default".into());
    }

    match cleaned.as_str() {
        "vanilla" | "light" => Some("default".to_string()),
        "dark" | "dark_mode" | "darkmode" => Some("noir".to_string()),
        other => Some(other.to_string()),
    }
}

/// Lower-cases and collapses every run of punctuation to a single `_`.
pub fn canonical_key(raw: &str) -> String {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    cleaned.trim_matches('_').to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartMode {
    #[default]
    Terminal,
    Gui,
}

impl FromStr for StartMode {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match canonical_key(raw).as_str() {
            "terminal" => Ok(Self::Terminal),
            "gui" => Ok(Self::Gui),
            _ => Err(AppError::invalid_input(format!(
                "start mode must be terminal or gui, got '{}'",
                raw.trim()
            ))),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub start_mode: Option<StartMode>,
    #[serde(default)]
    pub mode_switch_delay_ms: Option<u64>,
}

impl Config {
    pub fn start_mode(&self) -> StartMode {
        self.start_mode.unwrap_or_default()
    }

    pub fn mode_switch_delay(&self) -> Duration {
        self.mode_switch_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(crate::terminal::DEFAULT_MODE_SWITCH_DELAY)
    }

    pub fn palette(&self) -> Palette {
        palette_for_theme(self.theme.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub start_mode: Option<StartMode>,
    pub mode_switch_delay_ms: Option<u64>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("tasklist")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tasklist")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "falling back to default config");
            ConfigLoad {
                config: Config::default(),
                error: Some(err),
            }
        }
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let mut config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    config.theme = config.theme.and_then(|name| canonical_theme_name(&name));
    Ok(config)
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(theme) = overrides.theme.as_ref()
        && let Some(normalized) = canonical_theme_name(theme)
    {
        merged.theme = Some(normalized);
    }
    if let Some(start_mode) = overrides.start_mode {
        merged.start_mode = Some(start_mode);
    }
    if let Some(delay) = overrides.mode_switch_delay_ms {
        merged.mode_switch_delay_ms = Some(delay);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::{
        Config, ConfigOverrides, Palette, StartMode, canonical_theme_name, load_config_from_path,
        load_config_with_fallback_from_path, merge_overrides, palette_for_theme,
    };
    use crate::terminal::OutputKind;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("tasklist-{nanos}-{file_name}"))
    }

    #[test]
    fn load_config_missing_returns_defaults_without_error() {
        let path = temp_path("missing-config.json");
        let result = load_config_with_fallback_from_path(&path);

        assert_eq!(result.config, Config::default());
        assert!(result.error.is_none());
    }

    #[test]
    fn load_config_invalid_returns_defaults_and_error() {
        let path = temp_path("invalid-config.json");
        fs::write(&path, "{ invalid json ").unwrap();

        let result = load_config_with_fallback_from_path(&path);
        fs::remove_file(&path).ok();

        assert_eq!(result.config, Config::default());
        assert_eq!(result.error.unwrap().code(), "invalid_data");
    }

    #[test]
    fn load_config_reads_valid_file() {
        let path = temp_path("valid-config.json");
        let content = serde_json::json!({
            "theme": "Dark Mode",
            "start_mode": "gui",
            "mode_switch_delay_ms": 0
        });
        fs::write(&path, serde_json::to_string(&content).unwrap()).unwrap();

        let loaded = load_config_from_path(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.theme.as_deref(), Some("noir"));
        assert_eq!(loaded.start_mode(), StartMode::Gui);
        assert_eq!(loaded.mode_switch_delay(), Duration::ZERO);
    }

    #[test]
    fn defaults_start_in_terminal_with_half_second_switch() {
        let config = Config::default();
        assert_eq!(config.start_mode(), StartMode::Terminal);
        assert_eq!(config.mode_switch_delay(), Duration::from_millis(500));
    }

    #[test]
    fn merge_overrides_replaces_only_given_fields() {
        let base = Config {
            theme: Some("default".into()),
            start_mode: Some(StartMode::Gui),
            mode_switch_delay_ms: Some(250),
        };

        let overrides = ConfigOverrides {
            theme: Some("Solarized".into()),
            start_mode: None,
            mode_switch_delay_ms: Some(10),
        };

        let merged = merge_overrides(&base, &overrides);
        assert_eq!(merged.theme.as_deref(), Some("solarized"));
        assert_eq!(merged.start_mode, Some(StartMode::Gui));
        assert_eq!(merged.mode_switch_delay_ms, Some(10));
        assert_eq!(base.theme.as_deref(), Some("default"));
    }

    #[test]
    fn merge_overrides_with_empty_overrides_returns_clone() {
        let base = Config {
            theme: Some("noir".into()),
            start_mode: None,
            mode_switch_delay_ms: None,
        };

        assert_eq!(merge_overrides(&base, &ConfigOverrides::default()), base);
    }

    #[test]
    fn canonical_theme_name_maps_variants() {
        assert_eq!(canonical_theme_name("Vanilla"), Some("default".into()));
        assert_eq!(canonical_theme_name("Noir"), Some("noir".into()));
        assert_eq!(canonical_theme_name("Solarized"), Some("solarized".into()));
        assert_eq!(canonical_theme_name("dark-mode"), Some("noir".into()));
        assert_eq!(canonical_theme_name("  "), Some("default".into()));
    }

    #[test]
    fn start_mode_parses_loosely() {
        assert_eq!(" GUI ".parse::<StartMode>().unwrap(), StartMode::Gui);
        assert_eq!("Terminal".parse::<StartMode>().unwrap(), StartMode::Terminal);
        assert!("cards".parse::<StartMode>().is_err());
    }

    #[test]
    fn palette_paints_by_kind() {
        let noir = palette_for_theme(Some("noir"));
        assert_eq!(
            noir.paint(OutputKind::Error, "boom"),
            "\x1b[38;5;203mboom\x1b[0m"
        );
        assert_eq!(noir.paint(OutputKind::Output, "plain"), "plain");

        let plain = palette_for_theme(Some("oceanic"));
        assert_eq!(plain.paint(OutputKind::Success, "ok"), "ok");
        assert!(Palette::PLAIN.mutedize("x") == "x");
    }
}
