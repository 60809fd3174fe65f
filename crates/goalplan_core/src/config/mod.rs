use crate::error::AppError;
use crate::gantt::GanttConfig;
use crate::schedule::ScheduleConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "GOALPLAN_CONFIG_PATH";

#[derive(Debug, Clone)]
pub struct Palette {
    pub accent: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn accentize(&self, text: &str) -> String {
        if self.accent.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.accent, text, self.reset)
        }
    }

    pub fn mutedize(&self, text: &str) -> String {
        if self.muted.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.muted, text, self.reset)
        }
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match theme.and_then(canonical_theme_name) {
        Some(ref name) if name == "noir" => Palette {
            accent: "\x1b[38;5;208m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        Some(ref name) if name == "solarized" => Palette {
            accent: "\x1b[38;5;108m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        _ => Palette {
            accent: "",
            muted: "",
            reset: "",
        },
    }
}

pub fn canonical_theme_name(raw: &str) -> Option<String> {
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

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        return Some("default".into());
    }

    match trimmed {
        "vanilla" | "light" => Some("default".to_string()),
        "dark" | "dark_mode" | "darkmode" => Some("noir".to_string()),
        other => Some(other.to_string()),
    }
}

/// On-disk settings. Every field is optional; unset fields fall back to the
/// engine defaults when resolved.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub day_width: Option<u32>,
    #[serde(default)]
    pub pad_days: Option<u32>,
    #[serde(default)]
    pub max_milestones: Option<usize>,
    #[serde(default)]
    pub tasks_per_milestone: Option<usize>,
    #[serde(default)]
    pub milestone_label: Option<String>,
    #[serde(default)]
    pub palette: Option<Vec<String>>,
}

impl Config {
    pub fn schedule_config(&self) -> ScheduleConfig {
        let mut resolved = ScheduleConfig::default();
        if let Some(max) = self.max_milestones.filter(|value| *value > 0) {
            resolved.max_milestones = max;
        }
        if let Some(per) = self.tasks_per_milestone.filter(|value| *value > 0) {
            resolved.tasks_per_milestone = per;
        }
        if let Some(label) = self.milestone_label.as_deref().map(str::trim)
            && !label.is_empty()
        {
            resolved.milestone_label = label.to_string();
        }
        if let Some(palette) = self.palette.as_ref().filter(|palette| !palette.is_empty()) {
            resolved.palette = palette.clone();
        }
        resolved
    }

    pub fn gantt_config(&self) -> GanttConfig {
        let mut resolved = GanttConfig::default();
        if let Some(width) = self.day_width.filter(|value| *value > 0) {
            resolved.day_width = f64::from(width);
        }
        if let Some(pad) = self.pad_days {
            resolved.pad_days = i64::from(pad);
        }
        resolved
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
    pub day_width: Option<u32>,
    pub pad_days: Option<u32>,
    pub max_milestones: Option<usize>,
    pub tasks_per_milestone: Option<usize>,
    pub milestone_label: Option<String>,
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
            .join("goalplan")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("goalplan")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config() -> Result<Config, AppError> {
    let path = config_path()?;
    load_config_from_path(&path)
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

pub fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
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
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    tracing::debug!(path = %path.display(), "loading config");
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
    if overrides.day_width.is_some() {
        merged.day_width = overrides.day_width;
    }
    if overrides.pad_days.is_some() {
        merged.pad_days = overrides.pad_days;
    }
    if overrides.max_milestones.is_some() {
        merged.max_milestones = overrides.max_milestones;
    }
    if overrides.tasks_per_milestone.is_some() {
        merged.tasks_per_milestone = overrides.tasks_per_milestone;
    }
    if overrides.milestone_label.is_some() {
        merged.milestone_label = overrides.milestone_label.clone();
    }

    merged
}
