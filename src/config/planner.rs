use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use lazy_static::lazy_static;
use crate::brain::exploration::ExplorationPolicy;
use crate::error::PlannerError;

/// Thresholds and weights used by the skill graph and the task selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Mastery at or above which a skill is retired from practice.
    pub mastered_threshold: f64,
    /// Mastery a prerequisite needs before dependents unlock.
    pub prerequisite_threshold: f64,
    /// Multiplier on (1 - mastery) added to a task's impact score.
    pub weakness_bias: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        SelectionConfig {
            mastered_threshold: 0.8,
            prerequisite_threshold: 0.7,
            weakness_bias: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationConfig {
    pub probability: f64,
    pub policy: ExplorationPolicy,
    /// Minimum mastery of every unmet prerequisite for a skill to count as a reach skill.
    pub reach_floor: f64,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        ExplorationConfig {
            probability: 0.2,
            policy: ExplorationPolicy::Disabled,
            reach_floor: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencingConfig {
    pub enabled: bool,
    /// Practice tasks below this mastery should follow a video for the same skill.
    pub low_mastery: f64,
}

impl Default for SequencingConfig {
    fn default() -> Self {
        SequencingConfig {
            enabled: false,
            low_mastery: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub failure_threshold: u64,
    pub cooldown_secs: u64,
    pub cache_capacity: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        InsightConfig {
            endpoint: "http://localhost:11434".to_string(),
            model: "qwen2.5:7b-instruct".to_string(),
            timeout_secs: 20,
            max_retries: 1,
            failure_threshold: 3,
            cooldown_secs: 60,
            cache_capacity: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub selection: SelectionConfig,
    pub exploration: ExplorationConfig,
    pub sequencing: SequencingConfig,
    pub insight: InsightConfig,
}

fn unit_interval(value: f64, field: &'static str) -> Result<(), PlannerError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PlannerError::new(
            format!("{} must be within [0, 1], got {}", field, value),
            "config_validate"
        ))
    }
}

impl PlannerConfig {
    /// Reject values the selection math cannot work with.
    pub fn validate(&self) -> Result<(), PlannerError> {
        unit_interval(self.selection.mastered_threshold, "selection.mastered_threshold")?;
        unit_interval(self.selection.prerequisite_threshold, "selection.prerequisite_threshold")?;
        unit_interval(self.exploration.probability, "exploration.probability")?;
        unit_interval(self.exploration.reach_floor, "exploration.reach_floor")?;
        unit_interval(self.sequencing.low_mastery, "sequencing.low_mastery")?;

        if !self.selection.weakness_bias.is_finite() || self.selection.weakness_bias < 0.0 {
            return Err(PlannerError::new(
                format!("selection.weakness_bias must be a non-negative number, got {}", self.selection.weakness_bias),
                "config_validate"
            ));
        }
        if self.insight.timeout_secs == 0 {
            return Err(PlannerError::new("insight.timeout_secs must be positive", "config_validate"));
        }
        if self.insight.cache_capacity == 0 {
            return Err(PlannerError::new("insight.cache_capacity must be positive", "config_validate"));
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, PlannerError> {
        let config: PlannerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, PlannerError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PlannerError::new(
                format!("Failed to read config: {}", e),
                "io"
            ).with_context(format!("path: {:?}", path)))?;
        Self::from_toml_str(&content)
            .map_err(|e| e.with_context(format!("path: {:?}", path)))
    }
}

/// Platform-specific application data directory.
pub fn data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.push("Library/Application Support/com.aiee.planner");
            return dir;
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            let mut dir = PathBuf::from(appdata);
            dir.push("com.aiee.planner");
            return dir;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.push(".local/share/com.aiee.planner");
            return dir;
        }
    }

    // Fallback
    PathBuf::from(".")
}

pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("AIEE_CONFIG") {
        return PathBuf::from(path);
    }
    data_dir().join("planner.toml")
}

/// Load the planner config, falling back to defaults when the file is missing or invalid.
pub fn load() -> PlannerConfig {
    let path = config_path();
    if !path.exists() {
        tracing::info!(path = ?path, "No planner config found, using defaults");
        return PlannerConfig::default();
    }

    match PlannerConfig::load_from_path(&path) {
        Ok(config) => {
            tracing::info!(path = ?path, "Loaded planner config");
            config
        }
        Err(e) => {
            tracing::warn!(path = ?path, error = %e, "Invalid planner config, using defaults");
            PlannerConfig::default()
        }
    }
}

lazy_static! {
    static ref PLANNER_CONFIG: PlannerConfig = load();
}

/// Get the cached planner configuration (loaded once per process)
pub fn get_planner_config() -> &'static PlannerConfig {
    &PLANNER_CONFIG
}
