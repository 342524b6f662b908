use serde::{Serialize, Deserialize};
use std::fmt;

/// Unified error type for the planner.
/// Fallible operations return Result<T, PlannerError>; the recommendation path itself never fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerError {
    pub message: String,
    pub stage: String,
    pub context: Option<String>,
    pub source: Option<String>,
}

impl PlannerError {
    /// Create a new error with stage and message
    pub fn new<S: Into<String>>(message: S, stage: &'static str) -> Self {
        PlannerError {
            message: message.into(),
            stage: stage.to_string(),
            context: None,
            source: None,
        }
    }

    /// Add additional context information
    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add source error information
    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)?;
        if let Some(ref context) = self.context {
            write!(f, " (context: {})", context)?;
        }
        if let Some(ref source) = self.source {
            write!(f, " (source: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for PlannerError {}

/// Static catalog defects detected at startup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate skill id '{0}'")]
    DuplicateSkill(String),
    #[error("duplicate task id '{0}'")]
    DuplicateTask(String),
    #[error("skill '{skill}' lists unknown prerequisite '{prerequisite}'")]
    UnknownPrerequisite { skill: String, prerequisite: String },
    #[error("prerequisite cycle through skill '{0}'")]
    PrerequisiteCycle(String),
    #[error("task '{task}' trains unknown skill '{skill}'")]
    UnknownTaskSkill { task: String, skill: String },
    #[error("task '{0}' must have a positive time estimate")]
    NonPositiveTime(String),
    #[error("task '{0}' must have a positive impact score")]
    NonPositiveImpact(String),
    #[error("skill '{skill}' difficulty {difficulty} is outside 1-10")]
    DifficultyOutOfRange { skill: String, difficulty: u8 },
}

impl From<CatalogError> for PlannerError {
    fn from(err: CatalogError) -> Self {
        PlannerError::new(err.to_string(), "catalog")
    }
}

impl From<anyhow::Error> for PlannerError {
    fn from(err: anyhow::Error) -> Self {
        PlannerError::new(
            err.to_string(),
            "unknown"
        ).with_source("anyhow")
    }
}

impl From<std::io::Error> for PlannerError {
    fn from(err: std::io::Error) -> Self {
        PlannerError::new(
            format!("I/O error: {}", err),
            "io"
        ).with_source("std::io")
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        PlannerError::new(
            format!("JSON error: {}", err),
            "json_parse"
        ).with_source("serde_json")
    }
}

impl From<toml::de::Error> for PlannerError {
    fn from(err: toml::de::Error) -> Self {
        PlannerError::new(
            format!("TOML error: {}", err),
            "config_parse"
        ).with_source("toml")
    }
}

impl From<tokio::time::error::Elapsed> for PlannerError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        PlannerError::new(
            "Operation timed out",
            "timeout"
        ).with_source("tokio::time")
    }
}
