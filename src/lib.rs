pub mod brain;
pub mod cache;
pub mod catalog;
pub mod circuit_breaker;
pub mod config;
pub mod error;
pub mod insight;
pub mod logging;
pub mod metrics;
pub mod profile;
pub mod skills;
pub mod tasks;

pub use brain::{Recommendation, RecommendationEngine};
pub use catalog::Catalog;
pub use error::{CatalogError, PlannerError};
pub use profile::{DailyTimeBudget, SessionRecord, UserProfile};
pub use skills::{SkillCategory, SkillGraph, SkillNode};
pub use tasks::{Task, TaskSelector, TaskType};

// Unit tests kept under tests/unit, compiled into the library test binary
#[cfg(test)]
#[path = "../tests/unit/error_handling_test.rs"]
mod error_handling_test;
#[cfg(test)]
#[path = "../tests/unit/circuit_breaker_test.rs"]
mod circuit_breaker_test;

/// Build today's recommendation for a profile read from JSON, using the
/// bundled catalog and the process-wide configuration.
pub fn recommend_from_json(profile_json: &str) -> Result<Recommendation, PlannerError> {
    let profile = UserProfile::from_json(profile_json)?;
    let engine = RecommendationEngine::builtin()?;
    Ok(engine.get_daily_recommendation(&profile))
}
