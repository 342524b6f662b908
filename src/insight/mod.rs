pub mod ollama;
pub mod prompts;

use async_trait::async_trait;
use crate::logging;
use crate::profile::UserProfile;
use crate::tasks::model::Task;

pub use ollama::OllamaInsightProvider;

pub const FALLBACK_INSIGHT: &str =
    "Consistency is the strongest predictor of achieving a Band 7.5+ score.";
pub const FALLBACK_EXPLANATION: &str =
    "These tasks target high-impact skills tailored to your current progress and available time.";
pub const FALLBACK_WEEKLY: &str =
    "You're making steady progress toward your target band. Keep the consistency going!";

// Used when the provider answers with blank text rather than failing.
pub const EMPTY_EXPLANATION: &str =
    "This selection targets your immediate score improvement areas.";
pub const EMPTY_WEEKLY: &str =
    "Great job this week! Focus on Writing Task 2 structure next.";

/// Source of short coaching text shown next to the plan.
///
/// Implementations may fail, time out or answer with blank text; callers go
/// through the `*_or_fallback` helpers, which never surface an error.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn motivational_insight(&self, target_band: f64) -> anyhow::Result<String>;

    async fn explain_tasks(&self, tasks: &[Task], profile: &UserProfile) -> anyhow::Result<String>;

    async fn weekly_feedback(&self, profile: &UserProfile) -> anyhow::Result<String>;
}

/// Treat blank model output as a failure.
pub fn non_empty(result: anyhow::Result<String>) -> anyhow::Result<String> {
    let text = result?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        anyhow::bail!("insight provider returned empty text");
    }
    Ok(trimmed.to_string())
}

fn or_fallback(
    provider: &str,
    result: anyhow::Result<String>,
    on_error: &str,
    on_empty: &str,
    kind: &str,
) -> String {
    match result {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            logging::log_fallback(provider, kind, "empty text");
            on_empty.to_string()
        }
        Err(e) => {
            logging::log_fallback(provider, kind, &e.to_string());
            on_error.to_string()
        }
    }
}

pub async fn motivational_insight_or_fallback(provider: &dyn InsightProvider, target_band: f64) -> String {
    or_fallback(
        provider.name(),
        provider.motivational_insight(target_band).await,
        FALLBACK_INSIGHT,
        FALLBACK_INSIGHT,
        "motivational_insight",
    )
}

pub async fn explain_tasks_or_fallback(
    provider: &dyn InsightProvider,
    tasks: &[Task],
    profile: &UserProfile,
) -> String {
    or_fallback(
        provider.name(),
        provider.explain_tasks(tasks, profile).await,
        FALLBACK_EXPLANATION,
        EMPTY_EXPLANATION,
        "task_explanation",
    )
}

pub async fn weekly_feedback_or_fallback(provider: &dyn InsightProvider, profile: &UserProfile) -> String {
    or_fallback(
        provider.name(),
        provider.weekly_feedback(profile).await,
        FALLBACK_WEEKLY,
        EMPTY_WEEKLY,
        "weekly_feedback",
    )
}

/// Offline provider that always answers with the fixed sentences.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticInsightProvider;

#[async_trait]
impl InsightProvider for StaticInsightProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn motivational_insight(&self, _target_band: f64) -> anyhow::Result<String> {
        Ok(FALLBACK_INSIGHT.to_string())
    }

    async fn explain_tasks(&self, _tasks: &[Task], _profile: &UserProfile) -> anyhow::Result<String> {
        Ok(FALLBACK_EXPLANATION.to_string())
    }

    async fn weekly_feedback(&self, _profile: &UserProfile) -> anyhow::Result<String> {
        Ok(FALLBACK_WEEKLY.to_string())
    }
}
