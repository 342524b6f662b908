use std::collections::HashMap;
use chrono::{DateTime, Utc};
use crate::profile::{SessionRecord, UserProfile};
use crate::tasks::model::Task;

/// Mastery gained by finishing one task.
pub const COMPLETION_MASTERY_STEP: f64 = 0.1;

/// Produce the learner's next profile after finishing `task`.
///
/// The trained skill gains a fixed mastery step (capped at 1) and a session
/// record crediting the full time estimate with a perfect score is appended.
/// The input profile is left untouched.
pub fn record_completion(profile: &UserProfile, task: &Task, at: DateTime<Utc>) -> UserProfile {
    let mut next = profile.clone();
    let mastery = next.mastery(&task.skill_id);
    next.set_mastery(&task.skill_id, (mastery + COMPLETION_MASTERY_STEP).min(1.0));

    let mut performance = HashMap::new();
    performance.insert(task.id.clone(), 1.0);
    next.engagement_history.push(SessionRecord {
        date: at,
        task_ids: vec![task.id.clone()],
        completed_ids: vec![task.id.clone()],
        duration: task.time_estimate,
        performance,
    });

    tracing::debug!(
        task = %task.id,
        skill = %task.skill_id,
        mastery_before = mastery,
        mastery_after = next.mastery(&task.skill_id),
        "Recorded task completion"
    );
    next
}
