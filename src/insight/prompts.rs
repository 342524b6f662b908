use chrono::{DateTime, Duration, Utc};
use crate::profile::UserProfile;
use crate::tasks::model::Task;

pub fn motivational_prompt(target_band: f64) -> String {
    format!(
        "As a high-performance IELTS coach, give one specific, evidence-based motivational insight \
         for a student aiming for Band {}. Focus on why consistency matters. One short sentence.",
        target_band
    )
}

pub fn explanation_prompt(tasks: &[Task], profile: &UserProfile) -> String {
    let task_summary = tasks
        .iter()
        .map(Task::summary)
        .collect::<Vec<_>>()
        .join(", ");
    let avg_mastery = (profile.average_mastery() * 100.0).round() as u32;

    format!(
        "As an IELTS coach, explain why these tasks are optimal for a student aiming for Band {}:\n\
         Tasks: {}\n\
         Student Context: Current average mastery is {}%.\n\
         Daily limit: {} minutes.\n\
         Keep it encouraging, transparent, and brief (2 sentences).",
        profile.target_band,
        task_summary,
        avg_mastery,
        profile.budget_minutes()
    )
}

pub fn weekly_feedback_prompt(profile: &UserProfile, now: DateTime<Utc>) -> String {
    let cutoff = now - Duration::days(7);
    let week: Vec<_> = profile
        .engagement_history
        .iter()
        .filter(|r| r.date > cutoff)
        .collect();
    let completed: usize = week.iter().map(|r| r.completed_ids.len()).sum();
    let minutes: u32 = week.iter().map(|r| r.duration).sum();
    let avg_mastery = (profile.average_mastery() * 100.0).round() as u32;
    let days_left = profile.days_until_exam(now.date_naive()).max(0);

    format!(
        "Analyze this IELTS student's week and provide a motivating summary. Goal: Band {}. \
         This week: {} sessions, {} tasks completed, {} minutes studied. \
         Current average mastery across modules is {}%. \
         The exam is in {} days. \
         Generate a 3-sentence summary with one specific tip.",
        profile.target_band,
        week.len(),
        completed,
        minutes,
        avg_mastery,
        days_left
    )
}
