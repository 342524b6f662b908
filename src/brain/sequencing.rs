use crate::profile::UserProfile;
use crate::tasks::model::{Task, TaskType};

/// Reorder a day's plan so a practice task on a weak skill comes after the
/// video for the same skill, when both were selected.
///
/// Only moves tasks; never adds or drops one, so total time is unchanged.
pub fn videos_before_practice(tasks: Vec<Task>, profile: &UserProfile, low_mastery: f64) -> Vec<Task> {
    let mut ordered = tasks;
    let mut i = 0;
    while i < ordered.len() {
        let needs_video = ordered[i].task_type == TaskType::Practice
            && profile.mastery(&ordered[i].skill_id) < low_mastery;
        if needs_video {
            let skill = ordered[i].skill_id.clone();
            let later_video = ordered[i + 1..]
                .iter()
                .position(|t| t.task_type == TaskType::Video && t.skill_id == skill)
                .map(|offset| i + 1 + offset);
            if let Some(j) = later_video {
                let video = ordered.remove(j);
                tracing::debug!(video = %video.id, practice = %ordered[i].id, "Moved video ahead of practice");
                ordered.insert(i, video);
                i += 1;
            }
        }
        i += 1;
    }
    ordered
}
