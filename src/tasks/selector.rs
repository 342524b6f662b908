use std::cmp::Ordering;
use crate::config::planner::SelectionConfig;
use crate::profile::UserProfile;
use crate::tasks::model::Task;

/// Greedy, time-boxed task chooser biased toward weak skills.
///
/// Not a true knapsack solver: candidates are ranked once by efficiency and
/// taken in that order while they fit the remaining budget.
#[derive(Debug, Clone, Copy)]
pub struct TaskSelector {
    weakness_bias: f64,
}

impl Default for TaskSelector {
    fn default() -> Self {
        Self::new(&SelectionConfig::default())
    }
}

impl TaskSelector {
    pub fn new(selection: &SelectionConfig) -> Self {
        TaskSelector {
            weakness_bias: selection.weakness_bias,
        }
    }

    /// Extra weight for tasks training a weak skill.
    pub fn priority_weight(&self, task: &Task, profile: &UserProfile) -> f64 {
        (1.0 - profile.mastery(&task.skill_id)) * self.weakness_bias
    }

    /// (impact + priority weight) per minute.
    pub fn efficiency(&self, task: &Task, profile: &UserProfile) -> f64 {
        (task.impact_score + self.priority_weight(task, profile)) / task.time_estimate as f64
    }

    /// Pick tasks by descending efficiency until the budget is spent.
    ///
    /// Ties keep candidate order. A task that does not fit is skipped and
    /// never reconsidered; later, shorter tasks may still be taken. The result
    /// is in acceptance order.
    pub fn select(&self, candidates: &[Task], budget: u32, profile: &UserProfile) -> Vec<Task> {
        let mut scored: Vec<(f64, &Task)> = candidates
            .iter()
            .filter(|task| {
                if task.time_estimate == 0 {
                    tracing::debug!(task = %task.id, "Skipping task with zero time estimate");
                    return false;
                }
                true
            })
            .map(|task| (self.efficiency(task, profile), task))
            .collect();

        // sort_by is stable, so equal efficiencies keep candidate order
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        let mut selected = Vec::new();
        let mut remaining = budget;
        for (efficiency, task) in scored {
            if remaining == 0 {
                break;
            }
            if task.time_estimate <= remaining {
                tracing::trace!(task = %task.id, efficiency = efficiency, remaining = remaining, "Accepted task");
                remaining -= task.time_estimate;
                selected.push(task.clone());
            }
        }
        selected
    }
}
