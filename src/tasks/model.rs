use serde::{Serialize, Deserialize};
use crate::skills::model::SkillCategory;

/// Pedagogical role of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Video,
    Practice,
    Prompt,
    Review,
}

/// An atomic learning activity from the static catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: SkillCategory,
    pub skill_id: String,
    /// Minutes, strictly positive.
    pub time_estimate: u32,
    /// Relative priority weight, strictly positive.
    pub impact_score: f64,
    #[serde(rename = "type")]
    pub task_type: TaskType,
}

impl Task {
    pub fn new(
        id: &str,
        title: &str,
        category: SkillCategory,
        skill_id: &str,
        time_estimate: u32,
        impact_score: f64,
        task_type: TaskType,
    ) -> Self {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            category,
            skill_id: skill_id.to_string(),
            time_estimate,
            impact_score,
            task_type,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// `Title (Category)`, as used in coaching prompts.
    pub fn summary(&self) -> String {
        format!("{} ({})", self.title, self.category)
    }
}
