use std::collections::HashSet;
use std::path::Path;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use crate::error::{CatalogError, PlannerError};
use crate::skills::model::{SkillCategory, SkillNode};
use crate::tasks::model::{Task, TaskType};

/// Skill graph plus the tasks that train its skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub skills: Vec<SkillNode>,
    pub tasks: Vec<Task>,
}

impl Catalog {
    pub fn new(skills: Vec<SkillNode>, tasks: Vec<Task>) -> Self {
        Catalog { skills, tasks }
    }

    /// The catalog bundled with the application.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Task-level checks; the skill graph validates itself on construction.
    pub fn validate_tasks(&self) -> Result<(), CatalogError> {
        let skill_ids: HashSet<&str> = self.skills.iter().map(|s| s.id.as_str()).collect();
        let mut task_ids = HashSet::new();
        for task in &self.tasks {
            if !task_ids.insert(task.id.as_str()) {
                return Err(CatalogError::DuplicateTask(task.id.clone()));
            }
            if !skill_ids.contains(task.skill_id.as_str()) {
                return Err(CatalogError::UnknownTaskSkill {
                    task: task.id.clone(),
                    skill: task.skill_id.clone(),
                });
            }
            if task.time_estimate == 0 {
                return Err(CatalogError::NonPositiveTime(task.id.clone()));
            }
            if !task.impact_score.is_finite() || task.impact_score <= 0.0 {
                return Err(CatalogError::NonPositiveImpact(task.id.clone()));
            }
        }
        Ok(())
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn from_json(content: &str) -> Result<Self, PlannerError> {
        let catalog: Catalog = serde_json::from_str(content)?;
        Ok(catalog)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, PlannerError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PlannerError::new(
                format!("Failed to read catalog: {}", e),
                "io"
            ).with_context(format!("path: {:?}", path)))?;
        let catalog = Self::from_json(&content)
            .map_err(|e| e.with_context(format!("path: {:?}", path)))?;
        tracing::info!(
            path = ?path,
            skills = catalog.skills.len(),
            tasks = catalog.tasks.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }
}

fn builtin_skills() -> Vec<SkillNode> {
    use SkillCategory::*;
    vec![
        SkillNode::new("g1", "Basic Tenses", Grammar, &[], 2),
        SkillNode::new("v1", "Academic Word List 1", Vocabulary, &[], 3),
        SkillNode::new("r1", "Skimming & Scanning", Reading, &["v1"], 4),
        SkillNode::new("r2", "Multiple Choice Questions", Reading, &["r1"], 5),
        SkillNode::new("w1", "Essay Structure", Writing, &["g1", "v1"], 6),
        SkillNode::new("w2", "Cohesion & Coherence", Writing, &["w1"], 7),
        SkillNode::new("s1", "Fluency & Pronunciation", Speaking, &["g1"], 5),
        SkillNode::new("l1", "Identifying Main Ideas", Listening, &[], 4),
    ]
}

fn builtin_tasks() -> Vec<Task> {
    use SkillCategory::*;
    vec![
        Task::new("t1", "Tense Mastery Video", Grammar, "g1", 5, 8.0, TaskType::Video)
            .with_description("Quick recap of present perfect vs past simple."),
        Task::new("t2", "Scanning Practice", Reading, "r1", 8, 7.0, TaskType::Practice)
            .with_description("Find 5 specific dates in this text under 2 minutes."),
        Task::new("t3", "Academic Vocab Flashcards", Vocabulary, "v1", 10, 9.0, TaskType::Review)
            .with_description("Review the first 20 words of the AWL."),
        Task::new("t4", "Task 2 Essay Planning", Writing, "w1", 12, 8.0, TaskType::Practice)
            .with_description("Outline an essay for a topic on environment."),
        Task::new("t5", "Speaking Prompt: Hobbies", Speaking, "s1", 7, 6.0, TaskType::Prompt)
            .with_description("Record yourself speaking for 2 minutes."),
        Task::new("t6", "Listening for Details", Listening, "l1", 10, 7.0, TaskType::Practice)
            .with_description("Short audio clip with fill-in-the-blanks."),
        Task::new("t7", "Complex Sentence Structures", Grammar, "g1", 8, 9.0, TaskType::Video)
            .with_description("How to use relative clauses in Writing."),
    ]
}

lazy_static! {
    static ref BUILTIN: Catalog = Catalog::new(builtin_skills(), builtin_tasks());
}
