use serde::{Serialize, Deserialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    Reading,
    Listening,
    Writing,
    Speaking,
    Grammar,
    Vocabulary,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Reading => "Reading",
            SkillCategory::Listening => "Listening",
            SkillCategory::Writing => "Writing",
            SkillCategory::Speaking => "Speaking",
            SkillCategory::Grammar => "Grammar",
            SkillCategory::Vocabulary => "Vocabulary",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of curriculum in the prerequisite graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillNode {
    pub id: String,
    pub name: String,
    pub category: SkillCategory,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    /// 1-10, advisory only.
    pub difficulty: u8,
}

impl SkillNode {
    pub fn new(
        id: &str,
        name: &str,
        category: SkillCategory,
        prerequisites: &[&str],
        difficulty: u8,
    ) -> Self {
        SkillNode {
            id: id.to_string(),
            name: name.to_string(),
            category,
            prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
            difficulty,
        }
    }
}
