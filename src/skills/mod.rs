pub mod graph;
pub mod model;

pub use graph::SkillGraph;
pub use model::{SkillCategory, SkillNode};
