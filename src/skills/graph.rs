use std::collections::{HashMap, HashSet};
use crate::config::planner::SelectionConfig;
use crate::error::CatalogError;
use crate::profile::UserProfile;
use crate::skills::model::SkillNode;

/// Static prerequisite graph over the skill catalog.
///
/// Holds only the immutable catalog and its thresholds, so one instance can be
/// shared across concurrent requests.
#[derive(Debug, Clone)]
pub struct SkillGraph {
    nodes: Vec<SkillNode>,
    index: HashMap<String, usize>,
    mastered_threshold: f64,
    prerequisite_threshold: f64,
}

impl SkillGraph {
    /// Build a graph, rejecting duplicate ids, dangling prerequisites and cycles.
    pub fn new(nodes: Vec<SkillNode>, selection: &SelectionConfig) -> Result<Self, CatalogError> {
        let index = validate(&nodes)?;
        Ok(SkillGraph {
            nodes,
            index,
            mastered_threshold: selection.mastered_threshold,
            prerequisite_threshold: selection.prerequisite_threshold,
        })
    }

    pub fn with_defaults(nodes: Vec<SkillNode>) -> Result<Self, CatalogError> {
        Self::new(nodes, &SelectionConfig::default())
    }

    pub fn nodes(&self) -> &[SkillNode] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&SkillNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Direct prerequisites of a skill, `None` for ids outside the catalog.
    pub fn prerequisites_of(&self, id: &str) -> Option<&[String]> {
        self.node(id).map(|node| node.prerequisites.as_slice())
    }

    pub fn is_mastered(&self, profile: &UserProfile, skill_id: &str) -> bool {
        profile.mastery(skill_id) >= self.mastered_threshold
    }

    fn prerequisites_met(&self, profile: &UserProfile, node: &SkillNode) -> bool {
        node.prerequisites
            .iter()
            .all(|p| profile.mastery(p) >= self.prerequisite_threshold)
    }

    /// Skills open for practice, in catalog order.
    ///
    /// A skill is eligible when it is not yet mastered and every prerequisite
    /// has reached the prerequisite threshold. Mastery entries for ids outside
    /// the catalog are ignored.
    pub fn eligible_skills(&self, profile: &UserProfile) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|node| !self.is_mastered(profile, &node.id))
            .filter(|node| self.prerequisites_met(profile, node))
            .map(|node| node.id.clone())
            .collect()
    }

    /// Locked skills one step beyond current mastery: not mastered, not
    /// eligible, and every unmet prerequisite is at least `floor`.
    pub fn reach_skills(&self, profile: &UserProfile, floor: f64) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|node| !self.is_mastered(profile, &node.id))
            .filter(|node| !self.prerequisites_met(profile, node))
            .filter(|node| {
                node.prerequisites
                    .iter()
                    .map(|p| profile.mastery(p))
                    .filter(|&m| m < self.prerequisite_threshold)
                    .all(|m| m >= floor)
            })
            .map(|node| node.id.clone())
            .collect()
    }

    /// True when `candidate_id` is a direct or transitive prerequisite of `target_id`.
    /// Unknown targets yield false. Termination relies on the acyclicity checked in `new`.
    pub fn is_prerequisite(&self, target_id: &str, candidate_id: &str) -> bool {
        let node = match self.node(target_id) {
            Some(node) => node,
            None => return false,
        };
        if node.prerequisites.iter().any(|p| p == candidate_id) {
            return true;
        }
        node.prerequisites
            .iter()
            .any(|p| self.is_prerequisite(p, candidate_id))
    }
}

fn validate(nodes: &[SkillNode]) -> Result<HashMap<String, usize>, CatalogError> {
    let mut index = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if index.insert(node.id.clone(), i).is_some() {
            return Err(CatalogError::DuplicateSkill(node.id.clone()));
        }
        if !(1..=10).contains(&node.difficulty) {
            return Err(CatalogError::DifficultyOutOfRange {
                skill: node.id.clone(),
                difficulty: node.difficulty,
            });
        }
    }

    for node in nodes {
        for prerequisite in &node.prerequisites {
            if !index.contains_key(prerequisite) {
                return Err(CatalogError::UnknownPrerequisite {
                    skill: node.id.clone(),
                    prerequisite: prerequisite.clone(),
                });
            }
        }
    }

    // Depth-first colouring: a grey node reached again closes a cycle.
    let mut done: HashSet<usize> = HashSet::new();
    let mut on_path: HashSet<usize> = HashSet::new();
    for start in 0..nodes.len() {
        visit(start, nodes, &index, &mut on_path, &mut done)?;
    }

    Ok(index)
}

fn visit(
    i: usize,
    nodes: &[SkillNode],
    index: &HashMap<String, usize>,
    on_path: &mut HashSet<usize>,
    done: &mut HashSet<usize>,
) -> Result<(), CatalogError> {
    if done.contains(&i) {
        return Ok(());
    }
    if !on_path.insert(i) {
        return Err(CatalogError::PrerequisiteCycle(nodes[i].id.clone()));
    }
    for prerequisite in &nodes[i].prerequisites {
        if let Some(&j) = index.get(prerequisite) {
            visit(j, nodes, index, on_path, done)?;
        }
    }
    on_path.remove(&i);
    done.insert(i);
    Ok(())
}
