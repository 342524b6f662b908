use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use crate::profile::UserProfile;
use crate::skills::graph::SkillGraph;
use crate::tasks::model::Task;

/// Supplies uniform draws in [0, 1) for the exploration coin flip.
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;
}

/// Draws from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Always returns the same draw. Pins the exploration decision in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedDraw(pub f64);

impl RandomSource for FixedDraw {
    fn next_unit(&self) -> f64 {
        self.0
    }
}

/// Reproducible sequence of draws from a seed.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&self) -> f64 {
        self.rng.lock().gen::<f64>()
    }
}

pub fn is_exploration_day(draw: f64, probability: f64) -> bool {
    draw < probability
}

/// What an exploration day does to the candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplorationPolicy {
    /// The day is flagged but the pool is unchanged.
    #[default]
    Disabled,
    /// Add one task for a skill just beyond the learner's unlocked set.
    ReachTask,
}

impl ExplorationPolicy {
    /// Apply the policy to the candidate pool. Outside exploration days the pool is returned as is.
    pub fn apply(
        &self,
        exploration_day: bool,
        mut candidates: Vec<Task>,
        catalog: &[Task],
        graph: &SkillGraph,
        profile: &UserProfile,
        reach_floor: f64,
    ) -> Vec<Task> {
        if !exploration_day {
            return candidates;
        }
        match self {
            ExplorationPolicy::Disabled => candidates,
            ExplorationPolicy::ReachTask => {
                let reach = graph.reach_skills(profile, reach_floor);
                let pick = catalog
                    .iter()
                    .filter(|task| reach.contains(&task.skill_id))
                    .find(|task| !candidates.iter().any(|c| c.id == task.id));
                if let Some(task) = pick {
                    tracing::debug!(task = %task.id, skill = %task.skill_id, "Added reach task");
                    candidates.push(task.clone());
                }
                candidates
            }
        }
    }
}
