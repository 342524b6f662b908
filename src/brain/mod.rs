pub mod exploration;
pub mod sequencing;

use std::collections::HashSet;
use std::sync::Arc;
use serde::{Serialize, Deserialize};
use crate::catalog::Catalog;
use crate::config::planner::{ExplorationConfig, PlannerConfig, SequencingConfig};
use crate::error::PlannerError;
use crate::insight::{self, InsightProvider};
use crate::logging;
use crate::metrics::Metrics;
use crate::profile::UserProfile;
use crate::skills::graph::SkillGraph;
use crate::tasks::model::Task;
use crate::tasks::selector::TaskSelector;
use self::exploration::{is_exploration_day, RandomSource, ThreadRandom};

pub const STATIC_REASONING: &str =
    "These tasks were chosen to maximize your impact score based on your goal and current skill gap.";

/// The day's plan handed to the presentation layer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub tasks: Vec<Task>,
    pub total_time: u32,
    pub reasoning: String,
    /// Outcome of the exploration coin flip for this call.
    #[serde(default)]
    pub exploration_day: bool,
}

/// Builds daily recommendations from the skill graph and the task catalog.
///
/// Holds only immutable catalog state, the injected random source and shared
/// counters, so a single engine can serve concurrent requests.
pub struct RecommendationEngine {
    graph: SkillGraph,
    tasks: Vec<Task>,
    selector: TaskSelector,
    exploration: ExplorationConfig,
    sequencing: SequencingConfig,
    rng: Arc<dyn RandomSource>,
    metrics: Metrics,
}

impl RecommendationEngine {
    /// Validate the catalog and build an engine. Fails only on catalog or config defects.
    pub fn new(catalog: Catalog, config: &PlannerConfig) -> Result<Self, PlannerError> {
        config.validate()?;
        catalog.validate_tasks()?;
        let graph = SkillGraph::new(catalog.skills, &config.selection)?;

        tracing::info!(
            skills = graph.nodes().len(),
            tasks = catalog.tasks.len(),
            exploration_policy = ?config.exploration.policy,
            sequencing = config.sequencing.enabled,
            "Recommendation engine ready"
        );

        Ok(RecommendationEngine {
            graph,
            tasks: catalog.tasks,
            selector: TaskSelector::new(&config.selection),
            exploration: config.exploration.clone(),
            sequencing: config.sequencing.clone(),
            rng: Arc::new(ThreadRandom),
            metrics: Metrics::new(),
        })
    }

    /// Engine over the bundled catalog and the process-wide config.
    pub fn builtin() -> Result<Self, PlannerError> {
        Self::new(Catalog::builtin(), crate::config::get_planner_config())
    }

    pub fn with_random_source(mut self, rng: Arc<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn graph(&self) -> &SkillGraph {
        &self.graph
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Catalog tasks whose skill is in `eligible`, in catalog order.
    pub fn candidate_tasks(&self, eligible: &[String]) -> Vec<Task> {
        let eligible: HashSet<&str> = eligible.iter().map(String::as_str).collect();
        self.tasks
            .iter()
            .filter(|task| eligible.contains(task.skill_id.as_str()))
            .cloned()
            .collect()
    }

    /// Build today's plan for `profile`.
    ///
    /// Pure apart from the exploration draw: with a pinned random source two
    /// calls on the same profile return the same tasks and total time.
    pub fn get_daily_recommendation(&self, profile: &UserProfile) -> Recommendation {
        self.get_recommendation_for_budget(profile, profile.budget_minutes())
    }

    /// Plan against an explicit minute budget instead of the learner's daily one.
    pub fn get_recommendation_for_budget(&self, profile: &UserProfile, budget: u32) -> Recommendation {
        let eligible = self.graph.eligible_skills(profile);
        let candidates = self.candidate_tasks(&eligible);
        let candidate_count = candidates.len();

        let exploration_day = is_exploration_day(self.rng.next_unit(), self.exploration.probability);
        let candidates = self.exploration.policy.apply(
            exploration_day,
            candidates,
            &self.tasks,
            &self.graph,
            profile,
            self.exploration.reach_floor,
        );

        let mut selected = self.selector.select(&candidates, budget, profile);

        if self.sequencing.enabled {
            selected = sequencing::videos_before_practice(selected, profile, self.sequencing.low_mastery);
        }

        let total_time: u32 = selected.iter().map(|t| t.time_estimate).sum();

        logging::log_recommendation(
            eligible.len(),
            candidate_count,
            selected.len(),
            total_time,
            budget,
            exploration_day,
        );
        self.metrics.record_recommendation(selected.len(), total_time, exploration_day);

        Recommendation {
            tasks: selected,
            total_time,
            reasoning: STATIC_REASONING.to_string(),
            exploration_day,
        }
    }

    /// Same plan as [`get_daily_recommendation`](Self::get_daily_recommendation),
    /// with the reasoning replaced by a coach-style explanation when the
    /// provider answers. Any provider failure keeps the static reasoning.
    pub async fn get_daily_recommendation_explained(
        &self,
        profile: &UserProfile,
        provider: &dyn InsightProvider,
    ) -> Recommendation {
        let mut recommendation = self.get_daily_recommendation(profile);
        if recommendation.tasks.is_empty() {
            return recommendation;
        }

        self.metrics.record_insight_call();
        match insight::non_empty(provider.explain_tasks(&recommendation.tasks, profile).await) {
            Ok(text) => recommendation.reasoning = text,
            Err(e) => {
                self.metrics.record_insight_fallback();
                logging::log_fallback(provider.name(), "task_explanation", &e.to_string());
            }
        }
        recommendation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::profile::DailyTimeBudget;
    use super::exploration::FixedDraw;

    fn profile() -> UserProfile {
        UserProfile::onboarding(
            NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            7.0,
            DailyTimeBudget::Standard,
        )
    }

    fn engine() -> RecommendationEngine {
        RecommendationEngine::new(Catalog::builtin(), &PlannerConfig::default())
            .unwrap()
            .with_random_source(Arc::new(FixedDraw(0.9)))
    }

    #[test]
    fn builtin_catalog_onboarding_plan() {
        // eligible g1, v1, l1 -> candidates t1, t3, t6, t7
        // efficiencies: t1 1.88, t7 1.3, t3 1.06, t6 0.88
        let rec = engine().get_daily_recommendation(&profile());
        let ids: Vec<_> = rec.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t7", "t3"]);
        assert_eq!(rec.total_time, 23);
        assert_eq!(rec.reasoning, STATIC_REASONING);
        assert!(!rec.exploration_day);
    }

    #[test]
    fn candidates_follow_catalog_order() {
        let engine = engine();
        let candidates = engine.candidate_tasks(&["l1".to_string(), "g1".to_string()]);
        let ids: Vec<_> = candidates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t6", "t7"]);
    }

    #[test]
    fn metrics_count_served_plans() {
        let engine = engine().with_random_source(Arc::new(FixedDraw(0.0)));
        engine.get_daily_recommendation(&profile());
        engine.get_daily_recommendation(&profile());
        let snap = engine.metrics().snapshot();
        assert_eq!(snap.recommendations_served, 2);
        assert_eq!(snap.exploration_days, 2);
        assert_eq!(snap.minutes_planned, 46);
    }
}
