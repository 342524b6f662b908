pub mod completion;

use std::collections::HashMap;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub use completion::record_completion;

/// Minutes per day the learner committed to during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum DailyTimeBudget {
    Short,
    Standard,
    Extended,
}

impl DailyTimeBudget {
    pub fn minutes(self) -> u32 {
        match self {
            DailyTimeBudget::Short => 15,
            DailyTimeBudget::Standard => 25,
            DailyTimeBudget::Extended => 40,
        }
    }
}

impl Default for DailyTimeBudget {
    fn default() -> Self {
        DailyTimeBudget::Standard
    }
}

impl TryFrom<u32> for DailyTimeBudget {
    type Error = String;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        match minutes {
            15 => Ok(DailyTimeBudget::Short),
            25 => Ok(DailyTimeBudget::Standard),
            40 => Ok(DailyTimeBudget::Extended),
            other => Err(format!("daily time budget must be 15, 25 or 40 minutes, got {}", other)),
        }
    }
}

impl From<DailyTimeBudget> for u32 {
    fn from(budget: DailyTimeBudget) -> Self {
        budget.minutes()
    }
}

/// One entry of the learner's append-only engagement log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub date: DateTime<Utc>,
    pub task_ids: Vec<String>,
    pub completed_ids: Vec<String>,
    /// Actual minutes spent.
    pub duration: u32,
    /// task id -> score in [0, 1]
    #[serde(default, deserialize_with = "clamped_scores")]
    pub performance: HashMap<String, f64>,
}

/// Learner state owned and persisted by the consuming application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub exam_date: NaiveDate,
    pub target_band: f64,
    #[serde(default)]
    pub daily_time_budget: DailyTimeBudget,
    #[serde(default, deserialize_with = "clamped_scores")]
    pub skill_mastery: HashMap<String, f64>,
    #[serde(default)]
    pub engagement_history: Vec<SessionRecord>,
    pub current_band: f64,
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

// Scores are clamped however the profile is deserialized.
fn clamped_scores<'de, D>(deserializer: D) -> Result<HashMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, f64>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(id, score)| (id, clamp_unit(score))).collect())
}

impl UserProfile {
    /// Profile produced at the end of onboarding, with the starting mastery estimates.
    pub fn onboarding(exam_date: NaiveDate, target_band: f64, budget: DailyTimeBudget) -> Self {
        let mut skill_mastery = HashMap::new();
        skill_mastery.insert("g1".to_string(), 0.3);
        skill_mastery.insert("v1".to_string(), 0.2);
        skill_mastery.insert("r1".to_string(), 0.1);
        skill_mastery.insert("l1".to_string(), 0.1);
        UserProfile {
            exam_date,
            target_band,
            daily_time_budget: budget,
            skill_mastery,
            engagement_history: Vec::new(),
            current_band: 5.5,
        }
    }

    /// Mastery of a skill in [0, 1]; absent skills count as 0.
    pub fn mastery(&self, skill_id: &str) -> f64 {
        self.skill_mastery
            .get(skill_id)
            .copied()
            .map(clamp_unit)
            .unwrap_or(0.0)
    }

    pub fn set_mastery(&mut self, skill_id: &str, value: f64) {
        self.skill_mastery.insert(skill_id.to_string(), clamp_unit(value));
    }

    /// Clamp every mastery and performance value into [0, 1].
    pub fn normalized(mut self) -> Self {
        for value in self.skill_mastery.values_mut() {
            *value = clamp_unit(*value);
        }
        for record in &mut self.engagement_history {
            for score in record.performance.values_mut() {
                *score = clamp_unit(*score);
            }
        }
        self
    }

    pub fn budget_minutes(&self) -> u32 {
        self.daily_time_budget.minutes()
    }

    /// Mean mastery across the recorded skills, 0 when none are recorded.
    pub fn average_mastery(&self) -> f64 {
        if self.skill_mastery.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.skill_mastery.values().copied().map(clamp_unit).sum();
        sum / self.skill_mastery.len() as f64
    }

    /// Negative once the exam date has passed.
    pub fn days_until_exam(&self, today: NaiveDate) -> i64 {
        (self.exam_date - today).num_days()
    }

    pub fn from_json(content: &str) -> Result<Self, crate::error::PlannerError> {
        let profile: UserProfile = serde_json::from_str(content)?;
        Ok(profile.normalized())
    }
}
