use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use serde::Serialize;

/// Counters for the recommendation and insight paths.
/// Clones share the same counters.
#[derive(Clone, Default)]
pub struct Metrics {
    pub recommendations_served: Arc<AtomicU64>,
    pub exploration_days: Arc<AtomicU64>,
    pub tasks_selected: Arc<AtomicU64>,
    pub minutes_planned: Arc<AtomicU64>,
    pub insight_calls: Arc<AtomicU64>,
    pub insight_fallbacks: Arc<AtomicU64>,
    pub cache_hit_count: Arc<AtomicU64>,
    pub cache_miss_count: Arc<AtomicU64>,
}

/// Point-in-time copy of [`Metrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub recommendations_served: u64,
    pub exploration_days: u64,
    pub tasks_selected: u64,
    pub minutes_planned: u64,
    pub insight_calls: u64,
    pub insight_fallbacks: u64,
    pub cache_hit_count: u64,
    pub cache_miss_count: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_recommendation(&self, tasks: usize, minutes: u32, exploration_day: bool) {
        self.recommendations_served.fetch_add(1, Ordering::Relaxed);
        self.tasks_selected.fetch_add(tasks as u64, Ordering::Relaxed);
        self.minutes_planned.fetch_add(minutes as u64, Ordering::Relaxed);
        if exploration_day {
            self.exploration_days.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_insight_call(&self) {
        self.insight_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_insight_fallback(&self) {
        self.insight_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hit_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_miss_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            recommendations_served: self.recommendations_served.load(Ordering::Relaxed),
            exploration_days: self.exploration_days.load(Ordering::Relaxed),
            tasks_selected: self.tasks_selected.load(Ordering::Relaxed),
            minutes_planned: self.minutes_planned.load(Ordering::Relaxed),
            insight_calls: self.insight_calls.load(Ordering::Relaxed),
            insight_fallbacks: self.insight_fallbacks.load(Ordering::Relaxed),
            cache_hit_count: self.cache_hit_count.load(Ordering::Relaxed),
            cache_miss_count: self.cache_miss_count.load(Ordering::Relaxed),
        }
    }
}
