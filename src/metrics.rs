use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use serde::{Deserialize, Serialize};

/// Planner counters for observability.
/// All metrics are atomic counters for thread-safety
#[derive(Clone, Default, Debug)]
pub struct PlannerMetrics {
    /// Plans built, standard or emergency
    pub plans_generated: Arc<AtomicU64>,
    /// Sessions that kept the current plan
    pub plans_reused: Arc<AtomicU64>,
    /// Sessions that triggered a rebuild
    pub regenerations: Arc<AtomicU64>,
    pub emergency_activations: Arc<AtomicU64>,
    pub sessions_sealed: Arc<AtomicU64>,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub plans_generated: u64,
    pub plans_reused: u64,
    pub regenerations: u64,
    pub emergency_activations: u64,
    pub sessions_sealed: u64,
}

impl PlannerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_plan_generated(&self) {
        self.plans_generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_plan_reused(&self) {
        self.plans_reused.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_regeneration(&self) {
        self.regenerations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_emergency(&self) {
        self.emergency_activations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_session_sealed(&self) {
        self.sessions_sealed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            plans_generated: self.plans_generated.load(Ordering::Relaxed),
            plans_reused: self.plans_reused.load(Ordering::Relaxed),
            regenerations: self.regenerations.load(Ordering::Relaxed),
            emergency_activations: self.emergency_activations.load(Ordering::Relaxed),
            sessions_sealed: self.sessions_sealed.load(Ordering::Relaxed),
        }
    }
}
