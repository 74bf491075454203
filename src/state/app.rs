use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use crate::adaptive::{AdaptiveEngine, AdaptivePlan};
use crate::config::PlannerPolicy;
use crate::error::{PlanError, Result};
use crate::metrics::PlannerMetrics;
use crate::performance::PerformanceStore;
use crate::profile::UserProfile;

/// Everything the planner knows about one student.
#[derive(Debug, Clone)]
pub struct ProfileContext {
    pub profile: UserProfile,
    pub store: PerformanceStore,
    /// Current plan, replaced on every regeneration
    pub plan: Option<AdaptivePlan>,
}

/// Application-wide state container.
/// All mutable state is centralized here and passed explicitly to functions.
/// One writer per profile is assumed; the lock only guards the registry.
#[derive(Clone)]
pub struct AppState {
    /// Profiles keyed by user id
    pub profiles: Arc<RwLock<HashMap<String, ProfileContext>>>,
    pub engine: Arc<AdaptiveEngine>,
    pub metrics: PlannerMetrics,
}

impl AppState {
    pub fn new(policy: PlannerPolicy) -> Self {
        AppState {
            profiles: Arc::new(RwLock::new(HashMap::new())),
            engine: Arc::new(AdaptiveEngine::new(policy)),
            metrics: PlannerMetrics::new(),
        }
    }

    pub fn policy(&self) -> &PlannerPolicy {
        self.engine.policy()
    }

    /// Register a profile with an empty history. Replaces any existing entry.
    pub fn register_profile(&self, profile: UserProfile) {
        let store = PerformanceStore::new(self.policy().performance.clone());
        let id = profile.id.clone();
        self.profiles.write().insert(id.clone(), ProfileContext { profile, store, plan: None });
        tracing::info!(user = %id, "Profile registered");
    }

    pub fn has_profile(&self, user_id: &str) -> bool {
        self.profiles.read().contains_key(user_id)
    }

    pub fn profile(&self, user_id: &str) -> Result<UserProfile> {
        self.read_profile(user_id, |ctx| ctx.profile.clone())
    }

    pub fn current_plan(&self, user_id: &str) -> Result<Option<AdaptivePlan>> {
        self.read_profile(user_id, |ctx| ctx.plan.clone())
    }

    /// Read a profile's context under the shared lock
    pub fn read_profile<F, T>(&self, user_id: &str, f: F) -> Result<T>
    where
        F: FnOnce(&ProfileContext) -> T,
    {
        let guard = self.profiles.read();
        let ctx = guard.get(user_id).ok_or_else(|| unknown_profile(user_id))?;
        Ok(f(ctx))
    }

    /// Update a profile's context with a closure under the exclusive lock
    pub fn update_profile<F, T>(&self, user_id: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut ProfileContext) -> Result<T>,
    {
        let mut guard = self.profiles.write();
        let ctx = guard.get_mut(user_id).ok_or_else(|| unknown_profile(user_id))?;
        f(ctx)
    }
}

fn unknown_profile(user_id: &str) -> PlanError {
    PlanError::not_found(format!("no profile '{}'", user_id), "state")
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(PlannerPolicy::default())
    }
}
