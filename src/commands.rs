//! Entry points a host application calls. Each takes the shared `AppState`
//! and an explicit timestamp. Mutating commands work on a copy of the
//! profile context and commit it only when every step succeeded.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::adaptive::{AdaptiveEngine, AdaptivePlan, RegenerationDecision};
use crate::error::{PlanError, Result};
use crate::metrics::PlannerMetrics;
use crate::performance::{
    PerformanceSession, PerformanceStore, SessionId, SessionType, TrendReport, UpdatePerformanceRequest,
    WeeklyReport,
};
use crate::profile::UserProfile;
use crate::state::{AppState, ProfileContext};

/// Result of folding a session: what was decided and the plan now in force.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationOutcome {
    pub session: PerformanceSession,
    pub decision: RegenerationDecision,
    pub plan: AdaptivePlan,
}

pub fn register_profile(state: &AppState, profile: UserProfile) {
    state.register_profile(profile);
}

/// Build a new plan now, whatever the state of the current one.
pub fn generate_plan<R: Rng + ?Sized>(
    state: &AppState,
    user_id: &str,
    focus_topics: &[String],
    at: DateTime<Utc>,
    rng: &mut R,
) -> Result<AdaptivePlan> {
    state.update_profile(user_id, |ctx| {
        let mut draft = ctx.clone();
        let plan = regenerate(&state.engine, &state.metrics, &mut draft, focus_topics, at, rng)?;
        *ctx = draft;
        Ok(plan)
    })
}

pub fn begin_session(
    state: &AppState,
    user_id: &str,
    topic_id: &str,
    session_type: SessionType,
    at: DateTime<Utc>,
) -> Result<SessionId> {
    state.update_profile(user_id, |ctx| Ok(ctx.store.begin(topic_id, session_type, at)))
}

pub fn record_answers(state: &AppState, user_id: &str, session: SessionId, answered: u32, correct: u32) -> Result<()> {
    state.update_profile(user_id, |ctx| ctx.store.record(session, answered, correct))
}

/// Seal a session, then keep or rebuild the plan.
pub fn end_session_and_adapt<R: Rng + ?Sized>(
    state: &AppState,
    user_id: &str,
    session: SessionId,
    at: DateTime<Utc>,
    rng: &mut R,
) -> Result<AdaptationOutcome> {
    state.update_profile(user_id, |ctx| {
        let mut draft = ctx.clone();
        let sealed = draft.store.end(session, at)?;
        let outcome = adapt(state, &mut draft, sealed, at, rng)?;
        *ctx = draft;
        Ok(outcome)
    })
}

/// Fold a session reported in one piece, then keep or rebuild the plan.
pub fn update_performance_and_adapt<R: Rng + ?Sized>(
    state: &AppState,
    request: &UpdatePerformanceRequest,
    at: DateTime<Utc>,
    rng: &mut R,
) -> Result<AdaptationOutcome> {
    state.update_profile(&request.user_id, |ctx| {
        let mut draft = ctx.clone();
        let sealed = draft.store.record_completed(request, at)?;
        let outcome = adapt(state, &mut draft, sealed, at, rng)?;
        *ctx = draft;
        Ok(outcome)
    })
}

pub fn weekly_report(state: &AppState, user_id: &str, as_of: NaiveDate) -> Result<WeeklyReport> {
    state.read_profile(user_id, |ctx| ctx.store.weekly_report(as_of))
}

pub fn performance_trend(state: &AppState, user_id: &str, as_of: NaiveDate) -> Result<TrendReport> {
    state.read_profile(user_id, |ctx| ctx.store.trend(as_of))
}

pub fn export_performance(state: &AppState, user_id: &str) -> Result<String> {
    state.read_profile(user_id, |ctx| ctx.store.to_json())?
}

/// Replace a profile's history with a snapshot. The current plan is kept.
pub fn import_performance(state: &AppState, user_id: &str, snapshot: &str) -> Result<()> {
    let store = PerformanceStore::from_json(snapshot, state.policy().performance.clone())?;
    state.update_profile(user_id, |ctx| {
        ctx.store = store;
        Ok(())
    })
}

/// Mark a block of the current plan done and return the week's completion ratio.
pub fn mark_block_done(state: &AppState, user_id: &str, block_id: &str) -> Result<f64> {
    state.update_profile(user_id, |ctx| {
        let plan = ctx
            .plan
            .as_mut()
            .ok_or_else(|| PlanError::not_found(format!("'{}' has no plan", user_id), "mark_block_done"))?;
        plan.plan.mark_block_done(block_id)?;
        Ok(plan.plan.completion_ratio())
    })
}

fn adapt<R: Rng + ?Sized>(
    state: &AppState,
    ctx: &mut ProfileContext,
    session: PerformanceSession,
    at: DateTime<Utc>,
    rng: &mut R,
) -> Result<AdaptationOutcome> {
    let decision = state.engine.should_regenerate(
        session.questions_answered,
        session.correct_answers,
        ctx.plan.as_ref(),
        at,
    );
    tracing::info!(user = %ctx.profile.id, session = %session.id, decision = ?decision, "Adaptation decision");

    let plan = match (decision, ctx.plan.clone()) {
        (RegenerationDecision::Reuse, Some(current)) => {
            state.metrics.record_plan_reused();
            current
        }
        _ => {
            let plan = regenerate(&state.engine, &state.metrics, ctx, &[], at, rng)?;
            state.metrics.record_regeneration();
            plan
        }
    };
    state.metrics.record_session_sealed();
    Ok(AdaptationOutcome { session, decision, plan })
}

fn regenerate<R: Rng + ?Sized>(
    engine: &AdaptiveEngine,
    metrics: &PlannerMetrics,
    ctx: &mut ProfileContext,
    focus_topics: &[String],
    at: DateTime<Utc>,
    rng: &mut R,
) -> Result<AdaptivePlan> {
    let emergency = engine.emergency_warranted(&ctx.store, at.date_naive());
    let next = if emergency {
        engine.generate_emergency(&mut ctx.profile, &ctx.store, ctx.plan.as_ref(), at)?
    } else {
        engine.generate(&mut ctx.profile, &ctx.store, ctx.plan.as_ref(), focus_topics, at, rng)?
    };
    if emergency {
        metrics.record_emergency();
    }
    metrics.record_plan_generated();
    ctx.plan = Some(next.clone());
    Ok(next)
}
