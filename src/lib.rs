pub mod adaptive;
pub mod commands;
pub mod config;
pub mod curriculum;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod performance;
pub mod profile;
pub mod resources;
pub mod schedule;
pub mod state;

pub use adaptive::{AdaptiveEngine, AdaptivePlan, PlanMode, RegenerationDecision, RegenerationReason};
pub use config::PlannerPolicy;
pub use error::{ErrorKind, PlanError, Result};
pub use performance::{PerformanceStore, SessionId, SessionType, UpdatePerformanceRequest};
pub use profile::{Difficulty, Field, Level, UserProfile};
pub use schedule::{GenerateParams, ScheduleBuilder, WeekPlanResult};
pub use state::AppState;
