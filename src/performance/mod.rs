//! Practice history: sessions, per-topic and per-day aggregates, streaks
//! and trends.

pub mod model;
pub mod report;
pub mod session;
pub mod store;

pub use model::{DailyAggregate, OverallPerformance, TopicPerformance};
pub use report::{DailyBreakdown, Trend, TrendReport, WeeklyReport};
pub use session::{PerformanceSession, SessionId, SessionType, UpdatePerformanceRequest};
pub use store::PerformanceStore;
