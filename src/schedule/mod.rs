//! Weekly schedule construction: slot allocation, block synthesis and
//! structural validation.

pub mod builder;
pub mod slots;
pub mod types;
pub mod validator;

pub use builder::{generate_with_strategy, PlanStrategy, ScheduleBuilder};
pub use slots::{allocate_slots, SlotAllocation};
pub use types::{DayPlan, GenerateParams, PlanMeta, StudyBlock, TimeSlot, WeekPlanResult};
pub use validator::{validate_plan, ValidationReport};
