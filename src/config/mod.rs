pub mod policy;

pub use policy::{get_policy, load_policy, load_policy_or_default, PlannerPolicy};
