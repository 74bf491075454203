use std::fs;
use std::path::Path;
use anyhow::Context;
use chrono::Utc;
use studyplan_lib::config::{get_policy, load_policy};
use studyplan_lib::logging;
use studyplan_lib::schedule::{generate_with_strategy, GenerateParams, ScheduleBuilder};

const USAGE: &str = "usage: studyplan <params.json> [policy.toml]";

fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let mut args = std::env::args().skip(1);
    let params_path = args.next().context(USAGE)?;
    let policy = match args.next() {
        Some(path) => load_policy(Path::new(&path))?,
        None => get_policy().clone(),
    };

    let raw = fs::read_to_string(&params_path)
        .with_context(|| format!("Failed to read {}", params_path))?;
    let params = GenerateParams::from_json(&raw)?;

    let builder = ScheduleBuilder::new(policy);
    let plan = generate_with_strategy(&builder, &params, Utc::now())?;
    for warning in &plan.warnings {
        tracing::warn!(warning = %warning, "Plan warning");
    }

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
