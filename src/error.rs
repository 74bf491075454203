use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Broad category of a planner failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or structurally impossible request. Raised before any plan is built.
    Validation,
    /// Unknown session, profile or block.
    NotFound,
    /// Unusable policy configuration.
    Config,
    Serialization,
    Io,
}

/// Unified error type for the planner.
/// All fallible operations return `Result<T, PlanError>`.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("[{stage}] {message}{}", render_context(.context))]
pub struct PlanError {
    pub kind: ErrorKind,
    pub message: String,
    pub stage: String,
    pub context: Option<String>,
}

pub type Result<T> = std::result::Result<T, PlanError>;

impl PlanError {
    /// Create a new error with kind, stage and message
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S, stage: &'static str) -> Self {
        PlanError {
            kind,
            message: message.into(),
            stage: stage.to_string(),
            context: None,
        }
    }

    pub fn validation<S: Into<String>>(message: S, stage: &'static str) -> Self {
        Self::new(ErrorKind::Validation, message, stage)
    }

    pub fn not_found<S: Into<String>>(message: S, stage: &'static str) -> Self {
        Self::new(ErrorKind::NotFound, message, stage)
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::Config, message, "config")
    }

    /// Add additional context information
    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

fn render_context(context: &Option<String>) -> String {
    match context {
        Some(context) => format!(" (context: {})", context),
        None => String::new(),
    }
}

impl From<std::io::Error> for PlanError {
    fn from(err: std::io::Error) -> Self {
        PlanError::new(ErrorKind::Io, format!("I/O error: {}", err), "io")
    }
}

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        PlanError::new(ErrorKind::Serialization, format!("JSON error: {}", err), "json")
    }
}

impl From<toml::de::Error> for PlanError {
    fn from(err: toml::de::Error) -> Self {
        PlanError::new(ErrorKind::Config, format!("TOML error: {}", err), "config")
    }
}
