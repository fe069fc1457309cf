//! Task type tags.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of the `task_type` column, in characters.
pub const MAX_TASK_TYPE_LEN: usize = 100;

/// Known kinds of work a task can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    /// A run of the external simulation engine.
    #[serde(rename = "Simulation")]
    RunSimulation,
}

impl TaskType {
    /// Tag stored in the `task_type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RunSimulation => "Simulation",
        }
    }
}

impl FromStr for TaskType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Simulation" => Ok(Self::RunSimulation),
            other => Err(CoreError::Validation(format!("Unknown task type '{other}'"))),
        }
    }
}

/// Validate a free-form task type tag supplied by a caller.
///
/// Tags are not restricted to [`TaskType`]; any non-blank string that fits
/// the column is accepted.
pub fn validate_task_type(tag: &str) -> Result<(), CoreError> {
    if tag.trim().is_empty() {
        return Err(CoreError::Validation("task_type must not be empty".into()));
    }
    if tag.chars().count() > MAX_TASK_TYPE_LEN {
        return Err(CoreError::Validation(format!(
            "task_type exceeds {MAX_TASK_TYPE_LEN} characters"
        )));
    }
    Ok(())
}
