use std::fmt;

use crate::locator::Descriptor;

/// Custom error type that includes exit codes
#[derive(Debug)]
pub enum DrillError {
    /// No descriptor in a locator set matched within budget (exit code 2)
    NotFound {
        target: String,
        attempted: Vec<Descriptor>,
    },
    /// Element resolved but never became actionable (exit code 3)
    StillBlocked { target: String, attempts: u32 },
    /// A primitive action raised after a successful resolution (exit code 4)
    ActionFailed {
        target: String,
        action: String,
        source: anyhow::Error,
    },
    /// The bot accepted input it should have rejected (exit code 5)
    ValidationBreach { input: String },
    /// WebDriver or connection-level failure (exit code 6)
    Engine(String),
    /// Generic error (exit code 1)
    Other(anyhow::Error),
}

impl DrillError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            DrillError::NotFound { .. } => 2,
            DrillError::StillBlocked { .. } => 3,
            DrillError::ActionFailed { .. } => 4,
            DrillError::ValidationBreach { .. } => 5,
            DrillError::Engine(_) => 6,
            DrillError::Other(_) => 1,
        }
    }

    /// Whether the caller may degrade gracefully instead of aborting
    ///
    /// Resolution failures are recoverable; action failures and validation
    /// breaches always abort the current step.
    pub fn recoverable(&self) -> bool {
        matches!(
            self,
            DrillError::NotFound { .. } | DrillError::StillBlocked { .. }
        )
    }

    pub fn engine(err: anyhow::Error) -> Self {
        DrillError::Engine(format!("{err:#}"))
    }
}

impl fmt::Display for DrillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrillError::NotFound { target, attempted } => {
                write!(f, "Could not find {} (tried ", target)?;
                for (i, descriptor) in attempted.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", descriptor)?;
                }
                write!(f, ")")
            }
            DrillError::StillBlocked { target, attempts } => {
                write!(
                    f,
                    "{} never became actionable after {} polls",
                    target, attempts
                )
            }
            DrillError::ActionFailed {
                target,
                action,
                source,
            } => {
                write!(f, "Failed to {} on {}: {:#}", action, target, source)
            }
            DrillError::ValidationBreach { input } => {
                write!(
                    f,
                    "Bot accepted invalid input {:?} when it should have rejected it",
                    input
                )
            }
            DrillError::Engine(msg) => write!(f, "Browser engine failed: {}", msg),
            DrillError::Other(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DrillError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DrillError::ActionFailed { source, .. } => Some(source.as_ref()),
            DrillError::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for DrillError {
    fn from(err: anyhow::Error) -> Self {
        DrillError::Other(err)
    }
}

#[cfg(test)]
#[path = "errors_test.rs"]
mod errors_test;
