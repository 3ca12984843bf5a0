use thiserror::Error;

use crate::wizard::WizardStage;

/// Wizard-level errors using thiserror for structured error handling.
///
/// Every action error is a rejected user action: the controller state is left
/// exactly as it was and the visitor can correct and retry.

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Action requires the {expected} stage, current stage is {actual}")]
    WrongStage {
        expected: WizardStage,
        actual: WizardStage,
    },

    #[error("A transition is already in progress")]
    TransitionPending,

    #[error("Invalid postal code: {code:?}")]
    InvalidPostalCode { code: String },

    #[error("Age range and income range are both required")]
    IncompleteDetails,

    #[error("Wizard session has been closed")]
    SessionClosed,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to parse configuration")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;
