/// Event types published by the wizard
///
/// Events represent things that have happened (past tense).
/// They are broadcast to all subscribers.
use std::time::Duration;

use crate::error::ActionError;
use crate::wizard::{WizardSnapshot, WizardStage};

/// Wizard events
#[derive(Debug, Clone)]
pub enum Event {
    /// State changed; the view layer re-renders from this
    SnapshotChanged(Box<WizardSnapshot>),

    /// A scheduled transition fired
    StageChanged { from: WizardStage, to: WizardStage },

    /// A delayed transition was armed
    TransitionScheduled {
        target: WizardStage,
        message: String,
        delay: Duration,
    },

    /// Submitted input was rejected
    ValidationFailed { message: String },

    /// A dispatched command was refused; state is unchanged
    ActionRejected { error: ActionError },

    /// One reveal tick
    AmountTick { value: u64 },

    /// Final reveal tick emitted
    RevealCompleted { amount: u64 },

    /// Controller torn down
    SessionClosed,
}

impl Event {
    /// Get a short description of the event
    pub fn description(&self) -> String {
        match self {
            Event::SnapshotChanged(snapshot) => format!("Snapshot ({})", snapshot.stage),
            Event::StageChanged { from, to } => format!("Stage {} -> {}", from, to),
            Event::TransitionScheduled { target, delay, .. } => {
                format!("Transition to {} in {:?}", target, delay)
            }
            Event::ValidationFailed { message } => format!("Validation failed: {}", message),
            Event::ActionRejected { error } => format!("Action rejected: {}", error),
            Event::AmountTick { value } => format!("Amount {}", value),
            Event::RevealCompleted { amount } => format!("Reveal completed at {}", amount),
            Event::SessionClosed => "Session closed".to_string(),
        }
    }
}
