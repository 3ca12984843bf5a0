/// Questionnaire wizard core
///
/// A multi-step questionnaire driven by an explicit state machine. The view
/// layer dispatches actions and renders the snapshots published after every
/// state change.
///
/// ## Architecture
///
/// ```text
/// WizardController
///   ├── FormAnswers (claim, postal code, region, age, income)
///   ├── TransitionScheduler (one pending delayed transition)
///   ├── AmountAnimator (reveal ticks on the Result stage)
///   └── EventBus (snapshots out to the view layer)
/// ```

pub mod animator;
pub mod clock;
pub mod config;
pub mod error;
pub mod messaging;
pub mod postal;
pub mod region;
pub mod scheduler;
pub mod wizard;

pub use animator::{reveal_sequence, AmountAnimator};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::WizardConfig;
pub use error::{ActionError, ConfigError};
pub use messaging::{Command, Event, EventBus, SessionExecutor, SessionHandle};
pub use scheduler::TransitionScheduler;
pub use wizard::{WizardController, WizardSnapshot, WizardStage};
