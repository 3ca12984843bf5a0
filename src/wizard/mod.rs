/// Questionnaire wizard module
///
/// ## Architecture
///
/// ```text
/// WizardController
///   ├── WizardStage (current stage, progress)
///   ├── FormAnswers (what the visitor entered)
///   └── WizardSnapshot (what the view layer renders)
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// use questionnaire_wizard::{EventBus, SystemClock, WizardConfig, WizardController};
///
/// let bus = EventBus::new();
/// let (events, _id) = bus.subscribe();
/// let mut wizard = WizardController::new(WizardConfig::default(), Arc::new(SystemClock), bus);
///
/// // Host loop: wake at the next deadline, forward actions, poll
/// wizard.poll();
/// wizard.submit_claim_answer(ClaimResponse::Yes)?;
/// ```
///
/// ## Stages
///
/// 1. **Initializing** - Preloader, left after the startup delay
/// 2. **ClaimQuestion** - Yes / No / Not Sure
/// 3. **PostalCodeEntry** - ZIP code with region detection
/// 4. **DetailsEntry** - Age and income ranges
/// 5. **Result** - Animated amount reveal

pub mod answers;
pub mod controller;
pub mod snapshot;
pub mod stage;

// Re-export commonly used types
pub use answers::{AgeRange, ClaimResponse, FormAnswers, IncomeRange, UnknownOption};
pub use controller::{TransitionRequest, WizardController, INITIALIZING_MESSAGE};
pub use snapshot::WizardSnapshot;
pub use stage::WizardStage;
