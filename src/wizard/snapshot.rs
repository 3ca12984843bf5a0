/// Read-only projection of controller state for the view layer
use serde::Serialize;

use super::answers::FormAnswers;
use super::stage::WizardStage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardSnapshot {
    pub stage: WizardStage,

    /// A delayed transition is pending; render a loading indicator
    pub is_transitioning: bool,

    /// Message for the loading indicator while transitioning
    pub transition_message: Option<String>,

    pub answers: FormAnswers,

    pub detected_region: Option<&'static str>,

    /// Inline validation message on the postal code field
    pub postal_error: Option<String>,

    pub progress_percent: u8,

    /// Current value of the reveal counter
    pub animated_amount: u64,

    pub can_submit_postal_code: bool,

    pub can_submit_details: bool,
}

impl WizardSnapshot {
    /// Show the region confirmation under the postal code field
    pub fn shows_region_hint(&self) -> bool {
        self.detected_region.is_some() && self.postal_error.is_none()
    }
}
