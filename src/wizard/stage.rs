/// Wizard stage definitions
///
/// Defines every stage of the questionnaire in order.
use serde::{Deserialize, Serialize};

/// Wizard stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WizardStage {
    /// Startup preloader, left automatically after a fixed delay
    Initializing,

    /// Has the visitor already claimed?
    ClaimQuestion,

    /// ZIP code entry with region detection
    PostalCodeEntry,

    /// Age and income selection
    DetailsEntry,

    /// Reveal of the result amount
    Result,
}

impl WizardStage {
    pub const ALL: [WizardStage; 5] = [
        WizardStage::Initializing,
        WizardStage::ClaimQuestion,
        WizardStage::PostalCodeEntry,
        WizardStage::DetailsEntry,
        WizardStage::Result,
    ];

    /// Get stage title
    pub fn title(&self) -> &'static str {
        match self {
            WizardStage::Initializing => "Initializing",
            WizardStage::ClaimQuestion => "Claim Status",
            WizardStage::PostalCodeEntry => "Enter your ZIP Code",
            WizardStage::DetailsEntry => "Confirm your details",
            WizardStage::Result => "Your Result",
        }
    }

    /// Question number shown next to the title (question stages only)
    pub fn number(&self) -> Option<usize> {
        match self {
            WizardStage::ClaimQuestion => Some(1),
            WizardStage::PostalCodeEntry => Some(2),
            WizardStage::DetailsEntry => Some(3),
            WizardStage::Initializing | WizardStage::Result => None,
        }
    }

    /// Progress bar fill, derived only from the stage
    pub fn progress_percent(&self) -> u8 {
        match self {
            WizardStage::Initializing => 0,
            WizardStage::ClaimQuestion => 25,
            WizardStage::PostalCodeEntry => 50,
            WizardStage::DetailsEntry => 75,
            WizardStage::Result => 100,
        }
    }

    /// Stage a completed transition leads to
    pub fn next(&self) -> Option<WizardStage> {
        match self {
            WizardStage::Initializing => Some(WizardStage::ClaimQuestion),
            WizardStage::ClaimQuestion => Some(WizardStage::PostalCodeEntry),
            WizardStage::PostalCodeEntry => Some(WizardStage::DetailsEntry),
            WizardStage::DetailsEntry => Some(WizardStage::Result),
            WizardStage::Result => None,
        }
    }

    /// Check if this is the terminal stage
    pub fn is_terminal(&self) -> bool {
        matches!(self, WizardStage::Result)
    }
}

impl Default for WizardStage {
    fn default() -> Self {
        WizardStage::Initializing
    }
}

impl std::fmt::Display for WizardStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percent() {
        assert_eq!(WizardStage::Initializing.progress_percent(), 0);
        assert_eq!(WizardStage::ClaimQuestion.progress_percent(), 25);
        assert_eq!(WizardStage::PostalCodeEntry.progress_percent(), 50);
        assert_eq!(WizardStage::DetailsEntry.progress_percent(), 75);
        assert_eq!(WizardStage::Result.progress_percent(), 100);
    }

    #[test]
    fn test_stage_order() {
        let mut stage = WizardStage::default();
        let mut visited = vec![stage];
        while let Some(next) = stage.next() {
            visited.push(next);
            stage = next;
        }

        assert_eq!(visited, WizardStage::ALL.to_vec());
        assert!(stage.is_terminal());
    }

    #[test]
    fn test_stage_numbers() {
        assert_eq!(WizardStage::ClaimQuestion.number(), Some(1));
        assert_eq!(WizardStage::DetailsEntry.number(), Some(3));
        assert_eq!(WizardStage::Result.number(), None);
    }
}
