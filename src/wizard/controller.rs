/// Wizard state machine
///
/// Owns the stage, the answers and the pending transition. Every stage change
/// goes through the [`TransitionScheduler`]; user actions only store answers
/// and arm the next transition. Time comes from the injected [`Clock`] and
/// advances only when the host calls [`WizardController::poll`].
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::answers::{AgeRange, ClaimResponse, FormAnswers, IncomeRange};
use super::snapshot::WizardSnapshot;
use super::stage::WizardStage;
use crate::animator::AmountAnimator;
use crate::clock::Clock;
use crate::config::WizardConfig;
use crate::error::ActionError;
use crate::messaging::{Command, Event, EventBus};
use crate::postal;
use crate::scheduler::{ScheduleToken, TransitionScheduler};

pub const INITIALIZING_MESSAGE: &str = "Initializing secure session...";
const VERIFYING_MESSAGE: &str = "Verifying eligibility...";
const PROCESSING_MESSAGE: &str = "Processing your information...";

fn checking_region_message(region: &str) -> String {
    format!("Checking {} database...", region)
}

/// A stage change waiting for its delay to elapse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    pub target: WizardStage,
    pub message: String,
    pub delay: Duration,
}

pub struct WizardController {
    config: WizardConfig,
    clock: Arc<dyn Clock>,
    bus: EventBus,

    stage: WizardStage,
    answers: FormAnswers,
    postal_error: Option<String>,

    scheduler: TransitionScheduler<TransitionRequest>,
    transition_token: Option<ScheduleToken>,
    animator: AmountAnimator,
    animated_amount: u64,

    /// Set once the reveal has been started; it never restarts
    reveal_started: bool,
    closed: bool,
}

impl WizardController {
    /// Create a controller in the Initializing stage with the startup
    /// transition already armed
    pub fn new(config: WizardConfig, clock: Arc<dyn Clock>, bus: EventBus) -> Self {
        let mut controller = Self {
            config,
            clock,
            bus,
            stage: WizardStage::Initializing,
            answers: FormAnswers::new(),
            postal_error: None,
            scheduler: TransitionScheduler::new(),
            transition_token: None,
            animator: AmountAnimator::new(),
            animated_amount: 0,
            reveal_started: false,
            closed: false,
        };

        let delay = controller.config.startup_delay();
        controller.request_next_stage(INITIALIZING_MESSAGE, delay);
        controller.publish_snapshot();
        controller
    }

    pub fn stage(&self) -> WizardStage {
        self.stage
    }

    pub fn answers(&self) -> &FormAnswers {
        &self.answers
    }

    /// User-triggered transition in flight. The startup delay does not count;
    /// the Initializing stage renders its own preloader.
    pub fn is_transitioning(&self) -> bool {
        self.stage != WizardStage::Initializing && self.scheduler.is_pending()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        let transition_message = if self.is_transitioning() {
            self.scheduler.pending().map(|request| request.message.clone())
        } else {
            None
        };

        WizardSnapshot {
            stage: self.stage,
            is_transitioning: self.is_transitioning(),
            transition_message,
            answers: self.answers.clone(),
            detected_region: self.answers.detected_region(),
            postal_error: self.postal_error.clone(),
            progress_percent: self.stage.progress_percent(),
            animated_amount: self.animated_amount,
            can_submit_postal_code: self.stage == WizardStage::PostalCodeEntry
                && !self.scheduler.is_pending()
                && postal::is_complete(self.answers.postal_code()),
            can_submit_details: self.stage == WizardStage::DetailsEntry
                && !self.scheduler.is_pending()
                && self.answers.has_details(),
        }
    }

    /// Route a command from the view layer. A rejection is also published
    /// as [`Event::ActionRejected`] so a host that only listens can report it.
    pub fn dispatch(&mut self, command: Command) -> Result<(), ActionError> {
        tracing::debug!("Dispatching command: {}", command.description());

        let result = match command {
            Command::SubmitClaimAnswer(answer) => self.submit_claim_answer(answer),
            Command::UpdatePostalCode(raw) => self.update_postal_code(&raw),
            Command::SubmitPostalCode => self.submit_postal_code(),
            Command::UpdateAgeRange(range) => self.update_age_range(range),
            Command::UpdateIncomeRange(range) => self.update_income_range(range),
            Command::SubmitDetails => self.submit_details(),
            Command::Shutdown => {
                self.teardown();
                Ok(())
            }
        };

        if let Err(error) = &result {
            self.bus.publish(Event::ActionRejected {
                error: error.clone(),
            });
        }
        result
    }

    pub fn submit_claim_answer(&mut self, answer: ClaimResponse) -> Result<(), ActionError> {
        self.ensure_accepting(WizardStage::ClaimQuestion)?;

        self.answers.claim_response = Some(answer);
        let delay = self.config.step_delay();
        self.request_next_stage(VERIFYING_MESSAGE, delay);
        self.publish_snapshot();
        Ok(())
    }

    /// Store a keystroke-level edit. The stored code is always sanitized and
    /// the region hint follows it.
    pub fn update_postal_code(&mut self, raw: &str) -> Result<(), ActionError> {
        self.ensure_accepting(WizardStage::PostalCodeEntry)?;

        self.answers.set_postal_code(raw);
        self.postal_error = None;
        self.publish_snapshot();
        Ok(())
    }

    pub fn submit_postal_code(&mut self) -> Result<(), ActionError> {
        self.ensure_accepting(WizardStage::PostalCodeEntry)?;

        let code = self.answers.postal_code().to_string();
        let region = if postal::is_valid(&code) {
            self.answers.detected_region()
        } else {
            None
        };
        let region = match region {
            Some(region) => region,
            None => {
                tracing::debug!("Rejected postal code {:?}", code);
                self.postal_error = Some(postal::INVALID_POSTAL_CODE_MESSAGE.to_string());
                self.bus.publish(Event::ValidationFailed {
                    message: postal::INVALID_POSTAL_CODE_MESSAGE.to_string(),
                });
                self.publish_snapshot();
                return Err(ActionError::InvalidPostalCode { code });
            }
        };

        self.postal_error = None;
        let delay = self.config.step_delay();
        self.request_next_stage(&checking_region_message(region), delay);
        self.publish_snapshot();
        Ok(())
    }

    pub fn update_age_range(&mut self, range: AgeRange) -> Result<(), ActionError> {
        self.ensure_accepting(WizardStage::DetailsEntry)?;

        self.answers.age_range = Some(range);
        self.publish_snapshot();
        Ok(())
    }

    pub fn update_income_range(&mut self, range: IncomeRange) -> Result<(), ActionError> {
        self.ensure_accepting(WizardStage::DetailsEntry)?;

        self.answers.income_range = Some(range);
        self.publish_snapshot();
        Ok(())
    }

    pub fn submit_details(&mut self) -> Result<(), ActionError> {
        self.ensure_accepting(WizardStage::DetailsEntry)?;

        if !self.answers.has_details() {
            return Err(ActionError::IncompleteDetails);
        }

        let delay = self.config.processing_delay();
        self.request_next_stage(PROCESSING_MESSAGE, delay);
        self.publish_snapshot();
        Ok(())
    }

    /// Fire the pending transition and reveal ticks that are due.
    /// Returns whether anything changed.
    pub fn poll(&mut self) -> bool {
        if self.closed {
            return false;
        }

        let now = self.clock.now();
        let mut changed = false;

        if let Some(request) = self.scheduler.poll(now) {
            self.transition_token = None;
            self.complete_transition(request, now);
            changed = true;
        }

        let was_running = self.animator.is_running();
        let mut ticks = Vec::new();
        self.animator.poll(now, |value| ticks.push(value));
        for value in ticks {
            self.animated_amount = value;
            self.bus.publish(Event::AmountTick { value });
            changed = true;
        }
        if changed {
            self.publish_snapshot();
        }

        if was_running && !self.animator.is_running() {
            tracing::info!("Reveal completed at {}", self.animated_amount);
            self.bus.publish(Event::RevealCompleted {
                amount: self.animated_amount,
            });
        }
        changed
    }

    /// Earliest instant at which `poll` has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.closed {
            return None;
        }

        match (self.scheduler.deadline(), self.animator.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// How long a host may sleep before calling `poll` again
    pub fn time_until_next_deadline(&self) -> Option<Duration> {
        if self.closed {
            return None;
        }

        let now = self.clock.now();
        let transition = self.scheduler.time_until_due(now);
        let tick = self
            .animator
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now));
        match (transition, tick) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Cancel the pending transition and the reveal. Afterwards every action
    /// is rejected and `poll` does nothing.
    pub fn teardown(&mut self) {
        if self.closed {
            return;
        }

        if let Some(token) = self.transition_token.take() {
            if let Some(target) = self.scheduler.pending().map(|request| request.target) {
                if self.scheduler.cancel(token) {
                    tracing::debug!("Canceled pending transition to {}", target);
                }
            }
        }
        if self.animator.cancel() {
            tracing::debug!("Canceled reveal at {}", self.animated_amount);
        }

        self.closed = true;
        tracing::info!("Wizard session closed in stage {}", self.stage);
        self.bus.publish(Event::SessionClosed);
    }

    fn ensure_accepting(&self, expected: WizardStage) -> Result<(), ActionError> {
        if self.closed {
            return Err(ActionError::SessionClosed);
        }
        if self.stage != expected {
            return Err(ActionError::WrongStage {
                expected,
                actual: self.stage,
            });
        }
        if self.scheduler.is_pending() {
            return Err(ActionError::TransitionPending);
        }
        Ok(())
    }

    /// Arm the transition to the stage after the current one
    fn request_next_stage(&mut self, message: &str, delay: Duration) {
        let Some(target) = self.stage.next() else {
            tracing::warn!("No stage after {}, transition ignored", self.stage);
            return;
        };
        let request = TransitionRequest {
            target,
            message: message.to_string(),
            delay,
        };

        tracing::debug!("Scheduling transition to {} in {:?}", target, delay);
        self.bus.publish(Event::TransitionScheduled {
            target,
            message: request.message.clone(),
            delay,
        });
        let token = self.scheduler.schedule(self.clock.now(), request.delay, request);
        self.transition_token = Some(token);
    }

    fn complete_transition(&mut self, request: TransitionRequest, now: Instant) {
        let from = self.stage;
        self.stage = request.target;

        tracing::info!(
            "Stage changed: {} -> {} after {:?}",
            from,
            self.stage,
            request.delay
        );
        self.bus.publish(Event::StageChanged {
            from,
            to: self.stage,
        });

        if self.stage.is_terminal() {
            self.start_reveal(now);
        }
    }

    fn start_reveal(&mut self, now: Instant) {
        if self.reveal_started {
            return;
        }
        self.reveal_started = true;

        self.animator.start(
            now,
            self.config.reveal_target,
            self.config.reveal_duration(),
            self.config.reveal_ticks,
        );
    }

    fn publish_snapshot(&self) {
        self.bus
            .publish(Event::SnapshotChanged(Box::new(self.snapshot())));
    }
}

impl std::fmt::Debug for WizardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardController")
            .field("stage", &self.stage)
            .field("answers", &self.answers)
            .field("pending", &self.scheduler.pending())
            .field("animated_amount", &self.animated_amount)
            .field("closed", &self.closed)
            .finish()
    }
}
