/// Session executor
///
/// Hosts one wizard controller on a background thread. Commands arrive over a
/// channel; between commands the thread sleeps until the controller's next
/// deadline, then polls it.
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::bus::EventBus;
use super::commands::Command;
use crate::clock::Clock;
use crate::config::WizardConfig;
use crate::wizard::WizardController;

/// Command executor that drives a wizard session and emits events
pub struct SessionExecutor {
    command_tx: Sender<Command>,
    command_rx: Receiver<Command>,
    event_bus: EventBus,
}

impl SessionExecutor {
    /// Create a new executor publishing to `event_bus`
    pub fn new(event_bus: EventBus) -> Self {
        let (tx, rx) = unbounded();

        Self {
            command_tx: tx,
            command_rx: rx,
            event_bus,
        }
    }

    /// Get a sender for submitting commands
    pub fn sender(&self) -> Sender<Command> {
        self.command_tx.clone()
    }

    /// Start the session loop in a background thread
    pub fn start(
        self,
        config: WizardConfig,
        clock: Arc<dyn Clock>,
    ) -> std::io::Result<SessionHandle> {
        let SessionExecutor {
            command_tx,
            command_rx,
            event_bus,
        } = self;

        let join = thread::Builder::new()
            .name("wizard-session".to_string())
            .spawn(move || {
                let controller = WizardController::new(config, clock, event_bus);
                run_session(controller, command_rx);
            })?;

        Ok(SessionHandle {
            command_tx,
            join: Some(join),
        })
    }
}

/// Drive `controller` until shutdown or until every command sender is gone
pub fn run_session(mut controller: WizardController, commands: Receiver<Command>) {
    tracing::info!("Wizard session thread started");

    loop {
        let received = match controller.time_until_next_deadline() {
            Some(wait) => commands.recv_timeout(wait),
            None => commands.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(Command::Shutdown) => {
                tracing::info!("Shutdown command received, stopping session");
                break;
            }
            Ok(command) => {
                // Rejections reach the view as Event::ActionRejected
                if let Err(e) = controller.dispatch(command) {
                    tracing::debug!("Action rejected: {}", e);
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                tracing::info!("All command senders dropped, stopping session");
                break;
            }
        }

        controller.poll();
    }

    controller.teardown();
    tracing::info!("Wizard session thread stopped");
}

/// Handle to a running session; shuts it down when dropped
pub struct SessionHandle {
    command_tx: Sender<Command>,
    join: Option<JoinHandle<()>>,
}

impl SessionHandle {
    /// Queue a command for the session thread
    pub fn send(&self, command: Command) -> bool {
        self.command_tx.send(command).is_ok()
    }

    pub fn sender(&self) -> Sender<Command> {
        self.command_tx.clone()
    }

    /// Stop the session and wait for its thread to finish
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(join) = self.join.take() {
            let _ = self.command_tx.send(Command::Shutdown);
            if join.join().is_err() {
                tracing::error!("Wizard session thread panicked");
            }
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, SystemClock};
    use crate::error::ActionError;
    use crate::messaging::Event;
    use crate::wizard::{ClaimResponse, WizardStage};

    fn fast_config() -> WizardConfig {
        WizardConfig {
            startup_delay_ms: 5,
            step_delay_ms: 5,
            processing_delay_ms: 5,
            reveal_target: 100,
            reveal_duration_ms: 20,
            reveal_ticks: 4,
        }
    }

    #[test]
    fn test_session_reaches_claim_question() {
        let bus = EventBus::new();
        let (rx, _id) = bus.subscribe();

        let handle = SessionExecutor::new(bus)
            .start(fast_config(), Arc::new(SystemClock))
            .unwrap();

        let reached = rx.iter().any(|event| {
            matches!(
                event,
                Event::StageChanged {
                    to: WizardStage::ClaimQuestion,
                    ..
                }
            )
        });
        assert!(reached);

        assert!(handle.send(Command::SubmitClaimAnswer(ClaimResponse::Yes)));
        let reached = rx.iter().any(|event| {
            matches!(
                event,
                Event::StageChanged {
                    to: WizardStage::PostalCodeEntry,
                    ..
                }
            )
        });
        assert!(reached);

        handle.shutdown();
    }

    #[test]
    fn test_shutdown_closes_session() {
        let bus = EventBus::new();
        let (rx, _id) = bus.subscribe();

        let config = WizardConfig {
            startup_delay_ms: 60_000,
            ..WizardConfig::default()
        };
        let handle = SessionExecutor::new(bus)
            .start(config, Arc::new(SystemClock))
            .unwrap();
        handle.shutdown();

        let events: Vec<Event> = rx.try_iter().collect();
        assert!(matches!(events.last(), Some(Event::SessionClosed)));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::StageChanged { .. })));
    }

    #[test]
    fn test_run_session_stops_when_senders_dropped() {
        let bus = EventBus::new();
        let (rx, _id) = bus.subscribe();
        let controller =
            WizardController::new(WizardConfig::default(), Arc::new(ManualClock::new()), bus);

        let (tx, commands) = unbounded();
        tx.send(Command::UpdatePostalCode("90210".to_string())).unwrap();
        drop(tx);
        run_session(controller, commands);

        let events: Vec<Event> = rx.try_iter().collect();
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::SessionClosed)));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::StageChanged { .. })));
    }

    #[test]
    fn test_rejected_command_reaches_subscribers() {
        let bus = EventBus::new();
        let (rx, _id) = bus.subscribe();

        let config = WizardConfig {
            startup_delay_ms: 60_000,
            ..WizardConfig::default()
        };
        let handle = SessionExecutor::new(bus)
            .start(config, Arc::new(SystemClock))
            .unwrap();
        assert!(handle.send(Command::SubmitDetails));

        let rejected = rx.iter().find_map(|event| match event {
            Event::ActionRejected { error } => Some(error),
            _ => None,
        });
        assert_eq!(
            rejected,
            Some(ActionError::WrongStage {
                expected: WizardStage::DetailsEntry,
                actual: WizardStage::Initializing,
            })
        );

        handle.shutdown();
    }
}
