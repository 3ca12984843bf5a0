/// Messaging module for the Event/Command architecture
///
/// - **Commands**: user actions sent from the view layer to the session
/// - **Events**: notifications published by the controller after it changes
///
/// ## Architecture
///
/// ```text
/// ┌────────────┐   Command    ┌─────────────────┐    Event     ┌─────────────┐
/// │ View layer │ ───────────> │ SessionExecutor │ ───────────> │  Event Bus  │
/// │            │              │ (controller)    │              │             │
/// └────────────┘              └─────────────────┘              └─────────────┘
///       ▲                                                            │
///       └──────────────────────── snapshots ─────────────────────────┘
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// let event_bus = EventBus::new();
/// let (rx, _id) = event_bus.subscribe();
///
/// let session = SessionExecutor::new(event_bus).start(config, Arc::new(SystemClock))?;
/// session.send(Command::SubmitClaimAnswer(ClaimResponse::Yes));
///
/// while let Ok(event) = rx.recv() {
///     if let Event::SnapshotChanged(snapshot) = event {
///         render(&snapshot);
///     }
/// }
/// ```

pub mod bus;
pub mod commands;
pub mod events;
pub mod executor;

// Re-export commonly used types
pub use bus::{EventBus, SubscriberId};
pub use commands::{Command, ParseCommandError};
pub use events::Event;
pub use executor::{run_session, SessionExecutor, SessionHandle};
