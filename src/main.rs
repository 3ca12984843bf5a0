use anyhow::Context;
use crossbeam_channel::Sender;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use questionnaire_wizard::error::{ActionError, AppResult};
use questionnaire_wizard::messaging::{Command, Event, EventBus, SessionExecutor};
use questionnaire_wizard::wizard::{
    AgeRange, ClaimResponse, IncomeRange, WizardSnapshot, WizardStage, INITIALIZING_MESSAGE,
};
use questionnaire_wizard::{SystemClock, WizardConfig};

const LOG_TARGET_STARTUP: &str = "questionnaire_wizard::startup";

/// Command-line options
#[derive(Debug, Default)]
struct Options {
    config_path: Option<PathBuf>,
    script: bool,
    json: bool,
}

impl Options {
    fn parse() -> AppResult<Self> {
        let mut options = Options::default();
        let mut args = std::env::args().skip(1);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args.next().context("--config requires a path")?;
                    options.config_path = Some(PathBuf::from(path));
                }
                "--script" => options.script = true,
                "--json" => options.json = true,
                other => anyhow::bail!("Unknown argument: {}", other),
            }
        }

        Ok(options)
    }
}

/// Initialize tracing with file rotation
///
/// Logs are written to `<config dir>/QuestionnaireWizard/logs/`, rotated daily.
/// Debug builds also log to stderr so stdout stays free for rendering.
fn initialize_tracing() {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = dirs::config_dir()
        .map(|dir| dir.join("QuestionnaireWizard").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "questionnaire-wizard.log");

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();
    }

    tracing::info!(target: LOG_TARGET_STARTUP, "Log directory: {}", log_dir.display());
}

fn load_config(options: &Options) -> AppResult<WizardConfig> {
    let config = match &options.config_path {
        Some(path) => WizardConfig::load_or_default(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => WizardConfig::default(),
    };
    Ok(config)
}

/// Walk the questionnaire with fixed answers, waiting for each stage
fn script_commands(stage: WizardStage) -> Vec<Command> {
    match stage {
        WizardStage::ClaimQuestion => vec![Command::SubmitClaimAnswer(ClaimResponse::Yes)],
        WizardStage::PostalCodeEntry => vec![
            Command::UpdatePostalCode("90210".to_string()),
            Command::SubmitPostalCode,
        ],
        WizardStage::DetailsEntry => vec![
            Command::UpdateAgeRange(AgeRange::From25To34),
            Command::UpdateIncomeRange(IncomeRange::Under25k),
            Command::SubmitDetails,
        ],
        WizardStage::Initializing | WizardStage::Result => Vec::new(),
    }
}

/// Forward stdin lines as commands until EOF
fn spawn_stdin_reader(commands: Sender<Command>) -> AppResult<()> {
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                match Command::parse(&line) {
                    Ok(command) => {
                        let quit = command == Command::Shutdown;
                        if commands.send(command).is_err() || quit {
                            return;
                        }
                    }
                    Err(e) => eprintln!("✗ {}", e),
                }
            }
            let _ = commands.send(Command::Shutdown);
        })
        .context("Failed to start stdin reader")?;
    Ok(())
}

fn render(snapshot: &WizardSnapshot) {
    if snapshot.stage == WizardStage::Initializing {
        println!("… {}", INITIALIZING_MESSAGE);
        return;
    }
    if snapshot.is_transitioning {
        println!(
            "… {}",
            snapshot.transition_message.as_deref().unwrap_or("Loading...")
        );
        return;
    }

    match snapshot.stage.number() {
        Some(number) => println!(
            "[{:>3}%] {}. {}",
            snapshot.progress_percent,
            number,
            snapshot.stage.title()
        ),
        None => println!("[{:>3}%] {}", snapshot.progress_percent, snapshot.stage.title()),
    }
    match snapshot.stage {
        WizardStage::ClaimQuestion => {
            let options: Vec<&str> = ClaimResponse::ALL.iter().map(|a| a.label()).collect();
            println!("  Answer: {}", options.join(" / "));
        }
        WizardStage::PostalCodeEntry => {
            println!("  ZIP: {}", snapshot.answers.postal_code());
            if let Some(error) = &snapshot.postal_error {
                println!("  ✗ {}", error);
            } else if snapshot.shows_region_hint() {
                println!("  ✓ {} detected", snapshot.detected_region.unwrap_or_default());
            }
            if snapshot.can_submit_postal_code {
                println!("  Type `submit` to continue");
            }
        }
        WizardStage::DetailsEntry => {
            let age = snapshot.answers.age_range.map(AgeRange::label);
            let income = snapshot.answers.income_range.map(IncomeRange::label);
            println!("  Age: {}", age.unwrap_or("(select)"));
            println!("  Income: {}", income.unwrap_or("(select)"));
            if snapshot.can_submit_details {
                println!("  Type `details` to continue");
            }
        }
        WizardStage::Result => {
            println!("  Amount: ${}", snapshot.animated_amount);
        }
        WizardStage::Initializing => {}
    }
}

fn main() -> AppResult<()> {
    initialize_tracing();

    let options = Options::parse()?;
    let config = load_config(&options)?;
    tracing::info!(
        target: LOG_TARGET_STARTUP,
        "Starting questionnaire wizard v{}",
        env!("CARGO_PKG_VERSION")
    );

    let event_bus = EventBus::new();
    let (events, _id) = event_bus.subscribe();
    let session = SessionExecutor::new(event_bus)
        .start(config, Arc::new(SystemClock))
        .context("Failed to start wizard session")?;

    if !options.script {
        spawn_stdin_reader(session.sender())?;
    }

    let mut last_stage = None;
    for event in events.iter() {
        match event {
            Event::SnapshotChanged(snapshot) => {
                if options.json {
                    println!("{}", serde_json::to_string(&snapshot)?);
                } else {
                    render(&snapshot);
                }

                let settled = !snapshot.is_transitioning;
                if options.script && settled && last_stage != Some(snapshot.stage) {
                    last_stage = Some(snapshot.stage);
                    for command in script_commands(snapshot.stage) {
                        session.send(command);
                    }
                }
            }
            // Postal rejections already show up as the snapshot's error line
            Event::ActionRejected {
                error: ActionError::InvalidPostalCode { .. },
            } => {}
            Event::ActionRejected { error } => {
                if !options.json {
                    println!("  ✗ {}", error);
                }
            }
            Event::RevealCompleted { amount } => {
                tracing::info!("Reveal finished at {}", amount);
                break;
            }
            Event::SessionClosed => break,
            _ => {}
        }
    }

    session.shutdown();
    Ok(())
}
