use iced::widget::{column, container, text};
use iced::{Alignment, Element, Length, Task, Theme};
use chrono::Local;
use pico_args::Arguments;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod queue;
mod state;
mod ui;

use api::client::ScoringClient;
use api::wire::{Reply, Request};
use config::{Config, Overrides};
use error::{ApiError, AppError};
use queue::{LinkQueue, QueueCommand};
use state::data::Slot;
use state::session::{Action, Effect, Session, Ticket};

/// Main application state
struct SampleRater {
    /// Everything the navigator knows about the rater's progress
    session: Session,
    /// Connection to the scoring service
    client: ScoringClient,
    /// Where sample images live on disk
    asset_root: PathBuf,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked one of the three images
    Pick(Slot),
    /// User clicked "Submit"
    Submit,
    /// User clicked "Previous"
    Previous,
    /// User clicked "Next"
    Next,
    /// Jump box edited
    JumpInput(String),
    /// User pressed "Go" or Enter in the jump box
    Jump,
    /// Background request finished
    Replied {
        ticket: u64,
        outcome: Result<Reply, ApiError>,
    },
}

impl From<Message> for Action {
    fn from(message: Message) -> Self {
        match message {
            Message::Pick(slot) => Action::Pick(slot),
            Message::Submit => Action::Submit,
            Message::Previous => Action::Previous,
            Message::Next => Action::Next,
            Message::JumpInput(value) => Action::JumpInput(value),
            Message::Jump => Action::Jump,
            Message::Replied { ticket, outcome } => Action::Replied { ticket, outcome },
        }
    }
}

impl SampleRater {
    /// Create a new instance of the application and ask for the current sample
    fn new(config: Config, client: ScoringClient) -> (Self, Task<Message>) {
        let mut app = SampleRater {
            session: Session::new(config.coder, config.sample_count),
            client,
            asset_root: config.asset_root,
            status: "Loading your current sample...".to_string(),
        };

        info!(
            "🎨 Sample Rater started for {} against {}",
            app.session.coder(),
            app.client.base_url()
        );

        let effect = app.session.apply(Action::Start);
        let task = app.run(effect);
        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        if let Message::Replied { outcome: Err(e), .. } = &message {
            self.status = format!("⚠️  Last request failed: {}", e);
        }

        let effect = self.session.apply(message.into());
        self.run(effect)
    }

    /// Carry out what the session asked for
    fn run(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::None => Task::none(),
            Effect::Alert(message) => {
                ui::dialogs::alert(&message);
                Task::none()
            }
            Effect::Send(Ticket { id, request }) => {
                if let Request::StoreResponse { number, choice, .. } = &request {
                    self.status = format!(
                        "Sent {} for sample {} at {}",
                        choice,
                        number,
                        Local::now().format("%H:%M:%S")
                    );
                }

                let client = self.client.clone();
                Task::perform(
                    async move { client.send(request).await },
                    move |outcome| Message::Replied { ticket: id, outcome },
                )
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let body: Element<Message> = if self.session.all_done() {
            ui::comparison::completion_banner()
        } else if let Some(sample) = self.session.current() {
            ui::comparison::view(sample, &self.asset_root, self.session.pending())
        } else {
            text("Waiting for the first sample...").size(20).into()
        };

        let status = if self.session.is_busy() {
            "Waiting for the service..."
        } else {
            self.status.as_str()
        };

        let content = column![
            container(body)
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill),
            ui::controls::view(&self.session),
            text(status).size(14),
        ]
        .spacing(16)
        .padding(24)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// What the command line asked for
#[derive(Debug)]
enum Command {
    /// `sample-rater queue <command> [--dir DIR] [--pending FILE] [--checked FILE]`
    Queue {
        queue: LinkQueue,
        command: QueueCommand,
    },
    /// `sample-rater [--config FILE] [--coder NAME] [--service URL] [--assets DIR] [--save]`
    Rate {
        config_path: Option<PathBuf>,
        save: bool,
        overrides: Overrides,
    },
}

fn parse_command(mut args: Arguments) -> Result<Command, AppError> {
    match args.subcommand()?.as_deref() {
        Some("queue") => {
            let root: PathBuf = args
                .opt_value_from_str("--dir")?
                .unwrap_or_else(|| PathBuf::from("."));
            let mut queue = LinkQueue::in_dir(&root);
            if let Some(pending) = args.opt_value_from_str::<_, PathBuf>("--pending")? {
                queue = queue.with_pending(pending);
            }
            if let Some(checked) = args.opt_value_from_str::<_, PathBuf>("--checked")? {
                queue = queue.with_checked(checked);
            }
            let word: String = args
                .opt_free_from_str()?
                .unwrap_or_else(|| "peek".to_string());
            let command = QueueCommand::parse(&word)?;
            Ok(Command::Queue { queue, command })
        }
        Some(other) => Err(AppError::Usage(format!("unknown command {other:?}"))),
        None => {
            let config_path: Option<PathBuf> = args.opt_value_from_str("--config")?;
            let save = args.contains("--save");
            let overrides = Overrides {
                coder: args.opt_value_from_str("--coder")?,
                service_url: args.opt_value_from_str("--service")?,
                asset_root: args.opt_value_from_str("--assets")?,
            };

            let leftover = args.finish();
            if !leftover.is_empty() {
                warn!("Ignoring unexpected arguments: {:?}", leftover);
            }

            Ok(Command::Rate { config_path, save, overrides })
        }
    }
}

/// Run a queue command and print the sample folder now at the head
fn run_queue(queue: &LinkQueue, command: QueueCommand) -> Result<(), AppError> {
    match queue.run(command)? {
        Some(link) => match queue::sample_dir(queue.evals_root(), &link) {
            Some(dir) => println!("{}", dir.display()),
            None => warn!("⚠️  Cannot derive a sample folder from {}", link.trim()),
        },
        None => println!("nothing more to check"),
    }
    Ok(())
}

/// Write the effective settings to `path` when `--save` was given
fn persist(config: &Config, save: bool, path: Option<PathBuf>) -> Result<Option<PathBuf>, AppError> {
    if !save {
        return Ok(None);
    }
    let Some(path) = path else {
        warn!("⚠️  No config directory on this platform, settings not saved");
        return Ok(None);
    };

    config::save_to_path(config, &path)?;
    info!("💾 Saved settings to {}", path.display());
    Ok(Some(path))
}

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sample_rater=info")),
        )
        .init();

    let (config_path, save, overrides) = match parse_command(Arguments::from_env())? {
        Command::Queue { queue, command } => return run_queue(&queue, command),
        Command::Rate { config_path, save, overrides } => (config_path, save, overrides),
    };

    let config = match config_path {
        Some(path) => config::load_from_path(&path)?,
        None => config::load()?,
    }
    .with_overrides(overrides);

    persist(&config, save, config::default_config_path())?;

    let client = ScoringClient::new(
        &config.service_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    iced::application("Sample Rater", SampleRater::update, SampleRater::view)
        .theme(SampleRater::theme)
        .centered()
        .run_with(move || SampleRater::new(config, client))?;

    Ok(())
}
