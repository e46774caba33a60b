#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod actionability;
mod actions;
mod config;
mod diagnostics;
mod engine;
mod errors;
mod flow;
mod locator;
mod operator;
mod profile;
mod resolver;
mod session;
mod targets;

use config::ScenarioConfig;
use diagnostics::ScreenshotSink;
use errors::DrillError;
use flow::FlowDriver;
use operator::ConsoleGate;
use profile::ProfileManager;
use session::{BrowserType, ChatSession, ViewportSize};

const EXIT_SUCCESS: i32 = 0;

#[derive(Parser)]
#[command(name = "chatdrill")]
#[command(about = "End-to-end chat-bot flow exerciser for WhatsApp Web", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every flow phase
#[derive(Args)]
struct SessionArgs {
    /// Browser to use
    #[arg(short, long, default_value = "firefox")]
    browser: String,

    /// Persistent profile name (keeps the WhatsApp login across runs)
    #[arg(short, long)]
    profile: Option<String>,

    /// Scenario config file (JSON); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for step and failure screenshots
    #[arg(long, default_value = "screenshots")]
    screenshots: PathBuf,

    /// Set viewport size (WIDTHxHEIGHT, e.g., 1280x720)
    #[arg(long)]
    viewport: Option<String>,

    /// Run browser in visible mode (disables headless)
    #[arg(long = "no-headless")]
    no_headless: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the complete flow: login through agent hand-off
    Run {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Log in to WhatsApp Web (QR scan if needed)
    Login {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Search for the target contact and open the conversation
    Contact {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Send the trigger message and click Proceed
    Trigger {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Probe the bot's name validation with known-bad inputs
    Validate {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Upload the receipt image
    Upload {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Hand the conversation over to a human agent
    Agent {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Manage browser profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Create a named profile
    Create {
        /// Profile name
        name: String,

        /// Browser the profile is for
        #[arg(short, long, default_value = "firefox")]
        browser: String,
    },

    /// List all profiles
    List,

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(err.exit_code());
        }
    }
}

async fn run() -> Result<(), DrillError> {
    // Logs go to stderr so captures and prompts stay readable on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatdrill=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { session } => {
            let driver = build_driver(&session).await?;
            driver.run_full().await
        }
        Commands::Login { session } => {
            let driver = build_driver(&session).await?;
            driver.login().await
        }
        Commands::Contact { session } => {
            let driver = build_driver(&session).await?;
            driver.login().await?;
            driver.open_contact().await
        }
        Commands::Trigger { session } => {
            let driver = build_driver(&session).await?;
            driver.login().await?;
            driver.open_contact().await?;
            driver.send_trigger().await
        }
        Commands::Validate { session } => {
            let driver = build_driver(&session).await?;
            driver.login().await?;
            driver.open_contact().await?;
            driver.send_trigger().await?;
            driver.probe_name_validation().await
        }
        Commands::Upload { session } => {
            let driver = build_driver(&session).await?;
            driver.login().await?;
            driver.open_contact().await?;
            driver.upload_receipt().await
        }
        Commands::Agent { session } => {
            let driver = build_driver(&session).await?;
            driver.login().await?;
            driver.open_contact().await?;
            driver.agent_handoff().await
        }
        Commands::Profile { command } => handle_profile(command).map_err(DrillError::from),
    }
}

async fn build_driver(args: &SessionArgs) -> Result<FlowDriver, DrillError> {
    let browser_type = BrowserType::from_str(&args.browser)?;

    let viewport = match &args.viewport {
        Some(raw) => Some(ViewportSize::parse(raw)?),
        None => None,
    };

    let profile_path = match &args.profile {
        Some(name) => Some(
            ProfileManager::new()?
                .get_or_create(name, &args.browser.to_lowercase())?,
        ),
        None => None,
    };

    let session = ChatSession::connect(browser_type, profile_path, viewport, !args.no_headless)
        .await
        .map_err(DrillError::engine)?;
    let session = Arc::new(session);

    let config = ScenarioConfig::load_or_default(args.config.as_deref())?;
    let sink = Arc::new(ScreenshotSink::new(
        Arc::clone(&session),
        args.screenshots.clone(),
    ));

    Ok(FlowDriver::new(session, config, sink, Arc::new(ConsoleGate)))
}

fn handle_profile(command: ProfileCommands) -> Result<()> {
    let manager = ProfileManager::new()?;

    match command {
        ProfileCommands::Create { name, browser } => {
            let path = manager.create_profile(&name, &browser.to_lowercase())?;
            println!("Created profile '{}' at {}", name, path.display());
        }
        ProfileCommands::List => {
            let profiles = manager.list_profiles()?;
            if profiles.is_empty() {
                println!("No profiles found");
            } else {
                for profile in profiles {
                    println!(
                        "{} ({}) - last used {}",
                        profile.name,
                        profile.browser,
                        profile.last_used.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }
        ProfileCommands::Delete { name } => {
            manager.delete_profile(&name)?;
            println!("Deleted profile '{}'", name);
        }
    }

    Ok(())
}
