//! # CreUp Admin
//!
//! Back-office command line for the CreUp API.
//!
//! ## Usage
//!
//! ```bash
//! # Log in (password from the prompt-free env var or the flag)
//! CREUP_PASSWORD=secret creup-admin login --email admin@creup.fr
//!
//! # Inspect the back office
//! creup-admin list appointments
//! creup-admin list partners --clients
//! creup-admin show projects 12
//!
//! # Status changes
//! creup-admin appointment-status 7 confirmed
//! creup-admin contact-status 3 read
//!
//! # Against another backend
//! creup-admin --api-url https://api.creup.fr list projects --limit 3
//! ```
//!
//! ## Configuration (creup.toml)
//!
//! ```toml
//! base_url = "https://api.creup.fr"
//! protected_prefix = "/dashboard"
//! login_route = "/login"
//! ```

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use creup_api::{AppointmentStatus, ClientConfig, ContactStatus};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "creup-admin")]
#[command(about = "CreUp back-office client")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API base URL, overrides the configuration file
    #[arg(long, env = "API_URL")]
    api_url: Option<String>,

    /// File holding the session token
    #[arg(long, env = "CREUP_SESSION_FILE")]
    state_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "CREUP_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the account behind the stored session
    Whoami,

    /// List the records of a resource
    List {
        resource: ResourceKind,

        /// Only the first N projects
        #[arg(long)]
        limit: Option<usize>,

        /// Only partners of kind `client`
        #[arg(long)]
        clients: bool,
    },

    /// Print one record as JSON
    Show { resource: ResourceKind, id: String },

    /// Delete one record
    Delete { resource: ResourceKind, id: String },

    /// Confirm or cancel an appointment
    AppointmentStatus { id: String, status: AppointmentStatus },

    /// Move a contact message between new, read and archived
    ContactStatus { id: String, status: ContactStatus },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ResourceKind {
    Appointments,
    Projects,
    Services,
    Partners,
    Testimonials,
    Contacts,
    Team,
    Stats,
}

impl ResourceKind {
    fn path(&self) -> &'static str {
        match self {
            Self::Appointments => creup_api::APPOINTMENTS_PATH,
            Self::Projects => creup_api::PROJECTS_PATH,
            Self::Services => creup_api::SERVICES_PATH,
            Self::Partners => creup_api::PARTNERS_PATH,
            Self::Testimonials => creup_api::TESTIMONIALS_PATH,
            Self::Contacts => creup_api::CONTACTS_PATH,
            Self::Team => creup_api::TEAM_PATH,
            Self::Stats => creup_api::STATS_PATH,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// File config or environment, then `--api-url` on top.
fn load_config(args: &Args) -> Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ClientConfig::from_env().context("Invalid API configuration")?,
    };

    if let Some(api_url) = &args.api_url {
        config.base_url = api_url.trim_end_matches('/').to_string();
    }
    config.validate().context("Invalid API configuration")?;
    Ok(config)
}

fn session_path(args: &Args) -> PathBuf {
    args.state_file.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("creup")
            .join("session.json")
    })
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug,hyper=info,reqwest=info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&args)?;
    let session_file = session_path(&args);
    tracing::debug!(base_url = %config.base_url, session = %session_file.display(), "Starting");

    commands::run(args.command, config, &session_file).await
}
