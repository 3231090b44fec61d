use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use duty_roster::config::Config;
use duty_roster::models::RoleId;

mod commands;

use commands::Session;

#[derive(Parser)]
#[command(
    name = "duty-roster",
    version,
    about = "Weekly duty roster planner: fair candidate ranking, conflict checks and group rotation",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Workspace file holding roster and schedule
    #[arg(short, long, global = true, default_value = "workspace.json")]
    workspace: PathBuf,

    /// TOML configuration file (defaults to DUTY_ROSTER_* environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the configuration
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank candidates for a role in a given week
    Rank {
        /// Role identifier (e.g. bible_reading)
        #[arg(short, long)]
        role: RoleId,

        /// Week start date (YYYY-MM-DD)
        #[arg(long)]
        week: NaiveDate,

        /// Slot being filled, excluded from the external speaker count
        #[arg(short, long)]
        slot: Option<String>,

        /// Print JSON instead of text
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// List conflicts in a week
    Conflicts {
        /// Week start date (YYYY-MM-DD)
        #[arg(long)]
        week: NaiveDate,

        /// Print JSON instead of text
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Review a week: conflicts, ineligible assignments, minimum gaps
    Review {
        /// Week start date (YYYY-MM-DD)
        #[arg(long)]
        week: NaiveDate,

        /// Print JSON instead of text
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Rotate groups (or a pool of people) through a duty
    Rotate {
        /// Role identifier (e.g. facility_cleaning)
        #[arg(short, long)]
        role: RoleId,

        /// First week of the rotation
        #[arg(long)]
        from: NaiveDate,

        /// Number of weeks to plan
        #[arg(long, default_value = "4")]
        weeks: usize,

        /// People per week, for person duties
        #[arg(long, default_value = "1")]
        per_period: usize,

        /// Apply the rotation and save the workspace
        #[arg(long, default_value = "false")]
        write: bool,
    },

    /// Fill empty person slots with the best candidates
    Autofill {
        /// First week to fill
        #[arg(long)]
        from: NaiveDate,

        /// Number of weeks to fill
        #[arg(long, default_value = "1")]
        weeks: usize,

        /// Apply the assignments and save the workspace
        #[arg(long, default_value = "false")]
        write: bool,
    },

    /// Export finalized weeks as JSON
    Export {
        /// First week to export
        #[arg(long)]
        from: NaiveDate,

        /// Last week to export
        #[arg(long)]
        to: NaiveDate,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::from_env()?,
    };
    config.validate().context("Invalid configuration")?;

    // Initialize tracing/logging
    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    tracing::info!(workspace = %cli.workspace.display(), "duty-roster starting");

    let session = Session::open(&cli.workspace, &config).await?;

    match cli.command {
        Commands::Rank {
            role,
            week,
            slot,
            json,
        } => {
            tracing::info!(role = %role, week = %week, slot = ?slot, "Starting rank command");
            commands::rank(&session, role, week, slot, json)?;
        }

        Commands::Conflicts { week, json } => {
            tracing::info!(week = %week, "Starting conflicts command");
            commands::conflicts(&session, week, json)?;
        }

        Commands::Review { week, json } => {
            tracing::info!(week = %week, "Starting review command");
            commands::review(&session, week, json)?;
        }

        Commands::Rotate {
            role,
            from,
            weeks,
            per_period,
            write,
        } => {
            tracing::info!(
                role = %role,
                from = %from,
                weeks = %weeks,
                per_period = %per_period,
                write = %write,
                "Starting rotate command"
            );
            commands::rotate(session, role, from, weeks, per_period, write).await?;
        }

        Commands::Autofill { from, weeks, write } => {
            tracing::info!(from = %from, weeks = %weeks, write = %write, "Starting autofill command");
            commands::autofill(session, from, weeks, write).await?;
        }

        Commands::Export { from, to, output } => {
            tracing::info!(from = %from, to = %to, output = ?output, "Starting export command");
            commands::export(&session, from, to, output).await?;
        }
    }

    tracing::info!("duty-roster completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("duty_roster=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(format!("duty_roster={level},warn"))
        })
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
