//! aws-janitor: age-based retention sweeper for managed AWS ML resources
//!
//! Loads the retention settings and whitelist, sweeps each requested region
//! sequentially, and reports every examined resource as a JSON tree.

use anyhow::Result;
use aws_janitor::aws::SageMakerClient;
use aws_janitor::cleanup::SageMakerCleanup;
use aws_janitor::config::{Settings, Whitelist};
use aws_janitor::resource_tree::ResourceTree;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "aws-janitor")]
#[command(about = "Age-based cleanup of SageMaker notebook instances and endpoints")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sweep resources past their TTL in one or more regions
    Sweep {
        /// Path to the retention settings file (TOML)
        #[arg(long, default_value = "janitor.toml")]
        config: PathBuf,

        /// Path to the whitelist file (TOML); omit for an empty whitelist
        #[arg(long)]
        whitelist: Option<PathBuf>,

        /// Comma-separated AWS regions to sweep
        #[arg(long, default_value = "us-east-1")]
        regions: String,

        /// AWS profile to use (overrides AWS_PROFILE env var)
        #[arg(long, env = "AWS_PROFILE")]
        aws_profile: Option<String>,

        /// Actually delete resources (default is dry-run)
        #[arg(long)]
        execute: bool,

        /// Write the examined-resource tree as JSON to this file
        /// instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print error in a user-friendly way
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();

    let _ = writeln!(stderr, "\n\x1b[1;31mError:\x1b[0m {e}");

    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  \x1b[33mCaused by:\x1b[0m {cause}");
        source = cause.source();
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Sweep {
            config,
            whitelist,
            regions,
            aws_profile,
            execute,
            output,
        } => {
            sweep(config, whitelist, regions, aws_profile, execute, output).await?;
        }
    }

    Ok(())
}

async fn sweep(
    config: PathBuf,
    whitelist: Option<PathBuf>,
    regions: String,
    aws_profile: Option<String>,
    execute: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut settings = Settings::load(&config)?;
    if execute {
        settings.general.dry_run = false;
    }

    let whitelist = match whitelist {
        Some(path) => Whitelist::load(&path)?,
        None => Whitelist::default(),
    };

    let regions: Vec<String> = regions
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let mode = if settings.general.dry_run {
        "DRY-RUN"
    } else {
        "EXECUTE"
    };
    info!(regions = ?regions, mode, "Starting sweep");

    let mut tree = ResourceTree::default();

    for region in &regions {
        // One handler per region; a failed client never aborts the batch
        let api = match SageMakerClient::with_profile(region, aws_profile.as_deref()).await {
            Ok(api) => api,
            Err(e) => {
                error!(region = %region, error = ?e, "Failed to construct SageMaker client");
                continue;
            }
        };

        info!(region = %region, "Sweeping region");

        let handler = SageMakerCleanup::new(api, &whitelist, &settings, region.clone());
        handler.run(&mut tree).await;
    }

    info!(examined = tree.len(), mode, "Sweep finished");

    let report = tree.to_json()?;
    match output {
        Some(path) => {
            std::fs::write(&path, report)?;
            info!(path = %path.display(), "Wrote examined-resource report");
        }
        None => println!("{report}"),
    }

    Ok(())
}
