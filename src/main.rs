mod cli;
mod ui;

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use rescale_jobs::{
    Job, JobDefinition, JobSummary, RescaleClient, RescaleConfig, Session, Transport,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => RescaleConfig::load_from(path)?,
        None => RescaleConfig::load()?,
    }
    .with_api_key_override(cli.api_key);
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }
    if !config.has_api_key() {
        bail!(
            "no API key: set {}, pass --api-key or add api_key to {}",
            rescale_jobs::config::API_KEY_ENV,
            rescale_jobs::config::CONFIG_FILE
        );
    }

    let client = RescaleClient::from_config(&config).context("failed to build HTTP client")?;
    let session = Session::new(client);

    match cli.command {
        Command::Create { definition, submit } => {
            let mut job = JobDefinition::load_job(&definition)?;
            let id = job.create(&session).await?;
            println!("Created job {id}");
            if submit {
                job.submit(&session).await?;
                println!("Submitted job {id}");
            }
            ui::print_summary(&JobSummary::from_job(&job));
        }
        Command::Submit { id } => {
            let mut job = Job::load_from_id(id.as_str());
            job.submit(&session).await?;
            println!("Submitted job {id}");
        }
        Command::Status { id } => {
            let mut job = Job::load_from_id(id.as_str());
            let status = job.refresh_status(&session).await?;
            println!("{id}: {status}");
        }
        Command::Watch { id, interval } => {
            watch(&session, &id, Duration::from_secs(interval.max(1))).await?;
        }
        Command::Versions { software } => {
            let versions = session.versions_for(&software).await?;
            if versions.is_empty() {
                println!("No versions listed for {software}");
            }
            for v in versions.iter() {
                println!("{:<40} {}", v.label, v.code);
            }
        }
        Command::CoreTypes { page } => {
            let listing = session.list_core_types(page).await?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Command::Software { page } => {
            let listing = session.list_software(page).await?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }

    Ok(())
}

/// Poll a job until it reaches a terminal state.
async fn watch<T: Transport>(session: &Session<T>, id: &str, interval: Duration) -> Result<()> {
    let mut job = Job::load_from_id(id);
    let progress = ui::JobProgress::start(id);

    loop {
        let status = job
            .refresh_status(session)
            .await
            .with_context(|| format!("failed to poll job {id}"))?;
        progress.update(id, status);
        if status.is_terminal() {
            progress.finish(id, status);
            break;
        }
        sleep(interval).await;
    }

    ui::print_summary(&JobSummary::from_job(&job));
    Ok(())
}
