use anyhow::{Context, Result};
use clap::Parser;
use gitfleet::adapters::discovery::FsDiscoveryAdapter;
use gitfleet::adapters::filter::PatternFilter;
use gitfleet::adapters::process::TokioProcess;
use gitfleet::cli::CliArgs;
use gitfleet::config::Config;
use gitfleet::render;
use gitfleet::services::{Fleet, RunControl};
use gitfleet_core::app::{Command, Summary};
use gitfleet_core::domain::RepoHandle;
use gitfleet_core::ports::{DiscoverReq, DiscoveryPort};
use std::io::Write;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Exit status after an interrupt, as shells report SIGINT
const EXIT_CANCELLED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(summary) if summary.cancelled => ExitCode::from(EXIT_CANCELLED),
        Ok(summary) if summary.has_failures() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> Result<Summary> {
    let config = Config::from_cli_and_file(&args)?;
    let command = args.action.to_command(&config)?;
    info!("running {} with concurrency {}", command.name(), config.concurrency);

    let repos = match &command {
        Command::Clone { dest, .. } => {
            tokio::fs::create_dir_all(dest).await.with_context(|| {
                format!("Failed to create clone destination: {}", dest.display())
            })?;
            Vec::new()
        }
        _ => discover(&config, args.filter.as_deref()).await?,
    };

    let fleet = Fleet::new(Arc::new(TokioProcess::new()), &config.fleet_settings());

    let (progress_tx, progress_rx) = crossbeam_channel::unbounded();
    let renderer = render::spawn_progress_renderer(progress_rx)
        .context("Failed to start progress renderer")?;
    let control = RunControl::new().with_progress(progress_tx);

    // Holds only the flag so the progress channel closes when `control` drops
    let cancel = control.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted; waiting for running operations to finish");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    let mut output = Vec::new();
    let summary = dispatch(&fleet, &command, &repos, &control, &mut output).await?;

    drop(control);
    if renderer.join().is_err() {
        debug!("progress renderer panicked");
    }

    std::io::stdout()
        .write_all(&output)
        .context("Failed to write results")?;
    Ok(summary)
}

async fn discover(config: &Config, filter: Option<&str>) -> Result<Vec<RepoHandle>> {
    let filter = filter.map(PatternFilter::new).transpose()?;
    let req = DiscoverReq {
        base: config.base_dir.clone(),
        max_depth: config.discovery.max_depth,
    };

    let repos = tokio::task::spawn_blocking(move || FsDiscoveryAdapter::new().scan(&req))
        .await
        .context("Discovery task failed")??;
    info!("discovered {} repositories under {}", repos.len(), config.base_dir.display());

    Ok(match filter {
        Some(filter) => filter.apply(repos),
        None => repos,
    })
}

async fn dispatch(
    fleet: &Fleet,
    command: &Command,
    repos: &[RepoHandle],
    control: &RunControl,
    out: &mut Vec<u8>,
) -> Result<Summary> {
    let summary = match command {
        Command::Status => {
            let report = fleet.status(repos, control).await;
            render::write_statuses(&report, out)?;
            Summary::from_report(&report)
        }
        Command::Fetch { prune } => {
            let report = fleet.fetch(repos, *prune, control).await;
            render::write_outcomes(&report, false, out)?;
            Summary::from_outcomes(&report)
        }
        Command::Pull => {
            let report = fleet.pull(repos, control).await;
            render::write_outcomes(&report, false, out)?;
            Summary::from_outcomes(&report)
        }
        Command::Clean { include_ignored } => {
            let report = fleet.clean(repos, *include_ignored, control).await;
            render::write_outcomes(&report, false, out)?;
            Summary::from_outcomes(&report)
        }
        Command::Diff { stat } => {
            let report = fleet.diff(repos, *stat, control).await;
            render::write_outcomes(&report, true, out)?;
            Summary::from_outcomes(&report)
        }
        Command::Checkout { branch, create } => {
            let report = fleet.checkout(repos, branch, *create, control).await;
            render::write_outcomes(&report, false, out)?;
            Summary::from_outcomes(&report)
        }
        Command::Exec { argv } => {
            let report = fleet.exec(repos, argv, control).await;
            render::write_outcomes(&report, true, out)?;
            Summary::from_outcomes(&report)
        }
        Command::Clone { dest, urls, depth } => {
            let report = fleet.clone_repos(urls, dest, *depth, control).await;
            render::write_outcomes(&report, false, out)?;
            Summary::from_outcomes(&report)
        }
    };

    Ok(summary)
}
