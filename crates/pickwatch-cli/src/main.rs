use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use pickwatch_core::{load_app_config, load_catalog, AppConfig, CatalogFile};
use pickwatch_poller::{
    AvailabilityFetcher, FetchDriver, Notification, NotificationSink, PollScheduler,
    VersionChecker,
};

#[derive(Debug, Parser)]
#[command(name = "pickwatch")]
#[command(about = "Watches store pickup availability for preferred models")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Poll on the configured interval until interrupted.
    Watch,
    /// Run a single poll cycle and print the result.
    Check,
    /// Check whether a newer release has been tagged.
    Version,
}

/// Notification delivery for a terminal process: a structured log line.
struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: &Notification) {
        tracing::info!(title = %notification.title, body = %notification.body, "notification");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_app_config().context("loading configuration")?;
    init_tracing(&config.log_level);
    let catalog = load_catalog(&config.catalog_path).with_context(|| {
        format!("loading catalog from {}", config.catalog_path.display())
    })?;

    match cli.command {
        Commands::Watch => watch_loop(config, catalog).await,
        Commands::Check => check_once(&config, &catalog).await,
        Commands::Version => version_once(&config).await,
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_fetcher(config: &AppConfig) -> anyhow::Result<AvailabilityFetcher> {
    AvailabilityFetcher::new(
        config.request_timeout_secs,
        &config.user_agent,
        Arc::new(TracingSink),
    )
    .context("building HTTP client")
}

/// Run the recurring scheduler until interrupted.
async fn watch_loop(config: AppConfig, catalog: CatalogFile) -> anyhow::Result<()> {
    let fetcher = Arc::new(build_fetcher(&config)?);
    let checker = Arc::new(VersionChecker::new(
        config.request_timeout_secs,
        &config.user_agent,
        &config.release_repo,
        &config.local_version,
    )?);
    let catalog = Arc::new(catalog);

    tracing::info!(
        country = %config.country,
        product_line = %config.product_line,
        store = %config.store_number,
        interval_mins = config.poll_interval_mins,
        "starting watch loop"
    );

    // The sender stays alive for the life of the loop; a future config
    // reload would push new snapshots through it and the scheduler would
    // re-arm on an interval change.
    let (config_tx, config_rx) = watch::channel(config);

    let mut state_rx = fetcher.subscribe();
    tokio::spawn(async move {
        while state_rx.changed().await.is_ok() {
            let snapshot = state_rx.borrow().clone();
            if snapshot.loading {
                continue;
            }
            if let Some(result) = &snapshot.result {
                tracing::debug!(
                    stores = result.stores.len(),
                    checked_at = %result.checked_at,
                    "snapshot updated"
                );
            }
        }
    });

    let mut version_rx = checker.subscribe();
    tokio::spawn(async move {
        while version_rx.changed().await.is_ok() {
            let state = version_rx.borrow().clone();
            if !state.is_current {
                tracing::warn!(
                    local = %state.local,
                    latest = %state.latest_known,
                    "a newer release is available"
                );
            }
        }
    });

    let driver = FetchDriver::new(
        Arc::clone(&fetcher),
        Arc::clone(&checker),
        Arc::clone(&catalog),
        config_rx.clone(),
    );
    let scheduler = PollScheduler::new(driver, config_rx);

    tokio::select! {
        () = scheduler.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupt received; shutting down");
        }
    }

    drop(config_tx);
    Ok(())
}

/// One poll cycle, printed for humans.
async fn check_once(config: &AppConfig, catalog: &CatalogFile) -> anyhow::Result<()> {
    let fetcher = build_fetcher(config)?;

    match fetcher.run_cycle(config, catalog).await {
        Ok(result) => {
            if result.stores.is_empty() {
                println!("No pickup availability right now.");
                return Ok(());
            }
            for store in &result.stores {
                println!("{} ({}), {}", store.name, store.store_number, store.city);
                for part in &store.parts {
                    println!("  {}  {}", part.part_number, part.title);
                }
            }
            Ok(())
        }
        Err(e) => anyhow::bail!("{}", e.user_message()),
    }
}

/// One release check, printed for humans.
async fn version_once(config: &AppConfig) -> anyhow::Result<()> {
    let checker = VersionChecker::new(
        config.request_timeout_secs,
        &config.user_agent,
        &config.release_repo,
        &config.local_version,
    )?;
    let state_rx = checker.subscribe();
    checker.check().await;

    let state = state_rx.borrow().clone();
    if state.is_current {
        println!(
            "pickwatch {} is current (latest published: {})",
            state.local, state.latest_known
        );
    } else {
        println!(
            "pickwatch {} is stale; latest published release is {}",
            state.local, state.latest_known
        );
    }
    Ok(())
}
