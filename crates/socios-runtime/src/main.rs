//! # Socios Back-Office Runtime
//!
//! Entry point for the share lifecycle & billing service.
//!
//! ## Startup Sequence
//!
//! 1. Install the tracing subscriber (env-filter, `info` default)
//! 2. Load configuration from `SOCIOS_*` environment variables
//! 3. Build the adapters (config store, directory, repository, notifier)
//! 4. Construct the billing engine and start the scheduler
//! 5. Run until ctrl-c, then signal shutdown and join the job tasks
//!
//! The external systems (document store, roster service, mail) are
//! represented by the in-memory/logging adapters; swapping in real
//! integrations is a wiring change only.

mod config;

use anyhow::{Context, Result};
use socios_billing::adapters::{
    InMemoryConfigStore, InMemoryMemberDirectory, InMemoryShareRepository, LoggingNotifier,
};
use socios_billing::{
    BillingApi, BillingScheduler, BillingService, Clock, SystemClock, CONFIG_KEY_BASE_AMOUNT,
};
use socios_types::{Member, MemberId};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::RuntimeConfig;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let runtime_config = RuntimeConfig::from_env().context("loading runtime configuration")?;
    let billing_config = runtime_config.billing_config()?;
    info!(
        "[runtime] Socios back office starting (offset {}, base {})",
        billing_config.civil_offset, runtime_config.base_amount
    );

    let config_store = Arc::new(
        InMemoryConfigStore::new()
            .with_value(CONFIG_KEY_BASE_AMOUNT, &runtime_config.base_amount.to_string()),
    );
    let directory = Arc::new(InMemoryMemberDirectory::new());
    if runtime_config.seed_demo {
        seed_demo_roster(&directory).await;
    }
    let repository = Arc::new(InMemoryShareRepository::new());
    let notifier = Arc::new(LoggingNotifier::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let engine: Arc<dyn BillingApi> = Arc::new(BillingService::new(
        billing_config.clone(),
        config_store,
        directory,
        repository,
        notifier,
        Arc::clone(&clock),
    ));

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let scheduler = BillingScheduler::new(engine, clock, billing_config);
    let handle = scheduler.start(shutdown_rx);
    info!("[runtime] Scheduler running; press ctrl-c to stop");

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("[runtime] Shutdown requested");
    let _ = shutdown_tx.send(true);
    handle.join().await;
    info!("[runtime] Stopped cleanly");
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).context("installing tracing subscriber")
}

/// A handful of members so a fresh checkout produces visible billing
/// activity on the first ticks.
async fn seed_demo_roster(directory: &InMemoryMemberDirectory) {
    let roster = [
        ("Ana Ríos", false, Some("ana.rios@example.com")),
        ("Bruno Gil", true, Some("bruno.gil@example.com")),
        ("Carla Paz", false, None),
    ];
    for (name, discount, email) in roster.iter().copied() {
        directory
            .upsert(Member {
                id: MemberId::new(),
                full_name: name.to_string(),
                active: true,
                has_sibling_discount: discount,
                email: email.map(str::to_string),
            })
            .await;
    }
    info!("[runtime] Seeded demo roster ({} members)", roster.len());
}
