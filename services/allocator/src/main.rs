//! droidfarm Allocator
//!
//! Smoke harness for the allocation coordinator: wires the mock device
//! cloud and drives one full allocate/deallocate cycle. Real cloud
//! transports are injected by the embedding test runner; this binary exists
//! to exercise the wiring end to end.
//!
//! Configuration comes from `DROIDFARM_*` environment variables; see
//! `config.rs`.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use droidfarm_allocator::cleanup::CleanupRegistry;
use droidfarm_allocator::config::Config;
use droidfarm_allocator::registry::DeviceRegistry;
use droidfarm_allocator::{AllocationCoordinator, MockDeviceCloud, Recipe};
use droidfarm_events::{DeviceEvent, Emitter, EventError, EventSubscriber};
use droidfarm_id::RecipeUuid;

/// Logs every emitted device event.
struct LoggingSubscriber;

#[async_trait]
impl EventSubscriber for LoggingSubscriber {
    async fn handle(&self, event: &DeviceEvent) -> Result<(), EventError> {
        let payload = event.payload_json()?;
        info!(event = event.name(), payload = %payload, "Device event");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting droidfarm allocator");

    let config = Config::from_env()?;
    info!(
        cleanup_ledger = %config.cleanup_ledger_path,
        readiness_retries = config.readiness_retries,
        "Configuration loaded"
    );

    // Mock cloud for now; instances come online after two polls.
    let cloud = Arc::new(MockDeviceCloud::new().with_boot_polls(2));

    let registry = Arc::new(DeviceRegistry::new());
    let cleanup = Arc::new(CleanupRegistry::load(&config.cleanup_ledger_path).await);
    let emitter = Arc::new(Emitter::new());
    emitter.subscribe(Arc::new(LoggingSubscriber)).await;

    let coordinator = AllocationCoordinator::new(
        Arc::clone(&cloud),
        Arc::clone(&cloud),
        Arc::clone(&registry),
        Arc::clone(&cleanup),
        emitter,
        config.readiness_policy(),
    );

    let recipe = Recipe::new(RecipeUuid::new(), "Pixel", "smoke-cycle recipe");

    let instance = coordinator.allocate_device(&recipe).await?;
    info!(
        uuid = %instance.uuid,
        adb_name = %instance.adb_name,
        "Device allocated"
    );

    coordinator.deallocate_device(&instance).await?;
    info!(uuid = %instance.uuid, "Device deallocated");

    info!(
        pending_cleanup = cleanup.registered().await.len(),
        "Smoke cycle complete"
    );
    Ok(())
}
