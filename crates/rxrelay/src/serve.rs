// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rxrelay serve`: wires adapters, the conversation engine, and the gateway,
//! then runs until a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;
use rxrelay_config::RxRelayConfig;
use rxrelay_conversation::{ConversationEngine, ConversationStore, QueueCounter, SystemClock};
use rxrelay_core::{ChatSender, HealthStatus, Ledger, PluginAdapter, RxRelayError};
use rxrelay_gateway::{AuthConfig, GatewayState, HealthState, ServerConfig};
use rxrelay_whatsapp::WhatsAppSender;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::shutdown;

type RenderFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Runs the relay until SIGINT/SIGTERM.
pub async fn run_serve(config: RxRelayConfig) -> Result<(), RxRelayError> {
    init_tracing(&config.bot.log_level);
    info!(name = %config.bot.name, "starting rxrelay");

    let prometheus_render = if config.metrics.enabled {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| RxRelayError::Internal(format!("failed to install metrics recorder: {e}")))?;
        rxrelay_conversation::metrics::register_metrics();
        info!("prometheus metrics enabled");
        Some(Arc::new(move || handle.render()) as RenderFn)
    } else {
        debug!("prometheus metrics disabled by configuration");
        None
    };

    let sender: Arc<dyn ChatSender> = Arc::new(WhatsAppSender::new(&config.whatsapp)?);
    report_health(sender.as_ref()).await;

    let ledger: Arc<dyn Ledger> = rxrelay_ledger::open_ledger(&config.ledger).await?;
    report_health(ledger.as_ref()).await;

    if config.bot.allowed_senders.is_empty() {
        warn!("bot.allowed_senders is empty; every inbound message will be ignored");
    }

    let store = Arc::new(ConversationStore::new());
    let counter = Arc::new(QueueCounter::new(Arc::new(SystemClock)));
    let engine = Arc::new(ConversationEngine::new(
        &config,
        sender.clone(),
        ledger.clone(),
        store,
        counter,
    ));

    let cancel = shutdown::install_signal_handler();

    {
        let mem_cancel = cancel.clone();
        tokio::spawn(async move {
            memory_monitor(mem_cancel).await;
        });
    }

    let state = GatewayState {
        engine,
        sender: sender.clone(),
        auth: AuthConfig::new(config.gateway.send_token.clone()),
        health: HealthState::new(prometheus_render),
        tasks: TaskTracker::new(),
    };
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
        webhook_path: config.gateway.webhook_path.clone(),
    };

    rxrelay_gateway::start_server(&server_config, state, cancel.clone()).await?;
    cancel.cancel();

    shutdown_adapter(sender.as_ref()).await;
    shutdown_adapter(ledger.as_ref()).await;

    info!("rxrelay serve shutdown complete");
    Ok(())
}

/// Logs an adapter's health at startup. Never fatal.
async fn report_health<A: PluginAdapter + ?Sized>(adapter: &A) {
    match adapter.health_check().await {
        Ok(HealthStatus::Healthy) => {
            info!(adapter = adapter.name(), kind = %adapter.adapter_type(), "adapter healthy");
        }
        Ok(HealthStatus::Degraded(reason)) | Ok(HealthStatus::Unhealthy(reason)) => {
            warn!(adapter = adapter.name(), reason = %reason, "adapter not healthy at startup");
        }
        Err(e) => {
            warn!(adapter = adapter.name(), error = %e, "adapter health check failed");
        }
    }
}

async fn shutdown_adapter<A: PluginAdapter + ?Sized>(adapter: &A) {
    if let Err(e) = adapter.shutdown().await {
        warn!(adapter = adapter.name(), error = %e, "adapter shutdown failed");
    }
}

/// Exports jemalloc heap and resident sizes every 30 seconds.
#[cfg(not(target_env = "msvc"))]
async fn memory_monitor(cancel: CancellationToken) {
    metrics::describe_gauge!("rxrelay_memory_heap_bytes", "Bytes allocated by jemalloc");
    metrics::describe_gauge!("rxrelay_memory_resident_bytes", "Bytes resident per jemalloc");

    let mut interval = tokio::time::interval(Duration::from_secs(30));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let _ = tikv_jemalloc_ctl::epoch::advance();
                let allocated = tikv_jemalloc_ctl::stats::allocated::read().unwrap_or(0);
                let resident = tikv_jemalloc_ctl::stats::resident::read().unwrap_or(0);
                metrics::gauge!("rxrelay_memory_heap_bytes").set(allocated as f64);
                metrics::gauge!("rxrelay_memory_resident_bytes").set(resident as f64);
            }
            _ = cancel.cancelled() => {
                debug!("memory monitor shutting down");
                break;
            }
        }
    }
}

#[cfg(target_env = "msvc")]
async fn memory_monitor(cancel: CancellationToken) {
    cancel.cancelled().await;
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rxrelay={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
