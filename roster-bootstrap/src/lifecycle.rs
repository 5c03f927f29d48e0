use std::time::Duration;

use anyhow::Result;
use tracing::{error, info, warn};

use roster_application::{fetch_roster, flush_watermark, run_scan_once};
use roster_infrastructure::{render_roster, AppConfig, JsonRosterRepository};

use crate::context::AppContext;

/// Scan forever at a fixed interval. Scan-level failures are logged and the
/// loop keeps going; the shutdown signal is observed only between scans and
/// flushes the watermark before exit.
pub async fn run_daemon() -> Result<()> {
    let context = AppContext::new().await?;
    let state = context.state;
    info!(
        log_path = %state.config.log_path,
        interval_seconds = state.config.scan_interval_seconds,
        "roster daemon started"
    );

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        match run_scan_once(&state).await {
            Ok(report) => {
                info!(
                    lines = report.lines_scanned,
                    observations = report.observations,
                    created = report.stats.created,
                    merged = report.stats.merged,
                    sessions = report.stats.sessions_counted,
                    stopped_at_watermark = report.stopped_at_watermark,
                    "scan completed"
                );
            }
            Err(err) => {
                state.metrics.record_scan_failure();
                error!("scan failed: {err:#}");
            }
        }

        tokio::select! {
            _ = &mut shutdown => {
                if let Err(err) = flush_watermark(&state).await {
                    warn!("watermark flush on shutdown failed: {err:#}");
                }
                let totals = state.metrics.snapshot();
                info!(
                    scans = totals.scans_completed,
                    failed = totals.scans_failed,
                    players = totals.players_created,
                    "shutdown signal received, exiting"
                );
                return Ok(());
            }
            _ = tokio::time::sleep(Duration::from_secs(state.config.scan_interval_seconds)) => {}
        }
    }
}

/// Listing mode: read the stored roster and print it, no scanning and no
/// resolver involved.
pub async fn run_list() -> Result<()> {
    let config = AppConfig::load().await?;
    let runtime_config = config.to_runtime_config();
    let repo = JsonRosterRepository::new(&runtime_config.roster_path);

    let players = fetch_roster(&repo).await?;
    print!("{}", render_roster(&players));
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("sigterm handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
