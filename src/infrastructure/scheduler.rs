//! Background runner for regular payments.
//!
//! Ticks on a fixed interval and records every due occurrence.

use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval};

use crate::infrastructure::AppState;
use crate::services::regular_payment_service::process_due_payments;

/// Starts the regular payment runner; `None` when the interval is 0.
pub fn start_regular_payment_scheduler(state: AppState, interval_secs: u64) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        tracing::info!("Regular payment scheduler disabled");
        return None;
    }

    Some(tokio::spawn(async move {
        tracing::info!("Regular payment scheduler started ({}s interval)", interval_secs);

        // First tick is immediate, so payments missed while offline are caught up at boot
        let mut ticker = interval(Duration::from_secs(interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            run_once(&state).await;
        }
    }))
}

async fn run_once(state: &AppState) {
    let today = chrono::Local::now().date_naive();
    match process_due_payments(state, today).await {
        Ok(report) if report.transactions == 0 => {
            tracing::debug!("No regular payments due on {}", today);
        }
        Ok(report) => tracing::info!(
            "Scheduled run recorded {} transaction(s) from {} template(s)",
            report.transactions,
            report.templates
        ),
        Err(e) => tracing::warn!("Scheduled regular payment run failed: {}", e),
    }
}
