//! Background sweep that marks pending quotes past their expiry as expired.

use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::main_lib::AppState;

/// Starts the quote expiry sweep. The first tick runs immediately.
pub fn start_quote_expiry_scheduler(state: Arc<AppState>, every: Duration) {
    tokio::spawn(async move {
        info!("Quote expiry sweep started ({}s interval)", every.as_secs());

        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            run_quote_sweep(&state).await;
        }
    });
}

/// Runs a single sweep.
pub async fn run_quote_sweep(state: &AppState) {
    match state.points_service.expire_stale_quotes().await {
        Ok(0) => debug!("Quote sweep: nothing to expire"),
        Ok(count) => info!("Quote sweep expired {} quote(s)", count),
        Err(e) => warn!("Quote sweep failed: {}", e),
    }
}
