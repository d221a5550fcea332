//! Network reachability monitor.

use std::time::Duration;

use reqwest::Client;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

use crate::domain::ports::ConnectivityPort;

/// Default seconds between reachability probes.
pub const DEFAULT_PROBE_INTERVAL_SECS: u64 = 5;

const PROBE_TIMEOUT_SECS: u64 = 5;

/// Reachability monitor backed by a periodic HTTP HEAD probe.
///
/// Any HTTP response, success or error status, counts as reachable; only a
/// transport failure flips the signal to false. Transitions are published
/// on a watch channel that the feed worker selects on.
pub struct ProbeMonitor {
    tx: watch::Sender<bool>,
    // Dropping this stops the probe task.
    _shutdown: oneshot::Sender<()>,
}

impl ProbeMonitor {
    /// Starts probing `url` every `interval` on the current tokio runtime.
    ///
    /// The signal starts at false and is corrected by the first probe,
    /// which runs immediately.
    ///
    /// # Errors
    /// Returns the underlying error if the probe HTTP client cannot be
    /// built.
    pub fn spawn(url: &str, interval: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
            .build()?;

        let (tx, _rx) = watch::channel(false);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(probe_loop(
            tx.clone(),
            client,
            url.to_owned(),
            interval,
            shutdown_rx,
        ));

        Ok(Self {
            tx,
            _shutdown: shutdown_tx,
        })
    }
}

impl ConnectivityPort for ProbeMonitor {
    fn is_reachable(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

async fn probe_loop(
    tx: watch::Sender<bool>,
    client: Client,
    url: String,
    interval: Duration,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                debug!("Reachability monitor dropped, stopping probes");
                break;
            }
            _ = ticker.tick() => {}
        }

        let reachable = match client.head(&url).send().await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Reachability probe failed");
                false
            }
        };

        let was = *tx.borrow();
        if reachable != was {
            if reachable {
                info!("Network became reachable");
            } else {
                warn!("Network became unreachable");
            }
        }

        tx.send_replace(reachable);
    }
}
