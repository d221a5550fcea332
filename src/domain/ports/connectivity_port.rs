//! Port definition for network reachability.

use tokio::sync::watch;

/// Port for observing network reachability as a boolean signal.
///
/// The feed subscribes to the signal: a false-to-true transition releases
/// a deferred initial fetch, a true-to-false transition surfaces a
/// network-unavailable notice. In-flight requests are never cancelled by a
/// transition.
pub trait ConnectivityPort: Send + Sync {
    /// Current reachability status.
    fn is_reachable(&self) -> bool;

    /// Subscribes to reachability transitions.
    fn subscribe(&self) -> watch::Receiver<bool>;
}
