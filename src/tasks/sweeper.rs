//! Expiry Sweeper Task
//!
//! Background task that periodically removes expired entries from a store.

use std::hash::Hash;
use std::sync::Weak;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::error::{CacheError, Result};

// == Sweeper ==
/// Handle to a running sweep task.
///
/// The task sweeps its store once per period until it is stopped or the
/// store has been dropped. A tick that finds the store locked is skipped
/// rather than waited out, so the sweeper never parks a runtime worker
/// behind a caller holding an `entries()` view. A sweeper is stopped at
/// most once; a second stop request is a teardown bug and panics.
#[derive(Debug)]
pub struct Sweeper {
    /// One-shot stop signal, None once sent
    stop_tx: Option<oneshot::Sender<()>>,
    /// Handle of the spawned task
    handle: JoinHandle<()>,
}

impl Sweeper {
    // == Spawn ==
    /// Spawns a sweep task on the current Tokio runtime.
    ///
    /// The task holds only a weak reference to the store, so it never keeps
    /// the store alive and exits by itself once the store is gone.
    ///
    /// # Errors
    /// Returns `CacheError::NoRuntime` when called outside a Tokio runtime.
    pub(crate) fn spawn<K, V>(store: Weak<CacheStore<K, V>>, period: Duration) -> Result<Self>
    where
        K: Eq + Hash + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        debug_assert!(!period.is_zero(), "sweep period must be non-zero");

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| CacheError::NoRuntime)?;
        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = runtime.spawn(run(store, period, stop_rx));

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle,
        })
    }

    // == Stop ==
    /// Signals the task to stop.
    ///
    /// # Panics
    /// Panics if the sweeper has already been stopped.
    pub(crate) fn stop(&mut self) {
        let Some(stop_tx) = self.stop_tx.take() else {
            panic!("sweeper stopped twice");
        };

        if stop_tx.send(()).is_err() {
            warn!("Sweeper task had already exited before stop");
        }
    }

    /// Returns true once a stop signal has been sent.
    pub fn is_stopped(&self) -> bool {
        self.stop_tx.is_none()
    }

    /// Returns true once the task has terminated.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Sweep loop: one pass per tick until stopped or the store is dropped.
async fn run<K, V>(store: Weak<CacheStore<K, V>>, period: Duration, mut stop_rx: oneshot::Receiver<()>)
where
    K: Eq + Hash,
{
    info!("Starting sweeper with period of {:?}", period);

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; wait a full period before sweeping
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(store) = store.upgrade() else {
                    debug!("Sweeper: store dropped, exiting");
                    break;
                };

                match store.try_sweep() {
                    Some(0) => debug!("Sweep: no expired entries found"),
                    Some(removed) => info!("Sweep: removed {} expired entries", removed),
                    None => debug!("Sweep: store locked, skipping this tick"),
                }
            }
            _ = &mut stop_rx => {
                break;
            }
        }
    }

    info!("Sweeper stopped");
}
