//! Keyed, cancellable delayed events.
//!
//! Every open question and every computer turn gets a fresh [`TimerKey`]
//! from its board's [`KeyClock`]. Hosts schedule countdown ticks and
//! computer moves on a [`TimerQueue`] under that key; when the event fires
//! the board compares the key against its clock and drops anything that
//! belongs to a round or turn that has since been superseded.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, trace};

/// Generation token identifying one question round or computer turn.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("timer#{}", _0)]
pub struct TimerKey(u64);

/// Issues monotonically increasing [`TimerKey`]s.
#[derive(Debug, Clone, Default)]
pub struct KeyClock {
    current: u64,
}

impl KeyClock {
    /// Creates a clock whose current key matches nothing issued yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidates every earlier key and returns the new current one.
    #[instrument(skip(self), fields(previous = self.current))]
    pub fn advance(&mut self) -> TimerKey {
        self.current += 1;
        TimerKey(self.current)
    }

    /// The most recently issued key.
    pub fn current(&self) -> TimerKey {
        TimerKey(self.current)
    }

    /// Whether `key` is the most recently issued key.
    pub fn is_current(&self, key: TimerKey) -> bool {
        key.0 == self.current
    }
}

/// A delivered timer event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<E> {
    /// Key the event was scheduled under.
    pub key: TimerKey,
    /// Host-defined payload.
    pub event: E,
}

/// Schedules payloads for delivery after a delay.
///
/// Must be used from inside a tokio runtime.
#[derive(Debug)]
pub struct TimerQueue<E> {
    tx: mpsc::UnboundedSender<Fired<E>>,
    rx: mpsc::UnboundedReceiver<Fired<E>>,
    pending: Vec<(TimerKey, JoinHandle<()>)>,
}

impl<E: Send + 'static> TimerQueue<E> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            pending: Vec::new(),
        }
    }

    /// Delivers `event` under `key` once `delay` has elapsed.
    #[instrument(skip(self, event))]
    pub fn schedule(&mut self, key: TimerKey, delay: Duration, event: E) {
        self.prune();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver lives as long as the queue; a send error means it was dropped.
            let _ = tx.send(Fired { key, event });
        });
        self.pending.push((key, handle));
        trace!(pending = self.pending.len(), "Timer scheduled");
    }

    /// Aborts every pending event scheduled under `key`.
    #[instrument(skip(self))]
    pub fn cancel(&mut self, key: TimerKey) {
        let before = self.pending.len();
        self.pending.retain(|(pending_key, handle)| {
            if *pending_key == key {
                handle.abort();
                false
            } else {
                true
            }
        });
        debug!(cancelled = before - self.pending.len(), "Timers cancelled");
    }

    /// Aborts everything pending and drops events already delivered.
    #[instrument(skip(self))]
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.pending.drain(..) {
            handle.abort();
        }
        while self.rx.try_recv().is_ok() {}
        debug!("All timers cancelled");
    }

    /// Number of events scheduled but not yet fired.
    pub fn pending(&mut self) -> usize {
        self.prune();
        self.pending.len()
    }

    /// Waits for the next delivered event.
    pub async fn next(&mut self) -> Option<Fired<E>> {
        let fired = self.rx.recv().await;
        self.prune();
        fired
    }

    fn prune(&mut self) {
        self.pending.retain(|(_, handle)| !handle.is_finished());
    }
}

impl<E: Send + 'static> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Drop for TimerQueue<E> {
    fn drop(&mut self) {
        for (_, handle) in &self.pending {
            handle.abort();
        }
    }
}
