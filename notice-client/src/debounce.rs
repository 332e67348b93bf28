//! Async debouncer for raw search input.
//!
//! Wraps the pure [`DebounceState`] in a tokio task. Raw values go in through
//! a [`DebounceHandle`]; stable values come out of [`Debounced`], at most one
//! per quiet period.
//!
//! ```text
//! DebounceHandle ──mpsc──▶ pump task (DebounceState + sleep_until) ──mpsc──▶ Debounced
//! ```
//!
//! The pump exits once every handle has been dropped, after emitting any
//! value still waiting for its quiet period. A pump started with
//! [`Debouncer::start_with`] treats its initial value as the first change.

use futures_util::stream::{self, Stream};
use notice_core::DebounceState;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use crate::orchestrator::ClientError;

/// Spawner for debounce pump tasks.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    quiet: Duration,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period.
    pub fn new(quiet: Duration) -> Self {
        Self { quiet }
    }

    /// The configured quiet period.
    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Spawn a pump task with the given quiet period.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(quiet: Duration) -> (DebounceHandle, Debounced) {
        Self::new(quiet).start()
    }

    /// Spawn the pump task for this debouncer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self) -> (DebounceHandle, Debounced) {
        self.launch(DebounceState::new(self.quiet))
    }

    /// Spawn the pump task with `initial` already observed.
    ///
    /// The initial value is emitted once the first quiet period has passed,
    /// unless a change arrives before then.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_with(self, initial: impl Into<String>) -> (DebounceHandle, Debounced) {
        let mut state = DebounceState::new(self.quiet);
        state.observe(initial, Instant::now());
        self.launch(state)
    }

    fn launch(self, state: DebounceState<Instant>) -> (DebounceHandle, Debounced) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();

        tokio::spawn(pump(state, input_rx, output_tx));

        (
            DebounceHandle { tx: input_tx },
            Debounced { rx: output_rx },
        )
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(notice_core::DEFAULT_QUIET_PERIOD)
    }
}

async fn pump(
    mut state: DebounceState<Instant>,
    mut input: mpsc::UnboundedReceiver<String>,
    output: mpsc::UnboundedSender<String>,
) {
    loop {
        let deadline = state.deadline();
        tokio::select! {
            received = input.recv() => match received {
                Some(value) => {
                    state.observe(value, Instant::now());
                }
                None => break,
            },
            _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some(value) = state.poll(Instant::now()) {
                    if output.send(value).is_err() {
                        // Nobody is listening any more
                        return;
                    }
                }
            }
        }
    }

    // Never drop the final value of a burst
    if let Some(value) = state.flush() {
        let _ = output.send(value);
    }
}

/// Sending side of a debouncer. Cheap to clone.
#[derive(Debug, Clone)]
pub struct DebounceHandle {
    tx: mpsc::UnboundedSender<String>,
}

impl DebounceHandle {
    /// Report a change to the raw input.
    ///
    /// Fails with [`ClientError::SessionClosed`] once the pump has stopped.
    pub fn observe(&self, value: impl Into<String>) -> Result<(), ClientError> {
        self.tx
            .send(value.into())
            .map_err(|_| ClientError::SessionClosed)
    }

    /// Check whether the pump task has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving side of a debouncer.
#[derive(Debug)]
pub struct Debounced {
    rx: mpsc::UnboundedReceiver<String>,
}

impl Debounced {
    /// Wait for the next stable value.
    ///
    /// Returns `None` once the pump has stopped and every value was received.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Convert into a stream of stable values.
    pub fn into_stream(self) -> impl Stream<Item = String> {
        stream::unfold(self, |mut debounced| async move {
            debounced.recv().await.map(|value| (value, debounced))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_emits_last_value_once() {
        let (handle, mut debounced) = Debouncer::spawn(ms(500));

        for value in ["R", "Ro", "Roa", "Road"] {
            handle.observe(value).unwrap();
            time::sleep(ms(100)).await;
        }

        assert_eq!(debounced.recv().await, Some("Road".to_string()));

        // Nothing else is pending
        drop(handle);
        assert_eq!(debounced.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_full_quiet_period() {
        let (handle, mut debounced) = Debouncer::spawn(ms(500));
        let start = Instant::now();

        handle.observe("Road").unwrap();
        handle.observe("Roads").unwrap();

        assert_eq!(debounced.recv().await, Some("Roads".to_string()));
        assert!(start.elapsed() >= ms(500));
    }

    #[tokio::test(start_paused = true)]
    async fn separate_quiet_periods_emit_separately() {
        let (handle, mut debounced) = Debouncer::spawn(ms(500));

        handle.observe("Road").unwrap();
        time::sleep(ms(600)).await;
        handle.observe("").unwrap();

        assert_eq!(debounced.recv().await, Some("Road".to_string()));
        assert_eq!(debounced.recv().await, Some(String::new()));
    }

    #[tokio::test(start_paused = true)]
    async fn unseeded_pump_emits_nothing_without_input() {
        let (handle, mut debounced) = Debouncer::spawn(ms(500));

        time::sleep(ms(2_000)).await;
        drop(handle);

        assert_eq!(debounced.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn initial_value_emitted_after_first_quiet_period() {
        let start = Instant::now();
        let (_handle, mut debounced) = Debouncer::new(ms(500)).start_with("");

        assert!(time::timeout(ms(499), debounced.recv()).await.is_err());
        assert_eq!(debounced.recv().await, Some(String::new()));
        assert!(start.elapsed() >= ms(500));
    }

    #[tokio::test(start_paused = true)]
    async fn typing_before_first_quiet_period_replaces_initial_value() {
        let (handle, mut debounced) = Debouncer::new(ms(500)).start_with("");

        time::sleep(ms(300)).await;
        handle.observe("Road").unwrap();
        drop(handle);

        assert_eq!(debounced.recv().await, Some("Road".to_string()));
        assert_eq!(debounced.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn closing_flushes_pending_value() {
        let (handle, mut debounced) = Debouncer::spawn(ms(500));

        handle.observe("Road").unwrap();
        drop(handle);

        assert_eq!(debounced.recv().await, Some("Road".to_string()));
        assert_eq!(debounced.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn observe_fails_after_receiver_dropped() {
        let (handle, debounced) = Debouncer::spawn(ms(10));
        drop(debounced);

        // The pump notices the closed output on its next emission
        handle.observe("a").unwrap();
        time::sleep(ms(50)).await;

        assert!(handle.is_closed());
        assert!(matches!(
            handle.observe("b"),
            Err(ClientError::SessionClosed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn stream_yields_debounced_values() {
        let (handle, debounced) = Debouncer::default().start();

        tokio::spawn(async move {
            handle.observe("a").unwrap();
            handle.observe("ab").unwrap();
            time::sleep(ms(1_000)).await;
            handle.observe("abc").unwrap();
        });

        let values: Vec<String> = debounced.into_stream().collect().await;
        assert_eq!(values, vec!["ab".to_string(), "abc".to_string()]);
    }
}
