//! Periodic store-availability probe backing the offline indicator.
//!
//! The probe runs as a [`ProbeTask`] future owned by whoever observes it and
//! is stopped through its [`AvailabilityMonitor`] handle. Dropping the handle
//! stops every task created from it. The task is executor-agnostic: the
//! caller supplies the sleep function (`tokio::time::sleep` natively,
//! `gloo_timers` in the browser).

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;

use crate::store::MatchStore;

/// Default time between two probes.
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(30);

/// Start/stop handle for availability probes.
pub struct AvailabilityMonitor {
    interval: Duration,
    stop: watch::Sender<bool>,
}

/// A probe loop bound to one [`AvailabilityMonitor`].
pub struct ProbeTask {
    interval: Duration,
    stop: watch::Receiver<bool>,
}

impl AvailabilityMonitor {
    pub fn new(interval: Duration) -> Self {
        let (stop, _) = watch::channel(false);
        Self { interval, stop }
    }

    /// Create a probe loop. Tasks created after [`stop`](Self::stop) exit
    /// immediately.
    pub fn task(&self) -> ProbeTask {
        ProbeTask {
            interval: self.interval,
            stop: self.stop.subscribe(),
        }
    }

    /// Stop every running probe loop.
    pub fn stop(&self) {
        self.stop.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop.borrow()
    }
}

impl ProbeTask {
    /// Probe `store` until stopped, calling `on_change` with the first
    /// result and then whenever availability flips.
    pub async fn run<S, F, Fut, C>(mut self, store: &S, sleep: F, mut on_change: C)
    where
        S: MatchStore,
        F: Fn(Duration) -> Fut,
        Fut: Future<Output = ()>,
        C: FnMut(bool),
    {
        let mut last = None;
        loop {
            if *self.stop.borrow() {
                break;
            }
            let available = store.is_available().await;
            if last != Some(available) {
                last = Some(available);
                on_change(available);
            }
            tokio::select! {
                _ = sleep(self.interval) => {}
                changed = self.stop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::store::MemoryStore;

    fn spawn_probe(
        monitor: &AvailabilityMonitor,
        store: Arc<MemoryStore>,
    ) -> (tokio::task::JoinHandle<()>, Arc<Mutex<Vec<bool>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let task = monitor.task();
        let sink = Arc::clone(&seen);
        let handle = tokio::spawn(async move {
            task.run(&*store, tokio::time::sleep, move |up| {
                sink.lock().unwrap().push(up)
            })
            .await;
        });
        (handle, seen)
    }

    #[tokio::test(start_paused = true)]
    async fn reports_initial_state_and_changes() {
        let store = Arc::new(MemoryStore::new());
        let monitor = AvailabilityMonitor::new(DEFAULT_PROBE_INTERVAL);
        let (handle, seen) = spawn_probe(&monitor, Arc::clone(&store));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(*seen.lock().unwrap(), vec![true]);

        store.set_available(false);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(*seen.lock().unwrap(), vec![true, false]);

        // Unchanged probes are not reported again.
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(*seen.lock().unwrap(), vec![true, false]);

        monitor.stop();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_task() {
        let store = Arc::new(MemoryStore::new());
        let monitor = AvailabilityMonitor::new(Duration::from_secs(5));
        let (handle, _seen) = spawn_probe(&monitor, store);

        tokio::time::sleep(Duration::from_secs(1)).await;
        drop(monitor);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("probe task should stop")
            .unwrap();
    }

    #[tokio::test]
    async fn task_created_after_stop_exits_immediately() {
        let store = MemoryStore::new();
        let monitor = AvailabilityMonitor::new(Duration::from_secs(5));
        monitor.stop();
        assert!(monitor.is_stopped());

        let mut calls = 0;
        monitor
            .task()
            .run(&store, tokio::time::sleep, |_| calls += 1)
            .await;
        assert_eq!(calls, 0);
    }
}
