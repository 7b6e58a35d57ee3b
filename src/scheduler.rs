//! One-second refresh heartbeat

use anyhow::{Context, Result};
use log::{debug, info};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Background thread calling `on_tick` once per period
///
/// Ticks are scheduled against absolute deadlines, so a slow tick does not
/// shift the following ones; if the host stalls past a deadline the missed
/// ticks are dropped rather than replayed. Stops when `on_tick` returns
/// `false`, on [`Heartbeat::stop`], or when dropped.
pub struct Heartbeat {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Heartbeat {
    pub fn start<F>(period: Duration, mut on_tick: F) -> Result<Self>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("heartbeat".to_string())
            .spawn(move || {
                info!("Heartbeat started ({} ms)", period.as_millis());
                let mut deadline = Instant::now() + period;

                loop {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match stop_rx.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }

                    if !on_tick() {
                        debug!("Heartbeat consumer is gone");
                        break;
                    }

                    deadline += period;
                    let now = Instant::now();
                    if deadline <= now {
                        let missed = (now - deadline).as_nanos() / period.as_nanos() + 1;
                        debug!("Heartbeat fell behind, skipping {} tick(s)", missed);
                        deadline = now + period;
                    }
                }
                info!("Heartbeat stopped");
            })
            .context("Failed to spawn heartbeat thread")?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the thread and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_ticks_until_stopped() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();

        let heartbeat = Heartbeat::start(Duration::from_millis(20), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        })
        .unwrap();

        thread::sleep(Duration::from_millis(250));
        assert!(heartbeat.is_running());
        heartbeat.stop();

        let seen = ticks.load(Ordering::SeqCst);
        assert!(seen >= 3, "Expected several ticks, got {seen}");

        thread::sleep(Duration::from_millis(60));
        assert_eq!(ticks.load(Ordering::SeqCst), seen, "No ticks after stop");
    }

    #[test]
    fn test_stops_when_consumer_declines() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();

        let heartbeat = Heartbeat::start(Duration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::SeqCst) < 2
        })
        .unwrap();

        thread::sleep(Duration::from_millis(200));
        assert!(!heartbeat.is_running());
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_stop_is_prompt() {
        let heartbeat = Heartbeat::start(Duration::from_secs(60), || true).unwrap();
        let started = Instant::now();
        heartbeat.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_slow_tick_does_not_burst() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();

        let heartbeat = Heartbeat::start(Duration::from_millis(10), move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                thread::sleep(Duration::from_millis(100));
            }
            true
        })
        .unwrap();

        thread::sleep(Duration::from_millis(150));
        heartbeat.stop();

        // Replaying the ~10 missed deadlines would push this well past 10
        let seen = ticks.load(Ordering::SeqCst);
        assert!(seen <= 10, "Missed ticks were replayed: {seen}");
        assert!(seen >= 2, "Ticking should resume after falling behind: {seen}");
    }
}
