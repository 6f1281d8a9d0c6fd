//! Fixed-cadence synthetic event source.

use std::time::Duration;

use chrono::Utc;
use rand::RngCore;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, trace, warn};

use logpulse_domain::{EmitterConfig, LogRecord};

use crate::generator::LogGenerator;

#[derive(Debug, Clone)]
pub struct Emitter {
    period: Duration,
    generator: LogGenerator,
}

impl Emitter {
    pub fn new(config: &EmitterConfig) -> Self {
        Self {
            period: config.interval().max(Duration::from_millis(1)),
            generator: LogGenerator::new(config),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawn the tick loop on the current tokio runtime.
    ///
    /// `on_tick` runs once per period with a fresh record and latency draw,
    /// the first call one full period after start. Each call starts from tick
    /// zero, so a restarted emitter carries nothing over from a previous run.
    /// Dropping the returned handle without calling [`EmitterHandle::stop`]
    /// leaves the loop running.
    pub fn start<R, F>(&self, mut rng: R, mut on_tick: F) -> EmitterHandle
    where
        R: RngCore + Send + 'static,
        F: FnMut(LogRecord, f64) + Send + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let generator = self.generator.clone();
        let period = self.period;

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut ticks: u64 = 0;
            loop {
                tokio::select! {
                    biased;
                    Ok(()) = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        let record = generator.record(&mut rng, Utc::now());
                        let latency_ms = generator.latency(&mut rng);
                        ticks += 1;
                        trace!(
                            tick = ticks,
                            level = %record.level,
                            service = %record.service,
                            "emitting"
                        );
                        on_tick(record, latency_ms);
                    }
                }
            }
            debug!(ticks, "emitter loop exited");
        });

        EmitterHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Running emitter. [`EmitterHandle::stop`] is the only way to halt it.
#[derive(Debug)]
pub struct EmitterHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl EmitterHandle {
    /// Halt the loop and wait for it to exit.
    ///
    /// Once this resolves no further tick callback will run.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.task.await {
            warn!("emitter task ended abnormally: {err}");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::{Arc, Mutex};

    fn config(interval_ms: u64) -> EmitterConfig {
        EmitterConfig {
            interval_ms,
            ..EmitterConfig::default()
        }
    }

    fn collector() -> (Arc<Mutex<Vec<(LogRecord, f64)>>>, impl FnMut(LogRecord, f64) + Send) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |record, latency| {
            sink.lock().unwrap().push((record, latency));
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_tick_per_period() {
        let emitter = Emitter::new(&config(1000));
        let (seen, on_tick) = collector();
        let handle = emitter.start(StdRng::seed_from_u64(1), on_tick);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(seen.lock().unwrap().len(), 3);

        handle.stop().await;
        for (_, latency) in seen.lock().unwrap().iter() {
            assert!((50.0..=500.0).contains(latency));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ticks_after_stop() {
        let emitter = Emitter::new(&config(100));
        let (seen, on_tick) = collector();
        let handle = emitter.start(StdRng::seed_from_u64(2), on_tick);

        tokio::time::sleep(Duration::from_millis(550)).await;
        handle.stop().await;
        let stopped_at = seen.lock().unwrap().len();
        assert_eq!(stopped_at, 5);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(seen.lock().unwrap().len(), stopped_at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_is_a_fresh_sequence() {
        let emitter = Emitter::new(&config(100));

        let (first, on_tick) = collector();
        let handle = emitter.start(StdRng::seed_from_u64(9), on_tick);
        tokio::time::sleep(Duration::from_millis(350)).await;
        handle.stop().await;

        let (second, on_tick) = collector();
        let handle = emitter.start(StdRng::seed_from_u64(10), on_tick);
        tokio::time::sleep(Duration::from_millis(250)).await;
        handle.stop().await;

        assert_eq!(first.lock().unwrap().len(), 3);
        assert_eq!(second.lock().unwrap().len(), 2);
        let first_ids: Vec<_> = first.lock().unwrap().iter().map(|(r, _)| r.id).collect();
        assert!(
            second
                .lock()
                .unwrap()
                .iter()
                .all(|(r, _)| !first_ids.contains(&r.id))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handle_keeps_running() {
        let emitter = Emitter::new(&config(100));
        let (seen, on_tick) = collector();
        drop(emitter.start(StdRng::seed_from_u64(4), on_tick));

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(seen.lock().unwrap().len(), 3);
    }
}
