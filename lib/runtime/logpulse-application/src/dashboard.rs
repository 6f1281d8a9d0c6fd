//! Shared async handle wiring emitter, engine and analysis together.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use logpulse_domain::{DashboardConfig, LogRecord, Snapshot};
use logpulse_ports::PortSet;

use crate::analysis::{AnalysisError, AnalysisRequestor, AnalysisSink};
use crate::emitter::{Emitter, EmitterHandle};
use crate::engine::Engine;
use crate::subscription::SubscriptionId;

/// Result of [`Dashboard::request_analysis`].
#[derive(Debug)]
pub enum AnalysisTrigger {
    Started(JoinHandle<Result<String, AnalysisError>>),
    AlreadyRunning,
}

impl AnalysisTrigger {
    pub fn is_started(&self) -> bool {
        matches!(self, AnalysisTrigger::Started(_))
    }
}

#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    engine: Arc<Mutex<Engine>>,
    requestor: AnalysisRequestor,
    emitter: Emitter,
    running: Mutex<Option<EmitterHandle>>,
    starts: AtomicU64,
}

// The engine swaps whole snapshots, so a panic elsewhere never leaves it torn.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Dashboard {
    pub fn new(config: DashboardConfig, ports: PortSet) -> Self {
        let engine = Engine::new(&config);
        Self::with_engine(config, ports, engine)
    }

    pub fn with_engine(config: DashboardConfig, ports: PortSet, engine: Engine) -> Self {
        let engine = Arc::new(Mutex::new(engine));
        let sink_engine = Arc::clone(&engine);
        let sink: AnalysisSink = Arc::new(move |state| {
            lock(&sink_engine).set_analysis(state);
        });
        let requestor = AnalysisRequestor::new(ports.summarizer, &config.analysis, sink);
        let emitter = Emitter::new(&config.emitter);

        Self {
            inner: Arc::new(DashboardInner {
                config,
                engine,
                requestor,
                emitter,
                running: Mutex::new(None),
                starts: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Start emitting ticks into the engine. Needs a tokio runtime.
    pub fn start(&self) -> Result<()> {
        let mut running = lock(&self.inner.running);
        if running.is_some() {
            bail!("dashboard emitter is already running");
        }

        let run = self.inner.starts.fetch_add(1, Ordering::Relaxed);
        let rng = match self.inner.config.emitter.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(run)),
            None => StdRng::from_entropy(),
        };
        let engine = Arc::clone(&self.inner.engine);
        let handle = self.inner.emitter.start(rng, move |record, latency_ms| {
            lock(&engine).apply_tick(record, latency_ms);
        });
        *running = Some(handle);

        info!(
            period_ms = self.inner.emitter.period().as_millis() as u64,
            run, "dashboard started"
        );
        Ok(())
    }

    /// Stop the emitter. No tick is applied after this resolves.
    pub async fn stop(&self) {
        let handle = lock(&self.inner.running).take();
        match handle {
            Some(handle) => {
                handle.stop().await;
                info!("dashboard stopped");
            }
            None => warn!("stop requested but the dashboard is not running"),
        }
    }

    pub fn is_running(&self) -> bool {
        lock(&self.inner.running).is_some()
    }

    /// Apply an externally produced event as one tick.
    pub fn ingest(&self, record: LogRecord, latency_ms: f64) -> Arc<Snapshot> {
        lock(&self.inner.engine).apply_tick(record, latency_ms)
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        lock(&self.inner.engine).snapshot()
    }

    /// Callbacks run with the engine locked and must not call back into the
    /// dashboard.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Arc<Snapshot>) + Send + 'static,
    {
        lock(&self.inner.engine).subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        lock(&self.inner.engine).unsubscribe(id)
    }

    pub fn is_analyzing(&self) -> bool {
        self.inner.requestor.is_in_flight()
    }

    /// Summarize the most recent logs in the background.
    ///
    /// The opening state is published before this returns. A trigger that
    /// arrives while a request is in flight is dropped.
    pub fn request_analysis(&self) -> AnalysisTrigger {
        let pending = match self.inner.requestor.begin(&self.recent_logs()) {
            Ok(pending) => pending,
            Err(_) => {
                warn!("analysis already in flight, ignoring trigger");
                return AnalysisTrigger::AlreadyRunning;
            }
        };
        let dashboard = self.clone();
        AnalysisTrigger::Started(tokio::spawn(async move {
            dashboard.inner.requestor.finish(pending).await
        }))
    }

    /// Summarize the most recent logs and wait for the outcome.
    pub async fn analyze(&self) -> Result<String, AnalysisError> {
        let pending = self.inner.requestor.begin(&self.recent_logs())?;
        self.inner.requestor.finish(pending).await
    }

    fn recent_logs(&self) -> Vec<LogRecord> {
        self.snapshot()
            .logs
            .recent(self.inner.requestor.max_records())
    }
}
