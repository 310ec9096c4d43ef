//! Run metrics and structured logging for engine batches.
//!
//! Counters are observability only: evaluation results never read them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Counters collected while evaluating a herd.
pub struct EngineMetrics {
    animals_evaluated: AtomicU64,
    ticks_simulated: AtomicU64,
    fallbacks_applied: AtomicU64,
    alerts_raised: AtomicU64,
    pub counters: Mutex<HashMap<String, AtomicU64>>,
    start_time: Instant,
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            animals_evaluated: AtomicU64::new(0),
            ticks_simulated: AtomicU64::new(0),
            fallbacks_applied: AtomicU64::new(0),
            alerts_raised: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Records one finished animal evaluation.
    pub fn record_animal(&self, ticks: usize, fallbacks: u32, alerts: usize) {
        let evaluated = self.animals_evaluated.fetch_add(1, Ordering::Relaxed) + 1;
        self.ticks_simulated
            .fetch_add(ticks as u64, Ordering::Relaxed);
        self.fallbacks_applied
            .fetch_add(u64::from(fallbacks), Ordering::Relaxed);
        self.alerts_raised
            .fetch_add(alerts as u64, Ordering::Relaxed);

        if evaluated.is_multiple_of(1000) {
            tracing::info!(
                evaluated = evaluated,
                ticks = self.ticks_simulated(),
                elapsed_ms = self.elapsed().as_millis() as u64,
                "Herd evaluation progress"
            );
        }
    }

    /// Increments a named counter.
    pub fn increment_counter(&self, name: &str) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Current value of a named counter (0 if never incremented).
    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    #[must_use]
    pub fn animals_evaluated(&self) -> u64 {
        self.animals_evaluated.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn ticks_simulated(&self) -> u64 {
        self.ticks_simulated.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn fallbacks_applied(&self) -> u64 {
        self.fallbacks_applied.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn alerts_raised(&self) -> u64 {
        self.alerts_raised.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Emits the end-of-batch summary.
    pub fn log_summary(&self) {
        tracing::info!(
            animals = self.animals_evaluated(),
            ticks = self.ticks_simulated(),
            fallbacks = self.fallbacks_applied(),
            alerts = self.alerts_raised(),
            elapsed_ms = self.elapsed().as_millis() as u64,
            "Herd evaluation finished"
        );
    }
}

/// Initialize tracing subscriber for logging. `RUST_LOG` overrides `default_level`.
pub fn init_logging(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .finish(),
    )
    .ok();
}
