//! Counters for a synchronization run.
//!
//! Translation tasks run concurrently inside a KeyFile, so counters are
//! atomics that can be recorded through a shared reference.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-run synchronization metrics.
#[derive(Debug, Default)]
pub struct SyncMetrics {
    /// Keys that already had a value in the target file
    keys_present: AtomicUsize,

    /// Keys filled with an accepted translation
    keys_translated: AtomicUsize,

    /// Keys filled with the reference text
    fallbacks: AtomicUsize,

    /// Responses rejected as apologies or refusals
    refusals: AtomicUsize,

    /// Requests that failed outright or returned nothing usable
    request_failures: AtomicUsize,

    /// KeyFiles written to disk
    files_written: AtomicUsize,
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_present(&self) {
        self.keys_present.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_translated(&self) {
        self.keys_translated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_refusal(&self) {
        self.refusals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_request_failure(&self) {
        self.request_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_file_written(&self) {
        self.files_written.fetch_add(1, Ordering::Relaxed);
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let translated = self.keys_translated.load(Ordering::Relaxed);
        let fallbacks = self.fallbacks.load(Ordering::Relaxed);
        let filled = translated + fallbacks;
        let translation_success_rate = if filled > 0 {
            (translated as f64 / filled as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            keys_present: self.keys_present.load(Ordering::Relaxed),
            keys_translated: translated,
            fallbacks,
            refusals: self.refusals.load(Ordering::Relaxed),
            request_failures: self.request_failures.load(Ordering::Relaxed),
            files_written: self.files_written.load(Ordering::Relaxed),
            translation_success_rate,
        }
    }
}

/// Snapshot of [`SyncMetrics`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub keys_present: usize,
    pub keys_translated: usize,
    pub fallbacks: usize,
    pub refusals: usize,
    pub request_failures: usize,
    pub files_written: usize,

    /// Share of filled keys that got a real translation, as a percentage (0-100)
    pub translation_success_rate: f64,
}

impl MetricsReport {
    /// Keys added to target files during the run
    pub fn keys_filled(&self) -> usize {
        self.keys_translated + self.fallbacks
    }
}
