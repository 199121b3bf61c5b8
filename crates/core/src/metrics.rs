// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::snapshot::Category;
use crate::CaptureObserver;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct CaptureMetrics {
    captures: AtomicU64,
    objects: AtomicU64,
    missing: AtomicU64,
    words: AtomicU64,
    dumper_runs: AtomicU64,
    dumper_failures: AtomicU64,
    started: Mutex<Option<Instant>>,
    last_duration: Mutex<Option<Duration>>,
}

impl Default for CaptureMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureMetrics {
    pub fn new() -> Self {
        Self {
            captures: AtomicU64::new(0),
            objects: AtomicU64::new(0),
            missing: AtomicU64::new(0),
            words: AtomicU64::new(0),
            dumper_runs: AtomicU64::new(0),
            dumper_failures: AtomicU64::new(0),
            started: Mutex::new(None),
            last_duration: Mutex::new(None),
        }
    }

    pub fn reset(&self) {
        self.captures.store(0, Ordering::SeqCst);
        self.objects.store(0, Ordering::SeqCst);
        self.missing.store(0, Ordering::SeqCst);
        self.words.store(0, Ordering::SeqCst);
        self.dumper_runs.store(0, Ordering::SeqCst);
        self.dumper_failures.store(0, Ordering::SeqCst);
    }

    pub fn get_captures(&self) -> u64 {
        self.captures.load(Ordering::SeqCst)
    }

    /// Objects captured successfully.
    pub fn get_objects(&self) -> u64 {
        self.objects.load(Ordering::SeqCst)
    }

    pub fn get_missing(&self) -> u64 {
        self.missing.load(Ordering::SeqCst)
    }

    pub fn get_words(&self) -> u64 {
        self.words.load(Ordering::SeqCst)
    }

    pub fn get_dumper_runs(&self) -> u64 {
        self.dumper_runs.load(Ordering::SeqCst)
    }

    pub fn get_dumper_failures(&self) -> u64 {
        self.dumper_failures.load(Ordering::SeqCst)
    }

    /// Wall time of the most recently finished capture.
    pub fn last_duration(&self) -> Option<Duration> {
        self.last_duration.lock().ok().and_then(|d| *d)
    }
}

impl CaptureObserver for CaptureMetrics {
    fn on_capture_start(&self) {
        self.captures.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut started) = self.started.lock() {
            *started = Some(Instant::now());
        }
    }

    fn on_capture_stop(&self) {
        let started = self.started.lock().ok().and_then(|mut s| s.take());
        if let (Some(started), Ok(mut last)) = (started, self.last_duration.lock()) {
            *last = Some(started.elapsed());
        }
    }

    fn on_object(&self, _category: Category, captured: bool, words: usize) {
        if captured {
            self.objects.fetch_add(1, Ordering::SeqCst);
            self.words.fetch_add(words as u64, Ordering::SeqCst);
        } else {
            self.missing.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn on_dumper_run(&self, ok: bool) {
        self.dumper_runs.fetch_add(1, Ordering::SeqCst);
        if !ok {
            self.dumper_failures.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_objects_and_runs() {
        let metrics = CaptureMetrics::new();
        metrics.on_capture_start();
        metrics.on_object(Category::Registers, true, 12);
        metrics.on_object(Category::Clusters, false, 0);
        metrics.on_dumper_run(true);
        metrics.on_dumper_run(false);
        metrics.on_capture_stop();

        assert_eq!(metrics.get_captures(), 1);
        assert_eq!(metrics.get_objects(), 1);
        assert_eq!(metrics.get_missing(), 1);
        assert_eq!(metrics.get_words(), 12);
        assert_eq!(metrics.get_dumper_runs(), 2);
        assert_eq!(metrics.get_dumper_failures(), 1);
        assert!(metrics.last_duration().is_some());

        metrics.reset();
        assert_eq!(metrics.get_words(), 0);
    }
}
