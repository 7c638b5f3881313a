use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::routing::{Decision, RedirectReason};

/// Routing and login counters
#[derive(Clone)]
pub struct Metrics {
    pub bypassed: Arc<AtomicU64>,
    pub forwarded: Arc<AtomicU64>,
    pub locale_redirects: Arc<AtomicU64>,
    pub admin_denied: Arc<AtomicU64>,
    pub logins_succeeded: Arc<AtomicU64>,
    pub logins_failed: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            bypassed: Arc::new(AtomicU64::new(0)),
            forwarded: Arc::new(AtomicU64::new(0)),
            locale_redirects: Arc::new(AtomicU64::new(0)),
            admin_denied: Arc::new(AtomicU64::new(0)),
            logins_succeeded: Arc::new(AtomicU64::new(0)),
            logins_failed: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn record_decision(&self, decision: &Decision) {
        let counter = match decision {
            Decision::Bypass => &self.bypassed,
            Decision::Forward { .. } => &self.forwarded,
            Decision::Redirect { reason: RedirectReason::AdminLogin, .. } => &self.admin_denied,
            Decision::Redirect { .. } => &self.locale_redirects,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_logins_succeeded(&self) {
        self.logins_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_logins_failed(&self) {
        self.logins_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            bypassed: self.bypassed.load(Ordering::Relaxed),
            forwarded: self.forwarded.load(Ordering::Relaxed),
            locale_redirects: self.locale_redirects.load(Ordering::Relaxed),
            admin_denied: self.admin_denied.load(Ordering::Relaxed),
            logins_succeeded: self.logins_succeeded.load(Ordering::Relaxed),
            logins_failed: self.logins_failed.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub bypassed: u64,
    pub forwarded: u64,
    pub locale_redirects: u64,
    pub admin_denied: u64,
    pub logins_succeeded: u64,
    pub logins_failed: u64,
    pub uptime_seconds: u64,
}
