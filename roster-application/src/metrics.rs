use std::sync::atomic::{AtomicU64, Ordering};

use roster_domain::MergeStats;

#[derive(Debug, Default)]
pub struct Metrics {
    scans_completed: AtomicU64,
    scans_failed: AtomicU64,
    players_created: AtomicU64,
    observations_merged: AtomicU64,
    sessions_counted: AtomicU64,
}

impl Metrics {
    pub fn record_scan(&self, stats: &MergeStats) {
        self.scans_completed.fetch_add(1, Ordering::Relaxed);
        self.players_created
            .fetch_add(stats.created as u64, Ordering::Relaxed);
        self.observations_merged
            .fetch_add((stats.created + stats.merged) as u64, Ordering::Relaxed);
        self.sessions_counted
            .fetch_add(stats.sessions_counted as u64, Ordering::Relaxed);
    }

    pub fn record_scan_failure(&self) {
        self.scans_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            scans_completed: self.scans_completed.load(Ordering::Relaxed),
            scans_failed: self.scans_failed.load(Ordering::Relaxed),
            players_created: self.players_created.load(Ordering::Relaxed),
            observations_merged: self.observations_merged.load(Ordering::Relaxed),
            sessions_counted: self.sessions_counted.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub scans_completed: u64,
    pub scans_failed: u64,
    pub players_created: u64,
    pub observations_merged: u64,
    pub sessions_counted: u64,
}
