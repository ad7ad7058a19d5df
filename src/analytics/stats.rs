use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

#[derive(Debug, Default)]
pub struct Stats {
    pub admitted_immediately: AtomicU64,
    pub admitted_after_wait: AtomicU64,
    pub cancelled_waits: AtomicU64,
    pub successful_submissions: AtomicU64,
    pub failed_submissions: AtomicU64,

    // Gauge-like: last observed value only
    pub last_wait_ms: AtomicU64,
    pub last_submit_latency_ms: AtomicU64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_admitted(&self, waited: bool) {
        if waited {
            self.admitted_after_wait.fetch_add(1, Ordering::Relaxed);
        } else {
            self.admitted_immediately.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn inc_cancelled(&self) {
        self.cancelled_waits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_successful_submissions(&self) {
        self.successful_submissions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failed_submissions(&self) {
        self.failed_submissions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn update_wait(&self, ms: u64) {
        self.last_wait_ms.store(ms, Ordering::Relaxed);
    }

    pub fn update_submit_latency(&self, ms: u64) {
        self.last_submit_latency_ms.store(ms, Ordering::Relaxed);
    }

    pub fn total_admitted(&self) -> u64 {
        self.admitted_immediately.load(Ordering::Relaxed)
            + self.admitted_after_wait.load(Ordering::Relaxed)
    }

    pub fn log_stats(&self) {
        let immediate = self.admitted_immediately.load(Ordering::Relaxed);
        let delayed = self.admitted_after_wait.load(Ordering::Relaxed);
        let cancelled = self.cancelled_waits.load(Ordering::Relaxed);
        let success = self.successful_submissions.load(Ordering::Relaxed);
        let failed = self.failed_submissions.load(Ordering::Relaxed);
        let wait = self.last_wait_ms.load(Ordering::Relaxed);
        let latency = self.last_submit_latency_ms.load(Ordering::Relaxed);

        info!(
            "STATS: Admitted: {} immediate, {} delayed, {} cancelled | Submissions: {} Success, {} Failed | Last wait {}ms, Submit {}ms",
            immediate, delayed, cancelled, success, failed, wait, latency
        );
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_stats_concurrency() {
        let stats = Arc::new(Stats::new());
        let mut handles = vec![];

        for i in 0..10 {
            let stats = stats.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    stats.inc_admitted(i % 2 == 0);
                    stats.update_wait(50);
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(stats.total_admitted(), 1000);
        assert_eq!(stats.admitted_after_wait.load(Ordering::Relaxed), 500);
        assert_eq!(stats.last_wait_ms.load(Ordering::Relaxed), 50);
    }
}
