use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::analytics::stats::Stats;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::utils::time::elapsed_ms;

// Upper bound on the initial history allocation; large limits grow on demand.
const MAX_PREALLOCATED: usize = 1024;

/// Outcome of one pass through the critical section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    Granted,
    Wait(Duration),
}

/// Sliding-window admission gate.
///
/// At most `limit` admissions are granted in any trailing `window`. Callers
/// over the limit are suspended until the oldest admission ages out, then
/// re-checked. The history lock is only held for the prune/check/append step
/// and never across a sleep.
#[derive(Debug)]
pub struct RateGate {
    limit: u32,
    window: Duration,
    // Admission instants, oldest first
    history: Mutex<VecDeque<Instant>>,
    stats: Arc<Stats>,
}

impl RateGate {
    pub fn new(limit: u32, window: Duration) -> Result<Self> {
        Self::with_stats(limit, window, Arc::new(Stats::new()))
    }

    pub fn with_stats(limit: u32, window: Duration, stats: Arc<Stats>) -> Result<Self> {
        if limit == 0 {
            return Err(AppError::InvalidConfiguration(
                "limit must be greater than zero".into(),
            ));
        }
        if window.is_zero() {
            return Err(AppError::InvalidConfiguration(
                "window must be greater than zero".into(),
            ));
        }

        Ok(Self {
            limit,
            window,
            history: Mutex::new(VecDeque::with_capacity((limit as usize).min(MAX_PREALLOCATED))),
            stats,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.request_limit()?, config.window())
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn stats_handle(&self) -> Arc<Stats> {
        self.stats.clone()
    }

    /// Waits for admission with no way to give up.
    pub async fn acquire(&self) -> Result<()> {
        self.acquire_until(std::future::pending::<()>()).await
    }

    /// Waits for admission, giving up with `Cancelled` after `timeout`.
    pub async fn acquire_timeout(&self, timeout: Duration) -> Result<()> {
        self.acquire_until(tokio::time::sleep(timeout)).await
    }

    /// Waits for admission until `cancel` resolves.
    ///
    /// Cancellation only takes effect while suspended; a caller that finds
    /// free capacity is admitted even if `cancel` is already complete.
    pub async fn acquire_until<C>(&self, cancel: C) -> Result<()>
    where
        C: Future<Output = ()>,
    {
        tokio::pin!(cancel);
        let started = Instant::now();
        let mut waited = false;

        loop {
            let wait = match self.try_admit() {
                Admission::Granted => {
                    self.stats.inc_admitted(waited);
                    if waited {
                        self.stats.update_wait(elapsed_ms(started));
                    }
                    return Ok(());
                }
                Admission::Wait(wait) => wait,
            };

            debug!("Gate saturated ({} per {:?}), waiting {:?}", self.limit, self.window, wait);
            waited = true;

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = &mut cancel => {
                    self.stats.inc_cancelled();
                    return Err(AppError::Cancelled);
                }
            }
        }
    }

    /// Admits without waiting if capacity is free right now.
    pub fn try_acquire(&self) -> bool {
        match self.try_admit() {
            Admission::Granted => {
                self.stats.inc_admitted(false);
                true
            }
            Admission::Wait(_) => false,
        }
    }

    /// Free slots in the window ending now. Does not prune.
    pub fn available(&self) -> u32 {
        let now = Instant::now();
        let history = self.history.lock();
        let in_window = history
            .iter()
            .filter(|&&ts| now.saturating_duration_since(ts) < self.window)
            .count() as u32;
        self.limit.saturating_sub(in_window)
    }

    /// Prune, check and append as one critical section. The clock is read
    /// under the lock so admissions are recorded in order.
    fn try_admit(&self) -> Admission {
        let mut history = self.history.lock();
        let now = Instant::now();
        self.admit_locked(&mut history, now)
    }

    #[cfg(test)]
    fn try_admit_at(&self, now: Instant) -> Admission {
        let mut history = self.history.lock();
        self.admit_locked(&mut history, now)
    }

    fn admit_locked(&self, history: &mut VecDeque<Instant>, now: Instant) -> Admission {
        // History must stay sorted; never record an instant older than the newest entry.
        let now = history.back().map_or(now, |&newest| now.max(newest));

        // The window is (now - window, now]; an entry exactly `window` old has expired.
        while let Some(&oldest) = history.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                history.pop_front();
            } else {
                break;
            }
        }

        if (history.len() as u32) < self.limit {
            history.push_back(now);
            trace!("Admitted ({}/{} in window)", history.len(), self.limit);
            return Admission::Granted;
        }

        // Saturated: the front is the next entry to expire.
        let wait = match history.front() {
            Some(&oldest) => self
                .window
                .saturating_sub(now.saturating_duration_since(oldest)),
            None => Duration::ZERO,
        };
        Admission::Wait(wait)
    }
}
