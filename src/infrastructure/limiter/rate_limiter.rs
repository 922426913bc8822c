use std::{
    collections::VecDeque,
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;

/// Time source for the ledger, replaceable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Outcome of a rate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Request recorded; `remaining` more are allowed in the current window.
    Accepted { remaining: usize },
    /// Nothing recorded. The oldest request leaves the window after `retry_after`.
    Rejected { retry_after: Duration },
}

impl RateDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RateDecision::Accepted { .. })
    }
}

/// Sliding window log of request timestamps per client identifier.
///
/// A request is accepted when fewer than `max_requests` timestamps for the
/// identifier fall inside the trailing `window`. Only accepted requests are
/// recorded. Memory only; state is lost on restart.
#[derive(Clone)]
pub struct RateLimitLedger {
    entries: Arc<DashMap<String, VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl RateLimitLedger {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self::with_clock(max_requests, window, Arc::new(SystemClock))
    }

    pub fn with_clock(max_requests: usize, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            max_requests,
            window,
            clock,
        }
    }

    pub fn check_and_record(&self, identifier: &str) -> RateDecision {
        let now = self.clock.now();
        let mut timestamps = self.entries.entry(identifier.to_string()).or_default();

        prune(&mut timestamps, now, self.window);

        if timestamps.len() < self.max_requests {
            timestamps.push_back(now);
            RateDecision::Accepted {
                remaining: self.max_requests - timestamps.len(),
            }
        } else {
            let oldest = timestamps.front().copied().unwrap_or(now);
            let left = self.window.saturating_sub(now.duration_since(oldest));
            RateDecision::Rejected {
                retry_after: left.max(Duration::from_secs(1)),
            }
        }
    }

    /// Prunes every identifier and drops the ones left without timestamps.
    /// Returns the number of identifiers removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();

        self.entries.retain(|_, timestamps| {
            prune(timestamps, now, self.window);
            !timestamps.is_empty()
        });

        before.saturating_sub(self.entries.len())
    }

    pub fn tracked_identifiers(&self) -> usize {
        self.entries.len()
    }

    /// Timestamps currently recorded for `identifier`, without pruning.
    pub fn recorded(&self, identifier: &str) -> usize {
        self.entries.get(identifier).map_or(0, |t| t.len())
    }
}

fn prune(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&oldest) = timestamps.front() {
        if now.duration_since(oldest) >= window {
            timestamps.pop_front();
        } else {
            break;
        }
    }
}
