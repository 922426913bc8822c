use tokio::time::{interval, Duration};

use crate::limiter::rate_limiter::RateLimitLedger;

/// Periodically evicts clients whose requests have all left the window.
pub async fn start_ledger_sweep(ledger: RateLimitLedger, every: Duration) {
    let mut interval = interval(every);

    loop {
        interval.tick().await;

        let removed = ledger.sweep();
        if removed > 0 {
            tracing::info!(
                "Rate limit sweep evicted {} clients, {} still tracked",
                removed,
                ledger.tracked_identifiers()
            );
        } else {
            tracing::debug!("Rate limit sweep found nothing to evict");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::limiter::rate_limiter::Clock;

    /// Follows tokio's clock so paused time drives the ledger too.
    struct TokioClock;

    impl Clock for TokioClock {
        fn now(&self) -> std::time::Instant {
            tokio::time::Instant::now().into_std()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_evicts_expired_clients_on_each_interval() {
        let ledger = RateLimitLedger::with_clock(3, Duration::from_secs(60), Arc::new(TokioClock));
        ledger.check_and_record("203.0.113.1");
        let task = tokio::spawn(start_ledger_sweep(ledger.clone(), Duration::from_secs(300)));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(ledger.tracked_identifiers(), 1);

        ledger.check_and_record("203.0.113.2");
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(ledger.tracked_identifiers(), 0);

        task.abort();
    }
}
