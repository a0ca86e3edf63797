//! Cycle scheduling.
//!
//! The bot alternates between two phases: running a cycle, and sleeping until
//! the next one. A completed cycle sleeps for the full cycle interval; an
//! aborted one sleeps only the shorter retry interval. Both phases race the
//! shutdown future, so a signal ends the loop immediately instead of waiting
//! out a multi-hour sleep or an in-flight request. A fatal error ends the loop
//! as well and is handed back to the caller.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use mentionrelay_core::Profile;

use crate::cycle::CycleReport;
use crate::error::BotError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub cycle_interval: Duration,
    pub retry_interval: Duration,
}

impl Schedule {
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            cycle_interval: profile.cycle_interval(),
            retry_interval: profile.retry_interval(),
        }
    }

    /// How long to sleep after a cycle with this outcome.
    #[must_use]
    pub fn next_sleep(&self, outcome: &Result<CycleReport, BotError>) -> Duration {
        match outcome {
            Ok(_) => self.cycle_interval,
            Err(_) => self.retry_interval,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    Sleeping(Duration),
}

/// Run cycles until `shutdown` resolves. Returns the number of cycles started.
///
/// `run` receives the 1-based cycle number.
///
/// # Errors
///
/// Returns the cycle's error if it is fatal (see [`BotError::is_fatal`]).
/// Recoverable errors only shorten the next sleep.
pub async fn run_forever<F, Fut, S>(
    schedule: Schedule,
    mut run: F,
    shutdown: S,
) -> Result<u64, BotError>
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<CycleReport, BotError>>,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut cycle = 0u64;
    let mut phase = Phase::Running;

    loop {
        phase = match phase {
            Phase::Running => {
                cycle += 1;
                tokio::select! {
                    outcome = run(cycle) => {
                        log_outcome(cycle, &outcome);
                        match outcome {
                            Err(e) if e.is_fatal() => return Err(e),
                            outcome => Phase::Sleeping(schedule.next_sleep(&outcome)),
                        }
                    }
                    () = &mut shutdown => {
                        tracing::info!(
                            cycle,
                            "shutdown requested during cycle; abandoning in-flight work"
                        );
                        return Ok(cycle);
                    }
                }
            }
            Phase::Sleeping(pause) => {
                let next_at = chrono::Duration::from_std(pause)
                    .ok()
                    .and_then(|d| Utc::now().checked_add_signed(d));
                tracing::info!(
                    sleep_secs = pause.as_secs(),
                    next_check = ?next_at,
                    "sleeping until next cycle"
                );
                tokio::select! {
                    () = tokio::time::sleep(pause) => Phase::Running,
                    () = &mut shutdown => {
                        tracing::info!(cycles = cycle, "shutdown requested while sleeping");
                        return Ok(cycle);
                    }
                }
            }
        };
    }
}

fn log_outcome(cycle: u64, outcome: &Result<CycleReport, BotError>) {
    match outcome {
        Ok(report) if report.sent > 0 => {
            tracing::info!(cycle, sent = report.sent, "cycle forwarded mentions");
        }
        Ok(_) => tracing::info!(cycle, "cycle complete; no new mentions forwarded"),
        Err(e) if e.is_fatal() => {
            tracing::error!(cycle, error = %e, "cycle failed fatally; stopping");
        }
        Err(e) => {
            tracing::error!(cycle, error = %e, "cycle failed; retrying after short interval");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    use tokio::sync::oneshot;

    use super::*;

    fn schedule(cycle_ms: u64, retry_ms: u64) -> Schedule {
        Schedule {
            cycle_interval: Duration::from_millis(cycle_ms),
            retry_interval: Duration::from_millis(retry_ms),
        }
    }

    #[test]
    fn schedule_uses_profile_intervals() {
        let s = Schedule::from_profile(&Profile::fixed());
        assert_eq!(s.cycle_interval, Duration::from_secs(3 * 60 * 60));
        assert_eq!(s.retry_interval, Duration::from_secs(5 * 60));
    }

    #[test]
    fn aborted_cycle_sleeps_retry_interval() {
        let s = schedule(10_000, 100);
        assert_eq!(
            s.next_sleep(&Ok(CycleReport::default())),
            Duration::from_millis(10_000)
        );
        assert_eq!(
            s.next_sleep(&Err(BotError::CycleAborted("panic".to_string()))),
            Duration::from_millis(100)
        );
    }

    #[tokio::test]
    async fn failed_cycle_is_retried_after_short_interval() {
        let calls = Arc::new(AtomicU64::new(0));
        let (tx, rx) = oneshot::channel::<()>();
        let mut tx = Some(tx);
        let c = Arc::clone(&calls);

        let started = Instant::now();
        let cycles = run_forever(
            schedule(3_600_000, 10),
            move |n| {
                c.fetch_add(1, Ordering::SeqCst);
                let outcome = if n == 1 {
                    Err(BotError::CycleAborted("boom".to_string()))
                } else {
                    if let Some(tx) = tx.take() {
                        let _ = tx.send(());
                    }
                    Ok(CycleReport::default())
                };
                async move { outcome }
            },
            async move {
                let _ = rx.await;
            },
        )
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cycles, 2);
        assert!(
            started.elapsed() < Duration::from_secs(5),
            "shutdown should interrupt the hour-long sleep"
        );
    }

    #[tokio::test]
    async fn shutdown_interrupts_in_flight_cycle() {
        let started = Instant::now();
        let cycles = run_forever(
            schedule(10, 10),
            |_| async {
                tokio::time::sleep(Duration::from_secs(3_600)).await;
                Ok(CycleReport::default())
            },
            tokio::time::sleep(Duration::from_millis(20)),
        )
        .await
        .unwrap();

        assert_eq!(cycles, 1);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn completed_cycles_repeat_on_interval() {
        let calls = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&calls);
        let (tx, rx) = oneshot::channel::<()>();
        let mut tx = Some(tx);

        let cycles = run_forever(
            schedule(5, 5),
            move |n| {
                c.fetch_add(1, Ordering::SeqCst);
                if n == 3 {
                    if let Some(tx) = tx.take() {
                        let _ = tx.send(());
                    }
                }
                async { Ok(CycleReport::default()) }
            },
            async move {
                let _ = rx.await;
            },
        )
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(cycles, 3);
    }

    #[tokio::test]
    async fn fatal_cycle_error_stops_the_loop() {
        let calls = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&calls);

        let result = run_forever(
            schedule(5, 5),
            move |_| {
                c.fetch_add(1, Ordering::SeqCst);
                async { Err(BotError::Bootstrap("account revoked".to_string())) }
            },
            std::future::pending::<()>(),
        )
        .await;

        assert!(matches!(result, Err(BotError::Bootstrap(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
