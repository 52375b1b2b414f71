use chrono::{DateTime, Local, NaiveTime, Utc};
use tokio::time::{Duration, sleep};
use tracing::info;

/// Why [`wait_until`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitResult {
    /// The clock's time-of-day reached the target second.
    Reached,
    /// The calendar date rolled over mid-wait; the slot no longer applies.
    DateChanged,
}

/// Block until the local clock's time-of-day component reaches `target`.
///
/// Only the time-of-day is compared, never the full timestamp: the process
/// that launches the engine may live in a different calendar date or
/// timezone than the business clock the slot table is defined in, and it
/// only needs the clock's time component to hit an exact value.
///
/// Returns immediately when the target has already passed today. Re-polls at
/// a graded, bounded interval; never busy-spins. In practice the wait is
/// under a minute (the outer scheduler launches ~60s early), but the date is
/// re-checked each poll so a stalled host cannot make us wait a day.
pub async fn wait_until(target: NaiveTime) -> WaitResult {
    let started = Local::now().date_naive();
    info!("Waiting for target time: {}", target.format("%H:%M:%S"));

    loop {
        let now = Local::now();
        if now.date_naive() != started {
            info!("Date changed during wait; abandoning slot");
            return WaitResult::DateChanged;
        }
        if now.time() >= target {
            info!("Target time reached: {}", now.format("%Y-%m-%d %H:%M:%S%.6f"));
            return WaitResult::Reached;
        }

        let remaining = target.signed_duration_since(now.time());
        sleep(graded_step(remaining)).await;
    }
}

/// Block until `target` on the UTC trigger clock.
///
/// Daemon mode lives entirely in the trigger clock's domain: the lead
/// instant and the trigger instant are both computed in UTC, so the wait
/// compares full instants and never consults the host's local timezone.
pub async fn wait_until_instant(target: DateTime<Utc>) {
    info!(
        "Waiting for trigger instant: {} UTC",
        target.format("%Y-%m-%d %H:%M:%S")
    );
    loop {
        let remaining = target.signed_duration_since(Utc::now());
        if remaining <= chrono::Duration::zero() {
            info!(
                "Trigger instant reached: {} UTC",
                Utc::now().format("%Y-%m-%d %H:%M:%S%.6f")
            );
            return;
        }
        sleep(graded_step(remaining)).await;
    }
}

// Re-poll grading shared by both clock domains: coarse far out, 1ms near
// the target, never a busy spin.
fn graded_step(remaining: chrono::Duration) -> Duration {
    if remaining > chrono::Duration::seconds(60) {
        Duration::from_secs(30)
    } else if remaining > chrono::Duration::seconds(1) {
        Duration::from_millis(500)
    } else {
        Duration::from_millis(1)
    }
}
