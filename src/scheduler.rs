use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::{error, info};

use crate::config::PontoConfig;
use crate::engine::Engine;
use crate::error::PontoError;
use crate::jira::JiraClient;
use crate::schedule::{self, SlotName};
use crate::waiter;

/// How far before the business-clock trigger each slot is launched. The
/// precision waiter closes the remaining gap to the exact second.
const LEAD_SECONDS: i64 = 60;

/// The host's clock (the "trigger clock") runs in UTC; the slot table is
/// defined on the "business clock", a fixed `offset_hours` ahead of UTC.
/// This is the single documented conversion between the two domains.
fn business_to_utc(
    business: chrono::NaiveDateTime,
    offset_hours: i32,
) -> DateTime<Utc> {
    Utc.from_utc_datetime(&(business - Duration::hours(offset_hours as i64)))
}

/// The next launch instant on the trigger clock: the earliest slot whose
/// lead instant (trigger minus [`LEAD_SECONDS`]) is still ahead of `now_utc`,
/// rolling to the next day once all four have passed.
///
/// Weekends are not skipped here; the firing path re-checks the business
/// day so the daemon wakes up, logs the skip, and goes back to sleep.
pub fn next_trigger(now_utc: DateTime<Utc>, offset_hours: i32) -> (SlotName, DateTime<Utc>) {
    let business_today = (now_utc + Duration::hours(offset_hours as i64)).date_naive();

    let mut best: Option<(SlotName, DateTime<Utc>)> = None;
    for day_offset in 0..=1 {
        let date = business_today + Duration::days(day_offset);
        for slot in schedule::slots() {
            let fire_at = business_to_utc(date.and_time(slot.trigger_time), offset_hours)
                - Duration::seconds(LEAD_SECONDS);
            if fire_at <= now_utc {
                continue;
            }
            if best.is_none_or(|(_, current)| fire_at < current) {
                best = Some((slot.name, fire_at));
            }
        }
        if best.is_some() {
            break;
        }
    }
    // Two consecutive days always contain a future lead instant.
    best.expect("slot table is non-empty")
}

/// Long-running daemon: sleeps until each slot's lead instant, closes the
/// remaining gap with a precision wait on the trigger clock, then drives the
/// engine with its own wait disabled — the host's local timezone is never
/// consulted in this mode. Engine failures are logged and never crash the
/// loop; the next day's slot is the recovery path.
pub async fn run(client: &JiraClient, config: &PontoConfig) -> Result<(), PontoError> {
    info!("Scheduler started (host clock UTC, business clock UTC{:+})", config.utc_offset_hours);
    for slot in schedule::slots() {
        let fire = business_to_utc(
            chrono::Utc::now().date_naive().and_time(slot.trigger_time),
            config.utc_offset_hours,
        );
        info!(
            "  {} slot: fires {} UTC daily (target {} business time)",
            slot.name,
            (fire - Duration::seconds(LEAD_SECONDS)).format("%H:%M"),
            slot.trigger_time.format("%H:%M:%S")
        );
    }

    loop {
        let (name, fire_at) = next_trigger(Utc::now(), config.utc_offset_hours);
        info!("Next slot: {} at {} UTC", name, fire_at.format("%Y-%m-%d %H:%M:%S"));

        let until = fire_at - Utc::now();
        if let Ok(wait) = until.to_std() {
            tokio::time::sleep(wait).await;
        }

        let business_now = Utc::now() + Duration::hours(config.utc_offset_hours as i64);
        if !schedule::is_working_day(business_now.date_naive()) {
            info!("Weekend on the business clock - skipping slot {name}");
            continue;
        }

        // The trigger instant is the lead instant plus the lead itself, both
        // on the trigger clock; the engine's own local-time wait stays off.
        waiter::wait_until_instant(fire_at + Duration::seconds(LEAD_SECONDS)).await;

        let engine = Engine::new(client, config, false);
        match engine.run_slot(&schedule::slot(name), false).await {
            Ok(run) if run.is_clean() => info!("Slot {name} completed"),
            Ok(_) => error!("Slot {name} completed with a missing workflow transition"),
            Err(e) => error!("Slot {name} failed: {e}"),
        }
    }
}
