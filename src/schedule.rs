use std::fmt;

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// The four fixed daily trigger points, in chronological order.
///
/// Each drives one workflow transition so the tracked time on the support
/// task sums to exactly 8 hours: 08:00–12:00 plus 13:00–17:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotName {
    MorningStart,
    LunchHold,
    LunchResume,
    EndOfDay,
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotName::MorningStart => write!(f, "8AM"),
            SlotName::LunchHold => write!(f, "12PM"),
            SlotName::LunchResume => write!(f, "1PM"),
            SlotName::EndOfDay => write!(f, "5PM"),
        }
    }
}

/// One entry of the static slot table.
///
/// `from_status` scopes the search; `transition_name` is matched
/// case-insensitively against the transitions Jira reports; `to_status` is
/// only used to confirm the result after firing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub name: SlotName,
    pub trigger_time: NaiveTime,
    pub from_status: &'static str,
    pub transition_name: &'static str,
    pub to_status: &'static str,
    pub description: &'static str,
}

// A slot is "due" from 5 minutes before its trigger (early launch by the
// outer scheduler) until 15 minutes after. Outside every window no slot
// resolves and the invocation is a graceful no-op.
const EARLY_TOLERANCE_MIN: i64 = 5;
const LATE_TOLERANCE_MIN: i64 = 15;

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time of day")
}

/// The full slot table. Exactly four entries, chronological and fixed.
pub fn slots() -> [Slot; 4] {
    [
        Slot {
            name: SlotName::MorningStart,
            trigger_time: time(8, 0),
            from_status: "SUPPORT OPEN",
            transition_name: "INPROGRESS SUPPORT",
            to_status: "SUPPORT INPROGRESS",
            description: "Start work",
        },
        Slot {
            name: SlotName::LunchHold,
            trigger_time: time(12, 0),
            from_status: "SUPPORT INPROGRESS",
            transition_name: "Hold Support",
            to_status: "SUPPORT HOLD",
            description: "Lunch break (pause)",
        },
        Slot {
            name: SlotName::LunchResume,
            trigger_time: time(13, 0),
            from_status: "SUPPORT HOLD",
            transition_name: "HOLD ke INPROGRESS SUPPORT",
            to_status: "SUPPORT INPROGRESS",
            description: "Resume work",
        },
        Slot {
            name: SlotName::EndOfDay,
            trigger_time: time(17, 0),
            from_status: "SUPPORT INPROGRESS",
            transition_name: "Support Done",
            to_status: "SUPPORT DONE",
            description: "End work",
        },
    ]
}

/// Look up a slot by name.
pub fn slot(name: SlotName) -> Slot {
    slots()
        .into_iter()
        .find(|s| s.name == name)
        .expect("slot table covers every SlotName")
}

/// True Monday through Friday. The engine never fires on weekends.
pub fn is_working_day(date: impl Datelike) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Determine which slot, if any, is due at `now`.
///
/// An explicit name short-circuits the clock entirely (manual and `--test`
/// runs). Otherwise `now` must fall on a working day and inside exactly one
/// slot's tolerance window; anything else resolves to `None`, which callers
/// treat as a graceful no-op rather than an error.
pub fn resolve(now: NaiveDateTime, explicit: Option<SlotName>) -> Option<Slot> {
    if let Some(name) = explicit {
        return Some(slot(name));
    }
    if !is_working_day(now.date()) {
        return None;
    }
    let tod = now.time();
    slots().into_iter().find(|s| {
        let since_trigger = tod.signed_duration_since(s.trigger_time);
        since_trigger >= Duration::minutes(-EARLY_TOLERANCE_MIN)
            && since_trigger <= Duration::minutes(LATE_TOLERANCE_MIN)
    })
}

/// The two working periods of the day and their fixed total.
///
/// Pure arithmetic: 08:00–12:00 plus 13:00–17:00 is always exactly 8 hours;
/// the 12:00–13:00 lunch hold is never counted.
pub fn working_duration() -> (Duration, Duration, Duration) {
    let morning = time(12, 0).signed_duration_since(time(8, 0));
    let afternoon = time(17, 0).signed_duration_since(time(13, 0));
    (morning, afternoon, morning + afternoon)
}
