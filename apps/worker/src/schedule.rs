//! Daily schedule arithmetic for the cleanup trigger (UTC).

use std::time::Duration;

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use idlereap_domain::CheckHour;

/// Returns the next instant strictly after `now` at `hour:00:00` UTC.
pub fn next_daily_run(now: DateTime<Utc>, hour: CheckHour) -> DateTime<Utc> {
    let fire_time = NaiveTime::from_hms_opt(hour.hour(), 0, 0).unwrap_or(NaiveTime::MIN);
    let today = now.date_naive().and_time(fire_time).and_utc();

    if today > now {
        today
    } else {
        today + TimeDelta::days(1)
    }
}

/// Returns how long to sleep from `now` until `next_run`.
pub fn delay_until(now: DateTime<Utc>, next_run: DateTime<Utc>) -> Duration {
    (next_run - now).to_std().unwrap_or(Duration::ZERO)
}
