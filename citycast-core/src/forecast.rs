//! Collapsing the 3-hourly forecast series into one sample per day.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Timelike};

use crate::model::ForecastSample;

/// Upper bound on the number of days kept.
pub const MAX_DAYS: usize = 5;

/// Local hours (inclusive) that count as "mid-day".
const MIDDAY_HOURS: std::ops::RangeInclusive<u32> = 11..=13;

fn local_time<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    DateTime::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(tz))
}

/// Local calendar date of an epoch timestamp in `tz`.
pub fn local_date<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<NaiveDate> {
    local_time(timestamp, tz).map(|t| t.date_naive())
}

/// Reduce `samples` to at most [`MAX_DAYS`] entries, one per local calendar date.
///
/// Dates appear in the order they are first seen. Within a date the first sample
/// whose local hour lies in 11..=13 wins; otherwise the date's first sample does.
/// Samples whose timestamp is out of chrono's range are skipped.
pub fn reduce_daily<Tz: TimeZone>(samples: &[ForecastSample], tz: &Tz) -> Vec<ForecastSample> {
    // (date, index of first sample, index of first mid-day sample)
    let mut days: Vec<(NaiveDate, usize, Option<usize>)> = Vec::with_capacity(MAX_DAYS);

    for (idx, sample) in samples.iter().enumerate() {
        let Some(local) = local_time(sample.timestamp, tz) else {
            continue;
        };
        let date = local.date_naive();
        let midday = MIDDAY_HOURS.contains(&local.hour());

        match days.iter_mut().find(|(d, _, _)| *d == date) {
            Some((_, _, pick)) => {
                if midday && pick.is_none() {
                    *pick = Some(idx);
                }
            }
            None => {
                if days.len() == MAX_DAYS {
                    continue;
                }
                days.push((date, idx, midday.then_some(idx)));
            }
        }
    }

    days.into_iter()
        .map(|(_, first, midday)| samples[midday.unwrap_or(first)].clone())
        .collect()
}

/// Label for a forecast card: "Today", "Tomorrow", or the English weekday name.
///
/// `now` is passed in so the result does not depend on the wall clock.
pub fn day_label<Tz: TimeZone>(timestamp: i64, now: &DateTime<Tz>) -> String {
    let tz = now.timezone();
    let today = now.date_naive();
    let Some(date) = local_date(timestamp, &tz) else {
        return String::new();
    };

    if date == today {
        "Today".to_string()
    } else if Some(date) == today.checked_add_days(Days::new(1)) {
        "Tomorrow".to_string()
    } else {
        date.format("%A").to_string()
    }
}
