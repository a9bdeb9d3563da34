//! Time bucketing of chat messages.
//!
//! A [`Policy`] maps each message date to a string key. [`bucket_messages`]
//! groups a transcript by that key in a single pass and renders each group,
//! so the grouping and the rendered text can never disagree on order.

use std::collections::HashMap;
use std::num::NonZeroU32;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

use crate::core::models::Message;
use crate::transcript;

const KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Calendar week starting on Monday.
    Week,
    /// Calendar month.
    Month,
    /// Fixed windows of `n` days counted from January 1 of each year. The
    /// last window of a year is cut short at December 31.
    Interval(NonZeroU32),
}

impl Policy {
    /// Bucket key for `date` under this policy.
    #[must_use]
    pub fn key(&self, date: &DateTime<Utc>) -> String {
        let day = date.date_naive();
        match self {
            Policy::Week => week_start(day).format(KEY_FORMAT).to_string(),
            Policy::Month => date.format("%Y-%m").to_string(),
            Policy::Interval(days) => interval_start(day, days.get())
                .format(KEY_FORMAT)
                .to_string(),
        }
    }

    /// The word used in the transcript header, e.g. "Week starting on ...".
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Policy::Week => "Week",
            Policy::Month => "Month",
            Policy::Interval(_) => "Period",
        }
    }
}

fn week_start(day: NaiveDate) -> NaiveDate {
    let offset = u64::from(day.weekday().num_days_from_monday());
    // Only fails below NaiveDate::MIN, which a four-digit year never reaches.
    day.checked_sub_days(Days::new(offset)).unwrap_or(day)
}

fn interval_start(day: NaiveDate, days: u32) -> NaiveDate {
    let ordinal = day.ordinal0();
    let window_offset = ordinal - ordinal % days;
    day.with_ordinal0(window_offset).unwrap_or(day)
}

/// Messages sharing one key, plus the transcript rendered from them.
#[derive(Debug, Clone)]
pub struct Bucket<'a> {
    pub key: String,
    pub members: Vec<&'a Message>,
    pub transcript: String,
}

/// Partitions `messages` under `policy`.
///
/// Buckets come back in the order their keys were first seen while scanning
/// `messages`; members keep their input order. Nothing is sorted by date.
#[must_use]
pub fn bucket_messages<'a>(messages: &'a [Message], policy: Policy) -> Vec<Bucket<'a>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&'a Message>)> = Vec::new();

    for message in messages {
        let key = policy.key(&message.date);
        match index.get(&key).copied() {
            Some(slot) => groups[slot].1.push(message),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![message]));
            }
        }
    }

    groups
        .into_iter()
        .map(|(key, members)| {
            let transcript = transcript::render(policy.label(), &key, &members);
            Bucket {
                key,
                members,
                transcript,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timestamp;

    fn at(raw: &str) -> DateTime<Utc> {
        timestamp::parse(raw).unwrap()
    }

    fn days(n: u32) -> Policy {
        Policy::Interval(NonZeroU32::new(n).unwrap())
    }

    #[test]
    fn test_week_key_is_monday() {
        // 2024-01-01 was a Monday.
        assert_eq!(Policy::Week.key(&at("2024-01-01T00:00:00Z")), "2024-01-01");
        assert_eq!(Policy::Week.key(&at("2024-01-07T23:59:59Z")), "2024-01-01");
        assert_eq!(Policy::Week.key(&at("2024-01-08T00:00:00Z")), "2024-01-08");
    }

    #[test]
    fn test_week_key_crosses_year_boundary() {
        // Friday 2021-01-01 belongs to the week starting Monday 2020-12-28.
        assert_eq!(Policy::Week.key(&at("2021-01-01T12:00:00Z")), "2020-12-28");
    }

    #[test]
    fn test_month_key() {
        assert_eq!(Policy::Month.key(&at("2024-02-29T10:00:00Z")), "2024-02");
        assert_eq!(Policy::Month.key(&at("2024-02-01T00:00:00Z")), "2024-02");
    }

    #[test]
    fn test_interval_key_windows_from_january_first() {
        assert_eq!(days(7).key(&at("2024-01-01T00:00:00Z")), "2024-01-01");
        assert_eq!(days(7).key(&at("2024-01-07T23:00:00Z")), "2024-01-01");
        assert_eq!(days(7).key(&at("2024-01-08T00:00:00Z")), "2024-01-08");
        assert_eq!(days(10).key(&at("2024-02-15T00:00:00Z")), "2024-02-10");
        assert_eq!(days(1).key(&at("2024-06-30T18:00:00Z")), "2024-06-30");
    }

    #[test]
    fn test_interval_short_last_window_of_year() {
        // 2023 has 365 days; with 100-day windows the last one starts on
        // day 300 (2023-10-28) and runs only to December 31.
        assert_eq!(days(100).key(&at("2023-12-31T00:00:00Z")), "2023-10-28");
        assert_eq!(days(100).key(&at("2024-01-01T00:00:00Z")), "2024-01-01");
    }

    #[test]
    fn test_interval_larger_than_year() {
        assert_eq!(days(400).key(&at("2024-12-31T00:00:00Z")), "2024-01-01");
    }

    #[test]
    fn test_label() {
        assert_eq!(Policy::Week.label(), "Week");
        assert_eq!(Policy::Month.label(), "Month");
        assert_eq!(days(3).label(), "Period");
    }
}
