// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Core data structures consumed by the pattern engine.
//!
//! ## Core Models
//!
//! - [`CheckIn`]: A single user-submitted daily record
//! - [`CheckInHistory`]: A list of check-ins sorted most-recent-first
//! - [`Metric`]: The numeric fields of a check-in that can be analyzed
//!
//! Timestamps keep the offset they were submitted with, so hour and weekday
//! are read in the user's local time at the moment of the check-in.
//!
//! Records are read leniently: an unreadable `date` or metric value is
//! dropped from that field alone and logged, the rest of the record stays.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// A single daily check-in submitted by a user
///
/// # Examples
///
/// ```rust
/// use momentum_insights::models::CheckIn;
/// use chrono::DateTime;
///
/// let checkin = CheckIn {
///     id: "c1".to_string(),
///     user_id: "user-1".to_string(),
///     date: None,
///     created_at: DateTime::parse_from_rfc3339("2025-03-03T08:15:00+01:00").unwrap(),
///     mood: Some(4),
///     energy: Some(3),
///     stress: Some(2),
///     wins: Some("Finished the draft".to_string()),
/// };
/// assert_eq!(checkin.timestamp(), checkin.created_at);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "CheckInRecord")]
pub struct CheckIn {
    /// Unique identifier of the check-in
    pub id: String,
    /// Owner of the check-in
    pub user_id: String,
    /// Day the check-in refers to, when it differs from the submission time
    pub date: Option<DateTime<FixedOffset>>,
    /// Submission time
    pub created_at: DateTime<FixedOffset>,
    /// Mood on a 1-5 scale
    pub mood: Option<u8>,
    /// Energy on a 1-5 scale
    pub energy: Option<u8>,
    /// Stress on a 0-10 scale
    pub stress: Option<u8>,
    /// Free-text wins for the day
    pub wins: Option<String>,
}

/// Stored shape of a check-in before field-level validation
#[derive(Deserialize)]
struct CheckInRecord {
    id: String,
    user_id: String,
    #[serde(default)]
    date: Option<String>,
    created_at: DateTime<FixedOffset>,
    #[serde(default)]
    mood: Option<Value>,
    #[serde(default)]
    energy: Option<Value>,
    #[serde(default)]
    stress: Option<Value>,
    #[serde(default)]
    wins: Option<String>,
}

impl From<CheckInRecord> for CheckIn {
    fn from(record: CheckInRecord) -> Self {
        let mood = read_metric(&record.id, Metric::Mood, record.mood);
        let energy = read_metric(&record.id, Metric::Energy, record.energy);
        let stress = read_metric(&record.id, Metric::Stress, record.stress);
        let date = record.date.as_deref().and_then(|raw| {
            let parsed = parse_checkin_date(raw, record.created_at);
            if parsed.is_none() {
                warn!(id = %record.id, date = raw, "Ignoring unreadable check-in date");
            }
            parsed
        });

        Self {
            id: record.id,
            user_id: record.user_id,
            date,
            created_at: record.created_at,
            mood,
            energy,
            stress,
            wins: record.wins,
        }
    }
}

/// Integer metric value, `None` for null or anything that is not a small
/// non-negative integer
fn read_metric(id: &str, metric: Metric, raw: Option<Value>) -> Option<u8> {
    match raw? {
        Value::Null => None,
        value => {
            let parsed = value.as_u64().and_then(|v| u8::try_from(v).ok());
            if parsed.is_none() {
                warn!(id, %metric, %value, "Ignoring malformed metric value");
            }
            parsed
        }
    }
}

/// Parse a check-in `date` given as RFC 3339 or as `YYYY-MM-DD`.
///
/// A bare day takes the time of day and offset of `created_at`, so the
/// submission hour is kept while the weekday follows `date`.
pub fn parse_checkin_date(
    raw: &str,
    created_at: DateTime<FixedOffset>,
) -> Option<DateTime<FixedOffset>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp);
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    created_at
        .offset()
        .from_local_datetime(&day.and_time(created_at.time()))
        .single()
}

impl CheckIn {
    /// Effective timestamp: `date` when present, otherwise `created_at`
    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.date.unwrap_or(self.created_at)
    }

    /// Value of `metric` if present and within the metric's scale
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        let raw = match metric {
            Metric::Mood => self.mood,
            Metric::Energy => self.energy,
            Metric::Stress => self.stress,
        }?;
        let (min, max) = metric.range();
        (min..=max).contains(&raw).then_some(f64::from(raw))
    }

    /// Whether the check-in records at least one non-blank win
    pub fn has_wins(&self) -> bool {
        self.wins.as_deref().is_some_and(|w| !w.trim().is_empty())
    }

    /// Check every present metric against its scale.
    ///
    /// Out-of-range values are still ignored by [`CheckIn::metric`]; this
    /// only reports them.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (metric, raw) in [
            (Metric::Mood, self.mood),
            (Metric::Energy, self.energy),
            (Metric::Stress, self.stress),
        ] {
            let Some(value) = raw else { continue };
            let (min, max) = metric.range();
            if !(min..=max).contains(&value) {
                return Err(ModelError::MetricOutOfRange {
                    id: self.id.clone(),
                    metric,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Problems found in an individual check-in
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ModelError {
    #[error("check-in {id}: {metric} value {value} is outside its scale")]
    MetricOutOfRange { id: String, metric: Metric, value: u8 },
}

/// Numeric check-in fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Mood,
    Energy,
    Stress,
}

impl Metric {
    /// Inclusive valid range of the metric
    pub fn range(self) -> (u8, u8) {
        match self {
            Self::Mood | Self::Energy => (1, 5),
            Self::Stress => (0, 10),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mood => "mood",
            Self::Energy => "energy",
            Self::Stress => "stress",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check-ins ordered most-recent-first by effective timestamp
///
/// Trend direction depends on this order, so the engine only accepts
/// histories built through this type. Records sharing a timestamp keep
/// their input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckInHistory {
    checkins: Vec<CheckIn>,
}

impl CheckInHistory {
    /// Sort `checkins` most-recent-first and wrap them
    pub fn new(mut checkins: Vec<CheckIn>) -> Self {
        checkins.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        Self { checkins }
    }

    /// Keep only the `limit` most recent check-ins
    pub fn truncated(mut self, limit: usize) -> Self {
        self.checkins.truncate(limit);
        self
    }

    pub fn len(&self) -> usize {
        self.checkins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkins.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CheckIn> {
        self.checkins.iter()
    }

    pub fn as_slice(&self) -> &[CheckIn] {
        &self.checkins
    }

    /// Present values of `metric`, most-recent-first
    pub fn values(&self, metric: Metric) -> Vec<f64> {
        self.checkins.iter().filter_map(|c| c.metric(metric)).collect()
    }

    /// Present values of `metric` paired with their timestamps
    pub fn series(&self, metric: Metric) -> Vec<(DateTime<FixedOffset>, f64)> {
        self.checkins
            .iter()
            .filter_map(|c| c.metric(metric).map(|v| (c.timestamp(), v)))
            .collect()
    }

    pub fn into_inner(self) -> Vec<CheckIn> {
        self.checkins
    }
}

impl From<Vec<CheckIn>> for CheckInHistory {
    fn from(checkins: Vec<CheckIn>) -> Self {
        Self::new(checkins)
    }
}

impl<'a> IntoIterator for &'a CheckInHistory {
    type Item = &'a CheckIn;
    type IntoIter = std::slice::Iter<'a, CheckIn>;

    fn into_iter(self) -> Self::IntoIter {
        self.checkins.iter()
    }
}
