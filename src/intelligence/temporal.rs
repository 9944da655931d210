// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Weekday and time-of-day bucketing of check-in metrics
//!
//! Buckets without observations report `None` so an empty weekday is never
//! mistaken for a genuinely low average.

use chrono::{Datelike, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::{CheckIn, CheckInHistory, Metric};

/// Weekdays in canonical Sunday to Saturday order
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Time of day band of a check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,   // 05:00-12:00
    Afternoon, // 12:00-17:00
    Evening,   // 17:00-22:00
    Night,     // 22:00-05:00
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=21 => Self::Evening,
            _ => Self::Night,
        }
    }

    pub fn of(checkin: &CheckIn) -> Self {
        Self::from_hour(checkin.timestamp().hour())
    }
}

/// Mean of a metric per weekday, Sunday first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekdayMeans {
    means: [Option<f64>; 7],
}

impl WeekdayMeans {
    pub fn get(&self, day: Weekday) -> Option<f64> {
        self.means[day.num_days_from_sunday() as usize]
    }

    /// `(weekday, mean)` for every weekday with observations, Sunday first
    pub fn populated(&self) -> impl Iterator<Item = (Weekday, f64)> + '_ {
        WEEKDAYS
            .iter()
            .zip(self.means.iter())
            .filter_map(|(day, mean)| mean.map(|m| (*day, m)))
    }

    /// First weekday holding the largest mean
    pub fn max_day(&self) -> Option<(Weekday, f64)> {
        self.populated()
            .fold(None, |best, (day, mean)| match best {
                Some((_, best_mean)) if mean <= best_mean => best,
                _ => Some((day, mean)),
            })
    }

    /// First weekday holding the smallest mean
    pub fn min_day(&self) -> Option<(Weekday, f64)> {
        self.populated()
            .fold(None, |best, (day, mean)| match best {
                Some((_, best_mean)) if mean >= best_mean => best,
                _ => Some((day, mean)),
            })
    }
}

/// Mean of a metric per time of day band
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeOfDayMeans {
    pub morning: Option<f64>,
    pub afternoon: Option<f64>,
    pub evening: Option<f64>,
    pub night: Option<f64>,
}

impl TimeOfDayMeans {
    pub fn get(&self, band: TimeOfDay) -> Option<f64> {
        match band {
            TimeOfDay::Morning => self.morning,
            TimeOfDay::Afternoon => self.afternoon,
            TimeOfDay::Evening => self.evening,
            TimeOfDay::Night => self.night,
        }
    }
}

/// Groups metric values into temporal buckets
pub struct TemporalGrouper;

impl TemporalGrouper {
    /// Mean of `metric` per weekday of the check-in's local timestamp
    pub fn by_weekday(history: &CheckInHistory, metric: Metric) -> WeekdayMeans {
        let mut sums = [(0.0_f64, 0_usize); 7];
        for (timestamp, value) in history.series(metric) {
            let slot = &mut sums[timestamp.weekday().num_days_from_sunday() as usize];
            slot.0 += value;
            slot.1 += 1;
        }

        WeekdayMeans {
            means: sums.map(|(sum, count)| bucket_mean(sum, count)),
        }
    }

    /// Mean of `metric` per time of day band of the check-in's local timestamp
    pub fn by_time_of_day(history: &CheckInHistory, metric: Metric) -> TimeOfDayMeans {
        let mut sums = [(0.0_f64, 0_usize); 4];
        for checkin in history {
            if let Some(value) = checkin.metric(metric) {
                let slot = &mut sums[band_index(TimeOfDay::of(checkin))];
                slot.0 += value;
                slot.1 += 1;
            }
        }

        let [morning, afternoon, evening, night] = sums.map(|(sum, count)| bucket_mean(sum, count));
        TimeOfDayMeans {
            morning,
            afternoon,
            evening,
            night,
        }
    }
}

fn band_index(band: TimeOfDay) -> usize {
    match band {
        TimeOfDay::Morning => 0,
        TimeOfDay::Afternoon => 1,
        TimeOfDay::Evening => 2,
        TimeOfDay::Night => 3,
    }
}

fn bucket_mean(sum: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CheckIn;
    use chrono::DateTime;

    fn checkin(ts: &str, mood: u8) -> CheckIn {
        CheckIn {
            id: ts.to_string(),
            user_id: "u1".to_string(),
            date: None,
            created_at: DateTime::parse_from_rfc3339(ts).unwrap(),
            mood: Some(mood),
            energy: None,
            stress: None,
            wins: None,
        }
    }

    #[test]
    fn test_time_of_day_bands() {
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(22), TimeOfDay::Night);
    }

    #[test]
    fn test_group_by_weekday() {
        // 2025-01-05 is a Sunday, 2025-01-06 a Monday
        let history = CheckInHistory::new(vec![
            checkin("2025-01-05T09:00:00Z", 4),
            checkin("2025-01-12T09:00:00Z", 2),
            checkin("2025-01-06T09:00:00Z", 5),
        ]);

        let means = TemporalGrouper::by_weekday(&history, Metric::Mood);
        assert_eq!(means.get(Weekday::Sun), Some(3.0));
        assert_eq!(means.get(Weekday::Mon), Some(5.0));
        assert_eq!(means.get(Weekday::Tue), None);
        assert_eq!(means.populated().count(), 2);
    }

    #[test]
    fn test_weekday_uses_local_offset() {
        // 23:30 on Sunday at -05:00 is Monday in UTC
        let history = CheckInHistory::new(vec![checkin("2025-01-05T23:30:00-05:00", 3)]);

        let means = TemporalGrouper::by_weekday(&history, Metric::Mood);
        assert_eq!(means.get(Weekday::Sun), Some(3.0));
        assert_eq!(means.get(Weekday::Mon), None);
    }

    #[test]
    fn test_group_by_time_of_day() {
        let history = CheckInHistory::new(vec![
            checkin("2025-01-05T06:00:00Z", 4),
            checkin("2025-01-06T10:00:00Z", 2),
            checkin("2025-01-07T23:00:00Z", 1),
        ]);

        let means = TemporalGrouper::by_time_of_day(&history, Metric::Mood);
        assert_eq!(means.morning, Some(3.0));
        assert_eq!(means.afternoon, None);
        assert_eq!(means.evening, None);
        assert_eq!(means.get(TimeOfDay::Night), Some(1.0));
    }

    #[test]
    fn test_min_max_ties_resolve_to_earliest_weekday() {
        // Tuesday and Thursday share the maximum, Monday and Friday the minimum
        let history = CheckInHistory::new(vec![
            checkin("2025-01-06T09:00:00Z", 1),
            checkin("2025-01-07T09:00:00Z", 5),
            checkin("2025-01-09T09:00:00Z", 5),
            checkin("2025-01-10T09:00:00Z", 1),
        ]);

        let means = TemporalGrouper::by_weekday(&history, Metric::Mood);
        assert_eq!(means.max_day(), Some((Weekday::Tue, 5.0)));
        assert_eq!(means.min_day(), Some((Weekday::Mon, 1.0)));
    }

    #[test]
    fn test_empty_history_has_no_extremes() {
        let means = TemporalGrouper::by_weekday(&CheckInHistory::default(), Metric::Mood);
        assert_eq!(means.max_day(), None);
        assert_eq!(means.min_day(), None);
    }
}
