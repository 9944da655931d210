// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Periodic pattern detection
//!
//! Only the weekly cycle is measured. Daily and monthly cycles are part of
//! the report shape but are never detected.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::temporal::{TemporalGrouper, WeekdayMeans};
use super::{ensure_finite, AnalysisError, InsightKind, InsightMetadata, PatternAnalyzer, PatternInsight};
use crate::config::engine_config::CycleThresholds;
use crate::config::EngineConfig;
use crate::models::{CheckInHistory, Metric};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleKind {
    Daily,
    Weekly,
    Monthly,
}

/// Which cycles were found in a metric
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub daily: bool,
    pub weekly: bool,
    pub monthly: bool,
    /// Variance across weekday means, when enough observations exist
    pub weekly_variance: Option<f64>,
}

impl CycleReport {
    pub fn has(&self, kind: CycleKind) -> bool {
        match kind {
            CycleKind::Daily => self.daily,
            CycleKind::Weekly => self.weekly,
            CycleKind::Monthly => self.monthly,
        }
    }
}

/// Detects weekly cycles in mood and energy
pub struct CycleDetector;

impl CycleDetector {
    pub fn detect(
        history: &CheckInHistory,
        metric: Metric,
        thresholds: &CycleThresholds,
    ) -> Result<CycleReport, AnalysisError> {
        let observations = history.values(metric).len();
        let weekly_variance = if observations >= thresholds.min_observations {
            Self::weekly_variance(&TemporalGrouper::by_weekday(history, metric))
                .map(|v| ensure_finite("weekly variance", v))
                .transpose()?
        } else {
            None
        };

        Ok(CycleReport {
            daily: Self::has_daily_cycle(history, metric),
            weekly: weekly_variance.is_some_and(|v| v > thresholds.weekly_variance),
            monthly: Self::has_monthly_cycle(history, metric),
            weekly_variance,
        })
    }

    /// Population variance across the weekdays that have observations
    pub fn weekly_variance(means: &WeekdayMeans) -> Option<f64> {
        let values: Vec<f64> = means.populated().map(|(_, mean)| mean).collect();
        if values.is_empty() {
            return None;
        }
        let avg = values.iter().sum::<f64>() / values.len() as f64;
        Some(values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64)
    }

    fn has_daily_cycle(_history: &CheckInHistory, _metric: Metric) -> bool {
        false
    }

    fn has_monthly_cycle(_history: &CheckInHistory, _metric: Metric) -> bool {
        false
    }

    fn cycle_insight(metric: Metric, cycles: CycleReport, by_weekday: WeekdayMeans) -> PatternInsight {
        let (description, recommendations) = match metric {
            Metric::Energy => (
                "Your energy levels follow a predictable weekly pattern.".to_string(),
                [
                    "Schedule demanding tasks during high-energy periods",
                    "Plan rest and recovery during low-energy times",
                    "Maintain consistent sleep schedule",
                ],
            ),
            _ => (
                format!(
                    "Your {} follows a weekly cycle. Understanding this can help you plan and prepare.",
                    metric
                ),
                [
                    "Plan uplifting activities for typically lower days",
                    "Take advantage of your naturally better days",
                    "Prepare support strategies for predicted dips",
                ],
            ),
        };

        PatternInsight::new(InsightKind::WeeklyCycle(metric), description)
            .with_recommendations(recommendations)
            .with_metadata(InsightMetadata::Cycle {
                metric,
                cycles,
                by_weekday,
            })
    }
}

impl PatternAnalyzer for CycleDetector {
    fn name(&self) -> &'static str {
        "cycles"
    }

    fn analyze(
        &self,
        history: &CheckInHistory,
        config: &EngineConfig,
    ) -> Result<Vec<PatternInsight>, AnalysisError> {
        let mut insights = Vec::new();

        for metric in [Metric::Mood, Metric::Energy] {
            let cycles = Self::detect(history, metric, &config.cycles)?;
            debug!(metric = %metric, weekly = cycles.weekly, variance = ?cycles.weekly_variance, "Cycle detection");

            if cycles.weekly {
                let by_weekday = TemporalGrouper::by_weekday(history, metric);
                insights.push(Self::cycle_insight(metric, cycles, by_weekday));
            }
        }

        Ok(insights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CheckIn;
    use chrono::{DateTime, Duration};

    /// Two weeks of morning check-ins starting on Sunday 2025-01-05,
    /// with `weekday_moods` indexed Sunday first
    fn two_weeks(weekday_moods: [u8; 7]) -> CheckInHistory {
        let sunday = DateTime::parse_from_rfc3339("2025-01-05T08:00:00Z").unwrap();
        CheckInHistory::new(
            (0..14)
                .map(|day| CheckIn {
                    id: format!("c{}", day),
                    user_id: "u1".to_string(),
                    date: None,
                    created_at: sunday + Duration::days(day),
                    mood: Some(weekday_moods[(day % 7) as usize]),
                    energy: Some(3),
                    stress: None,
                    wins: None,
                })
                .collect(),
        )
    }

    #[test]
    fn test_alternating_weekday_means_form_weekly_cycle() {
        let history = two_weeks([5, 1, 5, 1, 5, 1, 5]);
        let report = CycleDetector::detect(&history, Metric::Mood, &CycleThresholds::default()).unwrap();

        assert!(report.weekly);
        assert!(report.has(CycleKind::Weekly));
        assert!(report.weekly_variance.unwrap() > 0.5);
    }

    #[test]
    fn test_identical_weekday_means_have_no_cycle() {
        let history = two_weeks([3; 7]);
        let report = CycleDetector::detect(&history, Metric::Mood, &CycleThresholds::default()).unwrap();

        assert!(!report.weekly);
        assert_eq!(report.weekly_variance, Some(0.0));
    }

    #[test]
    fn test_fewer_than_fourteen_observations_skip_detection() {
        let mut checkins = two_weeks([5, 1, 5, 1, 5, 1, 5]).into_inner();
        checkins[0].mood = None;
        let history = CheckInHistory::new(checkins);

        let report = CycleDetector::detect(&history, Metric::Mood, &CycleThresholds::default()).unwrap();
        assert!(!report.weekly);
        assert_eq!(report.weekly_variance, None);
    }

    #[test]
    fn test_daily_and_monthly_are_never_detected() {
        let history = two_weeks([5, 1, 5, 1, 5, 1, 5]);
        let report = CycleDetector::detect(&history, Metric::Mood, &CycleThresholds::default()).unwrap();

        assert!(!report.has(CycleKind::Daily));
        assert!(!report.has(CycleKind::Monthly));
    }

    #[test]
    fn test_analyzer_emits_mood_cycle_only() {
        let history = two_weeks([5, 1, 5, 1, 5, 1, 5]);
        let insights = CycleDetector.analyze(&history, &EngineConfig::default()).unwrap();

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].id, "weekly_mood_cycle");
        assert_eq!(insights[0].confidence, 0.75);
    }
}
