// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Check-in habits: when the user checks in and how often they log wins

use chrono::Timelike;
use tracing::debug;

use super::{ensure_finite, AnalysisError, InsightKind, InsightMetadata, PatternAnalyzer, PatternInsight};
use crate::config::engine_config::HabitThresholds;
use crate::config::EngineConfig;
use crate::models::CheckInHistory;

pub struct HabitAnalyzer;

impl HabitAnalyzer {
    /// Mean local hour of the check-ins, `None` for an empty history
    pub fn average_hour(history: &CheckInHistory) -> Option<f64> {
        if history.is_empty() {
            return None;
        }
        let total: u32 = history.iter().map(|c| c.timestamp().hour()).sum();
        Some(f64::from(total) / history.len() as f64)
    }

    /// Share of check-ins with a non-blank win, `None` for an empty history
    pub fn win_rate(history: &CheckInHistory) -> Option<(f64, usize)> {
        if history.is_empty() {
            return None;
        }
        let with_wins = history.iter().filter(|c| c.has_wins()).count();
        Some((with_wins as f64 / history.len() as f64, with_wins))
    }

    fn timing_insight(
        history: &CheckInHistory,
        thresholds: &HabitThresholds,
    ) -> Result<Option<PatternInsight>, AnalysisError> {
        let Some(average_hour) = Self::average_hour(history) else {
            return Ok(None);
        };
        let average_hour = ensure_finite("average check-in hour", average_hour)?;
        debug!(average_hour, "Check-in timing");

        let metadata = InsightMetadata::CheckInTiming {
            average_hour,
            checkins: history.len(),
        };

        let insight = if average_hour < thresholds.early_hour {
            PatternInsight::new(
                InsightKind::MorningRoutine,
                "You consistently check in early, showing great morning discipline.",
            )
            .with_recommendations([
                "Schedule important tasks in the morning",
                "Protect your morning routine",
                "Use early hours for deep work",
            ])
        } else if average_hour > thresholds.late_hour {
            PatternInsight::new(
                InsightKind::EveningReflection,
                "You prefer evening check-ins, showing good end-of-day reflection.",
            )
            .with_recommendations([
                "Use evenings for planning next day",
                "Create calming evening routine",
                "Process the day's experiences",
            ])
        } else {
            return Ok(None);
        };

        Ok(Some(insight.with_metadata(metadata)))
    }

    fn wins_insight(
        history: &CheckInHistory,
        thresholds: &HabitThresholds,
    ) -> Result<Option<PatternInsight>, AnalysisError> {
        let Some((rate, with_wins)) = Self::win_rate(history) else {
            return Ok(None);
        };
        let rate = ensure_finite("win rate", rate)?;
        debug!(rate, with_wins, "Win rate");

        let metadata = InsightMetadata::WinRate {
            rate,
            with_wins,
            total: history.len(),
        };

        let insight = if rate > thresholds.high_win_rate {
            PatternInsight::new(
                InsightKind::HighAchievement,
                format!(
                    "You record wins in {:.0}% of your check-ins. Excellent progress tracking!",
                    rate * 100.0
                ),
            )
            .with_recommendations([
                "Continue celebrating wins",
                "Set progressively bigger goals",
                "Share your success strategies",
            ])
        } else if rate < thresholds.low_win_rate {
            PatternInsight::new(
                InsightKind::WinsOpportunity,
                "Consider recording more daily wins to boost motivation and track progress.",
            )
            .with_recommendations([
                "Look for small daily accomplishments",
                "Count learning as wins",
                "Celebrate effort, not just results",
            ])
        } else {
            return Ok(None);
        };

        Ok(Some(insight.with_metadata(metadata)))
    }
}

impl PatternAnalyzer for HabitAnalyzer {
    fn name(&self) -> &'static str {
        "habits"
    }

    fn analyze(
        &self,
        history: &CheckInHistory,
        config: &EngineConfig,
    ) -> Result<Vec<PatternInsight>, AnalysisError> {
        let thresholds = &config.habits;
        Ok(Self::timing_insight(history, thresholds)?
            .into_iter()
            .chain(Self::wins_insight(history, thresholds)?)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CheckIn;
    use chrono::{DateTime, Duration};

    fn history(hours: &[u32], wins: &[Option<&str>]) -> CheckInHistory {
        let first = DateTime::parse_from_rfc3339("2025-04-01T00:00:00-07:00").unwrap();
        CheckInHistory::new(
            hours
                .iter()
                .zip(wins)
                .enumerate()
                .map(|(i, (&hour, win))| CheckIn {
                    id: format!("c{}", i),
                    user_id: "u1".to_string(),
                    date: None,
                    created_at: first + Duration::days(i as i64) + Duration::hours(hour as i64),
                    mood: Some(3),
                    energy: Some(3),
                    stress: None,
                    wins: win.map(str::to_string),
                })
                .collect(),
        )
    }

    fn ids(insights: &[PatternInsight]) -> Vec<&str> {
        insights.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_early_checkins_are_morning_routine() {
        let history = history(&[7, 8, 9], &[Some("a"), None, Some("b")]);
        let insights = HabitAnalyzer.analyze(&history, &EngineConfig::default()).unwrap();

        assert_eq!(ids(&insights), vec!["morning_person"]);
        assert_eq!(insights[0].confidence, 0.8);
    }

    #[test]
    fn test_hour_read_in_submission_offset() {
        // 20:00 at -07:00 is 03:00 UTC the next day
        let history = history(&[20, 20, 20], &[Some("a"), None, Some("b")]);
        assert_eq!(HabitAnalyzer::average_hour(&history), Some(20.0));

        let insights = HabitAnalyzer.analyze(&history, &EngineConfig::default()).unwrap();
        assert_eq!(ids(&insights), vec!["evening_person"]);
    }

    #[test]
    fn test_midday_average_has_no_timing_insight() {
        let history = history(&[10, 18, 14], &[Some("a"), None, Some("b")]);
        assert!(HabitAnalyzer.analyze(&history, &EngineConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_high_achievement_description() {
        let history = history(&[12, 12, 12, 12], &[Some("a"), Some("b"), Some("c"), None]);
        let insights = HabitAnalyzer.analyze(&history, &EngineConfig::default()).unwrap();

        assert_eq!(ids(&insights), vec!["high_achievement"]);
        assert_eq!(
            insights[0].description,
            "You record wins in 75% of your check-ins. Excellent progress tracking!"
        );
        assert_eq!(
            insights[0].metadata,
            InsightMetadata::WinRate {
                rate: 0.75,
                with_wins: 3,
                total: 4
            }
        );
    }

    #[test]
    fn test_blank_wins_count_as_missing() {
        let history = history(&[12, 12, 12, 12], &[Some(" "), Some(""), None, Some("x")]);
        let insights = HabitAnalyzer.analyze(&history, &EngineConfig::default()).unwrap();

        assert_eq!(ids(&insights), vec!["wins_opportunity"]);
        assert_eq!(insights[0].confidence, 0.7);
    }

    #[test]
    fn test_empty_history_yields_nothing() {
        let empty = CheckInHistory::default();
        assert_eq!(HabitAnalyzer::average_hour(&empty), None);
        assert!(HabitAnalyzer.analyze(&empty, &EngineConfig::default()).unwrap().is_empty());
    }
}
