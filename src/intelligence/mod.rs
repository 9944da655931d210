// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Intelligence Module
//!
//! Pattern recognition over a user's check-in history.
//!
//! This module includes:
//! - Metric statistics (mean, trend, variability)
//! - Weekday and time-of-day grouping
//! - Mood/energy correlation
//! - Weekly cycle detection
//! - Behavior archetypes from check-in timing
//! - Next-week forecasting
//! - Insight ranking and suggestion generation

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::constants::confidence;
use crate::models::{CheckInHistory, Metric};

pub mod clusters;
pub mod correlation;
pub mod cycles;
pub mod engine;
pub mod forecast;
pub mod habits;
pub mod insights;
pub mod metrics;
pub mod suggestions;
pub mod temporal;

pub use clusters::{Archetype, BehaviorClusterer};
pub use correlation::{pearson, Correlation, CorrelationAnalyzer};
pub use cycles::{CycleDetector, CycleKind, CycleReport};
pub use engine::{PatternEngine, PatternReport};
pub use forecast::{Forecast, Forecaster};
pub use habits::HabitAnalyzer;
pub use insights::InsightComposer;
pub use metrics::{MetricAnalyzer, MetricSummary};
pub use suggestions::{Clock, FixedClock, SuggestionGenerator, SystemClock};
pub use temporal::{TemporalGrouper, TimeOfDay, TimeOfDayMeans, WeekdayMeans};

/// An analyzer contributing candidate insights to the engine
pub trait PatternAnalyzer: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Produce candidate insights for `history`
    fn analyze(
        &self,
        history: &CheckInHistory,
        config: &EngineConfig,
    ) -> Result<Vec<PatternInsight>, AnalysisError>;
}

/// A ranked, human-readable observation derived from check-in history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternInsight {
    /// Stable identifier of the rule that produced the insight
    pub id: String,
    pub title: String,
    pub description: String,
    /// Heuristic ranking signal in [0, 1]
    pub confidence: f64,
    pub category: InsightCategory,
    pub actionable: bool,
    pub recommendations: Vec<String>,
    pub metadata: InsightMetadata,
}

impl PatternInsight {
    /// Create an actionable insight with the kind's id, title, confidence and category
    pub fn new(kind: InsightKind, description: impl Into<String>) -> Self {
        Self {
            id: kind.id(),
            title: kind.title(),
            description: description.into(),
            confidence: kind.confidence(),
            category: kind.category(),
            actionable: true,
            recommendations: Vec::new(),
            metadata: InsightMetadata::None,
        }
    }

    pub fn with_recommendations<I, S>(mut self, recommendations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recommendations = recommendations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_metadata(mut self, metadata: InsightMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Override the kind's fixed confidence, clamped to [0, 1]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Mark the insight as informational only
    pub fn informational(mut self) -> Self {
        self.actionable = false;
        self
    }
}

/// Category an insight is displayed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Mood,
    Energy,
    Productivity,
    Behavioral,
    Temporal,
    Correlation,
    Prediction,
}

/// Every rule that can produce an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightKind {
    InsufficientData,
    HighLevel(Metric),
    LowLevel(Metric),
    Improving(Metric),
    Declining(Metric),
    Fluctuating(Metric),
    MorningRoutine,
    EveningReflection,
    HighAchievement,
    WinsOpportunity,
    MoodEnergyLink,
    WeeklyCycle(Metric),
    Archetype(Archetype),
    NextWeekForecast,
    BuildingHabits,
    MindfulTracking,
}

impl InsightKind {
    pub fn id(self) -> String {
        match self {
            Self::InsufficientData => "insufficient_data".to_string(),
            Self::HighLevel(Metric::Mood) => "positive_mood".to_string(),
            Self::HighLevel(metric) => format!("high_{}", metric),
            Self::LowLevel(metric) => format!("low_{}_pattern", metric),
            Self::Improving(metric) => format!("improving_{}", metric),
            Self::Declining(metric) => format!("declining_{}", metric),
            Self::Fluctuating(metric) => format!("{}_variability", metric),
            Self::MorningRoutine => "morning_person".to_string(),
            Self::EveningReflection => "evening_person".to_string(),
            Self::HighAchievement => "high_achievement".to_string(),
            Self::WinsOpportunity => "wins_opportunity".to_string(),
            Self::MoodEnergyLink => "mood_energy_link".to_string(),
            Self::WeeklyCycle(metric) => format!("weekly_{}_cycle", metric),
            Self::Archetype(archetype) => format!("cluster_{}", archetype.slug()),
            Self::NextWeekForecast => "next_week_prediction".to_string(),
            Self::BuildingHabits => "building_habits".to_string(),
            Self::MindfulTracking => "mindful_tracking".to_string(),
        }
    }

    pub fn title(self) -> String {
        match self {
            Self::InsufficientData => "Building Your Pattern Profile".to_string(),
            Self::HighLevel(Metric::Mood) => "Consistently Positive Mood".to_string(),
            Self::HighLevel(Metric::Energy) => "High Energy Levels ⚡".to_string(),
            Self::HighLevel(metric) => format!("High {} Levels", capitalize(metric.as_str())),
            Self::LowLevel(Metric::Mood) => "Mood Support Needed".to_string(),
            Self::LowLevel(Metric::Energy) => "Energy Optimization Needed".to_string(),
            Self::LowLevel(metric) => format!("Low {} Levels", capitalize(metric.as_str())),
            Self::Improving(metric) => format!("{} is Improving! 📈", capitalize(metric.as_str())),
            Self::Declining(metric) => format!("{} Trend Alert", capitalize(metric.as_str())),
            Self::Fluctuating(metric) => {
                format!("{} Fluctuations Detected", capitalize(metric.as_str()))
            }
            Self::MorningRoutine => "You're a Morning Person! 🌅".to_string(),
            Self::EveningReflection => "Evening Reflection Habit 🌙".to_string(),
            Self::HighAchievement => "High Achievement Rate 🏆".to_string(),
            Self::WinsOpportunity => "More Wins to Celebrate".to_string(),
            Self::MoodEnergyLink => "Strong Mood-Energy Connection".to_string(),
            Self::WeeklyCycle(Metric::Energy) => "Weekly Energy Pattern Found".to_string(),
            Self::WeeklyCycle(metric) => {
                format!("Weekly {} Pattern Detected", capitalize(metric.as_str()))
            }
            Self::Archetype(archetype) => format!("{} Pattern Identified", archetype.label()),
            Self::NextWeekForecast => "Next Week's Forecast".to_string(),
            Self::BuildingHabits => "Building Strong Habits 💪".to_string(),
            Self::MindfulTracking => "Mindful Self-Tracking".to_string(),
        }
    }

    pub fn confidence(self) -> f64 {
        match self {
            Self::InsufficientData => confidence::INSUFFICIENT_DATA,
            Self::HighLevel(Metric::Mood) => confidence::HIGH_MOOD,
            Self::HighLevel(_) => confidence::HIGH_ENERGY,
            Self::LowLevel(Metric::Mood) => confidence::LOW_MOOD,
            Self::LowLevel(_) => confidence::LOW_ENERGY,
            Self::Improving(_) => confidence::IMPROVING_TREND,
            Self::Declining(_) => confidence::DECLINING_TREND,
            Self::Fluctuating(_) => confidence::FLUCTUATION,
            Self::MorningRoutine | Self::EveningReflection => confidence::CHECKIN_TIMING,
            Self::HighAchievement => confidence::HIGH_ACHIEVEMENT,
            Self::WinsOpportunity => confidence::WINS_OPPORTUNITY,
            Self::MoodEnergyLink => confidence::MOOD_ENERGY_LINK,
            Self::WeeklyCycle(_) => confidence::WEEKLY_CYCLE,
            Self::Archetype(_) => confidence::ARCHETYPE,
            Self::NextWeekForecast => confidence::FORECAST_READY,
            Self::BuildingHabits => confidence::BUILDING_HABITS,
            Self::MindfulTracking => confidence::MINDFUL_TRACKING,
        }
    }

    pub fn category(self) -> InsightCategory {
        match self {
            Self::HighLevel(metric)
            | Self::LowLevel(metric)
            | Self::Improving(metric)
            | Self::Declining(metric)
            | Self::Fluctuating(metric) => match metric {
                Metric::Mood => InsightCategory::Mood,
                Metric::Energy => InsightCategory::Energy,
                Metric::Stress => InsightCategory::Behavioral,
            },
            Self::MorningRoutine | Self::EveningReflection | Self::WeeklyCycle(_) => {
                InsightCategory::Temporal
            }
            Self::HighAchievement | Self::WinsOpportunity => InsightCategory::Productivity,
            Self::MoodEnergyLink => InsightCategory::Correlation,
            Self::NextWeekForecast => InsightCategory::Prediction,
            Self::InsufficientData
            | Self::Archetype(_)
            | Self::BuildingHabits
            | Self::MindfulTracking => InsightCategory::Behavioral,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Supporting data attached to an insight, shaped per insight kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsightMetadata {
    None,
    MetricLevel {
        summary: MetricSummary,
    },
    MetricPattern {
        summary: MetricSummary,
        by_time_of_day: TimeOfDayMeans,
        by_weekday: WeekdayMeans,
    },
    CheckInTiming {
        average_hour: f64,
        checkins: usize,
    },
    WinRate {
        rate: f64,
        with_wins: usize,
        total: usize,
    },
    Correlation {
        correlation: Correlation,
    },
    Cycle {
        metric: Metric,
        cycles: CycleReport,
        by_weekday: WeekdayMeans,
    },
    Behavior {
        pattern: BehaviorPattern,
    },
    Prediction {
        forecast: Forecast,
    },
}

/// A qualitative behavior label derived from check-in timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorPattern {
    #[serde(rename = "type")]
    pub pattern_type: String,
    /// Share of check-ins supporting the pattern, in [0, 1]
    pub frequency: f64,
    pub time_of_day: Vec<TimeOfDay>,
    pub day_of_week: Vec<Weekday>,
    /// In [-1, 1]
    pub correlation: f64,
    pub description: String,
    /// In [0, 1]
    pub confidence: f64,
    pub related_metrics: Vec<String>,
}

/// Errors that can occur during analysis
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Insufficient check-in data for analysis: {0}")]
    InsufficientData(String),

    #[error("Invalid check-in data: {0}")]
    InvalidData(String),

    #[error("Analysis computation failed: {0}")]
    ComputationError(String),
}

/// Reject NaN and infinite statistics before they reach an insight
pub(crate) fn ensure_finite(label: &str, value: f64) -> Result<f64, AnalysisError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalysisError::ComputationError(format!(
            "{} is not finite ({})",
            label, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_kind_ids_are_distinct() {
        let kinds = [
            InsightKind::InsufficientData,
            InsightKind::HighLevel(Metric::Mood),
            InsightKind::HighLevel(Metric::Energy),
            InsightKind::LowLevel(Metric::Mood),
            InsightKind::LowLevel(Metric::Energy),
            InsightKind::Improving(Metric::Mood),
            InsightKind::Improving(Metric::Energy),
            InsightKind::Declining(Metric::Mood),
            InsightKind::Fluctuating(Metric::Mood),
            InsightKind::MorningRoutine,
            InsightKind::EveningReflection,
            InsightKind::HighAchievement,
            InsightKind::WinsOpportunity,
            InsightKind::MoodEnergyLink,
            InsightKind::WeeklyCycle(Metric::Mood),
            InsightKind::WeeklyCycle(Metric::Energy),
            InsightKind::Archetype(Archetype::MorningPerson),
            InsightKind::Archetype(Archetype::EveningPerson),
            InsightKind::NextWeekForecast,
            InsightKind::BuildingHabits,
            InsightKind::MindfulTracking,
        ];

        let mut ids: Vec<String> = kinds.iter().map(|k| k.id()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_insight_kind_table() {
        assert_eq!(InsightKind::HighLevel(Metric::Mood).id(), "positive_mood");
        assert_eq!(InsightKind::Fluctuating(Metric::Mood).id(), "mood_variability");
        assert_eq!(InsightKind::WeeklyCycle(Metric::Energy).id(), "weekly_energy_cycle");
        assert_eq!(InsightKind::Improving(Metric::Mood).title(), "Mood is Improving! 📈");
        assert_eq!(InsightKind::Declining(Metric::Mood).confidence(), 0.75);
        assert_eq!(InsightKind::LowLevel(Metric::Energy).category(), InsightCategory::Energy);
        assert_eq!(InsightKind::MoodEnergyLink.category(), InsightCategory::Correlation);
    }

    #[test]
    fn test_with_confidence_clamps() {
        let insight = PatternInsight::new(InsightKind::BuildingHabits, "x").with_confidence(1.4);
        assert_eq!(insight.confidence, 1.0);
    }

    #[test]
    fn test_behavior_pattern_serializes_type_field() {
        let pattern = BehaviorPattern {
            pattern_type: "Morning Person".to_string(),
            frequency: 0.7,
            time_of_day: vec![TimeOfDay::Morning],
            day_of_week: vec![Weekday::Mon],
            correlation: 0.8,
            description: "d".to_string(),
            confidence: 0.85,
            related_metrics: vec!["energy".to_string()],
        };

        let json = serde_json::to_value(&pattern).unwrap();
        assert_eq!(json["type"], "Morning Person");
        assert_eq!(json["time_of_day"][0], "morning");
    }

    #[test]
    fn test_metadata_is_tagged() {
        let metadata = InsightMetadata::WinRate {
            rate: 0.8,
            with_wins: 8,
            total: 10,
        };
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["kind"], "win_rate");
        assert_eq!(json["with_wins"], 8);
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite("mean", 2.5).is_ok());
        assert!(matches!(
            ensure_finite("mean", f64::NAN),
            Err(AnalysisError::ComputationError(_))
        ));
    }
}
