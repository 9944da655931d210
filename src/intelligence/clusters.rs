// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Behavior archetypes derived from when check-ins happen, not their values

use chrono::{Timelike, Weekday};
use tracing::debug;

use super::temporal::TimeOfDay;
use super::{AnalysisError, BehaviorPattern, InsightKind, InsightMetadata, PatternAnalyzer, PatternInsight};
use crate::config::engine_config::BehaviorThresholds;
use crate::config::EngineConfig;
use crate::constants::{archetype, confidence};
use crate::models::CheckInHistory;

const WORKWEEK: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
    MorningPerson,
    EveningPerson,
}

impl Archetype {
    pub fn label(self) -> &'static str {
        match self {
            Self::MorningPerson => "Morning Person",
            Self::EveningPerson => "Evening Person",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::MorningPerson => "morning_person",
            Self::EveningPerson => "evening_person",
        }
    }

    /// Check-in hours `[start, end)` that count toward the archetype
    pub fn window(self) -> (u32, u32) {
        match self {
            Self::MorningPerson => archetype::MORNING_WINDOW,
            Self::EveningPerson => archetype::EVENING_WINDOW,
        }
    }

    fn time_of_day(self) -> TimeOfDay {
        match self {
            Self::MorningPerson => TimeOfDay::Morning,
            Self::EveningPerson => TimeOfDay::Evening,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::MorningPerson => "Strong preference for morning activities and check-ins",
            Self::EveningPerson => "Strong preference for evening activities and check-ins",
        }
    }

    fn related_metrics(self) -> [&'static str; 2] {
        match self {
            Self::MorningPerson => ["energy", "productivity"],
            Self::EveningPerson => ["mood", "stress"],
        }
    }

    pub fn recommendations(self) -> [&'static str; 4] {
        match self {
            Self::MorningPerson => [
                "Schedule important tasks in the morning",
                "Protect your morning routine",
                "Use early hours for deep work",
                "Plan evening wind-down routine",
            ],
            Self::EveningPerson => [
                "Schedule creative work in the evening",
                "Use mornings for planning and light tasks",
                "Optimize your evening energy",
                "Create a productive night routine",
            ],
        }
    }
}

/// Classifies a user by the timing distribution of their check-ins
pub struct BehaviorClusterer;

impl BehaviorClusterer {
    pub fn cluster(history: &CheckInHistory, thresholds: &BehaviorThresholds) -> Vec<BehaviorPattern> {
        let total = history.len();
        if total == 0 {
            return Vec::new();
        }

        [Archetype::MorningPerson, Archetype::EveningPerson]
            .into_iter()
            .filter_map(|archetype| {
                let (start, end) = archetype.window();
                let count = history
                    .iter()
                    .filter(|c| (start..end).contains(&c.timestamp().hour()))
                    .count();

                debug!(archetype = archetype.label(), count, total, "Archetype window count");

                (count as f64 > total as f64 * thresholds.archetype_share).then(|| BehaviorPattern {
                    pattern_type: archetype.label().to_string(),
                    frequency: count as f64 / total as f64,
                    time_of_day: vec![archetype.time_of_day()],
                    day_of_week: WORKWEEK.to_vec(),
                    correlation: archetype::CORRELATION,
                    description: archetype.description().to_string(),
                    confidence: confidence::ARCHETYPE,
                    related_metrics: archetype
                        .related_metrics()
                        .iter()
                        .map(|m| m.to_string())
                        .collect(),
                })
            })
            .collect()
    }

    fn archetype_of(pattern: &BehaviorPattern) -> Option<Archetype> {
        [Archetype::MorningPerson, Archetype::EveningPerson]
            .into_iter()
            .find(|a| a.label() == pattern.pattern_type)
    }
}

impl PatternAnalyzer for BehaviorClusterer {
    fn name(&self) -> &'static str {
        "behavior_clusters"
    }

    fn analyze(
        &self,
        history: &CheckInHistory,
        config: &EngineConfig,
    ) -> Result<Vec<PatternInsight>, AnalysisError> {
        let thresholds = &config.behavior;

        Self::cluster(history, thresholds)
            .into_iter()
            .filter(|pattern| pattern.confidence > thresholds.min_insight_confidence)
            .map(|pattern| -> Result<PatternInsight, AnalysisError> {
                let archetype = Self::archetype_of(&pattern).ok_or_else(|| {
                    AnalysisError::InvalidData(format!("unknown archetype {}", pattern.pattern_type))
                })?;
                Ok(PatternInsight::new(InsightKind::Archetype(archetype), pattern.description.clone())
                    .with_confidence(pattern.confidence)
                    .with_recommendations(archetype.recommendations())
                    .with_metadata(InsightMetadata::Behavior { pattern }))
            })
            .collect()
    }
}
