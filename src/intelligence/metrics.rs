// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Mean, trend and variability of a single check-in metric

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::temporal::TemporalGrouper;
use super::{ensure_finite, AnalysisError, InsightKind, InsightMetadata, PatternAnalyzer, PatternInsight};
use crate::config::EngineConfig;
use crate::models::{CheckInHistory, Metric};

/// Direction of a metric over the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

/// Aggregate statistics of one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: Metric,
    pub samples: usize,
    pub mean: f64,
    /// Recent-half mean minus older-half mean; `None` below two samples
    pub trend: Option<f64>,
    /// Population standard deviation
    pub variability: f64,
}

impl MetricSummary {
    /// Summarize `values` given most-recent-first; `None` when empty
    pub fn compute(metric: Metric, values: &[f64]) -> Result<Option<Self>, AnalysisError> {
        let Some(mean) = mean(values) else {
            return Ok(None);
        };
        let variability = population_std_dev(values).unwrap_or(0.0);
        let trend = trend(values)
            .map(|t| ensure_finite("trend", t))
            .transpose()?;

        Ok(Some(Self {
            metric,
            samples: values.len(),
            mean: ensure_finite("mean", mean)?,
            trend,
            variability: ensure_finite("variability", variability)?,
        }))
    }

    pub fn direction(&self, threshold: f64) -> TrendDirection {
        match self.trend {
            Some(t) if t > threshold => TrendDirection::Improving,
            Some(t) if t < -threshold => TrendDirection::Declining,
            _ => TrendDirection::Stable,
        }
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of the first `floor(n/2)` values minus mean of the rest
pub fn trend(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let (recent, older) = values.split_at(values.len() / 2);
    Some(mean(recent)? - mean(older)?)
}

pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Level, trend and fluctuation insights for one metric
pub struct MetricAnalyzer {
    metric: Metric,
}

impl MetricAnalyzer {
    pub fn new(metric: Metric) -> Self {
        Self { metric }
    }

    fn level_insight(&self, summary: &MetricSummary, config: &EngineConfig) -> Option<PatternInsight> {
        let thresholds = &config.metric_thresholds;
        let scale = self.metric.range().1;
        let metadata = InsightMetadata::MetricLevel {
            summary: summary.clone(),
        };

        let insight = if summary.mean >= thresholds.high_mean {
            let (description, recommendations) = match self.metric {
                Metric::Energy => (
                    format!(
                        "You maintain excellent energy levels ({:.1}/{}). Use this to tackle important goals!",
                        summary.mean, scale
                    ),
                    vec![
                        "Schedule demanding tasks during peak energy",
                        "Share your energy strategies",
                        "Plan challenging projects",
                    ],
                ),
                _ => (
                    format!(
                        "Your average {} is {:.1}/{}, showing strong emotional well-being.",
                        self.metric, summary.mean, scale
                    ),
                    vec![
                        "Continue current positive habits",
                        "Share what works with others",
                        "Plan for challenging days",
                    ],
                ),
            };
            PatternInsight::new(InsightKind::HighLevel(self.metric), description)
                .with_recommendations(recommendations)
        } else if summary.mean <= thresholds.low_mean {
            let (description, recommendations) = match self.metric {
                Metric::Energy => (
                    format!(
                        "Your energy averages {:.1}/{}. Let's boost your vitality!",
                        summary.mean, scale
                    ),
                    vec![
                        "Review sleep quality and duration",
                        "Consider nutrition and hydration",
                        "Add short movement breaks",
                        "Manage stress levels",
                    ],
                ),
                _ => (
                    format!(
                        "Your {} has been averaging {:.1}/{}. Let's find ways to boost your well-being.",
                        self.metric, summary.mean, scale
                    ),
                    vec![
                        "Consider talking to someone you trust",
                        "Try a daily gratitude practice",
                        "Schedule enjoyable activities",
                        "Review sleep and exercise habits",
                    ],
                ),
            };
            PatternInsight::new(InsightKind::LowLevel(self.metric), description)
                .with_recommendations(recommendations)
        } else {
            return None;
        };

        Some(insight.with_metadata(metadata))
    }

    fn trend_insight(
        &self,
        summary: &MetricSummary,
        history: &CheckInHistory,
        config: &EngineConfig,
    ) -> Option<PatternInsight> {
        let insight = match summary.direction(config.metric_thresholds.trend) {
            TrendDirection::Improving => PatternInsight::new(
                InsightKind::Improving(self.metric),
                format!(
                    "Your {} shows a positive upward trend. Keep building on this momentum!",
                    self.metric
                ),
            )
            .with_recommendations([
                "Keep doing what you're doing".to_string(),
                format!("Note what activities boost your {}", self.metric),
                "Plan to maintain this momentum".to_string(),
            ]),
            TrendDirection::Declining => PatternInsight::new(
                InsightKind::Declining(self.metric),
                format!(
                    "I've noticed a slight downward trend in your {}. Let's work on this together.",
                    self.metric
                ),
            )
            .with_recommendations([
                "Review recent changes or stressors",
                "Focus on self-care activities",
                "Consider talking to a supportive friend",
                "Try mood-boosting activities",
            ]),
            TrendDirection::Stable => return None,
        };

        Some(insight.with_metadata(self.pattern_metadata(summary, history)))
    }

    fn fluctuation_insight(
        &self,
        summary: &MetricSummary,
        history: &CheckInHistory,
        config: &EngineConfig,
    ) -> Option<PatternInsight> {
        if summary.variability <= config.metric_thresholds.variability {
            return None;
        }

        Some(
            PatternInsight::new(
                InsightKind::Fluctuating(self.metric),
                format!(
                    "Your {} shows significant variations. Understanding these patterns can help stabilize your well-being.",
                    self.metric
                ),
            )
            .with_recommendations([
                format!("Track {} triggers", self.metric),
                "Establish consistent routines".to_string(),
                "Practice stress management".to_string(),
                "Consider stabilizing activities".to_string(),
            ])
            .with_metadata(self.pattern_metadata(summary, history)),
        )
    }

    fn pattern_metadata(&self, summary: &MetricSummary, history: &CheckInHistory) -> InsightMetadata {
        InsightMetadata::MetricPattern {
            summary: summary.clone(),
            by_time_of_day: TemporalGrouper::by_time_of_day(history, self.metric),
            by_weekday: TemporalGrouper::by_weekday(history, self.metric),
        }
    }
}

impl PatternAnalyzer for MetricAnalyzer {
    fn name(&self) -> &'static str {
        match self.metric {
            Metric::Mood => "mood_metrics",
            Metric::Energy => "energy_metrics",
            Metric::Stress => "stress_metrics",
        }
    }

    fn analyze(
        &self,
        history: &CheckInHistory,
        config: &EngineConfig,
    ) -> Result<Vec<PatternInsight>, AnalysisError> {
        let values = history.values(self.metric);
        let Some(summary) = MetricSummary::compute(self.metric, &values)? else {
            debug!(metric = %self.metric, "No values present, skipping metric");
            return Ok(Vec::new());
        };

        debug!(
            metric = %self.metric,
            samples = summary.samples,
            mean = summary.mean,
            trend = ?summary.trend,
            variability = summary.variability,
            "Metric summary computed"
        );

        Ok([
            self.level_insight(&summary, config),
            self.trend_insight(&summary, history, config),
            self.fluctuation_insight(&summary, history, config),
        ]
        .into_iter()
        .flatten()
        .collect())
    }
}
