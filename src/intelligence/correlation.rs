// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pearson correlation between two check-in metrics

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ensure_finite, AnalysisError, InsightKind, InsightMetadata, PatternAnalyzer, PatternInsight};
use crate::config::EngineConfig;
use crate::models::{CheckInHistory, Metric};

/// Correlation measured between two metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub metric1: Metric,
    pub metric2: Metric,
    pub coefficient: f64,
    pub sample_size: usize,
}

/// Pearson coefficient of two equally long series.
///
/// Returns 0 for empty or mismatched input and when either series is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }

    let n = x.len() as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x.powi(2)) * (n * sum_y2 - sum_y.powi(2))).sqrt();

    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// Detects strong links between metrics recorded on the same check-in
pub struct CorrelationAnalyzer;

impl CorrelationAnalyzer {
    /// Values of both metrics from check-ins where both are present
    pub fn paired(history: &CheckInHistory, metric1: Metric, metric2: Metric) -> (Vec<f64>, Vec<f64>) {
        history
            .iter()
            .filter_map(|c| Some((c.metric(metric1)?, c.metric(metric2)?)))
            .unzip()
    }

    /// Correlation of two metrics, or `None` below `min_samples` pairs
    pub fn correlate(
        history: &CheckInHistory,
        metric1: Metric,
        metric2: Metric,
        min_samples: usize,
    ) -> Result<Option<Correlation>, AnalysisError> {
        let (x, y) = Self::paired(history, metric1, metric2);
        if x.len() < min_samples {
            return Ok(None);
        }

        Ok(Some(Correlation {
            metric1,
            metric2,
            coefficient: ensure_finite("correlation", pearson(&x, &y))?,
            sample_size: x.len(),
        }))
    }
}

impl PatternAnalyzer for CorrelationAnalyzer {
    fn name(&self) -> &'static str {
        "correlation"
    }

    fn analyze(
        &self,
        history: &CheckInHistory,
        config: &EngineConfig,
    ) -> Result<Vec<PatternInsight>, AnalysisError> {
        let thresholds = &config.correlation;
        let Some(correlation) =
            Self::correlate(history, Metric::Mood, Metric::Energy, thresholds.min_samples)?
        else {
            return Ok(Vec::new());
        };

        debug!(
            coefficient = correlation.coefficient,
            samples = correlation.sample_size,
            "Mood-energy correlation computed"
        );

        if correlation.coefficient <= thresholds.strong {
            return Ok(Vec::new());
        }

        Ok(vec![PatternInsight::new(
            InsightKind::MoodEnergyLink,
            "Your mood and energy levels are closely linked. Boosting one helps the other!",
        )
        .with_recommendations([
            "Focus on activities that boost both mood and energy",
            "Use energy management for mood regulation",
            "Plan mood-boosting activities",
        ])
        .with_metadata(InsightMetadata::Correlation { correlation })])
    }
}
