// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Next-week best and worst day prediction from weekday averages

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::temporal::TemporalGrouper;
use super::{AnalysisError, InsightKind, InsightMetadata, PatternAnalyzer, PatternInsight};
use crate::config::engine_config::ForecastThresholds;
use crate::config::EngineConfig;
use crate::constants::{confidence, messages};
use crate::models::{CheckInHistory, Metric};

/// Short-term forecast for the coming week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub summary: String,
    pub confidence: f64,
    pub best_mood_day: Option<Weekday>,
    pub lowest_energy_day: Option<Weekday>,
}

impl Forecast {
    fn insufficient() -> Self {
        Self {
            summary: messages::FORECAST_INSUFFICIENT.to_string(),
            confidence: confidence::FORECAST_INSUFFICIENT,
            best_mood_day: None,
            lowest_energy_day: None,
        }
    }

    /// Whether the forecast is backed by enough history
    pub fn is_ready(&self) -> bool {
        self.best_mood_day.is_some() || self.lowest_energy_day.is_some()
    }
}

pub struct Forecaster;

impl Forecaster {
    /// Predict the best mood day and lowest energy day of next week.
    ///
    /// Weekdays are compared Sunday through Saturday and the first extreme
    /// wins a tie. Weekdays without observations are never picked.
    pub fn predict_next_week(history: &CheckInHistory, thresholds: &ForecastThresholds) -> Forecast {
        if history.len() < thresholds.min_records {
            return Forecast::insufficient();
        }

        let best_mood_day = TemporalGrouper::by_weekday(history, Metric::Mood)
            .max_day()
            .map(|(day, _)| day);
        let lowest_energy_day = TemporalGrouper::by_weekday(history, Metric::Energy)
            .min_day()
            .map(|(day, _)| day);

        let expectation = match (best_mood_day, lowest_energy_day) {
            (Some(best), Some(lowest)) => format!(
                "Expect higher mood on {} and lower energy on {}.",
                weekday_name(best),
                weekday_name(lowest)
            ),
            (Some(best), None) => format!("Expect higher mood on {}.", weekday_name(best)),
            (None, Some(lowest)) => format!("Expect lower energy on {}.", weekday_name(lowest)),
            (None, None) => return Forecast::insufficient(),
        };

        debug!(?best_mood_day, ?lowest_energy_day, "Next-week forecast computed");

        Forecast {
            summary: format!("Based on your patterns: {}", expectation),
            confidence: confidence::FORECAST_READY,
            best_mood_day,
            lowest_energy_day,
        }
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

impl PatternAnalyzer for Forecaster {
    fn name(&self) -> &'static str {
        "forecast"
    }

    fn analyze(
        &self,
        history: &CheckInHistory,
        config: &EngineConfig,
    ) -> Result<Vec<PatternInsight>, AnalysisError> {
        let forecast = Self::predict_next_week(history, &config.forecast);
        if !forecast.is_ready() || forecast.confidence < config.forecast.min_insight_confidence {
            return Ok(Vec::new());
        }

        Ok(vec![PatternInsight::new(
            InsightKind::NextWeekForecast,
            format!("Here's what to expect next week. {}", forecast.summary),
        )
        .with_confidence(forecast.confidence)
        .with_recommendations([
            "Prepare for predicted challenges",
            "Take advantage of optimal times",
            "Plan around energy forecasts",
        ])
        .with_metadata(InsightMetadata::Prediction { forecast })])
    }
}
