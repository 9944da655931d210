// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tunable thresholds for the pattern engine

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default file looked up in the working directory
pub const DEFAULT_ENGINE_CONFIG_FILE: &str = "insights_config.toml";

/// Main engine configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub limits: LimitConfig,
    pub metric_thresholds: MetricThresholds,
    pub correlation: CorrelationThresholds,
    pub cycles: CycleThresholds,
    pub behavior: BehaviorThresholds,
    pub forecast: ForecastThresholds,
    pub habits: HabitThresholds,
}

/// Input gates and output sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Below this many check-ins only the insufficient-data insight is returned
    pub min_checkins: usize,
    pub max_insights: usize,
    pub max_suggestions: usize,
    /// Insights must exceed this confidence to contribute suggestions
    pub suggestion_confidence: f64,
    /// Number of recent check-ins fetched from a repository
    pub history_limit: usize,
}

/// Mean, trend and variability thresholds (1-5 scale)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricThresholds {
    pub high_mean: f64,
    pub low_mean: f64,
    /// Absolute trend beyond which a direction is reported
    pub trend: f64,
    /// Population standard deviation above which fluctuation is reported
    pub variability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationThresholds {
    pub min_samples: usize,
    pub strong: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleThresholds {
    pub min_observations: usize,
    /// Variance across weekday means above which a weekly cycle is reported
    pub weekly_variance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorThresholds {
    /// Share of check-ins a time window must exceed to define an archetype
    pub archetype_share: f64,
    /// Patterns must exceed this confidence to become insights
    pub min_insight_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastThresholds {
    pub min_records: usize,
    /// Forecasts at or above this confidence become insights
    pub min_insight_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitThresholds {
    /// Average check-in hour below which a morning routine is reported
    pub early_hour: f64,
    /// Average check-in hour above which an evening habit is reported
    pub late_hour: f64,
    pub high_win_rate: f64,
    pub low_win_rate: f64,
}

impl EngineConfig {
    /// Load engine configuration from file or use defaults
    pub fn load(path: Option<String>) -> Result<Self> {
        Ok(Self::load_override(path, Path::new("."))?.unwrap_or_default())
    }

    /// Thresholds from `path`, else from `insights_config.toml` in `dir`.
    ///
    /// `None` when neither is given, leaving the caller's `[engine]`
    /// section in effect.
    pub fn load_override(path: Option<String>, dir: &Path) -> Result<Option<Self>> {
        if let Some(config_path) = path {
            return Self::load_from_file(&config_path).map(Some);
        }

        let default_file = dir.join(DEFAULT_ENGINE_CONFIG_FILE);
        if default_file.exists() {
            return Self::load_from_file(&default_file.to_string_lossy()).map(Some);
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config file: {}", path))?;

        let config: EngineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse engine config file: {}", path))?;

        Ok(config)
    }
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            min_checkins: 3,
            max_insights: 8,
            max_suggestions: 5,
            suggestion_confidence: 0.6,
            history_limit: 30,
        }
    }
}

impl Default for MetricThresholds {
    fn default() -> Self {
        Self {
            high_mean: 4.0,
            low_mean: 2.5,
            trend: 0.1,
            variability: 1.5,
        }
    }
}

impl Default for CorrelationThresholds {
    fn default() -> Self {
        Self {
            min_samples: 4,
            strong: 0.7,
        }
    }
}

impl Default for CycleThresholds {
    fn default() -> Self {
        Self {
            min_observations: 14,
            weekly_variance: 0.5,
        }
    }
}

impl Default for BehaviorThresholds {
    fn default() -> Self {
        Self {
            archetype_share: 0.6,
            min_insight_confidence: 0.7,
        }
    }
}

impl Default for ForecastThresholds {
    fn default() -> Self {
        Self {
            min_records: 14,
            min_insight_confidence: 0.7,
        }
    }
}

impl Default for HabitThresholds {
    fn default() -> Self {
        Self {
            early_hour: 10.0,
            late_hour: 18.0,
            high_win_rate: 0.7,
            low_win_rate: 0.3,
        }
    }
}
