// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pattern engine: runs every analyzer over a history and composes the result

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{
    BehaviorClusterer, Clock, CorrelationAnalyzer, CycleDetector, Forecast, Forecaster, HabitAnalyzer,
    InsightComposer, MetricAnalyzer, PatternAnalyzer, PatternInsight, SuggestionGenerator,
};
use crate::config::EngineConfig;
use crate::logging::AppLogger;
use crate::models::{CheckInHistory, Metric};
use crate::repository::CheckInRepository;

/// Everything the engine derives from one history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternReport {
    pub insights: Vec<PatternInsight>,
    pub suggestions: Vec<String>,
    /// Absent while the history is below the minimum check-in count
    pub forecast: Option<Forecast>,
    pub generated_at: DateTime<Utc>,
}

/// Main entry point for pattern recognition
pub struct PatternEngine {
    analyzers: Vec<Box<dyn PatternAnalyzer>>,
    config: EngineConfig,
}

impl PatternEngine {
    /// Create an engine with default thresholds and all analyzers
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_analyzers(config, Self::default_analyzers())
    }

    /// Create an engine running exactly `analyzers`, in order
    pub fn with_analyzers(config: EngineConfig, analyzers: Vec<Box<dyn PatternAnalyzer>>) -> Self {
        Self { analyzers, config }
    }

    fn default_analyzers() -> Vec<Box<dyn PatternAnalyzer>> {
        vec![
            Box::new(MetricAnalyzer::new(Metric::Mood)),
            Box::new(MetricAnalyzer::new(Metric::Energy)),
            Box::new(HabitAnalyzer),
            Box::new(CorrelationAnalyzer),
            Box::new(CycleDetector),
            Box::new(BehaviorClusterer),
            Box::new(Forecaster),
        ]
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ranked insights for `history`.
    ///
    /// Never fails: a short history yields the insufficient-data insight and
    /// any analyzer error yields the fixed fallback set.
    pub fn analyze(&self, history: &CheckInHistory) -> Vec<PatternInsight> {
        let started = Instant::now();

        if history.len() < self.config.limits.min_checkins {
            debug!(checkins = history.len(), "History below minimum, skipping analyzers");
            return InsightComposer::insufficient_data();
        }

        let mut candidates = Vec::new();
        for analyzer in &self.analyzers {
            match analyzer.analyze(history, &self.config) {
                Ok(found) => {
                    debug!(analyzer = analyzer.name(), candidates = found.len(), "Analyzer finished");
                    candidates.extend(found);
                }
                Err(e) => {
                    AppLogger::log_analyzer_failure(analyzer.name(), &e.to_string());
                    let fallback = InsightComposer::fallback();
                    AppLogger::log_analysis_run(
                        history.len(),
                        fallback.len(),
                        true,
                        started.elapsed().as_millis() as u64,
                    );
                    return fallback;
                }
            }
        }

        let insights = InsightComposer::new(self.config.limits.max_insights).compose(candidates);
        AppLogger::log_analysis_run(
            history.len(),
            insights.len(),
            false,
            started.elapsed().as_millis() as u64,
        );
        insights
    }

    /// Suggestions for `history` at the clock's current hour
    pub fn suggestions(&self, history: &CheckInHistory, clock: &dyn Clock) -> Vec<String> {
        SuggestionGenerator::generate(&self.analyze(history), &self.config.limits, clock)
    }

    /// Next-week forecast, reported even when it lacks data
    pub fn forecast(&self, history: &CheckInHistory) -> Forecast {
        Forecaster::predict_next_week(history, &self.config.forecast)
    }

    pub fn report(&self, history: &CheckInHistory, clock: &dyn Clock) -> PatternReport {
        let insights = self.analyze(history);
        let suggestions = SuggestionGenerator::generate(&insights, &self.config.limits, clock);
        let forecast =
            (history.len() >= self.config.limits.min_checkins).then(|| self.forecast(history));

        PatternReport {
            insights,
            suggestions,
            forecast,
            generated_at: Utc::now(),
        }
    }

    async fn load_history(
        &self,
        repository: &dyn CheckInRepository,
        user_id: &str,
    ) -> anyhow::Result<CheckInHistory> {
        let limit = self.config.limits.history_limit;
        match repository.recent_checkins(user_id, limit).await {
            Ok(checkins) => {
                AppLogger::log_repository_fetch(repository.repository_name(), user_id, checkins.len(), true);
                Ok(CheckInHistory::new(checkins).truncated(limit))
            }
            Err(e) => {
                AppLogger::log_repository_fetch(repository.repository_name(), user_id, 0, false);
                Err(e)
            }
        }
    }

    /// Fetch and analyze a user's recent check-ins.
    ///
    /// A repository failure is treated as an empty history.
    #[instrument(skip(self, repository))]
    pub async fn analyze_user(&self, repository: &dyn CheckInRepository, user_id: &str) -> Vec<PatternInsight> {
        let history = self
            .load_history(repository, user_id)
            .await
            .unwrap_or_default();
        self.analyze(&history)
    }

    /// Fetch a user's check-ins and build suggestions.
    ///
    /// A repository failure yields the generic fallback suggestions.
    #[instrument(skip(self, repository, clock))]
    pub async fn suggestions_for_user(
        &self,
        repository: &dyn CheckInRepository,
        user_id: &str,
        clock: &dyn Clock,
    ) -> Vec<String> {
        match self.load_history(repository, user_id).await {
            Ok(history) => self.suggestions(&history, clock),
            Err(_) => SuggestionGenerator::fallback(),
        }
    }

    #[instrument(skip(self, repository, clock))]
    pub async fn report_for_user(
        &self,
        repository: &dyn CheckInRepository,
        user_id: &str,
        clock: &dyn Clock,
    ) -> PatternReport {
        match self.load_history(repository, user_id).await {
            Ok(history) => self.report(&history, clock),
            Err(_) => PatternReport {
                insights: self.analyze(&CheckInHistory::default()),
                suggestions: SuggestionGenerator::fallback(),
                forecast: None,
                generated_at: Utc::now(),
            },
        }
    }
}

impl Default for PatternEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::{AnalysisError, FixedClock};
    use crate::models::CheckIn;
    use chrono::Duration;

    struct FailingAnalyzer;

    impl PatternAnalyzer for FailingAnalyzer {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn analyze(
            &self,
            _history: &CheckInHistory,
            _config: &EngineConfig,
        ) -> Result<Vec<PatternInsight>, AnalysisError> {
            Err(AnalysisError::ComputationError("boom".to_string()))
        }
    }

    fn history(days: i64) -> CheckInHistory {
        let first = DateTime::parse_from_rfc3339("2025-05-04T08:30:00+01:00").unwrap();
        CheckInHistory::new(
            (0..days)
                .map(|day| CheckIn {
                    id: format!("c{}", day),
                    user_id: "u1".to_string(),
                    date: None,
                    created_at: first + Duration::days(day),
                    mood: Some(if day % 2 == 0 { 5 } else { 4 }),
                    energy: Some(if day % 2 == 0 { 4 } else { 3 }),
                    stress: Some(3),
                    wins: Some("walked".to_string()),
                })
                .collect(),
        )
    }

    #[test]
    fn test_short_history_is_insufficient() {
        let engine = PatternEngine::new();
        for n in 0..3 {
            let insights = engine.analyze(&history(n));
            assert_eq!(insights.len(), 1);
            assert_eq!(insights[0].id, "insufficient_data");
        }
    }

    #[test]
    fn test_failing_analyzer_returns_fallback() {
        let engine = PatternEngine::with_analyzers(
            EngineConfig::default(),
            vec![Box::new(MetricAnalyzer::new(Metric::Mood)), Box::new(FailingAnalyzer)],
        );

        let insights = engine.analyze(&history(10));
        let ids: Vec<&str> = insights.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["building_habits", "mindful_tracking"]);
    }

    #[test]
    fn test_short_history_never_reaches_analyzers() {
        let engine =
            PatternEngine::with_analyzers(EngineConfig::default(), vec![Box::new(FailingAnalyzer)]);

        for n in 0..3 {
            let insights = engine.analyze(&history(n));
            let ids: Vec<&str> = insights.iter().map(|i| i.id.as_str()).collect();
            assert_eq!(ids, vec!["insufficient_data"]);
        }
    }

    #[test]
    fn test_same_input_same_output() {
        let engine = PatternEngine::new();
        let history = history(20);

        let first = engine.report(&history, &FixedClock(9));
        let second = engine.report(&history, &FixedClock(9));

        assert_eq!(first.insights, second.insights);
        assert_eq!(first.suggestions, second.suggestions);
        assert_eq!(first.forecast, second.forecast);
    }

    #[test]
    fn test_report_limits() {
        let engine = PatternEngine::new();
        let report = engine.report(&history(20), &FixedClock(12));

        assert!(!report.insights.is_empty());
        assert!(report.insights.len() <= 8);
        assert!(report.suggestions.len() <= 5);
        assert!(report.forecast.as_ref().is_some_and(|f| f.is_ready()));
        assert!(report.insights.iter().any(|i| i.id == "positive_mood"));
        assert!(report.insights.iter().any(|i| i.id == "high_achievement"));
    }

    #[test]
    fn test_short_history_report_has_no_forecast() {
        let report = PatternEngine::new().report(&history(2), &FixedClock(12));
        assert!(report.forecast.is_none());
        assert_eq!(report.insights[0].id, "insufficient_data");
    }
}
