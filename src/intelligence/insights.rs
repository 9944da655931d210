// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Insight composition: merging, ranking and the fixed fallback sets

use std::collections::HashMap;

use tracing::debug;

use super::{InsightKind, PatternInsight};

/// Merges analyzer candidates into the final ranked insight list
pub struct InsightComposer {
    max_insights: usize,
}

impl InsightComposer {
    pub fn new(max_insights: usize) -> Self {
        Self { max_insights }
    }

    /// The single insight returned while history is too short to analyze
    pub fn insufficient_data() -> Vec<PatternInsight> {
        vec![PatternInsight::new(
            InsightKind::InsufficientData,
            "Keep checking in daily to unlock personalized insights about your habits and trends.",
        )
        .with_recommendations([
            "Complete daily check-ins for 7 days",
            "Be consistent with timing",
            "Add detailed reflections",
        ])]
    }

    /// Static insights returned when any analyzer fails
    pub fn fallback() -> Vec<PatternInsight> {
        vec![
            PatternInsight::new(
                InsightKind::BuildingHabits,
                "You're developing a consistent check-in routine. This self-awareness is the foundation of growth!",
            )
            .with_recommendations([
                "Continue daily check-ins",
                "Set specific daily goals",
                "Track progress weekly",
            ]),
            PatternInsight::new(
                InsightKind::MindfulTracking,
                "Your commitment to tracking shows dedication to personal growth and self-improvement.",
            )
            .with_recommendations([
                "Use insights to guide decisions",
                "Share learnings with others",
                "Adjust strategies based on patterns",
            ]),
        ]
    }

    /// Rank candidates and keep the top `max_insights`.
    ///
    /// Actionable insights come first, then higher confidence. Candidates
    /// that compare equal keep their analyzer order. A repeated id gets a
    /// numeric suffix (`id_2`, `id_3`, ...) so every returned id is unique.
    pub fn compose(&self, candidates: Vec<PatternInsight>) -> Vec<PatternInsight> {
        let total = candidates.len();
        let mut insights = Self::assign_unique_ids(candidates);

        insights.sort_by(|a, b| {
            b.actionable
                .cmp(&a.actionable)
                .then_with(|| b.confidence.total_cmp(&a.confidence))
        });
        insights.truncate(self.max_insights);

        debug!(candidates = total, kept = insights.len(), "Insights composed");
        insights
    }

    fn assign_unique_ids(candidates: Vec<PatternInsight>) -> Vec<PatternInsight> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        candidates
            .into_iter()
            .map(|mut insight| {
                let count = seen.entry(insight.id.clone()).or_insert(0);
                *count += 1;
                if *count > 1 {
                    insight.id = format!("{}_{}", insight.id, count);
                }
                insight
            })
            .collect()
    }
}

impl Default for InsightComposer {
    fn default() -> Self {
        Self::new(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metric;

    fn candidate(kind: InsightKind, confidence: f64, actionable: bool) -> PatternInsight {
        let insight = PatternInsight::new(kind, "test").with_confidence(confidence);
        if actionable {
            insight
        } else {
            insight.informational()
        }
    }

    #[test]
    fn test_twelve_candidates_keep_eight_actionable_first() {
        let mut candidates = Vec::new();
        for i in 0..6 {
            candidates.push(candidate(InsightKind::WeeklyCycle(Metric::Mood), 0.95 - i as f64 * 0.01, false));
            candidates.push(candidate(InsightKind::Improving(Metric::Energy), 0.5 + i as f64 * 0.01, true));
        }

        let insights = InsightComposer::default().compose(candidates);

        assert_eq!(insights.len(), 8);
        assert!(insights[..6].iter().all(|i| i.actionable));
        assert!(insights[6..].iter().all(|i| !i.actionable));
        assert!((insights[0].confidence - 0.55).abs() < 1e-9);
        assert_eq!(insights[6].confidence, 0.95);
    }

    #[test]
    fn test_confidence_descending_within_actionable() {
        let insights = InsightComposer::default().compose(vec![
            candidate(InsightKind::WinsOpportunity, 0.7, true),
            candidate(InsightKind::LowLevel(Metric::Mood), 0.9, true),
            candidate(InsightKind::MoodEnergyLink, 0.8, true),
        ]);

        let ids: Vec<&str> = insights.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["low_mood_pattern", "mood_energy_link", "wins_opportunity"]);
    }

    #[test]
    fn test_ties_keep_analyzer_order() {
        let insights = InsightComposer::default().compose(vec![
            candidate(InsightKind::HighLevel(Metric::Mood), 0.8, true),
            candidate(InsightKind::MoodEnergyLink, 0.8, true),
            candidate(InsightKind::Fluctuating(Metric::Energy), 0.8, true),
        ]);

        let ids: Vec<&str> = insights.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["positive_mood", "mood_energy_link", "energy_variability"]);
    }

    #[test]
    fn test_duplicate_ids_get_suffix() {
        let insights = InsightComposer::default().compose(vec![
            candidate(InsightKind::MoodEnergyLink, 0.8, true),
            candidate(InsightKind::MoodEnergyLink, 0.8, true),
            candidate(InsightKind::MoodEnergyLink, 0.8, true),
        ]);

        let ids: Vec<&str> = insights.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["mood_energy_link", "mood_energy_link_2", "mood_energy_link_3"]);
    }

    #[test]
    fn test_fixed_sets() {
        let insufficient = InsightComposer::insufficient_data();
        assert_eq!(insufficient.len(), 1);
        assert_eq!(insufficient[0].id, "insufficient_data");
        assert_eq!(insufficient[0].confidence, 1.0);
        assert_eq!(insufficient[0].recommendations.len(), 3);

        let fallback = InsightComposer::fallback();
        let ids: Vec<&str> = fallback.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["building_habits", "mindful_tracking"]);
        assert_eq!(fallback[0].confidence, 0.8);
        assert_eq!(fallback[1].confidence, 0.9);
    }
}
