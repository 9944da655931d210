// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Heuristic confidence table, fixed user-facing text, and
//! environment-based defaults.

/// Fixed confidence per insight kind.
///
/// These are ranking signals, not probabilities.
pub mod confidence {
    pub const INSUFFICIENT_DATA: f64 = 1.0;

    pub const HIGH_MOOD: f64 = 0.8;
    pub const LOW_MOOD: f64 = 0.9;
    pub const HIGH_ENERGY: f64 = 0.8;
    pub const LOW_ENERGY: f64 = 0.9;

    pub const IMPROVING_TREND: f64 = 0.7;
    pub const DECLINING_TREND: f64 = 0.75;
    pub const FLUCTUATION: f64 = 0.8;

    pub const CHECKIN_TIMING: f64 = 0.8;
    pub const HIGH_ACHIEVEMENT: f64 = 0.9;
    pub const WINS_OPPORTUNITY: f64 = 0.7;

    pub const MOOD_ENERGY_LINK: f64 = 0.8;
    pub const WEEKLY_CYCLE: f64 = 0.75;
    pub const ARCHETYPE: f64 = 0.85;

    pub const FORECAST_READY: f64 = 0.7;
    pub const FORECAST_INSUFFICIENT: f64 = 0.5;

    pub const BUILDING_HABITS: f64 = 0.8;
    pub const MINDFUL_TRACKING: f64 = 0.9;
}

/// Behavior archetype constants
pub mod archetype {
    /// Correlation reported on every archetype pattern
    pub const CORRELATION: f64 = 0.8;

    /// Morning window, hours in `[start, end)`
    pub const MORNING_WINDOW: (u32, u32) = (5, 12);

    /// Evening window, hours in `[start, end)`
    pub const EVENING_WINDOW: (u32, u32) = (17, 22);
}

/// Fixed user-facing text
pub mod messages {
    pub const FORECAST_INSUFFICIENT: &str = "Need more data for accurate predictions";

    pub const TIP_MORNING: &str = "🌅 Morning energy boost: Try a 5-minute walk or stretching routine";
    pub const TIP_MIDDAY: &str = "⚡ Midday momentum: Tackle your most important task now";
    pub const TIP_AFTERNOON: &str = "🎯 Afternoon focus: Time for deep work or planning";
    pub const TIP_EVENING: &str = "🌙 Evening reflection: Review your wins and plan tomorrow";

    /// Returned when check-ins cannot be fetched for suggestion generation
    pub const FALLBACK_SUGGESTIONS: [&str; 4] = [
        "Complete your daily check-in to track progress",
        "Set one specific goal for today",
        "Take breaks every 90 minutes",
        "Celebrate small wins along the way",
    ];
}

/// Environment-based configuration
pub mod env_config {
    use std::env;

    /// Get log level from environment or default
    pub fn log_level() -> String {
        env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    }

    /// Get service name from environment or default
    pub fn service_name() -> String {
        env::var("SERVICE_NAME").unwrap_or_else(|_| "momentum-insights".to_string())
    }

    /// Get check-in data file from environment or default
    pub fn checkins_path() -> String {
        env::var("CHECKINS_PATH").unwrap_or_else(|_| "./data/checkins.json".to_string())
    }

    /// Get the number of recent check-ins fetched per analysis
    pub fn history_limit() -> usize {
        env::var("HISTORY_LIMIT")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidences_are_in_unit_range() {
        let all = [
            confidence::INSUFFICIENT_DATA,
            confidence::HIGH_MOOD,
            confidence::LOW_MOOD,
            confidence::HIGH_ENERGY,
            confidence::LOW_ENERGY,
            confidence::IMPROVING_TREND,
            confidence::DECLINING_TREND,
            confidence::FLUCTUATION,
            confidence::CHECKIN_TIMING,
            confidence::HIGH_ACHIEVEMENT,
            confidence::WINS_OPPORTUNITY,
            confidence::MOOD_ENERGY_LINK,
            confidence::WEEKLY_CYCLE,
            confidence::ARCHETYPE,
            confidence::FORECAST_READY,
            confidence::FORECAST_INSUFFICIENT,
            confidence::BUILDING_HABITS,
            confidence::MINDFUL_TRACKING,
        ];
        assert!(all.iter().all(|c| (0.0..=1.0).contains(c)));
    }

    #[test]
    fn test_archetype_windows_do_not_overlap() {
        assert!(archetype::MORNING_WINDOW.1 <= archetype::EVENING_WINDOW.0);
    }
}
