// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Short actionable suggestions built from ranked insights

use chrono::{Local, Timelike};

use super::PatternInsight;
use crate::config::engine_config::LimitConfig;
use crate::constants::messages;

/// Source of the current local hour
pub trait Clock: Send + Sync {
    /// Hour of day in `0..24`
    fn current_hour(&self) -> u32;
}

/// Reads the hour from the system's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// A clock pinned to one hour, for reproducible output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn current_hour(&self) -> u32 {
        self.0
    }
}

pub struct SuggestionGenerator;

impl SuggestionGenerator {
    /// Time-of-day tip for `hour`
    pub fn time_tip(hour: u32) -> &'static str {
        match hour {
            0..=9 => messages::TIP_MORNING,
            10..=13 => messages::TIP_MIDDAY,
            14..=17 => messages::TIP_AFTERNOON,
            _ => messages::TIP_EVENING,
        }
    }

    /// Recommendations of confident actionable insights followed by one
    /// time-of-day tip, cut to `max_suggestions`.
    ///
    /// The cut happens after the tip is appended, so a long recommendation
    /// list pushes the tip out.
    pub fn generate(insights: &[PatternInsight], limits: &LimitConfig, clock: &dyn Clock) -> Vec<String> {
        let mut suggestions: Vec<String> = insights
            .iter()
            .filter(|insight| insight.actionable && insight.confidence > limits.suggestion_confidence)
            .flat_map(|insight| insight.recommendations.iter().cloned())
            .collect();

        suggestions.push(Self::time_tip(clock.current_hour()).to_string());
        suggestions.truncate(limits.max_suggestions);
        suggestions
    }

    /// Generic suggestions used when check-ins cannot be loaded
    pub fn fallback() -> Vec<String> {
        messages::FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
    }
}
