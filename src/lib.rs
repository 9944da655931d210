// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Momentum Insights
//!
//! Behavioral pattern recognition over a user's daily check-ins. A history of
//! mood, energy, stress, wins and timestamps is turned into a ranked set of
//! insights, short suggestions and a next-week forecast.
//!
//! ## Features
//!
//! - **Metric statistics**: level, trend and variability of mood and energy
//! - **Temporal grouping**: weekday and time-of-day averages
//! - **Correlation**: mood/energy Pearson coefficient
//! - **Cycles**: weekly rhythm detection
//! - **Archetypes**: morning and evening person classification
//! - **Forecast**: best mood day and lowest energy day of next week
//!
//! ## Architecture
//!
//! - **Models**: check-in records and the most-recent-first history
//! - **Intelligence**: analyzers, insight composition and the engine
//! - **Repository**: async check-in sources (JSON file, in-memory)
//! - **Config**: engine thresholds and data source settings
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use momentum_insights::intelligence::{PatternEngine, SystemClock};
//! use momentum_insights::repository::create_repository;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let repository = create_repository("json_file", Some("checkins.json"))?;
//!     let engine = PatternEngine::new();
//!
//!     let report = engine
//!         .report_for_user(repository.as_ref(), "user-1", &SystemClock)
//!         .await;
//!     for insight in &report.insights {
//!         println!("{}: {}", insight.title, insight.description);
//!     }
//!
//!     Ok(())
//! }
//! ```

/// Check-in data models
pub mod models;

/// Configuration management and persistence
pub mod config;

/// Confidence table, fixed messages and environment defaults
pub mod constants;

/// Pattern recognition over check-in history
pub mod intelligence;

/// Async check-in sources
pub mod repository;

/// Structured logging setup
pub mod logging;
