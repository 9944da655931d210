// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use momentum_insights::config::{Config, EngineConfig};
use momentum_insights::intelligence::forecast::weekday_name;
use momentum_insights::intelligence::{
    Clock, FixedClock, Forecast, PatternEngine, PatternInsight, SystemClock,
};
use momentum_insights::logging;
use momentum_insights::models::CheckInHistory;
use momentum_insights::repository::{create_repository, CheckInRepository};
use std::path::Path;
use tracing::info;

#[derive(Parser)]
#[command(name = "momentum-insights")]
#[command(about = "Analyze daily check-ins for behavioral patterns")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Engine thresholds file, overriding the [engine] section of the config
    /// (insights_config.toml in the working directory when present)
    #[arg(long, global = true)]
    engine_config: Option<String>,

    /// Check-in JSON file, overriding the configured data source
    #[arg(short, long, global = true)]
    file: Option<String>,

    /// User whose check-ins are analyzed
    #[arg(short, long, global = true, default_value = "default")]
    user: String,

    /// Hour of day (0-23) used for time-of-day tips instead of the local clock
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(0..24))]
    hour: Option<u32>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ranked insights
    Insights,
    /// Short actionable suggestions
    Suggestions,
    /// Next-week forecast
    Forecast,
    /// Insights, suggestions and forecast together
    Report,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_from_env()?;

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.clone())?;
    if let Some(engine) = EngineConfig::load_override(cli.engine_config.clone(), Path::new("."))? {
        config.engine = engine;
    }

    let repository: Box<dyn CheckInRepository> = match &cli.file {
        Some(path) => create_repository("json_file", Some(path.as_str()))?,
        None => create_repository(&config.data_source.kind, config.data_source.path.as_deref())?,
    };
    info!(
        repository = repository.repository_name(),
        user = %cli.user,
        "Analyzing check-ins"
    );

    let clock: Box<dyn Clock> = match cli.hour {
        Some(hour) => Box::new(FixedClock(hour)),
        None => Box::new(SystemClock),
    };

    let engine = PatternEngine::with_config(config.engine);

    match cli.command {
        Commands::Insights => {
            let insights = engine.analyze_user(repository.as_ref(), &cli.user).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&insights)?);
            } else {
                print_insights(&insights);
            }
        }
        Commands::Suggestions => {
            let suggestions = engine
                .suggestions_for_user(repository.as_ref(), &cli.user, clock.as_ref())
                .await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&suggestions)?);
            } else {
                print_suggestions(&suggestions);
            }
        }
        Commands::Forecast => {
            let checkins = repository
                .recent_checkins(&cli.user, engine.config().limits.history_limit)
                .await
                .context("Failed to load check-ins")?;
            let forecast = engine.forecast(&CheckInHistory::new(checkins));
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&forecast)?);
            } else {
                print_forecast(&forecast);
            }
        }
        Commands::Report => {
            let report = engine
                .report_for_user(repository.as_ref(), &cli.user, clock.as_ref())
                .await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_insights(&report.insights);
                println!();
                print_suggestions(&report.suggestions);
                if let Some(forecast) = &report.forecast {
                    println!();
                    print_forecast(forecast);
                }
            }
        }
    }

    Ok(())
}

fn print_insights(insights: &[PatternInsight]) {
    println!("Insights");
    println!("========");
    for insight in insights {
        println!(
            "\n{} ({:.0}% confidence, {:?})",
            insight.title,
            insight.confidence * 100.0,
            insight.category
        );
        println!("  {}", insight.description);
        for recommendation in &insight.recommendations {
            println!("  - {}", recommendation);
        }
    }
}

fn print_suggestions(suggestions: &[String]) {
    println!("Suggestions");
    println!("===========");
    for (i, suggestion) in suggestions.iter().enumerate() {
        println!("{}. {}", i + 1, suggestion);
    }
}

fn print_forecast(forecast: &Forecast) {
    println!("Forecast ({:.0}% confidence)", forecast.confidence * 100.0);
    println!("  {}", forecast.summary);
    if let Some(day) = forecast.best_mood_day {
        println!("  Best mood day: {}", weekday_name(day));
    }
    if let Some(day) = forecast.lowest_energy_day {
        println!("  Lowest energy day: {}", weekday_name(day));
    }
}
