// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveTime, TimeZone, Utc, Weekday};
use clap::{Parser, ValueEnum};
use momentum_insights::models::CheckIn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

#[derive(Parser)]
#[command(name = "sample-checkins")]
#[command(about = "Generate a synthetic check-in history as JSON")]
struct Cli {
    /// Number of daily check-ins
    #[arg(short, long, default_value = "30")]
    days: u32,

    /// User id written on every record
    #[arg(short, long, default_value = "default")]
    user: String,

    /// RNG seed, the same seed always yields the same file
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// When the synthetic user usually checks in
    #[arg(long, value_enum, default_value = "morning")]
    rhythm: Rhythm,

    /// UTC offset of the user in hours
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    utc_offset: i32,

    /// Output file, stdout when omitted
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Rhythm {
    Morning,
    Evening,
    Mixed,
}

impl Rhythm {
    fn hour(self, rng: &mut StdRng) -> u32 {
        match self {
            Self::Morning => rng.gen_range(6..10),
            Self::Evening => rng.gen_range(18..22),
            Self::Mixed => rng.gen_range(6..23),
        }
    }
}

const WINS: [&str; 6] = [
    "Finished the weekly report",
    "Went for a run",
    "Cooked dinner at home",
    "Read for thirty minutes",
    "Called a friend",
    "Cleared my inbox",
];

/// Mood follows a weekly rhythm: better on weekends, a dip mid-week
fn weekday_bias(day: Weekday) -> i32 {
    match day {
        Weekday::Sat | Weekday::Sun => 1,
        Weekday::Wed => -1,
        _ => 0,
    }
}

fn generate(cli: &Cli, now: DateTime<Utc>) -> Result<Vec<CheckIn>> {
    let offset = FixedOffset::east_opt(cli.utc_offset * 3600)
        .with_context(|| format!("Invalid UTC offset: {}", cli.utc_offset))?;
    let mut rng = StdRng::seed_from_u64(cli.seed);
    let today = now.with_timezone(&offset).date_naive();

    (0..cli.days)
        .map(|i| {
            let day = today - Duration::days(i64::from(i));
            let time = NaiveTime::from_hms_opt(cli.rhythm.hour(&mut rng), rng.gen_range(0..60), 0)
                .context("Invalid check-in time")?;
            let created_at = offset
                .from_local_datetime(&day.and_time(time))
                .single()
                .context("Ambiguous check-in time")?;

            let bias = weekday_bias(day.weekday());
            let mood = (rng.gen_range(2..=4) + bias).clamp(1, 5) as u8;
            let energy = (i32::from(mood) + rng.gen_range(-1..=1)).clamp(1, 5) as u8;
            let wins = rng
                .gen_bool(0.6)
                .then(|| WINS[rng.gen_range(0..WINS.len())].to_string());

            Ok(CheckIn {
                id: format!("checkin-{}", i + 1),
                user_id: cli.user.clone(),
                date: None,
                created_at,
                mood: Some(mood),
                energy: Some(energy),
                stress: Some(rng.gen_range(0..=10)),
                wins,
            })
        })
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let checkins = generate(&cli, Utc::now())?;
    let json = serde_json::to_string_pretty(&checkins)?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", path))?;
            info!(records = checkins.len(), path = %path, "Sample check-ins written");
        }
        None => println!("{}", json),
    }

    Ok(())
}
