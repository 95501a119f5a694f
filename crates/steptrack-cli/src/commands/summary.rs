use chrono::NaiveDate;

use steptrack_core::{week_summary, Clock, Config, SystemClock};

use super::{format_duration, CliError};

pub fn run(date: Option<NaiveDate>, weekends: bool) -> Result<(), CliError> {
    let config = Config::load()?;
    let store = super::open_store()?;
    let clock = SystemClock;
    let date = date.unwrap_or_else(|| clock.now().date_naive());
    let include_weekends = weekends || config.week.include_weekends;

    let summary = week_summary(
        &store,
        &clock,
        date,
        include_weekends,
        config.recent_activities_limit,
    )?;

    for (day, totals) in &summary {
        println!("{day}");
        if totals.is_empty() {
            println!("  -");
        }
        for total in totals {
            println!(
                "  {:<24} {}",
                total.name,
                format_duration(total.duration.num_seconds().max(0) as u64)
            );
        }
    }
    Ok(())
}
