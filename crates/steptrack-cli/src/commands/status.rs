use super::{format_duration, CliError};

pub fn run(activity: &str, json: bool) -> Result<(), CliError> {
    let (mut tracker, _) = super::open_tracker()?;
    tracker.create_or_load(activity)?;
    let events = tracker.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    for event in &events {
        let marker = if event.is_active { "*" } else { " " };
        println!(
            "{marker} {:<22} {}",
            event.step.name(),
            format_duration(event.duration_secs)
        );
    }
    Ok(())
}
