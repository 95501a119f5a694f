use tokio::sync::broadcast::error::RecvError;

use super::CliError;

/// Load the activity and print every duration event as one JSON line,
/// starting with the full replay, until interrupted.
pub async fn run(activity: &str) -> Result<(), CliError> {
    let (mut tracker, _) = super::open_tracker()?;
    let mut rx = tracker.subscribe();
    tracker.create_or_load(activity)?;

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => println!("{}", serde_json::to_string(&event)?),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "dropped events, consumer too slow");
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}
