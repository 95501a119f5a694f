use clap::Subcommand;

use steptrack_core::Step;

use super::CliError;

#[derive(Subcommand)]
pub enum StepAction {
    /// Record a step event for an activity (e.g. IMPLEMENT, DO_REVIEW,
    /// WAIT_FOR_REVIEW_START)
    Start { activity: String, step: String },
    /// Pause the activity, closing every open step
    Pause { activity: String },
}

pub fn run(action: StepAction) -> Result<(), CliError> {
    match action {
        StepAction::Start { activity, step } => {
            let step: Step = step.parse()?;
            if step == Step::Total {
                return Err("the TOTAL row is computed and cannot be started".into());
            }
            record(&activity, step)
        }
        StepAction::Pause { activity } => record(&activity, Step::Pause),
    }
}

fn record(activity: &str, step: Step) -> Result<(), CliError> {
    let (mut tracker, _) = super::open_tracker()?;
    tracker.create_or_load(activity)?;
    tracker.start_step(step)?;
    println!("recorded {step} for '{activity}'");
    Ok(())
}
