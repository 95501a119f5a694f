use clap::Subcommand;

use steptrack_core::LogStore;

use super::CliError;

#[derive(Subcommand)]
pub enum ActivityAction {
    /// Create or load an activity and print its last entry
    Load { name: String },
    /// Load whichever activity was touched most recently
    Latest,
    /// List recently touched activities
    List {
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

pub fn run(action: ActivityAction) -> Result<(), CliError> {
    match action {
        ActivityAction::Load { name } => {
            let (mut tracker, _) = super::open_tracker()?;
            print_loaded(&name, tracker.create_or_load(&name)?);
            Ok(())
        }
        ActivityAction::Latest => {
            let (mut tracker, _) = super::open_tracker()?;
            match tracker.load_latest()? {
                Some((name, last)) => print_loaded(&name, last),
                None => println!("no activities yet"),
            }
            Ok(())
        }
        ActivityAction::List { limit } => {
            let store = super::open_store()?;
            for name in store.recent_activities(limit)? {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn print_loaded(name: &str, last: Option<steptrack_core::TimeLog>) {
    match last {
        Some(log) => println!("loaded '{name}', last entry {} at {}", log.step, log.at),
        None => println!("loaded '{name}', no entries yet"),
    }
}
