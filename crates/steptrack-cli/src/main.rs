use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "steptrack", version, about = "Step time tracking for a single active task")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Activity management
    Activity {
        #[command(subcommand)]
        action: commands::activity::ActivityAction,
    },
    /// Record step events
    Step {
        #[command(subcommand)]
        action: commands::step::StepAction,
    },
    /// Per-step durations for an activity
    Status {
        activity: String,
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Week summary of union totals per day
    Summary {
        /// A date inside the week to summarize (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Include Saturday and Sunday
        #[arg(long)]
        weekends: bool,
    },
    /// Load an activity and stream live duration events as JSON lines
    Watch { activity: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Activity { action } => commands::activity::run(action),
        Commands::Step { action } => commands::step::run(action),
        Commands::Status { activity, json } => commands::status::run(&activity, json),
        Commands::Summary { date, weekends } => commands::summary::run(date, weekends),
        Commands::Watch { activity } => commands::watch::run(&activity).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
