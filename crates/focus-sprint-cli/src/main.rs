use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod host;

use host::Host;

#[derive(Parser)]
#[command(name = "focus-sprint", version, about = "Focus Sprint Pomodoro timer")]
struct Cli {
    /// Answer yes to every confirmation prompt
    #[arg(long, short = 'y', global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Durations, long-break interval, auto-start and alerts
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Task list management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Interface language
    Lang {
        #[command(subcommand)]
        action: commands::lang::LangAction,
    },
    /// Host configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let host = Host::open(cli.yes)?;
    init_tracing(&host.config.log_filter);

    match cli.command {
        Commands::Timer { action } => commands::timer::run(&host, action).await,
        Commands::Settings { action } => commands::settings::run(&host, action).await,
        Commands::Task { action } => commands::task::run(&host, action).await,
        Commands::Lang { action } => commands::lang::run(&host, action),
        Commands::Config { action } => commands::config::run(host, action),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
