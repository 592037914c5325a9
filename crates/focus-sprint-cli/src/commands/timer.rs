use clap::Subcommand;
use focus_sprint_core::{Mode, SprintController, TickReport};
use tokio::sync::mpsc;
use tracing::debug;

use crate::host::{Host, TokioScheduler};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the current session
    Start,
    /// Pause the running session
    Pause,
    /// Start if paused, pause if running
    Toggle,
    /// Move on to the next session in the cycle
    Skip,
    /// Refill the current session and forget saved progress
    Reset,
    /// Jump to a mode (focus, break, long-break)
    Switch {
        mode: Mode,
    },
    /// Print current timer state as JSON
    Status,
    /// Stay in the foreground and count down until the session ends
    Run,
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_event_or_status(
    controller: &SprintController,
    event: Option<focus_sprint_core::Event>,
) -> Result<(), Box<dyn std::error::Error>> {
    match event {
        Some(event) => print_json(&event),
        None => print_json(&controller.status()),
    }
}

pub async fn run(host: &Host, action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    if let TimerAction::Run = action {
        return run_foreground(host).await;
    }

    let mut controller = host.controller()?;
    match action {
        TimerAction::Start => {
            let event = controller.start();
            print_event_or_status(&controller, event)?;
        }
        TimerAction::Pause => {
            let event = controller.pause();
            print_event_or_status(&controller, event)?;
        }
        TimerAction::Toggle => {
            let event = controller.toggle();
            print_event_or_status(&controller, event)?;
            eprintln!("[{}]", controller.toggle_label());
        }
        TimerAction::Skip => print_json(&controller.skip())?,
        TimerAction::Reset => print_json(&controller.reset())?,
        TimerAction::Switch { mode } => print_json(&controller.switch_mode(mode))?,
        TimerAction::Status => print_json(&controller.status())?,
        TimerAction::Run => {}
    }
    Ok(())
}

/// Tick at 1 Hz until the session ends without auto-starting the next one,
/// or until Ctrl-C. An interrupted session stays running in the store.
async fn run_foreground(host: &Host) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut controller = host.controller_with(Box::new(TokioScheduler::new(tx)))?;
    if let Some(event) = controller.start() {
        print_json(&event)?;
    }
    if !controller.is_running() {
        return print_json(&controller.status());
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            Some(()) = rx.recv() => {
                match controller.tick() {
                    TickReport::Idle => break,
                    TickReport::Counting { time_left, .. } => {
                        let status = controller.status();
                        eprint!("\r{} {}   ", controller.mode(), status.display);
                        debug!(time_left, "tick");
                    }
                    TickReport::Completed { completed, advanced, .. } => {
                        eprintln!();
                        print_json(&completed)?;
                        print_json(&advanced)?;
                        if !controller.is_running() {
                            break;
                        }
                    }
                }
            }
            _ = &mut ctrl_c => {
                eprintln!();
                break;
            }
        }
    }
    Ok(())
}
