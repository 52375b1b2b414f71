mod cli;
mod config;
mod engine;
mod error;
mod jira;
mod logging;
mod report;
mod schedule;
mod scheduler;
mod waiter;

use clap::Parser;
use chrono::Local;
use tracing::{error, info};

use crate::cli::Cli;
use crate::config::PontoConfig;
use crate::engine::Engine;
use crate::jira::JiraClient;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Pure reporting modes need no credentials, no clock and no log sink.
    if cli.calc_duration {
        report::show_duration();
        return;
    }
    if cli.schedule {
        report::show_schedule();
        return;
    }

    let exit = run(cli).await;
    std::process::exit(exit);
}

/// Everything that needs config and the log sink. Returns the process exit
/// code; the tracing worker guard is dropped (and flushed) on the way out.
async fn run(cli: Cli) -> i32 {
    let config = match PontoConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return 1;
        }
    };
    let _guard = match logging::init(&config.log_path) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return 1;
        }
    };

    if let Err(e) = config.require_credentials() {
        error!("{e}");
        return 1;
    }
    let client = JiraClient::new(
        config.domain.clone(),
        config.email.clone(),
        config.api_token.clone(),
    );

    if cli.verify {
        return match report::verify(&client, &config.domain).await {
            Ok(()) => 0,
            Err(_) => 1,
        };
    }

    if cli.daemon {
        return match scheduler::run(&client, &config).await {
            Ok(()) => 0,
            Err(e) => {
                error!("Scheduler stopped: {e}");
                e.exit_code()
            }
        };
    }

    // One invocation = one slot = one pass.
    let now = Local::now().naive_local();
    let Some(slot) = schedule::resolve(now, cli.time_slot.to_slot_name()) else {
        if !schedule::is_working_day(now.date()) {
            info!("Today is a weekend. No automation runs on weekends. Exiting.");
        } else {
            info!(
                "No slot is due at {}. Exiting.",
                now.time().format("%H:%M:%S")
            );
        }
        return 0;
    };

    if cli.test {
        info!("=== TEST MODE (no transitions will be executed) ===");
    }

    let engine = Engine::new(&client, &config, cli.test);
    let wait = !cli.no_wait && !cli.test;
    match engine.run_slot(&slot, wait).await {
        Ok(run) if run.is_clean() => 0,
        Ok(_) => 1,
        Err(e) => {
            error!("Slot {} failed: {e}", slot.name);
            e.exit_code()
        }
    }
}
