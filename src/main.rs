use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use provision_cli::cli;
use provision_cli::commands;
use provision_cli::exec::SystemExecutor;
use provision_cli::logging::{self, Logger};

fn main() -> ExitCode {
    let args = cli::Cli::parse();
    logging::init(args.verbose);
    let log = Arc::new(Logger::new());

    // A user-initiated interrupt is a graceful abort, not a failure.
    let _ = ctrlc::set_handler(|| {
        eprintln!("\nuser aborted provisioning, bye!");
        std::process::exit(0);
    });

    let result = match args.command {
        cli::Command::Install => {
            commands::install::run(&args.global, &log, Arc::new(SystemExecutor))
        }
        cli::Command::Version => {
            let version = option_env!("PROVISION_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
            println!("provision {version}");
            Ok(())
        }
    };

    match result {
        Ok(()) => {
            log.info("provisioning complete, reboot at your earliest convenience");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log.error(&format!("{e:#}"));
            log.error("an error occurred, aborting");
            ExitCode::FAILURE
        }
    }
}
