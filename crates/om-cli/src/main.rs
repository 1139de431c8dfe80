//! objmigrate CLI - schema migrations that keep versioned database objects in step

use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{common, migrate, refresh, resolve, sumfile};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = if cli.sumfile {
        sumfile::execute(&cli)
    } else if let Some(step) = cli.resolve {
        resolve::execute(step, &cli)
    } else if cli.refresh {
        refresh::execute(&cli)
    } else {
        migrate::execute(&cli)
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<common::ExitCode>() {
            Some(code) => std::process::ExitCode::from(u8::try_from(code.0).unwrap_or(1)),
            None => {
                eprintln!("Error: {err:#}");
                std::process::ExitCode::FAILURE
            }
        },
    }
}

/// `info` by default, `debug` with `--verbose`; `RUST_LOG` wins over both.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
