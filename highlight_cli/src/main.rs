//! `highlight` command

use clap::Parser;
use highlight_cli::{run, Cli, RunContext};
use highlight_core::config::RuntimeConfig;
use highlight_core::{log_error, logging};
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // HIGHLIGHT_* preferences are read once here
    let config = RuntimeConfig::default();

    if let Err(e) = logging::config::init_runtime_preferences(config.logging.clone()) {
        log::warn!("logging preferences not applied: {}", e);
    }
    if let Err(e) = logging::init_global_logging() {
        log::warn!("engine logging unavailable: {}", e);
    }

    let cli = Cli::parse();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let context = RunContext {
        engine: config.engine,
        color: cli.color.enabled(&stdout),
    };
    let mut out = stdout.lock();

    match run(&cli, &context, &mut input, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = out.flush();
            log_error!(err.error_code(), "highlight failed", "error" => &err);
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
