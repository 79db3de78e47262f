//! Desktop Pomodoro timer.

mod bootstrap;
mod error;
mod ui;

use std::process::ExitCode;

use clap::Parser;
use pomodoro_core::{logging, AppPaths};

use bootstrap::Args;
use error::AppError;
use ui::PomodoroTimer;

fn run(args: &Args, paths: &AppPaths) -> Result<(), AppError> {
    let config = bootstrap::load_config(paths, args)?;
    let controller = bootstrap::build_controller(&config, paths);
    paths.ensure_dirs()?;

    let options = ui::native_options(&config, &paths.icons_dir);
    tracing::info!("starting {}", ui::APP_NAME);
    eframe::run_native(
        ui::APP_NAME,
        options,
        Box::new(move |cc| Ok(Box::new(PomodoroTimer::new(cc, &config, controller)))),
    )?;
    tracing::info!("window closed");
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let paths = match args.paths() {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("error: cannot create data directory: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(Some(&paths.log_file), args.verbose) {
        eprintln!("warning: {e}");
    }

    match run(&args, &paths) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "application error");
            ExitCode::FAILURE
        }
    }
}
