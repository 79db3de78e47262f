//! Startup: arguments, configuration and the collaborators the window needs.

use std::path::PathBuf;

use clap::Parser;
use pomodoro_core::storage::MAX_PERIOD_MINUTES;
use pomodoro_core::{
    AppPaths, Config, Database, NotesManager, PomodoroController, SessionManager, SoundManager,
};

use crate::error::AppError;

#[derive(Debug, Parser)]
#[command(name = "pomodoro", version, about = "Pomodoro timer")]
pub struct Args {
    /// Focus period in minutes (this run only)
    #[arg(long, value_name = "MINUTES", value_parser = period_parser())]
    pub focus: Option<u32>,
    /// Rest period in minutes (this run only)
    #[arg(long, value_name = "MINUTES", value_parser = period_parser())]
    pub rest: Option<u32>,
    /// Use this config file instead of the one in the data directory
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn period_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(1..=i64::from(MAX_PERIOD_MINUTES))
}

impl Args {
    /// Data directory layout, honouring `--config`.
    pub fn paths(&self) -> std::io::Result<AppPaths> {
        let paths = AppPaths::discover()?;
        Ok(match &self.config {
            Some(path) => paths.with_config_file(path),
            None => paths,
        })
    }
}

/// Load the config file and lay the command-line periods over it.
pub fn load_config(paths: &AppPaths, args: &Args) -> Result<Config, AppError> {
    let mut config = Config::load(&paths.config_file)?;
    config.apply_overrides(args.focus, args.rest)?;
    tracing::info!(
        focus = config.timer.focus_period_minutes,
        rest = config.timer.rest_period_minutes,
        config = %paths.config_file.display(),
        "configuration loaded"
    );
    Ok(config)
}

/// Wire up sound, notes, session counters and history.
///
/// History that cannot be opened is disabled for the run rather than
/// failing startup.
pub fn build_controller(config: &Config, paths: &AppPaths) -> PomodoroController {
    let sound = SoundManager::new(&config.sound, &paths.sounds_dir);
    let notes = NotesManager::from_config(&config.notes, paths);
    let history = if config.history.enabled {
        match Database::open(&paths.database) {
            Ok(db) => Some(db),
            Err(e) => {
                tracing::warn!(error = %e, "session history disabled");
                None
            }
        }
    } else {
        None
    };

    PomodoroController::new(config, sound, notes, SessionManager::new(), history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomodoro_core::{Phase, TimerState};
    use tempfile::TempDir;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("pomodoro").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn parses_overrides() {
        let a = args(&["--focus", "50", "--rest", "10", "-v"]);
        assert_eq!(a.focus, Some(50));
        assert_eq!(a.rest, Some(10));
        assert!(a.verbose);
        assert!(a.config.is_none());
    }

    #[test]
    fn rejects_out_of_range_periods() {
        assert!(Args::try_parse_from(["pomodoro", "--focus", "0"]).is_err());
        assert!(Args::try_parse_from(["pomodoro", "--rest", "1441"]).is_err());
        assert!(Args::try_parse_from(["pomodoro", "--focus", "ten"]).is_err());
    }

    #[test]
    fn overrides_apply_without_touching_the_file() {
        let tmp = TempDir::new().unwrap();
        let paths = AppPaths::under(tmp.path());
        let config = load_config(&paths, &args(&["--focus", "45"])).unwrap();
        assert_eq!(config.timer.focus_period_minutes, 45);
        assert_eq!(config.timer.rest_period_minutes, 5);

        let on_disk = Config::load(&paths.config_file).unwrap();
        assert_eq!(on_disk.timer.focus_period_minutes, 25);
    }

    #[test]
    fn broken_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let paths = AppPaths::under(tmp.path());
        std::fs::write(&paths.config_file, "{ not json").unwrap();
        assert!(matches!(
            load_config(&paths, &args(&[])),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn controller_starts_idle_in_focus() {
        let tmp = TempDir::new().unwrap();
        let paths = AppPaths::under(tmp.path());
        paths.ensure_dirs().unwrap();
        let config = load_config(&paths, &args(&["--rest", "3"])).unwrap();
        let ctl = build_controller(&config, &paths);

        assert_eq!(ctl.engine().state(), TimerState::Idle);
        assert_eq!(ctl.engine().phase(), Phase::Focus);
        assert_eq!(ctl.engine().durations().minutes(Phase::Rest), 3);
        assert!(ctl.has_history());
        assert_eq!(ctl.notes().path(), tmp.path().join("notes.txt"));
        assert!(paths.icons_dir.is_dir());
        assert!(paths.sounds_dir.is_dir());
    }

    #[test]
    fn history_can_be_switched_off() {
        let tmp = TempDir::new().unwrap();
        let paths = AppPaths::under(tmp.path());
        let mut config = Config::default();
        config.history.enabled = false;
        let ctl = build_controller(&config, &paths);
        assert!(!ctl.has_history());
        assert!(!paths.database.exists());
    }
}
