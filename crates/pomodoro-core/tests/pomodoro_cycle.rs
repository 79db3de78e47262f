//! Integration tests for a full focus/rest cycle through the controller.

use pomodoro_core::sound::SilentPlayer;
use pomodoro_core::{
    AppPaths, Config, Database, Event, NotesManager, Phase, PomodoroController, SessionManager,
    SoundManager, TimerState,
};
use tempfile::TempDir;

const MIN: u64 = 60_000;

fn bootstrap(tmp: &TempDir, focus: u32, rest: u32) -> (AppPaths, PomodoroController) {
    let paths = AppPaths::under(tmp.path());
    paths.ensure_dirs().unwrap();

    let mut config = Config::load(&paths.config_file).unwrap();
    config.apply_overrides(Some(focus), Some(rest)).unwrap();

    let sound = SoundManager::with_player(Box::new(SilentPlayer), &config.sound, &paths.sounds_dir);
    let notes = NotesManager::from_config(&config.notes, &paths);
    let history = Database::open(&paths.database).unwrap();
    let controller =
        PomodoroController::new(&config, sound, notes, SessionManager::new(), Some(history));
    (paths, controller)
}

#[test]
fn test_full_cycle_updates_session_and_history() {
    let tmp = TempDir::new().unwrap();
    let (paths, mut ctl) = bootstrap(&tmp, 25, 5);
    let t0 = chrono::Utc::now().timestamp_millis() as u64;

    ctl.engine_mut().start_at(t0);
    let mut completions = Vec::new();
    for minute in 1..=58 {
        if let Some(Event::PhaseCompleted { phase, .. }) = ctl.tick_at(t0 + minute * MIN) {
            completions.push(phase);
        }
    }

    // 25 focus + 5 rest + 25 focus = 55 minutes; the next rest is still running.
    assert_eq!(completions, vec![Phase::Focus, Phase::Rest, Phase::Focus]);
    assert_eq!(ctl.engine().phase(), Phase::Rest);
    assert_eq!(ctl.engine().state(), TimerState::Running);
    assert_eq!(ctl.session().cycles(), 1);
    assert_eq!(ctl.session().focus_minutes(), 50);

    drop(ctl);
    let db = Database::open(&paths.database).unwrap();
    let stats = db.stats_all().unwrap();
    assert_eq!(stats.completed_pomodoros, 2);
    assert_eq!(stats.total_rest_min, 5);
    assert_eq!(db.recent(10).unwrap().len(), 3);
}

#[test]
fn test_overrides_do_not_touch_config_file() {
    let tmp = TempDir::new().unwrap();
    let (paths, ctl) = bootstrap(&tmp, 50, 10);
    assert_eq!(ctl.engine().remaining_ms(), 50 * MIN);

    let on_disk = Config::load(&paths.config_file).unwrap();
    assert_eq!(on_disk.timer.focus_period_minutes, 25);
    assert_eq!(on_disk.timer.rest_period_minutes, 5);
}

#[test]
fn test_manual_advance_waits_for_user() {
    let tmp = TempDir::new().unwrap();
    let paths = AppPaths::under(tmp.path());
    let mut config = Config::load(&paths.config_file).unwrap();
    config.set("timer.auto_start_next", "false").unwrap();
    config.apply_overrides(Some(1), Some(1)).unwrap();

    let sound = SoundManager::with_player(Box::new(SilentPlayer), &config.sound, &paths.sounds_dir);
    let notes = NotesManager::from_config(&config.notes, &paths);
    let mut ctl = PomodoroController::new(&config, sound, notes, SessionManager::new(), None);

    let t0 = 1_700_000_000_000;
    ctl.engine_mut().start_at(t0);
    assert!(ctl.tick_at(t0 + MIN).is_some());
    assert_eq!(ctl.engine().state(), TimerState::Idle);
    assert!(ctl.tick_at(t0 + 5 * MIN).is_none());
    assert_eq!(ctl.session().completed(Phase::Rest), 0);
}

#[test]
fn test_notes_persist_in_data_dir() {
    let tmp = TempDir::new().unwrap();
    let (paths, ctl) = bootstrap(&tmp, 25, 5);
    ctl.notes().append("outline the talk").unwrap();

    let reopened = NotesManager::new(paths.root.join("notes.txt"));
    assert!(reopened.load().unwrap().contains("outline the talk"));
}
