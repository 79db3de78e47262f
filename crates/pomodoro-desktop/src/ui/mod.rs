//! The timer window.

mod notes_panel;

use std::path::Path;
use std::time::Duration;

use eframe::egui;
use pomodoro_core::{
    format_clock, Config, Event, Phase, PomodoroController, Stats, TimerEngine, TimerState,
};

use notes_panel::NotesPanel;

pub const APP_NAME: &str = "Pomodoro Timer";

const REPAINT_INTERVAL: Duration = Duration::from_millis(250);
const ICON_FILE: &str = "pomodoro.png";

pub struct PomodoroTimer {
    controller: PomodoroController,
    notes: NotesPanel,
    today: TodayStats,
    title: String,
}

/// Today's history totals, re-read only when a phase completes.
struct TodayStats {
    stats: Option<Stats>,
}

impl TodayStats {
    fn load(controller: &PomodoroController) -> Self {
        Self {
            stats: controller.stats_today(),
        }
    }

    fn observe(&mut self, event: Option<&Event>, controller: &PomodoroController) {
        if event.is_some_and(Event::is_completion) {
            self.stats = controller.stats_today();
        }
    }
}

impl PomodoroTimer {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &Config,
        controller: PomodoroController,
    ) -> Self {
        cc.egui_ctx.set_theme(if config.ui.dark_mode {
            egui::Theme::Dark
        } else {
            egui::Theme::Light
        });
        let notes = NotesPanel::load(controller.notes(), config.notes.autosave);
        let today = TodayStats::load(&controller);
        Self {
            controller,
            notes,
            today,
            title: String::new(),
        }
    }

    fn timer_section(&mut self, ui: &mut egui::Ui) {
        let engine = self.controller.engine();
        let phase = engine.phase();

        ui.vertical_centered(|ui| {
            ui.add_space(8.0);
            ui.heading(egui::RichText::new(phase.label()).color(phase_color(phase)));
            ui.label(
                egui::RichText::new(format_clock(engine.remaining_ms()))
                    .size(64.0)
                    .monospace(),
            );
            ui.weak(state_label(engine.state()));
        });

        ui.add(
            egui::ProgressBar::new(engine.progress() as f32)
                .fill(phase_color(phase))
                .desired_height(8.0),
        );
        ui.add_space(8.0);

        let start_label = if engine.is_running() { "Pause" } else { "Start" };
        ui.columns(3, |cols| {
            if wide_button(&mut cols[0], start_label) {
                let event = self.controller.toggle();
                self.today.observe(event.as_ref(), &self.controller);
            }
            if wide_button(&mut cols[1], "Skip") {
                self.controller.skip();
            }
            if wide_button(&mut cols[2], "Reset") {
                self.controller.reset();
            }
        });
    }

    fn session_section(&self, ui: &mut egui::Ui) {
        let session = self.controller.session();
        ui.horizontal(|ui| {
            ui.label(format!("Focus: {}", session.completed(Phase::Focus)));
            ui.separator();
            ui.label(format!("Rest: {}", session.completed(Phase::Rest)));
            ui.separator();
            ui.label(format!("Cycles: {}", session.cycles()));
        });
        if let Some(stats) = &self.today.stats {
            ui.weak(format!(
                "Today: {} pomodoros, {} min focused",
                stats.today_sessions, stats.today_focus_min
            ));
        }
    }

    fn update_title(&mut self, ctx: &egui::Context) {
        let title = window_title(self.controller.engine());
        if title != self.title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.title = title;
        }
    }
}

impl eframe::App for PomodoroTimer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let event = self.controller.tick();
        self.today.observe(event.as_ref(), &self.controller);

        let space = ctx.input(|i| i.key_pressed(egui::Key::Space));
        if space && ctx.memory(|m| m.focused().is_none()) {
            let event = self.controller.toggle();
            self.today.observe(event.as_ref(), &self.controller);
        }

        egui::TopBottomPanel::top("timer").show(ctx, |ui| {
            self.timer_section(ui);
            ui.add_space(4.0);
            self.session_section(ui);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.notes.show(ui, self.controller.notes());
        });

        self.update_title(ctx);

        if self.controller.engine().is_running() {
            ctx.request_repaint_after(REPAINT_INTERVAL);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.notes.flush(self.controller.notes());
    }
}

/// Window settings from the `ui` config section.
pub fn native_options(config: &Config, icons_dir: &Path) -> eframe::NativeOptions {
    let mut viewport = egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([config.ui.window_width, config.ui.window_height])
        .with_min_inner_size([280.0, 360.0]);
    if config.ui.always_on_top {
        viewport = viewport.with_always_on_top();
    }
    if let Some(icon) = load_icon(icons_dir) {
        viewport = viewport.with_icon(icon);
    }
    eframe::NativeOptions {
        viewport,
        ..Default::default()
    }
}

fn load_icon(icons_dir: &Path) -> Option<egui::IconData> {
    let path = icons_dir.join(ICON_FILE);
    let bytes = std::fs::read(&path).ok()?;
    match eframe::icon_data::from_png_bytes(&bytes) {
        Ok(icon) => Some(icon),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable window icon");
            None
        }
    }
}

fn wide_button(ui: &mut egui::Ui, text: &str) -> bool {
    let size = [ui.available_width(), 32.0];
    ui.add_sized(size, egui::Button::new(text)).clicked()
}

fn window_title(engine: &TimerEngine) -> String {
    match engine.state() {
        TimerState::Idle => APP_NAME.to_string(),
        TimerState::Running | TimerState::Paused => format!(
            "{} {} - {APP_NAME}",
            format_clock(engine.remaining_ms()),
            engine.phase().label()
        ),
    }
}

fn state_label(state: TimerState) -> &'static str {
    match state {
        TimerState::Idle => "Ready",
        TimerState::Running => "Running",
        TimerState::Paused => "Paused",
    }
}

fn phase_color(phase: Phase) -> egui::Color32 {
    match phase {
        Phase::Focus => egui::Color32::from_rgb(0xd9, 0x4f, 0x45),
        Phase::Rest => egui::Color32::from_rgb(0x3f, 0xa3, 0x6b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::build_controller;
    use pomodoro_core::{AppPaths, PhaseDurations};

    #[test]
    fn title_shows_countdown_once_started() {
        let mut engine = TimerEngine::new(PhaseDurations::new(25, 5));
        assert_eq!(window_title(&engine), APP_NAME);

        engine.start_at(0);
        engine.tick_at(60_000);
        let title = window_title(&engine);
        assert!(title.starts_with("24:00 "), "{title}");
        assert!(title.ends_with(APP_NAME));

        engine.pause_at(60_000);
        assert!(window_title(&engine).starts_with("24:00 "));
    }

    #[test]
    fn today_stats_follow_completions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let paths = AppPaths::under(tmp.path());
        let mut config = Config::default();
        config.apply_overrides(Some(1), Some(1)).unwrap();
        let mut ctl = build_controller(&config, &paths);
        let mut today = TodayStats::load(&ctl);
        assert_eq!(today.stats.as_ref().unwrap().today_sessions, 0);

        let t0 = now_ms();
        ctl.engine_mut().start_at(t0);
        let started = ctl.tick_at(t0 + 30_000);
        today.observe(started.as_ref(), &ctl);
        assert_eq!(today.stats.as_ref().unwrap().today_sessions, 0);

        let done = ctl.tick_at(t0 + 60_000);
        assert!(done.as_ref().is_some_and(Event::is_completion));
        today.observe(done.as_ref(), &ctl);
        assert_eq!(today.stats.as_ref().unwrap().today_sessions, 1);
    }

    fn now_ms() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64
    }

    #[test]
    fn missing_icon_is_skipped() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(load_icon(tmp.path()).is_none());
        std::fs::write(tmp.path().join(ICON_FILE), b"not a png").unwrap();
        assert!(load_icon(tmp.path()).is_none());
    }

    #[test]
    fn state_labels() {
        assert_eq!(state_label(TimerState::Idle), "Ready");
        assert_eq!(state_label(TimerState::Paused), "Paused");
    }
}
