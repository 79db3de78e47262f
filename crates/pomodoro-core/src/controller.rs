//! Glue between the timer engine and its collaborators.
//!
//! The window only talks to [`PomodoroController`]. Each command is forwarded
//! to the engine; completions are counted, stored and announced here.

use crate::events::Event;
use crate::notes::NotesManager;
use crate::session::SessionManager;
use crate::sound::SoundManager;
use crate::storage::{Config, Database, Stats};
use crate::timer::{Phase, TimerEngine};

pub struct PomodoroController {
    engine: TimerEngine,
    sound: SoundManager,
    notes: NotesManager,
    session: SessionManager,
    history: Option<Database>,
}

impl PomodoroController {
    pub fn new(
        config: &Config,
        sound: SoundManager,
        notes: NotesManager,
        session: SessionManager,
        history: Option<Database>,
    ) -> Self {
        let engine = TimerEngine::new(config.durations())
            .with_auto_advance(config.timer.auto_start_next);
        Self {
            engine,
            sound,
            notes,
            session,
            history,
        }
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn notes(&self) -> &NotesManager {
        &self.notes
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn sound(&self) -> &SoundManager {
        &self.sound
    }

    pub fn has_history(&self) -> bool {
        self.history.is_some()
    }

    /// Today's persisted totals, if history is enabled and readable.
    pub fn stats_today(&self) -> Option<Stats> {
        let db = self.history.as_ref()?;
        match db.stats_today() {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read today's stats");
                None
            }
        }
    }

    pub fn start(&mut self) -> Option<Event> {
        let event = self.engine.start();
        self.log(event.as_ref());
        event
    }

    pub fn pause(&mut self) -> Option<Event> {
        // A phase that ran out since the last frame completes rather than pausing at zero.
        if let Some(done) = self.tick() {
            return Some(done);
        }
        let event = self.engine.pause();
        self.log(event.as_ref());
        event
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.engine.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn skip(&mut self) -> Option<Event> {
        let event = self.engine.skip();
        self.log(event.as_ref());
        event
    }

    pub fn reset(&mut self) -> Option<Event> {
        let event = self.engine.reset();
        self.log(event.as_ref());
        event
    }

    /// Advance the countdown. Call from the event loop.
    pub fn tick(&mut self) -> Option<Event> {
        let event = self.engine.tick()?;
        self.handle(&event);
        Some(event)
    }

    /// Same as [`tick`](Self::tick) with an explicit clock.
    pub fn tick_at(&mut self, now_ms: u64) -> Option<Event> {
        let event = self.engine.tick_at(now_ms)?;
        self.handle(&event);
        Some(event)
    }

    /// Direct engine access, for driving it with an explicit clock.
    pub fn engine_mut(&mut self) -> &mut TimerEngine {
        &mut self.engine
    }

    fn handle(&mut self, event: &Event) {
        let Event::PhaseCompleted {
            phase,
            duration_min,
            started_at,
            next,
            at,
            ..
        } = event
        else {
            return;
        };

        tracing::info!(%phase, %next, duration_min, "phase completed");
        self.session.record(*phase, *duration_min);

        if let Some(db) = &self.history {
            if let Err(e) = db.record_session(*phase, *duration_min, *started_at, *at) {
                tracing::warn!(error = %e, "failed to record session history");
            }
        }

        if let Err(e) = self.sound.play_phase_end(*phase) {
            tracing::warn!(error = %e, "failed to play notification sound");
        }

        if *phase == Phase::Rest {
            tracing::info!(cycles = self.session.cycles(), "cycle finished");
        }
    }

    fn log(&self, event: Option<&Event>) {
        if let Some(event) = event {
            tracing::debug!(?event, "timer command");
        }
    }
}
