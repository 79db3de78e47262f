//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` periodically
//! (the desktop window does so from its event loop).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//! Running --(phase ends)--> Running (next phase, auto start) | Idle (next phase)
//! any --skip--> Idle (next phase)     any --reset--> Idle (Focus)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(PhaseDurations::new(25, 5));
//! engine.start();
//! // In a loop:
//! engine.tick(); // Returns Some(Event::PhaseCompleted) when a phase ends
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::phase::{Phase, PhaseDurations};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Core timer engine.
///
/// Operates on wall-clock deltas -- no internal thread.
/// Every command has an `*_at` twin taking "now" in epoch milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    durations: PhaseDurations,
    state: TimerState,
    phase: Phase,
    /// Remaining time in milliseconds for the current phase.
    remaining_ms: u64,
    /// Length of the current phase, fixed when the phase is entered.
    phase_total_ms: u64,
    /// Timestamp (ms since epoch) of the last elapsed-time flush while running.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
    /// When the current phase was first started.
    #[serde(default)]
    phase_started_at: Option<DateTime<Utc>>,
    /// Start the following phase automatically when one completes.
    #[serde(default = "default_auto_advance")]
    auto_advance: bool,
}

fn default_auto_advance() -> bool {
    true
}

impl TimerEngine {
    /// Create an idle engine at the start of a focus phase.
    pub fn new(durations: PhaseDurations) -> Self {
        Self {
            durations,
            state: TimerState::Idle,
            phase: Phase::Focus,
            remaining_ms: durations.duration_ms(Phase::Focus),
            phase_total_ms: durations.duration_ms(Phase::Focus),
            last_tick_epoch_ms: None,
            phase_started_at: None,
            auto_advance: true,
        }
    }

    pub fn with_auto_advance(mut self, auto_advance: bool) -> Self {
        self.auto_advance = auto_advance;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Remaining time as of the last flush. Call `tick()` first for a fresh value.
    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn total_ms(&self) -> u64 {
        self.phase_total_ms
    }

    pub fn phase_started_at(&self) -> Option<DateTime<Utc>> {
        self.phase_started_at
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.total_ms();
        if total == 0 {
            return 0.0;
        }
        (1.0 - (self.remaining_ms as f64 / total as f64)).clamp(0.0, 1.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            phase: self.phase,
            remaining_ms: self.remaining_ms,
            total_ms: self.total_ms(),
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        self.start_at(now_ms())
    }

    pub fn start_at(&mut self, now: u64) -> Option<Event> {
        match self.state {
            TimerState::Idle => {
                self.state = TimerState::Running;
                self.last_tick_epoch_ms = Some(now);
                if self.phase_started_at.is_none() {
                    self.phase_started_at = Some(to_datetime(now));
                }
                Some(Event::TimerStarted {
                    phase: self.phase,
                    duration_secs: self.remaining_ms / 1000,
                    at: to_datetime(now),
                })
            }
            TimerState::Paused => self.resume_at(now),
            TimerState::Running => None, // Already running.
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.pause_at(now_ms())
    }

    pub fn pause_at(&mut self, now: u64) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        // Flush elapsed time first.
        self.flush_elapsed(now);
        self.state = TimerState::Paused;
        self.last_tick_epoch_ms = None;
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_ms: self.remaining_ms,
            at: to_datetime(now),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        self.resume_at(now_ms())
    }

    pub fn resume_at(&mut self, now: u64) -> Option<Event> {
        if self.state != TimerState::Paused {
            return None;
        }
        self.state = TimerState::Running;
        self.last_tick_epoch_ms = Some(now);
        Some(Event::TimerResumed {
            phase: self.phase,
            remaining_ms: self.remaining_ms,
            at: to_datetime(now),
        })
    }

    /// Start, pause or resume depending on the current state.
    pub fn toggle(&mut self) -> Option<Event> {
        self.toggle_at(now_ms())
    }

    pub fn toggle_at(&mut self, now: u64) -> Option<Event> {
        match self.state {
            TimerState::Running => self.pause_at(now),
            TimerState::Idle | TimerState::Paused => self.start_at(now),
        }
    }

    /// Abandon the current phase and wait, idle, at the start of the next one.
    pub fn skip(&mut self) -> Option<Event> {
        self.skip_at(now_ms())
    }

    pub fn skip_at(&mut self, now: u64) -> Option<Event> {
        let from = self.phase;
        self.enter_phase(from.next());
        self.state = TimerState::Idle;
        self.last_tick_epoch_ms = None;
        Some(Event::PhaseSkipped {
            from,
            to: self.phase,
            at: to_datetime(now),
        })
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.reset_at(now_ms())
    }

    pub fn reset_at(&mut self, now: u64) -> Option<Event> {
        self.enter_phase(Phase::Focus);
        self.state = TimerState::Idle;
        self.last_tick_epoch_ms = None;
        Some(Event::TimerReset { at: to_datetime(now) })
    }

    /// Call periodically. Returns `Some(Event::PhaseCompleted)` when a phase finishes.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(now_ms())
    }

    pub fn tick_at(&mut self, now: u64) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.flush_elapsed(now);
        if self.remaining_ms > 0 {
            return None;
        }

        let finished = self.phase;
        let duration_min = self.phase_total_ms / 60_000;
        let started_at = self.phase_started_at.unwrap_or_else(|| to_datetime(now));
        let next = finished.next();
        // Overshoot is dropped: the next phase always gets its full length.
        self.enter_phase(next);
        if self.auto_advance {
            self.state = TimerState::Running;
            self.last_tick_epoch_ms = Some(now);
            self.phase_started_at = Some(to_datetime(now));
        } else {
            self.state = TimerState::Idle;
            self.last_tick_epoch_ms = None;
        }

        Some(Event::PhaseCompleted {
            phase: finished,
            duration_min,
            started_at,
            next,
            auto_started: self.auto_advance,
            at: to_datetime(now),
        })
    }

    /// Change period lengths. An idle timer picks up the new length at once;
    /// a started phase keeps its length until it ends.
    pub fn set_durations(&mut self, durations: PhaseDurations) {
        self.durations = durations;
        if self.state == TimerState::Idle {
            self.remaining_ms = durations.duration_ms(self.phase);
            self.phase_total_ms = self.remaining_ms;
        }
    }

    pub fn set_auto_advance(&mut self, auto_advance: bool) {
        self.auto_advance = auto_advance;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn flush_elapsed(&mut self, now: u64) {
        if let Some(last) = self.last_tick_epoch_ms {
            let elapsed = now.saturating_sub(last);
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
            self.last_tick_epoch_ms = Some(now.max(last));
        }
    }

    fn enter_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.remaining_ms = self.durations.duration_ms(phase);
        self.phase_total_ms = self.remaining_ms;
        self.phase_started_at = None;
    }
}

/// `MM:SS`, or `H:MM:SS` from one hour up. Partial seconds round up so the
/// display never shows 00:00 while time is left.
pub fn format_clock(remaining_ms: u64) -> String {
    let secs = remaining_ms.div_ceil(1000);
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn to_datetime(epoch_ms: u64) -> DateTime<Utc> {
    i64::try_from(epoch_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: u64 = 1_700_000_000_000;
    const MIN: u64 = 60_000;

    fn engine() -> TimerEngine {
        TimerEngine::new(PhaseDurations::new(25, 5))
    }

    #[test]
    fn start_pause_resume() {
        let mut engine = engine();
        assert_eq!(engine.state(), TimerState::Idle);

        assert!(engine.start_at(T0).is_some());
        assert_eq!(engine.state(), TimerState::Running);
        assert!(engine.start_at(T0 + 1).is_none());

        assert!(engine.pause_at(T0 + MIN).is_some());
        assert_eq!(engine.state(), TimerState::Paused);
        assert_eq!(engine.remaining_ms(), 24 * MIN);

        // Time spent paused does not count.
        assert!(engine.resume_at(T0 + 10 * MIN).is_some());
        assert_eq!(engine.state(), TimerState::Running);
        engine.tick_at(T0 + 11 * MIN);
        assert_eq!(engine.remaining_ms(), 23 * MIN);
    }

    #[test]
    fn pause_and_resume_guard_state() {
        let mut engine = engine();
        assert!(engine.pause_at(T0).is_none());
        assert!(engine.resume_at(T0).is_none());
        engine.start_at(T0);
        assert!(engine.resume_at(T0).is_none());
    }

    #[test]
    fn start_from_paused_resumes() {
        let mut engine = engine();
        engine.start_at(T0);
        engine.pause_at(T0 + MIN);
        match engine.start_at(T0 + 2 * MIN) {
            Some(Event::TimerResumed { remaining_ms, .. }) => assert_eq!(remaining_ms, 24 * MIN),
            other => panic!("Expected TimerResumed, got {other:?}"),
        }
    }

    #[test]
    fn toggle_cycles_states() {
        let mut engine = engine();
        engine.toggle_at(T0);
        assert_eq!(engine.state(), TimerState::Running);
        engine.toggle_at(T0 + 1000);
        assert_eq!(engine.state(), TimerState::Paused);
        engine.toggle_at(T0 + 2000);
        assert_eq!(engine.state(), TimerState::Running);
    }

    #[test]
    fn focus_completes_into_rest() {
        let mut engine = engine();
        engine.start_at(T0);
        assert!(engine.tick_at(T0 + 24 * MIN).is_none());

        match engine.tick_at(T0 + 25 * MIN) {
            Some(Event::PhaseCompleted {
                phase,
                duration_min,
                next,
                auto_started,
                started_at,
                ..
            }) => {
                assert_eq!(phase, Phase::Focus);
                assert_eq!(duration_min, 25);
                assert_eq!(next, Phase::Rest);
                assert!(auto_started);
                assert_eq!(started_at.timestamp_millis() as u64, T0);
            }
            other => panic!("Expected PhaseCompleted, got {other:?}"),
        }
        assert_eq!(engine.phase(), Phase::Rest);
        assert_eq!(engine.state(), TimerState::Running);
        assert_eq!(engine.remaining_ms(), 5 * MIN);
    }

    #[test]
    fn overshoot_is_not_carried_over() {
        let mut engine = engine();
        engine.start_at(T0);
        // Machine slept for an hour.
        assert!(engine.tick_at(T0 + 60 * MIN).is_some());
        assert_eq!(engine.remaining_ms(), 5 * MIN);
        // Only one completion is reported.
        assert!(engine.tick_at(T0 + 60 * MIN).is_none());
    }

    #[test]
    fn without_auto_advance_goes_idle() {
        let mut engine = engine().with_auto_advance(false);
        engine.start_at(T0);
        let event = engine.tick_at(T0 + 25 * MIN).unwrap();
        assert!(event.is_completion());
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.phase(), Phase::Rest);
        // Idle timers do not count down.
        assert!(engine.tick_at(T0 + 40 * MIN).is_none());
        assert_eq!(engine.remaining_ms(), 5 * MIN);
    }

    #[test]
    fn skip_moves_to_next_phase_idle() {
        let mut engine = engine();
        engine.start_at(T0);
        match engine.skip_at(T0 + MIN) {
            Some(Event::PhaseSkipped { from, to, .. }) => {
                assert_eq!(from, Phase::Focus);
                assert_eq!(to, Phase::Rest);
            }
            other => panic!("Expected PhaseSkipped, got {other:?}"),
        }
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_ms(), 5 * MIN);
        engine.skip_at(T0 + MIN);
        assert_eq!(engine.phase(), Phase::Focus);
    }

    #[test]
    fn reset_goes_to_beginning() {
        let mut engine = engine();
        engine.skip_at(T0);
        engine.start_at(T0);
        engine.reset_at(T0 + MIN);
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_ms(), 25 * MIN);
        assert!(engine.phase_started_at().is_none());
    }

    #[test]
    fn set_durations_applies_to_idle_only() {
        let mut engine = engine();
        engine.set_durations(PhaseDurations::new(50, 10));
        assert_eq!(engine.remaining_ms(), 50 * MIN);

        engine.start_at(T0);
        engine.set_durations(PhaseDurations::new(30, 10));
        engine.tick_at(T0 + MIN);
        assert_eq!(engine.remaining_ms(), 49 * MIN);
        assert_eq!(engine.total_ms(), 50 * MIN);
        // The finished phase reports the length it actually ran with.
        match engine.tick_at(T0 + 50 * MIN) {
            Some(Event::PhaseCompleted { duration_min, .. }) => assert_eq!(duration_min, 50),
            other => panic!("Expected PhaseCompleted, got {other:?}"),
        }
        // The next phase uses the new lengths.
        assert_eq!(engine.remaining_ms(), 10 * MIN);
    }

    #[test]
    fn clock_going_backwards_does_not_add_time() {
        let mut engine = engine();
        engine.start_at(T0);
        engine.tick_at(T0 + MIN);
        engine.tick_at(T0);
        assert_eq!(engine.remaining_ms(), 24 * MIN);
        engine.tick_at(T0 + 2 * MIN);
        assert_eq!(engine.remaining_ms(), 23 * MIN);
    }

    #[test]
    fn progress_tracks_elapsed() {
        let mut engine = TimerEngine::new(PhaseDurations::new(10, 5));
        assert_eq!(engine.progress(), 0.0);
        engine.start_at(T0);
        engine.tick_at(T0 + 5 * MIN);
        assert!((engine.progress() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let engine = engine();
        match engine.snapshot() {
            Event::StateSnapshot {
                state,
                phase,
                remaining_ms,
                total_ms,
                ..
            } => {
                assert_eq!(state, TimerState::Idle);
                assert_eq!(phase, Phase::Focus);
                assert_eq!(remaining_ms, 25 * MIN);
                assert_eq!(total_ms, 25 * MIN);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn engine_state_roundtrips_through_json() {
        let mut engine = engine();
        engine.start_at(T0);
        engine.pause_at(T0 + MIN);
        let json = serde_json::to_string(&engine).unwrap();
        let restored: TimerEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.state(), TimerState::Paused);
        assert_eq!(restored.remaining_ms(), 24 * MIN);
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(25 * MIN), "25:00");
        assert_eq!(format_clock(61_001), "01:02");
        assert_eq!(format_clock(1), "00:01");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(90 * MIN), "1:30:00");
    }
}
