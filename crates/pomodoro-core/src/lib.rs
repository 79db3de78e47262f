//! # Pomodoro Core Library
//!
//! Business logic for the Pomodoro timer. The desktop window and the CLI
//! are thin layers over the same library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based two-phase (focus/rest) state machine
//!   that requires the caller to periodically invoke `tick()`
//! - **Storage**: JSON configuration, application paths and SQLite history
//! - **Sound**: Phase-end cues through rodio, with a silent fallback
//! - **Notes**: Free-text notes persisted to a file
//! - **Session**: In-memory counts of completed phases
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`PomodoroController`]: Ties the engine to its collaborators
//! - [`Config`]: Application configuration management
//! - [`Database`]: Session history and statistics

pub mod controller;
pub mod error;
pub mod events;
pub mod logging;
pub mod notes;
pub mod session;
pub mod sound;
pub mod storage;
pub mod timer;

pub use controller::PomodoroController;
pub use error::{ConfigError, CoreError, DatabaseError, NotesError, SoundError};
pub use events::Event;
pub use notes::NotesManager;
pub use session::{SessionManager, SessionSummary};
pub use sound::{SoundManager, SoundPlayer, SoundSource};
pub use storage::{AppPaths, Config, Database, Stats};
pub use timer::{format_clock, Phase, PhaseDurations, TimerEngine, TimerState};
