//! In-memory counters for the running process.
//!
//! Persistent history lives in [`crate::storage::Database`]; this only knows
//! what happened since the window opened.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub focus_completed: u32,
    pub rest_completed: u32,
    pub cycles: u32,
    pub focus_minutes: u64,
    pub rest_minutes: u64,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SessionManager {
    focus_completed: u32,
    rest_completed: u32,
    focus_minutes: u64,
    rest_minutes: u64,
    started_at: DateTime<Utc>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            focus_completed: 0,
            rest_completed: 0,
            focus_minutes: 0,
            rest_minutes: 0,
            started_at: Utc::now(),
        }
    }

    /// Count one completed phase of `minutes` length.
    pub fn record(&mut self, phase: Phase, minutes: u64) {
        match phase {
            Phase::Focus => {
                self.focus_completed = self.focus_completed.saturating_add(1);
                self.focus_minutes = self.focus_minutes.saturating_add(minutes);
            }
            Phase::Rest => {
                self.rest_completed = self.rest_completed.saturating_add(1);
                self.rest_minutes = self.rest_minutes.saturating_add(minutes);
            }
        }
    }

    pub fn completed(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Focus => self.focus_completed,
            Phase::Rest => self.rest_completed,
        }
    }

    /// Full focus + rest pairs.
    pub fn cycles(&self) -> u32 {
        self.focus_completed.min(self.rest_completed)
    }

    pub fn focus_minutes(&self) -> u64 {
        self.focus_minutes
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            focus_completed: self.focus_completed,
            rest_completed: self.rest_completed,
            cycles: self.cycles(),
            focus_minutes: self.focus_minutes,
            rest_minutes: self.rest_minutes,
            started_at: self.started_at,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
