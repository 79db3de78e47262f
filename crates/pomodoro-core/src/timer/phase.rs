use serde::{Deserialize, Serialize};

/// The two alternating periods of a Pomodoro cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Rest,
}

impl Phase {
    /// The phase that follows this one.
    pub fn next(self) -> Self {
        match self {
            Phase::Focus => Phase::Rest,
            Phase::Rest => Phase::Focus,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::Rest => "Rest",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Focus => "focus",
            Phase::Rest => "rest",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "focus" => Ok(Phase::Focus),
            "rest" | "break" => Ok(Phase::Rest),
            other => Err(format!("unknown phase: {other}")),
        }
    }
}

/// Period lengths in minutes. Each is at least one minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub focus_min: u64,
    pub rest_min: u64,
}

impl PhaseDurations {
    pub fn new(focus_min: u64, rest_min: u64) -> Self {
        Self {
            focus_min: focus_min.max(1),
            rest_min: rest_min.max(1),
        }
    }

    pub fn minutes(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Focus => self.focus_min,
            Phase::Rest => self.rest_min,
        }
    }

    /// Duration in milliseconds.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn duration_ms(&self, phase: Phase) -> u64 {
        self.minutes(phase).saturating_mul(60).saturating_mul(1000)
    }

    pub fn duration_secs(&self, phase: Phase) -> u64 {
        self.minutes(phase).saturating_mul(60)
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self::new(25, 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_alternate() {
        assert_eq!(Phase::Focus.next(), Phase::Rest);
        assert_eq!(Phase::Rest.next(), Phase::Focus);
    }

    #[test]
    fn parse_accepts_break_alias() {
        assert_eq!("Focus".parse::<Phase>().unwrap(), Phase::Focus);
        assert_eq!("break".parse::<Phase>().unwrap(), Phase::Rest);
        assert!("nap".parse::<Phase>().is_err());
    }

    #[test]
    fn zero_minutes_clamped() {
        let d = PhaseDurations::new(0, 0);
        assert_eq!(d.focus_min, 1);
        assert_eq!(d.rest_min, 1);
    }

    #[test]
    fn durations_in_ms() {
        let d = PhaseDurations::new(25, 5);
        assert_eq!(d.duration_ms(Phase::Focus), 25 * 60 * 1000);
        assert_eq!(d.duration_secs(Phase::Rest), 300);
    }
}
