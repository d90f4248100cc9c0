//! The current day number and day/night phase of a game.

use serde::{Deserialize, Serialize};

use super::EngineError;

/// Which phase the game is in.
///
/// Stored in the document as its integer discriminant so renames
/// never invalidate saved games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Phase {
    Day,
    Night,
}

impl From<Phase> for i64 {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Day => 0,
            Phase::Night => 1,
        }
    }
}

impl TryFrom<i64> for Phase {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Phase::Day),
            1 => Ok(Phase::Night),
            other => Err(format!("unknown phase: {other}")),
        }
    }
}

impl Phase {
    /// Lowercase name for display.
    pub fn name(self) -> &'static str {
        match self {
            Phase::Day => "day",
            Phase::Night => "night",
        }
    }
}

/// The day counter and phase tracker.
///
/// Advances in one direction only: night 1, day 1, night 2, day 2, ...
/// The day number increments at dusk, when the table goes back to sleep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moment {
    #[serde(default = "default_day")]
    pub day: u32,
    #[serde(default = "default_phase")]
    pub phase: Phase,
}

fn default_day() -> u32 {
    1
}

fn default_phase() -> Phase {
    Phase::Night
}

impl Default for Moment {
    fn default() -> Self {
        Self {
            day: default_day(),
            phase: default_phase(),
        }
    }
}

impl Moment {
    /// Ends the day: increments the day number and enters night.
    ///
    /// Only valid during the day; at night this is a no-op error and
    /// the day number is untouched.
    pub fn go_to_dusk(&mut self) -> Result<(), EngineError> {
        if self.phase != Phase::Day {
            return Err(EngineError::AlreadyNight);
        }
        self.day += 1;
        self.phase = Phase::Night;
        Ok(())
    }

    /// Starts the day: enters day phase, same day number.
    pub fn go_to_dawn(&mut self) -> Result<(), EngineError> {
        if self.phase != Phase::Night {
            return Err(EngineError::AlreadyDay);
        }
        self.phase = Phase::Day;
        Ok(())
    }
}
