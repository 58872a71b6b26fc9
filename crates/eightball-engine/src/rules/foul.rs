use std::fmt;

use serde::Serialize;

/// A foul. Not an error: a legal game outcome that hands the opponent ball in hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Foul {
    /// Cue ball pocketed.
    Scratch,
    /// Cue ball touched nothing.
    NoContact,
    /// First contact was the opponent's group.
    WrongGroupFirst,
    /// First contact was the eight while the shooter's group was still up.
    EightTooEarly,
    /// Eight pocketed on a foul break.
    EightFaultOnBreak,
}

impl Foul {
    pub fn reason(self) -> &'static str {
        match self {
            Foul::Scratch => "Scratch!",
            Foul::NoContact => "No ball hit!",
            Foul::WrongGroupFirst => "Wrong group hit first!",
            Foul::EightTooEarly => "Hit 8-ball too early!",
            Foul::EightFaultOnBreak => "8-ball fault on break!",
        }
    }

    pub fn code(self) -> f32 {
        match self {
            Foul::Scratch => 1.0,
            Foul::NoContact => 2.0,
            Foul::WrongGroupFirst => 3.0,
            Foul::EightTooEarly => 4.0,
            Foul::EightFaultOnBreak => 5.0,
        }
    }
}

impl fmt::Display for Foul {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}
