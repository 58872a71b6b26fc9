use bytemuck::{Pod, Zeroable};
use serde::Serialize;

use crate::core::ball::BallType;

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// 1 or 2, as shown to people.
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

/// An object-ball group a player can be assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Group {
    Solid,
    Stripe,
}

impl Group {
    /// Group of a ball type; the cue and the eight belong to neither.
    pub fn of(ball_type: BallType) -> Option<Self> {
        match ball_type {
            BallType::Solid => Some(Group::Solid),
            BallType::Stripe => Some(Group::Stripe),
            BallType::Cue | BallType::Eight => None,
        }
    }

    pub fn of_id(id: u8) -> Option<Self> {
        Self::of(BallType::of(id))
    }

    pub fn other(self) -> Self {
        match self {
            Group::Solid => Group::Stripe,
            Group::Stripe => Group::Solid,
        }
    }

    pub fn ball_type(self) -> BallType {
        match self {
            Group::Solid => BallType::Solid,
            Group::Stripe => BallType::Stripe,
        }
    }

    /// Numeric code used in the render buffer (0 is reserved for unassigned).
    pub fn code(group: Option<Self>) -> f32 {
        match group {
            None => 0.0,
            Some(Group::Solid) => 1.0,
            Some(Group::Stripe) => 2.0,
        }
    }
}

/// Top-level match phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    Aiming,
    Simulating,
    BallInHand,
    GameOver,
}

impl Phase {
    pub fn code(self) -> f32 {
        match self {
            Phase::Aiming => 0.0,
            Phase::Simulating => 1.0,
            Phase::BallInHand => 2.0,
            Phase::GameOver => 3.0,
        }
    }
}

/// Persistent match state, mutated only by shot resolution and controller
/// transitions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchState {
    pub turn: Player,
    /// Indexed by `Player::index()`.
    pub groups: [Option<Group>; 2],
    pub open_table: bool,
    /// Shots begun so far; the break is shot 1.
    pub shot_count: u32,
    pub phase: Phase,
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            turn: Player::One,
            groups: [None, None],
            open_table: true,
            shot_count: 0,
            phase: Phase::Aiming,
        }
    }

    pub fn group(&self, player: Player) -> Option<Group> {
        self.groups[player.index()]
    }

    /// Whether the shot being resolved is the opening break.
    pub fn is_break(&self) -> bool {
        self.shot_count == 1
    }

    /// Give `group` to `shooter` and the other group to the opponent; closes the table.
    pub fn assign(&mut self, shooter: Player, group: Group) {
        self.groups[shooter.index()] = Some(group);
        self.groups[shooter.opponent().index()] = Some(group.other());
        self.open_table = false;
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

/// A sound cue for the host. The numeric value maps to a sound on the JS side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct SoundEvent(pub u32);

impl SoundEvent {
    pub const BALL_CLICK: SoundEvent = SoundEvent(1);
    pub const RAIL: SoundEvent = SoundEvent(2);
    pub const POCKET: SoundEvent = SoundEvent(3);
    pub const CUE_STRIKE: SoundEvent = SoundEvent(4);
}

/// A match event for the host. `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}

/// `GameEvent::kind` values.
pub mod event_kind {
    /// a = angle, b = power, c = shot number.
    pub const SHOT_TAKEN: f32 = 1.0;
    /// a = ball id.
    pub const BALL_POCKETED: f32 = 2.0;
    /// a = foul code.
    pub const FOUL: f32 = 3.0;
    /// a = new shooter (1 or 2).
    pub const TURN_CHANGED: f32 = 4.0;
    /// a = player, b = group code.
    pub const GROUP_ASSIGNED: f32 = 5.0;
    /// a = winner, b = reason code.
    pub const GAME_OVER: f32 = 6.0;
    /// No payload.
    pub const MATCH_RESTARTED: f32 = 7.0;
}
