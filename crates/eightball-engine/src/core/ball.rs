//! Pool balls: identity, kinematic state and the id → type mapping.

use glam::Vec2;
use serde::Serialize;

/// Number of balls in one rack (cue + 15 object balls).
pub const BALL_COUNT: usize = 16;

/// Id of the cue ball.
pub const CUE_ID: u8 = 0;

/// Id of the eight ball.
pub const EIGHT_ID: u8 = 8;

/// Ball type derived from the ball number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BallType {
    Cue,
    Solid,
    Eight,
    Stripe,
}

impl BallType {
    /// Total mapping from ball id to type: 0 cue, 1-7 solid, 8 eight, 9-15 stripe.
    pub fn of(id: u8) -> Self {
        match id {
            CUE_ID => BallType::Cue,
            EIGHT_ID => BallType::Eight,
            1..=7 => BallType::Solid,
            _ => BallType::Stripe,
        }
    }

    /// Numeric code used in the render buffer.
    pub fn code(self) -> f32 {
        match self {
            BallType::Cue => 0.0,
            BallType::Solid => 1.0,
            BallType::Eight => 2.0,
            BallType::Stripe => 3.0,
        }
    }
}

/// A single ball on the table.
///
/// Balls are never removed during a rack; pocketing only sets the flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ball {
    pub id: u8,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub pocketed: bool,
    /// Accumulated rolling offset. Only used to animate the ball texture.
    pub rotation: Vec2,
}

impl Ball {
    pub fn new(id: u8, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            pocketed: false,
            rotation: Vec2::ZERO,
        }
    }

    pub fn ball_type(&self) -> BallType {
        BallType::of(self.id)
    }

    pub fn is_cue(&self) -> bool {
        self.id == CUE_ID
    }

    /// Whether the ball takes part in collisions this frame.
    pub fn on_table(&self) -> bool {
        !self.pocketed
    }

    /// Exactly at rest on both axes.
    pub fn is_at_rest(&self) -> bool {
        self.vel.x == 0.0 && self.vel.y == 0.0
    }

    /// Drop the ball into a pocket: flagged and stopped.
    pub fn pocket(&mut self) {
        self.pocketed = true;
        self.vel = Vec2::ZERO;
    }

    /// Bring a pocketed ball back into play at rest (cue ball scratch recovery).
    pub fn unpocket(&mut self) {
        self.pocketed = false;
        self.vel = Vec2::ZERO;
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.vel.length_squared()
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}
