/// Render buffer layout shared with the host.
/// Must stay in sync with the TypeScript reader.
///
/// Layout (all values f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Balls:  16 × 8 floats]
/// ```
///
/// Codes used in the buffer:
/// - phase: 0 aiming, 1 simulating, 2 ball in hand, 3 game over
/// - group: 0 none, 1 solids, 2 stripes
/// - kind:  0 cue, 1 solid, 2 eight, 3 stripe
/// - player: 1 or 2; winner 0 means nobody yet

use bytemuck::{Pod, Zeroable};

use crate::api::game::Match;
use crate::api::types::{Group, Player};
use crate::core::ball::{Ball, BALL_COUNT};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_PHASE: usize = 1;
pub const HEADER_TURN: usize = 2;
pub const HEADER_OPEN_TABLE: usize = 3;
pub const HEADER_GROUP_P1: usize = 4;
pub const HEADER_GROUP_P2: usize = 5;
pub const HEADER_SHOT_COUNT: usize = 6;
pub const HEADER_PAUSED: usize = 7;
pub const HEADER_SPIN_X: usize = 8;
pub const HEADER_SPIN_Y: usize = 9;
pub const HEADER_CUE_X: usize = 10;
pub const HEADER_CUE_Y: usize = 11;
pub const HEADER_AIM_ANGLE: usize = 12;
pub const HEADER_BALL_COUNT: usize = 13;
pub const HEADER_WINNER: usize = 14;
pub const HEADER_DEBUG: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per ball record (wire format, never changes).
pub const BALL_FLOATS: usize = 8;

/// Total buffer size in floats.
pub const BUFFER_FLOATS: usize = HEADER_FLOATS + BALL_COUNT * BALL_FLOATS;

/// One ball as the renderer sees it.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BallInstance {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub id: f32,
    pub pocketed: f32,
    pub rot_x: f32,
    pub rot_y: f32,
    pub kind: f32,
}

impl From<&Ball> for BallInstance {
    fn from(ball: &Ball) -> Self {
        Self {
            x: ball.pos.x,
            y: ball.pos.y,
            radius: ball.radius,
            id: ball.id as f32,
            pocketed: flag(ball.pocketed),
            rot_x: ball.rotation.x,
            rot_y: ball.rotation.y,
            kind: ball.ball_type().code(),
        }
    }
}

fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Fixed-size float buffer rebuilt from the match every frame.
pub struct MatchBuffer {
    header: [f32; HEADER_FLOATS],
    balls: [BallInstance; BALL_COUNT],
    data: Vec<f32>,
}

impl MatchBuffer {
    pub fn new() -> Self {
        Self {
            header: [0.0; HEADER_FLOATS],
            balls: [BallInstance::default(); BALL_COUNT],
            data: vec![0.0; BUFFER_FLOATS],
        }
    }

    /// Rewrite every field from the current match state.
    pub fn write(&mut self, game: &Match) {
        let state = game.state();
        let cue = game.cue_ball();
        let spin = game.spin();

        let h = &mut self.header;
        h[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        h[HEADER_PHASE] = state.phase.code();
        h[HEADER_TURN] = state.turn.number() as f32;
        h[HEADER_OPEN_TABLE] = flag(state.open_table);
        h[HEADER_GROUP_P1] = Group::code(state.group(Player::One));
        h[HEADER_GROUP_P2] = Group::code(state.group(Player::Two));
        h[HEADER_SHOT_COUNT] = state.shot_count as f32;
        h[HEADER_PAUSED] = flag(game.is_paused());
        h[HEADER_SPIN_X] = spin.x;
        h[HEADER_SPIN_Y] = spin.y;
        h[HEADER_CUE_X] = cue.pos.x;
        h[HEADER_CUE_Y] = cue.pos.y;
        h[HEADER_AIM_ANGLE] = game.aim_angle();
        h[HEADER_BALL_COUNT] = game.balls().len().min(BALL_COUNT) as f32;
        h[HEADER_WINNER] = game
            .game_over()
            .map(|over| over.winner.number() as f32)
            .unwrap_or(0.0);
        h[HEADER_DEBUG] = flag(game.debug());

        for (slot, ball) in self.balls.iter_mut().zip(game.balls()) {
            *slot = BallInstance::from(ball);
        }

        self.data[..HEADER_FLOATS].copy_from_slice(&self.header);
        self.data[HEADER_FLOATS..].copy_from_slice(bytemuck::cast_slice(&self.balls[..]));
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn ball(&self, index: usize) -> Option<&BallInstance> {
        self.balls.get(index)
    }
}

impl Default for MatchBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ball_record_is_eight_floats() {
        assert_eq!(std::mem::size_of::<BallInstance>(), BALL_FLOATS * 4);
        assert_eq!(BUFFER_FLOATS, 16 + 16 * 8);
    }

    #[test]
    fn header_reflects_fresh_match() {
        let game = Match::default();
        let mut buf = MatchBuffer::new();
        buf.write(&game);
        let data = buf.as_slice();

        assert_eq!(data.len(), BUFFER_FLOATS);
        assert_eq!(data[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(data[HEADER_PHASE], 0.0);
        assert_eq!(data[HEADER_TURN], 1.0);
        assert_eq!(data[HEADER_OPEN_TABLE], 1.0);
        assert_eq!(data[HEADER_GROUP_P1], 0.0);
        assert_eq!(data[HEADER_BALL_COUNT], 16.0);
        assert_eq!(data[HEADER_WINNER], 0.0);
        assert_eq!(data[HEADER_CUE_X], game.cue_ball().pos.x);
    }

    #[test]
    fn ball_records_follow_the_header() {
        let game = Match::default();
        let mut buf = MatchBuffer::new();
        buf.write(&game);
        let data = buf.as_slice();

        let eight = &game.balls()[8];
        let base = HEADER_FLOATS + 8 * BALL_FLOATS;
        assert_eq!(data[base], eight.pos.x);
        assert_eq!(data[base + 1], eight.pos.y);
        assert_eq!(data[base + 2], eight.radius);
        assert_eq!(data[base + 3], 8.0);
        assert_eq!(data[base + 4], 0.0);
        assert_eq!(data[base + 7], 2.0);

        assert_eq!(buf.ball(0).map(|b| b.kind), Some(0.0));
        assert_eq!(buf.ball(15).map(|b| b.kind), Some(3.0));
    }

    #[test]
    fn shot_state_is_written() {
        let mut game = Match::default();
        game.set_spin(0.0, 0.5).unwrap();
        game.begin_shot(0.25, 40.0).unwrap();
        let mut buf = MatchBuffer::new();
        buf.write(&game);
        let data = buf.as_slice();
        assert_eq!(data[HEADER_PHASE], 1.0);
        assert_eq!(data[HEADER_SHOT_COUNT], 1.0);
        assert_eq!(data[HEADER_SPIN_Y], 0.5);
        assert_eq!(data[HEADER_AIM_ANGLE], 0.25);
    }
}
