//! Standard 8-ball triangle rack.

use glam::Vec2;

use super::ball::{Ball, BALL_COUNT, CUE_ID};
use super::table::Table;

/// Ball ids in rack order: apex first, then row by row.
///
/// ```text
///  1               <- apex (row 0)
///  9  2            <- row 1
///  3  8 10         <- row 2, eight in the centre
///  4  5 11  6      <- row 3
/// 12 13  7 14 15   <- row 4
/// ```
pub const RACK_ORDER: [u8; 15] = [1, 9, 2, 3, 8, 10, 4, 5, 11, 6, 12, 13, 7, 14, 15];

/// Rack positions indexed by ball number - 1.
/// The apex points left toward the cue ball; rows spread right.
pub fn rack_positions(apex: Vec2, ball_radius: f32, gap: f32) -> [Vec2; 15] {
    let spacing = ball_radius * 2.0 + gap;
    let row_offset = spacing * (std::f32::consts::PI / 6.0).cos();

    let mut positions = [Vec2::ZERO; 15];
    let mut idx = 0;
    for row in 0..5 {
        for slot in 0..=row {
            let x = apex.x + row as f32 * row_offset;
            let y = apex.y + (slot as f32 - row as f32 / 2.0) * spacing;
            let number = RACK_ORDER[idx];
            positions[(number - 1) as usize] = Vec2::new(x, y);
            idx += 1;
        }
    }
    positions
}

/// All sixteen balls in id order: cue on the head spot, the rest racked
/// at the foot spot.
pub fn rack_balls(table: &Table, ball_radius: f32, gap: f32) -> Vec<Ball> {
    let positions = rack_positions(table.foot_spot(), ball_radius, gap);
    let mut balls = Vec::with_capacity(BALL_COUNT);
    balls.push(Ball::new(CUE_ID, table.head_spot(), ball_radius));
    for (i, pos) in positions.iter().enumerate() {
        balls.push(Ball::new(i as u8 + 1, *pos, ball_radius));
    }
    balls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::TableConfig;

    #[test]
    fn rack_order_covers_every_object_ball() {
        let mut ids = RACK_ORDER.to_vec();
        ids.sort();
        assert_eq!(ids, (1..=15).collect::<Vec<u8>>());
    }

    #[test]
    fn eight_sits_in_rack_centre() {
        let apex = Vec2::new(650.0, 250.0);
        let positions = rack_positions(apex, 10.0, 0.5);
        let eight = positions[7];
        assert!((eight.y - apex.y).abs() < 1e-4);
        assert!(eight.x > apex.x);
    }

    #[test]
    fn racked_balls_do_not_overlap() {
        let table = Table::new(&TableConfig::default());
        let balls = rack_balls(&table, 10.0, 0.5);
        assert_eq!(balls.len(), BALL_COUNT);
        for (i, ball) in balls.iter().enumerate() {
            assert_eq!(ball.id as usize, i);
            assert!(table.contains(ball.pos, ball.radius));
            for other in &balls[i + 1..] {
                assert!(ball.pos.distance(other.pos) >= 20.0, "{} overlaps {}", ball.id, other.id);
            }
        }
    }
}
