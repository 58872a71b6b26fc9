//! Aim line prediction: where the cue ball first touches an object ball
//! (the ghost ball) and the ideal exit directions of both balls.

use glam::Vec2;
use serde::Serialize;

use super::ball::Ball;
use super::table::Table;

/// First object-ball contact along the aim line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AimContact {
    pub ball_id: u8,
    /// Cue ball centre at the moment of contact.
    pub ghost: Vec2,
    /// Unit direction the object ball leaves along (ghost → object centre).
    pub object_dir: Vec2,
    /// Unit direction the cue ball deflects along (tangent line, stun shot).
    pub cue_dir: Vec2,
    /// Whether hitting this ball first is legal for the shooter.
    pub legal: bool,
}

/// Prediction for one aim angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AimPrediction {
    pub origin: Vec2,
    pub dir: Vec2,
    /// End of the drawn aim line: the ghost ball, or the rail when nothing is hit.
    pub end: Vec2,
    pub contact: Option<AimContact>,
}

/// Cast the aim ray from the cue ball. `legal` decides the legality flag of
/// the struck ball.
pub fn predict(balls: &[Ball], table: &Table, angle: f32, legal: impl Fn(u8) -> bool) -> Option<AimPrediction> {
    let cue = balls.iter().find(|b| b.is_cue() && b.on_table())?;
    let dir = Vec2::from_angle(angle);
    if !dir.is_finite() {
        return None;
    }

    let mut closest: Option<(f32, &Ball)> = None;
    for ball in balls.iter().filter(|b| !b.is_cue() && b.on_table()) {
        let to_center = ball.pos - cue.pos;
        let along = to_center.dot(dir);
        if along < 0.0 {
            continue;
        }
        let reach = cue.radius + ball.radius;
        let miss_sq = to_center.length_squared() - along * along;
        if miss_sq > reach * reach {
            continue;
        }
        let t = along - (reach * reach - miss_sq).sqrt();
        if t > 0.0 && closest.map_or(true, |(best, _)| t < best) {
            closest = Some((t, ball));
        }
    }

    let prediction = match closest {
        Some((t, ball)) => {
            let ghost = cue.pos + dir * t;
            let object_dir = (ball.pos - ghost).normalize_or_zero();
            // Tangent on the side the cue ball was travelling.
            let mut cue_dir = object_dir.perp();
            if cue_dir.dot(dir) < 0.0 {
                cue_dir = -cue_dir;
            }
            AimPrediction {
                origin: cue.pos,
                dir,
                end: ghost,
                contact: Some(AimContact {
                    ball_id: ball.id,
                    ghost,
                    object_dir,
                    cue_dir,
                    legal: legal(ball.id),
                }),
            }
        }
        None => AimPrediction {
            origin: cue.pos,
            dir,
            end: cue.pos + dir * table.ray_to_rail(cue.pos, dir, cue.radius),
            contact: None,
        },
    };
    Some(prediction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::TableConfig;

    fn table() -> Table {
        Table::new(&TableConfig::default())
    }

    fn ball(id: u8, x: f32, y: f32) -> Ball {
        Ball::new(id, Vec2::new(x, y), 10.0)
    }

    #[test]
    fn straight_shot_hits_nearest_ball() {
        let balls = vec![ball(0, 200.0, 250.0), ball(4, 400.0, 250.0), ball(9, 300.0, 250.0)];
        let p = predict(&balls, &table(), 0.0, |_| true).unwrap();
        let c = p.contact.unwrap();
        assert_eq!(c.ball_id, 9);
        assert!((c.ghost - Vec2::new(280.0, 250.0)).length() < 1e-3);
        assert!((c.object_dir - Vec2::X).length() < 1e-4);
        assert_eq!(p.end, c.ghost);
    }

    #[test]
    fn cut_shot_splits_at_right_angle() {
        let balls = vec![ball(0, 200.0, 250.0), ball(3, 400.0, 262.0)];
        let p = predict(&balls, &table(), 0.0, |_| true).unwrap();
        let c = p.contact.unwrap();
        assert!(c.object_dir.dot(c.cue_dir).abs() < 1e-4);
        assert!(c.cue_dir.dot(p.dir) > 0.0);
        assert!(c.object_dir.y > 0.0);
    }

    #[test]
    fn balls_behind_are_ignored() {
        let balls = vec![ball(0, 400.0, 250.0), ball(3, 300.0, 250.0)];
        let p = predict(&balls, &table(), 0.0, |_| true).unwrap();
        assert!(p.contact.is_none());
        assert!((p.end.x - 840.0).abs() < 1e-3);
    }

    #[test]
    fn legality_comes_from_caller() {
        let balls = vec![ball(0, 200.0, 250.0), ball(12, 300.0, 250.0)];
        let p = predict(&balls, &table(), 0.0, |id| id < 8).unwrap();
        assert!(!p.contact.unwrap().legal);
    }

    #[test]
    fn no_prediction_without_cue_ball() {
        let mut balls = vec![ball(0, 200.0, 250.0)];
        balls[0].pocketed = true;
        assert!(predict(&balls, &table(), 0.0, |_| true).is_none());
    }
}
