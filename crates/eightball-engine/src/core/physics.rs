//! Substepped ball physics: integration with rolling friction, ball-ball and
//! ball-rail impulses, pocket capture, and the per-shot event record the rule
//! engine adjudicates from.

use glam::Vec2;
use serde::Serialize;

use crate::api::config::PhysicsConfig;
use crate::core::ball::Ball;
use crate::core::table::Table;

/// What happened during one shot. Reset right before the cue ball is struck.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShotEvents {
    /// First object ball the cue ball touched.
    pub first_hit: Option<u8>,
    /// Every rail collision of every ball during the shot.
    pub rail_hits: u32,
    /// `rail_hits` recorded before the cue ball's first contact.
    pub rails_before_contact: u32,
    /// `rail_hits` recorded after the cue ball's first contact.
    pub rails_after_contact: u32,
    /// Ids in detection order. Within one substep this is ascending id.
    pub pocketed_ids: Vec<u8>,
    /// Whether the follow/draw impulse fired on first contact.
    pub spin_applied: bool,
}

impl ShotEvents {
    pub fn pocketed(&self, id: u8) -> bool {
        self.pocketed_ids.contains(&id)
    }
}

/// Per-call contact summary, used for sound and particle cues.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub ball_contacts: u32,
    pub rail_contacts: u32,
    pub pocketed: Vec<u8>,
}

/// Advances all balls with a fixed substep count and records shot events.
#[derive(Debug, Clone)]
pub struct PhysicsEngine {
    config: PhysicsConfig,
    events: ShotEvents,
    /// English on the cue ball, each axis in [-1, 1]. Only `y` (follow/draw)
    /// changes the trajectory; `x` is carried for display.
    spin: Vec2,
}

impl PhysicsEngine {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            events: ShotEvents::default(),
            spin: Vec2::ZERO,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn events(&self) -> &ShotEvents {
        &self.events
    }

    /// Clear the shot record. Call once per shot, before the cue ball moves.
    pub fn reset_events(&mut self) {
        self.events = ShotEvents::default();
    }

    pub fn spin(&self) -> Vec2 {
        self.spin
    }

    /// Set English; each axis is clamped to [-1, 1]. Negative `y` is follow
    /// (top spin), positive `y` is draw.
    pub fn set_spin(&mut self, spin: Vec2) {
        let clamp = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        self.spin = Vec2::new(clamp(spin.x), clamp(spin.y));
    }

    pub fn clear_spin(&mut self) {
        self.spin = Vec2::ZERO;
    }

    /// Duration of one substep, in ticks.
    pub fn substep_dt(&self) -> f32 {
        1.0 / self.config.substeps as f32
    }

    /// Advance one tick. The frame delta is not used for sizing: the substep
    /// length is fixed so the integration does not depend on frame rate.
    pub fn step(&mut self, balls: &mut [Ball], table: &Table, _dt: f32) -> StepReport {
        let dt = self.substep_dt();
        let mut report = StepReport::default();
        if Self::is_stable(balls) {
            return report;
        }

        for _ in 0..self.config.substeps {
            for ball in balls.iter_mut().filter(|b| b.on_table()) {
                self.integrate(ball, dt);
            }

            for i in 0..balls.len() {
                let (head, tail) = balls.split_at_mut(i + 1);
                let a = &mut head[i];
                for b in tail.iter_mut() {
                    if self.resolve_ball_ball(a, b) {
                        report.ball_contacts += 1;
                    }
                }
            }

            for ball in balls.iter_mut().filter(|b| b.on_table()) {
                self.resolve_ball_table(ball, table, &mut report);
            }
        }

        report
    }

    /// True when every ball still on the table is exactly at rest.
    pub fn is_stable(balls: &[Ball]) -> bool {
        balls.iter().filter(|b| b.on_table()).all(|b| b.is_at_rest())
    }

    fn integrate(&self, ball: &mut Ball, dt: f32) {
        let eps = self.config.rest_epsilon;
        if ball.vel.x.abs() < eps && ball.vel.y.abs() < eps {
            ball.vel = Vec2::ZERO;
            return;
        }

        ball.pos += ball.vel * dt;
        ball.vel *= self.config.friction;

        // Rolling: angle = distance / radius about the axis perpendicular to travel.
        let speed = ball.vel.length();
        if speed > 0.0 {
            let angle = speed * dt / ball.radius;
            let axis = Vec2::new(-ball.vel.y, ball.vel.x) / speed;
            ball.rotation += axis * angle;
        }
    }

    /// Push overlapping balls apart and exchange an equal-mass normal impulse.
    /// Returns whether an impulse was applied.
    fn resolve_ball_ball(&mut self, a: &mut Ball, b: &mut Ball) -> bool {
        if !a.on_table() || !b.on_table() {
            return false;
        }

        let delta = b.pos - a.pos;
        let dist = delta.length();
        let min_dist = a.radius + b.radius;
        if dist >= min_dist {
            return false;
        }

        // Coincident centres have no defined normal; pick one.
        let normal = if dist > f32::EPSILON { delta / dist } else { Vec2::X };
        let pen = (min_dist - dist) * 0.5;
        a.pos -= normal * pen;
        b.pos += normal * pen;

        let vel_along_normal = (b.vel - a.vel).dot(normal);
        if vel_along_normal >= 0.0 {
            return false;
        }

        let mut first_contact = false;
        if self.events.first_hit.is_none() {
            if a.is_cue() {
                self.events.first_hit = Some(b.id);
                first_contact = true;
            } else if b.is_cue() {
                self.events.first_hit = Some(a.id);
                first_contact = true;
            }
        }

        let impulse = -(1.0 + self.config.restitution) * vel_along_normal / 2.0;
        a.vel -= normal * impulse;
        b.vel += normal * impulse;

        if first_contact {
            self.apply_follow_draw(a, b, normal, -vel_along_normal);
        }

        true
    }

    /// Follow/draw approximation: a one-off push of the cue ball along the
    /// line of centres, scaled by impact speed. Not a spin model; there is no
    /// angular momentum, cloth friction or sidespin transfer.
    fn apply_follow_draw(&mut self, a: &mut Ball, b: &mut Ball, normal: Vec2, impact_speed: f32) {
        if self.spin.y.abs() <= self.config.spin_threshold {
            return;
        }
        let (cue, forward) = if a.is_cue() { (a, normal) } else { (b, -normal) };
        let push = -self.spin.y * impact_speed * self.config.spin_strength;
        cue.vel += forward * push;
        self.events.spin_applied = true;
    }

    /// Pocket capture first, then the four rails independently.
    fn resolve_ball_table(&mut self, ball: &mut Ball, table: &Table, report: &mut StepReport) {
        if table.pocket_at(ball.pos).is_some() {
            ball.pocket();
            self.events.pocketed_ids.push(ball.id);
            report.pocketed.push(ball.id);
            log::debug!("ball {} pocketed", ball.id);
            return;
        }

        let r = ball.radius;
        let e = self.config.rail_restitution;
        let mut rails = 0;
        if ball.pos.x < table.left + r {
            ball.pos.x = table.left + r;
            ball.vel.x = -ball.vel.x * e;
            rails += 1;
        }
        if ball.pos.x > table.right - r {
            ball.pos.x = table.right - r;
            ball.vel.x = -ball.vel.x * e;
            rails += 1;
        }
        if ball.pos.y < table.top + r {
            ball.pos.y = table.top + r;
            ball.vel.y = -ball.vel.y * e;
            rails += 1;
        }
        if ball.pos.y > table.bottom - r {
            ball.pos.y = table.bottom - r;
            ball.vel.y = -ball.vel.y * e;
            rails += 1;
        }

        if rails > 0 {
            self.events.rail_hits += rails;
            if self.events.first_hit.is_none() {
                self.events.rails_before_contact += rails;
            } else {
                self.events.rails_after_contact += rails;
            }
            report.rail_contacts += rails;
        }
    }
}
