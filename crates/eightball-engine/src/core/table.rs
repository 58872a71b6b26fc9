//! Table geometry: playable rectangle, six pockets and the kitchen.

use glam::Vec2;
use serde::Serialize;

use crate::api::config::TableConfig;

/// A pocket: capture happens when a ball centre enters the circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pocket {
    pub center: Vec2,
    pub radius: f32,
}

impl Pocket {
    /// Point-in-circle test of a ball centre; the ball radius plays no part.
    pub fn captures(&self, point: Vec2) -> bool {
        self.center.distance(point) < self.radius
    }
}

/// Immutable table geometry for one table size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    /// Top-left, top-middle, top-right, bottom-left, bottom-middle, bottom-right.
    pub pockets: [Pocket; 6],
    /// Right edge of the kitchen (break placement region).
    pub kitchen_right: f32,
}

impl Table {
    pub fn new(config: &TableConfig) -> Self {
        let left = config.margin;
        let right = config.margin + config.width;
        let top = config.margin;
        let bottom = config.margin + config.height;
        let mid_x = (left + right) / 2.0;
        let corner = config.corner_pocket_radius;
        let side = config.side_pocket_radius;
        let pocket = |x: f32, y: f32, radius: f32| Pocket {
            center: Vec2::new(x, y),
            radius,
        };

        Self {
            left,
            right,
            top,
            bottom,
            pockets: [
                pocket(left, top, corner),
                pocket(mid_x, top, side),
                pocket(right, top, corner),
                pocket(left, bottom, corner),
                pocket(mid_x, bottom, side),
                pocket(right, bottom, corner),
            ],
            kitchen_right: left + config.width * config.kitchen_fraction,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Where the cue ball starts: a quarter of the way down the table.
    pub fn head_spot(&self) -> Vec2 {
        Vec2::new(self.left + self.width() * 0.25, self.top + self.height() * 0.5)
    }

    /// Apex of the rack: three quarters of the way down the table.
    pub fn foot_spot(&self) -> Vec2 {
        Vec2::new(self.left + self.width() * 0.75, self.top + self.height() * 0.5)
    }

    /// Index of the first pocket that captures `point`.
    pub fn pocket_at(&self, point: Vec2) -> Option<usize> {
        self.pockets.iter().position(|p| p.captures(point))
    }

    /// Whether a ball of `radius` centred at `pos` lies fully inside the rails.
    pub fn contains(&self, pos: Vec2, radius: f32) -> bool {
        pos.x >= self.left + radius
            && pos.x <= self.right - radius
            && pos.y >= self.top + radius
            && pos.y <= self.bottom - radius
    }

    /// Clamp a ball centre to stay inside the rails.
    pub fn clamp(&self, pos: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            pos.x.clamp(self.left + radius, self.right - radius),
            pos.y.clamp(self.top + radius, self.bottom - radius),
        )
    }

    /// Whether a ball centre lies inside the kitchen.
    pub fn in_kitchen(&self, pos: Vec2, radius: f32) -> bool {
        pos.x >= self.left + radius
            && pos.x <= self.kitchen_right
            && pos.y >= self.top + radius
            && pos.y <= self.bottom - radius
    }

    /// Clamp a ball centre into the kitchen.
    pub fn clamp_to_kitchen(&self, pos: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            pos.x.clamp(self.left + radius, self.kitchen_right),
            pos.y.clamp(self.top + radius, self.bottom - radius),
        )
    }

    /// Distance along a ray from `origin` until a ball of `radius` touches a rail.
    pub fn ray_to_rail(&self, origin: Vec2, dir: Vec2, radius: f32) -> f32 {
        let mut t = f32::INFINITY;
        if dir.x > 0.0 {
            t = t.min((self.right - radius - origin.x) / dir.x);
        } else if dir.x < 0.0 {
            t = t.min((self.left + radius - origin.x) / dir.x);
        }
        if dir.y > 0.0 {
            t = t.min((self.bottom - radius - origin.y) / dir.y);
        } else if dir.y < 0.0 {
            t = t.min((self.top + radius - origin.y) / dir.y);
        }
        if t.is_finite() {
            t.max(0.0)
        } else {
            0.0
        }
    }
}
