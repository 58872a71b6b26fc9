use serde::{Deserialize, Serialize};

/// Table geometry, in table units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Playable width (inside the rails).
    pub width: f32,
    /// Playable height (inside the rails).
    pub height: f32,
    /// Offset of the playable rectangle from the world origin.
    pub margin: f32,
    pub ball_radius: f32,
    pub corner_pocket_radius: f32,
    /// Top-middle and bottom-middle pockets are tighter than the corners.
    pub side_pocket_radius: f32,
    /// Fraction of the width, from the head rail, that forms the kitchen.
    pub kitchen_fraction: f32,
    /// Gap left between neighbouring balls in the rack.
    pub rack_gap: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            margin: 50.0,
            ball_radius: 10.0,
            corner_pocket_radius: 26.0,
            side_pocket_radius: 22.0,
            kitchen_fraction: 0.3,
            rack_gap: 0.5,
        }
    }
}

/// Integration and collision tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Substeps per `step()` call. Each substep advances 1/substeps of a tick.
    pub substeps: u32,
    /// Velocity multiplier applied every substep (rolling resistance).
    pub friction: f32,
    /// Per-axis speed below which a ball snaps to rest.
    pub rest_epsilon: f32,
    /// Ball-ball coefficient of restitution.
    pub restitution: f32,
    /// Ball-rail coefficient of restitution.
    pub rail_restitution: f32,
    /// |spin.y| at or below this has no follow/draw effect.
    pub spin_threshold: f32,
    /// Follow/draw impulse scale relative to impact speed.
    pub spin_strength: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            substeps: 8,
            friction: 0.9985,
            rest_epsilon: 0.05,
            restitution: 0.92,
            rail_restitution: 0.88,
            spin_threshold: 0.1,
            spin_strength: 0.6,
        }
    }
}

/// Cue stroke tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotConfig {
    pub max_power: f32,
    /// Power cap for the opening break.
    pub break_max_power: f32,
    /// Drag distance to cue ball speed.
    pub power_scale: f32,
    /// Drags at or below this distance never shoot.
    pub deadzone: f32,
    /// Grab radius around the cue ball for break repositioning, in ball radii.
    pub cue_grab_radius_factor: f32,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            max_power: 50.0,
            break_max_power: 100.0,
            power_scale: 0.06,
            deadzone: 6.0,
            cue_grab_radius_factor: 3.0,
        }
    }
}

/// Configuration for one match. Every field has a default, so a partial
/// JSON document only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Host frame pacing in seconds (default: 1/60).
    pub fixed_dt: f32,
    pub table: TableConfig,
    pub physics: PhysicsConfig,
    pub shot: ShotConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            table: TableConfig::default(),
            physics: PhysicsConfig::default(),
            shot: ShotConfig::default(),
        }
    }
}

/// Why a configuration could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

impl MatchConfig {
    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::Invalid { field, reason })
            }
        }

        let t = &self.table;
        let p = &self.physics;
        let s = &self.shot;
        check(self.fixed_dt > 0.0, "fixed_dt", "must be positive")?;
        check(t.ball_radius > 0.0, "table.ball_radius", "must be positive")?;
        check(t.rack_gap >= 0.0, "table.rack_gap", "must not be negative")?;
        // The apex sits at 3/4 of the width; the back row is four row offsets behind it.
        let spacing = 2.0 * t.ball_radius + t.rack_gap;
        let rack_depth = 4.0 * spacing * (std::f32::consts::PI / 6.0).cos();
        check(
            0.25 * t.width >= rack_depth + 2.0 * t.ball_radius,
            "table.width",
            "table must fit the rack",
        )?;
        check(t.height >= 5.0 * spacing, "table.height", "table must fit the rack")?;
        check(t.corner_pocket_radius > 0.0, "table.corner_pocket_radius", "must be positive")?;
        check(t.side_pocket_radius > 0.0, "table.side_pocket_radius", "must be positive")?;
        check(
            t.kitchen_fraction > 0.0 && t.kitchen_fraction < 0.5,
            "table.kitchen_fraction",
            "must lie in (0, 0.5)",
        )?;
        check(p.substeps > 0, "physics.substeps", "must be at least 1")?;
        check(p.friction > 0.0 && p.friction < 1.0, "physics.friction", "must lie in (0, 1)")?;
        check(p.rest_epsilon > 0.0, "physics.rest_epsilon", "must be positive")?;
        check(p.restitution > 0.0 && p.restitution < 1.0, "physics.restitution", "must lie in (0, 1)")?;
        check(
            p.rail_restitution > 0.0 && p.rail_restitution < 1.0,
            "physics.rail_restitution",
            "must lie in (0, 1)",
        )?;
        check(p.spin_threshold >= 0.0, "physics.spin_threshold", "must not be negative")?;
        check(p.spin_strength >= 0.0, "physics.spin_strength", "must not be negative")?;
        check(s.max_power > 0.0 && s.break_max_power > 0.0, "shot.max_power", "must be positive")?;
        check(s.power_scale > 0.0, "shot.power_scale", "must be positive")?;
        check(s.deadzone >= 0.0, "shot.deadzone", "must not be negative")?;
        check(
            s.cue_grab_radius_factor > 0.0,
            "shot.cue_grab_radius_factor",
            "must be positive",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rack::rack_balls;
    use crate::core::table::Table;

    #[test]
    fn defaults_are_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = MatchConfig::from_json(r#"{ "physics": { "substeps": 4 } }"#).unwrap();
        assert_eq!(config.physics.substeps, 4);
        assert_eq!(config.physics.restitution, 0.92);
        assert_eq!(config.table, TableConfig::default());
    }

    #[test]
    fn rail_is_lossier_than_ball_contact() {
        let p = PhysicsConfig::default();
        assert!(p.rail_restitution < p.restitution);
        assert!(p.restitution < 1.0);
    }

    #[test]
    fn rejects_zero_substeps() {
        let err = MatchConfig::from_json(r#"{ "physics": { "substeps": 0 } }"#).unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "physics.substeps"),
            other => panic!("unexpected error: {}", other),
        }
    }

    fn invalid_field(json: &str) -> &'static str {
        match MatchConfig::from_json(json) {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("expected an invalid field, got {:?}", other),
        }
    }

    #[test]
    fn rejects_tables_too_small_for_the_rack() {
        assert_eq!(invalid_field(r#"{ "table": { "width": 200, "height": 150 } }"#), "table.width");
        assert_eq!(invalid_field(r#"{ "table": { "width": 800, "height": 90 } }"#), "table.height");
    }

    #[test]
    fn accepted_small_tables_rack_inside_the_rails() {
        for (width, height) in [(370.0, 110.0), (400.0, 120.0), (800.0, 400.0)] {
            let mut config = MatchConfig::default();
            config.table.width = width;
            config.table.height = height;
            assert!(config.validate().is_ok(), "{}x{} should be accepted", width, height);
            let table = Table::new(&config.table);
            let balls = rack_balls(&table, config.table.ball_radius, config.table.rack_gap);
            for ball in &balls {
                assert!(
                    table.contains(ball.pos, ball.radius),
                    "ball {} outside the rails on a {}x{} table",
                    ball.id,
                    width,
                    height
                );
            }
        }
    }

    #[test]
    fn rejects_negative_spin_threshold_and_zero_grab_radius() {
        assert_eq!(
            invalid_field(r#"{ "physics": { "spin_threshold": -0.1 } }"#),
            "physics.spin_threshold"
        );
        assert_eq!(
            invalid_field(r#"{ "shot": { "cue_grab_radius_factor": 0 } }"#),
            "shot.cue_grab_radius_factor"
        );
    }

    #[test]
    fn rejects_malformed_json() {
        let err = MatchConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
