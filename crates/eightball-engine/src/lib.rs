pub mod api;
pub mod core;
pub mod rules;
pub mod bridge;
pub mod input;

// Match, rules and wire types used by the web bridge
pub use api::config::{ConfigError, MatchConfig, PhysicsConfig, ShotConfig, TableConfig};
pub use api::game::{Match, Rejection, TurnNotice, TURN_NOTICE_TICKS};
pub use api::hud::{BallTray, HudSnapshot};
pub use api::types::{event_kind, GameEvent, Group, MatchState, Phase, Player, SoundEvent};
pub use core::ball::{Ball, BallType, BALL_COUNT, CUE_ID, EIGHT_ID};
pub use core::physics::{PhysicsEngine, ShotEvents, StepReport};
pub use core::prediction::{predict, AimContact, AimPrediction};
pub use core::rack::{rack_balls, rack_positions, RACK_ORDER};
pub use core::table::{Pocket, Table};
pub use core::time::FixedTimestep;
pub use rules::{resolve, Foul, GameOver, GameOverReason, Resolution};
pub use input::cue::CueController;
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::{BallInstance, MatchBuffer};
