//! Serializable scoreboard for the host UI.

use serde::Serialize;

use crate::api::game::{Match, TurnNotice};
use crate::api::types::{Group, Phase, Player};
use crate::core::ball::{Ball, EIGHT_ID};
use crate::core::physics::ShotEvents;

/// Balls a player still has to pocket, as shown beside their name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BallTray {
    pub player: Player,
    pub group: Option<Group>,
    /// Ascending ids.
    pub balls: Vec<u8>,
    /// The table is open and the tray is only a hint.
    pub faded: bool,
}

impl BallTray {
    fn for_player(player: Player, group: Option<Group>, balls: &[Ball]) -> Self {
        let (shown, faded) = match group {
            Some(group) => (group, false),
            // Open table: solids on the left, stripes on the right.
            None if player == Player::One => (Group::Solid, true),
            None => (Group::Stripe, true),
        };

        let mut ids: Vec<u8> = balls
            .iter()
            .filter(|b| b.on_table() && Group::of_id(b.id) == Some(shown))
            .map(|b| b.id)
            .collect();
        ids.sort_unstable();

        if ids.is_empty() && group.is_some() && balls.iter().any(|b| b.id == EIGHT_ID && b.on_table()) {
            ids.push(EIGHT_ID);
        }

        Self {
            player,
            group,
            balls: ids,
            faded,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub turn: Player,
    pub phase: Phase,
    pub paused: bool,
    pub debug: bool,
    pub open_table: bool,
    pub groups: [Option<Group>; 2],
    pub trays: [BallTray; 2],
    pub spin: [f32; 2],
    pub shot_count: u32,
    pub headline: String,
    pub status: String,
    pub turn_notice: Option<TurnNotice>,
    pub winner: Option<Player>,
    pub last_shot: ShotEvents,
}

impl HudSnapshot {
    pub fn capture(game: &Match) -> Self {
        let state = game.state();
        let spin = game.spin();
        Self {
            turn: state.turn,
            phase: state.phase,
            paused: game.is_paused(),
            debug: game.debug(),
            open_table: state.open_table,
            groups: state.groups,
            trays: [
                BallTray::for_player(Player::One, state.group(Player::One), game.balls()),
                BallTray::for_player(Player::Two, state.group(Player::Two), game.balls()),
            ],
            spin: [spin.x, spin.y],
            shot_count: state.shot_count,
            headline: game.headline().to_string(),
            status: game.status_line().to_string(),
            turn_notice: game.turn_notice(),
            winner: game.game_over().map(|over| over.winner),
            last_shot: game.shot_events().clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
