use serde::Serialize;

use crate::api::types::{Group, MatchState, Phase, Player};
use crate::core::ball::{Ball, BallType, CUE_ID, EIGHT_ID};
use crate::core::physics::ShotEvents;
use crate::rules::foul::Foul;

/// Why the match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameOverReason {
    /// Eight pocketed on a clean break.
    GoldenBreak,
    /// Eight pocketed on a break that fouled.
    EightFaultOnBreak,
    /// Eight pocketed early, on a foul, or from an open table.
    EightBallFault,
    /// Eight pocketed legally after clearing the group.
    ClearedEightBall,
}

impl GameOverReason {
    pub fn message(self) -> &'static str {
        match self {
            GameOverReason::GoldenBreak => "Golden Break! 8-ball pocketed on the break.",
            GameOverReason::EightFaultOnBreak => "8-ball fault on break!",
            GameOverReason::EightBallFault => "8-ball fault!",
            GameOverReason::ClearedEightBall => "Perfect 8-ball!",
        }
    }

    pub fn code(self) -> f32 {
        match self {
            GameOverReason::GoldenBreak => 1.0,
            GameOverReason::EightFaultOnBreak => 2.0,
            GameOverReason::EightBallFault => 3.0,
            GameOverReason::ClearedEightBall => 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameOver {
    pub winner: Player,
    pub reason: GameOverReason,
}

/// The verdict on one settled shot. Applying it is the controller's job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub foul: Option<Foul>,
    /// The shooter loses the table.
    pub turn_ends: bool,
    pub next_phase: Phase,
    pub game_over: Option<GameOver>,
    /// Group newly assigned to the shooter on this shot.
    pub assigned: Option<Group>,
    /// The cue ball was pocketed and must come back for ball in hand.
    pub respot_cue: bool,
}

impl Resolution {
    fn game_over(foul: Option<Foul>, winner: Player, reason: GameOverReason) -> Self {
        Self {
            foul,
            turn_ends: false,
            next_phase: Phase::GameOver,
            game_over: Some(GameOver { winner, reason }),
            assigned: None,
            respot_cue: false,
        }
    }
}

/// Object balls of `group` still on the table.
pub fn remaining(balls: &[Ball], group: Group) -> usize {
    balls
        .iter()
        .filter(|b| !b.pocketed && b.ball_type() == group.ball_type())
        .count()
}

/// Adjudicate a settled shot. Pure: reads the shot record, the match state
/// (with `shot_count` already counting this shot) and the balls as they lie.
pub fn resolve(events: &ShotEvents, state: &MatchState, balls: &[Ball]) -> Resolution {
    let shooter = state.turn;
    let cue_pocketed = balls.iter().any(|b| b.id == CUE_ID && b.pocketed);
    let foul = detect_foul(events, state, balls, cue_pocketed);

    if events.pocketed(EIGHT_ID) {
        return resolve_eight(state, balls, foul);
    }

    let mut turn_ends = true;
    let mut assigned = None;
    if foul.is_none() && !events.pocketed_ids.is_empty() {
        let mut object_balls = events
            .pocketed_ids
            .iter()
            .copied()
            .filter(|&id| id != CUE_ID && id != EIGHT_ID);

        if state.open_table {
            if state.is_break() {
                // Groups stay open after the break even if balls drop.
                turn_ends = object_balls.next().is_none();
            } else if let Some(group) = object_balls.next().and_then(Group::of_id) {
                assigned = Some(group);
                turn_ends = false;
            }
        } else if let Some(own) = state.group(shooter) {
            turn_ends = !object_balls.any(|id| Group::of_id(id) == Some(own));
        }
    }

    let next_phase = if cue_pocketed || foul.is_some() {
        Phase::BallInHand
    } else {
        Phase::Aiming
    };

    Resolution {
        foul,
        turn_ends,
        next_phase,
        game_over: None,
        assigned,
        respot_cue: cue_pocketed,
    }
}

/// Foul checks in precedence order: scratch, no contact, wrong first contact.
fn detect_foul(events: &ShotEvents, state: &MatchState, balls: &[Ball], cue_pocketed: bool) -> Option<Foul> {
    if cue_pocketed {
        return Some(Foul::Scratch);
    }
    let Some(first) = events.first_hit else {
        return Some(Foul::NoContact);
    };
    first_contact_foul(state, balls, first)
}

/// The foul incurred if the shooter's first contact is ball `id`, given the
/// table as it lies. Always `None` on an open table.
pub fn first_contact_foul(state: &MatchState, balls: &[Ball], id: u8) -> Option<Foul> {
    if state.open_table {
        return None;
    }
    let own = state.group(state.turn)?;
    match BallType::of(id) {
        BallType::Eight if remaining(balls, own) > 0 => Some(Foul::EightTooEarly),
        BallType::Eight => None,
        ty if Group::of(ty) == Some(own) => None,
        _ => Some(Foul::WrongGroupFirst),
    }
}

fn resolve_eight(state: &MatchState, balls: &[Ball], foul: Option<Foul>) -> Resolution {
    let shooter = state.turn;

    if state.is_break() {
        return match foul {
            None => Resolution::game_over(None, shooter, GameOverReason::GoldenBreak),
            Some(_) => Resolution::game_over(
                Some(Foul::EightFaultOnBreak),
                shooter.opponent(),
                GameOverReason::EightFaultOnBreak,
            ),
        };
    }

    let cleared = !state.open_table
        && state
            .group(shooter)
            .map(|own| remaining(balls, own) == 0)
            .unwrap_or(false);

    if foul.is_none() && cleared {
        Resolution::game_over(None, shooter, GameOverReason::ClearedEightBall)
    } else {
        Resolution::game_over(foul, shooter.opponent(), GameOverReason::EightBallFault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::TableConfig;
    use crate::core::rack::rack_balls;
    use crate::core::table::Table;

    fn balls() -> Vec<Ball> {
        let table = Table::new(&TableConfig::default());
        rack_balls(&table, 10.0, 0.5)
    }

    fn pocket(balls: &mut [Ball], ids: &[u8]) {
        for &id in ids {
            balls[id as usize].pocket();
        }
    }

    fn events(first_hit: Option<u8>, pocketed: &[u8]) -> ShotEvents {
        ShotEvents {
            first_hit,
            pocketed_ids: pocketed.to_vec(),
            ..ShotEvents::default()
        }
    }

    fn state(shot_count: u32) -> MatchState {
        MatchState {
            shot_count,
            ..MatchState::new()
        }
    }

    fn assigned_state(shooter: Player, group: Group) -> MatchState {
        let mut s = state(5);
        s.turn = shooter;
        s.assign(shooter, group);
        s
    }

    /// Ball layout after a shot: `ids` pocketed, including anything pocketed earlier.
    fn after(ids: &[u8]) -> Vec<Ball> {
        let mut b = balls();
        pocket(&mut b, ids);
        b
    }

    #[test]
    fn scratch_is_a_foul_with_ball_in_hand() {
        let b = after(&[0]);
        let r = resolve(&events(Some(3), &[0]), &state(4), &b);
        assert_eq!(r.foul, Some(Foul::Scratch));
        assert!(r.turn_ends);
        assert!(r.respot_cue);
        assert_eq!(r.next_phase, Phase::BallInHand);
    }

    #[test]
    fn no_contact_is_a_foul() {
        let r = resolve(&events(None, &[]), &state(4), &balls());
        assert_eq!(r.foul, Some(Foul::NoContact));
        assert!(r.turn_ends);
        assert!(!r.respot_cue);
        assert_eq!(r.next_phase, Phase::BallInHand);
    }

    #[test]
    fn scratch_outranks_wrong_group() {
        let s = assigned_state(Player::One, Group::Stripe);
        let b = after(&[0]);
        let r = resolve(&events(Some(2), &[0]), &s, &b);
        assert_eq!(r.foul, Some(Foul::Scratch));
    }

    #[test]
    fn wrong_group_first_is_a_foul_even_when_own_ball_drops() {
        let s = assigned_state(Player::One, Group::Stripe);
        let b = after(&[11]);
        let r = resolve(&events(Some(2), &[11]), &s, &b);
        assert_eq!(r.foul, Some(Foul::WrongGroupFirst));
        assert!(r.turn_ends);
        assert_eq!(r.next_phase, Phase::BallInHand);
    }

    #[test]
    fn eight_first_with_group_up_is_a_foul() {
        let s = assigned_state(Player::Two, Group::Solid);
        let r = resolve(&events(Some(8), &[]), &s, &balls());
        assert_eq!(r.foul, Some(Foul::EightTooEarly));
    }

    #[test]
    fn eight_first_after_clearing_is_legal() {
        let s = assigned_state(Player::Two, Group::Solid);
        let b = after(&[1, 2, 3, 4, 5, 6, 7]);
        let r = resolve(&events(Some(8), &[]), &s, &b);
        assert_eq!(r.foul, None);
        assert!(r.turn_ends);
        assert_eq!(r.next_phase, Phase::Aiming);
    }

    #[test]
    fn any_first_contact_is_legal_on_open_table() {
        let r = resolve(&events(Some(8), &[]), &state(3), &balls());
        assert_eq!(r.foul, None);
        assert!(r.turn_ends);
    }

    #[test]
    fn golden_break_wins_without_assigning_groups() {
        let b = after(&[8, 3]);
        let r = resolve(&events(Some(1), &[3, 8]), &state(1), &b);
        assert_eq!(
            r.game_over,
            Some(GameOver { winner: Player::One, reason: GameOverReason::GoldenBreak })
        );
        assert_eq!(r.assigned, None);
        assert_eq!(r.next_phase, Phase::GameOver);
        assert!(!r.turn_ends);
    }

    #[test]
    fn eight_on_a_foul_break_loses() {
        let b = after(&[0, 8]);
        let r = resolve(&events(Some(1), &[0, 8]), &state(1), &b);
        assert_eq!(r.foul, Some(Foul::EightFaultOnBreak));
        assert_eq!(
            r.game_over,
            Some(GameOver { winner: Player::Two, reason: GameOverReason::EightFaultOnBreak })
        );
        assert!(!r.respot_cue);
    }

    #[test]
    fn eight_with_group_left_loses() {
        let s = assigned_state(Player::One, Group::Stripe);
        // Stripes 9-13 down, 14 and 15 still on the table.
        let b = after(&[9, 10, 11, 12, 13, 8]);
        let r = resolve(&events(Some(14), &[8]), &s, &b);
        assert_eq!(r.foul, None);
        assert_eq!(
            r.game_over,
            Some(GameOver { winner: Player::Two, reason: GameOverReason::EightBallFault })
        );
    }

    #[test]
    fn eight_after_clearing_wins() {
        let s = assigned_state(Player::Two, Group::Stripe);
        let b = after(&[9, 10, 11, 12, 13, 14, 15, 8]);
        let r = resolve(&events(Some(8), &[8]), &s, &b);
        assert_eq!(
            r.game_over,
            Some(GameOver { winner: Player::Two, reason: GameOverReason::ClearedEightBall })
        );
    }

    #[test]
    fn eight_and_scratch_after_clearing_loses() {
        let s = assigned_state(Player::Two, Group::Stripe);
        let b = after(&[9, 10, 11, 12, 13, 14, 15, 8, 0]);
        let r = resolve(&events(Some(8), &[8, 0]), &s, &b);
        assert_eq!(r.foul, Some(Foul::Scratch));
        assert_eq!(r.game_over.map(|g| g.winner), Some(Player::One));
    }

    #[test]
    fn eight_from_open_table_loses() {
        let b = after(&[8, 4]);
        let r = resolve(&events(Some(4), &[4, 8]), &state(3), &b);
        assert_eq!(r.game_over.map(|g| g.reason), Some(GameOverReason::EightBallFault));
        assert_eq!(r.game_over.map(|g| g.winner), Some(Player::Two));
        assert_eq!(r.assigned, None);
    }

    #[test]
    fn break_pocket_continues_without_assignment() {
        let b = after(&[5, 12]);
        let r = resolve(&events(Some(1), &[5, 12]), &state(1), &b);
        assert_eq!(r.foul, None);
        assert!(!r.turn_ends);
        assert_eq!(r.assigned, None);
        assert_eq!(r.next_phase, Phase::Aiming);
    }

    #[test]
    fn dry_break_ends_turn() {
        let r = resolve(&events(Some(1), &[]), &state(1), &balls());
        assert_eq!(r.foul, None);
        assert!(r.turn_ends);
    }

    #[test]
    fn open_table_pocket_assigns_group() {
        let b = after(&[3]);
        let r = resolve(&events(Some(3), &[3]), &state(2), &b);
        assert_eq!(r.assigned, Some(Group::Solid));
        assert!(!r.turn_ends);
        assert_eq!(r.next_phase, Phase::Aiming);
    }

    #[test]
    fn first_pocketed_decides_group() {
        let b = after(&[13, 2]);
        let r = resolve(&events(Some(2), &[13, 2]), &state(2), &b);
        assert_eq!(r.assigned, Some(Group::Stripe));
    }

    #[test]
    fn own_group_pocket_continues() {
        let s = assigned_state(Player::One, Group::Stripe);
        let b = after(&[11]);
        let r = resolve(&events(Some(11), &[11]), &s, &b);
        assert!(!r.turn_ends);
        assert_eq!(r.foul, None);
    }

    #[test]
    fn opponent_only_pocket_ends_turn() {
        let s = assigned_state(Player::One, Group::Stripe);
        let b = after(&[2]);
        let r = resolve(&events(Some(10), &[2]), &s, &b);
        assert_eq!(r.foul, None);
        assert!(r.turn_ends);
        assert_eq!(r.next_phase, Phase::Aiming);
    }

    #[test]
    fn mixed_pocket_with_own_ball_continues() {
        let s = assigned_state(Player::One, Group::Solid);
        let b = after(&[12, 6]);
        let r = resolve(&events(Some(6), &[12, 6]), &s, &b);
        assert!(!r.turn_ends);
    }

    #[test]
    fn legal_miss_ends_turn_without_ball_in_hand() {
        let s = assigned_state(Player::One, Group::Solid);
        let r = resolve(&events(Some(6), &[]), &s, &balls());
        assert_eq!(r.foul, None);
        assert!(r.turn_ends);
        assert_eq!(r.next_phase, Phase::Aiming);
    }

    #[test]
    fn remaining_counts_only_group_balls() {
        let b = after(&[1, 2, 8, 9]);
        assert_eq!(remaining(&b, Group::Solid), 5);
        assert_eq!(remaining(&b, Group::Stripe), 6);
    }
}
