//! Pointer, keyboard and UI commands turned into match commands.

use glam::Vec2;

use crate::api::game::Match;
use crate::api::types::Phase;
use crate::input::queue::InputEvent;

/// DOM key codes.
pub mod keys {
    pub const D: u32 = 68;
    pub const P: u32 = 80;
    pub const R: u32 = 82;
}

/// `InputEvent::Custom` kinds sent by the UI layer.
pub mod custom {
    /// a = spin x, b = spin y.
    pub const SET_SPIN: u32 = 1;
    pub const RESTART: u32 = 2;
    pub const TOGGLE_PAUSE: u32 = 3;
    /// a = angle (radians), b = power.
    pub const SHOOT: u32 = 4;
    /// a = x, b = y.
    pub const PLACE_CUE: u32 = 5;
    pub const TOGGLE_DEBUG: u32 = 6;
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    /// Moving the cue ball around the kitchen before the break.
    Reposition,
    /// Pulling back for power; the angle is locked at pointer down.
    Power { start: Vec2, angle: f32 },
}

/// Drag-to-shoot controller.
#[derive(Debug, Clone, Default)]
pub struct CueController {
    pointer: Vec2,
    drag: Option<Drag>,
}

impl CueController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Power the current pull-back would shoot with, for the power meter.
    pub fn pending_power(&self, game: &Match) -> Option<f32> {
        match self.drag {
            Some(Drag::Power { start, .. }) => Some(Self::power_for(game, start.distance(self.pointer))),
            _ => None,
        }
    }

    pub fn handle(&mut self, game: &mut Match, event: InputEvent) {
        match event {
            InputEvent::PointerMove { x, y } => self.pointer_move(game, Vec2::new(x, y)),
            InputEvent::PointerDown { x, y } => self.pointer_down(game, Vec2::new(x, y)),
            InputEvent::PointerUp { x, y } => self.pointer_up(game, Vec2::new(x, y)),
            InputEvent::KeyDown { key_code } => self.key_down(game, key_code),
            InputEvent::Custom { kind, a, b, .. } => self.custom(game, kind, a, b),
        }
    }

    pub fn handle_all(&mut self, game: &mut Match, events: impl IntoIterator<Item = InputEvent>) {
        for event in events {
            self.handle(game, event);
        }
    }

    fn pointer_move(&mut self, game: &mut Match, pos: Vec2) {
        self.pointer = pos;
        if game.is_paused() || game.phase() != Phase::Aiming {
            return;
        }
        match self.drag {
            None => game.set_aim_angle(Self::angle_to(game, pos)),
            Some(Drag::Reposition) => {
                let radius = game.cue_ball().radius;
                let target = game.table().clamp_to_kitchen(pos, radius);
                // Overlapping spots are skipped; the ball stays at the last good one.
                let _ = game.place_cue_ball(target.x, target.y);
            }
            Some(Drag::Power { .. }) => {}
        }
    }

    fn pointer_down(&mut self, game: &mut Match, pos: Vec2) {
        self.pointer = pos;
        if game.is_paused() {
            return;
        }
        match game.phase() {
            Phase::Aiming => {
                let cue = game.cue_ball();
                let grab = cue.radius * game.config().shot.cue_grab_radius_factor;
                if game.is_break_placement() && cue.pos.distance(pos) < grab {
                    self.drag = Some(Drag::Reposition);
                } else {
                    let angle = Self::angle_to(game, pos);
                    game.set_aim_angle(angle);
                    self.drag = Some(Drag::Power { start: pos, angle });
                }
            }
            Phase::BallInHand => {
                if let Err(rejection) = game.place_cue_ball(pos.x, pos.y) {
                    log::debug!("placement ignored: {}", rejection);
                }
            }
            Phase::Simulating | Phase::GameOver => {}
        }
    }

    fn pointer_up(&mut self, game: &mut Match, pos: Vec2) {
        self.pointer = pos;
        let Some(drag) = self.drag.take() else {
            return;
        };
        let Drag::Power { start, angle } = drag else {
            return;
        };

        let distance = start.distance(pos);
        if distance <= game.config().shot.deadzone {
            return;
        }
        let power = Self::power_for(game, distance);
        if let Err(rejection) = game.begin_shot(angle, power) {
            log::debug!("shot ignored: {}", rejection);
        }
    }

    fn key_down(&mut self, game: &mut Match, key_code: u32) {
        match key_code {
            keys::R => {
                self.drag = None;
                game.restart();
            }
            keys::P => game.toggle_pause(),
            keys::D => game.toggle_debug(),
            _ => {}
        }
    }

    fn custom(&mut self, game: &mut Match, kind: u32, a: f32, b: f32) {
        let result = match kind {
            custom::SET_SPIN => game.set_spin(a, b),
            custom::RESTART => {
                self.drag = None;
                game.restart();
                Ok(())
            }
            custom::TOGGLE_PAUSE => {
                game.toggle_pause();
                Ok(())
            }
            custom::SHOOT => game.begin_shot(a, b),
            custom::PLACE_CUE => game.place_cue_ball(a, b),
            custom::TOGGLE_DEBUG => {
                game.toggle_debug();
                Ok(())
            }
            other => {
                log::warn!("unknown custom event kind {}", other);
                Ok(())
            }
        };
        if let Err(rejection) = result {
            log::debug!("custom event {} ignored: {}", kind, rejection);
        }
    }

    fn angle_to(game: &Match, pos: Vec2) -> f32 {
        let d = pos - game.cue_ball().pos;
        d.y.atan2(d.x)
    }

    fn power_for(game: &Match, distance: f32) -> f32 {
        (distance * game.config().shot.power_scale).min(game.power_limit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown { x, y }
    }

    fn up(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerUp { x, y }
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMove { x, y }
    }

    #[test]
    fn moving_the_pointer_aims() {
        let mut game = Match::default();
        let mut cue = CueController::new();
        let c = game.cue_ball().pos;
        cue.handle(&mut game, moved(c.x, c.y + 100.0));
        assert!((game.aim_angle() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn drag_back_shoots_along_locked_angle() {
        let mut game = Match::default();
        let mut cue = CueController::new();
        let c = game.cue_ball().pos;
        // Press to the right of the cue ball, pull 400 units away.
        cue.handle_all(
            &mut game,
            [down(c.x + 100.0, c.y), moved(c.x - 300.0, c.y), up(c.x - 300.0, c.y)],
        );
        assert_eq!(game.phase(), Phase::Simulating);
        let vel = game.cue_ball().vel;
        assert!((vel.length() - 24.0).abs() < 1e-3);
        assert!(vel.x > 0.0 && vel.y.abs() < 1e-3);
    }

    #[test]
    fn short_drag_is_ignored() {
        let mut game = Match::default();
        let mut cue = CueController::new();
        let c = game.cue_ball().pos;
        cue.handle_all(&mut game, [down(c.x + 100.0, c.y), up(c.x + 95.0, c.y)]);
        assert_eq!(game.phase(), Phase::Aiming);
        assert!(!cue.is_dragging());
    }

    #[test]
    fn long_drag_is_capped_at_the_break_limit() {
        let mut game = Match::default();
        let mut cue = CueController::new();
        let c = game.cue_ball().pos;
        cue.handle_all(&mut game, [down(c.x + 100.0, c.y)]);
        cue.handle(&mut game, moved(c.x - 5000.0, c.y));
        assert_eq!(cue.pending_power(&game), Some(100.0));
    }

    #[test]
    fn grabbing_the_cue_before_the_break_repositions_it() {
        let mut game = Match::default();
        let mut cue = CueController::new();
        let c = game.cue_ball().pos;
        cue.handle_all(&mut game, [down(c.x + 5.0, c.y), moved(150.0, 180.0), up(150.0, 180.0)]);
        assert_eq!(game.cue_ball().pos, Vec2::new(150.0, 180.0));
        assert_eq!(game.phase(), Phase::Aiming);

        // Dragging past the kitchen line stops at the line.
        cue.handle_all(&mut game, [down(150.0, 180.0), moved(700.0, 180.0), up(700.0, 180.0)]);
        assert_eq!(game.cue_ball().pos, Vec2::new(game.table().kitchen_right, 180.0));
    }

    #[test]
    fn ball_in_hand_click_places_cue() {
        let mut game = Match::default();
        let mut cue = CueController::new();
        // Miss everything to hand the opponent ball in hand.
        game.begin_shot(-std::f32::consts::FRAC_PI_2, 5.0).unwrap();
        while game.phase() == Phase::Simulating {
            game.tick(1.0 / 60.0);
        }
        assert_eq!(game.phase(), Phase::BallInHand);
        cue.handle(&mut game, down(500.0, 120.0));
        assert_eq!(game.phase(), Phase::Aiming);
        assert_eq!(game.cue_ball().pos, Vec2::new(500.0, 120.0));
    }

    #[test]
    fn keys_restart_pause_and_debug() {
        let mut game = Match::default();
        let mut cue = CueController::new();
        cue.handle(&mut game, InputEvent::KeyDown { key_code: keys::P });
        assert!(game.is_paused());
        cue.handle(&mut game, InputEvent::KeyDown { key_code: keys::D });
        assert!(game.debug());
        game.toggle_pause();
        game.begin_shot(0.0, 40.0).unwrap();
        cue.handle(&mut game, InputEvent::KeyDown { key_code: keys::R });
        assert_eq!(game.phase(), Phase::Aiming);
        assert_eq!(game.state().shot_count, 0);
    }

    #[test]
    fn custom_events_drive_the_match() {
        let mut game = Match::default();
        let mut cue = CueController::new();
        cue.handle(&mut game, InputEvent::Custom { kind: custom::SET_SPIN, a: 0.2, b: -0.7, c: 0.0 });
        assert_eq!(game.spin(), Vec2::new(0.2, -0.7));
        cue.handle(&mut game, InputEvent::Custom { kind: custom::PLACE_CUE, a: 120.0, b: 300.0, c: 0.0 });
        assert_eq!(game.cue_ball().pos, Vec2::new(120.0, 300.0));
        cue.handle(&mut game, InputEvent::Custom { kind: custom::SHOOT, a: 0.0, b: 30.0, c: 0.0 });
        assert_eq!(game.phase(), Phase::Simulating);
    }

    #[test]
    fn input_is_ignored_while_paused() {
        let mut game = Match::default();
        let mut cue = CueController::new();
        game.toggle_pause();
        let c = game.cue_ball().pos;
        cue.handle_all(&mut game, [down(c.x + 100.0, c.y), up(c.x - 300.0, c.y)]);
        assert_eq!(game.phase(), Phase::Aiming);
        assert!(!cue.is_dragging());
    }
}
