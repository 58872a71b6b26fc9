use glam::Vec2;
use serde::Serialize;

use crate::api::config::{ConfigError, MatchConfig};
use crate::api::types::{event_kind, GameEvent, Group, MatchState, Phase, Player, SoundEvent};
use crate::core::ball::{Ball, CUE_ID};
use crate::core::physics::{PhysicsEngine, ShotEvents, StepReport};
use crate::core::prediction::{self, AimPrediction};
use crate::core::rack::rack_balls;
use crate::core::table::Table;
use crate::rules::{self, GameOver, Resolution};

/// How long the turn-change notice stays up, in ticks (~0.5 s at 60 Hz).
pub const TURN_NOTICE_TICKS: u32 = 30;

const BREAK_HEADLINE: &str = "Breaking! Move mouse to aim, drag back to power.";

/// Why a command was not applied. Nothing changed when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("not accepted while {0:?}")]
    WrongPhase(Phase),
    #[error("match is paused")]
    Paused,
    #[error("cue ball is off the table")]
    CueBallPocketed,
    /// Angle or power is not a finite positive number.
    #[error("shot needs a finite angle and positive power")]
    InvalidShot,
    #[error("position is not finite")]
    InvalidPosition,
    /// Break placement must stay inside the kitchen.
    #[error("cue ball must stay in the kitchen before the break")]
    OutsideKitchen,
    #[error("cue ball would overlap ball {ball}")]
    Overlap { ball: u8 },
}

/// Transient "Player N's turn" banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnNotice {
    pub player: Player,
    pub ticks_left: u32,
}

/// One 8-ball match: the table, the sixteen balls, physics, and the
/// AIMING → SIMULATING → AIMING | BALL_IN_HAND | GAME_OVER state machine.
///
/// All state is owned here and mutated only through these methods, from a
/// single tick loop.
pub struct Match {
    config: MatchConfig,
    table: Table,
    balls: Vec<Ball>,
    physics: PhysicsEngine,
    state: MatchState,
    paused: bool,
    debug: bool,
    aim_angle: f32,
    headline: String,
    foul_message: String,
    turn_notice: Option<TurnNotice>,
    last_resolution: Option<Resolution>,
    game_over: Option<GameOver>,
    /// Ball layout when the current shot began, for aborting it.
    pre_shot: Vec<Ball>,
    events: Vec<GameEvent>,
    sounds: Vec<SoundEvent>,
}

impl Match {
    /// Rack a new match.
    pub fn new(config: MatchConfig) -> Self {
        let table = Table::new(&config.table);
        let balls = rack_balls(&table, config.table.ball_radius, config.table.rack_gap);
        let physics = PhysicsEngine::new(config.physics.clone());
        Self {
            config,
            table,
            pre_shot: balls.clone(),
            balls,
            physics,
            state: MatchState::new(),
            paused: false,
            debug: false,
            aim_angle: 0.0,
            headline: BREAK_HEADLINE.to_string(),
            foul_message: String::new(),
            turn_notice: None,
            last_resolution: None,
            game_over: None,
            events: Vec::new(),
            sounds: Vec::new(),
        }
    }

    /// Rack a new match from a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(MatchConfig::from_json(json)?))
    }

    // -- Read access --

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// All sixteen balls in id order, pocketed ones included.
    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn cue_ball(&self) -> &Ball {
        &self.balls[CUE_ID as usize]
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn turn(&self) -> Player {
        self.state.turn
    }

    pub fn group(&self, player: Player) -> Option<Group> {
        self.state.group(player)
    }

    pub fn open_table(&self) -> bool {
        self.state.open_table
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn spin(&self) -> Vec2 {
        self.physics.spin()
    }

    pub fn aim_angle(&self) -> f32 {
        self.aim_angle
    }

    /// Event record of the shot in flight, or of the last settled shot.
    pub fn shot_events(&self) -> &ShotEvents {
        self.physics.events()
    }

    pub fn last_resolution(&self) -> Option<&Resolution> {
        self.last_resolution.as_ref()
    }

    pub fn game_over(&self) -> Option<GameOver> {
        self.game_over
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    /// Last foul, e.g. `"FOUL: Scratch! Ball in Hand!"`; empty when none.
    pub fn foul_message(&self) -> &str {
        &self.foul_message
    }

    /// The one line a HUD shows under the scoreboard.
    pub fn status_line(&self) -> &str {
        if self.state.phase == Phase::GameOver {
            &self.headline
        } else if !self.foul_message.is_empty() {
            &self.foul_message
        } else if self.state.phase == Phase::BallInHand {
            "Place the Cue Ball"
        } else {
            "Aim & Shoot"
        }
    }

    pub fn turn_notice(&self) -> Option<TurnNotice> {
        self.turn_notice
    }

    /// Before the first shot the cue ball may be moved around the kitchen.
    pub fn is_break_placement(&self) -> bool {
        self.state.shot_count == 0 && self.state.phase == Phase::Aiming
    }

    /// Power cap for the next shot: the break gets a harder stroke.
    pub fn power_limit(&self) -> f32 {
        if self.state.shot_count == 0 {
            self.config.shot.break_max_power
        } else {
            self.config.shot.max_power
        }
    }

    /// Game events emitted since the last `clear_frame_data()`.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn sounds(&self) -> &[SoundEvent] {
        &self.sounds
    }

    pub fn clear_frame_data(&mut self) {
        self.events.clear();
        self.sounds.clear();
    }

    /// Aim line and ghost ball for `angle`, with first-contact legality for
    /// the current shooter.
    pub fn aim_prediction(&self, angle: f32) -> Option<AimPrediction> {
        prediction::predict(&self.balls, &self.table, angle, |id| {
            rules::first_contact_foul(&self.state, &self.balls, id).is_none()
        })
    }

    // -- Commands --

    /// Remember the displayed aim angle. Cosmetic; shots carry their own angle.
    pub fn set_aim_angle(&mut self, angle: f32) {
        if angle.is_finite() {
            self.aim_angle = angle;
        }
    }

    /// Strike the cue ball. Power is capped at `power_limit()`.
    pub fn begin_shot(&mut self, angle: f32, power: f32) -> Result<(), Rejection> {
        if self.paused {
            return Err(Rejection::Paused);
        }
        if self.state.phase != Phase::Aiming {
            return Err(Rejection::WrongPhase(self.state.phase));
        }
        if self.cue_ball().pocketed {
            return Err(Rejection::CueBallPocketed);
        }
        if !angle.is_finite() || !power.is_finite() || power <= 0.0 {
            return Err(Rejection::InvalidShot);
        }

        let power = power.min(self.power_limit());
        self.pre_shot.clone_from(&self.balls);
        self.physics.reset_events();
        self.balls[CUE_ID as usize].vel = Vec2::from_angle(angle) * power;
        self.aim_angle = angle;
        self.state.shot_count += 1;
        self.state.phase = Phase::Simulating;
        self.foul_message.clear();

        log::info!(
            "shot {}: player {} angle={:.3} power={:.1}",
            self.state.shot_count,
            self.state.turn.number(),
            angle,
            power
        );
        self.sounds.push(SoundEvent::CUE_STRIKE);
        self.events.push(GameEvent::new(
            event_kind::SHOT_TAKEN,
            angle,
            power,
            self.state.shot_count as f32,
        ));
        Ok(())
    }

    /// Set English for the next shot; each axis is clamped to [-1, 1].
    pub fn set_spin(&mut self, x: f32, y: f32) -> Result<(), Rejection> {
        match self.state.phase {
            Phase::Simulating | Phase::GameOver => Err(Rejection::WrongPhase(self.state.phase)),
            _ => {
                self.physics.set_spin(Vec2::new(x, y));
                Ok(())
            }
        }
    }

    /// Put the cue ball down: anywhere on the table with ball in hand, or
    /// inside the kitchen before the break.
    pub fn place_cue_ball(&mut self, x: f32, y: f32) -> Result<(), Rejection> {
        if self.paused {
            return Err(Rejection::Paused);
        }
        let target = Vec2::new(x, y);
        if !target.is_finite() {
            return Err(Rejection::InvalidPosition);
        }

        let radius = self.cue_ball().radius;
        let pos = match self.state.phase {
            Phase::BallInHand => self.table.clamp(target, radius),
            Phase::Aiming if self.state.shot_count == 0 => {
                if !self.table.in_kitchen(target, radius) {
                    return Err(Rejection::OutsideKitchen);
                }
                target
            }
            phase => return Err(Rejection::WrongPhase(phase)),
        };

        if let Some(other) = self.overlapping_ball(pos, radius) {
            log::debug!("cue placement at {:?} rejected: overlaps ball {}", pos, other);
            return Err(Rejection::Overlap { ball: other });
        }

        let cue = &mut self.balls[CUE_ID as usize];
        cue.pos = pos;
        cue.unpocket();
        if self.state.phase == Phase::BallInHand {
            self.state.phase = Phase::Aiming;
            self.foul_message.clear();
            log::info!("player {} placed the cue ball at {:?}", self.state.turn.number(), pos);
        }
        Ok(())
    }

    /// Discard everything and rack again.
    pub fn restart(&mut self) {
        let debug = self.debug;
        *self = Match::new(self.config.clone());
        self.debug = debug;
        self.events.push(GameEvent::new(event_kind::MATCH_RESTARTED, 0.0, 0.0, 0.0));
        log::info!("match restarted");
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!("paused: {}", self.paused);
    }

    pub fn toggle_debug(&mut self) {
        self.debug = !self.debug;
    }

    // -- Tick --

    /// One logical frame. Steps physics while a shot is running and resolves
    /// it once every ball has stopped.
    pub fn tick(&mut self, dt: f32) {
        if self.paused {
            return;
        }

        if let Some(notice) = self.turn_notice.as_mut() {
            notice.ticks_left = notice.ticks_left.saturating_sub(1);
        }
        if matches!(self.turn_notice, Some(notice) if notice.ticks_left == 0) {
            self.turn_notice = None;
        }

        if self.state.phase != Phase::Simulating {
            return;
        }

        let report = self.physics.step(&mut self.balls, &self.table, dt);
        self.emit_contacts(&report);

        if self.balls.iter().any(|b| !b.is_finite()) {
            self.abort_shot();
            return;
        }

        if PhysicsEngine::is_stable(&self.balls) {
            self.resolve_shot();
        }
    }

    fn emit_contacts(&mut self, report: &StepReport) {
        if report.ball_contacts > 0 {
            self.sounds.push(SoundEvent::BALL_CLICK);
        }
        if report.rail_contacts > 0 {
            self.sounds.push(SoundEvent::RAIL);
        }
        if !report.pocketed.is_empty() {
            self.sounds.push(SoundEvent::POCKET);
        }
        for &id in &report.pocketed {
            self.events.push(GameEvent::new(event_kind::BALL_POCKETED, id as f32, 0.0, 0.0));
        }
    }

    /// First object ball on the table that a cue ball at `pos` would overlap.
    fn overlapping_ball(&self, pos: Vec2, radius: f32) -> Option<u8> {
        self.balls
            .iter()
            .find(|b| !b.is_cue() && b.on_table() && b.pos.distance(pos) < b.radius + radius)
            .map(|b| b.id)
    }

    /// Where a scratched cue ball reappears: the head spot, or the nearest
    /// clear spot on square rings around it.
    fn free_cue_spot(&self) -> Vec2 {
        let radius = self.cue_ball().radius;
        let origin = self.table.head_spot();
        let reach = (self.table.width().max(self.table.height()) / radius) as i32;
        for ring in 0..=reach {
            for dy in -ring..=ring {
                for dx in -ring..=ring {
                    if dx.abs().max(dy.abs()) != ring {
                        continue;
                    }
                    let spot = origin + Vec2::new(dx as f32, dy as f32) * radius;
                    if self.table.contains(spot, radius) && self.overlapping_ball(spot, radius).is_none() {
                        return spot;
                    }
                }
            }
        }
        origin
    }

    /// Numeric blow-up: put the table back as it was before the stroke.
    fn abort_shot(&mut self) {
        log::warn!(
            "shot {} aborted: non-finite ball state, restoring pre-shot layout",
            self.state.shot_count
        );
        self.balls.clone_from(&self.pre_shot);
        for ball in &mut self.balls {
            ball.vel = Vec2::ZERO;
        }
        self.physics.reset_events();
        self.state.shot_count = self.state.shot_count.saturating_sub(1);
        self.state.phase = Phase::Aiming;
    }

    fn resolve_shot(&mut self) {
        let resolution = rules::resolve(self.physics.events(), &self.state, &self.balls);
        self.apply(&resolution);
        self.physics.clear_spin();
        self.last_resolution = Some(resolution);
    }

    fn apply(&mut self, resolution: &Resolution) {
        let shooter = self.state.turn;

        if let Some(foul) = resolution.foul {
            log::info!("foul by player {}: {}", shooter.number(), foul);
            self.events.push(GameEvent::new(event_kind::FOUL, foul.code(), 0.0, 0.0));
        }

        if let Some(over) = resolution.game_over {
            self.state.phase = Phase::GameOver;
            self.game_over = Some(over);
            self.headline = format!(
                "GAME OVER! Player {} WINS! ({})",
                over.winner.number(),
                over.reason.message()
            );
            self.foul_message = resolution
                .foul
                .map(|f| format!("FOUL: {}", f.reason()))
                .unwrap_or_default();
            log::info!("{}", self.headline);
            self.events.push(GameEvent::new(
                event_kind::GAME_OVER,
                over.winner.number() as f32,
                over.reason.code(),
                0.0,
            ));
            return;
        }

        if let Some(group) = resolution.assigned {
            self.state.assign(shooter, group);
            log::info!("player {} takes {:?}", shooter.number(), group);
            self.events.push(GameEvent::new(
                event_kind::GROUP_ASSIGNED,
                shooter.number() as f32,
                Group::code(Some(group)),
                0.0,
            ));
        }

        if resolution.respot_cue {
            let spot = self.free_cue_spot();
            let cue = &mut self.balls[CUE_ID as usize];
            cue.pos = spot;
            cue.unpocket();
        }
        self.state.phase = resolution.next_phase;

        if resolution.turn_ends {
            let next = shooter.opponent();
            self.state.turn = next;
            self.turn_notice = Some(TurnNotice {
                player: next,
                ticks_left: TURN_NOTICE_TICKS,
            });
            self.events.push(GameEvent::new(event_kind::TURN_CHANGED, next.number() as f32, 0.0, 0.0));
        }

        self.foul_message = match resolution.foul {
            Some(foul) => format!("FOUL: {}", foul.reason()),
            None => String::new(),
        };
        if self.state.phase == Phase::BallInHand {
            self.foul_message.push_str(" Ball in Hand!");
        }
    }
}

impl Default for Match {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}
