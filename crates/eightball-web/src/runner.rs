use eightball_engine::{
    CueController, FixedTimestep, GameEvent, HudSnapshot, InputEvent, InputQueue, Match,
    MatchBuffer, MatchConfig, Rejection,
};

/// Owns one match and everything the browser reads from it.
///
/// `lib.rs` keeps a single runner in a `thread_local!` and exports free
/// functions, because wasm-bindgen cannot export it directly.
pub struct MatchRunner {
    game: Match,
    cue: CueController,
    input: InputQueue,
    timestep: FixedTimestep,
    buffer: MatchBuffer,
    /// Game events published by the last frame.
    events: Vec<GameEvent>,
    /// Flat buffer of sound ids published by the last frame.
    sound_buffer: Vec<u8>,
}

impl MatchRunner {
    pub fn new(config: MatchConfig) -> Self {
        let timestep = FixedTimestep::new(config.fixed_dt);
        let game = Match::new(config);
        let mut buffer = MatchBuffer::new();
        buffer.write(&game);
        Self {
            game,
            cue: CueController::new(),
            input: InputQueue::new(),
            timestep,
            buffer,
            events: Vec::with_capacity(32),
            sound_buffer: Vec::with_capacity(32),
        }
    }

    pub fn game(&self) -> &Match {
        &self.game
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// One host frame: apply queued input, run whole ticks, rebuild buffers.
    /// Events from direct commands issued since the last frame are published
    /// along with this frame's.
    pub fn tick(&mut self, frame_dt: f32) {
        let events = self.input.drain();
        self.cue.handle_all(&mut self.game, events);

        let steps = self.timestep.accumulate(frame_dt);
        for _ in 0..steps {
            self.game.tick(self.timestep.dt());
        }

        self.buffer.write(&self.game);
        self.events.clear();
        self.events.extend_from_slice(self.game.events());
        self.sound_buffer.clear();
        self.sound_buffer
            .extend(self.game.sounds().iter().map(|sound| sound.0 as u8));
        self.game.clear_frame_data();
    }

    // ---- Direct commands ----

    pub fn begin_shot(&mut self, angle: f32, power: f32) -> Result<(), Rejection> {
        let result = self.game.begin_shot(angle, power);
        self.buffer.write(&self.game);
        result
    }

    pub fn set_spin(&mut self, x: f32, y: f32) -> Result<(), Rejection> {
        self.game.set_spin(x, y)
    }

    pub fn place_cue_ball(&mut self, x: f32, y: f32) -> Result<(), Rejection> {
        let result = self.game.place_cue_ball(x, y);
        self.buffer.write(&self.game);
        result
    }

    pub fn restart(&mut self) {
        self.game.restart();
        self.cue = CueController::new();
        self.timestep.reset();
        self.buffer.write(&self.game);
    }

    pub fn toggle_pause(&mut self) {
        self.game.toggle_pause();
    }

    // ---- Data accessors for the host ----

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.ptr()
    }

    pub fn buffer_len(&self) -> u32 {
        self.buffer.len() as u32
    }

    pub fn buffer(&self) -> &[f32] {
        self.buffer.as_slice()
    }

    pub fn game_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.events.len() as u32
    }

    pub fn sound_events(&self) -> &[u8] {
        &self.sound_buffer
    }

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn hud_json(&self) -> String {
        HudSnapshot::capture(&self.game).to_json().unwrap_or_else(|err| {
            log::error!("hud serialization failed: {}", err);
            String::from("{}")
        })
    }

    /// Aim line, ghost ball and pending power for the current pointer.
    pub fn aim_json(&self) -> String {
        let prediction = self.game.aim_prediction(self.game.aim_angle());
        let view = serde_json::json!({
            "angle": self.game.aim_angle(),
            "power": self.cue.pending_power(&self.game),
            "power_limit": self.game.power_limit(),
            "prediction": prediction,
        });
        view.to_string()
    }

    pub fn world_width(&self) -> f32 {
        let table = &self.game.config().table;
        table.width + 2.0 * table.margin
    }

    pub fn world_height(&self) -> f32 {
        let table = &self.game.config().table;
        table.height + 2.0 * table.margin
    }
}

impl Default for MatchRunner {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}
