//! Browser bindings for the 8-ball engine.
//!
//! The host calls `game_init` once, then `game_tick(dt)` every animation
//! frame, and reads the render buffer plus the frame's game and sound
//! events straight out of WASM memory.

use std::cell::RefCell;

use eightball_engine::{InputEvent, MatchConfig};
use wasm_bindgen::prelude::*;

pub mod runner;

pub use runner::MatchRunner;

thread_local! {
    static RUNNER: RefCell<Option<MatchRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the live runner; `None` before `game_init`.
fn with_runner<R>(f: impl FnOnce(&mut MatchRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("match not initialized; call game_init() first");
                None
            }
        }
    })
}

fn start(config: MatchConfig) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = MatchRunner::new(config);
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("eightball: initialized");
}

#[wasm_bindgen]
pub fn game_init() {
    start(MatchConfig::default());
}

/// Start with a JSON configuration; missing fields take their defaults.
/// Returns false (and keeps the defaults) if the JSON is rejected.
#[wasm_bindgen]
pub fn game_init_with_config(json: &str) -> bool {
    match MatchConfig::from_json(json) {
        Ok(config) => {
            start(config);
            true
        }
        Err(err) => {
            start(MatchConfig::default());
            log::error!("config rejected, using defaults: {}", err);
            false
        }
    }
}

#[wasm_bindgen]
pub fn game_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

// ---- Input ----

#[wasm_bindgen]
pub fn game_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn game_pointer_up(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
}

#[wasm_bindgen]
pub fn game_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn game_key_down(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
}

#[wasm_bindgen]
pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
    with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
}

// ---- Direct commands ----

#[wasm_bindgen]
pub fn begin_shot(angle: f32, power: f32) -> bool {
    with_runner(|r| r.begin_shot(angle, power).is_ok()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn set_spin(x: f32, y: f32) -> bool {
    with_runner(|r| r.set_spin(x, y).is_ok()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn place_cue_ball(x: f32, y: f32) -> bool {
    with_runner(|r| r.place_cue_ball(x, y).is_ok()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn restart_match() {
    with_runner(|r| r.restart());
}

#[wasm_bindgen]
pub fn toggle_pause() {
    with_runner(|r| r.toggle_pause());
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_buffer_ptr() -> *const f32 {
    with_runner(|r| r.buffer_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_buffer_len() -> u32 {
    with_runner(|r| r.buffer_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_game_events_ptr() -> *const f32 {
    with_runner(|r| r.game_events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_game_events_len() -> u32 {
    with_runner(|r| r.game_events_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_sound_events_ptr() -> *const u8 {
    with_runner(|r| r.sound_events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_sound_events_len() -> u32 {
    with_runner(|r| r.sound_events_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_hud_json() -> String {
    with_runner(|r| r.hud_json()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_aim_json() -> String {
    with_runner(|r| r.aim_json()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_world_width() -> f32 {
    with_runner(|r| r.world_width()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_world_height() -> f32 {
    with_runner(|r| r.world_height()).unwrap_or(0.0)
}
