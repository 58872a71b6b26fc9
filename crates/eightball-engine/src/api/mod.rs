pub mod config;
pub mod game;
pub mod hud;
pub mod types;
