//! Shot adjudication under standard 8-ball rules with a golden break.

pub mod foul;
pub mod resolve;

pub use foul::Foul;
pub use resolve::{first_contact_foul, remaining, resolve, GameOver, GameOverReason, Resolution};
