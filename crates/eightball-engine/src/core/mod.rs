pub mod ball;
pub mod physics;
pub mod prediction;
pub mod rack;
pub mod table;
pub mod time;
