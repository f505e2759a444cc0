pub mod models;
pub mod player;
mod progress;

pub use models::*;
pub use player::PlayerInfo;
pub use progress::PollProgress;
