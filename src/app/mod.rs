//! Application wiring: shared state and the simulation/render thread

pub mod game_loop;
pub mod state;

pub use game_loop::{GameLoop, HeadlessInput};
pub use state::AppState;
