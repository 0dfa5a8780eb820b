pub mod engine;
pub mod scoring;
pub mod timers;
pub mod game_events;
pub mod round_controller;
pub mod theme;

// Re-export main components
pub use engine::*;
pub use scoring::*;
pub use timers::*;
pub use game_events::*;
pub use round_controller::*;
pub use theme::*;
