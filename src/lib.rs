//! Space Hooligans: a pay-to-play arcade shooter core.
//!
//! The library owns the real-time game loop (entity pools, collisions,
//! intensity scaling, the life/game-over state machine). Everything the
//! host supplies (pointer input, a drawing surface, the UI, the payment
//! session and the leaderboard) comes in through the traits in [`hooks`]
//! and [`surface`].

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod hooks;
pub mod intensity;
pub mod leaderboard;
pub mod pool;
pub mod scheduler;
pub mod session;
pub mod surface;

pub use compute::{Game, Transition};
pub use config::GameConfig;
pub use error::{CollaboratorError, ConfigError, GameError};
