//! Game rules on top of the board geometry.
//!
//! - [`GameEngine`] - the state machine driving one game at a time
//! - [`PieceSpawner`] - upcoming queue fed by a [`Randomizer`]
//! - [`Scheduler`] - virtual-time gravity and auto-repeat timers
//! - [`SessionStats`] - score, lines and level bookkeeping
//! - [`EngineConfig`] - timing and randomizer settings
//!
//! # Game Flow
//!
//! 1. [`GameEngine::start_game`] fills the queue and spawns the first piece
//! 2. Gravity ticks move the piece down until it lands
//! 3. A landed piece enters the commit grace period and locks on the next tick
//! 4. Full rows are cleared, scored and the next piece spawns
//! 5. Repeat until a new piece collides at the spawn position

pub use self::{config::*, game::*, scheduler::*, spawner::*, stats::*, summary::*};

mod config;
mod game;
mod scheduler;
mod spawner;
mod stats;
mod summary;
