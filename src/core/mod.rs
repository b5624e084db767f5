//! Core module
//!
//! Frame clock, stage configuration and the per-tick stage loop

mod config;
mod stage;
mod time;

pub use config::StageConfig;
pub use stage::{Stage, StageError, TickReport};
pub use time::{Clock, MAX_FRAME_SECONDS};
