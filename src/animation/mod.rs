//! Animation module
//!
//! Sprite sheet animation driven once per rendered frame.

mod sprite;

pub use sprite::{Sprite, SpriteError};
