//! Core primitives.
//!
//! Math, RNG and hashing types with no knowledge of game rules.

pub mod vec2;
pub mod rect;
pub mod rng;
pub mod hash;

// Re-export core types
pub use vec2::Vec2;
pub use rect::Rect;
pub use rng::SimRng;
pub use hash::{compute_state_hash, StateHash, StateHasher};
