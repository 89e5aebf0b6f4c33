//! # Relic Houses
//!
//! Real-time simulation core for the Relic Houses action-platformer: a
//! player state machine, enemy and boss AI, tile levels with a collision
//! resolver, and the per-frame tick that drives them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         RELIC HOUSES                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  config.rs         - SimConfig, JSON loading, validation    │
//! │                                                             │
//! │  core/             - Primitives (no game rules)             │
//! │  ├── vec2.rs       - 2D f32 vector                          │
//! │  ├── rect.rs       - Axis-aligned rectangles                │
//! │  ├── rng.rs        - Xorshift128+ PRNG                      │
//! │  └── hash.rs       - SHA-256 state digest                   │
//! │                                                             │
//! │  game/             - Simulation                             │
//! │  ├── physics.rs    - Gravity, integration, fallback ground  │
//! │  ├── player.rs     - Player state machine                   │
//! │  ├── enemy.rs      - Enemy AI                               │
//! │  ├── boss.rs       - Boss encounters                        │
//! │  ├── tilemap.rs    - Tiles and level generation             │
//! │  ├── collision.rs  - Level-collision resolver               │
//! │  ├── combat.rs     - Melee resolution                       │
//! │  ├── world.rs      - Registry, score, progression           │
//! │  └── tick.rs       - Per-frame simulation loop              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data flow
//!
//! Each tick: input → player → enemies (creation order) → boss → tile
//! collision → combat → culling and progression. Side effects leave the
//! simulation as [`GameEvent`](game::GameEvent)s; renderers read a
//! [`RenderSnapshot`](game::RenderSnapshot).
//!
//! ## Example
//!
//! ```
//! use relic_houses::{tick, InputAction, InputFrame, SimConfig, World};
//!
//! let mut world = World::new(SimConfig::seeded(7)).unwrap();
//! let result = tick(&mut world, &InputFrame::with(&[InputAction::Right]), 1.0 / 60.0);
//! assert!(!result.game_over);
//! assert_eq!(world.tick(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use config::{ConfigError, SimConfig};
pub use core::rng::SimRng;
pub use core::vec2::Vec2;
pub use game::input::{InputAction, InputFrame};
pub use game::tick::{tick, TickResult};
pub use game::world::{World, WorldError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal simulation tick rate (Hz) for fixed-step hosts
pub const TICK_RATE: u32 = 60;
