//! Game Logic Module
//!
//! All simulation code. Nothing here renders, plays audio or reads devices;
//! hosts feed in input frames and consume events and snapshots.
//!
//! ## Module Structure
//!
//! - `physics`: Shared body integration and the fallback ground plane
//! - `actor`: Health latch, the `Actor` trait and actor handles
//! - `input`: Held-input frames and key bindings
//! - `player`: Player state machine
//! - `enemy`: Enemy AI and stat table
//! - `boss`: Boss encounters
//! - `tilemap`: Tiles and procedural level generation
//! - `collision`: Level-collision resolver
//! - `combat`: Melee between player and opponents
//! - `spawner`: Timed enemy spawns
//! - `events`: Event stream and effects sink
//! - `snapshot`: Render draw-intent and renderer sink
//! - `world`: Actor registry, level, score, progression
//! - `tick`: Per-frame simulation loop

pub mod physics;
pub mod actor;
pub mod input;
pub mod player;
pub mod enemy;
pub mod boss;
pub mod tilemap;
pub mod collision;
pub mod combat;
pub mod spawner;
pub mod events;
pub mod snapshot;
pub mod world;
pub mod tick;

// Re-export key types
pub use actor::{Actor, ActorId, EnemyId, Health};
pub use input::{InputAction, InputFrame};
pub use player::Player;
pub use enemy::{Enemy, EnemyKind};
pub use boss::{Boss, BossKind};
pub use tilemap::{Level, LevelError, LevelTheme, Tile, TileKind};
pub use events::{EffectKind, EventSink, GameEvent, GameEventData};
pub use snapshot::{RenderSink, RenderSnapshot};
pub use world::{LevelPhase, World, WorldError};
pub use tick::{tick, TickResult};
