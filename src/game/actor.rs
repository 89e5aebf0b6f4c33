//! Actors
//!
//! The capability set shared by the player, enemies and bosses: a body,
//! a health pool with a terminal death latch, and damage intake.

use std::fmt;

use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::core::rect::Rect;
use crate::game::events::EventLog;
use crate::game::physics::Body;

// =============================================================================
// ACTOR HANDLES
// =============================================================================

/// Registry key for an enemy.
///
/// Ids are allocated monotonically, so ordering by id is creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enemy#{}", self.0)
    }
}

/// Non-owning handle to any actor in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActorId {
    /// The player
    Player,
    /// An enemy in the registry
    Enemy(EnemyId),
    /// The current level boss
    Boss,
}

// =============================================================================
// HEALTH
// =============================================================================

/// Health pool. Once it reaches zero the actor is dead for good.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: u32,
    max: u32,
    dead: bool,
}

impl Health {
    /// Full health pool.
    pub const fn new(max: u32) -> Self {
        Self {
            current: max,
            max,
            dead: false,
        }
    }

    /// Current health.
    #[inline]
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Maximum health.
    #[inline]
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Death latch.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Fill ratio in `[0, 1]`.
    pub fn ratio(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }

    /// Subtract `amount`, floored at zero.
    ///
    /// Returns true only on the call that kills.
    pub fn damage(&mut self, amount: u32) -> bool {
        self.current = self.current.saturating_sub(amount);
        if self.current == 0 && !self.dead {
            self.dead = true;
            return true;
        }
        false
    }

    /// Add `amount`, clamped to max. Dead actors stay dead.
    pub fn heal(&mut self, amount: u32) {
        if self.dead {
            return;
        }
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    /// Restore to full and clear the latch.
    pub fn reset(&mut self) {
        *self = Self::new(self.max);
    }

    /// Add to a state digest.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.current);
        hasher.update_u32(self.max);
        hasher.update_bool(self.dead);
    }
}

// =============================================================================
// ACTOR TRAIT
// =============================================================================

/// Anything the level-collision resolver and combat can act on.
pub trait Actor {
    /// Kinematic state.
    fn body(&self) -> &Body;

    /// Kinematic state (mutable, for collision correction).
    fn body_mut(&mut self) -> &mut Body;

    /// Health pool.
    fn health(&self) -> &Health;

    /// Apply incoming damage, honouring any actor-specific protection.
    fn take_damage(&mut self, amount: u32, events: &mut EventLog);

    /// Bounding box.
    fn bounds(&self) -> Rect {
        self.body().bounds()
    }

    /// Death latch.
    fn is_dead(&self) -> bool {
        self.health().is_dead()
    }
}
