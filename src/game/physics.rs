//! Actor Physics
//!
//! Gravity integration shared by the player, enemies and bosses.
//! Physics never fails; it only produces new state.

use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::core::rect::Rect;
use crate::core::vec2::Vec2;

/// Downward acceleration (units/s²).
pub const GRAVITY: f32 = 800.0;

/// Fallback ground plane. Actors whose top edge reaches this height stop
/// falling, tiles or not.
pub const GROUND_Y: f32 = 400.0;

/// Horizontal extent of the world (units).
pub const WORLD_WIDTH: f32 = 2000.0;

/// Countdown timers at or below this are treated as elapsed.
pub const TIMER_EPSILON: f32 = 1.0e-4;

/// Count a timer down by `dt`, floored at zero.
///
/// Residue left by repeated f32 subtraction snaps to zero, so `n` steps of
/// `t / n` always finish a timer of length `t`.
#[inline]
pub fn decay_timer(timer: f32, dt: f32) -> f32 {
    let left = timer - dt;
    if left <= TIMER_EPSILON {
        0.0
    } else {
        left
    }
}

/// Hard ceiling on a single frame delta (s). Keeps `velocity * dt` finite.
pub const DELTA_CEILING: f32 = 1.0e6;

/// Clamp a caller-supplied frame delta into something the integrator can use.
///
/// Non-finite and negative deltas become 0. Positive deltas pass through up
/// to `cap`, or up to [`DELTA_CEILING`] when no cap is configured.
#[inline]
pub fn sanitize_delta(dt: f32, cap: Option<f32>) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        0.0
    } else {
        dt.min(cap.unwrap_or(DELTA_CEILING)).min(DELTA_CEILING)
    }
}

/// Kinematic state of one actor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub position: Vec2,
    /// Velocity (units/s)
    pub velocity: Vec2,
    /// Width / height
    pub size: Vec2,
    /// Resting on a solid tile or the fallback plane
    pub on_ground: bool,
    /// Facing direction
    pub facing_right: bool,
}

impl Body {
    /// Create a body at rest, airborne, facing right.
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            on_ground: false,
            facing_right: true,
        }
    }

    /// Axis-aligned bounding box.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }

    /// Euclidean distance between top-left corners.
    #[inline]
    pub fn distance_to(&self, other: &Body) -> f32 {
        self.position.distance(other.position)
    }

    /// Advance one step: gravity while airborne, then position, then the
    /// fallback ground plane.
    pub fn integrate(&mut self, dt: f32) {
        if !self.on_ground {
            self.velocity.y += GRAVITY * dt;
        }

        self.position.x += self.velocity.x * dt;
        self.position.y += self.velocity.y * dt;

        if self.position.y >= GROUND_Y {
            self.position.y = GROUND_Y;
            self.velocity.y = 0.0;
            self.on_ground = true;
        }
    }

    /// Keep the body horizontally inside `[0, WORLD_WIDTH - width]`.
    #[inline]
    pub fn clamp_to_world(&mut self) {
        self.position.x = self.position.x.min(WORLD_WIDTH - self.size.x).max(0.0);
    }

    /// True when standing on the fallback plane.
    #[inline]
    pub fn on_fallback_ground(&self) -> bool {
        self.position.y >= GROUND_Y
    }

    /// Add to a state digest.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_vec2(self.position);
        hasher.update_vec2(self.velocity);
        hasher.update_vec2(self.size);
        hasher.update_bool(self.on_ground);
        hasher.update_bool(self.facing_right);
    }
}
