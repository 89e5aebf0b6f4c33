//! Enemies
//!
//! Distance-driven AI: idle out of range, chase inside the aggro range,
//! melee swing inside attack range. Per-type stats come from a static table.

use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::core::vec2::Vec2;
use crate::game::actor::{Actor, ActorId, EnemyId, Health};
use crate::game::combat::{Combatant, SwingGuard};
use crate::game::events::{EffectKind, EventLog};
use crate::game::physics::{decay_timer, Body};

/// Width and height of every regular enemy.
pub const ENEMY_SIZE: f32 = 32.0;
/// Melee range, measured between top-left corners.
pub const ENEMY_ATTACK_RANGE: f32 = 40.0;
/// Time between swings (s), same for every type.
pub const ENEMY_ATTACK_INTERVAL: f32 = 2.0;
/// How long a swing can hurt the player (s).
pub const ENEMY_ATTACK_WINDOW: f32 = 0.5;

const ANIMATION_FRAME_TIME: f32 = 0.2;
const ANIMATION_FRAMES: u8 = 4;

// =============================================================================
// ENEMY TYPES
// =============================================================================

/// Enemy type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fragile and quick to anger
    Forkling,
    /// Slow and tough
    CoinGolem,
    /// Fast with a long reach of awareness
    NullShade,
}

/// Fixed per-type stats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Maximum health
    pub health: u32,
    /// Damage per landed swing
    pub damage: u32,
    /// Chase speed (units/s)
    pub speed: f32,
    /// Distance at which the enemy starts chasing
    pub aggro_range: f32,
    /// Body colour
    pub color: &'static str,
    /// Marker letter drawn on the body
    pub marker: char,
}

static ENEMY_STATS: [EnemyStats; 3] = [
    EnemyStats { health: 30, damage: 15, speed: 80.0, aggro_range: 120.0, color: "#ff4444", marker: 'F' },
    EnemyStats { health: 60, damage: 25, speed: 40.0, aggro_range: 100.0, color: "#ffd700", marker: 'C' },
    EnemyStats { health: 40, damage: 20, speed: 100.0, aggro_range: 180.0, color: "#4444ff", marker: 'N' },
];

impl EnemyKind {
    /// Every type, in table order.
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Forkling, EnemyKind::CoinGolem, EnemyKind::NullShade];

    /// Stats row for this type.
    #[inline]
    pub fn stats(self) -> &'static EnemyStats {
        &ENEMY_STATS[self as usize]
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Forkling => "forkling",
            EnemyKind::CoinGolem => "coinGolem",
            EnemyKind::NullShade => "nullShade",
        }
    }
}

// =============================================================================
// ENEMY
// =============================================================================

/// A regular enemy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    body: Body,
    health: Health,
    target: ActorId,
    attack_cooldown: f32,
    attack_window: f32,
    #[serde(skip)]
    swing_guard: SwingGuard,
    animation_timer: f32,
    animation_frame: u8,
}

impl Enemy {
    /// Create an enemy targeting the player.
    pub fn new(id: EnemyId, kind: EnemyKind, position: Vec2) -> Self {
        debug!(%id, kind = kind.name(), x = position.x, y = position.y, "Enemy created");
        Self {
            id,
            kind,
            body: Body::new(position, Vec2::new(ENEMY_SIZE, ENEMY_SIZE)),
            health: Health::new(kind.stats().health),
            target: ActorId::Player,
            attack_cooldown: 0.0,
            attack_window: 0.0,
            swing_guard: SwingGuard::default(),
            animation_timer: 0.0,
            animation_frame: 0,
        }
    }

    /// Registry id.
    pub fn id(&self) -> EnemyId {
        self.id
    }

    /// Type.
    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Stats row.
    pub fn stats(&self) -> &'static EnemyStats {
        self.kind.stats()
    }

    /// Who this enemy is chasing.
    pub fn target(&self) -> ActorId {
        self.target
    }

    /// Swing in progress.
    pub fn is_attacking(&self) -> bool {
        self.attack_window > 0.0
    }

    /// Time until the next swing is allowed.
    pub fn attack_cooldown(&self) -> f32 {
        self.attack_cooldown
    }

    /// Current animation frame (0-3).
    pub fn animation_frame(&self) -> u8 {
        self.animation_frame
    }

    /// Advance one tick against the target's current body.
    ///
    /// `target` is `None` when the handle no longer resolves; the enemy then
    /// idles.
    pub fn update(&mut self, dt: f32, target: Option<&Body>, events: &mut EventLog) {
        if self.health.is_dead() {
            return;
        }

        self.update_ai(target, events);
        self.body.integrate(dt);

        self.attack_window = decay_timer(self.attack_window, dt);
        self.animation_timer += dt;
        if self.animation_timer >= ANIMATION_FRAME_TIME {
            self.animation_timer = 0.0;
            self.animation_frame = (self.animation_frame + 1) % ANIMATION_FRAMES;
        }
        self.attack_cooldown = decay_timer(self.attack_cooldown, dt);
    }

    fn update_ai(&mut self, target: Option<&Body>, events: &mut EventLog) {
        let Some(target) = target else {
            self.body.velocity.x = 0.0;
            return;
        };

        let stats = self.kind.stats();
        let distance = self.body.distance_to(target);

        if distance <= stats.aggro_range {
            let direction = if target.position.x > self.body.position.x { 1.0 } else { -1.0 };
            self.body.velocity.x = direction * stats.speed;
            self.body.facing_right = direction > 0.0;

            if distance <= ENEMY_ATTACK_RANGE && self.attack_cooldown <= 0.0 {
                self.attack(events);
            }
        } else {
            // Enemies do not patrol
            self.body.velocity.x = 0.0;
        }
    }

    fn attack(&mut self, events: &mut EventLog) {
        self.attack_cooldown = ENEMY_ATTACK_INTERVAL;
        self.attack_window = ENEMY_ATTACK_WINDOW;
        events.effect(EffectKind::EnemyAttack, self.body.position);
        debug!(id = %self.id, kind = self.kind.name(), "Enemy attacked");
    }
}

impl Actor for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn health(&self) -> &Health {
        &self.health
    }

    /// No invulnerability window and no shield.
    fn take_damage(&mut self, amount: u32, events: &mut EventLog) {
        if self.health.is_dead() {
            return;
        }
        let killed = self.health.damage(amount);
        debug!(id = %self.id, amount, health = self.health.current(), "Enemy took damage");

        if killed {
            self.attack_window = 0.0;
            events.effect(EffectKind::Death, self.body.position);
            info!(id = %self.id, kind = self.kind.name(), "Enemy died");
        }
    }
}

impl Combatant for Enemy {
    fn contact_damage(&self) -> Option<u32> {
        self.is_attacking().then_some(self.kind.stats().damage)
    }

    fn swing_guard(&mut self) -> &mut SwingGuard {
        &mut self.swing_guard
    }
}
