//! Bosses
//!
//! One boss guards the end of each level. Bosses chase and swing like
//! regular enemies, fire a themed special ability on a long cooldown, and
//! turn aggressive once at half health.

use std::f32::consts::TAU;

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::core::vec2::Vec2;
use crate::game::actor::{Actor, ActorId, Health};
use crate::game::combat::{Combatant, SwingGuard};
use crate::game::events::{EffectKind, EventLog, GameEventData};
use crate::game::physics::{decay_timer, Body};

/// Width and height of a boss.
pub const BOSS_SIZE: f32 = 64.0;
/// Where bosses appear.
pub const BOSS_SPAWN: Vec2 = Vec2::new(1400.0, 300.0);
/// Melee range, measured between top-left corners.
pub const BOSS_ATTACK_RANGE: f32 = 80.0;
/// Phase-1 time between swings (s).
pub const BOSS_ATTACK_INTERVAL: f32 = 3.0;
/// How long a swing can hurt the player (s).
pub const BOSS_ATTACK_WINDOW: f32 = 0.8;
/// Phase-1 time between specials (s).
pub const BOSS_SPECIAL_INTERVAL: f32 = 10.0;
/// Health ratio at or below which phase 2 starts.
pub const PHASE_THRESHOLD: f32 = 0.5;

const LAVA_BURST_SPEED: f32 = 200.0;
const GOLDEN_BARRAGE_SPEED: f32 = 150.0;
const ANIMATION_FRAME_TIME: f32 = 0.15;
const ANIMATION_FRAMES: u8 = 6;

/// Boss identity, one per level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossKind {
    /// House of Forks
    Vulkran,
    /// House of Greed
    Aurios,
    /// House of Silence
    FracturedPhantom,
}

/// Themed special ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialAbility {
    /// Five fire projectiles fanned forward
    LavaBurst,
    /// Eight coin projectiles in a ring
    GoldenBarrage,
    /// A void rift around the boss
    VoidRift,
}

/// Fixed per-boss stats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossStats {
    /// Maximum health
    pub health: u32,
    /// Damage per landed swing
    pub damage: u32,
    /// Phase-1 chase speed
    pub speed: f32,
    /// Distance at which the boss engages
    pub aggro_range: f32,
    /// Body colour
    pub color: &'static str,
    /// Marker letter
    pub marker: char,
    /// Special ability
    pub special: SpecialAbility,
}

static BOSS_STATS: [BossStats; 3] = [
    BossStats {
        health: 200,
        damage: 40,
        speed: 40.0,
        aggro_range: 250.0,
        color: "#ff4444",
        marker: 'V',
        special: SpecialAbility::LavaBurst,
    },
    BossStats {
        health: 250,
        damage: 35,
        speed: 50.0,
        aggro_range: 300.0,
        color: "#ffd700",
        marker: 'A',
        special: SpecialAbility::GoldenBarrage,
    },
    BossStats {
        health: 300,
        damage: 45,
        speed: 60.0,
        aggro_range: 350.0,
        color: "#4444ff",
        marker: 'P',
        special: SpecialAbility::VoidRift,
    },
];

impl BossKind {
    /// Stats row.
    #[inline]
    pub fn stats(self) -> &'static BossStats {
        &BOSS_STATS[self as usize]
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            BossKind::Vulkran => "Vulkran",
            BossKind::Aurios => "Aurios",
            BossKind::FracturedPhantom => "Fractured Phantom",
        }
    }
}

/// A level boss.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    kind: BossKind,
    body: Body,
    health: Health,
    target: ActorId,
    phase: u8,
    speed: f32,
    attack_interval: f32,
    special_interval: f32,
    attack_cooldown: f32,
    attack_window: f32,
    special_cooldown: f32,
    #[serde(skip)]
    swing_guard: SwingGuard,
    animation_timer: f32,
    animation_frame: u8,
}

impl Boss {
    /// Create a boss targeting the player.
    pub fn new(kind: BossKind, position: Vec2) -> Self {
        let stats = kind.stats();
        Self {
            kind,
            body: Body::new(position, Vec2::new(BOSS_SIZE, BOSS_SIZE)),
            health: Health::new(stats.health),
            target: ActorId::Player,
            phase: 1,
            speed: stats.speed,
            attack_interval: BOSS_ATTACK_INTERVAL,
            special_interval: BOSS_SPECIAL_INTERVAL,
            attack_cooldown: 0.0,
            attack_window: 0.0,
            special_cooldown: 0.0,
            swing_guard: SwingGuard::default(),
            animation_timer: 0.0,
            animation_frame: 0,
        }
    }

    /// Identity.
    pub fn kind(&self) -> BossKind {
        self.kind
    }

    /// Who this boss is chasing.
    pub fn target(&self) -> ActorId {
        self.target
    }

    /// 1 or 2.
    pub fn phase(&self) -> u8 {
        self.phase
    }

    /// Current chase speed.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Current time between swings.
    pub fn attack_interval(&self) -> f32 {
        self.attack_interval
    }

    /// Current time between specials.
    pub fn special_interval(&self) -> f32 {
        self.special_interval
    }

    /// Swing in progress.
    pub fn is_attacking(&self) -> bool {
        self.attack_window > 0.0
    }

    /// Current animation frame (0-5).
    pub fn animation_frame(&self) -> u8 {
        self.animation_frame
    }

    /// Advance one tick against the target's current body.
    pub fn update(&mut self, dt: f32, target: Option<&Body>, events: &mut EventLog) {
        if self.health.is_dead() {
            return;
        }

        self.update_phase(events);
        self.update_ai(target, events);
        self.body.integrate(dt);

        self.attack_window = decay_timer(self.attack_window, dt);
        self.animation_timer += dt;
        if self.animation_timer >= ANIMATION_FRAME_TIME {
            self.animation_timer = 0.0;
            self.animation_frame = (self.animation_frame + 1) % ANIMATION_FRAMES;
        }
        self.attack_cooldown = decay_timer(self.attack_cooldown, dt);
        self.special_cooldown = decay_timer(self.special_cooldown, dt);
    }

    fn update_phase(&mut self, events: &mut EventLog) {
        if self.phase != 1 || self.health.ratio() > PHASE_THRESHOLD {
            return;
        }
        self.phase = 2;
        self.speed *= 1.5;
        self.attack_interval *= 0.7;
        self.special_interval *= 0.8;

        events.effect(EffectKind::BossPhase, self.body.position);
        events.emit(GameEventData::BossPhaseChanged {
            kind: self.kind,
            phase: self.phase,
        });
        info!(boss = self.kind.name(), "Boss enraged");
    }

    fn update_ai(&mut self, target: Option<&Body>, events: &mut EventLog) {
        let Some(target) = target else {
            self.body.velocity.x = 0.0;
            return;
        };

        let distance = self.body.distance_to(target);
        if distance > self.kind.stats().aggro_range {
            self.body.velocity.x = 0.0;
            return;
        }

        let direction = if target.position.x > self.body.position.x { 1.0 } else { -1.0 };
        self.body.velocity.x = direction * self.speed;
        self.body.facing_right = direction > 0.0;

        if distance <= BOSS_ATTACK_RANGE && self.attack_cooldown <= 0.0 {
            self.attack_cooldown = self.attack_interval;
            self.attack_window = BOSS_ATTACK_WINDOW;
            events.effect(EffectKind::BossAttack, self.body.position);
        }

        if self.special_cooldown <= 0.0 {
            self.use_special(events);
        }
    }

    fn use_special(&mut self, events: &mut EventLog) {
        self.special_cooldown = self.special_interval;
        let origin = self.body.bounds().center();

        match self.kind.stats().special {
            SpecialAbility::LavaBurst => {
                for i in 0..5 {
                    let angle = (i as f32 - 2.0) * 0.5;
                    events.emit(GameEventData::ProjectileFired {
                        kind: EffectKind::FireProjectile,
                        position: origin,
                        velocity: Vec2::from_angle(angle).scale(LAVA_BURST_SPEED),
                    });
                }
            }
            SpecialAbility::GoldenBarrage => {
                for i in 0..8 {
                    let angle = i as f32 / 8.0 * TAU;
                    events.emit(GameEventData::ProjectileFired {
                        kind: EffectKind::CoinProjectile,
                        position: origin,
                        velocity: Vec2::from_angle(angle).scale(GOLDEN_BARRAGE_SPEED),
                    });
                }
            }
            SpecialAbility::VoidRift => {
                events.effect(EffectKind::VoidRift, self.body.position);
            }
        }
    }
}

impl Actor for Boss {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn health(&self) -> &Health {
        &self.health
    }

    fn take_damage(&mut self, amount: u32, events: &mut EventLog) {
        if self.health.is_dead() {
            return;
        }
        let killed = self.health.damage(amount);
        let bounds = self.body.bounds();
        events.effect(EffectKind::Damage, Vec2::new(bounds.center().x, bounds.y));

        if killed {
            self.attack_window = 0.0;
            events.effect(EffectKind::Death, self.body.position);
            info!(boss = self.kind.name(), "Boss died");
        }
    }
}

impl Combatant for Boss {
    fn contact_damage(&self) -> Option<u32> {
        self.is_attacking().then_some(self.kind.stats().damage)
    }

    fn swing_guard(&mut self) -> &mut SwingGuard {
        &mut self.swing_guard
    }
}
