//! Player
//!
//! Input-driven state machine over movement, attacks, shield and dash.
//! Attacks and dashes run to completion on their own timers; while either is
//! active, movement input is ignored.

use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use crate::core::rect::Rect;
use crate::core::vec2::Vec2;
use crate::game::actor::{Actor, Health};
use crate::game::events::{EffectKind, EventLog, GameEventData};
use crate::game::input::{InputAction, InputFrame};
use crate::game::physics::{decay_timer, Body};

// =============================================================================
// TUNING
// =============================================================================

/// Spawn point (top-left).
pub const PLAYER_SPAWN: Vec2 = Vec2::new(100.0, 400.0);
/// Width and height.
pub const PLAYER_SIZE: f32 = 32.0;
/// Horizontal run speed (units/s).
pub const RUN_SPEED: f32 = 200.0;
/// Upward velocity applied on jump (units/s).
pub const JUMP_IMPULSE: f32 = 400.0;
/// Maximum health.
pub const PLAYER_MAX_HEALTH: u32 = 100;
/// Maximum mana.
pub const PLAYER_MAX_MANA: f32 = 50.0;
/// Mana regenerated per second while below max.
pub const MANA_REGEN: f32 = 10.0;

/// Light attack cooldown (s).
pub const LIGHT_ATTACK_COOLDOWN: f32 = 0.5;
/// Heavy attack cooldown (s).
pub const HEAVY_ATTACK_COOLDOWN: f32 = 1.0;
/// Shield cooldown (s).
pub const SHIELD_COOLDOWN: f32 = 2.0;
/// Dash cooldown (s).
pub const DASH_COOLDOWN: f32 = 1.5;
/// Damage immunity after a hit (s).
pub const INVULNERABILITY_TIME: f32 = 1.0;

/// Mana cost of a heavy attack.
pub const HEAVY_ATTACK_MANA: f32 = 10.0;
/// Mana cost of a dash.
pub const DASH_MANA: f32 = 5.0;
/// Dash teleport distance.
pub const DASH_DISTANCE: f32 = 100.0;

/// Light attack swing duration (s).
pub const LIGHT_ATTACK_DURATION: f32 = 0.3;
/// Heavy attack swing duration (s).
pub const HEAVY_ATTACK_DURATION: f32 = 0.4;
/// Dash roll duration (s).
pub const DASH_DURATION: f32 = 0.3;
/// Shield duration (s).
pub const SHIELD_DURATION: f32 = 1.0;

const ANIMATION_FRAME_TIME: f32 = 0.2;
const ANIMATION_FRAMES: u8 = 4;

// =============================================================================
// ATTACKS
// =============================================================================

/// Melee attack variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    /// Fast, free
    Light,
    /// Slow, wide, costs mana
    Heavy,
}

impl AttackKind {
    /// Hitbox width.
    pub fn reach(self) -> f32 {
        match self {
            AttackKind::Light => 40.0,
            AttackKind::Heavy => 60.0,
        }
    }

    /// Damage per hit.
    pub fn damage(self) -> u32 {
        match self {
            AttackKind::Light => 15,
            AttackKind::Heavy => 30,
        }
    }

    fn duration(self) -> f32 {
        match self {
            AttackKind::Light => LIGHT_ATTACK_DURATION,
            AttackKind::Heavy => HEAVY_ATTACK_DURATION,
        }
    }
}

/// Swing in progress.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
struct ActiveAttack {
    kind: AttackKind,
    remaining: f32,
    swing: u32,
}

/// The player's attack area for the current swing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hitbox {
    /// Area in front of the player
    pub rect: Rect,
    /// Attack variant
    pub kind: AttackKind,
    /// Damage dealt per target
    pub damage: u32,
    /// Swing id; each target is hit at most once per swing
    pub swing: u32,
}

// =============================================================================
// ANIMATION
// =============================================================================

/// Player state tag, used for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAnimation {
    /// Standing
    Idle,
    /// Moving on the ground
    Run,
    /// Rising
    Jump,
    /// Falling
    Fall,
    /// Light attack swing
    Attack,
    /// Heavy attack swing
    HeavyAttack,
    /// Shield raised
    Shield,
    /// Dashing
    Roll,
    /// Terminal
    Death,
}

impl PlayerAnimation {
    /// Lowercase tag.
    pub fn as_str(self) -> &'static str {
        match self {
            PlayerAnimation::Idle => "idle",
            PlayerAnimation::Run => "run",
            PlayerAnimation::Jump => "jump",
            PlayerAnimation::Fall => "fall",
            PlayerAnimation::Attack => "attack",
            PlayerAnimation::HeavyAttack => "heavyAttack",
            PlayerAnimation::Shield => "shield",
            PlayerAnimation::Roll => "roll",
            PlayerAnimation::Death => "death",
        }
    }
}

// =============================================================================
// COOLDOWNS
// =============================================================================

/// Countdown timers, in seconds. All decay toward zero every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cooldowns {
    /// Light attack
    pub light_attack: f32,
    /// Heavy attack
    pub heavy_attack: f32,
    /// Shield
    pub shield: f32,
    /// Dash
    pub dash: f32,
    /// Post-hit damage immunity
    pub invulnerable: f32,
}

impl Cooldowns {
    /// Decay every timer by `dt`, floored at 0.
    pub fn tick(&mut self, dt: f32) {
        for timer in [
            &mut self.light_attack,
            &mut self.heavy_attack,
            &mut self.shield,
            &mut self.dash,
            &mut self.invulnerable,
        ] {
            *timer = decay_timer(*timer, dt);
        }
    }
}

// =============================================================================
// PLAYER
// =============================================================================

/// The player avatar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    body: Body,
    health: Health,
    mana: f32,
    cooldowns: Cooldowns,
    attack: Option<ActiveAttack>,
    shield_remaining: f32,
    dash_remaining: f32,
    swing_counter: u32,
    animation: PlayerAnimation,
    animation_timer: f32,
    animation_frame: u8,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Fresh player at the spawn point.
    pub fn new() -> Self {
        Self {
            body: Body::new(PLAYER_SPAWN, Vec2::new(PLAYER_SIZE, PLAYER_SIZE)),
            health: Health::new(PLAYER_MAX_HEALTH),
            mana: PLAYER_MAX_MANA,
            cooldowns: Cooldowns::default(),
            attack: None,
            shield_remaining: 0.0,
            dash_remaining: 0.0,
            swing_counter: 0,
            animation: PlayerAnimation::Idle,
            animation_timer: 0.0,
            animation_frame: 0,
        }
    }

    /// Restore spawn state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Put the player back at the spawn point, keeping health and mana.
    pub fn respawn(&mut self) {
        self.body = Body::new(PLAYER_SPAWN, self.body.size);
        self.attack = None;
        self.shield_remaining = 0.0;
        self.dash_remaining = 0.0;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current mana.
    pub fn mana(&self) -> f32 {
        self.mana
    }

    /// Set mana, clamped to `[0, max]`.
    pub fn set_mana(&mut self, mana: f32) {
        self.mana = mana.clamp(0.0, PLAYER_MAX_MANA);
    }

    /// Ability cooldowns and invulnerability timer.
    pub fn cooldowns(&self) -> &Cooldowns {
        &self.cooldowns
    }

    /// A swing is in progress.
    pub fn is_attacking(&self) -> bool {
        self.attack.is_some()
    }

    /// Shield is raised.
    pub fn is_shielding(&self) -> bool {
        self.shield_remaining > 0.0
    }

    /// Dash roll is in progress.
    pub fn is_dashing(&self) -> bool {
        self.dash_remaining > 0.0
    }

    /// Post-hit immunity is active.
    pub fn is_invulnerable(&self) -> bool {
        self.cooldowns.invulnerable > 0.0
    }

    /// Current state tag.
    pub fn animation(&self) -> PlayerAnimation {
        self.animation
    }

    /// Current animation frame (0-3).
    pub fn animation_frame(&self) -> u8 {
        self.animation_frame
    }

    /// Area hit by the current swing, flush against the leading edge.
    pub fn hitbox(&self) -> Option<Hitbox> {
        let attack = self.attack?;
        let reach = attack.kind.reach();
        let x = if self.body.facing_right {
            self.body.position.x + self.body.size.x
        } else {
            self.body.position.x - reach
        };

        Some(Hitbox {
            rect: Rect::new(x, self.body.position.y, reach, self.body.size.y),
            kind: attack.kind,
            damage: attack.kind.damage(),
            swing: attack.swing,
        })
    }

    // =========================================================================
    // Per-tick update
    // =========================================================================

    /// Advance one tick.
    ///
    /// Cooldowns decay even while dead; nothing else runs after death.
    pub fn update(&mut self, dt: f32, input: &InputFrame, events: &mut EventLog) {
        self.update_timers(dt);
        if self.health.is_dead() {
            return;
        }

        self.handle_input(input, events);

        self.body.integrate(dt);
        self.body.clamp_to_world();

        self.update_actions(dt);
        self.regenerate_mana(dt);
        self.update_animation(dt);
    }

    /// Decay ability cooldowns and the invulnerability timer.
    pub fn update_timers(&mut self, dt: f32) {
        self.cooldowns.tick(dt);
    }

    fn handle_input(&mut self, input: &InputFrame, events: &mut EventLog) {
        if self.is_attacking() || self.is_dashing() {
            return;
        }

        let direction = input.horizontal();
        if direction != 0.0 {
            self.body.facing_right = direction > 0.0;
        }
        self.body.velocity.x = direction * RUN_SPEED;

        if input.is_held(InputAction::Jump) {
            self.jump(events);
        }
        if input.is_held(InputAction::LightAttack) {
            self.light_attack(events);
        }
        if input.is_held(InputAction::HeavyAttack) {
            self.heavy_attack(events);
        }
        if input.is_held(InputAction::Shield) {
            self.shield(events);
        }
        if input.is_held(InputAction::Dash) {
            self.dash(events);
        }
    }

    fn update_actions(&mut self, dt: f32) {
        if let Some(attack) = self.attack.as_mut() {
            attack.remaining = decay_timer(attack.remaining, dt);
            if attack.remaining <= 0.0 {
                self.attack = None;
            }
        }
        self.shield_remaining = decay_timer(self.shield_remaining, dt);
        self.dash_remaining = decay_timer(self.dash_remaining, dt);
    }

    fn regenerate_mana(&mut self, dt: f32) {
        if self.mana < PLAYER_MAX_MANA {
            self.mana = (self.mana + MANA_REGEN * dt).min(PLAYER_MAX_MANA);
        }
    }

    fn update_animation(&mut self, dt: f32) {
        self.set_animation(self.derive_animation());

        self.animation_timer += dt;
        if self.animation_timer >= ANIMATION_FRAME_TIME {
            self.animation_timer = 0.0;
            self.animation_frame = (self.animation_frame + 1) % ANIMATION_FRAMES;
        }
    }

    /// Death, then roll, attack, shield, then movement.
    fn derive_animation(&self) -> PlayerAnimation {
        if self.health.is_dead() {
            return PlayerAnimation::Death;
        }
        if self.is_dashing() {
            return PlayerAnimation::Roll;
        }
        if let Some(attack) = self.attack {
            return match attack.kind {
                AttackKind::Light => PlayerAnimation::Attack,
                AttackKind::Heavy => PlayerAnimation::HeavyAttack,
            };
        }
        if self.is_shielding() {
            return PlayerAnimation::Shield;
        }

        if self.body.on_ground {
            if self.body.velocity.x.abs() > 0.0 {
                PlayerAnimation::Run
            } else {
                PlayerAnimation::Idle
            }
        } else if self.body.velocity.y < 0.0 {
            PlayerAnimation::Jump
        } else {
            PlayerAnimation::Fall
        }
    }

    fn set_animation(&mut self, animation: PlayerAnimation) {
        if self.animation != animation {
            self.animation = animation;
            self.animation_frame = 0;
            self.animation_timer = 0.0;
        }
    }

    /// Point in front of the player where swing effects appear.
    fn leading_edge(&self) -> Vec2 {
        let x = if self.body.facing_right {
            self.body.position.x + self.body.size.x
        } else {
            self.body.position.x
        };
        Vec2::new(x, self.body.position.y + self.body.size.y / 2.0)
    }

    // =========================================================================
    // Abilities
    // =========================================================================

    /// Jump if standing on something.
    pub fn jump(&mut self, events: &mut EventLog) -> bool {
        if self.health.is_dead() || !self.body.on_ground {
            return false;
        }
        self.body.velocity.y = -JUMP_IMPULSE;
        self.body.on_ground = false;
        self.set_animation(PlayerAnimation::Jump);
        events.effect(EffectKind::Jump, self.body.position);
        debug!("Player jumped");
        true
    }

    /// Light attack. Rejected silently while on cooldown.
    pub fn light_attack(&mut self, events: &mut EventLog) -> bool {
        if self.health.is_dead() || self.cooldowns.light_attack > 0.0 {
            return false;
        }
        self.cooldowns.light_attack = LIGHT_ATTACK_COOLDOWN;
        self.start_attack(AttackKind::Light);
        events.effect(EffectKind::Slash, self.leading_edge());
        debug!("Light attack performed");
        true
    }

    /// Heavy attack. Needs the cooldown elapsed and enough mana.
    pub fn heavy_attack(&mut self, events: &mut EventLog) -> bool {
        if self.health.is_dead()
            || self.cooldowns.heavy_attack > 0.0
            || self.mana < HEAVY_ATTACK_MANA
        {
            return false;
        }
        self.cooldowns.heavy_attack = HEAVY_ATTACK_COOLDOWN;
        self.mana -= HEAVY_ATTACK_MANA;
        self.start_attack(AttackKind::Heavy);
        events.effect(EffectKind::HeavySlash, self.leading_edge());
        debug!(mana = self.mana, "Heavy attack performed");
        true
    }

    fn start_attack(&mut self, kind: AttackKind) {
        self.swing_counter = self.swing_counter.wrapping_add(1);
        self.attack = Some(ActiveAttack {
            kind,
            remaining: kind.duration(),
            swing: self.swing_counter,
        });
        self.set_animation(match kind {
            AttackKind::Light => PlayerAnimation::Attack,
            AttackKind::Heavy => PlayerAnimation::HeavyAttack,
        });
    }

    /// Raise the shield. Negates all damage while up.
    pub fn shield(&mut self, events: &mut EventLog) -> bool {
        if self.health.is_dead() || self.cooldowns.shield > 0.0 {
            return false;
        }
        self.cooldowns.shield = SHIELD_COOLDOWN;
        self.shield_remaining = SHIELD_DURATION;
        self.set_animation(PlayerAnimation::Shield);
        events.effect(EffectKind::Shield, self.body.position);
        debug!("Shield activated");
        true
    }

    /// Dash: an instant teleport in the facing direction.
    ///
    /// No collision sweep; only the world bounds clamp it.
    pub fn dash(&mut self, events: &mut EventLog) -> bool {
        if self.health.is_dead() || self.cooldowns.dash > 0.0 || self.mana < DASH_MANA {
            return false;
        }
        self.cooldowns.dash = DASH_COOLDOWN;
        self.mana -= DASH_MANA;
        self.dash_remaining = DASH_DURATION;
        self.set_animation(PlayerAnimation::Roll);

        let offset = if self.body.facing_right { DASH_DISTANCE } else { -DASH_DISTANCE };
        self.body.position.x += offset;
        self.body.clamp_to_world();

        events.effect(EffectKind::Dash, self.body.position);
        debug!(x = self.body.position.x, "Dash performed");
        true
    }

    /// Restore health, clamped to max. Never revives.
    pub fn heal(&mut self, amount: u32) {
        self.health.heal(amount);
        debug!(amount, health = self.health.current(), "Player healed");
    }

    fn die(&mut self, events: &mut EventLog) {
        self.attack = None;
        self.shield_remaining = 0.0;
        self.dash_remaining = 0.0;
        self.set_animation(PlayerAnimation::Death);
        events.effect(EffectKind::Death, self.body.position);
        events.emit(GameEventData::PlayerDied);
        info!("Player died");
    }
}

impl Actor for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn health(&self) -> &Health {
        &self.health
    }

    /// Ignored while invulnerable or shielding. A landed hit starts the
    /// invulnerability window.
    fn take_damage(&mut self, amount: u32, events: &mut EventLog) {
        if self.health.is_dead() || self.is_invulnerable() || self.is_shielding() {
            return;
        }

        let killed = self.health.damage(amount);
        self.cooldowns.invulnerable = INVULNERABILITY_TIME;

        events.emit(GameEventData::PlayerDamaged {
            amount,
            health: self.health.current(),
        });
        events.effect(EffectKind::Damage, self.body.position);
        warn!(amount, health = self.health.current(), "Player took damage");

        if killed {
            self.die(events);
        }
    }
}
