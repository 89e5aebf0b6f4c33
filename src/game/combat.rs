//! Melee Combat
//!
//! Actor-vs-actor damage once movement and tile collision have settled:
//! enemy swings against the player, then the player's swing against every
//! enemy and the boss.

use tracing::debug;

use crate::core::vec2::Vec2;
use crate::game::actor::Actor;
use crate::game::events::{EffectKind, EventLog};
use crate::game::player::{Hitbox, Player};

/// Score for a swing that lands on at least one target.
pub const STRIKE_SCORE: u32 = 10;

/// Remembers the last player swing that hit an actor, so a swing that stays
/// overlapping across ticks only counts once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwingGuard {
    last_swing: Option<u32>,
}

impl SwingGuard {
    /// Register a hit from `swing`. False if that swing already hit.
    pub fn try_hit(&mut self, swing: u32) -> bool {
        if self.last_swing == Some(swing) {
            return false;
        }
        self.last_swing = Some(swing);
        true
    }
}

/// An actor that fights the player.
pub trait Combatant: Actor {
    /// Damage dealt to an overlapping player, if a swing is active.
    fn contact_damage(&self) -> Option<u32>;

    /// Per-swing hit tracking.
    fn swing_guard(&mut self) -> &mut SwingGuard;
}

/// Combat results for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CombatOutcome {
    /// Opponents whose active swing overlapped the player
    pub contacts: u32,
    /// Opponents struck by the player's swing
    pub strikes: u32,
}

impl CombatOutcome {
    /// Score earned this tick.
    pub fn score_gained(&self) -> u32 {
        if self.strikes > 0 {
            STRIKE_SCORE
        } else {
            0
        }
    }
}

/// Top-centre of a box, where hit sparks appear.
fn hit_point<A: Actor + ?Sized>(actor: &A) -> Vec2 {
    let bounds = actor.bounds();
    Vec2::new(bounds.center().x, bounds.y)
}

/// Opponent swing against the player.
///
/// The hit spark plays even when shield or invulnerability absorb it.
pub fn resolve_contact<C: Combatant + ?Sized>(
    player: &mut Player,
    opponent: &C,
    events: &mut EventLog,
) -> bool {
    if player.is_dead() || opponent.is_dead() {
        return false;
    }
    let Some(damage) = opponent.contact_damage() else {
        return false;
    };
    if !player.bounds().overlaps(&opponent.bounds()) {
        return false;
    }

    player.take_damage(damage, events);
    events.effect(EffectKind::Hit, hit_point(player));
    true
}

/// Player swing against one opponent.
pub fn resolve_strike<C: Combatant + ?Sized>(
    hitbox: &Hitbox,
    opponent: &mut C,
    events: &mut EventLog,
) -> bool {
    if opponent.is_dead() || !hitbox.rect.overlaps(&opponent.bounds()) {
        return false;
    }
    if !opponent.swing_guard().try_hit(hitbox.swing) {
        return false;
    }

    opponent.take_damage(hitbox.damage, events);
    events.effect(EffectKind::Hit, hit_point(opponent));
    true
}

/// Resolve every contact, then every strike.
pub fn resolve_combat(
    player: &mut Player,
    opponents: &mut [&mut dyn Combatant],
    events: &mut EventLog,
) -> CombatOutcome {
    let mut outcome = CombatOutcome::default();

    for opponent in opponents.iter() {
        if resolve_contact(player, &**opponent, events) {
            outcome.contacts += 1;
        }
    }

    if let Some(hitbox) = player.hitbox() {
        if !player.is_dead() {
            for opponent in opponents.iter_mut() {
                if resolve_strike(&hitbox, &mut **opponent, events) {
                    outcome.strikes += 1;
                }
            }
        }
    }

    if outcome.contacts > 0 || outcome.strikes > 0 {
        debug!(contacts = outcome.contacts, strikes = outcome.strikes, "Combat resolved");
    }
    outcome
}
