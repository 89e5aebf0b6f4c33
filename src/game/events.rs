//! Game Events
//!
//! Side effects the simulation hands to its host: visual/audio cues, score
//! changes, spawns, deaths and level transitions. Nothing in the simulation
//! reads these back.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::actor::EnemyId;
use crate::game::boss::BossKind;
use crate::game::enemy::EnemyKind;

/// Visual or audio cue requested from the effects collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Light attack swing
    Slash,
    /// Heavy attack swing
    HeavySlash,
    /// Dash roll
    Dash,
    /// Jump take-off
    Jump,
    /// Shield raised
    Shield,
    /// Actor took damage
    Damage,
    /// Actor died
    Death,
    /// Melee hit landed
    Hit,
    /// Enemy melee swing
    EnemyAttack,
    /// Boss melee swing (fire / coins / glitch depending on boss)
    BossAttack,
    /// Boss entered its second phase
    BossPhase,
    /// Fire projectile (Lava Burst)
    FireProjectile,
    /// Coin projectile (Golden Barrage)
    CoinProjectile,
    /// Void rift
    VoidRift,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Play an effect at a world position
    Effect {
        kind: EffectKind,
        position: Vec2,
    },

    /// Cosmetic projectile launched by a boss special
    ProjectileFired {
        kind: EffectKind,
        position: Vec2,
        velocity: Vec2,
    },

    /// Score increased
    ScoreAdded {
        amount: u32,
        total: u32,
    },

    /// Coins increased
    CoinsAdded {
        amount: u32,
        total: u32,
    },

    /// A collectible tile was consumed
    TileCollected {
        col: usize,
        row: usize,
    },

    /// Player lost health
    PlayerDamaged {
        amount: u32,
        health: u32,
    },

    /// Player health reached zero
    PlayerDied,

    /// Run ended by player death
    GameOver {
        score: u32,
    },

    /// Enemy entered the world
    EnemySpawned {
        id: EnemyId,
        kind: EnemyKind,
    },

    /// Enemy died and was removed
    EnemyDefeated {
        id: EnemyId,
        kind: EnemyKind,
    },

    /// Level boss entered the world
    BossSpawned {
        kind: BossKind,
    },

    /// Boss switched phase
    BossPhaseChanged {
        kind: BossKind,
        phase: u8,
    },

    /// Boss died
    BossDefeated {
        kind: BossKind,
    },

    /// A level was generated and loaded
    LevelLoaded {
        number: u32,
        name: String,
    },

    /// The level's boss was defeated
    LevelCleared {
        number: u32,
    },

    /// Final level cleared
    Victory {
        score: u32,
    },
}

/// A game event stamped with the tick that produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        Self { tick, data }
    }

    /// Route this event to the matching sink callback.
    ///
    /// Events with no sink counterpart are ignored.
    pub fn dispatch<S: EventSink + ?Sized>(&self, sink: &mut S) {
        match &self.data {
            GameEventData::Effect { kind, position }
            | GameEventData::ProjectileFired { kind, position, .. } => {
                sink.play_effect(*kind, position.x, position.y);
            }
            GameEventData::ScoreAdded { amount, .. } => sink.add_score(*amount),
            GameEventData::GameOver { score } => sink.game_over(*score),
            _ => {}
        }
    }
}

/// Effects collaborator.
///
/// Every method defaults to a no-op, so hosts implement only what they use.
pub trait EventSink {
    /// Play a visual/audio cue at a world position.
    fn play_effect(&mut self, _kind: EffectKind, _x: f32, _y: f32) {}

    /// Add to the displayed score.
    fn add_score(&mut self, _amount: u32) {}

    /// The run is over.
    fn game_over(&mut self, _score: u32) {}
}

/// Per-tick event buffer owned by the world.
///
/// Simulation code pushes into the log; the tick driver drains it into the
/// tick result.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    tick: u32,
    events: Vec<GameEvent>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp subsequent events with `tick`.
    pub fn set_tick(&mut self, tick: u32) {
        self.tick = tick;
    }

    /// Record an event.
    pub fn emit(&mut self, data: GameEventData) {
        self.events.push(GameEvent::new(self.tick, data));
    }

    /// Record an effect cue.
    pub fn effect(&mut self, kind: EffectKind, position: Vec2) {
        self.emit(GameEventData::Effect { kind, position });
    }

    /// Events recorded since the last drain.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when no events are pending.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take pending events (consumes them).
    pub fn take(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
