//! World State
//!
//! Everything one run owns: the current level, the player, the enemy
//! registry, the boss, score and progression. The tick driver mutates it;
//! hosts read it through accessors and snapshots.

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use crate::config::{ConfigError, SimConfig};
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::SimRng;
use crate::core::vec2::Vec2;
use crate::game::actor::{Actor, ActorId, EnemyId};
use crate::game::boss::{Boss, BOSS_SPAWN};
use crate::game::enemy::{Enemy, EnemyKind};
use crate::game::events::{EventLog, GameEvent, GameEventData};
use crate::game::physics::Body;
use crate::game::player::Player;
use crate::game::snapshot::{tile_sprites, ActorSprite, BossHud, Hud, RenderSnapshot};
use crate::game::spawner::EnemySpawner;
use crate::game::tilemap::{Level, LevelError, TileKind, LEVEL_COUNT};

/// World construction errors.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// Bad configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Level could not be generated
    #[error(transparent)]
    Level(#[from] LevelError),
}

// =============================================================================
// LEVEL PHASE
// =============================================================================

/// Where the current level stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Regular enemies spawn until the quota is defeated
    Enemies {
        /// Enemies defeated so far on this level
        defeated: u32,
    },
    /// The boss is in play
    Boss,
    /// The boss has fallen
    Cleared,
}

impl LevelPhase {
    fn tag(self) -> u8 {
        match self {
            LevelPhase::Enemies { .. } => 0,
            LevelPhase::Boss => 1,
            LevelPhase::Cleared => 2,
        }
    }
}

// =============================================================================
// WORLD
// =============================================================================

/// Simulation state for one run.
#[derive(Debug)]
pub struct World {
    pub(crate) tick: u32,
    pub(crate) config: SimConfig,
    pub(crate) rng: SimRng,
    pub(crate) level: Level,
    pub(crate) phase: LevelPhase,
    pub(crate) player: Player,
    /// Keyed by monotonically allocated ids, so iteration is creation order
    pub(crate) enemies: BTreeMap<EnemyId, Enemy>,
    pub(crate) next_enemy_id: u32,
    pub(crate) boss: Option<Boss>,
    pub(crate) spawner: EnemySpawner,
    pub(crate) score: u32,
    pub(crate) coins: u32,
    pub(crate) game_over: bool,
    pub(crate) victory: bool,
    pub(crate) events: EventLog,
}

impl World {
    /// Validate the config and load the start level.
    pub fn new(config: SimConfig) -> Result<Self, WorldError> {
        config.validate()?;

        let mut rng = SimRng::from_optional_seed(config.seed);
        let level = Level::generate(config.start_level, &mut rng)?;

        let mut world = Self {
            tick: 0,
            config,
            rng,
            level,
            phase: LevelPhase::Enemies { defeated: 0 },
            player: Player::new(),
            enemies: BTreeMap::new(),
            next_enemy_id: 1,
            boss: None,
            spawner: EnemySpawner::new(),
            score: 0,
            coins: 0,
            game_over: false,
            victory: false,
            events: EventLog::new(),
        };
        world.announce_level();
        Ok(world)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Ticks simulated so far.
    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Active configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Current level.
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Current level (mutable, for scripted setups).
    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    /// Current level phase.
    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    /// The player.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The player (mutable, for scripted setups).
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Living enemies in creation order.
    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.values()
    }

    /// Number of living enemies.
    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// Look up an enemy.
    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(&id)
    }

    /// Look up an enemy (mutable, for scripted setups).
    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.get_mut(&id)
    }

    /// The boss, while one is in play.
    pub fn boss(&self) -> Option<&Boss> {
        self.boss.as_ref()
    }

    /// The boss (mutable, for scripted setups).
    pub fn boss_mut(&mut self) -> Option<&mut Boss> {
        self.boss.as_mut()
    }

    /// Score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Coins.
    pub fn coins(&self) -> u32 {
        self.coins
    }

    /// Run ended by death.
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Run ended by clearing the final level.
    pub fn is_victory(&self) -> bool {
        self.victory
    }

    /// Body behind an actor handle, if that actor still exists.
    pub fn actor_body(&self, id: ActorId) -> Option<&Body> {
        match id {
            ActorId::Player => Some(self.player.body()),
            ActorId::Enemy(enemy_id) => self.enemies.get(&enemy_id).map(Actor::body),
            ActorId::Boss => self.boss.as_ref().map(Actor::body),
        }
    }

    /// Events recorded since the last drain.
    pub fn pending_events(&self) -> &[GameEvent] {
        self.events.events()
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.events.take()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Add an enemy to the registry.
    pub fn spawn_enemy(&mut self, kind: EnemyKind, position: Vec2) -> EnemyId {
        let id = EnemyId(self.next_enemy_id);
        self.next_enemy_id += 1;

        self.enemies.insert(id, Enemy::new(id, kind, position));
        self.events.emit(GameEventData::EnemySpawned { id, kind });
        id
    }

    /// Put this level's boss into play.
    pub fn spawn_boss(&mut self) {
        let kind = self.level.theme().boss();
        self.boss = Some(Boss::new(kind, BOSS_SPAWN));
        self.phase = LevelPhase::Boss;
        self.events.emit(GameEventData::BossSpawned { kind });
        info!(boss = kind.name(), level = self.level.number(), "Boss spawned");
    }

    /// Add to the score.
    pub fn add_score(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        self.score = self.score.saturating_add(amount);
        self.events.emit(GameEventData::ScoreAdded {
            amount,
            total: self.score,
        });
    }

    /// Add to the coin purse.
    pub fn add_coins(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        self.coins = self.coins.saturating_add(amount);
        self.events.emit(GameEventData::CoinsAdded {
            amount,
            total: self.coins,
        });
    }

    /// Regenerate and enter level `number`.
    ///
    /// Enemies and boss are cleared and the player returns to spawn with
    /// health and mana intact.
    pub fn load_level(&mut self, number: u32) -> Result<(), LevelError> {
        self.level = Level::generate(number, &mut self.rng)?;
        self.phase = LevelPhase::Enemies { defeated: 0 };
        self.enemies.clear();
        self.boss = None;
        self.spawner.reset();
        self.player.respawn();
        self.announce_level();
        Ok(())
    }

    /// Start over from the configured start level.
    pub fn restart(&mut self) -> Result<(), LevelError> {
        self.player.reset();
        self.score = 0;
        self.coins = 0;
        self.game_over = false;
        self.victory = false;
        self.load_level(self.config.start_level)?;
        info!("World restarted");
        Ok(())
    }

    fn announce_level(&mut self) {
        self.events.emit(GameEventData::LevelLoaded {
            number: self.level.number(),
            name: self.level.theme().name().to_string(),
        });
    }

    /// Boss just fell: clear the level, then advance or win.
    pub(crate) fn clear_level(&mut self) {
        let number = self.level.number();
        self.phase = LevelPhase::Cleared;
        self.events.emit(GameEventData::LevelCleared { number });
        info!(level = number, score = self.score, "Level cleared");

        if number >= LEVEL_COUNT {
            self.victory = true;
            self.events.emit(GameEventData::Victory { score: self.score });
            info!(score = self.score, "Victory");
        } else if self.config.progression.auto_advance {
            if let Err(err) = self.load_level(number + 1) {
                warn!(%err, "Could not advance level");
            }
        }
    }

    // =========================================================================
    // Digest and snapshot
    // =========================================================================

    /// SHA-256 digest of the simulation state.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, |hasher| {
            let rng = self.rng.state();
            hasher.update_u64(rng[0]);
            hasher.update_u64(rng[1]);

            hasher.update_u32(self.level.number());
            for (_, _, tile) in self.level.iter() {
                let (kind, damage) = match tile.kind {
                    TileKind::Air => (0, 0),
                    TileKind::Floor => (1, 0),
                    TileKind::Wall => (2, 0),
                    TileKind::Hazard { damage } => (3, damage),
                    TileKind::Decoration => (4, 0),
                    TileKind::Collectible => (5, 0),
                };
                hasher.update_u8(kind);
                hasher.update_u32(damage);
                hasher.update_u8(tile.variant);
            }
            hasher.update_u8(self.phase.tag());
            if let LevelPhase::Enemies { defeated } = self.phase {
                hasher.update_u32(defeated);
            }

            self.player.body().hash_into(hasher);
            self.player.health().hash_into(hasher);
            hasher.update_f32(self.player.mana());
            let cooldowns = self.player.cooldowns();
            for timer in [
                cooldowns.light_attack,
                cooldowns.heavy_attack,
                cooldowns.shield,
                cooldowns.dash,
                cooldowns.invulnerable,
            ] {
                hasher.update_f32(timer);
            }

            // BTreeMap iterates in id order
            for (id, enemy) in &self.enemies {
                hasher.update_u32(id.0);
                hasher.update_u8(enemy.kind() as u8);
                enemy.body().hash_into(hasher);
                enemy.health().hash_into(hasher);
                hasher.update_f32(enemy.attack_cooldown());
            }

            hasher.update_bool(self.boss.is_some());
            if let Some(boss) = &self.boss {
                hasher.update_u8(boss.kind() as u8);
                hasher.update_u8(boss.phase());
                boss.body().hash_into(hasher);
                boss.health().hash_into(hasher);
            }

            hasher.update_u32(self.score);
            hasher.update_u32(self.coins);
            hasher.update_bool(self.game_over);
            hasher.update_bool(self.victory);
        })
    }

    /// Draw intent for the current frame.
    pub fn snapshot(&self) -> RenderSnapshot {
        let mut actors = Vec::with_capacity(self.enemies.len() + 2);
        actors.push(ActorSprite::from_player(&self.player));
        actors.extend(self.enemies.values().map(ActorSprite::from_enemy));
        if let Some(boss) = &self.boss {
            actors.push(ActorSprite::from_boss(boss));
        }

        let mut hud = Hud::for_player(&self.player);
        hud.score = self.score;
        hud.coins = self.coins;
        hud.level = self.level.number();
        hud.level_name = self.level.theme().name();
        hud.enemies_defeated = match self.phase {
            LevelPhase::Enemies { defeated } => defeated,
            _ => self.config.progression.enemies_per_level,
        };
        hud.boss = self.boss.as_ref().map(|boss| BossHud {
            name: boss.kind().name(),
            health_ratio: boss.health().ratio(),
            phase: boss.phase(),
        });
        hud.game_over = self.game_over;
        hud.victory = self.victory;

        RenderSnapshot {
            tick: self.tick,
            tiles: tile_sprites(&self.level),
            actors,
            hud,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::boss::BossKind;

    fn world() -> World {
        World::new(SimConfig::seeded(42)).unwrap()
    }

    #[test]
    fn test_new_world() {
        let mut world = world();
        assert_eq!(world.tick(), 0);
        assert_eq!(world.level().number(), 1);
        assert_eq!(world.phase(), LevelPhase::Enemies { defeated: 0 });
        assert_eq!(world.enemy_count(), 0);
        assert!(world.boss().is_none());

        let events = world.take_events();
        assert_eq!(
            events[0].data,
            GameEventData::LevelLoaded {
                number: 1,
                name: "House of Forks".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_start_level() {
        let config = SimConfig {
            start_level: 9,
            ..SimConfig::seeded(1)
        };
        assert!(matches!(World::new(config), Err(WorldError::Config(_))));
    }

    #[test]
    fn test_enemy_ids_follow_creation_order() {
        let mut world = world();
        let a = world.spawn_enemy(EnemyKind::NullShade, Vec2::new(300.0, 400.0));
        let b = world.spawn_enemy(EnemyKind::Forkling, Vec2::new(200.0, 400.0));
        assert!(a < b);

        let order: Vec<EnemyId> = world.enemies().map(Enemy::id).collect();
        assert_eq!(order, vec![a, b]);
        assert_eq!(world.actor_body(ActorId::Enemy(b)).unwrap().position.x, 200.0);
        assert!(world.actor_body(ActorId::Boss).is_none());
    }

    #[test]
    fn test_spawn_boss_matches_level() {
        let mut world = world();
        world.load_level(2).unwrap();
        world.spawn_boss();

        assert_eq!(world.phase(), LevelPhase::Boss);
        assert_eq!(world.boss().unwrap().kind(), BossKind::Aurios);
        assert_eq!(world.boss().unwrap().body().position, BOSS_SPAWN);
    }

    #[test]
    fn test_score_events() {
        let mut world = world();
        world.take_events();

        world.add_score(50);
        world.add_score(0);
        world.add_coins(10);
        assert_eq!(world.score(), 50);
        assert_eq!(world.coins(), 10);
        assert_eq!(world.take_events().len(), 2);
    }

    #[test]
    fn test_load_level_resets_actors() {
        let mut world = world();
        world.spawn_enemy(EnemyKind::Forkling, Vec2::new(300.0, 400.0));
        world.player_mut().body_mut().position.x = 900.0;

        world.load_level(3).unwrap();
        assert_eq!(world.level().number(), 3);
        assert_eq!(world.enemy_count(), 0);
        assert_eq!(world.player().body().position.x, 100.0);
        assert!(world.load_level(4).is_err());
    }

    #[test]
    fn test_restart() {
        let mut world = world();
        world.add_score(120);
        world.load_level(3).unwrap();
        world.player_mut().take_damage(500, &mut EventLog::new());
        world.game_over = true;

        world.restart().unwrap();
        assert_eq!(world.score(), 0);
        assert_eq!(world.level().number(), 1);
        assert!(!world.is_game_over());
        assert!(!world.player().is_dead());
    }

    #[test]
    fn test_hash_tracks_state() {
        let a = world();
        let b = world();
        assert_eq!(a.compute_hash(), b.compute_hash());

        let mut c = world();
        c.add_score(10);
        assert_ne!(a.compute_hash(), c.compute_hash());
    }

    #[test]
    fn test_snapshot_contents() {
        let mut world = world();
        world.spawn_enemy(EnemyKind::CoinGolem, Vec2::new(300.0, 400.0));
        world.add_score(30);

        let snapshot = world.snapshot();
        assert_eq!(snapshot.actors.len(), 2);
        assert_eq!(snapshot.actors[0].id, ActorId::Player);
        assert_eq!(snapshot.hud.score, 30);
        assert_eq!(snapshot.hud.level_name, "House of Forks");
        assert!(snapshot.hud.boss.is_none());
        assert!(!snapshot.tiles.is_empty());
    }
}
