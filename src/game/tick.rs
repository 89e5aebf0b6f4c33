//! Simulation Tick
//!
//! The per-frame game loop. One call advances the world by a caller-supplied
//! delta in a fixed order: player, enemies (creation order), boss, tile
//! collision, combat, culling, progression.

use tracing::{debug, info};
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::game::actor::{Actor, EnemyId};
use crate::game::collision::{resolve_level_collision, TileInteractions};
use crate::game::combat::{resolve_combat, Combatant};
use crate::game::events::{GameEvent, GameEventData};
use crate::game::input::InputFrame;
use crate::game::physics::sanitize_delta;
use crate::game::world::{LevelPhase, World};

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Run ended by player death (this tick or earlier)
    pub game_over: bool,
    /// Run ended by clearing the final level (this tick or earlier)
    pub victory: bool,
    /// Level whose boss fell this tick
    pub level_cleared: Option<u32>,
}

/// Run one simulation tick.
///
/// `dt` is the caller's frame interval in seconds. Non-finite or negative
/// values count as zero. Large ones are only capped when
/// [`SimConfig::max_tick_delta`](crate::config::SimConfig::max_tick_delta) is set.
///
/// Once the run has ended, ticks do nothing but report the outcome.
pub fn tick(world: &mut World, input: &InputFrame, dt: f32) -> TickResult {
    let mut result = TickResult::default();

    if world.game_over || world.victory {
        result.game_over = world.game_over;
        result.victory = world.victory;
        return result;
    }

    // 0. Advance tick counter
    world.tick += 1;
    world.events.set_tick(world.tick);
    let dt = sanitize_delta(dt, world.config.max_tick_delta);

    #[cfg(feature = "debug-tracing")]
    trace!(tick = world.tick, dt, flags = input.flags, "Tick start");

    // 1. Player input and physics
    world.player.update(dt, input, &mut world.events);

    // 2. Enemy AI and physics, in creation order
    update_enemies(world, dt);

    // 3. Boss AI and physics
    update_boss(world, dt);

    // 4. Tile collision, hazards and collectibles
    resolve_tiles(world);

    // 5. Melee between player and opponents
    process_combat(world);

    // 6. Remove the dead
    cull_enemies(world);
    check_boss_defeat(world, &mut result);

    // 7. Boss arrival and enemy spawning
    update_progression(world, dt);

    // 8. Player death ends the run
    check_game_over(world);

    result.game_over = world.game_over;
    result.victory = world.victory;
    result.events = world.take_events();

    #[cfg(feature = "debug-tracing")]
    trace!(tick = world.tick, events = result.events.len(), "Tick end");

    result
}

/// Update every enemy against the body its target handle resolves to.
fn update_enemies(world: &mut World, dt: f32) {
    let ids: Vec<EnemyId> = world.enemies.keys().copied().collect();

    for id in ids {
        let target = world
            .enemies
            .get(&id)
            .and_then(|enemy| world.actor_body(enemy.target()).copied());

        if let Some(enemy) = world.enemies.get_mut(&id) {
            enemy.update(dt, target.as_ref(), &mut world.events);
        }
    }
}

fn update_boss(world: &mut World, dt: f32) {
    let Some(target_id) = world.boss.as_ref().map(|boss| boss.target()) else {
        return;
    };
    let target = world.actor_body(target_id).copied();

    if let Some(boss) = world.boss.as_mut() {
        boss.update(dt, target.as_ref(), &mut world.events);
    }
}

fn resolve_tiles(world: &mut World) {
    let report = resolve_level_collision(
        &mut world.player,
        &mut world.level,
        TileInteractions::Full,
        &mut world.events,
    );

    if world.config.enemy_tile_collision {
        for enemy in world.enemies.values_mut() {
            resolve_level_collision(enemy, &mut world.level, TileInteractions::SolidOnly, &mut world.events);
        }
        if let Some(boss) = world.boss.as_mut() {
            resolve_level_collision(boss, &mut world.level, TileInteractions::SolidOnly, &mut world.events);
        }
    }

    world.add_score(report.score_gained());
    world.add_coins(report.coins_gained());
}

fn process_combat(world: &mut World) {
    let mut opponents: Vec<&mut dyn Combatant> = world
        .enemies
        .values_mut()
        .map(|enemy| enemy as &mut dyn Combatant)
        .collect();
    if let Some(boss) = world.boss.as_mut() {
        opponents.push(boss);
    }

    let outcome = resolve_combat(&mut world.player, &mut opponents, &mut world.events);
    world.add_score(outcome.score_gained());
}

/// Drop dead enemies in creation order, counting them toward the quota.
fn cull_enemies(world: &mut World) {
    let dead: Vec<EnemyId> = world
        .enemies
        .iter()
        .filter(|(_, enemy)| enemy.is_dead())
        .map(|(id, _)| *id)
        .collect();

    for id in dead {
        let Some(enemy) = world.enemies.remove(&id) else {
            continue;
        };
        world.events.emit(GameEventData::EnemyDefeated { id, kind: enemy.kind() });
        if let LevelPhase::Enemies { defeated } = &mut world.phase {
            *defeated += 1;
        }
        debug!(%id, kind = enemy.kind().name(), "Enemy defeated");
    }
}

fn check_boss_defeat(world: &mut World, result: &mut TickResult) {
    let Some(kind) = world.boss.as_ref().filter(|boss| boss.is_dead()).map(|boss| boss.kind()) else {
        return;
    };

    world.boss = None;
    world.events.emit(GameEventData::BossDefeated { kind });
    info!(boss = kind.name(), "Boss defeated");

    result.level_cleared = Some(world.level.number());
    world.clear_level();
}

fn update_progression(world: &mut World, dt: f32) {
    let LevelPhase::Enemies { defeated } = world.phase else {
        return;
    };
    let quota = world.config.progression.enemies_per_level;

    if defeated >= quota && world.enemies.is_empty() {
        world.spawn_boss();
        return;
    }

    let request = world.spawner.update(
        dt,
        defeated < quota,
        world.enemies.len(),
        world.player.body().position,
        &world.level,
        &world.config.spawner,
        &mut world.rng,
    );
    if let Some(request) = request {
        world.spawn_enemy(request.kind, request.position);
    }
}

fn check_game_over(world: &mut World) {
    if world.game_over || !world.player.is_dead() {
        return;
    }

    world.game_over = true;
    world.events.emit(GameEventData::GameOver { score: world.score });
    info!(score = world.score, tick = world.tick, "Game over");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProgressionConfig, SimConfig};
    use crate::core::vec2::Vec2;
    use crate::game::enemy::EnemyKind;
    use crate::game::events::EventLog;
    use crate::game::input::InputAction;
    use crate::game::tilemap::{Level, LevelTheme, Tile, TileKind, LEVEL_HEIGHT, LEVEL_WIDTH};

    const DT: f32 = 1.0 / 60.0;

    fn empty_grid() -> Vec<Vec<Tile>> {
        vec![vec![Tile::AIR; LEVEL_WIDTH]; LEVEL_HEIGHT]
    }

    fn world_with(config: SimConfig) -> World {
        let mut world = World::new(config).unwrap();
        *world.level_mut() = Level::from_tiles(LevelTheme::Forks, empty_grid());
        world.take_events();
        world
    }

    /// Seeded world on an empty grid, so only the fallback plane holds actors up.
    fn flat_world() -> World {
        world_with(SimConfig::seeded(7))
    }

    fn idle() -> InputFrame {
        InputFrame::new()
    }

    fn has_event(events: &[GameEvent], wanted: impl Fn(&GameEventData) -> bool) -> bool {
        events.iter().any(|event| wanted(&event.data))
    }

    #[test]
    fn test_tick_determinism() {
        let mut world1 = World::new(SimConfig::seeded(12345)).unwrap();
        let mut world2 = World::new(SimConfig::seeded(12345)).unwrap();
        let script = [
            InputFrame::with(&[InputAction::Right]),
            InputFrame::with(&[InputAction::Right, InputAction::Jump]),
            InputFrame::with(&[InputAction::LightAttack]),
            InputFrame::new(),
        ];

        for t in 0..600 {
            let input = script[(t / 40) % script.len()];
            tick(&mut world1, &input, DT);
            tick(&mut world2, &input, DT);
        }

        assert_eq!(world1.tick(), world2.tick());
        assert_eq!(world1.compute_hash(), world2.compute_hash());
        assert_eq!(world1.enemy_count(), world2.enemy_count());
    }

    #[test]
    fn test_tick_counter_stamps_events() {
        let mut world = flat_world();
        tick(&mut world, &idle(), DT);
        let result = tick(&mut world, &InputFrame::with(&[InputAction::LightAttack]), DT);

        assert_eq!(world.tick(), 2);
        assert!(!result.events.is_empty());
        assert!(result.events.iter().all(|event| event.tick == 2));
    }

    #[test]
    fn test_player_moves_right() {
        let mut world = flat_world();
        let start = world.player().body().position.x;

        tick(&mut world, &InputFrame::with(&[InputAction::Right]), DT);
        assert!(world.player().body().position.x > start);
    }

    #[test]
    fn test_enemy_chases_player_by_handle() {
        let mut world = flat_world();
        let id = world.spawn_enemy(EnemyKind::Forkling, Vec2::new(180.0, 400.0));
        world.take_events();

        tick(&mut world, &idle(), DT);
        let enemy = world.enemy(id).unwrap();
        assert!(enemy.body().velocity.x < 0.0);
        assert!(!enemy.body().facing_right);
    }

    #[test]
    fn test_collectible_awards_score_and_coins() {
        let mut world = flat_world();
        let mut tiles = empty_grid();
        tiles[12][3] = Tile::new(TileKind::Collectible, 0);
        *world.level_mut() = Level::from_tiles(LevelTheme::Greed, tiles);

        let result = tick(&mut world, &idle(), DT);
        assert_eq!(world.score(), 50);
        assert_eq!(world.coins(), 10);
        assert!(has_event(&result.events, |data| matches!(
            data,
            GameEventData::TileCollected { col: 3, row: 12 }
        )));

        tick(&mut world, &idle(), DT);
        assert_eq!(world.score(), 50);
    }

    #[test]
    fn test_hazard_ticks_through_world() {
        let mut world = flat_world();
        let mut tiles = empty_grid();
        tiles[12][3] = Tile::new(TileKind::Hazard { damage: 20 }, 0);
        *world.level_mut() = Level::from_tiles(LevelTheme::Forks, tiles);

        tick(&mut world, &idle(), DT);
        assert_eq!(world.player().health().current(), 80);

        // Invulnerability absorbs the next hits
        tick(&mut world, &idle(), DT);
        assert_eq!(world.player().health().current(), 80);
    }

    #[test]
    fn test_strike_scores_once_per_swing() {
        let mut world = flat_world();
        let id = world.spawn_enemy(EnemyKind::Forkling, Vec2::new(140.0, 400.0));
        let attack = InputFrame::with(&[InputAction::LightAttack]);

        tick(&mut world, &attack, DT);
        assert_eq!(world.enemy(id).unwrap().health().current(), 15);
        assert_eq!(world.score(), 10);

        // Same swing, still overlapping
        tick(&mut world, &idle(), DT);
        assert_eq!(world.enemy(id).unwrap().health().current(), 15);
        assert_eq!(world.score(), 10);
    }

    #[test]
    fn test_dead_enemies_are_culled() {
        let mut world = flat_world();
        let first = world.spawn_enemy(EnemyKind::Forkling, Vec2::new(900.0, 400.0));
        let second = world.spawn_enemy(EnemyKind::NullShade, Vec2::new(1200.0, 400.0));
        world.enemy_mut(first).unwrap().take_damage(100, &mut EventLog::new());

        let result = tick(&mut world, &idle(), DT);
        assert!(world.enemy(first).is_none());
        assert!(world.enemy(second).is_some());
        assert_eq!(world.phase(), LevelPhase::Enemies { defeated: 1 });
        assert!(has_event(&result.events, |data| matches!(
            data,
            GameEventData::EnemyDefeated { id, .. } if *id == first
        )));
    }

    #[test]
    fn test_boss_spawns_after_quota() {
        let config = SimConfig {
            progression: ProgressionConfig { enemies_per_level: 1, auto_advance: true },
            ..SimConfig::seeded(3)
        };
        let mut world = world_with(config);
        let id = world.spawn_enemy(EnemyKind::Forkling, Vec2::new(900.0, 400.0));
        world.enemy_mut(id).unwrap().take_damage(100, &mut EventLog::new());

        tick(&mut world, &idle(), DT);
        assert_eq!(world.phase(), LevelPhase::Boss);
        assert!(world.boss().is_some());
    }

    #[test]
    fn test_boss_defeat_advances_level() {
        let mut world = flat_world();
        world.spawn_boss();
        world.boss_mut().unwrap().take_damage(1000, &mut EventLog::new());

        let result = tick(&mut world, &idle(), DT);
        assert_eq!(result.level_cleared, Some(1));
        assert_eq!(world.level().number(), 2);
        assert_eq!(world.phase(), LevelPhase::Enemies { defeated: 0 });
        assert!(world.boss().is_none());
        assert!(has_event(&result.events, |data| matches!(data, GameEventData::LevelLoaded { number: 2, .. })));
    }

    #[test]
    fn test_final_boss_wins_the_run() {
        let mut world = flat_world();
        world.load_level(3).unwrap();
        world.spawn_boss();
        world.boss_mut().unwrap().take_damage(1000, &mut EventLog::new());

        let result = tick(&mut world, &idle(), DT);
        assert!(result.victory);
        assert!(world.is_victory());
        assert!(has_event(&result.events, |data| matches!(data, GameEventData::Victory { .. })));

        let after = tick(&mut world, &idle(), DT);
        assert!(after.victory);
        assert!(after.events.is_empty());
    }

    #[test]
    fn test_game_over_once() {
        let mut world = flat_world();
        world.add_score(40);
        world.player_mut().take_damage(1000, &mut EventLog::new());

        let result = tick(&mut world, &idle(), DT);
        assert!(result.game_over);
        let game_overs = result
            .events
            .iter()
            .filter(|event| matches!(event.data, GameEventData::GameOver { score: 40 }))
            .count();
        assert_eq!(game_overs, 1);

        let frozen_at = world.tick();
        let after = tick(&mut world, &InputFrame::with(&[InputAction::Right]), DT);
        assert!(after.game_over);
        assert!(after.events.is_empty());
        assert_eq!(world.tick(), frozen_at);
    }

    #[test]
    fn test_pathological_deltas() {
        let mut world = flat_world();
        world.spawn_enemy(EnemyKind::CoinGolem, Vec2::new(600.0, 400.0));

        for dt in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -1.0, 1.0e9, 0.0] {
            tick(&mut world, &InputFrame::with(&[InputAction::Right]), dt);
        }

        let body = world.player().body();
        assert!(body.position.is_finite());
        assert!(body.velocity.is_finite());
        assert!(world.player().health().current() <= world.player().health().max());
    }

    #[test]
    fn test_long_frame_decays_full_interval() {
        let mut world = flat_world();
        tick(&mut world, &InputFrame::with(&[InputAction::Shield]), DT);
        assert!(world.player().cooldowns().shield > 1.0);

        tick(&mut world, &idle(), 2.0);
        assert_eq!(world.player().cooldowns().shield, 0.0);
        assert!(!world.player().is_shielding());

        let mut capped = world_with(SimConfig {
            max_tick_delta: Some(1.0),
            ..SimConfig::seeded(7)
        });
        tick(&mut capped, &InputFrame::with(&[InputAction::Shield]), DT);
        tick(&mut capped, &idle(), 2.0);
        assert!(capped.player().cooldowns().shield > 0.0);
    }

    #[test]
    fn test_spawner_runs_during_enemy_phase() {
        let mut world = flat_world();
        let mut spawned = 0;

        // 3.5 s of idle play
        for _ in 0..210 {
            let result = tick(&mut world, &idle(), DT);
            spawned += result
                .events
                .iter()
                .filter(|event| matches!(event.data, GameEventData::EnemySpawned { .. }))
                .count();
        }

        assert_eq!(spawned, 1);
        assert_eq!(world.enemy_count(), 1);
    }

    #[test]
    fn test_spawns_near_right_wall_stay_reachable() {
        let mut tiles = empty_grid();
        for line in tiles.iter_mut() {
            line[0] = Tile::new(TileKind::Wall, 0);
            line[LEVEL_WIDTH - 1] = Tile::new(TileKind::Wall, 0);
        }

        for seed in 0..20 {
            let mut world = world_with(SimConfig::seeded(seed));
            *world.level_mut() = Level::from_tiles(LevelTheme::Forks, tiles.clone());
            world.player_mut().body_mut().position.x = 1536.0;

            // One spawn interval plus a little
            for _ in 0..190 {
                tick(&mut world, &idle(), DT);
            }
            for enemy in world.enemies() {
                let x = enemy.body().position.x;
                assert!((32.0..=1536.0).contains(&x), "seed={seed} x={x}");
            }
        }
    }

    #[test]
    fn test_enemy_tile_collision_flag() {
        let mut tiles = empty_grid();
        for tile in tiles[9].iter_mut() {
            *tile = Tile::new(TileKind::Floor, 0);
        }

        let mut with_tiles = flat_world();
        *with_tiles.level_mut() = Level::from_tiles(LevelTheme::Forks, tiles.clone());
        let a = with_tiles.spawn_enemy(EnemyKind::CoinGolem, Vec2::new(1500.0, 270.0));
        tick(&mut with_tiles, &idle(), DT);
        let enemy = with_tiles.enemy(a).unwrap();
        assert_eq!(enemy.body().position.y, 256.0);
        assert!(enemy.body().on_ground);

        let config = SimConfig { enemy_tile_collision: false, ..SimConfig::seeded(7) };
        let mut without = world_with(config);
        *without.level_mut() = Level::from_tiles(LevelTheme::Forks, tiles);
        let b = without.spawn_enemy(EnemyKind::CoinGolem, Vec2::new(1500.0, 270.0));
        tick(&mut without, &idle(), DT);
        assert!(without.enemy(b).unwrap().body().position.y > 270.0);
    }
}
