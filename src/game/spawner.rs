//! Enemy Spawner
//!
//! Drops a random enemy near the player on a fixed interval while the level
//! is in its enemy phase.

use std::f32::consts::TAU;

use serde::{Serialize, Deserialize};

use crate::config::SpawnConfig;
use crate::core::rng::SimRng;
use crate::core::vec2::Vec2;
use crate::game::enemy::{EnemyKind, ENEMY_SIZE};
use crate::game::tilemap::Level;

/// A spawn decided this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    /// Enemy type
    pub kind: EnemyKind,
    /// Top-left position
    pub position: Vec2,
}

/// Interval timer for enemy spawns.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawner {
    timer: f32,
}

impl EnemySpawner {
    /// Create a spawner with an empty timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds accumulated toward the next spawn.
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Clear the timer (level change, restart).
    pub fn reset(&mut self) {
        self.timer = 0.0;
    }

    /// Advance the timer and decide whether to spawn.
    ///
    /// The timer only runs while `active`. Once it reaches the interval it
    /// holds there until a spawn fits under `max_enemies`, then restarts.
    /// Spawns land between the level's border walls.
    pub fn update(
        &mut self,
        dt: f32,
        active: bool,
        alive: usize,
        player_position: Vec2,
        level: &Level,
        config: &SpawnConfig,
        rng: &mut SimRng,
    ) -> Option<SpawnRequest> {
        if !active {
            return None;
        }

        self.timer += dt;
        if self.timer < config.interval || alive >= config.max_enemies {
            return None;
        }
        self.timer = 0.0;

        let kind = *rng.choose(&EnemyKind::ALL)?;
        let angle = rng.next_f32() * TAU;
        let mut position = player_position + Vec2::from_angle(angle).scale(config.spawn_distance);
        let (min_x, max_x) = level.interior_x(ENEMY_SIZE);
        position.x = position.x.clamp(min_x, max_x);

        Some(SpawnRequest { kind, position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::game::tilemap::{LevelTheme, Tile, LEVEL_HEIGHT, LEVEL_WIDTH};

    fn config() -> SpawnConfig {
        SpawnConfig::default()
    }

    fn level() -> Level {
        Level::from_tiles(LevelTheme::Forks, vec![vec![Tile::AIR; LEVEL_WIDTH]; LEVEL_HEIGHT])
    }

    #[test]
    fn test_spawns_on_interval() {
        let mut spawner = EnemySpawner::new();
        let mut rng = SimRng::new(1);
        let player = Vec2::new(500.0, 400.0);

        for _ in 0..5 {
            assert!(spawner.update(0.5, true, 0, player, &level(), &config(), &mut rng).is_none());
        }
        let request = spawner.update(0.5, true, 0, player, &level(), &config(), &mut rng).unwrap();
        assert!((request.position.distance(player) - 200.0).abs() < 1e-2);
        assert_eq!(spawner.timer(), 0.0);
    }

    #[test]
    fn test_respects_max_enemies() {
        let mut spawner = EnemySpawner::new();
        let mut rng = SimRng::new(2);
        let player = Vec2::new(500.0, 400.0);

        assert!(spawner.update(3.0, true, 5, player, &level(), &config(), &mut rng).is_none());
        // Timer stays primed; the next free slot spawns immediately
        assert!(spawner.update(0.0, true, 4, player, &level(), &config(), &mut rng).is_some());
    }

    #[test]
    fn test_inactive_does_not_accumulate() {
        let mut spawner = EnemySpawner::new();
        let mut rng = SimRng::new(3);

        assert!(spawner.update(10.0, false, 0, Vec2::ZERO, &level(), &config(), &mut rng).is_none());
        assert_eq!(spawner.timer(), 0.0);
    }

    #[test]
    fn test_spawn_position_between_walls() {
        let mut spawner = EnemySpawner::new();
        let mut rng = SimRng::new(4);
        let level = level();

        // Player hugging the left wall, then the right wall
        for player_x in [32.0, 1536.0] {
            for _ in 0..500 {
                let request = spawner
                    .update(3.0, true, 0, Vec2::new(player_x, 400.0), &level, &config(), &mut rng)
                    .unwrap();
                assert!(request.position.x >= 32.0, "x={}", request.position.x);
                assert!(request.position.x + ENEMY_SIZE <= 1568.0, "x={}", request.position.x);
            }
        }
    }
}
