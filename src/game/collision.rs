//! Level Collision
//!
//! Resolves an actor's bounding box against the level's tile grid once per
//! tick: ground snapping, wall push-out, hazard damage and collectible
//! pickup.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::rect::Rect;
use crate::game::actor::Actor;
use crate::game::events::{EventLog, GameEventData};
use crate::game::tilemap::Level;

/// Score awarded per collectible tile.
pub const COLLECTIBLE_SCORE: u32 = 50;

/// Coins awarded per collectible tile.
pub const COLLECTIBLE_COINS: u32 = 10;

/// Inclusive tile-index range covered by a bounding box.
///
/// Every edge is `floor(edge / tile_size)`, so a box whose right edge sits
/// exactly on a tile boundary also covers the column it touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSpan {
    /// Leftmost column
    pub left: i32,
    /// Rightmost column
    pub right: i32,
    /// Top row
    pub top: i32,
    /// Bottom row
    pub bottom: i32,
}

impl TileSpan {
    /// Span of `bounds` on a grid of `tile_size` cells.
    pub fn of(bounds: &Rect, tile_size: f32) -> Self {
        Self {
            left: (bounds.x / tile_size).floor() as i32,
            right: (bounds.right() / tile_size).floor() as i32,
            top: (bounds.y / tile_size).floor() as i32,
            bottom: (bounds.bottom() / tile_size).floor() as i32,
        }
    }

    /// Every `(col, row)` in the span, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let (left, right) = (self.left, self.right);
        (self.top..=self.bottom).flat_map(move |row| (left..=right).map(move |col| (col, row)))
    }
}

/// Which tile effects apply to an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileInteractions {
    /// Ground and walls only
    SolidOnly,
    /// Ground, walls, hazards and collectibles
    Full,
}

/// What a resolution pass did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionReport {
    /// Snapped onto a solid tile
    pub landed: bool,
    /// Pushed out of a solid column on the left
    pub blocked_left: bool,
    /// Pushed out of a solid column on the right
    pub blocked_right: bool,
    /// Hazard damage offered to the actor (before shield/invulnerability)
    pub hazard_damage: u32,
    /// Collectible cells consumed, as `(col, row)`
    pub collected: Vec<(usize, usize)>,
}

impl CollisionReport {
    /// Score earned from collectibles in this pass.
    pub fn score_gained(&self) -> u32 {
        self.collected.len() as u32 * COLLECTIBLE_SCORE
    }

    /// Coins earned from collectibles in this pass.
    pub fn coins_gained(&self) -> u32 {
        self.collected.len() as u32 * COLLECTIBLE_COINS
    }
}

/// Resolve one actor against the level.
///
/// Steps, in order:
/// 1. Ground: if any tile in the row under the box's bottom edge is solid,
///    snap onto it. Otherwise the actor is grounded only if it rests on the
///    fallback plane.
/// 2. Walls: left column, then right column, over the box's rows (minus the
///    row just landed on). Both may fire; the right push-out wins.
/// 3. Hazards: every covered tile with damage hits the actor again.
/// 4. Collectibles: every covered collectible turns to air and is reported.
///
/// Steps 3 and 4 only run with [`TileInteractions::Full`].
pub fn resolve_level_collision<A: Actor + ?Sized>(
    actor: &mut A,
    level: &mut Level,
    interactions: TileInteractions,
    events: &mut EventLog,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    if actor.is_dead() {
        return report;
    }

    let tile_size = level.tile_size();
    let bounds = actor.bounds();
    let span = TileSpan::of(&bounds, tile_size);

    // 1. Ground
    let ground_row = span.bottom;
    let landed = (span.left..=span.right).any(|col| level.is_solid(col, ground_row));
    {
        let body = actor.body_mut();
        if landed {
            body.position.y = ground_row as f32 * tile_size - bounds.height;
            body.velocity.y = 0.0;
            body.on_ground = true;
        } else {
            body.on_ground = body.on_fallback_ground();
        }
    }
    report.landed = landed;

    // 2. Walls
    let wall_rows_end = if landed { span.bottom - 1 } else { span.bottom };
    let column_blocked =
        |col: i32| (span.top..=wall_rows_end).any(|row| level.is_solid(col, row));

    if column_blocked(span.left) {
        let body = actor.body_mut();
        body.position.x = (span.left + 1) as f32 * tile_size;
        body.velocity.x = 0.0;
        report.blocked_left = true;
    }
    if column_blocked(span.right) {
        let body = actor.body_mut();
        body.position.x = span.right as f32 * tile_size - bounds.width;
        body.velocity.x = 0.0;
        report.blocked_right = true;
    }

    if interactions == TileInteractions::SolidOnly {
        return report;
    }

    // 3. Hazards
    for (col, row) in span.cells() {
        let damage = level.tile_at(col, row).damage();
        if damage > 0 {
            report.hazard_damage += damage;
            actor.take_damage(damage, events);
        }
    }

    // 4. Collectibles
    for (col, row) in span.cells() {
        if level.collect(col, row) {
            debug!(col, row, "Collected item");
            events.emit(GameEventData::TileCollected {
                col: col as usize,
                row: row as usize,
            });
            report.collected.push((col as usize, row as usize));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Vec2;
    use crate::game::enemy::{Enemy, EnemyKind};
    use crate::game::actor::EnemyId;
    use crate::game::player::Player;
    use crate::game::tilemap::{LevelTheme, Tile, TileKind};

    const FLOOR: Tile = Tile::new(TileKind::Floor, 0);
    const LAVA: Tile = Tile::new(TileKind::Hazard { damage: 20 }, 0);
    const COIN: Tile = Tile::new(TileKind::Collectible, 0);

    fn empty_grid(cols: usize, rows: usize) -> Vec<Vec<Tile>> {
        vec![vec![Tile::AIR; cols]; rows]
    }

    fn enemy_at(x: f32, y: f32) -> Enemy {
        Enemy::new(EnemyId(1), EnemyKind::Forkling, Vec2::new(x, y))
    }

    #[test]
    fn test_tile_span_floors_all_edges() {
        let span = TileSpan::of(&Rect::new(40.0, 10.0, 32.0, 32.0), 32.0);
        assert_eq!(span, TileSpan { left: 1, right: 2, top: 0, bottom: 1 });

        let negative = TileSpan::of(&Rect::new(-8.0, -8.0, 32.0, 32.0), 32.0);
        assert_eq!(negative.left, -1);
        assert_eq!(negative.top, -1);
        assert_eq!(negative.cells().count(), 4);
    }

    #[test]
    fn test_lands_on_solid_row() {
        let mut grid = empty_grid(6, 6);
        grid[4] = vec![FLOOR; 6];
        let mut level = Level::from_tiles(LevelTheme::Forks, grid);
        let mut events = EventLog::new();

        // Bottom edge 140 -> row 4
        let mut enemy = enemy_at(40.0, 108.0);
        enemy.body_mut().velocity.y = 250.0;
        let report = resolve_level_collision(&mut enemy, &mut level, TileInteractions::Full, &mut events);

        assert!(report.landed);
        assert_eq!(enemy.body().position.y, 4.0 * 32.0 - 32.0);
        assert_eq!(enemy.body().velocity.y, 0.0);
        assert!(enemy.body().on_ground);
        // Floor row is not treated as a wall
        assert!(!report.blocked_left && !report.blocked_right);
        assert_eq!(enemy.body().position.x, 40.0);
    }

    #[test]
    fn test_air_below_clears_ground_contact() {
        let mut level = Level::from_tiles(LevelTheme::Forks, empty_grid(6, 6));
        let mut events = EventLog::new();

        let mut enemy = enemy_at(40.0, 20.0);
        enemy.body_mut().on_ground = true;
        resolve_level_collision(&mut enemy, &mut level, TileInteractions::Full, &mut events);
        assert!(!enemy.body().on_ground);
    }

    #[test]
    fn test_fallback_plane_keeps_ground_contact() {
        let mut level = Level::from_tiles(LevelTheme::Forks, empty_grid(20, 20));
        let mut events = EventLog::new();

        let mut enemy = enemy_at(100.0, 400.0);
        enemy.body_mut().on_ground = true;
        resolve_level_collision(&mut enemy, &mut level, TileInteractions::Full, &mut events);
        assert!(enemy.body().on_ground);
    }

    #[test]
    fn test_wall_pushes_out() {
        let mut grid = empty_grid(6, 6);
        for row in grid.iter_mut() {
            row[3] = FLOOR;
        }
        let mut level = Level::from_tiles(LevelTheme::Forks, grid);
        let mut events = EventLog::new();

        // Right edge at 100 overlaps column 3 (96..128)
        let mut enemy = enemy_at(68.0, 10.0);
        enemy.body_mut().velocity.x = 80.0;
        let report = resolve_level_collision(&mut enemy, &mut level, TileInteractions::SolidOnly, &mut events);

        assert!(report.blocked_right);
        assert_eq!(enemy.body().position.x, 3.0 * 32.0 - 32.0);
        assert_eq!(enemy.body().velocity.x, 0.0);
    }

    #[test]
    fn test_pinned_between_walls_resolves_right() {
        // Solid columns 0 and 2 on rows 0-1; row 2 open so no ground snap
        let mut grid = empty_grid(6, 6);
        for row in 0..2 {
            grid[row][0] = FLOOR;
            grid[row][2] = FLOOR;
        }
        let mut level = Level::from_tiles(LevelTheme::Forks, grid);
        let mut events = EventLog::new();

        let mut enemy = enemy_at(16.0, 0.0);
        enemy.body_mut().size = Vec2::new(64.0, 64.0);
        let report = resolve_level_collision(&mut enemy, &mut level, TileInteractions::SolidOnly, &mut events);

        assert!(report.blocked_left);
        assert!(report.blocked_right);
        // Left pass moves x to 32, right pass overwrites with 2*32 - 64
        assert_eq!(enemy.body().position.x, 0.0);
    }

    #[test]
    fn test_hazard_damages_every_tick() {
        let mut grid = empty_grid(6, 6);
        grid[1][1] = LAVA;
        let mut level = Level::from_tiles(LevelTheme::Forks, grid);
        let mut events = EventLog::new();

        let mut enemy = Enemy::new(EnemyId(1), EnemyKind::CoinGolem, Vec2::new(36.0, 36.0));
        enemy.body_mut().size = Vec2::new(20.0, 20.0);
        for _ in 0..3 {
            resolve_level_collision(&mut enemy, &mut level, TileInteractions::Full, &mut events);
        }
        assert_eq!(enemy.health().current(), 0);
        assert!(enemy.is_dead());
    }

    #[test]
    fn test_player_hazard_ticks_with_invulnerability_expired() {
        let mut grid = empty_grid(6, 6);
        grid[1][1] = LAVA;
        let mut level = Level::from_tiles(LevelTheme::Forks, grid);
        let mut events = EventLog::new();

        let mut player = Player::new();
        player.body_mut().position = Vec2::new(36.0, 36.0);
        player.body_mut().size = Vec2::new(20.0, 20.0);

        for _ in 0..3 {
            // A full second of cooldown decay clears the invulnerability window
            player.update_timers(1.0);
            resolve_level_collision(&mut player, &mut level, TileInteractions::Full, &mut events);
        }
        assert_eq!(player.health().current(), 40);
    }

    #[test]
    fn test_solid_only_ignores_hazards_and_collectibles() {
        let mut grid = empty_grid(6, 6);
        grid[1][1] = LAVA;
        grid[1][2] = COIN;
        let mut level = Level::from_tiles(LevelTheme::Forks, grid);
        let mut events = EventLog::new();

        let mut enemy = enemy_at(40.0, 36.0);
        let report = resolve_level_collision(&mut enemy, &mut level, TileInteractions::SolidOnly, &mut events);

        assert_eq!(report.hazard_damage, 0);
        assert!(report.collected.is_empty());
        assert_eq!(enemy.health().current(), enemy.health().max());
        assert!(level.tile_at(2, 1).is_collectible());
    }

    #[test]
    fn test_collectible_consumed_once() {
        let mut grid = empty_grid(6, 6);
        grid[1][1] = COIN;
        let mut level = Level::from_tiles(LevelTheme::Greed, grid);
        let mut events = EventLog::new();

        let mut player = Player::new();
        player.body_mut().position = Vec2::new(36.0, 36.0);
        player.body_mut().size = Vec2::new(20.0, 20.0);

        let first = resolve_level_collision(&mut player, &mut level, TileInteractions::Full, &mut events);
        let second = resolve_level_collision(&mut player, &mut level, TileInteractions::Full, &mut events);

        assert_eq!(first.collected, vec![(1, 1)]);
        assert_eq!(first.score_gained(), 50);
        assert_eq!(first.coins_gained(), 10);
        assert!(second.collected.is_empty());
        assert_eq!(level.tile_at(1, 1), Tile::AIR);

        let pickups = events
            .events()
            .iter()
            .filter(|e| matches!(e.data, GameEventData::TileCollected { .. }))
            .count();
        assert_eq!(pickups, 1);
    }

    #[test]
    fn test_grid_edge_is_not_solid() {
        let mut level = Level::from_tiles(LevelTheme::Forks, empty_grid(4, 4));
        let mut events = EventLog::new();

        let mut enemy = enemy_at(-20.0, -20.0);
        let report = resolve_level_collision(&mut enemy, &mut level, TileInteractions::Full, &mut events);
        assert_eq!(report, CollisionReport::default());
        assert_eq!(enemy.body().position, Vec2::new(-20.0, -20.0));
    }
}
