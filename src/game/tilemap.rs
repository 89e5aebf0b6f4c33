//! Tilemap
//!
//! Tile grid for one level and its procedural generator. Levels are rebuilt
//! from scratch every time they are entered; nothing is persisted.

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::core::rng::SimRng;
use crate::game::boss::BossKind;

/// Edge length of a tile (units).
pub const TILE_SIZE: f32 = 32.0;

/// Level width in tiles.
pub const LEVEL_WIDTH: usize = 50;

/// Level height in tiles.
pub const LEVEL_HEIGHT: usize = 20;

/// Number of levels in a run.
pub const LEVEL_COUNT: u32 = 3;

/// Level loading errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    /// Level number outside `1..=LEVEL_COUNT`
    #[error("unknown level {0} (expected 1..=3)")]
    UnknownLevel(u32),
}

// =============================================================================
// TILES
// =============================================================================

/// What occupies a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Empty
    Air,
    /// Ground and platforms
    Floor,
    /// Border walls
    Wall,
    /// Damages every actor overlapping it, every tick
    Hazard {
        /// Damage per tick of overlap
        damage: u32,
    },
    /// Cosmetic only
    Decoration,
    /// Consumed on overlap for score
    Collectible,
}

/// One grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Cell contents
    pub kind: TileKind,
    /// Visual variant id
    pub variant: u8,
}

impl Tile {
    /// The empty tile.
    pub const AIR: Tile = Tile {
        kind: TileKind::Air,
        variant: 0,
    };

    /// Create a tile.
    pub const fn new(kind: TileKind, variant: u8) -> Self {
        Self { kind, variant }
    }

    /// Blocks movement.
    #[inline]
    pub fn is_solid(&self) -> bool {
        matches!(self.kind, TileKind::Floor | TileKind::Wall)
    }

    /// Damage dealt per tick of overlap (0 for non-hazards).
    #[inline]
    pub fn damage(&self) -> u32 {
        match self.kind {
            TileKind::Hazard { damage } => damage,
            _ => 0,
        }
    }

    /// Consumed on overlap.
    #[inline]
    pub fn is_collectible(&self) -> bool {
        self.kind == TileKind::Collectible
    }

    /// Fill colour, or `None` for air.
    pub fn color(&self) -> Option<&'static str> {
        let color = match (self.kind, self.variant) {
            (TileKind::Air, _) => return None,
            (TileKind::Floor, 0) => "#8B4513",
            (TileKind::Floor, 1) => "#A0522D",
            (TileKind::Floor, 2) => "#FFD700",
            (TileKind::Floor, 3) => "#FFA500",
            (TileKind::Floor, 4) => "#4A4A4A",
            (TileKind::Floor, _) => "#6A6A6A",
            (TileKind::Wall, 0) => "#654321",
            (TileKind::Wall, 1) => "#B8860B",
            (TileKind::Wall, _) => "#2F2F2F",
            (TileKind::Hazard { .. }, 0) => "#ff4444",
            (TileKind::Hazard { .. }, _) => "#4444FF",
            (TileKind::Decoration, 0) => "#ff6666",
            (TileKind::Decoration, 1) => "#FFAA00",
            (TileKind::Decoration, _) => "#6666FF",
            (TileKind::Collectible, _) => "#FFD700",
        };
        Some(color)
    }
}

// =============================================================================
// LEVEL THEMES
// =============================================================================

/// The three houses, in play order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelTheme {
    /// Level 1: lava
    Forks,
    /// Level 2: coins
    Greed,
    /// Level 3: void
    Silence,
}

/// Probabilistic tile placed by an independent per-cell draw.
struct Scatter {
    tile: Tile,
    probability: f32,
    /// Only rows `< height - rows_from_bottom` are eligible
    rows_from_bottom: usize,
}

impl LevelTheme {
    /// Theme for a level number.
    pub fn from_number(number: u32) -> Result<Self, LevelError> {
        match number {
            1 => Ok(LevelTheme::Forks),
            2 => Ok(LevelTheme::Greed),
            3 => Ok(LevelTheme::Silence),
            n => Err(LevelError::UnknownLevel(n)),
        }
    }

    /// Level number (1-based).
    pub fn number(self) -> u32 {
        match self {
            LevelTheme::Forks => 1,
            LevelTheme::Greed => 2,
            LevelTheme::Silence => 3,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            LevelTheme::Forks => "House of Forks",
            LevelTheme::Greed => "House of Greed",
            LevelTheme::Silence => "House of Silence",
        }
    }

    /// Boss guarding this level.
    pub fn boss(self) -> BossKind {
        match self {
            LevelTheme::Forks => BossKind::Vulkran,
            LevelTheme::Greed => BossKind::Aurios,
            LevelTheme::Silence => BossKind::FracturedPhantom,
        }
    }

    /// Every n-th column of the second-to-last row is a platform.
    fn platform_stride(self) -> usize {
        match self {
            LevelTheme::Forks => 3,
            LevelTheme::Greed => 2,
            LevelTheme::Silence => 4,
        }
    }

    /// (ground, platform) floor variants.
    fn floor_variants(self) -> (u8, u8) {
        match self {
            LevelTheme::Forks => (0, 1),
            LevelTheme::Greed => (2, 3),
            LevelTheme::Silence => (4, 5),
        }
    }

    fn wall_variant(self) -> u8 {
        match self {
            LevelTheme::Forks => 0,
            LevelTheme::Greed => 1,
            LevelTheme::Silence => 2,
        }
    }

    fn feature(self) -> Scatter {
        match self {
            LevelTheme::Forks => Scatter {
                tile: Tile::new(TileKind::Hazard { damage: 20 }, 0),
                probability: 0.1,
                rows_from_bottom: 5,
            },
            LevelTheme::Greed => Scatter {
                tile: Tile::new(TileKind::Collectible, 0),
                probability: 0.08,
                rows_from_bottom: 4,
            },
            LevelTheme::Silence => Scatter {
                tile: Tile::new(TileKind::Hazard { damage: 30 }, 1),
                probability: 0.12,
                rows_from_bottom: 5,
            },
        }
    }

    fn decoration(self) -> Scatter {
        let (variant, probability) = match self {
            LevelTheme::Forks => (0, 0.05),
            LevelTheme::Greed => (1, 0.06),
            LevelTheme::Silence => (2, 0.07),
        };
        Scatter {
            tile: Tile::new(TileKind::Decoration, variant),
            probability,
            rows_from_bottom: 3,
        }
    }
}

// =============================================================================
// LEVEL
// =============================================================================

/// A generated level: the tile grid plus its dimensions.
///
/// Tiles are indexed `[row][col]`. The grid is only mutated when a
/// collectible is consumed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    theme: LevelTheme,
    width: usize,
    height: usize,
    tiles: Vec<Vec<Tile>>,
}

impl Level {
    /// Generate level `number` (1-based).
    pub fn generate(number: u32, rng: &mut SimRng) -> Result<Self, LevelError> {
        let theme = LevelTheme::from_number(number)?;
        info!(level = number, name = theme.name(), "Loading level");

        let level = Self::generate_themed(theme, rng);

        info!(
            level = number,
            hazards = level.count(|t| t.damage() > 0),
            collectibles = level.count(Tile::is_collectible),
            "Level loaded"
        );
        Ok(level)
    }

    /// Generate a level for a theme.
    ///
    /// Each cell takes the first matching rule: ground row, platform row,
    /// border wall, themed feature, decoration, air.
    pub fn generate_themed(theme: LevelTheme, rng: &mut SimRng) -> Self {
        let (width, height) = (LEVEL_WIDTH, LEVEL_HEIGHT);
        let (ground_variant, platform_variant) = theme.floor_variants();
        let feature = theme.feature();
        let decoration = theme.decoration();

        let mut tiles = Vec::with_capacity(height);
        for row in 0..height {
            let mut line = Vec::with_capacity(width);
            for col in 0..width {
                let tile = if row == height - 1 {
                    Tile::new(TileKind::Floor, ground_variant)
                } else if row == height - 2 && col % theme.platform_stride() == 0 {
                    Tile::new(TileKind::Floor, platform_variant)
                } else if col == 0 || col == width - 1 {
                    Tile::new(TileKind::Wall, theme.wall_variant())
                } else if scatter(&feature, row, height, rng) {
                    feature.tile
                } else if scatter(&decoration, row, height, rng) {
                    decoration.tile
                } else {
                    Tile::AIR
                };
                line.push(tile);
            }
            tiles.push(line);
        }

        Self {
            theme,
            width,
            height,
            tiles,
        }
    }

    /// Build a level from an explicit grid (rows of equal length).
    pub fn from_tiles(theme: LevelTheme, tiles: Vec<Vec<Tile>>) -> Self {
        let height = tiles.len();
        let width = tiles.first().map_or(0, Vec::len);
        Self {
            theme,
            width,
            height,
            tiles,
        }
    }

    /// Theme.
    pub fn theme(&self) -> LevelTheme {
        self.theme
    }

    /// Level number (1-based).
    pub fn number(&self) -> u32 {
        self.theme.number()
    }

    /// Width in tiles.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Edge length of a tile.
    pub fn tile_size(&self) -> f32 {
        TILE_SIZE
    }

    /// Range for the left edge of an actor `width` wide that keeps it
    /// between the border walls.
    pub fn interior_x(&self, width: f32) -> (f32, f32) {
        let min = TILE_SIZE;
        let max = (self.width as f32 * TILE_SIZE - TILE_SIZE - width).max(min);
        (min, max)
    }

    /// Tile at a signed grid index. Anything outside the grid is air.
    pub fn tile_at(&self, col: i32, row: i32) -> Tile {
        if col < 0 || row < 0 {
            return Tile::AIR;
        }
        self.tiles
            .get(row as usize)
            .and_then(|line| line.get(col as usize))
            .copied()
            .unwrap_or(Tile::AIR)
    }

    /// Solid tile at a signed grid index.
    #[inline]
    pub fn is_solid(&self, col: i32, row: i32) -> bool {
        self.tile_at(col, row).is_solid()
    }

    /// Consume a collectible, leaving air behind.
    ///
    /// Returns false when the cell is not (or no longer) collectible.
    pub fn collect(&mut self, col: i32, row: i32) -> bool {
        if !self.tile_at(col, row).is_collectible() {
            return false;
        }
        self.tiles[row as usize][col as usize] = Tile::AIR;
        true
    }

    /// Iterate over `(col, row, tile)` for every cell.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.tiles.iter().enumerate().flat_map(|(row, line)| {
            line.iter().enumerate().map(move |(col, tile)| (col, row, *tile))
        })
    }

    /// Count tiles matching a predicate.
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Tile) -> bool,
    {
        self.iter().filter(|(_, _, tile)| predicate(tile)).count()
    }
}

/// Row gate first, draw second, so ineligible rows never consume randomness.
fn scatter(rule: &Scatter, row: usize, height: usize, rng: &mut SimRng) -> bool {
    row + rule.rows_from_bottom < height && rng.chance(rule.probability)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(number: u32, seed: u64) -> Level {
        let mut rng = SimRng::new(seed);
        Level::generate(number, &mut rng).unwrap()
    }

    #[test]
    fn test_level1_structural_skeleton() {
        let level = level(1, 42);
        let (w, h) = (level.width() as i32, level.height() as i32);
        assert_eq!((w, h), (50, 20));

        for col in 0..w {
            assert!(level.is_solid(col, h - 1), "bottom row col {col}");
        }
        for row in 0..h {
            assert!(level.is_solid(0, row), "left wall row {row}");
            assert!(level.is_solid(w - 1, row), "right wall row {row}");
        }
    }

    #[test]
    fn test_platform_row_stride() {
        for (number, stride) in [(1, 3), (2, 2), (3, 4)] {
            let level = level(number, 9);
            let row = level.height() as i32 - 2;
            for col in 1..level.width() as i32 - 1 {
                let expected = col as usize % stride == 0;
                assert_eq!(
                    level.tile_at(col, row).kind == TileKind::Floor,
                    expected,
                    "level {number} col {col}"
                );
            }
        }
    }

    #[test]
    fn test_themed_features_respect_row_limits() {
        for seed in 0..8 {
            let forks = level(1, seed);
            for (_, row, tile) in forks.iter() {
                if tile.damage() > 0 {
                    assert_eq!(tile.damage(), 20);
                    assert!(row < LEVEL_HEIGHT - 5);
                }
                assert!(!tile.is_collectible());
            }

            let greed = level(2, seed);
            for (_, row, tile) in greed.iter() {
                if tile.is_collectible() {
                    assert!(row < LEVEL_HEIGHT - 4);
                }
                assert_eq!(tile.damage(), 0);
            }

            let silence = level(3, seed);
            for (_, row, tile) in silence.iter() {
                if tile.damage() > 0 {
                    assert_eq!(tile.damage(), 30);
                }
                if tile.kind == TileKind::Decoration {
                    assert!(row < LEVEL_HEIGHT - 3);
                }
            }
        }
    }

    #[test]
    fn test_seeded_generation_repeats() {
        assert_eq!(level(2, 1234), level(2, 1234));
    }

    #[test]
    fn test_unknown_level() {
        let mut rng = SimRng::new(0);
        assert_eq!(
            Level::generate(4, &mut rng).unwrap_err(),
            LevelError::UnknownLevel(4)
        );
        assert!(Level::generate(0, &mut rng).is_err());
    }

    #[test]
    fn test_interior_excludes_border_walls() {
        let level = level(1, 5);
        let (min, max) = level.interior_x(32.0);
        assert_eq!(min, 32.0);
        assert_eq!(max, 1536.0);

        // Both edges of an actor at either bound stay off the wall columns
        assert!(!level.is_solid((min / TILE_SIZE) as i32, 5));
        assert!(!level.is_solid(((max + 31.0) / TILE_SIZE) as i32, 5));
    }

    #[test]
    fn test_out_of_bounds_is_air() {
        let level = level(1, 3);
        assert_eq!(level.tile_at(-1, 5), Tile::AIR);
        assert_eq!(level.tile_at(5, -1), Tile::AIR);
        assert_eq!(level.tile_at(50, 5), Tile::AIR);
        assert_eq!(level.tile_at(5, 20), Tile::AIR);
        assert!(!level.is_solid(i32::MAX, i32::MIN));
    }

    #[test]
    fn test_collect_is_idempotent() {
        let mut tiles = vec![vec![Tile::AIR; 4]; 4];
        tiles[1][2] = Tile::new(TileKind::Collectible, 0);
        let mut level = Level::from_tiles(LevelTheme::Greed, tiles);

        assert!(level.collect(2, 1));
        assert_eq!(level.tile_at(2, 1), Tile::AIR);
        assert!(!level.collect(2, 1));
        assert!(!level.collect(0, 0));
    }

    #[test]
    fn test_tile_properties() {
        assert!(Tile::new(TileKind::Wall, 0).is_solid());
        assert!(!Tile::new(TileKind::Hazard { damage: 20 }, 0).is_solid());
        assert_eq!(Tile::new(TileKind::Hazard { damage: 20 }, 0).damage(), 20);
        assert_eq!(Tile::AIR.color(), None);
        assert_eq!(Tile::new(TileKind::Floor, 0).color(), Some("#8B4513"));
    }

    #[test]
    fn test_theme_metadata() {
        assert_eq!(LevelTheme::from_number(2).unwrap().name(), "House of Greed");
        assert_eq!(LevelTheme::Silence.boss(), BossKind::FracturedPhantom);
        assert_eq!(LevelTheme::Forks.number(), 1);
    }
}
