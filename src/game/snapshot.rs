//! Render Snapshot
//!
//! Draw intent for an external renderer: rectangles, colours, marker
//! letters, health-bar fill ratios and a HUD block. The simulation never
//! reads any of this back.

use serde::Serialize;

use crate::core::rect::Rect;
use crate::game::actor::{Actor, ActorId};
use crate::game::boss::Boss;
use crate::game::enemy::Enemy;
use crate::game::player::{Cooldowns, Player, PLAYER_MAX_MANA};
use crate::game::tilemap::{Level, TILE_SIZE};

const PLAYER_MARKER: char = '@';

/// One actor to draw.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActorSprite {
    /// Which actor
    pub id: ActorId,
    /// Body rectangle
    pub rect: Rect,
    /// Fill colour
    pub color: &'static str,
    /// Type marker letter
    pub marker: char,
    /// Facing direction
    pub facing_right: bool,
    /// State tag
    pub state: &'static str,
    /// Health-bar fill in `[0, 1]`
    pub health_ratio: f32,
    /// Draw the health bar at all
    pub show_health_bar: bool,
    /// Draw semi-transparent (post-hit immunity)
    pub flash: bool,
}

impl ActorSprite {
    /// Player sprite. Colour follows the active action.
    pub fn from_player(player: &Player) -> Self {
        let color = if player.is_dashing() {
            "#00ffff"
        } else if player.is_shielding() {
            "#95a5a6"
        } else if player.is_attacking() {
            "#ff6b6b"
        } else {
            "#4a90e2"
        };

        Self {
            id: ActorId::Player,
            rect: player.bounds(),
            color,
            marker: PLAYER_MARKER,
            facing_right: player.body().facing_right,
            state: player.animation().as_str(),
            health_ratio: player.health().ratio(),
            show_health_bar: true,
            flash: player.is_invulnerable(),
        }
    }

    /// Enemy sprite. The health bar only shows once damaged.
    pub fn from_enemy(enemy: &Enemy) -> Self {
        let stats = enemy.stats();
        Self {
            id: ActorId::Enemy(enemy.id()),
            rect: enemy.bounds(),
            color: stats.color,
            marker: stats.marker,
            facing_right: enemy.body().facing_right,
            state: motion_state(enemy.is_attacking(), enemy.body().velocity.x),
            health_ratio: enemy.health().ratio(),
            show_health_bar: enemy.health().current() < enemy.health().max(),
            flash: false,
        }
    }

    /// Boss sprite.
    pub fn from_boss(boss: &Boss) -> Self {
        let stats = boss.kind().stats();
        Self {
            id: ActorId::Boss,
            rect: boss.bounds(),
            color: stats.color,
            marker: stats.marker,
            facing_right: boss.body().facing_right,
            state: motion_state(boss.is_attacking(), boss.body().velocity.x),
            health_ratio: boss.health().ratio(),
            show_health_bar: true,
            flash: boss.phase() == 2,
        }
    }
}

fn motion_state(attacking: bool, vx: f32) -> &'static str {
    if attacking {
        "attack"
    } else if vx != 0.0 {
        "chase"
    } else {
        "idle"
    }
}

/// One non-air tile to draw.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TileSprite {
    /// Column
    pub col: usize,
    /// Row
    pub row: usize,
    /// World rectangle
    pub rect: Rect,
    /// Fill colour
    pub color: &'static str,
    /// Draw an outline (solid tiles)
    pub outlined: bool,
}

/// Every non-air tile of a level, row-major.
pub fn tile_sprites(level: &Level) -> Vec<TileSprite> {
    level
        .iter()
        .filter_map(|(col, row, tile)| {
            let color = tile.color()?;
            Some(TileSprite {
                col,
                row,
                rect: Rect::new(col as f32 * TILE_SIZE, row as f32 * TILE_SIZE, TILE_SIZE, TILE_SIZE),
                color,
                outlined: tile.is_solid(),
            })
        })
        .collect()
}

/// Boss bar.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BossHud {
    /// Display name
    pub name: &'static str,
    /// Health fill
    pub health_ratio: f32,
    /// 1 or 2
    pub phase: u8,
}

/// Heads-up display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Hud {
    /// Player health
    pub health: u32,
    /// Player max health
    pub max_health: u32,
    /// Player mana
    pub mana: f32,
    /// Player max mana
    pub max_mana: f32,
    /// Ability cooldowns
    pub cooldowns: Cooldowns,
    /// Score
    pub score: u32,
    /// Coins
    pub coins: u32,
    /// Level number
    pub level: u32,
    /// Level name
    pub level_name: &'static str,
    /// Enemies defeated this level
    pub enemies_defeated: u32,
    /// Boss bar, while a boss is alive
    pub boss: Option<BossHud>,
    /// Run ended by death
    pub game_over: bool,
    /// Run ended by clearing the last level
    pub victory: bool,
}

impl Hud {
    /// Player-derived fields; the rest start empty.
    pub fn for_player(player: &Player) -> Self {
        Self {
            health: player.health().current(),
            max_health: player.health().max(),
            mana: player.mana(),
            max_mana: PLAYER_MAX_MANA,
            cooldowns: *player.cooldowns(),
            score: 0,
            coins: 0,
            level: 0,
            level_name: "",
            enemies_defeated: 0,
            boss: None,
            game_over: false,
            victory: false,
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderSnapshot {
    /// Simulation tick
    pub tick: u32,
    /// Non-air tiles
    pub tiles: Vec<TileSprite>,
    /// Player, enemies (creation order), boss
    pub actors: Vec<ActorSprite>,
    /// HUD
    pub hud: Hud,
}

impl RenderSnapshot {
    /// Feed the snapshot to a renderer: tiles, then actors, then HUD.
    pub fn render_to<R: RenderSink + ?Sized>(&self, sink: &mut R) {
        sink.begin_frame(self.tick);
        for tile in &self.tiles {
            sink.draw_tile(tile);
        }
        for actor in &self.actors {
            sink.draw_actor(actor);
        }
        sink.draw_hud(&self.hud);
    }
}

/// Renderer collaborator. Every method defaults to a no-op.
pub trait RenderSink {
    /// A new frame starts.
    fn begin_frame(&mut self, _tick: u32) {}

    /// Draw one tile.
    fn draw_tile(&mut self, _tile: &TileSprite) {}

    /// Draw one actor.
    fn draw_actor(&mut self, _actor: &ActorSprite) {}

    /// Draw the HUD.
    fn draw_hud(&mut self, _hud: &Hud) {}
}
