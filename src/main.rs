//! Relic Houses Simulator
//!
//! Headless demo driver: loads a config, plays a scripted session through the
//! simulation core, and logs the final state digest.
//!
//! Usage: `relic-houses-sim [config.json]`

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use relic_houses::{
    TICK_RATE, VERSION,
    SimConfig,
    game::{
        Actor,
        events::{EffectKind, EventSink, GameEventData},
        input::{InputAction, InputFrame},
        snapshot::{ActorSprite, Hud, RenderSink, TileSprite},
        tick::tick,
        world::World,
    },
};

/// Demo session length (two minutes of play).
const DEMO_TICKS: u32 = TICK_RATE * 120;

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    info!("Relic Houses Simulator v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "Loading config");
            SimConfig::load(&path)?
        }
        None => SimConfig::default(),
    };

    demo_session(config, DEMO_TICKS)
}

/// Effects collaborator that writes cues to the log.
#[derive(Default)]
struct TracingSink {
    effects: usize,
    score: u32,
}

impl EventSink for TracingSink {
    fn play_effect(&mut self, kind: EffectKind, x: f32, y: f32) {
        self.effects += 1;
        debug!(?kind, x, y, "Effect");
    }

    fn add_score(&mut self, amount: u32) {
        self.score += amount;
    }

    fn game_over(&mut self, score: u32) {
        info!(score, "Game over screen");
    }
}

/// Renderer stand-in that only counts draw calls.
#[derive(Default)]
struct CountingRenderer {
    tiles: usize,
    actors: usize,
    frames: usize,
}

impl RenderSink for CountingRenderer {
    fn begin_frame(&mut self, _tick: u32) {
        self.frames += 1;
    }

    fn draw_tile(&mut self, _tile: &TileSprite) {
        self.tiles += 1;
    }

    fn draw_actor(&mut self, _actor: &ActorSprite) {
        self.actors += 1;
    }

    fn draw_hud(&mut self, hud: &Hud) {
        debug!(health = hud.health, mana = hud.mana, score = hud.score, level = hud.level_name, "HUD");
    }
}

/// Scripted player: run right, jump now and then, keep swinging.
fn scripted_input(t: u32) -> InputFrame {
    let mut actions = vec![if (t / 240) % 4 == 3 { InputAction::Left } else { InputAction::Right }];
    if t % 45 == 0 {
        actions.push(InputAction::Jump);
    }
    if t % 20 < 2 {
        actions.push(InputAction::LightAttack);
    }
    if t % 150 == 75 {
        actions.push(InputAction::HeavyAttack);
    }
    if t % 300 == 150 {
        actions.push(InputAction::Shield);
    }
    if t % 400 == 200 {
        actions.push(InputAction::Dash);
    }
    InputFrame::with(&actions)
}

/// Play the scripted session and report the outcome.
fn demo_session(config: SimConfig, ticks: u32) -> Result<()> {
    info!("=== Starting Demo Session ===");
    info!(seed = ?config.seed, start_level = config.start_level, "Config");

    let dt = 1.0 / TICK_RATE as f32;
    let mut world = World::new(config)?;
    let mut sink = TracingSink::default();
    let mut renderer = CountingRenderer::default();

    for event in world.take_events() {
        event.dispatch(&mut sink);
    }

    let mut total_events = 0;
    for t in 0..ticks {
        let result = tick(&mut world, &scripted_input(t), dt);
        total_events += result.events.len();

        for event in &result.events {
            event.dispatch(&mut sink);
            match &event.data {
                GameEventData::LevelLoaded { number, name } => info!(number, %name, "Entered level"),
                GameEventData::BossPhaseChanged { kind, phase } => info!(boss = kind.name(), phase, "Boss enraged"),
                _ => {}
            }
        }

        // Report every 10 seconds
        if t % (TICK_RATE * 10) == 0 {
            world.snapshot().render_to(&mut renderer);
            info!(
                "Tick {}: level {}, {} enemies, score {}, health {}",
                world.tick(),
                world.level().number(),
                world.enemy_count(),
                world.score(),
                world.player().health().current()
            );
        }

        if result.game_over || result.victory {
            info!(tick = world.tick(), victory = result.victory, "Session ended");
            break;
        }
    }

    // Final results
    info!("=== Session Results ===");
    let hash = world.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!(
        "Score: {}, Coins: {}, Effects played: {}, Events: {}",
        world.score(),
        world.coins(),
        sink.effects,
        total_events
    );
    info!(
        "Rendered {} frames ({} tile draws, {} actor draws)",
        renderer.frames, renderer.tiles, renderer.actors
    );
    if sink.score != world.score() {
        warn!(sink = sink.score, world = world.score(), "Sink score drifted from world score");
    }

    Ok(())
}
