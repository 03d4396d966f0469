//! Terminal preview: drives the tile core once per tick.
//!
//! Arrow keys move the player through the collision queries, Down lets go
//! of ceiling hooks, q / Esc / Ctrl+C quits.

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tilescroll::config::CoreConfig;
use tilescroll::domain::grid::ROW_UNITS;
use tilescroll::domain::player::PlayerState;
use tilescroll::sim::context::RenderContext;
use tilescroll::sim::event::CoreEvent;
use tilescroll::sim::level::{parse_level, Level, DEMO_LEVEL};
use tilescroll::ui::input::InputState;
use tilescroll::ui::sound::{self, SoundEngine};
use tilescroll::ui::sprite::{ActorSprite, SpriteBanks, FRAME_STRIDE};
use tilescroll::ui::terminal::TerminalBackend;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// Ticks of gravity suppression after each upward step.
const CLIMB_HOLD_TICKS: u32 = 2;

/// Walk cycle frames; the last one comes from the second bank.
const WALK_FRAMES: u16 = 4;

const PLAYER_BANKS: SpriteBanks = SpriteBanks::new(0, 8 * FRAME_STRIDE);
const ACTOR_BANKS: SpriteBanks = SpriteBanks::new(16 * FRAME_STRIDE, 24 * FRAME_STRIDE);

fn main() {
    let config = CoreConfig::load();
    init_logging(&config.log_filter);

    let level = match parse_level(DEMO_LEVEL) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Level error: {e}");
            return;
        }
    };
    info!(name = %level.name, "starting preview");

    let mut term = TerminalBackend::new();
    if let Err(e) = term.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = if config.sound_enabled { SoundEngine::new() } else { None };

    let result = game_loop(&level, &mut term, sound.as_ref(), &config);

    if let Err(e) = term.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Preview error: {e}");
    }
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn game_loop(
    level: &Level,
    term: &mut TerminalBackend,
    sound: Option<&SoundEngine>,
    config: &CoreConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let (x, y) = config.player.start.unwrap_or(level.spawn);
    let player = PlayerState::new(x, y).with_grappling_hook(config.player.grappling_hook);
    let mut ctx = RenderContext::new(&level.grid, player);

    let mut input = InputState::new();
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);
    let mut last_tick = first_tick_start(tick_rate);
    let mut last_event: Option<CoreEvent> = None;

    loop {
        input.drain_events()?;
        if input.quit_requested() {
            break;
        }
        if last_tick.elapsed() < tick_rate {
            std::thread::sleep(FRAME_SLEEP);
            continue;
        }
        last_tick = Instant::now();

        let mut events = Vec::new();
        step_player(&mut ctx, &input, config, &mut events);
        input.clear_presses();
        ctx.update_camera();
        sound::play_events(sound, &events);
        if let Some(&event) = events.last() {
            last_event = Some(event);
        }

        term.begin_frame();
        ctx.draw_map(term);
        for &(ax, ay) in &level.actors {
            let actor = ActorSprite { x: ax, y: ay, frame: 0, banks: ACTOR_BANKS };
            ctx.draw_actor(term, &actor);
        }
        let me = ActorSprite {
            x: ctx.player.x,
            y: ctx.player.y,
            frame: ctx.player.anim_frame,
            banks: PLAYER_BANKS,
        };
        ctx.draw_actor(term, &me);
        term.draw_border();

        let touching = level.actors.iter().any(|&(ax, ay)| ctx.is_touching_player(ax, ay));
        let p = &ctx.player;
        term.status(0, &format!("{}  x={} y={} cam={},{}", level.name, p.x, p.y, ctx.camera.x, ctx.camera.y));
        term.status(1, &format!(
            "air={} hang={} touch={}",
            ctx.is_player_in_air(),
            p.is_hanging_from_ceiling,
            touching,
        ));
        term.status(2, &format!("last event: {:<12}", format!("{:?}", last_event)));
        term.present()?;
    }

    Ok(())
}

/// A start time one tick in the past so the first frame renders at once.
/// Falls back to now when the clock is younger than one tick.
fn first_tick_start(tick_rate: Duration) -> Instant {
    Instant::now().checked_sub(tick_rate).unwrap_or_else(Instant::now)
}

/// One tick of preview movement. The core only answers yes/no; speeds and
/// gravity live here.
fn step_player(ctx: &mut RenderContext<'_>, input: &InputState, config: &CoreConfig, events: &mut Vec<CoreEvent>) {
    let mut moved = false;

    if input.is_held(KeyCode::Left) && ctx.can_move_left() {
        ctx.player.x -= 1;
        moved = true;
    } else if input.is_held(KeyCode::Right) && ctx.can_move_right() {
        ctx.player.x += 1;
        moved = true;
    }

    if input.was_pressed(KeyCode::Down) && ctx.player.is_hanging_from_ceiling {
        ctx.player.is_hanging_from_ceiling = false;
    }

    if input.is_held(KeyCode::Up) && !ctx.player.is_falling && ctx.can_move_up(events) {
        ctx.player.y -= config.speed.climb_step;
        ctx.player.climbing_frames_remaining = CLIMB_HOLD_TICKS;
        moved = true;
    }

    if ctx.player.climbing_frames_remaining > 0 {
        ctx.player.climbing_frames_remaining -= 1;
    } else if !ctx.player.is_hanging_from_ceiling && ctx.is_player_in_air() {
        ctx.player.is_falling = true;
        ctx.player.y += config.speed.fall_step;
    } else if ctx.player.is_falling {
        // landed: snap feet to the top of the row
        ctx.player.is_falling = false;
        ctx.player.y &= !(ROW_UNITS - 1);
    }

    if moved {
        ctx.player.anim_frame = (ctx.player.anim_frame + 1) % WALK_FRAMES;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_start_never_panics() {
        let start = first_tick_start(Duration::from_millis(75));
        assert!(start <= Instant::now());
        let huge = first_tick_start(Duration::from_secs(u64::MAX / 4));
        assert!(huge <= Instant::now());
    }
}
