/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use config::GameConfig;
use sim::event::GameEvent;
use sim::step;
use sim::world::{GameSession, Phase};
use ui::input::{self, Action};
use ui::renderer::Renderer;

fn main() {
    let config = GameConfig::load();

    if config.log.enabled {
        if let Err(e) = simple_logging::log_to_file(&config.log.file, log::LevelFilter::Info) {
            eprintln!("Warning: could not open log file {}: {e}", config.log.file);
        }
    }

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut world = GameSession::new(cols as i32, rows as i32);

    let result = game_loop(&mut world, &mut renderer, &config);

    // The terminal is restored on every exit path, including errors.
    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
        return;
    }

    println!();
    println!("Thanks for playing Star Raid!");
    println!("Final Score: {}", world.player.score);
}

fn game_loop(
    world: &mut GameSession,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::from_entropy();
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);

    loop {
        let frame_start = Instant::now();

        // Tolerate terminal resize every tick
        let (tw, th) = crossterm::terminal::size().unwrap_or((80, 24));
        world.sync_screen(tw as i32, th as i32);

        // One key per tick, non-blocking
        let action = input::poll_action();

        match world.phase {
            Phase::Title => match action {
                Some(Action::Confirm) => world.phase = Phase::Instructions,
                Some(Action::Quit) => break,
                _ => {}
            },

            Phase::Instructions => match action {
                Some(Action::Confirm) => {
                    world.reset(
                        tw as i32,
                        th as i32,
                        config.display.star_count,
                        &mut rng,
                    );
                    info!("session started ({tw}x{th})");
                }
                Some(Action::Quit) => break,
                _ => {}
            },

            Phase::Playing => {
                match action {
                    Some(Action::MoveUp) => world.move_player(0, -1),
                    Some(Action::MoveDown) => world.move_player(0, 1),
                    Some(Action::MoveLeft) => world.move_player(-1, 0),
                    Some(Action::MoveRight) => world.move_player(1, 0),
                    Some(Action::Shoot) => {
                        let now = world.elapsed();
                        let rows = world.rows;
                        world.player.shoot(now, rows);
                    }
                    Some(Action::Quit) => break,
                    _ => {}
                }

                let now = world.elapsed();
                let events = step::step(world, now, &mut rng);
                process_events(world, &events);
            }

            Phase::GameOver => match action {
                Some(Action::Restart) => {
                    world.reset(
                        tw as i32,
                        th as i32,
                        config.display.star_count,
                        &mut rng,
                    );
                    info!("session restarted");
                }
                Some(Action::Quit) => break,
                _ => {}
            },
        }

        renderer.render(world)?;

        // Pace to the target tick duration; never sleep negative
        let worked = frame_start.elapsed();
        if worked < tick_rate {
            std::thread::sleep(tick_rate - worked);
        }
    }

    Ok(())
}

fn process_events(world: &mut GameSession, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::ShipUpgraded { level } => {
                info!("ship upgraded to level {}", level + 1);
            }
            GameEvent::PowerUpCollected { kind } => {
                info!("power-up collected: {kind:?}");
            }
            GameEvent::PlayerKilled { score } => {
                info!("game over, final score {score}");
                world.phase = Phase::GameOver;
            }
            _ => {}
        }
    }
}
