/// Spawn policy: when and what to create.
///
/// Both spawners are gated three ways: a live-count cap, a difficulty-scaled
/// interval since the last spawn, and (for enemies) score gates that
/// introduce the nastier kinds gradually. Enemies get harder with
/// difficulty; power-ups get rarer.

use rand::Rng;

use crate::domain::entity::{Enemy, EnemyKind, PowerUp, PowerUpKind};
use crate::sim::event::GameEvent;
use crate::sim::world::GameSession;

pub const ENEMY_CAP: usize = 15;
pub const POWER_UP_CAP: usize = 2;

/// Seconds between enemy spawns at difficulty 0 / 1.
pub const ENEMY_INTERVAL_EASY: f64 = 3.0;
pub const ENEMY_INTERVAL_HARD: f64 = 0.3;

/// Seconds between power-up spawns at difficulty 0 / 1. Note the inversion:
/// power-ups become rarer as the game hardens.
pub const POWER_UP_INTERVAL_EASY: f64 = 8.0;
pub const POWER_UP_INTERVAL_HARD: f64 = 25.0;

/// Score gates for the nastier enemy kinds, shifted earlier by difficulty.
pub const ZIGZAG_SCORE_GATE: u32 = 50;
pub const HUNTER_SCORE_GATE: u32 = 120;

/// Columns in from the right edge where each spawner places new entities.
const ENEMY_SPAWN_INSET: i32 = 10;
const POWER_UP_SPAWN_INSET: i32 = 5;

/// Rows kept clear at the top and bottom of the spawn band.
const SPAWN_ROW_MARGIN: i32 = 2;

pub fn enemy_spawn_interval(difficulty: f64) -> f64 {
    ENEMY_INTERVAL_EASY - (ENEMY_INTERVAL_EASY - ENEMY_INTERVAL_HARD) * difficulty
}

pub fn power_up_spawn_interval(difficulty: f64) -> f64 {
    POWER_UP_INTERVAL_EASY + (POWER_UP_INTERVAL_HARD - POWER_UP_INTERVAL_EASY) * difficulty
}

/// Pick an enemy kind for the current score and difficulty.
/// Hunter is tried first, then zigzag, else basic; both gates slide earlier
/// and both probabilities climb as difficulty rises.
pub fn pick_enemy_kind(score: u32, difficulty: f64, rng: &mut impl Rng) -> EnemyKind {
    let hunter_gate = HUNTER_SCORE_GATE as f64 * (1.0 - difficulty * 0.3);
    if score as f64 >= hunter_gate {
        let chance = 0.1 + difficulty * 0.3;
        if rng.gen_bool(chance.clamp(0.0, 1.0)) {
            return EnemyKind::Hunter;
        }
    }

    let zigzag_gate = ZIGZAG_SCORE_GATE as f64 * (1.0 - difficulty * 0.3);
    if score as f64 >= zigzag_gate {
        let chance = 0.2 + difficulty * 0.4;
        if rng.gen_bool(chance.clamp(0.0, 1.0)) {
            return EnemyKind::Zigzag;
        }
    }

    EnemyKind::Basic
}

fn spawn_row(rows: i32, rng: &mut impl Rng) -> i32 {
    let low = SPAWN_ROW_MARGIN;
    let high = (rows - SPAWN_ROW_MARGIN - 1).max(low);
    rng.gen_range(low..=high)
}

/// Spawn an enemy if the interval has elapsed. The cap is checked after the
/// timer so a full screen still resets the timer instead of queueing a
/// burst for the moment one slot frees up.
pub fn maybe_spawn_enemy(
    world: &mut GameSession,
    now: f64,
    difficulty: f64,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    if now - world.last_enemy_spawn <= enemy_spawn_interval(difficulty) {
        return;
    }
    world.last_enemy_spawn = now;

    if world.enemies.len() >= ENEMY_CAP {
        return;
    }

    let kind = pick_enemy_kind(world.player.score, difficulty, rng);
    let x = world.cols - ENEMY_SPAWN_INSET;
    let y = spawn_row(world.rows, rng);
    world.enemies.push(Enemy::new(x, y, kind, difficulty));
    events.push(GameEvent::EnemySpawned { kind });
}

/// Spawn a power-up if the interval has elapsed, drawn uniformly from the
/// three core kinds.
pub fn maybe_spawn_power_up(
    world: &mut GameSession,
    now: f64,
    difficulty: f64,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    if now - world.last_power_up_spawn <= power_up_spawn_interval(difficulty) {
        return;
    }
    world.last_power_up_spawn = now;

    if world.power_ups.len() >= POWER_UP_CAP {
        return;
    }

    let kind = match rng.gen_range(0..3) {
        0 => PowerUpKind::Shield,
        1 => PowerUpKind::RapidFire,
        _ => PowerUpKind::Invincibility,
    };
    let x = world.cols - POWER_UP_SPAWN_INSET;
    let y = spawn_row(world.rows, rng);
    world.power_ups.push(PowerUp::new(x, y, kind));
    events.push(GameEvent::PowerUpSpawned { kind });
}
