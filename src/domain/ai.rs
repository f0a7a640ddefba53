/// Per-kind enemy behavior state machines.
///
/// Every enemy drifts left at its frozen speed (done by `Enemy::update`);
/// what varies per kind is the vertical component:
///   - **Cruise**  — none. Basic enemies fly straight.
///   - **Zigzag**  — vertical drift that flips direction on a randomized
///     interval; drift speed and flip unpredictability grow with difficulty.
///   - **Hunt**    — periodically locks onto the player's row and closes in,
///     committing only whole-cell moves from a fractional accumulator.
///
/// Each variant owns its own state; nothing is shared across kinds.

use rand::Rng;

use crate::domain::entity::{Body, EnemyKind};

const ZIGZAG_BASE_SPEED: f64 = 0.5;
const ZIGZAG_MAX_SPEED: f64 = 2.0;

const HUNT_BASE_SPEED: f64 = 0.8;
const HUNT_MAX_SPEED: f64 = 2.5;

/// Vertical distance under which a hunter stops adjusting.
const HUNT_DEAD_ZONE: f64 = 0.2;

#[derive(Clone, Debug)]
pub enum Behavior {
    Cruise,
    Zigzag(ZigzagState),
    Hunt(HunterState),
}

impl Behavior {
    pub fn for_kind(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Basic => Behavior::Cruise,
            EnemyKind::Zigzag => Behavior::Zigzag(ZigzagState::new()),
            EnemyKind::Hunter => Behavior::Hunt(HunterState::new()),
        }
    }

    pub fn update(
        &mut self,
        body: &mut Body,
        difficulty: f64,
        player_row: i32,
        rng: &mut impl Rng,
    ) {
        match self {
            Behavior::Cruise => {}
            Behavior::Zigzag(state) => state.update(body, difficulty, rng),
            Behavior::Hunt(state) => state.update(body, difficulty, player_row, rng),
        }
    }
}

// ── Zigzag ──

#[derive(Clone, Debug)]
pub struct ZigzagState {
    counter: u32,
    interval: u32,
    /// +1.0 drifting down, -1.0 drifting up.
    direction: f64,
}

impl ZigzagState {
    pub fn new() -> Self {
        ZigzagState {
            counter: 0,
            interval: 5,
            direction: 1.0,
        }
    }

    /// Interval bounds narrow as difficulty rises, making flips both more
    /// frequent and less predictable.
    fn interval_bounds(difficulty: f64) -> (u32, u32) {
        let min = (5 - (3.0 * difficulty) as i32).max(2) as u32;
        let max = (10 - (5.0 * difficulty) as i32).max(5) as u32;
        (min, max)
    }

    fn update(&mut self, body: &mut Body, difficulty: f64, rng: &mut impl Rng) {
        self.counter += 1;
        if self.counter >= self.interval {
            self.counter = 0;
            self.direction = -self.direction;
            let (min, max) = Self::interval_bounds(difficulty);
            self.interval = rng.gen_range(min..=max);
        }

        let speed =
            ZIGZAG_BASE_SPEED + (ZIGZAG_MAX_SPEED - ZIGZAG_BASE_SPEED) * difficulty;
        body.advance(0.0, speed * self.direction);
    }
}

// ── Hunter ──

#[derive(Clone, Debug)]
pub struct HunterState {
    counter: u32,
    interval: u32,
    target_row: Option<f64>,
    /// Fractional vertical movement pending; only whole cells are committed,
    /// so the tracking speed never drifts the floor invariant.
    accumulator: f64,
}

impl HunterState {
    pub fn new() -> Self {
        HunterState {
            counter: 0,
            interval: 10,
            target_row: None,
            accumulator: 0.0,
        }
    }

    fn update(
        &mut self,
        body: &mut Body,
        difficulty: f64,
        player_row: i32,
        rng: &mut impl Rng,
    ) {
        self.counter += 1;
        if self.counter >= self.interval || self.target_row.is_none() {
            self.counter = 0;
            self.interval = rng.gen_range(3..=5);
            self.target_row = Some(player_row as f64);
        }

        let target = match self.target_row {
            Some(t) => t,
            None => return,
        };

        if (body.fy - target).abs() > HUNT_DEAD_ZONE {
            let speed =
                HUNT_BASE_SPEED + (HUNT_MAX_SPEED - HUNT_BASE_SPEED) * difficulty;
            self.accumulator += if body.fy < target { speed } else { -speed };

            let whole = self.accumulator.trunc();
            if whole != 0.0 {
                body.advance(0.0, whole);
                self.accumulator -= whole;
            }
        }
    }
}
