/// GameSession: the complete snapshot of a running game.
///
/// One session is live at a time. The session exclusively owns every entity
/// collection (the player owns its projectile list); nothing is shared by
/// reference, so removal is always by collection membership.
///
/// `reset()` rebuilds the session in place against the current screen
/// geometry: score, level, entity sets, and the start clock all go back to
/// their initial state.

use std::time::Instant;

use rand::Rng;

use crate::domain::entity::{Enemy, Player, PowerUp};

/// Columns from the left edge where the ship starts.
const PLAYER_START_COL: i32 = 5;

/// Decorative background glyphs.
const STAR_GLYPHS: [char; 3] = ['*', '.', '+'];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    Instructions,
    Playing,
    GameOver,
}

/// A fixed background decoration. Never moves, never collides.
#[derive(Clone, Copy, Debug)]
pub struct Star {
    pub x: i32,
    pub y: i32,
    pub glyph: char,
}

pub struct GameSession {
    // ── Screen geometry (cells) ──
    pub cols: i32,
    pub rows: i32,

    // ── Entities ──
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
    pub stars: Vec<Star>,

    // ── Spawn timers (seconds on the session clock) ──
    pub last_enemy_spawn: f64,
    pub last_power_up_spawn: f64,

    // ── Difficulty inputs ──
    /// Wall-clock origin of the session clock. `elapsed()` measures from
    /// here; replaced wholesale by `reset()`.
    pub started_at: Instant,

    // ── Meta ──
    pub phase: Phase,
    pub game_over: bool,
}

impl GameSession {
    /// An empty session sitting on the title screen.
    pub fn new(cols: i32, rows: i32) -> Self {
        GameSession {
            cols,
            rows,
            player: Player::new(PLAYER_START_COL, rows / 2),
            enemies: Vec::new(),
            power_ups: Vec::new(),
            stars: Vec::new(),
            last_enemy_spawn: 0.0,
            last_power_up_spawn: 0.0,
            started_at: Instant::now(),
            phase: Phase::Title,
            game_over: false,
        }
    }

    /// Seconds on the session clock.
    pub fn elapsed(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }

    /// Start (or restart) play against the given screen geometry.
    /// Everything transient is rebuilt; the star field is re-rolled.
    pub fn reset(&mut self, cols: i32, rows: i32, star_count: usize, rng: &mut impl Rng) {
        self.cols = cols;
        self.rows = rows;
        self.player = Player::new(PLAYER_START_COL, rows / 2);
        self.enemies.clear();
        self.power_ups.clear();
        self.stars = roll_stars(cols, rows, star_count, rng);
        self.last_enemy_spawn = 0.0;
        self.last_power_up_spawn = 0.0;
        self.started_at = Instant::now();
        self.phase = Phase::Playing;
        self.game_over = false;
    }

    /// Adopt a new terminal size mid-session. Bounds shrink or grow; the
    /// player is pulled back fully on-screen if the shrink stranded it.
    pub fn sync_screen(&mut self, cols: i32, rows: i32) {
        if cols == self.cols && rows == self.rows {
            return;
        }
        self.cols = cols;
        self.rows = rows;
        self.clamp_player();
    }

    /// Apply a one-cell movement delta, then clamp fully on-screen.
    pub fn move_player(&mut self, dx: i32, dy: i32) {
        self.player.body.advance(dx as f64, dy as f64);
        self.clamp_player();
    }

    fn clamp_player(&mut self) {
        let max_x = (self.cols - self.player.body.width() - 1).max(0);
        let max_y = (self.rows - 2).max(0);
        let x = self.player.body.x.clamp(0, max_x);
        let y = self.player.body.y.clamp(0, max_y);
        if (x, y) != (self.player.body.x, self.player.body.y) {
            self.player.body.place(x, y);
        }
    }
}

fn roll_stars(cols: i32, rows: i32, count: usize, rng: &mut impl Rng) -> Vec<Star> {
    (0..count)
        .map(|_| Star {
            x: rng.gen_range(0..cols.max(1)),
            y: rng.gen_range(0..rows.max(1)),
            glyph: STAR_GLYPHS[rng.gen_range(0..STAR_GLYPHS.len())],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn new_session_starts_on_title() {
        let s = GameSession::new(80, 24);
        assert_eq!(s.phase, Phase::Title);
        assert!(!s.game_over);
        assert!(s.enemies.is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let mut s = GameSession::new(80, 24);
        s.reset(80, 24, 15, &mut rng());
        s.player.score = 250;
        s.player.level = 2;
        s.game_over = true;
        s.phase = Phase::GameOver;
        s.enemies
            .push(crate::domain::entity::Enemy::new(40, 5, crate::domain::entity::EnemyKind::Basic, 0.0));

        s.reset(80, 24, 15, &mut rng());
        assert_eq!(s.player.score, 0);
        assert_eq!(s.player.level, 0);
        assert!(s.enemies.is_empty());
        assert!(s.power_ups.is_empty());
        assert!(s.player.projectiles.is_empty());
        assert_eq!(s.phase, Phase::Playing);
        assert!(!s.game_over);
        assert_eq!(s.last_enemy_spawn, 0.0);
        assert!(s.elapsed() < 1.0); // fresh clock
    }

    #[test]
    fn reset_rolls_stars_in_bounds() {
        let mut s = GameSession::new(60, 20);
        s.reset(60, 20, 15, &mut rng());
        assert_eq!(s.stars.len(), 15);
        for star in &s.stars {
            assert!((0..60).contains(&star.x));
            assert!((0..20).contains(&star.y));
        }
    }

    #[test]
    fn move_player_clamps_to_screen() {
        let mut s = GameSession::new(80, 24);
        s.reset(80, 24, 0, &mut rng());
        for _ in 0..100 {
            s.move_player(-1, -1);
        }
        assert_eq!((s.player.body.x, s.player.body.y), (0, 0));
        for _ in 0..200 {
            s.move_player(1, 1);
        }
        assert_eq!(s.player.body.x, 80 - s.player.body.width() - 1);
        assert_eq!(s.player.body.y, 22);
    }

    #[test]
    fn shrink_resize_pulls_player_back() {
        let mut s = GameSession::new(80, 24);
        s.reset(80, 24, 0, &mut rng());
        s.move_player(60, 0);
        s.sync_screen(40, 12);
        assert!(s.player.body.x + s.player.body.width() < 40);
        assert!(s.player.body.y <= 10);
    }
}
