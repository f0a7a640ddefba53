/// Entities: Body (shared base), Projectile, PowerUp, Enemy, Player.
///
/// Every on-screen thing is a `Body` plus type-specific state. Positions are
/// kept twice: the fractional pair `(fx, fy)` accumulates velocity, the
/// integer pair `(x, y)` is its floor and is what rendering and collision
/// see. `advance()` is the only way positions change, so the floor invariant
/// holds everywhere.

use crate::domain::ai::Behavior;

// ── Body: shared entity base ──

#[derive(Clone, Debug)]
pub struct Body {
    pub x: i32,
    pub y: i32,
    pub fx: f64,
    pub fy: f64,
    pub glyph: &'static str,
    pub facing: i32,
}

impl Body {
    pub fn new(x: i32, y: i32, glyph: &'static str, facing: i32) -> Self {
        Body {
            x,
            y,
            fx: x as f64,
            fy: y as f64,
            glyph,
            facing,
        }
    }

    /// Width in cells = glyph length.
    pub fn width(&self) -> i32 {
        self.glyph.chars().count() as i32
    }

    /// Add a (possibly fractional) velocity, then snap the integer cell to
    /// the floor of the fractional position. Slow speeds accumulate across
    /// ticks instead of being lost to rounding.
    pub fn advance(&mut self, dx: f64, dy: f64) {
        self.fx += dx;
        self.fy += dy;
        self.x = self.fx.floor() as i32;
        self.y = self.fy.floor() as i32;
    }

    /// Teleport to an exact cell, resetting the fractional position too.
    /// Used when clamping to screen bounds.
    pub fn place(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
        self.fx = x as f64;
        self.fy = y as f64;
    }

    /// Swap the glyph, keeping position. Width changes with it.
    pub fn set_glyph(&mut self, glyph: &'static str) {
        self.glyph = glyph;
    }
}

// ── Projectiles ──

pub const PROJECTILE_SPEED: f64 = 1.0;
pub const RAPID_PROJECTILE_SPEED: f64 = 1.5;

#[derive(Clone, Debug)]
pub struct Projectile {
    pub body: Body,
    pub speed: f64,
    pub rapid: bool,
}

impl Projectile {
    pub fn new(x: i32, y: i32, facing: i32, rapid: bool) -> Self {
        let glyph = match (rapid, facing > 0) {
            (true, true) => "⇒",
            (true, false) => "⇐",
            (false, true) => "->",
            (false, false) => "<",
        };
        let base = if rapid {
            RAPID_PROJECTILE_SPEED
        } else {
            PROJECTILE_SPEED
        };
        Projectile {
            body: Body::new(x, y, glyph, facing),
            speed: base * facing as f64,
            rapid,
        }
    }

    pub fn update(&mut self) {
        self.body.advance(self.speed, 0.0);
    }
}

// ── Power-ups ──

/// Leftward drift, cells per tick.
pub const POWER_UP_DRIFT: f64 = -1.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PowerUpKind {
    Shield,
    RapidFire,
    Invincibility,
    #[allow(dead_code)]
    ExtraLife,
}

impl PowerUpKind {
    pub fn glyph(self) -> &'static str {
        match self {
            PowerUpKind::Shield => "⊕",
            PowerUpKind::RapidFire => "↯",
            PowerUpKind::Invincibility => "★",
            PowerUpKind::ExtraLife => "♥",
        }
    }
}

#[derive(Clone, Debug)]
pub struct PowerUp {
    pub body: Body,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn new(x: i32, y: i32, kind: PowerUpKind) -> Self {
        PowerUp {
            body: Body::new(x, y, kind.glyph(), -1),
            kind,
        }
    }

    pub fn update(&mut self) {
        self.body.advance(POWER_UP_DRIFT, 0.0);
    }
}

// ── Enemies ──

/// Enemy kinds and their tuning tables.
/// Properties are queried via methods, not stored per instance,
/// so kind semantics are centralized here.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EnemyKind {
    Basic,
    Zigzag,
    Hunter,
}

impl EnemyKind {
    pub fn glyph(self) -> &'static str {
        match self {
            EnemyKind::Basic => "<<=+=>>",
            EnemyKind::Zigzag => "-=+::+=-",
            EnemyKind::Hunter => "<+==+<",
        }
    }

    /// Horizontal speed at difficulty 0.
    pub fn base_speed(self) -> f64 {
        match self {
            EnemyKind::Basic => 1.0,
            EnemyKind::Zigzag => 1.2,
            EnemyKind::Hunter => 0.9,
        }
    }

    /// Horizontal speed at difficulty 1.
    pub fn max_speed(self) -> f64 {
        match self {
            EnemyKind::Basic => 3.0,
            EnemyKind::Zigzag => 3.5,
            EnemyKind::Hunter => 3.2,
        }
    }

    /// Points awarded for a projectile kill.
    pub fn points(self) -> u32 {
        match self {
            EnemyKind::Basic => 10,
            EnemyKind::Zigzag => 15,
            EnemyKind::Hunter => 20,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    /// Signed horizontal speed, interpolated between the kind's base and max
    /// by the difficulty active at spawn time. Frozen for this enemy's life.
    pub speed: f64,
    /// Spawn-time difficulty; also drives behavior intensity.
    pub difficulty: f64,
    pub behavior: Behavior,
}

impl Enemy {
    pub fn new(x: i32, y: i32, kind: EnemyKind, difficulty: f64) -> Self {
        let magnitude =
            kind.base_speed() + (kind.max_speed() - kind.base_speed()) * difficulty;
        Enemy {
            body: Body::new(x, y, kind.glyph(), -1),
            kind,
            speed: -magnitude,
            difficulty,
            behavior: Behavior::for_kind(kind),
        }
    }

    /// One tick: constant horizontal drift, then the kind-specific vertical
    /// behavior. `player_row` feeds hunter re-targeting.
    pub fn update(&mut self, player_row: i32, rng: &mut impl rand::Rng) {
        self.body.advance(self.speed, 0.0);
        let difficulty = self.difficulty;
        self.behavior
            .update(&mut self.body, difficulty, player_row, rng);
    }
}

// ── Player ──

/// Ship appearance per upgrade level.
pub const SHIP_GLYPHS: [&str; 4] = ["{-+==+-}", "<-=:::=->", "{+-=^=-+}>", ">[=X=]>"];

/// Score thresholds for levels 1..=3. One-way: levels never drop.
pub const LEVEL_THRESHOLDS: [u32; 3] = [100, 200, 300];

/// All three power-up effects share one duration, seconds.
pub const POWER_UP_DURATION: f64 = 4.0;

pub const NORMAL_COOLDOWN: f64 = 0.3;
pub const RAPID_COOLDOWN: f64 = 0.1;

/// How long the status banner stays on screen, seconds.
pub const MESSAGE_DURATION: f64 = 3.0;

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub score: u32,
    pub level: u8,
    #[allow(dead_code)]
    pub lives: u32,
    pub projectiles: Vec<Projectile>,
    pub last_shot: f64,

    // Power-up flags, each with its own expiry timestamp.
    pub shield: bool,
    pub rapid_fire: bool,
    pub invincible: bool,
    pub shield_until: f64,
    pub rapid_until: f64,
    pub invincible_until: f64,

    /// Transient UI feedback (upgrades, pickups, shield loss).
    pub message: String,
    pub message_at: f64,
}

impl Player {
    pub fn new(x: i32, y: i32) -> Self {
        Player {
            body: Body::new(x, y, SHIP_GLYPHS[0], 1),
            score: 0,
            level: 0,
            lives: 1,
            projectiles: Vec::new(),
            last_shot: 0.0,
            shield: false,
            rapid_fire: false,
            invincible: false,
            shield_until: 0.0,
            rapid_until: 0.0,
            invincible_until: 0.0,
            message: String::new(),
            message_at: 0.0,
        }
    }

    pub fn cooldown(&self) -> f64 {
        if self.rapid_fire {
            RAPID_COOLDOWN
        } else {
            NORMAL_COOLDOWN
        }
    }

    /// Fire from the ship's leading edge if the cooldown allows.
    /// Level 2+ ships add one shot a row above and one below, each skipped
    /// near the screen edge. Returns whether anything was fired.
    pub fn shoot(&mut self, now: f64, rows: i32) -> bool {
        if now - self.last_shot <= self.cooldown() {
            return false;
        }
        let (x, y) = (self.body.x, self.body.y);
        let muzzle = x + self.body.width();
        let facing = self.body.facing;

        self.projectiles
            .push(Projectile::new(muzzle, y, facing, self.rapid_fire));

        if self.level >= 2 {
            if y > 1 {
                self.projectiles
                    .push(Projectile::new(muzzle, y - 1, facing, self.rapid_fire));
            }
            if y < rows - 2 {
                self.projectiles
                    .push(Projectile::new(muzzle, y + 1, facing, self.rapid_fire));
            }
        }

        self.last_shot = now;
        true
    }

    /// Advance all projectiles and drop the ones that left the column range.
    pub fn update_projectiles(&mut self, cols: i32) {
        for p in self.projectiles.iter_mut() {
            p.update();
        }
        self.projectiles.retain(|p| p.body.x >= 0 && p.body.x <= cols);
    }

    /// Clear any power-up flag whose expiry has passed. The three flags are
    /// independent timers.
    pub fn tick_power_ups(&mut self, now: f64) {
        if now > self.shield_until {
            self.shield = false;
        }
        if now > self.rapid_until {
            self.rapid_fire = false;
        }
        if now > self.invincible_until {
            self.invincible = false;
        }
    }

    /// Threshold-gated, one-way level transitions. On an upgrade the ship
    /// glyph changes and a banner is set. Returns true if the level rose.
    pub fn check_upgrade(&mut self, now: f64) -> bool {
        let old = self.level;

        if self.score >= LEVEL_THRESHOLDS[2] && self.level < 3 {
            self.level = 3;
        } else if self.score >= LEVEL_THRESHOLDS[1] && self.level < 2 {
            self.level = 2;
        } else if self.score >= LEVEL_THRESHOLDS[0] && self.level < 1 {
            self.level = 1;
        }

        if self.level > old {
            self.body.set_glyph(SHIP_GLYPHS[self.level as usize]);
            self.set_message(format!("SHIP UPGRADED! LEVEL {}", self.level + 1), now);
            return true;
        }
        false
    }

    pub fn set_message(&mut self, message: String, now: f64) {
        self.message = message;
        self.message_at = now;
    }

    pub fn message_visible(&self, now: f64) -> bool {
        !self.message.is_empty() && now - self.message_at < MESSAGE_DURATION
    }
}
