/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` (a grid of Cells)
///   2. Compare each cell with `back` (the previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. Commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Draw targets outside the current grid are dropped silently by
/// `FrameBuffer::set`, so a shrink-resize mid-frame can never write out of
/// bounds or abort a frame.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Body, LEVEL_THRESHOLDS};
use crate::sim::world::{GameSession, Phase};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bold: bool,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bold: false,
    };

    /// Sentinel used to invalidate the back buffer. Different from any real
    /// cell, so every position gets diff'd on the next flush.
    const INVALID: Cell = Cell {
        ch: '\0',
        fg: Color::Magenta,
        bold: false,
    };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// Out-of-bounds targets are skipped, never an error.
    fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.cells[y as usize * self.width + x as usize] = cell;
        }
    }

    fn put_str(&mut self, x: i32, y: i32, s: &str, fg: Color, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, Cell { ch, fg, bold });
        }
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on the first frame.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &GameSession) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, Clear(ClearType::All))?;
        }

        // Phase change: clear for a clean transition
        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        self.front.clear();

        match world.phase {
            Phase::Title => self.compose_title(),
            Phase::Instructions => self.compose_instructions(),
            Phase::Playing => self.compose_game(world),
            Phase::GameOver => {
                self.compose_game(world);
                self.compose_game_over(world);
            }
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Screens ──

    const TITLE_ART: [&'static str; 9] = [
        r"  ____  _             ____       _     _ ",
        r" / ___|| |_ __ _ _ __|  _ \ __ _(_) __| |",
        r" \___ \| __/ _` | '__| |_) / _` | |/ _` |",
        r"  ___) | || (_| | |  |  _ < (_| | | (_| |",
        r" |____/ \__\__,_|_|  |_| \_\__,_|_|\__,_|",
        "",
        "        A TERMINAL SPACE ADVENTURE",
        "",
        "   Press ENTER to start, 'q' to quit",
    ];

    fn compose_title(&mut self) {
        let top = (self.term_h.saturating_sub(Self::TITLE_ART.len())) / 2;
        for (i, line) in Self::TITLE_ART.iter().enumerate() {
            self.put_centered(top as i32 + i as i32, line, Color::White, true);
        }
    }

    const INSTRUCTIONS: [&'static str; 18] = [
        "HOW TO PLAY",
        "",
        "Arrow keys: Move your ship",
        "Spacebar: Fire weapons",
        "q or ESC: Quit the game",
        "",
        "Power-ups:",
        "⊕ - Shield (absorbs one hit)",
        "↯ - Rapid Fire (shoot faster)",
        "★ - Invincibility (lethal to enemies on contact)",
        "",
        "Ship Upgrades:",
        "Level 2 (100 pts): faster hull",
        "Level 3 (200 pts): adds diagonal shots",
        "Level 4 (300 pts): ultimate ship",
        "",
        "Destroy enemy ships to earn points. Don't get hit!",
        "Press ENTER to continue",
    ];

    fn compose_instructions(&mut self) {
        let top = (self.term_h.saturating_sub(Self::INSTRUCTIONS.len())) / 2;
        for (i, line) in Self::INSTRUCTIONS.iter().enumerate() {
            self.put_centered(top as i32 + i as i32, line, Color::White, false);
        }
    }

    // ── Playfield ──

    fn compose_game(&mut self, world: &GameSession) {
        let now = world.elapsed();

        for star in &world.stars {
            self.front.set(
                star.x,
                star.y,
                Cell {
                    ch: star.glyph,
                    fg: Color::Cyan,
                    bold: false,
                },
            );
        }

        for power_up in &world.power_ups {
            self.draw_body(&power_up.body, Color::Magenta);
        }
        for enemy in &world.enemies {
            self.draw_body(&enemy.body, Color::Red);
        }
        for projectile in &world.player.projectiles {
            let fg = if projectile.rapid {
                Color::DarkYellow
            } else {
                Color::Yellow
            };
            self.draw_body(&projectile.body, fg);
        }
        self.draw_body(&world.player.body, Color::Green);

        // Shield visual: brackets hugging the hull
        if world.player.shield {
            let body = &world.player.body;
            self.front.set(
                body.x - 1,
                body.y,
                Cell {
                    ch: '[',
                    fg: Color::Blue,
                    bold: false,
                },
            );
            self.front.set(
                body.x + body.width(),
                body.y,
                Cell {
                    ch: ']',
                    fg: Color::Blue,
                    bold: false,
                },
            );
        }

        self.compose_hud(world, now);
    }

    fn compose_hud(&mut self, world: &GameSession, now: f64) {
        let player = &world.player;
        self.front
            .put_str(0, 0, &format!("Score: {}", player.score), Color::White, false);

        let mut status_row = 1;
        if now < player.shield_until {
            let left = (player.shield_until - now) as u32;
            self.front.put_str(
                0,
                status_row,
                &format!("Shield: {left}s"),
                Color::Blue,
                false,
            );
            status_row += 1;
        }
        if now < player.rapid_until {
            let left = (player.rapid_until - now) as u32;
            self.front.put_str(
                0,
                status_row,
                &format!("Rapid Fire: {left}s"),
                Color::Yellow,
                false,
            );
            status_row += 1;
        }
        if now < player.invincible_until {
            let left = (player.invincible_until - now) as u32;
            self.front.put_str(
                0,
                status_row,
                &format!("Invincible: {left}s"),
                Color::Red,
                false,
            );
            status_row += 1;
        }

        self.front.put_str(
            0,
            status_row,
            &format!("Ship Level: {}", player.level + 1),
            Color::White,
            false,
        );

        if player.level < 3 {
            let next = LEVEL_THRESHOLDS[player.level as usize];
            if next > player.score {
                self.front.put_str(
                    0,
                    status_row + 1,
                    &format!("Points to next upgrade: {}", next - player.score),
                    Color::White,
                    false,
                );
            }
        }

        if player.message_visible(now) {
            let fg = if player.message.contains("SHIELD") {
                Color::Blue
            } else if player.message.contains("FIRE") {
                Color::Yellow
            } else if player.message.contains("INVINCIBILITY") {
                Color::Red
            } else {
                Color::Green
            };
            self.put_centered(world.rows - 4, &player.message, fg, true);
        }
    }

    fn compose_game_over(&mut self, world: &GameSession) {
        let mid = world.rows / 2 - 1;
        let line = format!("GAME OVER - Final Score: {}", world.player.score);
        self.put_centered(mid, &line, Color::White, true);
        self.put_centered(mid + 2, "Press 'r' to play again, 'q' to quit", Color::White, true);
    }

    // ── Helpers ──

    fn draw_body(&mut self, body: &Body, fg: Color) {
        self.front.put_str(body.x, body.y, body.glyph, fg, false);
    }

    fn put_centered(&mut self, y: i32, s: &str, fg: Color, bold: bool) {
        let x = (self.term_w as i32 - s.chars().count() as i32) / 2;
        self.front.put_str(x.max(0), y, s, fg, bold);
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::Reset;
        let mut last_bold = false;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetAttribute(Attribute::Reset))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.cells[y * self.front.width + x];
                if cell == self.back.cells[y * self.back.width + x] {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.bold != last_bold {
                    let attr = if cell.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    };
                    queue!(self.writer, SetAttribute(attr))?;
                    last_bold = cell.bold;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}
