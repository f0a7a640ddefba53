/// The step function: advances a playing session by one tick.
///
/// Processing order:
///   1. Power-up expiry on the player
///   2. Difficulty refresh (never cached across ticks)
///   3. Spawn checks (enemies, power-ups)
///   4. Movement: projectiles, power-ups, enemies
///   5. Off-screen culling (never scored)
///   6. Upgrade check
///   7. Collision resolution
///
/// Collision never mutates collections while scanning them: each pass
/// computes removal index sets, then applies them once, back to front.
/// A lethal player contact wins over anything else that tick: the game-over
/// flag is set and the rest of the pass is abandoned.

use rand::Rng;

use crate::domain::difficulty::difficulty;
use crate::domain::entity::{PowerUpKind, POWER_UP_DURATION};
use crate::domain::physics::collides;
use crate::sim::event::GameEvent;
use crate::sim::spawn;
use crate::sim::world::{GameSession, Phase};

/// Pickup collision margin, deliberately generous.
const PICKUP_MARGIN: i32 = 3;

/// Flat score bonus for collecting any power-up.
const PICKUP_BONUS: u32 = 5;

pub fn step(world: &mut GameSession, now: f64, rng: &mut impl Rng) -> Vec<GameEvent> {
    let mut events: Vec<GameEvent> = Vec::new();
    if world.phase != Phase::Playing || world.game_over {
        return events;
    }

    world.player.tick_power_ups(now);

    let d = difficulty(now, world.player.score);

    spawn::maybe_spawn_enemy(world, now, d, rng, &mut events);
    spawn::maybe_spawn_power_up(world, now, d, rng, &mut events);

    // Movement. The player has already moved via input; everything else
    // advances here, then leaves the screen or faces the collision pass.
    let cols = world.cols;
    world.player.update_projectiles(cols);
    for p in world.power_ups.iter_mut() {
        p.update();
    }
    let player_row = world.player.body.y;
    for e in world.enemies.iter_mut() {
        e.update(player_row, rng);
    }
    cull_off_screen(world);

    if world.player.check_upgrade(now) {
        events.push(GameEvent::ShipUpgraded {
            level: world.player.level,
        });
    }

    resolve_collisions(world, now, &mut events);

    events
}

/// Drop everything that left the visible column/row range. Not scored.
fn cull_off_screen(world: &mut GameSession) {
    let (cols, rows) = (world.cols, world.rows);
    world
        .power_ups
        .retain(|p| p.body.x >= 0 && p.body.x <= cols && p.body.y >= 0 && p.body.y <= rows);
    world.enemies.retain(|e| {
        e.body.x + e.body.width() >= 0 && e.body.x <= cols && e.body.y >= 0 && e.body.y <= rows
    });
}

/// One collision pass per tick, after all movement.
///
/// Order matters and is observable:
///   1. power-up pickups (margin 3)
///   2. enemy vs player, per enemy, before that enemy's projectile scan;
///      an unprotected hit ends the game and abandons the pass
///   3. enemy vs projectiles, first match wins
fn resolve_collisions(world: &mut GameSession, now: f64, events: &mut Vec<GameEvent>) {
    // ── Power-up pickups ──
    let mut collected: Vec<usize> = Vec::new();
    for (i, power_up) in world.power_ups.iter().enumerate() {
        if collides(&power_up.body, &world.player.body, PICKUP_MARGIN) {
            collected.push(i);
        }
    }
    for &i in collected.iter().rev() {
        let power_up = world.power_ups.remove(i);
        apply_power_up(world, power_up.kind, now);
        world.player.score += PICKUP_BONUS;
        events.push(GameEvent::PowerUpCollected {
            kind: power_up.kind,
        });
    }

    // ── Enemies: player contact first, then projectiles ──
    let mut dead_enemies: Vec<usize> = Vec::new();
    let mut spent_projectiles: Vec<usize> = Vec::new();

    'enemies: for (ei, enemy) in world.enemies.iter().enumerate() {
        if collides(&enemy.body, &world.player.body, 0) {
            if world.player.invincible {
                // lethal to the touch, no score for stomps
                dead_enemies.push(ei);
                events.push(GameEvent::EnemyStomped { kind: enemy.kind });
            } else if world.player.shield {
                world.player.shield = false;
                world
                    .player
                    .set_message("SHIELD DEACTIVATED!".to_string(), now);
                dead_enemies.push(ei);
                events.push(GameEvent::ShieldBroken);
            } else {
                world.game_over = true;
                events.push(GameEvent::PlayerKilled {
                    score: world.player.score,
                });
                break 'enemies;
            }
            // player contact resolved this enemy; no projectile scan for it
            continue;
        }

        for (pi, projectile) in world.player.projectiles.iter().enumerate() {
            if spent_projectiles.contains(&pi) {
                continue;
            }
            if collides(&enemy.body, &projectile.body, 0) {
                dead_enemies.push(ei);
                spent_projectiles.push(pi);
                world.player.score += enemy.kind.points();
                events.push(GameEvent::EnemyShot {
                    kind: enemy.kind,
                    points: enemy.kind.points(),
                });
                break;
            }
        }
    }

    // Apply removal sets back to front so earlier indices stay valid. Kills
    // recorded before a lethal contact still count.
    for &i in dead_enemies.iter().rev() {
        world.enemies.remove(i);
    }
    spent_projectiles.sort_unstable();
    for &i in spent_projectiles.iter().rev() {
        world.player.projectiles.remove(i);
    }
}

fn apply_power_up(world: &mut GameSession, kind: PowerUpKind, now: f64) {
    let player = &mut world.player;
    let message = match kind {
        PowerUpKind::Shield => {
            player.shield = true;
            player.shield_until = now + POWER_UP_DURATION;
            "SHIELD ACTIVATED!"
        }
        PowerUpKind::RapidFire => {
            player.rapid_fire = true;
            player.rapid_until = now + POWER_UP_DURATION;
            "RAPID FIRE ACTIVATED!"
        }
        PowerUpKind::Invincibility => {
            player.invincible = true;
            player.invincible_until = now + POWER_UP_DURATION;
            "INVINCIBILITY ACTIVATED!"
        }
        // no dedicated effect: the flat pickup bonus is the whole reward
        _ => "POWER-UP COLLECTED!",
    };
    player.set_message(message.to_string(), now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::domain::entity::{Enemy, EnemyKind, PowerUp, Projectile};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    /// A playing session with no stars and the spawn timers pushed far into
    /// the future so tests control the entity population exactly.
    fn quiet_session() -> GameSession {
        let mut s = GameSession::new(80, 24);
        s.reset(80, 24, 0, &mut rng());
        s.last_enemy_spawn = 1e9;
        s.last_power_up_spawn = 1e9;
        s
    }

    fn enemy_on_player(world: &GameSession, kind: EnemyKind) -> Enemy {
        Enemy::new(world.player.body.x, world.player.body.y, kind, 0.0)
    }

    #[test]
    fn unprotected_contact_sets_game_over() {
        let mut world = quiet_session();
        let e = enemy_on_player(&world, EnemyKind::Basic);
        world.enemies.push(e);
        let score_before = world.player.score;

        step(&mut world, 1.0, &mut rng());

        assert!(world.game_over);
        assert_eq!(world.player.score, score_before);
    }

    #[test]
    fn adjacent_enemy_kills_on_next_tick() {
        let mut world = quiet_session();
        // directly right of the ship's last column, drifting left at 1.0
        let px = world.player.body.x + world.player.body.width();
        let py = world.player.body.y;
        world.enemies.push(Enemy::new(px, py, EnemyKind::Basic, 0.0));

        step(&mut world, 1.0, &mut rng());

        assert!(world.game_over);
        assert_eq!(world.player.score, 0);
    }

    #[test]
    fn invincible_contact_destroys_enemy_without_score() {
        let mut world = quiet_session();
        world.player.invincible = true;
        world.player.invincible_until = 100.0;
        let e = enemy_on_player(&world, EnemyKind::Hunter);
        world.enemies.push(e);

        step(&mut world, 1.0, &mut rng());

        assert!(!world.game_over);
        assert!(world.enemies.is_empty());
        assert_eq!(world.player.score, 0);
    }

    #[test]
    fn shield_absorbs_one_contact() {
        let mut world = quiet_session();
        world.player.shield = true;
        world.player.shield_until = 100.0;
        let e = enemy_on_player(&world, EnemyKind::Basic);
        world.enemies.push(e);

        step(&mut world, 1.0, &mut rng());

        assert!(!world.game_over);
        assert!(world.enemies.is_empty());
        assert!(!world.player.shield);
        assert_eq!(world.player.score, 0);
        assert_eq!(world.player.message, "SHIELD DEACTIVATED!");
    }

    #[test]
    fn projectile_kill_scores_by_kind() {
        for (kind, points) in [
            (EnemyKind::Basic, 10),
            (EnemyKind::Zigzag, 15),
            (EnemyKind::Hunter, 20),
        ] {
            let mut world = quiet_session();
            // enemy away from the player, projectile overlapping the enemy
            // post-movement (enemy moves -1, projectile +1)
            world.enemies.push(Enemy::new(41, 5, kind, 0.0));
            world
                .player
                .projectiles
                .push(Projectile::new(39, 5, 1, false));

            step(&mut world, 1.0, &mut rng());

            assert!(world.enemies.is_empty(), "{kind:?} survived");
            assert!(world.player.projectiles.is_empty());
            assert_eq!(world.player.score, points);
            assert!(!world.game_over);
        }
    }

    #[test]
    fn one_projectile_spent_per_enemy() {
        let mut world = quiet_session();
        world.enemies.push(Enemy::new(41, 5, EnemyKind::Basic, 0.0));
        world
            .player
            .projectiles
            .push(Projectile::new(39, 5, 1, false));
        world
            .player
            .projectiles
            .push(Projectile::new(38, 5, 1, false));

        step(&mut world, 1.0, &mut rng());

        // the second projectile keeps flying
        assert_eq!(world.player.projectiles.len(), 1);
        assert_eq!(world.player.score, 10);
    }

    #[test]
    fn player_contact_beats_projectile_kill() {
        let mut world = quiet_session();
        // enemy that will touch the player AND a projectile this tick
        let e = enemy_on_player(&world, EnemyKind::Basic);
        let ex = e.body.x;
        let ey = e.body.y;
        world.enemies.push(e);
        world
            .player
            .projectiles
            .push(Projectile::new(ex - 1, ey, 1, false));

        step(&mut world, 1.0, &mut rng());

        // lethal contact wins: game over, no points, projectile unspent
        assert!(world.game_over);
        assert_eq!(world.player.score, 0);
    }

    #[test]
    fn pickup_applies_effect_and_bonus() {
        let mut world = quiet_session();
        let (px, py) = (world.player.body.x, world.player.body.y);
        world
            .power_ups
            .push(PowerUp::new(px + 2, py + 2, PowerUpKind::Shield));

        step(&mut world, 1.0, &mut rng());

        assert!(world.power_ups.is_empty());
        assert!(world.player.shield);
        assert_eq!(world.player.shield_until, 1.0 + POWER_UP_DURATION);
        assert_eq!(world.player.score, PICKUP_BONUS);
        assert_eq!(world.player.message, "SHIELD ACTIVATED!");
    }

    #[test]
    fn pickup_margin_is_generous_but_bounded() {
        let mut world = quiet_session();
        let (px, py) = (world.player.body.x, world.player.body.y);
        // 5 rows away: outside margin 3 even after the leftward drift
        world
            .power_ups
            .push(PowerUp::new(px, py + 5, PowerUpKind::RapidFire));

        step(&mut world, 1.0, &mut rng());

        assert_eq!(world.power_ups.len(), 1);
        assert!(!world.player.rapid_fire);
    }

    #[test]
    fn extra_life_kind_takes_flat_bonus_path() {
        let mut world = quiet_session();
        let (px, py) = (world.player.body.x, world.player.body.y);
        world
            .power_ups
            .push(PowerUp::new(px + 2, py, PowerUpKind::ExtraLife));

        step(&mut world, 1.0, &mut rng());

        assert!(!world.player.shield && !world.player.rapid_fire && !world.player.invincible);
        assert_eq!(world.player.score, PICKUP_BONUS);
        assert_eq!(world.player.message, "POWER-UP COLLECTED!");
    }

    #[test]
    fn culling_is_not_scored() {
        let mut world = quiet_session();
        world.enemies.push(Enemy::new(-20, 5, EnemyKind::Basic, 0.0));
        world
            .power_ups
            .push(PowerUp::new(-5, 30, PowerUpKind::Shield));

        step(&mut world, 1.0, &mut rng());

        assert!(world.enemies.is_empty());
        assert!(world.power_ups.is_empty());
        assert_eq!(world.player.score, 0);
        assert!(!world.player.shield);
    }

    #[test]
    fn game_over_freezes_the_simulation() {
        let mut world = quiet_session();
        world.game_over = true;
        world.enemies.push(Enemy::new(60, 5, EnemyKind::Basic, 0.0));

        let events = step(&mut world, 1.0, &mut rng());

        assert!(events.is_empty());
        assert_eq!(world.enemies[0].body.x, 60); // nothing moved
    }

    #[test]
    fn score_from_kills_feeds_upgrade_next_tick() {
        let mut world = quiet_session();
        world.player.score = 95;
        world.enemies.push(Enemy::new(41, 5, EnemyKind::Basic, 0.0));
        world
            .player
            .projectiles
            .push(Projectile::new(39, 5, 1, false));

        step(&mut world, 1.0, &mut rng());
        assert_eq!(world.player.score, 105);
        assert_eq!(world.player.level, 0); // upgrade check ran before scoring

        step(&mut world, 2.0, &mut rng());
        assert_eq!(world.player.level, 1);
    }
}
