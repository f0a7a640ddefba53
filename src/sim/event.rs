/// Events emitted during a simulation step.
/// The outer loop consumes these for logging and session transitions.

use crate::domain::entity::{EnemyKind, PowerUpKind};

#[derive(Clone, Debug)]
#[allow(dead_code)]
pub enum GameEvent {
    EnemySpawned { kind: EnemyKind },
    PowerUpSpawned { kind: PowerUpKind },
    PowerUpCollected { kind: PowerUpKind },
    EnemyShot { kind: EnemyKind, points: u32 },
    EnemyStomped { kind: EnemyKind },
    ShieldBroken,
    ShipUpgraded { level: u8 },
    PlayerKilled { score: u32 },
}
