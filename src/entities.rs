//! All simulation entity types: plain data plus a few accessors.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::tuning::Tuning;

/// Stable identifier handed out by `RunState::next_id`.
pub type EntityId = u64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Behaviour tag rolled once at spawn time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Ability {
    Normal,
    /// Chases at the fast speed.
    Fast,
    /// Fires aimed bullets; `cooldown_ms` counts down to the next shot.
    Shooter { cooldown_ms: f32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    /// Cleared on destruction; the entry is swept at the end of the step.
    pub alive: bool,
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub damage: f32,
    pub ability: Ability,
}

// ── Boss ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub id: EntityId,
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub damage: f32,
    pub shoot_cooldown_ms: f32,
    /// Escalation level this boss was spawned at.
    pub level: u32,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
    Boss,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: EntityId,
    pub alive: bool,
    pub owner: BulletOwner,
    pub pos: Vec2,
    /// Units per second.
    pub vel: Vec2,
    /// Fixed when the bullet is fired; later stat changes do not affect it.
    pub damage: f32,
}

// ── Powerups ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    Speed,
    Heal,
    MultiShot,
    BulletSpeed,
    Xp { amount: u32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Powerup {
    pub id: EntityId,
    pub alive: bool,
    pub pos: Vec2,
    pub kind: PowerupKind,
}

/// A static square building. Blocks movement and eats bullets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Centre of the footprint.
    pub pos: Vec2,
    pub size: f32,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub fire_rate_ms: f32,
    pub bullet_damage: f32,
    pub bullet_speed: f32,
    pub bullet_count: u32,
    pub xp: u32,
    pub level: u32,
    pub xp_to_next: u32,
}

// ── Progression ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    Damage,
    Speed,
    FireRate,
    BulletSpeed,
    Heal,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 5] = [
        UpgradeKind::Damage,
        UpgradeKind::Speed,
        UpgradeKind::FireRate,
        UpgradeKind::BulletSpeed,
        UpgradeKind::Heal,
    ];
}

/// Options shown to the player while the run is paused on a level-up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeOffer {
    pub options: Vec<UpgradeKind>,
}

// ── Run status, input, events ─────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    /// Frozen until `submit_upgrade` is called.
    AwaitingUpgrade,
    Lost,
    Won,
}

/// Directional intent for one step. Several directions may be held at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Intent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Notifications for the presentation collaborator, drained once per frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Flash the player.
    PlayerDamaged { amount: f32, health: f32 },
    EnemyHit { id: EntityId, pos: Vec2 },
    EnemyKilled { id: EntityId, pos: Vec2 },
    AmbushSpawned { count: u32 },
    BossSpawned { level: u32, pos: Vec2 },
    /// Shake the camera.
    BossDefeated { level: u32, pos: Vec2 },
    PowerupCollected { kind: PowerupKind },
    LevelUp { level: u32 },
    UpgradeOffered { options: Vec<UpgradeKind> },
    UpgradeApplied { kind: UpgradeKind },
    RunEnded { status: GameStatus, elapsed_secs: u64, score: u32 },
}

/// Accumulators in milliseconds. None of them advance while the run is paused.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timers {
    pub spawn_ms: f32,
    pub ambush_ms: f32,
    /// Randomised delay before the next ambush.
    pub next_ambush_ms: f32,
    pub powerup_ms: f32,
    pub since_last_shot_ms: f32,
    pub elapsed_ms: f64,
}

// ── Master run state ──────────────────────────────────────────────────────────

/// Everything that changes during one run. Replaying means building a new one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunState {
    pub tuning: Tuning,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub powerups: Vec<Powerup>,
    pub obstacles: Vec<Obstacle>,
    /// At most one boss is alive; an empty slot disables all boss resolution.
    pub boss: Option<Boss>,
    pub score: u32,
    pub kills: u32,
    /// Level of the next boss to spawn.
    pub boss_level: u32,
    pub next_boss_score: u32,
    pub enemy_level_multiplier: f32,
    pub timers: Timers,
    pub status: GameStatus,
    pub pending_upgrade: Option<UpgradeOffer>,
    /// Level-ups still waiting for an offer after the current one.
    pub queued_upgrades: u32,
    pub next_id: EntityId,
    pub events: Vec<SimEvent>,
}

impl RunState {
    pub fn alloc_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whole seconds survived so far.
    pub fn elapsed_secs(&self) -> u64 {
        (self.timers.elapsed_ms / 1000.0).floor() as u64
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Lost | GameStatus::Won)
    }

    pub fn live_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    /// Serialise the whole run for a renderer or a debugging dump.
    pub fn snapshot_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string(self)?)
    }
}
