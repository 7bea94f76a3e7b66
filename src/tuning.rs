//! Gameplay tuning. Every balancing constant lives here.
//!
//! Each group deserializes with `#[serde(default)]`, so a JSON override only
//! needs the fields it changes.

use serde::{Deserialize, Serialize};

use crate::error::SimError;

// ── World ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    /// Side length of the square world, in world units.
    pub size: f32,
    pub obstacle_count: u32,
    /// Side length of one square obstacle.
    pub obstacle_size: f32,
    /// Obstacles are never placed closer than this to a world edge.
    pub obstacle_margin: f32,
    /// Surviving this many seconds wins the run. `None` keeps survival open-ended.
    pub win_time_secs: Option<u32>,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            size: 2000.0,
            obstacle_count: 40,
            obstacle_size: 60.0,
            obstacle_margin: 100.0,
            win_time_secs: None,
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub health: f32,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Minimum milliseconds between two volleys.
    pub fire_rate_ms: f32,
    pub bullet_damage: f32,
    pub bullet_speed: f32,
    pub bullet_count: u32,
    pub radius: f32,
    pub bullet_radius: f32,
    /// Fire automatically at the nearest target. When false the input
    /// collaborator drives `combat::player_shoot` instead.
    pub autofire: bool,
    pub autofire_radius: f32,
    /// Angle between neighbouring bullets of one volley, in radians.
    pub fan_spread: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            health: 100.0,
            speed: 200.0,
            fire_rate_ms: 300.0,
            bullet_damage: 20.0,
            bullet_speed: 500.0,
            bullet_count: 1,
            radius: 15.0,
            bullet_radius: 5.0,
            autofire: true,
            autofire_radius: 250.0,
            fan_spread: 0.1,
        }
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub base_health: f32,
    pub base_damage: f32,
    pub speed: f32,
    pub fast_speed: f32,
    pub radius: f32,
    pub spawn_interval_ms: f32,
    /// Hold regular spawns while a boss is alive.
    pub pause_spawns_during_boss: bool,
    pub shoot_cooldown_ms: f32,
    pub shoot_range: f32,
    pub bullet_speed: f32,
    pub ambush_min_ms: f32,
    pub ambush_max_ms: f32,
    pub ambush_size: u32,
    pub ambush_radius: f32,
    pub kill_score: u32,
    pub kill_xp: u32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            base_health: 40.0,
            base_damage: 10.0,
            speed: 100.0,
            fast_speed: 180.0,
            radius: 15.0,
            spawn_interval_ms: 2000.0,
            pause_spawns_during_boss: false,
            shoot_cooldown_ms: 2000.0,
            shoot_range: 400.0,
            bullet_speed: 250.0,
            ambush_min_ms: 15_000.0,
            ambush_max_ms: 30_000.0,
            ambush_size: 5,
            ambush_radius: 150.0,
            kill_score: 15,
            kill_xp: 5,
        }
    }
}

// ── Boss ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub base_health: f32,
    pub base_damage: f32,
    pub speed: f32,
    pub radius: f32,
    pub shoot_cooldown_ms: f32,
    pub bullet_speed: f32,
    /// Score at which the first boss appears.
    pub first_score: u32,
    /// Added to the boss threshold after every defeat.
    pub score_step: u32,
    pub kill_score: u32,
    pub kill_xp: u32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            base_health: 500.0,
            base_damage: 25.0,
            speed: 60.0,
            radius: 30.0,
            shoot_cooldown_ms: 1500.0,
            bullet_speed: 300.0,
            first_score: 200,
            score_step: 200,
            kill_score: 150,
            kill_xp: 20,
        }
    }
}

// ── Powerups & loot ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerupTuning {
    pub interval_ms: f32,
    /// Inset from the world edge for periodic powerups.
    pub margin: f32,
    pub radius: f32,
    pub xp_amount: u32,
    /// Chance out of 100 that a kill drops a powerup.
    pub loot_chance_percent: u32,
    pub speed_bonus: f32,
    pub heal_amount: f32,
    pub bullet_speed_bonus: f32,
}

impl Default for PowerupTuning {
    fn default() -> Self {
        Self {
            interval_ms: 10_000.0,
            margin: 50.0,
            radius: 10.0,
            xp_amount: 5,
            loot_chance_percent: 30,
            speed_bonus: 50.0,
            heal_amount: 20.0,
            bullet_speed_bonus: 50.0,
        }
    }
}

// ── Progression ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionTuning {
    pub first_xp_to_next: u32,
    /// Added to the XP threshold on every level.
    pub xp_step: u32,
    /// Added to max health on every level.
    pub max_health_step: f32,
    pub upgrade_choices: usize,
    pub damage_upgrade: f32,
    pub speed_upgrade: f32,
    pub fire_rate_upgrade_ms: f32,
    pub fire_rate_floor_ms: f32,
    pub bullet_speed_upgrade: f32,
    pub heal_upgrade: f32,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            first_xp_to_next: 20,
            xp_step: 10,
            max_health_step: 50.0,
            upgrade_choices: 3,
            damage_upgrade: 10.0,
            speed_upgrade: 25.0,
            fire_rate_upgrade_ms: 50.0,
            fire_rate_floor_ms: 100.0,
            bullet_speed_upgrade: 75.0,
            heal_upgrade: 50.0,
        }
    }
}

// ── Aggregate ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldTuning,
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub boss: BossTuning,
    pub powerup: PowerupTuning,
    pub progression: ProgressionTuning,
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate the result.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would make the simulation ill-formed.
    pub fn validate(&self) -> Result<(), SimError> {
        let world = &self.world;
        if !world.size.is_finite() || world.size <= 0.0 {
            return Err(SimError::InvalidTuning("world.size must be positive"));
        }
        if world.obstacle_margin * 2.0 > world.size {
            return Err(SimError::InvalidTuning(
                "world.obstacle_margin leaves no room for obstacles",
            ));
        }
        if self.powerup.margin * 2.0 > world.size {
            return Err(SimError::InvalidTuning(
                "powerup.margin leaves no room for powerups",
            ));
        }
        if self.enemy.spawn_interval_ms <= 0.0 || self.powerup.interval_ms <= 0.0 {
            return Err(SimError::InvalidTuning("spawn intervals must be positive"));
        }
        if self.enemy.ambush_min_ms <= 0.0 {
            return Err(SimError::InvalidTuning("enemy.ambush_min_ms must be positive"));
        }
        if self.enemy.ambush_min_ms > self.enemy.ambush_max_ms {
            return Err(SimError::InvalidTuning(
                "enemy.ambush_min_ms exceeds enemy.ambush_max_ms",
            ));
        }
        if self.player.bullet_count == 0 {
            return Err(SimError::InvalidTuning("player.bullet_count must be at least 1"));
        }
        if self.player.fire_rate_ms < self.progression.fire_rate_floor_ms {
            return Err(SimError::InvalidTuning(
                "player.fire_rate_ms is below progression.fire_rate_floor_ms",
            ));
        }
        if self.progression.first_xp_to_next == 0 {
            return Err(SimError::InvalidTuning(
                "progression.first_xp_to_next must be at least 1",
            ));
        }
        if self.progression.upgrade_choices == 0 || self.progression.upgrade_choices > 5 {
            return Err(SimError::InvalidTuning(
                "progression.upgrade_choices must be between 1 and 5",
            ));
        }
        if self.enemy.base_health <= 0.0 || self.boss.base_health <= 0.0 {
            return Err(SimError::InvalidTuning("base health must be positive"));
        }
        if self.powerup.loot_chance_percent > 100 {
            return Err(SimError::InvalidTuning(
                "powerup.loot_chance_percent is out of 100",
            ));
        }
        Ok(())
    }
}
