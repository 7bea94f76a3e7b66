//! Spawn director: enemies, ambushes, the boss, powerups, loot and the
//! obstacle layout.
//!
//! Nothing here decides *when* to spawn except `maybe_spawn_boss` and
//! `maybe_drop_loot`; the interval timers live in `compute`.

use rand::Rng;
use tracing::{debug, info};

use crate::entities::{
    Ability, Boss, EntityId, Enemy, Obstacle, Powerup, PowerupKind, RunState, SimEvent, Vec2,
};
use crate::motion::circle_overlaps_obstacle;
use crate::progression::level_multiplier;
use crate::tuning::Tuning;
use crate::util::{between, chance, clamp_to_world, edge_point, float_between, ring_point};

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Equal thirds over fast / shooter / normal.
fn roll_ability(rng: &mut impl Rng, tuning: &Tuning) -> Ability {
    match between(rng, 0, 2) {
        0 => Ability::Fast,
        1 => Ability::Shooter {
            cooldown_ms: tuning.enemy.shoot_cooldown_ms,
        },
        _ => Ability::Normal,
    }
}

/// Spawn one enemy at `at`, or at a random world-edge point when `None`.
/// Health and damage use the current enemy level multiplier.
pub fn spawn_enemy(state: &mut RunState, at: Option<Vec2>, rng: &mut impl Rng) -> EntityId {
    let size = state.tuning.world.size;
    let pos = match at {
        Some(p) => p,
        None => edge_point(rng, size),
    };
    let ability = roll_ability(rng, &state.tuning);
    let mult = state.enemy_level_multiplier;
    let health = state.tuning.enemy.base_health * mult;
    let damage = state.tuning.enemy.base_damage * mult;

    let id = state.alloc_id();
    state.enemies.push(Enemy {
        id,
        alive: true,
        pos,
        health,
        max_health: health,
        damage,
        ability,
    });
    debug!(id, ?ability, x = pos.x, y = pos.y, health, "enemy spawned");
    id
}

/// Delay until the next ambush, uniform over the configured window.
pub fn roll_ambush_delay(rng: &mut impl Rng, tuning: &Tuning) -> f32 {
    float_between(rng, tuning.enemy.ambush_min_ms, tuning.enemy.ambush_max_ms)
}

/// Burst of enemies on a ring around the player, pulled back inside the world.
pub fn spawn_ambush(state: &mut RunState, rng: &mut impl Rng) -> Vec<EntityId> {
    let count = state.tuning.enemy.ambush_size;
    let radius = state.tuning.enemy.ambush_radius;
    let size = state.tuning.world.size;
    let centre = state.player.pos;

    let ids: Vec<EntityId> = (0..count)
        .map(|_| {
            let pos = clamp_to_world(ring_point(rng, centre, radius), size);
            spawn_enemy(state, Some(pos), rng)
        })
        .collect();

    state.emit(SimEvent::AmbushSpawned { count });
    debug!(count, "ambush spawned");
    ids
}

// ── Boss ──────────────────────────────────────────────────────────────────────

/// Spawn the boss for the current `boss_level` at a random edge point.
/// Does nothing when the slot is already occupied.
pub fn spawn_boss(state: &mut RunState, rng: &mut impl Rng) -> Option<EntityId> {
    if state.boss.is_some() {
        return None;
    }
    let pos = edge_point(rng, state.tuning.world.size);
    let level = state.boss_level;
    let mult = level_multiplier(level);
    let health = state.tuning.boss.base_health * mult;

    let id = state.alloc_id();
    state.boss = Some(Boss {
        id,
        pos,
        health,
        max_health: health,
        damage: state.tuning.boss.base_damage * mult,
        shoot_cooldown_ms: state.tuning.boss.shoot_cooldown_ms,
        level,
    });
    state.emit(SimEvent::BossSpawned { level, pos });
    info!(id, level, health, "boss spawned");
    Some(id)
}

/// Spawn the boss once the score has reached the current threshold.
pub fn maybe_spawn_boss(state: &mut RunState, rng: &mut impl Rng) -> bool {
    if state.boss.is_some() || state.score < state.next_boss_score {
        return false;
    }
    spawn_boss(state, rng).is_some()
}

// ── Powerups & loot ───────────────────────────────────────────────────────────

pub fn roll_powerup_kind(rng: &mut impl Rng, tuning: &Tuning) -> PowerupKind {
    match between(rng, 0, 4) {
        0 => PowerupKind::Speed,
        1 => PowerupKind::Heal,
        2 => PowerupKind::MultiShot,
        3 => PowerupKind::BulletSpeed,
        _ => PowerupKind::Xp {
            amount: tuning.powerup.xp_amount,
        },
    }
}

fn push_powerup(state: &mut RunState, pos: Vec2, kind: PowerupKind) -> EntityId {
    let id = state.alloc_id();
    state.powerups.push(Powerup {
        id,
        alive: true,
        pos,
        kind,
    });
    debug!(id, ?kind, x = pos.x, y = pos.y, "powerup spawned");
    id
}

/// Periodic powerup somewhere inside the inset margin.
pub fn spawn_powerup(state: &mut RunState, rng: &mut impl Rng) -> EntityId {
    let margin = state.tuning.powerup.margin;
    let far = state.tuning.world.size - margin;
    let pos = Vec2::new(
        float_between(rng, margin, far),
        float_between(rng, margin, far),
    );
    let kind = roll_powerup_kind(rng, &state.tuning);
    push_powerup(state, pos, kind)
}

/// Loot roll on a kill, independent of the periodic powerup timer.
pub fn maybe_drop_loot(state: &mut RunState, at: Vec2, rng: &mut impl Rng) -> Option<EntityId> {
    if !chance(rng, state.tuning.powerup.loot_chance_percent) {
        return None;
    }
    let kind = roll_powerup_kind(rng, &state.tuning);
    Some(push_powerup(state, at, kind))
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

const OBSTACLE_PLACEMENT_ATTEMPTS: u32 = 10;

/// Scatter the static buildings. A candidate that would cover the player's
/// starting position is re-rolled, and dropped after a few misses.
pub fn place_obstacles(state: &mut RunState, rng: &mut impl Rng) {
    let world = state.tuning.world.clone();
    let player_radius = state.tuning.player.radius;
    let start = state.player.pos;
    let far = world.size - world.obstacle_margin;

    for _ in 0..world.obstacle_count {
        for _ in 0..OBSTACLE_PLACEMENT_ATTEMPTS {
            let candidate = Obstacle {
                pos: Vec2::new(
                    float_between(rng, world.obstacle_margin, far),
                    float_between(rng, world.obstacle_margin, far),
                ),
                size: world.obstacle_size,
            };
            if !circle_overlaps_obstacle(start, player_radius, &candidate) {
                state.obstacles.push(candidate);
                break;
            }
        }
    }
    debug!(count = state.obstacles.len(), "obstacles placed");
}
