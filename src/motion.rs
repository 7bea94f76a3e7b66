//! Built-in movement and collision collaborator.
//!
//! A minimal stand-in for an engine's arcade physics: chase integration,
//! world clamping, obstacle blocking, bullet flight and overlap detection.
//! Hosts with their own physics can skip this module and feed their own
//! [`Contact`]s to `combat::resolve_contact`.

use crate::combat::Contact;
use crate::entities::{Ability, BulletOwner, Intent, Obstacle, RunState, Vec2};
use crate::util::{clamp_to_world, distance};

// ── Geometry ──────────────────────────────────────────────────────────────────

pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    distance(a, b) < ra + rb
}

/// Circle against an obstacle's square footprint.
pub fn circle_overlaps_obstacle(centre: Vec2, radius: f32, obstacle: &Obstacle) -> bool {
    let half = obstacle.size / 2.0;
    let nearest = Vec2::new(
        centre.x.clamp(obstacle.pos.x - half, obstacle.pos.x + half),
        centre.y.clamp(obstacle.pos.y - half, obstacle.pos.y + half),
    );
    distance(centre, nearest) < radius
}

fn blocked(obstacles: &[Obstacle], p: Vec2, radius: f32) -> bool {
    obstacles.iter().any(|o| circle_overlaps_obstacle(p, radius, o))
}

/// Move from `from` by `delta`, one axis at a time, refusing any axis step
/// that would push the body into an obstacle. A body already inside one may
/// move freely so it can get out.
fn slide(obstacles: &[Obstacle], from: Vec2, delta: Vec2, radius: f32, world: f32) -> Vec2 {
    if blocked(obstacles, from, radius) {
        return clamp_to_world(Vec2::new(from.x + delta.x, from.y + delta.y), world);
    }
    let mut pos = from;
    let step_x = clamp_to_world(Vec2::new(pos.x + delta.x, pos.y), world);
    if !blocked(obstacles, step_x, radius) {
        pos = step_x;
    }
    let step_y = clamp_to_world(Vec2::new(pos.x, pos.y + delta.y), world);
    if !blocked(obstacles, step_y, radius) {
        pos = step_y;
    }
    pos
}

/// Displacement of length at most `step` from `from` toward `to`.
fn toward(from: Vec2, to: Vec2, step: f32) -> Vec2 {
    let d = distance(from, to);
    if d <= f32::EPSILON {
        return Vec2::ZERO;
    }
    let k = step.min(d) / d;
    Vec2::new((to.x - from.x) * k, (to.y - from.y) * k)
}

// ── Integration ───────────────────────────────────────────────────────────────

/// Turn held directions into a player velocity. Left beats right and up
/// beats down when both are held.
pub fn apply_intent(state: &mut RunState, intent: Intent) {
    let speed = state.player.speed;
    let vx = if intent.left {
        -speed
    } else if intent.right {
        speed
    } else {
        0.0
    };
    let vy = if intent.up {
        -speed
    } else if intent.down {
        speed
    } else {
        0.0
    };
    state.player.vel = Vec2::new(vx, vy);
}

/// Advance every moving body by `dt_ms`. Bullets that leave the world are
/// marked dead.
pub fn integrate(state: &mut RunState, dt_ms: f32) {
    let dt = dt_ms / 1000.0;
    let world = state.tuning.world.size;
    let obstacles = &state.obstacles;

    let player = &mut state.player;
    let delta = Vec2::new(player.vel.x * dt, player.vel.y * dt);
    player.pos = slide(obstacles, player.pos, delta, state.tuning.player.radius, world);
    let target = player.pos;

    let enemy = &state.tuning.enemy;
    for e in state.enemies.iter_mut().filter(|e| e.alive) {
        let speed = match e.ability {
            Ability::Fast => enemy.fast_speed,
            Ability::Normal | Ability::Shooter { .. } => enemy.speed,
        };
        let delta = toward(e.pos, target, speed * dt);
        e.pos = slide(obstacles, e.pos, delta, enemy.radius, world);
    }

    if let Some(boss) = state.boss.as_mut() {
        let delta = toward(boss.pos, target, state.tuning.boss.speed * dt);
        boss.pos = clamp_to_world(Vec2::new(boss.pos.x + delta.x, boss.pos.y + delta.y), world);
    }

    for b in state.bullets.iter_mut().filter(|b| b.alive) {
        b.pos = Vec2::new(b.pos.x + b.vel.x * dt, b.pos.y + b.vel.y * dt);
        if b.pos.x < 0.0 || b.pos.y < 0.0 || b.pos.x > world || b.pos.y > world {
            b.alive = false;
        }
    }
}

// ── Overlap detection ─────────────────────────────────────────────────────────

/// Every overlap among live bodies, in resolution order: player bullets on
/// enemies and the boss first, then body contact, hostile bullets, pickups
/// and finally bullets on obstacles.
pub fn detect_contacts(state: &RunState) -> Vec<Contact> {
    let t = &state.tuning;
    let player = state.player.pos;
    let bullet_r = t.player.bullet_radius;
    let mut contacts = Vec::new();

    for b in state.bullets.iter().filter(|b| b.alive && b.owner == BulletOwner::Player) {
        for e in state.enemies.iter().filter(|e| e.alive) {
            if circles_overlap(b.pos, bullet_r, e.pos, t.enemy.radius) {
                contacts.push(Contact::BulletEnemy {
                    bullet: b.id,
                    enemy: e.id,
                });
            }
        }
        if let Some(boss) = &state.boss {
            if circles_overlap(b.pos, bullet_r, boss.pos, t.boss.radius) {
                contacts.push(Contact::BulletBoss { bullet: b.id });
            }
        }
    }

    for e in state.enemies.iter().filter(|e| e.alive) {
        if circles_overlap(player, t.player.radius, e.pos, t.enemy.radius) {
            contacts.push(Contact::EnemyPlayer { enemy: e.id });
        }
    }
    if let Some(boss) = &state.boss {
        if circles_overlap(player, t.player.radius, boss.pos, t.boss.radius) {
            contacts.push(Contact::BossPlayer);
        }
    }

    for b in state.bullets.iter().filter(|b| b.alive && b.owner != BulletOwner::Player) {
        if circles_overlap(b.pos, bullet_r, player, t.player.radius) {
            contacts.push(Contact::BulletPlayer { bullet: b.id });
        }
    }

    for p in state.powerups.iter().filter(|p| p.alive) {
        if circles_overlap(player, t.player.radius, p.pos, t.powerup.radius) {
            contacts.push(Contact::PowerupPlayer { powerup: p.id });
        }
    }

    for b in state.bullets.iter().filter(|b| b.alive) {
        if blocked(&state.obstacles, b.pos, bullet_r) {
            contacts.push(Contact::BulletObstacle { bullet: b.id });
        }
    }

    contacts
}
