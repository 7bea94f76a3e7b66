//! Combat resolver.
//!
//! Collision results arrive as [`Contact`]s, either from the built-in
//! `motion::detect_contacts` or from an external physics layer. Every contact
//! re-checks that the entities it names are still alive, so a contact for
//! something destroyed earlier in the same step is a silent no-op.

use rand::Rng;
use tracing::{debug, info};

use crate::entities::{
    Ability, Bullet, BulletOwner, EntityId, GameStatus, PowerupKind, RunState, SimEvent, Vec2,
};
use crate::progression::{add_score, gain_xp};
use crate::spawn::maybe_drop_loot;
use crate::util::{angle_between, distance, velocity_from_angle};

/// One overlap reported by the collision collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    BulletEnemy { bullet: EntityId, enemy: EntityId },
    BulletBoss { bullet: EntityId },
    BulletObstacle { bullet: EntityId },
    /// A hostile bullet reached the player.
    BulletPlayer { bullet: EntityId },
    EnemyPlayer { enemy: EntityId },
    BossPlayer,
    PowerupPlayer { powerup: EntityId },
}

pub fn resolve_contact(state: &mut RunState, contact: Contact, rng: &mut impl Rng) {
    match contact {
        Contact::BulletEnemy { bullet, enemy } => bullet_hits_enemy(state, bullet, enemy, rng),
        Contact::BulletBoss { bullet } => bullet_hits_boss(state, bullet, rng),
        Contact::BulletObstacle { bullet } => {
            take_bullet(state, bullet, |_| true);
        }
        Contact::BulletPlayer { bullet } => {
            if let Some(b) = take_bullet(state, bullet, |o| o != BulletOwner::Player) {
                damage_player(state, b.damage);
            }
        }
        Contact::EnemyPlayer { enemy } => enemy_touches_player(state, enemy),
        Contact::BossPlayer => {
            // Bosses survive contact; only bullets bring them down.
            if let Some(damage) = state.boss.as_ref().map(|b| b.damage) {
                damage_player(state, damage);
            }
        }
        Contact::PowerupPlayer { powerup } => collect_powerup(state, powerup, rng),
    }
}

/// Mark a live bullet whose owner passes `accept` as destroyed and return a
/// copy of it.
fn take_bullet(
    state: &mut RunState,
    id: EntityId,
    accept: impl Fn(BulletOwner) -> bool,
) -> Option<Bullet> {
    let bullet = state
        .bullets
        .iter_mut()
        .find(|b| b.id == id && b.alive && accept(b.owner))?;
    bullet.alive = false;
    Some(bullet.clone())
}

pub fn damage_player(state: &mut RunState, amount: f32) {
    state.player.health -= amount;
    let health = state.player.health;
    state.emit(SimEvent::PlayerDamaged { amount, health });
}

// ── Player bullets ────────────────────────────────────────────────────────────

fn bullet_hits_enemy(state: &mut RunState, bullet: EntityId, enemy: EntityId, rng: &mut impl Rng) {
    let Some(idx) = state.enemies.iter().position(|e| e.id == enemy && e.alive) else {
        return;
    };
    if take_bullet(state, bullet, |o| o == BulletOwner::Player).is_none() {
        return;
    }

    let damage = state.player.bullet_damage;
    let target = &mut state.enemies[idx];
    target.health -= damage;
    let pos = target.pos;
    if target.health > 0.0 {
        state.emit(SimEvent::EnemyHit { id: enemy, pos });
        return;
    }

    target.health = 0.0;
    target.alive = false;
    state.kills += 1;
    let score = state.tuning.enemy.kill_score;
    add_score(state, score);
    state.emit(SimEvent::EnemyKilled { id: enemy, pos });
    debug!(id = enemy, score = state.score, "enemy killed");

    let xp = state.tuning.enemy.kill_xp;
    gain_xp(state, xp, rng);
    maybe_drop_loot(state, pos, rng);
}

fn bullet_hits_boss(state: &mut RunState, bullet: EntityId, rng: &mut impl Rng) {
    if state.boss.is_none() {
        return;
    }
    if take_bullet(state, bullet, |o| o == BulletOwner::Player).is_none() {
        return;
    }
    let damage = state.player.bullet_damage;
    let dead = match state.boss.as_mut() {
        Some(boss) => {
            boss.health -= damage;
            boss.health <= 0.0
        }
        None => false,
    };
    if dead {
        defeat_boss(state, rng);
    }
}

/// Clear the boss slot and pay out. Safe to call with an empty slot.
pub fn defeat_boss(state: &mut RunState, rng: &mut impl Rng) {
    let Some(boss) = state.boss.take() else {
        return;
    };

    let score = state.tuning.boss.kill_score;
    add_score(state, score);
    // A full extra level, before the regular XP grant.
    state.player.xp = state.player.xp.saturating_add(state.player.xp_to_next);
    state.boss_level += 1;
    state.next_boss_score = state
        .next_boss_score
        .saturating_add(state.tuning.boss.score_step);
    state.emit(SimEvent::BossDefeated {
        level: boss.level,
        pos: boss.pos,
    });
    info!(
        level = boss.level,
        next_boss_score = state.next_boss_score,
        "boss defeated"
    );

    let xp = state.tuning.boss.kill_xp;
    gain_xp(state, xp, rng);
    maybe_drop_loot(state, boss.pos, rng);
}

// ── Contact damage & pickups ──────────────────────────────────────────────────

fn enemy_touches_player(state: &mut RunState, enemy: EntityId) {
    let Some(target) = state.enemies.iter_mut().find(|e| e.id == enemy && e.alive) else {
        return;
    };
    target.alive = false;
    let damage = target.damage;
    damage_player(state, damage);
}

fn collect_powerup(state: &mut RunState, powerup: EntityId, rng: &mut impl Rng) {
    let Some(item) = state.powerups.iter_mut().find(|p| p.id == powerup && p.alive) else {
        return;
    };
    item.alive = false;
    let kind = item.kind;
    apply_powerup(state, kind, rng);
    state.emit(SimEvent::PowerupCollected { kind });
}

pub fn apply_powerup(state: &mut RunState, kind: PowerupKind, rng: &mut impl Rng) {
    if let PowerupKind::Xp { amount } = kind {
        gain_xp(state, amount, rng);
        return;
    }
    let tuning = &state.tuning.powerup;
    let player = &mut state.player;
    match kind {
        PowerupKind::Speed => player.speed += tuning.speed_bonus,
        PowerupKind::Heal => player.health += tuning.heal_amount,
        PowerupKind::MultiShot => player.bullet_count += 1,
        PowerupKind::BulletSpeed => player.bullet_speed += tuning.bullet_speed_bonus,
        PowerupKind::Xp { .. } => {}
    }
}

// ── Player fire ───────────────────────────────────────────────────────────────

/// Position of the nearest live enemy or boss within autofire range.
pub fn find_target(state: &RunState) -> Option<Vec2> {
    let origin = state.player.pos;
    let radius = state.tuning.player.autofire_radius;

    state
        .enemies
        .iter()
        .filter(|e| e.alive)
        .map(|e| e.pos)
        .chain(state.boss.as_ref().map(|b| b.pos))
        .map(|p| (p, distance(origin, p)))
        .filter(|&(_, d)| d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(p, _)| p)
}

fn cooled_down(state: &RunState) -> bool {
    state.timers.since_last_shot_ms >= state.player.fire_rate_ms
}

/// Fire `bullet_count` bullets fanned around `angle`, `fan_spread` apart.
fn fire_volley(state: &mut RunState, angle: f32) {
    let count = state.player.bullet_count.max(1);
    let spread = state.tuning.player.fan_spread;
    let centre = (count - 1) as f32 / 2.0;

    for i in 0..count {
        let a = angle + (i as f32 - centre) * spread;
        let id = state.alloc_id();
        state.bullets.push(Bullet {
            id,
            alive: true,
            owner: BulletOwner::Player,
            pos: state.player.pos,
            vel: velocity_from_angle(a, state.player.bullet_speed),
            damage: state.player.bullet_damage,
        });
    }
    state.timers.since_last_shot_ms = 0.0;
}

/// Shoot at the nearest target in range once the fire-rate cooldown is over.
/// Without a target nothing happens and the cooldown keeps running.
pub fn autofire(state: &mut RunState) -> bool {
    if !cooled_down(state) {
        return false;
    }
    let Some(target) = find_target(state) else {
        return false;
    };
    let angle = angle_between(state.player.pos, target);
    fire_volley(state, angle);
    true
}

/// Manual fire toward a pointer position, under the same cooldown.
pub fn player_shoot(state: &mut RunState, target: Vec2) -> bool {
    if state.status != GameStatus::Playing || !cooled_down(state) {
        return false;
    }
    let angle = angle_between(state.player.pos, target);
    fire_volley(state, angle);
    true
}

// ── Hostile fire ──────────────────────────────────────────────────────────────

/// Count down shooter and boss cooldowns and fire aimed bullets at the player.
/// Shooters only fire within range and hold a ready shot until then.
pub fn hostile_fire(state: &mut RunState, dt_ms: f32) {
    let player_pos = state.player.pos;
    let range = state.tuning.enemy.shoot_range;
    let enemy_cooldown = state.tuning.enemy.shoot_cooldown_ms;
    let mut shots: Vec<(BulletOwner, Vec2, f32, f32)> = Vec::new();

    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        if let Ability::Shooter { cooldown_ms } = &mut enemy.ability {
            *cooldown_ms = (*cooldown_ms - dt_ms).max(0.0);
            if *cooldown_ms <= 0.0 && distance(enemy.pos, player_pos) <= range {
                *cooldown_ms = enemy_cooldown;
                shots.push((
                    BulletOwner::Enemy,
                    enemy.pos,
                    state.tuning.enemy.bullet_speed,
                    enemy.damage,
                ));
            }
        }
    }

    if let Some(boss) = state.boss.as_mut() {
        boss.shoot_cooldown_ms -= dt_ms;
        if boss.shoot_cooldown_ms <= 0.0 {
            boss.shoot_cooldown_ms += state.tuning.boss.shoot_cooldown_ms;
            shots.push((
                BulletOwner::Boss,
                boss.pos,
                state.tuning.boss.bullet_speed,
                boss.damage,
            ));
        }
    }

    for (owner, pos, speed, damage) in shots {
        let id = state.alloc_id();
        state.bullets.push(Bullet {
            id,
            alive: true,
            owner,
            pos,
            vel: velocity_from_angle(angle_between(pos, player_pos), speed),
            damage,
        });
    }
}
