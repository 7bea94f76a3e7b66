use survival_shooter::combat::*;
use survival_shooter::compute::{init_state, step};
use survival_shooter::entities::*;
use survival_shooter::tuning::Tuning;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// No obstacles and no loot, so nothing random gets in the way.
fn make_state() -> RunState {
    let mut tuning = Tuning::default();
    tuning.world.obstacle_count = 0;
    tuning.powerup.loot_chance_percent = 0;
    init_state(tuning, &mut seeded_rng())
}

fn add_enemy(state: &mut RunState, pos: Vec2, health: f32, ability: Ability) -> EntityId {
    let id = state.alloc_id();
    state.enemies.push(Enemy {
        id,
        alive: true,
        pos,
        health,
        max_health: health,
        damage: 10.0,
        ability,
    });
    id
}

fn add_bullet(state: &mut RunState, owner: BulletOwner, pos: Vec2, vel: Vec2, damage: f32) -> EntityId {
    let id = state.alloc_id();
    state.bullets.push(Bullet {
        id,
        alive: true,
        owner,
        pos,
        vel,
        damage,
    });
    id
}

fn add_boss(state: &mut RunState, pos: Vec2, health: f32) -> EntityId {
    let id = state.alloc_id();
    state.boss = Some(Boss {
        id,
        pos,
        health,
        max_health: health,
        damage: 25.0,
        shoot_cooldown_ms: 1500.0,
        level: state.boss_level,
    });
    id
}

fn player_bullet(state: &mut RunState) -> EntityId {
    let pos = state.player.pos;
    let damage = state.player.bullet_damage;
    add_bullet(state, BulletOwner::Player, pos, Vec2::ZERO, damage)
}

// ── Player bullets vs enemies ────────────────────────────────────────────────

#[test]
fn enemy_dies_exactly_on_fifth_hit() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.player.bullet_damage = 20.0;
    let enemy = add_enemy(&mut s, Vec2::new(100.0, 100.0), 100.0, Ability::Normal);

    for hit in 1..=4 {
        let bullet = player_bullet(&mut s);
        resolve_contact(&mut s, Contact::BulletEnemy { bullet, enemy }, &mut rng);
        assert!(s.enemies[0].alive, "enemy died early on hit {hit}");
    }
    assert_eq!(s.enemies[0].health, 20.0);
    assert_eq!(s.score, 0);

    let bullet = player_bullet(&mut s);
    resolve_contact(&mut s, Contact::BulletEnemy { bullet, enemy }, &mut rng);
    assert!(!s.enemies[0].alive);
    assert_eq!(s.enemies[0].health, 0.0);
    assert_eq!(s.score, 15);
    assert_eq!(s.kills, 1);
    assert_eq!(s.player.xp, 5);
}

#[test]
fn hit_destroys_bullet_and_uses_current_player_damage() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let enemy = add_enemy(&mut s, Vec2::new(100.0, 100.0), 100.0, Ability::Normal);
    let bullet = add_bullet(&mut s, BulletOwner::Player, Vec2::ZERO, Vec2::ZERO, 1.0);
    s.player.bullet_damage = 35.0;

    resolve_contact(&mut s, Contact::BulletEnemy { bullet, enemy }, &mut rng);
    assert!(!s.bullets[0].alive);
    assert_eq!(s.enemies[0].health, 65.0);
    assert!(s
        .drain_events()
        .iter()
        .any(|e| matches!(e, SimEvent::EnemyHit { id, .. } if *id == enemy)));
}

#[test]
fn contact_with_dead_enemy_is_a_no_op() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let enemy = add_enemy(&mut s, Vec2::new(100.0, 100.0), 10.0, Ability::Normal);
    s.enemies[0].alive = false;
    let bullet = player_bullet(&mut s);

    resolve_contact(&mut s, Contact::BulletEnemy { bullet, enemy }, &mut rng);
    assert!(s.bullets[0].alive);
    assert_eq!(s.score, 0);
}

#[test]
fn spent_bullet_cannot_hit_twice() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let a = add_enemy(&mut s, Vec2::new(100.0, 100.0), 100.0, Ability::Normal);
    let b = add_enemy(&mut s, Vec2::new(100.0, 100.0), 100.0, Ability::Normal);
    let bullet = player_bullet(&mut s);

    resolve_contact(&mut s, Contact::BulletEnemy { bullet, enemy: a }, &mut rng);
    resolve_contact(&mut s, Contact::BulletEnemy { bullet, enemy: b }, &mut rng);
    assert_eq!(s.enemies[0].health, 80.0);
    assert_eq!(s.enemies[1].health, 100.0);
}

#[test]
fn hostile_bullet_cannot_hit_enemies() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let enemy = add_enemy(&mut s, Vec2::new(100.0, 100.0), 100.0, Ability::Normal);
    let bullet = add_bullet(&mut s, BulletOwner::Enemy, Vec2::ZERO, Vec2::ZERO, 10.0);

    resolve_contact(&mut s, Contact::BulletEnemy { bullet, enemy }, &mut rng);
    assert!(s.bullets[0].alive);
    assert_eq!(s.enemies[0].health, 100.0);
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[test]
fn bullet_vs_obstacle_destroys_only_the_bullet() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.obstacles.push(Obstacle {
        pos: Vec2::new(500.0, 500.0),
        size: 60.0,
    });
    let before = s.obstacles.clone();
    for owner in [BulletOwner::Player, BulletOwner::Enemy, BulletOwner::Boss] {
        let bullet = add_bullet(&mut s, owner, Vec2::new(500.0, 500.0), Vec2::ZERO, 5.0);
        resolve_contact(&mut s, Contact::BulletObstacle { bullet }, &mut rng);
    }
    assert!(s.bullets.iter().all(|b| !b.alive));
    assert_eq!(s.obstacles, before);
}

#[test]
fn bullet_stops_at_obstacle_during_step() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.obstacles.push(Obstacle {
        pos: Vec2::new(500.0, 500.0),
        size: 60.0,
    });
    // 8 units per 16 ms: lands inside the obstacle's reach this step.
    add_bullet(
        &mut s,
        BulletOwner::Player,
        Vec2::new(468.0, 500.0),
        Vec2::new(500.0, 0.0),
        20.0,
    );

    step(&mut s, 16.0, Intent::default(), &mut rng);
    assert!(s.bullets.is_empty());
    assert_eq!(s.obstacles.len(), 1);
    assert_eq!(s.obstacles[0].pos, Vec2::new(500.0, 500.0));
}

#[test]
fn long_frame_bullet_cannot_pass_through_obstacle() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.obstacles.push(Obstacle {
        pos: Vec2::new(500.0, 500.0),
        size: 60.0,
    });
    // 125 units in one 250 ms frame: would land past the far edge at x=530.
    add_bullet(
        &mut s,
        BulletOwner::Player,
        Vec2::new(460.0, 500.0),
        Vec2::new(500.0, 0.0),
        20.0,
    );

    step(&mut s, 250.0, Intent::default(), &mut rng);
    assert!(s.bullets.is_empty());
}

#[test]
fn long_frame_bullet_still_hits_enemy_in_its_path() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.tuning.player.autofire = false;
    add_enemy(&mut s, Vec2::new(420.0, 300.0), 100.0, Ability::Normal);
    add_bullet(
        &mut s,
        BulletOwner::Player,
        Vec2::new(300.0, 300.0),
        Vec2::new(1000.0, 0.0),
        20.0,
    );

    step(&mut s, 250.0, Intent::default(), &mut rng);
    assert!(s.bullets.is_empty());
    assert_eq!(s.enemies[0].health, 80.0);
}

// ── Boss ──────────────────────────────────────────────────────────────────────

#[test]
fn boss_defeat_grants_extra_level_before_xp() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.tuning.boss.kill_xp = 0;
    s.player.xp = 15;
    add_boss(&mut s, Vec2::new(100.0, 100.0), 10.0);
    let bullet = player_bullet(&mut s);

    resolve_contact(&mut s, Contact::BulletBoss { bullet }, &mut rng);
    // 15 + 20 = 35 → one level, 15 carried over against the new threshold of 30.
    assert_eq!(s.player.level, 2);
    assert_eq!(s.player.xp, 15);
    assert_eq!(s.player.xp_to_next, 30);
}

#[test]
fn boss_defeat_scenario_from_fifteen_of_twenty() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.player.xp = 15;
    add_boss(&mut s, Vec2::new(100.0, 100.0), 10.0);
    let bullet = player_bullet(&mut s);

    resolve_contact(&mut s, Contact::BulletBoss { bullet }, &mut rng);
    // 15 + 20 (extra level) + 20 (kill) = 55 → 35 at L2 (next 30) → 5 at L3 (next 40).
    assert!(s.boss.is_none());
    assert_eq!(s.score, 150);
    assert_eq!(s.boss_level, 2);
    assert_eq!(s.next_boss_score, 400);
    assert_eq!(s.player.level, 3);
    assert_eq!(s.player.xp, 5);
    assert_eq!(s.player.xp_to_next, 40);
    assert_eq!(s.status, GameStatus::AwaitingUpgrade);
    assert_eq!(s.queued_upgrades, 1);
}

#[test]
fn boss_survives_until_health_reaches_zero() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    add_boss(&mut s, Vec2::new(100.0, 100.0), 40.0);

    let bullet = player_bullet(&mut s);
    resolve_contact(&mut s, Contact::BulletBoss { bullet }, &mut rng);
    assert_eq!(s.boss.as_ref().map(|b| b.health), Some(20.0));

    let bullet = player_bullet(&mut s);
    resolve_contact(&mut s, Contact::BulletBoss { bullet }, &mut rng);
    assert!(s.boss.is_none());
}

#[test]
fn boss_contact_damages_player_but_keeps_boss() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let at = s.player.pos;
    add_boss(&mut s, at, 500.0);

    resolve_contact(&mut s, Contact::BossPlayer, &mut rng);
    assert!(s.boss.is_some());
    assert_eq!(s.player.health, 75.0);
}

#[test]
fn boss_contacts_without_boss_are_ignored() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let bullet = player_bullet(&mut s);

    resolve_contact(&mut s, Contact::BossPlayer, &mut rng);
    resolve_contact(&mut s, Contact::BulletBoss { bullet }, &mut rng);
    assert_eq!(s.player.health, 100.0);
    assert!(s.bullets[0].alive);
}

#[test]
fn defeat_boss_is_idempotent() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    add_boss(&mut s, Vec2::new(100.0, 100.0), 1.0);

    defeat_boss(&mut s, &mut rng);
    let score = s.score;
    let level = s.boss_level;
    defeat_boss(&mut s, &mut rng);
    assert_eq!(s.score, score);
    assert_eq!(s.boss_level, level);
}

// ── Damage to the player ──────────────────────────────────────────────────────

#[test]
fn enemy_contact_destroys_enemy_and_damages_player() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let at = s.player.pos;
    let enemy = add_enemy(&mut s, at, 40.0, Ability::Fast);
    s.enemies[0].damage = 30.0;

    resolve_contact(&mut s, Contact::EnemyPlayer { enemy }, &mut rng);
    assert!(!s.enemies[0].alive);
    assert_eq!(s.player.health, 70.0);
    assert_eq!(s.score, 0); // contact kills are not rewarded

    resolve_contact(&mut s, Contact::EnemyPlayer { enemy }, &mut rng);
    assert_eq!(s.player.health, 70.0);
}

#[test]
fn hostile_bullet_applies_carried_damage() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let at = s.player.pos;
    let enemy_shot = add_bullet(&mut s, BulletOwner::Enemy, at, Vec2::ZERO, 12.0);
    let boss_shot = add_bullet(&mut s, BulletOwner::Boss, at, Vec2::ZERO, 30.0);
    let own_shot = player_bullet(&mut s);

    resolve_contact(&mut s, Contact::BulletPlayer { bullet: enemy_shot }, &mut rng);
    resolve_contact(&mut s, Contact::BulletPlayer { bullet: boss_shot }, &mut rng);
    resolve_contact(&mut s, Contact::BulletPlayer { bullet: own_shot }, &mut rng);

    assert_eq!(s.player.health, 58.0);
    assert!(!s.bullets[0].alive);
    assert!(!s.bullets[1].alive);
    assert!(s.bullets[2].alive);
    let flashes = s
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, SimEvent::PlayerDamaged { .. }))
        .count();
    assert_eq!(flashes, 2);
}

// ── Powerups ──────────────────────────────────────────────────────────────────

#[test]
fn powerup_effects() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let p = s.player.clone();

    apply_powerup(&mut s, PowerupKind::Speed, &mut rng);
    apply_powerup(&mut s, PowerupKind::Heal, &mut rng);
    apply_powerup(&mut s, PowerupKind::MultiShot, &mut rng);
    apply_powerup(&mut s, PowerupKind::BulletSpeed, &mut rng);
    apply_powerup(&mut s, PowerupKind::Xp { amount: 5 }, &mut rng);

    assert_eq!(s.player.speed, p.speed + 50.0);
    assert_eq!(s.player.health, p.health + 20.0);
    assert_eq!(s.player.bullet_count, p.bullet_count + 1);
    assert_eq!(s.player.bullet_speed, p.bullet_speed + 50.0);
    assert_eq!(s.player.xp, 5);
}

#[test]
fn powerup_is_consumed_on_pickup() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let id = s.alloc_id();
    s.powerups.push(Powerup {
        id,
        alive: true,
        pos: s.player.pos,
        kind: PowerupKind::MultiShot,
    });

    resolve_contact(&mut s, Contact::PowerupPlayer { powerup: id }, &mut rng);
    resolve_contact(&mut s, Contact::PowerupPlayer { powerup: id }, &mut rng);
    assert!(!s.powerups[0].alive);
    assert_eq!(s.player.bullet_count, 2);
}

// ── Autofire ──────────────────────────────────────────────────────────────────

#[test]
fn autofire_without_targets_never_fires() {
    let mut s = make_state();
    assert!(!autofire(&mut s));

    let far = Vec2::new(s.player.pos.x + 300.0, s.player.pos.y);
    add_enemy(&mut s, far, 40.0, Ability::Normal);
    s.timers.since_last_shot_ms = 10_000.0;
    assert!(!autofire(&mut s));
    assert!(s.bullets.is_empty());
    assert_eq!(s.timers.since_last_shot_ms, 10_000.0);
}

#[test]
fn autofire_ignores_dead_enemies() {
    let mut s = make_state();
    let near = Vec2::new(s.player.pos.x + 50.0, s.player.pos.y);
    add_enemy(&mut s, near, 40.0, Ability::Normal);
    s.enemies[0].alive = false;
    assert!(find_target(&s).is_none());
    assert!(!autofire(&mut s));
}

#[test]
fn autofire_fans_bullets_around_line_of_sight() {
    let mut s = make_state();
    s.player.bullet_count = 3;
    let target = Vec2::new(s.player.pos.x + 100.0, s.player.pos.y);
    add_enemy(&mut s, target, 40.0, Ability::Normal);

    assert!(autofire(&mut s));
    assert_eq!(s.bullets.len(), 3);
    let angles: Vec<f32> = s.bullets.iter().map(|b| b.vel.y.atan2(b.vel.x)).collect();
    for (angle, expected) in angles.iter().zip([-0.1f32, 0.0, 0.1]) {
        assert!((angle - expected).abs() < 1e-4, "{angle} vs {expected}");
    }
    for b in &s.bullets {
        assert_eq!(b.owner, BulletOwner::Player);
        assert_eq!(b.damage, s.player.bullet_damage);
        assert!((b.vel.x.hypot(b.vel.y) - s.player.bullet_speed).abs() < 1e-2);
    }
    assert_eq!(s.timers.since_last_shot_ms, 0.0);
}

#[test]
fn autofire_respects_fire_rate() {
    let mut s = make_state();
    let target = Vec2::new(s.player.pos.x + 100.0, s.player.pos.y);
    add_enemy(&mut s, target, 40.0, Ability::Normal);

    assert!(autofire(&mut s));
    assert!(!autofire(&mut s));
    s.timers.since_last_shot_ms = s.player.fire_rate_ms;
    assert!(autofire(&mut s));
    assert_eq!(s.bullets.len(), 2);
}

#[test]
fn autofire_targets_nearest_including_boss() {
    let mut s = make_state();
    let origin = s.player.pos;
    add_enemy(&mut s, Vec2::new(origin.x + 200.0, origin.y), 40.0, Ability::Normal);
    add_boss(&mut s, Vec2::new(origin.x, origin.y + 80.0), 500.0);

    assert_eq!(find_target(&s), Some(Vec2::new(origin.x, origin.y + 80.0)));
}

#[test]
fn manual_fire_aims_at_pointer() {
    let mut s = make_state();
    let pointer = Vec2::new(s.player.pos.x, s.player.pos.y - 400.0);

    assert!(player_shoot(&mut s, pointer));
    assert!(!player_shoot(&mut s, pointer)); // still cooling down
    let b = &s.bullets[0];
    assert!(b.vel.x.abs() < 1e-3);
    assert!(b.vel.y < 0.0);
}

// ── Hostile fire ──────────────────────────────────────────────────────────────

#[test]
fn shooter_fires_carrying_its_damage_when_in_range() {
    let mut s = make_state();
    let near = Vec2::new(s.player.pos.x + 200.0, s.player.pos.y);
    add_enemy(&mut s, near, 40.0, Ability::Shooter { cooldown_ms: 10.0 });
    s.enemies[0].damage = 17.0;

    hostile_fire(&mut s, 16.0);
    assert_eq!(s.bullets.len(), 1);
    assert_eq!(s.bullets[0].owner, BulletOwner::Enemy);
    assert_eq!(s.bullets[0].damage, 17.0);
    assert!(s.bullets[0].vel.x < 0.0); // heading back toward the player
    assert!(matches!(
        s.enemies[0].ability,
        Ability::Shooter { cooldown_ms } if cooldown_ms == 2000.0
    ));
}

#[test]
fn shooter_holds_fire_out_of_range() {
    let mut s = make_state();
    let far = Vec2::new(s.player.pos.x + 900.0, s.player.pos.y);
    add_enemy(&mut s, far, 40.0, Ability::Shooter { cooldown_ms: 0.0 });
    let at = s.player.pos;
    add_enemy(&mut s, at, 40.0, Ability::Normal);

    hostile_fire(&mut s, 16.0);
    assert!(s.bullets.is_empty());
}

#[test]
fn boss_fires_on_its_cooldown() {
    let mut s = make_state();
    add_boss(&mut s, Vec2::new(100.0, 100.0), 500.0);

    hostile_fire(&mut s, 1000.0);
    assert!(s.bullets.is_empty());
    hostile_fire(&mut s, 600.0);
    assert_eq!(s.bullets.len(), 1);
    assert_eq!(s.bullets[0].owner, BulletOwner::Boss);
    assert_eq!(s.bullets[0].damage, 25.0);
}

// ── Score ─────────────────────────────────────────────────────────────────────

#[test]
fn score_never_decreases_across_combat() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let mut last = s.score;

    for i in 0..30 {
        let enemy = add_enemy(&mut s, Vec2::new(100.0, 100.0), 20.0, Ability::Normal);
        let bullet = player_bullet(&mut s);
        let contact = match i % 3 {
            0 => Contact::BulletEnemy { bullet, enemy },
            1 => Contact::EnemyPlayer { enemy },
            _ => Contact::BulletObstacle { bullet },
        };
        resolve_contact(&mut s, contact, &mut rng);
        assert!(s.score >= last);
        last = s.score;
    }
}
