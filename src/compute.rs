//! Simulation clock: run setup and the per-frame step.
//!
//! All randomness comes through the injected `rng`, so a seeded RNG plus the
//! same sequence of `step` calls replays a run exactly.

use rand::Rng;
use tracing::{debug, info};

use crate::combat::{autofire, hostile_fire, resolve_contact};
use crate::entities::{GameStatus, Intent, Player, RunState, SimEvent, Timers, Vec2};
use crate::motion::{apply_intent, detect_contacts, integrate};
use crate::spawn::{
    maybe_spawn_boss, place_obstacles, roll_ambush_delay, spawn_ambush, spawn_enemy,
    spawn_powerup,
};
use crate::tuning::Tuning;

/// Caps the shot accumulator so it cannot grow without bound while idle.
const SHOT_TIMER_CAP_MS: f32 = 60_000.0;

/// Longest physics slice. Longer frames are split so a fast bullet is checked
/// for overlaps at least this often and cannot hop over a building or target.
pub const MAX_SUBSTEP_MS: f32 = 1000.0 / 60.0;

/// Upper bound on slices per frame; a frame longer than this many
/// `MAX_SUBSTEP_MS` slices is simulated in coarser ones.
const MAX_SUBSTEPS: u32 = 600;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh run. Every counter, timer and multiplier starts from its
/// initial value; replaying is just calling this again.
pub fn init_state(tuning: Tuning, rng: &mut impl Rng) -> RunState {
    let centre = tuning.world.size / 2.0;
    let p = &tuning.player;
    let player = Player {
        pos: Vec2::new(centre, centre),
        vel: Vec2::ZERO,
        health: p.health,
        max_health: p.health,
        speed: p.speed,
        fire_rate_ms: p.fire_rate_ms,
        bullet_damage: p.bullet_damage,
        bullet_speed: p.bullet_speed,
        bullet_count: p.bullet_count,
        xp: 0,
        level: 1,
        xp_to_next: tuning.progression.first_xp_to_next,
    };
    let timers = Timers {
        spawn_ms: 0.0,
        ambush_ms: 0.0,
        next_ambush_ms: roll_ambush_delay(rng, &tuning),
        powerup_ms: 0.0,
        // The first shot is available immediately.
        since_last_shot_ms: p.fire_rate_ms,
        elapsed_ms: 0.0,
    };

    let mut state = RunState {
        next_boss_score: tuning.boss.first_score,
        tuning,
        player,
        enemies: Vec::new(),
        bullets: Vec::new(),
        powerups: Vec::new(),
        obstacles: Vec::new(),
        boss: None,
        score: 0,
        kills: 0,
        boss_level: 1,
        enemy_level_multiplier: 1.0,
        timers,
        status: GameStatus::Playing,
        pending_upgrade: None,
        queued_upgrades: 0,
        next_id: 1,
        events: Vec::new(),
    };
    place_obstacles(&mut state, rng);
    info!(obstacles = state.obstacles.len(), "run started");
    state
}

// ── Per-frame step ───────────────────────────────────────────────────────────

/// Advance the run by `dt_ms`.
///
/// Order: timers and spawns, then movement, hostile and player fire and
/// contact resolution in fixed slices of at most [`MAX_SUBSTEP_MS`], an
/// end-of-run check after each slice, and finally a sweep of destroyed
/// entities. Slicing stops early once the run leaves `Playing`. Does nothing
/// unless the run is `Playing`, so a pending upgrade choice freezes every
/// timer at its current phase.
pub fn step(state: &mut RunState, dt_ms: f32, intent: Intent, rng: &mut impl Rng) {
    if state.status != GameStatus::Playing {
        return;
    }
    let dt_ms = dt_ms.max(0.0);

    advance_timers(state, dt_ms, rng);
    apply_intent(state, intent);

    let slices = substep_count(dt_ms);
    let slice_ms = dt_ms / slices as f32;
    for _ in 0..slices {
        physics_tick(state, slice_ms, rng);
        evaluate_end(state);
        if state.status != GameStatus::Playing {
            break;
        }
    }

    sweep(state);
}

/// Number of physics slices needed to cover `dt_ms`. Always at least one.
pub fn substep_count(dt_ms: f32) -> u32 {
    let slices = (dt_ms / MAX_SUBSTEP_MS).ceil();
    if slices.is_finite() && slices >= 1.0 {
        (slices as u32).min(MAX_SUBSTEPS)
    } else {
        1
    }
}

/// One physics slice: move, fire, then resolve every overlap.
fn physics_tick(state: &mut RunState, slice_ms: f32, rng: &mut impl Rng) {
    let timers = &mut state.timers;
    timers.since_last_shot_ms = (timers.since_last_shot_ms + slice_ms).min(SHOT_TIMER_CAP_MS);

    integrate(state, slice_ms);

    hostile_fire(state, slice_ms);
    if state.tuning.player.autofire {
        autofire(state);
    }

    for contact in detect_contacts(state) {
        resolve_contact(state, contact, rng);
    }
}

/// Tick elapsed time and the spawn accumulators, and fire whatever spawns
/// came due.
pub fn advance_timers(state: &mut RunState, dt_ms: f32, rng: &mut impl Rng) {
    let timers = &mut state.timers;
    timers.elapsed_ms += f64::from(dt_ms);

    timers.spawn_ms += dt_ms;
    let interval = state.tuning.enemy.spawn_interval_ms;
    if timers.spawn_ms >= interval {
        timers.spawn_ms -= interval;
        let held = state.tuning.enemy.pause_spawns_during_boss && state.boss.is_some();
        if !held {
            spawn_enemy(state, None, rng);
        }
    }

    state.timers.ambush_ms += dt_ms;
    if state.timers.ambush_ms >= state.timers.next_ambush_ms {
        state.timers.ambush_ms = 0.0;
        state.timers.next_ambush_ms = roll_ambush_delay(rng, &state.tuning);
        spawn_ambush(state, rng);
    }

    state.timers.powerup_ms += dt_ms;
    let interval = state.tuning.powerup.interval_ms;
    if state.timers.powerup_ms >= interval {
        state.timers.powerup_ms -= interval;
        spawn_powerup(state, rng);
    }

    maybe_spawn_boss(state, rng);
}

/// Loss on zero health; a timed win only when configured.
pub fn evaluate_end(state: &mut RunState) {
    if state.is_over() {
        return;
    }
    let outcome = if state.player.health <= 0.0 {
        GameStatus::Lost
    } else if state
        .tuning
        .world
        .win_time_secs
        .is_some_and(|secs| state.elapsed_secs() >= u64::from(secs))
    {
        GameStatus::Won
    } else {
        return;
    };

    state.status = outcome;
    state.pending_upgrade = None;
    state.queued_upgrades = 0;
    let elapsed_secs = state.elapsed_secs();
    let score = state.score;
    state.emit(SimEvent::RunEnded {
        status: outcome,
        elapsed_secs,
        score,
    });
    info!(?outcome, elapsed_secs, score, kills = state.kills, "run ended");
}

/// Drop every entity destroyed during this step.
pub fn sweep(state: &mut RunState) {
    let before = state.enemies.len() + state.bullets.len() + state.powerups.len();
    state.enemies.retain(|e| e.alive);
    state.bullets.retain(|b| b.alive);
    state.powerups.retain(|p| p.alive);
    let removed = before - (state.enemies.len() + state.bullets.len() + state.powerups.len());
    if removed > 0 {
        debug!(removed, "swept destroyed entities");
    }
}
