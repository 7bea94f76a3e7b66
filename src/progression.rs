//! Score, experience, level-ups and the upgrade choice.

use rand::Rng;
use tracing::info;

use crate::entities::{GameStatus, Player, RunState, SimEvent, UpgradeKind, UpgradeOffer};
use crate::error::SimError;
use crate::tuning::ProgressionTuning;
use crate::util::shuffle;

/// `2^(level-1)`: the stat multiplier for enemies at a player level, and for
/// a boss at its escalation level.
pub fn level_multiplier(level: u32) -> f32 {
    2f32.powi(level.saturating_sub(1) as i32)
}

/// Score only ever grows.
pub fn add_score(state: &mut RunState, amount: u32) {
    state.score = state.score.saturating_add(amount);
}

pub fn gain_xp(state: &mut RunState, amount: u32, rng: &mut impl Rng) -> u32 {
    state.player.xp = state.player.xp.saturating_add(amount);
    check_level_up(state, rng)
}

/// Consume XP threshold by threshold. Each level raises the next threshold,
/// grows and refills max health, rescales enemies and queues one upgrade
/// choice. Returns the number of levels gained.
pub fn check_level_up(state: &mut RunState, rng: &mut impl Rng) -> u32 {
    let mut gained = 0;
    while state.player.xp >= state.player.xp_to_next {
        let progression = &state.tuning.progression;
        let player = &mut state.player;
        player.xp -= player.xp_to_next;
        player.level += 1;
        player.xp_to_next += progression.xp_step;
        player.max_health += progression.max_health_step;
        player.health = player.max_health;

        let level = player.level;
        state.enemy_level_multiplier = level_multiplier(level);
        state.emit(SimEvent::LevelUp { level });
        info!(level, xp_to_next = state.player.xp_to_next, "level up");

        queue_upgrade(state, rng);
        gained += 1;
    }
    gained
}

fn queue_upgrade(state: &mut RunState, rng: &mut impl Rng) {
    if state.pending_upgrade.is_some() {
        state.queued_upgrades += 1;
    } else {
        offer_upgrade(state, rng);
    }
}

/// Draw distinct options from the upgrade pool and pause the run on them.
fn offer_upgrade(state: &mut RunState, rng: &mut impl Rng) {
    let mut pool = UpgradeKind::ALL;
    shuffle(rng, &mut pool[..]);
    let take = state.tuning.progression.upgrade_choices.min(pool.len());
    let options = pool[..take].to_vec();

    state.emit(SimEvent::UpgradeOffered {
        options: options.clone(),
    });
    state.pending_upgrade = Some(UpgradeOffer { options });
    if state.status == GameStatus::Playing {
        state.status = GameStatus::AwaitingUpgrade;
    }
}

/// Apply one stat boost. Fire rate stops at its floor; everything else is
/// plain addition, including heal, which may exceed max health.
pub fn apply_upgrade(player: &mut Player, tuning: &ProgressionTuning, kind: UpgradeKind) {
    match kind {
        UpgradeKind::Damage => player.bullet_damage += tuning.damage_upgrade,
        UpgradeKind::Speed => player.speed += tuning.speed_upgrade,
        UpgradeKind::FireRate => {
            if player.fire_rate_ms > tuning.fire_rate_floor_ms {
                player.fire_rate_ms = (player.fire_rate_ms - tuning.fire_rate_upgrade_ms)
                    .max(tuning.fire_rate_floor_ms);
            }
        }
        UpgradeKind::BulletSpeed => player.bullet_speed += tuning.bullet_speed_upgrade,
        UpgradeKind::Heal => player.health += tuning.heal_upgrade,
    }
}

/// Resolve the pending offer with the option at `index`. Resumes the run,
/// or presents the next offer when several levels were gained at once.
pub fn submit_upgrade(
    state: &mut RunState,
    index: usize,
    rng: &mut impl Rng,
) -> Result<UpgradeKind, SimError> {
    let offer = state
        .pending_upgrade
        .as_ref()
        .ok_or(SimError::NoPendingUpgrade)?;
    let kind = *offer
        .options
        .get(index)
        .ok_or(SimError::UpgradeOutOfRange {
            index,
            available: offer.options.len(),
        })?;

    state.pending_upgrade = None;
    apply_upgrade(&mut state.player, &state.tuning.progression, kind);
    state.emit(SimEvent::UpgradeApplied { kind });
    info!(?kind, "upgrade applied");

    if state.queued_upgrades > 0 {
        state.queued_upgrades -= 1;
        offer_upgrade(state, rng);
    } else if state.status == GameStatus::AwaitingUpgrade {
        state.status = GameStatus::Playing;
    }
    Ok(kind)
}
