//! Random draws and small geometry helpers shared by every system.

use std::f32::consts::TAU;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::Vec2;

/// Uniform integer in `lo..=hi`.
pub fn between(rng: &mut impl Rng, lo: i32, hi: i32) -> i32 {
    rng.gen_range(lo..=hi)
}

/// Uniform float in `lo..=hi`. Returns `lo` when the range is empty.
pub fn float_between(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        return lo;
    }
    rng.gen_range(lo..=hi)
}

/// Percentage roll: true with probability `percent / 100`.
pub fn chance(rng: &mut impl Rng, percent: u32) -> bool {
    rng.gen_range(0..100) < percent
}

pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Angle of the line from `from` to `to`, in radians.
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

pub fn velocity_from_angle(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos() * speed, angle.sin() * speed)
}

pub fn shuffle<T>(rng: &mut impl Rng, items: &mut [T]) {
    items.shuffle(rng);
}

pub fn clamp_to_world(p: Vec2, size: f32) -> Vec2 {
    Vec2::new(p.x.clamp(0.0, size), p.y.clamp(0.0, size))
}

/// Uniform point on one of the four edges of a `size`×`size` world.
///
/// Picks the fixed edge value first, then which axis it pins, then a uniform
/// coordinate along the other axis.
pub fn edge_point(rng: &mut impl Rng, size: f32) -> Vec2 {
    let fixed = if rng.gen_bool(0.5) { 0.0 } else { size };
    let along = float_between(rng, 0.0, size);
    if rng.gen_bool(0.5) {
        Vec2::new(fixed, along)
    } else {
        Vec2::new(along, fixed)
    }
}

/// Point on a circle of `radius` around `centre` at a uniform angle.
pub fn ring_point(rng: &mut impl Rng, centre: Vec2, radius: f32) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    Vec2::new(centre.x + angle.cos() * radius, centre.y + angle.sin() * radius)
}

/// Fill fraction for a health bar. A zero or negative max yields an empty bar
/// instead of NaN or infinity.
pub fn health_ratio(current: f32, max: f32) -> f32 {
    if max.is_nan() || max <= 0.0 || !current.is_finite() {
        return 0.0;
    }
    (current / max).clamp(0.0, 1.0)
}
