use survival_shooter::entities::Vec2;
use survival_shooter::util::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(99)
}

#[test]
fn between_is_inclusive() {
    let mut rng = seeded_rng();
    let rolls: Vec<i32> = (0..200).map(|_| between(&mut rng, 1, 3)).collect();
    assert!(rolls.iter().all(|r| (1..=3).contains(r)));
    assert!(rolls.contains(&1) && rolls.contains(&3));
}

#[test]
fn float_between_handles_empty_range() {
    let mut rng = seeded_rng();
    assert_eq!(float_between(&mut rng, 5.0, 5.0), 5.0);
    assert_eq!(float_between(&mut rng, 8.0, 2.0), 8.0);
}

#[test]
fn chance_extremes() {
    let mut rng = seeded_rng();
    assert!((0..500).all(|_| !chance(&mut rng, 0)));
    assert!((0..500).all(|_| chance(&mut rng, 100)));
}

#[test]
fn edge_points_lie_on_the_border() {
    let mut rng = seeded_rng();
    let size = 2000.0;
    let mut edges = [false; 4];
    for _ in 0..400 {
        let p = edge_point(&mut rng, size);
        assert!((0.0..=size).contains(&p.x) && (0.0..=size).contains(&p.y));
        let on = [p.x == 0.0, p.x == size, p.y == 0.0, p.y == size];
        assert!(on.iter().any(|&b| b), "{p:?} is not on an edge");
        for (seen, hit) in edges.iter_mut().zip(on) {
            *seen |= hit;
        }
    }
    assert_eq!(edges, [true; 4]);
}

#[test]
fn ring_points_keep_their_radius() {
    let mut rng = seeded_rng();
    let centre = Vec2::new(500.0, 500.0);
    for _ in 0..50 {
        let p = ring_point(&mut rng, centre, 150.0);
        assert!((distance(centre, p) - 150.0).abs() < 0.01);
    }
}

#[test]
fn clamp_keeps_points_inside() {
    assert_eq!(
        clamp_to_world(Vec2::new(-10.0, 2500.0), 2000.0),
        Vec2::new(0.0, 2000.0)
    );
    assert_eq!(
        clamp_to_world(Vec2::new(3.0, 4.0), 2000.0),
        Vec2::new(3.0, 4.0)
    );
}

#[test]
fn angle_and_velocity_agree() {
    let a = angle_between(Vec2::ZERO, Vec2::new(0.0, 10.0));
    assert!((a - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    let v = velocity_from_angle(a, 300.0);
    assert!(v.x.abs() < 1e-3);
    assert!((v.y - 300.0).abs() < 1e-3);
}

#[test]
fn health_ratio_is_bounded() {
    assert_eq!(health_ratio(50.0, 100.0), 0.5);
    assert_eq!(health_ratio(-20.0, 100.0), 0.0);
    assert_eq!(health_ratio(600.0, 100.0), 1.0);
}

#[test]
fn health_ratio_never_divides_by_zero() {
    assert_eq!(health_ratio(10.0, 0.0), 0.0);
    assert_eq!(health_ratio(10.0, -5.0), 0.0);
    assert_eq!(health_ratio(10.0, f32::NAN), 0.0);
    assert_eq!(health_ratio(f32::NAN, 100.0), 0.0);
    assert!(health_ratio(0.0, 0.0).is_finite());
}

#[test]
fn shuffle_keeps_every_item() {
    let mut rng = seeded_rng();
    let mut items = [1, 2, 3, 4, 5];
    shuffle(&mut rng, &mut items[..]);
    let mut sorted = items;
    sorted.sort_unstable();
    assert_eq!(sorted, [1, 2, 3, 4, 5]);
}
