mod common;

use std::f64::consts::PI;

use space_hooligans::entities::*;
use space_hooligans::pool::{Pool, Poolable};

use common::seeded_rng;

const BOUNDS: Bounds = Bounds { width: 800.0, height: 600.0 };

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn player_faces_up_when_pointer_above() {
    let mut p = Player::new(0.0, 0.0); // centre (21.5, 32.5)
    p.update(21.5, -100.0);
    assert!(close(p.angle, 0.0));
}

#[test]
fn player_faces_right_when_pointer_right() {
    let mut p = Player::new(0.0, 0.0);
    p.update(500.0, 32.5);
    assert!(close(p.angle, PI / 2.0));
}

#[test]
fn player_angle_depends_only_on_pointer() {
    let mut a = Player::new(100.0, 100.0);
    let mut b = Player::new(100.0, 100.0);
    b.angle = 2.5; // stale facing must not matter
    a.update(10.0, 10.0);
    b.update(10.0, 10.0);
    assert_eq!(a.angle, b.angle);
}

#[test]
fn player_centered_and_recenter() {
    let mut p = Player::centered(BOUNDS);
    assert_eq!((p.x, p.y), (400.0, 300.0));
    p.x = 12.0;
    p.y = 34.0;
    p.recenter(BOUNDS);
    assert_eq!((p.x, p.y), (400.0, 300.0));
}

// ── Bullet ────────────────────────────────────────────────────────────────────

#[test]
fn bullet_angle_zero_moves_up() {
    let mut b = Bullet::create((100.0, 100.0, 0.0));
    b.update();
    assert!(close(b.x, 100.0));
    assert!(close(b.y, 100.0 - BULLET_SPEED));
}

#[test]
fn bullet_quarter_turn_moves_right() {
    let mut b = Bullet::create((100.0, 100.0, PI / 2.0));
    b.update();
    assert!(close(b.x, 100.0 + BULLET_SPEED));
    assert!(close(b.y, 100.0));
}

#[test]
fn bullet_has_no_screen_margin() {
    assert!(Bullet::create((1.0, 1.0, 0.0)).is_on_screen(BOUNDS));
    assert!(!Bullet::create((0.0, 300.0, 0.0)).is_on_screen(BOUNDS));
    assert!(!Bullet::create((800.0, 300.0, 0.0)).is_on_screen(BOUNDS));
    assert!(!Bullet::create((400.0, -0.5, 0.0)).is_on_screen(BOUNDS));
    assert!(!Bullet::create((400.0, 600.0, 0.0)).is_on_screen(BOUNDS));
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[test]
fn spawn_pattern_switches_at_threshold() {
    assert_eq!(SpawnPattern::for_score(999, 1000), SpawnPattern::TopDown);
    assert_eq!(SpawnPattern::for_score(1000, 1000), SpawnPattern::FourSided);
}

#[test]
fn top_down_spawn_falls_straight() {
    let s = EnemySpawn::top_down(BOUNDS, 1.5, 0.5);
    assert!(close(s.x, 375.0)); // 0.5 * (800 - 50)
    assert!(close(s.y, -ENEMY_SIZE));
    assert_eq!(s.dx, 0.0);
    assert!(close(s.dy, 3.0)); // base 2 × 1.5
}

#[test]
fn edge_spawns_enter_inward() {
    let right = EnemySpawn::from_edge(Edge::Right, BOUNDS, 1.0, 0.5, 1.0);
    assert!(close(right.x, 850.0));
    assert!(close(right.y, 275.0)); // 0.5 * (600 - 50)
    assert!(close(right.dx, -2.0));
    assert!(close(right.dy, 1.0)); // (1.0 - 0.5) * 2 * 1.0

    let left = EnemySpawn::from_edge(Edge::Left, BOUNDS, 1.0, 0.0, 0.5);
    assert!(close(left.x, -50.0));
    assert!(close(left.dx, 2.0));
    assert!(close(left.dy, 0.0));

    let bottom = EnemySpawn::from_edge(Edge::Bottom, BOUNDS, 1.2, 0.0, 0.0);
    assert!(close(bottom.y, 650.0));
    assert!(close(bottom.dy, -2.4));
    assert!(close(bottom.dx, -1.2));

    let top = EnemySpawn::from_edge(Edge::Top, BOUNDS, 1.0, 1.0, 0.5);
    assert!(close(top.x, 750.0));
    assert!(close(top.y, -50.0));
    assert!(close(top.dy, 2.0));
}

#[test]
fn low_score_rolls_are_always_top_down() {
    let mut rng = seeded_rng();
    for _ in 0..200 {
        let s = EnemySpawn::roll(BOUNDS, 500, 1000, 1.0, &mut rng);
        assert_eq!(s.dx, 0.0);
        assert_eq!(s.y, -ENEMY_SIZE);
        assert!(s.x >= 0.0 && s.x < BOUNDS.width - ENEMY_SIZE);
    }
}

#[test]
fn high_score_rolls_start_outside_and_head_inward() {
    let mut rng = seeded_rng();
    let mut outside_sides = [false; 4];
    for _ in 0..400 {
        let s = EnemySpawn::roll(BOUNDS, 5000, 1000, 1.3, &mut rng);
        assert!(close(s.speed, ENEMY_BASE_SPEED * 1.3));
        if s.y < 0.0 {
            outside_sides[0] = true;
            assert!(s.dy > 0.0);
        } else if s.x > BOUNDS.width {
            outside_sides[1] = true;
            assert!(s.dx < 0.0);
        } else if s.y > BOUNDS.height {
            outside_sides[2] = true;
            assert!(s.dy < 0.0);
        } else {
            assert!(s.x < 0.0);
            outside_sides[3] = true;
            assert!(s.dx > 0.0);
        }
    }
    assert_eq!(outside_sides, [true; 4]);
}

#[test]
fn enemy_culled_only_past_margin() {
    let at = |x: f64, y: f64| {
        Enemy::create(EnemySpawn { x, y, dx: 0.0, dy: 0.0, speed: 0.0 })
    };
    assert!(at(-149.0, 300.0).is_on_screen(BOUNDS));
    assert!(!at(-150.0, 300.0).is_on_screen(BOUNDS));
    assert!(at(899.0, 300.0).is_on_screen(BOUNDS));
    assert!(!at(900.0, 300.0).is_on_screen(BOUNDS));
    assert!(at(400.0, 699.0).is_on_screen(BOUNDS));
    assert!(!at(400.0, 700.0).is_on_screen(BOUNDS));
}

#[test]
fn enemy_moves_by_velocity() {
    let mut e = Enemy::create(EnemySpawn { x: 10.0, y: 20.0, dx: 1.5, dy: -2.0, speed: 2.0 });
    e.update();
    assert_eq!((e.x, e.y), (11.5, 18.0));
}

// ── Particle ──────────────────────────────────────────────────────────────────

#[test]
fn particle_reset_sets_velocity_and_life() {
    let p = Particle::create((5.0, 6.0, PI / 2.0));
    assert!(close(p.vx, 0.0));
    assert!(close(p.vy, PARTICLE_SPEED));
    assert_eq!(p.life, PARTICLE_MAX_LIFE);
    assert_eq!(p.max_life, PARTICLE_MAX_LIFE);
}

#[test]
fn particle_expires_after_max_life_ticks() {
    let mut p = Particle::create((400.0, 300.0, 0.0));
    for _ in 0..PARTICLE_MAX_LIFE - 1 {
        p.update();
        assert!(!p.should_cull(BOUNDS));
    }
    p.update();
    assert_eq!(p.life, 0);
    assert!(p.should_cull(BOUNDS));
}

#[test]
fn particle_off_canvas_is_not_culled_while_alive() {
    let p = Particle::create((-20.0, -20.0, 0.0));
    assert!(!p.is_on_screen(BOUNDS));
    assert!(!p.should_cull(BOUNDS));
}

// ── Reuse leaves no trace of earlier use ──────────────────────────────────────

#[test]
fn reused_particle_matches_fresh_one() {
    let mut pool: Pool<Particle> = Pool::new();
    let mut used = pool.acquire((1.0, 2.0, 0.3));
    for _ in 0..17 {
        used.update();
    }
    pool.release(used);

    let args = (50.0, 60.0, 1.1);
    let reused = pool.acquire(args);
    assert_eq!(reused, Particle::create(args));
}

#[test]
fn reused_enemy_matches_fresh_one() {
    let mut pool: Pool<Enemy> = Pool::with_prewarm(1);
    let mut used = pool.acquire(EnemySpawn::from_edge(Edge::Left, BOUNDS, 1.5, 0.2, 0.9));
    used.update();
    used.update();
    pool.release(used);

    let spawn = EnemySpawn::top_down(BOUNDS, 1.0, 0.25);
    assert_eq!(pool.acquire(spawn), Enemy::create(spawn));
}

#[test]
fn reused_bullet_matches_fresh_one() {
    let mut pool: Pool<Bullet> = Pool::new();
    let mut used = pool.acquire((10.0, 10.0, 2.0));
    used.update();
    pool.release(used);
    assert_eq!(pool.acquire((3.0, 4.0, 0.0)), Bullet::create((3.0, 4.0, 0.0)));
}
