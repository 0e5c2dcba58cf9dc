/// Game entity types and their per-entity behaviour.
///
/// Positions are canvas units with the origin at the top-left corner and
/// `y` growing downward. Every entity except the player is pooled, so its
/// `reset` must overwrite every field it owns.

use std::f64::consts::PI;

use rand::Rng;

use crate::collision::{Hitbox, Rect};
use crate::pool::{EntityKind, Poolable};
use crate::surface::{DrawSurface, Sprite, BULLET_COLOR, PARTICLE_COLOR, SHIELD_COLOR};

// ── Dimensions ───────────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: f64 = 43.0;
pub const PLAYER_HEIGHT: f64 = 65.0;

pub const ENEMY_SIZE: f64 = 50.0;
pub const ENEMY_BASE_SPEED: f64 = 2.0;
/// Enemies are culled only once this far outside the canvas.
pub const ENEMY_CULL_MARGIN: f64 = 100.0;

pub const BULLET_WIDTH: f64 = 4.0;
pub const BULLET_HEIGHT: f64 = 10.0;
pub const BULLET_SPEED: f64 = 7.0;

pub const PARTICLE_SPEED: f64 = 3.0;
pub const PARTICLE_MAX_LIFE: i32 = 30;
pub const PARTICLE_RADIUS: f64 = 3.0;

// ── Shared types ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Menu,
    Playing,
    LifeLost,
    GameOver,
}

/// Canvas extent used for spawning and culling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Capabilities shared by the pooled, free-moving entities.
pub trait Entity {
    /// Advance one tick.
    fn update(&mut self);
    fn draw(&self, surface: &mut dyn DrawSurface);
    fn is_on_screen(&self, bounds: Bounds) -> bool;

    /// Whether the entity should go back to its pool this tick.
    fn should_cull(&self, bounds: Bounds) -> bool {
        !self.is_on_screen(bounds)
    }
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    /// Facing in radians; 0 points up the screen.
    pub angle: f64,
}

impl Player {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, angle: 0.0 }
    }

    /// Player placed at the canvas centre point.
    pub fn centered(bounds: Bounds) -> Self {
        Self::new(bounds.width / 2.0, bounds.height / 2.0)
    }

    pub fn recenter(&mut self, bounds: Bounds) {
        self.x = bounds.width / 2.0;
        self.y = bounds.height / 2.0;
    }

    /// Turn to face the pointer.
    pub fn update(&mut self, pointer_x: f64, pointer_y: f64) {
        let (cx, cy) = self.center();
        let dx = pointer_x - cx;
        let dy = pointer_y - cy;
        self.angle = dy.atan2(dx) + PI / 2.0;
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + PLAYER_WIDTH / 2.0, self.y + PLAYER_HEIGHT / 2.0)
    }

    /// Where new bullets appear.
    pub fn muzzle(&self) -> (f64, f64) {
        self.center()
    }

    /// Draw the sprite rotated to the facing angle. The sprite's nose points
    /// down in the image, hence the extra half turn.
    pub fn draw(&self, surface: &mut dyn DrawSurface, invincible: bool, now_ms: f64) {
        let (cx, cy) = self.center();
        surface.save();
        surface.translate(cx, cy);
        surface.rotate(self.angle + PI);

        let t = now_ms * 0.01;
        if invincible {
            surface.set_alpha(0.6 + t.sin() * 0.4);
        }
        surface.draw_image(
            Sprite::Player,
            -PLAYER_WIDTH / 2.0,
            -PLAYER_HEIGHT / 2.0,
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
        );
        if invincible {
            surface.set_alpha(0.3 + (t * 3.0).sin() * 0.2);
            surface.stroke_circle(0.0, 0.0, PLAYER_WIDTH * 0.8, 3.0, SHIELD_COLOR);
        }
        surface.restore();
    }
}

impl Hitbox for Player {
    fn hitbox(&self) -> Rect {
        Rect::new(self.x, self.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }
}

// ── Enemy ────────────────────────────────────────────────────────────────────

/// How a new enemy enters the canvas. Chosen purely from the score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnPattern {
    /// Falls straight down from above the top edge.
    TopDown,
    /// Enters from a random edge with lateral drift.
    FourSided,
}

impl SpawnPattern {
    pub fn for_score(score: u32, four_sided_score: u32) -> Self {
        if score >= four_sided_score {
            SpawnPattern::FourSided
        } else {
            SpawnPattern::TopDown
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];
}

/// Everything an enemy needs to be (re)initialised. All randomness has
/// already been rolled, so `Enemy::reset` is a plain copy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySpawn {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub speed: f64,
}

impl EnemySpawn {
    /// Roll a spawn for the current score and intensity.
    pub fn roll(
        bounds: Bounds,
        score: u32,
        four_sided_score: u32,
        intensity: f64,
        rng: &mut impl Rng,
    ) -> Self {
        match SpawnPattern::for_score(score, four_sided_score) {
            SpawnPattern::TopDown => Self::top_down(bounds, intensity, rng.gen::<f64>()),
            SpawnPattern::FourSided => {
                let edge = Edge::ALL[rng.gen_range(0..Edge::ALL.len())];
                Self::from_edge(edge, bounds, intensity, rng.gen::<f64>(), rng.gen::<f64>())
            }
        }
    }

    /// `r_x` in `[0, 1)` picks the column.
    pub fn top_down(bounds: Bounds, intensity: f64, r_x: f64) -> Self {
        let speed = ENEMY_BASE_SPEED * intensity;
        Self {
            x: r_x * (bounds.width - ENEMY_SIZE),
            y: -ENEMY_SIZE,
            dx: 0.0,
            dy: speed,
            speed,
        }
    }

    /// `r_pos` picks the position along the edge, `r_drift` the lateral
    /// velocity; both in `[0, 1)`.
    pub fn from_edge(edge: Edge, bounds: Bounds, intensity: f64, r_pos: f64, r_drift: f64) -> Self {
        let speed = ENEMY_BASE_SPEED * intensity;
        let drift = (r_drift - 0.5) * 2.0 * intensity;
        let along_x = r_pos * (bounds.width - ENEMY_SIZE);
        let along_y = r_pos * (bounds.height - ENEMY_SIZE);
        let (x, y, dx, dy) = match edge {
            Edge::Top => (along_x, -ENEMY_SIZE, drift, speed),
            Edge::Right => (bounds.width + ENEMY_SIZE, along_y, -speed, drift),
            Edge::Bottom => (along_x, bounds.height + ENEMY_SIZE, drift, -speed),
            Edge::Left => (-ENEMY_SIZE, along_y, speed, drift),
        };
        Self { x, y, dx, dy, speed }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub speed: f64,
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: -ENEMY_SIZE,
            dx: 0.0,
            dy: ENEMY_BASE_SPEED,
            speed: ENEMY_BASE_SPEED,
        }
    }
}

impl Enemy {
    pub fn center(&self) -> (f64, f64) {
        self.hitbox().center()
    }
}

impl Poolable for Enemy {
    type Args = EnemySpawn;
    const KIND: EntityKind = EntityKind::Enemy;

    fn reset(&mut self, spawn: EnemySpawn) {
        self.x = spawn.x;
        self.y = spawn.y;
        self.dx = spawn.dx;
        self.dy = spawn.dy;
        self.speed = spawn.speed;
    }
}

impl Entity for Enemy {
    fn update(&mut self) {
        self.x += self.dx;
        self.y += self.dy;
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        surface.draw_image(Sprite::Enemy, self.x, self.y, ENEMY_SIZE, ENEMY_SIZE);
    }

    fn is_on_screen(&self, bounds: Bounds) -> bool {
        self.x > -ENEMY_SIZE - ENEMY_CULL_MARGIN
            && self.x < bounds.width + ENEMY_CULL_MARGIN
            && self.y > -ENEMY_SIZE - ENEMY_CULL_MARGIN
            && self.y < bounds.height + ENEMY_CULL_MARGIN
    }
}

impl Hitbox for Enemy {
    fn hitbox(&self) -> Rect {
        Rect::new(self.x, self.y, ENEMY_SIZE, ENEMY_SIZE)
    }
}

// ── Bullet ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bullet {
    pub x: f64,
    pub y: f64,
    /// Fixed at fire time; 0 travels straight up.
    pub angle: f64,
}

/// `(x, y, angle)`
pub type BulletArgs = (f64, f64, f64);

impl Poolable for Bullet {
    type Args = BulletArgs;
    const KIND: EntityKind = EntityKind::Bullet;

    fn reset(&mut self, (x, y, angle): BulletArgs) {
        self.x = x;
        self.y = y;
        self.angle = angle;
    }
}

impl Entity for Bullet {
    fn update(&mut self) {
        self.x += self.angle.sin() * BULLET_SPEED;
        self.y -= self.angle.cos() * BULLET_SPEED;
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        surface.save();
        surface.translate(self.x, self.y);
        surface.rotate(self.angle);
        surface.fill_rect(
            -BULLET_WIDTH / 2.0,
            -BULLET_HEIGHT / 2.0,
            BULLET_WIDTH,
            BULLET_HEIGHT,
            BULLET_COLOR,
        );
        surface.restore();
    }

    /// No margin: a bullet is gone the moment it leaves the canvas.
    fn is_on_screen(&self, bounds: Bounds) -> bool {
        self.x > 0.0 && self.x < bounds.width && self.y > 0.0 && self.y < bounds.height
    }
}

impl Hitbox for Bullet {
    fn hitbox(&self) -> Rect {
        Rect::new(self.x, self.y, BULLET_WIDTH, BULLET_HEIGHT)
    }
}

// ── Particle ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Ticks remaining; returned to the pool at zero.
    pub life: i32,
    pub max_life: i32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            vx: PARTICLE_SPEED,
            vy: 0.0,
            life: PARTICLE_MAX_LIFE,
            max_life: PARTICLE_MAX_LIFE,
        }
    }
}

/// `(x, y, angle)`
pub type ParticleArgs = (f64, f64, f64);

impl Poolable for Particle {
    type Args = ParticleArgs;
    const KIND: EntityKind = EntityKind::Particle;

    fn reset(&mut self, (x, y, angle): ParticleArgs) {
        self.x = x;
        self.y = y;
        self.vx = angle.cos() * PARTICLE_SPEED;
        self.vy = angle.sin() * PARTICLE_SPEED;
        self.life = PARTICLE_MAX_LIFE;
        self.max_life = PARTICLE_MAX_LIFE;
    }
}

impl Entity for Particle {
    fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.life -= 1;
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        surface.set_alpha(self.life as f64 / self.max_life as f64);
        surface.fill_circle(self.x, self.y, PARTICLE_RADIUS, PARTICLE_COLOR);
    }

    /// Only informational: culling goes through `should_cull`, which ignores
    /// the canvas edges.
    fn is_on_screen(&self, bounds: Bounds) -> bool {
        self.x >= 0.0 && self.x < bounds.width && self.y >= 0.0 && self.y < bounds.height
    }

    /// Particles fade out on their own; leaving the canvas does not cull them.
    fn should_cull(&self, _bounds: Bounds) -> bool {
        self.life <= 0
    }
}
