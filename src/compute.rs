/// Game state machine and per-tick logic.
///
/// `Game` is the single context owning every piece of mutable game state.
/// Hosts construct one, then drive it through `start_game`, `update`,
/// `draw`, `shoot` and `continue_game`, handing in the collaborators each
/// call needs. All randomness comes through an injected `Rng` so tests can
/// use a seeded generator.

use std::f64::consts::TAU;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::collision::is_colliding;
use crate::config::GameConfig;
use crate::entities::{
    Bounds, Bullet, Enemy, EnemySpawn, Entity, GameStatus, Particle, Player,
};
use crate::error::GameError;
use crate::hooks::{Collaborators, Hud};
use crate::intensity::{compute_intensity, spawn_rate_for};
use crate::pool::{EntityPools, Pool, Poolable};
use crate::surface::DrawSurface;

/// Alpha applied to the particle layer.
const PARTICLE_LAYER_ALPHA: f64 = 0.8;

/// Outcome of a transition request. Requests that make no sense in the
/// current state are no-ops, never errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Ignored,
}

pub struct Game {
    config: GameConfig,
    bounds: Bounds,
    status: GameStatus,
    score: u32,
    high_score: u32,
    lives: u32,
    intensity: f64,
    spawn_rate: f64,
    invincible: bool,
    /// Host timestamp at which invincibility lapses. `None` while
    /// invincibility is latched by a hit awaiting `continue_game`.
    invincible_until: Option<f64>,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub pools: EntityPools,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let bounds = Bounds::new(config.canvas_width, config.canvas_height);
        let spawn_rate = config.base_spawn_rate;
        let pools = EntityPools::prewarmed(config.pool_prewarm);
        Self {
            bounds,
            status: GameStatus::Menu,
            score: 0,
            high_score: 0,
            lives: config.default_lives,
            intensity: 1.0,
            spawn_rate,
            invincible: false,
            invincible_until: None,
            player: Player::centered(bounds),
            bullets: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            pools,
            config,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn spawn_rate(&self) -> f64 {
        self.spawn_rate
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible
    }

    pub fn invincible_until(&self) -> Option<f64> {
        self.invincible_until
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            high_score: self.high_score,
            lives: self.lives,
            intensity: self.intensity,
            invincible: self.invincible,
        }
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    /// menu | gameOver → playing, gated on a valid payment session.
    pub fn start_game(&mut self, io: &mut Collaborators<'_>) -> Result<Transition, GameError> {
        if matches!(self.status, GameStatus::Playing | GameStatus::LifeLost) {
            debug!(status = ?self.status, "start ignored, game already running");
            return Ok(Transition::Ignored);
        }
        if !io.session.has_valid_session() {
            warn!("start refused: no valid session");
            io.ui.session_required();
            return Err(GameError::NoValidSession);
        }

        self.clear_entities();
        self.score = 0;
        self.lives = match io.session.lives_granted() {
            0 => self.config.default_lives,
            granted => granted,
        };
        self.invincible = false;
        self.invincible_until = None;
        self.intensity = 1.0;
        self.spawn_rate = self.config.base_spawn_rate;
        self.player = Player::centered(self.bounds);
        self.status = GameStatus::Playing;

        info!(lives = self.lives, "game started");
        let hud = self.hud();
        io.ui.status_changed(GameStatus::Playing, &hud);
        io.ui.refresh_hud(&hud);
        Ok(Transition::Applied)
    }

    /// playing → lifeLost, or → gameOver when this was the last life.
    pub fn lose_life(&mut self, io: &mut Collaborators<'_>) -> Transition {
        if self.status != GameStatus::Playing {
            debug!(status = ?self.status, "life loss ignored");
            return Transition::Ignored;
        }

        self.lives = self.lives.saturating_sub(1);
        io.ui.refresh_hud(&self.hud());

        if self.lives == 0 {
            info!("no lives remaining");
            io.session.invalidate_session();
            return self.game_over(io);
        }

        self.pools.enemies.release_all(&mut self.enemies);
        self.pools.bullets.release_all(&mut self.bullets);
        self.player.recenter(self.bounds);
        self.status = GameStatus::LifeLost;

        info!(lives = self.lives, "life lost");
        io.ui.status_changed(GameStatus::LifeLost, &self.hud());
        io.ui.life_lost(self.lives);
        Transition::Applied
    }

    /// lifeLost → playing with a fresh invincibility window starting at
    /// `now_ms`. Replaces any earlier deadline.
    pub fn continue_game(&mut self, now_ms: f64, io: &mut Collaborators<'_>) -> Transition {
        if self.status != GameStatus::LifeLost {
            debug!(status = ?self.status, "continue ignored");
            return Transition::Ignored;
        }

        self.status = GameStatus::Playing;
        self.invincible = true;
        self.invincible_until = Some(now_ms + self.config.invincibility_ms);

        info!(
            until_ms = now_ms + self.config.invincibility_ms,
            "continuing with invincibility"
        );
        let hud = self.hud();
        io.ui.status_changed(GameStatus::Playing, &hud);
        io.ui.refresh_hud(&hud);
        Transition::Applied
    }

    /// playing → gameOver. A second call is a no-op, so the score is
    /// reported exactly once.
    pub fn game_over(&mut self, io: &mut Collaborators<'_>) -> Transition {
        if self.status != GameStatus::Playing {
            debug!(status = ?self.status, "game over ignored");
            return Transition::Ignored;
        }
        self.status = GameStatus::GameOver;

        if let Err(err) = io.scores.report_final_score(self.score) {
            warn!(score = self.score, error = %err, "failed to report final score");
            io.ui.score_submission_failed(&err);
        }

        if self.score > self.high_score {
            self.high_score = self.score;
            info!(high_score = self.high_score, "new high score");
        }

        info!(score = self.score, "game over");
        io.ui.status_changed(GameStatus::GameOver, &self.hud());
        io.ui.game_over(self.score, self.high_score);
        Transition::Applied
    }

    /// gameOver → menu.
    pub fn return_to_menu(&mut self, io: &mut Collaborators<'_>) -> Transition {
        if self.status != GameStatus::GameOver {
            debug!(status = ?self.status, "return to menu ignored");
            return Transition::Ignored;
        }
        self.clear_entities();
        self.status = GameStatus::Menu;
        io.ui.status_changed(GameStatus::Menu, &self.hud());
        Transition::Applied
    }

    // ── Actions ──────────────────────────────────────────────────────────────

    /// Fire from the muzzle along the current facing. Returns `false` when
    /// not playing or the bullet cap is reached.
    pub fn shoot(&mut self) -> bool {
        if self.status != GameStatus::Playing || self.bullets.len() >= self.config.max_bullets {
            return false;
        }
        let (x, y) = self.player.muzzle();
        let bullet = self.pools.bullets.acquire((x, y, self.player.angle));
        self.bullets.push(bullet);
        true
    }

    pub fn spawn_enemy(&mut self, rng: &mut impl Rng) {
        let spawn = EnemySpawn::roll(
            self.bounds,
            self.score,
            self.config.four_sided_score,
            self.intensity,
            rng,
        );
        self.spawn_enemy_with(spawn);
    }

    pub fn spawn_enemy_with(&mut self, spawn: EnemySpawn) {
        let enemy = self.pools.enemies.acquire(spawn);
        self.enemies.push(enemy);
    }

    /// Burst of evenly spaced particles centred on `(x, y)`.
    pub fn add_explosion(&mut self, x: f64, y: f64) {
        let count = self.config.explosion_particles;
        for i in 0..count {
            let angle = TAU * i as f64 / count as f64;
            let particle = self.pools.particles.acquire((x, y, angle));
            self.particles.push(particle);
        }
    }

    // ── Per-tick update ──────────────────────────────────────────────────────

    /// Advance one frame. `elapsed_ms` should already be clamped by the
    /// scheduler; `now_ms` is the host's frame timestamp.
    pub fn update(
        &mut self,
        elapsed_ms: f64,
        now_ms: f64,
        pointer: (f64, f64),
        io: &mut Collaborators<'_>,
        rng: &mut impl Rng,
    ) {
        self.expire_invincibility(now_ms);

        if self.status != GameStatus::Playing {
            return;
        }

        self.player.update(pointer.0, pointer.1);
        self.update_intensity();

        // Memoryless: expected spawns per ms equals the spawn rate.
        if rng.gen::<f64>() < self.spawn_rate * elapsed_ms {
            self.spawn_enemy(rng);
        }

        advance_and_cull(&mut self.bullets, &mut self.pools.bullets, self.bounds);
        advance_and_cull(&mut self.enemies, &mut self.pools.enemies, self.bounds);
        advance_and_cull(&mut self.particles, &mut self.pools.particles, self.bounds);

        self.check_collisions(io);

        io.ui.refresh_hud(&self.hud());
    }

    /// Recompute the multiplier from the score; re-derive the spawn rate
    /// only when it changes.
    pub fn update_intensity(&mut self) {
        let next = compute_intensity(
            self.score,
            &self.config.milestones,
            self.config.intensity_step,
            self.config.max_intensity,
        );
        if next != self.intensity {
            self.intensity = next;
            self.spawn_rate = spawn_rate_for(self.config.base_spawn_rate, next);
            info!(intensity = next, spawn_rate = self.spawn_rate, "intensity changed");
        }
    }

    fn expire_invincibility(&mut self, now_ms: f64) {
        if let Some(until) = self.invincible_until {
            if now_ms >= until {
                self.invincible = false;
                self.invincible_until = None;
                debug!(now_ms, "invincibility ended");
            }
        }
    }

    // ── Collisions ───────────────────────────────────────────────────────────

    /// Bullet×enemy then player×enemy.
    pub fn check_collisions(&mut self, io: &mut Collaborators<'_>) {
        self.resolve_bullet_hits();
        self.resolve_player_hit(io);
    }

    /// Each bullet destroys at most one enemy. Both lists are walked from
    /// the back so removal keeps the remaining indices valid.
    fn resolve_bullet_hits(&mut self) {
        for i in (0..self.bullets.len()).rev() {
            let hit = (0..self.enemies.len())
                .rev()
                .find(|&j| is_colliding(&self.bullets[i], &self.enemies[j]));
            let Some(j) = hit else {
                continue;
            };

            let bullet = self.bullets.remove(i);
            let enemy = self.enemies.remove(j);
            let (cx, cy) = enemy.center();
            self.pools.bullets.release(bullet);
            self.pools.enemies.release(enemy);

            self.score += self.config.points_per_kill;
            self.add_explosion(cx, cy);
        }
    }

    fn resolve_player_hit(&mut self, io: &mut Collaborators<'_>) {
        if self.invincible || self.status != GameStatus::Playing {
            return;
        }
        let Some(enemy) = self.enemies.iter().find(|e| is_colliding(&self.player, *e)) else {
            return;
        };
        debug!(
            player_x = self.player.x,
            player_y = self.player.y,
            enemy_x = enemy.x,
            enemy_y = enemy.y,
            "player hit"
        );
        // Latch before the transition so nothing else this frame counts.
        self.invincible = true;
        self.lose_life(io);
    }

    // ── Draw ─────────────────────────────────────────────────────────────────

    /// Render the playfield. The last frame stays up under the game-over
    /// overlay; other states only clear.
    pub fn draw(&self, surface: &mut dyn DrawSurface, now_ms: f64) {
        surface.clear();
        if !matches!(self.status, GameStatus::Playing | GameStatus::GameOver) {
            return;
        }

        surface.save();
        surface.set_alpha(PARTICLE_LAYER_ALPHA);
        for particle in &self.particles {
            particle.draw(surface);
        }
        surface.set_alpha(1.0);
        for bullet in &self.bullets {
            bullet.draw(surface);
        }
        for enemy in &self.enemies {
            enemy.draw(surface);
        }
        self.player.draw(surface, self.invincible, now_ms);
        surface.restore();
    }

    fn clear_entities(&mut self) {
        self.pools.bullets.release_all(&mut self.bullets);
        self.pools.enemies.release_all(&mut self.enemies);
        self.pools.particles.release_all(&mut self.particles);
    }
}

/// Update every live entity and return culled ones to the pool. Walks from
/// the back so removals do not disturb unvisited indices.
fn advance_and_cull<T: Entity + Poolable>(live: &mut Vec<T>, pool: &mut Pool<T>, bounds: Bounds) {
    for i in (0..live.len()).rev() {
        live[i].update();
        if live[i].should_cull(bounds) {
            let gone = live.remove(i);
            pool.release(gone);
        }
    }
}
