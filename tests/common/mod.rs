#![allow(dead_code)]

use space_hooligans::entities::GameStatus;
use space_hooligans::error::CollaboratorError;
use space_hooligans::hooks::{Collaborators, GameUi, Hud, InputProvider, PaymentSession, ScoreReporter};
use space_hooligans::surface::{DrawSurface, Rgb, Sprite};
use space_hooligans::GameConfig;

use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Default tunables with random spawning switched off.
pub fn quiet_config() -> GameConfig {
    GameConfig {
        base_spawn_rate: 0.0,
        ..GameConfig::default()
    }
}

// ── Collaborator fakes ────────────────────────────────────────────────────────

pub struct FakeSession {
    pub valid: bool,
    pub lives: u32,
    pub invalidated: u32,
}

impl PaymentSession for FakeSession {
    fn has_valid_session(&self) -> bool {
        self.valid
    }

    fn lives_granted(&self) -> u32 {
        self.lives
    }

    fn invalidate_session(&mut self) {
        self.valid = false;
        self.invalidated += 1;
    }
}

#[derive(Default)]
pub struct FakeScores {
    pub reported: Vec<u32>,
    pub fail: bool,
}

impl ScoreReporter for FakeScores {
    fn report_final_score(&mut self, score: u32) -> Result<(), CollaboratorError> {
        self.reported.push(score);
        if self.fail {
            return Err(CollaboratorError::Submission("offline".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingUi {
    pub statuses: Vec<GameStatus>,
    pub last_hud: Option<Hud>,
    pub hud_refreshes: usize,
    pub lives_lost: Vec<u32>,
    pub game_overs: Vec<(u32, u32)>,
    pub session_required: usize,
    pub submission_failures: usize,
}

impl GameUi for RecordingUi {
    fn status_changed(&mut self, status: GameStatus, hud: &Hud) {
        self.statuses.push(status);
        self.last_hud = Some(hud.clone());
    }

    fn refresh_hud(&mut self, hud: &Hud) {
        self.hud_refreshes += 1;
        self.last_hud = Some(hud.clone());
    }

    fn life_lost(&mut self, lives_remaining: u32) {
        self.lives_lost.push(lives_remaining);
    }

    fn game_over(&mut self, score: u32, high_score: u32) {
        self.game_overs.push((score, high_score));
    }

    fn session_required(&mut self) {
        self.session_required += 1;
    }

    fn score_submission_failed(&mut self, _error: &CollaboratorError) {
        self.submission_failures += 1;
    }
}

/// All three collaborators, owned together so tests can borrow them as one.
pub struct Harness {
    pub session: FakeSession,
    pub scores: FakeScores,
    pub ui: RecordingUi,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_lives(5)
    }

    pub fn with_lives(lives: u32) -> Self {
        Self {
            session: FakeSession {
                valid: true,
                lives,
                invalidated: 0,
            },
            scores: FakeScores::default(),
            ui: RecordingUi::default(),
        }
    }

    pub fn io(&mut self) -> Collaborators<'_> {
        Collaborators {
            session: &mut self.session,
            scores: &mut self.scores,
            ui: &mut self.ui,
        }
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

pub struct ScriptedInput {
    pub pointer: (f64, f64),
    pub fire: u32,
}

impl InputProvider for ScriptedInput {
    fn pointer(&self) -> (f64, f64) {
        self.pointer
    }

    fn take_fire_events(&mut self) -> u32 {
        std::mem::take(&mut self.fire)
    }
}

// ── Drawing ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear,
    Save,
    Restore,
    Translate(f64, f64),
    Rotate(f64),
    Alpha(f64),
    Image(Sprite),
    Rect(Rgb),
    Circle(Rgb),
    Ring(Rgb),
}

#[derive(Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn count(&self, op: &DrawOp) -> usize {
        self.ops.iter().filter(|o| *o == op).count()
    }

    pub fn rings(&self) -> usize {
        self.ops.iter().filter(|o| matches!(o, DrawOp::Ring(_))).count()
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::Translate(x, y));
    }

    fn rotate(&mut self, radians: f64) {
        self.ops.push(DrawOp::Rotate(radians));
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.ops.push(DrawOp::Alpha(alpha));
    }

    fn draw_image(&mut self, sprite: Sprite, _x: f64, _y: f64, _w: f64, _h: f64) {
        self.ops.push(DrawOp::Image(sprite));
    }

    fn fill_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64, color: Rgb) {
        self.ops.push(DrawOp::Rect(color));
    }

    fn fill_circle(&mut self, _x: f64, _y: f64, _r: f64, color: Rgb) {
        self.ops.push(DrawOp::Circle(color));
    }

    fn stroke_circle(&mut self, _x: f64, _y: f64, _r: f64, _lw: f64, color: Rgb) {
        self.ops.push(DrawOp::Ring(color));
    }
}
