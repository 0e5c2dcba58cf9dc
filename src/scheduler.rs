/// Frame pacing: one update-then-draw cycle per display refresh.
///
/// The host calls `run_frame` from its refresh callback with a monotonic
/// timestamp. Elapsed time is clamped so a stall (a backgrounded tab, a
/// suspended terminal) never turns into a burst of catch-up spawns.

use rand::Rng;

use crate::compute::Game;
use crate::hooks::{Collaborators, InputProvider};
use crate::surface::DrawSurface;

#[derive(Clone, Debug)]
pub struct FrameScheduler {
    max_step_ms: f64,
    last_frame_ms: Option<f64>,
}

impl FrameScheduler {
    pub fn new(max_step_ms: f64) -> Self {
        Self {
            max_step_ms,
            last_frame_ms: None,
        }
    }

    /// Milliseconds since the previous frame, clamped to `[0, max_step_ms]`.
    /// The first frame reports zero.
    pub fn elapsed(&mut self, now_ms: f64) -> f64 {
        let dt = match self.last_frame_ms {
            Some(prev) => (now_ms - prev).clamp(0.0, self.max_step_ms),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        dt
    }

    /// Fire events, then update, then draw. Returns the clamped step used.
    pub fn run_frame(
        &mut self,
        game: &mut Game,
        now_ms: f64,
        input: &mut dyn InputProvider,
        io: &mut Collaborators<'_>,
        surface: &mut dyn DrawSurface,
        rng: &mut impl Rng,
    ) -> f64 {
        let dt = self.elapsed(now_ms);
        for _ in 0..input.take_fire_events() {
            game.shoot();
        }
        game.update(dt, now_ms, input.pointer(), io, rng);
        game.draw(surface, now_ms);
        dt
    }
}
