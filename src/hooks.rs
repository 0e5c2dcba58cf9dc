//! Seams to the host environment.
//!
//! The core never owns input devices, UI widgets, payment state or score
//! storage. It reads and notifies them through these traits, and every
//! call is expected to return promptly: anything slow belongs on the
//! collaborator's side of the seam.

use crate::entities::GameStatus;
use crate::error::CollaboratorError;

/// Pointer position and discrete fire presses.
pub trait InputProvider {
    /// Current pointer position in canvas units.
    fn pointer(&self) -> (f64, f64);
    /// Fire presses since the last call.
    fn take_fire_events(&mut self) -> u32;
}

/// The pay-to-play gate.
pub trait PaymentSession {
    fn has_valid_session(&self) -> bool;
    /// Lives bought with the current session. Zero means "use the default".
    fn lives_granted(&self) -> u32;
    /// Called once all lives of a session are spent.
    fn invalidate_session(&mut self);
}

/// Receives each finished game's score.
pub trait ScoreReporter {
    fn report_final_score(&mut self, score: u32) -> Result<(), CollaboratorError>;
}

/// Values shown in the score/lives/intensity readouts.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub high_score: u32,
    pub lives: u32,
    pub intensity: f64,
    pub invincible: bool,
}

impl Hud {
    /// Score with thousands separators, e.g. `12,300`.
    pub fn score_text(&self) -> String {
        group_thousands(self.score)
    }

    /// Multiplier with one decimal, e.g. `1.2x`.
    pub fn intensity_text(&self) -> String {
        format!("{:.1}x", self.intensity)
    }
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Externally owned UI: overlays and readouts.
pub trait GameUi {
    /// Called on every state transition.
    fn status_changed(&mut self, status: GameStatus, hud: &Hud);
    /// Called every playing tick.
    fn refresh_hud(&mut self, hud: &Hud);
    fn life_lost(&mut self, lives_remaining: u32);
    fn game_over(&mut self, score: u32, high_score: u32);
    /// A start was requested without a valid session.
    fn session_required(&mut self) {}
    fn score_submission_failed(&mut self, _error: &CollaboratorError) {}
}

/// The collaborators a transition may talk to, passed in explicitly.
pub struct Collaborators<'a> {
    pub session: &'a mut dyn PaymentSession,
    pub scores: &'a mut dyn ScoreReporter,
    pub ui: &'a mut dyn GameUi,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_text_groups_thousands() {
        let hud = Hud {
            score: 1_234_500,
            high_score: 0,
            lives: 5,
            intensity: 1.0,
            invincible: false,
        };
        assert_eq!(hud.score_text(), "1,234,500");
        assert_eq!(group_thousands(100), "100");
        assert_eq!(group_thousands(0), "0");
    }

    #[test]
    fn intensity_text_has_one_decimal() {
        let hud = Hud {
            score: 0,
            high_score: 0,
            lives: 5,
            intensity: 1.2000000000000002,
            invincible: false,
        };
        assert_eq!(hud.intensity_text(), "1.2x");
    }
}
