//! Cumulative per-player leaderboard.
//!
//! Each finished game adds its score to the player's running total. The
//! board is saved as JSON after every game.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::CollaboratorError;
use crate::hooks::ScoreReporter;
use crate::session::unix_now;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: String,
    pub total_score: u64,
    pub games_played: u32,
    pub best_score: u32,
    /// Unix seconds of the most recent game.
    pub last_played: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Add one finished game to `player`'s totals.
    pub fn record(&mut self, player: &str, score: u32, now: u64) {
        match self.entries.iter_mut().find(|e| e.player.eq_ignore_ascii_case(player)) {
            Some(entry) => {
                entry.total_score += u64::from(score);
                entry.games_played += 1;
                entry.best_score = entry.best_score.max(score);
                entry.last_played = now;
            }
            None => self.entries.push(LeaderboardEntry {
                player: player.to_string(),
                total_score: u64::from(score),
                games_played: 1,
                best_score: score,
                last_played: now,
            }),
        }
        self.entries.sort_by(|a, b| b.total_score.cmp(&a.total_score));
    }

    /// `(rank, entry)` pairs, best first, ranks starting at 1.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &LeaderboardEntry)> {
        self.entries.iter().enumerate().map(|(i, e)| (i + 1, e))
    }

    pub fn get(&self, player: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.player.eq_ignore_ascii_case(player))
    }

    /// Load from `path`; a missing or unreadable file yields an empty board.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("No leaderboard file found at {:?}, starting fresh", path);
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(board) => board,
                Err(e) => {
                    warn!("Failed to parse leaderboard: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read leaderboard file: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), CollaboratorError> {
        write_json(path, &serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn write_json(path: &Path, json: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)
}

/// `ScoreReporter` backed by a local leaderboard file. Each report is
/// written before it returns, so a failed save belongs to the game that
/// caused it.
pub struct LocalLeaderboard {
    player: String,
    board: Leaderboard,
    path: Option<PathBuf>,
}

impl LocalLeaderboard {
    /// `<data dir>/space_hooligans/leaderboard.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("space_hooligans").join("leaderboard.json"))
    }

    pub fn open(player: &str, path: Option<PathBuf>) -> Self {
        let board = path.as_deref().map(Leaderboard::load).unwrap_or_default();
        Self {
            player: player.to_string(),
            board,
            path,
        }
    }

    pub fn board(&self) -> &Leaderboard {
        &self.board
    }
}

impl ScoreReporter for LocalLeaderboard {
    fn report_final_score(&mut self, score: u32) -> Result<(), CollaboratorError> {
        // Kept in memory even when the save fails.
        self.board.record(&self.player, score, unix_now());
        info!(player = %self.player, score, "score recorded");

        if let Some(path) = &self.path {
            self.board.save(path)?;
        }
        Ok(())
    }
}
