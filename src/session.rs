//! Local pay-to-play session.
//!
//! Stands in for the wallet collaborator: paying records who paid and when,
//! and the session stays valid for 24 hours or until its lives are spent.
//! The record is kept as JSON next to the other game data.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::CollaboratorError;
use crate::hooks::PaymentSession;

/// How long a payment stays usable.
pub const SESSION_DURATION_SECS: u64 = 24 * 60 * 60;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub player: String,
    /// Unix seconds.
    pub paid_at: u64,
    pub lives: u32,
}

impl SessionRecord {
    pub fn is_valid_at(&self, now: u64) -> bool {
        now.saturating_sub(self.paid_at) < SESSION_DURATION_SECS
    }
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[derive(Debug)]
pub struct LocalSession {
    path: Option<PathBuf>,
    record: Option<SessionRecord>,
    lives_per_payment: u32,
}

impl LocalSession {
    /// `<data dir>/space_hooligans/session.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("space_hooligans").join("session.json"))
    }

    /// A session that is never written to disk.
    pub fn in_memory(lives_per_payment: u32) -> Self {
        Self {
            path: None,
            record: None,
            lives_per_payment,
        }
    }

    /// Load a saved session. Expired or unreadable records are discarded.
    pub fn open(path: &Path, lives_per_payment: u32, now: u64) -> Self {
        let mut session = Self {
            path: Some(path.to_path_buf()),
            record: None,
            lives_per_payment,
        };
        if !path.exists() {
            return session;
        }

        let loaded = fs::read_to_string(path)
            .map_err(CollaboratorError::from)
            .and_then(|s| serde_json::from_str::<SessionRecord>(&s).map_err(CollaboratorError::from));
        match loaded {
            Ok(record) if record.is_valid_at(now) => {
                info!(player = %record.player, "restored play session");
                session.record = Some(record);
            }
            Ok(_) => {
                info!("saved session expired");
                session.forget();
            }
            Err(e) => {
                warn!("discarding unreadable session file: {}", e);
                session.forget();
            }
        }
        session
    }

    /// Record a payment and persist it.
    pub fn pay(&mut self, player: &str, now: u64) -> Result<(), CollaboratorError> {
        let record = SessionRecord {
            player: player.to_string(),
            paid_at: now,
            lives: self.lives_per_payment,
        };
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, serde_json::to_string_pretty(&record)?)?;
        }
        info!(player, lives = record.lives, "payment recorded");
        self.record = Some(record);
        Ok(())
    }

    pub fn record(&self) -> Option<&SessionRecord> {
        self.record.as_ref()
    }

    pub fn is_valid_at(&self, now: u64) -> bool {
        self.record.as_ref().is_some_and(|r| r.is_valid_at(now))
    }

    fn forget(&mut self) {
        self.record = None;
        if let Some(path) = &self.path {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    warn!("failed to remove session file {:?}: {}", path, e);
                }
            }
        }
    }
}

impl PaymentSession for LocalSession {
    fn has_valid_session(&self) -> bool {
        self.is_valid_at(unix_now())
    }

    fn lives_granted(&self) -> u32 {
        self.record.as_ref().map(|r| r.lives).unwrap_or(0)
    }

    fn invalidate_session(&mut self) {
        info!("session invalidated");
        self.forget();
    }
}
