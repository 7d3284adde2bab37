//! JSON persistence for the combat history.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;
use tracing::debug;

use super::{Actor, Combat, CombatHistory, CombatRound, RoundAction};
use crate::error::DiceResult;

/// Location of the history file under a data directory.
pub const HISTORY_FILE: &str = "combat/combat_history.json";

/// Reads and writes `combat/combat_history.json` under a data directory.
///
/// Every operation loads the document, applies one change, and writes it
/// back. There is no locking; one recorder per data directory at a time.
#[derive(Debug, Clone)]
pub struct CombatRecorder {
    path: PathBuf,
}

impl CombatRecorder {
    /// A recorder rooted at `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(HISTORY_FILE),
        }
    }

    /// Path of the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the history. A missing file is an empty history.
    pub fn load(&self) -> DiceResult<CombatHistory> {
        if !self.path.exists() {
            return Ok(CombatHistory::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let history = serde_json::from_str(&content)?;
        Ok(history)
    }

    /// Write the history, creating parent directories as needed.
    ///
    /// The document goes to a temporary file next to the target and is
    /// renamed over it, so readers never see a half-written file.
    pub fn save(&self, history: &CombatHistory) -> DiceResult<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;
        let content = serde_json::to_string_pretty(history)?;
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(content.as_bytes())?;
        file.persist(&self.path).map_err(|e| e.error)?;
        debug!(path = %self.path.display(), "saved combat history");
        Ok(())
    }

    /// Begin a new combat against the named enemies.
    pub fn start_combat(&self, enemies: Vec<String>) -> DiceResult<Combat> {
        let mut history = self.load()?;
        let combat = history.start(enemies, Utc::now()).clone();
        self.save(&history)?;
        Ok(combat)
    }

    /// Log a round in the open combat.
    pub fn record_round(
        &self,
        actor: Actor,
        action: RoundAction,
        round: Option<u32>,
    ) -> DiceResult<CombatRound> {
        let mut history = self.load()?;
        let entry = history.record(actor, action, round, Utc::now()).clone();
        self.save(&history)?;
        Ok(entry)
    }

    /// Close the open combat and update the statistics.
    pub fn end_combat(&self, victory: bool, summary: &str) -> DiceResult<Combat> {
        let mut history = self.load()?;
        let combat = history.end(victory, summary, Utc::now())?;
        self.save(&history)?;
        Ok(combat)
    }
}
