//! Versioned JSON save files.

use std::{fs, path::Path};

use lane_defence_core::{GridMode, LevelId, SpawnSource};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{
    board::Board,
    capture::{BoardCapture, CaptureError},
    history::History,
    level::Level,
    World,
};

/// Save format written by this build. Other versions are rejected on load.
pub const FORMAT_VERSION: u32 = 1;

/// Failures raised while writing or reading a save file.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The save file could not be read or written.
    #[error("failed to access save file: {0}")]
    Io(#[from] std::io::Error),
    /// The save data is not valid JSON for the save format.
    #[error("save data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The save data was written by an unsupported format version.
    #[error("save format version {found} is not supported (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the save data.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },
    /// The save data decodes but describes an impossible board.
    #[error("save data is inconsistent: {0}")]
    Inconsistent(#[from] CaptureError),
}

/// Complete serialisable state of a world, minus its spawn source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveGame {
    format_version: u32,
    level: LevelId,
    custom: bool,
    mode: GridMode,
    board: BoardCapture,
    history: History,
}

#[derive(Deserialize)]
struct VersionProbe {
    format_version: u32,
}

impl SaveGame {
    /// Captures the provided world.
    #[must_use]
    pub fn capture(world: &World) -> Self {
        let level = world.board.level();
        Self {
            format_version: FORMAT_VERSION,
            level: level.number(),
            custom: level.is_custom(),
            mode: world.board.mode(),
            board: BoardCapture::of(&world.board),
            history: world.history.clone(),
        }
    }

    /// Encodes the save as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decodes and validates a save from JSON.
    pub fn from_json(text: &str) -> Result<Self, PersistenceError> {
        let probe: VersionProbe = serde_json::from_str(text)?;
        if probe.format_version != FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: probe.format_version,
                expected: FORMAT_VERSION,
            });
        }
        let save: SaveGame = serde_json::from_str(text)?;
        save.validate()?;
        Ok(save)
    }

    /// Checks the board capture and every history capture for consistency.
    pub fn validate(&self) -> Result<(), CaptureError> {
        self.board.validate()?;
        self.history.validate()
    }

    /// Rebuilds a world from the save, drawing future spawns from `spawner`.
    #[must_use]
    pub fn into_world(self, spawner: Box<dyn SpawnSource>) -> World {
        let mut board = Board::new(Level::blank(self.level, self.custom));
        self.board.restore(&mut board);
        board.set_mode(self.mode);
        World::from_parts(board, self.history, spawner)
    }
}

/// Writes the world to `path` as JSON.
pub fn save(world: &World, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    let text = SaveGame::capture(world).to_json()?;
    fs::write(path, text)?;
    info!(path = %path.display(), "game saved");
    Ok(())
}

/// Reads a world from `path`. The running world is untouched on failure.
pub fn load(path: impl AsRef<Path>, spawner: Box<dyn SpawnSource>) -> Result<World, PersistenceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let world = SaveGame::from_json(&text)?.into_world(spawner);
    info!(path = %path.display(), "game loaded");
    Ok(world)
}
