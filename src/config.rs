use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropOffBoardAction {
    /// Piece returns to where it came from.
    #[default]
    Snapback,
    /// Piece is removed from the board.
    Trash,
}

/// Board behaviour knobs. JSON keys may be snake_case or camelCase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Opaque id for telling board instances apart.
    pub id: String,
    #[serde(alias = "animationDuration")]
    pub animation_duration_ms: u64,
    #[serde(alias = "arePremovesAllowed")]
    pub are_premoves_allowed: bool,
    #[serde(alias = "expectingAlternateMoves")]
    pub expecting_alternate_moves: bool,
    #[serde(alias = "dropOffBoardAction")]
    pub drop_off_board_action: DropOffBoardAction,
    #[serde(alias = "clearPremovesOnRightClick")]
    pub clear_premoves_on_right_click: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            id: "pieboard".to_string(),
            animation_duration_ms: 300,
            are_premoves_allowed: false,
            expecting_alternate_moves: true,
            drop_off_board_action: DropOffBoardAction::Snapback,
            clear_premoves_on_right_click: true,
        }
    }
}

impl BoardConfig {
    pub fn animation_duration(&self) -> Duration { Duration::from_millis(self.animation_duration_ms) }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("parsing board config")
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_context(|| format!("reading board config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }
}
