use serde::{Deserialize, Serialize};

use super::{Color, Position};

/// Squares that changed between two snapshots. A square whose occupant was
/// replaced shows up in both maps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionDiff {
    /// New occupants, keyed by square.
    pub added: Position,
    /// Previous occupants of squares that changed or emptied.
    pub removed: Position,
}

impl PositionDiff {
    pub fn is_empty(&self) -> bool { self.added.is_empty() && self.removed.is_empty() }

    /// Color of the side that moved, when the diff looks like a single move
    /// (one or two squares gained a piece: plain moves, captures, castling).
    pub fn inferred_mover(&self) -> Option<Color> {
        match self.added.len() {
            1 | 2 => self.added.iter().next().map(|(_, p)| p.color),
            _ => None,
        }
    }
}

pub fn diff(old: &Position, new: &Position) -> PositionDiff {
    let removed = old.iter().filter(|(sq, p)| new.get(*sq) != Some(*p)).collect();
    let added = new.iter().filter(|(sq, p)| old.get(*sq) != Some(*p)).collect();
    PositionDiff { added, removed }
}
