//! Board positions: square/piece ids, notation parsing and diffing.

mod diff;
mod notation;
mod square;

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

pub use diff::{diff, PositionDiff};
pub use notation::{NotationError, START_NOTATION, START_SENTINEL};
pub use square::{Color, Piece, PieceKind, Square, FILES, RANKS};

/// Square -> piece mapping. Absent key means an empty square.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(BTreeMap<Square, Piece>);

impl Position {
    pub fn empty() -> Self { Self::default() }

    pub fn start() -> Self {
        // START_NOTATION is a constant known to parse
        Self::from_notation(START_NOTATION).unwrap_or_default()
    }

    pub fn get(&self, sq: Square) -> Option<Piece> { self.0.get(&sq).copied() }
    pub fn insert(&mut self, sq: Square, piece: Piece) -> Option<Piece> { self.0.insert(sq, piece) }
    pub fn remove(&mut self, sq: Square) -> Option<Piece> { self.0.remove(&sq) }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ { self.0.iter().map(|(s, p)| (*s, *p)) }
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ { self.0.keys().copied() }

    pub fn is_different_from_start(&self) -> bool { self.len() != 32 || self != start_layout() }
}

fn start_layout() -> &'static Position {
    static START: OnceLock<Position> = OnceLock::new();
    START.get_or_init(Position::start)
}

impl FromIterator<(Square, Piece)> for Position {
    fn from_iter<I: IntoIterator<Item = (Square, Piece)>>(iter: I) -> Self { Self(iter.into_iter().collect()) }
}

impl IntoIterator for Position {
    type Item = (Square, Piece);
    type IntoIter = btree_map::IntoIter<Square, Piece>;
    fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

/// Text grid, rank 8 on top, `.` for empty squares.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..RANKS).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..FILES {
                let c = Square::new(file, rank).and_then(|sq| self.get(sq)).map(|p| p.fen_char()).unwrap_or('.');
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for file in 0..FILES { write!(f, " {}", (b'a' + file) as char)?; }
        writeln!(f)
    }
}

/// What a host hands the board: a notation string (or `"start"`) or an explicit mapping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionInput {
    Notation(String),
    Mapping(Position),
}

impl PositionInput {
    pub fn start() -> Self { PositionInput::Notation(START_SENTINEL.to_string()) }
}

impl From<&str> for PositionInput {
    fn from(s: &str) -> Self { PositionInput::Notation(s.to_string()) }
}

impl From<String> for PositionInput {
    fn from(s: String) -> Self { PositionInput::Notation(s) }
}

impl From<Position> for PositionInput {
    fn from(p: Position) -> Self { PositionInput::Mapping(p) }
}

impl From<&Position> for PositionInput {
    fn from(p: &Position) -> Self { PositionInput::Mapping(p.clone()) }
}

/// Permissive conversion to the internal mapping. Malformed notation
/// degrades to an empty position.
pub fn normalize(input: impl Into<PositionInput>) -> Position {
    match input.into() {
        PositionInput::Mapping(p) => p,
        PositionInput::Notation(s) if s.trim() == START_SENTINEL => Position::start(),
        PositionInput::Notation(s) => match Position::from_notation(&s) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("ignoring malformed position notation {s:?}: {e}");
                Position::empty()
            }
        },
    }
}

pub fn is_different_from_start(pos: &Position) -> bool { pos.is_different_from_start() }
