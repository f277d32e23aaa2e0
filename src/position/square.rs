use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::NotationError;

pub const FILES: u8 = 8;
pub const RANKS: u8 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "b")]
    Black,
}

impl Color {
    pub fn as_char(self) -> char {
        match self { Color::White => 'w', Color::Black => 'b' }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c { 'w' => Some(Color::White), 'b' => Some(Color::Black), _ => None }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_char()) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub fn as_char(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Case-insensitive, so it serves both `wN` ids and FEN letters.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A piece id such as `wK` or `bP`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self { Self { color, kind } }

    /// FEN letter: uppercase for white, lowercase for black.
    pub fn fen_char(self) -> char {
        match self.color {
            Color::White => self.kind.as_char(),
            Color::Black => self.kind.as_char().to_ascii_lowercase(),
        }
    }

    pub fn from_fen_char(c: char) -> Option<Self> {
        let kind = PieceKind::from_char(c)?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Self { color, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.as_char(), self.kind.as_char())
    }
}

impl FromStr for Piece {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(c), Some(k), None) => {
                let color = Color::from_char(c).ok_or_else(|| NotationError::InvalidPiece(s.to_string()))?;
                // ids are always uppercase; lowercase belongs to FEN
                if !k.is_ascii_uppercase() { return Err(NotationError::InvalidPiece(s.to_string())); }
                let kind = PieceKind::from_char(k).ok_or_else(|| NotationError::InvalidPiece(s.to_string()))?;
                Ok(Piece { color, kind })
            }
            _ => Err(NotationError::InvalidPiece(s.to_string())),
        }
    }
}

impl From<Piece> for String {
    fn from(p: Piece) -> Self { p.to_string() }
}

impl TryFrom<String> for Piece {
    type Error = NotationError;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

/// A board cell, `a1` through `h8`. Zero-based file and rank internally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < FILES && rank < RANKS { Some(Self { file, rank }) } else { None }
    }

    pub fn file(self) -> u8 { self.file }
    pub fn rank(self) -> u8 { self.rank }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..FILES).flat_map(|file| (0..RANKS).map(move |rank| Square { file, rank }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

impl FromStr for Square {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let b = s.as_bytes();
        if b.len() != 2 { return Err(NotationError::InvalidSquare(s.to_string())); }
        let file = b[0].wrapping_sub(b'a');
        let rank = b[1].wrapping_sub(b'1');
        Square::new(file, rank).ok_or_else(|| NotationError::InvalidSquare(s.to_string()))
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> Self { sq.to_string() }
}

impl TryFrom<String> for Square {
    type Error = NotationError;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}
