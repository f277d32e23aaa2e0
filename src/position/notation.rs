use thiserror::Error;

use super::{Piece, Position, Square, FILES, RANKS};

pub const START_SENTINEL: &str = "start";
pub const START_NOTATION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("empty position notation")]
    Empty,
    #[error("expected {expected} ranks, found {found}")]
    RankCount { expected: u8, found: usize },
    #[error("rank {rank} spans {files} files")]
    RankWidth { rank: u8, files: usize },
    #[error("unknown piece letter '{0}'")]
    UnknownPiece(char),
    #[error("invalid square '{0}'")]
    InvalidSquare(String),
    #[error("invalid piece id '{0}'")]
    InvalidPiece(String),
}

impl Position {
    /// Parses the piece-placement field of FEN. A full FEN line is accepted;
    /// only its first field is read.
    pub fn from_notation(notation: &str) -> Result<Self, NotationError> {
        let placement = notation.split_whitespace().next().ok_or(NotationError::Empty)?;
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != RANKS as usize {
            return Err(NotationError::RankCount { expected: RANKS, found: rows.len() });
        }
        let mut pos = Position::empty();
        for (i, row) in rows.iter().enumerate() {
            let rank = RANKS - 1 - i as u8;
            let mut file = 0usize;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                    continue;
                }
                let piece = Piece::from_fen_char(c).ok_or(NotationError::UnknownPiece(c))?;
                if let Some(sq) = Square::new(file as u8, rank) { pos.insert(sq, piece); }
                file += 1;
            }
            if file != FILES as usize {
                return Err(NotationError::RankWidth { rank: rank + 1, files: file });
            }
        }
        Ok(pos)
    }

    pub fn to_notation(&self) -> String {
        let mut out = String::with_capacity(START_NOTATION.len());
        for rank in (0..RANKS).rev() {
            let mut empty = 0;
            for file in 0..FILES {
                match Square::new(file, rank).and_then(|sq| self.get(sq)) {
                    Some(p) => {
                        if empty > 0 { out.push_str(&empty.to_string()); empty = 0; }
                        out.push(p.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 { out.push_str(&empty.to_string()); }
            if rank > 0 { out.push('/'); }
        }
        out
    }
}
