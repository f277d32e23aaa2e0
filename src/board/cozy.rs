use cozy_chess::{Board as CozyBoard, Color as CozyColor, Move, Piece as CozyPiece};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::coordinator::{DropSource, DropTarget};
use crate::position::{normalize, Color, Piece, PieceKind, Position, Square};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefereeError {
    #[error("FEN error: {0}")]
    Fen(String),
}

/// Legal-move checker for standard chess, usable as a board's drop validator.
#[derive(Clone, Debug)]
pub struct Referee {
    board: CozyBoard,
}

impl Default for Referee {
    fn default() -> Self { Self::startpos() }
}

impl Referee {
    pub fn startpos() -> Self { Self { board: CozyBoard::default() } }

    pub fn from_fen(fen: &str) -> Result<Self, RefereeError> {
        CozyBoard::from_fen(fen, false)
            .map(|b| Self { board: b })
            .map_err(|e| RefereeError::Fen(format!("{fen}: {e:?}")))
    }

    /// Referee for a bare piece layout. Castling is allowed on every side
    /// where king and rook still stand on their home squares.
    pub fn from_position(position: &Position, side_to_move: Color) -> Result<Self, RefereeError> {
        let fen = format!("{} {} {} - 0 1", position.to_notation(), side_to_move.as_char(), castling_rights(position));
        Self::from_fen(&fen)
    }

    pub fn fen(&self) -> String { format!("{}", self.board) }

    pub fn position(&self) -> Position { normalize(self.fen()) }

    pub fn side_to_move(&self) -> Color {
        match self.board.side_to_move() { CozyColor::White => Color::White, CozyColor::Black => Color::Black }
    }

    /// Plays the legal move matching a drag-and-drop, if there is one.
    /// Dropping the king two files over castles; promotions pick a queen.
    pub fn try_drop(&mut self, source: DropSource, target: DropTarget, piece: Piece) -> bool {
        let (Some(from), Some(to)) = (source.square(), target.square()) else { return false };
        if piece.color != self.side_to_move() || self.position().get(from) != Some(piece) { return false; }

        let mut targets = vec![to.to_string()];
        if piece.kind == PieceKind::King && from.rank() == to.rank() && from.file().abs_diff(to.file()) == 2 {
            // castling is encoded as king-takes-own-rook
            let rook_file = if to.file() > from.file() { 7 } else { 0 };
            if let Some(rook) = Square::new(rook_file, from.rank()) { targets.push(rook.to_string()); }
        }
        let from = from.to_string();

        let mut found: Option<Move> = None;
        self.board.generate_moves(|moves| {
            for m in moves {
                if m.from.to_string() != from || !targets.contains(&m.to.to_string()) { continue; }
                if m.promotion.is_none() || m.promotion == Some(CozyPiece::Queen) {
                    found = Some(m);
                    break;
                }
            }
            found.is_some()
        });

        match found {
            Some(m) => {
                log::debug!("referee played {m}");
                self.board.play(m);
                true
            }
            None => false,
        }
    }

    /// Legal moves as (from, to) squares, castling shown as the king's two-file step.
    pub fn legal_moves(&self) -> Vec<(Square, Square, Piece)> {
        let current = self.position();
        let mut out = Vec::new();
        self.board.generate_moves(|moves| {
            for m in moves {
                if m.promotion.is_some() && m.promotion != Some(CozyPiece::Queen) { continue; }
                let from = m.from.to_string().parse::<Square>();
                let to = m.to.to_string().parse::<Square>();
                let (Ok(from), Ok(to)) = (from, to) else { continue };
                let Some(piece) = current.get(from) else { continue };
                let to = match (piece.kind, current.get(to)) {
                    (PieceKind::King, Some(p)) if p.color == piece.color => {
                        let file =
                            if to.file() > from.file() { from.file() + 2 } else { from.file().saturating_sub(2) };
                        Square::new(file, from.rank()).unwrap_or(to)
                    }
                    _ => to,
                };
                out.push((from, to, piece));
            }
            false
        });
        out
    }

    /// Plays a uniformly random legal move and returns it, `None` when the game is over.
    pub fn play_random<R: Rng>(&mut self, rng: &mut R) -> Option<(Square, Square, Piece)> {
        let moves = self.legal_moves();
        let &(from, to, piece) = moves.choose(rng)?;
        self.try_drop(from.into(), to.into(), piece).then_some((from, to, piece))
    }
}

fn castling_rights(position: &Position) -> String {
    let on = |sq: &str, id: &str| match (sq.parse::<Square>(), id.parse::<Piece>()) {
        (Ok(sq), Ok(piece)) => position.get(sq) == Some(piece),
        _ => false,
    };
    let sides = [
        ('K', "e1", "wK", "h1", "wR"),
        ('Q', "e1", "wK", "a1", "wR"),
        ('k', "e8", "bK", "h8", "bR"),
        ('q', "e8", "bK", "a8", "bR"),
    ];
    let rights: String = sides
        .iter()
        .filter(|(_, king_sq, king, rook_sq, rook)| on(king_sq, king) && on(rook_sq, rook))
        .map(|(flag, ..)| *flag)
        .collect();
    if rights.is_empty() { "-".to_string() } else { rights }
}
