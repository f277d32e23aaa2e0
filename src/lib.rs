// Board state core: positions, premoves and animated position sync
pub mod position;
pub mod schedule;
pub mod config;
pub mod coordinator;
pub mod shared;
pub mod board;
pub mod script;

pub use config::{BoardConfig, DropOffBoardAction};
pub use coordinator::{BoardCoordinator, BoardSnapshot, DropSource, DropTarget, Premove};
pub use position::{diff, normalize, Color, Piece, PieceKind, Position, PositionDiff, PositionInput, Square};
pub use shared::{BoardRegistry, SharedBoard};
