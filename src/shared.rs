//! Handles for sharing one coordinator across a presentation tree.
//!
//! Boards are passed down explicitly; nothing here is global. A handle is
//! `Rc<RefCell<_>>`, so validator and observer callbacks must not call back
//! into the handle of the board that invoked them.

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use crate::coordinator::{BoardCoordinator, BoardSnapshot, DropSource, DropTarget};
use crate::position::{Piece, PositionInput, Square};

#[derive(Clone)]
pub struct SharedBoard {
    inner: Rc<RefCell<BoardCoordinator>>,
}

impl SharedBoard {
    pub fn new(board: BoardCoordinator) -> Self { Self { inner: Rc::new(RefCell::new(board)) } }

    pub fn id(&self) -> String { self.inner.borrow().id().to_string() }
    pub fn snapshot(&self) -> BoardSnapshot { self.inner.borrow().snapshot() }

    /// Read access for renderers that want more than a snapshot.
    pub fn borrow(&self) -> Ref<'_, BoardCoordinator> { self.inner.borrow() }

    pub fn handle_drop(&self, source: DropSource, target: DropTarget, piece: Piece) {
        self.inner.borrow_mut().handle_drop(source, target, piece)
    }

    pub fn handle_right_click(&self, square: Square) { self.inner.borrow_mut().handle_right_click(square) }
    pub fn clear_premoves(&self) { self.inner.borrow_mut().clear_premoves() }
    pub fn set_position(&self, input: impl Into<PositionInput>) { self.inner.borrow_mut().set_position(input) }
    pub fn advance(&self, dt: Duration) { self.inner.borrow_mut().advance(dt) }
    pub fn teardown(&self) { self.inner.borrow_mut().teardown() }

    pub fn ptr_eq(&self, other: &SharedBoard) -> bool { Rc::ptr_eq(&self.inner, &other.inner) }
}

/// Boards of one host application, keyed by their configured id.
#[derive(Default)]
pub struct BoardRegistry {
    boards: HashMap<String, SharedBoard>,
}

impl BoardRegistry {
    pub fn new() -> Self { Self::default() }

    /// Registers a board under its id. A board already holding that id is torn down and replaced.
    pub fn register(&mut self, board: BoardCoordinator) -> SharedBoard {
        let id = board.id().to_string();
        let handle = SharedBoard::new(board);
        if let Some(old) = self.boards.insert(id.clone(), handle.clone()) {
            log::warn!("board id {id:?} registered twice; replacing the old board");
            old.teardown();
        }
        handle
    }

    pub fn get(&self, id: &str) -> Option<SharedBoard> { self.boards.get(id).cloned() }

    pub fn remove(&mut self, id: &str) -> Option<SharedBoard> {
        let handle = self.boards.remove(id)?;
        handle.teardown();
        Some(handle)
    }

    /// Drives every board's animation clock.
    pub fn advance_all(&self, dt: Duration) {
        for board in self.boards.values() { board.advance(dt); }
    }

    pub fn len(&self) -> usize { self.boards.len() }
    pub fn is_empty(&self) -> bool { self.boards.is_empty() }
}
