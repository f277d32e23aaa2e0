//! Board state coordinator: the single owner of what the board shows.
//!
//! Every change to the displayed position flows through here, either as a
//! drop from the user ([`BoardCoordinator::handle_drop`]) or as a position
//! supplied by the host ([`BoardCoordinator::set_position`]). Host updates
//! that follow an external change are deferred by the animation duration so
//! the presentation layer can slide pieces; premoves queued in the meantime
//! are replayed once the commit lands.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::{BoardConfig, DropOffBoardAction};
use crate::position::{
    diff, normalize, Color, NotationError, Piece, Position, PositionDiff, PositionInput, Square,
};
use crate::schedule::{Scheduler, TaskId};

/// Where a dragged piece came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DropSource {
    Square(Square),
    /// Reserve / spare piece tray; nothing leaves the board.
    Spare,
}

/// Where a dragged piece was released.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DropTarget {
    Square(Square),
    OffBoard,
}

impl DropSource {
    pub fn square(self) -> Option<Square> {
        match self { DropSource::Square(sq) => Some(sq), DropSource::Spare => None }
    }
}

impl DropTarget {
    pub fn square(self) -> Option<Square> {
        match self { DropTarget::Square(sq) => Some(sq), DropTarget::OffBoard => None }
    }
}

impl From<Square> for DropSource {
    fn from(sq: Square) -> Self { DropSource::Square(sq) }
}

impl From<Square> for DropTarget {
    fn from(sq: Square) -> Self { DropTarget::Square(sq) }
}

impl fmt::Display for DropSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { DropSource::Square(sq) => write!(f, "{sq}"), DropSource::Spare => f.write_str("spare") }
    }
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { DropTarget::Square(sq) => write!(f, "{sq}"), DropTarget::OffBoard => f.write_str("offboard") }
    }
}

impl FromStr for DropSource {
    type Err = NotationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "spare" { Ok(DropSource::Spare) } else { s.parse().map(DropSource::Square) }
    }
}

impl FromStr for DropTarget {
    type Err = NotationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "offboard" { Ok(DropTarget::OffBoard) } else { s.parse().map(DropTarget::Square) }
    }
}

impl From<DropSource> for String {
    fn from(s: DropSource) -> Self { s.to_string() }
}

impl From<DropTarget> for String {
    fn from(t: DropTarget) -> Self { t.to_string() }
}

impl TryFrom<String> for DropSource {
    type Error = NotationError;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl TryFrom<String> for DropTarget {
    type Error = NotationError;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

/// A move queued before it was the mover's turn. Not validated yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Premove {
    pub source: DropSource,
    pub target: DropTarget,
    pub piece: Piece,
}

/// Host-supplied move check. Returning `false` rejects the move.
pub type DropValidator = Box<dyn FnMut(DropSource, DropTarget, Piece) -> bool>;
/// Receives every position the board adopts or is about to adopt.
pub type PositionObserver = Box<dyn FnMut(&Position)>;

#[derive(Clone, Debug)]
struct PendingCommit {
    target: Position,
    diff: PositionDiff,
    mover: Option<Color>,
}

/// Derived state for the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub id: String,
    pub position: Position,
    pub pending_diff: Option<PositionDiff>,
    pub premoves: Vec<Premove>,
    pub mover: Option<Color>,
    pub manual_drop: bool,
    pub animating: bool,
}

pub struct BoardCoordinator {
    config: BoardConfig,
    position: Position,
    scheduler: Scheduler<PendingCommit>,
    commit: Option<TaskId>,
    premoves: VecDeque<Premove>,
    mover: Option<Color>,
    manual_drop: bool,
    validator: Option<DropValidator>,
    observer: Option<PositionObserver>,
}

impl BoardCoordinator {
    pub fn new(config: BoardConfig, position: impl Into<PositionInput>) -> Self {
        Self {
            config,
            position: normalize(position),
            scheduler: Scheduler::new(),
            commit: None,
            premoves: VecDeque::new(),
            mover: None,
            manual_drop: false,
            validator: None,
            observer: None,
        }
    }

    /// Switches the board into delegated-validation mode.
    pub fn with_drop_validator(mut self, f: impl FnMut(DropSource, DropTarget, Piece) -> bool + 'static) -> Self {
        self.validator = Some(Box::new(f));
        self
    }

    pub fn with_position_observer(mut self, f: impl FnMut(&Position) + 'static) -> Self {
        self.observer = Some(Box::new(f));
        self
    }

    pub fn config(&self) -> &BoardConfig { &self.config }
    pub fn id(&self) -> &str { &self.config.id }
    pub fn position(&self) -> &Position { &self.position }
    pub fn mover(&self) -> Option<Color> { self.mover }
    pub fn manual_drop(&self) -> bool { self.manual_drop }
    pub fn premoves(&self) -> impl Iterator<Item = &Premove> + '_ { self.premoves.iter() }
    pub fn premove_count(&self) -> usize { self.premoves.len() }
    pub fn is_animating(&self) -> bool { self.commit.is_some_and(|id| self.scheduler.is_pending(id)) }

    pub fn pending_diff(&self) -> Option<&PositionDiff> {
        self.commit.and_then(|id| self.scheduler.get(id)).map(|c| &c.diff)
    }

    pub fn pending_position(&self) -> Option<&Position> {
        self.commit.and_then(|id| self.scheduler.get(id)).map(|c| &c.target)
    }

    /// Squares touched by queued premoves, for highlighting.
    pub fn premove_squares(&self) -> BTreeSet<Square> {
        self.premoves
            .iter()
            .flat_map(|p| [p.source.square(), p.target.square()])
            .flatten()
            .collect()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            id: self.config.id.clone(),
            position: self.position.clone(),
            pending_diff: self.pending_diff().cloned(),
            premoves: self.premoves.iter().copied().collect(),
            mover: self.mover,
            manual_drop: self.manual_drop,
            animating: self.is_animating(),
        }
    }

    /// A position supplied by the host, e.g. after its rules engine applied a move.
    pub fn set_position(&mut self, input: impl Into<PositionInput>) {
        let next = normalize(input);
        let changes = diff(&self.position, &next);
        let inferred = changes.inferred_mover();

        if next.is_different_from_start() && self.mover.is_some() {
            if let Some(color) = inferred { self.mover = Some(color); }
        }

        if let Some(id) = self.commit.take() {
            // never stack animations: the newest position wins outright
            self.scheduler.cancel(id);
            debug!("[{}] superseded pending commit; adopting update immediately", self.config.id);
            self.position = next.clone();
        } else if self.manual_drop || changes.is_empty() {
            trace!("[{}] adopting update without animation", self.config.id);
            self.position = next.clone();
        } else {
            let delay = self.config.animation_duration();
            debug!(
                "[{}] animating {} added / {} removed over {:?}",
                self.config.id,
                changes.added.len(),
                changes.removed.len(),
                delay
            );
            let pending = PendingCommit { target: next.clone(), diff: changes, mover: inferred };
            let id = self.scheduler.schedule(delay, pending);
            self.commit = Some(id);
        }

        self.manual_drop = false;
        self.notify(&next);
    }

    /// Advances the animation clock; commits a pending update once it is due.
    pub fn advance(&mut self, dt: Duration) {
        for (id, pending) in self.scheduler.advance(dt) {
            if self.commit != Some(id) { continue; }
            self.commit = None;
            self.position = pending.target;
            debug!("[{}] committed animated update", self.config.id);
            if self.config.are_premoves_allowed { self.attempt_premove(pending.mover); }
        }
    }

    pub fn handle_drop(&mut self, source: DropSource, target: DropTarget, piece: Piece) {
        if source.square().is_some() && source.square() == target.square() { return; }
        if target == DropTarget::OffBoard && self.config.drop_off_board_action == DropOffBoardAction::Snapback {
            trace!("[{}] off-board drop of {piece} snaps back", self.config.id);
            return;
        }

        let same_side_again = self.mover == Some(piece.color);
        if !self.config.are_premoves_allowed && self.config.expecting_alternate_moves && same_side_again {
            debug!("[{}] rejected {piece} {source}->{target}: not {}'s turn", self.config.id, piece.color);
            return;
        }
        if self.config.are_premoves_allowed && (same_side_again || !self.premoves.is_empty()) {
            self.premoves.push_back(Premove { source, target, piece });
            debug!("[{}] queued premove {piece} {source}->{target} ({} queued)", self.config.id, self.premoves.len());
            return;
        }
        if self.is_animating() {
            debug!("[{}] ignoring drop while animating", self.config.id);
            return;
        }

        self.manual_drop = true;
        self.mover = Some(piece.color);

        if let Some(validate) = self.validator.as_mut() {
            if !validate(source, target, piece) {
                debug!("[{}] move {piece} {source}->{target} rejected", self.config.id);
                self.clear_premoves();
            }
        } else {
            if let DropSource::Square(from) = source { self.position.remove(from); }
            if let DropTarget::Square(to) = target { self.position.insert(to, piece); }
        }

        let current = self.position.clone();
        self.notify(&current);
    }

    fn attempt_premove(&mut self, new_mover: Option<Color>) {
        let Some(head) = self.premoves.front().copied() else { return };
        if Some(head.piece.color) == new_mover { return; }
        let Some(validate) = self.validator.as_mut() else { return };

        if validate(head.source, head.target, head.piece) {
            self.mover = Some(head.piece.color);
            self.manual_drop = true;
            self.premoves.pop_front();
            debug!("[{}] premove {} {}->{} played", self.config.id, head.piece, head.source, head.target);
        } else {
            debug!(
                "[{}] premove {} {}->{} rejected; dropping queue",
                self.config.id, head.piece, head.source, head.target
            );
            self.clear_premoves();
        }
    }

    pub fn clear_premoves(&mut self) {
        self.mover = None;
        self.premoves.clear();
    }

    pub fn handle_right_click(&mut self, square: Square) {
        if self.config.clear_premoves_on_right_click {
            trace!("[{}] right click on {square} clears premoves", self.config.id);
            self.clear_premoves();
        }
    }

    /// Cancels pending work. The board keeps its last adopted position.
    pub fn teardown(&mut self) {
        if let Some(id) = self.commit.take() { self.scheduler.cancel(id); }
        let dropped = self.scheduler.cancel_all();
        if dropped > 0 { trace!("[{}] teardown dropped {dropped} tasks", self.config.id); }
    }

    fn notify(&mut self, pos: &Position) {
        if let Some(observe) = self.observer.as_mut() { observe(pos); }
    }
}
