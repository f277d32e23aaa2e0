//! JSON event scripts driven through a board, one snapshot per event.

use std::cell::RefCell;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::board::cozy::Referee;
use crate::config::BoardConfig;
use crate::coordinator::{BoardCoordinator, BoardSnapshot, DropSource, DropTarget};
use crate::position::{Color, Piece, PositionInput, Square};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorKind {
    /// No callback: drops are applied directly.
    #[default]
    None,
    Accept,
    Reject,
    /// Standard chess rules; accepted moves are echoed back as host updates.
    Chess,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    Position { position: PositionInput },
    Drop { source: DropSource, target: DropTarget, piece: Piece },
    /// The host plays a move (typically the opponent's) and pushes the result.
    Play { source: Square, target: Square, piece: Piece },
    Advance { ms: u64 },
    ClearPremoves,
    RightClick { square: Square },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: BoardConfig,
    #[serde(default = "PositionInput::start")]
    pub position: PositionInput,
    /// Full FEN for the chess referee (side to move, castling rights). Its
    /// placement field replaces `position` as the board's starting layout.
    #[serde(default)]
    pub fen: Option<String>,
    #[serde(default)]
    pub validator: ValidatorKind,
    pub events: Vec<ScriptEvent>,
}

impl Script {
    pub fn from_json_str(s: &str) -> Result<Self> { serde_json::from_str(s).context("parsing script") }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("opening script {}", path.display()))?;
        serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parsing script {}", path.display()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Step {
    pub event: ScriptEvent,
    pub snapshot: BoardSnapshot,
}

pub fn run_script(script: &Script) -> Result<Vec<Step>> {
    let start = match &script.fen {
        Some(fen) => PositionInput::Notation(fen.clone()),
        None => script.position.clone(),
    };
    let referee = Rc::new(RefCell::new(Referee::startpos()));
    let mut board = BoardCoordinator::new(script.config.clone(), start);
    board = match script.validator {
        ValidatorKind::None => board,
        ValidatorKind::Accept => board.with_drop_validator(|_, _, _| true),
        ValidatorKind::Reject => board.with_drop_validator(|_, _, _| false),
        ValidatorKind::Chess => {
            let r = match &script.fen {
                Some(fen) => Referee::from_fen(fen),
                None => Referee::from_position(board.position(), Color::White),
            };
            *referee.borrow_mut() = r.context("setting up the chess referee")?;
            let r = Rc::clone(&referee);
            board.with_drop_validator(move |source, target, piece| r.borrow_mut().try_drop(source, target, piece))
        }
    };

    let mut steps = Vec::with_capacity(script.events.len());
    for event in &script.events {
        match event {
            ScriptEvent::Position { position } => board.set_position(position.clone()),
            ScriptEvent::Drop { source, target, piece } => board.handle_drop(*source, *target, *piece),
            ScriptEvent::Play { source, target, piece } => {
                host_move(&mut board, &referee, script.validator, *source, *target, *piece)
            }
            ScriptEvent::Advance { ms } => board.advance(Duration::from_millis(*ms)),
            ScriptEvent::ClearPremoves => board.clear_premoves(),
            ScriptEvent::RightClick { square } => board.handle_right_click(*square),
        }
        if script.validator == ValidatorKind::Chess {
            // a host confirms accepted moves by pushing its engine's position back
            let confirmed = referee.borrow().position();
            if board.manual_drop() && confirmed != *board.position() { board.set_position(confirmed); }
        }
        steps.push(Step { event: event.clone(), snapshot: board.snapshot() });
    }
    board.teardown();
    Ok(steps)
}

fn host_move(
    board: &mut BoardCoordinator,
    referee: &RefCell<Referee>,
    validator: ValidatorKind,
    from: Square,
    to: Square,
    piece: Piece,
) {
    if validator == ValidatorKind::Chess {
        let played = referee.borrow_mut().try_drop(from.into(), to.into(), piece);
        if !played {
            log::warn!("host move {piece} {from}->{to} is illegal; skipped");
            return;
        }
        let next = referee.borrow().position();
        board.set_position(next);
    } else {
        let mut next = board.pending_position().unwrap_or(board.position()).clone();
        next.remove(from);
        next.insert(to, piece);
        board.set_position(next);
    }
}
