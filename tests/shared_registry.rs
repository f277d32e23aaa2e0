use pieboard::{BoardConfig, BoardCoordinator, BoardRegistry, DropSource, DropTarget, Piece, SharedBoard, Square};
use std::time::Duration;

const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR";

fn board(id: &str) -> BoardCoordinator {
    BoardCoordinator::new(BoardConfig { id: id.to_string(), ..BoardConfig::default() }, "start")
}

fn sq(s: &str) -> Square { s.parse().unwrap() }

#[test]
fn clones_share_one_board() {
    let handle = SharedBoard::new(board("main"));
    let view = handle.clone();
    handle.handle_drop(DropSource::Square(sq("e2")), DropTarget::Square(sq("e4")), "wP".parse::<Piece>().unwrap());
    assert!(view.ptr_eq(&handle));
    assert_eq!(view.snapshot().position.to_notation(), AFTER_E4);
    assert_eq!(view.borrow().mover().map(|c| c.to_string()), Some("w".to_string()));
}

#[test]
fn registry_keeps_instances_apart() {
    let mut reg = BoardRegistry::new();
    let left = reg.register(board("left"));
    let right = reg.register(board("right"));
    assert_eq!(reg.len(), 2);

    left.set_position(AFTER_E4);
    assert!(left.snapshot().animating);
    assert!(!right.snapshot().animating);

    reg.advance_all(Duration::from_millis(300));
    assert_eq!(reg.get("left").unwrap().snapshot().position.to_notation(), AFTER_E4);
    assert_eq!(reg.get("right").unwrap().id(), "right");
    assert!(reg.get("missing").is_none());
}

#[test]
fn removing_a_board_tears_it_down() {
    let mut reg = BoardRegistry::new();
    let left = reg.register(board("left"));
    left.set_position(AFTER_E4);
    let removed = reg.remove("left").expect("registered board");
    assert!(removed.ptr_eq(&left));
    assert!(reg.is_empty());
    assert!(!left.snapshot().animating);
    left.advance(Duration::from_millis(1_000));
    assert_eq!(left.snapshot().position.to_notation(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
}

#[test]
fn duplicate_id_replaces_and_tears_down_old_board() {
    let mut reg = BoardRegistry::new();
    let first = reg.register(board("main"));
    first.set_position(AFTER_E4);
    let second = reg.register(board("main"));
    assert_eq!(reg.len(), 1);
    assert!(reg.get("main").unwrap().ptr_eq(&second));
    assert!(!first.snapshot().animating);
}
