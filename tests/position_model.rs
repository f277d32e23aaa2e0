use pieboard::position::{
    diff, is_different_from_start, normalize, Position, PositionInput, Square, START_NOTATION,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn sq(s: &str) -> Square { s.parse().expect("valid square") }

const SAMPLES: &[&str] = &[
    START_NOTATION,
    "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR",
    "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR",
    "r3k2r/8/8/8/8/8/8/R3K2R",
    "2kr3r/8/8/8/8/8/8/R4RK1",
    "8/8/8/8/8/8/8/8",
    "4k3/8/8/3Pp3/8/8/8/4K3",
];

#[test]
fn start_sentinel_and_notation_agree() {
    let from_sentinel = normalize("start");
    let from_notation = normalize(START_NOTATION);
    let from_full_fen = normalize(format!("{START_NOTATION} w KQkq - 0 1"));
    assert_eq!(from_sentinel, from_notation);
    assert_eq!(from_sentinel, from_full_fen);
    assert_eq!(from_sentinel.len(), 32);
    assert!(!is_different_from_start(&from_sentinel));
}

#[test]
fn start_comparison_checks_layout_not_just_piece_count() {
    // same 32 pieces, knights and bishops swapped
    let shuffled = normalize("rbnqknbr/pppppppp/8/8/8/8/PPPPPPPP/RBNQKNBR");
    assert_eq!(shuffled.len(), 32);
    assert!(is_different_from_start(&shuffled));
    assert!(is_different_from_start(&normalize("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR")));
    assert!(is_different_from_start(&Position::empty()));
    for _ in 0..3 {
        assert!(!is_different_from_start(&Position::start()));
    }
}

#[test]
fn mapping_and_notation_normalize_to_same_position() {
    for notation in SAMPLES {
        let parsed = normalize(*notation);
        let mapping: Position = parsed.iter().collect();
        assert_eq!(normalize(PositionInput::Mapping(mapping)), parsed, "{notation}");
        assert_eq!(parsed.to_notation(), *notation);
    }
}

#[test]
fn normalize_is_idempotent_on_mappings() {
    for notation in SAMPLES {
        let p = normalize(*notation);
        let once = normalize(&p);
        let twice = normalize(&once);
        assert_eq!(once, p);
        assert_eq!(twice, once);
    }
}

#[test]
fn malformed_notation_degrades_to_empty() {
    let bad_inputs = [
        "",
        "   ",
        "rnbqkbnr/pppppppp",
        "rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
        "zzzzzzzz/8/8/8/8/8/8/8",
    ];
    for bad in bad_inputs {
        assert!(normalize(bad).is_empty(), "expected empty position for {bad:?}");
    }
}

#[test]
fn mapping_deserializes_from_json() {
    let input: PositionInput = serde_json::from_str(r#"{"e4": "wP", "e8": "bK"}"#).unwrap();
    let p = normalize(input);
    assert_eq!(p.len(), 2);
    assert_eq!(p.get(sq("e8")).map(|p| p.to_string()), Some("bK".to_string()));
    let input: PositionInput = serde_json::from_str(r#""start""#).unwrap();
    assert_eq!(normalize(input), Position::start());
    assert!(serde_json::from_str::<PositionInput>(r#"{"z9": "wP"}"#).is_err());
}

#[test]
fn diff_partitions_exactly_the_changed_squares() {
    for a in SAMPLES {
        for b in SAMPLES {
            let (pa, pb) = (normalize(*a), normalize(*b));
            let d = diff(&pa, &pb);
            let changed: BTreeSet<Square> = Square::all().filter(|s| pa.get(*s) != pb.get(*s)).collect();
            let covered: BTreeSet<Square> = d.added.squares().chain(d.removed.squares()).collect();
            assert_eq!(covered, changed, "{a} -> {b}");
            for (s, p) in d.added.iter() { assert_eq!(pb.get(s), Some(p)); }
            for (s, p) in d.removed.iter() { assert_eq!(pa.get(s), Some(p)); }
        }
    }
}

#[test]
fn diff_of_identical_positions_is_empty() {
    for notation in SAMPLES {
        let p = normalize(*notation);
        let d = diff(&p, &p);
        assert!(d.is_empty());
        assert_eq!(d.inferred_mover(), None);
    }
}

#[test]
fn capture_shows_square_in_both_maps() {
    let before = normalize("4k3/8/8/3p4/4P3/8/8/4K3");
    let after = normalize("4k3/8/8/3P4/8/8/8/4K3");
    let d = diff(&before, &after);
    assert_eq!(d.added.squares().collect::<Vec<_>>(), vec![sq("d5")]);
    assert_eq!(d.removed.squares().collect::<Vec<_>>(), vec![sq("d5"), sq("e4")]);
    assert_eq!(d.inferred_mover().map(|c| c.to_string()), Some("w".to_string()));
}

#[test]
fn castling_counts_as_single_move() {
    let before = normalize("r3k2r/8/8/8/8/8/8/R3K2R");
    let after = normalize("r3k2r/8/8/8/8/8/8/R4RK1");
    let d = diff(&before, &after);
    assert_eq!(d.added.len(), 2);
    assert_eq!(d.inferred_mover().map(|c| c.to_string()), Some("w".to_string()));
}

#[test]
fn display_draws_rank_eight_first() {
    let text = normalize("start").to_string();
    let first = text.lines().next().unwrap();
    assert_eq!(first, "8  r n b q k b n r");
    assert!(text.lines().last().unwrap().trim_start().starts_with("a b c"));
}
