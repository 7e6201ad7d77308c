mod utils;

use sable::chess::{Board, Move};

/// Executes every playable move of the position and checks that the
/// incrementally maintained hash matches a from-scratch recomputation.
fn assert_incremental_hashes(board: &Board) {
    let player = board.current_player();
    let mut playable = 0;
    for &mov in player.legal_moves() {
        let transition = player.make_move(mov);
        if !transition.status.is_done() {
            continue;
        }
        playable += 1;
        assert_eq!(
            transition.board.hash(),
            transition.board.compute_hash(),
            "hash diverged after {mov:?}",
        );
        assert_ne!(board.hash(), transition.board.hash());
    }
    assert!(playable > 0, "fixture has no playable moves");
}

fn has_kind(board: &Board, probe: fn(&Move) -> bool) -> bool {
    board.current_player().legal_moves().iter().any(probe)
}

#[test]
fn quiet_and_double_step_moves() {
    let board = Board::initial();
    assert!(has_kind(&board, |m| matches!(m, Move::Quiet { .. })));
    assert!(has_kind(&board, |m| matches!(m, Move::PawnDoubleStep { .. })));
    assert_incremental_hashes(&board);
}

#[test]
fn capture_moves() {
    // 1. e4 d5: both sides have pawn captures available
    let board = utils::decode("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR W KQkq d5 ff ff C");
    assert!(has_kind(&board, |m| matches!(m, Move::PawnCapture { .. })));
    assert_incremental_hashes(&board);
}

#[test]
fn en_passant_capture() {
    // black just double-stepped d7d5 beside the white e5 pawn
    let board = utils::decode("4k3/8/8/3pP3/8/8/8/4K3 W - d5 ff ff C");
    assert!(has_kind(&board, |m| matches!(m, Move::PawnEnPassant { .. })));
    assert_incremental_hashes(&board);
}

#[test]
fn castle_moves() {
    let board = utils::decode("r3k2r/8/8/8/8/8/8/R3K2R W KQkq - ff ff C");
    assert!(has_kind(&board, |m| matches!(m, Move::CastleKingSide { .. })));
    assert!(has_kind(&board, |m| matches!(m, Move::CastleQueenSide { .. })));
    assert_incremental_hashes(&board);

    let transition = board
        .current_player()
        .legal_moves()
        .iter()
        .find(|m| matches!(m, Move::CastleKingSide { .. }))
        .map(|&m| board.current_player().make_move(m))
        .expect("king side castle is available");
    assert!(transition.status.is_done());
    assert_incremental_hashes(&transition.board);
}

#[test]
fn promotion_moves() {
    let board = utils::decode("4k3/P7/8/8/8/8/8/4K3 W - - ff ff C");
    assert!(has_kind(&board, |m| matches!(m, Move::PawnPromotion { .. })));
    assert_incremental_hashes(&board);
}

#[test]
fn promotion_capture_moves() {
    let board = utils::decode("1n2k3/P7/8/8/8/8/8/4K3 W - - ff ff C");
    assert!(has_kind(&board, |m| matches!(
        m,
        Move::PawnPromotion {
            captured: Some(_),
            ..
        }
    )));
    assert_incremental_hashes(&board);
}

#[test]
fn side_to_move_is_hashed() {
    let white = utils::decode("4k3/8/8/8/8/8/8/4K3 W - - ff ff C");
    let black = utils::decode("4k3/8/8/8/8/8/8/4K3 B - - ff ff C");
    assert_ne!(white.hash(), black.hash());
}

#[test]
fn castle_rights_are_hashed() {
    let full = utils::decode("r3k2r/8/8/8/8/8/8/R3K2R W KQkq - ff ff C");
    let none = utils::decode("r3k2r/8/8/8/8/8/8/R3K2R W - - ff ff C");
    assert_ne!(full.hash(), none.hash());
}

#[test]
fn hashes_are_deterministic() {
    let first = Board::initial();
    let second = Board::initial();
    assert_eq!(first.hash(), second.hash());
    assert_eq!(first.hash(), first.compute_hash());
}
