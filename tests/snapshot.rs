mod utils;

use sable::chess::{Alliance, Board, Move};
use sable::notation::{
    NotationError, decode_move, decode_snapshot, encode_move, encode_snapshot, parse_square_name,
    square_name,
};

#[test]
fn snapshot_round_trips() {
    for snapshot in [
        utils::INITIAL_SNAPSHOT,
        utils::EN_PASSANT_SNAPSHOT,
        utils::CASTLED_SNAPSHOT,
        utils::PROMOTED_SNAPSHOT,
    ] {
        let board = utils::decode(snapshot);
        assert_eq!(encode_snapshot(&board), snapshot);

        // decoding the re-encoded text lands on the identical position
        let again = utils::decode(&encode_snapshot(&board));
        assert_eq!(board.hash(), again.hash());
    }
}

#[test]
fn initial_board_encodes_to_the_initial_snapshot() {
    assert_eq!(encode_snapshot(&Board::initial()), utils::INITIAL_SNAPSHOT);
}

#[test]
fn executed_moves_keep_snapshots_in_sync() {
    let board = Board::initial();
    let player = board.current_player();
    let double_step = player.find_move(52, 36).expect("e2e4 is legal");
    let after = player.make_move(double_step).board;
    assert_eq!(encode_snapshot(&after), utils::EN_PASSANT_SNAPSHOT);
}

#[test]
fn malformed_snapshots_are_refused() {
    assert!(matches!(
        decode_snapshot("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR W KQkq -"),
        Err(NotationError::FieldCount { found: 4, .. })
    ));
    assert!(matches!(
        decode_snapshot("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX W KQkq - ff ff C"),
        Err(NotationError::UnknownChar {
            field: "board layout",
            found: 'X'
        })
    ));
    assert!(matches!(
        decode_snapshot("rnbqkbnr/pppppppp/8/8/8/PPPPPPPP/RNBQKBNR W KQkq - ff ff C"),
        Err(NotationError::LayoutShape)
    ));
    assert!(matches!(
        decode_snapshot("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR W KQkq - fff ff C"),
        Err(NotationError::FieldWidth {
            field: "castled flags",
            ..
        })
    ));
    assert!(matches!(
        decode_snapshot("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR W KQkq z9 ff ff C"),
        Err(NotationError::UnknownSquare(_))
    ));
    assert!(matches!(
        decode_snapshot("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - ff ff C"),
        Err(NotationError::UnknownChar {
            field: "side to move",
            ..
        })
    ));
}

#[test]
fn square_names_round_trip() {
    assert_eq!(square_name(0), "a8");
    assert_eq!(square_name(63), "h1");
    assert_eq!(square_name(36), "e4");
    for square in 0..64u8 {
        assert_eq!(parse_square_name(&square_name(square)), Ok(square));
    }
    assert!(parse_square_name("i1").is_err());
    assert!(parse_square_name("a9").is_err());
    assert!(parse_square_name("a10").is_err());
}

#[test]
fn move_tokens_round_trip_as_text() {
    let boards = [
        Board::initial(),
        utils::decode("4k3/P7/8/8/8/8/8/4K3 W - - ff ff C"),
        utils::decode("r3k2r/8/8/8/8/8/8/R3K2R B KQkq - ff ff C"),
        utils::decode("4k3/8/8/3pP3/8/8/8/4K3 W - d5 ff ff C"),
    ];
    for board in &boards {
        for &mov in board.current_player().legal_moves() {
            let token = encode_move(&mov);
            assert_eq!(token.len(), 7, "token {token:?} has the wrong width");
            let decoded = decode_move(&token).expect("own tokens decode");
            assert_eq!(decoded.origin(), mov.origin());
            assert_eq!(decoded.destination(), mov.destination());
            assert_eq!(encode_move(&decoded), token);
        }
    }
}

#[test]
fn specific_move_tokens() {
    let board = Board::initial();
    let player = board.current_player();

    // e2e4 is a white pawn double step with nothing captured
    let double_step = player.find_move(52, 36).expect("e2e4 is legal");
    assert_eq!(encode_move(&double_step), "GP5236-");

    // g1f3 is a quiet white knight move
    let knight = player.find_move(62, 45).expect("g1f3 is legal");
    assert_eq!(encode_move(&knight), "AN6245-");
}

#[test]
fn en_passant_token_names_the_passed_pawn() {
    let board = utils::decode("4k3/8/8/3pP3/8/8/8/4K3 W - d5 ff ff C");
    let en_passant = board
        .current_player()
        .legal_moves()
        .iter()
        .copied()
        .find(|m| matches!(m, Move::PawnEnPassant { .. }))
        .expect("en passant available");
    let decoded = decode_move(&encode_move(&en_passant)).expect("token decodes");
    let Move::PawnEnPassant { captured, .. } = decoded else {
        panic!("expected an en passant move, got {decoded:?}");
    };
    assert_eq!(captured.square, 27); // d5
    assert_eq!(captured.alliance, Alliance::Black);
}

#[test]
fn malformed_move_tokens_are_refused() {
    assert!(matches!(
        decode_move("AP52"),
        Err(NotationError::TokenWidth(4))
    ));
    assert!(matches!(
        decode_move("ZP5236-"),
        Err(NotationError::UnknownChar {
            field: "move kind",
            ..
        })
    ));
    assert!(matches!(
        decode_move("BP5236-"),
        Err(NotationError::MissingCapture('B'))
    ));
    assert!(matches!(
        decode_move("AP99q36-"),
        Err(NotationError::TokenWidth(8))
    ));
    assert!(matches!(
        decode_move("AP9936-"),
        Err(NotationError::SquareRange(99))
    ));
    assert!(decode_move("-------").is_ok_and(|mov| mov.is_null()));
}
