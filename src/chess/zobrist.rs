use std::array::from_fn;
use std::sync::LazyLock;

use rand::{Rng, SeedableRng};

use crate::chess::alliance::Alliance;
use crate::chess::board::{BOARD_SIZE, BOARD_WIDTH, Board, Square, file_of};
use crate::chess::moves::Move;
use crate::chess::piece::{PIECE_KINDS, Piece, PieceKind};

// 63-bit keys: the top bit stays clear so hashes survive signed round-trips.
pub static PIECE_KEYS: LazyLock<[[[u64; BOARD_SIZE]; PIECE_KINDS.len()]; 2]> =
    LazyLock::new(|| {
        let mut rng = rand::rngs::SmallRng::seed_from_u64(1);
        from_fn(|_| from_fn(|_| from_fn(|_| rng.random::<u64>() >> 1)))
    });

pub static SIDE_KEY: LazyLock<u64> = LazyLock::new(|| {
    let mut rng = rand::rngs::SmallRng::seed_from_u64(2);
    rng.random::<u64>() >> 1
});

pub static CASTLE_KEYS: LazyLock<[u64; 16]> = LazyLock::new(|| {
    let mut rng = rand::rngs::SmallRng::seed_from_u64(3);
    from_fn(|_| rng.random::<u64>() >> 1)
});

pub static EN_PASSANT_KEYS: LazyLock<[u64; BOARD_WIDTH]> = LazyLock::new(|| {
    let mut rng = rand::rngs::SmallRng::seed_from_u64(4);
    from_fn(|_| rng.random::<u64>() >> 1)
});

pub(crate) struct CastleRights;
impl CastleRights {
    pub const WK: u8 = 1;
    pub const WQ: u8 = 2;
    pub const BK: u8 = 4;
    pub const BQ: u8 = 8;
}

#[inline(always)]
fn piece_key_at(piece: Piece, square: Square) -> u64 {
    PIECE_KEYS[piece.alliance.index()][piece.kind as usize][square as usize]
}

#[inline(always)]
fn piece_key(piece: Piece) -> u64 {
    piece_key_at(piece, piece.square)
}

/// 4-bit castle availability mask derived from unmoved king/rook pairs.
pub(crate) fn castle_rights(board: &Board) -> u8 {
    let mut rights = 0;
    if board.player(Alliance::White).is_king_side_castle_capable() {
        rights |= CastleRights::WK;
    }
    if board.player(Alliance::White).is_queen_side_castle_capable() {
        rights |= CastleRights::WQ;
    }
    if board.player(Alliance::Black).is_king_side_castle_capable() {
        rights |= CastleRights::BK;
    }
    if board.player(Alliance::Black).is_queen_side_castle_capable() {
        rights |= CastleRights::BQ;
    }
    rights
}

/// Full hash of a board: every occupied square, the side to move, the en
/// passant file, and the castle rights mask.
pub(crate) fn compute_hash(board: &Board) -> u64 {
    let mut hash = 0u64;
    for piece in (0..BOARD_SIZE as Square).filter_map(|square| board.piece_at(square)) {
        hash ^= piece_key(piece);
    }
    if board.to_move() == Alliance::Black {
        hash ^= *SIDE_KEY;
    }
    if let Some(pawn) = board.en_passant_pawn() {
        hash ^= EN_PASSANT_KEYS[file_of(pawn.square) as usize];
    }
    hash ^ CASTLE_KEYS[castle_rights(board) as usize]
}

/// Hash of the board `mov` leads to, derived from the parent's hash without
/// touching the child. Covers the moved piece, the captured piece (at its own
/// square for en passant), the castle rook, the promotion kind change, the
/// side toggle, the en passant file delta, and the castle rights delta.
pub(crate) fn update_hash(board: &Board, mov: &Move) -> u64 {
    let piece = mov.moved_piece();
    let mover = piece.alliance;
    let mut hash = board.hash();

    hash ^= piece_key(piece);
    let landed = match *mov {
        Move::PawnPromotion { to, promotion, .. } => Piece::moved(promotion, to, mover),
        _ => piece.advanced_to(mov.destination()),
    };
    hash ^= piece_key(landed);

    if let Some(captured) = mov.captured_piece() {
        hash ^= piece_key(captured);
    }
    if let Move::CastleKingSide { rook, rook_to, .. }
    | Move::CastleQueenSide { rook, rook_to, .. } = *mov
    {
        hash ^= piece_key(rook);
        hash ^= piece_key_at(rook, rook_to);
    }

    if board.to_move() == Alliance::Black {
        hash ^= *SIDE_KEY;
    }
    if mover.opposite() == Alliance::Black {
        hash ^= *SIDE_KEY;
    }

    if let Some(pawn) = board.en_passant_pawn() {
        hash ^= EN_PASSANT_KEYS[file_of(pawn.square) as usize];
    }
    if let Move::PawnDoubleStep { to, .. } = mov {
        hash ^= EN_PASSANT_KEYS[file_of(*to) as usize];
    }

    let before = castle_rights(board);
    let after = rights_after(before, mov);
    if before != after {
        hash ^= CASTLE_KEYS[before as usize] ^ CASTLE_KEYS[after as usize];
    }

    hash
}

// Rights can only shrink: a king or rook leaving home, or a rook captured on
// its corner, clears the matching bits.
fn rights_after(before: u8, mov: &Move) -> u8 {
    let mut rights = before;
    let piece = mov.moved_piece();
    if piece.kind == PieceKind::King || mov.is_castle() {
        rights &= !match piece.alliance {
            Alliance::White => CastleRights::WK | CastleRights::WQ,
            Alliance::Black => CastleRights::BK | CastleRights::BQ,
        };
    } else if piece.kind == PieceKind::Rook {
        rights &= !corner_right(piece.square, piece.alliance);
    }
    if let Some(captured) = mov.captured_piece()
        && captured.kind == PieceKind::Rook
    {
        rights &= !corner_right(captured.square, captured.alliance);
    }
    rights
}

fn corner_right(square: Square, alliance: Alliance) -> u8 {
    match (square, alliance) {
        (56, Alliance::White) => CastleRights::WQ, // a1
        (63, Alliance::White) => CastleRights::WK, // h1
        (0, Alliance::Black) => CastleRights::BQ,  // a8
        (7, Alliance::Black) => CastleRights::BK,  // h8
        _ => 0,
    }
}
