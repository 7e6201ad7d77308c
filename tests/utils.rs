#![allow(dead_code)]

use sable::chess::Board;
use sable::notation;

pub const INITIAL_SNAPSHOT: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR W KQkq - ff ff C";

/// After 1. e4: the e-pawn is the en passant pawn.
pub const EN_PASSANT_SNAPSHOT: &str =
    "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR B KQkq e4 ff ff C";

/// Both sides castled king-side.
pub const CASTLED_SNAPSHOT: &str =
    "r4rk1/pppppppp/8/8/8/8/PPPPPPPP/R4RK1 W - - tt ff C";

/// White promoted on a8.
pub const PROMOTED_SNAPSHOT: &str = "Q3k3/8/8/8/8/8/8/4K3 B - - ff tf C";

pub fn decode(snapshot: &str) -> Board {
    notation::decode_snapshot(snapshot)
        .unwrap_or_else(|err| panic!("fixture snapshot failed to decode: {err}"))
}
