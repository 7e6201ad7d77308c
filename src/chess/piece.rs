use tinyvec::ArrayVec;

use crate::chess::alliance::Alliance;
use crate::chess::board::{Board, Square, file_of, rank_of, to_square, valid_axis};
use crate::chess::moves::Move;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

pub const PIECE_KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

impl PieceKind {
    pub fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 300,
            PieceKind::Bishop => 300,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 10_000,
        }
    }

    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_letter(letter: char) -> Option<PieceKind> {
        match letter.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// An immutable piece value. A move never mutates a piece: it replaces it
/// with a successor at the destination square with `first_move` cleared.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Piece {
    pub kind: PieceKind,
    pub square: Square,
    pub alliance: Alliance,
    pub first_move: bool,
}

/// Per-piece move list. A queen peaks at 27 moves and a promoting pawn at 12,
/// so 32 slots cover every piece.
pub type PieceMoves = ArrayVec<[Move; 32]>;

#[derive(Copy, Clone)]
struct Offset {
    rank: i8,
    file: i8,
}

const KNIGHT_OFFSETS: [Offset; 8] = [
    Offset { rank: -2, file: -1 },
    Offset { rank: -2, file: 1 },
    Offset { rank: -1, file: -2 },
    Offset { rank: -1, file: 2 },
    Offset { rank: 1, file: -2 },
    Offset { rank: 1, file: 2 },
    Offset { rank: 2, file: -1 },
    Offset { rank: 2, file: 1 },
];

const KING_OFFSETS: [Offset; 8] = [
    Offset { rank: -1, file: -1 },
    Offset { rank: -1, file: 0 },
    Offset { rank: -1, file: 1 },
    Offset { rank: 0, file: -1 },
    Offset { rank: 0, file: 1 },
    Offset { rank: 1, file: -1 },
    Offset { rank: 1, file: 0 },
    Offset { rank: 1, file: 1 },
];

const ROOK_DIRECTIONS: [Offset; 4] = [
    Offset { rank: -1, file: 0 },
    Offset { rank: 1, file: 0 },
    Offset { rank: 0, file: -1 },
    Offset { rank: 0, file: 1 },
];

const BISHOP_DIRECTIONS: [Offset; 4] = [
    Offset { rank: -1, file: -1 },
    Offset { rank: -1, file: 1 },
    Offset { rank: 1, file: -1 },
    Offset { rank: 1, file: 1 },
];

const QUEEN_DIRECTIONS: [Offset; 8] = [
    Offset { rank: -1, file: 0 },
    Offset { rank: 1, file: 0 },
    Offset { rank: 0, file: -1 },
    Offset { rank: 0, file: 1 },
    Offset { rank: -1, file: -1 },
    Offset { rank: -1, file: 1 },
    Offset { rank: 1, file: -1 },
    Offset { rank: 1, file: 1 },
];

impl Piece {
    /// A piece that has not moved yet.
    pub fn new(kind: PieceKind, square: Square, alliance: Alliance) -> Piece {
        Piece {
            kind,
            square,
            alliance,
            first_move: true,
        }
    }

    /// A piece that has already moved at least once.
    pub fn moved(kind: PieceKind, square: Square, alliance: Alliance) -> Piece {
        Piece {
            kind,
            square,
            alliance,
            first_move: false,
        }
    }

    /// The successor value this piece leaves behind after moving.
    pub fn advanced_to(self, square: Square) -> Piece {
        Piece {
            square,
            first_move: false,
            ..self
        }
    }

    pub fn value(&self) -> i32 {
        self.kind.value()
    }

    /// Piece letter cased by alliance: uppercase for White.
    pub fn letter(&self) -> char {
        match self.alliance {
            Alliance::White => self.kind.letter(),
            Alliance::Black => self.kind.letter().to_ascii_lowercase(),
        }
    }

    /// Geometrically valid moves for this piece on the given board. Moves that
    /// would leave the own king in check are filtered one layer up, when a
    /// player attempts them.
    pub fn pseudo_legal_moves(&self, board: &Board) -> PieceMoves {
        debug_assert_eq!(board.tile(self.square).piece(), Some(*self));

        match self.kind {
            PieceKind::Pawn => self.pawn_moves(board),
            PieceKind::Knight => self.jumping_moves(board, &KNIGHT_OFFSETS),
            PieceKind::Bishop => self.sliding_moves(board, &BISHOP_DIRECTIONS),
            PieceKind::Rook => self.sliding_moves(board, &ROOK_DIRECTIONS),
            PieceKind::Queen => self.sliding_moves(board, &QUEEN_DIRECTIONS),
            PieceKind::King => self.jumping_moves(board, &KING_OFFSETS),
        }
    }

    fn jumping_moves(&self, board: &Board, offsets: &[Offset]) -> PieceMoves {
        let mut moves = PieceMoves::new();
        let rank = rank_of(self.square) as i8;
        let file = file_of(self.square) as i8;

        for offset in offsets {
            let (r, f) = (rank + offset.rank, file + offset.file);
            if !valid_axis(r) || !valid_axis(f) {
                continue;
            }
            let to = to_square(r, f);
            match board.tile(to).piece() {
                None => moves.push(Move::Quiet { piece: *self, to }),
                Some(target) if target.alliance != self.alliance => {
                    moves.push(Move::Capture {
                        piece: *self,
                        to,
                        captured: target,
                    });
                }
                Some(_) => {}
            }
        }

        moves
    }

    fn sliding_moves(&self, board: &Board, directions: &[Offset]) -> PieceMoves {
        let mut moves = PieceMoves::new();
        let rank = rank_of(self.square) as i8;
        let file = file_of(self.square) as i8;

        for direction in directions {
            let (mut r, mut f) = (rank + direction.rank, file + direction.file);
            while valid_axis(r) && valid_axis(f) {
                let to = to_square(r, f);
                match board.tile(to).piece() {
                    None => moves.push(Move::Quiet { piece: *self, to }),
                    Some(target) => {
                        if target.alliance != self.alliance {
                            moves.push(Move::Capture {
                                piece: *self,
                                to,
                                captured: target,
                            });
                        }
                        break;
                    }
                }
                r += direction.rank;
                f += direction.file;
            }
        }

        moves
    }

    fn pawn_moves(&self, board: &Board) -> PieceMoves {
        let mut moves = PieceMoves::new();
        let rank = rank_of(self.square) as i8;
        let file = file_of(self.square) as i8;
        let direction = self.alliance.direction();

        let ahead = rank + direction;
        if !valid_axis(ahead) {
            // a pawn on the back rank cannot exist; nothing to generate
            return moves;
        }

        let push = to_square(ahead, file);
        if !board.tile(push).is_occupied() {
            self.push_pawn_move(push, None, &mut moves);

            // double step from the home rank, with both squares clear
            if self.first_move && self.alliance.is_pawn_home_square(self.square) {
                let jump = to_square(rank + 2 * direction, file);
                if !board.tile(jump).is_occupied() {
                    moves.push(Move::PawnDoubleStep {
                        piece: *self,
                        to: jump,
                    });
                }
            }
        }

        for side in [-1i8, 1] {
            let capture_file = file + side;
            if !valid_axis(capture_file) {
                continue;
            }
            let to = to_square(ahead, capture_file);
            match board.tile(to).piece() {
                Some(target) if target.alliance != self.alliance => {
                    self.push_pawn_move(to, Some(target), &mut moves);
                }
                Some(_) => {}
                None => {
                    // the en passant pawn sits beside this one; the capture
                    // lands on the square it skipped
                    if let Some(en_passant) = board.en_passant_pawn()
                        && en_passant.square == to_square(rank, capture_file)
                        && en_passant.alliance != self.alliance
                    {
                        moves.push(Move::PawnEnPassant {
                            piece: *self,
                            to,
                            captured: en_passant,
                        });
                    }
                }
            }
        }

        moves
    }

    fn push_pawn_move(&self, to: Square, captured: Option<Piece>, moves: &mut PieceMoves) {
        if self.alliance.is_promotion_square(to) {
            for promotion in [
                PieceKind::Queen,
                PieceKind::Rook,
                PieceKind::Bishop,
                PieceKind::Knight,
            ] {
                moves.push(Move::PawnPromotion {
                    piece: *self,
                    to,
                    captured,
                    promotion,
                });
            }
        } else {
            match captured {
                Some(captured) => moves.push(Move::PawnCapture {
                    piece: *self,
                    to,
                    captured,
                }),
                None => moves.push(Move::PawnPush { piece: *self, to }),
            }
        }
    }
}
