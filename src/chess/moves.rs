use crate::chess::alliance::Alliance;
use crate::chess::board::{Board, Builder, Square};
use crate::chess::piece::{Piece, PieceKind};
use crate::chess::zobrist;

/// A pure move descriptor. Executing a move builds a brand-new board; the
/// board the move was generated from is never touched.
///
/// `Null` is the absent move: it carries no squares and cannot be executed.
#[derive(PartialEq, Clone, Copy, Debug, Default)]
pub enum Move {
    #[default]
    Null,
    /// A non-pawn move onto an empty square.
    Quiet { piece: Piece, to: Square },
    /// A non-pawn move capturing the piece on the destination.
    Capture {
        piece: Piece,
        to: Square,
        captured: Piece,
    },
    /// A pawn advancing one square.
    PawnPush { piece: Piece, to: Square },
    /// A pawn capturing diagonally.
    PawnCapture {
        piece: Piece,
        to: Square,
        captured: Piece,
    },
    /// A pawn capturing the adjacent pawn that just double-stepped, landing
    /// on the square it skipped.
    PawnEnPassant {
        piece: Piece,
        to: Square,
        captured: Piece,
    },
    /// A pawn advancing two squares from its home rank. Registers itself as
    /// the new board's en passant pawn.
    PawnDoubleStep { piece: Piece, to: Square },
    /// A pawn reaching the back rank, replaced by the promotion piece.
    PawnPromotion {
        piece: Piece,
        to: Square,
        captured: Option<Piece>,
        promotion: PieceKind,
    },
    CastleKingSide {
        piece: Piece,
        to: Square,
        rook: Piece,
        rook_to: Square,
    },
    CastleQueenSide {
        piece: Piece,
        to: Square,
        rook: Piece,
        rook_to: Square,
    },
}

impl Move {
    #[inline(always)]
    pub fn is_null(&self) -> bool {
        matches!(self, Move::Null)
    }

    pub fn moved_piece(&self) -> Piece {
        match *self {
            Move::Null => unreachable!("the null move has no piece"),
            Move::Quiet { piece, .. }
            | Move::Capture { piece, .. }
            | Move::PawnPush { piece, .. }
            | Move::PawnCapture { piece, .. }
            | Move::PawnEnPassant { piece, .. }
            | Move::PawnDoubleStep { piece, .. }
            | Move::PawnPromotion { piece, .. }
            | Move::CastleKingSide { piece, .. }
            | Move::CastleQueenSide { piece, .. } => piece,
        }
    }

    pub fn origin(&self) -> Square {
        self.moved_piece().square
    }

    pub fn destination(&self) -> Square {
        match *self {
            Move::Null => unreachable!("the null move has no destination"),
            Move::Quiet { to, .. }
            | Move::Capture { to, .. }
            | Move::PawnPush { to, .. }
            | Move::PawnCapture { to, .. }
            | Move::PawnEnPassant { to, .. }
            | Move::PawnDoubleStep { to, .. }
            | Move::PawnPromotion { to, .. }
            | Move::CastleKingSide { to, .. }
            | Move::CastleQueenSide { to, .. } => to,
        }
    }

    pub fn captured_piece(&self) -> Option<Piece> {
        match *self {
            Move::Capture { captured, .. }
            | Move::PawnCapture { captured, .. }
            | Move::PawnEnPassant { captured, .. } => Some(captured),
            Move::PawnPromotion { captured, .. } => captured,
            _ => None,
        }
    }

    #[inline(always)]
    pub fn is_attack(&self) -> bool {
        self.captured_piece().is_some()
    }

    #[inline(always)]
    pub fn is_castle(&self) -> bool {
        matches!(
            self,
            Move::CastleKingSide { .. } | Move::CastleQueenSide { .. }
        )
    }

    /// True when this move runs from `origin` to `destination`.
    pub fn matches(&self, origin: Square, destination: Square) -> bool {
        !self.is_null() && self.origin() == origin && self.destination() == destination
    }

    /// Builds the board this move leads to: every surviving piece carries
    /// over, the moved piece lands as its successor value, the mover flips,
    /// and the castled/promoted flags and player kinds are carried forward.
    ///
    /// Callers wanting legality checking should go through
    /// [`Player::make_move`](crate::chess::player::Player::make_move).
    pub fn execute(&self, board: &Board) -> Board {
        debug_assert!(!self.is_null(), "cannot execute the null move");

        let mover = self.moved_piece().alliance;
        let opponent = mover.opposite();
        let mut builder = Builder::new();

        for &piece in board.player(mover).active_pieces() {
            if piece != self.moved_piece() && !self.displaces(piece) {
                builder.set_piece(piece);
            }
        }
        for &piece in board.player(opponent).active_pieces() {
            if Some(piece) != self.captured_piece() {
                builder.set_piece(piece);
            }
        }

        match *self {
            Move::PawnDoubleStep { piece, to } => {
                let pawn = piece.advanced_to(to);
                builder.set_piece(pawn);
                builder.set_en_passant_pawn(pawn);
            }
            Move::PawnPromotion {
                piece,
                to,
                promotion,
                ..
            } => {
                builder.set_piece(Piece::moved(promotion, to, piece.alliance));
            }
            Move::CastleKingSide {
                piece,
                to,
                rook,
                rook_to,
            }
            | Move::CastleQueenSide {
                piece,
                to,
                rook,
                rook_to,
            } => {
                builder.set_piece(piece.advanced_to(to));
                builder.set_piece(Piece::moved(PieceKind::Rook, rook_to, rook.alliance));
            }
            _ => {
                builder.set_piece(self.moved_piece().advanced_to(self.destination()));
            }
        }

        builder.set_to_move(opponent);
        builder.set_castled(mover, board.player(mover).is_castled() || self.is_castle());
        builder.set_castled(opponent, board.player(opponent).is_castled());
        builder.set_promoted(
            mover,
            board.player(mover).has_promoted() || matches!(self, Move::PawnPromotion { .. }),
        );
        builder.set_promoted(opponent, board.player(opponent).has_promoted());
        builder.set_player_kind(Alliance::White, board.player(Alliance::White).kind());
        builder.set_player_kind(Alliance::Black, board.player(Alliance::Black).kind());
        builder.set_hash(zobrist::update_hash(board, self));

        builder.build()
    }

    // the castle rook moves too and must not be copied over as-is
    fn displaces(&self, piece: Piece) -> bool {
        match *self {
            Move::CastleKingSide { rook, .. } | Move::CastleQueenSide { rook, .. } => piece == rook,
            _ => false,
        }
    }
}
