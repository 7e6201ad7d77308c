use std::fmt;

use crate::chess::alliance::Alliance;
use crate::chess::moves::Move;
use crate::chess::piece::{Piece, PieceKind};
use crate::chess::player::{Player, PlayerKind, calculate_castles, is_square_attacked};
use crate::chess::zobrist;

pub const BOARD_WIDTH: usize = 8;
pub const BOARD_SIZE: usize = 64;

pub type Square = u8;

#[inline(always)]
pub fn rank_of(square: Square) -> u8 {
    square / BOARD_WIDTH as u8
}

#[inline(always)]
pub fn file_of(square: Square) -> u8 {
    square % BOARD_WIDTH as u8
}

#[inline(always)]
pub fn to_square(rank: i8, file: i8) -> Square {
    ((rank * BOARD_WIDTH as i8) + file) as Square
}

#[inline(always)]
pub fn valid_axis(axis: i8) -> bool {
    axis >= 0 && axis < BOARD_WIDTH as i8
}

/// A single square: empty, or holding a piece.
#[derive(PartialEq, Clone, Copy, Debug, Default)]
pub enum Tile {
    #[default]
    Empty,
    Occupied(Piece),
}

impl Tile {
    #[inline(always)]
    pub fn is_occupied(self) -> bool {
        matches!(self, Tile::Occupied(_))
    }

    #[inline(always)]
    pub fn piece(self) -> Option<Piece> {
        match self {
            Tile::Empty => None,
            Tile::Occupied(piece) => Some(piece),
        }
    }
}

/// Everything a board knows about one side, computed once at build time.
#[derive(Clone, Debug)]
pub(crate) struct SideState {
    pub(crate) pieces: Vec<Piece>,
    pub(crate) king: Piece,
    pub(crate) legal_moves: Vec<Move>,
    pub(crate) in_check: bool,
    pub(crate) castled: bool,
    pub(crate) promoted: bool,
    pub(crate) kind: PlayerKind,
}

/// An immutable snapshot of a position. Every move produces a brand-new
/// `Board`; nothing here is mutated after `Builder::build` returns.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) tiles: [Tile; BOARD_SIZE],
    pub(crate) sides: [SideState; 2],
    pub(crate) to_move: Alliance,
    pub(crate) en_passant_pawn: Option<Piece>,
    pub(crate) hash: u64,
}

impl Board {
    #[inline(always)]
    pub fn tile(&self, square: Square) -> Tile {
        self.tiles[square as usize]
    }

    #[inline(always)]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.tile(square).piece()
    }

    pub fn to_move(&self) -> Alliance {
        self.to_move
    }

    pub fn en_passant_pawn(&self) -> Option<Piece> {
        self.en_passant_pawn
    }

    /// The position's Zobrist hash, maintained incrementally across moves.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Recomputes the hash from scratch. `hash()` must always agree with this.
    pub fn compute_hash(&self) -> u64 {
        zobrist::compute_hash(self)
    }

    pub fn player(&self, alliance: Alliance) -> Player<'_> {
        Player::new(self, alliance)
    }

    pub fn current_player(&self) -> Player<'_> {
        self.player(self.to_move)
    }

    /// The standard starting position, all pieces unmoved, White to move.
    pub fn initial() -> Board {
        const BACK_RANK: [PieceKind; BOARD_WIDTH] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut builder = Builder::new();
        for (file, &kind) in BACK_RANK.iter().enumerate() {
            builder.set_piece(Piece::new(kind, file as Square, Alliance::Black));
            builder.set_piece(Piece::new(
                kind,
                (7 * BOARD_WIDTH + file) as Square,
                Alliance::White,
            ));
        }
        for file in 0..BOARD_WIDTH {
            builder.set_piece(Piece::new(
                PieceKind::Pawn,
                (BOARD_WIDTH + file) as Square,
                Alliance::Black,
            ));
            builder.set_piece(Piece::new(
                PieceKind::Pawn,
                (6 * BOARD_WIDTH + file) as Square,
                Alliance::White,
            ));
        }
        builder.set_to_move(Alliance::White);
        builder.build()
    }
}

/// Rank-major layout string: '/' between ranks, digits compress empty runs,
/// uppercase letters are White.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut empty_run = 0;
        for (index, tile) in self.tiles.iter().enumerate() {
            if let Tile::Occupied(piece) = tile {
                if empty_run > 0 {
                    write!(f, "{empty_run}")?;
                    empty_run = 0;
                }
                write!(f, "{}", piece.letter())?;
            } else {
                empty_run += 1;
            }
            if (index + 1) % BOARD_WIDTH == 0 {
                if empty_run > 0 {
                    write!(f, "{empty_run}")?;
                    empty_run = 0;
                }
                if index < BOARD_SIZE - 1 {
                    write!(f, "/")?;
                }
            }
        }
        Ok(())
    }
}

/// The sole way to create a `Board`: stage pieces and flags, then `build()`.
pub struct Builder {
    pieces: [Option<Piece>; BOARD_SIZE],
    to_move: Alliance,
    en_passant_pawn: Option<Piece>,
    castled: [bool; 2],
    promoted: [bool; 2],
    kinds: [PlayerKind; 2],
    hash: Option<u64>,
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            pieces: [None; BOARD_SIZE],
            to_move: Alliance::White,
            en_passant_pawn: None,
            castled: [false; 2],
            promoted: [false; 2],
            kinds: [PlayerKind::Computer; 2],
            hash: None,
        }
    }

    /// Stages a piece on its own square, replacing whatever was there.
    pub fn set_piece(&mut self, piece: Piece) -> &mut Builder {
        self.pieces[piece.square as usize] = Some(piece);
        self
    }

    pub fn set_to_move(&mut self, alliance: Alliance) -> &mut Builder {
        self.to_move = alliance;
        self
    }

    pub fn set_en_passant_pawn(&mut self, pawn: Piece) -> &mut Builder {
        debug_assert_eq!(pawn.kind, PieceKind::Pawn);
        self.en_passant_pawn = Some(pawn);
        self
    }

    pub fn set_castled(&mut self, alliance: Alliance, castled: bool) -> &mut Builder {
        self.castled[alliance.index()] = castled;
        self
    }

    pub fn set_promoted(&mut self, alliance: Alliance, promoted: bool) -> &mut Builder {
        self.promoted[alliance.index()] = promoted;
        self
    }

    pub fn set_player_kind(&mut self, alliance: Alliance, kind: PlayerKind) -> &mut Builder {
        self.kinds[alliance.index()] = kind;
        self
    }

    /// Incremental hash hint for the board under construction. `build()`
    /// verifies it against a full recompute in debug builds.
    pub(crate) fn set_hash(&mut self, hash: u64) -> &mut Builder {
        self.hash = Some(hash);
        self
    }

    /// Freezes the staged configuration into a `Board`, computing active
    /// piece sets, both sides' legal moves, check flags, and castle moves.
    ///
    /// # Panics
    /// If either side has no king. A board without two kings is not a chess
    /// position and nothing downstream can cope with one.
    pub fn build(self) -> Board {
        let mut tiles = [Tile::Empty; BOARD_SIZE];
        for piece in self.pieces.into_iter().flatten() {
            tiles[piece.square as usize] = Tile::Occupied(piece);
        }

        let mut white_pieces = Vec::new();
        let mut black_pieces = Vec::new();
        for piece in tiles.iter().filter_map(|tile| tile.piece()) {
            match piece.alliance {
                Alliance::White => white_pieces.push(piece),
                Alliance::Black => black_pieces.push(piece),
            }
        }
        let white_king = find_king(&white_pieces, Alliance::White);
        let black_king = find_king(&black_pieces, Alliance::Black);

        let mut board = Board {
            tiles,
            sides: [
                SideState {
                    pieces: white_pieces,
                    king: white_king,
                    legal_moves: Vec::new(),
                    in_check: false,
                    castled: self.castled[0],
                    promoted: self.promoted[0],
                    kind: self.kinds[0],
                },
                SideState {
                    pieces: black_pieces,
                    king: black_king,
                    legal_moves: Vec::new(),
                    in_check: false,
                    castled: self.castled[1],
                    promoted: self.promoted[1],
                    kind: self.kinds[1],
                },
            ],
            to_move: self.to_move,
            en_passant_pawn: self.en_passant_pawn,
            hash: 0,
        };

        let white_standard = standard_moves(&board, Alliance::White);
        let black_standard = standard_moves(&board, Alliance::Black);

        board.sides[0].in_check = is_square_attacked(white_king.square, &black_standard);
        board.sides[1].in_check = is_square_attacked(black_king.square, &white_standard);

        let white_castles = calculate_castles(&board, Alliance::White, &black_standard);
        let black_castles = calculate_castles(&board, Alliance::Black, &white_standard);

        board.sides[0].legal_moves = join_moves(&white_castles, white_standard);
        board.sides[1].legal_moves = join_moves(&black_castles, black_standard);

        board.hash = self
            .hash
            .unwrap_or_else(|| zobrist::compute_hash(&board));
        debug_assert_eq!(
            board.hash,
            zobrist::compute_hash(&board),
            "incremental hash diverged from recomputation"
        );

        board
    }
}

fn find_king(pieces: &[Piece], alliance: Alliance) -> Piece {
    pieces
        .iter()
        .copied()
        .find(|piece| piece.kind == PieceKind::King)
        .unwrap_or_else(|| panic!("invalid board: no {alliance:?} king"))
}

fn standard_moves(board: &Board, alliance: Alliance) -> Vec<Move> {
    let mut moves = Vec::with_capacity(40);
    for piece in &board.sides[alliance.index()].pieces {
        moves.extend(piece.pseudo_legal_moves(board));
    }
    moves
}

// castles lead the list so callers probing for them see them first
fn join_moves(castles: &[Move], standard: Vec<Move>) -> Vec<Move> {
    if castles.is_empty() {
        return standard;
    }
    let mut moves = Vec::with_capacity(castles.len() + standard.len());
    moves.extend_from_slice(castles);
    moves.extend(standard);
    moves
}
