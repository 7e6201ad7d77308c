//! Textual boundary: position snapshots, move tokens, and square names.
//!
//! A snapshot is seven whitespace-separated fields: board layout, side to
//! move, castle availability, en passant pawn square, castled flags, promoted
//! flags, and the white player kind. A move token is a fixed seven characters:
//! kind tag, cased piece letter, two-digit origin, two-digit destination, and
//! a cased captured-piece letter or '-'. Decoding is all-or-nothing: malformed
//! input yields a [`NotationError`], never a partial board.

use thiserror::Error;

use crate::chess::{
    Alliance, Board, Builder, Move, Piece, PieceKind, PlayerKind, Square, file_of, rank_of,
    to_square,
};

pub const SNAPSHOT_FIELDS: usize = 7;
pub const MOVE_TOKEN_WIDTH: usize = 7;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("expected {expected} whitespace-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("field '{field}' must be {expected} characters wide, found {found}")]
    FieldWidth {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("unexpected character '{found}' in field '{field}'")]
    UnknownChar { field: &'static str, found: char },

    #[error("board layout must describe 8 ranks of 8 files")]
    LayoutShape,

    #[error("no square is named '{0}'")]
    UnknownSquare(String),

    #[error("square index {0} is out of range")]
    SquareRange(u8),

    #[error("move token must be 7 characters, found {0}")]
    TokenWidth(usize),

    #[error("move token kind '{0}' requires a captured piece")]
    MissingCapture(char),
}

/// Algebraic name of a square ("a8" is square 0, "h1" is square 63).
pub fn square_name(square: Square) -> String {
    format!(
        "{}{}",
        (b'a' + file_of(square)) as char,
        8 - rank_of(square)
    )
}

pub fn parse_square_name(name: &str) -> Result<Square, NotationError> {
    let mut chars = name.chars();
    if let (Some(file @ 'a'..='h'), Some(rank @ '1'..='8'), None) =
        (chars.next(), chars.next(), chars.next())
    {
        let file = file as u8 - b'a';
        let rank_index = 8 - (rank as u8 - b'0');
        Ok(rank_index * 8 + file)
    } else {
        Err(NotationError::UnknownSquare(name.to_string()))
    }
}

fn flag(value: bool) -> char {
    if value { 't' } else { 'f' }
}

/// Encodes a board as a seven-field snapshot. `decode_snapshot` of the result
/// reproduces the same string.
pub fn encode_snapshot(board: &Board) -> String {
    let white = board.player(Alliance::White);
    let black = board.player(Alliance::Black);

    let mut castle_tokens = String::new();
    if white.is_king_side_castle_capable() {
        castle_tokens.push('K');
    }
    if white.is_queen_side_castle_capable() {
        castle_tokens.push('Q');
    }
    if black.is_king_side_castle_capable() {
        castle_tokens.push('k');
    }
    if black.is_queen_side_castle_capable() {
        castle_tokens.push('q');
    }
    if castle_tokens.is_empty() {
        castle_tokens.push('-');
    }

    let en_passant = board
        .en_passant_pawn()
        .map_or_else(|| "-".to_string(), |pawn| square_name(pawn.square));

    format!(
        "{} {} {} {} {}{} {}{} {}",
        board,
        match board.to_move() {
            Alliance::White => 'W',
            Alliance::Black => 'B',
        },
        castle_tokens,
        en_passant,
        flag(white.is_castled()),
        flag(black.is_castled()),
        flag(white.has_promoted()),
        flag(black.has_promoted()),
        white.kind().letter(),
    )
}

fn expect_width(
    field: &'static str,
    text: &str,
    expected: usize,
) -> Result<(), NotationError> {
    let found = text.chars().count();
    if found != expected {
        return Err(NotationError::FieldWidth {
            field,
            expected,
            found,
        });
    }
    Ok(())
}

fn parse_flag(field: &'static str, ch: char) -> Result<bool, NotationError> {
    match ch {
        't' => Ok(true),
        'f' => Ok(false),
        _ => Err(NotationError::UnknownChar { field, found: ch }),
    }
}

/// Decodes a seven-field snapshot into a board.
///
/// First-move flags are reconstructed the way the format implies: rooks and
/// kings are unmoved exactly when a matching castle token is present, the en
/// passant pawn is moved, and every other piece counts as unmoved.
pub fn decode_snapshot(text: &str) -> Result<Board, NotationError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != SNAPSHOT_FIELDS {
        return Err(NotationError::FieldCount {
            expected: SNAPSHOT_FIELDS,
            found: fields.len(),
        });
    }
    let (layout, mover, castle_tokens, en_passant, castled, promoted, white_kind) = (
        fields[0], fields[1], fields[2], fields[3], fields[4], fields[5], fields[6],
    );

    expect_width("side to move", mover, 1)?;
    expect_width("castled flags", castled, 2)?;
    expect_width("promoted flags", promoted, 2)?;
    expect_width("player kind", white_kind, 1)?;
    if castle_tokens.is_empty() || castle_tokens.chars().count() > 4 {
        return Err(NotationError::FieldWidth {
            field: "castle availability",
            expected: 4,
            found: castle_tokens.chars().count(),
        });
    }

    let to_move = match mover.chars().next() {
        Some('W') => Alliance::White,
        Some('B') => Alliance::Black,
        Some(found) => {
            return Err(NotationError::UnknownChar {
                field: "side to move",
                found,
            });
        }
        None => unreachable!("width checked above"),
    };

    let mut white_king_side = false;
    let mut white_queen_side = false;
    let mut black_king_side = false;
    let mut black_queen_side = false;
    if castle_tokens != "-" {
        for ch in castle_tokens.chars() {
            match ch {
                'K' => white_king_side = true,
                'Q' => white_queen_side = true,
                'k' => black_king_side = true,
                'q' => black_queen_side = true,
                found => {
                    return Err(NotationError::UnknownChar {
                        field: "castle availability",
                        found,
                    });
                }
            }
        }
    }

    let en_passant_square = if en_passant == "-" {
        None
    } else {
        Some(parse_square_name(en_passant)?)
    };

    let mut castled_flags = castled.chars();
    let white_castled = parse_flag("castled flags", castled_flags.next().unwrap_or('f'))?;
    let black_castled = parse_flag("castled flags", castled_flags.next().unwrap_or('f'))?;
    let mut promoted_flags = promoted.chars();
    let white_promoted = parse_flag("promoted flags", promoted_flags.next().unwrap_or('f'))?;
    let black_promoted = parse_flag("promoted flags", promoted_flags.next().unwrap_or('f'))?;

    let white_player_kind = match white_kind.chars().next() {
        Some('U') => PlayerKind::User,
        Some('C') => PlayerKind::Computer,
        Some(found) => {
            return Err(NotationError::UnknownChar {
                field: "player kind",
                found,
            });
        }
        None => unreachable!("width checked above"),
    };

    let mut builder = Builder::new();
    builder.set_to_move(to_move);
    builder.set_castled(Alliance::White, white_castled);
    builder.set_castled(Alliance::Black, black_castled);
    builder.set_promoted(Alliance::White, white_promoted);
    builder.set_promoted(Alliance::Black, black_promoted);
    builder.set_player_kind(Alliance::White, white_player_kind);
    builder.set_player_kind(Alliance::Black, PlayerKind::Computer);

    let mut rank: u8 = 0;
    let mut file: u8 = 0;
    let mut en_passant_pawn = None;
    for ch in layout.chars() {
        match ch {
            '/' => {
                if file != 8 || rank >= 7 {
                    return Err(NotationError::LayoutShape);
                }
                rank += 1;
                file = 0;
            }
            '1'..='8' => {
                file += ch as u8 - b'0';
                if file > 8 {
                    return Err(NotationError::LayoutShape);
                }
            }
            _ => {
                let kind = PieceKind::from_letter(ch).ok_or(NotationError::UnknownChar {
                    field: "board layout",
                    found: ch,
                })?;
                let alliance = if ch.is_ascii_uppercase() {
                    Alliance::White
                } else {
                    Alliance::Black
                };
                if file >= 8 {
                    return Err(NotationError::LayoutShape);
                }
                let square = to_square(rank as i8, file as i8);
                let piece = assemble_piece(
                    kind,
                    square,
                    alliance,
                    en_passant_square,
                    [white_king_side, white_queen_side],
                    [black_king_side, black_queen_side],
                );
                if kind == PieceKind::Pawn && en_passant_square == Some(square) {
                    en_passant_pawn = Some(piece);
                }
                builder.set_piece(piece);
                file += 1;
            }
        }
    }
    if rank != 7 || file != 8 {
        return Err(NotationError::LayoutShape);
    }
    if let Some(pawn) = en_passant_pawn {
        builder.set_en_passant_pawn(pawn);
    }

    Ok(builder.build())
}

fn assemble_piece(
    kind: PieceKind,
    square: Square,
    alliance: Alliance,
    en_passant_square: Option<Square>,
    white_castle: [bool; 2],
    black_castle: [bool; 2],
) -> Piece {
    let [king_side, queen_side] = match alliance {
        Alliance::White => white_castle,
        Alliance::Black => black_castle,
    };
    let unmoved = match kind {
        PieceKind::Pawn => en_passant_square != Some(square),
        PieceKind::Rook => match alliance {
            Alliance::White => (square == 63 && king_side) || (square == 56 && queen_side),
            Alliance::Black => (square == 7 && king_side) || (square == 0 && queen_side),
        },
        PieceKind::King => king_side || queen_side,
        _ => true,
    };
    if unmoved {
        Piece::new(kind, square, alliance)
    } else {
        Piece::moved(kind, square, alliance)
    }
}

fn move_tag(mov: &Move) -> char {
    match mov {
        Move::Null => '-',
        Move::Quiet { .. } => 'A',
        Move::Capture { .. } => 'B',
        Move::PawnPush { .. } => 'C',
        Move::PawnCapture { .. } => 'D',
        Move::PawnEnPassant { .. } => 'E',
        Move::PawnPromotion { .. } => 'F',
        Move::PawnDoubleStep { .. } => 'G',
        Move::CastleKingSide { .. } => 'H',
        Move::CastleQueenSide { .. } => 'I',
    }
}

/// Encodes a move as a fixed-width token for game logs.
pub fn encode_move(mov: &Move) -> String {
    if mov.is_null() {
        return "-".repeat(MOVE_TOKEN_WIDTH);
    }
    let piece = mov.moved_piece();
    let white = piece.alliance == Alliance::White;
    let captured = mov.captured_piece().map_or('-', |captured| {
        // captured letters carry the opposite case of the mover
        if white {
            captured.kind.letter().to_ascii_lowercase()
        } else {
            captured.kind.letter()
        }
    });
    format!(
        "{}{}{:02}{:02}{}",
        move_tag(mov),
        piece.letter(),
        mov.origin(),
        mov.destination(),
        captured,
    )
}

fn parse_square_index(chars: &[char], field: &'static str) -> Result<Square, NotationError> {
    let mut value = 0u8;
    for &ch in chars {
        let digit = ch
            .to_digit(10)
            .ok_or(NotationError::UnknownChar { field, found: ch })?;
        value = value * 10 + digit as u8;
    }
    if value >= 64 {
        return Err(NotationError::SquareRange(value));
    }
    Ok(value)
}

/// Decodes a move token into a detached move descriptor.
///
/// The result carries enough to display or replay the move, but it is not
/// tied to any board: execute it only after re-matching it against a live
/// board's legal moves (`Player::find_move`). Promotion tokens decode as
/// queen promotions; the token format carries no promotion kind.
pub fn decode_move(token: &str) -> Result<Move, NotationError> {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() != MOVE_TOKEN_WIDTH {
        return Err(NotationError::TokenWidth(chars.len()));
    }
    let tag = chars[0];
    if tag == '-' {
        return Ok(Move::Null);
    }

    let piece_char = chars[1];
    let kind = PieceKind::from_letter(piece_char).ok_or(NotationError::UnknownChar {
        field: "moved piece",
        found: piece_char,
    })?;
    let alliance = if piece_char.is_ascii_uppercase() {
        Alliance::White
    } else {
        Alliance::Black
    };
    let origin = parse_square_index(&chars[2..4], "origin square")?;
    let destination = parse_square_index(&chars[4..6], "destination square")?;
    let piece = Piece::moved(kind, origin, alliance);

    let captured_kind = match chars[6] {
        '-' => None,
        ch => Some(PieceKind::from_letter(ch).ok_or(NotationError::UnknownChar {
            field: "captured piece",
            found: ch,
        })?),
    };
    let capture_at = |square: Square| -> Result<Piece, NotationError> {
        captured_kind
            .map(|kind| Piece::moved(kind, square, alliance.opposite()))
            .ok_or(NotationError::MissingCapture(tag))
    };

    match tag {
        'A' => Ok(Move::Quiet {
            piece,
            to: destination,
        }),
        'B' => Ok(Move::Capture {
            piece,
            to: destination,
            captured: capture_at(destination)?,
        }),
        'C' => Ok(Move::PawnPush {
            piece,
            to: destination,
        }),
        'D' => Ok(Move::PawnCapture {
            piece,
            to: destination,
            captured: capture_at(destination)?,
        }),
        'E' => {
            // the passed pawn sits on the origin rank, destination file
            let victim = to_square(rank_of(origin) as i8, file_of(destination) as i8);
            Ok(Move::PawnEnPassant {
                piece,
                to: destination,
                captured: Piece::moved(PieceKind::Pawn, victim, alliance.opposite()),
            })
        }
        'F' => Ok(Move::PawnPromotion {
            piece,
            to: destination,
            captured: captured_kind
                .map(|kind| Piece::moved(kind, destination, alliance.opposite())),
            promotion: PieceKind::Queen,
        }),
        'G' => Ok(Move::PawnDoubleStep {
            piece,
            to: destination,
        }),
        'H' => {
            let (rook_from, rook_to) = match alliance {
                Alliance::White => (63, 61),
                Alliance::Black => (7, 5),
            };
            Ok(Move::CastleKingSide {
                piece,
                to: destination,
                rook: Piece::moved(PieceKind::Rook, rook_from, alliance),
                rook_to,
            })
        }
        'I' => {
            let (rook_from, rook_to) = match alliance {
                Alliance::White => (56, 59),
                Alliance::Black => (0, 3),
            };
            Ok(Move::CastleQueenSide {
                piece,
                to: destination,
                rook: Piece::moved(PieceKind::Rook, rook_from, alliance),
                rook_to,
            })
        }
        found => Err(NotationError::UnknownChar {
            field: "move kind",
            found,
        }),
    }
}
