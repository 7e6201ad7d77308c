//! Move ordering for the search: captures sorted by victim value ahead of
//! quiet moves, with a recorded table move promoted to the front of its
//! partition. Good ordering is what makes alpha-beta cut.

use std::cmp::Reverse;

use crate::chess::{Board, Move, PieceKind};

fn victim_value(mov: &Move) -> i32 {
    mov.captured_piece().map_or(0, |piece| piece.value())
}

// a table move refers to a prior board; re-match it against this one
fn resolve_table_move(board: &Board, table_move: Move) -> Option<Move> {
    if table_move.is_null() {
        return None;
    }
    board
        .current_player()
        .find_move(table_move.origin(), table_move.destination())
}

/// All of the current player's legal moves: captures in descending victim
/// order, then quiet moves, with the resolved table move first in its group.
pub fn ordered_moves(board: &Board, table_move: Move) -> Vec<Move> {
    let found = resolve_table_move(board, table_move);
    let mut attacks = Vec::new();
    let mut quiets = Vec::new();
    for &mov in board.current_player().legal_moves() {
        if Some(mov) == found {
            continue;
        }
        if mov.is_attack() {
            attacks.push(mov);
        } else {
            quiets.push(mov);
        }
    }
    attacks.sort_by_key(|mov| Reverse(victim_value(mov)));
    if let Some(found) = found {
        if found.is_attack() {
            attacks.insert(0, found);
        } else {
            quiets.insert(0, found);
        }
    }
    attacks.extend(quiets);
    attacks
}

/// Capture moves only, for the quiescence extension.
pub fn ordered_attack_moves(board: &Board, table_move: Move) -> Vec<Move> {
    let found = resolve_table_move(board, table_move).filter(Move::is_attack);
    let mut attacks: Vec<Move> = board
        .current_player()
        .legal_moves()
        .iter()
        .copied()
        .filter(|mov| mov.is_attack() && Some(*mov) != found)
        .collect();
    attacks.sort_by_key(|mov| Reverse(victim_value(mov)));
    if let Some(found) = found {
        attacks.insert(0, found);
    }
    attacks
}

/// Pawn moves only (captures sorted first), for the side pushing promotion.
pub fn ordered_pawn_moves(board: &Board) -> Vec<Move> {
    let mut attacks = Vec::new();
    let mut quiets = Vec::new();
    for &mov in board.current_player().legal_moves() {
        if mov.moved_piece().kind != PieceKind::Pawn {
            continue;
        }
        if mov.is_attack() {
            attacks.push(mov);
        } else {
            quiets.push(mov);
        }
    }
    attacks.sort_by_key(|mov| Reverse(victim_value(mov)));
    attacks.extend(quiets);
    attacks
}

/// Captures of enemy pawns, for the side holding promotion back.
pub fn attacks_on_pawns(board: &Board) -> Vec<Move> {
    board
        .current_player()
        .legal_moves()
        .iter()
        .copied()
        .filter(|mov| {
            mov.captured_piece()
                .is_some_and(|piece| piece.kind == PieceKind::Pawn)
        })
        .collect()
}
