//! Depth-limited negamax with alpha-beta pruning, a per-call transposition
//! table, and two tactical extensions at the horizon: capture-only
//! (quiescence) lines and pawn-promotion races.

use std::time::{Duration, Instant};

use crate::chess::{Alliance, Board, Move};
use crate::engine::evaluation;
use crate::engine::ordering;
use crate::engine::transposition::{NodeKind, TranspositionTable};

/// Larger than any reachable score and safe to negate.
pub const INFINITY: i32 = i32::MAX;

/// Once a side's piece value score drops this low, promotion decides games
/// and the promotion extension takes over at the horizon.
pub const PROMOTION_MATERIAL_THRESHOLD: i32 = 11_400;

/// True when `hash` has already occurred twice, so reaching it once more
/// completes a threefold repetition. `history` is the full game's position
/// hashes, oldest first.
pub fn completes_repetition(hash: u64, history: &[u64]) -> bool {
    history.iter().filter(|&&seen| seen == hash).count() >= 2
}

fn is_end_game(board: &Board) -> bool {
    let player = board.current_player();
    let has_escape_moves = player.has_escape_moves();
    player.is_in_checkmate(has_escape_moves) || player.is_in_stalemate(has_escape_moves)
}

/// The automated opponent. One instance is not reentrant: the table and the
/// timing log are private to it and reset per call. Independent instances may
/// search concurrently.
pub struct Searcher {
    depth: i32,
    quiescence_depth: i32,
    promotion_depth: i32,
    table: TranspositionTable,
    execution_times: Vec<Duration>,
    initiator: Alliance,
    promotion_mode: bool,
}

impl Searcher {
    /// # Panics
    /// If `depth` is less than 1.
    pub fn new(depth: i32, quiescence_depth: i32, promotion_depth: i32) -> Searcher {
        assert!(depth >= 1, "search depth must be at least 1");
        Searcher {
            depth,
            quiescence_depth: quiescence_depth.max(0),
            promotion_depth: promotion_depth.max(0),
            table: TranspositionTable::new(),
            execution_times: Vec::new(),
            initiator: Alliance::White,
            promotion_mode: false,
        }
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Mean wall-clock time of the completed `choose_move` calls.
    pub fn average_execution_time(&self) -> Duration {
        if self.execution_times.is_empty() {
            return Duration::ZERO;
        }
        self.execution_times.iter().sum::<Duration>() / self.execution_times.len() as u32
    }

    /// Picks a move for the side to move, searching every root candidate
    /// with a full window at the configured depth.
    ///
    /// Candidates whose resulting position would complete a threefold
    /// repetition of `history` are skipped, unless `force_include_repeats`
    /// is set or the side has at most one legal move. If the restriction
    /// eliminated every candidate, the search retries once with it lifted.
    /// `None` means the side has no playable move at all; callers detect
    /// checkmate and stalemate before searching, so reaching that is a
    /// caller error.
    pub fn choose_move(
        &mut self,
        board: &Board,
        history: &[u64],
        force_include_repeats: bool,
    ) -> Option<Move> {
        self.table.clear();
        let start = Instant::now();

        let player = board.current_player();
        self.initiator = player.alliance();
        self.promotion_mode = player.piece_value_score() <= PROMOTION_MATERIAL_THRESHOLD;
        let candidate_count = player.legal_moves().len();

        let mut best: Option<(Move, i32)> = None;
        for &mov in player.legal_moves() {
            let transition = player.make_move(mov);
            if !transition.status.is_done() {
                continue;
            }
            if !force_include_repeats
                && candidate_count > 1
                && completes_repetition(transition.board.hash(), history)
            {
                continue;
            }
            let score = -self.search(&transition.board, self.depth - 1, -INFINITY, INFINITY, mov);
            match best {
                Some((_, best_score)) if score < best_score => {}
                _ => best = Some((mov, score)),
            }
        }

        if best.is_none() {
            if !force_include_repeats {
                return self.choose_move(board, history, true);
            }
            return None;
        }

        self.execution_times.push(start.elapsed());
        best.map(|(mov, _)| mov)
    }

    // evaluation is from White's perspective; negamax wants it relative to
    // the side to move
    fn relative_eval(board: &Board, depth: i32) -> i32 {
        let score = evaluation::evaluate(board, depth);
        match board.to_move() {
            Alliance::White => score,
            Alliance::Black => -score,
        }
    }

    fn table_move(&self, hash: u64, depth: i32) -> Move {
        match self.table.probe(hash) {
            Some(entry) if entry.depth == depth && entry.kind == NodeKind::Beta => entry.best_move,
            _ => Move::Null,
        }
    }

    /// Negamax over the main move list. `prev` is the move that produced
    /// `board`; at the horizon it decides whether a tactical extension runs.
    fn search(&mut self, board: &Board, depth: i32, mut alpha: i32, beta: i32, prev: Move) -> i32 {
        let finished = is_end_game(board);
        if depth <= 0 || finished {
            if !finished {
                if self.promotion_mode && !board.player(self.initiator).has_promoted() {
                    return self.promotion_search(board, depth - 1, alpha, beta);
                }
                if prev.is_attack() {
                    return self.quiescence(board, depth - 1, alpha, beta);
                }
            }
            return Self::relative_eval(board, depth);
        }

        let hash = board.hash();
        debug_assert_eq!(hash, board.compute_hash());

        if let Some(entry) = self.table.probe(hash)
            && entry.depth == depth
            && entry.kind == NodeKind::Exact
        {
            self.table.mark_keep(hash);
            return entry.score;
        }

        let original_alpha = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = Move::Null;
        for mov in ordering::ordered_moves(board, self.table_move(hash, depth)) {
            let transition = board.current_player().make_move(mov);
            if !transition.status.is_done() {
                continue;
            }
            let score = -self.search(&transition.board, depth - 1, -beta, -alpha, mov);
            if score > best_score {
                best_score = score;
                best_move = mov;
            }
            alpha = alpha.max(best_score);
            if alpha >= beta {
                self.table
                    .record(hash, best_score, depth, NodeKind::Beta, best_move);
                return best_score;
            }
        }

        // the end-game check above guarantees at least one playable move
        debug_assert!(!best_move.is_null());

        let kind = if best_score < original_alpha {
            NodeKind::Alpha
        } else {
            NodeKind::Exact
        };
        self.table.record(hash, best_score, depth, kind, best_move);
        best_score
    }

    /// Capture-only continuation past the horizon, avoiding the worst of the
    /// horizon effect mid-exchange. Depth runs negative here, down to the
    /// quiescence bound.
    fn quiescence(&mut self, board: &Board, depth: i32, mut alpha: i32, beta: i32) -> i32 {
        let hash = board.hash();
        let moves = ordering::ordered_attack_moves(board, self.table_move(hash, depth));
        if depth <= -self.quiescence_depth || moves.is_empty() || is_end_game(board) {
            return Self::relative_eval(board, depth);
        }

        if let Some(entry) = self.table.probe(hash)
            && entry.depth == depth
            && entry.kind == NodeKind::Exact
        {
            self.table.mark_keep(hash);
            return entry.score;
        }

        let original_alpha = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = Move::Null;
        for mov in moves {
            let transition = board.current_player().make_move(mov);
            if !transition.status.is_done() {
                continue;
            }
            let score = -self.quiescence(&transition.board, depth - 1, -beta, -alpha);
            if score > best_score {
                best_score = score;
                best_move = mov;
            }
            alpha = alpha.max(best_score);
            if alpha >= beta {
                self.table
                    .record(hash, best_score, depth, NodeKind::Beta, best_move);
                return best_score;
            }
        }

        if best_move.is_null() {
            // every capture was illegal; score the stand-still position
            return Self::relative_eval(board, depth);
        }

        let kind = if best_score < original_alpha {
            NodeKind::Alpha
        } else {
            NodeKind::Exact
        };
        self.table.record(hash, best_score, depth, kind, best_move);
        best_score
    }

    /// Pawn-race continuation past the horizon once material is thin: the
    /// initiating side pushes its pawns forward, the opponent hunts them.
    /// Ends at the depth bound, game end, or the initiator's promotion.
    fn promotion_search(&mut self, board: &Board, depth: i32, mut alpha: i32, beta: i32) -> i32 {
        let moves = if board.to_move() == self.initiator {
            ordering::ordered_pawn_moves(board)
        } else {
            ordering::attacks_on_pawns(board)
        };
        if depth <= -self.promotion_depth
            || moves.is_empty()
            || board.player(self.initiator).has_promoted()
            || is_end_game(board)
        {
            return Self::relative_eval(board, depth);
        }

        let hash = board.hash();
        if let Some(entry) = self.table.probe(hash)
            && entry.depth == depth
            && entry.kind == NodeKind::Exact
        {
            self.table.mark_keep(hash);
            return entry.score;
        }

        let original_alpha = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = Move::Null;
        for mov in moves {
            let transition = board.current_player().make_move(mov);
            if !transition.status.is_done() {
                continue;
            }
            let score = -self.promotion_search(&transition.board, depth - 1, -beta, -alpha);
            if score > best_score {
                best_score = score;
                best_move = mov;
            }
            alpha = alpha.max(best_score);
            if alpha >= beta {
                self.table
                    .record(hash, best_score, depth, NodeKind::Beta, best_move);
                return best_score;
            }
        }

        if best_move.is_null() {
            return Self::relative_eval(board, depth);
        }

        let kind = if best_score < original_alpha {
            NodeKind::Alpha
        } else {
            NodeKind::Exact
        };
        self.table.record(hash, best_score, depth, kind, best_move);
        best_score
    }
}
