use std::env;
use std::process;
use std::time::Instant;

use sable::chess::Board;
use sable::engine::search::{Searcher, completes_repetition};
use sable::notation;

macro_rules! send {
    ($($arg:tt)*) => {{
        use std::io::{self, Write};
        println!($($arg)*);
        io::stdout().flush().unwrap();
    }};
}

const DEFAULT_DEPTH: i32 = 4;
const PROMOTION_SEARCH_DEPTH: i32 = 12;
const MAX_PLIES: usize = 240;

/// Console self-play: `sable [depth] [snapshot]`. With no snapshot the game
/// starts from the initial position.
fn main() {
    let mut rest: Vec<String> = env::args().skip(1).collect();
    let mut depth = DEFAULT_DEPTH;
    if let Some(parsed) = rest.first().and_then(|arg| arg.parse::<i32>().ok()) {
        if parsed < 1 {
            eprintln!("depth must be at least 1");
            process::exit(2);
        }
        depth = parsed;
        rest.remove(0);
    }

    let board = if rest.is_empty() {
        Board::initial()
    } else {
        match notation::decode_snapshot(&rest.join(" ")) {
            Ok(board) => board,
            Err(err) => {
                eprintln!("bad snapshot: {err}");
                process::exit(2);
            }
        }
    };

    run(board, depth);
}

fn run(mut board: Board, depth: i32) {
    let mut searcher = Searcher::new(depth, depth, PROMOTION_SEARCH_DEPTH);
    let mut history = vec![board.hash()];

    send!("{}", notation::encode_snapshot(&board));

    for ply in 1..=MAX_PLIES {
        let player = board.current_player();
        let has_escape_moves = player.has_escape_moves();
        if player.is_in_checkmate(has_escape_moves) {
            send!("checkmate: {:?} wins", player.alliance().opposite());
            break;
        }
        if player.is_in_stalemate(has_escape_moves) {
            send!("stalemate");
            break;
        }
        if player.has_insufficient_material() && player.opponent().has_insufficient_material() {
            send!("draw by insufficient material");
            break;
        }

        let thinking = Instant::now();
        let Some(mov) = searcher.choose_move(&board, &history, false) else {
            send!("no playable move for {:?}", player.alliance());
            break;
        };
        let elapsed = thinking.elapsed();

        let transition = board.current_player().make_move(mov);
        debug_assert!(transition.status.is_done());
        board = transition.board;

        send!(
            "{ply:3}. {}  {}  ({elapsed:.2?})",
            notation::encode_move(&mov),
            board,
        );

        if completes_repetition(board.hash(), &history) {
            send!("draw by threefold repetition");
            break;
        }
        history.push(board.hash());
    }

    send!(
        "average search time: {:.2?}",
        searcher.average_execution_time()
    );
}
