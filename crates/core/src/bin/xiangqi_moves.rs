//! Prints a position and the moves available to the side to move
//!
//! Usage: xiangqi_moves ["<fen> <side>"] [x,y:x,y ...]

use xiangqi_core::movegen::moves_for_side;
use xiangqi_core::{analyze_position, Coordinate, GameSession, MoveOutcome};

fn parse_square(text: &str) -> Option<Coordinate> {
    let (x, y) = text.split_once(',')?;
    Coordinate::from_signed(x.trim().parse().ok()?, y.trim().parse().ok()?)
}

fn parse_move(text: &str) -> Option<(Coordinate, Coordinate)> {
    let (from, to) = text.split_once(':')?;
    Some((parse_square(from)?, parse_square(to)?))
}

fn main() {
    let mut args = std::env::args().skip(1).peekable();

    let mut session = match args.peek() {
        Some(first) if parse_move(first).is_none() => {
            let fen = args.next().unwrap_or_default();
            match GameSession::from_fen(&fen) {
                Ok(session) => session,
                Err(e) => {
                    eprintln!("Invalid position: {}", e);
                    std::process::exit(1);
                }
            }
        }
        _ => GameSession::new(),
    };

    for arg in args {
        let Some((from, to)) = parse_move(&arg) else {
            eprintln!("Cannot read move '{}', expected x,y:x,y", arg);
            std::process::exit(1);
        };
        match session.play(from, to) {
            MoveOutcome::Moved(record) => println!("{} -> {}", record.piece, record.to),
            MoveOutcome::GameOver(_) => {
                println!("{}", session.game_over_message().unwrap_or_default());
            }
            MoveOutcome::Rejected(reason) => {
                eprintln!("Move {} -> {} rejected: {}", from, to, reason.as_str());
                std::process::exit(1);
            }
        }
    }

    println!("{}\n", session.board());
    println!("FEN: {}", session.snapshot().fen);

    let info = analyze_position(&session);
    println!(
        "{} to move, {} pieces, {} moves",
        info.side_to_move, info.piece_count, info.legal_move_count
    );
    if info.is_game_over {
        return;
    }

    for entry in moves_for_side(session.board(), info.side_to_move, session.rules()) {
        let targets: Vec<String> = entry.targets.iter().map(|t| t.to_string()).collect();
        println!("  {:<24} {}", entry.piece.to_string(), targets.join(" "));
    }
}
