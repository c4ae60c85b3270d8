//! Move selection for the automated side.
//!
//! Three strengths are available: a uniformly random legal move, a one-ply
//! material grab, and an alpha-beta search over material plus piece-square
//! tables. Ties between equally scored moves are broken randomly so that
//! repeated games do not replay the same line.

use crate::movegen::{generate_moves, is_king_attacked, make_move, Move};
use crate::Position;
use chess_core::{CellId, Color, Piece};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Piece values in centipawns.
const PAWN_VALUE: i32 = 100;
const KNIGHT_VALUE: i32 = 320;
const BISHOP_VALUE: i32 = 330;
const ROOK_VALUE: i32 = 500;
const QUEEN_VALUE: i32 = 900;

const MATE_SCORE: i32 = 100_000;

/// Pawn placement bonus from White's side, A1 first.
const PAWN_PST: [i32; 64] = [
    0, 0, 0, 0, 0, 0, 0, 0, 5, 10, 10, -20, -20, 10, 10, 5, 5, -5, -10, 0, 0, -10, -5, 5, 0, 0, 0,
    20, 20, 0, 0, 0, 5, 5, 10, 25, 25, 10, 5, 5, 10, 10, 20, 30, 30, 20, 10, 10, 50, 50, 50, 50,
    50, 50, 50, 50, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Minor piece centralisation bonus from White's side, A1 first.
const MINOR_PST: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50, -40, -20, 0, 5, 5, 0, -20, -40, -30, 5, 10, 15, 15,
    10, 5, -30, -30, 0, 15, 20, 20, 15, 0, -30, -30, 5, 15, 20, 20, 15, 5, -30, -30, 0, 10, 15, 15,
    10, 0, -30, -40, -20, 0, 0, 0, 0, -20, -40, -50, -40, -30, -30, -30, -30, -40, -50,
];

/// How hard the automated side thinks.
///
/// Serialized in its text form (`"greedy"`, `"minimax:3"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum AiLevel {
    /// Any legal move.
    Random,
    /// Best material outcome one ply deep.
    Greedy,
    /// Alpha-beta search to the given depth in plies.
    Minimax(u8),
}

impl Default for AiLevel {
    fn default() -> Self {
        AiLevel::Minimax(2)
    }
}

impl fmt::Display for AiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiLevel::Random => write!(f, "random"),
            AiLevel::Greedy => write!(f, "greedy"),
            AiLevel::Minimax(depth) => write!(f, "minimax:{}", depth),
        }
    }
}

/// Why an AI level string was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AiLevelError {
    #[error("minimax depth must be 1-6, got '{0}'")]
    Depth(String),

    #[error("unknown AI level '{0}', expected random, greedy, minimax or minimax:N")]
    Unknown(String),
}

impl FromStr for AiLevel {
    type Err = AiLevelError;

    /// Accepts `random`, `greedy`, `minimax`, or `minimax:<depth>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.split_once(':') {
            None if s == "random" => Ok(AiLevel::Random),
            None if s == "greedy" => Ok(AiLevel::Greedy),
            None if s == "minimax" => Ok(AiLevel::default()),
            Some(("minimax", depth)) => match depth.parse::<u8>() {
                Ok(d) if (1..=6).contains(&d) => Ok(AiLevel::Minimax(d)),
                _ => Err(AiLevelError::Depth(depth.to_string())),
            },
            _ => Err(AiLevelError::Unknown(s.to_string())),
        }
    }
}

impl TryFrom<String> for AiLevel {
    type Error = AiLevelError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AiLevel> for String {
    fn from(level: AiLevel) -> Self {
        level.to_string()
    }
}

/// Picks a move for the side to move, or `None` if it has no legal move.
pub fn choose_move<R: Rng + ?Sized>(
    position: &Position,
    level: AiLevel,
    rng: &mut R,
) -> Option<Move> {
    let moves = generate_moves(position);
    if moves.is_empty() {
        return None;
    }

    let depth = match level {
        AiLevel::Random => return moves.choose(rng).copied(),
        AiLevel::Greedy => 1,
        AiLevel::Minimax(depth) => depth.max(1),
    };

    let scored: Vec<(Move, i32)> = moves
        .iter()
        .map(|m| {
            let next = make_move(position, *m);
            let score = -negamax(&next, depth - 1, 1, -MATE_SCORE - 1, MATE_SCORE + 1);
            (*m, score)
        })
        .collect();

    let best = scored.iter().map(|(_, s)| *s).max()?;
    let candidates: Vec<Move> = scored
        .into_iter()
        .filter(|(_, s)| *s == best)
        .map(|(m, _)| m)
        .collect();
    candidates.choose(rng).copied()
}

fn negamax(position: &Position, depth: u8, ply: i32, mut alpha: i32, beta: i32) -> i32 {
    let moves = generate_moves(position);
    if moves.is_empty() {
        return if is_king_attacked(position, position.side_to_move) {
            -MATE_SCORE + ply
        } else {
            0
        };
    }
    if depth == 0 {
        return evaluate(position);
    }

    let mut best = -MATE_SCORE - 1;
    for m in moves {
        let score = -negamax(&make_move(position, m), depth - 1, ply + 1, -beta, -alpha);
        best = best.max(score);
        alpha = alpha.max(score);
        if alpha >= beta {
            break;
        }
    }
    best
}

/// Evaluates the position from the side to move's perspective.
pub fn evaluate(position: &Position) -> i32 {
    let white: i32 = position
        .pieces()
        .map(|(cell, code)| {
            let sign = if code.color == Color::White { 1 } else { -1 };
            sign * piece_score(code.piece, code.color, cell)
        })
        .sum();
    match position.side_to_move {
        Color::White => white,
        Color::Black => -white,
    }
}

fn piece_score(piece: Piece, color: Color, cell: CellId) -> i32 {
    // Mirror ranks for Black so tables read from each side's own point of view.
    let idx = match color {
        Color::White => cell.index() as usize,
        Color::Black => (cell.index() ^ 56) as usize,
    };
    match piece {
        Piece::Pawn => PAWN_VALUE + PAWN_PST[idx],
        Piece::Knight => KNIGHT_VALUE + MINOR_PST[idx],
        Piece::Bishop => BISHOP_VALUE + MINOR_PST[idx] / 2,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cell(s: &str) -> CellId {
        s.parse().unwrap()
    }

    #[test]
    fn parse_levels() {
        assert_eq!("random".parse::<AiLevel>(), Ok(AiLevel::Random));
        assert_eq!("Greedy".parse::<AiLevel>(), Ok(AiLevel::Greedy));
        assert_eq!("minimax".parse::<AiLevel>(), Ok(AiLevel::Minimax(2)));
        assert_eq!("minimax:3".parse::<AiLevel>(), Ok(AiLevel::Minimax(3)));
        assert_eq!(
            "minimax:0".parse::<AiLevel>(),
            Err(AiLevelError::Depth("0".into()))
        );
        assert_eq!(
            "Genius".parse::<AiLevel>(),
            Err(AiLevelError::Unknown("genius".into()))
        );
        assert_eq!(AiLevel::Minimax(4).to_string(), "minimax:4");
    }

    #[test]
    fn serde_uses_text_form() {
        let json = serde_json::to_string(&AiLevel::Minimax(3)).unwrap();
        assert_eq!(json, "\"minimax:3\"");
        let level: AiLevel = serde_json::from_str("\"greedy\"").unwrap();
        assert_eq!(level, AiLevel::Greedy);
        assert!(serde_json::from_str::<AiLevel>("\"minimax:9\"").is_err());
    }

    #[test]
    fn startpos_is_balanced() {
        assert_eq!(evaluate(&Position::startpos()), 0);
    }

    #[test]
    fn random_move_is_legal() {
        let pos = Position::startpos();
        let mut rng = StdRng::seed_from_u64(1);
        let m = choose_move(&pos, AiLevel::Random, &mut rng).unwrap();
        assert!(generate_moves(&pos).contains(&m));
    }

    #[test]
    fn greedy_takes_hanging_queen() {
        let pos = Position::from_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let m = choose_move(&pos, AiLevel::Greedy, &mut rng).unwrap();
        assert_eq!((m.from, m.to), (cell("D1"), cell("D5")));
    }

    #[test]
    fn minimax_finds_mate_in_one() {
        // Back-rank mate: Ra1-a8.
        let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let m = choose_move(&pos, AiLevel::Minimax(2), &mut rng).unwrap();
        assert_eq!((m.from, m.to), (cell("A1"), cell("A8")));
    }

    #[test]
    fn no_move_when_mated() {
        let pos =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(choose_move(&pos, AiLevel::Minimax(2), &mut rng), None);
    }
}
