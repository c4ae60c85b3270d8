//! Legal move generation over the mailbox board.
//!
//! Pseudo-legal moves are produced per piece by walking cell offsets, then
//! filtered by playing each one and rejecting those that leave the mover's
//! king attacked.

use crate::Position;
use chess_core::{CellId, Color, Piece, PieceCode, Rank};

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_STEPS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const ROOK_RAYS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const BISHOP_RAYS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Special handling a move needs when it is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    /// Pawn double push; sets the en passant cell.
    DoublePush,
    EnPassant,
    CastleKingside,
    CastleQueenside,
    /// Pawn reaching the last rank.
    Promotion(Piece),
}

/// A move from one cell to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: CellId,
    pub to: CellId,
    pub kind: MoveKind,
}

impl Move {
    #[inline]
    pub const fn new(from: CellId, to: CellId, kind: MoveKind) -> Self {
        Move { from, to, kind }
    }

    #[inline]
    pub const fn normal(from: CellId, to: CellId) -> Self {
        Move::new(from, to, MoveKind::Normal)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Generates all legal moves for the side to move.
///
/// Promotions are generated to a queen only: callers address moves by
/// origin and destination, so there is no way to pick an under-promotion.
pub fn generate_moves(position: &Position) -> Vec<Move> {
    let us = position.side_to_move;
    let mut moves = Vec::with_capacity(48);

    for (from, code) in position.pieces().filter(|(_, code)| code.color == us) {
        match code.piece {
            Piece::Pawn => pawn_moves(position, from, us, &mut moves),
            Piece::Knight => step_moves(position, from, us, &KNIGHT_STEPS, &mut moves),
            Piece::Bishop => ray_moves(position, from, us, &BISHOP_RAYS, &mut moves),
            Piece::Rook => ray_moves(position, from, us, &ROOK_RAYS, &mut moves),
            Piece::Queen => {
                ray_moves(position, from, us, &ROOK_RAYS, &mut moves);
                ray_moves(position, from, us, &BISHOP_RAYS, &mut moves);
            }
            Piece::King => {
                step_moves(position, from, us, &KING_STEPS, &mut moves);
                castling_moves(position, from, us, &mut moves);
            }
        }
    }

    moves.retain(|m| {
        let next = make_move(position, *m);
        !is_king_attacked(&next, us)
    });

    moves
}

fn pawn_moves(position: &Position, from: CellId, us: Color, moves: &mut Vec<Move>) {
    let dir = us.pawn_direction();
    let (start_rank, promo_rank) = match us {
        Color::White => (Rank::R2, Rank::R8),
        Color::Black => (Rank::R7, Rank::R1),
    };
    let push = |to: CellId, moves: &mut Vec<Move>| {
        if to.rank() == promo_rank {
            moves.push(Move::new(from, to, MoveKind::Promotion(Piece::Queen)));
        } else {
            moves.push(Move::normal(from, to));
        }
    };

    if let Some(one) = from.offset(0, dir) {
        if position.piece_at(one).is_none() {
            push(one, moves);
            if from.rank() == start_rank {
                if let Some(two) = from.offset(0, 2 * dir) {
                    if position.piece_at(two).is_none() {
                        moves.push(Move::new(from, two, MoveKind::DoublePush));
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        let Some(to) = from.offset(df, dir) else {
            continue;
        };
        match position.piece_at(to) {
            Some(target) if target.color != us => push(to, moves),
            None if position.en_passant == Some(to) => {
                moves.push(Move::new(from, to, MoveKind::EnPassant));
            }
            _ => {}
        }
    }
}

fn step_moves(
    position: &Position,
    from: CellId,
    us: Color,
    steps: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(df, dr) in steps {
        if let Some(to) = from.offset(df, dr) {
            if position.piece_at(to).map_or(true, |p| p.color != us) {
                moves.push(Move::normal(from, to));
            }
        }
    }
}

fn ray_moves(
    position: &Position,
    from: CellId,
    us: Color,
    rays: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(df, dr) in rays {
        let mut cursor = from;
        while let Some(to) = cursor.offset(df, dr) {
            match position.piece_at(to) {
                None => moves.push(Move::normal(from, to)),
                Some(p) => {
                    if p.color != us {
                        moves.push(Move::normal(from, to));
                    }
                    break;
                }
            }
            cursor = to;
        }
    }
}

fn castling_moves(position: &Position, from: CellId, us: Color, moves: &mut Vec<Move>) {
    let (king_home, rank) = match us {
        Color::White => (CellId::E1, 0i8),
        Color::Black => (CellId::E8, 7i8),
    };
    if from != king_home || is_attacked(position, from, us.opposite()) {
        return;
    }
    let them = us.opposite();
    let cell = |file: i8| CellId::A1.offset(file, rank);
    let empty = |file: i8| cell(file).is_some_and(|c| position.piece_at(c).is_none());
    let safe = |file: i8| cell(file).is_some_and(|c| !is_attacked(position, c, them));
    let rook_home = |file: i8| {
        cell(file).and_then(|c| position.piece_at(c)) == Some(PieceCode::new(Piece::Rook, us))
    };

    if position.castling.can_castle_kingside(us)
        && rook_home(7)
        && empty(5)
        && empty(6)
        && safe(5)
        && safe(6)
    {
        if let Some(to) = cell(6) {
            moves.push(Move::new(from, to, MoveKind::CastleKingside));
        }
    }

    if position.castling.can_castle_queenside(us)
        && rook_home(0)
        && empty(1)
        && empty(2)
        && empty(3)
        && safe(2)
        && safe(3)
    {
        if let Some(to) = cell(2) {
            moves.push(Move::new(from, to, MoveKind::CastleQueenside));
        }
    }
}

/// Returns true if any piece of `by` attacks `cell`.
pub fn is_attacked(position: &Position, cell: CellId, by: Color) -> bool {
    let holds = |target: Option<CellId>, pieces: &[Piece]| {
        target
            .and_then(|c| position.piece_at(c))
            .is_some_and(|p| p.color == by && pieces.contains(&p.piece))
    };

    // A pawn of `by` attacks diagonally forward, so look one rank back from `cell`.
    let back = -by.pawn_direction();
    if holds(cell.offset(-1, back), &[Piece::Pawn]) || holds(cell.offset(1, back), &[Piece::Pawn])
    {
        return true;
    }

    if KNIGHT_STEPS
        .iter()
        .any(|&(df, dr)| holds(cell.offset(df, dr), &[Piece::Knight]))
    {
        return true;
    }

    if KING_STEPS
        .iter()
        .any(|&(df, dr)| holds(cell.offset(df, dr), &[Piece::King]))
    {
        return true;
    }

    let ray_hits = |rays: &[(i8, i8)], pieces: &[Piece]| {
        rays.iter().any(|&(df, dr)| {
            let mut cursor = cell;
            while let Some(next) = cursor.offset(df, dr) {
                if position.piece_at(next).is_some() {
                    return holds(Some(next), pieces);
                }
                cursor = next;
            }
            false
        })
    };

    ray_hits(&ROOK_RAYS, &[Piece::Rook, Piece::Queen])
        || ray_hits(&BISHOP_RAYS, &[Piece::Bishop, Piece::Queen])
}

/// Returns true if the given side's king is attacked.
pub fn is_king_attacked(position: &Position, color: Color) -> bool {
    position
        .king(color)
        .is_some_and(|king| is_attacked(position, king, color.opposite()))
}

/// Plays a move, returning the new position. The move is assumed pseudo-legal.
pub fn make_move(position: &Position, m: Move) -> Position {
    let mut next = position.clone();
    let us = position.side_to_move;
    let Some(mover) = position.piece_at(m.from) else {
        return next;
    };
    let captured = position.piece_at(m.to);

    next.set(m.from, None);
    next.set(m.to, Some(mover));
    next.en_passant = None;

    match m.kind {
        MoveKind::Normal => {}
        MoveKind::DoublePush => {
            next.en_passant = m.from.offset(0, us.pawn_direction());
        }
        MoveKind::EnPassant => {
            if let Some(victim) = m.to.offset(0, -us.pawn_direction()) {
                next.set(victim, None);
            }
        }
        MoveKind::CastleKingside | MoveKind::CastleQueenside => {
            let (rook_from, rook_to) = if m.kind == MoveKind::CastleKingside {
                (m.from.offset(3, 0), m.from.offset(1, 0))
            } else {
                (m.from.offset(-4, 0), m.from.offset(-1, 0))
            };
            if let (Some(rook_from), Some(rook_to)) = (rook_from, rook_to) {
                let rook = next.piece_at(rook_from);
                next.set(rook_from, None);
                next.set(rook_to, rook);
            }
        }
        MoveKind::Promotion(piece) => {
            next.set(m.to, Some(PieceCode::new(piece, us)));
        }
    }

    if mover.piece == Piece::King {
        next.castling.remove_color(us);
    }
    next.castling.touch(m.from);
    next.castling.touch(m.to);

    if mover.piece == Piece::Pawn || captured.is_some() || m.kind == MoveKind::EnPassant {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock += 1;
    }
    if us == Color::Black {
        next.fullmove_number += 1;
    }
    next.side_to_move = us.opposite();

    next
}

/// Counts leaf nodes of the legal move tree to the given depth.
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|m| perft(&make_move(position, *m), depth - 1))
        .sum()
}
