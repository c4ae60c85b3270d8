//! FEN records.
//!
//! Engines start from arbitrary positions through FEN; the controller never
//! sees it. The halfmove and fullmove counters may be omitted, in which case
//! they default to `0 1`.

use crate::{CellId, Color, Coordinate, File, PieceCode, Rank};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The standard starting position.
pub const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 4 or 6 fields, got {0}")]
    FieldCount(usize),

    #[error("expected 8 ranks, got {0}")]
    RankCount(usize),

    #[error("rank {rank}: {reason}")]
    Rank { rank: char, reason: String },

    #[error("side to move must be 'w' or 'b', got '{0}'")]
    SideToMove(String),

    #[error("unknown castling flag '{0}'")]
    Castling(char),

    #[error("en passant target '{0}' is not a cell on rank 3 or 6")]
    EnPassant(String),

    #[error("{field} must be a non-negative integer, got '{value}'")]
    Counter { field: &'static str, value: String },
}

/// The six fields of a FEN string, with placement resolved per cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenRecord {
    /// Piece per cell, indexed by [`CellId::index`].
    pub placement: [Option<PieceCode>; 64],
    pub side_to_move: Color,
    /// Castling flags as written, `"-"` for none.
    pub castling: String,
    pub en_passant: Option<CellId>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenRecord {
    pub fn startpos() -> Self {
        STARTPOS.parse().expect("starting position is well formed")
    }

    pub fn piece_at(&self, cell: CellId) -> Option<PieceCode> {
        self.placement[cell.index() as usize]
    }

    pub fn to_fen(&self) -> String {
        self.to_string()
    }
}

impl FromStr for FenRecord {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let (halfmove, fullmove) = match fields.len() {
            4 => ("0", "1"),
            6 => (fields[4], fields[5]),
            n => return Err(FenError::FieldCount(n)),
        };

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        let castling = fields[2];
        if castling != "-" {
            if let Some(bad) = castling.chars().find(|c| !matches!(c, 'K' | 'Q' | 'k' | 'q')) {
                return Err(FenError::Castling(bad));
            }
        }

        Ok(FenRecord {
            placement: placement(fields[0])?,
            side_to_move,
            castling: castling.to_string(),
            en_passant: en_passant(fields[3])?,
            halfmove_clock: counter("halfmove clock", halfmove)?,
            fullmove_number: counter("fullmove number", fullmove)?,
        })
    }
}

fn placement(field: &str) -> Result<[Option<PieceCode>; 64], FenError> {
    let rows: Vec<&str> = field.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::RankCount(rows.len()));
    }

    let mut cells = [None; 64];
    // Rows run from rank 8 down to rank 1.
    for (row, rank) in rows.iter().zip(Rank::ALL.iter().rev()) {
        let bad = |reason: String| FenError::Rank {
            rank: rank.to_char(),
            reason,
        };
        let mut file = 0u8;
        for c in row.chars() {
            if let Some(run) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file = file.saturating_add(run as u8);
                continue;
            }
            let code = PieceCode::from_fen_char(c)
                .ok_or_else(|| bad(format!("unexpected '{}'", c)))?;
            let f = File::from_index(file).ok_or_else(|| bad("more than 8 cells".into()))?;
            cells[Coordinate::new(f, *rank).to_id().index() as usize] = Some(code);
            file += 1;
        }
        if file != 8 {
            return Err(bad(format!("{} cells, expected 8", file)));
        }
    }
    Ok(cells)
}

fn en_passant(field: &str) -> Result<Option<CellId>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    match field.parse::<CellId>() {
        Ok(cell) if matches!(cell.rank(), Rank::R3 | Rank::R6) => Ok(Some(cell)),
        _ => Err(FenError::EnPassant(field.to_string())),
    }
}

fn counter(field: &'static str, value: &str) -> Result<u32, FenError> {
    value.parse().map_err(|_| FenError::Counter {
        field,
        value: value.to_string(),
    })
}

impl fmt::Display for FenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rank) in Rank::ALL.iter().rev().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            let mut gap = 0;
            for file in File::ALL {
                match self.piece_at(Coordinate::new(file, *rank).to_id()) {
                    Some(code) => {
                        if gap > 0 {
                            write!(f, "{}", gap)?;
                            gap = 0;
                        }
                        write!(f, "{}", code.to_fen_char())?;
                    }
                    None => gap += 1,
                }
            }
            if gap > 0 {
                write!(f, "{}", gap)?;
            }
        }

        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        write!(f, " {} {} ", side, self.castling)?;
        match self.en_passant {
            Some(cell) => write!(f, "{}", cell.to_string().to_ascii_lowercase())?,
            None => f.write_str("-")?,
        }
        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Piece;

    fn parse(fen: &str) -> Result<FenRecord, FenError> {
        fen.parse()
    }

    #[test]
    fn startpos() {
        let record = FenRecord::startpos();
        assert_eq!(record.side_to_move, Color::White);
        assert_eq!(record.castling, "KQkq");
        assert_eq!(record.en_passant, None);
        assert_eq!((record.halfmove_clock, record.fullmove_number), (0, 1));
        assert_eq!(
            record.piece_at(CellId::E1),
            Some(PieceCode::new(Piece::King, Color::White))
        );
        assert_eq!(
            record.piece_at(CellId::G8),
            Some(PieceCode::new(Piece::Knight, Color::Black))
        );
        assert_eq!(record.placement.iter().flatten().count(), 32);
        assert_eq!(record.to_fen(), STARTPOS);
    }

    #[test]
    fn writes_back_what_it_read() {
        let fen = "r3k2r/8/8/3pP3/8/8/8/R3K2R w Kq d6 0 12";
        let record = parse(fen).unwrap();
        assert_eq!(record.en_passant, Some("D6".parse().unwrap()));
        assert_eq!(record.to_fen(), fen);
    }

    #[test]
    fn counters_are_optional() {
        let record = parse("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
        assert_eq!(record.side_to_move, Color::Black);
        assert_eq!(record.to_fen(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn rejects_malformed_fields() {
        assert_eq!(parse("nonsense"), Err(FenError::FieldCount(1)));
        assert_eq!(
            parse("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::RankCount(7))
        );
        assert_eq!(
            parse("8/8/8/8/8/8/8/8 x - - 0 1"),
            Err(FenError::SideToMove("x".into()))
        );
        assert_eq!(
            parse("8/8/8/8/8/8/8/8 w KX - 0 1"),
            Err(FenError::Castling('X'))
        );
        assert_eq!(
            parse("8/8/8/8/8/8/8/8 w - e4 0 1"),
            Err(FenError::EnPassant("e4".into()))
        );
        assert!(matches!(
            parse("8/8/8/8/8/8/8/8 w - - 0 x"),
            Err(FenError::Counter {
                field: "fullmove number",
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_ranks() {
        for (fen, rank) in [
            ("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1", '2'),
            ("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", '8'),
            ("8/8/8/8/8/8/8/7 w - - 0 1", '1'),
            ("8/8/8/9/8/8/8/8 w - - 0 1", '5'),
        ] {
            match parse(fen) {
                Err(FenError::Rank { rank: r, .. }) => assert_eq!(r, rank, "{}", fen),
                other => panic!("{}: unexpected {:?}", fen, other),
            }
        }
    }
}
