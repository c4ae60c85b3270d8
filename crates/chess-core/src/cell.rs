//! Cell addressing.
//!
//! A [`Coordinate`] is a (file, rank) pair; a [`CellId`] is the stable key
//! derived from it. The two convert into each other without loss over the
//! 64 cells of the board.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A file (column) on the board, from A to H.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    /// All files in order.
    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    /// Creates a file from index (0-7).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(File::A),
            1 => Some(File::B),
            2 => Some(File::C),
            3 => Some(File::D),
            4 => Some(File::E),
            5 => Some(File::F),
            6 => Some(File::G),
            7 => Some(File::H),
            _ => None,
        }
    }

    /// Creates a file from a letter, either case.
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(File::A),
            'B' => Some(File::B),
            'C' => Some(File::C),
            'D' => Some(File::D),
            'E' => Some(File::E),
            'F' => Some(File::F),
            'G' => Some(File::G),
            'H' => Some(File::H),
            _ => None,
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Returns the upper-case label used in cell ids.
    #[inline]
    pub const fn to_char(self) -> char {
        (b'A' + self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A rank (row) on the board, from 1 to 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Rank {
    R1 = 0,
    R2 = 1,
    R3 = 2,
    R4 = 3,
    R5 = 4,
    R6 = 5,
    R7 = 6,
    R8 = 7,
}

impl Rank {
    /// All ranks in order, rank 1 first.
    pub const ALL: [Rank; 8] = [
        Rank::R1,
        Rank::R2,
        Rank::R3,
        Rank::R4,
        Rank::R5,
        Rank::R6,
        Rank::R7,
        Rank::R8,
    ];

    /// Creates a rank from index (0-7).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Rank::R1),
            1 => Some(Rank::R2),
            2 => Some(Rank::R3),
            3 => Some(Rank::R4),
            4 => Some(Rank::R5),
            5 => Some(Rank::R6),
            6 => Some(Rank::R7),
            7 => Some(Rank::R8),
            _ => None,
        }
    }

    /// Creates a rank from a character ('1'-'8').
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '1' => Some(Rank::R1),
            '2' => Some(Rank::R2),
            '3' => Some(Rank::R3),
            '4' => Some(Rank::R4),
            '5' => Some(Rank::R5),
            '6' => Some(Rank::R6),
            '7' => Some(Rank::R7),
            '8' => Some(Rank::R8),
            _ => None,
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn to_char(self) -> char {
        (b'1' + self as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A (file, rank) pair. Always within the 8x8 domain by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub file: File,
    pub rank: Rank,
}

impl Coordinate {
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Coordinate { file, rank }
    }

    /// Returns the cell id for this coordinate.
    #[inline]
    pub const fn to_id(self) -> CellId {
        CellId(self.rank.index() * 8 + self.file.index())
    }
}

impl From<CellId> for Coordinate {
    fn from(id: CellId) -> Self {
        id.coordinate()
    }
}

impl From<Coordinate> for CellId {
    fn from(coord: Coordinate) -> Self {
        coord.to_id()
    }
}

/// Errors from parsing a cell label such as `"E4"`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CellParseError {
    #[error("cell label must be two characters, got {0:?}")]
    Length(String),

    #[error("invalid file in cell label {0:?}")]
    File(String),

    #[error("invalid rank in cell label {0:?}")]
    Rank(String),
}

/// Opaque handle of one of the 64 cells.
///
/// Cells are indexed little-endian rank-file: A1 = 0, B1 = 1, ..., H8 = 63.
/// The textual form is the upper-case file followed by the rank (`"E4"`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CellId(u8);

impl CellId {
    /// Creates a cell id from index (0-63).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(CellId(index))
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn file(self) -> File {
        match File::from_index(self.0 % 8) {
            Some(f) => f,
            None => unreachable!(),
        }
    }

    #[inline]
    pub const fn rank(self) -> Rank {
        match Rank::from_index(self.0 / 8) {
            Some(r) => r,
            None => unreachable!(),
        }
    }

    /// Returns the coordinate this id was derived from.
    #[inline]
    pub const fn coordinate(self) -> Coordinate {
        Coordinate::new(self.file(), self.rank())
    }

    /// Returns the cell `df` files and `dr` ranks away, if it is on the board.
    #[inline]
    pub const fn offset(self, df: i8, dr: i8) -> Option<Self> {
        let file = (self.0 % 8) as i8 + df;
        let rank = (self.0 / 8) as i8 + dr;
        if file < 0 || file > 7 || rank < 0 || rank > 7 {
            None
        } else {
            Some(CellId((rank * 8 + file) as u8))
        }
    }

    /// Iterates over all 64 cells, A1 first.
    pub fn all() -> impl Iterator<Item = CellId> {
        (0..64).map(CellId)
    }

    pub const A1: CellId = CellId(0);
    pub const C1: CellId = CellId(2);
    pub const D1: CellId = CellId(3);
    pub const E1: CellId = CellId(4);
    pub const F1: CellId = CellId(5);
    pub const G1: CellId = CellId(6);
    pub const H1: CellId = CellId(7);
    pub const A8: CellId = CellId(56);
    pub const C8: CellId = CellId(58);
    pub const D8: CellId = CellId(59);
    pub const E8: CellId = CellId(60);
    pub const F8: CellId = CellId(61);
    pub const G8: CellId = CellId(62);
    pub const H8: CellId = CellId(63);
}

impl FromStr for CellId {
    type Err = CellParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(f), Some(r), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(CellParseError::Length(s.to_string()));
        };
        let file = File::from_char(f).ok_or_else(|| CellParseError::File(s.to_string()))?;
        let rank = Rank::from_char(r).ok_or_else(|| CellParseError::Rank(s.to_string()))?;
        Ok(Coordinate::new(file, rank).to_id())
    }
}

impl TryFrom<String> for CellId {
    type Error = CellParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellId> for String {
    fn from(id: CellId) -> Self {
        id.to_string()
    }
}

impl fmt::Debug for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellId({})", self)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(s: &str) -> CellId {
        s.parse().unwrap()
    }

    #[test]
    fn coordinate_to_id() {
        let e4 = Coordinate::new(File::E, Rank::R4).to_id();
        assert_eq!(e4.index(), 28);
        assert_eq!(e4.to_string(), "E4");
        assert_eq!(Coordinate::new(File::A, Rank::R1).to_id(), CellId::A1);
        assert_eq!(Coordinate::new(File::H, Rank::R8).to_id(), CellId::H8);
    }

    #[test]
    fn parse_labels() {
        assert_eq!(id("a1"), CellId::A1);
        assert_eq!(id("G8"), CellId::G8);
        assert_eq!(id(" e4 ").coordinate(), Coordinate::new(File::E, Rank::R4));
        assert!(matches!("".parse::<CellId>(), Err(CellParseError::Length(_))));
        assert!(matches!("E44".parse::<CellId>(), Err(CellParseError::Length(_))));
        assert!(matches!("I1".parse::<CellId>(), Err(CellParseError::File(_))));
        assert!(matches!("A9".parse::<CellId>(), Err(CellParseError::Rank(_))));
    }

    #[test]
    fn offsets_stay_on_board() {
        assert_eq!(CellId::A1.offset(1, 2), Some(id("B3")));
        assert_eq!(CellId::A1.offset(-1, 0), None);
        assert_eq!(CellId::H8.offset(0, 1), None);
        assert_eq!(CellId::H1.offset(1, 0), None);
    }

    #[test]
    fn all_cells_are_distinct() {
        let cells: std::collections::BTreeSet<_> = CellId::all().collect();
        assert_eq!(cells.len(), 64);
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&id("E4")).unwrap();
        assert_eq!(json, "\"E4\"");
        let back: CellId = serde_json::from_str("\"f6\"").unwrap();
        assert_eq!(back, id("F6"));
        assert!(serde_json::from_str::<CellId>("\"Z0\"").is_err());
    }

    proptest! {
        #[test]
        fn id_and_coordinate_are_inverse(file in 0u8..8, rank in 0u8..8) {
            let coord = Coordinate::new(
                File::from_index(file).unwrap(),
                Rank::from_index(rank).unwrap(),
            );
            let cell = coord.to_id();
            prop_assert_eq!(cell.coordinate(), coord);
            prop_assert_eq!(cell.to_string().parse::<CellId>().unwrap(), cell);
        }
    }
}
