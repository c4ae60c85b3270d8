//! Mailbox position representation.

use chess_core::{CellId, Color, FenError, FenRecord, Piece, PieceCode};

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Parses the castling field of a FEN record.
    pub fn from_fen(field: &str) -> Self {
        let mut flags = 0u8;
        for c in field.chars() {
            match c {
                'K' => flags |= Self::WHITE_KINGSIDE,
                'Q' => flags |= Self::WHITE_QUEENSIDE,
                'k' => flags |= Self::BLACK_KINGSIDE,
                'q' => flags |= Self::BLACK_QUEENSIDE,
                _ => {}
            }
        }
        CastlingRights::new(flags)
    }

    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        };
        (self.0 & flag) != 0
    }

    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Removes all castling rights for a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        let mask = match color {
            Color::White => !(Self::WHITE_KINGSIDE | Self::WHITE_QUEENSIDE),
            Color::Black => !(Self::BLACK_KINGSIDE | Self::BLACK_QUEENSIDE),
        };
        self.0 &= mask;
    }

    /// Drops the right tied to a rook corner once anything leaves or lands on it.
    pub fn touch(&mut self, cell: CellId) {
        let mask = match cell {
            CellId::H1 => !Self::WHITE_KINGSIDE,
            CellId::A1 => !Self::WHITE_QUEENSIDE,
            CellId::H8 => !Self::BLACK_KINGSIDE,
            CellId::A8 => !Self::BLACK_QUEENSIDE,
            _ => return,
        };
        self.0 &= mask;
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Complete game state: one optional piece per cell plus the side-to-move data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    cells: [Option<PieceCode>; 64],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    /// Cell a pawn may capture onto en passant, if the last move was a double push.
    pub en_passant: Option<CellId>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Position {
    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_record(FenRecord::startpos())
    }

    /// Creates a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        fen.parse::<FenRecord>().map(Self::from_record)
    }

    fn from_record(record: FenRecord) -> Self {
        Position {
            cells: record.placement,
            side_to_move: record.side_to_move,
            castling: CastlingRights::from_fen(&record.castling),
            en_passant: record.en_passant,
            halfmove_clock: record.halfmove_clock,
            fullmove_number: record.fullmove_number,
        }
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut castling = String::new();
        for (allowed, c) in [
            (self.castling.can_castle_kingside(Color::White), 'K'),
            (self.castling.can_castle_queenside(Color::White), 'Q'),
            (self.castling.can_castle_kingside(Color::Black), 'k'),
            (self.castling.can_castle_queenside(Color::Black), 'q'),
        ] {
            if allowed {
                castling.push(c);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        FenRecord {
            placement: self.cells,
            side_to_move: self.side_to_move,
            castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_fen()
    }

    #[inline]
    pub fn piece_at(&self, cell: CellId) -> Option<PieceCode> {
        self.cells[cell.index() as usize]
    }

    #[inline]
    pub(crate) fn set(&mut self, cell: CellId, code: Option<PieceCode>) {
        self.cells[cell.index() as usize] = code;
    }

    /// Iterates over occupied cells.
    pub fn pieces(&self) -> impl Iterator<Item = (CellId, PieceCode)> + '_ {
        CellId::all().filter_map(move |cell| self.piece_at(cell).map(|code| (cell, code)))
    }

    /// Returns the cell of the given side's king.
    pub fn king(&self, color: Color) -> Option<CellId> {
        self.pieces()
            .find(|(_, code)| code.piece == Piece::King && code.color == color)
            .map(|(cell, _)| cell)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
