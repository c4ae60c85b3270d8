//! Piece glyphs.

use chess_core::{Color, Piece, PieceCode};

/// Returns the Unicode chess symbol for a piece.
#[must_use]
pub const fn glyph(code: PieceCode) -> char {
    match (code.color, code.piece) {
        (Color::White, Piece::King) => '\u{2654}',
        (Color::White, Piece::Queen) => '\u{2655}',
        (Color::White, Piece::Rook) => '\u{2656}',
        (Color::White, Piece::Bishop) => '\u{2657}',
        (Color::White, Piece::Knight) => '\u{2658}',
        (Color::White, Piece::Pawn) => '\u{2659}',
        (Color::Black, Piece::King) => '\u{265A}',
        (Color::Black, Piece::Queen) => '\u{265B}',
        (Color::Black, Piece::Rook) => '\u{265C}',
        (Color::Black, Piece::Bishop) => '\u{265D}',
        (Color::Black, Piece::Knight) => '\u{265E}',
        (Color::Black, Piece::Pawn) => '\u{265F}',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_follow_fen_letters() {
        let pairs = [
            ('K', '\u{2654}'),
            ('Q', '\u{2655}'),
            ('R', '\u{2656}'),
            ('B', '\u{2657}'),
            ('N', '\u{2658}'),
            ('P', '\u{2659}'),
            ('k', '\u{265A}'),
            ('q', '\u{265B}'),
            ('r', '\u{265C}'),
            ('b', '\u{265D}'),
            ('n', '\u{265E}'),
            ('p', '\u{265F}'),
        ];
        for (fen, symbol) in pairs {
            let code = PieceCode::from_fen_char(fen).unwrap();
            assert_eq!(glyph(code), symbol, "glyph for {}", fen);
        }
    }
}
