//! Terminal board.

use crate::{glyph, ActivationCallback, Renderer};
use chess_core::{CellId, Color, Coordinate, File, PieceCode, Rank};
use std::fmt::Write as _;
use tracing::warn;

/// How the text grid is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    /// Plain characters; highlighted cells are wrapped in brackets.
    #[default]
    Plain,
    /// ANSI background colors for light, dark, and highlighted cells.
    Ansi,
}

const LIGHT_BG: &str = "\x1b[48;5;180m";
const DARK_BG: &str = "\x1b[48;5;95m";
const HIGHLIGHT_BG: &str = "\x1b[48;5;107m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, Default)]
struct CellView {
    glyph: Option<char>,
    highlighted: bool,
}

/// An 8x8 text grid with rank labels on the left and file labels below.
///
/// Cells are activated by typing their label (`"e2"`); [`TextBoard::click`]
/// resolves the label against the grid and reports the cell id.
pub struct TextBoard {
    cells: Option<[CellView; 64]>,
    callback: Option<ActivationCallback>,
    bottom: Color,
    style: TextStyle,
}

impl TextBoard {
    /// Creates a board drawn from White's side.
    pub fn new(style: TextStyle) -> Self {
        TextBoard {
            cells: None,
            callback: None,
            bottom: Color::White,
            style,
        }
    }

    /// Draws the board with `side`'s pieces at the bottom.
    pub fn oriented(mut self, side: Color) -> Self {
        self.bottom = side;
        self
    }

    /// Activates the cell with the given label.
    ///
    /// Returns false if the grid is not built yet, no callback is registered,
    /// or the label does not name a cell of this grid.
    pub fn click(&mut self, label: &str) -> bool {
        if self.cells.is_none() {
            return false;
        }
        let cell: CellId = match label.parse() {
            Ok(cell) => cell,
            Err(e) => {
                warn!(label, error = %e, "ignoring activation of unknown cell");
                return false;
            }
        };
        match self.callback.as_mut() {
            Some(callback) => {
                callback(cell);
                true
            }
            None => false,
        }
    }

    /// Returns the glyph currently displayed on `cell`.
    pub fn glyph_at(&self, cell: CellId) -> Option<char> {
        self.cells.as_ref()?[cell.index() as usize].glyph
    }

    pub fn is_highlighted(&self, cell: CellId) -> bool {
        self.cells
            .as_ref()
            .is_some_and(|cells| cells[cell.index() as usize].highlighted)
    }

    /// Renders the grid as text, one rank per line, followed by file labels.
    pub fn render(&self) -> String {
        let Some(cells) = self.cells.as_ref() else {
            return String::new();
        };

        let (ranks, files): (Vec<Rank>, Vec<File>) = match self.bottom {
            Color::White => (Rank::ALL.iter().rev().copied().collect(), File::ALL.to_vec()),
            Color::Black => (Rank::ALL.to_vec(), File::ALL.iter().rev().copied().collect()),
        };

        let mut out = String::new();
        for rank in &ranks {
            let _ = write!(out, "{} ", rank);
            for file in &files {
                let cell = Coordinate::new(*file, *rank).to_id();
                let view = cells[cell.index() as usize];
                self.write_cell(&mut out, cell, view);
            }
            out.push('\n');
        }
        out.push_str("  ");
        for file in &files {
            let _ = write!(out, " {} ", file);
        }
        out.push('\n');
        out
    }

    fn write_cell(&self, out: &mut String, cell: CellId, view: CellView) {
        let symbol = view.glyph.unwrap_or(' ');
        match self.style {
            TextStyle::Plain => {
                let symbol = view.glyph.unwrap_or('.');
                if view.highlighted {
                    let _ = write!(out, "[{}]", symbol);
                } else {
                    let _ = write!(out, " {} ", symbol);
                }
            }
            TextStyle::Ansi => {
                let bg = if view.highlighted {
                    HIGHLIGHT_BG
                } else if is_light(cell) {
                    LIGHT_BG
                } else {
                    DARK_BG
                };
                let _ = write!(out, "{} {} {}", bg, symbol, RESET);
            }
        }
    }
}

impl Default for TextBoard {
    fn default() -> Self {
        Self::new(TextStyle::default())
    }
}

fn is_light(cell: CellId) -> bool {
    (cell.file().index() + cell.rank().index()) % 2 == 1
}

impl Renderer for TextBoard {
    fn build_grid(&mut self) {
        self.cells = Some([CellView::default(); 64]);
    }

    fn set_glyph(&mut self, cell: CellId, piece: Option<PieceCode>) {
        if let Some(cells) = self.cells.as_mut() {
            cells[cell.index() as usize].glyph = piece.map(glyph);
        }
    }

    fn set_highlighted(&mut self, cell: CellId, highlighted: bool) {
        if let Some(cells) = self.cells.as_mut() {
            cells[cell.index() as usize].highlighted = highlighted;
        }
    }

    fn on_cell_activated(&mut self, callback: ActivationCallback) {
        self.callback = Some(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Piece;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn cell(s: &str) -> CellId {
        s.parse().unwrap()
    }

    #[test]
    fn empty_grid_layout() {
        let mut board = TextBoard::default();
        assert_eq!(board.render(), "");
        board.build_grid();
        let text = board.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].starts_with("8 "));
        assert!(lines[7].starts_with("1 "));
        assert_eq!(lines[8], "   A  B  C  D  E  F  G  H ");
    }

    #[test]
    fn glyphs_and_highlights() {
        let mut board = TextBoard::default();
        board.build_grid();
        board.set_glyph(cell("E2"), Some(PieceCode::new(Piece::Pawn, Color::White)));
        board.set_highlighted(cell("E4"), true);
        assert_eq!(board.glyph_at(cell("E2")), Some('\u{2659}'));
        assert!(board.is_highlighted(cell("E4")));

        let text = board.render();
        let rank2 = text.lines().nth(6).unwrap();
        assert_eq!(rank2, "2  .  .  .  .  \u{2659}  .  .  . ");
        let rank4 = text.lines().nth(4).unwrap();
        assert!(rank4.contains("[.]"));

        board.set_glyph(cell("E2"), None);
        board.set_highlighted(cell("E4"), false);
        assert_eq!(board.glyph_at(cell("E2")), None);
        assert!(!board.is_highlighted(cell("E4")));
    }

    #[test]
    fn black_orientation_flips_labels() {
        let mut board = TextBoard::default().oriented(Color::Black);
        board.build_grid();
        let text = board.render();
        assert!(text.lines().next().unwrap().starts_with("1 "));
        assert_eq!(text.lines().last().unwrap(), "   H  G  F  E  D  C  B  A ");
    }

    #[test]
    fn click_reports_cell_ids() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut board = TextBoard::default();
        board.on_cell_activated(Box::new(move |cell| sink.borrow_mut().push(cell)));

        assert!(!board.click("e2"), "grid not built yet");
        board.build_grid();
        assert!(board.click("e2"));
        assert!(board.click(" G8 "));
        assert!(!board.click("z9"));
        assert_eq!(*seen.borrow(), vec![cell("E2"), cell("G8")]);
    }

    #[test]
    fn ansi_style_colors_cells() {
        let mut board = TextBoard::new(TextStyle::Ansi);
        board.build_grid();
        board.set_highlighted(cell("A1"), true);
        let text = board.render();
        assert!(text.contains(HIGHLIGHT_BG));
        assert!(text.contains(LIGHT_BG));
        assert!(text.contains(DARK_BG));
    }
}
