//! Core types for the board.
//!
//! This crate provides the fundamental types shared by the engine, the
//! renderer, and the interaction controller:
//! - [`Coordinate`], [`File`], and [`Rank`] for board positions
//! - [`CellId`], the opaque handle passed between components
//! - [`Piece`], [`Color`], and [`PieceCode`] for piece identity
//! - [`FenRecord`] for reading and writing FEN

mod cell;
mod color;
mod fen;
mod piece;

pub use cell::{CellId, CellParseError, Coordinate, File, Rank};
pub use color::{Color, ColorParseError};
pub use fen::{FenError, FenRecord, STARTPOS};
pub use piece::{Piece, PieceCode};
