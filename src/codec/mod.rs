//! Character encodings
//!
//! This module contains:
//! - Encoding catalog (name and alias resolution)
//! - Character tables (IBM PC, EBCDIC, WHATWG, historic ASCII)
//! - Family overrides that turn controls into picture glyphs
//! - The byte-to-rune decoder

pub mod catalog;
pub mod decoder;
pub mod family;
pub mod historic;
pub mod tables;

pub use catalog::{all, resolve, rows, ByteOrder, Codec, Encoding, TableRow};
pub use decoder::{decode, Cell, Origin};
pub use family::Family;
