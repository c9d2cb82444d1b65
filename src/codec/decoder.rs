//! Byte-to-rune decoding.
//!
//! The decoder applies an encoding's table, then its family override. Each
//! output [`Cell`] remembers where its character came from, so later stages
//! can restore a control or leave a cell alone without keeping a separate
//! list of positions.

use encoding_rs::{SHIFT_JIS, UTF_16BE, UTF_16LE, UTF_8};

use super::catalog::{ByteOrder, Codec, Encoding};
use super::tables::REPLACEMENT;
use crate::error::{Error, Result};

/// Provenance of a [`Cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The table character, unchanged.
    Decoded,
    /// A family override replaced the raw character.
    Picture(char),
    /// A control deliberately restored to its raw character.
    Kept,
    /// Replaced by a swap rule.
    Swapped,
    /// Added by the width wrapper.
    Inserted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub origin: Origin,
}

impl Cell {
    pub fn new(ch: char, origin: Origin) -> Self {
        Self { ch, origin }
    }

    /// Cell for a table character and its display form.
    pub fn from_raw(raw: char, shown: char) -> Self {
        if raw == shown {
            Self::new(raw, Origin::Decoded)
        } else {
            Self::new(shown, Origin::Picture(raw))
        }
    }

    /// Character before any override.
    pub fn raw(&self) -> char {
        match self.origin {
            Origin::Picture(raw) => raw,
            _ => self.ch,
        }
    }

    /// Put the raw character back and protect it from later stages.
    pub fn keep(&mut self) {
        self.ch = self.raw();
        self.origin = Origin::Kept;
    }
}

/// Decode a byte buffer. An empty buffer is an error; a buffer that holds
/// only a byte order mark decodes to no cells.
pub fn decode(bytes: &[u8], encoding: &Encoding) -> Result<Vec<Cell>> {
    if bytes.is_empty() {
        return Err(Error::EmptyInput);
    }
    let raw = raw_chars(bytes, encoding);
    Ok(raw
        .into_iter()
        .map(|r| Cell::from_raw(r, encoding.picture(r)))
        .collect())
}

/// Table characters with no override applied.
pub fn raw_chars(bytes: &[u8], encoding: &Encoding) -> Vec<char> {
    match &encoding.codec {
        Codec::SingleByte(table) => bytes.iter().map(|&b| table[b as usize]).collect(),
        Codec::ShiftJis => SHIFT_JIS.decode_without_bom_handling(bytes).0.chars().collect(),
        Codec::Utf8 => UTF_8.decode_with_bom_removal(bytes).0.chars().collect(),
        Codec::Utf16 { order, sniff } => {
            // only a UTF-16 byte order mark may override the default
            let (order, body) = match bytes {
                [0xFF, 0xFE, rest @ ..] if *sniff => (ByteOrder::Little, rest),
                [0xFE, 0xFF, rest @ ..] if *sniff => (ByteOrder::Big, rest),
                _ => (*order, bytes),
            };
            let encoding = match order {
                ByteOrder::Big => UTF_16BE,
                ByteOrder::Little => UTF_16LE,
            };
            encoding.decode_without_bom_handling(body).0.chars().collect()
        }
        Codec::Utf32 { order, sniff } => utf32(bytes, *order, *sniff),
    }
}

fn utf32(bytes: &[u8], order: ByteOrder, sniff: bool) -> Vec<char> {
    let (order, body) = match bytes {
        [0xFF, 0xFE, 0x00, 0x00, rest @ ..] if sniff => (ByteOrder::Little, rest),
        [0x00, 0x00, 0xFE, 0xFF, rest @ ..] if sniff => (ByteOrder::Big, rest),
        _ => (order, bytes),
    };
    body.chunks(4)
        .map(|chunk| {
            let Ok(unit) = <[u8; 4]>::try_from(chunk) else {
                return REPLACEMENT;
            };
            let code = match order {
                ByteOrder::Big => u32::from_be_bytes(unit),
                ByteOrder::Little => u32::from_le_bytes(unit),
            };
            char::from_u32(code).unwrap_or(REPLACEMENT)
        })
        .collect()
}
