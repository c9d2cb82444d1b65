//! Code tables
//!
//! A code table is the 16x16 grid of every byte value an encoding can
//! decode. Each cell goes through the normal decoder in
//! [`Mode::Chars`](crate::pipeline::Mode), so controls show as pictures.
//! A few rendering overrides keep the grid aligned:
//!
//! - combining marks get a leading space to sit on
//! - ZWNJ, ZWJ, LRM and RLM render as a single space
//! - UTF-8 has no single bytes above 0x7F, so 0x80..=0x9F is blank and
//!   0xA0..=0xFF shows the Latin-1 character of the same code point
//!
//! UTF-16 and UTF-32 cannot be drawn one byte at a time.

use std::fmt::{self, Write as _};

use crossterm::style::Stylize;
use unicode_width::UnicodeWidthChar;

use crate::codec::{self, Codec, Encoding};
use crate::error::{Error, Result};
use crate::pipeline::{Mode, Session};

const BLANK: &str = " ";

#[derive(Debug, Clone)]
pub struct CodeTable {
    pub encoding: &'static Encoding,
    /// Exactly 256 cells, in byte order.
    pub cells: Vec<String>,
}

/// Build the code table for an encoding name.
pub fn render_table(name: &str) -> Result<CodeTable> {
    let encoding = codec::resolve(name)?;
    if encoding.is_utf16_or_utf32() {
        return Err(Error::UnsupportedEncoding {
            name: encoding.name.to_string(),
            operation: "code tables",
        });
    }
    let cells = (0..=255u8)
        .map(|b| cell(encoding, b))
        .collect::<Result<Vec<_>>>()?;
    Ok(CodeTable { encoding, cells })
}

fn cell(encoding: &'static Encoding, byte: u8) -> Result<String> {
    let shown = match encoding.codec {
        Codec::Utf8 if byte >= 0xA0 => char::from(byte),
        Codec::Utf8 if byte >= 0x80 => return Ok(BLANK.to_string()),
        // lead bytes mean nothing alone
        Codec::ShiftJis if (0x80..=0xA0).contains(&byte) || byte >= 0xE0 => {
            return Ok(BLANK.to_string())
        }
        _ => {
            let single = [byte];
            let out = Session::with_encoding(&single, encoding)
                .mode(Mode::Chars)
                .run()?;
            match out.cells.first() {
                Some(c) => c.ch,
                None => return Ok(BLANK.to_string()),
            }
        }
    };
    Ok(display(shown))
}

fn display(ch: char) -> String {
    match ch {
        '\u{200C}'..='\u{200F}' => BLANK.to_string(),
        c if !c.is_control() && c.width() == Some(0) => format!(" {}", c),
        c => c.to_string(),
    }
}

impl CodeTable {
    /// The grid as text, with dimmed headers when `color` is set.
    pub fn render(&self, color: bool) -> String {
        let dim = |s: String| -> String {
            if color {
                s.dark_grey().to_string()
            } else {
                s
            }
        };
        let mut out = String::new();
        let title = format!(" {}", self.encoding.name);
        let _ = writeln!(out, "{}", if color { title.bold().to_string() } else { title });

        let mut header = String::from("    ");
        for col in 0..16 {
            let _ = write!(header, " {:X}  ", col);
        }
        let _ = writeln!(out, "{}", dim(header.trim_end().to_string()));

        for (row, cells) in self.cells.chunks(16).enumerate() {
            let _ = write!(out, "{}", dim(format!(" {:X} |", row)));
            for cell in cells {
                let _ = write!(out, " {} {}", cell, dim("|".to_string()));
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}
