//! Conversion pipeline
//!
//! A [`Session`] owns one conversion from legacy bytes to Unicode. Its
//! stages always run in the same order:
//!
//! ```text
//! bytes ──► sauce ──► decode ──► eof ──► classify ──► controls ──► swap ──► wrap ──► cells
//! ```
//!
//! A trailing SAUCE record is metadata and is never converted, whatever the
//! mode. The decoder tags each cell with its [`Origin`](crate::codec::Origin),
//! and the later stages read that tag instead of tracking positions.

pub mod controls;
pub mod swap;
pub mod wrap;

use std::fmt;

use tracing::debug;

use crate::analysis::{classify_runes, LineBreak};
use crate::codec::{self, Cell, Encoding};
use crate::error::Result;
use crate::sauce;

pub use controls::ControlPolicy;
pub use swap::Swap;

/// What the output is for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// ANSI art: end-of-file truncates and swaps are ignored.
    Ansi,
    /// Character tables: every control stays a picture.
    Chars,
    /// Plain text: end-of-file truncates.
    #[default]
    Text,
    /// Like text, but reads past the end-of-file marker.
    Dump,
}

impl Mode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "ansi" => Some(Mode::Ansi),
            "chars" | "table" => Some(Mode::Chars),
            "text" => Some(Mode::Text),
            "dump" => Some(Mode::Dump),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Ansi => "ansi",
            Mode::Chars => "chars",
            Mode::Text => "text",
            Mode::Dump => "dump",
        }
    }

    pub(crate) fn truncates_at_eof(self) -> bool {
        matches!(self, Mode::Ansi | Mode::Text)
    }

    pub(crate) fn restores_controls(self) -> bool {
        self != Mode::Chars
    }

    pub(crate) fn swaps(self) -> bool {
        self != Mode::Ansi
    }
}

/// One conversion of a byte buffer.
#[derive(Debug, Clone)]
pub struct Session<'a> {
    encoding: &'static Encoding,
    source: &'a [u8],
    controls: ControlPolicy,
    swaps: Vec<Swap>,
    width: usize,
    mode: Mode,
}

impl<'a> Session<'a> {
    /// Start a session, resolving the encoding by name.
    pub fn new(source: &'a [u8], encoding: &str) -> Result<Self> {
        Ok(Self::with_encoding(source, codec::resolve(encoding)?))
    }

    pub fn with_encoding(source: &'a [u8], encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            source,
            controls: ControlPolicy::empty(),
            swaps: Vec::new(),
            width: 0,
            mode: Mode::default(),
        }
    }

    pub fn controls(mut self, policy: ControlPolicy) -> Self {
        self.controls = policy;
        self
    }

    pub fn swaps(mut self, swaps: &[Swap]) -> Self {
        self.swaps = swaps.to_vec();
        self
    }

    /// Maximum line width, 0 for no wrapping.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Run every stage and hand over the result.
    pub fn run(self) -> Result<Conversion> {
        let source = sauce::strip(self.source);
        if source.len() < self.source.len() {
            debug!("Skipping {} bytes of SAUCE metadata", self.source.len() - source.len());
        }
        let mut cells = codec::decode(source, self.encoding)?;
        controls::truncate_at_eof(&mut cells, self.controls, self.mode);

        let raw: Vec<char> = cells.iter().map(Cell::raw).collect();
        let line_break = classify_runes(&raw);

        controls::restore(&mut cells, self.controls, line_break, self.mode);
        if self.mode.swaps() {
            swap::apply(&mut cells, &self.swaps);
        }
        let cells = wrap::apply(cells, self.width, line_break);

        debug!(
            "Converted {} bytes of {} to {} runes ({} mode, {} breaks)",
            self.source.len(),
            self.encoding.value,
            cells.len(),
            self.mode.name(),
            line_break
        );
        Ok(Conversion {
            encoding: self.encoding,
            line_break,
            cells,
        })
    }
}

/// Output of a [`Session`].
#[derive(Debug, Clone)]
pub struct Conversion {
    pub encoding: &'static Encoding,
    pub line_break: LineBreak,
    pub cells: Vec<Cell>,
}

impl Conversion {
    pub fn runes(&self) -> Vec<char> {
        self.cells.iter().map(|c| c.ch).collect()
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for cell in &self.cells {
            f.write_char(cell.ch)?;
        }
        Ok(())
    }
}
