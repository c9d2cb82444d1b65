//! Structural analysis
//!
//! This module provides:
//! - Line break classification for bytes and decoded runes
//! - Column, ANSI escape, line and word scanners
//! - Parallel inspection of a whole buffer
//!
//! # Classification
//!
//! One pass tallies five conventions. LF and CR that belong to a CRLF or
//! LFCR pair are not counted on their own. The counters are sorted with a
//! stable sort, so ties resolve in the order listed:
//!
//! ```text
//! LF > CR > CRLF > LFCR > NL
//! ```
//!
//! Input with no breaks at all is therefore LF, and empty input is
//! [`LineBreak::Unknown`].

pub mod scan;

use std::fmt;

pub use scan::{columns, controls, inspect, lines, scan, words, Report, Scan};

const LF: u32 = 0x0A;
const CR: u32 = 0x0D;
const NL: u32 = 0x15;
const NEL: u32 = 0x85;

/// A line break convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineBreak {
    Lf,
    Cr,
    CrLf,
    LfCr,
    /// EBCDIC new line, 0x15
    Nl,
    /// Unicode next line, U+0085
    Nel,
    Unknown,
}

impl LineBreak {
    /// Code points of the break, empty when unknown.
    pub fn runes(self) -> &'static [char] {
        match self {
            LineBreak::Lf => &['\n'],
            LineBreak::Cr => &['\r'],
            LineBreak::CrLf => &['\r', '\n'],
            LineBreak::LfCr => &['\n', '\r'],
            LineBreak::Nl => &['\u{15}'],
            LineBreak::Nel => &['\u{85}'],
            LineBreak::Unknown => &[],
        }
    }

    pub fn is_known(self) -> bool {
        self != LineBreak::Unknown
    }

    pub fn abbr(self) -> &'static str {
        match self {
            LineBreak::Lf => "LF",
            LineBreak::Cr => "CR",
            LineBreak::CrLf => "CRLF",
            LineBreak::LfCr => "LFCR",
            LineBreak::Nl => "NL",
            LineBreak::Nel => "NEL",
            LineBreak::Unknown => "??",
        }
    }

    /// Abbreviation with the platforms that use it.
    pub fn describe(self) -> &'static str {
        match self {
            LineBreak::Lf => "LF (Linux, macOS, Unix)",
            LineBreak::Cr => "CR (8-bit microcomputers)",
            LineBreak::CrLf => "CRLF (Windows, DOS)",
            LineBreak::LfCr => "LFCR (Acorn BBC)",
            LineBreak::Nl => "NL (IBM EBCDIC)",
            LineBreak::Nel => "NEL (EBCDIC to Unicode)",
            LineBreak::Unknown => "??",
        }
    }
}

impl fmt::Display for LineBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbr())
    }
}

/// Classify undecoded bytes. Only the EBCDIC NL byte counts as a new line.
pub fn classify_bytes(bytes: &[u8]) -> LineBreak {
    tally(bytes, false)
}

/// Classify decoded runes. Both NL and NEL count as a new line.
pub fn classify_runes(runes: &[char]) -> LineBreak {
    tally(runes, true)
}

fn tally<T: Copy + Into<u32>>(units: &[T], unicode: bool) -> LineBreak {
    if units.is_empty() {
        return LineBreak::Unknown;
    }
    let code = |i: usize| -> u32 { units[i].into() };
    let last = units.len() - 1;

    let mut counts = [
        (LineBreak::Lf, 0usize),
        (LineBreak::Cr, 0),
        (LineBreak::CrLf, 0),
        (LineBreak::LfCr, 0),
        (LineBreak::Nl, 0),
    ];
    let mut saw_nel = false;

    for i in 0..units.len() {
        match code(i) {
            LF => {
                if i < last && code(i + 1) == CR {
                    counts[3].1 += 1;
                } else if i > 0 && code(i - 1) == CR {
                    // second half of a CRLF
                } else {
                    counts[0].1 += 1;
                }
            }
            CR => {
                if i < last && code(i + 1) == LF {
                    counts[2].1 += 1;
                } else if i > 0 && code(i - 1) == LF {
                    // second half of a LFCR
                } else {
                    counts[1].1 += 1;
                }
            }
            NL => counts[4].1 += 1,
            NEL if unicode => {
                counts[4].1 += 1;
                saw_nel = true;
            }
            _ => {}
        }
    }

    // sort_by is stable, which gives the tie order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    match counts[0].0 {
        LineBreak::Nl if saw_nel => LineBreak::Nel,
        key => key,
    }
}
