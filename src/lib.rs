//! legacytxt - legacy text to Unicode
//!
//! Converts text written in DOS and Windows code pages, EBCDIC, Shift JIS,
//! the UTF encodings and the pre-1968 ASCII drafts into Unicode, and
//! describes its structure.
//!
//! # Layout
//!
//! ```text
//! codec     encoding catalog, tables, family overrides, decoder
//! pipeline  session: decode, eof, controls, swaps, wrap
//! analysis  line break classifier, scanners, inspect
//! sauce     SAUCE metadata records
//! table     16x16 code tables
//! sample    built-in sample texts
//! config    ~/.legacytxt/config.toml
//! ```
//!
//! # Example
//!
//! ```
//! use legacytxt::{ControlPolicy, Session, Swap};
//!
//! let out = Session::new(b"\x01 |\x1a junk", "cp437")?
//!     .controls(ControlPolicy::EOF)
//!     .swaps(&[Swap::Bar])
//!     .run()?;
//! assert_eq!(out.to_string(), "☺ ¦");
//! # Ok::<(), legacytxt::Error>(())
//! ```

pub mod analysis;
pub mod codec;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod sample;
pub mod sauce;
pub mod table;

pub use analysis::{classify_bytes, classify_runes, inspect, scan, LineBreak, Report, Scan};
pub use codec::{resolve, Encoding, Family};
pub use error::{Error, Result};
pub use pipeline::{Conversion, ControlPolicy, Mode, Session, Swap};
pub use sauce::Sauce;
pub use table::{render_table, CodeTable};

/// Decode bytes to runes with a control policy and nothing else.
pub fn decode(bytes: &[u8], encoding: &str, policy: &ControlPolicy) -> Result<Vec<char>> {
    let out = Session::new(bytes, encoding)?.controls(*policy).run()?;
    Ok(out.runes())
}
