//! Control code policy.
//!
//! After decoding, every control is a picture glyph. This stage restores
//! the raw control for cells the caller asked to keep:
//!
//! - controls named in the [`ControlPolicy`]
//! - the runes of the active line break
//! - everything inside an ANSI control sequence, `ESC [ ... final`
//!
//! The `eof` name is different: it truncates the text at the first SUB
//! (0x1A), whatever glyph the family drew for it.

use bitflags::bitflags;

use super::Mode;
use crate::analysis::LineBreak;
use crate::codec::{Cell, Origin};

const SUB: char = '\u{1A}';
const ESC: char = '\u{1B}';

bitflags! {
    /// Controls to pass through instead of drawing as pictures.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct ControlPolicy: u16 {
        const EOF  = 0b00_0000_0001;
        const TAB  = 0b00_0000_0010;
        const BELL = 0b00_0000_0100;
        const CR   = 0b00_0000_1000;
        const LF   = 0b00_0001_0000;
        const BS   = 0b00_0010_0000;
        const DEL  = 0b00_0100_0000;
        const ESC  = 0b00_1000_0000;
        const FF   = 0b01_0000_0000;
        const VT   = 0b10_0000_0000;
    }
}

const NAMES: [(ControlPolicy, &str); 10] = [
    (ControlPolicy::EOF, "eof"),
    (ControlPolicy::TAB, "tab"),
    (ControlPolicy::BELL, "bell"),
    (ControlPolicy::CR, "cr"),
    (ControlPolicy::LF, "lf"),
    (ControlPolicy::BS, "bs"),
    (ControlPolicy::DEL, "del"),
    (ControlPolicy::ESC, "esc"),
    (ControlPolicy::FF, "ff"),
    (ControlPolicy::VT, "vt"),
];

impl ControlPolicy {
    /// Flag for a control name or one of its short aliases. The bitflags
    /// `from_name` only knows the upper case flag names.
    pub fn from_alias(name: &str) -> Option<Self> {
        let flag = match name.trim().to_lowercase().as_str() {
            "eof" | "=" => Self::EOF,
            "tab" | "ht" | "t" => Self::TAB,
            "bell" | "bel" | "b" => Self::BELL,
            "cr" | "c" => Self::CR,
            "lf" | "l" => Self::LF,
            "bs" | "backspace" => Self::BS,
            "del" | "d" => Self::DEL,
            "esc" | "e" => Self::ESC,
            "ff" | "formfeed" | "f" => Self::FF,
            "vt" | "vtab" | "v" => Self::VT,
            _ => return None,
        };
        Some(flag)
    }

    /// Build a policy from names. Unknown names are returned, not fatal.
    pub fn parse<I, S>(names: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut policy = Self::empty();
        let mut unknown = Vec::new();
        for name in names {
            let name = name.as_ref();
            if name.trim().is_empty() {
                continue;
            }
            match Self::from_alias(name) {
                Some(flag) => policy |= flag,
                None => unknown.push(name.to_string()),
            }
        }
        (policy, unknown)
    }

    /// Canonical names of the set flags.
    pub fn names(self) -> Vec<&'static str> {
        NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|&(_, name)| name)
            .collect()
    }

    /// Whether a raw control should pass through.
    pub fn passes(self, raw: char) -> bool {
        let flag = match raw {
            '\t' => Self::TAB,
            '\u{7}' => Self::BELL,
            '\r' => Self::CR,
            '\n' => Self::LF,
            '\u{8}' => Self::BS,
            '\u{7F}' => Self::DEL,
            ESC => Self::ESC,
            '\u{C}' => Self::FF,
            '\u{B}' => Self::VT,
            _ => return false,
        };
        self.contains(flag)
    }
}

/// Cut the cells at the first end-of-file marker.
pub fn truncate_at_eof(cells: &mut Vec<Cell>, policy: ControlPolicy, mode: Mode) {
    if !policy.contains(ControlPolicy::EOF) || !mode.truncates_at_eof() {
        return;
    }
    if let Some(end) = cells.iter().position(|c| c.raw() == SUB) {
        cells.truncate(end);
    }
}

/// Restore kept controls, line breaks and control sequences.
pub fn restore(cells: &mut [Cell], policy: ControlPolicy, key: LineBreak, mode: Mode) {
    if !mode.restores_controls() {
        return;
    }
    protect_sequences(cells);

    let breaks = key.runes();
    let next_line = matches!(key, LineBreak::Nl | LineBreak::Nel);
    for cell in cells.iter_mut() {
        let Origin::Picture(raw) = cell.origin else {
            continue;
        };
        if next_line && breaks.contains(&raw) {
            // terminals do not break on NEL
            cell.ch = '\n';
            cell.origin = Origin::Kept;
        } else if breaks.contains(&raw) || policy.passes(raw) {
            cell.keep();
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum CsiState {
    #[default]
    Ground,
    Escape,
    Entry,
    Param,
    Intermediate,
}

/// Keep every cell of each `ESC [ params intermediates final` sequence.
fn protect_sequences(cells: &mut [Cell]) {
    let mut state = CsiState::Ground;
    for i in 0..cells.len() {
        let raw = cells[i].raw();
        state = match (state, raw) {
            (_, ESC) => CsiState::Escape,
            (CsiState::Escape, '[') => {
                cells[i - 1].keep();
                cells[i].keep();
                CsiState::Entry
            }
            (CsiState::Entry | CsiState::Param, '\u{30}'..='\u{3F}') => {
                cells[i].keep();
                CsiState::Param
            }
            (CsiState::Entry | CsiState::Param | CsiState::Intermediate, '\u{20}'..='\u{2F}') => {
                cells[i].keep();
                CsiState::Intermediate
            }
            (CsiState::Entry | CsiState::Param | CsiState::Intermediate, '\u{40}'..='\u{7E}') => {
                cells[i].keep();
                CsiState::Ground
            }
            _ => CsiState::Ground,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, resolve};

    fn cells(bytes: &[u8], encoding: &str) -> Vec<Cell> {
        decode(bytes, resolve(encoding).unwrap()).unwrap()
    }

    fn text(cells: &[Cell]) -> String {
        cells.iter().map(|c| c.ch).collect()
    }

    #[test]
    fn test_parse_names_and_aliases() {
        let (policy, unknown) = ControlPolicy::parse(["eof", "HT", "v", "nope", ""]);
        assert_eq!(policy, ControlPolicy::EOF | ControlPolicy::TAB | ControlPolicy::VT);
        assert_eq!(unknown, vec!["nope".to_string()]);
        assert_eq!(policy.names(), vec!["eof", "tab", "vt"]);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(ControlPolicy::from_alias("="), Some(ControlPolicy::EOF));
        assert_eq!(ControlPolicy::from_alias(" Backspace "), Some(ControlPolicy::BS));
        assert_eq!(ControlPolicy::from_alias("formfeed"), Some(ControlPolicy::FF));
        assert_eq!(ControlPolicy::from_alias("xyz"), None);
        // the generated flag lookup still works alongside
        assert_eq!(ControlPolicy::from_name("ESC"), Some(ControlPolicy::ESC));
    }

    #[test]
    fn test_default_substitutes_everything() {
        let mut c = cells(b"a\tb\x07", "cp437");
        restore(&mut c, ControlPolicy::default(), LineBreak::Lf, Mode::Text);
        assert_eq!(text(&c), "a○b•");
    }

    #[test]
    fn test_named_controls_pass_through() {
        let mut c = cells(b"a\tb\x07", "cp437");
        restore(&mut c, ControlPolicy::TAB, LineBreak::Lf, Mode::Text);
        assert_eq!(text(&c), "a\tb•");
        assert_eq!(c[1].origin, Origin::Kept);
    }

    #[test]
    fn test_line_break_is_restored() {
        let mut c = cells(b"a\r\nb\rc", "cp437");
        restore(&mut c, ControlPolicy::empty(), LineBreak::Lf, Mode::Text);
        assert_eq!(text(&c), "a♪\nb♪c");

        let mut c = cells(b"a\r\nb\rc", "cp437");
        restore(&mut c, ControlPolicy::empty(), LineBreak::CrLf, Mode::Text);
        assert_eq!(text(&c), "a\r\nb\rc");
    }

    #[test]
    fn test_ebcdic_next_line_becomes_lf() {
        let mut c = cells(&[0xC1, 0x15, 0xC2], "cp037");
        restore(&mut c, ControlPolicy::empty(), LineBreak::Nel, Mode::Text);
        assert_eq!(text(&c), "A\nB");
    }

    #[test]
    fn test_control_sequences_survive() {
        let mut c = cells(b"\x1b[1;31mRed\x1b[0m \x1b", "cp437");
        restore(&mut c, ControlPolicy::empty(), LineBreak::Lf, Mode::Text);
        assert_eq!(text(&c), "\u{1b}[1;31mRed\u{1b}[0m ←");
    }

    #[test]
    fn test_interrupted_sequence_returns_to_ground() {
        let mut c = cells(b"\x1b[1\x01m", "cp437");
        restore(&mut c, ControlPolicy::empty(), LineBreak::Lf, Mode::Text);
        assert_eq!(text(&c), "\u{1b}[1☺m");
        assert_eq!(c[4].origin, Origin::Decoded);
    }

    #[test]
    fn test_table_mode_keeps_pictures() {
        let mut c = cells(b"\x1b[0m\n", "cp437");
        restore(&mut c, ControlPolicy::all(), LineBreak::Lf, Mode::Chars);
        assert_eq!(text(&c), "←[0m◙");
    }

    #[test]
    fn test_eof_truncates() {
        let mut c = cells(b"Hello\x1aworld", "cp437");
        truncate_at_eof(&mut c, ControlPolicy::EOF, Mode::Text);
        assert_eq!(text(&c), "Hello");

        let mut c = cells(b"Hello\x1aworld", "utf-8");
        truncate_at_eof(&mut c, ControlPolicy::EOF, Mode::Text);
        assert_eq!(text(&c), "Hello");
    }

    #[test]
    fn test_eof_is_ignored_without_the_flag_or_in_dumps() {
        let mut c = cells(b"Hello\x1aworld", "cp437");
        truncate_at_eof(&mut c, ControlPolicy::TAB, Mode::Text);
        assert_eq!(c.len(), 11);
        truncate_at_eof(&mut c, ControlPolicy::EOF, Mode::Dump);
        assert_eq!(c.len(), 11);
    }

    #[test]
    fn test_literal_arrow_is_not_eof() {
        let mut c = cells("a→b".as_bytes(), "utf-8");
        truncate_at_eof(&mut c, ControlPolicy::EOF, Mode::Text);
        assert_eq!(text(&c), "a→b");
    }
}
