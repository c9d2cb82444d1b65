//! Pre-1968 American Standards Association ASCII revisions.
//!
//! The three revisions disagree with modern ASCII, and with each other, at a
//! handful of code points. All of them are 7-bit, so 128..=255 is blank.
//!
//! | Code | 1963 | 1965 | 1967 |
//! |------|------|------|------|
//! | 26   | blank | blank | SUB |
//! | 64   | `@` | `` ` `` | `@` |
//! | 92   | `\` | `~` | `\` |
//! | 94   | `↑` | `^` | `^` |
//! | 95   | `←` | `_` | `_` |
//! | 96   | blank | `@` | `` ` `` |
//! | 124  | `␆` | `¬` | bar |
//! | 126  | `␛` | bar | `~` |

use super::tables::{identity, CharTable};

const BLANK: char = ' ';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revision {
    /// ASA X3.4-1963
    X1963,
    /// ASA X3.4-1965
    X1965,
    /// ANSI X3.4-1967, unchanged in 1977 and 1986
    X1967,
}

pub fn table(revision: Revision) -> CharTable {
    let mut table = identity();
    for cell in table[0x80..].iter_mut() {
        *cell = BLANK;
    }
    match revision {
        Revision::X1963 => {
            for (code, cell) in table[..0x80].iter_mut().enumerate() {
                *cell = x1963(code as u8);
            }
        }
        Revision::X1965 => {
            table[26] = BLANK;
            table[64] = '`';
            table[92] = '~';
            table[96] = '@';
            table[124] = '¬';
            table[126] = '|';
        }
        Revision::X1967 => {}
    }
    table
}

fn x1963(code: u8) -> char {
    match code {
        // controls that survived into later revisions
        0 | 4 | 7 | 9..=15 | 17..=20 | 127 => char::from(code),
        94 => '↑',
        95 => '←',
        124 => '␆',
        126 => '␛',
        0..=31 | 96..=123 | 125 => BLANK,
        _ => char::from(code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_94_differs_by_revision() {
        assert_eq!(table(Revision::X1963)[94], '↑');
        assert_eq!(table(Revision::X1965)[94], '^');
        assert_eq!(table(Revision::X1967)[94], '^');
    }

    #[test]
    fn test_1963_has_no_lowercase() {
        let t = table(Revision::X1963);
        assert_eq!(t[b'a' as usize], BLANK);
        assert_eq!(t[b'A' as usize], 'A');
        assert_eq!(t[125], BLANK);
        assert_eq!(t[9], '\t');
        assert_eq!(t[1], BLANK);
    }

    #[test]
    fn test_1965_moved_characters() {
        let t = table(Revision::X1965);
        assert_eq!(t[64], '`');
        assert_eq!(t[96], '@');
        assert_eq!(t[124], '¬');
        assert_eq!(t[26], BLANK);
    }

    #[test]
    fn test_upper_half_is_blank() {
        for revision in [Revision::X1963, Revision::X1965, Revision::X1967] {
            let t = table(revision);
            assert!(t[0x80..].iter().all(|&c| c == BLANK));
        }
    }
}
