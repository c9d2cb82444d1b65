//! Encoding families and their control picture overrides.
//!
//! Each family carries exactly one override function. The catalog picks it
//! when an encoding is registered, so decoding never inspects the family
//! again. An override receives the raw character from the table and returns
//! the character to display, which is the raw character when nothing applies.

const DEL: char = '\u{7F}';
const NEL: char = '\u{85}';
const BLANK: char = ' ';

/// Symbol for delete, U+2421.
pub const DEL_PICTURE: char = '␡';

/// IBM PC glyphs for 0x00..=0x1F.
#[rustfmt::skip]
pub const DOS_C0: [char; 32] = [
    '␀', '☺', '☻', '♥', '♦', '♣', '♠', '•', '◘', '○', '◙', '♂', '♀', '♪', '♫', '☼',
    '►', '◄', '↕', '‼', '¶', '§', '▬', '↨', '↑', '↓', '→', '←', '∟', '↔', '▲', '▼',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Ebcdic,
    Dos,
    Macintosh,
    Koi8,
    Windows,
    Latin,
    ShiftJis,
    Unicode,
    Historic,
}

impl Family {
    /// The override for this family.
    pub fn override_fn(self) -> fn(char) -> char {
        match self {
            Family::Ebcdic => ebcdic,
            Family::Dos => dos,
            Family::Macintosh => macintosh,
            Family::Koi8 => koi8,
            Family::Windows => windows,
            Family::Latin => latin,
            Family::ShiftJis | Family::Unicode | Family::Historic => unicode,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Family::Ebcdic => "EBCDIC",
            Family::Dos => "DOS",
            Family::Macintosh => "Macintosh",
            Family::Koi8 => "KOI8",
            Family::Windows => "Windows",
            Family::Latin => "ISO 8859",
            Family::ShiftJis => "Japanese",
            Family::Unicode => "Unicode",
            Family::Historic => "ASA ASCII",
        }
    }
}

/// Control Pictures block symbol for a C0 control, or DEL.
pub fn control_picture(raw: char) -> Option<char> {
    match raw {
        '\0'..='\u{1F}' => char::from_u32(0x2400 + raw as u32),
        DEL => Some(DEL_PICTURE),
        _ => None,
    }
}

fn is_c0(c: char) -> bool {
    c < ' '
}

fn is_c1(c: char) -> bool {
    ('\u{80}'..='\u{9F}').contains(&c)
}

fn unicode(raw: char) -> char {
    control_picture(raw).unwrap_or(raw)
}

fn ebcdic(raw: char) -> char {
    match raw {
        NEL => '␤',
        c if is_c1(c) => BLANK,
        c => unicode(c),
    }
}

fn dos(raw: char) -> char {
    match raw {
        c if is_c0(c) => DOS_C0[c as usize],
        DEL => '⌂',
        c => c,
    }
}

fn macintosh(raw: char) -> char {
    match raw {
        '\u{11}' => '⌘',
        '\u{12}' => '⇧',
        '\u{13}' => '⌥',
        '\u{14}' => '⌃',
        '\u{FFFD}' => BLANK,
        c => unicode(c),
    }
}

fn koi8(raw: char) -> char {
    match raw {
        c if is_c0(c) => BLANK,
        DEL | '\u{FFFD}' => BLANK,
        c => c,
    }
}

fn windows(raw: char) -> char {
    match raw {
        c if is_c1(c) => BLANK,
        '\u{FFFD}' => BLANK,
        c => unicode(c),
    }
}

fn latin(raw: char) -> char {
    match raw {
        c if is_c0(c) || is_c1(c) => BLANK,
        '\u{FFFD}' => BLANK,
        c => unicode(c),
    }
}
