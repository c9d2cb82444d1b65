//! Structural scanners
//!
//! Each scanner makes one pass over an in-memory buffer. [`scan`] and
//! [`inspect`] run them side by side on scoped threads. Every task reads the
//! same immutable buffer and returns its own result; the results are only
//! combined after all tasks are joined. One failed or panicked task fails
//! the whole join.

use std::thread::{self, ScopedJoinHandle};

use tracing::debug;

use super::{classify_bytes, LineBreak};
use crate::codec::{decoder, Encoding, Family};
use crate::error::{Error, Result};
use crate::sauce::{self, Sauce};

const ESC: char = '\u{1B}';

/// Unit of a scanned buffer, a byte or a decoded rune.
pub trait Unit: Copy + PartialEq {
    fn from_char(c: char) -> Option<Self>;
}

impl Unit for u8 {
    fn from_char(c: char) -> Option<Self> {
        u8::try_from(c).ok()
    }
}

impl Unit for char {
    fn from_char(c: char) -> Option<Self> {
        Some(c)
    }
}

/// Counts for one buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scan {
    pub columns: usize,
    pub controls: usize,
    pub lines: usize,
    pub words: usize,
}

/// Everything known about a buffer without converting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub encoding: &'static str,
    pub bytes: usize,
    pub runes: usize,
    pub line_break: LineBreak,
    pub scan: Scan,
    pub sauce: Option<Sauce>,
}

/// Longest run between breaks. The run after the last break counts, and a
/// buffer with no breaks is one run.
pub fn columns<T: Unit>(data: &[T], key: LineBreak) -> Result<usize> {
    let marker = marker(key)?;
    let mut width = 0;
    let mut start = 0;
    for pos in positions(data, &marker) {
        width = width.max(pos - start);
        start = pos + marker.len();
    }
    Ok(width.max(data.len() - start))
}

/// Number of ANSI control sequence introducers, `ESC [`.
pub fn controls<T: Unit>(data: &[T]) -> usize {
    match (T::from_char(ESC), T::from_char('[')) {
        (Some(esc), Some(bracket)) => positions(data, &[esc, bracket]).len(),
        _ => 0,
    }
}

/// Number of break markers. This is not the number of lines: a final line
/// with no trailing break is not counted.
pub fn lines<T: Unit>(data: &[T], key: LineBreak) -> Result<usize> {
    let marker = marker(key)?;
    Ok(positions(data, &marker).len())
}

/// Number of whitespace separated words made only of letters, digits and
/// punctuation. A one character word must be a letter or digit.
pub fn words(text: &str) -> usize {
    text.split_whitespace().filter(|w| is_word(w)).count()
}

/// Run every scanner over `data` in parallel.
pub fn scan(data: &[u8], key: LineBreak) -> Result<Scan> {
    thread::scope(|s| {
        let width = s.spawn(move || columns(data, key));
        let escapes = s.spawn(move || Ok::<_, Error>(controls(data)));
        let breaks = s.spawn(move || lines(data, key));
        let counted = s.spawn(move || Ok::<_, Error>(words(&String::from_utf8_lossy(data))));
        Ok(Scan {
            columns: join("columns", width)?,
            controls: join("controls", escapes)?,
            lines: join("lines", breaks)?,
            words: join("words", counted)?,
        })
    })
}

/// Classify `data`, then count its runes and run every scanner in parallel.
/// EBCDIC words are counted on the decoded text. A SAUCE record is reported
/// and left out of every count except `bytes`.
pub fn inspect(file: &[u8], encoding: &'static Encoding) -> Result<Report> {
    let sauce = sauce::find(file);
    let data = sauce.as_ref().map_or(file, |s| &file[..s.offset]);
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    let key = classify_bytes(data);
    debug!("Inspecting {} bytes as {} with {} breaks", data.len(), encoding.value, key);

    thread::scope(|s| {
        let runes = s.spawn(move || decoder::decode(data, encoding).map(|cells| cells.len()));
        let width = s.spawn(move || columns(data, key));
        let escapes = s.spawn(move || Ok::<_, Error>(controls(data)));
        let breaks = s.spawn(move || lines(data, key));
        let counted = s.spawn(move || {
            let text: String = if encoding.family == Family::Ebcdic {
                decoder::raw_chars(data, encoding).into_iter().collect()
            } else {
                String::from_utf8_lossy(data).into_owned()
            };
            Ok::<_, Error>(words(&text))
        });
        Ok(Report {
            encoding: encoding.name,
            bytes: file.len(),
            runes: join("runes", runes)?,
            line_break: key,
            scan: Scan {
                columns: join("columns", width)?,
                controls: join("controls", escapes)?,
                lines: join("lines", breaks)?,
                words: join("words", counted)?,
            },
            sauce,
        })
    })
}

fn join<T>(task: &'static str, handle: ScopedJoinHandle<'_, Result<T>>) -> Result<T> {
    handle.join().map_err(|_| Error::TaskFailed(task))?
}

fn marker<T: Unit>(key: LineBreak) -> Result<Vec<T>> {
    if !key.is_known() {
        return Err(Error::InvalidLineBreak);
    }
    key.runes()
        .iter()
        .map(|&c| T::from_char(c))
        .collect::<Option<Vec<T>>>()
        .ok_or(Error::InvalidLineBreak)
}

/// Start of every non-overlapping occurrence of `needle`.
fn positions<T: PartialEq>(data: &[T], needle: &[T]) -> Vec<usize> {
    let mut found = Vec::new();
    if needle.is_empty() {
        return found;
    }
    let mut i = 0;
    while i + needle.len() <= data.len() {
        if data[i..i + needle.len()] == *needle {
            found.push(i);
            i += needle.len();
        } else {
            i += 1;
        }
    }
    found
}

fn is_word(word: &str) -> bool {
    let Some(first) = word.chars().next() else {
        return false;
    };
    if first >= '\u{FFFD}' {
        return false;
    }
    if word.chars().nth(1).is_none() {
        return is_letter_or_digit(first);
    }
    word.chars().all(|c| is_letter_or_digit(c) || is_punctuation(c))
}

/// Letters and decimal digits. Fractions and superscripts are numbers but
/// not digits, so they do not make a word.
fn is_letter_or_digit(c: char) -> bool {
    c.is_alphabetic()
        || matches!(c,
            '0'..='9'
            | '\u{0660}'..='\u{0669}' | '\u{06F0}'..='\u{06F9}'
            | '\u{0966}'..='\u{096F}' | '\u{09E6}'..='\u{09EF}'
            | '\u{0E50}'..='\u{0E59}' | '\u{FF10}'..='\u{FF19}'
        )
}

/// Unicode punctuation (general category P), without the ASCII symbols
/// that are math or currency signs.
fn is_punctuation(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_punctuation() && !"$+<=>^`|~".contains(c);
    }
    matches!(c,
        '¡' | '§' | '«' | '¶' | '·' | '»' | '¿'
        | '\u{037E}' | '\u{0387}'
        | '\u{055A}'..='\u{055F}' | '\u{0589}' | '\u{058A}'
        | '\u{05BE}' | '\u{05C0}' | '\u{05C3}' | '\u{05C6}' | '\u{05F3}' | '\u{05F4}'
        | '\u{060C}' | '\u{060D}' | '\u{061B}' | '\u{061F}'
        | '\u{0E4F}' | '\u{0E5A}' | '\u{0E5B}'
        | '\u{2010}'..='\u{2027}' | '\u{2030}'..='\u{2043}'
        | '\u{2045}'..='\u{2051}' | '\u{2053}'..='\u{205E}'
        | '\u{2E00}'..='\u{2E4F}'
        | '\u{3001}'..='\u{3003}' | '\u{3008}'..='\u{3011}' | '\u{3014}'..='\u{301F}'
        | '\u{30FB}'
        | '\u{FF01}'..='\u{FF03}' | '\u{FF05}'..='\u{FF0A}' | '\u{FF0C}'..='\u{FF0F}'
        | '\u{FF1A}' | '\u{FF1B}' | '\u{FF1F}' | '\u{FF20}'
        | '\u{FF3B}'..='\u{FF3D}' | '\u{FF3F}' | '\u{FF5B}' | '\u{FF5D}'
        | '\u{FF5F}'..='\u{FF65}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::resolve;

    #[test]
    fn test_columns() {
        assert_eq!(columns(b"abc\nde\nfghij".as_slice(), LineBreak::Lf), Ok(5));
        assert_eq!(columns(b"abcdef\nde\n".as_slice(), LineBreak::Lf), Ok(6));
        assert_eq!(columns(b"no breaks".as_slice(), LineBreak::Lf), Ok(9));
        assert_eq!(columns(b"ab\r\ncdef\r\n".as_slice(), LineBreak::CrLf), Ok(4));
    }

    #[test]
    fn test_columns_over_runes() {
        let runes: Vec<char> = "╔══╗\n║☺║".chars().collect();
        assert_eq!(columns(&runes, LineBreak::Lf), Ok(4));
    }

    #[test]
    fn test_unknown_break_is_an_error() {
        assert_eq!(columns(b"abc".as_slice(), LineBreak::Unknown), Err(Error::InvalidLineBreak));
        assert_eq!(lines(b"abc".as_slice(), LineBreak::Unknown), Err(Error::InvalidLineBreak));
    }

    #[test]
    fn test_lines_counts_markers() {
        assert_eq!(lines(b"a\nb\nc\n".as_slice(), LineBreak::Lf), Ok(3));
        // no trailing break, so one short
        assert_eq!(lines(b"a\nb\nc".as_slice(), LineBreak::Lf), Ok(2));
        assert_eq!(lines(b"a\r\nb\r\n".as_slice(), LineBreak::CrLf), Ok(2));
        assert_eq!(lines(b"\xc1\x15\xc2\x15".as_slice(), LineBreak::Nl), Ok(2));
    }

    #[test]
    fn test_controls() {
        assert_eq!(controls(b"\x1b[0m\x1b[1;31mred\x1b[0m".as_slice()), 3);
        assert_eq!(controls(b"\x1b(B plain".as_slice()), 0);
        let runes: Vec<char> = "\u{1b}[5m".chars().collect();
        assert_eq!(controls(&runes), 1);
    }

    #[test]
    fn test_words() {
        assert_eq!(words("Hello, world! 123 -- ☺☺"), 4);
        assert_eq!(words("a 1 . ,"), 2);
        assert_eq!(words("café naïve 日本語。"), 3);
        assert_eq!(words("$100 a+b"), 0);
        assert_eq!(words(""), 0);
    }

    #[test]
    fn test_fractions_and_superscripts_are_not_words() {
        assert_eq!(words("« » ½ ²"), 0);
        assert_eq!(words("x² ½cup"), 0);
        assert_eq!(words("é ٣ ３"), 3);
    }

    #[test]
    fn test_scan() {
        let data = b"\x1b[1mBold\x1b[0m text\nsecond line here\n";
        let result = scan(data, LineBreak::Lf).unwrap();
        assert_eq!(
            result,
            Scan {
                columns: 17,
                controls: 2,
                lines: 2,
                words: 4,
            }
        );
    }

    #[test]
    fn test_scan_fails_without_a_break() {
        assert_eq!(scan(b"abc", LineBreak::Unknown), Err(Error::InvalidLineBreak));
    }

    #[test]
    fn test_inspect() {
        let cp437 = resolve("cp437").unwrap();
        let report = inspect(b"one two\r\nthree\r\n", cp437).unwrap();
        assert_eq!(report.line_break, LineBreak::CrLf);
        assert_eq!(report.bytes, 16);
        assert_eq!(report.runes, 16);
        assert_eq!(report.scan.lines, 2);
        assert_eq!(report.scan.words, 3);
        assert_eq!(report.scan.columns, 7);
    }

    #[test]
    fn test_inspect_ebcdic_words() {
        let cp037 = resolve("cp037").unwrap();
        let data = cp037.encode("HELLO WORLD").unwrap();
        let report = inspect(&data, cp037).unwrap();
        assert_eq!(report.scan.words, 2);
        assert_eq!(inspect(b"", cp037), Err(Error::EmptyInput));
    }

    #[test]
    fn test_inspect_reports_sauce() {
        let cp437 = resolve("cp437").unwrap();
        let mut data = b"one two\r\n".to_vec();
        data.push(0x1A);
        data.extend(crate::sauce::tests::record(0));
        let report = inspect(&data, cp437).unwrap();
        assert_eq!(report.bytes, 138);
        assert_eq!(report.runes, 9);
        assert_eq!(report.scan.words, 2);
        assert_eq!(report.scan.columns, 7);
        let sauce = report.sauce.unwrap();
        assert_eq!(sauce.title, "Sunset");
        assert_eq!(sauce.offset, 9);
        assert_eq!(inspect(b"one two\r\n", cp437).unwrap().sauce, None);
        assert_eq!(inspect(&crate::sauce::tests::record(0), cp437), Err(Error::EmptyInput));
    }

    #[test]
    fn test_panicked_task_fails_the_join() {
        let result: Result<usize> = thread::scope(|s| {
            let handle = s.spawn(|| -> Result<usize> { panic!("scanner crashed") });
            join("crash", handle)
        });
        assert_eq!(result, Err(Error::TaskFailed("crash")));
    }
}
