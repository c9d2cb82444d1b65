//! SAUCE metadata records
//!
//! Art and text from BBS archives often ends with a 128 byte `SAUCE00`
//! record, optionally preceded by a `COMNT` block of 64 byte comment lines
//! and an end-of-file byte:
//!
//! ```text
//! body ── [SUB] ── [COMNT line line ...] ── SAUCE00 record (128 bytes)
//! ```
//!
//! The record describes the body but is not part of it. [`find`] reads it
//! and [`strip`] cuts it off before conversion.

use tracing::debug;

use crate::codec::{decoder, resolve};

const RECORD_LEN: usize = 128;
const COMMENT_LEN: usize = 64;
const ID: &[u8] = b"SAUCE00";
const COMMENT_ID: &[u8] = b"COMNT";
const SUB: u8 = 0x1A;

const DATA_TYPES: [&str; 9] = [
    "None",
    "Character",
    "Bitmap",
    "Vector",
    "Audio",
    "BinaryText",
    "XBin",
    "Archive",
    "Executable",
];

const CHARACTER_TYPES: [&str; 9] = [
    "ASCII",
    "ANSI",
    "ANSiMation",
    "RIPScript",
    "PCBoard",
    "Avatar",
    "HTML",
    "Source",
    "TundraDraw",
];

/// A parsed SAUCE record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sauce {
    /// Where the metadata starts, counting the comment block and a leading
    /// end-of-file byte. Everything before it is the body.
    pub offset: usize,
    pub title: String,
    pub author: String,
    pub group: String,
    /// CCYYMMDD as stored.
    pub date: String,
    pub file_size: u32,
    pub data_type: u8,
    pub file_type: u8,
    pub info: [u16; 4],
    pub flags: u8,
    pub font: String,
    pub comments: Vec<String>,
}

impl Sauce {
    /// Name of the data and file type, e.g. `Character/ANSI`.
    pub fn kind(&self) -> String {
        let data = DATA_TYPES.get(self.data_type as usize).copied().unwrap_or("Unknown");
        match (self.data_type, CHARACTER_TYPES.get(self.file_type as usize)) {
            (1, Some(file)) => format!("{}/{}", data, file),
            (1, None) => format!("{}/{}", data, self.file_type),
            _ => data.to_string(),
        }
    }

    /// Date as `CCYY-MM-DD`, or `None` when the field is not eight digits.
    pub fn iso_date(&self) -> Option<String> {
        let d = self.date.as_bytes();
        if d.len() != 8 || !d.iter().all(u8::is_ascii_digit) {
            return None;
        }
        Some(format!("{}-{}-{}", &self.date[0..4], &self.date[4..6], &self.date[6..8]))
    }

    /// Character width and height, for character types that store them.
    pub fn dimensions(&self) -> Option<(u16, u16)> {
        match (self.data_type, self.file_type) {
            (1, 0..=2 | 4 | 5 | 8) | (6, _) if self.info[0] > 0 => {
                Some((self.info[0], self.info[1]))
            }
            _ => None,
        }
    }

    /// Non-blinking background colours ("iCE colours").
    pub fn ice_colors(&self) -> bool {
        matches!(self.data_type, 1 | 5) && self.flags & 1 != 0
    }
}

/// Read the SAUCE record at the end of `data`, if there is one.
pub fn find(data: &[u8]) -> Option<Sauce> {
    let start = data.len().checked_sub(RECORD_LEN)?;
    let record = &data[start..];
    if !record.starts_with(ID) {
        return None;
    }

    let mut offset = start;
    let mut comments = Vec::new();
    let lines = record[104] as usize;
    if lines > 0 {
        let block = COMMENT_ID.len() + lines * COMMENT_LEN;
        match start.checked_sub(block) {
            Some(at) if data[at..].starts_with(COMMENT_ID) => {
                comments = data[at + COMMENT_ID.len()..start]
                    .chunks(COMMENT_LEN)
                    .map(field)
                    .collect();
                offset = at;
            }
            _ => debug!("SAUCE record names {} comment lines but has no block", lines),
        }
    }
    if offset > 0 && data[offset - 1] == SUB {
        offset -= 1;
    }

    Some(Sauce {
        offset,
        title: field(&record[7..42]),
        author: field(&record[42..62]),
        group: field(&record[62..82]),
        date: field(&record[82..90]),
        file_size: u32::from_le_bytes([record[90], record[91], record[92], record[93]]),
        data_type: record[94],
        file_type: record[95],
        info: [le16(record, 96), le16(record, 98), le16(record, 100), le16(record, 102)],
        flags: record[105],
        font: field(&record[106..128]),
        comments,
    })
}

/// `data` without its SAUCE metadata.
pub fn strip(data: &[u8]) -> &[u8] {
    match find(data) {
        Some(sauce) => &data[..sauce.offset],
        None => data,
    }
}

fn le16(record: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([record[at], record[at + 1]])
}

/// A fixed width text field: CP437, padded with spaces or NULs.
fn field(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|&b| b != b' ' && b != 0)
        .map_or(0, |i| i + 1);
    let bytes = &bytes[..end];
    match resolve("cp437") {
        Ok(cp437) => decoder::raw_chars(bytes, cp437).into_iter().collect(),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn pad(text: &[u8], len: usize) -> Vec<u8> {
        let mut out = text.to_vec();
        out.resize(len, b' ');
        out
    }

    /// A record for an 80x25 ANSI file with iCE colours.
    pub(crate) fn record(comments: u8) -> Vec<u8> {
        let mut r = b"SAUCE00".to_vec();
        r.extend(pad(b"Sunset", 35));
        r.extend(pad(b"Ren\x82", 20));
        r.extend(pad(b"ACiD", 20));
        r.extend(b"19960731");
        r.extend(1234u32.to_le_bytes());
        r.extend([1, 1]);
        r.extend(80u16.to_le_bytes());
        r.extend(25u16.to_le_bytes());
        r.extend([0, 0, 0, 0]);
        r.push(comments);
        r.push(1);
        let mut font = b"IBM VGA".to_vec();
        font.resize(22, 0);
        r.extend(font);
        r
    }

    #[test]
    fn test_record_fields() {
        let mut data = b"art".to_vec();
        data.push(SUB);
        data.extend(record(0));
        let sauce = find(&data).unwrap();
        assert_eq!(sauce.offset, 3);
        assert_eq!(sauce.title, "Sunset");
        assert_eq!(sauce.author, "René");
        assert_eq!(sauce.group, "ACiD");
        assert_eq!(sauce.iso_date().as_deref(), Some("1996-07-31"));
        assert_eq!(sauce.file_size, 1234);
        assert_eq!(sauce.kind(), "Character/ANSI");
        assert_eq!(sauce.dimensions(), Some((80, 25)));
        assert!(sauce.ice_colors());
        assert_eq!(sauce.font, "IBM VGA");
        assert!(sauce.comments.is_empty());
    }

    #[test]
    fn test_comment_block() {
        let mut data = b"art".to_vec();
        data.extend(b"COMNT");
        data.extend(pad(b"first line", 64));
        data.extend(pad(b"second line", 64));
        data.extend(record(2));
        let sauce = find(&data).unwrap();
        assert_eq!(sauce.offset, 3);
        assert_eq!(sauce.comments, vec!["first line", "second line"]);
    }

    #[test]
    fn test_missing_comment_block_keeps_the_record() {
        let mut data = b"art".to_vec();
        data.extend(record(3));
        let sauce = find(&data).unwrap();
        assert_eq!(sauce.offset, 3);
        assert!(sauce.comments.is_empty());
    }

    #[test]
    fn test_no_record() {
        assert_eq!(find(b"plain text"), None);
        assert_eq!(find(b"\x1aSAUCE00"), None);
        let mut data = record(0);
        data.push(b'\n');
        assert_eq!(find(&data), None);
    }

    #[test]
    fn test_strip() {
        let mut data = b"body\r\n".to_vec();
        data.push(SUB);
        data.extend(record(0));
        assert_eq!(strip(&data), b"body\r\n");
        assert_eq!(strip(b"body"), b"body");
        // a record on its own leaves nothing behind
        assert_eq!(strip(&record(0)), b"");
    }

    #[test]
    fn test_kind_names() {
        let mut sauce = Sauce { data_type: 1, file_type: 8, ..Sauce::default() };
        assert_eq!(sauce.kind(), "Character/TundraDraw");
        sauce.file_type = 42;
        assert_eq!(sauce.kind(), "Character/42");
        sauce.data_type = 6;
        assert_eq!(sauce.kind(), "XBin");
        sauce.data_type = 200;
        assert_eq!(sauce.kind(), "Unknown");
        assert_eq!(Sauce::default().iso_date(), None);
    }
}
