//! Single-byte character tables.
//!
//! Every table is total: all 256 byte values map to a character. Cells a
//! code page leaves unassigned hold U+FFFD so the family override can blank
//! them. Tables come from three places:
//!
//! - IBM PC (DOS) and EBCDIC pages embedded below
//! - WHATWG pages supplied by `encoding_rs`
//! - the historic ASA revisions in [`super::historic`]

use encoding_rs::Encoding as Whatwg;

use super::historic::{self, Revision};

pub type CharTable = [char; 256];

pub const REPLACEMENT: char = '\u{FFFD}';

/// Where a single-byte table is built from.
#[derive(Debug, Clone, Copy)]
pub enum Source {
    Dos(DosPage),
    Ebcdic(EbcdicPage),
    /// A WHATWG page decoded one byte at a time. `raw_c1` forces 0x80..=0x9F
    /// to the C1 controls, which the ISO 8859 parts reserve.
    Whatwg {
        encoding: &'static Whatwg,
        raw_c1: bool,
    },
    Latin1,
    Latin5,
    Thai,
    Historic(Revision),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DosPage {
    Cp437,
    Cp850,
    Cp852,
    Cp855,
    Cp858,
    Cp860,
    Cp862,
    Cp863,
    Cp865,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EbcdicPage {
    Cp037,
    Cp500,
    Cp1047,
    Cp1140,
}

/// Build the table for a source.
pub fn build(source: Source) -> CharTable {
    match source {
        Source::Dos(page) => dos(page),
        Source::Ebcdic(page) => ebcdic(page),
        Source::Whatwg { encoding, raw_c1 } => {
            let mut table = whatwg(encoding);
            if raw_c1 {
                c1(&mut table);
            }
            table
        }
        Source::Latin1 => identity(),
        Source::Latin5 => {
            let mut table = identity();
            patch(
                &mut table,
                &[
                    (0xD0, 'Ğ'),
                    (0xDD, 'İ'),
                    (0xDE, 'Ş'),
                    (0xF0, 'ğ'),
                    (0xFD, 'ı'),
                    (0xFE, 'ş'),
                ],
            );
            table
        }
        Source::Thai => {
            let mut table = whatwg(encoding_rs::WINDOWS_874);
            c1(&mut table);
            table
        }
        Source::Historic(revision) => historic::table(revision),
    }
}

/// Byte value as code point, which is ASCII below 0x80 and Latin-1 above.
pub fn identity() -> CharTable {
    let mut table = [REPLACEMENT; 256];
    for (i, cell) in table.iter_mut().enumerate() {
        *cell = char::from(i as u8);
    }
    table
}

fn whatwg(encoding: &'static Whatwg) -> CharTable {
    let mut table = [REPLACEMENT; 256];
    for (i, cell) in table.iter_mut().enumerate() {
        let byte = [i as u8];
        let (text, _) = encoding.decode_without_bom_handling(&byte);
        *cell = text.chars().next().unwrap_or(REPLACEMENT);
    }
    table
}

fn c1(table: &mut CharTable) {
    for b in 0x80..=0x9Fu8 {
        table[b as usize] = char::from(b);
    }
}

fn patch(table: &mut CharTable, cells: &[(u8, char)]) {
    for &(b, ch) in cells {
        table[b as usize] = ch;
    }
}

/// Overwrite consecutive cells starting at `start`.
fn overlay(table: &mut CharTable, start: usize, chars: &str) {
    for (i, ch) in chars.chars().enumerate() {
        if let Some(cell) = table.get_mut(start + i) {
            *cell = ch;
        }
    }
}

// Upper halves, one row of 16 per line.

const CP437_HIGH: &str = concat!(
    "ÇüéâäàåçêëèïîìÄÅ",
    "ÉæÆôöòûùÿÖÜ¢£¥₧ƒ",
    "áíóúñÑªº¿⌐¬½¼¡«»",
    "░▒▓│┤╡╢╖╕╣║╗╝╜╛┐",
    "└┴┬├─┼╞╟╚╔╩╦╠═╬╧",
    "╨╤╥╙╘╒╓╫╪┘┌█▄▌▐▀",
    "αßΓπΣσµτΦΘΩδ∞φε∩",
    "≡±≥≤⌠⌡÷≈°∙·√ⁿ²■\u{A0}",
);

const CP850_HIGH: &str = concat!(
    "ÇüéâäàåçêëèïîìÄÅ",
    "ÉæÆôöòûùÿÖÜø£Ø×ƒ",
    "áíóúñÑªº¿®¬½¼¡«»",
    "░▒▓│┤ÁÂÀ©╣║╗╝¢¥┐",
    "└┴┬├─┼ãÃ╚╔╩╦╠═╬¤",
    "ðÐÊËÈıÍÎÏ┘┌█▄¦Ì▀",
    "ÓßÔÒõÕµþÞÚÛÙýÝ¯´",
    "\u{AD}±‗¾¶§÷¸°¨·¹³²■\u{A0}",
);

const CP852_HIGH: &str = concat!(
    "ÇüéâäůćçłëŐőîŹÄĆ",
    "ÉĹĺôöĽľŚśÖÜŤťŁ×č",
    "áíóúĄąŽžĘę¬źČş«»",
    "░▒▓│┤ÁÂĚŞ╣║╗╝Żż┐",
    "└┴┬├─┼Ăă╚╔╩╦╠═╬¤",
    "đĐĎËďŇÍÎě┘┌█▄ŢŮ▀",
    "ÓßÔŃńňŠšŔÚŕŰýÝţ´",
    "\u{AD}˝˛ˇ˘§÷¸°¨˙űŘř■\u{A0}",
);

const CP855_HIGH: &str = concat!(
    "ђЂѓЃёЁєЄѕЅіІїЇјЈ",
    "љЉњЊћЋќЌўЎџЏюЮъЪ",
    "аАбБцЦдДеЕфФгГ«»",
    "░▒▓│┤хХиИ╣║╗╝йЙ┐",
    "└┴┬├─┼кК╚╔╩╦╠═╬¤",
    "лЛмМнНоОп┘┌█▄Пя▀",
    "ЯрРсСтТуУжЖвВьЬ№",
    "\u{AD}ыЫзЗшШэЭщЩчЧ§■\u{A0}",
);

// Portuguese, rows 0x80..=0xAF.
const CP860_DIFF: &str = concat!(
    "ÇüéâãàÁçêÊèÍÔìÃÂ",
    "ÉÀÈôõòÚùÌÕÜ¢£Ù₧Ó",
    "áíóúñÑªº¿Ò¬½¼¡«»",
);

// Canadian French, rows 0x80..=0xAF.
const CP863_DIFF: &str = concat!(
    "ÇüéâÂà¶çêëèïî‗À§",
    "ÉÈÊôËÏûù¤ÔÜ¢£ÙÛƒ",
    "¦´óú¨¸³¯Î⌐¬½¼¾«»",
);

fn dos(page: DosPage) -> CharTable {
    let mut table = identity();
    match page {
        DosPage::Cp850 | DosPage::Cp858 => overlay(&mut table, 0x80, CP850_HIGH),
        DosPage::Cp852 => overlay(&mut table, 0x80, CP852_HIGH),
        DosPage::Cp855 => overlay(&mut table, 0x80, CP855_HIGH),
        _ => overlay(&mut table, 0x80, CP437_HIGH),
    }
    match page {
        DosPage::Cp437 | DosPage::Cp850 | DosPage::Cp852 | DosPage::Cp855 => {}
        DosPage::Cp858 => patch(&mut table, &[(0xD5, '€')]),
        DosPage::Cp860 => overlay(&mut table, 0x80, CP860_DIFF),
        DosPage::Cp863 => overlay(&mut table, 0x80, CP863_DIFF),
        DosPage::Cp862 => {
            // Hebrew alef to tav
            for (i, cell) in table[0x80..=0x9A].iter_mut().enumerate() {
                *cell = char::from_u32(0x05D0 + i as u32).unwrap_or(REPLACEMENT);
            }
        }
        DosPage::Cp865 => patch(&mut table, &[(0x9B, 'ø'), (0x9D, 'Ø'), (0xAF, '¤')]),
    }
    table
}

// IBM CCSID 037, US/Canada.
#[rustfmt::skip]
const EBCDIC_037: [u16; 256] = [
    // 0x00
    0x0000, 0x0001, 0x0002, 0x0003, 0x009C, 0x0009, 0x0086, 0x007F,
    0x0097, 0x008D, 0x008E, 0x000B, 0x000C, 0x000D, 0x000E, 0x000F,
    // 0x10
    0x0010, 0x0011, 0x0012, 0x0013, 0x009D, 0x0085, 0x0008, 0x0087,
    0x0018, 0x0019, 0x0092, 0x008F, 0x001C, 0x001D, 0x001E, 0x001F,
    // 0x20
    0x0080, 0x0081, 0x0082, 0x0083, 0x0084, 0x000A, 0x0017, 0x001B,
    0x0088, 0x0089, 0x008A, 0x008B, 0x008C, 0x0005, 0x0006, 0x0007,
    // 0x30
    0x0090, 0x0091, 0x0016, 0x0093, 0x0094, 0x0095, 0x0096, 0x0004,
    0x0098, 0x0099, 0x009A, 0x009B, 0x0014, 0x0015, 0x009E, 0x001A,
    // 0x40
    0x0020, 0x00A0, 0x00E2, 0x00E4, 0x00E0, 0x00E1, 0x00E3, 0x00E5,
    0x00E7, 0x00F1, 0x00A2, 0x002E, 0x003C, 0x0028, 0x002B, 0x007C,
    // 0x50
    0x0026, 0x00E9, 0x00EA, 0x00EB, 0x00E8, 0x00ED, 0x00EE, 0x00EF,
    0x00EC, 0x00DF, 0x0021, 0x0024, 0x002A, 0x0029, 0x003B, 0x00AC,
    // 0x60
    0x002D, 0x002F, 0x00C2, 0x00C4, 0x00C0, 0x00C1, 0x00C3, 0x00C5,
    0x00C7, 0x00D1, 0x00A6, 0x002C, 0x0025, 0x005F, 0x003E, 0x003F,
    // 0x70
    0x00F8, 0x00C9, 0x00CA, 0x00CB, 0x00C8, 0x00CD, 0x00CE, 0x00CF,
    0x00CC, 0x0060, 0x003A, 0x0023, 0x0040, 0x0027, 0x003D, 0x0022,
    // 0x80
    0x00D8, 0x0061, 0x0062, 0x0063, 0x0064, 0x0065, 0x0066, 0x0067,
    0x0068, 0x0069, 0x00AB, 0x00BB, 0x00F0, 0x00FD, 0x00FE, 0x00B1,
    // 0x90
    0x00B0, 0x006A, 0x006B, 0x006C, 0x006D, 0x006E, 0x006F, 0x0070,
    0x0071, 0x0072, 0x00AA, 0x00BA, 0x00E6, 0x00B8, 0x00C6, 0x00A4,
    // 0xA0
    0x00B5, 0x007E, 0x0073, 0x0074, 0x0075, 0x0076, 0x0077, 0x0078,
    0x0079, 0x007A, 0x00A1, 0x00BF, 0x00D0, 0x00DD, 0x00DE, 0x00AE,
    // 0xB0
    0x005E, 0x00A3, 0x00A5, 0x00B7, 0x00A9, 0x00A7, 0x00B6, 0x00BC,
    0x00BD, 0x00BE, 0x005B, 0x005D, 0x00AF, 0x00A8, 0x00B4, 0x00D7,
    // 0xC0
    0x007B, 0x0041, 0x0042, 0x0043, 0x0044, 0x0045, 0x0046, 0x0047,
    0x0048, 0x0049, 0x00AD, 0x00F4, 0x00F6, 0x00F2, 0x00F3, 0x00F5,
    // 0xD0
    0x007D, 0x004A, 0x004B, 0x004C, 0x004D, 0x004E, 0x004F, 0x0050,
    0x0051, 0x0052, 0x00B9, 0x00FB, 0x00FC, 0x00F9, 0x00FA, 0x00FF,
    // 0xE0
    0x005C, 0x00F7, 0x0053, 0x0054, 0x0055, 0x0056, 0x0057, 0x0058,
    0x0059, 0x005A, 0x00B2, 0x00D4, 0x00D6, 0x00D2, 0x00D3, 0x00D5,
    // 0xF0
    0x0030, 0x0031, 0x0032, 0x0033, 0x0034, 0x0035, 0x0036, 0x0037,
    0x0038, 0x0039, 0x00B3, 0x00DB, 0x00DC, 0x00D9, 0x00DA, 0x009F,
];

fn ebcdic(page: EbcdicPage) -> CharTable {
    let mut table = [REPLACEMENT; 256];
    for (cell, &code) in table.iter_mut().zip(EBCDIC_037.iter()) {
        *cell = char::from_u32(u32::from(code)).unwrap_or(REPLACEMENT);
    }
    match page {
        EbcdicPage::Cp037 => {}
        EbcdicPage::Cp500 => patch(
            &mut table,
            &[
                (0x4A, '['),
                (0x4F, '!'),
                (0x5A, ']'),
                (0x5F, '^'),
                (0xB0, '¢'),
                (0xBA, '¬'),
                (0xBB, '|'),
            ],
        ),
        EbcdicPage::Cp1047 => patch(
            &mut table,
            &[
                (0x5F, '^'),
                (0xAD, '['),
                (0xB0, '¬'),
                (0xBA, 'Ý'),
                (0xBB, '¨'),
                (0xBD, ']'),
            ],
        ),
        EbcdicPage::Cp1140 => patch(&mut table, &[(0x9F, '€')]),
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dos_upper_halves_fill_the_table() {
        assert_eq!(CP437_HIGH.chars().count(), 128);
        assert_eq!(CP850_HIGH.chars().count(), 128);
        assert_eq!(CP852_HIGH.chars().count(), 128);
        assert_eq!(CP855_HIGH.chars().count(), 128);
        assert_eq!(CP860_DIFF.chars().count(), 48);
        assert_eq!(CP863_DIFF.chars().count(), 48);
    }

    #[test]
    fn test_cp437() {
        let table = build(Source::Dos(DosPage::Cp437));
        assert_eq!(table[0x41], 'A');
        assert_eq!(table[0x80], 'Ç');
        assert_eq!(table[0xB3], '│');
        assert_eq!(table[0xFB], '√');
        assert_eq!(table[0xFF], '\u{A0}');
    }

    #[test]
    fn test_dos_variants() {
        assert_eq!(build(Source::Dos(DosPage::Cp858))[0xD5], '€');
        assert_eq!(build(Source::Dos(DosPage::Cp850))[0xD5], 'ı');
        assert_eq!(build(Source::Dos(DosPage::Cp860))[0x84], 'ã');
        assert_eq!(build(Source::Dos(DosPage::Cp862))[0x80], 'א');
        assert_eq!(build(Source::Dos(DosPage::Cp862))[0x9A], 'ת');
        assert_eq!(build(Source::Dos(DosPage::Cp863))[0x86], '¶');
        assert_eq!(build(Source::Dos(DosPage::Cp865))[0x9B], 'ø');
        assert_eq!(build(Source::Dos(DosPage::Cp852))[0xA4], 'Ą');
        assert_eq!(build(Source::Dos(DosPage::Cp852))[0xFC], 'Ř');
        assert_eq!(build(Source::Dos(DosPage::Cp855))[0xA0], 'а');
        assert_eq!(build(Source::Dos(DosPage::Cp855))[0xEF], '№');
    }

    #[test]
    fn test_ebcdic_pages() {
        let cp037 = build(Source::Ebcdic(EbcdicPage::Cp037));
        assert_eq!(cp037[0xC1], 'A');
        assert_eq!(cp037[0x25], '\n');
        assert_eq!(cp037[0x15], '\u{85}');
        assert_eq!(cp037[0x4A], '¢');
        assert_eq!(build(Source::Ebcdic(EbcdicPage::Cp500))[0x4A], '[');
        assert_eq!(build(Source::Ebcdic(EbcdicPage::Cp1047))[0xAD], '[');
        assert_eq!(build(Source::Ebcdic(EbcdicPage::Cp1140))[0x9F], '€');
    }

    #[test]
    fn test_iso_parts_keep_c1() {
        let table = build(Source::Whatwg {
            encoding: encoding_rs::ISO_8859_5,
            raw_c1: true,
        });
        assert_eq!(table[0x85], '\u{85}');
        assert_eq!(table[0xB0], 'А');
    }

    #[test]
    fn test_latin5_and_thai() {
        let latin5 = build(Source::Latin5);
        assert_eq!(latin5[0xDD], 'İ');
        assert_eq!(latin5[0xE9], 'é');
        let thai = build(Source::Thai);
        assert_eq!(thai[0x80], '\u{80}');
        assert_eq!(thai[0xA1], 'ก');
    }
}
