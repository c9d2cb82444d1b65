//! Encoding catalog
//!
//! The registry is built once, on first use, and never changes afterwards.
//! Names are matched without regard to case against the formal name, the
//! named value, the numeric value and every alias. Informal spellings such
//! as `CP-437`, `IBM437`, `windows1252` or `ISO8859-1` are shortened to a
//! known key before giving up. An unknown name is always an error.

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::{debug, warn};

use super::family::Family;
use super::historic::Revision;
use super::tables::{self, CharTable, DosPage, EbcdicPage, Source};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

/// How an encoding turns bytes into characters.
#[derive(Debug, Clone)]
pub enum Codec {
    SingleByte(Box<CharTable>),
    ShiftJis,
    Utf8,
    /// `sniff` lets a byte order mark override `order`.
    Utf16 { order: ByteOrder, sniff: bool },
    Utf32 { order: ByteOrder, sniff: bool },
}

#[derive(Debug, Clone)]
pub struct Encoding {
    /// Formal name, e.g. "IBM Code Page 437 (DOS, OEM-US)"
    pub name: &'static str,
    /// Named value, e.g. "cp437"
    pub value: &'static str,
    /// Numeric value, e.g. "437", empty when there is none
    pub numeric: &'static str,
    pub aliases: &'static [&'static str],
    pub family: Family,
    pub codec: Codec,
    picture: fn(char) -> char,
}

impl Encoding {
    /// Character for a byte before any control picture is applied.
    pub fn raw(&self, byte: u8) -> Option<char> {
        match &self.codec {
            Codec::SingleByte(table) => Some(table[byte as usize]),
            _ => None,
        }
    }

    /// Display character for a raw character.
    pub fn picture(&self, raw: char) -> char {
        (self.picture)(raw)
    }

    /// Reverse lookup of a raw character, for single-byte encodings and
    /// the ASCII range of UTF-8.
    pub fn encode_char(&self, ch: char) -> Option<u8> {
        match &self.codec {
            Codec::SingleByte(table) => table
                .iter()
                .position(|&c| c == ch)
                .and_then(|i| u8::try_from(i).ok()),
            Codec::Utf8 if ch.is_ascii() => Some(ch as u8),
            _ => None,
        }
    }

    /// Encode a whole string, failing on the first character with no byte.
    pub fn encode(&self, text: &str) -> Option<Vec<u8>> {
        text.chars().map(|c| self.encode_char(c)).collect()
    }

    pub fn is_single_byte(&self) -> bool {
        matches!(self.codec, Codec::SingleByte(_))
    }

    pub fn is_utf16_or_utf32(&self) -> bool {
        matches!(self.codec, Codec::Utf16 { .. } | Codec::Utf32 { .. })
    }

    pub fn alias(&self) -> &'static str {
        self.aliases.first().copied().unwrap_or("")
    }
}

/// A listing row describing one encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub name: &'static str,
    pub value: &'static str,
    pub numeric: &'static str,
    pub alias: &'static str,
    pub family: &'static str,
    /// Whether `table` can draw this encoding
    pub tabled: bool,
}

/// Resolve a name or alias to an encoding.
pub fn resolve(name: &str) -> Result<&'static Encoding> {
    let registry = registry();
    let key = name.trim().to_lowercase();
    if key.is_empty() {
        return Err(Error::UnknownEncoding(name.to_string()));
    }
    for candidate in candidates(&key) {
        if let Some(&i) = registry.index.get(&candidate) {
            return Ok(&registry.encodings[i]);
        }
    }
    debug!("No encoding matches {:?}", name);
    Err(Error::UnknownEncoding(name.to_string()))
}

/// Every registered encoding, in listing order.
pub fn all() -> &'static [Encoding] {
    &registry().encodings
}

pub fn rows() -> Vec<TableRow> {
    all()
        .iter()
        .map(|e| TableRow {
            name: e.name,
            value: e.value,
            numeric: e.numeric,
            alias: e.alias(),
            family: e.family.label(),
            tabled: !e.is_utf16_or_utf32(),
        })
        .collect()
}

struct Registry {
    encodings: Vec<Encoding>,
    index: HashMap<String, usize>,
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::build)
}

impl Registry {
    fn build() -> Self {
        let mut encodings = Vec::new();
        let mut index = HashMap::new();
        for def in definitions() {
            let i = encodings.len();
            let keys = [def.name, def.value, def.numeric]
                .into_iter()
                .chain(def.aliases.iter().copied())
                .filter(|k| !k.is_empty());
            for key in keys {
                let key = key.to_lowercase();
                if let Some(&existing) = index.get(&key) {
                    if existing == i {
                        continue;
                    }
                    warn!("Duplicate encoding key {:?} ignored (first used by #{})", key, existing);
                    continue;
                }
                index.insert(key, i);
            }
            encodings.push(def.into_encoding());
        }
        debug!("Encoding catalog ready with {} encodings", encodings.len());
        Self { encodings, index }
    }
}

/// The lowercased key followed by its shortened forms.
fn candidates(key: &str) -> Vec<String> {
    const PREFIXES: [&str; 11] = [
        "ibm code page ",
        "code page ",
        "cp-",
        "cp",
        "ibm-",
        "ibm",
        "oem-",
        "windows-",
        "windows",
        "win-",
        "win",
    ];
    const ISO: [&str; 6] = ["iso-8859-", "iso8859-", "iso8859_", "iso_8859-", "iso 8859-", "iso8859"];

    let mut out = vec![key.to_string()];
    for prefix in PREFIXES {
        if let Some(rest) = key.strip_prefix(prefix) {
            out.push(rest.to_string());
            // numeric values are stored without leading zeros
            let trimmed = rest.trim_start_matches('0');
            if !trimmed.is_empty() && trimmed != rest {
                out.push(trimmed.to_string());
            }
        }
    }
    for prefix in ISO {
        if let Some(rest) = key.strip_prefix(prefix) {
            out.push(format!("iso-8859-{}", rest));
        }
    }
    if key.chars().all(|c| c.is_ascii_digit()) {
        let trimmed = key.trim_start_matches('0');
        if !trimmed.is_empty() {
            out.push(trimmed.to_string());
        }
    }
    out
}

enum Kind {
    Table(Source),
    ShiftJis,
    Utf8,
    Utf16(ByteOrder, bool),
    Utf32(ByteOrder, bool),
}

struct Def {
    name: &'static str,
    value: &'static str,
    numeric: &'static str,
    aliases: &'static [&'static str],
    family: Family,
    kind: Kind,
}

impl Def {
    fn into_encoding(self) -> Encoding {
        let codec = match self.kind {
            Kind::Table(source) => Codec::SingleByte(Box::new(tables::build(source))),
            Kind::ShiftJis => Codec::ShiftJis,
            Kind::Utf8 => Codec::Utf8,
            Kind::Utf16(order, sniff) => Codec::Utf16 { order, sniff },
            Kind::Utf32(order, sniff) => Codec::Utf32 { order, sniff },
        };
        Encoding {
            name: self.name,
            value: self.value,
            numeric: self.numeric,
            aliases: self.aliases,
            family: self.family,
            codec,
            picture: self.family.override_fn(),
        }
    }
}

fn def(
    name: &'static str,
    value: &'static str,
    numeric: &'static str,
    aliases: &'static [&'static str],
    family: Family,
    kind: Kind,
) -> Def {
    Def {
        name,
        value,
        numeric,
        aliases,
        family,
        kind,
    }
}

fn iso(encoding: &'static encoding_rs::Encoding) -> Kind {
    Kind::Table(Source::Whatwg {
        encoding,
        raw_c1: true,
    })
}

fn whatwg(encoding: &'static encoding_rs::Encoding) -> Kind {
    Kind::Table(Source::Whatwg {
        encoding,
        raw_c1: false,
    })
}

fn definitions() -> Vec<Def> {
    use Family::*;
    use Kind::Table;
    vec![
        // EBCDIC
        def("IBM Code Page 037 (US/Canada Latin 1)", "cp037", "37",
            &["ibm037", "ebcdic", "ebcdic-cp-us", "ebcdic-cp-ca"], Ebcdic,
            Table(Source::Ebcdic(EbcdicPage::Cp037))),
        def("IBM Code Page 500 (International Latin 1)", "cp500", "500",
            &["ibm500", "ebcdic-cp-be", "ebcdic-cp-ch"], Ebcdic,
            Table(Source::Ebcdic(EbcdicPage::Cp500))),
        def("IBM Code Page 1047 (Open Systems Latin 1)", "cp1047", "1047",
            &["ibm1047"], Ebcdic,
            Table(Source::Ebcdic(EbcdicPage::Cp1047))),
        def("IBM Code Page 1140 (US/Canada Latin 1 plus €)", "cp1140", "1140",
            &["ibm01140", "ibm1140"], Ebcdic,
            Table(Source::Ebcdic(EbcdicPage::Cp1140))),
        // DOS
        def("IBM Code Page 437 (DOS, OEM-US)", "cp437", "437",
            &["msdos", "dos", "ibm437", "pc-8", "oem-us"], Dos,
            Table(Source::Dos(DosPage::Cp437))),
        def("IBM Code Page 850 (DOS, Latin 1)", "cp850", "850",
            &["ibm850", "dos-latin-1"], Dos,
            Table(Source::Dos(DosPage::Cp850))),
        def("IBM Code Page 852 (DOS, Latin 2)", "cp852", "852",
            &["ibm852", "dos-latin-2"], Dos,
            Table(Source::Dos(DosPage::Cp852))),
        def("IBM Code Page 855 (DOS, Cyrillic)", "cp855", "855",
            &["ibm855"], Dos,
            Table(Source::Dos(DosPage::Cp855))),
        def("IBM Code Page 858 (DOS, Latin 1 plus €)", "cp858", "858",
            &["ibm00858", "ibm858"], Dos,
            Table(Source::Dos(DosPage::Cp858))),
        def("IBM Code Page 860 (DOS, Portuguese)", "cp860", "860",
            &["ibm860", "dos-portuguese"], Dos,
            Table(Source::Dos(DosPage::Cp860))),
        def("IBM Code Page 862 (DOS, Hebrew)", "cp862", "862",
            &["ibm862", "dos-hebrew"], Dos,
            Table(Source::Dos(DosPage::Cp862))),
        def("IBM Code Page 863 (DOS, Canadian French)", "cp863", "863",
            &["ibm863", "dos-canadian-french"], Dos,
            Table(Source::Dos(DosPage::Cp863))),
        def("IBM Code Page 865 (DOS, Nordic)", "cp865", "865",
            &["ibm865", "dos-nordic"], Dos,
            Table(Source::Dos(DosPage::Cp865))),
        def("IBM Code Page 866 (DOS, Cyrillic Russian)", "cp866", "866",
            &["ibm866", "dos-cyrillic"], Dos,
            whatwg(encoding_rs::IBM866)),
        // ISO 8859
        def("ISO 8859-1 (Western European)", "iso-8859-1", "1",
            &["latin1", "l1", "iso-ir-100"], Latin, Table(Source::Latin1)),
        def("ISO 8859-2 (Central European)", "iso-8859-2", "2",
            &["latin2", "l2"], Latin, iso(encoding_rs::ISO_8859_2)),
        def("ISO 8859-3 (South European)", "iso-8859-3", "3",
            &["latin3", "l3"], Latin, iso(encoding_rs::ISO_8859_3)),
        def("ISO 8859-4 (North European)", "iso-8859-4", "4",
            &["latin4", "l4"], Latin, iso(encoding_rs::ISO_8859_4)),
        def("ISO 8859-5 (Cyrillic)", "iso-8859-5", "5",
            &["cyrillic"], Latin, iso(encoding_rs::ISO_8859_5)),
        def("ISO 8859-6 (Arabic)", "iso-8859-6", "6",
            &["arabic"], Latin, iso(encoding_rs::ISO_8859_6)),
        def("ISO 8859-6-E (Arabic, explicit)", "iso-8859-6-e", "",
            &["iso_8859-6-e", "csiso88596e"], Latin, iso(encoding_rs::ISO_8859_6)),
        def("ISO 8859-6-I (Arabic, implicit)", "iso-8859-6-i", "",
            &["iso_8859-6-i", "csiso88596i"], Latin, iso(encoding_rs::ISO_8859_6)),
        def("ISO 8859-7 (Greek)", "iso-8859-7", "7",
            &["greek"], Latin, iso(encoding_rs::ISO_8859_7)),
        def("ISO 8859-8 (Hebrew)", "iso-8859-8", "8",
            &["hebrew"], Latin, iso(encoding_rs::ISO_8859_8)),
        def("ISO 8859-8-E (Hebrew, explicit)", "iso-8859-8-e", "",
            &["iso_8859-8-e", "csiso88598e"], Latin, iso(encoding_rs::ISO_8859_8)),
        def("ISO 8859-8-I (Hebrew, logical)", "iso-8859-8-i", "",
            &["iso_8859-8-i", "csiso88598i", "logical"], Latin, iso(encoding_rs::ISO_8859_8_I)),
        def("ISO 8859-9 (Turkish)", "iso-8859-9", "9",
            &["latin5", "l5"], Latin, Table(Source::Latin5)),
        def("ISO 8859-10 (Nordic)", "iso-8859-10", "10",
            &["latin6", "l6"], Latin, iso(encoding_rs::ISO_8859_10)),
        def("ISO 8859-11 (Thai)", "iso-8859-11", "11",
            &["iso885911", "tis-620"], Latin, Table(Source::Thai)),
        def("ISO 8859-13 (Baltic Rim)", "iso-8859-13", "13",
            &["latin7", "l7"], Latin, iso(encoding_rs::ISO_8859_13)),
        def("ISO 8859-14 (Celtic)", "iso-8859-14", "14",
            &["latin8", "l8"], Latin, iso(encoding_rs::ISO_8859_14)),
        def("ISO 8859-15 (Western European plus €)", "iso-8859-15", "15",
            &["latin9", "l9"], Latin, iso(encoding_rs::ISO_8859_15)),
        def("ISO 8859-16 (South-Eastern European)", "iso-8859-16", "16",
            &["latin10", "l10"], Latin, iso(encoding_rs::ISO_8859_16)),
        // Windows
        def("Windows 874 (Thai)", "windows-874", "874",
            &["win874"], Windows, whatwg(encoding_rs::WINDOWS_874)),
        def("Windows 1250 (Central European)", "windows-1250", "1250",
            &["win1250"], Windows, whatwg(encoding_rs::WINDOWS_1250)),
        def("Windows 1251 (Cyrillic)", "windows-1251", "1251",
            &["win1251"], Windows, whatwg(encoding_rs::WINDOWS_1251)),
        def("Windows 1252 (Western European)", "windows-1252", "1252",
            &["win1252"], Windows, whatwg(encoding_rs::WINDOWS_1252)),
        def("Windows 1253 (Greek)", "windows-1253", "1253",
            &["win1253"], Windows, whatwg(encoding_rs::WINDOWS_1253)),
        def("Windows 1254 (Turkish)", "windows-1254", "1254",
            &["win1254"], Windows, whatwg(encoding_rs::WINDOWS_1254)),
        def("Windows 1255 (Hebrew)", "windows-1255", "1255",
            &["win1255"], Windows, whatwg(encoding_rs::WINDOWS_1255)),
        def("Windows 1256 (Arabic)", "windows-1256", "1256",
            &["win1256"], Windows, whatwg(encoding_rs::WINDOWS_1256)),
        def("Windows 1257 (Baltic Rim)", "windows-1257", "1257",
            &["win1257"], Windows, whatwg(encoding_rs::WINDOWS_1257)),
        def("Windows 1258 (Vietnamese)", "windows-1258", "1258",
            &["win1258"], Windows, whatwg(encoding_rs::WINDOWS_1258)),
        // KOI8 and Macintosh
        def("KOI8-R (Russian)", "koi8-r", "878",
            &["koi8", "cskoi8r"], Koi8, whatwg(encoding_rs::KOI8_R)),
        def("KOI8-U (Ukrainian)", "koi8-u", "1168",
            &["koi8-ru"], Koi8, whatwg(encoding_rs::KOI8_U)),
        def("Macintosh (Mac OS Roman)", "macintosh", "10000",
            &["mac", "mac-roman", "macos-roman", "x-mac-roman"], Macintosh,
            whatwg(encoding_rs::MACINTOSH)),
        def("Macintosh Cyrillic", "x-mac-cyrillic", "10007",
            &["mac-cyrillic", "maccyrillic", "x-mac-ukrainian"], Macintosh,
            whatwg(encoding_rs::X_MAC_CYRILLIC)),
        // Japanese
        def("Shift JIS (Japanese)", "shift_jis", "932",
            &["shift-jis", "sjis", "ms_kanji", "csshiftjis"], ShiftJis, Kind::ShiftJis),
        // Unicode
        def("UTF-8", "utf-8", "65001", &["utf8"], Unicode, Kind::Utf8),
        def("UTF-16", "utf-16", "", &["utf16"], Unicode,
            Kind::Utf16(ByteOrder::Big, true)),
        def("UTF-16BE (Big Endian)", "utf-16be", "1201", &["utf16be"], Unicode,
            Kind::Utf16(ByteOrder::Big, false)),
        def("UTF-16LE (Little Endian)", "utf-16le", "1200", &["utf16le"], Unicode,
            Kind::Utf16(ByteOrder::Little, false)),
        def("UTF-32", "utf-32", "", &["utf32"], Unicode,
            Kind::Utf32(ByteOrder::Little, true)),
        def("UTF-32BE (Big Endian)", "utf-32be", "12001", &["utf32be"], Unicode,
            Kind::Utf32(ByteOrder::Big, false)),
        def("UTF-32LE (Little Endian)", "utf-32le", "12000", &["utf32le"], Unicode,
            Kind::Utf32(ByteOrder::Little, false)),
        // Historic ASCII
        def("ASA X3.4 1963", "ascii-63", "1963", &["x3.4-1963"], Historic,
            Table(Source::Historic(Revision::X1963))),
        def("ASA X3.4 1965", "ascii-65", "1965", &["x3.4-1965"], Historic,
            Table(Source::Historic(Revision::X1965))),
        def("ANSI X3.4 1967/77/86", "ascii-67", "1967",
            &["ansi", "ascii", "us-ascii", "x3.4-1967", "x3.4-1986"], Historic,
            Table(Source::Historic(Revision::X1967))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve_to_the_same_encoding() {
        let expected = resolve("cp437").unwrap().value;
        for name in ["CP437", "437", "ibm437", "IBM-437", "cp-437", "msdos", " Dos ", "IBM Code Page 437 (DOS, OEM-US)"] {
            assert_eq!(resolve(name).unwrap().value, expected, "{}", name);
        }
    }

    #[test]
    fn test_dos_and_mac_cyrillic_pages() {
        let cases: [(&str, &[&str]); 5] = [
            ("cp852", &["CP852", "IBM852", "852", "dos-latin-2"]),
            ("cp855", &["ibm-855", "855"]),
            ("x-mac-cyrillic", &["Mac-Cyrillic", "10007"]),
            ("iso-8859-6-e", &["ISO_8859-6-E"]),
            ("iso-8859-8-i", &["iso_8859-8-i", "logical"]),
        ];
        for (value, names) in cases {
            for name in names {
                assert_eq!(resolve(name).unwrap().value, value, "{}", name);
            }
        }
        let cyrillic = resolve("x-mac-cyrillic").unwrap();
        assert_eq!(cyrillic.raw(0x80), Some('А'));
        assert_eq!(cyrillic.family, Family::Macintosh);
        assert_eq!(resolve("cp852").unwrap().raw(0xA5), Some('ą'));
    }

    #[test]
    fn test_informal_names() {
        assert_eq!(resolve("windows1252").unwrap().value, "windows-1252");
        assert_eq!(resolve("win-1252").unwrap().value, "windows-1252");
        assert_eq!(resolve("cp1252").unwrap().value, "windows-1252");
        assert_eq!(resolve("ISO8859-1").unwrap().value, "iso-8859-1");
        assert_eq!(resolve("iso 8859-15").unwrap().value, "iso-8859-15");
        assert_eq!(resolve("iso885911").unwrap().value, "iso-8859-11");
        assert_eq!(resolve("037").unwrap().value, "cp037");
        assert_eq!(resolve("ibm00858").unwrap().value, "cp858");
        assert_eq!(resolve("Shift-JIS").unwrap().value, "shift_jis");
    }

    #[test]
    fn test_historic_revisions() {
        assert_eq!(resolve("ascii-63").unwrap().name, "ASA X3.4 1963");
        assert_eq!(resolve("1965").unwrap().value, "ascii-65");
        assert_eq!(resolve("ANSI").unwrap().value, "ascii-67");
    }

    #[test]
    fn test_unknown_never_defaults() {
        assert_eq!(
            resolve("klingon").unwrap_err(),
            Error::UnknownEncoding("klingon".to_string())
        );
        assert!(resolve("").is_err());
        assert!(resolve("cp").is_err());
    }

    #[test]
    fn test_keys_are_unique() {
        // a duplicate key would silently shadow a later encoding
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        for e in all() {
            let keys: HashSet<String> = [e.name, e.value, e.numeric]
                .iter()
                .chain(e.aliases.iter())
                .filter(|k| !k.is_empty())
                .map(|k| k.to_lowercase())
                .collect();
            for key in keys {
                assert!(seen.insert(key.clone()), "duplicate key {}", key);
            }
        }
    }

    #[test]
    fn test_encode_char() {
        let cp437 = resolve("cp437").unwrap();
        assert_eq!(cp437.encode_char('√'), Some(0xFB));
        assert_eq!(cp437.encode_char('€'), None);
        let cp037 = resolve("cp037").unwrap();
        assert_eq!(cp037.encode("Hi"), Some(vec![0xC8, 0x89]));
        assert_eq!(resolve("utf-16").unwrap().encode_char('A'), None);
    }

    #[test]
    fn test_rows() {
        let rows = rows();
        assert_eq!(rows.len(), all().len());
        let utf16 = rows.iter().find(|r| r.value == "utf-16").unwrap();
        assert!(!utf16.tabled);
        let cp437 = rows.iter().find(|r| r.value == "cp437").unwrap();
        assert_eq!(cp437.alias, "msdos");
        assert_eq!(cp437.family, "DOS");
    }
}
