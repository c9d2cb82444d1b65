//! Built-in sample texts.

use crate::codec;
use crate::error::{Error, Result};
use crate::pipeline::Mode;

#[derive(Debug, Clone, Copy)]
enum Body {
    Bytes(&'static [u8]),
    /// Unicode text encoded with the sample's single-byte encoding
    Encoded(&'static str),
    Utf16Be(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub name: &'static str,
    pub encoding: &'static str,
    pub mode: Mode,
    pub description: &'static str,
    body: Body,
}

impl Sample {
    /// Raw bytes of the sample, in its own encoding.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        match self.body {
            Body::Bytes(b) => Ok(b.to_vec()),
            Body::Encoded(text) => codec::resolve(self.encoding)?.encode(text).ok_or(
                Error::UnsupportedEncoding {
                    name: self.encoding.to_string(),
                    operation: "sample encoding",
                },
            ),
            Body::Utf16Be(text) => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
        }
    }
}

const SAMPLES: [Sample; 11] = [
    Sample {
        name: "037",
        encoding: "cp037",
        mode: Mode::Text,
        description: "EBCDIC 037 IBM mainframe text",
        body: Body::Encoded(
            "EBCDIC IS THE CHARACTER ENCODING OF IBM MAINFRAMES.\u{85}\
             It is not compatible with ASCII: A is 0xC1, a is 0x81.\u{85}",
        ),
    },
    Sample {
        name: "437.cr",
        encoding: "cp437",
        mode: Mode::Text,
        description: "CP-437 text with CR line breaks",
        body: Body::Bytes(b"\xc9\xcd\xcd\xcd\xbb\r\xba \x01 \xba CR breaks, \xb0\xb1\xb2\xdb\r\xc8\xcd\xcd\xcd\xbc\r"),
    },
    Sample {
        name: "437.crlf",
        encoding: "cp437",
        mode: Mode::Text,
        description: "CP-437 text with CRLF line breaks",
        body: Body::Bytes(b"\xc9\xcd\xcd\xcd\xbb\r\n\xba \x01 \xba CRLF breaks, \xb0\xb1\xb2\xdb\r\n\xc8\xcd\xcd\xcd\xbc\r\n"),
    },
    Sample {
        name: "437.lf",
        encoding: "cp437",
        mode: Mode::Text,
        description: "CP-437 text with LF line breaks",
        body: Body::Bytes(b"\xc9\xcd\xcd\xcd\xbb\n\xba \x01 \xba LF breaks, \xb0\xb1\xb2\xdb\n\xc8\xcd\xcd\xcd\xbc\n"),
    },
    Sample {
        name: "1252",
        encoding: "windows-1252",
        mode: Mode::Text,
        description: "Windows-1252 English text",
        body: Body::Bytes(b"\x93Smart quotes\x94, an ellipsis\x85 and the \x80 sign.\r\n"),
    },
    Sample {
        name: "ansi",
        encoding: "cp437",
        mode: Mode::Ansi,
        description: "CP-437 ANSI art with colour escapes",
        body: Body::Bytes(b"\x1b[0;1;33m\xdb\xdb\xb2\xb1\xb0 \x1b[36mANSI \x1b[33m\xb0\xb1\xb2\xdb\xdb\x1b[0m\r\n\x1aSAUCE00"),
    },
    Sample {
        name: "iso-1",
        encoding: "iso-8859-1",
        mode: Mode::Text,
        description: "ISO 8859-1 Western European text",
        body: Body::Bytes(b"Caf\xe9, na\xefve, \xa9 1987, \xbd price.\n"),
    },
    Sample {
        name: "shiftjis",
        encoding: "shift_jis",
        mode: Mode::Text,
        description: "Shift JIS Japanese greeting",
        body: Body::Bytes(b"\x82\xb1\x82\xf1\x82\xc9\x82\xbf\x82\xcd \xba\xdd\xc6\xc1\xca\n"),
    },
    Sample {
        name: "us-ascii",
        encoding: "ascii-67",
        mode: Mode::Text,
        description: "ANSI X3.4 1967 US-ASCII text",
        body: Body::Bytes(b"US-ASCII: @ [ \\ ] ^ _ ` { | } ~\n"),
    },
    Sample {
        name: "utf8",
        encoding: "utf-8",
        mode: Mode::Text,
        description: "UTF-8 text with box drawing",
        body: Body::Bytes("\u{feff}╔═══╗ UTF-8 café ☺\n╚═══╝\n".as_bytes()),
    },
    Sample {
        name: "utf16.be",
        encoding: "utf-16be",
        mode: Mode::Text,
        description: "UTF-16 big endian text",
        body: Body::Utf16Be("UTF-16BE ☺ €\n"),
    },
];

pub fn all() -> &'static [Sample] {
    &SAMPLES
}

pub fn find(name: &str) -> Result<&'static Sample> {
    let key = name.trim().to_lowercase();
    SAMPLES
        .iter()
        .find(|s| s.name == key)
        .ok_or_else(|| Error::UnknownSample(name.to_string()))
}
