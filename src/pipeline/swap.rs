//! Rune swaps
//!
//! Post-decode substitutions for characters that render badly in modern
//! terminals. Swaps run in a fixed order whatever order they are requested
//! in, and skip cells that are kept controls or already swapped.
//!
//! | Name  | From            | To                 |
//! |-------|-----------------|--------------------|
//! | null  | NUL, or `␀`     | space              |
//! | bar   | vertical line   | `¦` broken bar     |
//! | house | `⌂` house       | `Δ` delta          |
//! | pipe  | `│` box drawing | `⎮` integral       |
//! | root  | `√` square root | `✓` check mark     |
//! | space | `␣` open box    | space              |

use crate::codec::{Cell, Origin};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Swap {
    Null,
    Bar,
    House,
    Pipe,
    Root,
    Space,
}

impl Swap {
    pub const ALL: [Swap; 6] = [
        Swap::Null,
        Swap::Bar,
        Swap::House,
        Swap::Pipe,
        Swap::Root,
        Swap::Space,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        let swap = match name.trim().to_lowercase().as_str() {
            "null" | "n" => Swap::Null,
            "bar" | "b" => Swap::Bar,
            "house" | "h" => Swap::House,
            "pipe" | "p" => Swap::Pipe,
            "root" | "r" => Swap::Root,
            "space" | "s" => Swap::Space,
            _ => return None,
        };
        Some(swap)
    }

    /// Swaps for a list of names, in application order and without
    /// duplicates, plus the names that were not recognised.
    pub fn parse<I, S>(names: I) -> (Vec<Self>, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut swaps = Vec::new();
        let mut unknown = Vec::new();
        for name in names {
            let name = name.as_ref();
            if name.trim().is_empty() {
                continue;
            }
            match Self::from_name(name) {
                Some(swap) => swaps.push(swap),
                None => unknown.push(name.to_string()),
            }
        }
        swaps.sort();
        swaps.dedup();
        (swaps, unknown)
    }

    pub fn name(self) -> &'static str {
        match self {
            Swap::Null => "null",
            Swap::Bar => "bar",
            Swap::House => "house",
            Swap::Pipe => "pipe",
            Swap::Root => "root",
            Swap::Space => "space",
        }
    }

    /// The (from, to) pair.
    pub fn pair(self) -> (char, char) {
        match self {
            Swap::Null => ('\0', ' '),
            Swap::Bar => ('|', '¦'),
            Swap::House => ('⌂', 'Δ'),
            Swap::Pipe => ('│', '⎮'),
            Swap::Root => ('√', '✓'),
            Swap::Space => ('␣', ' '),
        }
    }

    fn matches(self, cell: &Cell) -> bool {
        let (from, _) = self.pair();
        match self {
            // the picture of a NUL as well as the raw byte
            Swap::Null => cell.raw() == from,
            _ => cell.ch == from,
        }
    }
}

/// Apply swaps to decoded cells. An empty list changes nothing.
pub fn apply(cells: &mut [Cell], swaps: &[Swap]) {
    if swaps.is_empty() {
        return;
    }
    let mut ordered = swaps.to_vec();
    ordered.sort();
    ordered.dedup();
    for swap in ordered {
        let (_, to) = swap.pair();
        for cell in cells
            .iter_mut()
            .filter(|c| matches!(c.origin, Origin::Decoded | Origin::Picture(_)))
        {
            if swap.matches(cell) {
                cell.ch = to;
                cell.origin = Origin::Swapped;
            }
        }
    }
}
