//! Fixed width wrapping.

use crate::analysis::LineBreak;
use crate::codec::{Cell, Origin};

const ESC: char = '\u{1B}';

/// Break runes to insert for a convention. EBCDIC breaks have already been
/// restored as LF by then, and unknown input falls back to LF.
fn inserted(key: LineBreak) -> &'static [char] {
    match key {
        LineBreak::Unknown | LineBreak::Nl | LineBreak::Nel => LineBreak::Lf.runes(),
        key => key.runes(),
    }
}

/// Where a cell sits relative to a kept `ESC [ ... final` sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Sequence {
    #[default]
    Ground,
    Escape,
    Csi,
}

impl Sequence {
    /// Next state, and whether the cell takes up a column.
    fn step(self, cell: &Cell) -> (Self, bool) {
        if cell.origin != Origin::Kept {
            return (Sequence::Ground, true);
        }
        match (self, cell.ch) {
            (_, ESC) => (Sequence::Escape, false),
            (Sequence::Escape, '[') => (Sequence::Csi, false),
            (Sequence::Csi, '\u{40}'..='\u{7E}') => (Sequence::Ground, false),
            (Sequence::Csi, _) => (Sequence::Csi, false),
            _ => (Sequence::Ground, true),
        }
    }
}

/// Insert a line break after every `width` columns. Existing breaks reset
/// the count, a line that ends exactly at `width` gets no extra break, and
/// kept escape sequences take no columns. A width of zero leaves the cells
/// alone.
pub fn apply(cells: Vec<Cell>, width: usize, key: LineBreak) -> Vec<Cell> {
    if width == 0 {
        return cells;
    }
    let breaks = inserted(key);
    let mut out = Vec::with_capacity(cells.len() + (cells.len() / width) * breaks.len());
    let mut column = 0;
    let mut sequence = Sequence::Ground;
    let mut cells = cells.into_iter().peekable();
    while let Some(cell) = cells.next() {
        if breaks.contains(&cell.ch) {
            out.push(cell);
            column = 0;
            continue;
        }
        let (next, counts) = sequence.step(&cell);
        sequence = next;
        out.push(cell);
        if !counts {
            continue;
        }
        column += 1;
        if column == width {
            let at_break = cells.peek().map_or(false, |c| breaks.contains(&c.ch));
            if !at_break {
                out.extend(breaks.iter().map(|&c| Cell::new(c, Origin::Inserted)));
                column = 0;
            }
        }
    }
    out
}

/// [`apply`] for plain runes.
pub fn wrap_runes(runes: &[char], width: usize, key: LineBreak) -> Vec<char> {
    let cells = runes.iter().map(|&c| Cell::new(c, Origin::Decoded)).collect();
    apply(cells, width, key).into_iter().map(|c| c.ch).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(text: &str, width: usize, key: LineBreak) -> String {
        let runes: Vec<char> = text.chars().collect();
        wrap_runes(&runes, width, key).into_iter().collect()
    }

    #[test]
    fn test_wrap_every_three() {
        assert_eq!(wrap("abcdefghi", 3, LineBreak::Lf), "abc\ndef\nghi\n");
    }

    #[test]
    fn test_zero_width_is_a_no_op() {
        assert_eq!(wrap("abcdefghi", 0, LineBreak::Lf), "abcdefghi");
    }

    #[test]
    fn test_existing_breaks_reset_the_column() {
        assert_eq!(wrap("ab\ncdefg", 3, LineBreak::Lf), "ab\ncde\nfg");
    }

    #[test]
    fn test_lines_that_fit_exactly_are_unchanged() {
        assert_eq!(wrap("abc\ndef\n", 3, LineBreak::Lf), "abc\ndef\n");
        assert_eq!(wrap("ab\r\ncd\r\n", 2, LineBreak::CrLf), "ab\r\ncd\r\n");
        assert_eq!(wrap("abcd\nef", 2, LineBreak::Lf), "ab\ncd\nef\n");
    }

    #[test]
    fn test_inserted_breaks_follow_the_convention() {
        assert_eq!(wrap("abcd", 2, LineBreak::CrLf), "ab\r\ncd\r\n");
        assert_eq!(wrap("abcd", 2, LineBreak::Unknown), "ab\ncd\n");
    }

    #[test]
    fn test_inserted_cells_are_marked() {
        let cells = vec![Cell::new('a', Origin::Decoded), Cell::new('b', Origin::Decoded)];
        let out = apply(cells, 1, LineBreak::Lf);
        assert_eq!(out.len(), 4);
        assert_eq!(out[1], Cell::new('\n', Origin::Inserted));
    }

    #[test]
    fn test_kept_sequences_take_no_columns() {
        let mut cells: Vec<Cell> = "\u{1b}[1;31m"
            .chars()
            .map(|c| Cell::new(c, Origin::Kept))
            .collect();
        cells.extend("abcd".chars().map(|c| Cell::new(c, Origin::Decoded)));
        let out: String = apply(cells, 2, LineBreak::Lf).iter().map(|c| c.ch).collect();
        assert_eq!(out, "\u{1b}[1;31mab\ncd\n");
    }

    #[test]
    fn test_kept_tab_takes_a_column() {
        let cells = vec![
            Cell::new('\t', Origin::Kept),
            Cell::new('a', Origin::Decoded),
            Cell::new('b', Origin::Decoded),
        ];
        let out: String = apply(cells, 2, LineBreak::Lf).iter().map(|c| c.ch).collect();
        assert_eq!(out, "\ta\nb");
    }
}
