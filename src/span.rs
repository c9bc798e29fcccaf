//! Bits and pieces for working with positions and ranges of text.

/// A region of source text, as byte offsets.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Span {
    /// The byte-offset of the first character of the span.
    pub begin: usize,
    /// The byte-offset of the first character *after* the span.
    pub end: usize,
}

impl Span {
    pub fn new(begin: usize, end: usize) -> Self {
        Span { begin, end }
    }

    pub fn to(self, other: Span) -> Span {
        Span::new(self.begin, other.end)
    }
}

/// Position inside a text in a form that's useful for human readers: 1-based line and column.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

/// Maps byte offsets into a source string to `(line, column)` pairs.
///
/// ```
/// # use rinha::span::LineMap;
/// let map = LineMap::new("abc\ndef\nghi");
/// let pos = map.offset_to_pos(5);
/// assert_eq!(pos.line, 2);
/// assert_eq!(pos.column, 2);
/// ```
pub struct LineMap<'a> {
    source: &'a str,
    line_offsets: Vec<usize>,
}

impl<'a> LineMap<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_offsets = vec![0];
        for (offset, ch) in source.char_indices() {
            if ch == '\n' {
                line_offsets.push(offset + 1);
            }
        }
        LineMap {
            source,
            line_offsets,
        }
    }

    pub fn offset_to_pos(&self, offset: usize) -> Pos {
        let line_index = match self.line_offsets.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_begin = self.line_offsets[line_index];
        let column = self.source[line_begin..offset].chars().count() + 1;
        Pos {
            line: (line_index + 1) as u32,
            column: column as u32,
        }
    }
}
