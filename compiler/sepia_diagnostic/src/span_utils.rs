//! Line and column lookup for rendering spans.

use sepia_ir::Span;

/// Byte offset of every line start, for O(log L) span-to-position lookups.
///
/// ```
/// use sepia_diagnostic::span_utils::LineOffsetTable;
///
/// let source = "let a = 1;\nlet b = a;";
/// let table = LineOffsetTable::build(source);
///
/// assert_eq!(table.offset_to_line_col(source, 0), (1, 1));
/// assert_eq!(table.offset_to_line_col(source, 15), (2, 5));
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// `offsets[i]` is the byte offset where line `i + 1` starts.
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                offsets.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        LineOffsetTable { offsets }
    }

    /// 1-based line containing `offset`.
    #[inline]
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(line_idx).unwrap_or(u32::MAX - 1) + 1
    }

    /// 1-based (line, column); columns count characters, not bytes.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let line_start = self.line_start_offset(line).unwrap_or(0) as usize;
        let end = (offset as usize).min(source.len());
        let col = source
            .get(line_start..end)
            .map_or(0, |prefix| prefix.chars().count());
        (line, u32::try_from(col).unwrap_or(u32::MAX - 1) + 1)
    }

    /// Byte offset where 1-based `line` starts.
    pub fn line_start_offset(&self, line: u32) -> Option<u32> {
        if line == 0 {
            return None;
        }
        self.offsets.get((line - 1) as usize).copied()
    }

    /// Text of 1-based `line` without its trailing newline.
    pub fn line_text<'s>(&self, source: &'s str, line: u32) -> &'s str {
        let Some(start) = self.line_start_offset(line) else {
            return "";
        };
        let end = self
            .line_start_offset(line + 1)
            .map_or(source.len(), |next| next as usize);
        source
            .get(start as usize..end)
            .unwrap_or("")
            .trim_end_matches(['\n', '\r'])
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}

/// 1-based (line, column) of a span's start, for one-off lookups.
pub fn span_position(source: &str, span: Span) -> (u32, u32) {
    LineOffsetTable::build(source).offset_to_line_col(source, span.start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lines_are_one_based() {
        let source = "abc\ndefgh\nij";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.offset_to_line_col(source, 0), (1, 1));
        assert_eq!(table.offset_to_line_col(source, 2), (1, 3));
        assert_eq!(table.offset_to_line_col(source, 4), (2, 1));
        assert_eq!(table.offset_to_line_col(source, 7), (2, 4));
        assert_eq!(table.offset_to_line_col(source, 10), (3, 1));
        assert_eq!(table.line_count(), 3);
    }

    #[test]
    fn columns_count_characters() {
        let source = "let é = 1;";
        let table = LineOffsetTable::build(source);
        // `=` sits after a two-byte character
        assert_eq!(table.offset_to_line_col(source, 7), (1, 7));
    }

    #[test]
    fn line_text_strips_newlines() {
        let source = "first\r\nsecond\nthird";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.line_text(source, 1), "first");
        assert_eq!(table.line_text(source, 2), "second");
        assert_eq!(table.line_text(source, 3), "third");
        assert_eq!(table.line_text(source, 4), "");
    }

    #[test]
    fn offset_past_end_clamps() {
        let source = "x";
        assert_eq!(span_position(source, Span::new(40, 41)), (1, 2));
    }
}
