use tower_lsp::lsp_types::{Position, Range};

use crate::metrics::SelectionRange;

/// State for each open document
#[derive(Debug)]
pub struct DocumentState {
    pub content: String,
    /// Content-type tag from `didOpen`
    pub language_id: String,
    pub version: i32,
    line_index: LineIndex,
}

impl DocumentState {
    pub fn new(content: String, language_id: String, version: i32) -> Self {
        let line_index = LineIndex::new(&content);
        Self {
            content,
            language_id,
            version,
            line_index,
        }
    }

    /// Replace the full text (the server asks for full sync)
    pub fn replace(&mut self, content: String, version: i32) {
        self.line_index = LineIndex::new(&content);
        self.content = content;
        self.version = version;
    }

    /// Convert editor selections to byte-offset ranges.
    ///
    /// Positions past the end of a line or the document are clamped, so a
    /// selection that arrives before the matching edit never fails.
    pub fn selection_ranges(&self, selections: &[Range]) -> Vec<SelectionRange> {
        selections
            .iter()
            .map(|range| {
                SelectionRange::new(
                    self.line_index.offset(&self.content, range.start),
                    self.line_index.offset(&self.content, range.end),
                )
            })
            .collect()
    }
}

/// Byte offset of each line start, for position lookups.
///
/// LSP columns count UTF-16 code units, so the column is resolved by walking
/// the line's chars.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset for `position` in `text`, clamped to the text
    pub fn offset(&self, text: &str, position: Position) -> usize {
        let line = position.line as usize;
        let Some(&line_start) = self.line_starts.get(line) else {
            return text.len();
        };

        // Exclude the newline (and a preceding '\r') from the line
        let line_end = self
            .line_starts
            .get(line + 1)
            .map(|&next| next - 1)
            .unwrap_or(text.len());
        let line_text = text[line_start..line_end]
            .strip_suffix('\r')
            .unwrap_or(&text[line_start..line_end]);

        let mut utf16_col = 0u32;
        for (i, c) in line_text.char_indices() {
            if utf16_col >= position.character {
                return line_start + i;
            }
            utf16_col += c.len_utf16() as u32;
        }
        line_start + line_text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: (u32, u32), end: (u32, u32)) -> Range {
        Range::new(Position::new(start.0, start.1), Position::new(end.0, end.1))
    }

    #[test]
    fn single_line_offsets() {
        let text = "hello world";
        let idx = LineIndex::new(text);
        assert_eq!(idx.offset(text, Position::new(0, 0)), 0);
        assert_eq!(idx.offset(text, Position::new(0, 5)), 5);
        assert_eq!(idx.offset(text, Position::new(0, 99)), 11);
    }

    #[test]
    fn multi_line_offsets() {
        let text = "one\ntwo\nthree";
        let idx = LineIndex::new(text);
        assert_eq!(idx.line_count(), 3);
        assert_eq!(idx.offset(text, Position::new(1, 0)), 4);
        assert_eq!(idx.offset(text, Position::new(1, 10)), 7);
        assert_eq!(idx.offset(text, Position::new(2, 5)), 13);
        assert_eq!(idx.offset(text, Position::new(7, 0)), 13);
    }

    #[test]
    fn crlf_line_end_is_excluded() {
        let text = "ab\r\ncd";
        let idx = LineIndex::new(text);
        assert_eq!(idx.offset(text, Position::new(0, 10)), 2);
        assert_eq!(idx.offset(text, Position::new(1, 1)), 5);
    }

    #[test]
    fn utf16_columns() {
        // '😀' is two UTF-16 units and four bytes
        let text = "a😀b";
        let idx = LineIndex::new(text);
        assert_eq!(idx.offset(text, Position::new(0, 1)), 1);
        assert_eq!(idx.offset(text, Position::new(0, 3)), 5);
    }

    #[test]
    fn selections_map_to_byte_ranges() {
        let doc = DocumentState::new("# Title\nbody text".to_string(), "markdown".to_string(), 1);
        let ranges = doc.selection_ranges(&[range((1, 0), (1, 4)), range((0, 2), (0, 7))]);
        assert_eq!(ranges, vec![SelectionRange::new(8, 12), SelectionRange::new(2, 7)]);
    }

    #[test]
    fn replace_rebuilds_index() {
        let mut doc = DocumentState::new("a".to_string(), "markdown".to_string(), 1);
        doc.replace("a\nb".to_string(), 2);
        assert_eq!(doc.version, 2);
        assert_eq!(
            doc.selection_ranges(&[range((1, 0), (1, 1))]),
            vec![SelectionRange::new(2, 3)]
        );
    }
}
