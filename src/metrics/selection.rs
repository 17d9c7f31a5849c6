//! Selection Ranges
//!
//! Byte-offset spans into a document and the substring extraction rules.

/// A contiguous span of byte offsets into a document.
///
/// `start` may be greater than `end` (a selection made backwards); both ends
/// are normalized when the range is applied to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A zero-length range at `offset`
    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Slice `text` with this range, clamped to the text and snapped down to
    /// char boundaries. Never panics.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        let (low, high) = if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };

        let low = floor_char_boundary(text, low);
        let high = floor_char_boundary(text, high);
        &text[low..high]
    }
}

/// Pick the text to count: the whole text when no selection is given (or the
/// list is empty), otherwise the span of the first range only.
pub fn extract<'a>(text: &'a str, selections: Option<&[SelectionRange]>) -> &'a str {
    match selections.and_then(|ranges| ranges.first()) {
        Some(range) => range.slice(text),
        None => text,
    }
}

fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
