//! Edit buffer - the working copy of an inline field while it is edited.
//!
//! Positions are character indices, not byte offsets. The selection is the
//! range between `anchor` and `cursor`; no anchor means no selection.

// =============================================================================
// Word Boundary Helpers
// =============================================================================

/// Find the start of the word before the given position.
/// A word is a run of alphanumeric characters.
fn find_word_start(chars: &[char], pos: usize) -> usize {
    let mut i = pos.min(chars.len());

    // Skip whitespace/punctuation going backward
    while i > 0 && !chars[i - 1].is_alphanumeric() {
        i -= 1;
    }
    // Skip word characters going backward
    while i > 0 && chars[i - 1].is_alphanumeric() {
        i -= 1;
    }
    i
}

/// Find the end of the word after the given position.
fn find_word_end(chars: &[char], pos: usize) -> usize {
    let len = chars.len();
    let mut i = pos.min(len);

    while i < len && !chars[i].is_alphanumeric() {
        i += 1;
    }
    while i < len && chars[i].is_alphanumeric() {
        i += 1;
    }
    i
}

// =============================================================================
// EditBuffer
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    chars: Vec<char>,
    cursor: usize,
    anchor: Option<usize>,
}

impl EditBuffer {
    /// Buffer holding `text` with the cursor at the end.
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor, anchor: None }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of lines (a trailing newline opens a new, empty line).
    pub fn line_count(&self) -> usize {
        self.chars.iter().filter(|&&c| c == '\n').count() + 1
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Normalized selection range (start, end), if non-empty.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        let (start, end) = (anchor.min(self.cursor), anchor.max(self.cursor));
        (start < end).then_some((start, end))
    }

    pub fn has_selection(&self) -> bool {
        self.selection().is_some()
    }

    pub fn selected_text(&self) -> String {
        match self.selection() {
            Some((start, end)) => self.chars[start..end].iter().collect(),
            None => String::new(),
        }
    }

    pub fn select_all(&mut self) {
        self.anchor = Some(0);
        self.cursor = self.chars.len();
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    /// Remove the selected text, leaving the cursor where it began.
    /// Returns false when nothing was selected.
    fn delete_selection(&mut self) -> bool {
        match self.selection() {
            Some((start, end)) => {
                self.chars.drain(start..end);
                self.cursor = start;
                self.anchor = None;
                true
            }
            None => {
                self.anchor = None;
                false
            }
        }
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Insert text at the cursor, replacing any selection.
    pub fn insert_str(&mut self, text: &str) {
        self.delete_selection();
        let inserted: Vec<char> = text.chars().collect();
        let count = inserted.len();
        self.chars.splice(self.cursor..self.cursor, inserted);
        self.cursor += count;
    }

    pub fn insert_char(&mut self, c: char) {
        self.delete_selection();
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.delete_selection() {
            return;
        }
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.delete_selection() {
            return;
        }
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    /// Ctrl+Backspace: delete back to the start of the previous word.
    pub fn delete_word_back(&mut self) {
        if self.delete_selection() {
            return;
        }
        let start = find_word_start(&self.chars, self.cursor);
        self.chars.drain(start..self.cursor);
        self.cursor = start;
    }

    /// Ctrl+Delete: delete forward to the end of the next word.
    pub fn delete_word_forward(&mut self) {
        if self.delete_selection() {
            return;
        }
        let end = find_word_end(&self.chars, self.cursor);
        self.chars.drain(self.cursor..end);
    }

    // =========================================================================
    // Cursor Movement
    // =========================================================================
    //
    // `extend` keeps (or starts) the selection anchored where it was; without
    // it any selection is dropped.

    fn move_to(&mut self, pos: usize, extend: bool) {
        if extend {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor);
            }
        } else {
            self.anchor = None;
        }
        self.cursor = pos.min(self.chars.len());
    }

    pub fn move_left(&mut self, extend: bool) {
        // Collapsing a selection lands on its start
        if !extend {
            if let Some((start, _)) = self.selection() {
                self.move_to(start, false);
                return;
            }
        }
        self.move_to(self.cursor.saturating_sub(1), extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        if !extend {
            if let Some((_, end)) = self.selection() {
                self.move_to(end, false);
                return;
            }
        }
        self.move_to(self.cursor + 1, extend);
    }

    pub fn move_word_left(&mut self, extend: bool) {
        self.move_to(find_word_start(&self.chars, self.cursor), extend);
    }

    pub fn move_word_right(&mut self, extend: bool) {
        self.move_to(find_word_end(&self.chars, self.cursor), extend);
    }

    fn line_start(&self, pos: usize) -> usize {
        self.chars[..pos]
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |i| i + 1)
    }

    fn line_end(&self, pos: usize) -> usize {
        self.chars[pos..]
            .iter()
            .position(|&c| c == '\n')
            .map_or(self.chars.len(), |i| pos + i)
    }

    /// Start of the current line.
    pub fn home(&mut self, extend: bool) {
        self.move_to(self.line_start(self.cursor), extend);
    }

    /// End of the current line.
    pub fn end(&mut self, extend: bool) {
        self.move_to(self.line_end(self.cursor), extend);
    }

    /// Same column on the previous line, or the buffer start on the first.
    pub fn move_up(&mut self, extend: bool) {
        let start = self.line_start(self.cursor);
        if start == 0 {
            self.move_to(0, extend);
            return;
        }
        let column = self.cursor - start;
        let prev_start = self.line_start(start - 1);
        let prev_len = start - 1 - prev_start;
        self.move_to(prev_start + column.min(prev_len), extend);
    }

    /// Same column on the next line, or the buffer end on the last.
    pub fn move_down(&mut self, extend: bool) {
        let end = self.line_end(self.cursor);
        if end == self.chars.len() {
            self.move_to(end, extend);
            return;
        }
        let column = self.cursor - self.line_start(self.cursor);
        let next_start = end + 1;
        let next_len = self.line_end(next_start) - next_start;
        self.move_to(next_start + column.min(next_len), extend);
    }
}
