use std::ops::Range;

use crate::text_layout::WrappedLayout;

/// Editable composer text. The cursor is a character offset in `0..=len`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
    goal_col: Option<u16>,
}

impl InputBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    #[cfg(test)]
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.char_len());
        self.goal_col = None;
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_idx = char_to_byte_idx(&self.text, self.cursor);
        self.text.insert(byte_idx, c);
        self.cursor = self.cursor.saturating_add(1);
        self.goal_col = None;
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = char_to_byte_idx(&self.text, self.cursor - 1);
        let end = char_to_byte_idx(&self.text, self.cursor);
        self.text.drain(start..end);
        self.cursor -= 1;
        self.goal_col = None;
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let start = char_to_byte_idx(&self.text, self.cursor);
        let end = char_to_byte_idx(&self.text, self.cursor + 1);
        self.text.drain(start..end);
        self.goal_col = None;
        true
    }

    /// Removes the character range and parks the cursor at its start.
    pub fn remove_range(&mut self, range: Range<usize>) {
        let len = self.char_len();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        let start_byte = char_to_byte_idx(&self.text, start);
        let end_byte = char_to_byte_idx(&self.text, end);
        self.text.drain(start_byte..end_byte);
        self.cursor = start;
        self.goal_col = None;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.goal_col = None;
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
        self.goal_col = None;
    }

    pub fn move_line_start(&mut self) {
        let before: Vec<char> = self.text.chars().take(self.cursor).collect();
        self.cursor = before
            .iter()
            .rposition(|c| *c == '\n')
            .map_or(0, |idx| idx + 1);
        self.goal_col = None;
    }

    pub fn move_line_end(&mut self) {
        let after = self
            .text
            .chars()
            .skip(self.cursor)
            .take_while(|c| *c != '\n')
            .count();
        self.cursor += after;
        self.goal_col = None;
    }

    /// Moves one wrapped row up. Returns false when already on the first row.
    pub fn move_up(&mut self, width: u16) -> bool {
        let layout = WrappedLayout::new(&self.text, width);
        let (row, col) = layout.cell_of(self.cursor);
        if row == 0 {
            return false;
        }
        let goal = self.goal_col.unwrap_or(col);
        self.cursor = layout.index_at(row - 1, goal);
        self.goal_col = Some(goal);
        true
    }

    /// Moves one wrapped row down. Returns false when already on the last row.
    pub fn move_down(&mut self, width: u16) -> bool {
        let layout = WrappedLayout::new(&self.text, width);
        let (row, col) = layout.cell_of(self.cursor);
        if row.saturating_add(1) >= layout.rows {
            return false;
        }
        let goal = self.goal_col.unwrap_or(col);
        self.cursor = layout.index_at(row + 1, goal);
        self.goal_col = Some(goal);
        true
    }

    /// Places the cursor at the boundary nearest to a wrapped (row, col) cell.
    pub fn place_at_cell(&mut self, width: u16, row: u16, col: u16) {
        let layout = WrappedLayout::new(&self.text, width);
        self.cursor = layout.index_at(row, col).min(self.char_len());
        self.goal_col = None;
    }

    pub fn cursor_cell(&self, width: u16) -> (u16, u16) {
        WrappedLayout::new(&self.text, width).cell_of(self.cursor)
    }

    pub fn take_trimmed(&mut self) -> Option<String> {
        let message = self.text.trim().to_string();
        self.clear();
        if message.is_empty() {
            None
        } else {
            Some(message)
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.goal_col = None;
    }
}

fn char_to_byte_idx(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(byte_idx, _)| byte_idx)
        .unwrap_or(s.len())
}
