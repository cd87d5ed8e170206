/// Word-wrapped rendering of the input buffer together with the (row, col)
/// cell of every character boundary, so cursor offsets map to screen cells.
#[derive(Debug, Clone)]
pub struct WrappedLayout {
    pub rendered: String,
    pub cells: Vec<(u16, u16)>,
    pub rows: u16,
}

impl WrappedLayout {
    pub fn new(text: &str, width: u16) -> Self {
        let width = width.max(1);
        let chars: Vec<char> = text.chars().collect();
        let mut rendered = String::with_capacity(text.len());
        let mut cells = Vec::with_capacity(chars.len() + 1);
        let mut row = 0u16;
        let mut col = 0u16;

        cells.push((row, col));
        for (idx, ch) in chars.iter().copied().enumerate() {
            if ch == '\n' {
                rendered.push('\n');
                row = row.saturating_add(1);
                col = 0;
                cells.push((row, col));
                continue;
            }

            if col >= width || word_overflows(&chars, idx, col, width) {
                rendered.push('\n');
                row = row.saturating_add(1);
                col = 0;
            }

            rendered.push(ch);
            col = col.saturating_add(1);
            if col >= width {
                rendered.push('\n');
                row = row.saturating_add(1);
                col = 0;
            }
            cells.push((row, col));
        }

        let rows = cells
            .iter()
            .map(|(r, _)| *r)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        Self {
            rendered,
            cells,
            rows,
        }
    }

    pub fn cell_of(&self, index: usize) -> (u16, u16) {
        let idx = index.min(self.cells.len().saturating_sub(1));
        self.cells.get(idx).copied().unwrap_or((0, 0))
    }

    /// Character boundary closest to `goal_col` on `row`, never past it when
    /// the row has a boundary at or before the goal.
    pub fn index_at(&self, row: u16, goal_col: u16) -> usize {
        let mut best: Option<(usize, u16)> = None;
        let mut first_on_row: Option<usize> = None;
        let mut last_row_seen: Option<usize> = None;

        for (idx, (r, c)) in self.cells.iter().copied().enumerate() {
            if r < row {
                last_row_seen = Some(idx);
            }
            if r != row {
                continue;
            }
            first_on_row.get_or_insert(idx);
            if c <= goal_col && best.is_none_or(|(_, best_col)| c > best_col) {
                best = Some((idx, c));
            }
        }

        best.map(|(idx, _)| idx)
            .or(first_on_row)
            .or(last_row_seen)
            .unwrap_or(0)
    }
}

fn word_overflows(chars: &[char], idx: usize, col: u16, width: u16) -> bool {
    if col == 0 || chars[idx].is_whitespace() {
        return false;
    }
    if idx > 0 && !chars[idx - 1].is_whitespace() {
        return false;
    }
    let word_len = chars[idx..]
        .iter()
        .take_while(|c| !c.is_whitespace())
        .count() as u16;
    word_len <= width && col.saturating_add(word_len) > width
}
