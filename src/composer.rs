//! Composer input with slash-command support.
//!
//! `ComposerInput` owns the text buffer and the dropdown state, feeds every
//! edit and cursor move through the dropdown transitions, and reports what the
//! owner needs to act on through [`ComposerAction`].

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::dropdown::{
    CategoryFilter, Commit, DetectContext, DismissReason, DropdownEvent, DropdownState, NavKey,
    Outcome, transition,
};
use crate::input::InputBuffer;
use crate::slash::{Scorer, UniformScorer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerAction {
    /// The key was not used by the dropdown; the owner's own handler runs.
    PassThrough(NavKey),
    Consumed,
    ToolSelected { name: String, category: String },
    Dismissed(DismissReason),
}

/// Screen region a pointer-down landed on, as resolved by the host layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    /// Inside the input box at a wrapped (row, col) text cell.
    Input { row: u16, col: u16 },
    DropdownRow(usize),
    DropdownCategory(usize),
    /// Inside the dropdown but not on a row or tab.
    Dropdown,
    ToolsButton,
    Outside,
}

/// Host capability that maps a screen cell to the composer region under it.
pub trait HitTest {
    fn hit(&self, x: u16, y: u16) -> HitRegion;
}

pub struct ComposerInput {
    buffer: InputBuffer,
    dropdown: DropdownState,
    catalog: Catalog,
    scorer: Box<dyn Scorer>,
}

impl std::fmt::Debug for ComposerInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposerInput")
            .field("buffer", &self.buffer)
            .field("dropdown", &self.dropdown)
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}

impl ComposerInput {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_scorer(catalog, Box::new(UniformScorer))
    }

    pub fn with_scorer(catalog: Catalog, scorer: Box<dyn Scorer>) -> Self {
        Self {
            buffer: InputBuffer::default(),
            dropdown: DropdownState::Closed,
            catalog,
            scorer,
        }
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn dropdown(&self) -> &DropdownState {
        &self.dropdown
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown.is_open()
    }

    pub fn insert_char(&mut self, c: char) {
        self.buffer.insert_char(c);
        self.after_edit();
    }

    pub fn backspace(&mut self) {
        if self.buffer.backspace() {
            self.after_edit();
        }
    }

    pub fn delete_forward(&mut self) {
        if self.buffer.delete_forward() {
            self.after_edit();
        }
    }

    /// Empties the buffer, returning its trimmed text when any is left.
    pub fn take_text(&mut self) -> Option<String> {
        let text = self.buffer.take_trimmed();
        self.after_edit();
        text
    }

    pub fn move_left(&mut self) {
        self.buffer.move_left();
        self.after_cursor_move();
    }

    pub fn move_right(&mut self) {
        self.buffer.move_right();
        self.after_cursor_move();
    }

    pub fn move_line_start(&mut self) {
        self.buffer.move_line_start();
        self.after_cursor_move();
    }

    pub fn move_line_end(&mut self) {
        self.buffer.move_line_end();
        self.after_cursor_move();
    }

    pub fn move_up(&mut self, width: u16) -> bool {
        let moved = self.buffer.move_up(width);
        if moved {
            self.after_cursor_move();
        }
        moved
    }

    pub fn move_down(&mut self, width: u16) -> bool {
        let moved = self.buffer.move_down(width);
        if moved {
            self.after_cursor_move();
        }
        moved
    }

    #[cfg(test)]
    pub fn set_cursor(&mut self, cursor: usize) {
        self.buffer.set_cursor(cursor);
        self.after_cursor_move();
    }

    pub fn toggle_dropdown(&mut self) -> ComposerAction {
        let cursor = self.buffer.cursor();
        self.apply(DropdownEvent::Toggle { cursor })
    }

    /// Dropdown key handling. Keys the dropdown does not use come back as
    /// `PassThrough` for the owner's handler.
    pub fn handle_key(&mut self, key: NavKey) -> ComposerAction {
        self.apply(DropdownEvent::Key(key))
    }

    pub fn select_category(&mut self, filter: CategoryFilter) -> ComposerAction {
        self.apply(DropdownEvent::SelectCategory(filter))
    }

    pub fn next_category(&mut self) -> ComposerAction {
        self.apply(DropdownEvent::NextCategory)
    }

    pub fn prev_category(&mut self) -> ComposerAction {
        self.apply(DropdownEvent::PrevCategory)
    }

    /// Pointer-down handling. `width` is the wrapped text width of the input.
    pub fn handle_pointer(&mut self, region: HitRegion, width: u16) -> ComposerAction {
        match region {
            HitRegion::Input { row, col } => {
                self.buffer.place_at_cell(width, row, col);
                self.after_cursor_move();
                ComposerAction::Consumed
            }
            HitRegion::DropdownRow(idx) => self.apply(DropdownEvent::Pick(idx)),
            HitRegion::DropdownCategory(idx) => {
                let filter = if idx == 0 {
                    CategoryFilter::All
                } else {
                    match self.catalog.categories().get(idx - 1) {
                        Some(category) => CategoryFilter::Only((*category).to_string()),
                        None => return ComposerAction::Consumed,
                    }
                };
                self.select_category(filter)
            }
            HitRegion::Dropdown => ComposerAction::Consumed,
            HitRegion::ToolsButton => self.toggle_dropdown(),
            HitRegion::Outside => self.apply(DropdownEvent::PointerOutside),
        }
    }

    fn after_edit(&mut self) {
        let text = self.buffer.text().to_string();
        let cursor = self.buffer.cursor();
        self.apply(DropdownEvent::BufferEdited {
            text: &text,
            cursor,
        });
    }

    fn after_cursor_move(&mut self) {
        let text = self.buffer.text().to_string();
        let cursor = self.buffer.cursor();
        self.apply(DropdownEvent::CursorMoved {
            text: &text,
            cursor,
        });
    }

    fn apply(&mut self, event: DropdownEvent<'_>) -> ComposerAction {
        let key = match event {
            DropdownEvent::Key(key) => Some(key),
            _ => None,
        };
        let was_open = self.dropdown.is_open();
        let ctx = DetectContext {
            catalog: &self.catalog,
            scorer: self.scorer.as_ref(),
        };
        let state = std::mem::take(&mut self.dropdown);
        let (next, outcome) = transition(state, event, &ctx);
        self.dropdown = next;

        if !was_open && self.dropdown.is_open() {
            debug!(
                matches = self.dropdown.visible_matches().len(),
                via_button = self.dropdown.opened_via_button(),
                first = self.dropdown.selected_match().map(|m| m.tool.name.as_str()),
                "slash dropdown opened"
            );
        }

        match outcome {
            Outcome::PassThrough => match key {
                Some(key) => ComposerAction::PassThrough(key),
                None => ComposerAction::Consumed,
            },
            Outcome::Consumed => ComposerAction::Consumed,
            Outcome::Committed(commit) => self.commit(commit),
            Outcome::Dismissed(reason) => {
                debug!(?reason, "slash dropdown dismissed");
                ComposerAction::Dismissed(reason)
            }
        }
    }

    fn commit(&mut self, commit: Commit) -> ComposerAction {
        let Commit { tool, range } = commit;
        self.buffer.remove_range(range);
        info!(tool = %tool.name, category = %tool.category, "slash command committed");
        ComposerAction::ToolSelected {
            name: tool.name,
            category: tool.category,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/composer_tests.rs"]
mod tests;
