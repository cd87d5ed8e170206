//! Slash-command dropdown state and its transitions.
//!
//! `transition` is pure: it takes the current state and one event and returns
//! the next state plus an [`Outcome`] telling the host what happened to the
//! event. No rendering or terminal access happens here.

use std::ops::Range;

use crate::catalog::{Catalog, Tool};
use crate::slash::{Detection, Match, Scorer, all_matches, detect};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn admits(&self, tool: &Tool) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => tool.category == *category,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DropdownState {
    #[default]
    Closed,
    Open {
        matches: Vec<Match>,
        selected: usize,
        opened_via_button: bool,
        range: Range<usize>,
        category: CategoryFilter,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Enter,
    Tab,
    Escape,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropdownEvent<'a> {
    BufferEdited { text: &'a str, cursor: usize },
    CursorMoved { text: &'a str, cursor: usize },
    /// Explicit toolbar toggle. `cursor` anchors the empty command range.
    Toggle { cursor: usize },
    Key(NavKey),
    /// Pointer-down that the host resolved as outside the input and dropdown.
    PointerOutside,
    /// Commit a specific visible row, as a pointer click on it does.
    Pick(usize),
    SelectCategory(CategoryFilter),
    NextCategory,
    PrevCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Escape,
    Toggle,
    PointerOutside,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub tool: Tool,
    pub range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Event was not meant for the dropdown; the host handles it.
    PassThrough,
    /// Event was handled here and its default behavior must be suppressed.
    Consumed,
    Committed(Commit),
    Dismissed(DismissReason),
}

pub struct DetectContext<'a> {
    pub catalog: &'a Catalog,
    pub scorer: &'a dyn Scorer,
}

impl DropdownState {
    pub fn is_open(&self) -> bool {
        matches!(self, DropdownState::Open { .. })
    }

    pub fn opened_via_button(&self) -> bool {
        matches!(
            self,
            DropdownState::Open {
                opened_via_button: true,
                ..
            }
        )
    }

    pub fn category(&self) -> Option<&CategoryFilter> {
        match self {
            DropdownState::Open { category, .. } => Some(category),
            DropdownState::Closed => None,
        }
    }

    pub fn range(&self) -> Option<Range<usize>> {
        match self {
            DropdownState::Open { range, .. } => Some(range.clone()),
            DropdownState::Closed => None,
        }
    }

    /// Matches that pass the current category filter, in rank order.
    pub fn visible_matches(&self) -> Vec<&Match> {
        match self {
            DropdownState::Open {
                matches, category, ..
            } => matches
                .iter()
                .filter(|m| category.admits(&m.tool))
                .collect(),
            DropdownState::Closed => Vec::new(),
        }
    }

    /// Selected row index clamped into the visible list; `None` when nothing is visible.
    pub fn selected_index(&self) -> Option<usize> {
        let DropdownState::Open { selected, .. } = self else {
            return None;
        };
        let visible = self.visible_matches().len();
        if visible == 0 {
            None
        } else {
            Some((*selected).min(visible - 1))
        }
    }

    pub fn selected_match(&self) -> Option<&Match> {
        let idx = self.selected_index()?;
        self.visible_matches().get(idx).copied()
    }

    fn open_typed(matches: Vec<Match>, range: Range<usize>) -> Self {
        DropdownState::Open {
            matches,
            selected: 0,
            opened_via_button: false,
            range,
            category: CategoryFilter::All,
        }
    }
}

pub fn transition(
    state: DropdownState,
    event: DropdownEvent<'_>,
    ctx: &DetectContext<'_>,
) -> (DropdownState, Outcome) {
    match event {
        DropdownEvent::BufferEdited { text, cursor }
        | DropdownEvent::CursorMoved { text, cursor } => {
            if state.opened_via_button() {
                return (with_anchor(state, cursor), Outcome::PassThrough);
            }
            let next = match detect(text, cursor, ctx.catalog, ctx.scorer) {
                Detection::Active { matches, range } => DropdownState::open_typed(matches, range),
                Detection::NoMatches { .. } | Detection::NoTrigger => DropdownState::Closed,
            };
            (next, Outcome::PassThrough)
        }
        DropdownEvent::Toggle { cursor } => {
            if state.is_open() {
                return (
                    DropdownState::Closed,
                    Outcome::Dismissed(DismissReason::Toggle),
                );
            }
            let next = DropdownState::Open {
                matches: all_matches(ctx.catalog, ctx.scorer),
                selected: 0,
                opened_via_button: true,
                range: cursor..cursor,
                category: CategoryFilter::All,
            };
            (next, Outcome::Consumed)
        }
        DropdownEvent::Key(key) => on_key(state, key),
        DropdownEvent::PointerOutside => {
            if state.is_open() {
                (
                    DropdownState::Closed,
                    Outcome::Dismissed(DismissReason::PointerOutside),
                )
            } else {
                (state, Outcome::PassThrough)
            }
        }
        DropdownEvent::Pick(idx) => commit_at(state, idx),
        DropdownEvent::SelectCategory(filter) => select_category(state, filter),
        DropdownEvent::NextCategory => cycle_category(state, ctx.catalog, 1),
        DropdownEvent::PrevCategory => cycle_category(state, ctx.catalog, -1),
    }
}

fn on_key(state: DropdownState, key: NavKey) -> (DropdownState, Outcome) {
    if !state.is_open() {
        return (state, Outcome::PassThrough);
    }
    match key {
        NavKey::Up => {
            let current = state.selected_index().unwrap_or(0);
            (with_selected(state, current.saturating_sub(1)), Outcome::Consumed)
        }
        NavKey::Down => {
            let last = state.visible_matches().len().saturating_sub(1);
            let current = state.selected_index().unwrap_or(0);
            (
                with_selected(state, current.saturating_add(1).min(last)),
                Outcome::Consumed,
            )
        }
        NavKey::Enter | NavKey::Tab => match state.selected_index() {
            Some(idx) => commit_at(state, idx),
            None => (state, Outcome::Consumed),
        },
        NavKey::Escape => (
            DropdownState::Closed,
            Outcome::Dismissed(DismissReason::Escape),
        ),
    }
}

fn commit_at(state: DropdownState, idx: usize) -> (DropdownState, Outcome) {
    let picked = state.visible_matches().get(idx).map(|m| m.tool.clone());
    let Some(tool) = picked else {
        let outcome = if state.is_open() {
            Outcome::Consumed
        } else {
            Outcome::PassThrough
        };
        return (state, outcome);
    };
    let range = state.range().unwrap_or(0..0);
    (
        DropdownState::Closed,
        Outcome::Committed(Commit { tool, range }),
    )
}

fn with_selected(state: DropdownState, idx: usize) -> DropdownState {
    match state {
        DropdownState::Open {
            matches,
            opened_via_button,
            range,
            category,
            ..
        } => DropdownState::Open {
            matches,
            selected: idx,
            opened_via_button,
            range,
            category,
        },
        DropdownState::Closed => DropdownState::Closed,
    }
}

/// Follows the cursor with the empty range of a button-opened dropdown.
fn with_anchor(state: DropdownState, cursor: usize) -> DropdownState {
    match state {
        DropdownState::Open {
            matches,
            selected,
            opened_via_button,
            category,
            ..
        } => DropdownState::Open {
            matches,
            selected,
            opened_via_button,
            range: cursor..cursor,
            category,
        },
        DropdownState::Closed => DropdownState::Closed,
    }
}

fn select_category(state: DropdownState, filter: CategoryFilter) -> (DropdownState, Outcome) {
    match state {
        DropdownState::Open {
            matches,
            opened_via_button,
            range,
            ..
        } => (
            DropdownState::Open {
                matches,
                selected: 0,
                opened_via_button,
                range,
                category: filter,
            },
            Outcome::Consumed,
        ),
        DropdownState::Closed => (DropdownState::Closed, Outcome::PassThrough),
    }
}

fn cycle_category(state: DropdownState, catalog: &Catalog, step: isize) -> (DropdownState, Outcome) {
    let Some(current) = state.category() else {
        return (state, Outcome::PassThrough);
    };
    let mut filters = vec![CategoryFilter::All];
    filters.extend(
        catalog
            .categories()
            .into_iter()
            .map(|category| CategoryFilter::Only(category.to_string())),
    );
    let position = filters.iter().position(|f| f == current).unwrap_or(0);
    let next = (position as isize + step).rem_euclid(filters.len() as isize) as usize;
    let filter = filters.swap_remove(next);
    select_category(state, filter)
}

#[cfg(test)]
#[path = "../tests/unit/dropdown_tests.rs"]
mod tests;
