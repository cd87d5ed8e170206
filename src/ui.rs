use ratatui::prelude::*;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Clear, Padding, Paragraph};

use crate::app::App;
use crate::catalog::Catalog;
use crate::composer::{HitRegion, HitTest};
use crate::dropdown::{CategoryFilter, DropdownState};
use crate::text_layout::WrappedLayout;
use crate::theme::Theme;

const MAX_INPUT_TEXT_LINES: u16 = 5;
const MAX_DROPDOWN_ROWS: u16 = 8;
const TEXT_PADDING: u16 = 1;
const STATUS_HEIGHT: u16 = 3;
const TOOLS_BUTTON_LABEL: &str = " / Tools ";
const TOOLBAR_HINT: &str = "  Enter send | Shift+Enter newline | Esc clear tool";
const STATUS_HELP_TEXT: &str =
    "/ or Ctrl+T tools | Up/Down select | Enter/Tab pick | Ctrl+Left/Right category | Ctrl+C quit";
const EMPTY_CATEGORY_TEXT: &str = "No tools in this category";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTab {
    pub label: String,
    pub area: Rect,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownRow {
    /// Index into the visible (category-filtered) match list.
    pub index: usize,
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub selected: bool,
    pub area: Rect,
}

/// Screen projection of an open dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownView {
    pub area: Rect,
    pub tabs: Vec<CategoryTab>,
    pub rows: Vec<DropdownRow>,
}

/// Places the dropdown next to `anchor` inside `bounds`: above it when there
/// is room (or more room than below), otherwise below.
pub fn dropdown_view(
    state: &DropdownState,
    catalog: &Catalog,
    anchor: Rect,
    bounds: Rect,
) -> Option<DropdownView> {
    let category = state.category()?;
    if anchor.width == 0 {
        return None;
    }
    let visible = state.visible_matches();
    let wanted_rows = (visible.len() as u16).clamp(1, MAX_DROPDOWN_ROWS);
    let wanted_height = wanted_rows + 1;

    let space_above = anchor.y.saturating_sub(bounds.y);
    let space_below = bounds.bottom().saturating_sub(anchor.bottom());
    let (height, y) = if space_above >= wanted_height || space_above >= space_below {
        let height = wanted_height.min(space_above);
        (height, anchor.y.saturating_sub(height))
    } else {
        (wanted_height.min(space_below), anchor.bottom())
    };
    if height < 2 {
        return None;
    }
    let area = Rect::new(anchor.x, y, anchor.width, height);

    let tabs = category_tabs(catalog, category, area);
    let row_slots = (height - 1) as usize;
    let selected = state.selected_index().unwrap_or(0);
    let first = (selected + 1).saturating_sub(row_slots);
    let rows = visible
        .iter()
        .enumerate()
        .skip(first)
        .take(row_slots)
        .enumerate()
        .map(|(slot, (index, m))| DropdownRow {
            index,
            title: m.tool.display_name(),
            category: m.tool.category.clone(),
            description: m.tool.description.clone(),
            selected: state.selected_index() == Some(index),
            area: Rect::new(area.x, area.y + 1 + slot as u16, area.width, 1),
        })
        .collect();

    Some(DropdownView { area, tabs, rows })
}

fn category_tabs(catalog: &Catalog, current: &CategoryFilter, area: Rect) -> Vec<CategoryTab> {
    let mut labels = vec!["all"];
    labels.extend(catalog.categories());

    let mut tabs = Vec::with_capacity(labels.len());
    let mut x = area.x.saturating_add(TEXT_PADDING);
    for label in labels {
        let width = label.chars().count() as u16 + 2;
        if x.saturating_add(width) > area.right() {
            break;
        }
        tabs.push(CategoryTab {
            label: label.to_string(),
            area: Rect::new(x, area.y, width, 1),
            active: current.label() == label,
        });
        x = x.saturating_add(width + 1);
    }
    tabs
}

/// Rectangles of every composer element for one frame, derived from the
/// screen size and app state. Also answers pointer hit tests.
#[derive(Debug, Clone)]
pub struct ComposerLayout {
    pub transcript: Rect,
    pub chip: Rect,
    pub input: Rect,
    pub input_text: Rect,
    pub input_scroll: u16,
    pub toolbar: Rect,
    pub tools_button: Rect,
    pub status: Rect,
    pub dropdown: Option<DropdownView>,
}

impl ComposerLayout {
    pub fn compute(screen: Rect, app: &App) -> Self {
        let [body, status] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_HEIGHT)]).areas(screen);
        let text_width = body.width.saturating_sub(TEXT_PADDING * 2).max(1);
        let buffer = app.composer().buffer();
        let wrapped = WrappedLayout::new(buffer.text(), text_width);
        let (cursor_row, _) = wrapped.cell_of(buffer.cursor());
        let chip_height = u16::from(app.selected_tool().is_some());
        let max_input_height = body.height.saturating_sub(chip_height + 2).max(1);
        let (input_height, input_scroll) =
            input_box_metrics(wrapped.rows, cursor_row, max_input_height);

        let [transcript, chip, input, toolbar] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(chip_height),
            Constraint::Length(input_height),
            Constraint::Length(1),
        ])
        .areas(body);
        let input_text = input.inner(Margin {
            horizontal: TEXT_PADDING,
            vertical: TEXT_PADDING,
        });
        let button_width = (TOOLS_BUTTON_LABEL.chars().count() as u16).min(toolbar.width);
        let tools_button = Rect::new(
            toolbar.x.saturating_add(TEXT_PADDING).min(toolbar.right()),
            toolbar.y,
            button_width.min(toolbar.width.saturating_sub(TEXT_PADDING)),
            toolbar.height,
        );
        let dropdown = dropdown_view(app.composer().dropdown(), app.composer().catalog(), input, body);

        Self {
            transcript,
            chip,
            input,
            input_text,
            input_scroll,
            toolbar,
            tools_button,
            status,
            dropdown,
        }
    }

    pub fn input_text_width(&self) -> u16 {
        self.input_text.width.max(1)
    }
}

impl HitTest for ComposerLayout {
    fn hit(&self, x: u16, y: u16) -> HitRegion {
        if let Some(view) = &self.dropdown
            && point_in_rect(view.area, x, y)
        {
            if let Some(idx) = view.tabs.iter().position(|tab| point_in_rect(tab.area, x, y)) {
                return HitRegion::DropdownCategory(idx);
            }
            if let Some(row) = view.rows.iter().find(|row| point_in_rect(row.area, x, y)) {
                return HitRegion::DropdownRow(row.index);
            }
            return HitRegion::Dropdown;
        }
        if point_in_rect(self.tools_button, x, y) {
            return HitRegion::ToolsButton;
        }
        if point_in_rect(self.input, x, y) {
            let col = x.saturating_sub(self.input_text.x);
            let row = y
                .saturating_sub(self.input_text.y)
                .min(self.input_text.height.saturating_sub(1))
                .saturating_add(self.input_scroll);
            return HitRegion::Input { row, col };
        }
        HitRegion::Outside
    }
}

pub fn transcript_max_scroll(screen: Rect, app: &App) -> u16 {
    let layout = ComposerLayout::compute(screen, app);
    let area = layout.transcript;
    if area.width < 1 || area.height < 1 {
        return 0;
    }
    let width = area.width.saturating_sub(TEXT_PADDING * 2).max(1);
    let total = transcript_layout(app.transcript(), width).rows;
    total.saturating_sub(area.height.saturating_sub(TEXT_PADDING * 2))
}

pub fn render(frame: &mut Frame, app: &App, theme: &Theme) {
    let layout = ComposerLayout::compute(frame.area(), app);

    render_transcript(frame, &layout, app, theme);
    render_chip(frame, &layout, app, theme);
    render_input(frame, &layout, app, theme);
    render_toolbar(frame, &layout, app, theme);

    frame.render_widget(
        Paragraph::new(STATUS_HELP_TEXT)
            .style(Style::default().bg(theme.status_bg).fg(theme.muted_fg))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.status_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        layout.status,
    );

    if let Some(view) = &layout.dropdown {
        render_dropdown(frame, view, theme);
    }
}

fn render_transcript(frame: &mut Frame, layout: &ComposerLayout, app: &App, theme: &Theme) {
    let area = layout.transcript;
    let width = area.width.saturating_sub(TEXT_PADDING * 2).max(1);
    let wrapped = transcript_layout(app.transcript(), width);
    let max_scroll = wrapped
        .rows
        .saturating_sub(area.height.saturating_sub(TEXT_PADDING * 2));
    let lines = wrapped
        .rendered
        .lines()
        .map(|line| {
            let style = if line.starts_with("You:") {
                Style::default().fg(theme.text_fg)
            } else {
                Style::default().fg(theme.muted_fg)
            };
            Line::styled(line.to_string(), style)
        })
        .collect::<Vec<_>>();
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .scroll((app.transcript_scroll().min(max_scroll), 0))
            .style(Style::default().bg(theme.transcript_bg))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.transcript_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        area,
    );
}

fn render_chip(frame: &mut Frame, layout: &ComposerLayout, app: &App, theme: &Theme) {
    let Some(tool) = app.selected_tool() else {
        return;
    };
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!(" {} ", tool.label()),
            Style::default().fg(theme.accent_fg).bg(theme.selected_bg),
        ),
        Span::styled("  Esc to remove", Style::default().fg(theme.muted_fg)),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme.transcript_bg)),
        layout.chip,
    );
}

fn render_input(frame: &mut Frame, layout: &ComposerLayout, app: &App, theme: &Theme) {
    let buffer = app.composer().buffer();
    let block = Block::default()
        .style(Style::default().bg(theme.input_bg))
        .padding(Padding::uniform(TEXT_PADDING));
    let paragraph = if buffer.is_empty() {
        Paragraph::new(app.placeholder().to_string())
            .style(Style::default().bg(theme.input_bg).fg(theme.muted_fg))
    } else {
        let wrapped = WrappedLayout::new(buffer.text(), layout.input_text_width());
        Paragraph::new(wrapped.rendered)
            .style(Style::default().bg(theme.input_bg).fg(theme.text_fg))
            .scroll((layout.input_scroll, 0))
    };
    frame.render_widget(paragraph.block(block), layout.input);

    let inner = layout.input_text;
    if inner.width == 0 || inner.height == 0 {
        return;
    }
    let (row, col) = buffer.cursor_cell(layout.input_text_width());
    let visible_row = row.saturating_sub(layout.input_scroll);
    if visible_row < inner.height {
        frame.set_cursor_position((
            inner.x.saturating_add(col.min(inner.width.saturating_sub(1))),
            inner.y.saturating_add(visible_row),
        ));
    }
}

fn render_toolbar(frame: &mut Frame, layout: &ComposerLayout, app: &App, theme: &Theme) {
    let button_style = if app.is_tools_open() {
        Style::default().bg(theme.accent_fg).fg(Color::Black)
    } else {
        Style::default().bg(theme.selected_bg).fg(theme.text_fg)
    };
    let line = Line::from(vec![
        Span::raw(" ".repeat(TEXT_PADDING as usize)),
        Span::styled(TOOLS_BUTTON_LABEL, button_style),
        Span::styled(TOOLBAR_HINT, Style::default().fg(theme.muted_fg)),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme.input_bg)),
        layout.toolbar,
    );
}

fn render_dropdown(frame: &mut Frame, view: &DropdownView, theme: &Theme) {
    frame.render_widget(Clear, view.area);
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.dropdown_bg)),
        view.area,
    );

    for tab in &view.tabs {
        let style = if tab.active {
            Style::default().bg(theme.accent_fg).fg(Color::Black)
        } else {
            Style::default().bg(theme.dropdown_bg).fg(theme.muted_fg)
        };
        frame.render_widget(
            Paragraph::new(format!(" {} ", tab.label)).style(style),
            tab.area,
        );
    }

    if view.rows.is_empty() {
        let area = Rect::new(view.area.x, view.area.y + 1, view.area.width, 1);
        frame.render_widget(
            Paragraph::new(format!(" {EMPTY_CATEGORY_TEXT}"))
                .style(Style::default().bg(theme.dropdown_bg).fg(theme.muted_fg)),
            area,
        );
        return;
    }

    for row in &view.rows {
        let bg = if row.selected {
            theme.selected_bg
        } else {
            theme.dropdown_bg
        };
        let title_fg = if row.selected {
            theme.accent_fg
        } else {
            theme.text_fg
        };
        let mut spans = vec![
            Span::raw(if row.selected { "> " } else { "  " }),
            Span::styled(row.title.clone(), Style::default().fg(title_fg)),
            Span::styled(
                format!("  {}", row.category),
                Style::default().fg(theme.muted_fg),
            ),
        ];
        if let Some(description) = &row.description {
            spans.push(Span::styled(
                format!("  {description}"),
                Style::default().fg(theme.muted_fg),
            ));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
            row.area,
        );
    }
}

fn transcript_layout(lines: &[String], width: u16) -> WrappedLayout {
    WrappedLayout::new(&lines.join("\n"), width)
}

fn input_box_metrics(input_text_lines: u16, cursor_line: u16, max_input_height: u16) -> (u16, u16) {
    let capped_text_lines = input_text_lines.clamp(1, MAX_INPUT_TEXT_LINES);
    let desired_height = capped_text_lines.saturating_add(TEXT_PADDING * 2);
    let input_height = desired_height.clamp(1, max_input_height.max(1));
    let visible_text_lines = input_height.saturating_sub(TEXT_PADDING * 2).max(1);
    let max_scroll = input_text_lines.saturating_sub(visible_text_lines);
    let input_scroll = cursor_line
        .saturating_sub(visible_text_lines.saturating_sub(1))
        .min(max_scroll);
    (input_height, input_scroll)
}

fn point_in_rect(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom()
}

#[cfg(test)]
#[path = "../tests/unit/ui_tests.rs"]
mod tests;
