use super::*;
use crate::catalog::Tool;
use crate::config::ComposerConfig;
use crate::dropdown::{DetectContext, DropdownEvent, NavKey, transition};
use crate::slash::UniformScorer;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;

fn sample_app() -> App {
    App::new(ComposerConfig::default())
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        app.input_char(ch);
    }
}

fn render_text(app: &App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("test terminal should initialize");
    let theme = Theme::default();
    terminal
        .draw(|frame| render(frame, app, &theme))
        .expect("render should succeed");
    buffer_to_string(terminal.backend().buffer())
}

fn buffer_to_string(buffer: &Buffer) -> String {
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

fn open_state(catalog: &Catalog, text: &str) -> DropdownState {
    let ctx = DetectContext {
        catalog,
        scorer: &UniformScorer,
    };
    transition(
        DropdownState::Closed,
        DropdownEvent::BufferEdited {
            text,
            cursor: text.chars().count(),
        },
        &ctx,
    )
    .0
}

#[test]
fn render_shows_placeholder_toolbar_and_help() {
    let app = sample_app();
    let text = render_text(&app, 120, 30);
    assert!(text.contains("What can I do for you today?"));
    assert!(text.contains("/ Tools"));
    assert!(text.contains("Ctrl+T tools"));
    assert!(!text.contains("Send Email"));
}

#[test]
fn render_shows_dropdown_rows_when_typing_a_command() {
    let mut app = sample_app();
    type_text(&mut app, "/send");
    let text = render_text(&app, 120, 30);
    assert!(text.contains("> Send Email"));
    assert!(text.contains("Send Notification"));
    assert!(!text.contains("Create Event"));
    assert!(text.contains(" all "));
    assert!(text.contains(" calendar "));
}

#[test]
fn render_marks_the_selected_row() {
    let mut app = sample_app();
    type_text(&mut app, "/send");
    app.on_nav_key(NavKey::Down, 100);
    let text = render_text(&app, 120, 30);
    assert!(text.contains("> Send Notification"));
    assert!(!text.contains("> Send Email"));
}

#[test]
fn render_shows_selected_tool_chip() {
    let mut app = sample_app();
    type_text(&mut app, "/weather");
    app.on_nav_key(NavKey::Enter, 100);
    let text = render_text(&app, 120, 30);
    assert!(text.contains("Tool: Get Weather (weather)"));
    assert!(text.contains("Esc to remove"));
}

#[test]
fn render_shows_empty_category_message() {
    let mut app = App::new(ComposerConfig {
        catalog: Catalog::new(vec![
            Tool::new("send_email", "email", None),
            Tool::new("search_web", "search", None),
        ]),
        ..ComposerConfig::default()
    });
    type_text(&mut app, "/email");
    app.next_category();
    app.next_category();
    let text = render_text(&app, 100, 24);
    assert!(text.contains(EMPTY_CATEGORY_TEXT));
}

#[test]
fn dropdown_sits_directly_above_the_input() {
    let catalog = Catalog::sample();
    let state = open_state(&catalog, "/");
    let anchor = Rect::new(0, 20, 80, 3);
    let bounds = Rect::new(0, 0, 80, 27);
    let view = dropdown_view(&state, &catalog, anchor, bounds).expect("dropdown should show");
    assert_eq!(view.area.bottom(), anchor.y);
    assert_eq!(view.area.width, anchor.width);
    assert_eq!(view.rows.len(), catalog.len());
    assert!(view.rows[0].selected);
    assert_eq!(view.tabs[0].label, "all");
    assert!(view.tabs[0].active);
}

#[test]
fn dropdown_flips_below_when_there_is_no_room_above() {
    let catalog = Catalog::sample();
    let state = open_state(&catalog, "/");
    let anchor = Rect::new(0, 1, 80, 3);
    let bounds = Rect::new(0, 0, 80, 30);
    let view = dropdown_view(&state, &catalog, anchor, bounds).expect("dropdown should show");
    assert_eq!(view.area.y, anchor.bottom());
}

#[test]
fn dropdown_scrolls_to_keep_selection_visible() {
    let catalog = Catalog::sample();
    let mut state = open_state(&catalog, "/");
    let ctx = DetectContext {
        catalog: &catalog,
        scorer: &UniformScorer,
    };
    for _ in 0..7 {
        state = transition(state, DropdownEvent::Key(NavKey::Down), &ctx).0;
    }
    let anchor = Rect::new(0, 5, 60, 3);
    let bounds = Rect::new(0, 0, 60, 8);
    let view = dropdown_view(&state, &catalog, anchor, bounds).expect("dropdown should show");
    assert_eq!(view.area.height, 5);
    assert_eq!(view.rows.len(), 4);
    let last = view.rows.last().expect("rows");
    assert_eq!(last.index, 7);
    assert!(last.selected);
}

#[test]
fn closed_dropdown_has_no_view() {
    let catalog = Catalog::sample();
    let view = dropdown_view(
        &DropdownState::Closed,
        &catalog,
        Rect::new(0, 10, 40, 3),
        Rect::new(0, 0, 40, 20),
    );
    assert!(view.is_none());
}

#[test]
fn category_tabs_that_do_not_fit_are_dropped() {
    let catalog = Catalog::sample();
    let state = open_state(&catalog, "/");
    let view = dropdown_view(&state, &catalog, Rect::new(0, 20, 20, 3), Rect::new(0, 0, 20, 24))
        .expect("dropdown should show");
    assert!(view.tabs.len() < catalog.categories().len() + 1);
    assert!(view.tabs.iter().all(|tab| tab.area.right() <= 20));
}

#[test]
fn hit_test_resolves_each_region() {
    let mut app = sample_app();
    type_text(&mut app, "/");
    let screen = Rect::new(0, 0, 100, 30);
    let layout = ComposerLayout::compute(screen, &app);
    let view = layout.dropdown.clone().expect("dropdown open");

    let row = &view.rows[2];
    assert_eq!(layout.hit(row.area.x + 3, row.area.y), HitRegion::DropdownRow(2));
    let tab = &view.tabs[1];
    assert_eq!(layout.hit(tab.area.x, tab.area.y), HitRegion::DropdownCategory(1));
    assert_eq!(
        layout.hit(layout.tools_button.x, layout.tools_button.y),
        HitRegion::ToolsButton
    );
    assert_eq!(
        layout.hit(layout.input_text.x + 1, layout.input_text.y),
        HitRegion::Input { row: 0, col: 1 }
    );
    assert_eq!(layout.hit(50, layout.transcript.y), HitRegion::Outside);
    assert_eq!(
        layout.hit(layout.status.x, layout.status.y),
        HitRegion::Outside
    );
}

#[test]
fn clicking_a_rendered_row_commits_it() {
    let mut app = sample_app();
    type_text(&mut app, "/");
    let layout = ComposerLayout::compute(Rect::new(0, 0, 100, 30), &app);
    let region = {
        let row = &layout.dropdown.as_ref().expect("dropdown open").rows[5];
        layout.hit(row.area.x + 2, row.area.y)
    };
    app.on_pointer(region, layout.input_text_width());
    assert_eq!(
        app.selected_tool().map(|t| t.name.as_str()),
        Some("search_web")
    );
    assert!(!app.is_tools_open());
}

#[test]
fn input_grows_then_caps_and_scrolls() {
    let (height, scroll) = input_box_metrics(1, 0, 20);
    assert_eq!((height, scroll), (3, 0));
    let (height, scroll) = input_box_metrics(9, 8, 20);
    assert_eq!(height, MAX_INPUT_TEXT_LINES + TEXT_PADDING * 2);
    assert_eq!(scroll, 4);
    let (height, _) = input_box_metrics(9, 0, 4);
    assert_eq!(height, 4);
}

#[test]
fn transcript_scroll_grows_with_messages() {
    let mut app = sample_app();
    let screen = Rect::new(0, 0, 80, 20);
    let before = transcript_max_scroll(screen, &app);
    for idx in 0..40 {
        app.push_transcript(format!("message {idx}"));
    }
    assert!(transcript_max_scroll(screen, &app) > before);
}
