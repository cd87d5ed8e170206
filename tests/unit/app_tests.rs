use super::*;
use crate::catalog::{Catalog, Tool};
use crate::config::{ComposerConfig, DEFAULT_PLACEHOLDER, Ranking};

fn app_with(tools: Vec<Tool>) -> App {
    App::new(ComposerConfig {
        placeholder: DEFAULT_PLACEHOLDER.to_string(),
        ranking: Ranking::Uniform,
        catalog: Catalog::new(tools),
    })
}

fn sample_app() -> App {
    App::new(ComposerConfig::default())
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        app.input_char(ch);
    }
}

#[test]
fn default_state_is_running_with_empty_input() {
    let app = sample_app();
    assert!(app.running);
    assert_eq!(app.ticks, 0);
    assert!(app.composer().text().is_empty());
    assert!(!app.is_tools_open());
    assert!(app.selected_tool().is_none());
    assert_eq!(app.placeholder(), DEFAULT_PLACEHOLDER);
    assert_eq!(app.transcript().len(), 1);
}

#[test]
fn tick_and_quit_update_app_state() {
    let mut app = sample_app();
    app.on_tick();
    app.on_tick();
    assert_eq!(app.ticks, 2);
    app.quit();
    assert!(!app.running);
}

#[test]
fn enter_commits_tool_then_submits_on_next_enter() {
    let mut app = app_with(vec![
        Tool::new("search_web", "search", None),
        Tool::new("send_email", "email", None),
    ]);
    type_text(&mut app, "find cats /sea");
    assert!(app.is_tools_open());

    assert_eq!(app.on_nav_key(NavKey::Enter, 80), None);
    assert_eq!(
        app.selected_tool(),
        Some(&SelectedTool {
            name: "search_web".to_string(),
            category: "search".to_string(),
        })
    );
    assert_eq!(app.composer().text(), "find cats ");

    let submission = app.on_nav_key(NavKey::Enter, 80).expect("message should submit");
    assert_eq!(submission.text, "find cats");
    assert_eq!(
        submission.tool.map(|t| t.name),
        Some("search_web".to_string())
    );
    assert!(app.selected_tool().is_none());
    assert!(app.composer().text().is_empty());
    assert_eq!(
        app.transcript().last().map(String::as_str),
        Some("You: find cats [tool: search_web]")
    );
}

#[test]
fn submit_ignores_blank_input_without_tool() {
    let mut app = sample_app();
    type_text(&mut app, "   ");
    assert_eq!(app.on_nav_key(NavKey::Enter, 80), None);
    assert_eq!(app.transcript().len(), 1);
}

#[test]
fn submit_allows_tool_without_text() {
    let mut app = sample_app();
    app.toggle_tools();
    app.on_nav_key(NavKey::Enter, 80);
    let submission = app.on_nav_key(NavKey::Enter, 80).expect("tool-only submit");
    assert!(submission.text.is_empty());
    assert_eq!(
        app.transcript().last().map(String::as_str),
        Some("You: [tool: send_email]")
    );
}

#[test]
fn escape_closes_dropdown_before_clearing_tool() {
    let mut app = sample_app();
    app.toggle_tools();
    app.on_nav_key(NavKey::Enter, 80);
    assert!(app.selected_tool().is_some());

    type_text(&mut app, "/we");
    assert!(app.is_tools_open());
    app.on_nav_key(NavKey::Escape, 80);
    assert!(!app.is_tools_open());
    assert!(app.selected_tool().is_some());
    assert_eq!(app.composer().text(), "/we");

    app.on_nav_key(NavKey::Escape, 80);
    assert!(app.selected_tool().is_none());
}

#[test]
fn up_down_move_the_text_cursor_when_closed() {
    let mut app = sample_app();
    type_text(&mut app, "one");
    app.insert_newline();
    type_text(&mut app, "two");
    assert_eq!(app.composer().cursor(), 7);
    app.on_nav_key(NavKey::Up, 80);
    assert_eq!(app.composer().cursor(), 3);
    app.on_nav_key(NavKey::Down, 80);
    assert_eq!(app.composer().cursor(), 7);
}

#[test]
fn up_down_move_dropdown_selection_when_open() {
    let mut app = sample_app();
    type_text(&mut app, "line\n/");
    let cursor = app.composer().cursor();
    app.on_nav_key(NavKey::Down, 80);
    assert_eq!(app.composer().dropdown().selected_index(), Some(1));
    assert_eq!(app.composer().cursor(), cursor);
}

#[test]
fn toggling_tools_reports_open_state() {
    let mut app = sample_app();
    app.toggle_tools();
    assert!(app.is_tools_open());
    app.toggle_tools();
    assert!(!app.is_tools_open());
}

#[test]
fn outside_click_closes_dropdown() {
    let mut app = sample_app();
    type_text(&mut app, "/");
    app.on_pointer(HitRegion::Outside, 80);
    assert!(!app.is_tools_open());
    assert_eq!(app.composer().text(), "/");
}

#[test]
fn category_cycling_reaches_the_composer() {
    let mut app = sample_app();
    app.toggle_tools();
    app.next_category();
    let rows = app.composer().dropdown().visible_matches().len();
    assert_eq!(rows, 2);
    app.prev_category();
    assert_eq!(
        app.composer().dropdown().visible_matches().len(),
        app.composer().catalog().len()
    );
}

#[test]
fn transcript_is_capped() {
    let mut app = sample_app();
    for idx in 0..(MAX_TRANSCRIPT_LINES + 20) {
        app.push_transcript(format!("line {idx}"));
    }
    assert_eq!(app.transcript().len(), MAX_TRANSCRIPT_LINES);
    assert!(
        app.transcript()
            .last()
            .is_some_and(|line| line.ends_with(&format!("{}", MAX_TRANSCRIPT_LINES + 19)))
    );
}

#[test]
fn transcript_scroll_is_bounded() {
    let mut app = sample_app();
    app.scroll_transcript_up();
    assert_eq!(app.transcript_scroll(), 0);
    app.scroll_transcript_down(2);
    app.scroll_transcript_down(2);
    app.scroll_transcript_down(2);
    assert_eq!(app.transcript_scroll(), 2);
    app.follow_transcript(7);
    assert_eq!(app.transcript_scroll(), 7);
}

#[test]
fn transcript_scroll_saturates_at_the_top_of_its_range() {
    let mut app = sample_app();
    app.follow_transcript(u16::MAX);
    app.scroll_transcript_down(u16::MAX);
    assert_eq!(app.transcript_scroll(), u16::MAX);
}

#[test]
fn selected_tool_label_uses_title_case() {
    let tool = SelectedTool {
        name: "send_email".to_string(),
        category: "email".to_string(),
    };
    assert_eq!(tool.label(), "Tool: Send Email (email)");
}
