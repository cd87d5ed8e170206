use tracing::info;

use crate::catalog::format_tool_name;
use crate::composer::{ComposerAction, ComposerInput, HitRegion};
use crate::config::ComposerConfig;
use crate::dropdown::NavKey;

const MAX_TRANSCRIPT_LINES: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedTool {
    pub name: String,
    pub category: String,
}

impl SelectedTool {
    pub fn label(&self) -> String {
        format!("Tool: {} ({})", format_tool_name(&self.name), self.category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub text: String,
    pub tool: Option<SelectedTool>,
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub ticks: u64,
    composer: ComposerInput,
    placeholder: String,
    selected_tool: Option<SelectedTool>,
    transcript: Vec<String>,
    transcript_scroll: u16,
}

impl App {
    pub fn new(config: ComposerConfig) -> Self {
        let ComposerConfig {
            placeholder,
            ranking,
            catalog,
        } = config;
        Self {
            running: true,
            ticks: 0,
            composer: ComposerInput::with_scorer(catalog, ranking.scorer()),
            placeholder,
            selected_tool: None,
            transcript: vec!["Type / to browse tools, Ctrl+T toggles the tool list.".to_string()],
            transcript_scroll: 0,
        }
    }

    pub fn on_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn composer(&self) -> &ComposerInput {
        &self.composer
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn selected_tool(&self) -> Option<&SelectedTool> {
        self.selected_tool.as_ref()
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn transcript_scroll(&self) -> u16 {
        self.transcript_scroll
    }

    pub fn is_tools_open(&self) -> bool {
        self.composer.is_dropdown_open()
    }

    pub fn input_char(&mut self, c: char) {
        self.composer.insert_char(c);
    }

    pub fn insert_newline(&mut self) {
        self.composer.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        self.composer.backspace();
    }

    pub fn delete_forward(&mut self) {
        self.composer.delete_forward();
    }

    pub fn move_cursor_left(&mut self) {
        self.composer.move_left();
    }

    pub fn move_cursor_right(&mut self) {
        self.composer.move_right();
    }

    pub fn move_cursor_home(&mut self) {
        self.composer.move_line_start();
    }

    pub fn move_cursor_end(&mut self) {
        self.composer.move_line_end();
    }

    pub fn toggle_tools(&mut self) {
        let action = self.composer.toggle_dropdown();
        self.on_action(action, 0);
    }

    pub fn next_category(&mut self) {
        self.composer.next_category();
    }

    pub fn prev_category(&mut self) {
        self.composer.prev_category();
    }

    /// Routes a navigation key to the dropdown first, then to the composer's
    /// own handling. `width` is the wrapped text width of the input.
    pub fn on_nav_key(&mut self, key: NavKey, width: u16) -> Option<Submission> {
        let action = self.composer.handle_key(key);
        self.on_action(action, width)
    }

    pub fn on_pointer(&mut self, region: HitRegion, width: u16) {
        let action = self.composer.handle_pointer(region, width);
        self.on_action(action, width);
    }

    pub fn scroll_transcript_up(&mut self) {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(1);
    }

    pub fn scroll_transcript_down(&mut self, max_scroll: u16) {
        self.transcript_scroll = self.transcript_scroll.saturating_add(1).min(max_scroll);
    }

    pub fn follow_transcript(&mut self, max_scroll: u16) {
        self.transcript_scroll = max_scroll;
    }

    pub fn remove_selected_tool(&mut self) -> bool {
        self.selected_tool.take().is_some()
    }

    /// Submits the trimmed buffer. Nothing is sent when there is no text and no tool.
    pub fn submit(&mut self) -> Option<Submission> {
        if self.composer.text().trim().is_empty() && self.selected_tool.is_none() {
            return None;
        }
        let text = self.composer.take_text().unwrap_or_default();
        let tool = self.selected_tool.take();
        let line = match (&tool, text.is_empty()) {
            (Some(tool), true) => format!("You: [tool: {}]", tool.name),
            (Some(tool), false) => format!("You: {text} [tool: {}]", tool.name),
            (None, _) => format!("You: {text}"),
        };
        self.push_transcript(line);
        info!(
            chars = text.chars().count(),
            tool = tool.as_ref().map(|t| t.name.as_str()),
            "message submitted"
        );
        Some(Submission { text, tool })
    }

    pub fn push_transcript(&mut self, line: impl Into<String>) {
        self.transcript.push(line.into());
        if self.transcript.len() > MAX_TRANSCRIPT_LINES {
            let overflow = self.transcript.len() - MAX_TRANSCRIPT_LINES;
            self.transcript.drain(0..overflow);
        }
    }

    fn on_action(&mut self, action: ComposerAction, width: u16) -> Option<Submission> {
        match action {
            ComposerAction::ToolSelected { name, category } => {
                self.selected_tool = Some(SelectedTool { name, category });
                None
            }
            ComposerAction::PassThrough(key) => self.on_unhandled_key(key, width),
            ComposerAction::Consumed | ComposerAction::Dismissed(_) => None,
        }
    }

    fn on_unhandled_key(&mut self, key: NavKey, width: u16) -> Option<Submission> {
        match key {
            NavKey::Enter => self.submit(),
            NavKey::Escape => {
                self.remove_selected_tool();
                None
            }
            NavKey::Up => {
                self.composer.move_up(width);
                None
            }
            NavKey::Down => {
                self.composer.move_down(width);
                None
            }
            NavKey::Tab => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/app_tests.rs"]
mod tests;
