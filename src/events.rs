use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

use crate::dropdown::NavKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    Quit,
    Nav(NavKey),
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    InputChar(char),
    Newline,
    Backspace,
    Delete,
    ToggleTools,
    NextCategory,
    PrevCategory,
    ScrollTranscriptUp,
    ScrollTranscriptDown,
    MouseLeftClick(u16, u16),
}

fn map_key_event(key_event: KeyEvent) -> AppEvent {
    if key_event.kind != KeyEventKind::Press {
        return AppEvent::Tick;
    }

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key_event.modifiers.contains(KeyModifiers::SHIFT);
    let alt = key_event.modifiers.contains(KeyModifiers::ALT);

    match key_event.code {
        KeyCode::Char('c') if ctrl => AppEvent::Quit,
        KeyCode::Char('t') if ctrl => AppEvent::ToggleTools,
        KeyCode::Char('j') if ctrl => AppEvent::Newline,
        KeyCode::Left if ctrl => AppEvent::PrevCategory,
        KeyCode::Right if ctrl => AppEvent::NextCategory,
        KeyCode::Up if shift || ctrl => AppEvent::ScrollTranscriptUp,
        KeyCode::Down if shift || ctrl => AppEvent::ScrollTranscriptDown,
        KeyCode::Enter if shift || alt => AppEvent::Newline,
        KeyCode::PageUp => AppEvent::ScrollTranscriptUp,
        KeyCode::PageDown => AppEvent::ScrollTranscriptDown,
        KeyCode::Up => AppEvent::Nav(NavKey::Up),
        KeyCode::Down => AppEvent::Nav(NavKey::Down),
        KeyCode::Enter => AppEvent::Nav(NavKey::Enter),
        KeyCode::Tab => AppEvent::Nav(NavKey::Tab),
        KeyCode::Esc => AppEvent::Nav(NavKey::Escape),
        KeyCode::Left => AppEvent::CursorLeft,
        KeyCode::Right => AppEvent::CursorRight,
        KeyCode::Home => AppEvent::CursorHome,
        KeyCode::End => AppEvent::CursorEnd,
        KeyCode::Backspace => AppEvent::Backspace,
        KeyCode::Delete => AppEvent::Delete,
        KeyCode::Char(_) if ctrl => AppEvent::Tick,
        KeyCode::Char(c) => AppEvent::InputChar(c),
        _ => AppEvent::Tick,
    }
}

fn map_mouse_event_kind(kind: MouseEventKind, column: u16, row: u16) -> AppEvent {
    match kind {
        MouseEventKind::ScrollUp => AppEvent::ScrollTranscriptUp,
        MouseEventKind::ScrollDown => AppEvent::ScrollTranscriptDown,
        MouseEventKind::Down(MouseButton::Left) => AppEvent::MouseLeftClick(column, row),
        _ => AppEvent::Tick,
    }
}

pub fn next_event() -> io::Result<AppEvent> {
    if event::poll(Duration::from_millis(16))? {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                return Ok(map_key_event(key_event));
            }
            Event::Mouse(mouse_event) => {
                return Ok(map_mouse_event_kind(
                    mouse_event.kind,
                    mouse_event.column,
                    mouse_event.row,
                ));
            }
            _ => {}
        }
    }

    Ok(AppEvent::Tick)
}
