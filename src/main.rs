use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use crossterm::cursor::SetCursorStyle;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod app;
mod catalog;
mod composer;
mod config;
mod dropdown;
mod events;
mod input;
mod slash;
mod text_layout;
mod theme;
mod ui;

use app::App;
use composer::HitTest;
use config::ComposerConfig;
use events::AppEvent;
use theme::Theme;
use ui::ComposerLayout;

const DEFAULT_LOG_FILTER: &str = "slash_composer=info";

/// Terminal chat composer with slash-command tool selection.
#[derive(Debug, Parser)]
#[command(name = "slash-composer", version)]
struct Cli {
    /// Composer settings and tool catalog.
    #[arg(long, default_value = "composer.toml")]
    config: PathBuf,

    /// Color theme.
    #[arg(long, default_value = "theme.toml")]
    theme: PathBuf,

    /// Where to write logs. Defaults to slash-composer.log in the temp dir.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the resolved tool catalog as JSON and exit.
    #[arg(long)]
    list_tools: bool,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("slash-composer.log"));
    let _log_guard = init_logging(&log_path)?;

    let config = ComposerConfig::load(&cli.config).map_err(|err| {
        error!("{err}");
        io::Error::other(err)
    })?;

    if cli.list_tools {
        let json =
            serde_json::to_string_pretty(config.catalog.tools()).map_err(io::Error::other)?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{json}")?;
        return Ok(());
    }

    let theme = Theme::load_or_default(&cli.theme);

    enable_raw_mode()?;
    let mut terminal = match setup_terminal() {
        Ok(terminal) => terminal,
        Err(err) => {
            error!("terminal setup failed: {err}");
            let _ = disable_raw_mode();
            let _ = leave_terminal(&mut io::stdout());
            return Err(err);
        }
    };
    info!(tools = config.catalog.len(), "composer started");
    let result = run_app(&mut terminal, App::new(config), &theme);

    disable_raw_mode()?;
    leave_terminal(terminal.backend_mut())?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!("composer exited with error: {err}");
    }
    result
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        SetCursorStyle::SteadyBar
    )?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

/// Undoes the screen, mouse and cursor changes made by `setup_terminal`.
fn leave_terminal(out: &mut impl Write) -> io::Result<()> {
    execute!(
        out,
        SetCursorStyle::DefaultUserShape,
        DisableMouseCapture,
        LeaveAlternateScreen
    )
}

fn init_logging(path: &Path) -> io::Result<WorkerGuard> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new().create(true).append(true).open(path)?;
    let (writer, guard) = tracing_appender::non_blocking(log_file);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_filter(filter);
    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .map_err(io::Error::other)?;
    Ok(guard)
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    theme: &Theme,
) -> io::Result<()> {
    while app.running {
        terminal.draw(|frame| ui::render(frame, &app, theme))?;

        let size = terminal.size()?;
        let screen = Rect::new(0, 0, size.width, size.height);
        let layout = ComposerLayout::compute(screen, &app);
        let width = layout.input_text_width();

        match events::next_event()? {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Quit => app.quit(),
            AppEvent::Nav(key) => {
                if app.on_nav_key(key, width).is_some() {
                    app.follow_transcript(ui::transcript_max_scroll(screen, &app));
                }
            }
            AppEvent::CursorLeft => app.move_cursor_left(),
            AppEvent::CursorRight => app.move_cursor_right(),
            AppEvent::CursorHome => app.move_cursor_home(),
            AppEvent::CursorEnd => app.move_cursor_end(),
            AppEvent::InputChar(c) => app.input_char(c),
            AppEvent::Newline => app.insert_newline(),
            AppEvent::Backspace => app.backspace(),
            AppEvent::Delete => app.delete_forward(),
            AppEvent::ToggleTools => app.toggle_tools(),
            AppEvent::NextCategory => app.next_category(),
            AppEvent::PrevCategory => app.prev_category(),
            AppEvent::ScrollTranscriptUp => app.scroll_transcript_up(),
            AppEvent::ScrollTranscriptDown => {
                app.scroll_transcript_down(ui::transcript_max_scroll(screen, &app));
            }
            AppEvent::MouseLeftClick(x, y) => {
                let region = layout.hit(x, y);
                app.on_pointer(region, width);
            }
        }
    }

    Ok(())
}
