use anyhow::{Context, Result};
use aus_covid_map::app::App;
use aus_covid_map::config::{AppConfig, Cli};
use aus_covid_map::overlay::FullscreenState;
use aus_covid_map::{data, ui};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use std::fs::File;
use std::sync::Mutex;
use std::time::Duration;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const IDLE_INTERVAL: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli)?;

    // The terminal belongs to the UI, so logs go to a file
    let log_file = File::create(&config.log.file)
        .with_context(|| format!("creating log file {}", config.log.file.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_max_level(cli.log_level)
        .with_target(false)
        .init();

    tracing::info!(?config, "starting");
    let views = data::load_views(&config.data);

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, views);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Pointer movement drives hover, a left press selects or toggles fullscreen
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => app.hover(mouse.column, mouse.row),
        MouseEventKind::Down(MouseButton::Left) => {
            app.hover(mouse.column, mouse.row);
            app.click(mouse.column, mouse.row);
        }
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, views: data::LoadedViews) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(views, size.width, size.height);

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        // ~60fps while charts animate, otherwise only wake for input
        let timeout = if app.is_animating() {
            FRAME_INTERVAL
        } else {
            IDLE_INTERVAL
        };
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') => app.quit(),
                    KeyCode::Esc => app.escape(),
                    KeyCode::Tab => app.next_tab(),
                    KeyCode::Char('d') => app.toggle_fullscreen(FullscreenState::DeathsFullscreen),
                    KeyCode::Char('v') => {
                        app.toggle_fullscreen(FullscreenState::VaccinationFullscreen)
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    tracing::info!("exiting");
    Ok(())
}
