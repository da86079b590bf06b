use std::fs::File;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use popmap::app::App;
use popmap::config::{Cli, Command, Settings};
use popmap::export::write_view;
use popmap::loader::Loader;
use popmap::router::Route;
use popmap::source::{DataSource, FileSource};
use popmap::{ui, views};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("popmap=info"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from(&cli);

    match &cli.command {
        Some(Command::Routes) => {
            for name in Route::NAMES {
                println!("#{name}");
            }
            Ok(())
        }
        Some(Command::Export { route }) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(io::stderr)
                .init();
            export(route, &settings)
        }
        None => {
            let log = File::create(&cli.log_file)
                .with_context(|| format!("creating log file {}", cli.log_file.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(Mutex::new(log))
                .with_ansi(false)
                .init();
            run_tui(&cli.route, settings)
        }
    }
}

/// Build one view headlessly and print it as CSV
fn export(hash: &str, settings: &Settings) -> Result<()> {
    let route = Route::parse(hash).ok_or_else(|| anyhow!("unknown route {hash:?}"))?;
    let source = FileSource::new(settings)?;
    let view = views::build(&source, &route, settings)?;
    write_view(&view, io::stdout().lock())?;
    Ok(())
}

fn run_tui(initial: &str, settings: Settings) -> Result<()> {
    let source: Arc<dyn DataSource> = Arc::new(FileSource::new(&settings)?);
    info!(data_dir = %settings.data_dir.display(), api = %settings.api_url, "starting dashboard");
    let loader = Loader::new(source, settings);

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, loader, initial);

    // Disable mouse capture and restore terminal
    let _ = execute!(io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Handle mouse events for hover, clicks, panning and zooming
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // Always track mouse position for hover
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        // Scroll wheel for zooming towards mouse position
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        // Click opens a country, drag pans
        MouseEventKind::Down(MouseButton::Left) => app.press(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.handle_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.release(mouse.column, mouse.row),
        _ => {}
    }
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_prompt(),
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Backspace => app.prompt_pop(),
        KeyCode::Char(c) => app.prompt_push(c),
        _ => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        // Navigation
        KeyCode::Char(':') | KeyCode::Char('#') => app.open_prompt(),
        KeyCode::Char('m') => app.navigate("#map"),
        KeyCode::Char('w') => app.navigate("#world"),
        KeyCode::Char('r') => app.navigate("#worldPopulationRate"),
        KeyCode::Char('c') | KeyCode::Enter => {
            if let Some(country) = app.focus_country() {
                app.navigate(&Route::CountryChart { country }.to_hash());
            }
        }
        KeyCode::Char('b') => {
            if let Some(country) = app.focus_country() {
                app.navigate(&Route::CountryBirthDeathRate { country }.to_hash());
            }
        }
        KeyCode::Backspace => app.back(),
        KeyCode::F(5) | KeyCode::Char('R') => app.reload(),

        // Pan with hjkl or arrow keys
        KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
        KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
        KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
        KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

        // Zoom
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

        KeyCode::Char('o') | KeyCode::Char('O') => app.toggle_borders(),
        KeyCode::Char('0') => app.reset_view(),

        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, loader: Loader, initial: &str) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(loader, size.width, size.height);
    app.navigate(initial);

    // Main loop
    loop {
        app.poll_loads();

        // Draw
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                // Only handle key press events (not release)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.prompt.is_some() {
                        handle_prompt_key(&mut app, key);
                    } else {
                        handle_key(&mut app, key);
                    }
                }
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
