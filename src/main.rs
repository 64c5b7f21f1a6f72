#![warn(clippy::all, clippy::pedantic)]

use std::fs::File;
use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use log::{debug, error, info, warn};
use ratatui::{Terminal, prelude::*};

use tetros::app::App;
use tetros::config::{GameConfig, loader};
use tetros::input::Key;
use tetros::state::{GameMode, PowerUpKind};
use tetros::ui;

// Redraw roughly 60 times a second
const FRAME_RATE: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    // The terminal belongs to the UI, so logs go to a file
    let log_path = "tetros.log";
    let log_file = File::create(log_path).with_context(|| format!("creating {log_path}"))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format_module_path(false)
        .init();

    info!("Starting Tetros");

    let config = match loader::load_config_from_file() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {e}");
            // Continue with default configuration
            GameConfig::default()
        }
    };

    // Terminal initialization
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;

    // Release events are needed for held-key repeat
    let key_releases = supports_keyboard_enhancement().unwrap_or(false);
    if key_releases {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .context("enabling key release events")?;
    } else {
        warn!("Terminal does not report key releases; held keys will not auto-repeat");
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal")?;

    let mut app = App::with_config(config);
    let res = run_app(&mut terminal, &mut app, key_releases);
    app.teardown();

    // Restore terminal
    if key_releases {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!("Game error: {err:?}");
    }
    info!("Final score {}", app.score());

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, key_releases: bool) -> Result<()> {
    let epoch = Instant::now();
    let now_ms = || epoch.elapsed().as_secs_f64() * 1000.0;

    // Flush any pending input events that might be in the buffer
    while event::poll(Duration::from_millis(0))? {
        let _ = event::read()?;
    }

    loop {
        app.advance(now_ms());
        terminal.draw(|f| ui::render(f, app))?;

        if app.should_quit {
            return Ok(());
        }

        if event::poll(FRAME_RATE)? {
            if let Event::Key(key) = event::read()? {
                handle_key_event(app, key, key_releases);
                // Inputs see the clock as of the event, not the last frame
                app.advance(now_ms());
            }
        }
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent, key_releases: bool) {
    debug!("Key event: {key:?}");

    match key.kind {
        // Repeats are generated by the game itself
        KeyEventKind::Repeat => return,
        KeyEventKind::Release => {
            if let Some(game_key) = map_key(key.code) {
                app.release_key(game_key);
            }
            return;
        }
        KeyEventKind::Press => {}
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('p') | KeyCode::Esc => app.toggle_pause(),
        KeyCode::Char('t') => app.toggle_animation_mode(),
        KeyCode::Enter if matches!(app.mode(), GameMode::Start | GameMode::GameOver) => {
            app.start_game();
        }
        code => {
            if let Some(game_key) = map_key(code) {
                app.press_key(game_key);
                if !key_releases {
                    app.release_key(game_key);
                }
            }
        }
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Char('c') => Some(Key::Hold),
        KeyCode::Char(digit) => PowerUpKind::from_digit(digit).map(Key::PowerUp),
        _ => None,
    }
}
