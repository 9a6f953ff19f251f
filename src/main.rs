use crate::app::App;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::{
    io, panic,
    time::{Duration, Instant},
};

mod app;
mod cell;
mod config;
mod export;
mod simulation;
mod ui;

fn main() -> Result<()> {
    // NO LOGGER! It breaks the TUI
    // anything written to stdout would destroy our terminal UI

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Panic handler
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    // Initialize configuration
    let config = config::config();
    let step_delay = Duration::from_millis(config.animation.step_delay_ms);

    let mut app = App::new(config);
    let mut last_step = Instant::now();

    // Main event loop. The animation's inter-step delay lives here, not in
    // the step function, so a pending step never blocks input handling.
    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if let KeyCode::Char('q') | KeyCode::Char('Q') = key.code {
                    break;
                }
                let was_running = app.sim_active();
                app.handle_key_event(key.code);
                if !was_running && app.sim_active() {
                    // First step was applied on start; time the next one
                    // from now.
                    last_step = Instant::now();
                }
            }
        }

        if app.sim_active() && last_step.elapsed() >= step_delay {
            app.advance_simulation();
            last_step = Instant::now();
        }
    }

    // Cleanup
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
