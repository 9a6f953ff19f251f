pub mod views;
pub mod widgets;

use crate::app::{App, ViewMode};
use ratatui::prelude::*;

pub fn draw(f: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.size());

    widgets::render_header(f, main_layout[0], app);
    widgets::render_tabs(f, main_layout[1], app);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(34)])
        .split(main_layout[2]);

    match app.current_view {
        ViewMode::Overview => views::render_overview(f, content[0], app),
        ViewMode::Charts => views::render_charts(f, content[0], app),
        ViewMode::Simulation => views::render_simulation(f, content[0], app),
    }
    widgets::render_sidebar(f, content[1], app);

    widgets::render_footer(f, main_layout[3], app);
}
