// Reusable components for interface

use crate::app::App;
use crate::cell::{CellRecord, CellStatus};
use ratatui::{prelude::*, widgets::*};

pub fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let total_capacity: f64 = app.records.iter().map(|r| r.capacity).sum();
    let text = format!(
        "CELLDASH v0.1 | Cells: {} | Total Capacity: {:.2} Ah | {}",
        app.records.len(),
        total_capacity,
        chrono::Local::now().format("%H:%M:%S"),
    );
    f.render_widget(
        Paragraph::new(text)
            .style(Style::new().bg(Color::Rgb(50, 50, 50)).fg(Color::White))
            .alignment(Alignment::Center),
        area,
    );
}

pub fn render_tabs(f: &mut Frame, area: Rect, app: &App) {
    let titles = vec!["Overview [F1]", "Charts [F2]", "Simulation [F3]"];
    f.render_widget(
        Tabs::new(titles)
            .select(app.current_view as usize)
            .style(Style::new().fg(Color::Gray))
            .highlight_style(Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .divider(" | "),
        area,
    );
}

pub fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let help_text = " [↑↓] Slot | [+/-] Cells | [c] Chemistry | [←→] Current | [e] Export | [Enter] Simulate | [Tab] View | [q] Quit ";
    let status_text = match (&app.status_line, &app.last_export) {
        (Some(msg), _) => format!("{} ", msg),
        (None, Some(ts)) => format!("Exported at {} ", ts.format("%H:%M:%S")),
        (None, None) => format!("{} cells configured ", app.records.len()),
    };
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(status_text.len() as u16),
        ])
        .split(area);
    f.render_widget(
        Paragraph::new(help_text).style(Style::new().bg(Color::Rgb(50, 50, 50)).fg(Color::White)),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(status_text)
            .style(
                Style::new()
                    .bg(if app.records.is_empty() {
                        Color::DarkGray
                    } else {
                        Color::Green
                    })
                    .fg(Color::Black),
            )
            .alignment(Alignment::Right),
        chunks[1],
    );
}

/// Sidebar input panel: cell count plus one line per slot with its chemistry
/// selection and current entry.
pub fn render_sidebar(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Cell Data Input ")
        .borders(Borders::ALL)
        .border_style(Style::new().fg(Color::DarkGray));
    f.render_widget(block, area);
    let inner = area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    });

    let mut lines = vec![
        Line::from(vec![
            Span::from("Number of Cells: "),
            Span::from(format!("{}", app.form.cell_count)).bold(),
            Span::from("  [+/-]").fg(Color::DarkGray),
        ]),
        Line::from(""),
    ];
    for slot in 0..app.form.cell_count {
        let selected = slot == app.form.selected_slot;
        let marker = if selected { "▸ " } else { "  " };
        let line = match app.form.selections[slot] {
            Some(chem) => {
                let current = app.form.currents[slot];
                Line::from(vec![
                    Span::from(marker),
                    Span::from(format!("Cell {}: ", slot + 1)),
                    Span::from(chem.code()).fg(Color::Cyan).bold(),
                    Span::from(format!("  {:>4.1} A", current)),
                ])
            }
            None => Line::from(vec![
                Span::from(marker),
                Span::from(format!("Cell {}: ", slot + 1)),
                Span::from("── unset ──").fg(Color::DarkGray),
            ]),
        };
        if selected && !app.sim_active() {
            lines.push(line.fg(Color::Yellow));
        } else {
            lines.push(line);
        }
    }
    lines.push(Line::from(""));
    if app.sim_active() {
        lines.push(Line::from("Inputs locked during simulation").fg(Color::Red));
    } else {
        lines.push(Line::from("[c] cycles unset/LFP/NMC").fg(Color::DarkGray));
        lines.push(Line::from("[←→] current, 0.1 A steps").fg(Color::DarkGray));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

/// Card background colors keyed by status.
pub fn status_color(status: CellStatus) -> Color {
    match status {
        CellStatus::Charging => Color::Rgb(45, 102, 45),
        CellStatus::Discharging => Color::Rgb(227, 25, 25),
        CellStatus::Idle => Color::Rgb(80, 182, 216),
    }
}

/// Continuous capacity color scale: dark violet through teal to yellow,
/// scaled against the largest capacity on screen.
pub fn capacity_color(ratio: f64) -> Color {
    const STOPS: [(f64, f64, f64); 3] = [(68.0, 1.0, 84.0), (33.0, 145.0, 140.0), (253.0, 231.0, 37.0)];
    let t = ratio.clamp(0.0, 1.0) * 2.0;
    let (lo, hi, frac) = if t <= 1.0 {
        (STOPS[0], STOPS[1], t)
    } else {
        (STOPS[1], STOPS[2], t - 1.0)
    };
    let lerp = |a: f64, b: f64| (a + (b - a) * frac) as u8;
    Color::Rgb(lerp(lo.0, hi.0), lerp(lo.1, hi.1), lerp(lo.2, hi.2))
}

/// One simulation card: identity in the title, live fields below, background
/// keyed by the cell's current status.
pub fn render_status_card(f: &mut Frame, area: Rect, record: &CellRecord) {
    let bg = status_color(record.status);
    let block = Block::default()
        .title(format!(" {} ", record.identity))
        .borders(Borders::ALL)
        .style(Style::new().bg(bg).fg(Color::White));
    let inner = area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    });
    f.render_widget(block, area);
    let text = vec![
        Line::from(vec![
            Span::from("Status:   "),
            Span::from(record.status.to_string()).bold(),
        ]),
        Line::from(format!("Voltage:  {} V", record.voltage)),
        Line::from(format!("Current:  {} A", record.current)),
        Line::from(format!("Capacity: {} Ah", record.capacity)),
        Line::from(format!("Temp:     {} °C", record.temperature)),
    ];
    f.render_widget(
        Paragraph::new(text).style(Style::new().bg(bg).fg(Color::White)),
        inner,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_colors_match_legend() {
        assert_eq!(status_color(CellStatus::Charging), Color::Rgb(45, 102, 45));
        assert_eq!(status_color(CellStatus::Discharging), Color::Rgb(227, 25, 25));
        assert_eq!(status_color(CellStatus::Idle), Color::Rgb(80, 182, 216));
    }

    #[test]
    fn capacity_scale_endpoints() {
        assert_eq!(capacity_color(0.0), Color::Rgb(68, 1, 84));
        assert_eq!(capacity_color(1.0), Color::Rgb(253, 231, 37));
        // Out-of-range ratios clamp instead of wrapping.
        assert_eq!(capacity_color(-1.0), capacity_color(0.0));
        assert_eq!(capacity_color(2.0), capacity_color(1.0));
    }
}
