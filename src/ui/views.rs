use super::widgets;
use crate::app::App;
use crate::simulation::TOTAL_STEPS;
use ratatui::{prelude::*, symbols, widgets::*};

pub fn render_overview(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Cell Data Overview ")
        .borders(Borders::ALL)
        .border_style(Style::new().fg(Color::DarkGray));
    f.render_widget(block, area);
    let inner = area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    });
    if app.records.is_empty() {
        render_placeholder(f, inner, "Please select cell types to see overview.");
        return;
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let rows: Vec<Row> = app
        .records
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.identity.clone()),
                Cell::from(r.chemistry.tag()),
                Cell::from(format!("{:.1}", r.voltage)),
                Cell::from(format!("{:.1}", r.current)),
                Cell::from(format!("{:.1}", r.temperature)),
                Cell::from(format!("{:.2}", r.capacity)),
                Cell::from(format!("{:.1}", r.min_voltage)),
                Cell::from(format!("{:.1}", r.max_voltage)),
                Cell::from(r.status.to_string()),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(5),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec![
            "CELL", "TYPE", "VOLTAGE", "CURRENT", "TEMP", "CAPACITY", "V MIN", "V MAX", "STATUS",
        ])
        .style(Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .bottom_margin(1),
    )
    .column_spacing(2);
    f.render_widget(table, chunks[0]);

    f.render_widget(
        Paragraph::new("[e] write cell_data.csv").style(Style::new().fg(Color::DarkGray)),
        chunks[1],
    );
}

pub fn render_charts(f: &mut Frame, area: Rect, app: &App) {
    if app.records.is_empty() {
        let block = Block::default()
            .title(" Charts ")
            .borders(Borders::ALL)
            .border_style(Style::new().fg(Color::DarkGray));
        f.render_widget(block, area);
        render_placeholder(
            f,
            area.inner(&Margin {
                vertical: 1,
                horizontal: 1,
            }),
            "No data to plot yet.",
        );
        return;
    }
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    render_capacity_chart(f, chunks[0], app);
    render_temperature_chart(f, chunks[1], app);
}

/// One bar per cell, value labeled, color scaled with capacity magnitude.
fn render_capacity_chart(f: &mut Frame, area: Rect, app: &App) {
    let max_capacity = app
        .records
        .iter()
        .map(|r| r.capacity)
        .fold(0.0_f64, f64::max);
    let bars: Vec<Bar> = app
        .records
        .iter()
        .map(|r| {
            let ratio = if max_capacity > 0.0 {
                r.capacity / max_capacity
            } else {
                0.0
            };
            let color = widgets::capacity_color(ratio);
            Bar::default()
                .label(Line::from(format!("C{} {}", r.slot, r.chemistry.code())))
                .value((r.capacity * 100.0).round() as u64)
                .text_value(format!("{:.2}", r.capacity))
                .style(Style::new().fg(color))
                .value_style(Style::new().fg(Color::Black).bg(color))
        })
        .collect();
    let chart = BarChart::default()
        .block(
            Block::default()
                .title(" Cell Capacity (Ah) ")
                .borders(Borders::ALL)
                .border_style(Style::new().fg(Color::DarkGray)),
        )
        .bar_width(9)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}

/// One colored marker per cell at its (slot, temperature) position.
fn render_temperature_chart(f: &mut Frame, area: Rect, app: &App) {
    const PALETTE: [Color; 8] = [
        Color::Cyan,
        Color::Yellow,
        Color::Magenta,
        Color::Green,
        Color::LightRed,
        Color::LightBlue,
        Color::LightMagenta,
        Color::LightGreen,
    ];
    let points: Vec<[(f64, f64); 1]> = app
        .records
        .iter()
        .enumerate()
        .map(|(i, r)| [(i as f64 + 1.0, r.temperature)])
        .collect();
    let datasets: Vec<Dataset> = app
        .records
        .iter()
        .zip(&points)
        .enumerate()
        .map(|(i, (r, pts))| {
            Dataset::default()
                .name(r.identity.clone())
                .marker(symbols::Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Style::new().fg(PALETTE[i % PALETTE.len()]))
                .data(pts)
        })
        .collect();
    let y_lo = app.cfg.thermal.temp_min - 5.0;
    let y_hi = app.cfg.thermal.temp_max + 5.0;
    let x_hi = app.records.len() as f64 + 1.0;
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" Cell Temperature (°C) ")
                .borders(Borders::ALL)
                .border_style(Style::new().fg(Color::DarkGray)),
        )
        .x_axis(
            Axis::default()
                .title("Cell")
                .bounds([0.0, x_hi])
                .labels(vec!["".into(), format!("{}", app.records.len()).into()]),
        )
        .y_axis(
            Axis::default()
                .title("°C")
                .bounds([y_lo, y_hi])
                .labels(vec![
                    format!("{y_lo:.0}").into(),
                    format!("{:.0}", (y_lo + y_hi) / 2.0).into(),
                    format!("{y_hi:.0}").into(),
                ]),
        );
    f.render_widget(chart, area);
}

pub fn render_simulation(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Cell Simulation ")
        .borders(Borders::ALL)
        .border_style(Style::new().fg(Color::DarkGray));
    f.render_widget(block, area);
    let inner = area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    });
    if app.records.is_empty() {
        render_placeholder(f, inner, "Select cell types & inputs first to run simulation.");
        return;
    }

    let status_text = match (app.sim_active(), app.last_step_applied) {
        (true, Some(step)) => format!("Running: step {}/{}", step + 1, TOTAL_STEPS),
        (false, Some(_)) => "Simulation complete — [Enter] to run again".to_string(),
        (false, None) => "Press [Enter] to start simulation for all cells".to_string(),
        (true, None) => String::new(),
    };
    let rows_needed = app.records.chunks(4).len();
    let mut constraints = vec![Constraint::Length(1)];
    constraints.extend(std::iter::repeat(Constraint::Length(7)).take(rows_needed));
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);
    f.render_widget(
        Paragraph::new(status_text).style(Style::new().fg(Color::Cyan).bold()),
        chunks[0],
    );

    // Cards flow left to right, four per row.
    for (row_idx, row_records) in app.records.chunks(4).enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
            ])
            .split(chunks[row_idx + 1]);
        for (col_idx, record) in row_records.iter().enumerate() {
            widgets::render_status_card(f, cols[col_idx], record);
        }
    }
}

pub fn render_placeholder(f: &mut Frame, area: Rect, message: &str) {
    f.render_widget(
        Paragraph::new(message)
            .style(Style::new().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}
