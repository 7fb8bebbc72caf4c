use std::{io, thread, time::Duration};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, BorderType, Borders, Cell, Paragraph, Row, Table,
    },
    Frame, Terminal,
};

use crate::app::App;
use crate::clock::Clock;
use crate::config::RunConfig;
use crate::constants::WINDOW_SECS;
use crate::util::{format_count, format_rate};

const IDLE_SLEEP: Duration = Duration::from_millis(1);

pub fn run<C: Clock>(app: App<C>, config: &RunConfig) -> io::Result<()> {
    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app_loop(&mut terminal, app, config);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!(%err, "dashboard loop failed");
    }
    res
}

fn run_app_loop<B: Backend, C: Clock>(
    terminal: &mut Terminal<B>,
    mut app: App<C>,
    config: &RunConfig,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, &app))?;

        // Keep recording until the next redraw, polling input between pumps.
        while !app.tick_due(config.tick) {
            if app.pump() == 0 {
                thread::sleep(IDLE_SLEEP);
            }
            if event::poll(Duration::ZERO)? {
                if let Event::Key(key) = event::read()? {
                    let quit = matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c') | KeyCode::Esc);
                    if key.kind == KeyEventKind::Press && quit {
                        tracing::info!(total = app.total_recorded(), "dashboard closed");
                        return Ok(());
                    }
                }
            }
        }
        app.on_tick();

        if app.elapsed() >= config.run_for {
            terminal.draw(|f| draw(f, &app))?;
            tracing::info!(total = app.total_recorded(), "dashboard run finished");
            return Ok(());
        }
    }
}

fn draw<C: Clock>(f: &mut Frame, app: &App<C>) {
    // ============= whole screen layout ============
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(16), // History box
            Constraint::Min(6),     // Window table
            Constraint::Length(1),  // Status bar
        ])
        .split(f.size());

    // ============= Top history box ============
    let history_block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Event Window [{}s] ", WINDOW_SECS))
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(history_block.clone(), main_chunks[0]);

    let inner_area = history_block.inner(main_chunks[0]);
    let graph_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(inner_area);

    let max_y = app.per_second.iter().copied().fold(10.0, f64::max);
    let x_limit = app.per_second.len() as f64;

    let canvas = Canvas::default()
        .block(Block::default().title(" Events / second ").title_style(Style::default().fg(Color::Green)))
        .marker(Marker::Braille)
        .x_bounds([0.0, x_limit])
        .y_bounds([0.0, max_y])
        .paint(|ctx| {
            for (i, &val) in app.per_second.iter().enumerate() {
                ctx.draw(&CanvasLine {
                    x1: i as f64,
                    y1: 0.0,
                    x2: i as f64,
                    y2: val,
                    color: Color::Green,
                });
            }
        });
    f.render_widget(canvas, graph_chunks[0]);

    let last_second = app.per_second.last().copied().unwrap_or(0.0);
    let elapsed = app.elapsed().as_secs_f64();
    let avg = if elapsed > 0.0 { app.total_recorded() as f64 / elapsed } else { 0.0 };

    let side_text = vec![
        Line::from(vec![
            Span::raw("▲ "),
            Span::styled(format_rate(last_second), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![Span::styled("  Avg:  ", Style::default().fg(Color::DarkGray)), Span::raw(format_rate(avg))]),
        Line::from(vec![
            Span::styled("  Peak: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format_count(app.peak_record.0)),
        ]),
        Line::from(vec![
            Span::styled("  Tot:  ", Style::default().fg(Color::DarkGray)),
            Span::raw(format_count(app.total_recorded())),
        ]),
        Line::from(vec![
            Span::styled("  Pend: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format_count(app.counter.pending())),
        ]),
    ];
    f.render_widget(
        Paragraph::new(side_text).block(Block::default().style(Style::default().fg(Color::Green))),
        graph_chunks[1],
    );

    // ============= Middle window table ============
    let header_cells = ["Window", "Events", "Avg Rate"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).style(Style::default().bg(Color::Rgb(40, 40, 40))).height(1);

    let rows = app.readings.iter().map(|(span, count)| {
        let rate = *count as f64 / span.secs() as f64;
        let color = if rate > 1_000_000.0 {
            Color::Red
        } else if rate > 10_000.0 {
            Color::LightYellow
        } else {
            Color::Green
        };
        Row::new(vec![
            Cell::from(format!("last {}", span)),
            Cell::from(format_count(*count)),
            Cell::from(format_rate(rate)).style(Style::default().fg(color)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [Constraint::Percentage(30), Constraint::Percentage(35), Constraint::Percentage(35)],
    )
    .header(header)
    .block(Block::default().title(" Trailing Windows ").borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(table, main_chunks[1]);

    // ============ Bottom status bar ============
    let status_content = Line::from(vec![
        Span::styled(" PEAK SECOND ", Style::default().bg(Color::White).fg(Color::Black).add_modifier(Modifier::BOLD)),
        Span::raw(" | "),
        Span::raw(format!("{} ", format_count(app.peak_record.0))),
        Span::styled(
            format!("(@{})", app.peak_record.1.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(format!(" | elapsed {:.0}s", elapsed)),
        Span::raw(" | Press 'q' to quit"),
    ]);
    let status_bar = Paragraph::new(status_content).style(Style::default().bg(Color::Rgb(20, 20, 20)));
    f.render_widget(status_bar, main_chunks[2]);
}
