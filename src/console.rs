use std::{
    io::{self, Write},
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};

use chrono::Local;

use crate::app::App;
use crate::clock::Clock;
use crate::config::RunConfig;
use crate::util::{format_count, format_rate};

const IDLE_SLEEP: Duration = Duration::from_millis(1);

/// Runs until the configured duration elapses or `stop` is raised, writing one
/// report line per tick and a summary at the end.
pub fn run<C: Clock, W: Write>(
    mut app: App<C>,
    config: &RunConfig,
    stop: &AtomicBool,
    out: &mut W,
) -> io::Result<()> {
    tracing::info!(
        run_for_secs = config.run_for.as_secs(),
        tick_ms = config.tick.as_millis() as u64,
        rate = ?config.rate,
        pattern = ?config.pattern,
        "console run started"
    );

    while !stop.load(Ordering::Relaxed) && app.elapsed() < config.run_for {
        if app.pump() == 0 {
            thread::sleep(IDLE_SLEEP);
        }
        if app.tick_due(config.tick) {
            app.on_tick();
            writeln!(out, "{}", report_line(&app))?;
        }
    }

    app.on_tick();
    writeln!(out, "{}", summary(&app))?;
    out.flush()?;

    tracing::info!(total = app.total_recorded(), "console run finished");
    Ok(())
}

pub fn report_line<C: Clock>(app: &App<C>) -> String {
    let mut line = Local::now().format("%H:%M:%S").to_string();
    for (span, count) in &app.readings {
        line.push_str(&format!("  last {:>4}: {:>10}", span.to_string(), format_count(*count)));
    }
    line.push_str(&format!("  pending: {}", format_count(app.counter.pending())));
    line
}

pub fn summary<C: Clock>(app: &App<C>) -> String {
    let secs = app.elapsed().as_secs_f64();
    let avg = if secs > 0.0 { app.total_recorded() as f64 / secs } else { 0.0 };
    format!(
        "recorded {} events in {:.1}s ({}), peak second {} at {}",
        format_count(app.total_recorded()),
        secs,
        format_rate(avg),
        format_count(app.peak_record.0),
        app.peak_record.1.format("%H:%M:%S"),
    )
}
