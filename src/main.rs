use std::{
    error::Error,
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use clap::Parser;

use rate_window::{
    app::App,
    config::{Args, RunConfig},
    console, logger, ui, SlidingWindowCounter,
};

fn main() -> Result<(), Box<dyn Error>> {
    let config = RunConfig::from(Args::parse());
    logger::init(config.log_file.as_deref(), config.dashboard)?;

    let app = App::new(SlidingWindowCounter::new(), &config);

    if config.dashboard {
        ui::run(app, &config)?;
        return Ok(());
    }

    let stop = Arc::new(AtomicBool::new(false));
    let stop_handler = Arc::clone(&stop);
    ctrlc::set_handler(move || stop_handler.store(true, Ordering::Relaxed))?;

    console::run(app, &config, &stop, &mut io::stdout().lock())?;
    Ok(())
}
