// src/bin/cli.rs
use std::path::Path;

use house_trend::cli;
use house_trend::config::consts::{LOG_FILE, STORE_DIR};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    if let Err(e) = house_trend::log::init(&Path::new(STORE_DIR).join(LOG_FILE)) {
        eprintln!("Logging disabled: {e}");
    }

    cli::run()
}
