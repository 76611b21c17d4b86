use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Send log output to `path`; the terminal belongs to the game.
pub fn init(path: &Path, level: LevelFilter) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let config = ConfigBuilder::new()
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    WriteLogger::init(level, config, file)?;
    Ok(())
}
