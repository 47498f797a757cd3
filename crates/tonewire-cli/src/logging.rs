//! Logger setup for the binary.

use log::LevelFilter;
use simple_logger::SimpleLogger;

/// Maps `-v` occurrences to a level: none is info, one is debug, more is trace.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the process-wide logger. `RUST_LOG` overrides the level.
pub fn init(verbosity: u8) -> anyhow::Result<()> {
    SimpleLogger::new()
        .with_level(level_for(verbosity))
        .env()
        .init()?;
    Ok(())
}
