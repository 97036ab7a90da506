use std::{path::Path, time::SystemTime};

use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter};

use crate::SendableError;

pub fn level_for(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn colored_level(level: Level) -> ColoredString {
    let tag = level.to_string();
    match level {
        Level::Error => tag.red().bold(),
        Level::Warn => tag.yellow(),
        Level::Info => tag.green(),
        Level::Debug => tag.blue(),
        Level::Trace => tag.dimmed(),
    }
}

fn dispatch(level: LevelFilter, log_file: Option<&Path>) -> Result<fern::Dispatch, SendableError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                colored_level(record.level()),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr());
    if let Some(path) = log_file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }
    Ok(dispatch)
}

/// Installs the global logger. Output goes to stderr so stdout stays free
/// for command results.
pub fn setup_logger(debug: bool, log_file: Option<&Path>) -> Result<(), SendableError> {
    dispatch(level_for(debug), log_file)?.apply()?;
    Ok(())
}
