use std::{env, path::Path};

use log::{debug, info};

use crate::{SendableError, logger};

pub fn startup(name: &str, debug: bool, log_file: Option<&Path>) -> Result<(), SendableError> {
    logger::setup_logger(debug, log_file)?;
    log_panics::init();

    info!("--- {} ---", name);
    let cwd = env::current_dir()?;
    debug!("The current directory is {}", cwd.display());

    Ok(())
}
