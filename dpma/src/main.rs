mod config;

use std::{env, process::ExitCode};

use colored::Colorize;
use config::{Commands, TargetArgs, parse_config};
use dpma_dynamic_linking::{
    Diagnostic, LibraryLoader, ResolveError, Resolver, candidates::module_file_name,
    config::debug_flag, host::DEBUG_ENV_VAR, last_errors,
};
use dpma_utilities::{SendableError, startup};
use log::{error, info};

fn main() -> ExitCode {
    let cli = parse_config();
    let debug = cli.debug || debug_flag(env::var(DEBUG_ENV_VAR).ok().as_deref());

    if let Err(err) = startup::startup("DPMA", debug, cli.log_file.as_deref()) {
        eprintln!("failed to start: {}", err);
        return ExitCode::FAILURE;
    }

    let result = match &cli.command {
        Commands::Load { target, symbol } => load(target, symbol.as_deref(), cli.debug),
        Commands::Candidates { target } => candidates(target, cli.debug),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn load(target: &TargetArgs, symbol: Option<&str>, debug: bool) -> Result<ExitCode, SendableError> {
    let resolver = Resolver::new(LibraryLoader);
    let request = target.to_request(debug);

    let module = match resolver.resolve(&request) {
        Ok(module) => module,
        Err(ResolveError::MissingLibraryName) => return Err(Box::new(ResolveError::MissingLibraryName)),
        Err(err) => {
            info!("{}", err);
            let file_name = module_file_name(request.library_name(), &resolver.identity());
            eprintln!("{} Tried loading {} w/ no success.", "[!]".red().bold(), file_name);
            for line in last_errors() {
                eprintln!("\t- {}", line);
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    info!("Loaded {}", module.path.display());
    if let Some(symbol) = symbol {
        if !module.has_symbol(symbol) {
            eprintln!(
                "{} {} does not export `{}`",
                "[!]".red().bold(),
                module.path.display(),
                symbol
            );
            return Ok(ExitCode::FAILURE);
        }
    }
    println!("{}", module.path.display());
    Ok(ExitCode::SUCCESS)
}

fn candidates(target: &TargetArgs, debug: bool) -> Result<ExitCode, SendableError> {
    let resolver = Resolver::new(LibraryLoader);
    let reports = resolver.inspect(&target.to_request(debug))?;
    info!("{} candidate(s) for {}", reports.len(), resolver.identity());

    for report in reports {
        match report.problem {
            None => println!("{} ok", report.path.display()),
            Some(kind) => println!("{}", Diagnostic::new(report.path, kind)),
        }
    }
    Ok(ExitCode::SUCCESS)
}
