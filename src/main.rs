//! Fleaux CLI entry point.

mod cli;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Command};
use fleaux::{Console, DriverError, SessionConfig, compile_file, locate, logging, run_file};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_format, cli.verbose) {
        eprintln!("{e}");
    }

    let config = SessionConfig::default();
    let (file, result) = match cli.command {
        Command::Compile { file, out_dir } => {
            let result = compile(&file, out_dir.as_deref(), &config);
            (file, result)
        }
        Command::Run { file, args } => {
            // GetArgs sees the program path first, like a script's argv
            let argv = std::iter::once(file.display().to_string()).chain(args);
            let console = Console::stdio().with_args(argv);
            let result = run_file(&file, &config, console).map(|_| ());
            (file, result)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e, &file, &config);
            ExitCode::FAILURE
        }
    }
}

fn compile(file: &Path, out_dir: Option<&Path>, config: &SessionConfig) -> Result<(), DriverError> {
    let compiled = compile_file(file, config)?;
    match out_dir {
        Some(dir) => {
            for path in compiled.write_to(dir)? {
                println!("{}", path.display());
            }
        }
        None => {
            for (name, text) in compiled.emit() {
                println!("# {name}");
                print!("{text}");
            }
        }
    }
    Ok(())
}

/// Print `error`, with a source excerpt when the failing module can be read.
fn report(error: &DriverError, file: &Path, config: &SessionConfig) {
    if let DriverError::Session(session_error) = error {
        if let Ok((config, _)) = locate(file, config) {
            let path = config
                .dir()
                .join(config.options().source_file(&session_error.module));
            if let Ok(source) = std::fs::read_to_string(&path) {
                eprintln!("{}: in module '{}'", path.display(), session_error.module);
                eprint!("{}", session_error.error.display_with_source(&source));
                return;
            }
        }
    }
    eprintln!("error: {error}");
}
