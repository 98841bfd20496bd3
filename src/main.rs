use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;

use nectar::cli::Session;
use nectar::config::LanguageConfig;

/// Interpreter for the nectar indentation-structured expression language.
#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script to run; starts the interactive prompt when omitted.
    script: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let mut session = Session::new(&LanguageConfig::standard());

    let Some(path) = args.script else {
        let stdin = io::stdin();
        session.repl(&mut stdin.lock(), &mut io::stdout())?;
        return Ok(ExitCode::SUCCESS);
    };

    let source = fs::read_to_string(&path)
        .with_context(|| format!("Reading {}", path.display()))?;
    match session.run_script(&source) {
        Ok(value) => {
            println!("{value}");
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            eprintln!("{error}");
            Ok(ExitCode::FAILURE)
        }
    }
}
