use std::path::PathBuf;
use std::process;

use clap::Parser;

use tasklog::database::Database;
use tasklog::repl::Repl;

/// Append-only task time tracker with a line-oriented command interpreter
#[derive(Parser)]
#[command(name = "tasklog", version)]
struct Cli {
    /// Database file, created on first open
    db_file: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let db = match Database::open(&cli.db_file) {
        Ok(db) => db,
        Err(err) => {
            eprintln!("Unable to open {}: {}", cli.db_file.display(), err);
            process::exit(1);
        }
    };

    let repl = match Repl::new(db) {
        Ok(repl) => repl,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    if let Err(err) = repl.run() {
        eprintln!("{err}");
        process::exit(1);
    }
}
