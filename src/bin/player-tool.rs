//! Decode a character profile (`.fch`) and print it as JSON
//!
//! ```text
//! player-tool <save-file>
//! ```

use std::io::{self, Write};
use std::process::ExitCode;

fn run(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let profile = vhsave::PlayerProfile::from_file(path)?;
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    serde_json::to_writer_pretty(&mut lock, &profile)?;
    writeln!(lock)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: {} <save-file>", args[0]);
        return ExitCode::FAILURE;
    }

    match run(&args[1]) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("unable to decode {}: {}", args[1], e);
            ExitCode::FAILURE
        }
    }
}
