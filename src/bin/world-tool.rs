//! Decode world metadata (`.fwl`) and optionally world data (`.db`) and
//! print them as JSON
//!
//! ```text
//! world-tool <meta-file> [<data-file>]
//! ```

use std::io::{self, Write};
use std::process::ExitCode;

fn run(meta: &str, data: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let world = vhsave::World::from_files(meta, data)?;
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    serde_json::to_writer_pretty(&mut lock, &world)?;
    writeln!(lock)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if !(2..=3).contains(&args.len()) {
        eprintln!("usage: {} <meta-file> [<data-file>]", args[0]);
        return ExitCode::FAILURE;
    }

    let data = args.get(2).map(String::as_str);
    match run(&args[1], data) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("unable to decode world: {}", e);
            ExitCode::FAILURE
        }
    }
}
