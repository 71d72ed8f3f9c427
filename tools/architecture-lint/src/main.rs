//! `architecture-lint [console-dir]`: check the console's layering.
//!
//! Without an argument the console crate next to this tool is linted.

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let console_dir = env::args_os().nth(1).map_or_else(default_console_dir, PathBuf::from);
    let outcome = architecture_lint::lint_console_sources(&console_dir);
    let mut stderr = io::stderr().lock();
    match outcome {
        Ok(()) => {
            let _ = writeln!(stderr, "{}: layering ok", console_dir.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            let _ = write!(stderr, "{err}");
            ExitCode::FAILURE
        }
    }
}

fn default_console_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../console")
}
