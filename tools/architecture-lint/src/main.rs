//! Runs the boundary lint over the `paddock` client.
//!
//! `cargo run -p architecture-lint [-- <client-dir>]`. Without an argument
//! the `client/` directory of this workspace is linted.

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use architecture_lint::lint_client_sources;

fn main() -> ExitCode {
    let client_dir = env::args_os()
        .nth(1)
        .map_or_else(workspace_client_dir, PathBuf::from);
    match lint_client_sources(&client_dir) {
        Ok(files) => {
            let _ = writeln!(io::stdout().lock(), "{files} client files read, all within bounds");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let _ = writeln!(io::stderr().lock(), "{err}");
            ExitCode::FAILURE
        }
    }
}

fn workspace_client_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../client")
}
