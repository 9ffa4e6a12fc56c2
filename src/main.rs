//! jetp - command-line front end for jetpalette

use std::process::ExitCode;

use jetpalette::cli;

fn main() -> ExitCode {
    cli::run()
}
