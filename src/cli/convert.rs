//! Convert command implementation

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use crate::config::JetConfig;
use crate::converter::convert_palette_with;
use crate::store::Store;

use super::{read_input, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the convert command
pub fn run_convert(input: &Path, output: Option<&Path>, config: &JetConfig) -> ExitCode {
    let text = match read_input(input) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let data = match convert_palette_with(&text, &config.convert_options()) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let summary = format!(
        "{} judges, {} attacks, {} buffs, {} dictionary entries",
        data.judges.len(),
        data.attacks.len(),
        data.buffs.len(),
        data.user_dictionary.len()
    );

    let json = match Store::new(data).export_json() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, json + "\n") {
                eprintln!("Error: Cannot write '{}': {}", path.display(), e);
                return ExitCode::from(EXIT_ERROR);
            }
            eprintln!("Wrote {} ({})", path.display(), summary);
        }
        None => println!("{}", json),
    }
    ExitCode::from(EXIT_SUCCESS)
}
