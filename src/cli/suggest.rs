//! Dictionary suggestion command

use std::path::Path;
use std::process::ExitCode;

use crate::config::JetConfig;

use super::{load_store, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the suggest command
pub fn run_suggest(data: &Path, input: &str, config: &JetConfig) -> ExitCode {
    let store = match load_store(data, config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    for entry in store.suggest(input) {
        match &entry.category {
            Some(category) => println!("{}\t{}", entry.text, category),
            None => println!("{}", entry.text),
        }
    }
    ExitCode::from(EXIT_SUCCESS)
}
