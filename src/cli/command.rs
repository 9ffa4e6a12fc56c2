//! Command composition for judges and attacks

use std::path::Path;
use std::process::ExitCode;

use crate::compositor::Threshold;
use crate::config::{JetConfig, OutputFormat};
use crate::models::RollKind;
use crate::render::CommandOutput;
use crate::terminal::render_ansi;

use super::{load_store, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

fn threshold_from_args(gte: Option<&str>, lte: Option<&str>) -> Threshold {
    match (gte, lte) {
        (Some(v), _) => Threshold::AtLeast(v.to_string()),
        (None, Some(v)) => Threshold::AtMost(v.to_string()),
        (None, None) => Threshold::None,
    }
}

fn format_text(output: &CommandOutput, colored: bool) -> String {
    if colored {
        render_ansi(&output.parts)
    } else {
        output.text.clone()
    }
}

/// Execute the command command
pub fn run_command(
    data: &Path,
    kind: RollKind,
    index: Option<usize>,
    gte: Option<&str>,
    lte: Option<&str>,
    config: &JetConfig,
) -> ExitCode {
    let store = match load_store(data, config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let threshold = threshold_from_args(gte, lte);

    let indices: Vec<usize> = match index {
        Some(i) => vec![i],
        None => (0..store.rolls(kind).len()).collect(),
    };

    let mut outputs = Vec::with_capacity(indices.len());
    for i in indices {
        match store.generate_command(kind, i, &threshold) {
            Some(output) => outputs.push(output),
            None => {
                eprintln!("Error: no {} at index {} ({} defined)", kind, i, store.rolls(kind).len());
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        }
    }

    match config.output.format {
        OutputFormat::Text => {
            let colored = config.output.color.enabled(atty::is(atty::Stream::Stdout));
            for output in &outputs {
                println!("{}", format_text(output, colored));
            }
        }
        OutputFormat::Html => {
            for output in &outputs {
                println!("{}", output.html);
            }
        }
        OutputFormat::Json => {
            let json = match index {
                Some(_) => serde_json::to_string_pretty(&outputs[0]),
                None => serde_json::to_string_pretty(&outputs),
            };
            match json {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(EXIT_ERROR);
                }
            }
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::CommandPart;

    #[test]
    fn test_threshold_from_args() {
        assert_eq!(threshold_from_args(Some("12"), None), Threshold::AtLeast("12".into()));
        assert_eq!(threshold_from_args(None, Some("3")), Threshold::AtMost("3".into()));
        assert_eq!(threshold_from_args(None, None), Threshold::None);
    }

    #[test]
    fn test_format_text() {
        let output = CommandOutput::from_parts(vec![CommandPart::plain("2d"), CommandPart::colored("+1", "#FF0000")]);
        assert_eq!(format_text(&output, false), "2d+1");
        assert_eq!(format_text(&output, true), "2d\x1b[38;2;255;0;0m+1\x1b[0m");
    }
}
