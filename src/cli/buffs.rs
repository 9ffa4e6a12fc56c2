//! Buff turn management commands (turn, toggle)

use std::path::Path;
use std::process::ExitCode;

use crate::config::JetConfig;
use crate::models::Buff;

use super::{load_store, save_store, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// One status line per buff: `[on ] name (2/3)`.
fn status_line(index: usize, buff: &Buff) -> String {
    let state = if buff.active { "on " } else { "off" };
    let mut line = format!("{:>3} [{}] {}", index, state, buff.name);
    if let (Some(turn), Some(max)) = (buff.turn, buff.original_turn) {
        line.push_str(&format!(" ({}/{})", turn, max));
    }
    let memo = buff.simple_memo();
    if !memo.is_empty() {
        line.push_str(&format!(" {}", memo));
    }
    line
}

/// Execute the turn command
pub fn run_turn(data: &Path, reset: bool, config: &JetConfig) -> ExitCode {
    let mut store = match load_store(data, config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let changed = if reset { store.reset_turns() > 0 } else { store.progress_turn() };
    if changed {
        if let Err(e) = save_store(data, &store) {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    } else {
        eprintln!("No buffs with remaining turns");
    }

    for (i, buff) in store.buffs().iter().enumerate() {
        println!("{}", status_line(i, buff));
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the toggle command
pub fn run_toggle(data: &Path, index: usize, config: &JetConfig) -> ExitCode {
    let mut store = match load_store(data, config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if store.toggle_buff(index).is_none() {
        eprintln!("Error: no buff at index {} ({} defined)", index, store.buffs().len());
        return ExitCode::from(EXIT_INVALID_ARGS);
    }
    if let Err(e) = save_store(data, &store) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("{}", status_line(index, &store.buffs()[index]));
    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Target;

    #[test]
    fn test_status_line() {
        let buff = Buff::new("祝福", "+1", vec![Target::AllJudge], "#FFFFFF")
            .with_turns(3)
            .with_memo("判定+1\n詳細", true);
        assert_eq!(status_line(0, &buff), "  0 [on ] 祝福 (3/3) 判定+1");

        let mut buff = Buff::new("装備", "+0", vec![], "#FFFFFF");
        buff.toggle();
        assert_eq!(status_line(12, &buff), " 12 [off] 装備");
    }
}
