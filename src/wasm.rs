//! WASM API module for browser/JS interop
//!
//! Provides WebAssembly bindings for converting palettes and composing
//! commands from sheet JSON held by the page.

use wasm_bindgen::prelude::*;

use crate::compositor::Threshold;
use crate::converter::convert_palette as convert;
use crate::models::RollKind;
use crate::store::Store;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Result of converting a palette.
#[wasm_bindgen]
pub struct ConvertResult {
    data: String,
    error: Option<String>,
}

#[wasm_bindgen]
impl ConvertResult {
    /// Sheet data as pretty JSON (empty on error)
    #[wasm_bindgen(getter)]
    pub fn data(&self) -> String {
        self.data.clone()
    }

    /// Error message, if the conversion failed
    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.error.clone()
    }
}

/// Convert a pasted chat palette into sheet data JSON.
#[wasm_bindgen]
pub fn convert_palette(text: &str) -> ConvertResult {
    let exported = convert(text).map_err(|e| e.to_string()).and_then(|data| {
        Store::new(data).export_json().map_err(|e| e.to_string())
    });
    match exported {
        Ok(data) => ConvertResult { data, error: None },
        Err(e) => ConvertResult { data: String::new(), error: Some(e) },
    }
}

/// Compose one item's command.
///
/// # Arguments
/// * `data_json` - sheet data (JSON or JSON5)
/// * `kind` - `judge` or `attack`
/// * `index` - item index
/// * `mode` - threshold mode: `none`, `gte` or `lte`
/// * `value` - threshold value
///
/// # Returns
/// `{html, text, parts}` as JSON, or `None` for bad data, kind or index
#[wasm_bindgen]
pub fn generate_command(data_json: &str, kind: &str, index: usize, mode: &str, value: &str) -> Option<String> {
    let store = Store::import_json(data_json).ok()?;
    let kind: RollKind = kind.parse().ok()?;
    let output = store.generate_command(kind, index, &Threshold::from_mode(mode, value))?;
    serde_json::to_string(&output).ok()
}

/// Dictionary suggestions (entry texts) for typed text.
#[wasm_bindgen]
pub fn suggest(data_json: &str, input: &str) -> Vec<String> {
    match Store::import_json(data_json) {
        Ok(store) => store.suggest(input).into_iter().map(|e| e.text.clone()).collect(),
        Err(_) => Vec::new(),
    }
}

/// Advance one turn; returns the updated sheet JSON.
#[wasm_bindgen]
pub fn progress_turn(data_json: &str) -> Option<String> {
    let mut store = Store::import_json(data_json).ok()?;
    store.progress_turn();
    store.export_json().ok()
}

/// Toggle a buff; returns the updated sheet JSON.
#[wasm_bindgen]
pub fn toggle_buff(data_json: &str, index: usize) -> Option<String> {
    let mut store = Store::import_json(data_json).ok()?;
    store.toggle_buff(index)?;
    store.export_json().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PALETTE: &str = "// 命中=+1\n### ■ 判定\n2d+{器用}{命中} 命中力／武器A\n### ■ 武器攻撃\nk20[10] [武器]ダメージ／武器A";

    const SHEET: &str = r##"{
        "buffs": [
            {"name": "祝福", "effect": "+1", "targets": ["all-judge"], "color": "#FF0000", "turn": 1, "originalTurn": 1},
            {"name": "出目", "effect": "$+1", "targets": ["attack-category:武器攻撃"], "color": "#00FF00"}
        ],
        "judges": [{"name": "命中", "roll": "2d+5", "category": null}],
        "attacks": [{"name": "武器A", "roll": "k20[10]+5", "category": "武器攻撃"}],
        "userDictionary": [{"id": "1", "text": "//器用増強//", "category": "代入記法", "usage": 0}]
    }"##;

    #[test]
    fn test_convert_palette() {
        let result = convert_palette(PALETTE);
        assert_eq!(result.error(), None);
        let value: serde_json::Value = serde_json::from_str(&result.data()).unwrap();
        assert_eq!(value["judges"][0]["roll"], "2d+{器用}+1");
        assert_eq!(value["attacks"][0]["name"], "武器A");
    }

    #[test]
    fn test_convert_palette_error() {
        let result = convert_palette("2d 判定");
        assert!(result.data().is_empty());
        assert!(result.error().is_some());
    }

    #[test]
    fn test_generate_command() {
        let json = generate_command(SHEET, "judge", 0, "gte", "12").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["text"], "2d+5+1>=12 命中");
        assert_eq!(value["html"], "2d+5<span style=\"color: #FF0000\">+1</span>&gt;=12 命中");

        let json = generate_command(SHEET, "attack", 0, "none", "").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["text"], "k20[10]+5$+1 武器A");
    }

    #[test]
    fn test_generate_command_invalid() {
        assert!(generate_command(SHEET, "judge", 5, "none", "").is_none());
        assert!(generate_command(SHEET, "buff", 0, "none", "").is_none());
        assert!(generate_command("{}", "judge", 0, "none", "").is_none());
    }

    #[test]
    fn test_suggest() {
        assert_eq!(suggest(SHEET, "器用"), vec!["//器用増強//"]);
        assert!(suggest("oops", "器用").is_empty());
    }

    #[test]
    fn test_progress_and_toggle() {
        let json = progress_turn(SHEET).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["buffs"][0]["active"], false);
        assert_eq!(value["buffs"][0]["turn"], 0);

        let json = toggle_buff(&json, 0).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["buffs"][0]["active"], true);
        assert_eq!(value["buffs"][0]["turn"], 1);

        assert!(toggle_buff(SHEET, 7).is_none());
    }
}
