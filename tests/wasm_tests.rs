//! WASM tests using wasm_bindgen_test
//!
//! Run with: wasm-pack test --headless --chrome --features wasm
//! Native coverage of the same bindings lives in src/wasm.rs.

#![cfg(all(target_arch = "wasm32", feature = "wasm"))]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use jetpalette::wasm::{convert_palette, generate_command, progress_turn, suggest, toggle_buff};

const PALETTE: &str = "// 命中修正=+0\n### ■ 判定\n2d 冒険者＋筋力\n### ■ 武器攻撃\nk6 [武器]ダメージ／武器A";

const SHEET: &str = r##"{
    "buffs": [{"name": "祝福", "effect": "+1", "targets": ["all-judge"], "color": "#FF0000", "turn": 1, "originalTurn": 1}],
    "judges": [{"name": "回避", "roll": "2d+5"}],
    "attacks": [],
    "userDictionary": [{"id": "1", "text": "//筋力増強//", "category": "代入記法", "usage": 0}]
}"##;

// ============================================================================
// convert_palette tests
// ============================================================================

#[wasm_bindgen_test]
fn test_convert_palette_in_browser() {
    let result = convert_palette(PALETTE);
    assert!(result.error().is_none());
    let data = result.data();
    assert!(data.contains("\"筋力判定\""));
    assert!(data.contains("\"武器A\""));
    assert!(data.contains("//筋力増強//"));
}

#[wasm_bindgen_test]
fn test_convert_palette_error_in_browser() {
    let result = convert_palette("k6 武器A");
    assert!(result.error().is_some());
    assert!(result.data().is_empty());
}

// ============================================================================
// generate_command tests
// ============================================================================

#[wasm_bindgen_test]
fn test_generate_command_in_browser() {
    let json = generate_command(SHEET, "judge", 0, "gte", "12").expect("command should compose");
    assert!(json.contains("2d+5+1>=12 回避"));
}

#[wasm_bindgen_test]
fn test_generate_command_out_of_range() {
    assert!(generate_command(SHEET, "attack", 0, "none", "").is_none());
}

// ============================================================================
// Sheet state tests
// ============================================================================

#[wasm_bindgen_test]
fn test_turns_in_browser() {
    let after = progress_turn(SHEET).expect("sheet should load");
    assert!(after.contains("\"active\": false"));
    let toggled = toggle_buff(&after, 0).expect("buff exists");
    assert!(toggled.contains("\"active\": true"));
}

#[wasm_bindgen_test]
fn test_suggest_in_browser() {
    assert_eq!(suggest(SHEET, "筋力"), vec!["//筋力増強//".to_string()]);
}
