//! Integration tests for palette conversion and variable expansion.
//!
//! Covers the end-to-end conversion scenarios plus the expansion properties
//! (cycle safety, ability passthrough, dictionary registration, idempotent
//! re-expansion).

use jetpalette::assignments::{parse_assignments, AssignmentError, AssignmentMap};
use jetpalette::converter::{convert_palette, convert_palette_with, ConvertError, ConvertOptions};
use jetpalette::dictionary::PLACEHOLDER_CATEGORY;
use jetpalette::target::Target;
use jetpalette::variables::{Expander, ABILITY_NAMES};
use proptest::prelude::*;

const SHEET: &str = "\
// 命中修正=+0
// 基本命中=+{冒険者レベル}+{器用}
// 武器A命中={基本命中}{命中修正}+1
// 武器A威力=k20[10]+{筋力}$+{追加D修正}
// ループ={ループ}+1

### ■ 判定
2d 冒険者＋器用
2d 冒険者＋知力
[宣]2d+{基本命中} 宣言のみ
2d{武器A命中} 命中力／武器A
2d+{ループ} 無限

### ■ 武器攻撃
{武器A威力} 無視される行
k20[10]+{筋力}{追加D修正} [武器]ダメージ／武器A
K10+{知力} 回復量／[魔法]キュア
";

fn map(entries: &[(&str, &str)]) -> AssignmentMap {
    let mut map = AssignmentMap::new();
    for (name, expr) in entries {
        map.insert(name, expr);
    }
    map
}

// ============================================================================
// End-to-end conversion
// ============================================================================

#[test]
fn test_ability_judge_end_to_end() {
    let data = convert_palette("// 命中修正=+2\n2d 冒険者＋筋力").unwrap();
    assert_eq!(data.judges.len(), 1);

    let judge = &data.judges[0];
    assert_eq!(judge.name, "筋力判定");
    assert_eq!(judge.category, None);
    assert!(judge.roll.contains("{筋力}"));
    assert!(judge.roll.contains("//筋力増強//"));

    let entries: Vec<_> = data.user_dictionary.iter().filter(|e| e.text == "//筋力増強//").collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].category.as_deref(), Some(PLACEHOLDER_CATEGORY));
    assert_eq!(entries[0].usage, 0);
    assert!(!entries[0].id.is_empty());
}

#[test]
fn test_attack_name_sanitized_end_to_end() {
    let data = convert_palette("// 命中修正=+2\nk6 [武器]ダメージ／武器A").unwrap();
    assert_eq!(data.attacks.len(), 1);
    assert_eq!(data.attacks[0].name, "武器A");
    assert_eq!(data.attacks[0].roll, "k6");
}

#[test]
fn test_full_sheet() {
    let data = convert_palette(SHEET).unwrap();

    let judge_names: Vec<_> = data.judges.iter().map(|j| j.name.as_str()).collect();
    assert_eq!(judge_names, ["器用判定", "知力判定", "命中力／武器A", "無限"]);
    assert!(data.judges.iter().all(|j| j.category.as_deref() == Some("判定")));
    assert_eq!(data.judges[2].roll, "2d+{冒険者レベル}+{器用}//命中修正//+1");
    assert_eq!(data.judges[3].roll, "2d+{ループ}+1");

    let attack_names: Vec<_> = data.attacks.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(attack_names, ["武器A", "キュア"]);
    assert_eq!(data.attacks[0].roll, "k20[10]+{筋力}//追加D修正//");
    assert_eq!(data.attacks[1].roll, "K10+{知力}");

    assert_eq!(data.judge_categories, ["判定"]);
    assert_eq!(data.attack_categories, ["武器攻撃"]);

    let dictionary: Vec<_> = data.user_dictionary.iter().map(|e| e.text.as_str()).collect();
    assert!(dictionary.contains(&"//器用増強//"));
    assert!(dictionary.contains(&"//知力増強//"));
    assert!(dictionary.contains(&"//追加D修正//"));
    assert!(dictionary.contains(&"//命中修正//"));
    assert_eq!(dictionary.iter().filter(|t| **t == "//追加D修正//").count(), 1);
}

#[test]
fn test_starter_buffs() {
    let data = convert_palette(SHEET).unwrap();
    assert_eq!(data.buffs.len(), ABILITY_NAMES.len() + 2);
    assert_eq!(data.buff_categories, ["出目修正", "装備"]);

    let equipment = &data.buffs[0];
    assert_eq!(equipment.targets, vec![Target::Judge("器用判定".into())]);
    assert_eq!(equipment.color, "#6272A4");
    assert!(equipment.active);

    let crit = data.buffs.last().unwrap();
    assert_eq!(crit.targets, vec![Target::AttackCategory("武器攻撃".into())]);
    assert_eq!(crit.color, "#8BE9FD");
}

#[test]
fn test_custom_starter_colors() {
    let options = ConvertOptions { equipment_color: "#111111".into(), dice_color: "#222222".into() };
    let data = convert_palette_with(SHEET, &options).unwrap();
    assert_eq!(data.buffs[0].color, "#111111");
    assert_eq!(data.buffs.last().unwrap().color, "#222222");
}

#[test]
fn test_no_assignments_is_an_error() {
    let err = convert_palette("2d+3 判定\nk20 攻撃").unwrap_err();
    assert_eq!(err, ConvertError::Assignments(AssignmentError::Empty));
    assert!(err.to_string().contains("no assignment"));
}

#[test]
fn test_crlf_input() {
    let data = convert_palette("// a=+1\r\n### ■ 戦闘\r\n2d{a} 命中\r\nk10 威力\r").unwrap();
    assert_eq!(data.judges[0].roll, "2d+1");
    assert_eq!(data.judges[0].category.as_deref(), Some("戦闘"));
    assert_eq!(data.attacks[0].name, "威力");
}

#[test]
fn test_conversion_does_not_share_state() {
    let first = convert_palette("// x=1\n2d+{命中修正} a").unwrap();
    let second = convert_palette("// x=1\n2d b").unwrap();
    assert_eq!(first.user_dictionary.len(), 1);
    assert!(second.user_dictionary.is_empty());
}

// ============================================================================
// Expansion properties
// ============================================================================

#[test]
fn test_direct_cycle_degrades_to_literal() {
    let m = map(&[("a", "{a}")]);
    let mut ex = Expander::new(&m);
    assert_eq!(ex.expand("{a}"), "{a}");
}

#[test]
fn test_mutual_cycle_degrades_to_literal() {
    let m = map(&[("a", "{b}+1"), ("b", "{a}+2")]);
    let mut ex = Expander::new(&m);
    let out = ex.expand("{a}");
    assert_eq!(out, "{a}+2+1");
}

#[test]
fn test_ability_passthrough_ignores_assignments() {
    let m = map(&[("筋力", "99")]);
    let mut ex = Expander::new(&m);
    assert_eq!(ex.expand("{筋力}"), "{筋力}");
    assert_eq!(ex.expand("-{筋力}"), "-{筋力}");
}

#[test]
fn test_special_variable_registered_once() {
    let m = parse_assignments(&["// 命中 = +{命中修正}", "// 再 = {命中}{命中修正}"]).unwrap();
    let mut ex = Expander::new(&m);
    assert_eq!(ex.expand("{再}+{命中修正}"), "//命中修正////命中修正////命中修正//");
    let dictionary = ex.into_dictionary();
    assert_eq!(dictionary.len(), 1);
    assert!(dictionary.contains("命中修正"));
}

/// Expression pieces without user-variable references.
fn literal() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("+1".to_string()),
        Just("2d".to_string()),
        Just("+{器用}".to_string()),
        Just("$+{C修正}".to_string()),
    ]
}

/// Expression pieces for generated assignment sets.
fn piece(names: &'static [&'static str]) -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(names).prop_map(|n| format!("{{{}}}", n)),
        prop::sample::select(names).prop_map(|n| format!("+{{{}}}", n)),
        literal(),
    ]
}

const NAMES: &[&str] = &["a", "b", "c", "d"];

proptest! {
    #[test]
    fn prop_expansion_terminates_on_any_graph(
        exprs in prop::collection::vec(prop::collection::vec(piece(NAMES), 1..4), 4)
    ) {
        let mut m = AssignmentMap::new();
        for (name, pieces) in NAMES.iter().zip(&exprs) {
            m.insert(name, &pieces.concat());
        }
        let mut ex = Expander::new(&m);
        for name in NAMES {
            let out = ex.expand(&format!("{{{}}}", name));
            prop_assert!(!out.contains("{}"), "output contains {{}}: {}", out);
        }
    }

    #[test]
    fn prop_self_reference_stays_literal(prefix in "[0-9+]{0,4}", suffix in "[0-9+]{0,4}") {
        let expr = format!("{}{{self}}{}", prefix, suffix);
        let m = map(&[("self", expr.as_str())]);
        let mut ex = Expander::new(&m);
        let out = ex.expand("{self}");
        prop_assert!(out.contains("{self}"), "output lacks {{self}}: {}", out);
        prop_assert_eq!(out, expr);
    }

    #[test]
    fn prop_reexpansion_is_idempotent(
        d in prop::collection::vec(literal(), 1..4),
        c in prop::collection::vec(piece(&["d"]), 1..4),
        b in prop::collection::vec(piece(&["c", "d"]), 1..4),
        a in prop::collection::vec(piece(&["b", "c", "d"]), 1..4),
    ) {
        let m = map(&[
            ("a", a.concat().as_str()),
            ("b", b.concat().as_str()),
            ("c", c.concat().as_str()),
            ("d", d.concat().as_str()),
        ]);
        let once = Expander::new(&m).expand("{a}");
        let twice = Expander::new(&m).expand(&once);
        prop_assert_eq!(once, twice);
    }
}
