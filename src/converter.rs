//! Converting a pasted macro palette into sheet data
//!
//! The input is a chat palette exported from a character sheet:
//!
//! ```text
//! // 命中修正=+0
//! // 武器A命中=2d+{冒険者レベル}+{器用}{命中修正}
//! ### ■ 判定
//! 2d 冒険者＋器用
//! 2d+{武器A命中} 命中力／武器A
//! ### ■ 武器攻撃
//! k20[10]+{追加D修正} [武器]ダメージ／武器A
//! ```
//!
//! Assignment lines feed the [`Expander`]; roll lines become judges (`2d...`)
//! or attacks (`k<n>...`) filed under the most recent `### ■` header.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info};

use crate::assignments::{normalize_newlines, parse_assignments, AssignmentError};
use crate::models::{Buff, PaletteData, RollItem};
use crate::target::Target;
use crate::variables::{Expander, ABILITY_NAMES};

/// Line prefix marking a declaration line that is not a roll.
const DECLARATION_MARKER: &str = "[宣]";

/// Display-name prefix of adventurer ability checks (`冒険者＋器用`).
const ABILITY_JUDGE_PREFIX: &str = "冒険者＋";

/// Leading labels stripped from attack names.
const ATTACK_LABELS: [&str; 2] = ["ダメージ／", "回復量／"];

/// Category that the starter dice buffs target.
pub const WEAPON_ATTACK_CATEGORY: &str = "武器攻撃";
pub const EQUIPMENT_BUFF_CATEGORY: &str = "装備";
pub const DICE_BUFF_CATEGORY: &str = "出目修正";

static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^###\s*■\s*(.+)$").unwrap());
static JUDGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^2d").unwrap());
static ATTACK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^k\d+").unwrap());
static ROLL_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\S+)\s+(.+)$").unwrap());
static BRACKET_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[[^\]]+\]\s*").unwrap());

/// Error type for palette conversion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Assignments(#[from] AssignmentError),
}

/// Colors for the starter buffs added to every converted palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub equipment_color: String,
    pub dice_color: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { equipment_color: "#6272A4".to_string(), dice_color: "#8BE9FD".to_string() }
    }
}

/// Strip leading decorations from an attack's display name.
///
/// Removes `ダメージ／` / `回復量／` labels and `[tag]` brackets, in any
/// order, until none remain.
///
/// ```
/// use jetpalette::converter::sanitize_attack_name;
///
/// assert_eq!(sanitize_attack_name("[武器]ダメージ／武器A"), "武器A");
/// assert_eq!(sanitize_attack_name("回復量／[魔法][範囲]キュア"), "キュア");
/// ```
pub fn sanitize_attack_name(name: &str) -> String {
    let mut result = name.trim();
    loop {
        if let Some(rest) = ATTACK_LABELS.iter().find_map(|label| result.strip_prefix(label)) {
            result = rest.trim();
            continue;
        }
        if let Some(m) = BRACKET_TAG_RE.find(result) {
            result = result[m.end()..].trim();
            continue;
        }
        break;
    }
    result.to_string()
}

/// Return the ability if the name is exactly `冒険者＋<ability>`.
pub fn parse_ability_judge(name: &str) -> Option<&'static str> {
    let rest = name.trim().strip_prefix(ABILITY_JUDGE_PREFIX)?;
    ABILITY_NAMES.iter().copied().find(|ability| *ability == rest)
}

/// The canonical roll for an adventurer ability check.
pub fn ability_judge_roll(ability: &str) -> String {
    format!("2d+{{冒険者レベル}}+(({{{0}}}//{0}増強//)/6)", ability)
}

/// Equipment buffs (one per ability check) plus two dice modifiers for
/// weapon attacks.
pub fn starter_buffs(options: &ConvertOptions) -> Vec<Buff> {
    let mut buffs: Vec<Buff> = ABILITY_NAMES
        .iter()
        .map(|ability| {
            Buff::new(
                format!("{}装備", ability),
                "+0",
                vec![Target::Judge(format!("{}判定", ability))],
                &options.equipment_color,
            )
            .with_memo(format!("{}+n", ability), true)
            .with_category(EQUIPMENT_BUFF_CATEGORY)
        })
        .collect();

    for (memo, effect) in [("出目+n", "$+0"), ("必殺効果", "#-0")] {
        buffs.push(
            Buff::new(
                "名前を入力",
                effect,
                vec![Target::AttackCategory(WEAPON_ATTACK_CATEGORY.to_string())],
                &options.dice_color,
            )
            .with_memo(memo, true)
            .with_category(DICE_BUFF_CATEGORY),
        );
    }
    buffs
}

fn push_category(list: &mut Vec<String>, category: Option<&str>) {
    if let Some(name) = category {
        if !name.is_empty() && !list.iter().any(|c| c == name) {
            list.push(name.to_string());
        }
    }
}

/// Convert a pasted palette into sheet data with default colors.
pub fn convert_palette(input: &str) -> Result<PaletteData, ConvertError> {
    convert_palette_with(input, &ConvertOptions::default())
}

/// Convert a pasted palette into sheet data.
///
/// # Errors
///
/// Fails only when the document has no assignment lines.
///
/// # Example
///
/// ```
/// use jetpalette::converter::convert_palette;
///
/// let data = convert_palette("// 命中修正=+2\n2d 冒険者＋筋力\nk6 [武器]ダメージ／武器A").unwrap();
/// assert_eq!(data.judges[0].name, "筋力判定");
/// assert_eq!(data.attacks[0].name, "武器A");
/// assert!(data.user_dictionary.iter().any(|e| e.text == "//筋力増強//"));
/// ```
pub fn convert_palette_with(input: &str, options: &ConvertOptions) -> Result<PaletteData, ConvertError> {
    let normalized = normalize_newlines(input);
    let lines: Vec<&str> = normalized.split('\n').collect();
    let assignments = parse_assignments(&lines)?;
    debug!(assignments = assignments.len(), "parsed assignments");

    let mut expander = Expander::new(&assignments);
    let mut data = PaletteData::default();
    let mut current_category: Option<String> = None;

    for raw in &lines {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = SECTION_RE.captures(line) {
            current_category = Some(caps[1].trim().to_string());
            continue;
        }
        if line.starts_with(DECLARATION_MARKER) || line.starts_with("//") {
            continue;
        }

        let is_judge = JUDGE_RE.is_match(line);
        if !is_judge && !ATTACK_RE.is_match(line) {
            continue;
        }
        let Some(caps) = ROLL_LINE_RE.captures(line) else { continue };
        let roll_raw = &caps[1];
        let name_raw = caps[2].trim();
        let category = current_category.clone().filter(|c| !c.is_empty());

        if is_judge {
            let item = match parse_ability_judge(name_raw) {
                Some(ability) => {
                    expander.register_dictionary(&format!("{}増強", ability));
                    RollItem::new(format!("{}判定", ability), ability_judge_roll(ability), category)
                }
                None => RollItem::new(name_raw, expander.expand(roll_raw), category),
            };
            push_category(&mut data.judge_categories, item.category.as_deref());
            data.judges.push(item);
        } else {
            let item = RollItem::new(sanitize_attack_name(name_raw), expander.expand(roll_raw), category);
            push_category(&mut data.attack_categories, item.category.as_deref());
            data.attacks.push(item);
        }
    }

    data.buffs = starter_buffs(options);
    data.buff_categories = vec![DICE_BUFF_CATEGORY.to_string(), EQUIPMENT_BUFF_CATEGORY.to_string()];
    data.user_dictionary = expander.into_dictionary().into_entries();

    info!(
        judges = data.judges.len(),
        attacks = data.attacks.len(),
        placeholders = data.user_dictionary.len(),
        "converted palette"
    );
    Ok(data)
}
