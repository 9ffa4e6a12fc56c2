//! Data models for palette sheets (roll items, buffs, persisted data)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::color::{is_buff_color, DEFAULT_BUFF_COLOR};
use crate::dictionary::DictionaryEntry;
use crate::target::Target;

/// The two kinds of roll items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollKind {
    /// A two-dice check (`2d...`)
    Judge,
    /// A damage/healing power roll (`k20...`)
    Attack,
}

impl fmt::Display for RollKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollKind::Judge => f.write_str("judge"),
            RollKind::Attack => f.write_str("attack"),
        }
    }
}

impl FromStr for RollKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "judge" => Ok(RollKind::Judge),
            "attack" => Ok(RollKind::Attack),
            other => Err(format!("unknown roll kind '{}', expected judge or attack", other)),
        }
    }
}

/// A judge or attack entry on the sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RollItem {
    pub name: String,
    #[serde(default)]
    pub roll: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl RollItem {
    pub fn new(name: impl Into<String>, roll: impl Into<String>, category: Option<String>) -> Self {
        Self { name: name.into(), roll: roll.into(), category }
    }
}

/// A modifier that composes into the commands of the items it targets.
///
/// `effect` is a comma-separated list. `//slot=value` pieces fill `//slot//`
/// placeholders in the formula, anything else is appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", from = "BuffRecord")]
pub struct Buff {
    pub name: String,
    pub memo: String,
    pub show_simple_memo: bool,
    pub effect: String,
    pub targets: Vec<Target>,
    pub turn: Option<u32>,
    pub original_turn: Option<u32>,
    pub color: String,
    pub category: Option<String>,
    pub active: bool,
}

impl Buff {
    /// An active buff without turn limit.
    pub fn new(
        name: impl Into<String>,
        effect: impl Into<String>,
        targets: Vec<Target>,
        color: impl Into<String>,
    ) -> Self {
        let mut buff = Self {
            name: name.into(),
            memo: String::new(),
            show_simple_memo: false,
            effect: effect.into(),
            targets,
            turn: None,
            original_turn: None,
            color: color.into(),
            category: None,
            active: true,
        };
        buff.normalize();
        buff
    }

    /// Builder: attach a memo shown on the sheet
    pub fn with_memo(mut self, memo: impl Into<String>, show_simple: bool) -> Self {
        self.memo = memo.into();
        self.show_simple_memo = show_simple;
        self
    }

    /// Builder: limit the buff to a number of turns
    pub fn with_turns(mut self, turns: u32) -> Self {
        self.turn = Some(turns);
        self.original_turn = Some(turns);
        self
    }

    /// Builder: file the buff under a category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// First memo line, if the simple memo is enabled.
    pub fn simple_memo(&self) -> &str {
        if !self.show_simple_memo {
            return "";
        }
        self.memo.lines().next().map(str::trim).unwrap_or("")
    }

    /// Flip the active flag. Re-activating an exhausted buff restores its turns.
    pub fn toggle(&mut self) {
        self.active = !self.active;
        if self.active && self.turn == Some(0) {
            self.turn = self.original_turn;
        }
    }

    /// Spend one turn. Returns whether the buff had turns to spend.
    pub fn tick(&mut self) -> bool {
        match self.turn {
            Some(turn) if self.active && turn > 0 => {
                self.turn = Some(turn - 1);
                if turn == 1 {
                    self.active = false;
                }
                true
            }
            _ => false,
        }
    }

    /// Restore the maximum turn count and reactivate. Returns false for
    /// buffs without a turn limit.
    pub fn reset_turns(&mut self) -> bool {
        match self.original_turn {
            Some(max) => {
                self.turn = Some(max);
                self.active = true;
                true
            }
            None => false,
        }
    }

    /// Enforce the target, turn and color invariants.
    pub fn normalize(&mut self) {
        if !is_buff_color(&self.color) {
            self.color = DEFAULT_BUFF_COLOR.to_string();
        }
        if self.targets.is_empty() {
            self.targets.push(Target::None);
        }
        if let (Some(turn), Some(max)) = (self.turn, self.original_turn) {
            if turn > max {
                self.turn = Some(max);
            }
        }
        if self.turn.is_some() && self.original_turn.is_none() {
            self.original_turn = self.turn;
        }
    }
}

/// Stored shape of a buff, including the legacy `description` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuffRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    memo: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    show_simple_memo: Option<bool>,
    #[serde(default)]
    effect: String,
    #[serde(default)]
    targets: Vec<String>,
    #[serde(default)]
    turn: Option<u32>,
    #[serde(default)]
    original_turn: Option<u32>,
    #[serde(default)]
    color: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

impl From<BuffRecord> for Buff {
    fn from(record: BuffRecord) -> Self {
        let show_simple_memo = record
            .show_simple_memo
            .unwrap_or_else(|| record.description.as_deref().is_some_and(|d| !d.is_empty()));
        let memo = record.memo.or(record.description).unwrap_or_default();

        let targets = record
            .targets
            .iter()
            .filter_map(|raw| match raw.parse::<Target>() {
                Ok(target) => Some(target),
                Err(e) => {
                    warn!(buff = %record.name, "dropping target: {}", e);
                    None
                }
            })
            .collect();

        let mut buff = Buff {
            name: record.name,
            memo,
            show_simple_memo,
            effect: record.effect,
            targets,
            turn: record.turn,
            original_turn: record.original_turn,
            color: record.color,
            category: record.category,
            active: record.active,
        };
        buff.normalize();
        buff
    }
}

/// Everything the sheet persists.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaletteData {
    #[serde(default)]
    pub buffs: Vec<Buff>,
    #[serde(default)]
    pub buff_categories: Vec<String>,
    #[serde(default)]
    pub judges: Vec<RollItem>,
    #[serde(default)]
    pub judge_categories: Vec<String>,
    #[serde(default)]
    pub attacks: Vec<RollItem>,
    #[serde(default)]
    pub attack_categories: Vec<String>,
    #[serde(default)]
    pub user_dictionary: Vec<DictionaryEntry>,
}

impl PaletteData {
    /// Items of one roll kind.
    pub fn rolls(&self, kind: RollKind) -> &[RollItem] {
        match kind {
            RollKind::Judge => &self.judges,
            RollKind::Attack => &self.attacks,
        }
    }
}
