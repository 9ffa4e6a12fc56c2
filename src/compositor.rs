//! Composing buff effects into a roll command
//!
//! A formula may contain slot placeholders written `//slot//`. Buff effects
//! are comma-separated; a piece of the form `//slot=value` contributes
//! `value` to that slot, any other piece is appended after the formula.
//!
//! The result is a list of [`CommandPart`]s, each optionally carrying the
//! color of the buff that produced it. Both the plain and colored renderings
//! are folds over this one list.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::{Buff, RollKind};

static SLOT_EFFECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//([^/]+)=(.+)").unwrap());

static SLOT_PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//([^/]+)//").unwrap());

/// One piece of a composed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandPart {
    pub text: String,
    /// Source buff color; `None` for formula text and suffixes
    pub color: Option<String>,
}

impl CommandPart {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), color: None }
    }

    pub fn colored(text: impl Into<String>, color: impl Into<String>) -> Self {
        Self { text: text.into(), color: Some(color.into()) }
    }
}

/// Success threshold appended to judges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Threshold {
    #[default]
    None,
    /// `>=value`
    AtLeast(String),
    /// `=<value`
    AtMost(String),
}

impl Threshold {
    /// Build from the sheet's mode string (`none`, `gte`, `lte`) and value.
    pub fn from_mode(mode: &str, value: &str) -> Self {
        match mode {
            "gte" => Threshold::AtLeast(value.to_string()),
            "lte" => Threshold::AtMost(value.to_string()),
            _ => Threshold::None,
        }
    }

    /// Suffix text, or `None` when there is nothing to append.
    pub fn suffix(&self) -> Option<String> {
        let (op, value) = match self {
            Threshold::None => return None,
            Threshold::AtLeast(v) => (">=", v.trim()),
            Threshold::AtMost(v) => ("=<", v.trim()),
        };
        if value.is_empty() {
            None
        } else {
            Some(format!("{}{}", op, value))
        }
    }
}

/// One comma-separated piece of a buff effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubEffect<'a> {
    Slot { name: &'a str, value: &'a str },
    Plain(&'a str),
}

/// Split an effect into its pieces. Blank pieces are dropped.
///
/// ```
/// use jetpalette::compositor::{parse_effect, SubEffect};
///
/// let pieces = parse_effect("//C=-1, +2");
/// assert_eq!(pieces, vec![SubEffect::Slot { name: "C", value: "-1" }, SubEffect::Plain("+2")]);
/// ```
pub fn parse_effect(effect: &str) -> Vec<SubEffect<'_>> {
    effect
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| match SLOT_EFFECT_RE.captures(piece) {
            Some(caps) => {
                let name = caps.get(1).map_or("", |m| m.as_str());
                let value = caps.get(2).map_or("", |m| m.as_str());
                SubEffect::Slot { name, value }
            }
            None => SubEffect::Plain(piece),
        })
        .collect()
}

/// Values collected per slot, each with its source color.
#[derive(Debug, Default)]
struct SlotTable<'a> {
    slots: HashMap<&'a str, Vec<(&'a str, &'a str)>>,
}

impl<'a> SlotTable<'a> {
    fn push(&mut self, slot: &'a str, value: &'a str, color: &'a str) {
        self.slots.entry(slot).or_default().push((value, color));
    }

    fn values(&self, slot: &str) -> Option<&[(&'a str, &'a str)]> {
        self.slots.get(slot).map(|v| v.as_slice()).filter(|v| !v.is_empty())
    }
}

/// Compose a command for an item from its formula and matching buffs.
///
/// `buffs` must already be filtered and ordered (see
/// [`matching_buffs`](crate::matcher::matching_buffs)). Thresholds only
/// apply to judges.
///
/// Part order: formula text with slot values spliced in, appended effects,
/// threshold suffix, then a space and the item name.
pub fn compose(
    formula: &str,
    buffs: &[&Buff],
    kind: RollKind,
    item_name: &str,
    threshold: &Threshold,
) -> Vec<CommandPart> {
    let mut slots = SlotTable::default();
    let mut appended = Vec::new();

    for buff in buffs {
        for piece in parse_effect(&buff.effect) {
            match piece {
                SubEffect::Slot { name, value } => slots.push(name, value, &buff.color),
                SubEffect::Plain(text) => appended.push(CommandPart::colored(text, &buff.color)),
            }
        }
    }

    let mut parts = splice_slots(formula, &slots);
    parts.extend(appended);

    if kind == RollKind::Judge {
        if let Some(suffix) = threshold.suffix() {
            parts.push(CommandPart::plain(suffix));
        }
    }

    parts.push(CommandPart::plain(format!(" {}", item_name)));
    parts
}

/// Walk the formula, replacing filled placeholders with colored slot values
/// and dropping empty ones. Literal runs around dropped placeholders merge.
fn splice_slots(formula: &str, slots: &SlotTable<'_>) -> Vec<CommandPart> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut last = 0;

    for caps in SLOT_PLACEHOLDER_RE.captures_iter(formula) {
        let Some(whole) = caps.get(0) else { continue };
        literal.push_str(&formula[last..whole.start()]);
        last = whole.end();

        let Some(values) = slots.values(&caps[1]) else { continue };
        if !literal.is_empty() {
            parts.push(CommandPart::plain(std::mem::take(&mut literal)));
        }
        for (value, color) in values {
            parts.push(CommandPart::colored(*value, *color));
        }
    }

    literal.push_str(&formula[last..]);
    if !literal.is_empty() {
        parts.push(CommandPart::plain(literal));
    }
    parts
}
