//! Buff targets
//!
//! A buff applies to roll items through a list of targets. Targets are stored
//! as prefixed strings (`judge:命中`, `attack-category:武器攻撃`, ...) and parsed
//! into [`Target`] at the serialization boundary; matching works on the enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::models::RollKind;

const NONE: &str = "none";
const ALL_JUDGE: &str = "all-judge";
const ALL_ATTACK: &str = "all-attack";
const JUDGE_PREFIX: &str = "judge:";
const ATTACK_PREFIX: &str = "attack:";
const JUDGE_CATEGORY_PREFIX: &str = "judge-category:";
const ATTACK_CATEGORY_PREFIX: &str = "attack-category:";

/// Error for target strings with an unknown form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized buff target '{0}'")]
pub struct TargetParseError(pub String);

/// Where a buff applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Target {
    None,
    AllJudge,
    AllAttack,
    Judge(String),
    Attack(String),
    JudgeCategory(String),
    AttackCategory(String),
}

impl Target {
    /// Wildcard target for every item of a kind.
    pub fn all(kind: RollKind) -> Self {
        match kind {
            RollKind::Judge => Target::AllJudge,
            RollKind::Attack => Target::AllAttack,
        }
    }

    /// Exact-name target for an item of a kind.
    pub fn item(kind: RollKind, name: impl Into<String>) -> Self {
        match kind {
            RollKind::Judge => Target::Judge(name.into()),
            RollKind::Attack => Target::Attack(name.into()),
        }
    }

    /// Category target for a kind.
    pub fn category(kind: RollKind, name: impl Into<String>) -> Self {
        match kind {
            RollKind::Judge => Target::JudgeCategory(name.into()),
            RollKind::Attack => Target::AttackCategory(name.into()),
        }
    }

    /// Whether this target selects an item of `kind` with the given name and category.
    pub fn applies_to(&self, kind: RollKind, name: &str, category: Option<&str>) -> bool {
        match (self, kind) {
            (Target::AllJudge, RollKind::Judge) | (Target::AllAttack, RollKind::Attack) => true,
            (Target::Judge(n), RollKind::Judge) | (Target::Attack(n), RollKind::Attack) => n == name,
            (Target::JudgeCategory(c), RollKind::Judge)
            | (Target::AttackCategory(c), RollKind::Attack) => category == Some(c.as_str()),
            _ => false,
        }
    }

    /// The category name if this is a category target of `kind`.
    pub fn category_name(&self, kind: RollKind) -> Option<&str> {
        match (self, kind) {
            (Target::JudgeCategory(c), RollKind::Judge)
            | (Target::AttackCategory(c), RollKind::Attack) => Some(c.as_str()),
            _ => None,
        }
    }

    /// Label shown on the sheet.
    pub fn label(&self) -> String {
        match self {
            Target::None => "なし".to_string(),
            Target::AllJudge => "すべての判定".to_string(),
            Target::AllAttack => "すべての攻撃".to_string(),
            Target::Judge(n) | Target::Attack(n) => n.clone(),
            Target::JudgeCategory(c) | Target::AttackCategory(c) => format!(">>{}", c),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::None => f.write_str(NONE),
            Target::AllJudge => f.write_str(ALL_JUDGE),
            Target::AllAttack => f.write_str(ALL_ATTACK),
            Target::Judge(n) => write!(f, "{}{}", JUDGE_PREFIX, n),
            Target::Attack(n) => write!(f, "{}{}", ATTACK_PREFIX, n),
            Target::JudgeCategory(c) => write!(f, "{}{}", JUDGE_CATEGORY_PREFIX, c),
            Target::AttackCategory(c) => write!(f, "{}{}", ATTACK_CATEGORY_PREFIX, c),
        }
    }
}

impl FromStr for Target {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            NONE => return Ok(Target::None),
            ALL_JUDGE => return Ok(Target::AllJudge),
            ALL_ATTACK => return Ok(Target::AllAttack),
            _ => {}
        }

        if let Some(rest) = s.strip_prefix(JUDGE_CATEGORY_PREFIX) {
            return Ok(Target::JudgeCategory(rest.to_string()));
        }
        if let Some(rest) = s.strip_prefix(ATTACK_CATEGORY_PREFIX) {
            return Ok(Target::AttackCategory(rest.to_string()));
        }
        if let Some(rest) = s.strip_prefix(JUDGE_PREFIX) {
            return Ok(Target::Judge(rest.to_string()));
        }
        if let Some(rest) = s.strip_prefix(ATTACK_PREFIX) {
            return Ok(Target::Attack(rest.to_string()));
        }
        Err(TargetParseError(s.to_string()))
    }
}

impl TryFrom<String> for Target {
    type Error = TargetParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.to_string()
    }
}
