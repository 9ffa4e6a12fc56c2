//! In-memory sheet state
//!
//! [`Store`] owns a [`PaletteData`] and provides the editing operations the
//! sheet offers: item CRUD per section, buff turn management, category
//! maintenance and command generation.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::color::{is_buff_color, DEFAULT_BUFF_COLOR};
use crate::compositor::{compose, Threshold};
use crate::dictionary::{suggest, DictionaryEntry};
use crate::matcher::matching_buffs;
use crate::models::{Buff, PaletteData, RollItem, RollKind};
use crate::render::CommandOutput;
use crate::target::Target;

/// Sections that must be present in imported data.
const REQUIRED_SECTIONS: [&str; 3] = ["buffs", "judges", "attacks"];

/// Error type for store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to parse sheet data: {0}")]
    Parse(String),

    #[error("invalid sheet data: missing '{0}'")]
    MissingSection(&'static str),

    #[error("failed to encode sheet data: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("category name must not be empty")]
    EmptyCategory,

    #[error("category '{0}' does not exist")]
    CategoryNotFound(String),

    #[error("category '{0}' already exists")]
    CategoryExists(String),
}

/// One section of the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Buff,
    Judge,
    Attack,
}

impl EntityKind {
    /// The roll kind for judge and attack sections.
    pub fn roll_kind(self) -> Option<RollKind> {
        match self {
            EntityKind::Buff => None,
            EntityKind::Judge => Some(RollKind::Judge),
            EntityKind::Attack => Some(RollKind::Attack),
        }
    }
}

impl From<RollKind> for EntityKind {
    fn from(kind: RollKind) -> Self {
        match kind {
            RollKind::Judge => EntityKind::Judge,
            RollKind::Attack => EntityKind::Attack,
        }
    }
}

/// Items filed under an optional category.
pub trait Categorized {
    fn category(&self) -> Option<&str>;
    fn set_category(&mut self, category: Option<String>);
}

impl Categorized for Buff {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn set_category(&mut self, category: Option<String>) {
        self.category = category;
    }
}

impl Categorized for RollItem {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn set_category(&mut self, category: Option<String>) {
        self.category = category;
    }
}

fn recategorize<T: Categorized>(items: &mut [T], from: &str, to: Option<&str>) -> usize {
    let mut changed = 0;
    for item in items.iter_mut().filter(|i| i.category() == Some(from)) {
        item.set_category(to.map(str::to_string));
        changed += 1;
    }
    changed
}

/// Split a category input on commas, ideographic commas and whitespace.
fn split_category_names(input: &str) -> impl Iterator<Item = &str> {
    input
        .split(|c: char| c == ',' || c == '、' || c.is_whitespace())
        .map(str::trim)
        .filter(|n| !n.is_empty())
}

/// The sheet's editable state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    data: PaletteData,
}

impl Store {
    pub fn new(mut data: PaletteData) -> Self {
        data.buffs.iter_mut().for_each(Buff::normalize);
        Self { data }
    }

    pub fn data(&self) -> &PaletteData {
        &self.data
    }

    pub fn into_data(self) -> PaletteData {
        self.data
    }

    pub fn buffs(&self) -> &[Buff] {
        &self.data.buffs
    }

    pub fn rolls(&self, kind: RollKind) -> &[RollItem] {
        self.data.rolls(kind)
    }

    fn rolls_mut(&mut self, kind: RollKind) -> &mut Vec<RollItem> {
        match kind {
            RollKind::Judge => &mut self.data.judges,
            RollKind::Attack => &mut self.data.attacks,
        }
    }

    /// Category list of a section.
    pub fn categories(&self, kind: EntityKind) -> &[String] {
        match kind {
            EntityKind::Buff => &self.data.buff_categories,
            EntityKind::Judge => &self.data.judge_categories,
            EntityKind::Attack => &self.data.attack_categories,
        }
    }

    fn categories_mut(&mut self, kind: EntityKind) -> &mut Vec<String> {
        match kind {
            EntityKind::Buff => &mut self.data.buff_categories,
            EntityKind::Judge => &mut self.data.judge_categories,
            EntityKind::Attack => &mut self.data.attack_categories,
        }
    }

    fn ensure_category(&mut self, kind: EntityKind, category: Option<&str>) {
        if let Some(name) = category.filter(|c| !c.is_empty()) {
            let list = self.categories_mut(kind);
            if !list.iter().any(|c| c == name) {
                list.push(name.to_string());
            }
        }
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    /// Append a roll item and return its index.
    pub fn add_roll(&mut self, kind: RollKind, item: RollItem) -> usize {
        self.ensure_category(kind.into(), item.category.as_deref());
        let list = self.rolls_mut(kind);
        list.push(item);
        list.len() - 1
    }

    /// Replace the roll item at `index`. Returns false when out of range.
    pub fn update_roll(&mut self, kind: RollKind, index: usize, item: RollItem) -> bool {
        if index >= self.rolls(kind).len() {
            return false;
        }
        self.ensure_category(kind.into(), item.category.as_deref());
        self.rolls_mut(kind)[index] = item;
        true
    }

    pub fn remove_roll(&mut self, kind: RollKind, index: usize) -> Option<RollItem> {
        let list = self.rolls_mut(kind);
        (index < list.len()).then(|| list.remove(index))
    }

    /// Append a buff (normalized) and return its index.
    pub fn add_buff(&mut self, mut buff: Buff) -> usize {
        buff.normalize();
        self.ensure_category(EntityKind::Buff, buff.category.as_deref());
        self.data.buffs.push(buff);
        self.data.buffs.len() - 1
    }

    /// Replace the buff at `index`. Returns false when out of range.
    pub fn update_buff(&mut self, index: usize, mut buff: Buff) -> bool {
        if index >= self.data.buffs.len() {
            return false;
        }
        buff.normalize();
        self.ensure_category(EntityKind::Buff, buff.category.as_deref());
        self.data.buffs[index] = buff;
        true
    }

    pub fn remove_buff(&mut self, index: usize) -> Option<Buff> {
        (index < self.data.buffs.len()).then(|| self.data.buffs.remove(index))
    }

    // ------------------------------------------------------------------
    // Turns
    // ------------------------------------------------------------------

    /// Toggle a buff and return its new active state.
    pub fn toggle_buff(&mut self, index: usize) -> Option<bool> {
        let buff = self.data.buffs.get_mut(index)?;
        buff.toggle();
        debug!(buff = %buff.name, active = buff.active, "toggled buff");
        Some(buff.active)
    }

    /// Advance one turn for every active buff with remaining turns.
    ///
    /// Returns whether any buff changed.
    pub fn progress_turn(&mut self) -> bool {
        let mut changed = false;
        for buff in &mut self.data.buffs {
            if buff.tick() {
                changed = true;
                if !buff.active {
                    info!(buff = %buff.name, "buff expired");
                }
            }
        }
        changed
    }

    /// Restore every turn-limited buff to its maximum and activate it.
    ///
    /// Returns the number of buffs reset.
    pub fn reset_turns(&mut self) -> usize {
        let mut count = 0;
        for buff in &mut self.data.buffs {
            if buff.reset_turns() {
                count += 1;
            }
        }
        debug!(count, "reset buff turns");
        count
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    /// Add categories from a comma/whitespace separated input.
    ///
    /// Returns the number added; existing names are skipped.
    pub fn add_categories(&mut self, kind: EntityKind, input: &str) -> Result<usize, StoreError> {
        let names: Vec<String> = split_category_names(input).map(str::to_string).collect();
        if names.is_empty() {
            return Err(StoreError::EmptyCategory);
        }
        let list = self.categories_mut(kind);
        let before = list.len();
        for name in names {
            if !list.contains(&name) {
                list.push(name);
            }
        }
        Ok(list.len() - before)
    }

    /// Rename a category, carrying the new name to items and buff targets.
    pub fn rename_category(&mut self, kind: EntityKind, from: &str, to: &str) -> Result<(), StoreError> {
        let to = to.trim();
        if to.is_empty() {
            return Err(StoreError::EmptyCategory);
        }
        let list = self.categories_mut(kind);
        let Some(pos) = list.iter().position(|c| c == from) else {
            return Err(StoreError::CategoryNotFound(from.to_string()));
        };
        if list.iter().any(|c| c == to) {
            return Err(StoreError::CategoryExists(to.to_string()));
        }
        list[pos] = to.to_string();

        let items = self.recategorize_items(kind, from, Some(to));
        self.retarget_buffs(kind, from, Some(to));
        debug!(from, to, items, "renamed category");
        Ok(())
    }

    /// Remove a category. Items lose their category and buff targets
    /// selecting it are dropped.
    pub fn remove_category(&mut self, kind: EntityKind, name: &str) -> Result<(), StoreError> {
        let list = self.categories_mut(kind);
        let Some(pos) = list.iter().position(|c| c == name) else {
            return Err(StoreError::CategoryNotFound(name.to_string()));
        };
        list.remove(pos);

        let items = self.recategorize_items(kind, name, None);
        self.retarget_buffs(kind, name, None);
        debug!(name, items, "removed category");
        Ok(())
    }

    fn recategorize_items(&mut self, kind: EntityKind, from: &str, to: Option<&str>) -> usize {
        match kind {
            EntityKind::Buff => recategorize(&mut self.data.buffs, from, to),
            EntityKind::Judge => recategorize(&mut self.data.judges, from, to),
            EntityKind::Attack => recategorize(&mut self.data.attacks, from, to),
        }
    }

    fn retarget_buffs(&mut self, kind: EntityKind, from: &str, to: Option<&str>) {
        let Some(roll_kind) = kind.roll_kind() else {
            return;
        };
        for buff in &mut self.data.buffs {
            buff.targets = std::mem::take(&mut buff.targets)
                .into_iter()
                .filter_map(|target| {
                    if target.category_name(roll_kind) == Some(from) {
                        to.map(|name| Target::category(roll_kind, name))
                    } else {
                        Some(target)
                    }
                })
                .collect();
            buff.normalize();
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Compose the command for one item with every buff that applies.
    pub fn generate_command(&self, kind: RollKind, index: usize, threshold: &Threshold) -> Option<CommandOutput> {
        let item = self.rolls(kind).get(index)?;
        let buffs = matching_buffs(&self.data.buffs, kind, item);
        let parts = compose(&item.roll, &buffs, kind, &item.name, threshold);
        Some(CommandOutput::from_parts(parts))
    }

    /// Dictionary suggestions for the text being typed.
    pub fn suggest(&self, input: &str) -> Vec<&DictionaryEntry> {
        suggest(&self.data.user_dictionary, input)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Pretty-printed JSON of the whole sheet.
    pub fn export_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    /// Load a sheet from JSON (JSON5 syntax accepted).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingSection`] when `buffs`, `judges` or
    /// `attacks` is absent.
    pub fn import_json(text: &str) -> Result<Self, StoreError> {
        Self::import_json_with(text, DEFAULT_BUFF_COLOR)
    }

    /// Like [`Store::import_json`], giving buffs without a valid color
    /// `default_color` instead.
    pub fn import_json_with(text: &str, default_color: &str) -> Result<Self, StoreError> {
        let mut value: Value = json5::from_str(text).map_err(|e| StoreError::Parse(e.to_string()))?;
        for section in REQUIRED_SECTIONS {
            if value.get(section).map_or(true, Value::is_null) {
                return Err(StoreError::MissingSection(section));
            }
        }
        if let Some(buffs) = value.get_mut("buffs").and_then(Value::as_array_mut) {
            for buff in buffs.iter_mut().filter_map(Value::as_object_mut) {
                let valid = buff.get("color").and_then(Value::as_str).is_some_and(is_buff_color);
                if !valid {
                    buff.insert("color".to_string(), Value::from(default_color));
                }
            }
        }
        let data: PaletteData = serde_json::from_value(value).map_err(|e| StoreError::Parse(e.to_string()))?;
        info!(
            buffs = data.buffs.len(),
            judges = data.judges.len(),
            attacks = data.attacks.len(),
            "imported sheet"
        );
        Ok(Self::new(data))
    }
}
