//! User dictionary entries and autocomplete lookup

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category label given to placeholders generated by palette conversion.
pub const PLACEHOLDER_CATEGORY: &str = "代入記法";

/// Maximum number of autocomplete suggestions returned.
pub const MAX_SUGGESTIONS: usize = 5;

/// A snippet the sheet offers while typing effects and formulas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DictionaryEntry {
    #[serde(default = "new_id")]
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub usage: u32,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl DictionaryEntry {
    /// A fresh entry with a random id and zero usage.
    pub fn new(text: impl Into<String>, category: Option<String>) -> Self {
        Self { id: new_id(), text: text.into(), category, usage: 0 }
    }

    /// The `//name//` placeholder entry registered during conversion.
    pub fn placeholder(name: &str) -> Self {
        Self::new(format!("//{}//", name), Some(PLACEHOLDER_CATEGORY.to_string()))
    }
}

/// Suggest dictionary entries for a typed fragment.
///
/// Case-insensitive. Entries starting with the fragment come first, then
/// entries containing it elsewhere, each group in dictionary order.
///
/// # Example
///
/// ```
/// use jetpalette::dictionary::{suggest, DictionaryEntry};
///
/// let dict = vec![
///     DictionaryEntry::new("x//命中修正//", None),
///     DictionaryEntry::placeholder("命中修正"),
/// ];
/// let hits = suggest(&dict, "//命中");
/// assert_eq!(hits[0].text, "//命中修正//");
/// assert_eq!(hits[1].text, "x//命中修正//");
/// ```
pub fn suggest<'a>(entries: &'a [DictionaryEntry], input: &str) -> Vec<&'a DictionaryEntry> {
    if input.is_empty() {
        return Vec::new();
    }

    let needle = input.to_lowercase();
    let mut prefix = Vec::new();
    let mut partial = Vec::new();

    for entry in entries {
        let text = entry.text.to_lowercase();
        if text.starts_with(&needle) {
            prefix.push(entry);
        } else if text.contains(&needle) {
            partial.push(entry);
        }
    }

    prefix.extend(partial);
    prefix.truncate(MAX_SUGGESTIONS);
    prefix
}
