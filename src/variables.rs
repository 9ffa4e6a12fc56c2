//! Recursive variable expansion for macro palettes
//!
//! Expressions reference variables with `{name}`, optionally preceded by an
//! operator (`$+`, `+`, `-`, `#`, `$`). Expansion rules, in priority order:
//!
//! - `{}` or a blank name stays `{}`
//! - Special variables become dictionary tokens `//name//` and are recorded
//!   in the [`DictionaryRegistry`]; the operator before them is dropped
//! - Ability names stay as `{name}` for the dice roller to fill in
//! - Previously expanded names come from the per-expander cache
//! - A name already being expanded (a cycle) stays as `{name}`
//! - Undefined names stay as `{name}`
//! - Anything else expands recursively from the [`AssignmentMap`]
//!
//! Expansion never fails. Malformed references pass through untouched.
//!
//! # Example
//!
//! ```
//! use jetpalette::assignments::parse_assignments;
//! use jetpalette::variables::Expander;
//!
//! let map = parse_assignments(&["// 基本 = 2d+{冒険者レベル}", "// 命中 = {基本}+{器用}{命中修正}"]).unwrap();
//! let mut expander = Expander::new(&map);
//!
//! assert_eq!(expander.expand("{命中}"), "2d+{冒険者レベル}+{器用}//命中修正//");
//! assert!(expander.dictionary().contains("命中修正"));
//! ```

use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::debug;

use crate::assignments::AssignmentMap;
use crate::dictionary::DictionaryEntry;

/// The six ability scores. References to these are left for the roller.
pub const ABILITY_NAMES: [&str; 6] = ["器用", "敏捷", "筋力", "生命", "知力", "精神"];

/// Well-known modifier names that become user-dictionary placeholders.
pub const SPECIAL_VARIABLES: [&str; 18] = [
    "器用増強",
    "敏捷増強",
    "筋力増強",
    "生命増強",
    "知力増強",
    "精神増強",
    "命中修正",
    "C修正",
    "追加D修正",
    "魔力修正",
    "行使修正",
    "魔法D修正",
    "回復量修正",
    "生命抵抗修正",
    "精神抵抗修正",
    "回避修正",
    "クリレイ",
    "必殺効果",
];

static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\$\+|[+\-#$])?\s*\{([^}]+)\}").unwrap());

pub fn is_ability(name: &str) -> bool {
    ABILITY_NAMES.contains(&name)
}

pub fn is_special_variable(name: &str) -> bool {
    SPECIAL_VARIABLES.contains(&name)
}

/// Format a dictionary placeholder token for a name.
pub fn dictionary_token(name: &str) -> String {
    format!("//{}//", name)
}

/// Placeholder names collected during one conversion.
///
/// Keeps first-registration order so the generated dictionary is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryRegistry {
    names: Vec<String>,
}

impl DictionaryRegistry {
    pub fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Record a placeholder name and return its token text.
    ///
    /// Registering the same name twice keeps a single entry.
    pub fn register(&mut self, name: &str) -> String {
        if !self.contains(name) {
            self.names.push(name.to_string());
        }
        dictionary_token(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.names.iter()
    }

    /// Turn the collected names into persisted user-dictionary entries.
    pub fn into_entries(self) -> Vec<DictionaryEntry> {
        self.names.iter().map(|name| DictionaryEntry::placeholder(name)).collect()
    }
}

/// Expands `{name}` references against one document's assignments.
///
/// The cache and dictionary belong to this expander; build a new one for
/// every conversion.
#[derive(Debug)]
pub struct Expander<'a> {
    assignments: &'a AssignmentMap,
    cache: HashMap<String, String>,
    dictionary: DictionaryRegistry,
}

impl<'a> Expander<'a> {
    pub fn new(assignments: &'a AssignmentMap) -> Self {
        Self { assignments, cache: HashMap::new(), dictionary: DictionaryRegistry::new() }
    }

    /// Fully expand an expression.
    pub fn expand(&mut self, expression: &str) -> String {
        let mut visiting = HashSet::new();
        self.expand_expression(expression, &mut visiting)
    }

    /// Expand a single variable by name (without braces or operator).
    pub fn expand_variable(&mut self, name: &str) -> String {
        let mut visiting = HashSet::new();
        self.resolve(name, &mut visiting)
    }

    /// Register a dictionary placeholder that was not written in the source.
    pub fn register_dictionary(&mut self, name: &str) -> String {
        self.dictionary.register(name)
    }

    pub fn dictionary(&self) -> &DictionaryRegistry {
        &self.dictionary
    }

    pub fn into_dictionary(self) -> DictionaryRegistry {
        self.dictionary
    }

    fn expand_expression(&mut self, expression: &str, visiting: &mut HashSet<String>) -> String {
        if expression.is_empty() {
            return String::new();
        }

        REFERENCE_RE
            .replace_all(expression, |caps: &Captures| {
                let operator = caps.get(1).map_or("", |m| m.as_str());
                let name = caps[2].trim();
                let expanded = self.resolve(name, visiting);
                if is_special_variable(name) {
                    // Dictionary tokens carry their own sign
                    expanded
                } else {
                    format!("{}{}", operator, expanded)
                }
            })
            .into_owned()
    }

    /// Recursion is bounded by `visiting`, which never holds a name twice.
    fn resolve(&mut self, name: &str, visiting: &mut HashSet<String>) -> String {
        let name = name.trim();
        if name.is_empty() {
            return "{}".to_string();
        }
        if is_special_variable(name) {
            return self.dictionary.register(name);
        }
        if is_ability(name) {
            return format!("{{{}}}", name);
        }
        if let Some(cached) = self.cache.get(name) {
            return cached.clone();
        }
        if visiting.contains(name) {
            debug!(variable = name, "cyclic reference left unexpanded");
            return format!("{{{}}}", name);
        }
        let Some(expression) = self.assignments.get(name) else {
            return format!("{{{}}}", name);
        };

        visiting.insert(name.to_string());
        let expanded = self.expand_expression(expression, visiting);
        visiting.remove(name);

        self.cache.insert(name.to_string(), expanded.clone());
        expanded
    }
}
