//! Stability classifier
//!
//! Judges whether an id, class or data attribute looks hand-authored
//! (stable) or framework-generated (blocked), and whether it is too generic
//! to distinguish an element.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::patterns::PatternTable;

/// What kind of identifier is being classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentKind {
    Id,
    Class,
    DataAttr,
}

impl IdentKind {
    pub fn name(&self) -> &'static str {
        match self {
            IdentKind::Id => "id",
            IdentKind::Class => "class",
            IdentKind::DataAttr => "data-attr",
        }
    }
}

/// Classifier verdict. The default is "not stable, not blocked".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub stable: bool,
    pub blocked: bool,
    /// Common word or high-entropy token; never used to distinguish
    pub generic: bool,
    /// Test / automation hook attribute
    pub test_hook: bool,
}

impl Classification {
    /// May take part in candidate construction.
    pub fn is_usable(&self) -> bool {
        !self.blocked && !self.generic
    }
}

#[derive(Debug, Clone)]
pub struct StabilityClassifier {
    table: Arc<PatternTable>,
}

impl Default for StabilityClassifier {
    fn default() -> Self {
        Self::new(PatternTable::builtin())
    }
}

impl StabilityClassifier {
    pub fn new(table: Arc<PatternTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    pub fn classify(&self, kind: IdentKind, name: &str, value: &str) -> Classification {
        match kind {
            IdentKind::Id => self.classify_id(value),
            IdentKind::Class => self.classify_class(value),
            IdentKind::DataAttr => self.classify_data_attr(name, value),
        }
    }

    pub fn classify_id(&self, value: &str) -> Classification {
        if value.trim().is_empty() || value.chars().any(char::is_whitespace) {
            return blocked();
        }
        let rules = &self.table.id;
        // only the id blocklist rejects an id; uniqueness is checked by the caller
        let blocked = rules.blocklist.is_match(value);
        Classification {
            stable: !blocked && rules.stable_allow.is_match(value),
            blocked,
            generic: false,
            test_hook: false,
        }
    }

    pub fn classify_class(&self, value: &str) -> Classification {
        if value.is_empty() {
            return blocked();
        }
        let rules = &self.table.class;
        let blocked = rules.blocklist.is_match(value);
        let generic = value.chars().count() <= 2
            || self.table.is_generic_word(value)
            || looks_generated(value);
        Classification {
            stable: !blocked && !generic && rules.stable_allow.is_match(value),
            blocked,
            generic,
            test_hook: false,
        }
    }

    pub fn classify_data_attr(&self, name: &str, value: &str) -> Classification {
        let name = name.to_ascii_lowercase();
        if !name.starts_with("data-") {
            return Classification::default();
        }
        let test_hook = self.table.is_test_attribute(&name);
        let rules = &self.table.data_attr;
        let name_blocked = !test_hook && rules.blocklist.is_match(&name);
        let value_blocked = !value.is_empty()
            && (self.table.data_value_blocklist.is_match(value) || looks_generated(value));
        let blocked = name_blocked || value_blocked;
        Classification {
            stable: !blocked && (test_hook || rules.stable_allow.is_match(&name)),
            blocked,
            generic: false,
            test_hook: test_hook && !blocked,
        }
    }

    /// Classes that survive the blocklist and generic filters, in order.
    pub fn usable_classes(&self, classes: &[String]) -> Vec<String> {
        classes
            .iter()
            .filter(|class| self.classify_class(class).is_usable())
            .cloned()
            .collect()
    }

    pub fn is_usable_id(&self, id: &str) -> bool {
        self.classify_id(id).is_usable()
    }

    pub fn is_test_attribute(&self, name: &str) -> bool {
        self.table.is_test_attribute(name)
    }

    /// Test hook or allowlisted data attribute name.
    pub fn is_stable_attribute(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        self.table.is_test_attribute(&name)
            || (name.starts_with("data-") && self.table.data_attr.stable_allow.is_match(&name))
    }
}

fn blocked() -> Classification {
    Classification {
        blocked: true,
        ..Classification::default()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Lower,
    Upper,
    Digit,
    Other,
}

fn char_class(ch: char) -> CharClass {
    if ch.is_ascii_digit() {
        CharClass::Digit
    } else if ch.is_lowercase() {
        CharClass::Lower
    } else if ch.is_uppercase() {
        CharClass::Upper
    } else {
        CharClass::Other
    }
}

/// High-entropy heuristic: a word part that keeps flipping between letters,
/// digits and case looks like a hash rather than a name.
pub fn looks_generated(token: &str) -> bool {
    token
        .split(|c: char| c == '-' || c == '_' || c == ':' || c == '.' || c.is_whitespace())
        .any(part_looks_generated)
}

fn part_looks_generated(part: &str) -> bool {
    let len = part.chars().count();
    if len < 5 {
        return false;
    }
    let digits = part.chars().filter(|c| c.is_ascii_digit()).count();
    let letters = part.chars().filter(|c| c.is_alphabetic()).count();
    if digits == 0 {
        return false;
    }

    let mut letter_digit_flips = 0;
    let mut class_flips = 0;
    let mut previous: Option<CharClass> = None;
    for class in part.chars().map(char_class) {
        if let Some(prev) = previous {
            if prev != class {
                class_flips += 1;
                if (prev == CharClass::Digit) != (class == CharClass::Digit) {
                    letter_digit_flips += 1;
                }
            }
        }
        previous = Some(class);
    }

    (digits >= 2 && letters >= 2 && letter_digit_flips >= 3)
        || (class_flips >= 4 && class_flips * 2 >= len && letters >= 2)
        || (len >= 20 && digits * 4 >= len && letters > 0)
}
