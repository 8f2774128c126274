//! Intent classification
//!
//! Maps a free-text description to a coarse [`IntentCategory`] using ordered
//! keyword sets. The first set with a matching word wins, so the order of
//! [`RULES`] is part of the behaviour: "an assembly of sketches" is an
//! assembly request, not a sketch request.

use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Coarse task bucket used to pick a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IntentCategory {
    /// Pads, pockets and other features on an existing part; the default
    Feature,
    Part,
    Sketch,
    Assembly,
    Drawing,
}

impl IntentCategory {
    pub const ALL: [IntentCategory; 5] = [
        IntentCategory::Feature,
        IntentCategory::Part,
        IntentCategory::Sketch,
        IntentCategory::Assembly,
        IntentCategory::Drawing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IntentCategory::Feature => "feature",
            IntentCategory::Part => "part",
            IntentCategory::Sketch => "sketch",
            IntentCategory::Assembly => "assembly",
            IntentCategory::Drawing => "drawing",
        }
    }

    /// Parse a category name as used in template override paths
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One keyword set and the category it selects
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub category: IntentCategory,
    pub keywords: &'static [&'static str],
}

/// Classification rules in evaluation order. Do not reorder.
pub const RULES: [KeywordRule; 4] = [
    KeywordRule {
        category: IntentCategory::Part,
        keywords: &["part", "solid", "extrude", "pad"],
    },
    KeywordRule {
        category: IntentCategory::Assembly,
        keywords: &["assembly", "constraint", "product"],
    },
    KeywordRule {
        category: IntentCategory::Drawing,
        keywords: &["drawing", "view", "dimension"],
    },
    KeywordRule {
        category: IntentCategory::Sketch,
        keywords: &["sketch", "line", "circle", "profile"],
    },
];

/// Category used when no rule matches
pub const DEFAULT_CATEGORY: IntentCategory = IntentCategory::Feature;

/// Classification result with the keyword that decided it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: IntentCategory,
    /// `None` when the default category was used
    pub matched_keyword: Option<&'static str>,
}

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"[a-z0-9]+").expect("word pattern is valid"))
}

/// Lower-cased whole words of a description
fn words(description: &str) -> HashSet<String> {
    let lowered = description.to_lowercase();
    word_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Classify a description, reporting which keyword matched
pub fn explain(description: &str) -> Classification {
    let words = words(description);
    for rule in &RULES {
        if let Some(keyword) = rule.keywords.iter().copied().find(|k| words.contains(*k)) {
            tracing::debug!(category = %rule.category, keyword, "description classified");
            return Classification {
                category: rule.category,
                matched_keyword: Some(keyword),
            };
        }
    }
    tracing::debug!(category = %DEFAULT_CATEGORY, "no keyword matched, using default");
    Classification {
        category: DEFAULT_CATEGORY,
        matched_keyword: None,
    }
}

/// Classify a description into an intent category
pub fn classify(description: &str) -> IntentCategory {
    explain(description).category
}
