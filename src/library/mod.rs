//! Template library
//!
//! An immutable catalogue of script skeletons keyed by (dialect, category).
//! Every skeleton declares which [`Slot`]s it fills; the slot set is closed
//! and checked when an entry is created, so a registered template can never
//! reference a placeholder the synthesizer does not provide.
//!
//! Built-in templates can be replaced from a directory laid out as
//! `<dir>/<dialect>/<category>.jinja`.

mod builtin;

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use serde::Serialize;

use crate::classify::IntentCategory;
use crate::request::Dialect;
use crate::templates::{self, TemplateError};

/// Named fill-in point of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Category-specific statements
    CustomCode,
    /// Part number assigned to a new product
    PartNumber,
    /// Revision assigned to a new product
    Revision,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::CustomCode, Slot::PartNumber, Slot::Revision];

    /// Placeholder name as written in template source
    pub fn name(self) -> &'static str {
        match self {
            Slot::CustomCode => "custom_code",
            Slot::PartNumber => "part_number",
            Slot::Revision => "revision",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dialect-scoped script skeleton
#[derive(Debug, Clone, Serialize)]
pub struct TemplateEntry {
    name: String,
    dialect: Dialect,
    category: IntentCategory,
    #[serde(skip)]
    body: Cow<'static, str>,
    slots: Vec<Slot>,
}

impl TemplateEntry {
    /// Create an entry, checking its placeholders against the slot set.
    pub fn new(
        dialect: Dialect,
        category: IntentCategory,
        body: impl Into<Cow<'static, str>>,
    ) -> Result<Self, TemplateError> {
        let name = format!("{}/{}", dialect.as_str(), category.as_str());
        let body = body.into();
        let slots = templates::declared_slots(&name, &body)?;
        if slots.is_empty() {
            return Err(TemplateError::NoSlots(name));
        }
        Ok(Self {
            name,
            dialect,
            category,
            body,
            slots,
        })
    }

    /// Identifier such as `vba/sketch`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn category(&self) -> IntentCategory {
        self.category
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Slots referenced by the body, in [`Slot::ALL`] order
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

/// Catalogue of template entries in declaration order
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    entries: Vec<TemplateEntry>,
    /// Index of the first-declared entry for each dialect
    defaults: [usize; 2],
}

fn dialect_index(dialect: Dialect) -> usize {
    match dialect {
        Dialect::Vba => 0,
        Dialect::Python => 1,
    }
}

impl TemplateLibrary {
    /// The embedded catalogue
    pub fn builtin() -> &'static TemplateLibrary {
        static BUILTIN: OnceLock<TemplateLibrary> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let entries = builtin::BUILTIN
                .iter()
                .map(|(dialect, category, body)| {
                    TemplateEntry::new(*dialect, *category, *body)
                        .expect("Failed to load built-in template")
                })
                .collect();
            TemplateLibrary::from_entries(entries).expect("Built-in library covers every dialect")
        })
    }

    /// Build a library from entries in declaration order.
    ///
    /// Every dialect needs at least one entry so that selection always has a
    /// default to fall back on. A later entry with the same key replaces the
    /// earlier one in place.
    pub fn from_entries(entries: Vec<TemplateEntry>) -> Result<Self, TemplateError> {
        let mut deduped: Vec<TemplateEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            match deduped
                .iter_mut()
                .find(|e| e.dialect == entry.dialect && e.category == entry.category)
            {
                Some(existing) => *existing = entry,
                None => deduped.push(entry),
            }
        }

        let mut defaults = [0usize; 2];
        for dialect in Dialect::ALL {
            let first = deduped
                .iter()
                .position(|e| e.dialect == dialect)
                .ok_or(TemplateError::EmptyDialect(dialect))?;
            defaults[dialect_index(dialect)] = first;
        }

        Ok(Self {
            entries: deduped,
            defaults,
        })
    }

    /// Replace built-in bodies with files from an override directory.
    ///
    /// Missing files keep the existing entry; a `.jinja` file whose name is
    /// not a known category is rejected.
    pub fn with_overrides(self, dir: &Path) -> Result<Self, TemplateError> {
        if !dir.is_dir() {
            return Err(TemplateError::IoError(format!(
                "Template directory not found: {}",
                dir.display()
            )));
        }

        let mut entries = self.entries;
        for dialect in Dialect::ALL {
            let dialect_dir = dir.join(dialect.as_str());
            if !dialect_dir.is_dir() {
                continue;
            }

            let listing = std::fs::read_dir(&dialect_dir).map_err(|e| {
                TemplateError::IoError(format!("Failed to read {}: {}", dialect_dir.display(), e))
            })?;
            let mut paths = listing
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.extension().is_some_and(|ext| ext == "jinja"))
                .collect::<Vec<_>>();
            paths.sort();

            for path in paths {
                let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
                let category = IntentCategory::from_name(stem)
                    .ok_or_else(|| TemplateError::InvalidOverridePath(path.display().to_string()))?;
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    TemplateError::IoError(format!("Failed to read {}: {}", path.display(), e))
                })?;
                tracing::debug!(template = %path.display(), "loaded template override");
                entries.push(TemplateEntry::new(dialect, category, content)?);
            }
        }

        Self::from_entries(entries)
    }

    /// Exact lookup without fallback
    pub fn get(&self, dialect: Dialect, category: IntentCategory) -> Option<&TemplateEntry> {
        self.entries
            .iter()
            .find(|e| e.dialect == dialect && e.category == category)
    }

    /// The dialect's first-declared entry
    pub fn default_entry(&self, dialect: Dialect) -> &TemplateEntry {
        &self.entries[self.defaults[dialect_index(dialect)]]
    }

    /// Select the template for a category, falling back to the dialect default.
    pub fn select_template(&self, category: IntentCategory, dialect: Dialect) -> &TemplateEntry {
        match self.get(dialect, category) {
            Some(entry) => entry,
            None => {
                let entry = self.default_entry(dialect);
                tracing::debug!(
                    %category,
                    %dialect,
                    fallback = entry.name(),
                    "no template for category, using dialect default"
                );
                entry
            }
        }
    }

    /// Entries for one dialect in declaration order
    pub fn entries_for(&self, dialect: Dialect) -> impl Iterator<Item = &TemplateEntry> {
        self.entries.iter().filter(move |e| e.dialect == dialect)
    }

    pub fn entries(&self) -> &[TemplateEntry] {
        &self.entries
    }
}
