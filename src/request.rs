//! Code generation requests
//!
//! A [`CodeRequest`] is the only input to the engine. It is validated on
//! construction and never mutated afterwards.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Target scripting dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// VBA macro run inside the CATIA host
    #[serde(alias = "macro")]
    Vba,
    /// Python script driving CATIA over COM (`win32com`)
    #[serde(alias = "script")]
    Python,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::Vba, Dialect::Python];

    /// Short identifier used in config files and template paths
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Vba => "vba",
            Dialect::Python => "python",
        }
    }

    /// Human-readable language name, as used in prompts and headers
    pub fn language_name(self) -> &'static str {
        match self {
            Dialect::Vba => "VBA",
            Dialect::Python => "Python",
        }
    }

    /// Line comment prefix
    pub fn comment_prefix(self) -> &'static str {
        match self {
            Dialect::Vba => "'",
            Dialect::Python => "#",
        }
    }

}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.language_name())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "vba" | "macro" | "bas" => Ok(Dialect::Vba),
            "python" | "py" | "script" => Ok(Dialect::Python),
            other => Err(Error::UnknownDialect(other.to_string())),
        }
    }
}

/// Requested complexity tier
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    #[default]
    Basic,
    Intermediate,
    Advanced,
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [
        Complexity::Basic,
        Complexity::Intermediate,
        Complexity::Advanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Basic => "basic",
            Complexity::Intermediate => "intermediate",
            Complexity::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Complexity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Complexity::Basic),
            "intermediate" => Ok(Complexity::Intermediate),
            "advanced" => Ok(Complexity::Advanced),
            other => Err(Error::UnknownComplexity(other.to_string())),
        }
    }
}

/// A single generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeRequest {
    description: String,
    dialect: Dialect,
    complexity: Complexity,
}

impl CodeRequest {
    /// Build a request, rejecting blank descriptions.
    ///
    /// Line endings are normalised to `\n` and surrounding whitespace is
    /// trimmed; the stored description is what the classifier, prompt builder
    /// and provenance header all see.
    pub fn new(
        description: impl Into<String>,
        dialect: Dialect,
        complexity: Complexity,
    ) -> Result<Self> {
        let description = description.into().replace("\r\n", "\n").replace('\r', "\n");
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyDescription);
        }
        Ok(Self {
            description: trimmed.to_string(),
            dialect,
            complexity,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn complexity(&self) -> Complexity {
        self.complexity
    }
}
