//! Template rendering
//!
//! Uses MiniJinja for placeholder substitution. Undefined variables are an
//! error (strict mode): a placeholder without a fragment must never render as
//! an empty string.

pub mod filters;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use minijinja::{context, Environment, UndefinedBehavior};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::library::{Slot, TemplateEntry};
use crate::request::{CodeRequest, Dialect};
use crate::synth::Fragments;

mod embedded {
    pub const PROVENANCE: &str = include_str!("../../templates/headers/provenance.jinja");
}

const PROVENANCE_TEMPLATE: &str = "headers/provenance.jinja";

/// Template engine singleton
static ENGINE: OnceLock<Environment<'static>> = OnceLock::new();

/// Environment with the crate's filters and strict undefined handling
pub fn new_environment<'source>() -> Environment<'source> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    filters::register_filters(&mut env);
    env
}

fn init_engine() -> Environment<'static> {
    let mut env = new_environment();
    env.add_template(PROVENANCE_TEMPLATE, embedded::PROVENANCE)
        .expect("Failed to load provenance template");
    env
}

/// Get the global template engine
pub fn engine() -> &'static Environment<'static> {
    ENGINE.get_or_init(init_engine)
}

/// Parse a template body and return the slots it references.
///
/// Any variable outside the closed [`Slot`] set is rejected.
pub fn declared_slots(name: &str, body: &str) -> std::result::Result<Vec<Slot>, TemplateError> {
    let env = new_environment();
    let template = env
        .template_from_str(body)
        .map_err(|e| TemplateError::ParseError(name.to_string(), e.to_string()))?;

    let mut slots = Vec::new();
    let mut names = template.undeclared_variables(false).into_iter().collect::<Vec<_>>();
    names.sort();
    for var in names {
        match Slot::from_name(&var) {
            Some(slot) => slots.push(slot),
            None => {
                return Err(TemplateError::UnknownSlot {
                    template: name.to_string(),
                    name: var,
                })
            }
        }
    }
    slots.sort();
    Ok(slots)
}

/// Substitute an entry's placeholders with fragments
pub fn render(entry: &TemplateEntry, fragments: &Fragments) -> Result<String> {
    let ctx: BTreeMap<&str, &str> = entry
        .slots()
        .iter()
        .map(|slot| (slot.name(), fragments.get(*slot)))
        .collect();

    engine()
        .render_str(entry.body(), ctx)
        .map_err(|e| Error::Render {
            template: entry.name().to_string(),
            message: e.to_string(),
        })
}

/// Short, stable hash identifying a request
pub fn request_hash(request: &CodeRequest) -> String {
    let mut hasher = Sha256::new();
    hasher.update(request.dialect().as_str().as_bytes());
    hasher.update(b"\n");
    hasher.update(request.complexity().as_str().as_bytes());
    hasher.update(b"\n");
    hasher.update(request.description().as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..16].to_string()
}

/// Render the comment header placed above template-generated scripts
pub fn render_header(request: &CodeRequest) -> Result<String> {
    let dialect: Dialect = request.dialect();
    let template = engine()
        .get_template(PROVENANCE_TEMPLATE)
        .map_err(|e| TemplateError::TemplateNotFound(e.to_string()))?;

    template
        .render(context! {
            marker => dialect.comment_prefix(),
            version => crate::VERSION,
            description => request.description(),
            language => dialect.language_name(),
            complexity => request.complexity().as_str(),
            request_hash => request_hash(request),
        })
        .map_err(|e| Error::Render {
            template: PROVENANCE_TEMPLATE.to_string(),
            message: e.to_string(),
        })
}

/// Template errors
#[derive(Debug, Clone)]
pub enum TemplateError {
    /// Template not found
    TemplateNotFound(String),
    /// Template parse error (template name, message)
    ParseError(String, String),
    /// Placeholder outside the slot set
    UnknownSlot { template: String, name: String },
    /// Template has no placeholders at all
    NoSlots(String),
    /// A library has no entry for a dialect
    EmptyDialect(Dialect),
    /// Override file that does not name a category
    InvalidOverridePath(String),
    /// IO error loading custom templates
    IoError(String),
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::TemplateNotFound(msg) => write!(f, "Template not found: {}", msg),
            TemplateError::ParseError(name, msg) => {
                write!(f, "Template parse error in {}: {}", name, msg)
            }
            TemplateError::UnknownSlot { template, name } => write!(
                f,
                "Template {} uses unknown placeholder '{}' (allowed: {})",
                template,
                name,
                Slot::ALL.map(Slot::name).join(", ")
            ),
            TemplateError::NoSlots(name) => {
                write!(f, "Template {} has no placeholders", name)
            }
            TemplateError::EmptyDialect(dialect) => {
                write!(f, "Template library has no entry for {}", dialect)
            }
            TemplateError::InvalidOverridePath(path) => write!(
                f,
                "Override {} does not name a category (feature, part, sketch, assembly, drawing)",
                path
            ),
            TemplateError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for TemplateError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::IntentCategory;
    use crate::request::Complexity;

    fn fragments() -> Fragments {
        Fragments {
            custom_code: "' line one\n\n' line two".to_string(),
            part_number: "ASM-001".to_string(),
            revision: "B".to_string(),
        }
    }

    #[test]
    fn test_engine_initialization() {
        assert!(engine().get_template(PROVENANCE_TEMPLATE).is_ok());
    }

    #[test]
    fn test_render_substitutes_and_indents() {
        let entry = TemplateEntry::new(
            Dialect::Vba,
            IntentCategory::Part,
            "Sub X()\n{{ custom_code | indent(4) }}\nEnd Sub",
        )
        .unwrap();
        let out = render(&entry, &fragments()).unwrap();
        assert_eq!(out, "Sub X()\n    ' line one\n\n    ' line two\nEnd Sub");
    }

    #[test]
    fn test_render_assembly_slots() {
        let entry = TemplateEntry::new(
            Dialect::Vba,
            IntentCategory::Assembly,
            "PN={{ part_number }} REV={{ revision }}\n{{ custom_code }}",
        )
        .unwrap();
        let out = render(&entry, &fragments()).unwrap();
        assert!(out.starts_with("PN=ASM-001 REV=B\n"));
    }

    #[test]
    fn test_declared_slots_ignores_filters() {
        let slots = declared_slots("t", "{{ revision }} {{ custom_code | indent(8) }}").unwrap();
        assert_eq!(slots, vec![Slot::CustomCode, Slot::Revision]);
    }

    #[test]
    fn test_declared_slots_parse_error() {
        let err = declared_slots("broken", "{{ custom_code ").unwrap_err();
        assert!(matches!(err, TemplateError::ParseError(ref n, _) if n == "broken"));
    }

    #[test]
    fn test_request_hash_is_stable() {
        let a = CodeRequest::new("make a pad", Dialect::Vba, Complexity::Basic).unwrap();
        let b = CodeRequest::new("make a pad", Dialect::Vba, Complexity::Basic).unwrap();
        let c = CodeRequest::new("make a pad", Dialect::Python, Complexity::Basic).unwrap();
        assert_eq!(request_hash(&a), request_hash(&b));
        assert_ne!(request_hash(&a), request_hash(&c));
        assert_eq!(request_hash(&a).len(), 16);
    }

    #[test]
    fn test_header_comments_lone_carriage_returns() {
        let req = CodeRequest::new("pad it\rEnd Sub\r\nagain", Dialect::Vba, Complexity::Basic).unwrap();
        let header = render_header(&req).unwrap();
        let lines: Vec<&str> = header.split(['\r', '\n']).collect();
        assert!(lines.iter().all(|l| l.starts_with('\'')), "{:?}", lines);
        assert!(header.contains("'   pad it\n'   End Sub\n'   again"));
    }

    #[test]
    fn test_header_comments_every_line() {
        let req = CodeRequest::new(
            "Create a part\nthen pad it",
            Dialect::Python,
            Complexity::Intermediate,
        )
        .unwrap();
        let header = render_header(&req).unwrap();
        assert!(header.lines().all(|l| l.starts_with('#')), "{}", header);
        assert!(header.contains("#   Create a part\n#   then pad it"));
        assert!(header.contains("Language: Python | Complexity: intermediate"));
        assert!(header.contains(&format!("sha256:{}", request_hash(&req))));
    }
}
