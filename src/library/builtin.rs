//! Built-in template catalogue
//!
//! Templates are embedded in the binary. Declaration order matters: the
//! first entry of each dialect is that dialect's default.

use crate::classify::IntentCategory;
use crate::request::Dialect;

mod embedded {
    pub const VBA_FEATURE: &str = include_str!("../../templates/vba/feature.jinja");
    pub const VBA_PART: &str = include_str!("../../templates/vba/part.jinja");
    pub const VBA_SKETCH: &str = include_str!("../../templates/vba/sketch.jinja");
    pub const VBA_ASSEMBLY: &str = include_str!("../../templates/vba/assembly.jinja");
    pub const VBA_DRAWING: &str = include_str!("../../templates/vba/drawing.jinja");

    pub const PYTHON_FEATURE: &str = include_str!("../../templates/python/feature.jinja");
    pub const PYTHON_PART: &str = include_str!("../../templates/python/part.jinja");
    pub const PYTHON_SKETCH: &str = include_str!("../../templates/python/sketch.jinja");
    pub const PYTHON_ASSEMBLY: &str = include_str!("../../templates/python/assembly.jinja");
    pub const PYTHON_DRAWING: &str = include_str!("../../templates/python/drawing.jinja");
}

/// Built-in template sources in declaration order
pub(crate) const BUILTIN: [(Dialect, IntentCategory, &str); 10] = [
    (Dialect::Vba, IntentCategory::Feature, embedded::VBA_FEATURE),
    (Dialect::Vba, IntentCategory::Part, embedded::VBA_PART),
    (Dialect::Vba, IntentCategory::Sketch, embedded::VBA_SKETCH),
    (Dialect::Vba, IntentCategory::Assembly, embedded::VBA_ASSEMBLY),
    (Dialect::Vba, IntentCategory::Drawing, embedded::VBA_DRAWING),
    (Dialect::Python, IntentCategory::Feature, embedded::PYTHON_FEATURE),
    (Dialect::Python, IntentCategory::Part, embedded::PYTHON_PART),
    (Dialect::Python, IntentCategory::Sketch, embedded::PYTHON_SKETCH),
    (Dialect::Python, IntentCategory::Assembly, embedded::PYTHON_ASSEMBLY),
    (Dialect::Python, IntentCategory::Drawing, embedded::PYTHON_DRAWING),
];
