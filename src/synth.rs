//! Snippet synthesis
//!
//! Produces the fragments that fill a template's slots. Part and sketch
//! requests get bespoke statement blocks; every other category gets a single
//! TODO line. Fragments depend only on category and dialect, never on the
//! wording of the description.

use serde::Serialize;

use crate::classify::IntentCategory;
use crate::library::Slot;
use crate::request::{CodeRequest, Dialect};

/// Fill-in text for every slot
///
/// One field per [`Slot`], so any registered template can be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragments {
    pub custom_code: String,
    pub part_number: String,
    pub revision: String,
}

impl Fragments {
    pub fn get(&self, slot: Slot) -> &str {
        match slot {
            Slot::CustomCode => &self.custom_code,
            Slot::PartNumber => &self.part_number,
            Slot::Revision => &self.revision,
        }
    }
}

const VBA_SKETCH: &str = "\
' Create a new sketch
Dim sketch As Sketch
Set sketch = sketches.Add(part.OriginElements.PlaneXY)

' Add geometric elements based on requirements
Dim factory2D As Factory2D
Set factory2D = sketch.OpenEdition()

' TODO: Implement specific sketch geometry

sketch.CloseEdition";

const VBA_PART: &str = "\
' Set part properties
part.PartNumber = \"GeneratedPart\"
part.Revision = \"A\"

' TODO: Add specific part creation logic";

const VBA_GENERIC: &str = "' TODO: Implement specific functionality based on requirements";

const PYTHON_SKETCH: &str = "\
# Create a new sketch
sketch = sketches.Add(part.OriginElements.PlaneXY)

# Add geometric elements based on requirements
factory_2d = sketch.OpenEdition()

# TODO: Implement specific sketch geometry

sketch.CloseEdition()";

const PYTHON_PART: &str = "\
# Set part properties
part.PartNumber = \"GeneratedPart\"
part.Revision = \"A\"

# TODO: Add specific part creation logic";

const PYTHON_GENERIC: &str = "# TODO: Implement specific functionality based on requirements";

/// The category-specific statements for the `custom_code` slot
pub fn custom_code(category: IntentCategory, dialect: Dialect) -> &'static str {
    match (category, dialect) {
        (IntentCategory::Sketch, Dialect::Vba) => VBA_SKETCH,
        (IntentCategory::Part, Dialect::Vba) => VBA_PART,
        (_, Dialect::Vba) => VBA_GENERIC,
        (IntentCategory::Sketch, Dialect::Python) => PYTHON_SKETCH,
        (IntentCategory::Part, Dialect::Python) => PYTHON_PART,
        (_, Dialect::Python) => PYTHON_GENERIC,
    }
}

/// Build fragments for a classified request
pub fn synthesize(category: IntentCategory, dialect: Dialect, _request: &CodeRequest) -> Fragments {
    let part_number = match category {
        IntentCategory::Assembly => "GeneratedAssembly",
        _ => "GeneratedPart",
    };
    Fragments {
        custom_code: custom_code(category, dialect).to_string(),
        part_number: part_number.to_string(),
        revision: "A".to_string(),
    }
}
