//! Prompt construction for the inference service

use crate::request::{CodeRequest, Complexity, Dialect};

fn complexity_guidance(complexity: Complexity) -> &'static str {
    match complexity {
        Complexity::Basic => "Keep it short: a single routine that performs the task directly.",
        Complexity::Intermediate => {
            "Split the work into small helper routines and check inputs before using them."
        }
        Complexity::Advanced => {
            "Structure it as reusable, parameterized routines with thorough error handling and logging."
        }
    }
}

fn dialect_guidance(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::Vba => {
            "VBA guidance:
- Use the CATIA V5 object model through the global CATIA object
- Declare every variable with Dim ... As ...
- Use On Error GoTo with a labelled error handler
- Comment with a leading apostrophe"
        }
        Dialect::Python => {
            "Python guidance:
- Use win32com.client.Dispatch(\"CATIA.Application\") for the COM interface
- Wrap COM calls in try/except blocks and report failures
- Follow PEP 8 naming
- Comment with a leading hash"
        }
    }
}

/// Build the natural-language prompt for a request.
///
/// The description is flattened onto its `Description:` line, so no prompt
/// line starts with a script marker even for multi-line descriptions.
pub fn build_prompt(request: &CodeRequest) -> String {
    let dialect = request.dialect();
    let description = request.description().split_whitespace().collect::<Vec<_>>().join(" ");
    format!(
        "You are an expert CATIA V5 automation developer. Generate {lang} code for the following requirement:

Description: {description}
Language: {lang}
Complexity Level: {complexity}

Requirements:
1. Generate clean, well-commented code
2. Include error handling where appropriate
3. Use CATIA V5 best practices
4. {guidance}
5. Only return the code, no additional explanation

{dialect_guidance}

{lang} Code:
",
        lang = dialect.language_name(),
        description = description,
        complexity = request.complexity(),
        guidance = complexity_guidance(request.complexity()),
        dialect_guidance = dialect_guidance(dialect),
    )
}
