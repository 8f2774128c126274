//! Script extraction from untrusted model output
//!
//! Finds the first line that opens a routine in the target dialect and keeps
//! everything up to and including the first end marker after it. Nested or
//! repeated routines are cut at the first end marker. The result is a slice
//! of the original text, so line endings survive untouched.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::request::Dialect;

struct Markers {
    start: Regex,
    /// `None` when the dialect has no closing keyword
    end: Option<Regex>,
}

fn markers(dialect: Dialect) -> &'static Markers {
    static VBA: OnceLock<Markers> = OnceLock::new();
    static PYTHON: OnceLock<Markers> = OnceLock::new();

    match dialect {
        Dialect::Vba => VBA.get_or_init(|| Markers {
            start: Regex::new(r"^\s*(?:(?:Public|Private|Friend)\s+)?(?:Static\s+)?(?:Sub|Function)\s+\w")
                .expect("VBA start marker is valid"),
            end: Some(
                Regex::new(r"^\s*End\s+(?:Sub|Function)\b").expect("VBA end marker is valid"),
            ),
        }),
        Dialect::Python => PYTHON.get_or_init(|| Markers {
            start: Regex::new(r"^(?:import\s+\w|from\s+\w|def\s+\w|class\s+\w)")
                .expect("Python start marker is valid"),
            end: None,
        }),
    }
}

/// Why no script could be extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerError {
    /// No line opens a routine
    MissingStart,
    /// A routine opens but never closes (usually a truncated reply)
    MissingEnd,
}

impl fmt::Display for MarkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerError::MissingStart => write!(f, "no start marker"),
            MarkerError::MissingEnd => write!(f, "start marker without end marker"),
        }
    }
}

impl std::error::Error for MarkerError {}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

/// Lines with their byte offset; content excludes the `\n` / `\r\n` terminator
fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    text.split_inclusive('\n').scan(0usize, |offset, raw| {
        let start = *offset;
        *offset += raw.len();
        let content = raw.strip_suffix('\n').unwrap_or(raw);
        let content = content.strip_suffix('\r').unwrap_or(content);
        Some((start, content))
    })
}

/// Extract the script from generated text.
///
/// With an end marker the script runs from the start line through the end
/// marker line. A dialect without an end marker runs to the end of the text,
/// stopping early at a closing code fence, with trailing whitespace dropped.
/// A fence reached before a required end marker is a [`MarkerError::MissingEnd`].
pub fn extract_script(text: &str, dialect: Dialect) -> Result<&str, MarkerError> {
    let markers = markers(dialect);
    let mut lines = lines_with_offsets(text);

    let start = lines
        .by_ref()
        .find(|(_, line)| markers.start.is_match(line))
        .map(|(offset, _)| offset)
        .ok_or(MarkerError::MissingStart)?;

    let mut end = text.len();
    for (offset, line) in lines {
        if let Some(end_marker) = &markers.end {
            if end_marker.is_match(line) {
                return Ok(&text[start..offset + line.len()]);
            }
        }
        if is_fence(line) {
            end = offset;
            break;
        }
    }

    if markers.end.is_some() {
        return Err(MarkerError::MissingEnd);
    }
    Ok(text[start..end].trim_end())
}
