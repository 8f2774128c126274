//! Custom MiniJinja filters for script generation
//!
//! - `indent`: indent every non-empty line (fragments are written at column 0)
//! - `comment_lines`: turn free text into dialect line comments

use minijinja::Environment;

/// Register all custom filters with the environment
pub fn register_filters(env: &mut Environment<'_>) {
    env.add_filter("indent", indent);
    env.add_filter("comment_lines", comment_lines);
}

/// Add indentation to each line
fn indent(value: &str, spaces: usize) -> String {
    let indent_str = " ".repeat(spaces);
    value
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", indent_str, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prefix every line with a comment marker, indenting the text under it
fn comment_lines(value: &str, marker: &str) -> String {
    value
        .lines()
        .map(|line| {
            let line = line.trim_end();
            if line.is_empty() {
                marker.to_string()
            } else {
                format!("{}   {}", marker, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
