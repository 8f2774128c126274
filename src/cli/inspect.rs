//! Inspection commands: classify, templates

use std::path::Path;

use cadgen::{explain, Dialect, Result, TemplateLibrary};

use super::util::{load_config, parse_dialect};

fn library(template_dir: Option<&Path>) -> Result<TemplateLibrary> {
    let builtin = TemplateLibrary::builtin().clone();
    match template_dir {
        Some(dir) => Ok(builtin.with_overrides(dir)?),
        None => Ok(builtin),
    }
}

pub fn cmd_classify(config_path: Option<&Path>, description: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let library = library(config.templates.dir.as_deref())?;
    let classification = explain(description);

    match classification.matched_keyword {
        Some(keyword) => println!(
            "Category: {} (matched '{}')",
            classification.category, keyword
        ),
        None => println!("Category: {} (default)", classification.category),
    }
    for dialect in Dialect::ALL {
        let entry = library.select_template(classification.category, dialect);
        println!("  {:<7} {}", dialect.language_name(), entry.name());
    }
    Ok(())
}

pub fn cmd_templates(
    config_path: Option<&Path>,
    language: Option<&str>,
    template_dir: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let library = library(template_dir.or(config.templates.dir.as_deref()))?;

    let dialects = match language {
        Some(_) => vec![parse_dialect(language, &config)?],
        None => Dialect::ALL.to_vec(),
    };

    for dialect in dialects {
        println!("{}:", dialect.language_name());
        for (i, entry) in library.entries_for(dialect).enumerate() {
            let slots = entry
                .slots()
                .iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
                .join(", ");
            let marker = if i == 0 { " (default)" } else { "" };
            println!("  {:<16} [{}]{}", entry.name(), slots, marker);
        }
    }
    Ok(())
}
