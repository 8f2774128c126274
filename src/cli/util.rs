//! CLI utility helpers

use std::fs;
use std::path::{Path, PathBuf};

use cadgen::{CodeRequest, Complexity, Config, Dialect, Error, Result};

/// Load configuration from `--config` or the working directory
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    Config::load(path)
}

/// Parse `--language`, falling back to the configured default
pub fn parse_dialect(value: Option<&str>, config: &Config) -> Result<Dialect> {
    match value {
        Some(v) => v.parse(),
        None => Ok(config.defaults.dialect),
    }
}

/// Parse `--complexity`, falling back to the configured default
pub fn parse_complexity(value: Option<&str>, config: &Config) -> Result<Complexity> {
    match value {
        Some(v) => v.parse(),
        None => Ok(config.defaults.complexity),
    }
}

/// Build a request from raw flag values
pub fn build_request(
    description: &str,
    language: Option<&str>,
    complexity: Option<&str>,
    config: &Config,
) -> Result<CodeRequest> {
    CodeRequest::new(
        description,
        parse_dialect(language, config)?,
        parse_complexity(complexity, config)?,
    )
}

/// Write content verbatim to a file, or print it to stdout
pub fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(p) => {
            fs::write(p, content).map_err(Error::Io)?;
            eprintln!("Written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
