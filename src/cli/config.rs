//! Config and schema CLI commands

use std::path::Path;

use cadgen::config::CONFIG_FILE;
use cadgen::{Config, Error, Result};

pub fn cmd_init(config_path: Option<&Path>, force: bool) -> Result<()> {
    let path = config_path.unwrap_or(Path::new(CONFIG_FILE));
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let yaml = Config::default().to_yaml()?;
    std::fs::write(path, yaml).map_err(Error::Io)?;
    println!("✓ Wrote {}", path.display());
    Ok(())
}

pub fn cmd_schema() -> Result<()> {
    let schema = schemars::schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
