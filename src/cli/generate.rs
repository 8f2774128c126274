//! Generation commands: generate, prompt

use std::path::{Path, PathBuf};

use clap::Args;

use cadgen::{build_prompt, Error, Generator, Result};

use super::util::{build_request, load_config, write_output};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// What the script should do
    #[arg(short, long)]
    pub description: String,

    /// Script dialect: vba or python
    #[arg(short, long)]
    pub language: Option<String>,

    /// basic, intermediate or advanced
    #[arg(short, long)]
    pub complexity: Option<String>,

    /// Try the AI service before the templates
    #[arg(long, conflicts_with = "no_ai")]
    pub use_ai: bool,

    /// Never call the AI service, even when enabled in config
    #[arg(long)]
    pub no_ai: bool,

    /// Write the script to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the generation report as JSON
    #[arg(long)]
    pub json: bool,

    /// Omit the provenance comment header
    #[arg(long)]
    pub no_header: bool,

    /// Template override directory
    #[arg(long, value_name = "DIR")]
    pub template_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PromptArgs {
    #[arg(short, long)]
    pub description: String,

    #[arg(short, long)]
    pub language: Option<String>,

    #[arg(short, long)]
    pub complexity: Option<String>,
}

pub fn cmd_generate(config_path: Option<&Path>, args: &GenerateArgs) -> Result<()> {
    let mut config = load_config(config_path)?;
    if args.no_header {
        config.defaults.provenance = false;
    }

    let request = build_request(
        &args.description,
        args.language.as_deref(),
        args.complexity.as_deref(),
        &config,
    )?;

    let template_dir = args
        .template_dir
        .as_deref()
        .or(config.templates.dir.as_deref());
    let generator = Generator::from_config_with_templates(&config, template_dir)?;

    let ai_enabled = !args.no_ai && (args.use_ai || config.ai.enabled);
    let generation = generator.generate(&request, ai_enabled)?;

    eprintln!(
        "Generated {} code using {} method",
        request.dialect(),
        generation.method
    );
    if let Some(reason) = &generation.fallback {
        eprintln!("Note: {}", reason);
    }

    if args.json {
        let json = serde_json::to_string_pretty(&generation).map_err(Error::Json)?;
        write_output(&args.output, &json)
    } else {
        write_output(&args.output, &generation.script)
    }
}

pub fn cmd_prompt(config_path: Option<&Path>, args: &PromptArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let request = build_request(
        &args.description,
        args.language.as_deref(),
        args.complexity.as_deref(),
        &config,
    )?;
    print!("{}", build_prompt(&request));
    Ok(())
}
