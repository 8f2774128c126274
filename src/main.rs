//! cadgen CLI - Command-line interface
//!
//! Commands:
//!   generate   - Generate a CATIA script from a description
//!   classify   - Show the intent category and template chosen
//!   templates  - List the template library
//!   prompt     - Show the prompt sent to the AI service
//!   init       - Write a default .cadgen.yaml
//!   schema     - Print the configuration JSON schema

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cli::{GenerateArgs, PromptArgs};

/// Log filter variable; defaults to `warn`
const LOG_ENV: &str = "CADGEN_LOG";

#[derive(Parser)]
#[command(name = "cadgen")]
#[command(version)]
#[command(about = "Generate CATIA V5 automation scripts from plain-language descriptions", long_about = None)]
struct Cli {
    /// Configuration file (default: ./.cadgen.yaml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a script from a description
    Generate(GenerateArgs),

    /// Show the intent category and the template each dialect would use
    Classify {
        /// Description to classify
        #[arg(value_name = "TEXT")]
        description: String,
    },

    /// List template library entries in declaration order
    Templates {
        /// Only list one dialect (vba or python)
        #[arg(short, long)]
        language: Option<String>,

        /// Template override directory
        #[arg(long, value_name = "DIR")]
        template_dir: Option<PathBuf>,
    },

    /// Print the prompt the AI path would send
    Prompt(PromptArgs),

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration JSON schema
    Schema,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    // .env is optional
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Generate(args) => cli::cmd_generate(config_path, &args),
        Commands::Classify { description } => cli::cmd_classify(config_path, &description),
        Commands::Templates {
            language,
            template_dir,
        } => cli::cmd_templates(config_path, language.as_deref(), template_dir.as_deref()),
        Commands::Prompt(args) => cli::cmd_prompt(config_path, &args),
        Commands::Init { force } => cli::cmd_init(config_path, force),
        Commands::Schema => cli::cmd_schema(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}
