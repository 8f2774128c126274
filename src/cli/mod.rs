//! CLI command implementations
//!
//! Command handlers, organized by category:
//! - `generate`: script generation and prompt preview
//! - `inspect`: classification and template listing
//! - `config`: configuration file and schema commands
//! - `util`: shared helpers

pub mod config;
pub mod generate;
pub mod inspect;
pub mod util;

pub use config::{cmd_init, cmd_schema};
pub use generate::{cmd_generate, cmd_prompt, GenerateArgs, PromptArgs};
pub use inspect::{cmd_classify, cmd_templates};
