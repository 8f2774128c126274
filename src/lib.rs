// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # cadgen: CATIA V5 automation script synthesis
//!
//! Turns a plain-language description into a VBA macro or a Python (COM)
//! script for CATIA V5.
//!
//! ## Core Concept
//!
//! Generation has two paths and always returns usable text:
//!
//! - **Template-based**: classify the description into an intent category,
//!   pick the dialect's skeleton for that category, synthesize the fill-in
//!   fragments and render. Fully deterministic.
//! - **AI-powered**: send a prompt to a text-generation service and extract
//!   the first complete routine from the reply. Any failure falls back to the
//!   template path, producing exactly the deterministic output.
//!
//! ## Quick Start
//!
//! ```rust
//! use cadgen::{generate, Complexity, Dialect};
//!
//! let script = generate(
//!     "Create a sketch on the XY plane and draw a circle with radius 25 mm",
//!     Dialect::Vba,
//!     Complexity::Basic,
//!     false,
//! )?;
//! assert!(script.starts_with("Sub CreateSketch()"));
//! # Ok::<(), cadgen::Error>(())
//! ```
//!
//! With configuration (template overrides, remote service, header):
//!
//! ```rust,ignore
//! use cadgen::{CodeRequest, Config, Generator};
//!
//! let config = Config::load(None)?;
//! let generator = Generator::from_config(&config)?;
//! let request = CodeRequest::new("Pad the profile by 20 mm", config.defaults.dialect, config.defaults.complexity)?;
//! let generation = generator.generate(&request, config.ai.enabled)?;
//! println!("{} ({})", generation.script, generation.method);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   request    │──►│   classify   │──►│   library    │
//! │ CodeRequest  │   │  keyword set │   │ select_templ │
//! └──────┬───────┘   └──────────────┘   └──────┬───────┘
//!        │                                     ▼
//!        │           ┌──────────────┐   ┌──────────────┐
//!        │           │    synth     │──►│  templates   │
//!        │           │  Fragments   │   │  minijinja   │
//!        │           └──────────────┘   └──────┬───────┘
//!        ▼                                     │
//! ┌──────────────┐     fallback               ▼
//! │      ai      │──────────────────────►┌──────────────┐
//! │ prompt/http/ │                       │   generate   │
//! │   extract    │──────validated───────►│  Generation  │
//! └──────────────┘                       └──────────────┘
//! ```

pub mod ai;
pub mod classify;
pub mod config;
pub mod error;
pub mod generate;
pub mod library;
pub mod request;
pub mod synth;
pub mod templates;

// Re-exports
pub use ai::{
    build_prompt, extract_script, ClientError, FallbackReason, GenerationParams,
    HttpInferenceClient, InferenceClient, InferenceRequest, MarkerError, RawResponse,
    RemoteOutcome,
};
pub use classify::{classify, explain, Classification, IntentCategory};
pub use config::Config;
pub use error::{Error, Result};
pub use generate::{generate, Generation, GenerationMethod, Generator};
pub use library::{Slot, TemplateEntry, TemplateLibrary};
pub use request::{CodeRequest, Complexity, Dialect};
pub use synth::{synthesize, Fragments};
pub use templates::TemplateError;

/// Version of cadgen
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
