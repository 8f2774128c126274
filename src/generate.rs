//! Generation orchestration
//!
//! Ties the pipeline together:
//!
//! ```text
//! CodeRequest ─┬─ ai on + client ─► request_remote ─► Validated ──► AI-powered
//!              │                          │
//!              │                       Fallback(reason) ─┐
//!              │                                         ▼
//!              └─ ai off / no client ──► classify ─► select_template
//!                                           ─► synthesize ─► render ──► template-based
//! ```
//!
//! The deterministic path depends only on the request, so a failed remote
//! call produces exactly what a call with AI disabled would have produced.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::ai::{
    request_remote, FallbackReason, GenerationParams, HttpInferenceClient, InferenceClient,
    RemoteOutcome,
};
use crate::classify::{classify, IntentCategory};
use crate::config::Config;
use crate::error::Result;
use crate::library::TemplateLibrary;
use crate::request::{CodeRequest, Complexity, Dialect};
use crate::synth::synthesize;
use crate::templates;

/// How a script was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GenerationMethod {
    #[serde(rename = "template-based")]
    TemplateBased,
    #[serde(rename = "AI-powered")]
    AiPowered,
}

impl GenerationMethod {
    pub fn label(self) -> &'static str {
        match self {
            GenerationMethod::TemplateBased => "template-based",
            GenerationMethod::AiPowered => "AI-powered",
        }
    }
}

impl fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Generated script with a report of how it was made
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generation {
    pub script: String,
    pub method: GenerationMethod,
    pub category: IntentCategory,
    /// Template used, `None` for AI output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Why the remote path was abandoned, when it was tried
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackReason>,
}

/// Script generator
///
/// Immutable once built and shareable across threads.
pub struct Generator {
    library: TemplateLibrary,
    client: Option<Box<dyn InferenceClient>>,
    params: GenerationParams,
    provenance: bool,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("templates", &self.library.entries().len())
            .field("client", &self.client.as_ref().map(|c| c.name().to_string()))
            .field("params", &self.params)
            .field("provenance", &self.provenance)
            .finish()
    }
}

impl Generator {
    /// Built-in templates, no remote client, no provenance header
    pub fn new() -> Self {
        Self {
            library: TemplateLibrary::builtin().clone(),
            client: None,
            params: GenerationParams::default(),
            provenance: false,
        }
    }

    /// Build from configuration: template overrides, HTTP client, header
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::from_config_with_templates(config, config.templates.dir.as_deref())
    }

    /// Like [`Generator::from_config`] with an explicit override directory
    pub fn from_config_with_templates(config: &Config, template_dir: Option<&Path>) -> Result<Self> {
        let mut library = TemplateLibrary::builtin().clone();
        if let Some(dir) = template_dir {
            library = library.with_overrides(dir)?;
        }

        let mut generator = Self::new()
            .with_library(library)
            .with_params(config.ai.params())
            .with_provenance(config.defaults.provenance);

        if config.ai.is_configured() {
            generator = generator.with_client(HttpInferenceClient::new(
                config.ai.endpoint.trim(),
                Duration::from_secs(config.ai.timeout_secs),
                config.ai.token.clone(),
            ));
        } else {
            tracing::debug!("remote generation unconfigured");
        }

        Ok(generator)
    }

    pub fn with_library(mut self, library: TemplateLibrary) -> Self {
        self.library = library;
        self
    }

    pub fn with_client(mut self, client: impl InferenceClient + 'static) -> Self {
        self.client = Some(Box::new(client));
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_provenance(mut self, provenance: bool) -> Self {
        self.provenance = provenance;
        self
    }

    pub fn library(&self) -> &TemplateLibrary {
        &self.library
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// Generate a script, trying the remote service first when enabled.
    ///
    /// Remote failures never surface here; only template rendering can fail.
    pub fn generate(&self, request: &CodeRequest, ai_enabled: bool) -> Result<Generation> {
        let reason = match (ai_enabled, &self.client) {
            (false, _) => FallbackReason::Disabled,
            (true, None) => FallbackReason::Unconfigured,
            (true, Some(client)) => {
                match request_remote(client.as_ref(), request, &self.params) {
                    RemoteOutcome::Validated(script) => {
                        tracing::info!(method = "AI-powered", "script generated");
                        return Ok(Generation {
                            script,
                            method: GenerationMethod::AiPowered,
                            category: classify(request.description()),
                            template: None,
                            fallback: None,
                        });
                    }
                    RemoteOutcome::Fallback(reason) => reason,
                }
            }
        };

        if reason != FallbackReason::Disabled {
            tracing::warn!(%reason, "falling back to template generation");
        }

        let mut generation = self.generate_template_code(request)?;
        if reason != FallbackReason::Disabled {
            generation.fallback = Some(reason);
        }
        Ok(generation)
    }

    /// The deterministic pipeline: classify, select, synthesize, render
    pub fn generate_template_code(&self, request: &CodeRequest) -> Result<Generation> {
        let category = classify(request.description());
        let entry = self.library.select_template(category, request.dialect());
        let fragments = synthesize(category, request.dialect(), request);
        let body = templates::render(entry, &fragments)?;

        let script = if self.provenance {
            let header = templates::render_header(request)?;
            format!("{}\n\n{}", header, body)
        } else {
            body
        };

        tracing::info!(method = "template-based", template = entry.name(), "script generated");
        Ok(Generation {
            script,
            method: GenerationMethod::TemplateBased,
            category,
            template: Some(entry.name().to_string()),
            fallback: None,
        })
    }
}

/// Generate a script from a description.
///
/// Settings come from `./.cadgen.yaml` (when present) and the environment,
/// so `ai_enabled` reaches the configured service. No provenance header is
/// added.
pub fn generate(
    description: &str,
    dialect: Dialect,
    complexity: Complexity,
    ai_enabled: bool,
) -> Result<String> {
    let request = CodeRequest::new(description, dialect, complexity)?;
    let mut config = Config::load(None)?;
    config.defaults.provenance = false;
    let generator = Generator::from_config(&config)?;
    Ok(generator.generate(&request, ai_enabled)?.script)
}
