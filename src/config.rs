//! cadgen configuration
//!
//! Loaded from `--config <path>` or `./.cadgen.yaml`; every field has a
//! default, so an absent file yields a working configuration with AI off.
//! Environment variables override the file after loading.

use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ai::GenerationParams;
use crate::error::{Error, Result};
use crate::request::{Complexity, Dialect};

/// Default file name looked up in the working directory
pub const CONFIG_FILE: &str = ".cadgen.yaml";

/// Public text-generation endpoint used when none is configured
pub const DEFAULT_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/microsoft/DialoGPT-medium";

pub const ENV_ENDPOINT: &str = "CADGEN_AI_ENDPOINT";
pub const ENV_TIMEOUT: &str = "CADGEN_AI_TIMEOUT_SECS";

const CONFIG_VERSION: u32 = 1;

/// Root configuration (`.cadgen.yaml`)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Schema version for migrations
    #[serde(default = "default_version")]
    pub version: u32,

    /// Request defaults for the CLI
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Remote generation settings
    #[serde(default)]
    pub ai: AiConfig,

    /// Template overrides
    #[serde(default)]
    pub templates: TemplatesConfig,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_true() -> bool {
    true
}

/// Request defaults
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DefaultsConfig {
    /// Dialect used when `--language` is not given
    #[serde(default = "default_dialect")]
    pub dialect: Dialect,

    /// Complexity used when `--complexity` is not given
    #[serde(default)]
    pub complexity: Complexity,

    /// Prepend the provenance comment block to template output
    #[serde(default = "default_true")]
    pub provenance: bool,
}

fn default_dialect() -> Dialect {
    Dialect::Vba
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
            complexity: Complexity::default(),
            provenance: true,
        }
    }
}

/// Remote generation settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AiConfig {
    /// Try the remote service by default
    #[serde(default)]
    pub enabled: bool,

    /// Inference endpoint URL; empty means unconfigured
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_length")]
    pub max_length: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_true")]
    pub do_sample: bool,

    /// Environment variable holding the bearer token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Treat the service as unconfigured when no token is present
    #[serde(default)]
    pub require_token: bool,

    /// Resolved from `token_env`, never written to disk
    #[serde(skip)]
    #[schemars(skip)]
    pub token: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_length() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_token_env() -> String {
    "HF_API_TOKEN".to_string()
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            max_length: default_max_length(),
            temperature: default_temperature(),
            do_sample: true,
            token_env: default_token_env(),
            require_token: false,
            token: None,
        }
    }
}

impl AiConfig {
    /// Sampling parameters for the request body
    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            max_length: self.max_length,
            temperature: self.temperature,
            do_sample: self.do_sample,
        }
    }

    /// Whether a client can be built from these settings
    pub fn is_configured(&self) -> bool {
        if self.endpoint.trim().is_empty() {
            return false;
        }
        !(self.require_token && self.token.is_none())
    }
}

/// Template override settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TemplatesConfig {
    /// Directory laid out as `<dir>/<dialect>/<category>.jinja`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            defaults: DefaultsConfig::default(),
            ai: AiConfig::default(),
            templates: TemplatesConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration and apply process environment overrides.
    ///
    /// An explicit path must exist; the implicit `./.cadgen.yaml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_file(path)?,
            None => {
                let implicit = Path::new(CONFIG_FILE);
                if implicit.exists() {
                    Self::load_file(implicit)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_from(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML file without consulting the environment
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_yaml(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        // relative override dirs resolve against the config file
        if let Some(dir) = &config.templates.dir {
            if dir.is_relative() {
                if let Some(parent) = path.parent() {
                    config.templates.dir = Some(parent.join(dir));
                }
            }
        }

        tracing::debug!(config = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_norway::from_str(content)?;
        if config.version != CONFIG_VERSION {
            return Err(Error::Config(format!(
                "Unsupported config version: {}",
                config.version
            )));
        }
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_norway::to_string(self)?)
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.ai.endpoint = endpoint.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_TIMEOUT) {
            self.ai.timeout_secs = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{} must be a whole number of seconds, got '{}'", ENV_TIMEOUT, raw))
            })?;
        }

        self.ai.token = lookup(&self.ai.token_env)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.ai.timeout_secs == 0 {
            return Err(Error::Config("ai.timeout_secs must be positive".into()));
        }
        if !(0.0..=2.0).contains(&self.ai.temperature) {
            return Err(Error::Config(format!(
                "ai.temperature must be between 0 and 2, got {}",
                self.ai.temperature
            )));
        }
        let endpoint = self.ai.endpoint.trim();
        if !endpoint.is_empty()
            && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(Error::Config(format!(
                "ai.endpoint must be an http(s) URL, got '{}'",
                endpoint
            )));
        }
        Ok(())
    }
}
