//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Configuration merges three sources, later ones winning: built-in
//! defaults, an optional `sift.yaml`, and `SIFT__`-prefixed environment
//! variables. String values may reference `${VAR}` placeholders, expanded
//! recursively up to a fixed depth. The provider credential is the one
//! required secret: [`SiftConfig::validate`] rejects a configuration whose
//! key is absent or unexpanded, and callers treat that as fatal at startup.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use sift_common::SiftError;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

const DEFAULT_CONFIG_YAML: &str = r#"
llm:
  provider: gemini
  api_key: "${GEMINI_API_KEY}"
"#;

#[derive(Debug, Deserialize)]
pub struct SiftConfig {
    pub version: Option<String>,
    pub llm: LlmConfig,
}

/// The tag is `provider`; Gemini is the only wired provider today.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum LlmConfig {
    Gemini {
        api_key: String,
        #[serde(default = "default_gemini_model")]
        model: String,
    },
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

impl SiftConfig {
    /// Reject configurations that cannot authenticate to the provider.
    ///
    /// An empty key, or one still containing an unexpanded `${VAR}`
    /// placeholder (the variable was not set), is a configuration error.
    pub fn validate(&self) -> Result<(), SiftError> {
        let LlmConfig::Gemini { api_key, model } = &self.llm;
        if api_key.trim().is_empty() || api_key.contains("${") {
            return Err(SiftError::Config(
                "no provider API key configured (set GEMINI_API_KEY or llm.api_key)".to_string(),
            ));
        }
        if model.trim().is_empty() {
            return Err(SiftError::Config("llm.model must not be empty".to_string()));
        }
        Ok(())
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (defaults + YAML + env overrides).
pub struct SiftConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for SiftConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SiftConfigLoader {
    /// Start with the built-in defaults plus `SIFT__` env overrides.
    ///
    /// The default credential is the `${GEMINI_API_KEY}` placeholder, so an
    /// env-only deployment needs no file at all; if the variable is unset
    /// the placeholder survives expansion and [`SiftConfig::validate`]
    /// refuses to start.
    pub fn new() -> Self {
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG_YAML, config::FileFormat::Yaml))
            .add_source(Environment::with_prefix("SIFT").separator("__"));
        Self { builder }
    }

    /// Attach a config file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self.builder.add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a config file that may be absent; env-only deployments rely
    /// purely on environment variables.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// `${VAR}` placeholders are expanded before materialising the typed
    /// config, so secrets can live in the environment rather than the file.
    pub fn load(self) -> Result<SiftConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: SiftConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
