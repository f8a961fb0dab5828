//! Runtime configuration for the Gemini call.
//!
//! Values are looked up through a [`ConfigSource`] so the pipeline never
//! reaches into the process environment directly. [`ProcessEnv`] is the
//! production source; tests use a plain `HashMap`.

use std::collections::HashMap;

use crate::error::OptimizerError;

/// A read-only key/value lookup (normally the process environment).
pub trait ConfigSource: Send + Sync {
    /// Return the value for `key`, or `None` if unset.
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads configuration from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Resolved settings for one call to the Gemini API.
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    /// API credential, sent as the `key` query parameter.
    pub api_key: String,
    /// Model identifier (e.g. `gemini-2.0-flash`).
    pub model: String,
    /// API version path segment (e.g. `v1beta`).
    pub api_version: String,
}

impl GeminiConfig {
    pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
    pub const MODEL_VAR: &str = "GEMINI_MODEL";
    pub const API_VERSION_VAR: &str = "GEMINI_API_VERSION";

    pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
    pub const DEFAULT_API_VERSION: &str = "v1beta";

    /// Resolve the call settings from `source`.
    ///
    /// The credential is required; model and API version fall back to
    /// their defaults. Empty values are treated as unset.
    pub fn resolve(source: &dyn ConfigSource) -> Result<Self, OptimizerError> {
        let lookup = |key: &str| source.get(key).filter(|v| !v.is_empty());

        let api_key = lookup(Self::API_KEY_VAR).ok_or(OptimizerError::Configuration {
            var: Self::API_KEY_VAR,
        })?;
        let model = lookup(Self::MODEL_VAR).unwrap_or_else(|| Self::DEFAULT_MODEL.to_string());
        let api_version = lookup(Self::API_VERSION_VAR)
            .unwrap_or_else(|| Self::DEFAULT_API_VERSION.to_string());

        Ok(Self {
            api_key,
            model,
            api_version,
        })
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_version", &self.api_version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn resolve_uses_defaults_when_only_key_is_set() {
        let cfg = GeminiConfig::resolve(&source(&[("GEMINI_API_KEY", "secret")])).unwrap();
        assert_eq!(cfg.api_key, "secret");
        assert_eq!(cfg.model, "gemini-2.0-flash");
        assert_eq!(cfg.api_version, "v1beta");
    }

    #[test]
    fn resolve_honours_overrides() {
        let cfg = GeminiConfig::resolve(&source(&[
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-1.5-pro"),
            ("GEMINI_API_VERSION", "v1"),
        ]))
        .unwrap();
        assert_eq!(cfg.model, "gemini-1.5-pro");
        assert_eq!(cfg.api_version, "v1");
    }

    #[test]
    fn resolve_fails_without_credential() {
        let err = GeminiConfig::resolve(&source(&[("GEMINI_MODEL", "x")])).unwrap_err();
        assert!(matches!(
            err,
            OptimizerError::Configuration {
                var: "GEMINI_API_KEY"
            }
        ));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let err = GeminiConfig::resolve(&source(&[("GEMINI_API_KEY", "")])).unwrap_err();
        assert_eq!(err.kind(), "configuration");

        let cfg = GeminiConfig::resolve(&source(&[
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", ""),
        ]))
        .unwrap();
        assert_eq!(cfg.model, GeminiConfig::DEFAULT_MODEL);
    }

    #[test]
    fn debug_output_redacts_credential() {
        let cfg = GeminiConfig::resolve(&source(&[("GEMINI_API_KEY", "top-secret")])).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("top-secret"), "leaked key: {rendered}");
        assert!(rendered.contains("gemini-2.0-flash"));
    }
}
