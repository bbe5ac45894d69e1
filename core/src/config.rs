//! Scorer configuration.
//!
//! Defaults can be overridden from JSON or from the environment
//! (`IR_DEFAULT_K`, `IR_COSINE_MODE`).

use crate::error::{IndexError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of hits returned by [`Scorer::search`](crate::Scorer::search).
pub const DEFAULT_K: usize = 10;

/// How the document side of the cosine is normalized on the inverted path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CosineMode {
    /// Normalize each document accumulator over the query dimensions seen so
    /// far. Cheap, but the denominator ignores the document's other terms, so
    /// scores diverge from the dense path unless the query covers every term
    /// of the document.
    #[default]
    QueryRestricted,
    /// Normalize by the norm of the full tf-idf document vector. Matches the
    /// dense path.
    FullDocument,
}

impl FromStr for CosineMode {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query-restricted" | "query_restricted" => Ok(Self::QueryRestricted),
            "full-document" | "full_document" => Ok(Self::FullDocument),
            other => Err(IndexError::Config(format!("unknown cosine mode {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    pub default_k: usize,
    pub cosine: CosineMode,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self { default_k: DEFAULT_K, cosine: CosineMode::default() }
    }
}

impl ScorerConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| IndexError::Config(e.to_string()))
    }

    /// Defaults overridden by `IR_DEFAULT_K` and `IR_COSINE_MODE` when set.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(val) = var("IR_DEFAULT_K") {
            cfg.default_k = val
                .trim()
                .parse()
                .map_err(|_| IndexError::Config(format!("IR_DEFAULT_K is not a count: {val:?}")))?;
        }
        if let Some(val) = var("IR_COSINE_MODE") {
            cfg.cosine = val.parse()?;
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = ScorerConfig::default();
        assert_eq!(cfg.default_k, 10);
        assert_eq!(cfg.cosine, CosineMode::QueryRestricted);
        assert_eq!(ScorerConfig::from_vars(vars(&[])).unwrap(), cfg);
    }

    #[test]
    fn env_overrides() {
        let cfg = ScorerConfig::from_vars(vars(&[("IR_DEFAULT_K", " 25 "), ("IR_COSINE_MODE", "full-document")])).unwrap();
        assert_eq!(cfg.default_k, 25);
        assert_eq!(cfg.cosine, CosineMode::FullDocument);
    }

    #[test]
    fn env_rejects_garbage() {
        assert!(ScorerConfig::from_vars(vars(&[("IR_DEFAULT_K", "ten")])).is_err());
        assert!(ScorerConfig::from_vars(vars(&[("IR_COSINE_MODE", "euclid")])).is_err());
    }

    #[test]
    fn json_with_partial_fields() {
        let cfg = ScorerConfig::from_json(r#"{"cosine": "full-document"}"#).unwrap();
        assert_eq!(cfg.default_k, DEFAULT_K);
        assert_eq!(cfg.cosine, CosineMode::FullDocument);
        assert!(ScorerConfig::from_json("{").is_err());
    }
}
