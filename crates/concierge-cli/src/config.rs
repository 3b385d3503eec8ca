//! Concierge session configuration

use std::path::PathBuf;

/// Settings for one concierge session, read from the environment and then
/// overridden by command-line flags
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConciergeConfig {
    /// Chat model served by Ollama
    pub model: String,

    /// Embedding model used for semantic room search
    pub embedding_model: String,

    /// JSONL destination for evaluation records
    pub output: PathBuf,

    /// Reasoning iterations allowed per query
    pub max_iterations: usize,

    /// Embed locally instead of calling Ollama
    pub offline_embeddings: bool,
}

impl Default for ConciergeConfig {
    fn default() -> Self {
        Self {
            model: "llama3.2".into(),
            embedding_model: "nomic-embed-text".into(),
            output: PathBuf::from("evaluation_dataset.jsonl"),
            max_iterations: 10,
            offline_embeddings: false,
        }
    }
}

impl ConciergeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let max_iterations = match lookup("CONCIERGE_MAX_ITERATIONS").map(|v| v.parse::<usize>()) {
            Some(Ok(n)) if n > 0 => n,
            Some(_) => {
                tracing::warn!(default = defaults.max_iterations, "⚠ ignoring invalid CONCIERGE_MAX_ITERATIONS");
                defaults.max_iterations
            }
            None => defaults.max_iterations,
        };

        Self {
            model: lookup("CONCIERGE_MODEL").unwrap_or(defaults.model),
            embedding_model: lookup("CONCIERGE_EMBEDDING_MODEL").unwrap_or(defaults.embedding_model),
            output: lookup("CONCIERGE_OUTPUT").map_or(defaults.output, PathBuf::from),
            max_iterations,
            offline_embeddings: lookup("CONCIERGE_OFFLINE_EMBEDDINGS").is_some_and(|v| is_truthy(&v)),
        }
    }

    /// Apply command-line overrides; unset flags keep the current value
    pub fn with_overrides(mut self, model: Option<String>, output: Option<PathBuf>, offline_embeddings: bool) -> Self {
        if let Some(model) = model {
            self.model = model;
        }
        if let Some(output) = output {
            self.output = output;
        }
        self.offline_embeddings |= offline_embeddings;
        self
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        let config = ConciergeConfig::from_lookup(|_| None);
        assert_eq!(config, ConciergeConfig::default());
        assert_eq!(config.output, PathBuf::from("evaluation_dataset.jsonl"));
    }

    #[test]
    fn test_env_values() {
        let config = ConciergeConfig::from_lookup(|key| match key {
            "CONCIERGE_MODEL" => Some("qwen2.5".into()),
            "CONCIERGE_OUTPUT" => Some("/tmp/evals.jsonl".into()),
            "CONCIERGE_MAX_ITERATIONS" => Some("4".into()),
            "CONCIERGE_OFFLINE_EMBEDDINGS" => Some("True".into()),
            _ => None,
        });

        assert_eq!(config.model, "qwen2.5");
        assert_eq!(config.embedding_model, "nomic-embed-text");
        assert_eq!(config.output, PathBuf::from("/tmp/evals.jsonl"));
        assert_eq!(config.max_iterations, 4);
        assert!(config.offline_embeddings);
    }

    #[test]
    fn test_invalid_iterations_fall_back() {
        for bad in ["0", "many"] {
            let config = ConciergeConfig::from_lookup(|key| (key == "CONCIERGE_MAX_ITERATIONS").then(|| bad.to_owned()));
            assert_eq!(config.max_iterations, 10);
        }
    }

    #[test]
    fn test_overrides() {
        let config = ConciergeConfig::default().with_overrides(Some("mistral".into()), None, true);
        assert_eq!(config.model, "mistral");
        assert_eq!(config.output, PathBuf::from("evaluation_dataset.jsonl"));
        assert!(config.offline_embeddings);
    }
}
