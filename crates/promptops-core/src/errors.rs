//! Error types shared by the config loader, providers and CLI.

/// Configuration errors. All of these are raised before any test case runs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A hosted provider was selected without a credential.
    #[error("OpenAI API key is not set: pass --api-key or set {env_var}")]
    MissingApiKey { env_var: String },

    /// The suite file could not be read.
    #[error("failed to read config {path}: {message}")]
    Read { path: String, message: String },

    /// The suite file is not valid YAML for the expected schema.
    #[error("failed to parse config: {message}")]
    Parse { message: String },

    #[error("unsupported config version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("config has no tests")]
    NoTests,

    #[error("unknown pass condition '{0}' (expected 'increase' or 'decrease')")]
    UnknownPassCondition(String),

    #[error("unknown perturbation '{0}' (expected adjacent_swap, case_flip or none)")]
    UnknownPerturbation(String),

    #[error("unknown {kind} provider: {name}")]
    UnknownProvider { kind: &'static str, name: String },

    /// Provider wiring is incomplete (e.g. classifier without URL).
    #[error("invalid provider configuration: {message}")]
    Provider { message: String },

    #[error("failed to write {path}: {message}")]
    Write { path: String, message: String },
}

/// Errors raised by completion, classifier and embedding providers.
///
/// Providers return these wrapped in `anyhow::Error`; callers can recover the
/// variant with `downcast_ref::<ProviderError>()`.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Non-success HTTP status.
    #[error("{provider} API error (status {status}): {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    /// Connection, TLS or timeout failure before a response arrived.
    #[error("{provider} network error: {message}")]
    Network { provider: String, message: String },

    /// The provider answered but the payload did not have the expected shape.
    #[error("{provider} returned a malformed response: {message}")]
    Malformed { provider: String, message: String },

    #[error("embedding dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("cannot compare empty embeddings")]
    EmptyEmbedding,
}

impl ProviderError {
    pub fn network(provider: &str, err: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.to_string(),
            message: err.to_string(),
        }
    }

    pub fn malformed(provider: &str, message: impl Into<String>) -> Self {
        Self::Malformed {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}
