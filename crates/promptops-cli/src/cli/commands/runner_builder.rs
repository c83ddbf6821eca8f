use crate::cli::args::RunArgs;
use promptops_core::config::{resolve_api_key, SuiteConfig};
use promptops_core::engine::runner::Runner;
use promptops_core::errors::ConfigError;
use promptops_core::providers::classifier::http::HttpClassifier;
use promptops_core::providers::embedder::fake::FakeEmbedder;
use promptops_core::providers::embedder::openai::OpenAIEmbedder;
use promptops_core::providers::embedder::Embedder;
use promptops_core::providers::llm::fake::FakeClient;
use promptops_core::providers::llm::openai::OpenAIClient;
use promptops_core::providers::llm::CompletionProvider;
use promptops_core::similarity::EmbeddingSimilarity;
use std::sync::Arc;
use std::time::Duration;

const FAKE_EMBEDDING_DIMS: usize = 256;

/// Build the runner. All credential and provider errors surface here, before
/// any case is scheduled.
pub(crate) fn build_runner(args: &RunArgs, cfg: &SuiteConfig) -> Result<Runner, ConfigError> {
    let needs_key = args.provider == "openai" || args.embedder == "openai";
    let api_key = if needs_key {
        Some(resolve_api_key(args.api_key.as_deref())?)
    } else {
        None
    };

    let provider = match args.provider.as_str() {
        "openai" => {
            let mut client = OpenAIClient::new(api_key.clone().unwrap_or_default());
            if let Some(url) = &args.base_url {
                client = client.with_base_url(url);
            }
            CompletionProvider::Chat(Arc::new(client))
        }
        "classifier" => {
            let url = args.classifier_url.clone().ok_or_else(|| ConfigError::Provider {
                message: "--provider classifier requires --classifier-url".to_string(),
            })?;
            CompletionProvider::Classifier(Arc::new(HttpClassifier::new(url, args.api_key.clone())))
        }
        "echo" => CompletionProvider::Chat(Arc::new(FakeClient::echo())),
        other => {
            return Err(ConfigError::UnknownProvider {
                kind: "completion",
                name: other.to_string(),
            })
        }
    };

    let embedder: Arc<dyn Embedder> = match args.embedder.as_str() {
        "openai" => {
            let mut embedder =
                OpenAIEmbedder::new(args.embedding_model.clone(), api_key.unwrap_or_default());
            if let Some(url) = &args.base_url {
                embedder = embedder.with_base_url(url);
            }
            Arc::new(embedder)
        }
        "fake" => Arc::new(FakeEmbedder::hashed(&args.embedding_model, FAKE_EMBEDDING_DIMS)),
        other => {
            return Err(ConfigError::UnknownProvider {
                kind: "embedder",
                name: other.to_string(),
            })
        }
    };

    let mut policy = cfg.settings.run_policy();
    if let Some(parallel) = args.parallel {
        policy.parallel = parallel.max(1);
    }
    if let Some(secs) = args.timeout_seconds {
        policy.timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    policy.fail_fast |= args.fail_fast;

    let model = args.model.clone().unwrap_or_else(|| cfg.model.clone());
    let system_message = args
        .system_message
        .clone()
        .unwrap_or_else(|| cfg.system_message.clone());

    Ok(Runner::new(
        provider,
        Arc::new(EmbeddingSimilarity::new(embedder)),
        model,
        system_message,
    )
    .with_policy(policy))
}
