pub mod classifier;
pub mod embedder;
pub mod llm;

/// Default base URL for OpenAI-compatible endpoints.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
