use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "promptops",
    version,
    about = "Prompt robustness testing: perturb a prompt, query the model twice, compare similarity to the expected answer"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a suite and report per-case judgments
    Run(RunArgs),
    /// Parse and validate a suite file without calling any provider
    Validate(ValidateArgs),
    /// Write a starter suite file
    Init(InitArgs),
    Version,
}

#[derive(Parser, Clone, Debug)]
pub struct RunArgs {
    #[arg(long, default_value = "promptops.yaml")]
    pub config: PathBuf,

    /// completion provider (openai|classifier|echo)
    #[arg(long, default_value = "openai")]
    pub provider: String,

    /// classifier endpoint, required with --provider classifier
    #[arg(long)]
    pub classifier_url: Option<String>,

    /// embedder provider (openai|fake)
    #[arg(long, default_value = "openai")]
    pub embedder: String,

    /// embedding model name
    #[arg(long, default_value = "text-embedding-3-small")]
    pub embedding_model: String,

    /// override the suite's model
    #[arg(long)]
    pub model: Option<String>,

    /// override the suite's system message
    #[arg(long)]
    pub system_message: Option<String>,

    /// API key for hosted providers (falls back to OPENAI_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// base URL for OpenAI-compatible endpoints
    #[arg(long, env = "PROMPTOPS_BASE_URL")]
    pub base_url: Option<String>,

    /// maximum cases in flight (overrides settings.parallel)
    #[arg(long)]
    pub parallel: Option<usize>,

    /// per-case timeout in seconds, 0 disables (overrides settings.timeout_seconds)
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// perturbation seed (overrides settings.seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// stop scheduling cases after the first case error
    #[arg(long)]
    pub fail_fast: bool,

    /// write the JSON report here
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// write a JUnit XML report here
    #[arg(long)]
    pub junit: Option<PathBuf>,

    /// suppress progress lines
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Parser, Clone, Debug)]
pub struct ValidateArgs {
    #[arg(long, default_value = "promptops.yaml")]
    pub config: PathBuf,
}

#[derive(Parser, Clone, Debug)]
pub struct InitArgs {
    #[arg(long, default_value = "promptops.yaml")]
    pub path: PathBuf,

    /// overwrite an existing file
    #[arg(long)]
    pub force: bool,
}
