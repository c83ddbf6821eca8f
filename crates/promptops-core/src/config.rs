//! Suite configuration (YAML) and credential resolution.

use crate::engine::runner::RunPolicy;
use crate::errors::ConfigError;
use crate::model::{PassCondition, TestCase};
use crate::perturb::{AdjacentSwap, CaseFlip, Perturber};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

pub const SAMPLE_CONFIG: &str = r#"version: 1
suite: robustness
model: gpt-3.5-turbo
system_message: You are a helpful assistant. Answer in one sentence.
settings:
  parallel: 4
  timeout_seconds: 60
  seed: 42
tests:
  - name: cat-on-mat
    description: Paraphrase should survive a single typo
    capability: typo-robustness
    prompt: Rephrase this sentence without using the word cat. The cat sat on the mat.
    expected_result: An animal rested on a surface.
    pass_condition: increase
    perturb: adjacent_swap
  - name: negation-flip
    description: Removing a negation should change the answer
    capability: negation
    prompt: Is it true that water does not boil at 100 degrees Celsius at sea level?
    perturb_text: Is it true that water does boil at 100 degrees Celsius at sea level?
    expected_result: No, water boils at 100 degrees Celsius at sea level.
    pass_condition: decrease
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerturbKind {
    AdjacentSwap,
    CaseFlip,
    None,
}

impl FromStr for PerturbKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adjacent_swap" | "swap" => Ok(PerturbKind::AdjacentSwap),
            "case_flip" => Ok(PerturbKind::CaseFlip),
            "none" | "" => Ok(PerturbKind::None),
            other => Err(ConfigError::UnknownPerturbation(other.to_string())),
        }
    }
}

impl PerturbKind {
    pub fn build(self, seed: u64) -> Option<Arc<dyn Perturber>> {
        match self {
            PerturbKind::AdjacentSwap => Some(Arc::new(AdjacentSwap::seeded(seed))),
            PerturbKind::CaseFlip => Some(Arc::new(CaseFlip::seeded(seed))),
            PerturbKind::None => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub parallel: Option<usize>,
    pub timeout_seconds: Option<u64>,
    pub seed: Option<u64>,
    pub fail_fast: Option<bool>,
}

impl Settings {
    pub fn run_policy(&self) -> RunPolicy {
        let default = RunPolicy::default();
        RunPolicy {
            parallel: self.parallel.unwrap_or(default.parallel).max(1),
            timeout: match self.timeout_seconds {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => default.timeout,
            },
            fail_fast: self.fail_fast.unwrap_or(default.fail_fast),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestCaseConfig {
    pub name: String,
    pub prompt: String,
    pub expected_result: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capability: Option<String>,
    #[serde(default)]
    pub pass_condition: PassCondition,
    /// Perturbation strategy name; overrides `perturb_text` when set.
    #[serde(default)]
    pub perturb: Option<String>,
    #[serde(default)]
    pub perturb_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    pub version: u32,
    pub suite: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub system_message: String,
    #[serde(default)]
    pub settings: Settings,
    pub tests: Vec<TestCaseConfig>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// Per-case seed: stable for a given suite seed and case name, independent of
/// the order in which cases are scheduled.
pub fn case_seed(suite_seed: u64, name: &str) -> u64 {
    let mut h = Sha256::new();
    h.update(suite_seed.to_le_bytes());
    h.update(name.as_bytes());
    let digest = h.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(head)
}

impl SuiteConfig {
    /// Seed precedence: explicit override, then `settings.seed`, then a fresh random seed.
    pub fn effective_seed(&self, override_seed: Option<u64>) -> u64 {
        if let Some(seed) = override_seed.or(self.settings.seed) {
            return seed;
        }
        let seed = rand::random();
        info!(seed, "no seed provided; using generated seed");
        seed
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != SUPPORTED_CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                supported: SUPPORTED_CONFIG_VERSION,
            });
        }
        if self.tests.is_empty() {
            return Err(ConfigError::NoTests);
        }

        let mut seen = HashSet::new();
        for t in &self.tests {
            if !seen.insert(t.name.as_str()) {
                warn!(case = %t.name, "duplicate test name");
            }
            let kind = match &t.perturb {
                Some(p) => p.parse::<PerturbKind>()?,
                None => PerturbKind::None,
            };
            if kind == PerturbKind::None && t.perturb_text.is_none() {
                warn!(case = %t.name, "no perturb strategy or perturb_text; case cannot be judged");
            }
        }
        Ok(())
    }

    pub fn build_cases(&self, seed: u64) -> Result<Vec<TestCase>, ConfigError> {
        self.tests
            .iter()
            .map(|t| {
                let kind = match &t.perturb {
                    Some(p) => p.parse::<PerturbKind>()?,
                    None => PerturbKind::None,
                };
                Ok(TestCase {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    capability: t.capability.clone(),
                    prompt: t.prompt.clone(),
                    expected_result: t.expected_result.clone(),
                    perturb_text: t.perturb_text.clone(),
                    perturber: kind.build(case_seed(seed, &t.name)),
                    pass_condition: t.pass_condition,
                    ..TestCase::default()
                })
            })
            .collect()
    }
}

pub fn parse_config(raw: &str) -> Result<SuiteConfig, ConfigError> {
    let cfg: SuiteConfig = serde_yaml::from_str(raw).map_err(|e| ConfigError::Parse {
        message: e.to_string(),
    })?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_config(path: &Path) -> Result<SuiteConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_config(&raw)
}

pub fn write_sample_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, SAMPLE_CONFIG).map_err(|e| ConfigError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Explicit key first, then `OPENAI_API_KEY`. Blank values count as missing
/// at both steps, so `--api-key ""` still falls back to the environment.
pub fn resolve_api_key(explicit: Option<&str>) -> Result<String, ConfigError> {
    fn non_blank(key: &str) -> Option<String> {
        let key = key.trim();
        (!key.is_empty()).then(|| key.to_string())
    }

    explicit
        .and_then(non_blank)
        .or_else(|| std::env::var(API_KEY_ENV).ok().as_deref().and_then(non_blank))
        .ok_or_else(|| ConfigError::MissingApiKey {
            env_var: API_KEY_ENV.to_string(),
        })
}
