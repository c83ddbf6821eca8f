use crate::errors::ConfigError;
use crate::perturb::Perturber;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Expected relationship between the original and perturbed similarity scores.
///
/// The names describe the invariant being asserted, not an action:
/// `Increase` fails when the perturbed score drops below the original,
/// `Decrease` fails unless the perturbed score is strictly lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassCondition {
    #[default]
    Increase,
    Decrease,
}

impl PassCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            PassCondition::Increase => "increase",
            PassCondition::Decrease => "decrease",
        }
    }

    /// Judge a pair of scores. Returns `true` when the case fails.
    pub fn is_failure(self, score_original: f64, score_perturb: f64) -> bool {
        match self {
            PassCondition::Decrease => score_perturb >= score_original,
            PassCondition::Increase => score_perturb < score_original,
        }
    }
}

impl fmt::Display for PassCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PassCondition {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "increase" => Ok(PassCondition::Increase),
            "decrease" => Ok(PassCondition::Decrease),
            other => Err(ConfigError::UnknownPassCondition(other.to_string())),
        }
    }
}

/// Lifecycle of a [`TestCase`]. Summaries are pure reads and do not move the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseState {
    #[default]
    Created,
    Running,
    Scored,
}

/// Response from a chat-completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub meta: serde_json::Value,
}

/// One entry of a classifier result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassLabel {
    pub label: String,
    #[serde(default)]
    pub score: f64,
}

/// A single (prompt, expected result) robustness probe.
///
/// Inputs are set at construction; `original_response`, `perturb_response`,
/// both scores and `model_name` are written by [`TestCase::run`].
#[derive(Clone, Default)]
pub struct TestCase {
    pub name: String,
    pub description: Option<String>,
    pub capability: Option<String>,
    pub prompt: String,
    pub expected_result: String,
    /// Pre-supplied perturbed prompt. Replaced on `run` when a perturber is set.
    pub perturb_text: Option<String>,
    pub perturber: Option<Arc<dyn Perturber>>,
    pub pass_condition: PassCondition,

    pub original_response: Option<String>,
    pub perturb_response: Option<String>,
    pub score_original: Option<f64>,
    pub score_perturb: Option<f64>,
    pub model_name: Option<String>,
    pub state: CaseState,
}

impl TestCase {
    pub fn new(
        name: impl Into<String>,
        prompt: impl Into<String>,
        expected_result: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            expected_result: expected_result.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capability = Some(capability.into());
        self
    }

    pub fn with_perturb_text(mut self, text: impl Into<String>) -> Self {
        self.perturb_text = Some(text.into());
        self
    }

    pub fn with_perturber(mut self, perturber: Arc<dyn Perturber>) -> Self {
        self.perturber = Some(perturber);
        self
    }

    pub fn with_pass_condition(mut self, pass_condition: PassCondition) -> Self {
        self.pass_condition = pass_condition;
        self
    }

    /// Pass/fail judgment. Missing either score is never a failure.
    pub fn is_failure(&self) -> bool {
        match (self.score_original, self.score_perturb) {
            (Some(original), Some(perturbed)) => self.pass_condition.is_failure(original, perturbed),
            _ => false,
        }
    }

    pub fn summarize(&self) -> TestSummary {
        TestSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            prompt: self.prompt.clone(),
            expected_result: self.expected_result.clone(),
            perturb_text: self.perturb_text.clone(),
            pass_condition: self.pass_condition,
            capability: self.capability.clone(),
            response_original: self.original_response.clone(),
            response_perturb: self.perturb_response.clone(),
            score_original: self.score_original,
            score_perturb: self.score_perturb,
            fail: self.is_failure(),
            model_name: self.model_name.clone(),
        }
    }

    pub(crate) fn reset_results(&mut self) {
        self.original_response = None;
        self.perturb_response = None;
        self.score_original = None;
        self.score_perturb = None;
        self.model_name = None;
        self.state = CaseState::Created;
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("prompt", &self.prompt)
            .field("expected_result", &self.expected_result)
            .field("perturb_text", &self.perturb_text)
            .field("perturber", &self.perturber.as_ref().map(|p| p.name()))
            .field("pass_condition", &self.pass_condition)
            .field("state", &self.state)
            .field("score_original", &self.score_original)
            .field("score_perturb", &self.score_perturb)
            .finish()
    }
}

/// Externally consumed record for one test case. Key names and order are part
/// of the report contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    pub name: String,
    pub description: Option<String>,
    pub prompt: String,
    pub expected_result: String,
    pub perturb_text: Option<String>,
    pub pass_condition: PassCondition,
    pub capability: Option<String>,
    pub response_original: Option<String>,
    pub response_perturb: Option<String>,
    pub score_original: Option<f64>,
    pub score_perturb: Option<f64>,
    pub fail: bool,
    pub model_name: Option<String>,
}

impl TestSummary {
    /// Both scores present, so `fail` reflects an actual judgment.
    pub fn is_judged(&self) -> bool {
        self.score_original.is_some() && self.score_perturb.is_some()
    }
}
