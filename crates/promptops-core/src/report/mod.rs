pub mod console;
pub mod json;
pub mod junit;
pub mod progress;

use crate::model::TestSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serialize `Option<u64>` seeds as strings so JSON consumers do not lose precision above 2^53.
mod serde_seed {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(v: &Option<u64>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match v {
            Some(n) => s.serialize_str(&n.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<serde_json::Value> = Option::deserialize(d)?;
        match opt {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::String(s)) => {
                s.parse::<u64>().map(Some).map_err(serde::de::Error::custom)
            }
            Some(serde_json::Value::Number(num)) => num
                .as_u64()
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom("seed number must be u64")),
            Some(_) => Err(serde::de::Error::custom("seed must be string or number")),
        }
    }
}

/// A case that did not produce a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseError {
    pub name: String,
    pub message: String,
}

/// Capability key used for summaries without a capability tag.
pub const UNTAGGED: &str = "untagged";

/// Judgment counts over a set of summaries. Unjudged cases are `skipped`,
/// never `passed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Tally {
    fn add(&mut self, s: &TestSummary) {
        if s.fail {
            self.failed += 1;
        } else if s.is_judged() {
            self.passed += 1;
        } else {
            self.skipped += 1;
        }
    }
}

/// Aggregated result of one suite run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub run_id: String,
    pub suite: String,
    pub model_name: String,
    #[serde(with = "serde_seed", default)]
    pub seed: Option<u64>,
    pub generated_at: DateTime<Utc>,
    pub summaries: Vec<TestSummary>,
    pub errors: Vec<CaseError>,
    /// Per-capability breakdown, filled by [`SuiteReport::finish`].
    #[serde(default)]
    pub capabilities: BTreeMap<String, Tally>,
}

impl SuiteReport {
    pub fn new(suite: &str, model_name: &str, seed: Option<u64>) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            suite: suite.to_string(),
            model_name: model_name.to_string(),
            seed,
            generated_at: Utc::now(),
            summaries: Vec::new(),
            errors: Vec::new(),
            capabilities: BTreeMap::new(),
        }
    }

    /// Recompute derived fields once all summaries are in.
    #[must_use]
    pub fn finish(mut self) -> Self {
        self.capabilities = self.by_capability();
        self
    }

    pub fn tally(&self) -> Tally {
        let mut t = Tally::default();
        for s in &self.summaries {
            t.add(s);
        }
        t
    }

    pub fn failed(&self) -> usize {
        self.tally().failed
    }

    pub fn errored(&self) -> usize {
        self.errors.len()
    }

    pub fn total(&self) -> usize {
        self.summaries.len() + self.errors.len()
    }

    /// Summaries grouped by capability tag; untagged cases go under [`UNTAGGED`].
    pub fn by_capability(&self) -> BTreeMap<String, Tally> {
        let mut out: BTreeMap<String, Tally> = BTreeMap::new();
        for s in &self.summaries {
            let key = s.capability.as_deref().unwrap_or(UNTAGGED);
            out.entry(key.to_string()).or_default().add(s);
        }
        out
    }
}
