use crate::model::TestCase;
use crate::providers::llm::CompletionProvider;
use crate::report::progress::{ProgressEvent, ProgressSink};
use crate::report::{CaseError, SuiteReport};
use crate::similarity::SimilarityScorer;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{timeout, Duration};
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct RunPolicy {
    /// Maximum number of cases in flight.
    pub parallel: usize,
    /// Per-case budget covering both completions and scoring.
    pub timeout: Option<Duration>,
    /// Abort outstanding cases after the first case error.
    pub fail_fast: bool,
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self {
            parallel: 4,
            timeout: Some(Duration::from_secs(60)),
            fail_fast: false,
        }
    }
}

/// Holds the collaborators a test case runs against.
#[derive(Clone)]
pub struct Runner {
    pub provider: CompletionProvider,
    pub scorer: Arc<dyn SimilarityScorer>,
    pub model: String,
    pub system_message: String,
    pub policy: RunPolicy,
}

impl Runner {
    pub fn new(
        provider: CompletionProvider,
        scorer: Arc<dyn SimilarityScorer>,
        model: impl Into<String>,
        system_message: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            scorer,
            model: model.into(),
            system_message: system_message.into(),
            policy: RunPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RunPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run every case on a bounded worker pool.
    ///
    /// Case errors (provider failures, timeouts) are recorded in the report
    /// rather than returned. Summaries and errors keep the input order.
    pub async fn run_suite(
        &self,
        suite: &str,
        cases: Vec<TestCase>,
        seed: Option<u64>,
        progress: Option<ProgressSink>,
    ) -> SuiteReport {
        let total = cases.len();
        let names: Vec<String> = cases.iter().map(|tc| tc.name.clone()).collect();
        let sem = Arc::new(Semaphore::new(self.policy.parallel.max(1)));
        let mut join_set = JoinSet::new();

        for (index, mut tc) in cases.into_iter().enumerate() {
            let sem = sem.clone();
            let this = self.clone();
            join_set.spawn(async move {
                let outcome = match sem.acquire_owned().await {
                    Ok(_permit) => this
                        .run_one(&mut tc)
                        .await
                        .map(|()| tc)
                        .map_err(|e| format!("{:#}", e)),
                    Err(e) => Err(e.to_string()),
                };
                (index, outcome)
            });
        }

        let mut done: Vec<Option<Result<TestCase, String>>> = vec![None; total];
        let mut finished = 0usize;
        let mut aborted = false;
        while let Some(res) = join_set.join_next().await {
            match res {
                Ok((index, Ok(tc))) => {
                    info!(
                        case = %tc.name,
                        score_original = ?tc.score_original,
                        score_perturb = ?tc.score_perturb,
                        fail = tc.is_failure(),
                        "case scored"
                    );
                    done[index] = Some(Ok(tc));
                }
                Ok((index, Err(message))) => {
                    error!(case = %names[index], error = %message, "case errored");
                    done[index] = Some(Err(message));
                    if self.policy.fail_fast && !aborted {
                        join_set.abort_all();
                        aborted = true;
                    }
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => error!(error = %e, "case task panicked"),
            }
            finished += 1;
            if let Some(ref sink) = progress {
                sink(ProgressEvent {
                    done: finished,
                    total,
                });
            }
        }

        let mut report = SuiteReport::new(suite, &self.model, seed);
        for (index, outcome) in done.into_iter().enumerate() {
            match outcome {
                Some(Ok(tc)) => report.summaries.push(tc.summarize()),
                Some(Err(message)) => report.errors.push(CaseError {
                    name: names[index].clone(),
                    message,
                }),
                None => report.errors.push(CaseError {
                    name: names[index].clone(),
                    message: if aborted {
                        "cancelled: an earlier case failed and fail_fast is set".to_string()
                    } else {
                        "task did not complete".to_string()
                    },
                }),
            }
        }
        report.finish()
    }

    async fn run_one(&self, tc: &mut TestCase) -> anyhow::Result<()> {
        match self.policy.timeout {
            Some(budget) => timeout(budget, tc.run(self))
                .await
                .map_err(|_| anyhow::anyhow!("timed out after {}s", budget.as_secs_f64()))?,
            None => tc.run(self).await,
        }
    }
}
