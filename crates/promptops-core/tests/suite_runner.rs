//! Worker-pool behaviour of `Runner::run_suite`.

use async_trait::async_trait;
use promptops_core::engine::runner::{RunPolicy, Runner};
use promptops_core::model::{LlmResponse, PassCondition, TestCase};
use promptops_core::providers::llm::{CompletionProvider, LlmClient};
use promptops_core::report::progress::ProgressEvent;
use promptops_core::similarity::SimilarityScorer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Echo client with per-prompt behaviour and in-flight tracking.
#[derive(Default)]
struct ScriptedClient {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, prompt: &str, model: &str, _system: &str) -> anyhow::Result<LlmResponse> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let delay = if prompt.starts_with("slow") { 500 } else { 20 };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if prompt.starts_with("fail") {
            anyhow::bail!("provider rejected '{}'", prompt);
        }
        Ok(LlmResponse {
            text: prompt.to_string(),
            provider: "scripted".into(),
            model: model.into(),
            meta: serde_json::json!({}),
        })
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// Scores by length ratio so the perturbed (shorter) text scores lower.
struct LengthScorer;

#[async_trait]
impl SimilarityScorer for LengthScorer {
    async fn similarity(&self, a: &str, b: &str) -> anyhow::Result<f64> {
        Ok(a.len().min(b.len()) as f64 / a.len().max(b.len()).max(1) as f64)
    }

    fn name(&self) -> String {
        "length".into()
    }
}

fn case(name: &str, prompt: &str) -> TestCase {
    TestCase::new(name, prompt, prompt)
        .with_perturb_text(&prompt[..prompt.len() - 1])
        .with_pass_condition(PassCondition::Decrease)
}

fn runner(client: Arc<ScriptedClient>, policy: RunPolicy) -> Runner {
    Runner::new(CompletionProvider::Chat(client), Arc::new(LengthScorer), "m", "s")
        .with_policy(policy)
}

#[tokio::test]
async fn results_keep_input_order_and_respect_parallelism() {
    let client = Arc::new(ScriptedClient::default());
    let r = runner(
        client.clone(),
        RunPolicy {
            parallel: 2,
            timeout: None,
            fail_fast: false,
        },
    );
    let cases: Vec<TestCase> = (0..6).map(|i| case(&format!("c{}", i), &format!("prompt {}", i))).collect();

    let events = Arc::new(Mutex::new(Vec::<ProgressEvent>::new()));
    let sink_events = events.clone();
    let report = r
        .run_suite(
            "order",
            cases,
            Some(7),
            Some(Arc::new(move |ev: ProgressEvent| sink_events.lock().unwrap().push(ev))),
        )
        .await;

    let names: Vec<&str> = report.summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["c0", "c1", "c2", "c3", "c4", "c5"]);
    assert_eq!(report.tally().passed, 6);
    assert_eq!(report.capabilities["untagged"].passed, 6);
    assert_eq!(report.errored(), 0);
    assert_eq!(report.seed, Some(7));
    assert!(client.max_in_flight.load(Ordering::SeqCst) <= 2);

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 6);
    assert_eq!(events.last().map(|e| (e.done, e.total)), Some((6, 6)));
}

#[tokio::test]
async fn case_errors_are_recorded_not_fatal() {
    let r = runner(Arc::new(ScriptedClient::default()), RunPolicy::default());
    let cases = vec![case("ok", "prompt ok"), case("bad", "fail here"), case("ok2", "prompt two")];
    let report = r.run_suite("errors", cases, None, None).await;

    assert_eq!(report.tally().passed, 2);
    assert_eq!(report.errored(), 1);
    assert_eq!(report.errors[0].name, "bad");
    assert!(report.errors[0].message.contains("provider rejected"));
}

#[tokio::test]
async fn timeout_is_a_case_error() {
    let r = runner(
        Arc::new(ScriptedClient::default()),
        RunPolicy {
            parallel: 4,
            timeout: Some(Duration::from_millis(100)),
            fail_fast: false,
        },
    );
    let report = r
        .run_suite("timeouts", vec![case("slow", "slow prompt"), case("fast", "quick prompt")], None, None)
        .await;

    assert_eq!(report.summaries.len(), 1);
    assert_eq!(report.summaries[0].name, "fast");
    assert_eq!(report.errors[0].name, "slow");
    assert!(report.errors[0].message.contains("timed out"));
}

#[tokio::test]
async fn fail_fast_cancels_outstanding_cases() {
    let r = runner(
        Arc::new(ScriptedClient::default()),
        RunPolicy {
            parallel: 1,
            timeout: None,
            fail_fast: true,
        },
    );
    let cases = vec![
        case("first", "fail immediately"),
        case("second", "slow one"),
        case("third", "slow two"),
    ];
    let report = r.run_suite("fail-fast", cases, None, None).await;

    assert_eq!(report.summaries.len(), 0);
    assert_eq!(report.errored(), 3);
    assert!(report.errors[0].message.contains("provider rejected"));
    assert!(report.errors[1].message.contains("cancelled"));
    assert!(report.errors[2].message.contains("cancelled"));
}
