//! Single test case pipeline: complete, perturb, complete again, score.

use super::runner::Runner;
use crate::model::{CaseState, TestCase};
use crate::similarity::score_response;
use tracing::{debug, warn};

impl TestCase {
    /// Run both the original and the perturbed path and score the responses.
    ///
    /// Any previous results are discarded first. Provider and scorer errors
    /// are returned as-is; the case is then left in [`CaseState::Running`].
    pub async fn run(&mut self, runner: &Runner) -> anyhow::Result<()> {
        run_case(runner, self).await
    }
}

pub async fn run_case(runner: &Runner, tc: &mut TestCase) -> anyhow::Result<()> {
    tc.reset_results();
    tc.state = CaseState::Running;
    tc.model_name = Some(runner.model.clone());

    tc.original_response = runner
        .provider
        .complete(Some(&tc.prompt), &runner.model, &runner.system_message)
        .await?;

    if let Some(perturber) = &tc.perturber {
        let perturbed = perturber.perturb(&tc.prompt);
        if perturbed == tc.prompt {
            debug!(case = %tc.name, strategy = perturber.name(), "perturbation was a no-op");
        }
        tc.perturb_text = Some(perturbed);
    }
    if tc.perturb_text.is_none() {
        warn!(case = %tc.name, "no perturbed text; perturbed path skipped");
    }

    tc.perturb_response = runner
        .provider
        .complete(
            tc.perturb_text.as_deref(),
            &runner.model,
            &runner.system_message,
        )
        .await?;

    let scorer = runner.scorer.as_ref();
    tc.score_original =
        score_response(scorer, tc.original_response.as_deref(), &tc.expected_result).await?;
    tc.score_perturb =
        score_response(scorer, tc.perturb_response.as_deref(), &tc.expected_result).await?;

    tc.state = CaseState::Scored;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PassCondition;
    use crate::perturb::AdjacentSwap;
    use crate::providers::embedder::fake::FakeEmbedder;
    use crate::providers::llm::fake::FakeClient;
    use crate::providers::llm::CompletionProvider;
    use crate::similarity::EmbeddingSimilarity;
    use std::sync::Arc;

    fn runner(client: FakeClient) -> Runner {
        Runner::new(
            CompletionProvider::Chat(Arc::new(client)),
            Arc::new(EmbeddingSimilarity::new(Arc::new(FakeEmbedder::hashed(
                "fake", 64,
            )))),
            "test-model",
            "system",
        )
    }

    #[tokio::test]
    async fn perturber_overrides_supplied_text() {
        let r = runner(FakeClient::echo());
        let mut tc = TestCase::new("t", "abcdef", "abcdef")
            .with_perturb_text("ignored")
            .with_perturber(Arc::new(AdjacentSwap::seeded(9)));
        tc.run(&r).await.unwrap();

        let perturbed = tc.perturb_text.clone().unwrap();
        assert_ne!(perturbed, "ignored");
        assert_eq!(perturbed.len(), 6);
        assert_eq!(tc.perturb_response.as_deref(), Some(perturbed.as_str()));
        assert_eq!(tc.state, CaseState::Scored);
        assert_eq!(tc.model_name.as_deref(), Some("test-model"));
    }

    #[tokio::test]
    async fn supplied_text_used_without_perturber() {
        let r = runner(FakeClient::echo());
        let mut tc = TestCase::new("t", "original words", "original words")
            .with_perturb_text("different words");
        tc.run(&r).await.unwrap();
        assert_eq!(tc.perturb_response.as_deref(), Some("different words"));
        assert!(tc.score_original.is_some());
        assert!(tc.score_perturb.is_some());
    }

    #[tokio::test]
    async fn no_perturbed_text_leaves_perturbed_path_empty() {
        let client = FakeClient::echo();
        let r = runner(client.clone());
        let mut tc = TestCase::new("t", "hello", "hello")
            .with_pass_condition(PassCondition::Decrease);
        tc.run(&r).await.unwrap();

        assert_eq!(client.calls(), 1);
        assert!(tc.perturb_response.is_none());
        assert!(tc.score_perturb.is_none());
        assert!(tc.score_original.is_some());
        assert!(!tc.summarize().fail);
    }

    #[tokio::test]
    async fn provider_error_surfaces_and_leaves_running() {
        let r = runner(FakeClient::failing("upstream 503"));
        let mut tc = TestCase::new("t", "hello", "hello").with_perturb_text("hlelo");
        let err = tc.run(&r).await.unwrap_err();
        assert!(err.to_string().contains("upstream 503"));
        assert_eq!(tc.state, CaseState::Running);
        assert!(tc.score_original.is_none());
    }

    #[tokio::test]
    async fn rerun_overwrites_results() {
        let r = runner(FakeClient::with_response("fixed"));
        let mut tc = TestCase::new("t", "hello", "fixed").with_perturb_text("hlelo");
        tc.run(&r).await.unwrap();
        let first = tc.summarize();
        tc.run(&r).await.unwrap();
        assert_eq!(first, tc.summarize());
    }
}
