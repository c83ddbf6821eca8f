//! Prompt robustness testing.
//!
//! A [`model::TestCase`] pairs a prompt with an expected answer. Running it
//! queries a completion provider with the original prompt and with a lightly
//! perturbed variant, scores both responses against the expected answer with
//! a [`similarity::SimilarityScorer`], and judges whether the change in
//! similarity matches the case's [`model::PassCondition`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use promptops_core::engine::runner::Runner;
//! use promptops_core::model::{PassCondition, TestCase};
//! use promptops_core::perturb::AdjacentSwap;
//! use promptops_core::providers::embedder::fake::FakeEmbedder;
//! use promptops_core::providers::llm::{fake::FakeClient, CompletionProvider};
//! use promptops_core::similarity::EmbeddingSimilarity;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let runner = Runner::new(
//!     CompletionProvider::Chat(Arc::new(FakeClient::echo())),
//!     Arc::new(EmbeddingSimilarity::new(Arc::new(FakeEmbedder::hashed("fake", 64)))),
//!     "gpt-3.5-turbo",
//!     "You are a helpful assistant.",
//! );
//! let mut tc = TestCase::new("cat", "The cat sat on the mat", "An animal rested on a surface")
//!     .with_pass_condition(PassCondition::Decrease)
//!     .with_perturber(Arc::new(AdjacentSwap::seeded(7)));
//! tc.run(&runner).await?;
//! println!("{}", serde_json::to_string_pretty(&tc.summarize())?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod errors;
pub mod model;
pub mod perturb;
pub mod providers;
pub mod report;
pub mod similarity;

pub use engine::runner::{RunPolicy, Runner};
pub use errors::{ConfigError, ProviderError};
pub use model::{CaseState, PassCondition, TestCase, TestSummary};
pub use perturb::{AdjacentSwap, CaseFlip, Perturber};
pub use similarity::{EmbeddingSimilarity, SimilarityScorer};
