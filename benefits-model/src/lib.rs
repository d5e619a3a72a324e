//! # benefits-model
//!
//! [`LanguageModel`](benefits_core::LanguageModel) implementations:
//!
//! - [`OpenAIChatModel`] - any OpenAI-compatible chat-completions API, via `async-openai`
//! - [`MockLlm`] - scripted replies for tests
//!
//! ```rust,ignore
//! use benefits_model::{OpenAIChatConfig, OpenAIChatModel};
//!
//! let model = OpenAIChatModel::new(OpenAIChatConfig::new(
//!     std::env::var("OPENAI_API_KEY")?,
//!     "gpt-3.5-turbo",
//! ))?;
//! ```

pub mod mock;
pub mod openai;

pub use mock::MockLlm;
pub use openai::{OPENAI_API_BASE, OpenAIChatConfig, OpenAIChatModel};
