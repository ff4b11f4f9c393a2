//! # omnimind-inference
//!
//! LLM inference backend abstraction for the OmniMind backend.
//!
//! This crate provides:
//! - The chat-completion wire types
//! - An OpenAI-compatible implementation with JSON-mode generation
//! - A deterministic mock backend for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use omnimind_inference::OpenAiBackend;
//! use omnimind_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OpenAiBackend::from_env().unwrap();
//!     let value = backend
//!         .generate_json("Return valid JSON only.", "{\"ping\": true}", 0.1)
//!         .await
//!         .unwrap();
//!     println!("{value}");
//! }
//! ```

pub mod mock;
pub mod openai;
pub mod types;

// Re-export core types
pub use omnimind_core::*;

pub use mock::MockBackend;
pub use openai::{OpenAiBackend, OpenAiConfig, DEFAULT_MODEL, DEFAULT_OPENAI_URL};
