//! # omnimind-jobs
//!
//! AI orchestration and background job processing for the OmniMind backend.
//!
//! This crate provides:
//! - The [`AiService`] orchestrating prompted LLM calls over domain data
//! - A durable-queue worker with bounded retries and concurrent execution
//! - Per-job-type handlers wiring the queue to the service
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use omnimind_jobs::{AiService, ExtractTasksHandler, JobWorker, WorkerConfig};
//! use omnimind_db::Database;
//! use omnimind_inference::OpenAiBackend;
//!
//! let db = Database::connect("postgres://...").await?;
//! let backend = Arc::new(OpenAiBackend::from_env()?);
//! let service = Arc::new(AiService::new(db.clone(), backend));
//!
//! let worker = JobWorker::new(db, WorkerConfig::from_env());
//! worker.register_handler(ExtractTasksHandler::new(service.clone())).await;
//! let handle = worker.start();
//!
//! // ... later
//! handle.shutdown().await?;
//! ```

pub mod handler;
pub mod handlers;
pub mod prompts;
pub mod service;
pub mod worker;

// Re-export core types
pub use omnimind_core::*;

pub use handler::{JobContext, JobHandler, JobResult};
pub use handlers::{ExtractTasksHandler, OptimizeScheduleHandler, SummarizeMeetingHandler};
pub use service::AiService;
pub use worker::{JobWorker, WorkerConfig, WorkerEvent, WorkerHandle};
