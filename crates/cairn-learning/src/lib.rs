//! # cairn-learning
//!
//! Continuous learning off the request path: a bounded event queue, an
//! append-only sequence-numbered interaction log, batch analytics and
//! advisory category suggestions, driven by a background worker.

pub mod analytics;
pub mod engine;
pub mod log;
pub mod queue;
pub mod suggestions;
pub mod triggers;
pub mod worker;

pub use engine::LearningEngine;
pub use log::{InteractionLog, LogEntry};
pub use queue::LearningQueue;
pub use triggers::TriggerReason;
