//! Core types shared across Planwright.
//!
//! Configuration and the degradation bookkeeping used when the reasoning
//! backend is unavailable.

mod config;
mod degradation;

pub use config::{AiConfig, Config, ContextConfig, GeneralConfig, WorkflowConfig};
pub use degradation::{DegradationReason, FallbackResult};
