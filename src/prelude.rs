//! Convenience re-exports for common use.

pub use crate::config::RelayConfig;
pub use crate::error::{RelayError, Result};
pub use crate::generation::{collect_stream, AnalysisTask, Orchestrator, SmartRequest};
pub use crate::models::{ModelSelector, ProviderKey, ProviderRegistry, RoutingDecision, Scenario};
pub use crate::provider::{ChatBackend, ProviderRequest, UpstreamGateway};
pub use crate::types::{
    ChatCompletion, ChatMessage, ChatResult, Role, StreamTextResult, TextStream, TextStreamDelta,
};
