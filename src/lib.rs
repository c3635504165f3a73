//! gtm-relay: model routing and streaming relay for a GTM assistant.
//!
//! Four vendors (Qwen, DeepSeek, GLM, Moonshot) behind one
//! OpenAI-compatible call shape. A [`models::ModelSelector`] picks a
//! model per task, the [`provider::UpstreamGateway`] calls it, and the
//! [`generation::Orchestrator`] adds a single fallback hop for
//! non-streaming calls. With the `server` feature, [`server`] exposes the
//! browser-facing relay that keeps API keys server-side.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use gtm_relay::prelude::*;
//!
//! # async fn example() {
//! let config = Arc::new(RelayConfig::from_env());
//! let orchestrator = Orchestrator::new(Arc::new(UpstreamGateway::new(config)));
//!
//! let request = SmartRequest::builder()
//!     .scenario(Scenario::Analysis)
//!     .system_prompt("You are a GTM strategist.")
//!     .messages(vec![ChatMessage::user("Position a B2B analytics tool.")])
//!     .build();
//!
//! let result = orchestrator.smart_chat(&request).await;
//! println!("{:?}", result.content);
//! # }
//! ```

pub mod config;
pub mod error;
pub mod generation;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod types;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;
