//! Provider catalog and model selection.

pub mod capabilities;
pub mod catalog;
pub mod provider_key;
pub mod selector;

pub use capabilities::ModelCapability;
pub use catalog::{LookupError, Provider, ProviderRegistry};
pub use provider_key::ProviderKey;
pub use selector::{ModelSelector, RoutingDecision, Scenario};
