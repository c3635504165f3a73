//! Smart-call orchestration: route, call, fall back, stream.

pub mod smart;
pub mod stream;
pub mod tasks;

pub use smart::{Orchestrator, SmartRequest};
pub use stream::{collect_stream, collect_stream_with};
pub use tasks::{is_long_text, AnalysisTask, LONG_TEXT_THRESHOLD};
