//! Inference Binding Adapters.
//!
//! Implementations of the InferenceBinding port.
//!
//! ## Available Adapters
//!
//! - `WorkersAiBinding` - Cloudflare Workers AI over REST, optionally via AI Gateway
//! - `MockInferenceBinding` - Configurable mock for testing

mod mock_binding;
mod workers_ai;

pub use mock_binding::{MockInferenceBinding, MockOutput, RecordedRun};
pub use workers_ai::{WorkersAiBinding, WorkersAiConfig};
