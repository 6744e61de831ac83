//! Observability setup for relaybot: tracing subscriber initialization and
//! GenAI semantic-convention values for completion spans.

pub mod genai_attrs;
pub mod tracing_setup;
