//! OpenTelemetry GenAI Semantic Convention values.
//!
//! Field names follow the convention directly in span macros
//! (`gen_ai.operation.name`, `gen_ai.request.model`, ...); the constants here
//! are the values recorded in them.
//!
//! Span naming convention: `"{operation} {model}"` (e.g., `"chat gpt-4o-mini"`)

/// Standard chat completion operation.
pub const OP_CHAT: &str = "chat";

/// OpenAI (or OpenAI-compatible) provider identifier.
pub const PROVIDER_OPENAI: &str = "openai";
