//! Error types for trace serialization.
//!
//! The engine has exactly one fallible surface: turning a finished segment
//! tree into its wire envelope. Everything else (timer operations, segment
//! insertion past the cap, absent attributes) is total by design.

use thiserror::Error;

/// An error produced while serializing or decoding a trace payload.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The nested segment structure could not be rendered as JSON.
    #[error("trace payload could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The deflate pass over the serialized payload failed.
    #[error("trace payload compression failed: {0}")]
    Compress(#[from] std::io::Error),

    /// A previously encoded payload blob could not be decoded.
    #[error("trace payload decode failed: {0}")]
    Decode(String),
}

/// Result alias for trace serialization operations.
pub type TraceResult<T> = Result<T, TraceError>;
