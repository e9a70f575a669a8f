//! Opaque codec for the segment payload blob.
//!
//! The collector wire format carries the nested segment structure as
//! `base64(zlib(json))`. The codec is used as a pair of opaque functions;
//! [`decode`] exists so harvest plumbing and tests can verify round trips.

use crate::error::TraceError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use serde_json::Value;
use std::io::{Read, Write};

/// Encodes a JSON payload as a base64 string of its zlib-compressed bytes.
pub fn encode(payload: &Value) -> Result<String, TraceError> {
    let json = serde_json::to_vec(payload)?;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;
    Ok(STANDARD.encode(compressed))
}

/// Decodes a blob produced by [`encode`] back into its JSON payload.
pub fn decode(blob: &str) -> Result<Value, TraceError> {
    let compressed = STANDARD
        .decode(blob)
        .map_err(|e| TraceError::Decode(e.to_string()))?;
    let mut json = Vec::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_end(&mut json)
        .map_err(|e| TraceError::Decode(e.to_string()))?;
    serde_json::from_slice(&json).map_err(|e| TraceError::Decode(e.to_string()))
}
