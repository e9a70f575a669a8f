//! Serialization and emission-time configuration.
//!
//! The engine never reads ambient configuration. Callers capture a
//! [`TraceConfig`] snapshot and pass it into the serializer and span
//! emitter, so a mid-harvest settings change cannot tear one trace's
//! output.

use serde::{Deserialize, Serialize};

/// Configuration snapshot consulted while serializing a trace or emitting
/// span events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Emit the segment payload as the raw nested structure instead of a
    /// base64 compressed blob.
    pub simple_compression: bool,
    /// Span events may be generated for this transaction.
    pub span_events_enabled: bool,
    /// Distributed tracing is enabled for this transaction.
    pub distributed_tracing_enabled: bool,
    /// An external infinite-tracing observer is configured; spans are
    /// exported even for unsampled transactions.
    pub infinite_tracing: bool,
    /// Value of the `host.displayName` attribute attached to span events.
    pub host_display_name: Option<String>,
    /// The `request.uri` attribute is allowed in trace output. When false
    /// the envelope's URI field is null.
    pub request_uri_enabled: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            simple_compression: false,
            span_events_enabled: true,
            distributed_tracing_enabled: true,
            infinite_tracing: false,
            host_display_name: None,
            request_uri_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_wire_expectations() {
        let config = TraceConfig::default();
        assert!(!config.simple_compression);
        assert!(config.span_events_enabled);
        assert!(config.distributed_tracing_enabled);
        assert!(!config.infinite_tracing);
        assert!(config.request_uri_enabled);
        assert_eq!(config.host_display_name, None);
    }

    #[test]
    fn serde_roundtrip() {
        let config = TraceConfig {
            simple_compression: true,
            host_display_name: Some("web-01".to_owned()),
            ..TraceConfig::default()
        };
        let json = serde_json::to_string(&config).expect("serialize");
        let back: TraceConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, config);
    }
}
