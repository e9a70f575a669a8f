//! Transaction linkage for a trace.
//!
//! A [`Transaction`] is the narrow view of the surrounding transaction that
//! the trace engine needs: naming, sampling/priority decisions, response
//! time, the request URL, and the inbound distributed-trace edge if one was
//! accepted. The instrumentation layer that populates it is out of scope.

use crate::id;

/// Inbound distributed-trace context accepted by a transaction.
///
/// Captures the caller-side identity fields and the two timestamps needed
/// to derive transport duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLink {
    /// Caller kind, e.g. `App`, `Browser`, `Mobile`.
    pub parent_type: String,
    /// Caller account id.
    pub account_id: String,
    /// Caller application id.
    pub app_id: String,
    /// Transport the payload arrived over, e.g. `HTTP`.
    pub transport_type: String,
    /// Timestamp the caller stamped into the payload, epoch ms.
    pub payload_timestamp_ms: u64,
    /// Local timestamp when the payload was accepted, epoch ms.
    pub received_at_ms: u64,
}

impl ParentLink {
    /// Transport duration in seconds, floored at 0.
    ///
    /// A payload timestamped in the future yields 0.
    #[must_use]
    pub fn transport_duration_secs(&self) -> f64 {
        self.received_at_ms.saturating_sub(self.payload_timestamp_ms) as f64 / 1000.0
    }
}

/// The owning transaction's data, as seen by its trace.
#[derive(Debug, Clone)]
pub struct Transaction {
    name: String,
    guid: String,
    trace_id: String,
    priority: f32,
    sampled: bool,
    response_time_ms: u64,
    url: Option<String>,
    parent: Option<ParentLink>,
}

impl Transaction {
    /// Creates a transaction with fresh identifiers and defaults.
    ///
    /// Defaults: unsampled, priority 0, no URL, no inbound parent.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guid: id::span_id(),
            trace_id: id::trace_id(),
            priority: 0.0,
            sampled: false,
            response_time_ms: 0,
            url: None,
            parent: None,
        }
    }

    /// Overrides the transaction guid.
    #[must_use]
    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.guid = guid.into();
        self
    }

    /// Overrides the trace id.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    /// Sets the sampling priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: f32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the sampling decision.
    #[must_use]
    pub const fn with_sampled(mut self, sampled: bool) -> Self {
        self.sampled = sampled;
        self
    }

    /// Sets the transaction response time in milliseconds.
    #[must_use]
    pub const fn with_response_time_ms(mut self, response_time_ms: u64) -> Self {
        self.response_time_ms = response_time_ms;
        self
    }

    /// Sets the raw request URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Records an accepted inbound distributed-trace payload.
    #[must_use]
    pub fn with_parent(mut self, parent: ParentLink) -> Self {
        self.parent = Some(parent);
        self
    }

    /// The transaction name used as the trace scope.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The transaction id.
    #[must_use]
    pub fn guid(&self) -> &str {
        &self.guid
    }

    /// The distributed trace id.
    #[must_use]
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// The sampling priority.
    #[must_use]
    pub const fn priority(&self) -> f32 {
        self.priority
    }

    /// The sampling decision.
    #[must_use]
    pub const fn sampled(&self) -> bool {
        self.sampled
    }

    /// The response time in milliseconds.
    #[must_use]
    pub const fn response_time_ms(&self) -> u64 {
        self.response_time_ms
    }

    /// The raw request URL, if one is known.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The accepted inbound payload, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<&ParentLink> {
        self.parent.as_ref()
    }

    /// The request path with query string and fragment stripped.
    ///
    /// Returns `None` when the transaction has no known URL.
    #[must_use]
    pub fn scrubbed_path(&self) -> Option<String> {
        self.url.as_deref().map(scrub_path)
    }
}

/// Reduces a URL to its path: drops query/fragment and, for absolute URLs,
/// the scheme and authority. Never returns an empty string.
fn scrub_path(url: &str) -> String {
    let trimmed = url.split(['?', '#']).next().unwrap_or(url);
    let path = match trimmed.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("/", |i| &rest[i..]),
        None => trimmed,
    };
    if path.is_empty() {
        "/".to_owned()
    } else {
        path.to_owned()
    }
}
