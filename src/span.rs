//! Span events derived from the segment tree.
//!
//! After the sampling decision, every segment of a trace can be converted
//! into one [`SpanEvent`] for distributed-tracing export. Emission walks the
//! tree parent-before-child so parent linkage falls out of the traversal;
//! produced spans are handed to a [`SpanAggregator`], which owns eviction,
//! reservoir sampling, and transport.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Categorization of a span event.
///
/// Spans report `generic` unless instrumentation overrides the category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanCategory {
    /// An uncategorized unit of work.
    #[default]
    Generic,
    /// An outbound HTTP call.
    Http,
    /// A datastore operation.
    Datastore,
}

impl SpanCategory {
    /// Returns the wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Http => "http",
            Self::Datastore => "datastore",
        }
    }
}

/// A per-segment record emitted for distributed-tracing export.
#[derive(Debug, Clone)]
pub struct SpanEvent {
    pub(crate) guid: String,
    pub(crate) parent_id: Option<String>,
    pub(crate) transaction_id: String,
    pub(crate) trace_id: String,
    pub(crate) sampled: bool,
    pub(crate) priority: f32,
    pub(crate) category: SpanCategory,
    pub(crate) name: String,
    pub(crate) timestamp_ms: u64,
    pub(crate) entry_point: bool,
    pub(crate) attributes: Map<String, Value>,
}

impl SpanEvent {
    /// The span's own guid (the segment id).
    #[must_use]
    pub fn guid(&self) -> &str {
        &self.guid
    }

    /// The parent span's guid; `None` on the entry span.
    #[must_use]
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// The owning transaction's id.
    #[must_use]
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// The distributed trace id.
    #[must_use]
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// The transaction's sampling decision.
    #[must_use]
    pub const fn sampled(&self) -> bool {
        self.sampled
    }

    /// The transaction's sampling priority.
    #[must_use]
    pub const fn priority(&self) -> f32 {
        self.priority
    }

    /// The span category.
    #[must_use]
    pub const fn category(&self) -> SpanCategory {
        self.category
    }

    /// The span name (the segment name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start timestamp in epoch ms.
    #[must_use]
    pub const fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    /// True only for the transaction's entry span.
    #[must_use]
    pub const fn is_entry_point(&self) -> bool {
        self.entry_point
    }

    /// The span-destination attribute bag (`parent.*`, `host.displayName`,
    /// and any instrumentation attributes scoped to span events).
    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Renders the span's intrinsic fields as a JSON object.
    #[must_use]
    pub fn intrinsics(&self) -> Map<String, Value> {
        let mut intrinsics = Map::new();
        intrinsics.insert("guid".to_owned(), Value::from(self.guid.clone()));
        intrinsics.insert(
            "parentId".to_owned(),
            self.parent_id.clone().map_or(Value::Null, Value::from),
        );
        intrinsics.insert(
            "transactionId".to_owned(),
            Value::from(self.transaction_id.clone()),
        );
        intrinsics.insert("traceId".to_owned(), Value::from(self.trace_id.clone()));
        intrinsics.insert("sampled".to_owned(), Value::from(self.sampled));
        intrinsics.insert(
            "priority".to_owned(),
            Number::from_f64(f64::from(self.priority)).map_or(Value::Null, Value::Number),
        );
        intrinsics.insert("category".to_owned(), Value::from(self.category.as_str()));
        intrinsics.insert("name".to_owned(), Value::from(self.name.clone()));
        intrinsics.insert("timestamp".to_owned(), Value::from(self.timestamp_ms));
        if self.entry_point {
            intrinsics.insert("nr.entryPoint".to_owned(), Value::from(true));
        }
        intrinsics
    }
}

/// Collaborator that receives span events as they are generated.
///
/// The aggregator owns everything downstream of generation: reservoir
/// limits, eviction, and export.
pub trait SpanAggregator {
    /// Accepts one span derived from a segment. `is_entry_point` is true
    /// exactly once per trace, for the root-equivalent segment.
    fn add_segment(&mut self, span: SpanEvent, is_entry_point: bool);
}

impl SpanAggregator for Vec<SpanEvent> {
    fn add_segment(&mut self, span: SpanEvent, _is_entry_point: bool) {
        self.push(span);
    }
}
