//! Segtrace: transaction trace engine with exclusive-time accounting.
//!
//! # Overview
//!
//! Segtrace builds the tree of timed execution segments for a single
//! transaction, computes per-segment and per-subtree exclusive (self) time
//! over overlapping ranges, enforces a collection cap, serializes the tree
//! into the compact collector envelope, and derives distributed-tracing
//! span events from the same tree.
//!
//! # Core Guarantees
//!
//! - **Overlap-correct self time**: exclusive time subtracts the *union* of
//!   child ranges, so concurrent and nested children are never
//!   double-counted
//! - **Bounded output**: at most 900 added segments are serialized; later
//!   segments stay in the tree for duration math and span generation
//! - **Deterministic shaping**: attribute maps are key-ordered, so the same
//!   tree always serializes to the same bytes
//! - **One envelope, two paths**: the synchronous and deferred serializers
//!   share one builder and produce byte-identical output
//! - **Total timing operations**: timers never error; arithmetic saturates
//!
//! # Module Structure
//!
//! - [`timer`]: start/duration state machine for a segment
//! - [`segment`]: tree nodes and the interval-union exclusive-time core
//! - [`trace`]: tree ownership, the cap, finalization, serialization
//! - [`span`]: span events derived from the tree, aggregator seam
//! - [`attributes`]: destination-scoped attribute storage
//! - [`transaction`]: the owning transaction's data and inbound trace link
//! - [`config`]: serialization/emission-time configuration snapshot
//! - [`codec`](mod@codec): opaque `base64(zlib(json))` payload codec
//! - [`id`](mod@id): random trace/span identifier generation
//! - [`error`](mod@error): error types
//!
//! # Example
//!
//! ```
//! use segtrace::{Trace, TraceConfig, Transaction};
//!
//! let transaction = Transaction::new("WebTransaction/Uri/ping")
//!     .with_url("/ping?q=1")
//!     .with_sampled(true)
//!     .with_response_time_ms(42);
//! let mut trace = Trace::new_at(transaction, 1_000_000);
//!
//! let db = trace.add("Datastore/statement/SELECT");
//! trace.set_segment_duration_ms(db, 22, Some(0));
//! trace.set_segment_duration_ms(trace.root(), 42, None);
//! trace.end_at(1_000_042);
//!
//! assert_eq!(trace.exclusive_duration_ms(trace.root()), 20);
//! let envelope = trace.generate_json_sync(&TraceConfig::default()).unwrap();
//! assert_eq!(envelope[2], "WebTransaction/Uri/ping");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

pub mod attributes;
pub mod codec;
pub mod config;
pub mod error;
pub mod id;
pub mod segment;
pub mod span;
pub mod timer;
pub mod trace;
pub mod transaction;

// Re-exports for convenient access to core types
pub use attributes::{Attributes, Destinations};
pub use config::TraceConfig;
pub use error::{TraceError, TraceResult};
pub use segment::{Segment, SegmentId, StartCallback};
pub use span::{SpanAggregator, SpanCategory, SpanEvent};
pub use timer::{Timer, TimerState};
pub use trace::{MAX_COLLECTED_SEGMENTS, ROOT_SEGMENT_NAME, Trace};
pub use transaction::{ParentLink, Transaction};
