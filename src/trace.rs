//! The transaction trace: segment tree ownership and serialization.
//!
//! A [`Trace`] owns the segment arena for one transaction, enforces the
//! segment collection cap, computes exclusive/total time over the tree,
//! freezes trace intrinsics at [`Trace::end`], and renders the collector
//! envelope synchronously or behind a reschedule point. One trace belongs
//! to exactly one in-flight transaction and is only ever touched from the
//! execution context causally linked to that transaction; nothing here
//! locks.

use crate::attributes::{Attributes, Destinations};
use crate::codec;
use crate::config::TraceConfig;
use crate::error::TraceError;
use crate::segment::{Segment, SegmentId, StartCallback, uncovered_duration_ms};
use crate::span::SpanEvent;
use crate::timer::epoch_ms_now;
use crate::transaction::Transaction;
use serde_json::{Map, Number, Value, json};
use std::collections::BTreeMap;

/// Maximum number of added segments kept for serialized output.
///
/// Segments added past this cap stay in the tree (they still shape duration
/// math and span generation) but are excluded from the trace payload.
pub const MAX_COLLECTED_SEGMENTS: u32 = 900;

/// The name given to every trace's root segment.
pub const ROOT_SEGMENT_NAME: &str = "ROOT";

/// The full tree of segments for one transaction.
pub struct Trace {
    transaction: Transaction,
    segments: Vec<Segment>,
    root: SegmentId,
    segments_seen: u32,
    agent_attributes: Attributes,
    user_attributes: Attributes,
    intrinsics: BTreeMap<String, Value>,
    ended: bool,
}

impl Trace {
    /// Creates a trace for `transaction`, starting the root segment's timer
    /// at the current wall-clock time.
    ///
    /// Every trace is bound to a transaction from birth; there is no
    /// detached construction.
    #[must_use]
    pub fn new(transaction: Transaction) -> Self {
        Self::new_at(transaction, epoch_ms_now())
    }

    /// Creates a trace whose root segment starts at `start_ms`.
    #[must_use]
    pub fn new_at(transaction: Transaction, start_ms: u64) -> Self {
        let mut root = Segment::new(ROOT_SEGMENT_NAME);
        root.timer_mut().start_at(start_ms);
        Self {
            transaction,
            segments: vec![root],
            root: SegmentId::new(0),
            segments_seen: 0,
            agent_attributes: Attributes::new(),
            user_attributes: Attributes::new(),
            intrinsics: BTreeMap::new(),
            ended: false,
        }
    }

    /// The owning transaction.
    #[must_use]
    pub const fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// The root segment's id.
    #[must_use]
    pub const fn root(&self) -> SegmentId {
        self.root
    }

    /// Number of segments added via `add*` so far (the cap counter).
    #[must_use]
    pub const fn segments_seen(&self) -> u32 {
        self.segments_seen
    }

    /// True once [`Trace::end`] has run.
    #[must_use]
    pub const fn is_ended(&self) -> bool {
        self.ended
    }

    /// Read access to a segment.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this trace.
    #[must_use]
    pub fn segment(&self, id: SegmentId) -> &Segment {
        &self.segments[id.index()]
    }

    /// Mutable access to a segment.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this trace.
    pub fn segment_mut(&mut self, id: SegmentId) -> &mut Segment {
        &mut self.segments[id.index()]
    }

    /// Trace-level agent attributes.
    #[must_use]
    pub const fn agent_attributes(&self) -> &Attributes {
        &self.agent_attributes
    }

    /// Mutable trace-level agent attributes.
    pub fn agent_attributes_mut(&mut self) -> &mut Attributes {
        &mut self.agent_attributes
    }

    /// Trace-level user attributes.
    #[must_use]
    pub const fn user_attributes(&self) -> &Attributes {
        &self.user_attributes
    }

    /// Mutable trace-level user attributes.
    pub fn user_attributes_mut(&mut self) -> &mut Attributes {
        &mut self.user_attributes
    }

    /// Trace intrinsics, frozen by [`Trace::end`]; empty before that.
    #[must_use]
    pub const fn intrinsics(&self) -> &BTreeMap<String, Value> {
        &self.intrinsics
    }

    /// Epoch-ms start of the root segment.
    #[must_use]
    pub fn root_start_ms(&self) -> u64 {
        self.segment(self.root).timer().start_ms()
    }

    // ---- tree construction ----

    /// Adds a child of the root segment.
    pub fn add(&mut self, name: impl Into<String>) -> SegmentId {
        self.add_child(self.root, name)
    }

    /// Adds a child of `parent`.
    ///
    /// Every add counts against the per-trace cap, across the whole tree.
    /// Once the cap is exceeded the newly created segment is marked
    /// non-collectible but still participates in the tree.
    ///
    /// # Panics
    /// Panics if `parent` was not issued by this trace.
    pub fn add_child(&mut self, parent: SegmentId, name: impl Into<String>) -> SegmentId {
        self.insert_child(parent, Segment::new(name))
    }

    /// Adds a child of `parent` whose callback runs when the segment is
    /// first started.
    ///
    /// # Panics
    /// Panics if `parent` was not issued by this trace.
    pub fn add_child_with_callback(
        &mut self,
        parent: SegmentId,
        name: impl Into<String>,
        on_start: StartCallback,
    ) -> SegmentId {
        self.insert_child(parent, Segment::new(name).with_callback(on_start))
    }

    fn insert_child(&mut self, parent: SegmentId, segment: Segment) -> SegmentId {
        assert!(
            parent.index() < self.segments.len(),
            "parent segment {parent} does not belong to this trace"
        );
        self.segments_seen += 1;
        let collect = self.segments_seen <= MAX_COLLECTED_SEGMENTS;
        let id = SegmentId::new(u32::try_from(self.segments.len()).unwrap_or(u32::MAX));
        self.segments.push(segment.with_collect(collect));
        self.segments[parent.index()].push_child(id);
        id
    }

    // ---- segment lifecycle ----

    /// Starts a segment's timer at the current wall-clock time.
    pub fn start_segment(&mut self, id: SegmentId) {
        self.start_segment_at(id, epoch_ms_now());
    }

    /// Starts a segment's timer at `now_ms`; runs the segment's start
    /// callback on the first effective start.
    pub fn start_segment_at(&mut self, id: SegmentId, now_ms: u64) {
        let segment = &mut self.segments[id.index()];
        let first_start = !segment.timer().has_started();
        segment.timer_mut().start_at(now_ms);
        if first_start {
            if let Some(callback) = self.segments[id.index()].take_callback() {
                callback(id);
            }
        }
    }

    /// Stops a segment's timer at the current wall-clock time.
    pub fn end_segment(&mut self, id: SegmentId) {
        self.end_segment_at(id, epoch_ms_now());
    }

    /// Stops a segment's timer at `now_ms`.
    pub fn end_segment_at(&mut self, id: SegmentId, now_ms: u64) {
        self.segments[id.index()].timer_mut().end_at(now_ms);
    }

    /// Fixes a segment's duration directly, optionally placing its start at
    /// `root start + start_offset_ms`.
    ///
    /// This is the primary way durations are set in practice; it never
    /// waits on real time.
    pub fn set_segment_duration_ms(
        &mut self,
        id: SegmentId,
        duration_ms: u64,
        start_offset_ms: Option<u64>,
    ) {
        if let Some(offset) = start_offset_ms {
            let start = self.root_start_ms().saturating_add(offset);
            self.segments[id.index()].timer_mut().set_start_ms(start);
        }
        self.segments[id.index()].timer_mut().set_duration_ms(duration_ms);
    }

    // ---- time accounting ----

    /// Exclusive duration of `id`: its own wall-clock range minus the union
    /// of its children's ranges. Memoized per segment.
    pub fn exclusive_duration_ms(&mut self, id: SegmentId) -> u64 {
        if let Some(cached) = self.segments[id.index()].cached_exclusive_ms() {
            return cached;
        }
        let value = self.compute_exclusive_ms(id, epoch_ms_now());
        self.segments[id.index()].set_cached_exclusive_ms(value);
        value
    }

    /// Total time of the subtree rooted at `id`: the sum of every node's
    /// exclusive duration. Overlapping children are counted once by
    /// construction.
    pub fn total_time_ms(&mut self, id: SegmentId) -> u64 {
        let mut total: u64 = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            total = total.saturating_add(self.exclusive_duration_ms(current));
            stack.extend_from_slice(self.segment(current).children());
        }
        total
    }

    fn compute_exclusive_ms(&self, id: SegmentId, now_ms: u64) -> u64 {
        let segment = self.segment(id);
        let start = segment.timer().start_ms();
        let duration = segment.timer().duration_ms_at(now_ms);
        let child_ranges = segment
            .children()
            .iter()
            .map(|&child| self.segment(child).timer().range_ms_at(now_ms))
            .collect();
        uncovered_duration_ms(start, duration, child_ranges)
    }

    fn exclusive_for_output(&self, id: SegmentId, now_ms: u64) -> u64 {
        self.segment(id)
            .cached_exclusive_ms()
            .unwrap_or_else(|| self.compute_exclusive_ms(id, now_ms))
    }

    // ---- finalization ----

    /// Ends the trace at the current wall-clock time.
    pub fn end(&mut self) {
        self.end_at(epoch_ms_now());
    }

    /// Ends the trace at `now_ms`: stops the root timer if it is still
    /// running, freezes trace intrinsics from the transaction, and warms
    /// the exclusive-time caches for the whole tree.
    ///
    /// Idempotent: a second call returns without recomputing anything.
    pub fn end_at(&mut self, now_ms: u64) {
        if self.ended {
            return;
        }
        self.segments[self.root.index()].timer_mut().end_at(now_ms);

        self.intrinsics.insert(
            "traceId".to_owned(),
            Value::from(self.transaction.trace_id().to_owned()),
        );
        self.intrinsics.insert(
            "guid".to_owned(),
            Value::from(self.transaction.guid().to_owned()),
        );
        self.intrinsics.insert(
            "priority".to_owned(),
            Number::from_f64(f64::from(self.transaction.priority()))
                .map_or(Value::Null, Value::Number),
        );
        self.intrinsics
            .insert("sampled".to_owned(), Value::from(self.transaction.sampled()));
        if let Some(parent) = self.transaction.parent() {
            self.intrinsics.insert(
                "parent.type".to_owned(),
                Value::from(parent.parent_type.clone()),
            );
            self.intrinsics
                .insert("parent.app".to_owned(), Value::from(parent.app_id.clone()));
            self.intrinsics.insert(
                "parent.account".to_owned(),
                Value::from(parent.account_id.clone()),
            );
            self.intrinsics.insert(
                "parent.transportType".to_owned(),
                Value::from(parent.transport_type.clone()),
            );
            self.intrinsics.insert(
                "parent.transportDuration".to_owned(),
                Number::from_f64(parent.transport_duration_secs())
                    .map_or(Value::Null, Value::Number),
            );
        }

        for index in 0..self.segments.len() {
            if self.segments[index].cached_exclusive_ms().is_none() {
                let sid = SegmentId::new(u32::try_from(index).unwrap_or(u32::MAX));
                let value = self.compute_exclusive_ms(sid, now_ms);
                self.segments[index].set_cached_exclusive_ms(value);
            }
        }

        self.ended = true;
        tracing::debug!(
            segments_seen = self.segments_seen,
            duration_ms = self.segment(self.root).timer().duration_ms_at(now_ms),
            "transaction trace finalized"
        );
    }

    // ---- serialization ----

    /// Renders the collector envelope, doing all encoding on the calling
    /// thread.
    pub fn generate_json_sync(&self, config: &TraceConfig) -> Result<Value, TraceError> {
        let now_ms = epoch_ms_now();
        let payload = self.segment_payload(now_ms);
        let payload_field = if config.simple_compression {
            payload
        } else {
            Value::from(codec::encode(&payload)?)
        };
        Ok(self.assemble_envelope(payload_field, config))
    }

    /// Renders the collector envelope with the encode deferred behind a
    /// reschedule point, so the calling task keeps its forward progress.
    ///
    /// Produces output byte-identical to [`Trace::generate_json_sync`] for
    /// the same tree.
    pub async fn generate_json(&self, config: &TraceConfig) -> Result<Value, TraceError> {
        let now_ms = epoch_ms_now();
        let payload = self.segment_payload(now_ms);
        let payload_field = if config.simple_compression {
            payload
        } else {
            // The deflate pass below is CPU-bound.
            futures_lite::future::yield_now().await;
            Value::from(codec::encode(&payload)?)
        };
        Ok(self.assemble_envelope(payload_field, config))
    }

    fn assemble_envelope(&self, payload_field: Value, config: &TraceConfig) -> Value {
        json!([
            self.root_start_ms(),
            self.transaction.response_time_ms(),
            self.transaction.name(),
            self.request_uri_field(config),
            payload_field,
            self.transaction.guid(),
            null,
            false,
            null,
            null,
        ])
    }

    fn request_uri_field(&self, config: &TraceConfig) -> Value {
        if !config.request_uri_enabled {
            return Value::Null;
        }
        self.transaction
            .scrubbed_path()
            .map_or_else(|| Value::from("/Unknown"), Value::from)
    }

    fn segment_payload(&self, now_ms: u64) -> Value {
        json!([
            self.root_start_ms() as f64 / 1000.0,
            {},
            {},
            self.segment_json(self.root, now_ms),
            {
                "agentAttributes": self.agent_attributes.for_destination(Destinations::TRANS_TRACE),
                "userAttributes": self.user_attributes.for_destination(Destinations::TRANS_TRACE),
                "intrinsics": Value::Object(
                    self.intrinsics
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect::<Map<String, Value>>()
                ),
            },
            [],
        ])
    }

    fn segment_json(&self, id: SegmentId, now_ms: u64) -> Value {
        let root_start = self.root_start_ms();
        let segment = self.segment(id);
        let (start, end) = segment.timer().range_ms_at(now_ms);
        let mut attributes = segment.attributes().for_destination(Destinations::TRANS_TRACE);
        attributes.insert(
            "nr_exclusive_duration_millis".to_owned(),
            Value::from(self.exclusive_for_output(id, now_ms)),
        );
        json!([
            start.saturating_sub(root_start),
            end.saturating_sub(root_start),
            segment.name(),
            attributes,
            self.collectible_children_json(id, now_ms),
        ])
    }

    /// Serialized forms of a segment's collectible descendants.
    ///
    /// A non-collectible child is skipped, but its own collectible
    /// descendants are spliced in at this level so cap overflow hides
    /// placeholders without severing the subtrees beneath them.
    fn collectible_children_json(&self, id: SegmentId, now_ms: u64) -> Vec<Value> {
        let mut out = Vec::new();
        for &child in self.segment(id).children() {
            if self.segment(child).is_collectible() {
                out.push(self.segment_json(child, now_ms));
            } else {
                out.extend(self.collectible_children_json(child, now_ms));
            }
        }
        out
    }

    // ---- span emission ----

    /// Derives one span event per segment and hands each to `aggregator`.
    ///
    /// No-op unless distributed tracing and span events are both enabled
    /// and the transaction is sampled or an infinite-tracing observer is
    /// configured. Every segment produces a span regardless of the
    /// collection cap; the aggregator owns its own limits. Returns the
    /// number of spans handed over.
    pub fn generate_span_events<A: crate::span::SpanAggregator>(
        &self,
        config: &TraceConfig,
        aggregator: &mut A,
    ) -> usize {
        if !config.distributed_tracing_enabled || !config.span_events_enabled {
            return 0;
        }
        if !self.transaction.sampled() && !config.infinite_tracing {
            return 0;
        }

        let mut emitted = 0;
        let mut stack: Vec<(SegmentId, Option<SegmentId>)> = vec![(self.root, None)];
        while let Some((id, parent)) = stack.pop() {
            let segment = self.segment(id);
            let is_entry = parent.is_none();

            let mut attributes = segment.attributes().for_destination(Destinations::SPAN_EVENT);
            if let Some(host) = &config.host_display_name {
                attributes.insert("host.displayName".to_owned(), Value::from(host.clone()));
            }
            if is_entry {
                if let Some(link) = self.transaction.parent() {
                    attributes.insert(
                        "parent.type".to_owned(),
                        Value::from(link.parent_type.clone()),
                    );
                    attributes.insert("parent.app".to_owned(), Value::from(link.app_id.clone()));
                    attributes.insert(
                        "parent.account".to_owned(),
                        Value::from(link.account_id.clone()),
                    );
                    attributes.insert(
                        "parent.transportType".to_owned(),
                        Value::from(link.transport_type.clone()),
                    );
                    attributes.insert(
                        "parent.transportDuration".to_owned(),
                        Number::from_f64(link.transport_duration_secs())
                            .map_or(Value::Null, Value::Number),
                    );
                }
            }

            let span = SpanEvent {
                guid: segment.guid().to_owned(),
                parent_id: parent.map(|p| self.segment(p).guid().to_owned()),
                transaction_id: self.transaction.guid().to_owned(),
                trace_id: self.transaction.trace_id().to_owned(),
                sampled: self.transaction.sampled(),
                priority: self.transaction.priority(),
                category: segment.category(),
                name: segment.name().to_owned(),
                timestamp_ms: segment.timer().start_ms(),
                entry_point: is_entry,
                attributes,
            };
            aggregator.add_segment(span, is_entry);
            emitted += 1;

            for &child in segment.children().iter().rev() {
                stack.push((child, Some(id)));
            }
        }
        tracing::debug!(emitted, "span events handed to aggregator");
        emitted
    }
}

impl core::fmt::Debug for Trace {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Trace")
            .field("transaction", &self.transaction.guid())
            .field("segments", &self.segments.len())
            .field("segments_seen", &self.segments_seen)
            .field("ended", &self.ended)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace() -> Trace {
        let tx = Transaction::new("WebTransaction/Uri/ping")
            .with_guid("feedfacecafebeef".to_owned())
            .with_trace_id("0123456789abcdef0123456789abcdef".to_owned())
            .with_sampled(true)
            .with_priority(0.5)
            .with_response_time_ms(40);
        Trace::new_at(tx, 1_000_000)
    }

    // ---- construction and cap ----

    #[test]
    fn root_exists_and_counts_nothing() {
        let t = trace();
        assert_eq!(t.segments_seen(), 0);
        assert_eq!(t.segment(t.root()).name(), ROOT_SEGMENT_NAME);
        assert!(t.segment(t.root()).timer().is_running());
        assert_eq!(t.root_start_ms(), 1_000_000);
    }

    #[test]
    fn add_attaches_to_root() {
        let mut t = trace();
        let child = t.add("first");
        assert_eq!(t.segment(t.root()).children(), &[child]);
        assert_eq!(t.segments_seen(), 1);
    }

    #[test]
    fn cap_marks_later_segments_non_collectible() {
        let mut t = trace();
        let mut ids = Vec::new();
        for n in 0..950 {
            ids.push(t.add(format!("segment {n}")));
        }
        assert_eq!(t.segments_seen(), 950);
        assert_eq!(t.segment(t.root()).children().len(), 950);
        for (n, id) in ids.iter().enumerate() {
            let expected = n < MAX_COLLECTED_SEGMENTS as usize;
            assert_eq!(t.segment(*id).is_collectible(), expected, "segment {n}");
        }
    }

    #[test]
    fn cap_counts_across_the_whole_tree() {
        let mut t = trace();
        let mut parent = t.add("level 0");
        for n in 1..MAX_COLLECTED_SEGMENTS {
            parent = t.add_child(parent, format!("level {n}"));
        }
        let over = t.add_child(parent, "one past the cap");
        assert!(!t.segment(over).is_collectible());
    }

    #[test]
    #[should_panic(expected = "does not belong to this trace")]
    fn foreign_parent_panics() {
        let mut t = trace();
        t.add_child(SegmentId::new(999), "orphan");
    }

    // ---- lifecycle ----

    #[test]
    fn start_callback_runs_once() {
        use std::sync::atomic::{AtomicU32, Ordering};
        static CALLS: AtomicU32 = AtomicU32::new(0);

        let mut t = trace();
        let id = t.add_child_with_callback(
            t.root(),
            "with callback",
            Box::new(|_| {
                CALLS.fetch_add(1, Ordering::Relaxed);
            }),
        );
        t.start_segment_at(id, 1_000_100);
        t.start_segment_at(id, 1_000_200);
        assert_eq!(CALLS.load(Ordering::Relaxed), 1);
        assert_eq!(t.segment(id).timer().start_ms(), 1_000_100);
    }

    #[test]
    fn set_duration_with_offset_places_range() {
        let mut t = trace();
        let id = t.add("placed");
        t.set_segment_duration_ms(id, 25, Some(10));
        assert_eq!(t.segment(id).timer().start_ms(), 1_000_010);
        assert_eq!(t.segment(id).timer().duration_ms_at(0), 25);
    }

    // ---- time accounting ----

    #[test]
    fn exclusive_subtracts_child_union() {
        let mut t = trace();
        let parent = t.add("parent");
        t.set_segment_duration_ms(parent, 42, Some(0));
        let a = t.add_child(parent, "a");
        t.set_segment_duration_ms(a, 22, Some(0));
        let b = t.add_child(parent, "b");
        t.set_segment_duration_ms(b, 5, Some(5));
        assert_eq!(t.exclusive_duration_ms(parent), 20);
    }

    #[test]
    fn exclusive_is_memoized() {
        let mut t = trace();
        let parent = t.add("parent");
        t.set_segment_duration_ms(parent, 42, Some(0));
        assert_eq!(t.exclusive_duration_ms(parent), 42);

        // Changing the tree after the first read does not change the
        // memoized answer.
        let late = t.add_child(parent, "late");
        t.set_segment_duration_ms(late, 42, Some(0));
        assert_eq!(t.exclusive_duration_ms(parent), 42);
        assert_eq!(t.segment(parent).cached_exclusive_ms(), Some(42));
    }

    #[test]
    fn total_time_sums_exclusive_over_subtree() {
        let mut t = trace();
        let parent = t.add("parent");
        t.set_segment_duration_ms(parent, 100, Some(0));
        let a = t.add_child(parent, "a");
        t.set_segment_duration_ms(a, 30, Some(0));
        let a1 = t.add_child(a, "a1");
        t.set_segment_duration_ms(a1, 10, Some(5));
        let b = t.add_child(parent, "b");
        t.set_segment_duration_ms(b, 20, Some(50));

        let expected = t.exclusive_duration_ms(parent)
            + t.exclusive_duration_ms(a)
            + t.exclusive_duration_ms(a1)
            + t.exclusive_duration_ms(b);
        assert_eq!(t.total_time_ms(parent), expected);
        assert_eq!(t.total_time_ms(parent), 100);
    }

    // ---- finalization ----

    #[test]
    fn end_freezes_intrinsics_and_is_idempotent() {
        let mut t = trace();
        t.end_at(1_000_040);
        assert!(t.is_ended());
        assert_eq!(t.intrinsics()["traceId"], "0123456789abcdef0123456789abcdef");
        assert_eq!(t.intrinsics()["guid"], "feedfacecafebeef");
        assert_eq!(t.intrinsics()["sampled"], true);
        assert_eq!(
            t.segment(t.root()).timer().duration_ms_at(9_999_999),
            40
        );

        // A later end with a different clock changes nothing.
        t.end_at(2_000_000);
        assert_eq!(
            t.segment(t.root()).timer().duration_ms_at(9_999_999),
            40
        );
    }

    #[test]
    fn end_respects_explicit_root_duration() {
        let mut t = trace();
        t.set_segment_duration_ms(t.root(), 33, None);
        t.end_at(1_000_040);
        assert_eq!(t.segment(t.root()).timer().duration_ms_at(0), 33);
    }

    #[test]
    fn end_records_parent_intrinsics() {
        use crate::transaction::ParentLink;
        let tx = Transaction::new("tx").with_sampled(true).with_parent(ParentLink {
            parent_type: "App".to_owned(),
            account_id: "33".to_owned(),
            app_id: "2827902".to_owned(),
            transport_type: "HTTP".to_owned(),
            payload_timestamp_ms: 999_000,
            received_at_ms: 1_000_500,
        });
        let mut t = Trace::new_at(tx, 1_000_000);
        t.end_at(1_000_040);
        assert_eq!(t.intrinsics()["parent.type"], "App");
        assert_eq!(t.intrinsics()["parent.app"], "2827902");
        assert_eq!(t.intrinsics()["parent.account"], "33");
        assert_eq!(t.intrinsics()["parent.transportType"], "HTTP");
        assert_eq!(t.intrinsics()["parent.transportDuration"], 1.5);
    }

    #[test]
    fn end_warms_every_exclusive_cache() {
        let mut t = trace();
        let a = t.add("a");
        t.set_segment_duration_ms(a, 10, Some(0));
        let b = t.add_child(a, "b");
        t.set_segment_duration_ms(b, 4, Some(2));
        t.end_at(1_000_040);
        assert_eq!(t.segment(a).cached_exclusive_ms(), Some(6));
        assert_eq!(t.segment(b).cached_exclusive_ms(), Some(4));
        assert!(t.segment(t.root()).cached_exclusive_ms().is_some());
    }
}
