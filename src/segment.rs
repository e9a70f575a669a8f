//! Trace tree nodes and exclusive-time arithmetic.
//!
//! A [`Segment`] is one timed unit of work inside a transaction. Segments
//! form a tree owned by a [`Trace`](crate::trace::Trace); nodes are
//! addressed by [`SegmentId`] into the trace's arena, and each node keeps
//! its own timer, ordered child list, attributes, and collection flag.
//!
//! Exclusive time is the part of a segment's wall-clock range not covered
//! by any child range. Children may overlap each other or nest arbitrarily,
//! so the computation must union the child ranges before subtracting;
//! naive summation double-counts overlap.

use crate::attributes::Attributes;
use crate::id;
use crate::span::SpanCategory;
use crate::timer::Timer;
use core::fmt;
use smallvec::SmallVec;

/// Index of a segment within its owning trace.
///
/// Ids are only meaningful for the trace that issued them; segments are
/// never removed, so a plain index needs no generation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(u32);

impl SegmentId {
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the underlying arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Callback invoked once, when its segment is first started.
pub type StartCallback = Box<dyn FnOnce(SegmentId) + Send>;

/// A timed node in the trace tree.
pub struct Segment {
    name: String,
    guid: String,
    timer: Timer,
    children: SmallVec<[SegmentId; 4]>,
    attributes: Attributes,
    collect: bool,
    exclusive_ms: Option<u64>,
    on_start: Option<StartCallback>,
    category: SpanCategory,
}

impl Segment {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guid: id::span_id(),
            timer: Timer::new(),
            children: SmallVec::new(),
            attributes: Attributes::new(),
            collect: true,
            exclusive_ms: None,
            on_start: None,
            category: SpanCategory::Generic,
        }
    }

    pub(crate) fn with_callback(mut self, on_start: StartCallback) -> Self {
        self.on_start = Some(on_start);
        self
    }

    pub(crate) fn with_collect(mut self, collect: bool) -> Self {
        self.collect = collect;
        self
    }

    /// The segment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The segment's span guid (16 hex chars).
    #[must_use]
    pub fn guid(&self) -> &str {
        &self.guid
    }

    /// Read access to the segment's timer.
    #[must_use]
    pub const fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Mutable access to the segment's timer.
    pub fn timer_mut(&mut self) -> &mut Timer {
        // Direct timer mutation bypasses the start callback; trace-level
        // start/end entry points are the normal path.
        &mut self.timer
    }

    /// The segment's children in insertion order.
    #[must_use]
    pub fn children(&self) -> &[SegmentId] {
        &self.children
    }

    /// Read access to the segment's attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Mutable access to the segment's attributes.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// True if this segment appears in serialized trace output.
    ///
    /// Segments added past the per-trace cap stay in the tree but are not
    /// collectible.
    #[must_use]
    pub const fn is_collectible(&self) -> bool {
        self.collect
    }

    /// Marks whether this segment appears in serialized trace output.
    ///
    /// Instrumentation can exclude an individual segment; its collectible
    /// descendants are spliced into the nearest collectible ancestor's
    /// serialized child list.
    pub fn set_collectible(&mut self, collect: bool) {
        self.collect = collect;
    }

    /// The span category reported for this segment.
    #[must_use]
    pub const fn category(&self) -> SpanCategory {
        self.category
    }

    /// Overrides the span category.
    pub fn set_category(&mut self, category: SpanCategory) {
        self.category = category;
    }

    /// The memoized exclusive duration, if it has been computed.
    #[must_use]
    pub const fn cached_exclusive_ms(&self) -> Option<u64> {
        self.exclusive_ms
    }

    pub(crate) fn set_cached_exclusive_ms(&mut self, value: u64) {
        self.exclusive_ms = Some(value);
    }

    pub(crate) fn push_child(&mut self, child: SegmentId) {
        self.children.push(child);
    }

    pub(crate) fn take_callback(&mut self) -> Option<StartCallback> {
        self.on_start.take()
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("name", &self.name)
            .field("guid", &self.guid)
            .field("timer", &self.timer)
            .field("children", &self.children)
            .field("collect", &self.collect)
            .field("exclusive_ms", &self.exclusive_ms)
            .field("category", &self.category)
            .field("has_callback", &self.on_start.is_some())
            .finish_non_exhaustive()
    }
}

/// Computes the part of `[start, start + duration)` not covered by the
/// union of `child_ranges`.
///
/// Ranges are `(start, end)` pairs in epoch ms. Child ranges are clipped to
/// the parent range first, so a child extending past its parent (a data
/// irregularity) never drives the result negative. The result is floored
/// at 0.
pub(crate) fn uncovered_duration_ms(
    start: u64,
    duration: u64,
    mut child_ranges: Vec<(u64, u64)>,
) -> u64 {
    let end = start.saturating_add(duration);
    child_ranges.retain(|&(s, e)| e > start && s < end && s < e);
    for range in &mut child_ranges {
        range.0 = range.0.max(start);
        range.1 = range.1.min(end);
    }
    child_ranges.sort_unstable();

    let mut covered: u64 = 0;
    let mut current: Option<(u64, u64)> = None;
    for (s, e) in child_ranges {
        match current {
            None => current = Some((s, e)),
            Some((cs, ce)) => {
                if s <= ce {
                    current = Some((cs, ce.max(e)));
                } else {
                    covered = covered.saturating_add(ce - cs);
                    current = Some((s, e));
                }
            }
        }
    }
    if let Some((cs, ce)) = current {
        covered = covered.saturating_add(ce - cs);
    }
    duration.saturating_sub(covered)
}
