//! Token spans and typed associations between them.
//!
//! An association records where an attribute came from: a dispersal trait
//! whose part was copied from a fruit-type span carries an association
//! pointing at that span.

use std::any::TypeId;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// A half-open token range `[start, end)` within a token line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpanRef {
    /// First token index
    pub start: usize,
    /// One past the last token index
    pub end: usize,
}

impl SpanRef {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn overlaps(&self, other: &SpanRef) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Token distance between two spans.
    ///
    /// The smaller of `|other.start - self.end|` and `|self.start - other.end|`.
    pub fn distance(&self, other: &SpanRef) -> usize {
        let a = other.start.max(self.end) - other.start.min(self.end);
        let b = self.start.max(other.end) - self.start.min(other.end);
        a.min(b)
    }

    /// Token indices covered by the span.
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// A kind of link from one span to another.
///
/// ```
/// use layered_flora::{AssociatedSpan, Association, SpanRef};
///
/// #[derive(Debug)]
/// struct CopiedFrom;
///
/// impl Association for CopiedFrom {
///     fn label(&self) -> &'static str { "copied" }
/// }
///
/// let link = AssociatedSpan::new(CopiedFrom, SpanRef::new(0, 1));
/// assert_eq!(link.label(), "copied");
/// ```
pub trait Association: Debug + 'static {
    /// Name shown on the arrow in displays.
    fn label(&self) -> &'static str;

    /// Drawn in front of the label.
    fn glyph(&self) -> Option<&'static str> {
        None
    }
}

/// A link to `span`, tagged with the kind of association that made it.
///
/// Two links are equal when they point at the same span and were made by the
/// same association type.
#[derive(Debug, Clone, Copy)]
pub struct AssociatedSpan {
    pub span: SpanRef,
    kind: TypeId,
    label: &'static str,
    glyph: Option<&'static str>,
}

impl PartialEq for AssociatedSpan {
    fn eq(&self, other: &Self) -> bool {
        self.span == other.span && self.kind == other.kind
    }
}

impl Eq for AssociatedSpan {}

impl AssociatedSpan {
    pub fn new<A: Association>(association: A, span: SpanRef) -> Self {
        Self {
            span,
            kind: TypeId::of::<A>(),
            label: association.label(),
            glyph: association.glyph(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn glyph(&self) -> Option<&'static str> {
        self.glyph
    }

    /// True if the link was made by association type `A`.
    pub fn is<A: Association>(&self) -> bool {
        self.kind == TypeId::of::<A>()
    }
}
