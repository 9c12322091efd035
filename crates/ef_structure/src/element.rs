use std::fmt;

use crate::BasePair;
use crate::Span;

/// The bpRNA structural element categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Stem,      // S
    Hairpin,   // H
    Bulge,     // B
    Interior,  // I
    Multiloop, // M
    End,       // E
    Unpaired,  // X
    Segment,   // segment
}

impl ElementKind {
    /// Decode the letter part of an element tag (`S`, `H`, ..., `segment`).
    pub fn from_tag(letters: &str) -> Option<Self> {
        match letters.to_ascii_uppercase().as_str() {
            "S" => Some(ElementKind::Stem),
            "H" => Some(ElementKind::Hairpin),
            "B" => Some(ElementKind::Bulge),
            "I" => Some(ElementKind::Interior),
            "M" => Some(ElementKind::Multiloop),
            "E" => Some(ElementKind::End),
            "X" => Some(ElementKind::Unpaired),
            "SEGMENT" => Some(ElementKind::Segment),
            _ => None,
        }
    }

    pub fn letter(&self) -> &'static str {
        match self {
            ElementKind::Stem => "S",
            ElementKind::Hairpin => "H",
            ElementKind::Bulge => "B",
            ElementKind::Interior => "I",
            ElementKind::Multiloop => "M",
            ElementKind::End => "E",
            ElementKind::Unpaired => "X",
            ElementKind::Segment => "segment",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// The length of an element, which depends on its kind: stems and loops with
/// one run report a single length, interior loops report the (5', 3') pair,
/// multiloops one length per constituent run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementLength {
    Single(usize),
    Pair(usize, usize),
    Each(Vec<usize>),
}

/// The base pair(s) closing an element: a hairpin is closed by one pair,
/// bulges and interior loops are flanked by two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosingPairs<'a> {
    Single(&'a BasePair),
    Flanking(&'a BasePair, &'a BasePair),
}

/// One typed secondary-structure element: the spans of sequence it owns, the
/// base pairs closing it, and the raw record line(s) it was parsed from (kept
/// for diagnostics only, never used in computation).
///
/// Span and pair cardinality per kind: Stem 2/0, Hairpin 1/1, Bulge 1/2,
/// Interior 2/2, Multiloop N/2N, End 1/0, Unpaired 1/2, Segment N/0 (plus a
/// base-pair count).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralElement {
    kind: ElementKind,
    raw: String,
    spans: Vec<Span>,
    pairs: Vec<BasePair>,
    segment_pair_count: Option<usize>,
}

impl StructuralElement {
    pub fn new(kind: ElementKind, raw: impl Into<String>) -> Self {
        StructuralElement {
            kind,
            raw: raw.into(),
            spans: Vec::new(),
            pairs: Vec::new(),
            segment_pair_count: None,
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn base_pairs(&self) -> &[BasePair] {
        &self.pairs
    }

    pub fn segment_pair_count(&self) -> Option<usize> {
        self.segment_pair_count
    }

    pub fn add_span(&mut self, span: Span) {
        self.spans.push(span);
    }

    pub fn add_base_pair(&mut self, pair: BasePair) {
        self.pairs.push(pair);
    }

    pub(crate) fn set_segment_pair_count(&mut self, count: usize) {
        self.segment_pair_count = Some(count);
    }

    /// The span containing `pos`, if any.
    pub fn contains(&self, pos: usize) -> Option<&Span> {
        self.spans.iter().find(|s| s.contains(pos))
    }

    /// True if every non-empty span of the element ends strictly before
    /// `pos`. Empty spans are ignored; an element with only empty spans is
    /// vacuously before every position.
    pub fn is_before(&self, pos: usize) -> bool {
        self.spans.iter().filter(|s| !s.is_empty()).all(|s| s.is_before(pos))
    }

    /// True iff the element neither contains `pos` nor is before it. The
    /// complement definition keeps the three predicates jointly exhaustive
    /// and mutually exclusive, including at span boundaries.
    pub fn is_after(&self, pos: usize) -> bool {
        self.contains(pos).is_none() && !self.is_before(pos)
    }

    /// Signed distance from the element to `pos`, with the span that
    /// achieves it.
    ///
    /// - contains: 0
    /// - before: the maximum (least negative) of `span.end - pos`
    /// - after: the minimum positive `span.start - pos`
    ///
    /// Segment elements never participate in distance queries, and position
    /// 0 is outside every 1-based contract; both return `None`.
    pub fn distance(&self, pos: usize) -> Option<(i64, &Span)> {
        if pos == 0 || self.kind == ElementKind::Segment {
            return None;
        }

        if let Some(span) = self.contains(pos) {
            return Some((0, span));
        }

        if self.is_before(pos) {
            self.spans
                .iter()
                .filter(|s| !s.is_empty())
                .map(|s| (s.offset_from_end(pos), s))
                .max_by_key(|&(d, _)| d)
        } else {
            self.spans
                .iter()
                .filter(|s| !s.is_empty())
                .map(|s| (s.offset_from_start(pos), s))
                .filter(|&(d, _)| d > 0)
                .min_by_key(|&(d, _)| d)
        }
    }

    /// Kind-dependent length. `None` for Segment and Unpaired elements, and
    /// for elements whose span cardinality does not match their kind.
    pub fn length(&self) -> Option<ElementLength> {
        match self.kind {
            ElementKind::Stem => {
                // both stem strands have equal length by construction
                (self.spans.len() == 2).then(|| ElementLength::Single(self.spans[0].len()))
            }
            ElementKind::Hairpin | ElementKind::Bulge | ElementKind::End => {
                (self.spans.len() == 1).then(|| ElementLength::Single(self.spans[0].len()))
            }
            ElementKind::Interior => (self.spans.len() == 2)
                .then(|| ElementLength::Pair(self.spans[0].len(), self.spans[1].len())),
            ElementKind::Multiloop => (!self.spans.is_empty())
                .then(|| ElementLength::Each(self.spans.iter().map(Span::len).collect())),
            _ => None,
        }
    }

    /// Length of the single run relevant to `ref_pos`: for interior loops
    /// and multiloops, the containing span; otherwise the scalar length.
    pub fn length_at(&self, ref_pos: usize) -> Option<usize> {
        match self.kind {
            ElementKind::Interior | ElementKind::Multiloop => {
                self.contains(ref_pos).map(Span::len)
            }
            _ => match self.length() {
                Some(ElementLength::Single(n)) => Some(n),
                _ => None,
            },
        }
    }

    /// The closing base pair(s): one for a hairpin, the (5', 3') flanking
    /// pair for bulges and interior loops, `None` for every other kind.
    pub fn closing_pairs(&self) -> Option<ClosingPairs<'_>> {
        match self.kind {
            ElementKind::Hairpin => {
                (self.pairs.len() == 1).then(|| ClosingPairs::Single(&self.pairs[0]))
            }
            ElementKind::Bulge | ElementKind::Interior => (self.pairs.len() == 2)
                .then(|| ClosingPairs::Flanking(&self.pairs[0], &self.pairs[1])),
            _ => None,
        }
    }
}

impl fmt::Display for StructuralElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} | {}]", self.kind, self.raw)
    }
}
