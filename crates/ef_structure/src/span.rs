use std::fmt;

/// A contiguous run of nucleotides with 1-based inclusive coordinates.
///
/// The end coordinate is derived from the start and the sequence length, so a
/// span can never disagree with its own sequence. bpRNA records may describe
/// zero-length runs (e.g. `14..13 ""`); those become empty spans with
/// `end == start - 1`, the convention bpRNA itself uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    seq: String,
    start: usize,
    end: usize,
}

impl Span {
    pub fn new(seq: impl Into<String>, start: usize) -> Self {
        let seq = seq.into();
        let end = if seq.is_empty() { start.saturating_sub(1) } else { start + seq.len() - 1 };
        Span { seq, start, end }
    }

    pub fn empty(start: usize) -> Self {
        Span::new(String::new(), start)
    }

    pub fn seq(&self) -> &str {
        &self.seq
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// True if `pos` falls inside the span. Always false for empty spans and
    /// for positions outside `[start, end]`.
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// True if the whole span lies strictly 5' of `pos`.
    pub fn is_before(&self, pos: usize) -> bool {
        self.end < pos
    }

    /// True if the whole span lies strictly 3' of `pos`.
    pub fn is_after(&self, pos: usize) -> bool {
        self.start > pos
    }

    /// Signed offset of the span's end relative to `pos` (negative when the
    /// span ends before `pos`).
    pub fn offset_from_end(&self, pos: usize) -> i64 {
        self.end as i64 - pos as i64
    }

    /// Signed offset of the span's start relative to `pos` (positive when the
    /// span starts after `pos`).
    pub fn offset_from_start(&self, pos: usize) -> i64 {
        self.start as i64 - pos as i64
    }

    /// Nucleotide at an absolute position, if the span contains it.
    pub fn nt_at(&self, pos: usize) -> Option<char> {
        if self.contains(pos) {
            self.seq.as_bytes().get(pos - self.start).map(|&b| b as char)
        } else {
            None
        }
    }

    /// 1-based ordering of `pos` within the span.
    pub fn local_ordering(&self, pos: usize) -> Option<usize> {
        if self.contains(pos) {
            Some(pos - self.start + 1)
        } else {
            None
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.seq, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_coordinates() {
        let s = Span::new("CAA", 48);
        assert_eq!(s.start(), 48);
        assert_eq!(s.end(), 50);
        assert_eq!(s.len(), 3);
        assert!(!s.is_empty());
        assert_eq!(format!("{}", s), "CAA (48, 50)");
    }

    #[test]
    fn test_empty_span() {
        let s = Span::empty(14);
        assert_eq!(s.start(), 14);
        assert_eq!(s.end(), 13);
        assert_eq!(s.len(), 0);
        assert!(s.is_empty());
        assert!(!s.contains(13));
        assert!(!s.contains(14));
    }

    #[test]
    fn test_contains_boundaries() {
        let s = Span::new("ACGU", 10);
        assert!(!s.contains(9));
        assert!(s.contains(10));
        assert!(s.contains(13));
        assert!(!s.contains(14));
        assert!(!s.contains(0));
    }

    #[test]
    fn test_before_after() {
        let s = Span::new("ACGU", 10);
        assert!(s.is_before(14));
        assert!(!s.is_before(13));
        assert!(s.is_after(9));
        assert!(!s.is_after(10));
    }

    #[test]
    fn test_offsets() {
        let s = Span::new("ACGU", 10); // 10..13
        assert_eq!(s.offset_from_end(20), -7);
        assert_eq!(s.offset_from_start(7), 3);
        assert_eq!(s.offset_from_end(13), 0);
    }

    #[test]
    fn test_nt_access() {
        let s = Span::new("ACGU", 10);
        assert_eq!(s.nt_at(10), Some('A'));
        assert_eq!(s.nt_at(13), Some('U'));
        assert_eq!(s.nt_at(14), None);
        assert_eq!(s.local_ordering(12), Some(3));
        assert_eq!(s.local_ordering(9), None);
    }
}
