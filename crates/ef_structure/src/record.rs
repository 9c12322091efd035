use crate::BasePair;
use crate::ElementKind;
use crate::RecordError;
use crate::Span;
use crate::StructuralElement;

/// Carry-over state for elements that are described by more than one record
/// line. It lives on the stack of [`parse_elements`] and is dropped with it,
/// so no half-built element can ever leak into the next record.
#[derive(Default)]
struct ParseCarry {
    /// 5' half of an interior loop waiting for its 3' half.
    interior: Option<InteriorHalf>,
    /// Multiloop currently accumulating same-ordinal lines.
    multiloop: Option<MultiloopCarry>,
}

struct InteriorHalf {
    ordinal: Option<u32>,
    raw: String,
    span: Span,
    pair: BasePair,
}

struct MultiloopCarry {
    ordinal: u32,
    spans: Vec<Span>,
    pairs: Vec<BasePair>,
    raw_lines: Vec<String>,
}

impl MultiloopCarry {
    fn seal(self) -> StructuralElement {
        let mut element = StructuralElement::new(ElementKind::Multiloop, self.raw_lines.join(" | "));
        for span in self.spans {
            element.add_span(span);
        }
        for pair in self.pairs {
            element.add_base_pair(pair);
        }
        element
    }
}

/// Parse the element-description lines of one bpRNA record into the ordered
/// element list.
///
/// Elements are appended in order of *completion*: an interior loop completes
/// at its 3' half (which must carry the same ordinal as the pending 5' half),
/// a multiloop at the first differently-tagged line after its
/// last constituent (or at end of stream, where any open multiloop is sealed
/// unconditionally). A 5' interior half left open at end of stream is a
/// malformed record, not a droppable leftover.
pub fn parse_elements<I, S>(lines: I) -> Result<Vec<StructuralElement>, RecordError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut carry = ParseCarry::default();
    let mut elements = Vec::new();

    for line in lines {
        parse_element_line(line.as_ref(), &mut carry, &mut elements)?;
    }

    if let Some(half) = carry.interior.take() {
        return Err(RecordError::DanglingInterior(half.raw));
    }
    if let Some(ml) = carry.multiloop.take() {
        elements.push(ml.seal());
    }

    Ok(elements)
}

fn parse_element_line(
    line: &str,
    carry: &mut ParseCarry,
    out: &mut Vec<StructuralElement>,
) -> Result<(), RecordError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(());
    }

    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    let (kind, ordinal, _sub) = decode_tag(parts[0])?;

    // Any line that is not part of the accumulating multiloop seals it.
    if let Some(ml) = carry.multiloop.take() {
        if kind == ElementKind::Multiloop && ordinal == Some(ml.ordinal) {
            carry.multiloop = Some(ml);
        } else {
            out.push(ml.seal());
        }
    }

    match kind {
        ElementKind::Stem => {
            expect_parts(&parts, 5, "S", trimmed)?;
            let mut element = StructuralElement::new(kind, trimmed);
            element.add_span(parse_span(parts[1], parts[2])?);
            element.add_span(parse_span(parts[3], parts[4])?);
            out.push(element);
        }
        ElementKind::Hairpin => {
            expect_parts(&parts, 5, "H", trimmed)?;
            let mut element = StructuralElement::new(kind, trimmed);
            element.add_span(parse_span(parts[1], parts[2])?);
            element.add_base_pair(parse_base_pair(parts[3], parts[4])?);
            out.push(element);
        }
        ElementKind::Bulge | ElementKind::Unpaired => {
            expect_parts(&parts, 7, kind.letter(), trimmed)?;
            let mut element = StructuralElement::new(kind, trimmed);
            element.add_span(parse_span(parts[1], parts[2])?);
            element.add_base_pair(parse_base_pair(parts[3], parts[4])?);
            element.add_base_pair(parse_base_pair(parts[5], parts[6])?);
            out.push(element);
        }
        ElementKind::Interior => {
            expect_parts(&parts, 5, "I", trimmed)?;
            let span = parse_span(parts[1], parts[2])?;
            let pair = parse_base_pair(parts[3], parts[4])?;
            match carry.interior.take() {
                None => {
                    carry.interior =
                        Some(InteriorHalf { ordinal, raw: trimmed.to_string(), span, pair });
                }
                Some(left) => {
                    if left.ordinal != ordinal {
                        return Err(RecordError::MismatchedInterior(
                            left.raw,
                            trimmed.to_string(),
                        ));
                    }
                    let mut element = StructuralElement::new(
                        ElementKind::Interior,
                        format!("{} | {}", left.raw, trimmed),
                    );
                    element.add_span(left.span);
                    element.add_span(span);
                    element.add_base_pair(left.pair);
                    element.add_base_pair(pair);
                    out.push(element);
                }
            }
        }
        ElementKind::Multiloop => {
            expect_parts(&parts, 7, "M", trimmed)?;
            let ordinal = ordinal.ok_or_else(|| RecordError::UnknownTag(parts[0].to_string()))?;
            let span = parse_span(parts[1], parts[2])?;
            let pair_1 = parse_base_pair(parts[3], parts[4])?;
            let pair_2 = parse_base_pair(parts[5], parts[6])?;

            let ml = carry.multiloop.get_or_insert_with(|| MultiloopCarry {
                ordinal,
                spans: Vec::new(),
                pairs: Vec::new(),
                raw_lines: Vec::new(),
            });
            ml.spans.push(span);
            ml.pairs.push(pair_1);
            ml.pairs.push(pair_2);
            ml.raw_lines.push(trimmed.to_string());
        }
        ElementKind::End => {
            expect_parts(&parts, 3, "E", trimmed)?;
            let mut element = StructuralElement::new(kind, trimmed);
            element.add_span(parse_span(parts[1], parts[2])?);
            out.push(element);
        }
        ElementKind::Segment => {
            if parts.len() < 4 || parts.len() % 2 != 0 {
                return Err(RecordError::TokenCount {
                    tag: parts[0].to_string(),
                    expected: "an even count of at least 4",
                    found: parts.len(),
                    line: trimmed.to_string(),
                });
            }
            let mut element = StructuralElement::new(kind, trimmed);
            element.set_segment_pair_count(parse_pair_count(parts[1])?);
            for chunk in parts[2..].chunks(2) {
                element.add_span(parse_span(chunk[0], chunk[1])?);
            }
            out.push(element);
        }
    }

    Ok(())
}

/// Decode an element tag like `S1`, `I2.1`, `M3.2` or `segment1` into
/// (kind, ordinal, sub-index).
fn decode_tag(tag: &str) -> Result<(ElementKind, Option<u32>, Option<u32>), RecordError> {
    let letters: String = tag.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    let kind = ElementKind::from_tag(&letters)
        .ok_or_else(|| RecordError::UnknownTag(tag.to_string()))?;

    let mut numbers = tag[letters.len()..].splitn(2, '.');
    let ordinal = match numbers.next().filter(|s| !s.is_empty()) {
        Some(s) => Some(s.parse().map_err(|_| RecordError::UnknownTag(tag.to_string()))?),
        None => None,
    };
    let sub = match numbers.next().filter(|s| !s.is_empty()) {
        Some(s) => Some(s.parse().map_err(|_| RecordError::UnknownTag(tag.to_string()))?),
        None => None,
    };

    Ok((kind, ordinal, sub))
}

fn expect_parts(
    parts: &[&str],
    expected: usize,
    tag: &'static str,
    line: &str,
) -> Result<(), RecordError> {
    if parts.len() != expected {
        return Err(RecordError::TokenCount {
            tag: tag.to_string(),
            expected: match expected {
                3 => "3",
                5 => "5",
                7 => "7",
                _ => "a kind-specific count",
            },
            found: parts.len(),
            line: line.to_string(),
        });
    }
    Ok(())
}

fn parse_span(range_token: &str, seq_token: &str) -> Result<Span, RecordError> {
    let (start, _end) = parse_position_pair(range_token)?;
    let seq: String = seq_token.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    Ok(Span::new(seq, start))
}

fn parse_base_pair(range_token: &str, nt_token: &str) -> Result<BasePair, RecordError> {
    let (left_pos, right_pos) = parse_position_pair(range_token)?;
    let (left_nt, right_nt) = parse_nt_pair(nt_token)?;
    Ok(BasePair::new((left_nt, left_pos), (right_nt, right_pos)))
}

/// Two positions out of a `12..14` or `(11,30)` shaped token.
fn parse_position_pair(token: &str) -> Result<(usize, usize), RecordError> {
    let mut numbers = token
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .map(str::parse::<usize>);

    match (numbers.next(), numbers.next()) {
        (Some(Ok(a)), Some(Ok(b))) => Ok((a, b)),
        _ => Err(RecordError::BadPositionPair(token.to_string())),
    }
}

/// Two nucleotide letters out of a `G:C` shaped token (quotes tolerated).
fn parse_nt_pair(token: &str) -> Result<(char, char), RecordError> {
    let mut halves = token.splitn(2, ':');
    let left = halves.next().and_then(|s| s.chars().find(char::is_ascii_alphanumeric));
    let right = halves.next().and_then(|s| s.chars().find(char::is_ascii_alphanumeric));

    match (left, right) {
        (Some(l), Some(r)) => Ok((l, r)),
        _ => Err(RecordError::BadNucleotidePair(token.to_string())),
    }
}

/// Leading integer out of a `25bp` shaped token.
fn parse_pair_count(token: &str) -> Result<usize, RecordError> {
    let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().map_err(|_| RecordError::BadPairCount(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementLength;

    #[test]
    fn test_decode_tag() {
        assert_eq!(decode_tag("S1").unwrap(), (ElementKind::Stem, Some(1), None));
        assert_eq!(decode_tag("I2.1").unwrap(), (ElementKind::Interior, Some(2), Some(1)));
        assert_eq!(decode_tag("M3.2").unwrap(), (ElementKind::Multiloop, Some(3), Some(2)));
        assert_eq!(decode_tag("segment1").unwrap(), (ElementKind::Segment, Some(1), None));
        assert!(matches!(decode_tag("Q1"), Err(RecordError::UnknownTag(_))));
    }

    #[test]
    fn test_position_pair_token_shapes() {
        assert_eq!(parse_position_pair("12..14").unwrap(), (12, 14));
        assert_eq!(parse_position_pair("(11,30)").unwrap(), (11, 30));
        assert!(parse_position_pair("abc").is_err());
        assert!(parse_position_pair("12").is_err());
    }

    #[test]
    fn test_nt_pair_token() {
        assert_eq!(parse_nt_pair("G:C").unwrap(), ('G', 'C'));
        assert_eq!(parse_nt_pair("\"A:U\"").unwrap(), ('A', 'U'));
        assert!(parse_nt_pair("GC").is_err());
    }

    #[test]
    fn test_pair_count_token() {
        assert_eq!(parse_pair_count("25bp").unwrap(), 25);
        assert!(parse_pair_count("bp").is_err());
    }

    #[test]
    fn test_stem_line() {
        let elements = parse_elements(["S1 3..6 \"CCCC\" 11..14 \"GGGG\""]).unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind(), ElementKind::Stem);
        assert_eq!(elements[0].spans().len(), 2);
        assert_eq!(elements[0].spans()[1].start(), 11);
        assert!(elements[0].base_pairs().is_empty());
    }

    #[test]
    fn test_hairpin_line_unquoted() {
        let elements = parse_elements(["H1 6..8 CUU (5,9) C:G"]).unwrap();
        assert_eq!(elements[0].kind(), ElementKind::Hairpin);
        assert_eq!(elements[0].spans()[0].seq(), "CUU");
        assert_eq!(elements[0].base_pairs()[0].left_position(), 5);
    }

    #[test]
    fn test_bulge_and_unpaired_lines() {
        let elements = parse_elements([
            "B1 16..16 \"A\" (15,20) G:C (17,19) C:G",
            "X1 25..26 \"AA\" (24,40) A:U (27,39) G:C",
        ])
        .unwrap();
        assert_eq!(elements[0].kind(), ElementKind::Bulge);
        assert_eq!(elements[0].base_pairs().len(), 2);
        assert_eq!(elements[1].kind(), ElementKind::Unpaired);
        assert_eq!(elements[1].base_pairs().len(), 2);
    }

    #[test]
    fn test_end_and_segment_lines() {
        let elements = parse_elements([
            "E1 1..2 \"GG\"",
            "segment1 4bp 3..6 \"CCCC\" 11..14 \"GGGG\"",
        ])
        .unwrap();
        assert_eq!(elements[0].kind(), ElementKind::End);
        assert_eq!(elements[1].kind(), ElementKind::Segment);
        assert_eq!(elements[1].segment_pair_count(), Some(4));
        assert_eq!(elements[1].spans().len(), 2);
    }

    #[test]
    fn test_interior_halves_merge_into_one_element() {
        let elements = parse_elements([
            "I1.1 12..14 CUU (11,30) G:C",
            "S2 15..18 \"AAAA\" 24..27 \"UUUU\"",
            "I1.2 40..41 AG (38,9) A:U",
        ])
        .unwrap();
        // interior completes at its second half, after the stem
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].kind(), ElementKind::Stem);
        let interior = &elements[1];
        assert_eq!(interior.kind(), ElementKind::Interior);
        assert_eq!(interior.spans().len(), 2);
        assert_eq!(interior.spans()[0].seq(), "CUU");
        assert_eq!(interior.spans()[0].start(), 12);
        assert_eq!(interior.spans()[1].seq(), "AG");
        assert_eq!(interior.spans()[1].start(), 40);
        assert_eq!(interior.base_pairs().len(), 2);
        assert_eq!(interior.length(), Some(ElementLength::Pair(3, 2)));
        assert_eq!(interior.raw(), "I1.1 12..14 CUU (11,30) G:C | I1.2 40..41 AG (38,9) A:U");
    }

    #[test]
    fn test_interior_halves_with_different_ordinals_are_an_error() {
        let err = parse_elements([
            "I1.1 12..14 CUU (11,30) G:C",
            "I2.2 40..41 AG (38,9) A:U",
        ])
        .unwrap_err();
        assert!(matches!(err, RecordError::MismatchedInterior(_, _)));
    }

    #[test]
    fn test_dangling_interior_half_is_an_error() {
        let err = parse_elements(["I1.1 12..14 CUU (11,30) G:C"]).unwrap_err();
        assert!(matches!(err, RecordError::DanglingInterior(_)));
    }

    #[test]
    fn test_multiloop_lines_merge_by_ordinal() {
        let elements = parse_elements([
            "M2.1 9..10 \"AU\" (8,50) C:G (12,30) A:U",
            "M2.2 31..32 \"GC\" (30,12) U:A (35,48) G:C",
            "M2.3 49..49 \"A\" (48,35) C:G (50,8) G:C",
            "M3.1 60..61 \"AA\" (59,70) G:C (63,68) A:U",
        ])
        .unwrap();
        // the M3 line seals M2; M3 itself seals at end of stream
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].kind(), ElementKind::Multiloop);
        assert_eq!(elements[0].spans().len(), 3);
        assert_eq!(elements[0].base_pairs().len(), 6);
        assert_eq!(elements[1].spans().len(), 1);
        assert_eq!(elements[1].base_pairs().len(), 2);
    }

    #[test]
    fn test_multiloop_sealed_by_other_element_kind() {
        let elements = parse_elements([
            "M1.1 9..10 \"AU\" (8,50) C:G (12,30) A:U",
            "H2 40..42 \"CUU\" (39,43) G:C",
        ])
        .unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].kind(), ElementKind::Multiloop);
        assert_eq!(elements[1].kind(), ElementKind::Hairpin);
    }

    #[test]
    fn test_multiloop_sealed_at_end_of_stream() {
        let elements = parse_elements([
            "M1.1 9..10 \"AU\" (8,50) C:G (12,30) A:U",
            "M1.2 31..32 \"GC\" (30,12) U:A (35,48) G:C",
        ])
        .unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].spans().len(), 2);
        assert_eq!(elements[0].base_pairs().len(), 4);
        assert_eq!(
            elements[0].raw(),
            "M1.1 9..10 \"AU\" (8,50) C:G (12,30) A:U | M1.2 31..32 \"GC\" (30,12) U:A (35,48) G:C"
        );
    }

    #[test]
    fn test_zero_length_multiloop_span() {
        let elements =
            parse_elements(["M1.1 14..13 \"\" (13,40) G:C (15,30) A:U"]).unwrap();
        assert!(elements[0].spans()[0].is_empty());
        assert_eq!(elements[0].spans()[0].start(), 14);
    }

    #[test]
    fn test_wrong_token_count_is_fatal() {
        let err = parse_elements(["H1 6..8 CUU (5,9)"]).unwrap_err();
        assert!(matches!(err, RecordError::TokenCount { found: 4, .. }));
        let err = parse_elements(["segment1 4bp 3..6"]).unwrap_err();
        assert!(matches!(err, RecordError::TokenCount { .. }));
    }

    #[test]
    fn test_unknown_tag_is_fatal() {
        let err = parse_elements(["PK1 1..2 \"GG\""]).unwrap_err();
        assert!(matches!(err, RecordError::UnknownTag(_)));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let elements = parse_elements(["", "  ", "E1 1..2 \"GG\""]).unwrap();
        assert_eq!(elements.len(), 1);
    }
}
