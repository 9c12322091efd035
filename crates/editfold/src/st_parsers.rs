//! Reader for bpRNA `.st` files holding one or more annotated records.
//!
//! Record layout:
//! - one or more `#` header lines (`#Name: ...` carries the reference id)
//! - sequence line
//! - dot-bracket line
//! - per-position annotation line
//! - annotation validation line
//! - element-description lines until the next header
//!
//! A malformed record aborts that record only: it is reported with its id and
//! skipped, so a file with thousands of isoforms survives one bad entry.

use std::fs::File;
use std::io::{stdin, BufRead, BufReader, Cursor};
use std::path::Path;

use anyhow::{anyhow, Result};
use colored::*;
use log::warn;
use paste::paste;

use ef_structure::parse_elements;
use ef_structure::DotBracketVec;
use ef_structure::SecondaryStructure;

const RECORD_MARKER: char = '#';
const NAME_PREFIX: &str = "#Name:";

/// One raw record block before any interpretation.
struct RawRecord {
    name: Option<String>,
    lines: Vec<String>,
}

fn split_records<R: BufRead>(reader: R) -> Result<Vec<RawRecord>> {
    let mut records: Vec<RawRecord> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with(RECORD_MARKER) {
            // a header line after body lines opens the next record
            let continues_header = records
                .last()
                .map(|r| r.lines.is_empty())
                .unwrap_or(false);
            if !continues_header {
                records.push(RawRecord { name: None, lines: Vec::new() });
            }
            if let Some(record) = records.last_mut() {
                if record.name.is_none() && trimmed.starts_with(NAME_PREFIX) {
                    record.name = Some(trimmed[NAME_PREFIX.len()..].trim().to_string());
                }
            }
        } else if let Some(record) = records.last_mut() {
            record.lines.push(trimmed.to_string());
        }
        // text before the first record marker is skipped
    }

    Ok(records)
}

fn parse_record(raw: &RawRecord) -> Result<SecondaryStructure> {
    let mut lines = raw.lines.iter();

    let sequence = lines.next().ok_or_else(|| anyhow!("missing sequence line"))?;
    let dot_bracket_line = lines.next().ok_or_else(|| anyhow!("missing dot-bracket line"))?;
    let annotation = lines.next().ok_or_else(|| anyhow!("missing annotation line"))?;
    let validation = lines.next().ok_or_else(|| anyhow!("missing validation line"))?;

    let dot_bracket = DotBracketVec::try_from(dot_bracket_line.as_str())?;
    let elements = parse_elements(lines)?;

    let structure = SecondaryStructure::new(
        raw.name.clone(),
        sequence,
        dot_bracket,
        annotation,
        validation,
        elements,
    )?;
    // rejects unbalanced brackets, which the token-level parse accepts
    structure.pair_table()?;

    Ok(structure)
}

/// Parse all records, skipping (with a warning) any record that fails.
pub fn read_st<R: BufRead>(reader: R) -> Result<Vec<SecondaryStructure>> {
    let mut structures = Vec::new();
    for (index, raw) in split_records(reader)?.iter().enumerate() {
        match parse_record(raw) {
            Ok(ss) => structures.push(ss),
            Err(e) => {
                let label = raw.name.as_deref().unwrap_or("<unnamed>");
                warn!("{} skipping record {} ({}): {}", "WARNING:".red(), index + 1, label, e);
            }
        }
    }
    Ok(structures)
}

/// Parse all records, failing on the first malformed one.
pub fn read_st_strict<R: BufRead>(reader: R) -> Result<Vec<SecondaryStructure>> {
    split_records(reader)?
        .iter()
        .map(|raw| {
            parse_record(raw).map_err(|e| {
                let label = raw.name.as_deref().unwrap_or("<unnamed>");
                anyhow!("record {}: {}", label, e)
            })
        })
        .collect()
}

/// Generate input adapters for a base parser function
/// `fn base<R: BufRead>(R) -> Result<T>`.
///
/// This expands into:
/// - `base_string(&str)`
/// - `base_file<P: AsRef<Path>>(P)`
/// - `base_stdin()`
/// - `base_input(&str)`  (dispatches "-" → stdin, otherwise → file)
macro_rules! define_input_variants {
    ($base:ident, $ret:ty) => {
        paste! {
            /// Read from a string buffer.
            pub fn [<$base _string>](s: &str) -> $ret {
                $base(Cursor::new(s))
            }

            /// Read from a file path.
            pub fn [<$base _file>]<P: AsRef<Path>>(path: P) -> $ret {
                let reader = BufReader::new(File::open(path)?);
                $base(reader)
            }

            /// Read from stdin.
            pub fn [<$base _stdin>]() -> $ret {
                let reader = BufReader::new(stdin());
                $base(reader)
            }

            /// Read either from stdin ("-") or a file path.
            pub fn [<$base _input>](s: &str) -> $ret {
                if s == "-" {
                    [<$base _stdin>]()
                } else {
                    [<$base _file>](s)
                }
            }
        }
    };
}

type StResult = Result<Vec<SecondaryStructure>>;

define_input_variants!(read_st, StResult);
define_input_variants!(read_st_strict, StResult);

#[cfg(test)]
mod tests {
    use super::*;
    use ef_structure::ElementKind;

    const TWO_RECORDS: &str = "\
#Name: isoform_001
#Length: 16
#PageNumber: 1
GGCCCCAAAAGGGGCC
..((((....))))..
EESSSSHHHHSSSSEE
NNNNNNNNNNNNNNNN
E1 1..2 \"GG\"
S1 3..6 \"CCCC\" 11..14 \"GGGG\"
H1 7..10 \"AAAA\" (6,11) C:G
E2 15..16 \"CC\"
#Name: isoform_002
#Length: 5
GGAAA
.....
EEEEE
NNNNN
E1 1..5 \"GGAAA\"
";

    #[test]
    fn test_read_two_records() {
        let structures = read_st_string(TWO_RECORDS).unwrap();
        assert_eq!(structures.len(), 2);
        assert_eq!(structures[0].reference_id(), Some("isoform_001"));
        assert_eq!(structures[0].len(), 16);
        assert_eq!(structures[0].elements().len(), 4);
        assert_eq!(structures[0].elements()[1].kind(), ElementKind::Stem);
        assert_eq!(structures[1].reference_id(), Some("isoform_002"));
        assert_eq!(structures[1].elements().len(), 1);
    }

    #[test]
    fn test_coverage_of_parsed_record() {
        let structures = read_st_string(TWO_RECORDS).unwrap();
        assert!(structures[0].covers_all_positions());
        assert!(structures[1].covers_all_positions());
    }

    #[test]
    fn test_malformed_record_is_skipped() {
        let input = "\
#Name: bad
GGAAA
...((
EEEEE
NNNNN
E1 1..5 \"GGAAA\"
#Name: good
GG
..
EE
NN
E1 1..2 \"GG\"
";
        let structures = read_st(Cursor::new(input)).unwrap();
        assert_eq!(structures.len(), 1);
        assert_eq!(structures[0].reference_id(), Some("good"));
    }

    #[test]
    fn test_strict_reader_fails_on_malformed_record() {
        let input = "\
#Name: bad
GGAAA
.....
EEEEE
NNNNN
H1 1..5
";
        let err = read_st_strict(Cursor::new(input)).unwrap_err();
        assert!(format!("{}", err).contains("bad"));
    }

    #[test]
    fn test_truncated_record_reports_missing_line() {
        let input = "#Name: stub\nGGAAA\n.....\n";
        let structures = read_st(Cursor::new(input)).unwrap();
        assert!(structures.is_empty());
    }

    #[test]
    fn test_leading_junk_skipped() {
        let input = format!("stray line\n\n{}", TWO_RECORDS);
        let structures = read_st_string(&input).unwrap();
        assert_eq!(structures.len(), 2);
    }
}
