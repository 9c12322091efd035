use crate::DotBracketVec;
use crate::PairTable;
use crate::StructuralElement;
use crate::StructureError;

/// One fully parsed bpRNA record: the transcript sequence, its dot-bracket
/// string, the parallel per-position annotation and validation strings, and
/// the ordered structural elements. Read-only after construction; elements do
/// not outlive the structure that owns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryStructure {
    reference_id: Option<String>,
    sequence: String,
    dot_bracket: DotBracketVec,
    annotation: String,
    validation: String,
    elements: Vec<StructuralElement>,
}

impl SecondaryStructure {
    /// All per-position strings must agree in length with the sequence.
    pub fn new(
        reference_id: Option<String>,
        sequence: impl Into<String>,
        dot_bracket: DotBracketVec,
        annotation: impl Into<String>,
        validation: impl Into<String>,
        elements: Vec<StructuralElement>,
    ) -> Result<Self, StructureError> {
        let sequence = sequence.into();
        let annotation = annotation.into();
        let validation = validation.into();
        let expected = sequence.chars().count();

        if dot_bracket.len() != expected {
            return Err(StructureError::LengthMismatch {
                field: "dot-bracket string",
                found: dot_bracket.len(),
                expected,
            });
        }
        if annotation.chars().count() != expected {
            return Err(StructureError::LengthMismatch {
                field: "annotation string",
                found: annotation.chars().count(),
                expected,
            });
        }
        if validation.chars().count() != expected {
            return Err(StructureError::LengthMismatch {
                field: "validation string",
                found: validation.chars().count(),
                expected,
            });
        }

        Ok(SecondaryStructure {
            reference_id,
            sequence,
            dot_bracket,
            annotation,
            validation,
            elements,
        })
    }

    pub fn reference_id(&self) -> Option<&str> {
        self.reference_id.as_deref()
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn dot_bracket(&self) -> &DotBracketVec {
        &self.dot_bracket
    }

    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    pub fn validation(&self) -> &str {
        &self.validation
    }

    pub fn elements(&self) -> &[StructuralElement] {
        &self.elements
    }

    /// Number of nucleotides.
    pub fn len(&self) -> usize {
        self.dot_bracket.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dot_bracket.is_empty()
    }

    /// The base-pair partner table of the dot-bracket string.
    pub fn pair_table(&self) -> Result<PairTable, StructureError> {
        PairTable::try_from(&self.dot_bracket)
    }

    /// Check the coverage invariant: every position 1..=L lies inside at
    /// least one element span.
    pub fn covers_all_positions(&self) -> bool {
        (1..=self.len()).all(|pos| {
            self.elements.iter().any(|e| e.contains(pos).is_some())
        })
    }
}
