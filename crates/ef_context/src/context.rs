use std::fmt;

use nohash_hasher::IntMap;

use ef_structure::ElementKind;
use ef_structure::SecondaryStructure;
use ef_structure::Span;
use ef_structure::StructuralElement;

/// Relation of one element to the editing position. The three variants are
/// jointly exhaustive and mutually exclusive: `After` is defined as "neither
/// contains nor before", never as an independent predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    Contain,
    Before,
    After,
}

impl ContextKind {
    pub fn describe(&self) -> &'static str {
        match self {
            ContextKind::Contain => "contains the editing site",
            ContextKind::Before => "5' of the editing site",
            ContextKind::After => "3' of the editing site",
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextKind::Contain => write!(f, "contain"),
            ContextKind::Before => write!(f, "before"),
            ContextKind::After => write!(f, "after"),
        }
    }
}

/// One classified element.
#[derive(Debug, Clone, Copy)]
pub struct ContextItem<'a> {
    pub kind: ContextKind,
    pub element: &'a StructuralElement,
}

impl fmt::Display for ContextItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} | {}]", self.kind, self.element)
    }
}

/// The structural context of one editing position within one transcript.
///
/// Every element of the structure is classified; additionally each signed
/// distance maps to the single closest element achieving it. When two
/// elements sit at the same distance, the one appearing earlier in the
/// structure's element order wins. Segment elements are classified but never
/// enter the distance index.
pub struct EditingContext<'a> {
    structure: &'a SecondaryStructure,
    position: usize,
    items: Vec<ContextItem<'a>>,
    by_distance: IntMap<i64, (usize, &'a Span)>,
}

impl<'a> EditingContext<'a> {
    /// Classify every element of `structure` against `position`.
    ///
    /// Positions outside `[1, L]` are normal inputs near transcript
    /// boundaries, not a corruption: they yield an empty context.
    pub fn analyze(structure: &'a SecondaryStructure, position: usize) -> Self {
        let mut context = EditingContext {
            structure,
            position,
            items: Vec::new(),
            by_distance: IntMap::default(),
        };

        if position == 0 || position > structure.len() {
            return context;
        }

        for element in structure.elements() {
            let kind = if element.contains(position).is_some() {
                ContextKind::Contain
            } else if element.is_before(position) {
                ContextKind::Before
            } else {
                ContextKind::After
            };

            let index = context.items.len();
            context.items.push(ContextItem { kind, element });

            if let Some((distance, span)) = element.distance(position) {
                context.by_distance.entry(distance).or_insert((index, span));
            }
        }

        context
    }

    pub fn structure(&self) -> &'a SecondaryStructure {
        self.structure
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn items(&self) -> &[ContextItem<'a>] {
        &self.items
    }

    pub fn has_result(&self) -> bool {
        !self.items.is_empty()
    }

    /// The element containing the editing position, if any.
    pub fn containing(&self) -> Option<&ContextItem<'a>> {
        self.items.iter().find(|item| item.kind == ContextKind::Contain)
    }

    /// The closest element at exactly this signed distance, with the span
    /// that achieves the distance.
    pub fn at_distance(&self, distance: i64) -> Option<(&ContextItem<'a>, &'a Span)> {
        self.by_distance.get(&distance).map(|&(index, span)| (&self.items[index], span))
    }

    /// Sub-list of items filtered by context kind and/or element kind.
    pub fn items_with(
        &self,
        context_kinds: Option<&[ContextKind]>,
        element_kinds: Option<&[ElementKind]>,
    ) -> Vec<ContextItem<'a>> {
        self.items
            .iter()
            .filter(|item| context_kinds.is_none_or(|ks| ks.contains(&item.kind)))
            .filter(|item| element_kinds.is_none_or(|ks| ks.contains(&item.element.kind())))
            .copied()
            .collect()
    }

    /// The `n` nearest elements 5' of the editing position, closest first
    /// (distances -1, -2, ...).
    pub fn nearest_upstream(&self, n: usize) -> Vec<(i64, ContextItem<'a>)> {
        let mut distances: Vec<i64> =
            self.by_distance.keys().copied().filter(|&d| d < 0).collect();
        distances.sort_unstable_by(|a, b| b.cmp(a));
        distances
            .into_iter()
            .take(n)
            .map(|d| (d, self.items[self.by_distance[&d].0]))
            .collect()
    }

    /// The `n` nearest elements 3' of the editing position, closest first
    /// (distances 1, 2, ...).
    pub fn nearest_downstream(&self, n: usize) -> Vec<(i64, ContextItem<'a>)> {
        let mut distances: Vec<i64> =
            self.by_distance.keys().copied().filter(|&d| d > 0).collect();
        distances.sort_unstable();
        distances
            .into_iter()
            .take(n)
            .map(|d| (d, self.items[self.by_distance[&d].0]))
            .collect()
    }
}

impl fmt::Display for EditingContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.structure.reference_id().unwrap_or("?");
        write!(f, "[{} | {} |", id, self.position)?;
        for item in &self.items {
            write!(f, " {}", item)?;
        }
        write!(f, "]")
    }
}
