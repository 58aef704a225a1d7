//! Transitive closures over class and property hierarchies.
//!
//! All closures are breadth-first walks with a visited set, so cyclic
//! vocabularies terminate. Literal and blank-node seeds carry no vocabulary
//! meaning and are dropped.

use std::collections::{BTreeSet, VecDeque};

use crate::error::Result;
use crate::model::Term;
use crate::ontology::OntologyFacts;
use crate::vocab::{OWL_SYMMETRIC_PROPERTY, OWL_THING, RDFS_RESOURCE, SCHEMA_THING};

/// Universal base classes appended as a final stratum by [`type_is`].
pub const UNIVERSAL_BASES: [&str; 3] = [RDFS_RESOURCE, OWL_THING, SCHEMA_THING];

/// Classes grouped by distance from the seed types.
///
/// Layer 0 holds the seeds and their equivalents; each later layer holds the
/// superclasses of the previous one (with equivalents). Every class appears
/// in exactly one layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeStrata {
    layers: Vec<Vec<Term>>,
}

impl TypeStrata {
    /// The layers, nearest first.
    #[must_use]
    pub fn layers(&self) -> &[Vec<Term>] {
        &self.layers
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true if there are no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Returns true if `class` is in any layer.
    #[must_use]
    pub fn contains(&self, class: &Term) -> bool {
        self.layers.iter().any(|l| l.contains(class))
    }

    /// The layer index holding `class`.
    #[must_use]
    pub fn depth_of(&self, class: &Term) -> Option<usize> {
        self.layers.iter().position(|l| l.contains(class))
    }

    /// Every class, nearest first.
    #[must_use]
    pub fn flatten(&self) -> Vec<Term> {
        self.layers.iter().flatten().cloned().collect()
    }

    /// Appends a layer if it is non-empty.
    pub fn push_layer(&mut self, layer: Vec<Term>) {
        if !layer.is_empty() {
            self.layers.push(layer);
        }
    }

    /// Consumes the strata, returning the layers.
    #[must_use]
    pub fn into_layers(self) -> Vec<Vec<Term>> {
        self.layers
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Up,
    Down,
}

/// Adds the equivalence closure of `layer` to itself, skipping `seen`.
fn with_equivalents(
    facts: &dyn OntologyFacts,
    layer: Vec<Term>,
    seen: &mut BTreeSet<Term>,
) -> Result<Vec<Term>> {
    let mut out = Vec::new();
    let mut queue: VecDeque<Term> = layer.into();
    while let Some(class) = queue.pop_front() {
        if !seen.insert(class.clone()) {
            continue;
        }
        for eq in facts.equivalent_classes(&class)? {
            if !seen.contains(&eq) {
                queue.push_back(eq);
            }
        }
        out.push(class);
    }
    Ok(out)
}

fn stratify(
    facts: &dyn OntologyFacts,
    seeds: &[Term],
    direction: Direction,
) -> Result<Vec<Vec<Term>>> {
    let mut seen = BTreeSet::new();
    let mut layers = Vec::new();
    let mut frontier: Vec<Term> = Vec::new();
    for seed in seeds.iter().filter(|t| t.is_iri()) {
        if !frontier.contains(seed) {
            frontier.push(seed.clone());
        }
    }
    while !frontier.is_empty() {
        let layer = with_equivalents(facts, frontier, &mut seen)?;
        let mut next = Vec::new();
        for class in &layer {
            let step = match direction {
                Direction::Up => facts.super_classes(class)?,
                Direction::Down => facts.sub_classes(class)?,
            };
            for c in step {
                if !seen.contains(&c) && !next.contains(&c) {
                    next.push(c);
                }
            }
        }
        if !layer.is_empty() {
            layers.push(layer);
        }
        frontier = next;
    }
    tracing::trace!(seeds = seeds.len(), layers = layers.len(), "stratified types");
    Ok(layers)
}

/// Ancestor classes of `seeds`, grouped into strata by distance.
///
/// # Errors
///
/// Propagates errors from `facts`.
pub fn type_strata(facts: &dyn OntologyFacts, seeds: &[Term]) -> Result<TypeStrata> {
    Ok(TypeStrata {
        layers: stratify(facts, seeds, Direction::Up)?,
    })
}

/// Descendant classes of `seeds` (the seeds included), nearest first.
///
/// # Errors
///
/// Propagates errors from `facts`.
pub fn descendant_types(facts: &dyn OntologyFacts, seeds: &[Term]) -> Result<Vec<Term>> {
    Ok(stratify(facts, seeds, Direction::Down)?
        .into_iter()
        .flatten()
        .collect())
}

/// How close `types` come to any of `reference`.
///
/// Returns the index of the first stratum of `types` (with the universal
/// bases appended as a final stratum) intersecting `reference`, or `None`.
///
/// # Errors
///
/// Propagates errors from `facts`.
pub fn type_is(
    facts: &dyn OntologyFacts,
    types: &[Term],
    reference: &[Term],
) -> Result<Option<usize>> {
    let mut strata = type_strata(facts, types)?;
    let bases: Vec<Term> = UNIVERSAL_BASES
        .iter()
        .map(|b| Term::iri(*b))
        .filter(|b| !strata.contains(b))
        .collect();
    strata.push_layer(bases);
    Ok(strata
        .layers()
        .iter()
        .position(|layer| layer.iter().any(|c| reference.contains(c))))
}

/// The predicates implied by `seeds`: the seeds, their equivalents and
/// every (transitive) subproperty.
///
/// The result is closed: passing it back in returns the same set.
///
/// # Errors
///
/// Propagates errors from `facts`.
pub fn predicate_set<'a>(
    facts: &dyn OntologyFacts,
    seeds: impl IntoIterator<Item = &'a Term>,
) -> Result<BTreeSet<Term>> {
    let mut out = BTreeSet::new();
    let mut queue: VecDeque<Term> = seeds.into_iter().filter(|t| t.is_iri()).cloned().collect();
    while let Some(p) = queue.pop_front() {
        if !out.insert(p.clone()) {
            continue;
        }
        for q in facts.equivalent_properties(&p)? {
            if !out.contains(&q) {
                queue.push_back(q);
            }
        }
        for q in facts.sub_properties(&p)? {
            if !out.contains(&q) {
                queue.push_back(q);
            }
        }
    }
    tracing::trace!(predicates = out.len(), "predicate closure");
    Ok(out)
}

/// Returns true if `property` is symmetric: declared so directly, or one of
/// its types (or an ancestor of one) is `owl:SymmetricProperty`.
///
/// # Errors
///
/// Propagates errors from `facts`.
pub fn is_symmetric(facts: &dyn OntologyFacts, property: &Term) -> Result<bool> {
    if facts.is_symmetric(property)? {
        return Ok(true);
    }
    let types: Vec<Term> = facts.types_of(property)?.into_iter().collect();
    if types.is_empty() {
        return Ok(false);
    }
    Ok(type_strata(facts, &types)?.contains(&Term::iri(OWL_SYMMETRIC_PROPERTY)))
}

/// The properties walked in the opposite direction for `predicates`:
/// declared inverses, plus the predicate itself when it is symmetric.
///
/// # Errors
///
/// Propagates errors from `facts`.
pub fn reverse_predicates<'a>(
    facts: &dyn OntologyFacts,
    predicates: impl IntoIterator<Item = &'a Term>,
) -> Result<BTreeSet<Term>> {
    let mut out = BTreeSet::new();
    for p in predicates {
        out.extend(facts.inverse_properties(p)?);
        if is_symmetric(facts, p)? {
            out.insert(p.clone());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Statement;
    use crate::ontology::OntologyIndex;
    use crate::vocab::*;

    fn iri(s: &str) -> Term {
        Term::iri(s)
    }

    fn index(axioms: &[(&str, &str, &str)]) -> OntologyIndex {
        let mut idx = OntologyIndex::empty();
        for (s, p, o) in axioms {
            idx.add(&Statement::new(iri(s), iri(p), iri(o)));
        }
        idx
    }

    #[test]
    fn strata_partition_and_order() -> Result<()> {
        let idx = index(&[
            ("ex:A", RDFS_SUBCLASS_OF, "ex:B"),
            ("ex:A", OWL_EQUIVALENT_CLASS, "ex:A2"),
            ("ex:B", RDFS_SUBCLASS_OF, "ex:C"),
            ("ex:A2", RDFS_SUBCLASS_OF, "ex:C"),
        ]);
        let strata = type_strata(&idx, &[iri("ex:A")])?;
        assert_eq!(strata.layers()[0], vec![iri("ex:A"), iri("ex:A2")]);
        // C is reachable from both layers but lands in the nearest one.
        assert_eq!(strata.depth_of(&iri("ex:C")), Some(1));
        assert_eq!(strata.depth_of(&iri("ex:B")), Some(1));
        let flat = strata.flatten();
        let unique: BTreeSet<_> = flat.iter().collect();
        assert_eq!(flat.len(), unique.len());
        Ok(())
    }

    #[test]
    fn cycles_terminate() -> Result<()> {
        let idx = index(&[
            ("ex:A", RDFS_SUBCLASS_OF, "ex:B"),
            ("ex:B", RDFS_SUBCLASS_OF, "ex:A"),
        ]);
        let strata = type_strata(&idx, &[iri("ex:A")])?;
        assert_eq!(strata.len(), 2);
        Ok(())
    }

    #[test]
    fn literal_and_blank_seeds_dropped() -> Result<()> {
        let idx = OntologyIndex::empty();
        let strata = type_strata(&idx, &[Term::string("x"), Term::blank("b")])?;
        assert!(strata.is_empty());
        Ok(())
    }

    #[test]
    fn descending_flattens() -> Result<()> {
        let idx = index(&[
            ("ex:B", RDFS_SUBCLASS_OF, "ex:A"),
            ("ex:C", RDFS_SUBCLASS_OF, "ex:B"),
        ]);
        assert_eq!(
            descendant_types(&idx, &[iri("ex:A")])?,
            vec![iri("ex:A"), iri("ex:B"), iri("ex:C")]
        );
        Ok(())
    }

    #[test]
    fn type_is_uses_bases() -> Result<()> {
        let idx = index(&[("ex:Essay", RDFS_SUBCLASS_OF, FOAF_DOCUMENT)]);
        let essay = [iri("ex:Essay")];
        assert_eq!(type_is(&idx, &essay, &[iri(FOAF_DOCUMENT)])?, Some(1));
        assert_eq!(type_is(&idx, &essay, &[iri(RDFS_RESOURCE)])?, Some(2));
        assert_eq!(type_is(&idx, &essay, &[iri(FOAF_AGENT)])?, None);
        assert_eq!(type_is(&idx, &[], &[iri(OWL_THING)])?, Some(0));
        Ok(())
    }

    #[test]
    fn predicate_set_is_closed() -> Result<()> {
        let idx = OntologyIndex::core();
        let once = predicate_set(&idx, [&iri(DC11_TITLE)])?;
        assert!(once.contains(&iri(DCT_TITLE)));
        let twice = predicate_set(&idx, &once)?;
        assert_eq!(once, twice);
        let desc = predicate_set(&idx, [&iri(DC11_DESCRIPTION)])?;
        assert!(desc.contains(&iri(DCT_ABSTRACT)), "subproperties are transitive");
        Ok(())
    }

    #[test]
    fn symmetric_via_metaclass() -> Result<()> {
        let mut idx = index(&[("ex:Sym", RDFS_SUBCLASS_OF, OWL_SYMMETRIC_PROPERTY)]);
        idx.add(&Statement::new(iri("ex:knows"), iri(RDF_TYPE), iri("ex:Sym")));
        assert!(is_symmetric(&idx, &iri("ex:knows"))?);
        assert!(is_symmetric(&OntologyIndex::core(), &iri(OWL_SAME_AS))?);
        assert!(!is_symmetric(&idx, &iri(RDFS_LABEL))?);
        let rev = reverse_predicates(&OntologyIndex::core(), [&iri(DCT_HAS_PART)])?;
        assert!(rev.contains(&iri(DCT_IS_PART_OF)));
        Ok(())
    }
}
