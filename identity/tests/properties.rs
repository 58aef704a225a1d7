//! Property-based tests for closures, ordering and label lookup.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use graph_identity::closure::{predicate_set, type_strata};
use graph_identity::identity::cmp_resource;
use graph_identity::vocab::{
    DCT_TITLE, FOAF_NAME, OWL_EQUIVALENT_CLASS, OWL_EQUIVALENT_PROPERTY, OWL_INVERSE_OF,
    RDFS_COMMENT, RDFS_LABEL, RDFS_SUBCLASS_OF, RDFS_SUBPROPERTY_OF, RDF_TYPE, SKOS_PREF_LABEL,
};
use graph_identity::{
    LabelOptions, MemoryGraph, OntologyIndex, Resolver, ResolverConfig, Statement, Term,
};
use proptest::prelude::*;

fn node(prefix: &str, i: u8) -> Term {
    Term::iri(format!("https://ex.org/{prefix}{i}"))
}

fn index(edges: &[(u8, u8, u8)], prefix: &str, predicates: &[&str]) -> OntologyIndex {
    let mut facts = OntologyIndex::core();
    for (a, kind, b) in edges {
        let p = predicates[usize::from(*kind) % predicates.len()];
        facts.add(&Statement::new(node(prefix, *a), Term::iri(p), node(prefix, *b)));
    }
    facts
}

fn edges() -> impl Strategy<Value = Vec<(u8, u8, u8)>> {
    prop::collection::vec((0u8..8, 0u8..3, 0u8..8), 0..16)
}

fn seeds() -> impl Strategy<Value = BTreeSet<u8>> {
    prop::collection::btree_set(0u8..8, 0..4)
}

fn resource() -> impl Strategy<Value = Term> {
    let scheme = prop::sample::select(vec!["http", "https", "ftp"]);
    let host = prop::sample::select(vec!["ex.org", "www.ex.org", "a.org", "www.a.org"]);
    let tail = prop::sample::select(vec!["/", "/x", "/y", "/y#f", "/x?q=1"]);
    (scheme, host, tail).prop_map(|(s, h, t)| Term::iri(format!("{s}://{h}{t}")))
}

// =============================================================================
// Closures
// =============================================================================

proptest! {
    /// predicate_set is idempotent over arbitrary (possibly cyclic) hierarchies.
    #[test]
    fn prop_predicate_set_idempotent(edges in edges(), seeds in seeds()) {
        let facts = index(
            &edges,
            "p",
            &[RDFS_SUBPROPERTY_OF, OWL_EQUIVALENT_PROPERTY, OWL_INVERSE_OF],
        );
        let seeds: Vec<Term> = seeds.into_iter().map(|i| node("p", i)).collect();
        let once = predicate_set(&facts, &seeds).expect("closure");
        let twice = predicate_set(&facts, &once).expect("closure");
        prop_assert_eq!(once, twice);
    }

    /// Every class of a stratification appears in exactly one layer.
    #[test]
    fn prop_strata_partition(edges in edges(), seeds in seeds()) {
        let facts = index(&edges, "c", &[RDFS_SUBCLASS_OF, OWL_EQUIVALENT_CLASS, RDFS_SUBCLASS_OF]);
        let seeds: Vec<Term> = seeds.into_iter().map(|i| node("c", i)).collect();
        let strata = type_strata(&facts, &seeds).expect("strata");
        let flat = strata.flatten();
        let unique: BTreeSet<&Term> = flat.iter().collect();
        prop_assert_eq!(unique.len(), flat.len());
        for seed in &seeds {
            prop_assert_eq!(strata.depth_of(seed), Some(0));
        }
    }
}

// =============================================================================
// Resource ordering
// =============================================================================

proptest! {
    /// cmp_resource is antisymmetric and only equal for identical terms.
    #[test]
    fn prop_cmp_antisymmetric(a in resource(), b in resource(), www in any::<Option<bool>>()) {
        let ab = cmp_resource(&a, &b, www);
        prop_assert_eq!(ab, cmp_resource(&b, &a, www).reverse());
        prop_assert_eq!(ab == Ordering::Equal, a == b);
    }

    /// cmp_resource is transitive.
    #[test]
    fn prop_cmp_transitive(
        a in resource(),
        b in resource(),
        c in resource(),
        www in any::<Option<bool>>(),
    ) {
        let mut v = [a, b, c];
        v.sort_by(|x, y| cmp_resource(x, y, www));
        prop_assert_ne!(cmp_resource(&v[0], &v[1], www), Ordering::Greater);
        prop_assert_ne!(cmp_resource(&v[1], &v[2], www), Ordering::Greater);
        prop_assert_ne!(cmp_resource(&v[0], &v[2], www), Ordering::Greater);
    }

    /// Literals and blank nodes always sort after IRIs.
    #[test]
    fn prop_iris_first(a in resource(), s in "[a-z]{1,8}", www in any::<Option<bool>>()) {
        prop_assert_eq!(cmp_resource(&a, &Term::string(s.clone()), www), Ordering::Less);
        prop_assert_eq!(cmp_resource(&a, &Term::blank(s), www), Ordering::Less);
    }
}

// =============================================================================
// Labels
// =============================================================================

const LABEL_PREDICATES: [&str; 5] = [RDFS_LABEL, SKOS_PREF_LABEL, DCT_TITLE, FOAF_NAME, RDFS_COMMENT];
const TYPES: [&str; 4] = [
    "http://xmlns.com/foaf/0.1/Person",
    "http://xmlns.com/foaf/0.1/Document",
    "http://purl.org/ontology/bibo/Document",
    "https://ex.org/Other",
];

proptest! {
    /// label_for is the head of labels_for.
    #[test]
    fn prop_label_unique_is_first(
        literals in prop::collection::vec((0usize..5, "[a-z]{1,6}"), 0..8),
        types in prop::collection::btree_set(0usize..4, 0..3),
        description in any::<bool>(),
        alt in any::<bool>(),
    ) {
        let subject = Term::iri("https://ex.org/s");
        let mut graph = MemoryGraph::new();
        for (p, value) in &literals {
            graph.add(subject.clone(), LABEL_PREDICATES[*p], Term::string(value.clone())).expect("add");
        }
        for t in &types {
            graph.add(subject.clone(), RDF_TYPE, Term::iri(TYPES[*t])).expect("add");
        }
        let facts = OntologyIndex::core();
        let resolver = Resolver::new(&graph, &facts, ResolverConfig::default());
        let opts = LabelOptions { description, alt, types: None };
        let all = resolver.labels_for(&subject, &opts, None).expect("labels");
        let first = resolver.label_for(&subject, &opts, None).expect("label");
        prop_assert_eq!(first.as_ref(), all.first());
        let unique: BTreeSet<_> = all.iter().collect();
        prop_assert_eq!(unique.len(), all.len());
    }
}
