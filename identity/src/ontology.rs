//! Vocabulary facts: class and property relationships.
//!
//! [`OntologyFacts`] is the seam between the resolver and whatever knows
//! how classes and properties relate. [`OntologyIndex`] is the bundled
//! implementation. It is built from schema statements in one or more graphs,
//! on top of a small set of core axioms over the vocabularies the resolver
//! consults by default.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::Result;
use crate::graph::Graph;
use crate::model::{Statement, Term};
use crate::vocab::*;

/// Direct (one-step) relationships between vocabulary terms.
///
/// Every method returns direct neighbors only; the closure engine computes
/// transitive closures. Implementations return IRIs only.
pub trait OntologyFacts: Send + Sync {
    /// Classes declared equivalent to `class`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`](crate::Error::Backend) if the facts cannot be read.
    fn equivalent_classes(&self, class: &Term) -> Result<BTreeSet<Term>>;

    /// Direct superclasses of `class`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`](crate::Error::Backend) if the facts cannot be read.
    fn super_classes(&self, class: &Term) -> Result<BTreeSet<Term>>;

    /// Direct subclasses of `class`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`](crate::Error::Backend) if the facts cannot be read.
    fn sub_classes(&self, class: &Term) -> Result<BTreeSet<Term>>;

    /// Properties declared equivalent to `property`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`](crate::Error::Backend) if the facts cannot be read.
    fn equivalent_properties(&self, property: &Term) -> Result<BTreeSet<Term>>;

    /// Direct superproperties of `property`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`](crate::Error::Backend) if the facts cannot be read.
    fn super_properties(&self, property: &Term) -> Result<BTreeSet<Term>>;

    /// Direct subproperties of `property`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`](crate::Error::Backend) if the facts cannot be read.
    fn sub_properties(&self, property: &Term) -> Result<BTreeSet<Term>>;

    /// Declared inverses of `property`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`](crate::Error::Backend) if the facts cannot be read.
    fn inverse_properties(&self, property: &Term) -> Result<BTreeSet<Term>>;

    /// Returns true if `property` is directly declared symmetric.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`](crate::Error::Backend) if the facts cannot be read.
    fn is_symmetric(&self, property: &Term) -> Result<bool>;

    /// Asserted `rdf:type`s of a vocabulary term.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`](crate::Error::Backend) if the facts cannot be read.
    fn types_of(&self, term: &Term) -> Result<BTreeSet<Term>>;
}

/// Axioms every [`OntologyIndex`] starts from, as `(subject, predicate, object)`.
pub const CORE_AXIOMS: &[(&str, &str, &str)] = &[
    (OWL_SAME_AS, RDF_TYPE, OWL_SYMMETRIC_PROPERTY),
    (OWL_THING, OWL_EQUIVALENT_CLASS, RDFS_RESOURCE),
    (OWL_THING, OWL_EQUIVALENT_CLASS, SCHEMA_THING),
    (RDFS_CLASS, RDFS_SUBCLASS_OF, RDFS_RESOURCE),
    (FOAF_DOCUMENT, RDFS_SUBCLASS_OF, OWL_THING),
    (FOAF_AGENT, RDFS_SUBCLASS_OF, OWL_THING),
    (FOAF_PERSON, RDFS_SUBCLASS_OF, FOAF_AGENT),
    (FOAF_ORGANIZATION, RDFS_SUBCLASS_OF, FOAF_AGENT),
    (BIBO_DOCUMENT, RDFS_SUBCLASS_OF, FOAF_DOCUMENT),
    (OWL_SYMMETRIC_PROPERTY, RDFS_SUBCLASS_OF, OWL_OBJECT_PROPERTY),
    (DCT_TITLE, RDFS_SUBPROPERTY_OF, DC11_TITLE),
    (DCT_DESCRIPTION, RDFS_SUBPROPERTY_OF, DC11_DESCRIPTION),
    (DCT_ABSTRACT, RDFS_SUBPROPERTY_OF, DCT_DESCRIPTION),
    (DCT_CREATED, RDFS_SUBPROPERTY_OF, DCT_DATE),
    (DCT_MODIFIED, RDFS_SUBPROPERTY_OF, DCT_DATE),
    (DCT_ISSUED, RDFS_SUBPROPERTY_OF, DCT_DATE),
    (DCT_HAS_PART, OWL_INVERSE_OF, DCT_IS_PART_OF),
    (DCT_REPLACES, OWL_INVERSE_OF, DCT_IS_REPLACED_BY),
    (SKOS_PREF_LABEL, RDFS_SUBPROPERTY_OF, RDFS_LABEL),
    (SKOS_ALT_LABEL, RDFS_SUBPROPERTY_OF, RDFS_LABEL),
    (CI_CANONICAL_SLUG, RDFS_SUBPROPERTY_OF, CI_SLUG),
];

/// Schema predicates absorbed from graphs.
const SCHEMA_PREDICATES: &[&str] = &[
    OWL_EQUIVALENT_CLASS,
    RDFS_SUBCLASS_OF,
    OWL_EQUIVALENT_PROPERTY,
    RDFS_SUBPROPERTY_OF,
    OWL_INVERSE_OF,
];

type Relation = HashMap<Term, BTreeSet<Term>>;

/// Hash-indexed direct class and property relationships.
#[derive(Debug, Clone, Default)]
pub struct OntologyIndex {
    equivalent_class: Relation,
    super_class: Relation,
    sub_class: Relation,
    equivalent_property: Relation,
    super_property: Relation,
    sub_property: Relation,
    inverse_of: Relation,
    types: Relation,
    symmetric: HashSet<Term>,
}

fn link(rel: &mut Relation, a: &Term, b: &Term) {
    rel.entry(a.clone()).or_default().insert(b.clone());
}

fn lookup(rel: &Relation, key: &Term) -> BTreeSet<Term> {
    rel.get(key).cloned().unwrap_or_default()
}

impl OntologyIndex {
    /// An index with no facts at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// An index holding only [`CORE_AXIOMS`].
    #[must_use]
    pub fn core() -> Self {
        let mut index = Self::empty();
        for (s, p, o) in CORE_AXIOMS {
            index.add(&Statement::new(Term::iri(*s), Term::iri(*p), Term::iri(*o)));
        }
        index
    }

    /// Core axioms plus every schema statement found in `graph`.
    ///
    /// # Errors
    ///
    /// Propagates graph backend errors.
    pub fn from_graph(graph: &dyn Graph) -> Result<Self> {
        let mut index = Self::core();
        index.absorb(graph)?;
        Ok(index)
    }

    /// Adds every schema statement found in `graph`.
    ///
    /// Only `rdf:type` statements about vocabulary are kept: the subject is
    /// already known as a property, or the object is a class of properties
    /// (an OWL or RDF `*Property` metaclass, or a subclass of one).
    ///
    /// # Errors
    ///
    /// Propagates graph backend errors.
    pub fn absorb(&mut self, graph: &dyn Graph) -> Result<usize> {
        let mut added = 0;
        for p in SCHEMA_PREDICATES {
            for stmt in graph.matching(None, Some(&Term::iri(*p)), None)? {
                if self.add(&stmt) {
                    added += 1;
                }
            }
        }
        let symmetric = Term::iri(OWL_SYMMETRIC_PROPERTY);
        for stmt in graph.matching(None, Some(&Term::iri(RDF_TYPE)), None)? {
            let keep = stmt.object == symmetric
                || self.is_property(&stmt.subject)
                || self.is_property_class(&stmt.object);
            if keep && self.add(&stmt) {
                added += 1;
            }
        }
        tracing::debug!(added, "absorbed ontology statements");
        Ok(added)
    }

    fn is_property_class(&self, class: &Term) -> bool {
        let mut seen = HashSet::new();
        let mut queue = vec![class.clone()];
        while let Some(c) = queue.pop() {
            if let Some(iri) = c.as_iri() {
                let metaclass = iri.starts_with(OWL) || iri.starts_with(RDF);
                if metaclass && iri.ends_with("Property") {
                    return true;
                }
            }
            if let Some(supers) = self.super_class.get(&c) {
                queue.extend(supers.iter().filter(|s| !seen.contains(*s)).cloned());
            }
            seen.insert(c);
        }
        false
    }

    fn is_property(&self, term: &Term) -> bool {
        self.symmetric.contains(term)
            || self.equivalent_property.contains_key(term)
            || self.super_property.contains_key(term)
            || self.sub_property.contains_key(term)
            || self.inverse_of.contains_key(term)
    }

    /// Records one statement. Returns false if it carries no recognized
    /// schema fact or relates anything other than IRIs.
    pub fn add(&mut self, stmt: &Statement) -> bool {
        let (s, o) = (&stmt.subject, &stmt.object);
        if !s.is_iri() || !o.is_iri() {
            return false;
        }
        let Some(p) = stmt.predicate.as_iri() else {
            return false;
        };
        match p {
            OWL_EQUIVALENT_CLASS => {
                link(&mut self.equivalent_class, s, o);
                link(&mut self.equivalent_class, o, s);
            }
            RDFS_SUBCLASS_OF => {
                link(&mut self.super_class, s, o);
                link(&mut self.sub_class, o, s);
            }
            OWL_EQUIVALENT_PROPERTY => {
                link(&mut self.equivalent_property, s, o);
                link(&mut self.equivalent_property, o, s);
            }
            RDFS_SUBPROPERTY_OF => {
                link(&mut self.super_property, s, o);
                link(&mut self.sub_property, o, s);
            }
            OWL_INVERSE_OF => {
                link(&mut self.inverse_of, s, o);
                link(&mut self.inverse_of, o, s);
            }
            RDF_TYPE => {
                link(&mut self.types, s, o);
                if o.is(OWL_SYMMETRIC_PROPERTY) {
                    self.symmetric.insert(s.clone());
                }
            }
            _ => return false,
        }
        true
    }
}

impl OntologyFacts for OntologyIndex {
    fn equivalent_classes(&self, class: &Term) -> Result<BTreeSet<Term>> {
        Ok(lookup(&self.equivalent_class, class))
    }

    fn super_classes(&self, class: &Term) -> Result<BTreeSet<Term>> {
        Ok(lookup(&self.super_class, class))
    }

    fn sub_classes(&self, class: &Term) -> Result<BTreeSet<Term>> {
        Ok(lookup(&self.sub_class, class))
    }

    fn equivalent_properties(&self, property: &Term) -> Result<BTreeSet<Term>> {
        Ok(lookup(&self.equivalent_property, property))
    }

    fn super_properties(&self, property: &Term) -> Result<BTreeSet<Term>> {
        Ok(lookup(&self.super_property, property))
    }

    fn sub_properties(&self, property: &Term) -> Result<BTreeSet<Term>> {
        Ok(lookup(&self.sub_property, property))
    }

    fn inverse_properties(&self, property: &Term) -> Result<BTreeSet<Term>> {
        Ok(lookup(&self.inverse_of, property))
    }

    fn is_symmetric(&self, property: &Term) -> Result<bool> {
        Ok(self.symmetric.contains(property))
    }

    fn types_of(&self, term: &Term) -> Result<BTreeSet<Term>> {
        Ok(lookup(&self.types, term))
    }
}
