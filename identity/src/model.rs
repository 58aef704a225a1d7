//! Core graph model types.
//!
//! These types represent the RDF data the resolver works over: terms,
//! statements, node-kind filters, and the predicate-indexed [`Struct`]
//! projection of a subject's neighborhood. All values are owned; graphs hand
//! out clones and callers own what they get back.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::serializer::ntriples;
use crate::vocab::{RDF_LANG_STRING, XSD_STRING};

/// A literal value: lexical form plus at most one of datatype or language.
///
/// A literal with neither is an `xsd:string`; a literal with a language tag
/// is implicitly an `rdf:langString`. Constructors normalize an explicit
/// `xsd:string` datatype away so that equal literals compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    lexical: String,
    datatype: Option<String>,
    language: Option<String>,
}

impl Literal {
    /// Creates a plain `xsd:string` literal.
    pub fn simple(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    /// Creates a datatyped literal. `xsd:string` collapses to a simple literal.
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        let datatype = datatype.into();
        Self {
            lexical: lexical.into(),
            datatype: (datatype != XSD_STRING && datatype != RDF_LANG_STRING).then_some(datatype),
            language: None,
        }
    }

    /// Creates a language-tagged literal. Tags are stored lower-case.
    pub fn lang(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        let language = language.into().to_ascii_lowercase();
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: (!language.is_empty()).then_some(language),
        }
    }

    /// The lexical form.
    #[must_use]
    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    /// The effective datatype IRI, including the implicit ones.
    #[must_use]
    pub fn datatype(&self) -> &str {
        match (&self.datatype, &self.language) {
            (Some(dt), _) => dt,
            (None, Some(_)) => RDF_LANG_STRING,
            (None, None) => XSD_STRING,
        }
    }

    /// The datatype only when one was given explicitly (and is not `xsd:string`).
    #[must_use]
    pub fn explicit_datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }

    /// The language tag, if any.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

/// An RDF term: IRI, blank node, or literal.
///
/// Terms are totally ordered by their canonical N-Triples serialization,
/// which is the last-resort tie-break used everywhere in the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// An absolute IRI.
    Iri(String),
    /// A blank node with an opaque, graph-local identifier.
    BlankNode(String),
    /// A literal value.
    Literal(Literal),
}

impl Term {
    /// Creates an IRI term.
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// Creates a blank node term. A leading `_:` is stripped.
    pub fn blank(id: impl Into<String>) -> Self {
        let id = id.into();
        match id.strip_prefix("_:") {
            Some(rest) => Term::BlankNode(rest.to_string()),
            None => Term::BlankNode(id),
        }
    }

    /// Creates a plain `xsd:string` literal term.
    pub fn string(lexical: impl Into<String>) -> Self {
        Term::Literal(Literal::simple(lexical))
    }

    /// Creates a datatyped literal term.
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal(Literal::typed(lexical, datatype))
    }

    /// Returns true for IRIs.
    #[must_use]
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// Returns true for blank nodes.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    /// Returns true for literals.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// Returns true for resources (IRIs and blank nodes).
    #[must_use]
    pub fn is_resource(&self) -> bool {
        !self.is_literal()
    }

    /// The IRI string, if this is an IRI.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// The literal, if this is a literal.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// The IRI, blank node id, or lexical form.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Term::Iri(s) | Term::BlankNode(s) => s,
            Term::Literal(lit) => lit.lexical(),
        }
    }

    /// Returns true if this is the IRI `iri`.
    #[must_use]
    pub fn is(&self, iri: &str) -> bool {
        self.as_iri() == Some(iri)
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        ntriples::term(self).cmp(&ntriples::term(other))
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ntriples::term(self))
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

/// A single `(subject, predicate, object)` statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Statement {
    /// IRI or blank node.
    pub subject: Term,
    /// Always an IRI.
    pub predicate: Term,
    /// Any term.
    pub object: Term,
}

impl Statement {
    /// Creates a statement. Shape is checked when it is inserted into a graph.
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Returns true if subject and predicate have legal kinds.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.subject.is_resource() && self.predicate.is_iri()
    }
}

/// Which kinds of node a projection or lookup keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeKinds {
    /// Keep IRIs.
    pub iri: bool,
    /// Keep blank nodes.
    pub blank: bool,
    /// Keep literals.
    pub literal: bool,
}

impl NodeKinds {
    /// Every kind of node.
    pub const ALL: NodeKinds = NodeKinds {
        iri: true,
        blank: true,
        literal: true,
    };
    /// IRIs and blank nodes.
    pub const RESOURCE: NodeKinds = NodeKinds {
        iri: true,
        blank: true,
        literal: false,
    };
    /// Literals only.
    pub const LITERAL: NodeKinds = NodeKinds {
        iri: false,
        blank: false,
        literal: true,
    };
    /// IRIs only.
    pub const IRI: NodeKinds = NodeKinds {
        iri: true,
        blank: false,
        literal: false,
    };
    /// Blank nodes only.
    pub const BLANK: NodeKinds = NodeKinds {
        iri: false,
        blank: true,
        literal: false,
    };

    /// Returns true if `term` is of a kept kind.
    #[must_use]
    pub fn matches(self, term: &Term) -> bool {
        match term {
            Term::Iri(_) => self.iri,
            Term::BlankNode(_) => self.blank,
            Term::Literal(_) => self.literal,
        }
    }

    /// Returns true if only literals are kept.
    #[must_use]
    pub fn literal_only(self) -> bool {
        self.literal && !self.iri && !self.blank
    }
}

impl Default for NodeKinds {
    fn default() -> Self {
        NodeKinds::ALL
    }
}

/// Predicate-indexed projection of a subject's neighborhood.
///
/// Each predicate maps to a sorted, duplicate-free list of neighboring
/// terms. Built fresh per query; the caller owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Struct {
    entries: BTreeMap<Term, Vec<Term>>,
}

impl Struct {
    /// Creates an empty struct.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `node` under `predicate`, keeping the list sorted and unique.
    pub fn insert(&mut self, predicate: Term, node: Term) {
        let list = self.entries.entry(predicate).or_default();
        if let Err(pos) = list.binary_search(&node) {
            list.insert(pos, node);
        }
    }

    /// The neighbors under `predicate`.
    #[must_use]
    pub fn get(&self, predicate: &Term) -> Option<&[Term]> {
        self.entries.get(predicate).map(Vec::as_slice)
    }

    /// The neighbors under the IRI `predicate`.
    #[must_use]
    pub fn get_iri(&self, predicate: &str) -> Option<&[Term]> {
        self.get(&Term::iri(predicate))
    }

    /// All predicates, in term order.
    pub fn predicates(&self) -> impl Iterator<Item = &Term> {
        self.entries.keys()
    }

    /// All `(predicate, neighbors)` entries, in term order.
    pub fn iter(&self) -> impl Iterator<Item = (&Term, &[Term])> {
        self.entries.iter().map(|(p, v)| (p, v.as_slice()))
    }

    /// Number of predicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no predicates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The subset of entries whose predicate is in `predicates`.
    ///
    /// Pass the output of [`predicate_set`](crate::closure::predicate_set)
    /// to select entailed predicates too.
    #[must_use]
    pub fn find(&self, predicates: &BTreeSet<Term>) -> Struct {
        Struct {
            entries: self
                .entries
                .iter()
                .filter(|(p, _)| predicates.contains(*p))
                .map(|(p, v)| (p.clone(), v.clone()))
                .collect(),
        }
    }

    /// Node → predicates view of the same data.
    #[must_use]
    pub fn invert(&self) -> BTreeMap<Term, BTreeSet<Term>> {
        let mut out: BTreeMap<Term, BTreeSet<Term>> = BTreeMap::new();
        for (p, nodes) in &self.entries {
            for node in nodes {
                out.entry(node.clone()).or_default().insert(p.clone());
            }
        }
        out
    }
}
