//! Projections of a subject's neighborhood.
//!
//! [`objects_for`] and [`subjects_for`] walk one hop from a node along a set
//! of predicates (optionally entailed), following inverse and symmetric
//! properties in the opposite direction. [`struct_for`] collects everything
//! one hop away into a [`Struct`].

use std::collections::{BTreeMap, BTreeSet};

use crate::closure::{predicate_set, reverse_predicates};
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::model::{NodeKinds, Struct, Term};
use crate::ontology::OntologyFacts;
use crate::vocab::{RDF_FIRST, RDF_REST, RDF_TYPE};

/// Options for [`objects_for`] and [`subjects_for`].
#[derive(Debug, Clone)]
pub struct LookupOptions {
    /// Expand the predicates with [`predicate_set`] first.
    pub entail: bool,
    /// Node kinds to keep.
    pub kinds: NodeKinds,
    /// When non-empty, literals must have one of these datatypes.
    pub datatypes: Vec<String>,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            entail: true,
            kinds: NodeKinds::ALL,
            datatypes: Vec::new(),
        }
    }
}

impl LookupOptions {
    /// Entailed lookup keeping only `kinds`.
    #[must_use]
    pub fn kinds(kinds: NodeKinds) -> Self {
        Self {
            kinds,
            ..Self::default()
        }
    }

    /// Unentailed lookup keeping only `kinds`.
    #[must_use]
    pub fn exact(kinds: NodeKinds) -> Self {
        Self {
            entail: false,
            kinds,
            datatypes: Vec::new(),
        }
    }

    /// Entailed literal lookup restricted to `datatypes`.
    #[must_use]
    pub fn literals(datatypes: &[&str]) -> Self {
        Self {
            entail: true,
            kinds: NodeKinds::LITERAL,
            datatypes: datatypes.iter().map(|d| (*d).to_string()).collect(),
        }
    }

    fn keeps(&self, node: &Term) -> bool {
        if !self.kinds.matches(node) {
            return false;
        }
        match node.as_literal() {
            Some(lit) if !self.datatypes.is_empty() => {
                self.datatypes.iter().any(|d| d == lit.datatype())
            }
            _ => true,
        }
    }
}

/// A node reached by a lookup, with the predicates that reached it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbor {
    /// The node.
    pub node: Term,
    /// Predicates followed in the requested direction.
    pub forward: BTreeSet<Term>,
    /// Inverse or symmetric predicates followed the other way.
    pub reverse: BTreeSet<Term>,
}

impl Neighbor {
    /// Every predicate that reached the node.
    pub fn predicates(&self) -> impl Iterator<Item = &Term> {
        self.forward.iter().chain(self.reverse.iter())
    }
}

fn record(map: &mut BTreeMap<Term, Neighbor>, node: Term, predicate: Term, forward: bool) {
    let entry = map.entry(node.clone()).or_insert_with(|| Neighbor {
        node,
        forward: BTreeSet::new(),
        reverse: BTreeSet::new(),
    });
    if forward {
        entry.forward.insert(predicate);
    } else {
        entry.reverse.insert(predicate);
    }
}

fn expand(
    facts: &dyn OntologyFacts,
    predicates: &[Term],
    entail: bool,
) -> Result<BTreeSet<Term>> {
    if entail {
        predicate_set(facts, predicates)
    } else {
        Ok(predicates.iter().filter(|p| p.is_iri()).cloned().collect())
    }
}

/// Objects of `subject` along `predicates`, with reaching predicates.
///
/// Inverse predicates (and the predicates themselves, when symmetric) are
/// followed backwards unless only literals are requested.
///
/// # Errors
///
/// Propagates graph and ontology errors.
pub fn objects_with_predicates(
    graph: &dyn Graph,
    facts: &dyn OntologyFacts,
    subject: &Term,
    predicates: &[Term],
    opts: &LookupOptions,
) -> Result<Vec<Neighbor>> {
    let preds = expand(facts, predicates, opts.entail)?;
    let mut out = BTreeMap::new();
    for p in &preds {
        for stmt in graph.matching(Some(subject), Some(p), None)? {
            if opts.keeps(&stmt.object) {
                record(&mut out, stmt.object, stmt.predicate, true);
            }
        }
    }
    if !opts.kinds.literal_only() {
        for p in reverse_predicates(facts, &preds)? {
            for stmt in graph.matching(None, Some(&p), Some(subject))? {
                if opts.keeps(&stmt.subject) {
                    record(&mut out, stmt.subject, stmt.predicate, false);
                }
            }
        }
    }
    Ok(out.into_values().collect())
}

/// Objects of `subject` along `predicates`, sorted and unique.
///
/// # Errors
///
/// Propagates graph and ontology errors.
pub fn objects_for(
    graph: &dyn Graph,
    facts: &dyn OntologyFacts,
    subject: &Term,
    predicates: &[Term],
    opts: &LookupOptions,
) -> Result<Vec<Term>> {
    Ok(objects_with_predicates(graph, facts, subject, predicates, opts)?
        .into_iter()
        .map(|n| n.node)
        .collect())
}

/// Subjects pointing at `object` along `predicates`, with reaching predicates.
///
/// Inverse and symmetric predicates are followed forward from `object`
/// unless it is a literal. Literal datatype filters do not apply.
///
/// # Errors
///
/// Propagates graph and ontology errors.
pub fn subjects_with_predicates(
    graph: &dyn Graph,
    facts: &dyn OntologyFacts,
    predicates: &[Term],
    object: &Term,
    opts: &LookupOptions,
) -> Result<Vec<Neighbor>> {
    let preds = expand(facts, predicates, opts.entail)?;
    let kinds = NodeKinds {
        literal: false,
        ..opts.kinds
    };
    let mut out = BTreeMap::new();
    for p in &preds {
        for stmt in graph.matching(None, Some(p), Some(object))? {
            if kinds.matches(&stmt.subject) {
                record(&mut out, stmt.subject, stmt.predicate, true);
            }
        }
    }
    if object.is_resource() {
        for p in reverse_predicates(facts, &preds)? {
            for stmt in graph.matching(Some(object), Some(&p), None)? {
                if kinds.matches(&stmt.object) {
                    record(&mut out, stmt.object, stmt.predicate, false);
                }
            }
        }
    }
    Ok(out.into_values().collect())
}

/// Subjects pointing at `object` along `predicates`, sorted and unique.
///
/// # Errors
///
/// Propagates graph and ontology errors.
pub fn subjects_for(
    graph: &dyn Graph,
    facts: &dyn OntologyFacts,
    predicates: &[Term],
    object: &Term,
    opts: &LookupOptions,
) -> Result<Vec<Term>> {
    Ok(subjects_with_predicates(graph, facts, predicates, object, opts)?
        .into_iter()
        .map(|n| n.node)
        .collect())
}

/// Options for [`struct_for`].
#[derive(Debug, Clone, Copy)]
pub struct StructOptions {
    /// Collect subjects pointing at the node instead of its objects.
    pub reverse: bool,
    /// Node kinds to keep.
    pub kinds: NodeKinds,
    /// Also walk inverse and symmetric predicates the other way.
    pub include_inverses: bool,
}

impl Default for StructOptions {
    fn default() -> Self {
        Self {
            reverse: false,
            kinds: NodeKinds::ALL,
            include_inverses: false,
        }
    }
}

impl StructOptions {
    /// Forward, literals only.
    #[must_use]
    pub fn literals() -> Self {
        Self {
            kinds: NodeKinds::LITERAL,
            ..Self::default()
        }
    }
}

/// Maps a resource to its canonical form; `None` keeps the node as is.
pub type NormalizeFn<'a> = dyn Fn(&Term) -> Result<Option<Term>> + 'a;

/// Predicate-indexed neighbors of `subject`.
///
/// Resource neighbors pass through `normalize` when one is given. With
/// `include_inverses`, statements in the opposite direction contribute too,
/// filed under their predicate's inverses (and the predicate itself when it
/// is symmetric).
///
/// # Errors
///
/// Returns [`Error::NotAResource`] for a literal subject in forward mode,
/// and propagates graph, ontology and normalizer errors.
pub fn struct_for(
    graph: &dyn Graph,
    facts: &dyn OntologyFacts,
    subject: &Term,
    opts: &StructOptions,
    normalize: Option<&NormalizeFn<'_>>,
) -> Result<Struct> {
    if subject.is_literal() && !opts.reverse {
        return Err(Error::NotAResource(subject.to_string()));
    }
    let norm = |node: Term| -> Result<Term> {
        match normalize {
            Some(f) if node.is_resource() => Ok(f(&node)?.unwrap_or(node)),
            _ => Ok(node),
        }
    };

    let mut out = Struct::new();
    let stmts = if opts.reverse {
        graph.matching(None, None, Some(subject))?
    } else {
        graph.matching(Some(subject), None, None)?
    };
    for stmt in stmts {
        let node = if opts.reverse { stmt.subject } else { stmt.object };
        if opts.kinds.matches(&node) {
            out.insert(stmt.predicate, norm(node)?);
        }
    }

    if opts.include_inverses && !opts.kinds.literal_only() && subject.is_resource() {
        let stmts = if opts.reverse {
            graph.matching(Some(subject), None, None)?
        } else {
            graph.matching(None, None, Some(subject))?
        };
        for stmt in stmts {
            let node = if opts.reverse { stmt.object } else { stmt.subject };
            if !node.is_resource() || !opts.kinds.matches(&node) {
                continue;
            }
            let inverses = reverse_predicates(facts, [&stmt.predicate])?;
            if inverses.is_empty() {
                continue;
            }
            let node = norm(node)?;
            for inv in inverses {
                out.insert(inv, node.clone());
            }
        }
    }
    Ok(out)
}

/// The head of the RDF list containing `node`.
///
/// Walks `rdf:rest` backwards through blank nodes. Returns `node` itself if
/// it is not inside a list.
///
/// # Errors
///
/// Propagates graph errors.
pub fn list_head(graph: &dyn Graph, node: &Term) -> Result<Term> {
    let rest = Term::iri(RDF_REST);
    let mut current = node.clone();
    let mut seen = BTreeSet::new();
    while seen.insert(current.clone()) {
        let prev = graph
            .subjects(&rest, &current)?
            .into_iter()
            .find(Term::is_blank);
        match prev {
            Some(p) => current = p,
            None => break,
        }
    }
    Ok(current)
}

/// Blank-node list cells whose `rdf:first` is `node`.
///
/// # Errors
///
/// Propagates graph errors.
pub fn list_cells(graph: &dyn Graph, node: &Term) -> Result<Vec<Term>> {
    Ok(graph
        .subjects(&Term::iri(RDF_FIRST), node)?
        .into_iter()
        .filter(Term::is_blank)
        .collect())
}

/// Asserted `rdf:type`s of `subject`, IRIs only, in order and unique.
///
/// `overrides`, when given, replaces the lookup; `from` supplies a
/// precomputed struct to read instead of the graph.
///
/// # Errors
///
/// Propagates graph errors.
pub fn asserted_types(
    graph: &dyn Graph,
    subject: &Term,
    overrides: Option<&[Term]>,
    from: Option<&Struct>,
) -> Result<Vec<Term>> {
    let raw: Vec<Term> = match (overrides, from) {
        (Some(types), _) => types.to_vec(),
        (None, Some(s)) => s.get_iri(RDF_TYPE).map(<[Term]>::to_vec).unwrap_or_default(),
        (None, None) => graph.objects(subject, &Term::iri(RDF_TYPE))?,
    };
    let mut out = Vec::new();
    for t in raw {
        if t.is_iri() && !out.contains(&t) {
            out.push(t);
        }
    }
    Ok(out)
}
