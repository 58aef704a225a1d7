//! Read-only graph access.
//!
//! The resolver only ever asks for statements matching a pattern, so that
//! is the whole of the [`Graph`] trait. [`MemoryGraph`] is the bundled
//! backend: three B-tree indexes (SPO, POS, OSP) over owned terms.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::model::{Statement, Term};

/// A queryable statement store.
///
/// Implementations must return every statement matching the pattern, where
/// `None` is a wildcard. Order is not significant; callers sort.
pub trait Graph: Send + Sync {
    /// Statements matching `(subject, predicate, object)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`] if the store cannot be read.
    fn matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Result<Vec<Statement>>;

    /// Returns true if `subject` appears as the subject of any statement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`] if the store cannot be read.
    fn has_subject(&self, subject: &Term) -> Result<bool> {
        Ok(!self.matching(Some(subject), None, None)?.is_empty())
    }

    /// Objects of `(subject, predicate, ?)`, sorted and unique.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`] if the store cannot be read.
    fn objects(&self, subject: &Term, predicate: &Term) -> Result<Vec<Term>> {
        let found: BTreeSet<Term> = self
            .matching(Some(subject), Some(predicate), None)?
            .into_iter()
            .map(|s| s.object)
            .collect();
        Ok(found.into_iter().collect())
    }

    /// Subjects of `(?, predicate, object)`, sorted and unique.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`] if the store cannot be read.
    fn subjects(&self, predicate: &Term, object: &Term) -> Result<Vec<Term>> {
        let found: BTreeSet<Term> = self
            .matching(None, Some(predicate), Some(object))?
            .into_iter()
            .map(|s| s.subject)
            .collect();
        Ok(found.into_iter().collect())
    }
}

type Index = BTreeMap<Term, BTreeMap<Term, BTreeSet<Term>>>;

/// In-memory graph with subject, predicate and object indexes.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    spo: Index,
    pos: Index,
    osp: Index,
    len: usize,
}

impl MemoryGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a statement. Returns false if it was already present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAResource`] if the subject is a literal or the
    /// predicate is not an IRI.
    pub fn insert(&mut self, stmt: Statement) -> Result<bool> {
        if !stmt.is_well_formed() {
            return Err(Error::NotAResource(format!(
                "ill-formed statement {} {} {}",
                stmt.subject, stmt.predicate, stmt.object
            )));
        }
        let Statement {
            subject: s,
            predicate: p,
            object: o,
        } = stmt;
        let fresh = self
            .spo
            .entry(s.clone())
            .or_default()
            .entry(p.clone())
            .or_default()
            .insert(o.clone());
        if fresh {
            self.pos
                .entry(p.clone())
                .or_default()
                .entry(o.clone())
                .or_default()
                .insert(s.clone());
            self.osp.entry(o).or_default().entry(s).or_default().insert(p);
            self.len += 1;
        }
        Ok(fresh)
    }

    /// Inserts `(s, p, o)` built from IRIs and terms.
    ///
    /// # Errors
    ///
    /// Same as [`insert`](Self::insert).
    pub fn add(&mut self, subject: Term, predicate: &str, object: Term) -> Result<bool> {
        self.insert(Statement::new(subject, Term::iri(predicate), object))
    }

    /// Inserts every statement from `stmts`, returning how many were new.
    ///
    /// # Errors
    ///
    /// Stops at the first ill-formed statement.
    pub fn extend(&mut self, stmts: impl IntoIterator<Item = Statement>) -> Result<usize> {
        let mut added = 0;
        for stmt in stmts {
            if self.insert(stmt)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Removes a statement. Returns false if it was absent.
    pub fn remove(&mut self, stmt: &Statement) -> bool {
        let removed = remove_from(&mut self.spo, &stmt.subject, &stmt.predicate, &stmt.object);
        if removed {
            remove_from(&mut self.pos, &stmt.predicate, &stmt.object, &stmt.subject);
            remove_from(&mut self.osp, &stmt.object, &stmt.subject, &stmt.predicate);
            self.len -= 1;
        }
        removed
    }

    /// Number of statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the graph holds no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Every statement, in subject-predicate-object order.
    pub fn iter(&self) -> impl Iterator<Item = Statement> + '_ {
        self.spo.iter().flat_map(|(s, po)| {
            po.iter().flat_map(move |(p, os)| {
                os.iter()
                    .map(move |o| Statement::new(s.clone(), p.clone(), o.clone()))
            })
        })
    }
}

fn remove_from(index: &mut Index, a: &Term, b: &Term, c: &Term) -> bool {
    let Some(inner) = index.get_mut(a) else {
        return false;
    };
    let Some(leaf) = inner.get_mut(b) else {
        return false;
    };
    let removed = leaf.remove(c);
    if leaf.is_empty() {
        inner.remove(b);
    }
    if inner.is_empty() {
        index.remove(a);
    }
    removed
}

/// Walks `index` from the optional first and second keys, yielding
/// `(first, second, third)` triples.
fn scan<'a>(
    index: &'a Index,
    first: Option<&Term>,
    second: Option<&Term>,
    third: Option<&Term>,
) -> Vec<(&'a Term, &'a Term, &'a Term)> {
    let mut out = Vec::new();
    let outer: Vec<(&Term, &BTreeMap<Term, BTreeSet<Term>>)> = match first {
        Some(k) => index.get_key_value(k).into_iter().collect(),
        None => index.iter().collect(),
    };
    for (a, inner) in outer {
        let middle: Vec<(&Term, &BTreeSet<Term>)> = match second {
            Some(k) => inner.get_key_value(k).into_iter().collect(),
            None => inner.iter().collect(),
        };
        for (b, leaves) in middle {
            match third {
                Some(k) => {
                    if let Some(c) = leaves.get(k) {
                        out.push((a, b, c));
                    }
                }
                None => out.extend(leaves.iter().map(|c| (a, b, c))),
            }
        }
    }
    out
}

impl Graph for MemoryGraph {
    fn matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Result<Vec<Statement>> {
        let stmts = match (subject, predicate, object) {
            (Some(_), _, _) | (None, None, None) => scan(&self.spo, subject, predicate, object)
                .into_iter()
                .map(|(s, p, o)| Statement::new(s.clone(), p.clone(), o.clone()))
                .collect(),
            (None, Some(_), _) => scan(&self.pos, predicate, object, None)
                .into_iter()
                .map(|(p, o, s)| Statement::new(s.clone(), p.clone(), o.clone()))
                .collect(),
            (None, None, Some(_)) => scan(&self.osp, object, None, None)
                .into_iter()
                .map(|(o, s, p)| Statement::new(s.clone(), p.clone(), o.clone()))
                .collect(),
        };
        Ok(stmts)
    }

    fn has_subject(&self, subject: &Term) -> Result<bool> {
        Ok(self.spo.contains_key(subject))
    }
}
