//! Replacement chains: which resources supersede which.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::error::Result;
use crate::model::{NodeKinds, Term};
use crate::projection::{objects_for, subjects_for, LookupOptions};
use crate::resolver::Resolver;
use crate::vocab::{DCT_IS_REPLACED_BY, DCT_REPLACES};

#[derive(Debug)]
struct ChainNode {
    published: bool,
    /// Nodes this one replaces.
    replaces: BTreeSet<Term>,
    /// Nodes replacing this one.
    replaced_by: BTreeSet<Term>,
}

impl Resolver<'_> {
    /// The current successors of `subject` along `dct:replaces` /
    /// `dct:isReplacedBy`.
    ///
    /// The chain is walked breadth-first from `subject`; the terminals are
    /// the visited nodes (other than `subject`) that nothing replaces. With
    /// `published_only`, the published terminals are returned; if there are
    /// none, the walk steps back towards `subject` until a published set is
    /// found, which may be `{subject}` itself.
    ///
    /// # Errors
    ///
    /// Propagates graph and ontology errors.
    pub fn replacements_for(&self, subject: &Term, published_only: bool) -> Result<BTreeSet<Term>> {
        let replaces = [Term::iri(DCT_REPLACES)];
        let replaced_by = [Term::iri(DCT_IS_REPLACED_BY)];
        let opts = LookupOptions::kinds(NodeKinds::RESOURCE);

        let mut seen: BTreeMap<Term, ChainNode> = BTreeMap::new();
        seen.insert(
            subject.clone(),
            ChainNode {
                published: self.is_published(subject)?,
                replaces: BTreeSet::new(),
                replaced_by: BTreeSet::new(),
            },
        );
        let mut queue = VecDeque::from([subject.clone()]);
        while let Some(test) = queue.pop_front() {
            let mut successors: BTreeSet<Term> =
                subjects_for(self.graph(), self.facts(), &replaces, &test, &opts)?
                    .into_iter()
                    .collect();
            successors.extend(objects_for(self.graph(), self.facts(), &test, &replaced_by, &opts)?);
            for next in successors {
                tracing::trace!(from = %test, to = %next, "replacement edge");
                if let Some(node) = seen.get_mut(&test) {
                    node.replaced_by.insert(next.clone());
                }
                if let Some(node) = seen.get_mut(&next) {
                    node.replaces.insert(test.clone());
                    continue;
                }
                seen.insert(
                    next.clone(),
                    ChainNode {
                        published: self.is_published(&next)?,
                        replaces: BTreeSet::from([test.clone()]),
                        replaced_by: BTreeSet::new(),
                    },
                );
                queue.push_back(next);
            }
        }

        let terminals: BTreeSet<Term> = seen
            .iter()
            .filter(|(k, v)| *k != subject && v.replaced_by.is_empty())
            .map(|(k, _)| k.clone())
            .collect();
        if !published_only {
            return Ok(terminals);
        }

        let published = |set: &BTreeSet<Term>| -> BTreeSet<Term> {
            set.iter()
                .filter(|t| seen.get(*t).is_some_and(|n| n.published))
                .cloned()
                .collect()
        };
        let mut out = terminals;
        let mut visited: BTreeSet<Term> = out.clone();
        loop {
            let hits = published(&out);
            if !hits.is_empty() || out.is_empty() {
                return Ok(hits);
            }
            out = out
                .iter()
                .filter_map(|t| seen.get(t))
                .flat_map(|n| n.replaces.iter().cloned())
                .filter(|t| !visited.contains(t))
                .collect();
            visited.extend(out.iter().cloned());
        }
    }
}
