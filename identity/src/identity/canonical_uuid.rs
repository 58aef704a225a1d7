//! Canonical UUID resolution.

use std::collections::BTreeMap;

use crate::cache::UuidKey;
use crate::error::{Error, Result};
use crate::identity::candidate::{rank_candidates, Candidate};
use crate::model::{NodeKinds, Term};
use crate::projection::{subjects_with_predicates, LookupOptions};
use crate::resolver::Resolver;
use crate::uri::{normalize, path_param_tiers, terminal_slug, uuid_form, uuid_of};
use crate::vocab::{CI_ALIAS, CI_CANONICAL, CI_CANONICAL_SLUG, CI_SLUG, OWL_SAME_AS, XSD_STRING, XSD_TOKEN};

/// Options for [`Resolver::canonical_uuid`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidOptions {
    /// Only accept published candidates.
    pub published_only: bool,
}

impl UuidOptions {
    /// Published candidates only.
    #[must_use]
    pub fn published() -> Self {
        Self {
            published_only: true,
        }
    }
}

impl Resolver<'_> {
    /// The best `urn:uuid:` identifier for `uri`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAResource`] for a literal, and propagates graph
    /// and ontology errors.
    pub fn canonical_uuid(&self, uri: &Term, opts: UuidOptions) -> Result<Option<Term>> {
        Ok(self.canonical_uuids(uri, opts)?.into_iter().next())
    }

    /// Every candidate `urn:uuid:` identifier for `uri`, best first.
    ///
    /// 1. A URI that is itself a UUID (as `urn:uuid:` or as a bare `/uuid`
    ///    path) and is a subject in the graph is its own answer.
    /// 2. Subjects linked to the URI by `ci:canonical` (rank 0), `ci:alias`
    ///    or `owl:sameAs` (rank 1) are collected from the most specific
    ///    path-parameter tier that has any.
    /// 3. Subjects whose `ci:canonical-slug` or `ci:slug` matches the URI's
    ///    terminal slug join with rank 0 to 3, better when the slug is
    ///    canonical and when the URI is exactly the base plus that slug.
    /// 4. Non-UUID candidates are dropped and superseded ones hand their
    ///    score to their replacements.
    ///
    /// Results are memoized per URI and publication filter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAResource`] for a literal, and propagates graph
    /// and ontology errors.
    pub fn canonical_uuids(&self, uri: &Term, opts: UuidOptions) -> Result<Vec<Term>> {
        let raw = match uri {
            Term::Iri(raw) => raw,
            Term::BlankNode(_) => return Ok(Vec::new()),
            Term::Literal(_) => return Err(Error::NotAResource(uri.to_string())),
        };
        let normalized = Term::iri(normalize(raw));
        let target = match uuid_form(normalized.value()) {
            Some(urn) => {
                if self.subject_exists(&urn)? {
                    return Ok(vec![urn]);
                }
                urn
            }
            None => normalized.clone(),
        };

        let key = UuidKey {
            uri: normalized.clone(),
            published_only: opts.published_only,
        };
        if let Some(hit) = self.cache().uuid_candidates(&key) {
            return Ok(hit);
        }

        let mut candidates: BTreeMap<Term, Candidate> = BTreeMap::new();
        self.collect_aliases(&target, &mut candidates)?;
        self.collect_slugs(normalized.value(), &mut candidates)?;
        candidates.retain(|term, _| uuid_of(term).is_some());
        self.promote_replacements(&mut candidates, opts.published_only)?;

        let ranked = rank_candidates(candidates.into_values(), opts.published_only);
        tracing::debug!(uri = %normalized, found = ranked.len(), "resolved uuid candidates");
        self.cache().store_uuid_candidates(key, ranked.clone());
        Ok(ranked)
    }

    /// Resolves a user-supplied string, see [`coerce`](Self::coerce).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUri`] for malformed input.
    pub fn canonical_uuid_str(&self, input: &str, opts: UuidOptions) -> Result<Option<Term>> {
        self.canonical_uuid(&self.coerce(input)?, opts)
    }

    fn candidate(&self, term: Term, rank: u8) -> Result<Candidate> {
        let published = self.is_published(&term)?;
        let mtime = self.mtime_of(&term)?;
        Ok(Candidate::new(term, rank, published, mtime))
    }

    fn collect_aliases(&self, uri: &Term, out: &mut BTreeMap<Term, Candidate>) -> Result<()> {
        let canonical = Term::iri(CI_CANONICAL);
        let predicates = [canonical.clone(), Term::iri(CI_ALIAS), Term::iri(OWL_SAME_AS)];
        let opts = LookupOptions::exact(NodeKinds::RESOURCE);
        for (depth, tier) in path_param_tiers(uri).iter().enumerate() {
            for key in tier {
                let found =
                    subjects_with_predicates(self.graph(), self.facts(), &predicates, key, &opts)?;
                for n in found {
                    let rank = if n.forward.contains(&canonical) { 0 } else { 1 };
                    match out.get_mut(&n.node) {
                        Some(c) => c.rank = c.rank.min(rank),
                        None => {
                            let c = self.candidate(n.node.clone(), rank)?;
                            out.insert(n.node, c);
                        }
                    }
                }
            }
            tracing::debug!(tier = depth, found = out.len(), "alias tier");
            if !out.is_empty() {
                break;
            }
        }
        Ok(())
    }

    fn collect_slugs(&self, uri: &str, out: &mut BTreeMap<Term, Candidate>) -> Result<()> {
        let Some(slug) = terminal_slug(uri) else {
            return Ok(());
        };
        let exact = self.slug_uri(&slug, None).is_some_and(|t| t.value() == uri);
        let canonical_slug = Term::iri(CI_CANONICAL_SLUG);
        let predicates = [canonical_slug.clone(), Term::iri(CI_SLUG)];
        let opts = LookupOptions::kinds(NodeKinds::RESOURCE);
        for datatype in [XSD_STRING, XSD_TOKEN] {
            let value = Term::typed(slug.clone(), datatype);
            for n in subjects_with_predicates(self.graph(), self.facts(), &predicates, &value, &opts)? {
                let is_canonical = n.forward.contains(&canonical_slug);
                let rank = ((u8::from(exact) << 1) | u8::from(is_canonical)) ^ 0b11;
                if !out.contains_key(&n.node) {
                    let c = self.candidate(n.node.clone(), 0b11)?;
                    out.insert(n.node.clone(), c);
                }
                if let Some(c) = out.get_mut(&n.node) {
                    c.rank = c.rank.min(rank);
                }
            }
        }
        Ok(())
    }

    fn promote_replacements(
        &self,
        candidates: &mut BTreeMap<Term, Candidate>,
        published_only: bool,
    ) -> Result<()> {
        let keys: Vec<Term> = candidates.keys().cloned().collect();
        for key in keys {
            let mut successors = self.replacements_for(&key, published_only)?;
            successors.remove(&key);
            if successors.is_empty() {
                continue;
            }
            let Some(current) = candidates.get_mut(&key) else {
                continue;
            };
            current.replaced = true;
            let (rank, mtime) = (current.rank, current.mtime);
            for next in successors {
                match candidates.get_mut(&next) {
                    Some(c) => c.absorb(rank, mtime),
                    None => {
                        let mut c = self.candidate(next.clone(), rank)?;
                        c.absorb(rank, mtime);
                        candidates.insert(next, c);
                    }
                }
            }
        }
        Ok(())
    }
}
