//! Canonical URI resolution and host-document discovery.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::identity::compare::sort_resources;
use crate::model::{NodeKinds, Term};
use crate::projection::{list_cells, list_head, LookupOptions};
use crate::resolver::Resolver;
use crate::uri::{join_slug, uuid_of, uuid_path, uuid_to_ncname, with_fragment, UriParts};
use crate::vocab::{CI_ALIAS, CI_CANONICAL, CI_CANONICAL_SLUG, CI_FRAGMENT_OF, CI_SLUG, OWL_SAME_AS};

/// Options for [`Resolver::canonical_uri`].
#[derive(Debug, Clone, Copy)]
pub struct UriOptions {
    /// Keep candidates with a fragment. When false they are dropped, unless
    /// nothing else is left.
    pub include_fragments: bool,
    /// Turn slugs into URIs under the base even without a host document.
    pub allow_slugs: bool,
}

impl Default for UriOptions {
    fn default() -> Self {
        Self {
            include_fragments: true,
            allow_slugs: false,
        }
    }
}

impl Resolver<'_> {
    /// The one canonical URI of `subject`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAResource`] for a literal, and propagates graph
    /// and ontology errors.
    pub fn canonical_uri(&self, subject: &Term, opts: &UriOptions) -> Result<Option<Term>> {
        let mut visiting = BTreeSet::new();
        Ok(self
            .uri_candidates(subject, opts, true, &mut visiting)?
            .into_iter()
            .next())
    }

    /// Every URI `subject` is known by, canonical first, without duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAResource`] for a literal, and propagates graph
    /// and ontology errors.
    pub fn canonical_uris(&self, subject: &Term, opts: &UriOptions) -> Result<Vec<Term>> {
        let mut visiting = BTreeSet::new();
        self.uri_candidates(subject, opts, false, &mut visiting)
    }

    /// The document `subject` is a fragment of, if any.
    ///
    /// An explicit `ci:fragment-of` wins. Otherwise, for a subject that is
    /// not itself a document, the fragment policy entries of its classes
    /// are tried nearest class first; the first published document reached
    /// is the host.
    ///
    /// # Errors
    ///
    /// Propagates graph and ontology errors.
    pub fn host_document(&self, subject: &Term) -> Result<Option<Term>> {
        let resources = LookupOptions::kinds(NodeKinds::RESOURCE);
        let mut explicit = self.objects_for(subject, &[Term::iri(CI_FRAGMENT_OF)], &resources)?;
        if !explicit.is_empty() {
            sort_resources(&mut explicit, self.config().www_preference);
            return Ok(explicit.into_iter().next());
        }

        let policy = &self.config().fragment_policy;
        if policy.is_empty() {
            return Ok(None);
        }
        let types = self.asserted_types(subject)?;
        if self.type_is(&types, &self.config().document_types)?.is_some() {
            return Ok(None);
        }

        let mut classes = Vec::new();
        for (class, steps) in policy.iter() {
            if let Some(distance) = self.type_is(&types, std::slice::from_ref(class))? {
                classes.push((distance, class, steps));
            }
        }
        classes.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

        let heads: Vec<Term> = list_cells(self.graph(), subject)?
            .iter()
            .map(|cell| list_head(self.graph(), cell))
            .collect::<Result<_>>()?;

        for (_, class, steps) in classes {
            for step in steps {
                let predicate = std::slice::from_ref(&step.predicate);
                let mut found = Vec::new();
                if step.reversed {
                    found.extend(self.subjects_for(predicate, subject, &resources)?);
                    for head in &heads {
                        found.extend(self.subjects_for(predicate, head, &resources)?);
                    }
                } else {
                    found.extend(self.objects_for(subject, predicate, &resources)?);
                }
                for candidate in found {
                    if candidate != *subject
                        && self.is_document(&candidate)?
                        && self.is_published(&candidate)?
                    {
                        tracing::trace!(%subject, host = %candidate, %class, "host document");
                        return Ok(Some(candidate));
                    }
                }
            }
        }
        Ok(None)
    }

    /// `slug` as a URI: a fragment of `host`, or a path segment under the
    /// base. `None` without either.
    pub(crate) fn slug_uri(&self, slug: &str, host: Option<&str>) -> Option<Term> {
        match (host, &self.config().base) {
            (Some(host), _) => Some(Term::iri(with_fragment(host, slug))),
            (None, Some(base)) => Some(Term::iri(join_slug(base, slug))),
            (None, None) => None,
        }
    }

    fn uri_candidates(
        &self,
        subject: &Term,
        opts: &UriOptions,
        unique: bool,
        visiting: &mut BTreeSet<Term>,
    ) -> Result<Vec<Term>> {
        if subject.is_literal() {
            return Err(Error::NotAResource(subject.to_string()));
        }
        visiting.insert(subject.clone());
        let www = self.config().www_preference;

        let host_uri = match self.host_document(subject)? {
            Some(host) if visiting.contains(&host) => {
                tracing::warn!(%subject, %host, "host document cycle");
                None
            }
            Some(host) => self
                .uri_candidates(&host, opts, true, visiting)?
                .into_iter()
                .find_map(|t| t.as_iri().map(str::to_string)),
            None => None,
        };
        let slugs_ok = opts.allow_slugs || host_uri.is_some();
        let slug_uris = |predicate: &str| -> Result<Vec<Term>> {
            let literals = self.objects_for(
                subject,
                &[Term::iri(predicate)],
                &LookupOptions::exact(NodeKinds::LITERAL),
            )?;
            Ok(literals
                .iter()
                .filter_map(|lit| self.slug_uri(lit.value(), host_uri.as_deref()))
                .collect())
        };

        let mut primary = self.objects_for(
            subject,
            &[Term::iri(CI_CANONICAL)],
            &LookupOptions::kinds(NodeKinds::IRI),
        )?;
        sort_resources(&mut primary, www);
        if slugs_ok && (primary.is_empty() || !unique) {
            primary.extend(slug_uris(CI_CANONICAL_SLUG)?);
        }

        let mut all = primary;
        if all.is_empty() || !unique {
            let mut aliases = self.objects_for(
                subject,
                &[Term::iri(OWL_SAME_AS), Term::iri(CI_ALIAS)],
                &LookupOptions::exact(NodeKinds::IRI),
            )?;
            sort_resources(&mut aliases, www);
            all.extend(aliases);
            if slugs_ok {
                all.extend(slug_uris(CI_SLUG)?);
            }
            let fallback = match (uuid_of(subject), host_uri.as_deref(), &self.config().base) {
                (Some(uuid), Some(host), _) => Term::iri(with_fragment(host, &uuid_to_ncname(uuid))),
                (Some(uuid), None, Some(base)) => Term::iri(uuid_path(base, uuid)),
                _ => subject.clone(),
            };
            all.push(fallback);
        }

        if !opts.include_fragments {
            let whole: Vec<Term> = all
                .iter()
                .filter(|t| !t.is_iri() || UriParts::parse(t.value()).fragment.is_none())
                .cloned()
                .collect();
            if !whole.is_empty() {
                all = whole;
            }
        }

        if unique {
            all.truncate(1);
            return Ok(all);
        }
        let mut seen = BTreeSet::new();
        all.retain(|t| seen.insert(t.clone()));
        Ok(all)
    }
}
