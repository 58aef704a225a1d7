//! The resolution context.
//!
//! A [`Resolver`] borrows one graph snapshot and one set of ontology facts,
//! owns the configuration, and shares a [`ResolutionCache`]. Every
//! operation is a method on it; the algorithms themselves live in
//! [`closure`](crate::closure), [`projection`](crate::projection),
//! [`label`](crate::label) and [`identity`](crate::identity).

use std::collections::BTreeSet;
use std::sync::Arc;

use url::Url;

use crate::cache::ResolutionCache;
use crate::closure::{self, TypeStrata};
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::identity::{UriOptions, UuidOptions};
use crate::model::{Struct, Term};
use crate::ontology::OntologyFacts;
use crate::policy::{FragmentPolicy, LabelPolicy, PublicationPolicy};
use crate::projection::{self, LookupOptions, NormalizeFn, StructOptions};
use crate::uri;
use crate::vocab::FOAF_DOCUMENT;

/// Resolver settings.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Base for relative input, slug URIs and UUID paths.
    pub base: Option<Url>,
    /// Label and description stacks per class.
    pub label_policy: Arc<LabelPolicy>,
    /// Host-document discovery per class.
    pub fragment_policy: Arc<FragmentPolicy>,
    /// Classes whose instances are documents (and never fragments).
    pub document_types: Vec<Term>,
    /// What counts as published.
    pub publication: PublicationPolicy,
    /// Prefer `www.` hosts (`Some(true)`), bare hosts (`Some(false)`), or
    /// neither.
    pub www_preference: Option<bool>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base: None,
            label_policy: Arc::new(LabelPolicy::standard().clone()),
            fragment_policy: Arc::new(FragmentPolicy::new()),
            document_types: vec![Term::iri(FOAF_DOCUMENT)],
            publication: PublicationPolicy::default(),
            www_preference: None,
        }
    }
}

impl ResolverConfig {
    /// Sets the base URI.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUri`] if `base` is not an absolute URI.
    pub fn with_base(mut self, base: &str) -> Result<Self> {
        self.base = Some(Url::parse(base).map_err(|e| Error::invalid_uri(base, e))?);
        Ok(self)
    }
}

/// How [`Resolver::struct_for`] rewrites resource neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalize {
    /// Replace with the canonical UUID. The subject is resolved too.
    Uuid,
    /// Replace with the canonical URI.
    Uri,
    /// Canonical UUID, else canonical URI.
    UuidOrUri,
}

/// Identity and label resolution over one graph snapshot.
///
/// The cache assumes the graph does not change. After writing to the
/// graph, call [`clear_cache`](Self::clear_cache).
pub struct Resolver<'a> {
    graph: &'a dyn Graph,
    facts: &'a dyn OntologyFacts,
    config: ResolverConfig,
    cache: Arc<ResolutionCache>,
}

impl std::fmt::Debug for Resolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<'a> Resolver<'a> {
    /// Creates a resolver with a fresh cache.
    #[must_use]
    pub fn new(graph: &'a dyn Graph, facts: &'a dyn OntologyFacts, config: ResolverConfig) -> Self {
        Self {
            graph,
            facts,
            config,
            cache: Arc::new(ResolutionCache::new()),
        }
    }

    /// Shares `cache` with other resolvers over the same snapshot.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<ResolutionCache>) -> Self {
        self.cache = cache;
        self
    }

    /// The graph.
    #[must_use]
    pub fn graph(&self) -> &'a dyn Graph {
        self.graph
    }

    /// The ontology facts.
    #[must_use]
    pub fn facts(&self) -> &'a dyn OntologyFacts {
        self.facts
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    /// Forgets every memoized answer.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// See [`closure::type_strata`].
    ///
    /// # Errors
    ///
    /// Propagates ontology errors.
    pub fn type_strata(&self, seeds: &[Term]) -> Result<TypeStrata> {
        closure::type_strata(self.facts, seeds)
    }

    /// See [`closure::descendant_types`].
    ///
    /// # Errors
    ///
    /// Propagates ontology errors.
    pub fn descendant_types(&self, seeds: &[Term]) -> Result<Vec<Term>> {
        closure::descendant_types(self.facts, seeds)
    }

    /// See [`closure::predicate_set`].
    ///
    /// # Errors
    ///
    /// Propagates ontology errors.
    pub fn predicate_set(&self, seeds: &[Term]) -> Result<BTreeSet<Term>> {
        closure::predicate_set(self.facts, seeds)
    }

    /// See [`closure::type_is`].
    ///
    /// # Errors
    ///
    /// Propagates ontology errors.
    pub fn type_is(&self, types: &[Term], reference: &[Term]) -> Result<Option<usize>> {
        closure::type_is(self.facts, types, reference)
    }

    /// See [`closure::is_symmetric`].
    ///
    /// # Errors
    ///
    /// Propagates ontology errors.
    pub fn is_symmetric(&self, property: &Term) -> Result<bool> {
        closure::is_symmetric(self.facts, property)
    }

    /// Asserted `rdf:type`s of `subject`.
    ///
    /// # Errors
    ///
    /// Propagates graph errors.
    pub fn asserted_types(&self, subject: &Term) -> Result<Vec<Term>> {
        projection::asserted_types(self.graph, subject, None, None)
    }

    /// Returns true if the asserted types of `subject` reach any of
    /// `reference`.
    ///
    /// # Errors
    ///
    /// Propagates graph and ontology errors.
    pub fn rdf_type(&self, subject: &Term, reference: &[Term]) -> Result<bool> {
        let types = self.asserted_types(subject)?;
        Ok(self.type_is(&types, reference)?.is_some())
    }

    /// Returns true if `subject` is one of the configured document types.
    ///
    /// # Errors
    ///
    /// Propagates graph and ontology errors.
    pub fn is_document(&self, subject: &Term) -> Result<bool> {
        self.rdf_type(subject, &self.config.document_types)
    }

    /// Cached [`Graph::has_subject`].
    ///
    /// # Errors
    ///
    /// Propagates graph errors.
    pub fn subject_exists(&self, subject: &Term) -> Result<bool> {
        self.cache
            .subject_exists(subject, || self.graph.has_subject(subject))
    }

    /// See [`projection::objects_for`].
    ///
    /// # Errors
    ///
    /// Propagates graph and ontology errors.
    pub fn objects_for(
        &self,
        subject: &Term,
        predicates: &[Term],
        opts: &LookupOptions,
    ) -> Result<Vec<Term>> {
        projection::objects_for(self.graph, self.facts, subject, predicates, opts)
    }

    /// See [`projection::subjects_for`].
    ///
    /// # Errors
    ///
    /// Propagates graph and ontology errors.
    pub fn subjects_for(
        &self,
        predicates: &[Term],
        object: &Term,
        opts: &LookupOptions,
    ) -> Result<Vec<Term>> {
        projection::subjects_for(self.graph, self.facts, predicates, object, opts)
    }

    /// The neighbors of `subject` by predicate, optionally normalized.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAResource`] for a literal subject in forward
    /// mode, and propagates graph and ontology errors.
    pub fn struct_for(
        &self,
        subject: &Term,
        opts: &StructOptions,
        normalize: Option<Normalize>,
    ) -> Result<Struct> {
        let Some(mode) = normalize else {
            return projection::struct_for(self.graph, self.facts, subject, opts, None);
        };
        let subject = self.struct_subject(subject, Some(mode))?;
        let f = move |node: &Term| -> Result<Option<Term>> {
            match mode {
                Normalize::Uuid => self.canonical_uuid(node, UuidOptions::default()),
                Normalize::Uri => self.canonical_uri(node, &UriOptions::default()),
                Normalize::UuidOrUri => match self.canonical_uuid(node, UuidOptions::default())? {
                    Some(uuid) => Ok(Some(uuid)),
                    None => self.canonical_uri(node, &UriOptions::default()),
                },
            }
        };
        projection::struct_for(self.graph, self.facts, &subject, opts, Some(&f as &NormalizeFn<'_>))
    }

    /// The subject [`struct_for`](Self::struct_for) actually projects:
    /// under UUID normalization an IRI subject is replaced by its canonical
    /// UUID, when it has one.
    ///
    /// # Errors
    ///
    /// Propagates graph and ontology errors.
    pub fn struct_subject(&self, subject: &Term, normalize: Option<Normalize>) -> Result<Term> {
        match normalize {
            Some(Normalize::Uuid) if subject.is_iri() => Ok(self
                .canonical_uuid(subject, UuidOptions::default())?
                .unwrap_or_else(|| subject.clone())),
            _ => Ok(subject.clone()),
        }
    }

    /// Turns user input into a resource term, resolving against the base.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUri`] for malformed input.
    pub fn coerce(&self, input: &str) -> Result<Term> {
        uri::coerce_resource(input, self.config.base.as_ref())
    }
}
