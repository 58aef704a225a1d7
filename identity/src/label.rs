//! Stratified label and description lookup.
//!
//! The subject's types are stratified nearest first, with `rdfs:Resource`
//! appended as a last resort. Each class with a [`LabelPolicy`] entry
//! contributes the literals found under its predicate stack, in stack
//! order. Earlier (more specific) classes win.

use std::collections::BTreeSet;

use crate::closure::TypeStrata;
use crate::error::Result;
use crate::model::{Struct, Term};
use crate::policy::LabelPolicy;
use crate::projection::StructOptions;
use crate::resolver::Resolver;
use crate::vocab::{RDFS_RESOURCE, RDF_TYPE};

/// What to look up in [`Resolver::label_for`].
#[derive(Debug, Clone, Default)]
pub struct LabelOptions {
    /// Look up a description instead of a label.
    pub description: bool,
    /// Use the alternate stack (short titles and the like).
    pub alt: bool,
    /// Types to use instead of the subject's asserted ones.
    pub types: Option<Vec<Term>>,
}

impl LabelOptions {
    /// The main description stack.
    #[must_use]
    pub fn description() -> Self {
        Self {
            description: true,
            ..Self::default()
        }
    }
}

/// A literal and the predicate it was found under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Label {
    /// The predicate.
    pub predicate: Term,
    /// The literal value.
    pub value: Term,
}

/// Walks `strata` against `policy`, collecting `(predicate, literal)`
/// pairs from `literals` in first-seen order without duplicates.
#[must_use]
pub fn label_candidates(
    policy: &LabelPolicy,
    strata: &TypeStrata,
    literals: &Struct,
    description: bool,
    alt: bool,
) -> Vec<Label> {
    let mut out = Vec::new();
    let mut seen = BTreeSet::new();
    for class in strata.layers().iter().flatten() {
        let Some(strings) = policy.get(class) else {
            continue;
        };
        for predicate in strings.stack(description, alt) {
            let Some(values) = literals.get(predicate) else {
                continue;
            };
            for value in values.iter().filter(|v| v.is_literal()) {
                let label = Label {
                    predicate: predicate.clone(),
                    value: value.clone(),
                };
                if seen.insert(label.clone()) {
                    out.push(label);
                }
            }
        }
    }
    out
}

impl Resolver<'_> {
    /// The best label (or description) of `subject`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAResource`](crate::Error::NotAResource) for a
    /// literal, and propagates graph and ontology errors.
    pub fn label_for(
        &self,
        subject: &Term,
        opts: &LabelOptions,
        from: Option<&Struct>,
    ) -> Result<Option<Label>> {
        Ok(self.labels_for(subject, opts, from)?.into_iter().next())
    }

    /// Every label (or description) of `subject`, best first.
    ///
    /// `from` is a precomputed struct of the subject to read instead of the
    /// graph; its `rdf:type` values are used when no type override is
    /// given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAResource`](crate::Error::NotAResource) for a
    /// literal, and propagates graph and ontology errors.
    pub fn labels_for(
        &self,
        subject: &Term,
        opts: &LabelOptions,
        from: Option<&Struct>,
    ) -> Result<Vec<Label>> {
        let typed_struct = from.filter(|s| s.get_iri(RDF_TYPE).is_some());
        let types = crate::projection::asserted_types(
            self.graph(),
            subject,
            opts.types.as_deref(),
            typed_struct,
        )?;
        let mut strata = self.type_strata(&types)?;
        let resource = Term::iri(RDFS_RESOURCE);
        if !strata.contains(&resource) {
            strata.push_layer(vec![resource]);
        }

        let fetched;
        let literals = match from {
            Some(s) => s,
            None => {
                fetched = self.struct_for(subject, &StructOptions::literals(), None)?;
                &fetched
            }
        };
        Ok(label_candidates(
            &self.config().label_policy,
            &strata,
            literals,
            opts.description,
            opts.alt,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Literal;
    use crate::vocab::{DCT_TITLE, FOAF_DOCUMENT, RDFS_LABEL, SKOS_PREF_LABEL};

    fn lit(s: &str) -> Term {
        Term::string(s)
    }

    #[test]
    fn specific_class_wins() {
        let policy = LabelPolicy::standard();
        let mut s = Struct::new();
        s.insert(Term::iri(RDFS_LABEL), lit("generic"));
        s.insert(Term::iri(DCT_TITLE), lit("Title"));
        let mut strata = TypeStrata::default();
        strata.push_layer(vec![Term::iri(FOAF_DOCUMENT)]);
        strata.push_layer(vec![Term::iri(RDFS_RESOURCE)]);

        let labels = label_candidates(policy, &strata, &s, false, false);
        assert_eq!(labels[0].value, lit("Title"));
        assert_eq!(labels[0].predicate, Term::iri(DCT_TITLE));
        assert!(labels.iter().any(|l| l.value == lit("generic")));
        assert_eq!(labels.iter().filter(|l| l.value == lit("Title")).count(), 1);
    }

    #[test]
    fn stack_order_within_class() {
        let policy = LabelPolicy::standard();
        let mut s = Struct::new();
        s.insert(Term::iri(RDFS_LABEL), lit("label"));
        s.insert(Term::iri(SKOS_PREF_LABEL), Term::from(Literal::lang("pref", "en")));
        let mut strata = TypeStrata::default();
        strata.push_layer(vec![Term::iri(RDFS_RESOURCE)]);

        let labels = label_candidates(policy, &strata, &s, false, false);
        let values: Vec<_> = labels.iter().map(|l| l.value.value()).collect();
        assert_eq!(values, ["pref", "label"]);
    }

    #[test]
    fn nothing_without_literals() {
        let mut strata = TypeStrata::default();
        strata.push_layer(vec![Term::iri(RDFS_RESOURCE)]);
        assert!(label_candidates(LabelPolicy::standard(), &strata, &Struct::new(), false, false)
            .is_empty());
    }
}
