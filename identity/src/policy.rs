//! Label, fragment and publication policies.
//!
//! Policies are immutable lookup tables keyed by class IRI. They are built
//! once (from the standard table or a TOML file), validated eagerly, and
//! shared behind `Arc`s. Misconfiguration is a load-time [`Error::Policy`],
//! never a query-time surprise.
//!
//! Policy file format:
//!
//! ```toml
//! [[label]]
//! class = "foaf:Document"
//! label = [["dct:title", "dc11:title"], ["bibo:shortTitle"]]
//! desc = [["bibo:abstract", "dct:description"]]
//!
//! [[fragment]]
//! class = "skos:Concept"
//! steps = [{ predicate = "skos:inScheme" }, { predicate = "dct:hasPart", reversed = true }]
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::Term;
use crate::ontology::{OntologyFacts, OntologyIndex};
use crate::vocab::*;

/// Main and alternate predicate stacks for one kind of string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackPair {
    /// Predicates tried for the main string, in order.
    pub main: Vec<Term>,
    /// Predicates tried for the alternate string, in order.
    pub alt: Vec<Term>,
}

impl StackPair {
    /// The main or alternate stack.
    #[must_use]
    pub fn stack(&self, alt: bool) -> &[Term] {
        if alt {
            &self.alt
        } else {
            &self.main
        }
    }
}

/// Label and description stacks for one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassStrings {
    /// Label (title) predicates.
    pub label: StackPair,
    /// Description predicates.
    pub desc: StackPair,
}

impl ClassStrings {
    /// The stack selected by the two flags.
    #[must_use]
    pub fn stack(&self, description: bool, alt: bool) -> &[Term] {
        if description {
            self.desc.stack(alt)
        } else {
            self.label.stack(alt)
        }
    }
}

/// Class → label/description predicate stacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelPolicy {
    entries: BTreeMap<Term, ClassStrings>,
}

/// One entry of a label policy before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLabelEntry {
    /// Class IRI or CURIE.
    pub class: String,
    /// One or two label stacks (main, alt).
    #[serde(default)]
    pub label: Vec<Vec<String>>,
    /// One or two description stacks (main, alt).
    #[serde(default)]
    pub desc: Vec<Vec<String>>,
}

impl RawLabelEntry {
    fn new(class: &str, label: &[&[&str]], desc: &[&[&str]]) -> Self {
        let owned = |stacks: &[&[&str]]| -> Vec<Vec<String>> {
            stacks
                .iter()
                .map(|s| s.iter().map(|p| (*p).to_string()).collect())
                .collect()
        };
        Self {
            class: class.to_string(),
            label: owned(label),
            desc: owned(desc),
        }
    }
}

fn expand_iri(s: &str, what: &str) -> Result<Term> {
    expand_curie(s)
        .map(Term::iri)
        .ok_or_else(|| Error::policy(format!("{what} {s:?} is not an absolute IRI or known CURIE")))
}

/// Inserts each predicate's direct equivalents right after it, unless
/// already in the stack.
fn expand_stack(stack: Vec<Term>, facts: &dyn OntologyFacts) -> Result<Vec<Term>> {
    let mut out = stack;
    let mut i = 0;
    while i < out.len() {
        let extra: Vec<Term> = facts
            .equivalent_properties(&out[i])?
            .into_iter()
            .filter(|p| !out.contains(p))
            .collect();
        let n = extra.len();
        out.splice(i + 1..i + 1, extra);
        i += n + 1;
    }
    Ok(out)
}

fn build_pair(
    class: &str,
    kind: &str,
    raw: &[Vec<String>],
    facts: &dyn OntologyFacts,
) -> Result<StackPair> {
    if raw.is_empty() {
        return Err(Error::policy(format!("{class}: {kind} needs at least one predicate stack")));
    }
    if raw.len() > 2 {
        tracing::warn!(class, kind, stacks = raw.len(), "extra predicate stacks truncated");
    }
    let mut stacks = Vec::with_capacity(2);
    for stack in raw.iter().take(2) {
        let terms = stack
            .iter()
            .map(|p| expand_iri(p, "predicate"))
            .collect::<Result<Vec<_>>>()?;
        stacks.push(expand_stack(terms, facts)?);
    }
    let mut stacks = stacks.into_iter();
    let main = stacks
        .next()
        .ok_or_else(|| Error::policy(format!("{class}: {kind} has no stacks")))?;
    let alt = stacks.next().unwrap_or_else(|| main.clone());
    Ok(StackPair { main, alt })
}

impl LabelPolicy {
    /// The built-in table: `rdfs:Resource` (and its equivalents such as
    /// `owl:Thing`), `foaf:Document` and `foaf:Agent`.
    #[must_use]
    pub fn standard() -> &'static LabelPolicy {
        static STANDARD: OnceLock<LabelPolicy> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let facts = OntologyIndex::core();
            LabelPolicy::from_raw(&standard_entries(), &facts).unwrap_or_else(|e| {
                tracing::error!(error = %e, "built-in label policy rejected; labels disabled");
                LabelPolicy::default()
            })
        })
    }

    /// Validates and expands raw entries.
    ///
    /// Each stack is expanded with direct equivalent properties, a missing
    /// alternate stack copies the main one, and every entry is copied onto
    /// the class's equivalent classes that have no entry of their own.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Policy`] if a class or predicate does not expand to
    /// an IRI, or an entry has no label or no description stack.
    pub fn from_raw(raw: &[RawLabelEntry], facts: &dyn OntologyFacts) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for entry in raw {
            let class = expand_iri(&entry.class, "class")?;
            let strings = ClassStrings {
                label: build_pair(&entry.class, "label", &entry.label, facts)?,
                desc: build_pair(&entry.class, "desc", &entry.desc, facts)?,
            };
            entries.insert(class, strings);
        }
        let declared: Vec<(Term, ClassStrings)> =
            entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        for (class, strings) in declared {
            for eq in facts.equivalent_classes(&class)? {
                entries.entry(eq).or_insert_with(|| strings.clone());
            }
        }
        Ok(Self { entries })
    }

    /// Parses and validates a policy file's `[[label]]` entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Policy`] on TOML or validation errors.
    pub fn from_toml_str(src: &str, facts: &dyn OntologyFacts) -> Result<Self> {
        PolicyFile::parse(src)?.label_policy(facts)
    }

    /// The entry for `class`.
    #[must_use]
    pub fn get(&self, class: &Term) -> Option<&ClassStrings> {
        self.entries.get(class)
    }

    /// Classes with entries.
    pub fn classes(&self) -> impl Iterator<Item = &Term> {
        self.entries.keys()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn standard_entries() -> Vec<RawLabelEntry> {
    vec![
        RawLabelEntry::new(
            RDFS_RESOURCE,
            &[
                &[SKOS_PREF_LABEL, RDFS_LABEL, DCT_TITLE, DC11_TITLE, RDF_VALUE],
                &[SKOS_ALT_LABEL, DCT_ALTERNATIVE],
            ],
            &[&[DCT_ABSTRACT, DCT_DESCRIPTION, DC11_DESCRIPTION, RDFS_COMMENT, SKOS_NOTE]],
        ),
        RawLabelEntry::new(
            FOAF_DOCUMENT,
            &[&[DCT_TITLE, DC11_TITLE], &[BIBO_SHORT_TITLE, DCT_ALTERNATIVE]],
            &[
                &[BIBO_ABSTRACT, DCT_ABSTRACT, DCT_DESCRIPTION, DC11_DESCRIPTION],
                &[BIBO_SHORT_DESCRIPTION],
            ],
        ),
        RawLabelEntry::new(FOAF_AGENT, &[&[FOAF_NAME]], &[&[FOAF_STATUS]]),
    ]
}

/// One step of host-document discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentStep {
    /// Predicate to follow.
    pub predicate: Term,
    /// Follow it from object to subject instead.
    pub reversed: bool,
}

/// Class → ordered host-discovery steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentPolicy {
    entries: BTreeMap<Term, Vec<FragmentStep>>,
}

impl FragmentPolicy {
    /// An empty policy: no class discovers a host this way.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the steps for `class`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Policy`] if `steps` is empty.
    pub fn insert(&mut self, class: Term, steps: Vec<FragmentStep>) -> Result<()> {
        if steps.is_empty() {
            return Err(Error::policy(format!("fragment entry {class} has no steps")));
        }
        self.entries.insert(class, steps);
        Ok(())
    }

    /// The steps for `class`.
    #[must_use]
    pub fn get(&self, class: &Term) -> Option<&[FragmentStep]> {
        self.entries.get(class).map(Vec::as_slice)
    }

    /// All entries.
    pub fn iter(&self) -> impl Iterator<Item = (&Term, &[FragmentStep])> {
        self.entries.iter().map(|(c, s)| (c, s.as_slice()))
    }

    /// Classes with entries.
    #[must_use]
    pub fn classes(&self) -> Vec<Term> {
        self.entries.keys().cloned().collect()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What counts as published.
///
/// All of these are opaque IRIs; nothing about publication is hard-coded
/// beyond the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationPolicy {
    /// Predicate carrying status values.
    pub status_predicate: Term,
    /// Statuses meaning "published".
    pub published: Vec<Term>,
    /// Status meaning "retired"; overrides any published status.
    pub retired: Term,
    /// An extra status accepted as published when `allow_circulated` is set.
    pub circulated: Term,
    /// Accept `circulated` as published.
    pub allow_circulated: bool,
    /// Ignore `retired`.
    pub allow_retired: bool,
}

impl Default for PublicationPolicy {
    fn default() -> Self {
        Self {
            status_predicate: Term::iri(BIBO_STATUS),
            published: vec![Term::iri(BIBO_STATUS_PUBLISHED)],
            retired: Term::iri(CI_RETIRED),
            circulated: Term::iri(CI_CIRCULATED),
            allow_circulated: false,
            allow_retired: false,
        }
    }
}

impl PublicationPolicy {
    /// Decides publication from a subject's status values.
    #[must_use]
    pub fn is_published(&self, statuses: &[Term]) -> bool {
        if !self.allow_retired && statuses.contains(&self.retired) {
            return false;
        }
        statuses.iter().any(|s| {
            self.published.contains(s) || (self.allow_circulated && s == &self.circulated)
        })
    }
}

/// A fragment entry before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFragmentEntry {
    /// Class IRI or CURIE.
    pub class: String,
    /// Steps, in order.
    #[serde(default)]
    pub steps: Vec<RawFragmentStep>,
}

/// A fragment step before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFragmentStep {
    /// Predicate IRI or CURIE.
    pub predicate: String,
    /// Follow it backwards.
    #[serde(default)]
    pub reversed: bool,
}

/// A parsed (but not yet validated) policy file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyFile {
    /// `[[label]]` entries.
    #[serde(default)]
    pub label: Vec<RawLabelEntry>,
    /// `[[fragment]]` entries.
    #[serde(default)]
    pub fragment: Vec<RawFragmentEntry>,
}

impl PolicyFile {
    /// Parses TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Policy`] on malformed TOML or unknown shapes.
    pub fn parse(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }

    /// Builds the label policy. A file without `[[label]]` entries yields
    /// the standard policy.
    ///
    /// # Errors
    ///
    /// See [`LabelPolicy::from_raw`].
    pub fn label_policy(&self, facts: &dyn OntologyFacts) -> Result<LabelPolicy> {
        if self.label.is_empty() {
            return Ok(LabelPolicy::standard().clone());
        }
        LabelPolicy::from_raw(&self.label, facts)
    }

    /// Builds the fragment policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Policy`] if an entry has no steps or names
    /// something that is not an IRI.
    pub fn fragment_policy(&self) -> Result<FragmentPolicy> {
        let mut policy = FragmentPolicy::new();
        for entry in &self.fragment {
            let class = expand_iri(&entry.class, "class")?;
            let steps = entry
                .steps
                .iter()
                .map(|s| {
                    Ok(FragmentStep {
                        predicate: expand_iri(&s.predicate, "predicate")?,
                        reversed: s.reversed,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            policy.insert(class, steps)?;
        }
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Statement;

    #[test]
    fn standard_covers_thing_and_resource() {
        let policy = LabelPolicy::standard();
        let resource = policy.get(&Term::iri(RDFS_RESOURCE)).expect("resource entry");
        let thing = policy.get(&Term::iri(OWL_THING)).expect("thing entry");
        assert_eq!(resource, thing);
        assert_eq!(resource.label.main[0], Term::iri(SKOS_PREF_LABEL));
        // desc has no alt stack, so it copies main
        assert_eq!(resource.desc.alt, resource.desc.main);
        let agent = policy.get(&Term::iri(FOAF_AGENT)).expect("agent entry");
        assert_eq!(agent.stack(false, true), &[Term::iri(FOAF_NAME)]);
    }

    #[test]
    fn built_in_entries_are_valid() -> Result<()> {
        let built = LabelPolicy::from_raw(&standard_entries(), &OntologyIndex::core())?;
        assert!(!built.is_empty());
        assert_eq!(&built, LabelPolicy::standard());
        Ok(())
    }

    #[test]
    fn equivalents_inserted_after_source() -> Result<()> {
        let mut facts = OntologyIndex::empty();
        facts.add(&Statement::new(
            Term::iri("http://a.example/name"),
            Term::iri(OWL_EQUIVALENT_PROPERTY),
            Term::iri(FOAF_NAME),
        ));
        let raw = [RawLabelEntry::new(
            FOAF_AGENT,
            &[&[FOAF_NAME, RDFS_LABEL]],
            &[&[RDFS_COMMENT]],
        )];
        let policy = LabelPolicy::from_raw(&raw, &facts)?;
        let entry = policy.get(&Term::iri(FOAF_AGENT)).expect("entry");
        assert_eq!(
            entry.label.main,
            vec![
                Term::iri(FOAF_NAME),
                Term::iri("http://a.example/name"),
                Term::iri(RDFS_LABEL),
            ]
        );
        Ok(())
    }

    #[test]
    fn empty_stack_list_is_an_error() {
        let raw = [RawLabelEntry::new(FOAF_AGENT, &[], &[&[RDFS_COMMENT]])];
        let r = LabelPolicy::from_raw(&raw, &OntologyIndex::core());
        assert!(matches!(r, Err(Error::Policy(_))));
    }

    #[test]
    fn extra_stacks_truncated() -> Result<()> {
        let raw = [RawLabelEntry::new(
            FOAF_AGENT,
            &[&[FOAF_NAME], &[RDFS_LABEL], &[RDFS_COMMENT]],
            &[&[RDFS_COMMENT]],
        )];
        let policy = LabelPolicy::from_raw(&raw, &OntologyIndex::empty())?;
        let entry = policy.get(&Term::iri(FOAF_AGENT)).expect("entry");
        assert_eq!(entry.label.alt, vec![Term::iri(RDFS_LABEL)]);
        Ok(())
    }

    #[test]
    fn toml_policy_file() -> Result<()> {
        let file = PolicyFile::parse(
            r#"
            [[label]]
            class = "foaf:Person"
            label = [["foaf:name"]]
            desc = [["dct:description"], ["rdfs:comment"]]

            [[fragment]]
            class = "skos:Concept"
            steps = [{ predicate = "skos:inScheme" }, { predicate = "dct:hasPart", reversed = true }]
            "#,
        )?;
        let labels = file.label_policy(&OntologyIndex::core())?;
        assert_eq!(labels.len(), 1);
        let frags = file.fragment_policy()?;
        let steps = frags
            .get(&Term::iri(format!("{SKOS}Concept")))
            .expect("concept steps");
        assert_eq!(steps.len(), 2);
        assert!(steps[1].reversed);
        Ok(())
    }

    #[test]
    fn bad_curie_fails_at_load() {
        let file = PolicyFile::parse(
            r#"
            [[fragment]]
            class = "nope:Thing"
            steps = [{ predicate = "dct:isPartOf" }]
            "#,
        );
        assert!(matches!(file.and_then(|f| f.fragment_policy()), Err(Error::Policy(_))));
    }

    #[test]
    fn publication_rules() {
        let mut policy = PublicationPolicy::default();
        let published = Term::iri(BIBO_STATUS_PUBLISHED);
        let retired = Term::iri(CI_RETIRED);
        let circulated = Term::iri(CI_CIRCULATED);
        assert!(policy.is_published(&[published.clone()]));
        assert!(!policy.is_published(&[published.clone(), retired.clone()]));
        assert!(!policy.is_published(&[circulated.clone()]));
        policy.allow_circulated = true;
        policy.allow_retired = true;
        assert!(policy.is_published(&[circulated]));
        assert!(policy.is_published(&[published, retired]));
    }
}
