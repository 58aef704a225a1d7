//! Well-known vocabulary IRIs and CURIE expansion.
//!
//! Only the terms the resolver itself consults are listed here. Anything
//! else reaches the resolver as data: through the graph, the ontology facts,
//! or a policy file.

/// `rdf:` namespace.
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// `rdfs:` namespace.
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// `owl:` namespace.
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
/// `xsd:` namespace.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
/// `dct:` (DCMI terms) namespace.
pub const DCT: &str = "http://purl.org/dc/terms/";
/// `dc11:` (DCMI elements 1.1) namespace.
pub const DC11: &str = "http://purl.org/dc/elements/1.1/";
/// `skos:` namespace.
pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
/// `foaf:` namespace.
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
/// `bibo:` namespace.
pub const BIBO: &str = "http://purl.org/ontology/bibo/";
/// `ci:` (content inventory) namespace.
pub const CI: &str = "https://vocab.methodandstructure.com/content-inventory#";
/// `schema:` namespace.
pub const SCHEMA: &str = "https://schema.org/";

/// `rdf:type`
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// `rdf:first`
pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
/// `rdf:rest`
pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
/// `rdf:nil`
pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
/// `rdf:value`
pub const RDF_VALUE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#value";
/// `rdf:langString`
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// `rdfs:Resource`
pub const RDFS_RESOURCE: &str = "http://www.w3.org/2000/01/rdf-schema#Resource";
/// `rdfs:Class`
pub const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
/// `rdfs:label`
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
/// `rdfs:comment`
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
/// `rdfs:subClassOf`
pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
/// `rdfs:subPropertyOf`
pub const RDFS_SUBPROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";

/// `owl:Thing`
pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";
/// `owl:sameAs`
pub const OWL_SAME_AS: &str = "http://www.w3.org/2002/07/owl#sameAs";
/// `owl:equivalentClass`
pub const OWL_EQUIVALENT_CLASS: &str = "http://www.w3.org/2002/07/owl#equivalentClass";
/// `owl:equivalentProperty`
pub const OWL_EQUIVALENT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#equivalentProperty";
/// `owl:inverseOf`
pub const OWL_INVERSE_OF: &str = "http://www.w3.org/2002/07/owl#inverseOf";
/// `owl:SymmetricProperty`
pub const OWL_SYMMETRIC_PROPERTY: &str = "http://www.w3.org/2002/07/owl#SymmetricProperty";
/// `owl:ObjectProperty`
pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";

/// `xsd:string`
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
/// `xsd:token`
pub const XSD_TOKEN: &str = "http://www.w3.org/2001/XMLSchema#token";
/// `xsd:date`
pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
/// `xsd:dateTime`
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

/// `dct:title`
pub const DCT_TITLE: &str = "http://purl.org/dc/terms/title";
/// `dct:alternative`
pub const DCT_ALTERNATIVE: &str = "http://purl.org/dc/terms/alternative";
/// `dct:abstract`
pub const DCT_ABSTRACT: &str = "http://purl.org/dc/terms/abstract";
/// `dct:description`
pub const DCT_DESCRIPTION: &str = "http://purl.org/dc/terms/description";
/// `dct:date`
pub const DCT_DATE: &str = "http://purl.org/dc/terms/date";
/// `dct:created`
pub const DCT_CREATED: &str = "http://purl.org/dc/terms/created";
/// `dct:modified`
pub const DCT_MODIFIED: &str = "http://purl.org/dc/terms/modified";
/// `dct:issued`
pub const DCT_ISSUED: &str = "http://purl.org/dc/terms/issued";
/// `dct:replaces`
pub const DCT_REPLACES: &str = "http://purl.org/dc/terms/replaces";
/// `dct:isReplacedBy`
pub const DCT_IS_REPLACED_BY: &str = "http://purl.org/dc/terms/isReplacedBy";
/// `dct:hasPart`
pub const DCT_HAS_PART: &str = "http://purl.org/dc/terms/hasPart";
/// `dct:isPartOf`
pub const DCT_IS_PART_OF: &str = "http://purl.org/dc/terms/isPartOf";

/// `dc11:title`
pub const DC11_TITLE: &str = "http://purl.org/dc/elements/1.1/title";
/// `dc11:description`
pub const DC11_DESCRIPTION: &str = "http://purl.org/dc/elements/1.1/description";

/// `skos:prefLabel`
pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
/// `skos:altLabel`
pub const SKOS_ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
/// `skos:note`
pub const SKOS_NOTE: &str = "http://www.w3.org/2004/02/skos/core#note";

/// `foaf:Document`
pub const FOAF_DOCUMENT: &str = "http://xmlns.com/foaf/0.1/Document";
/// `foaf:Agent`
pub const FOAF_AGENT: &str = "http://xmlns.com/foaf/0.1/Agent";
/// `foaf:Person`
pub const FOAF_PERSON: &str = "http://xmlns.com/foaf/0.1/Person";
/// `foaf:Organization`
pub const FOAF_ORGANIZATION: &str = "http://xmlns.com/foaf/0.1/Organization";
/// `foaf:name`
pub const FOAF_NAME: &str = "http://xmlns.com/foaf/0.1/name";
/// `foaf:status`
pub const FOAF_STATUS: &str = "http://xmlns.com/foaf/0.1/status";

/// `bibo:Document`
pub const BIBO_DOCUMENT: &str = "http://purl.org/ontology/bibo/Document";
/// `bibo:shortTitle`
pub const BIBO_SHORT_TITLE: &str = "http://purl.org/ontology/bibo/shortTitle";
/// `bibo:abstract`
pub const BIBO_ABSTRACT: &str = "http://purl.org/ontology/bibo/abstract";
/// `bibo:shortDescription`
pub const BIBO_SHORT_DESCRIPTION: &str = "http://purl.org/ontology/bibo/shortDescription";
/// `bibo:status`
pub const BIBO_STATUS: &str = "http://purl.org/ontology/bibo/status";
/// `bibo:status/published`
pub const BIBO_STATUS_PUBLISHED: &str = "http://purl.org/ontology/bibo/status/published";

/// `ci:canonical`
pub const CI_CANONICAL: &str = "https://vocab.methodandstructure.com/content-inventory#canonical";
/// `ci:canonical-slug`
pub const CI_CANONICAL_SLUG: &str =
    "https://vocab.methodandstructure.com/content-inventory#canonical-slug";
/// `ci:slug`
pub const CI_SLUG: &str = "https://vocab.methodandstructure.com/content-inventory#slug";
/// `ci:alias`
pub const CI_ALIAS: &str = "https://vocab.methodandstructure.com/content-inventory#alias";
/// `ci:fragment-of`
pub const CI_FRAGMENT_OF: &str =
    "https://vocab.methodandstructure.com/content-inventory#fragment-of";
/// `ci:retired`
pub const CI_RETIRED: &str = "https://vocab.methodandstructure.com/content-inventory#retired";
/// `ci:circulated`
pub const CI_CIRCULATED: &str =
    "https://vocab.methodandstructure.com/content-inventory#circulated";

/// `schema:Thing`
pub const SCHEMA_THING: &str = "https://schema.org/Thing";

/// Prefixes understood by [`expand_curie`].
pub const PREFIXES: &[(&str, &str)] = &[
    ("rdf", RDF),
    ("rdfs", RDFS),
    ("owl", OWL),
    ("xsd", XSD),
    ("dct", DCT),
    ("dcterms", DCT),
    ("dc11", DC11),
    ("dc", DC11),
    ("skos", SKOS),
    ("foaf", FOAF),
    ("bibo", BIBO),
    ("ci", CI),
    ("schema", SCHEMA),
];

/// Expands `prefix:local` using [`PREFIXES`].
///
/// `<...>`-wrapped IRIs are unwrapped. Strings whose prefix is unknown but
/// which parse as absolute URLs are returned unchanged. Anything else yields
/// `None`.
#[must_use]
pub fn expand_curie(curie: &str) -> Option<String> {
    let curie = curie.trim();
    if let Some(inner) = curie.strip_prefix('<').and_then(|c| c.strip_suffix('>')) {
        return Some(inner.to_string());
    }
    let (prefix, local) = curie.split_once(':')?;
    if let Some((_, ns)) = PREFIXES.iter().find(|(p, _)| *p == prefix) {
        return Some(format!("{ns}{local}"));
    }
    url::Url::parse(curie).ok().map(|_| curie.to_string())
}
