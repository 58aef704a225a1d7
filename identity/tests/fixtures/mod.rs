//! Turtle fixtures shared by the integration tests.

#![allow(dead_code)]

use graph_identity::loader::parse_turtle;
use graph_identity::{MemoryGraph, OntologyIndex, Resolver, ResolverConfig, Term};

/// Prefixes prepended to every fixture.
pub const PREFIXES: &str = r#"
@prefix rdf:  <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix owl:  <http://www.w3.org/2002/07/owl#> .
@prefix xsd:  <http://www.w3.org/2001/XMLSchema#> .
@prefix dct:  <http://purl.org/dc/terms/> .
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix foaf: <http://xmlns.com/foaf/0.1/> .
@prefix bibo: <http://purl.org/ontology/bibo/> .
@prefix ci:   <https://vocab.methodandstructure.com/content-inventory#> .
@prefix ex:   <https://ex.org/> .
"#;

/// A canonical URI competing with an alias.
pub const CANONICAL_AND_ALIAS: &str = r#"
<urn:uuid:aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa>
    owl:sameAs   <https://ex.org/b> ;
    ci:canonical <https://ex.org/a> .
"#;

/// The same statements, written the other way round.
pub const ALIAS_AND_CANONICAL: &str = r#"
<https://ex.org/b> owl:sameAs <urn:uuid:aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa> .
<urn:uuid:aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa> ci:canonical <https://ex.org/a> .
"#;

/// A UUID subject known only by a canonical slug.
pub const SLUGGED: &str = r#"
<urn:uuid:22222222-2222-4222-8222-222222222222>
    a foaf:Document ;
    ci:canonical-slug "foo"^^xsd:string ;
    ci:slug "bar" ;
    dct:title "Foo" .
"#;

/// A replacement chain A -> B -> C with an unpublished middle.
pub const REPLACEMENT_CHAIN: &str = r#"
<urn:uuid:0000000a-0000-4000-8000-000000000000>
    bibo:status <http://purl.org/ontology/bibo/status/published> ;
    dct:isReplacedBy <urn:uuid:0000000b-0000-4000-8000-000000000000> .
<urn:uuid:0000000b-0000-4000-8000-000000000000>
    dct:isReplacedBy <urn:uuid:0000000c-0000-4000-8000-000000000000> .
<urn:uuid:0000000c-0000-4000-8000-000000000000>
    bibo:status <http://purl.org/ontology/bibo/status/published> .
"#;

/// A replaced by both B and C, where B is itself replaced by C.
pub const REPLACEMENT_DIAMOND: &str = r#"
<urn:uuid:0000000a-0000-4000-8000-000000000001>
    dct:isReplacedBy <urn:uuid:0000000b-0000-4000-8000-000000000001> ,
                     <urn:uuid:0000000c-0000-4000-8000-000000000001> .
<urn:uuid:0000000b-0000-4000-8000-000000000001>
    dct:isReplacedBy <urn:uuid:0000000c-0000-4000-8000-000000000001> .
"#;

/// A chain A -> B -> C whose only published successor is the middle one.
pub const REPLACEMENT_DRAFT_TIP: &str = r#"
<urn:uuid:0000000a-0000-4000-8000-000000000002>
    dct:isReplacedBy <urn:uuid:0000000b-0000-4000-8000-000000000002> .
<urn:uuid:0000000b-0000-4000-8000-000000000002>
    bibo:status <http://purl.org/ontology/bibo/status/published> .
<urn:uuid:0000000c-0000-4000-8000-000000000002>
    dct:replaces <urn:uuid:0000000b-0000-4000-8000-000000000002> .
"#;

/// Two UUIDs claiming one URI: an older canonical, a newer alias.
pub const RANK_OVER_MTIME: &str = r#"
<urn:uuid:0000000e-0000-4000-8000-000000000001>
    ci:alias <https://ex.org/thing> ;
    dct:modified "2024-06-01"^^xsd:date .
<urn:uuid:0000000e-0000-4000-8000-000000000002>
    ci:canonical <https://ex.org/thing> ;
    dct:created "2019-01-01T00:00:00Z"^^xsd:dateTime .
"#;

/// A section hosted in a document, found through the fragment policy and
/// through `ci:fragment-of`.
pub const HOSTED_FRAGMENTS: &str = r#"
<urn:uuid:33333333-3333-4333-8333-333333333333>
    a bibo:Document ;
    bibo:status <http://purl.org/ontology/bibo/status/published> ;
    ci:canonical <https://ex.org/guide> ;
    dct:hasPart <urn:uuid:44444444-4444-4444-8444-444444444444> .
<urn:uuid:44444444-4444-4444-8444-444444444444>
    a skos:Concept ;
    ci:canonical-slug "intro" .
<urn:uuid:55555555-5555-4555-8555-555555555555>
    ci:fragment-of <urn:uuid:33333333-3333-4333-8333-333333333333> .
"#;

/// An untyped part of a published document.
pub const UNTYPED_PART: &str = r#"
<urn:uuid:33333333-3333-4333-8333-333333333333>
    a bibo:Document ;
    bibo:status <http://purl.org/ontology/bibo/status/published> ;
    ci:canonical <https://ex.org/guide> ;
    dct:hasPart <urn:uuid:44444444-4444-4444-8444-444444444444> .
<urn:uuid:44444444-4444-4444-8444-444444444444>
    ci:canonical-slug "intro" .
"#;

/// Concepts listed in order by a published document.
pub const LISTED_SECTIONS: &str = r#"
<urn:uuid:33333333-3333-4333-8333-333333333333>
    a bibo:Document ;
    bibo:status <http://purl.org/ontology/bibo/status/published> ;
    ci:canonical <https://ex.org/guide> ;
    ex:sections ( <urn:uuid:44444444-4444-4444-8444-444444444444>
                  <urn:uuid:66666666-6666-4666-8666-666666666666> ) .
<urn:uuid:44444444-4444-4444-8444-444444444444>
    a skos:Concept ;
    ci:canonical-slug "intro" .
<urn:uuid:66666666-6666-4666-8666-666666666666>
    a skos:Concept ;
    ci:canonical-slug "usage" .
"#;

/// Labels at several type depths.
pub const LABELLED: &str = r#"
ex:person a foaf:Person ;
    foaf:name "Ada" ;
    rdfs:label "ada-l" .
ex:report a bibo:Document ;
    dct:title "Annual Report" ;
    bibo:shortTitle "Report" ;
    dct:abstract "What happened." ;
    skos:prefLabel "report-pref" .
ex:untyped rdfs:label "Plain" ;
    skos:altLabel "Alt" .
ex:bare ex:size "3"^^xsd:integer .
"#;

/// Parses `body` with the shared prefixes.
pub fn graph(body: &str) -> MemoryGraph {
    parse_turtle(&format!("{PREFIXES}{body}")).expect("fixture parses")
}

/// Core axioms plus the fixture's own schema.
pub fn facts(graph: &MemoryGraph) -> OntologyIndex {
    OntologyIndex::from_graph(graph).expect("schema")
}

/// Default config with `https://ex.org/` as base.
pub fn config() -> ResolverConfig {
    ResolverConfig::default()
        .with_base("https://ex.org/")
        .expect("base")
}

/// Runs `f` against a resolver over `graph`.
pub fn with_resolver<T>(
    graph: &MemoryGraph,
    config: ResolverConfig,
    f: impl FnOnce(&Resolver<'_>) -> T,
) -> T {
    let facts = facts(graph);
    let resolver = Resolver::new(graph, &facts, config);
    f(&resolver)
}

/// An IRI term.
pub fn iri(s: &str) -> Term {
    Term::iri(s)
}
