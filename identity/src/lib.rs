//! Identity and label resolution over typed RDF graphs.
//!
//! `graph-identity` answers two questions about a resource with one
//! deterministic answer each: what is its canonical identifier (a
//! dereferenceable URI, or a `urn:uuid:`), and what is its best
//! human-readable label given its asserted and inferred types.
//!
//! # Entry Point
//!
//! ```
//! use graph_identity::{MemoryGraph, OntologyIndex, Resolver, ResolverConfig, Term};
//! use graph_identity::identity::UriOptions;
//! use graph_identity::vocab::CI_CANONICAL;
//!
//! let mut graph = MemoryGraph::new();
//! let s = Term::iri("urn:uuid:11111111-1111-1111-1111-111111111111");
//! graph.add(s.clone(), CI_CANONICAL, Term::iri("https://ex.org/a")).unwrap();
//!
//! let facts = OntologyIndex::core();
//! let resolver = Resolver::new(&graph, &facts, ResolverConfig::default());
//! let uri = resolver.canonical_uri(&s, &UriOptions::default()).unwrap();
//! assert_eq!(uri, Some(Term::iri("https://ex.org/a")));
//! ```
//!
//! # Loading
//!
//! With the default `loader` feature, Turtle and N-Triples files load into
//! a [`MemoryGraph`]:
//!
//! ```
//! # #[cfg(feature = "loader")] {
//! let graph = graph_identity::loader::parse_turtle(
//!     "<https://ex.org/a> <http://www.w3.org/2000/01/rdf-schema#label> \"A\" .",
//! ).unwrap();
//! assert_eq!(graph.len(), 1);
//! # }
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod cache;
pub mod closure;
pub mod error;
pub mod graph;
pub mod identity;
pub mod label;
#[cfg(feature = "loader")]
pub mod loader;
pub mod model;
pub mod ontology;
pub mod policy;
pub mod projection;
pub mod resolver;
pub mod serializer;
pub mod uri;
pub mod vocab;

pub use cache::ResolutionCache;
pub use closure::TypeStrata;
pub use error::{Error, Result};
pub use graph::{Graph, MemoryGraph};
pub use label::{Label, LabelOptions};
pub use model::{Literal, NodeKinds, Statement, Struct, Term};
pub use ontology::{OntologyFacts, OntologyIndex};
pub use policy::{FragmentPolicy, FragmentStep, LabelPolicy, PolicyFile, PublicationPolicy};
pub use projection::{LookupOptions, StructOptions};
pub use resolver::{Normalize, Resolver, ResolverConfig};
