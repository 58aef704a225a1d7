//! Turtle and N-Triples loading via sophia.
//!
//! Parsed terms are converted into owned [`Term`]s and inserted into a
//! [`MemoryGraph`]. Generalized terms (quoted triples, variables) are
//! skipped.

use std::path::Path;

use sophia_api::source::TripleSource;
use sophia_api::term::{Term as _, TermKind};
use sophia_api::triple::Triple;
use sophia_turtle::parser::{nt, turtle};

use crate::error::{Error, Result};
use crate::graph::MemoryGraph;
use crate::model::{Literal, Statement, Term};

/// Input syntaxes the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// Turtle (`.ttl`).
    Turtle,
    /// N-Triples (`.nt`).
    NTriples,
}

impl Syntax {
    /// Guesses the syntax from a file extension. Defaults to Turtle.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("nt") => Syntax::NTriples,
            _ => Syntax::Turtle,
        }
    }
}

fn convert<T: sophia_api::term::Term>(t: T) -> Option<Term> {
    match t.kind() {
        TermKind::Iri => t.iri().map(|iri| Term::iri(iri.as_str())),
        TermKind::BlankNode => t.bnode_id().map(|id| Term::blank(id.as_str())),
        TermKind::Literal => {
            let lexical = t.lexical_form()?.to_string();
            if let Some(tag) = t.language_tag() {
                Some(Term::Literal(Literal::lang(lexical, tag.as_str())))
            } else {
                let datatype = t.datatype()?;
                Some(Term::Literal(Literal::typed(lexical, datatype.as_str())))
            }
        }
        _ => None,
    }
}

fn collect<S: TripleSource>(mut source: S) -> Result<Vec<Statement>> {
    let mut out = Vec::new();
    let mut skipped = 0usize;
    source
        .for_each_triple(|t| match (convert(t.s()), convert(t.p()), convert(t.o())) {
            (Some(s), Some(p), Some(o)) => out.push(Statement::new(s, p, o)),
            _ => skipped += 1,
        })
        .map_err(|e| Error::Parse(e.to_string()))?;
    if skipped > 0 {
        tracing::warn!(skipped, "skipped generalized statements");
    }
    Ok(out)
}

/// Parses `src` and inserts its statements into `graph`.
///
/// Returns how many statements were new.
///
/// # Errors
///
/// Returns [`Error::Parse`] on a syntax error.
pub fn load_str(graph: &mut MemoryGraph, src: &str, syntax: Syntax) -> Result<usize> {
    let stmts = match syntax {
        Syntax::Turtle => collect(turtle::parse_str(src))?,
        Syntax::NTriples => collect(nt::parse_str(src))?,
    };
    let added = graph.extend(stmts)?;
    tracing::debug!(added, ?syntax, "loaded statements");
    Ok(added)
}

/// Parses a Turtle document into a fresh graph.
///
/// # Errors
///
/// Returns [`Error::Parse`] on a syntax error.
pub fn parse_turtle(src: &str) -> Result<MemoryGraph> {
    let mut graph = MemoryGraph::new();
    load_str(&mut graph, src, Syntax::Turtle)?;
    Ok(graph)
}

/// Parses an N-Triples document into a fresh graph.
///
/// # Errors
///
/// Returns [`Error::Parse`] on a syntax error.
pub fn parse_ntriples(src: &str) -> Result<MemoryGraph> {
    let mut graph = MemoryGraph::new();
    load_str(&mut graph, src, Syntax::NTriples)?;
    Ok(graph)
}

/// Reads a file and loads it, guessing the syntax from its extension.
///
/// # Errors
///
/// Returns [`Error::Backend`] if the file cannot be read and
/// [`Error::Parse`] on a syntax error.
pub fn load_path(graph: &mut MemoryGraph, path: &Path) -> Result<usize> {
    let src = std::fs::read_to_string(path)
        .map_err(|e| Error::backend(format!("{}: {e}", path.display())))?;
    load_str(graph, &src, Syntax::from_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::vocab::{RDFS_LABEL, XSD_DATE};

    #[test]
    fn turtle_terms_convert() -> Result<()> {
        let g = parse_turtle(
            r#"
            @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
            @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
            <http://a.example/s> rdfs:label "plain", "chat"@fr, "2020-01-01"^^xsd:date ;
                <http://a.example/p> [ rdfs:label "inner"^^xsd:string ] .
            "#,
        )?;
        assert_eq!(g.len(), 5);
        let s = Term::iri("http://a.example/s");
        let labels = g.objects(&s, &Term::iri(RDFS_LABEL))?;
        assert!(labels.contains(&Term::string("plain")));
        assert!(labels.contains(&Term::Literal(Literal::lang("chat", "fr"))));
        assert!(labels.contains(&Term::typed("2020-01-01", XSD_DATE)));
        let inner = g.objects(&s, &Term::iri("http://a.example/p"))?;
        assert!(inner.iter().all(Term::is_blank));
        assert!(g
            .subjects(&Term::iri(RDFS_LABEL), &Term::string("inner"))?
            .iter()
            .all(Term::is_blank));
        Ok(())
    }

    #[test]
    fn ntriples_loads() -> Result<()> {
        let g = parse_ntriples(
            "<http://a.example/s> <http://www.w3.org/2000/01/rdf-schema#label> \"x\" .\n",
        )?;
        assert_eq!(g.len(), 1);
        Ok(())
    }

    #[test]
    fn syntax_errors_surface() {
        assert!(matches!(parse_turtle("<http://a.example/s> ."), Err(Error::Parse(_))));
    }

    #[test]
    fn syntax_from_extension() {
        assert_eq!(Syntax::from_path(Path::new("a.nt")), Syntax::NTriples);
        assert_eq!(Syntax::from_path(Path::new("a.ttl")), Syntax::Turtle);
    }
}
