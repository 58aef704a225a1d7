//! Canonical N-Triples serialization.
//!
//! Produces one statement per line with absolute IRIs. Literals always carry
//! their quotes; `xsd:string` literals are written without a datatype and
//! language-tagged literals without `rdf:langString`, so equal terms always
//! serialize identically.

use std::fmt::Write as _;

use crate::model::{Statement, Term};

/// Serializes a single term.
#[must_use]
pub fn term(term: &Term) -> String {
    match term {
        Term::Iri(value) => iri(value),
        Term::BlankNode(id) => format!("_:{id}"),
        Term::Literal(literal) => {
            let mut out = lit(literal.lexical());
            if let Some(language) = literal.language() {
                out.push('@');
                out.push_str(language);
            } else if let Some(datatype) = literal.explicit_datatype() {
                out.push_str("^^");
                out.push_str(&iri(datatype));
            }
            out
        }
    }
}

/// Serializes a single statement, including the trailing ` .` but no newline.
#[must_use]
pub fn statement(stmt: &Statement) -> String {
    format!(
        "{} {} {} .",
        term(&stmt.subject),
        term(&stmt.predicate),
        term(&stmt.object)
    )
}

/// Serializes a sequence of statements as an N-Triples document.
#[must_use]
pub fn to_ntriples<'a>(statements: impl IntoIterator<Item = &'a Statement>) -> String {
    let mut out = String::new();
    for stmt in statements {
        out.push_str(&statement(stmt));
        out.push('\n');
    }
    out
}

fn iri(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('<');
    for c in s.chars() {
        match c {
            '\u{0}'..='\u{20}' | '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('>');
    out
}

fn lit(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
