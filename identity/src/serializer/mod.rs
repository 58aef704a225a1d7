//! Serializers for graph terms and statements.
//!
//! Only canonical N-Triples ([`ntriples`]) is provided. Besides being the
//! output format of the `gid` client, the N-Triples form of a term defines
//! the total order on [`Term`](crate::Term).

pub mod ntriples;
