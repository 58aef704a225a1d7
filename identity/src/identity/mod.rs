//! Identity resolution: canonical URIs, canonical UUIDs and replacement
//! chains.
//!
//! The algorithms are methods on [`Resolver`](crate::Resolver), split by
//! concern across the submodules. The free functions here
//! ([`cmp_resource`], [`rank_candidates`]) are pure and usable on their own.

mod candidate;
mod canonical_uri;
mod canonical_uuid;
mod compare;
mod replacement;
mod status;

pub use candidate::{rank_candidates, Candidate};
pub use canonical_uri::UriOptions;
pub use canonical_uuid::UuidOptions;
pub use compare::{cmp_resource, sort_resources};
pub use status::parse_date;
