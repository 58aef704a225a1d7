//! Scored candidates for canonical UUID resolution.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::model::Term;

/// One competing identifier during a single resolution call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The candidate identifier.
    pub term: Term,
    /// 0 (best) to 3 (worst).
    pub rank: u8,
    /// Publication status of the candidate.
    pub published: bool,
    /// Latest modification time; the minimum timestamp when undated.
    pub mtime: DateTime<Utc>,
    /// Superseded by another resource.
    pub replaced: bool,
}

impl Candidate {
    /// Creates an unreplaced candidate.
    #[must_use]
    pub fn new(term: Term, rank: u8, published: bool, mtime: DateTime<Utc>) -> Self {
        Self {
            term,
            rank,
            published,
            mtime,
            replaced: false,
        }
    }

    /// Merges another source's score: the lower rank wins, and the mtime
    /// only moves if the other source is strictly later.
    pub fn absorb(&mut self, rank: u8, mtime: DateTime<Utc>) {
        self.rank = self.rank.min(rank);
        if mtime > self.mtime {
            self.mtime = mtime;
        }
    }
}

fn by_preference(a: &Candidate, b: &Candidate, published_only: bool) -> Ordering {
    let published = if published_only {
        b.published.cmp(&a.published)
    } else {
        Ordering::Equal
    };
    published
        .then(a.rank.cmp(&b.rank))
        .then(b.mtime.cmp(&a.mtime))
        .then_with(|| a.term.cmp(&b.term))
}

/// Drops replaced (and, if requested, unpublished) candidates and orders
/// the rest: published first (only with `published_only`), then rank
/// ascending, then newest first, then term order.
#[must_use]
pub fn rank_candidates(
    candidates: impl IntoIterator<Item = Candidate>,
    published_only: bool,
) -> Vec<Term> {
    let mut kept: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| !c.replaced && (c.published || !published_only))
        .collect();
    kept.sort_by(|a, b| by_preference(a, b, published_only));
    kept.into_iter().map(|c| c.term).collect()
}
