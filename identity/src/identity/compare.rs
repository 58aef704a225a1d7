//! Preference order between competing resource identifiers.

use std::cmp::Ordering;

use crate::model::Term;
use crate::uri::UriParts;

fn scheme_rank(parts: &UriParts) -> u8 {
    match parts.scheme.as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("https") => 0,
        Some("http") => 1,
        _ => 2,
    }
}

fn split_www(host: Option<String>) -> (String, bool) {
    let host = host.unwrap_or_default();
    match host.strip_prefix("www.") {
        Some(rest) => (rest.to_string(), true),
        None => (host, false),
    }
}

/// Orders two resources by preference, most preferred first.
///
/// IRIs beat every other kind of term. Between IRIs, `https` beats `http`
/// beats everything else. Within http(s), and only when `www` is given,
/// hosts are compared without a leading `www.`, then a host whose `www.`
/// presence matches the preference wins, then path, query and fragment are
/// compared. Remaining ties fall back to term order, so this is a total
/// order.
#[must_use]
pub fn cmp_resource(a: &Term, b: &Term, www: Option<bool>) -> Ordering {
    match (a.as_iri(), b.as_iri()) {
        (Some(x), Some(y)) => cmp_iri(x, y, www).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn cmp_iri(x: &str, y: &str, www: Option<bool>) -> Ordering {
    let (px, py) = (UriParts::parse(x), UriParts::parse(y));
    let rank = scheme_rank(&px);
    match rank.cmp(&scheme_rank(&py)) {
        Ordering::Equal => {}
        other => return other,
    }
    let Some(prefer) = www.filter(|_| rank < 2) else {
        return Ordering::Equal;
    };
    let (hx, wx) = split_www(px.host());
    let (hy, wy) = split_www(py.host());
    let miss = |has: bool| u8::from(has != prefer);
    hx.cmp(&hy)
        .then_with(|| miss(wx).cmp(&miss(wy)))
        .then_with(|| px.tail().cmp(&py.tail()))
}

/// Sorts `terms` in place by [`cmp_resource`].
pub fn sort_resources(terms: &mut [Term], www: Option<bool>) {
    terms.sort_by(|a, b| cmp_resource(a, b, www));
}
