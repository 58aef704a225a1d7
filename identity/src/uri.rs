//! URI utilities: normalization, slugs, UUIDs and path parameters.
//!
//! Normalization is purely textual. URIs are split into their RFC 3986
//! components, characters outside the safe set are percent-encoded per
//! component, malformed escapes are repaired, and escapes are upper-cased.
//! Nothing is resolved or dereferenced.

use std::sync::OnceLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;
use url::Url;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::Term;

/// Characters escaped in every component. Everything printable that is not
/// alphanumeric or one of `/?%@!$&'()*+,:;=._~-`.
const UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

const BASE32: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

#[allow(clippy::expect_used)]
fn parts_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?s)(?:([^:/?#]+):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
            .expect("valid regex")
    })
}

#[allow(clippy::expect_used)]
fn escape_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"%[0-9A-Fa-f]{2}").expect("valid regex"))
}

/// The five RFC 3986 components of a URI reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriParts {
    /// Scheme, without the `:`.
    pub scheme: Option<String>,
    /// Authority, without the leading `//`.
    pub authority: Option<String>,
    /// Path; may be empty.
    pub path: String,
    /// Query, without the `?`.
    pub query: Option<String>,
    /// Fragment, without the `#`.
    pub fragment: Option<String>,
}

impl UriParts {
    /// Splits a URI reference. Every string splits; nothing is validated.
    #[must_use]
    pub fn parse(uri: &str) -> Self {
        let Some(caps) = parts_re().captures(uri) else {
            return UriParts {
                path: uri.to_string(),
                ..UriParts::default()
            };
        };
        let get = |i: usize| caps.get(i).map(|m| m.as_str().to_string());
        UriParts {
            scheme: get(1),
            authority: get(2),
            path: get(3).unwrap_or_default(),
            query: get(4),
            fragment: get(5),
        }
    }

    /// Host part of the authority, lower-cased, without userinfo or port.
    #[must_use]
    pub fn host(&self) -> Option<String> {
        let authority = self.authority.as_deref()?;
        let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
        let host = match host.rfind(':') {
            Some(i) if !host.ends_with(']') => &host[..i],
            _ => host,
        };
        Some(host.to_ascii_lowercase())
    }

    /// Everything after the authority: path, query and fragment.
    #[must_use]
    pub fn tail(&self) -> String {
        let mut out = self.path.clone();
        if let Some(q) = &self.query {
            out.push('?');
            out.push_str(q);
        }
        if let Some(f) = &self.fragment {
            out.push('#');
            out.push_str(f);
        }
        out
    }
}

impl std::fmt::Display for UriParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}:")?;
        }
        if let Some(authority) = &self.authority {
            write!(f, "//{authority}")?;
        }
        write!(f, "{}", self.tail())
    }
}

/// Replaces `%` signs not starting a valid escape with `%25`.
fn repair_escapes(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        let valid = c == '%'
            && bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
            && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
        if c == '%' && !valid {
            out.push_str("%25");
        } else {
            out.push(c);
        }
    }
    out
}

fn escape_part(part: &str, extra: &[char]) -> String {
    let mut out = String::with_capacity(part.len());
    for piece in utf8_percent_encode(part, UNSAFE) {
        for c in piece.chars() {
            if extra.contains(&c) {
                out.push_str(&format!("%{:02X}", c as u32));
            } else {
                out.push(c);
            }
        }
    }
    out
}

/// Normalizes a URI string, additionally escaping the characters in `extra`.
///
/// Idempotent: normalizing twice gives the same result as normalizing once.
#[must_use]
pub fn normalize_with(uri: &str, extra: &[char]) -> String {
    let repaired = repair_escapes(uri.trim());
    let parts = UriParts::parse(&repaired);
    let escaped = UriParts {
        scheme: parts.scheme.map(|s| escape_part(&s, extra)),
        authority: parts.authority.map(|a| escape_part(&a, extra)),
        path: escape_part(&parts.path, extra),
        query: parts.query.map(|q| escape_part(&q, extra)),
        fragment: parts.fragment.map(|f| escape_part(&f, extra)),
    };
    escape_re()
        .replace_all(&escaped.to_string(), |caps: &regex::Captures<'_>| {
            caps[0].to_ascii_uppercase()
        })
        .into_owned()
}

/// Normalizes a URI string. See [`normalize_with`].
#[must_use]
pub fn normalize(uri: &str) -> String {
    normalize_with(uri, &[])
}

/// Normalizes an IRI term; other terms are returned unchanged.
#[must_use]
pub fn normalize_term(term: &Term) -> Term {
    match term {
        Term::Iri(iri) => Term::iri(normalize(iri)),
        other => other.clone(),
    }
}

/// Parses a bare hyphenated UUID string.
#[must_use]
pub fn parse_uuid(s: &str) -> Option<Uuid> {
    (s.len() == 36).then(|| Uuid::try_parse(s).ok()).flatten()
}

/// The UUID of a `urn:uuid:` IRI, in any case.
#[must_use]
pub fn uuid_of_str(uri: &str) -> Option<Uuid> {
    let scheme = uri.get(..9)?;
    if !scheme.eq_ignore_ascii_case("urn:uuid:") {
        return None;
    }
    parse_uuid(&uri[9..])
}

/// The UUID named by a `urn:uuid:` IRI term.
#[must_use]
pub fn uuid_of(term: &Term) -> Option<Uuid> {
    term.as_iri().and_then(uuid_of_str)
}

/// `urn:uuid:` IRI for `uuid`, lower-case.
#[must_use]
pub fn uuid_urn(uuid: Uuid) -> Term {
    Term::iri(uuid.urn().to_string())
}

/// If `uri` is a UUID in disguise, its `urn:uuid:` form.
///
/// Covers `urn:uuid:` IRIs in any case and URIs with no fragment whose
/// whole path is `/` followed by a UUID.
#[must_use]
pub fn uuid_form(uri: &str) -> Option<Term> {
    if let Some(uuid) = uuid_of_str(uri) {
        return Some(uuid_urn(uuid));
    }
    let parts = UriParts::parse(uri);
    if parts.fragment.is_some() {
        return None;
    }
    parts.path.strip_prefix('/').and_then(parse_uuid).map(uuid_urn)
}

/// The last non-empty path segment of `uri`, before any `;` parameters,
/// with `:` escaped so it is safe as a relative reference.
///
/// Returns `None` when there is no such segment.
#[must_use]
pub fn terminal_slug(uri: &str) -> Option<String> {
    let parts = UriParts::parse(uri);
    let trimmed = parts.path.trim_start_matches('/').trim_end_matches('/');
    if trimmed.is_empty() || !parts.path.starts_with('/') {
        return None;
    }
    let segment = trimmed.split('/').filter(|s| !s.is_empty()).last()?;
    let slug = segment.split(';').next().filter(|s| !s.is_empty())?;
    Some(normalize_with(slug, &[':']))
}

/// Splits `;` parameters off the last path segment of `uri`.
///
/// Returns the URI without query, fragment or parameters, and the
/// parameters in order.
#[must_use]
pub fn split_path_params(uri: &str) -> (String, Vec<String>) {
    let parts = UriParts::parse(uri);
    let (dir, last) = match parts.path.rfind('/') {
        Some(i) => parts.path.split_at(i + 1),
        None => ("", parts.path.as_str()),
    };
    let mut pieces = last.split(';');
    let head = pieces.next().unwrap_or_default();
    let params = pieces.filter(|p| !p.is_empty()).map(str::to_string).collect();
    let base = UriParts {
        path: format!("{dir}{head}"),
        query: None,
        fragment: None,
        ..parts
    };
    (base.to_string(), params)
}

/// The lookup tiers for `uri`, most specific first.
///
/// The first tier is `uri` itself. Each following tier drops one more
/// trailing path parameter, down to the bare path. Tiers are de-duplicated.
#[must_use]
pub fn path_param_tiers(uri: &Term) -> Vec<Vec<Term>> {
    let Some(iri) = uri.as_iri() else {
        return vec![vec![uri.clone()]];
    };
    let (base, params) = split_path_params(iri);
    let mut tiers = vec![vec![uri.clone()]];
    for keep in (0..params.len()).rev() {
        let t = if keep == 0 {
            Term::iri(base.clone())
        } else {
            Term::iri(format!("{base};{}", params[..keep].join(";")))
        };
        if !tiers.iter().any(|tier| tier.contains(&t)) {
            tiers.push(vec![t]);
        }
    }
    tiers
}

/// Encodes `uuid` as an XML NCName.
///
/// The form is the version nibble as a letter (`A` + version), then the
/// remaining 120 bits (without version and variant nibbles) as 24 lower-case
/// base32 characters, then the variant nibble as a letter.
#[must_use]
pub fn uuid_to_ncname(uuid: Uuid) -> String {
    let n = uuid.as_u128();
    let version = ((n >> 76) & 0xF) as u8;
    let variant = ((n >> 60) & 0xF) as u8;
    let body = ((n >> 80) << 72) | (((n >> 64) & 0xFFF) << 60) | (n & ((1u128 << 60) - 1));
    let mut out = String::with_capacity(26);
    out.push(char::from(b'A' + version));
    for i in 0..24 {
        let idx = ((body >> (115 - 5 * i)) & 31) as usize;
        out.push(char::from(BASE32[idx]));
    }
    out.push(char::from(b'A' + variant));
    out
}

/// Decodes the NCName form produced by [`uuid_to_ncname`].
#[must_use]
pub fn ncname_to_uuid(ncname: &str) -> Option<Uuid> {
    let bytes = ncname.as_bytes();
    if bytes.len() != 26 {
        return None;
    }
    let letter = |b: u8| (b'A'..=b'P').contains(&b).then(|| u128::from(b - b'A'));
    let version = letter(bytes[0])?;
    let variant = letter(bytes[25])?;
    let mut body: u128 = 0;
    for b in &bytes[1..25] {
        let idx = BASE32.iter().position(|c| c == &b.to_ascii_lowercase())?;
        body = (body << 5) | idx as u128;
    }
    let hi = body >> 72;
    let mid = (body >> 60) & 0xFFF;
    let lo = body & ((1u128 << 60) - 1);
    let n = (hi << 80) | (version << 76) | (mid << 64) | (variant << 60) | lo;
    Some(Uuid::from_u128(n))
}

/// Coerces a user-supplied string into a resource term.
///
/// `_:` strings become blank nodes. Otherwise the string is resolved against
/// `base` (if any) and normalized; without a base it must be absolute.
///
/// # Errors
///
/// Returns [`Error::InvalidUri`] if the string is not a valid (relative)
/// URI.
pub fn coerce_resource(input: &str, base: Option<&Url>) -> Result<Term> {
    let s = input.trim();
    if let Some(id) = s.strip_prefix("_:") {
        return Ok(Term::blank(id));
    }
    if s.is_empty() {
        return Err(Error::invalid_uri(input, "empty"));
    }
    let resolved = match base {
        Some(base) => base.join(s).map_err(|e| Error::invalid_uri(input, e))?,
        None => Url::parse(s).map_err(|e| Error::invalid_uri(input, e))?,
    };
    Ok(Term::iri(normalize(resolved.as_str())))
}

/// Coerces a UUID in any accepted spelling into its `urn:uuid:` term.
///
/// Accepts `urn:uuid:` URNs, bare hyphenated UUIDs and the NCName form.
///
/// # Errors
///
/// Returns [`Error::InvalidUri`] if the input is none of those.
pub fn coerce_uuid(input: &str) -> Result<Term> {
    let s = input.trim();
    uuid_of_str(s)
        .or_else(|| parse_uuid(s))
        .or_else(|| ncname_to_uuid(s))
        .map(uuid_urn)
        .ok_or_else(|| Error::invalid_uri(input, "not a UUID"))
}

/// Replaces the fragment of `uri` with `fragment`.
#[must_use]
pub fn with_fragment(uri: &str, fragment: &str) -> String {
    let parts = UriParts {
        fragment: Some(fragment.to_string()),
        ..UriParts::parse(uri)
    };
    normalize(&parts.to_string())
}

/// `base` with its path extended by `/slug`, query and fragment dropped.
#[must_use]
pub fn join_slug(base: &Url, slug: &str) -> String {
    let mut url = base.clone();
    let path = url.path().trim_end_matches('/').to_string();
    url.set_path(&format!("{path}/{slug}"));
    url.set_query(None);
    url.set_fragment(None);
    normalize(url.as_str())
}

/// `base` with its path replaced by `/uuid`, query and fragment dropped.
#[must_use]
pub fn uuid_path(base: &Url, uuid: Uuid) -> String {
    let mut url = base.clone();
    url.set_path(&format!("/{}", uuid.hyphenated()));
    url.set_query(None);
    url.set_fragment(None);
    normalize(url.as_str())
}
