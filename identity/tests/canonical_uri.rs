//! Canonical URI resolution.

#![cfg(feature = "loader")]

mod fixtures;

use std::sync::Arc;

use graph_identity::identity::UriOptions;
use graph_identity::uri::{uuid_of, uuid_to_ncname};
use graph_identity::vocab::{CI_FRAGMENT_OF, DCT_HAS_PART, RDFS_RESOURCE};
use graph_identity::{FragmentPolicy, FragmentStep, MemoryGraph, ResolverConfig, Result, Term};

use fixtures::{config, graph, iri, with_resolver};

const DOC: &str = "urn:uuid:33333333-3333-4333-8333-333333333333";
const CONCEPT: &str = "urn:uuid:44444444-4444-4444-8444-444444444444";
const SECTION: &str = "urn:uuid:55555555-5555-4555-8555-555555555555";

fn hosted_config() -> Result<ResolverConfig> {
    let mut policy = FragmentPolicy::new();
    policy.insert(
        iri("http://www.w3.org/2004/02/skos/core#Concept"),
        vec![FragmentStep {
            predicate: iri(DCT_HAS_PART),
            reversed: true,
        }],
    )?;
    Ok(ResolverConfig {
        fragment_policy: Arc::new(policy),
        ..config()
    })
}

#[test]
fn list_mode_keeps_every_known_uri() -> Result<()> {
    let g = graph(fixtures::CANONICAL_AND_ALIAS);
    let s = iri("urn:uuid:aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa");
    let all = with_resolver(&g, config(), |r| r.canonical_uris(&s, &UriOptions::default()))?;
    assert_eq!(
        all,
        vec![
            iri("https://ex.org/a"),
            iri("https://ex.org/b"),
            iri("https://ex.org/aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa"),
        ]
    );
    Ok(())
}

#[test]
fn without_base_the_subject_is_its_own_uri() -> Result<()> {
    let g = MemoryGraph::new();
    let s = iri("urn:uuid:11111111-1111-1111-1111-111111111111");
    let uri = with_resolver(&g, ResolverConfig::default(), |r| {
        r.canonical_uri(&s, &UriOptions::default())
    })?;
    assert_eq!(uri, Some(s));
    Ok(())
}

#[test]
fn slugs_need_permission_or_a_host() -> Result<()> {
    let g = graph(fixtures::SLUGGED);
    let s = iri("urn:uuid:22222222-2222-4222-8222-222222222222");
    let plain = with_resolver(&g, config(), |r| r.canonical_uri(&s, &UriOptions::default()))?;
    assert_eq!(plain, Some(iri("https://ex.org/22222222-2222-4222-8222-222222222222")));

    let opts = UriOptions {
        allow_slugs: true,
        ..UriOptions::default()
    };
    let slugged = with_resolver(&g, config(), |r| r.canonical_uris(&s, &opts))?;
    assert_eq!(
        slugged,
        vec![
            iri("https://ex.org/foo"),
            iri("https://ex.org/bar"),
            iri("https://ex.org/22222222-2222-4222-8222-222222222222"),
        ]
    );
    Ok(())
}

#[test]
fn fragment_policy_finds_host() -> Result<()> {
    let g = graph(fixtures::HOSTED_FRAGMENTS);
    let config = hosted_config()?;
    let (host, uri) = with_resolver(&g, config, |r| -> Result<_> {
        Ok((
            r.host_document(&iri(CONCEPT))?,
            r.canonical_uri(&iri(CONCEPT), &UriOptions::default())?,
        ))
    })?;
    assert_eq!(host, Some(iri(DOC)));
    assert_eq!(uri, Some(iri("https://ex.org/guide#intro")));
    Ok(())
}

#[test]
fn untyped_subjects_use_the_resource_entry() -> Result<()> {
    let g = graph(fixtures::UNTYPED_PART);
    let mut policy = FragmentPolicy::new();
    policy.insert(
        iri(RDFS_RESOURCE),
        vec![FragmentStep {
            predicate: iri(DCT_HAS_PART),
            reversed: true,
        }],
    )?;
    let config = ResolverConfig {
        fragment_policy: Arc::new(policy),
        ..config()
    };
    let uri = with_resolver(&g, config, |r| r.canonical_uri(&iri(CONCEPT), &UriOptions::default()))?;
    assert_eq!(uri, Some(iri("https://ex.org/guide#intro")));
    Ok(())
}

#[test]
fn list_members_find_host_through_list_head() -> Result<()> {
    let g = graph(fixtures::LISTED_SECTIONS);
    let mut policy = FragmentPolicy::new();
    policy.insert(
        iri("http://www.w3.org/2004/02/skos/core#Concept"),
        vec![FragmentStep {
            predicate: iri("https://ex.org/sections"),
            reversed: true,
        }],
    )?;
    let config = ResolverConfig {
        fragment_policy: Arc::new(policy),
        ..config()
    };
    let second = iri("urn:uuid:66666666-6666-4666-8666-666666666666");
    let (host, first_uri, second_uri) = with_resolver(&g, config, |r| -> Result<_> {
        Ok((
            r.host_document(&second)?,
            r.canonical_uri(&iri(CONCEPT), &UriOptions::default())?,
            r.canonical_uri(&second, &UriOptions::default())?,
        ))
    })?;
    assert_eq!(host, Some(iri(DOC)));
    assert_eq!(first_uri, Some(iri("https://ex.org/guide#intro")));
    assert_eq!(second_uri, Some(iri("https://ex.org/guide#usage")));
    Ok(())
}

#[test]
fn explicit_host_builds_ncname_fragment() -> Result<()> {
    let g = graph(fixtures::HOSTED_FRAGMENTS);
    let uuid = uuid_of(&iri(SECTION)).expect("uuid");
    let uri = with_resolver(&g, config(), |r| {
        r.canonical_uri(&iri(SECTION), &UriOptions::default())
    })?;
    assert_eq!(
        uri,
        Some(Term::iri(format!("https://ex.org/guide#{}", uuid_to_ncname(uuid))))
    );
    Ok(())
}

#[test]
fn fragment_filter_never_empties() -> Result<()> {
    let g = graph(fixtures::HOSTED_FRAGMENTS);
    let opts = UriOptions {
        include_fragments: false,
        ..UriOptions::default()
    };
    let uri = with_resolver(&g, hosted_config()?, |r| r.canonical_uri(&iri(CONCEPT), &opts))?;
    assert_eq!(uri, Some(iri("https://ex.org/guide#intro")));
    Ok(())
}

#[test]
fn fragment_filter_prefers_whole_uris() -> Result<()> {
    let mut g = MemoryGraph::new();
    let s = iri("urn:uuid:66666666-6666-4666-8666-666666666666");
    g.add(s.clone(), graph_identity::vocab::OWL_SAME_AS, iri("https://ex.org/p#x"))?;
    g.add(s.clone(), graph_identity::vocab::CI_ALIAS, iri("https://ex.org/q"))?;
    let opts = UriOptions {
        include_fragments: false,
        ..UriOptions::default()
    };
    let uri = with_resolver(&g, config(), |r| r.canonical_uri(&s, &opts))?;
    assert_eq!(uri, Some(iri("https://ex.org/q")));
    Ok(())
}

#[test]
fn host_cycles_terminate() -> Result<()> {
    let mut g = MemoryGraph::new();
    let a = iri("urn:uuid:77777777-7777-4777-8777-777777777777");
    let b = iri("urn:uuid:88888888-8888-4888-8888-888888888888");
    g.add(a.clone(), CI_FRAGMENT_OF, b.clone())?;
    g.add(b.clone(), CI_FRAGMENT_OF, a.clone())?;
    let uri = with_resolver(&g, config(), |r| r.canonical_uri(&a, &UriOptions::default()))?;
    let uri = uri.expect("some uri");
    assert!(uri.value().starts_with("https://ex.org/"));
    Ok(())
}

#[test]
fn https_sorts_before_http() -> Result<()> {
    let mut g = MemoryGraph::new();
    let s = iri("urn:uuid:99999999-9999-4999-8999-999999999999");
    g.add(s.clone(), graph_identity::vocab::CI_CANONICAL, iri("http://ex.org/x"))?;
    g.add(s.clone(), graph_identity::vocab::CI_CANONICAL, iri("https://ex.org/y"))?;
    let uri = with_resolver(&g, config(), |r| r.canonical_uri(&s, &UriOptions::default()))?;
    assert_eq!(uri, Some(iri("https://ex.org/y")));
    Ok(())
}
