//! `gid`: resolves identities and labels over RDF graphs loaded from files.
//!
//! **Usage:**
//! ```
//! gid --graph data.ttl [--graph more.nt] [--base <iri>] [--policy policy.toml] <command> ...
//! ```
//!
//! Commands: `uri`, `uuid`, `label`, `strata`, `predicates`, `replacements`
//! and `struct`. Terms print in N-Triples form, one per line, or as JSON
//! with `--json`. With `--strict` an empty answer exits non-zero.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use graph_identity::identity::{UriOptions, UuidOptions};
use graph_identity::loader;
use graph_identity::serializer::ntriples;
use graph_identity::vocab::expand_curie;
use graph_identity::{
    LabelOptions, MemoryGraph, Normalize, OntologyIndex, PolicyFile, Resolver, ResolverConfig,
    Statement, StructOptions, Term,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Resolve canonical identifiers and labels in RDF graphs.
#[derive(Parser)]
#[command(name = "gid", about = "Resolve canonical identifiers and labels in RDF graphs")]
struct Args {
    /// Turtle (.ttl) or N-Triples (.nt) file to load. Repeatable.
    #[arg(long = "graph", short = 'g', global = true)]
    graphs: Vec<PathBuf>,

    /// Base IRI for relative input, slugs and UUID paths.
    #[arg(long, global = true)]
    base: Option<String>,

    /// TOML file with `[[label]]` and `[[fragment]]` policies.
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    /// Only accept published candidates.
    #[arg(long, global = true)]
    published: bool,

    /// Print every candidate instead of the best one.
    #[arg(long, global = true)]
    all: bool,

    /// Print JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Exit non-zero when nothing is found.
    #[arg(long, global = true)]
    strict: bool,

    /// More logging (-v info, -vv debug, -vvv trace). Overrides RUST_LOG.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Canonical URI of a subject.
    Uri {
        /// Subject IRI, CURIE or `_:` blank node.
        subject: String,
        /// Drop candidates with a fragment when others exist.
        #[arg(long)]
        no_fragments: bool,
        /// Turn slugs into URIs under the base.
        #[arg(long)]
        slugs: bool,
    },
    /// Canonical UUID of a URI.
    Uuid {
        /// URI, relative to the base if one is given.
        uri: String,
    },
    /// Label or description of a subject.
    Label {
        /// Subject IRI, CURIE or `_:` blank node.
        subject: String,
        /// Look up a description instead.
        #[arg(long)]
        description: bool,
        /// Use the alternate stack.
        #[arg(long)]
        alt: bool,
    },
    /// Class ancestry, nearest first.
    Strata {
        /// Class IRIs or CURIEs.
        #[arg(required = true)]
        classes: Vec<String>,
    },
    /// Equivalent and sub-properties.
    Predicates {
        /// Property IRIs or CURIEs.
        #[arg(required = true)]
        properties: Vec<String>,
    },
    /// Current successors along replacement chains.
    Replacements {
        /// Subject IRI or CURIE.
        subject: String,
    },
    /// Neighbors of a subject, grouped by predicate.
    Struct {
        /// Subject IRI, CURIE or `_:` blank node.
        subject: String,
        /// Referrers instead of objects.
        #[arg(long)]
        reverse: bool,
        /// Also walk inverse and symmetric predicates.
        #[arg(long)]
        inverses: bool,
        /// Rewrite resource neighbors to canonical identifiers.
        #[arg(long, value_enum)]
        normalize: Option<NormalizeArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum NormalizeArg {
    Uuid,
    Uri,
    UuidOrUri,
}

impl From<NormalizeArg> for Normalize {
    fn from(arg: NormalizeArg) -> Self {
        match arg {
            NormalizeArg::Uuid => Normalize::Uuid,
            NormalizeArg::Uri => Normalize::Uri,
            NormalizeArg::UuidOrUri => Normalize::UuidOrUri,
        }
    }
}

#[derive(Serialize)]
struct LabelRow {
    predicate: String,
    value: String,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_graph(paths: &[PathBuf]) -> Result<MemoryGraph> {
    let mut graph = MemoryGraph::new();
    for path in paths {
        let n = loader::load_path(&mut graph, path)
            .with_context(|| format!("loading {}", path.display()))?;
        tracing::info!(path = %path.display(), statements = n, "loaded graph");
    }
    Ok(graph)
}

fn build_config(args: &Args, facts: &OntologyIndex) -> Result<ResolverConfig> {
    let mut config = ResolverConfig::default();
    if let Some(base) = &args.base {
        config = config.with_base(base).context("parsing --base")?;
    }
    if let Some(path) = &args.policy {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let file = PolicyFile::parse(&src).with_context(|| format!("parsing {}", path.display()))?;
        config.label_policy = Arc::new(file.label_policy(facts)?);
        config.fragment_policy = Arc::new(file.fragment_policy()?);
    }
    Ok(config)
}

fn vocabulary_term(input: &str) -> Result<Term> {
    expand_curie(input)
        .map(Term::iri)
        .ok_or_else(|| anyhow!("not an IRI or known CURIE: {input}"))
}

fn subject_term(resolver: &Resolver<'_>, input: &str) -> Result<Term> {
    match expand_curie(input) {
        Some(iri) if !input.contains("://") => Ok(Term::iri(iri)),
        _ => Ok(resolver.coerce(input)?),
    }
}

/// Prints terms; returns whether anything was printed.
fn print_terms(terms: &[Term], json: bool) -> Result<bool> {
    if json {
        let values: Vec<String> = terms.iter().map(|t| t.value().to_string()).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        for t in terms {
            println!("{t}");
        }
    }
    Ok(!terms.is_empty())
}

fn pick(mut terms: Vec<Term>, all: bool) -> Vec<Term> {
    if !all {
        terms.truncate(1);
    }
    terms
}

fn run(args: &Args, resolver: &Resolver<'_>) -> Result<bool> {
    let uuid_opts = UuidOptions {
        published_only: args.published,
    };
    match &args.command {
        Command::Uri {
            subject,
            no_fragments,
            slugs,
        } => {
            let subject = subject_term(resolver, subject)?;
            let opts = UriOptions {
                include_fragments: !no_fragments,
                allow_slugs: *slugs,
            };
            let terms = if args.all {
                resolver.canonical_uris(&subject, &opts)?
            } else {
                resolver.canonical_uri(&subject, &opts)?.into_iter().collect()
            };
            print_terms(&terms, args.json)
        }
        Command::Uuid { uri } => {
            let uri = resolver.coerce(uri)?;
            let terms = pick(resolver.canonical_uuids(&uri, uuid_opts)?, args.all);
            print_terms(&terms, args.json)
        }
        Command::Label {
            subject,
            description,
            alt,
        } => {
            let subject = subject_term(resolver, subject)?;
            let opts = LabelOptions {
                description: *description,
                alt: *alt,
                types: None,
            };
            let mut labels = resolver.labels_for(&subject, &opts, None)?;
            if !args.all {
                labels.truncate(1);
            }
            if args.json {
                let rows: Vec<LabelRow> = labels
                    .iter()
                    .map(|l| LabelRow {
                        predicate: l.predicate.value().to_string(),
                        value: l.value.value().to_string(),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for l in &labels {
                    println!("{}\t{}", l.predicate, l.value);
                }
            }
            Ok(!labels.is_empty())
        }
        Command::Strata { classes } => {
            let seeds = classes
                .iter()
                .map(|c| vocabulary_term(c))
                .collect::<Result<Vec<_>>>()?;
            let strata = resolver.type_strata(&seeds)?;
            if args.json {
                let layers: Vec<Vec<&str>> = strata
                    .layers()
                    .iter()
                    .map(|layer| layer.iter().map(Term::value).collect())
                    .collect();
                println!("{}", serde_json::to_string_pretty(&layers)?);
            } else {
                for (depth, layer) in strata.layers().iter().enumerate() {
                    for class in layer {
                        println!("{depth}\t{class}");
                    }
                }
            }
            Ok(!strata.is_empty())
        }
        Command::Predicates { properties } => {
            let seeds = properties
                .iter()
                .map(|p| vocabulary_term(p))
                .collect::<Result<Vec<_>>>()?;
            let set: Vec<Term> = resolver.predicate_set(&seeds)?.into_iter().collect();
            print_terms(&set, args.json)
        }
        Command::Replacements { subject } => {
            let subject = subject_term(resolver, subject)?;
            let found: Vec<Term> = resolver
                .replacements_for(&subject, args.published)?
                .into_iter()
                .collect();
            print_terms(&found, args.json)
        }
        Command::Struct {
            subject,
            reverse,
            inverses,
            normalize,
        } => {
            let subject = subject_term(resolver, subject)?;
            let opts = StructOptions {
                reverse: *reverse,
                include_inverses: *inverses,
                ..StructOptions::default()
            };
            let normalize = normalize.map(Normalize::from);
            let subject = resolver.struct_subject(&subject, normalize)?;
            let s = resolver.struct_for(&subject, &opts, normalize)?;
            if args.json {
                let map: std::collections::BTreeMap<&str, Vec<String>> = s
                    .iter()
                    .map(|(p, nodes)| (p.value(), nodes.iter().map(ToString::to_string).collect()))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else {
                let statements: Vec<Statement> = s
                    .iter()
                    .flat_map(|(p, nodes)| {
                        nodes.iter().map(|n| {
                            if *reverse {
                                Statement::new(n.clone(), p.clone(), subject.clone())
                            } else {
                                Statement::new(subject.clone(), p.clone(), n.clone())
                            }
                        })
                    })
                    .collect();
                print!("{}", ntriples::to_ntriples(&statements));
            }
            Ok(!s.is_empty())
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let graph = load_graph(&args.graphs)?;
    let facts = OntologyIndex::from_graph(&graph).context("indexing ontology")?;
    let config = build_config(&args, &facts)?;
    let resolver = Resolver::new(&graph, &facts, config);

    let found = run(&args, &resolver)?;
    if !found && args.strict {
        bail!("no result");
    }
    Ok(())
}
