//! kube-swagger CLI
//!
//! Command-line interface for explaining and comparing Kubernetes API types
//! using the swagger specs published with each release.

mod render;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::*;
use kube_swagger_analyzer::{
    compare_kind, diff_json, kinds_in_either, strip_descriptions, ApiVersionCatalog,
    CompareOptions, DiffOptions, KindComparison, KindFilter,
};
use kube_swagger_common::{DictPolicy, RequiredDiff, ToolConfig};
use kube_swagger_parser::{
    paths_to_depth, KubeVersion, RawResolver, Resolver, ResolverOptions, SpecCache,
    SwaggerDocument, SwaggerParser,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "kube-swagger")]
#[command(version, about = "Explain and compare Kubernetes API types across releases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory of cached `<version>-swagger-spec.json` files
    #[arg(long, global = true)]
    spec_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved field tree of one or more kinds
    #[command(after_help = "EXAMPLES:\n  \
        # Explain Deployment from a cached 1.23.9 spec\n  \
        kube-swagger explain --spec 1.23.9 --type Deployment\n\n  \
        # Only the apps/v1 version, two levels deep, as a table\n  \
        kube-swagger explain --spec swagger.json --type Deployment \\\n    \
        --group-version apps.v1 --depth 2 --format table")]
    Explain {
        /// Spec file path or cached Kubernetes version (defaults to the last configured version)
        #[arg(short, long)]
        spec: Option<String>,

        /// Kinds to explain; all indexed kinds when omitted
        #[arg(short = 't', long = "type", value_delimiter = ',')]
        kinds: Vec<String>,

        /// Group/versions to keep (e.g. apps.v1); all when omitted
        #[arg(long = "group-version", value_delimiter = ',')]
        group_versions: Vec<String>,

        /// Maximum field depth (0 = unlimited)
        #[arg(long)]
        depth: Option<usize>,

        /// How objects without properties are resolved
        #[arg(long)]
        dict_policy: Option<DictPolicy>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExplainFormat::Condensed)]
        format: ExplainFormat,
    },

    /// Diff kinds between two specs
    #[command(after_help = "EXAMPLES:\n  \
        # Compare Pod between two cached releases\n  \
        kube-swagger compare --spec 1.18.20,1.23.9\n\n  \
        # Compare every kind, printing old and new values\n  \
        kube-swagger compare --spec old.json,new.json --all --print-values")]
    Compare {
        /// Old and new spec (file paths or cached versions); defaults to the configured versions
        #[arg(short, long, value_delimiter = ',')]
        spec: Vec<String>,

        /// Kinds to compare
        #[arg(short = 't', long = "type", value_delimiter = ',', conflicts_with = "all")]
        kinds: Vec<String>,

        /// Compare every kind indexed in either spec
        #[arg(long)]
        all: bool,

        /// Old-side group/versions to keep
        #[arg(long, value_delimiter = ',')]
        old_group_version: Vec<String>,

        /// New-side group/versions to keep
        #[arg(long, value_delimiter = ',')]
        new_group_version: Vec<String>,

        /// Print old and new values under each change
        #[arg(long)]
        print_values: bool,

        /// Compare JSON-shaped resolutions that keep the swagger layout
        #[arg(long)]
        raw: bool,

        /// Ignore changes to `description` text in raw comparisons
        #[arg(long, action = ArgAction::Set, default_value_t = true)]
        skip_descriptions: bool,

        /// How `required` lists are compared (positional, set)
        #[arg(long)]
        required_diff: Option<RequiredDiff>,

        /// How objects without properties are resolved
        #[arg(long)]
        dict_policy: Option<DictPolicy>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show which group/versions serve each kind, release over release
    #[command(after_help = "EXAMPLES:\n  \
        # Changes between the configured versions\n  \
        kube-swagger kinds\n\n  \
        # Ingress and CronJob across three releases\n  \
        kube-swagger kinds --spec 1.18.20,1.21.14,1.25.0-alpha.2 --include Ingress,CronJob")]
    Kinds {
        /// Specs in release order (file paths or cached versions)
        #[arg(short, long, value_delimiter = ',')]
        spec: Vec<String>,

        /// Only report these kinds
        #[arg(long, value_delimiter = ',')]
        include: Vec<String>,

        /// Never report these kinds
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List known Kubernetes releases and where their specs are published
    Versions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExplainFormat {
    /// Indented field names with aligned types
    Condensed,
    /// Type | Field table
    Table,
    /// Resolved trees as JSON
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => ToolConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ToolConfig::default(),
    };
    if let Some(spec_dir) = cli.spec_dir {
        config.spec_dir = spec_dir;
    }
    debug!(?config, "effective configuration");

    match cli.command {
        Commands::Explain {
            spec,
            kinds,
            group_versions,
            depth,
            dict_policy,
            format,
        } => {
            if let Some(depth) = depth {
                config.depth = depth;
            }
            if let Some(policy) = dict_policy {
                config.dict_policy = policy;
            }
            explain_command(
                &config,
                spec.as_deref(),
                &kinds,
                &group_versions,
                format,
            )?;
        }

        Commands::Compare {
            spec,
            kinds,
            all,
            old_group_version,
            new_group_version,
            print_values,
            raw,
            skip_descriptions,
            required_diff,
            dict_policy,
            format,
        } => {
            if let Some(mode) = required_diff {
                config.required_diff = mode;
            }
            if let Some(policy) = dict_policy {
                config.dict_policy = policy;
            }
            compare_command(CompareRun {
                config: &config,
                sources: &spec,
                kinds: &kinds,
                all,
                old_group_versions: old_group_version,
                new_group_versions: new_group_version,
                print_values,
                raw,
                skip_descriptions,
                format,
            })?;
        }

        Commands::Kinds {
            spec,
            include,
            exclude,
            format,
        } => {
            config.include_kinds.extend(include);
            config.exclude_kinds.extend(exclude);
            kinds_command(&config, &spec, format)?;
        }

        Commands::Versions => versions_command(&config),
    }

    Ok(())
}

/// Log to stderr, filtered by `KUBE_SWAGGER_LOG` (default `warn`)
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env = std::env::var("KUBE_SWAGGER_LOG").unwrap_or_else(|_| default.to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Load a document from a file path, or from the cache when given a version
fn load_document(source: &str, cache: &SpecCache) -> Result<SwaggerDocument> {
    let path = Path::new(source);
    if path.is_file() {
        eprintln!("{} Loading spec file: {}", "→".cyan(), path.display());
        let parser = SwaggerParser::from_file(path)
            .with_context(|| format!("Failed to load swagger spec {}", path.display()))?;
        return Ok(parser.into_document());
    }

    let version = KubeVersion::parse(source)
        .with_context(|| format!("{source:?} is neither a spec file nor a Kubernetes version"))?;
    eprintln!(
        "{} Loading cached spec for Kubernetes {}",
        "→".cyan(),
        version.to_string().yellow()
    );
    cache
        .load(&version)
        .with_context(|| format!("Failed to load spec for Kubernetes {version}"))
}

fn resolver_options(config: &ToolConfig) -> ResolverOptions {
    ResolverOptions {
        dict_policy: config.dict_policy,
        ..ResolverOptions::default()
    }
}

fn explain_command(
    config: &ToolConfig,
    source: Option<&str>,
    kinds: &[String],
    group_versions: &[String],
    format: ExplainFormat,
) -> Result<()> {
    let Some(source) = source.or_else(|| config.versions.last().map(String::as_str)) else {
        bail!("No spec given and no versions configured");
    };
    let cache = SpecCache::new(&config.spec_dir);
    let document = load_document(source, &cache)?;

    let kinds: Vec<String> = if kinds.is_empty() {
        document
            .gvk_index()
            .kinds()
            .filter(|kind| config.kind_selected(kind))
            .map(str::to_string)
            .collect()
    } else {
        kinds.to_vec()
    };

    let resolver = Resolver::new(&document).with_options(resolver_options(config));
    let mut json_output = serde_json::Map::new();

    for kind in &kinds {
        debug!(kind = %kind, "explaining");
        let mut resolved = match resolver.resolve_kind(kind) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(kind = %kind, error = %e, "skipping kind");
                eprintln!("{} {}: {}", "✗".red(), kind, e);
                continue;
            }
        };
        if !group_versions.is_empty() {
            resolved.retain(|group_version, _| group_versions.contains(group_version));
        }
        if resolved.is_empty() {
            debug!(kind = %kind, "no matching group/versions");
            continue;
        }

        for (group_version, tree) in &resolved {
            match format {
                ExplainFormat::Json => {
                    json_output.insert(
                        format!("{group_version}.{kind}"),
                        serde_json::to_value(tree)?,
                    );
                }
                ExplainFormat::Condensed => {
                    let entries = paths_to_depth(tree, &[], config.depth);
                    println!("{}:", format!("{group_version}.{kind}").bold());
                    println!("{}\n", render::condensed(&entries).join("\n"));
                }
                ExplainFormat::Table => {
                    let entries = paths_to_depth(tree, &[], config.depth);
                    println!("{}:", format!("{group_version}.{kind}").bold());
                    println!("{}", render::explain_table(&entries));
                }
            }
        }
    }

    if format == ExplainFormat::Json {
        println!("{}", serde_json::to_string_pretty(&json_output)?);
    }

    Ok(())
}

struct CompareRun<'a> {
    config: &'a ToolConfig,
    sources: &'a [String],
    kinds: &'a [String],
    all: bool,
    old_group_versions: Vec<String>,
    new_group_versions: Vec<String>,
    print_values: bool,
    raw: bool,
    skip_descriptions: bool,
    format: OutputFormat,
}

fn compare_command(run: CompareRun) -> Result<()> {
    let config = run.config;
    let sources = if run.sources.is_empty() {
        config.versions.as_slice()
    } else {
        run.sources
    };
    let [old_source, new_source] = sources else {
        bail!("Expected exactly 2 specs to compare, found {}", sources.len());
    };

    let cache = SpecCache::new(&config.spec_dir);
    let old = load_document(old_source, &cache)?;
    let new = load_document(new_source, &cache)?;

    let kinds: Vec<String> = if run.all {
        kinds_in_either(&old, &new)
            .into_iter()
            .filter(|kind| config.kind_selected(kind))
            .collect()
    } else if run.kinds.is_empty() {
        vec!["Pod".to_string()]
    } else {
        run.kinds.to_vec()
    };

    if run.raw {
        let sides = [(old_source.as_str(), &old), (new_source.as_str(), &new)];
        return compare_raw(sides, &kinds, &run);
    }

    let options = CompareOptions {
        resolver: resolver_options(config),
        diff: DiffOptions {
            required: config.required_diff,
        },
        old_group_versions: run.old_group_versions,
        new_group_versions: run.new_group_versions,
    };

    let mut all_comparisons: Vec<KindComparison> = Vec::new();
    for kind in &kinds {
        let comparisons = match compare_kind(&old, &new, kind, &options) {
            Ok(comparisons) => comparisons,
            Err(e) => {
                warn!(kind = %kind, error = %e, "skipping kind");
                eprintln!("{} {}: {}", "✗".red(), kind, e);
                continue;
            }
        };

        if run.format == OutputFormat::Text {
            println!("{} {}", "→".cyan(), format!("inspecting type {kind}").bold());
            for comparison in &comparisons {
                println!(
                    "{}",
                    render::comparison_header(
                        kind,
                        (old_source.as_str(), comparison.old_group_version.as_str()),
                        (new_source.as_str(), comparison.new_group_version.as_str()),
                    )
                );
                if comparison.is_empty() {
                    println!("  {}", "✓ no differences".green());
                }
                for line in render::diff_lines(&comparison.diffs, run.print_values) {
                    println!("{line}");
                }
                println!();
            }
        }
        all_comparisons.extend(comparisons);
    }

    if run.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&all_comparisons)?);
    }

    Ok(())
}

/// Diff JSON-shaped resolutions of every old x new group/version pair
fn compare_raw(
    [(old_source, old), (new_source, new)]: [(&str, &SwaggerDocument); 2],
    kinds: &[String],
    run: &CompareRun,
) -> Result<()> {
    let old_resolver = RawResolver::new(old);
    let new_resolver = RawResolver::new(new);
    let mut json_output = serde_json::Map::new();

    for kind in kinds {
        let resolved = (old_resolver.resolve_kind(kind), new_resolver.resolve_kind(kind));
        let (mut old_values, mut new_values) = match resolved {
            (Ok(old_values), Ok(new_values)) => (old_values, new_values),
            (Err(e), _) | (_, Err(e)) => {
                warn!(kind = %kind, error = %e, "skipping kind");
                eprintln!("{} {}: {}", "✗".red(), kind, e);
                continue;
            }
        };

        if !run.old_group_versions.is_empty() {
            old_values.retain(|group_version, _| run.old_group_versions.contains(group_version));
        }
        if !run.new_group_versions.is_empty() {
            new_values.retain(|group_version, _| run.new_group_versions.contains(group_version));
        }

        if run.format == OutputFormat::Text {
            println!("{} {}", "→".cyan(), format!("inspecting type {kind}").bold());
        }
        for (old_group_version, old_value) in &old_values {
            for (new_group_version, new_value) in &new_values {
                let mut records = diff_json(Some(old_value), Some(new_value));
                if run.skip_descriptions {
                    strip_descriptions(&mut records);
                }

                match run.format {
                    OutputFormat::Text => {
                        let header = render::comparison_header(
                            kind,
                            (old_source, old_group_version.as_str()),
                            (new_source, new_group_version.as_str()),
                        );
                        println!("{header} (raw)");
                        if records.is_empty() {
                            println!("  {}", "✓ no differences".green());
                        }
                        for line in render::diff_lines(&records, run.print_values) {
                            println!("{line}");
                        }
                        println!();
                    }
                    OutputFormat::Json => {
                        json_output.insert(
                            format!(
                                "{kind}: {old_source}@{old_group_version} vs. {new_source}@{new_group_version}"
                            ),
                            serde_json::to_value(&records)?,
                        );
                    }
                }
            }
        }
    }

    if run.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&json_output)?);
    }

    Ok(())
}

fn kinds_command(config: &ToolConfig, sources: &[String], format: OutputFormat) -> Result<()> {
    let sources = if sources.is_empty() {
        config.versions.as_slice()
    } else {
        sources
    };
    let cache = SpecCache::new(&config.spec_dir);
    let filter = KindFilter::new(
        config.include_kinds.iter().cloned(),
        config.exclude_kinds.iter().cloned(),
    );

    let mut previous = ApiVersionCatalog::empty("???");
    let mut json_output = Vec::new();

    for source in sources {
        let document = load_document(source, &cache)?;
        let catalog = ApiVersionCatalog::from_document(source, &document);
        let changes = previous.changes(&catalog, &filter);

        match format {
            OutputFormat::Text => {
                println!(
                    "{} comparing {} to {}",
                    "→".cyan(),
                    previous.version,
                    catalog.version.yellow()
                );
                println!("{}", render::kind_changes_table(&changes));
            }
            OutputFormat::Json => {
                json_output.push(serde_json::json!({
                    "from": previous.version,
                    "to": catalog.version,
                    "changes": changes,
                }));
            }
        }

        previous = catalog;
    }

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&json_output)?);
    }

    Ok(())
}

fn versions_command(config: &ToolConfig) {
    let cache = SpecCache::new(&config.spec_dir);
    for version in KubeVersion::latest_patches() {
        let marker = if cache.contains(&version) {
            "✓".green()
        } else {
            " ".normal()
        };
        println!("{marker} {:<16} {}", version.to_string(), version.spec_url());
    }
}
