use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use context_engine::{ContextAssembler, EngineConfig};
use context_exchange::{
    envelope_schema, export, merge, parse_envelope, validate_value, ContextEnvelope, ContextType,
    ExportOptions, MergeStrategy,
};
use context_graph::DependencyAnalyzer;
use context_patterns::PatternExtractor;
use context_summarizer::Summarizer;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "context-analyze")]
#[command(about = "Analyze codebases into portable context envelopes", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a full context for a topic and print it as an envelope
    Analyze(AnalyzeArgs),

    /// Print the dependency graph reachable from the given files
    Graph(FilesArgs),

    /// Print the design patterns, conventions and architecture style of the given files
    Patterns(FilesArgs),

    /// Summarize a file, or a directory as a module
    Summarize(SummarizeArgs),

    /// Validate an envelope document; exits with 1 when it has errors
    Validate(ValidateArgs),

    /// Merge envelopes into one context
    Merge(MergeArgs),

    /// Print the JSON schema of the envelope format
    Schema,
}

#[derive(Args)]
struct FilesArgs {
    /// Source files or directories
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Topic the context is about
    #[arg(long)]
    topic: String,

    /// Agent name stamped on the envelope
    #[arg(long, default_value = context_exchange::DEFAULT_SOURCE_AGENT)]
    agent: String,

    /// Context type: feature|architecture|module|component|full
    #[arg(long = "type", default_value = "full")]
    context_type: String,

    /// Preferred merge strategy recorded on the envelope
    #[arg(long, default_value = "union")]
    strategy: String,

    /// Topics this context derives from, oldest first
    #[arg(long = "inherit")]
    inheritance_chain: Vec<String>,

    /// Source files or directories
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

#[derive(Args)]
struct SummarizeArgs {
    /// File or directory
    path: PathBuf,
}

#[derive(Args)]
struct ValidateArgs {
    /// Envelope JSON file
    envelope: PathBuf,
}

#[derive(Args)]
struct MergeArgs {
    /// union|intersection|override|newest|highest-relevance
    #[arg(long, default_value = "union")]
    strategy: String,

    /// Wrap the merged context in a new envelope
    #[arg(long)]
    envelope: bool,

    /// Envelope JSON files, in merge order
    #[arg(required = true)]
    envelopes: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Analyze(args) => run_analyze(args, config).await?,
        Commands::Graph(args) => run_graph(args, config)?,
        Commands::Patterns(args) => run_patterns(args, config)?,
        Commands::Summarize(args) => run_summarize(args, config)?,
        Commands::Validate(args) => run_validate(args)?,
        Commands::Merge(args) => run_merge(args)?,
        Commands::Schema => print_json(&envelope_schema())?,
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Files named directly plus source files beneath named directories
fn expand_paths(paths: &[PathBuf], config: &EngineConfig) -> Result<Vec<PathBuf>> {
    let summarizer = Summarizer::new(config.summarizer.clone())?;
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(summarizer.list_files(path));
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            anyhow::bail!("No such file or directory: {}", path.display());
        }
    }
    Ok(files)
}

async fn run_analyze(args: AnalyzeArgs, config: EngineConfig) -> Result<()> {
    let context_type: ContextType = args
        .context_type
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let merge_strategy: MergeStrategy = args.strategy.parse()?;

    let files = expand_paths(&args.paths, &config)?;
    let assembler = ContextAssembler::new(config)?;
    let context = assembler
        .assemble(&args.topic, &files)
        .await
        .context("Context assembly failed")?;

    let options = ExportOptions {
        source_agent: args.agent,
        context_type,
        inheritance_chain: args.inheritance_chain,
        merge_strategy,
    };
    print_json(&export(&context, &options))
}

fn run_graph(args: FilesArgs, config: EngineConfig) -> Result<()> {
    let files = expand_paths(&args.paths, &config)?;
    let mut analyzer = DependencyAnalyzer::new(config.analyzer)?;
    print_json(&analyzer.build_dependency_graph(&files))
}

fn run_patterns(args: FilesArgs, config: EngineConfig) -> Result<()> {
    let files = expand_paths(&args.paths, &config)?;
    let mut extractor = PatternExtractor::new(config.patterns)?;
    print_json(&extractor.extract_catalog(&files))
}

fn run_summarize(args: SummarizeArgs, config: EngineConfig) -> Result<()> {
    let mut summarizer = Summarizer::new(config.summarizer)?;
    if args.path.is_dir() {
        print_json(&summarizer.summarize_module(&args.path)?)
    } else {
        print_json(&summarizer.summarize_file(&args.path)?)
    }
}

fn read_document(path: &Path) -> Result<serde_json::Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn run_validate(args: ValidateArgs) -> Result<()> {
    let report = validate_value(&read_document(&args.envelope)?);
    print_json(&report)?;
    if !report.valid {
        std::process::exit(1);
    }
    Ok(())
}

fn run_merge(args: MergeArgs) -> Result<()> {
    let strategy: MergeStrategy = args.strategy.parse()?;

    let envelopes = args
        .envelopes
        .iter()
        .map(|path| {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse_envelope(&text).with_context(|| format!("Rejected envelope {}", path.display()))
        })
        .collect::<Result<Vec<ContextEnvelope>>>()?;

    let merged = merge(&envelopes, strategy)?;
    if args.envelope {
        let options = ExportOptions {
            merge_strategy: strategy,
            inheritance_chain: envelopes
                .iter()
                .flat_map(|e| e.inheritance_chain.iter().cloned())
                .fold(Vec::new(), |mut chain, topic| {
                    if !chain.contains(&topic) {
                        chain.push(topic);
                    }
                    chain
                }),
            ..Default::default()
        };
        print_json(&export(&merged, &options))
    } else {
        print_json(&merged)
    }
}
