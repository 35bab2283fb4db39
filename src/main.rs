use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::{error, info};

use prose_lint::config::load_character_table_file;
use prose_lint::{
    load_configuration_file, Diagnostics, Document, InputFormat, Parser, ResultFormat,
    SentenceExtractor, SharedResources, Terminators, ValidationEngine, ValidatorRegistry,
    WriterDistributor,
};

#[derive(ClapParser)]
#[command(name = "prose-lint")]
#[command(about = "Check prose documents against style and structure rules")]
struct Args {
    /// Validator configuration (XML)
    #[arg(short, long)]
    conf: PathBuf,

    /// Character table (XML), needed by InvalidCharacter
    #[arg(long)]
    char_table: Option<PathBuf>,

    /// Input format: markdown, wiki or plain (default: from the file extension)
    #[arg(short, long)]
    format: Option<InputFormat>,

    /// Result format: plain, xml or json
    #[arg(short, long, default_value = "plain")]
    result_format: ResultFormat,

    /// Extra sentence terminators in addition to '.', e.g. "?!。"
    #[arg(long)]
    terminators: Option<String>,

    /// Check documents on all cores
    #[arg(long)]
    parallel: bool,

    /// Documents to check
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = load_configuration_file(&args.conf)
        .with_context(|| format!("failed to load configuration {}", args.conf.display()))?;

    let mut resources = SharedResources::new();
    if let Some(path) = &args.char_table {
        let table = load_character_table_file(path)
            .with_context(|| format!("failed to load character table {}", path.display()))?;
        resources = resources.with_character_table(table);
    }

    let registry = ValidatorRegistry::with_builtin_validators();
    let engine = ValidationEngine::from_configuration(&config, &resources, &registry)
        .context("invalid validator configuration")?;

    let extractor = match &args.terminators {
        Some(extra) => SentenceExtractor::new(Terminators::with_extra(extra.chars())),
        None => SentenceExtractor::default(),
    };
    let documents = parse_inputs(&args.inputs, args.format, &extractor);
    info!("Parsed {} of {} inputs", documents.len(), args.inputs.len());

    let stdout = io::stdout();
    let mut distributor = WriterDistributor::with_format(stdout.lock(), args.result_format);
    let errors = if args.parallel {
        engine.check_parallel(&documents, &mut distributor)
    } else {
        engine.check(&documents, &mut distributor)
    };

    Ok(if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Parse every input; unreadable or unparsable files are logged and skipped
fn parse_inputs(
    inputs: &[PathBuf],
    format: Option<InputFormat>,
    extractor: &SentenceExtractor,
) -> Vec<Document> {
    let mut documents = Vec::with_capacity(inputs.len());

    for path in inputs {
        let Some(format) = format.or_else(|| InputFormat::from_path(path)) else {
            error!(
                "Cannot tell the format of {}; pass --format",
                path.display()
            );
            continue;
        };

        let parser = Parser::with_extractor(format, extractor.clone());
        let mut diagnostics = Diagnostics::for_source(path.display().to_string());
        match parser.parse_file(path, &mut diagnostics) {
            Ok(document) => documents.push(document),
            Err(e) => error!("Skipping {}: {}", path.display(), e),
        }
    }

    documents
}
