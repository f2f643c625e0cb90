use std::{fs, path::PathBuf, time::Instant};

use anyhow::Context;
use clap::Parser;
use poster_title::{wire, ResolverOptions, TitleCase, TitleResolverBuilder};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Resolve a poster title from a saved OCR response.
#[derive(Debug, Parser)]
struct Args {
    /// OCR response JSON (`textAnnotations`).
    ocr: PathBuf,
    /// Movie database search response JSON (`results`).
    #[arg(long)]
    records: Option<PathBuf>,
    /// TOML file overriding the default heuristics.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_parser = parse_case)]
    case: Option<TitleCase>,
}

fn parse_case(value: &str) -> Result<TitleCase, String> {
    match value {
        "upper" => Ok(TitleCase::Upper),
        "title" => Ok(TitleCase::Title),
        "preserve" => Ok(TitleCase::Preserve),
        other => Err(format!("unknown case {other:?}, expected upper, title or preserve")),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let options = match &args.config {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            ResolverOptions::from_toml_str(&source)?
        }
        None => ResolverOptions::default(),
    };
    let mut builder = TitleResolverBuilder::new().options(options);
    if let Some(case) = args.case {
        builder = builder.title_case(case);
    }
    let resolver = builder.build();

    let payload = fs::read_to_string(&args.ocr)
        .with_context(|| format!("Failed to read OCR response {}", args.ocr.display()))?;
    let detections = wire::detections_from_json(&payload)?;

    let start = Instant::now();
    let title = resolver.resolve_title(&detections);
    log::debug!("Title resolution took {:?}", start.elapsed());

    let Some(title) = title else {
        println!("No title found");
        return Ok(());
    };
    println!("Title: {title}");

    if let Some(path) = &args.records {
        let payload = fs::read_to_string(path)
            .with_context(|| format!("Failed to read search results {}", path.display()))?;
        let records = wire::records_from_json(&payload)?;
        match resolver.best_match(&title, &records) {
            Some(found) => println!("Match: {} ({:.3})", found.record.title, found.score),
            None => println!("No candidate records"),
        }
    }
    Ok(())
}
