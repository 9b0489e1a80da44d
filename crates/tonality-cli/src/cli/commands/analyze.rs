//! The `analyze` command: fixture catalog in, one scored video out.

use crate::cli::args::{AnalyzeArgs, OutputFormat};
use crate::exit_codes;
use std::sync::Arc;
use tonality_core::config::{load_config, EngineConfig};
use tonality_core::engine::Orchestrator;
use tonality_core::errors::ServiceError;
use tonality_core::providers::{FixedScorer, LexiconScorer, SentimentScorer, TracingScorer};
use tonality_core::service::AnalysisService;
use tonality_core::sources::FixtureCatalog;
use tonality_core::store::JsonlStore;

pub async fn run(args: AnalyzeArgs) -> anyhow::Result<i32> {
    let config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                return Ok(exit_codes::CONFIG_ERROR);
            }
        },
        None => EngineConfig::default(),
    };

    let scorer = match build_scorer(&args.provider) {
        Ok(scorer) => scorer,
        Err(e) => {
            eprintln!("config error: {e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let catalog = match FixtureCatalog::from_path(&args.fixtures) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            eprintln!("config error: {e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    tracing::info!(
        video = args.video.as_str(),
        provider = args.provider.as_str(),
        policy = config.failure_policy.as_str(),
        "starting analysis"
    );

    let orchestrator = Orchestrator::new(scorer, config);
    let mut service = AnalysisService::new(catalog.clone(), catalog, orchestrator);
    if let Some(path) = &args.store {
        service = service.with_store(Arc::new(JsonlStore::new(path)));
    }

    match service.analyze_video(&args.video).await {
        Ok(analysis) => {
            match args.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
                OutputFormat::Text => match analysis.score {
                    Some(score) => println!("{}: {score:.4}", analysis.id),
                    None => println!("{}: no comments or caption to analyze", analysis.id),
                },
            }
            Ok(exit_codes::SUCCESS)
        }
        Err(e) => {
            eprintln!("analysis failed: {e}");
            Ok(exit_code_for(&e))
        }
    }
}

fn exit_code_for(err: &ServiceError) -> i32 {
    if err.is_not_found() {
        return exit_codes::VIDEO_NOT_FOUND;
    }
    match err {
        ServiceError::Comments(_) | ServiceError::Captions(_) => exit_codes::SOURCE_UNAVAILABLE,
        ServiceError::Scoring(_) | ServiceError::Store { .. } => exit_codes::ANALYSIS_FAILED,
    }
}

/// Parse the `--provider` flag. The fixed provider exists for dry runs and
/// plumbing checks; the lexicon one is the offline default.
fn build_scorer(provider: &str) -> anyhow::Result<Arc<dyn SentimentScorer>> {
    let inner: Arc<dyn SentimentScorer> = if provider == "lexicon" {
        Arc::new(LexiconScorer::new())
    } else if let Some(raw) = provider.strip_prefix("fixed:") {
        let score: f32 = raw
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid fixed score {raw:?}"))?;
        if !(-1.0..=1.0).contains(&score) {
            anyhow::bail!("fixed score {score} is outside [-1.0, 1.0]");
        }
        Arc::new(FixedScorer::new(score))
    } else {
        anyhow::bail!("unknown provider {provider:?}, expected \"lexicon\" or \"fixed:<score>\"");
    };
    Ok(Arc::new(TracingScorer::new(inner)))
}
