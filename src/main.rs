use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use diagnosis_lib::{
    candidate_generation::{JaroRankedRecall, Vocabulary},
    matching::{DiagnosisResolver, ResolverOptions},
    models::stats_models::{BatchStats, ResolutionStats},
    scoring::{EnsembleCountPredictor, LogisticEnsembleScorer},
    utils::{config::RunConfig, env::load_env, get_memory_usage},
};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use tokio::sync::{Mutex, Semaphore};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    info!("Starting diagnosis normalization batch run");
    load_env();

    let config = RunConfig::from_env().context("Failed to read run configuration")?;
    config.log_config();

    let run_id = Uuid::new_v4().to_string();
    let run_timestamp = Utc::now().naive_utc();
    let mut batch_stats = BatchStats::new(run_id.clone(), run_timestamp);
    info!("Run {} started at {}", run_id, run_timestamp);

    // Startup-fatal loads: the vocabulary and both ensemble checkpoints.
    let vocabulary = Arc::new(
        Vocabulary::load_tsv(Path::new(&config.vocabulary_path))
            .context("Failed to load vocabulary")?,
    );
    info!(
        "Loaded {} vocabulary entries (fingerprint {})",
        vocabulary.len(),
        vocabulary.fingerprint()
    );

    let scorer = LogisticEnsembleScorer::load(Path::new(&config.pair_scorer_checkpoint))
        .context("Failed to load pair scorer checkpoint")?;
    let count_predictor =
        EnsembleCountPredictor::load(Path::new(&config.count_predictor_checkpoint))
            .context("Failed to load count predictor checkpoint")?;
    info!(
        "Ensembles ready: {} pair members, {} count members",
        scorer.member_count(),
        count_predictor.member_count()
    );

    let recall = JaroRankedRecall::new(Arc::clone(&vocabulary));
    let resolver = Arc::new(DiagnosisResolver::new(
        vocabulary,
        Box::new(recall),
        Box::new(scorer),
        Box::new(count_predictor),
        ResolverOptions {
            approximate_limit: config.approximate_limit,
        },
    )?);

    let raw_input = std::fs::read_to_string(&config.input_path)
        .with_context(|| format!("Failed to read input file {}", config.input_path))?;
    let queries: Vec<String> = raw_input.lines().map(|l| l.to_string()).collect();
    info!("Loaded {} queries from {}", queries.len(), config.input_path);

    let pb = ProgressBar::new(queries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .context("Failed to set progress bar style")?
            .progress_chars("#>-"),
    );
    pb.set_message("Resolving queries...");

    // Fan out one task per query, capped by the semaphore; the resolver is
    // read-only after construction so tasks share it without locking.
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent_queries.max(1)));
    let results: Arc<Mutex<Vec<Option<(String, ResolutionStats)>>>> =
        Arc::new(Mutex::new(vec![None; queries.len()]));

    let start = Instant::now();
    let mut handles = Vec::with_capacity(queries.len());
    for (index, query) in queries.into_iter().enumerate() {
        let resolver = Arc::clone(&resolver);
        let semaphore = Arc::clone(&semaphore);
        let results = Arc::clone(&results);
        let pb = pb.clone();

        handles.push(tokio::spawn(async move {
            let _permit = match semaphore.acquire().await {
                Ok(permit) => permit,
                Err(e) => {
                    warn!("Semaphore closed for query {}: {}", index, e);
                    return;
                }
            };
            let outcome = resolver.resolve_detailed(&query);
            results.lock().await[index] = Some(outcome);
            pb.inc(1);
        }));
    }

    for outcome in join_all(handles).await {
        if let Err(e) = outcome {
            warn!("Query task failed: {}", e);
        }
    }
    pb.finish_and_clear();

    // Decisions are written one per line, in input order.
    let mut output = String::new();
    {
        let results = results.lock().await;
        for outcome in results.iter() {
            match outcome {
                Some((decision, stats)) => {
                    batch_stats.absorb(decision, stats);
                    output.push_str(decision);
                }
                None => {
                    batch_stats.queries += 1;
                    batch_stats.empty_decisions += 1;
                }
            }
            output.push('\n');
        }
    }
    std::fs::write(&config.output_path, output)
        .with_context(|| format!("Failed to write output file {}", config.output_path))?;

    batch_stats.processing_time = start.elapsed();
    info!(
        "Run {} finished: {} queries, {} empty decisions, {} multi-target, {} candidates total in {:.2?}",
        batch_stats.run_id,
        batch_stats.queries,
        batch_stats.empty_decisions,
        batch_stats.multi_target_decisions,
        batch_stats.total_candidates,
        batch_stats.processing_time
    );
    info!("Memory usage: {} MB", get_memory_usage().await);

    Ok(())
}
