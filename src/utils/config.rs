// src/utils/config.rs

use std::env;

use anyhow::{Context, Result};
use log::info;

const DEFAULT_APPROXIMATE_LIMIT: usize = 100;
const MAX_CONCURRENT_CAP: usize = 8;

/// Batch runner configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub vocabulary_path: String,
    pub pair_scorer_checkpoint: String,
    pub count_predictor_checkpoint: String,
    pub input_path: String,
    pub output_path: String,
    pub approximate_limit: usize,
    pub max_concurrent_queries: usize,
}

impl RunConfig {
    pub fn from_env() -> Result<Self> {
        let vocabulary_path =
            env::var("VOCABULARY_PATH").context("VOCABULARY_PATH must be set")?;
        let pair_scorer_checkpoint =
            env::var("PAIR_SCORER_CHECKPOINT").context("PAIR_SCORER_CHECKPOINT must be set")?;
        let count_predictor_checkpoint = env::var("COUNT_PREDICTOR_CHECKPOINT")
            .context("COUNT_PREDICTOR_CHECKPOINT must be set")?;
        let input_path = env::var("INPUT_PATH").context("INPUT_PATH must be set")?;
        let output_path = env::var("OUTPUT_PATH").context("OUTPUT_PATH must be set")?;

        let approximate_limit = env::var("APPROXIMATE_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_APPROXIMATE_LIMIT);

        let max_concurrent_queries = env::var("MAX_CONCURRENT_QUERIES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| num_cpus::get().min(MAX_CONCURRENT_CAP));

        Ok(Self {
            vocabulary_path,
            pair_scorer_checkpoint,
            count_predictor_checkpoint,
            input_path,
            output_path,
            approximate_limit,
            max_concurrent_queries,
        })
    }

    pub fn log_config(&self) {
        info!("Vocabulary: {}", self.vocabulary_path);
        info!(
            "Checkpoints: pair scorer {}, count predictor {}",
            self.pair_scorer_checkpoint, self.count_predictor_checkpoint
        );
        info!("Input: {} -> Output: {}", self.input_path, self.output_path);
        info!(
            "Approximate limit: {}, max concurrent queries: {}",
            self.approximate_limit, self.max_concurrent_queries
        );
    }
}
