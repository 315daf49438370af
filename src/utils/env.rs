// src/utils/env.rs

use log::debug;

/// Loads a `.env` file into the process environment when present. Missing
/// files are fine; the process environment wins either way.
pub fn load_env() {
    match dotenv::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(_) => debug!("No .env file found; using process environment"),
    }
}
