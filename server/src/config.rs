use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::matcher::MatchStrategy;

const DEFAULT_MODELS: &str = "gemini-1.5-flash,gemini-1.5-pro,gemini-1.0";

pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub gemini_api_key: Option<String>,
    pub ai_models: Vec<String>,
    pub ai_timeout: Duration,
    pub match_strategy: MatchStrategy,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "8000"),
            database_url: var("DATABASE_URL").ok(),
            gemini_api_key: var("GEMINI_API_KEY").ok(),
            ai_models: load_models("AI_MODELS"),
            ai_timeout: Duration::from_secs(try_load("AI_TIMEOUT_SECS", "10")),
            match_strategy: try_load("MATCH_STRATEGY", "containment"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn load_models(key: &str) -> Vec<String> {
    var(key)
        .unwrap_or_else(|_| DEFAULT_MODELS.to_string())
        .split(',')
        .map(|model| model.trim().to_string())
        .filter(|model| !model.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::load_models;

    #[test]
    fn unset_models_var_falls_back_to_defaults() {
        let models = load_models("CAKESHOP_UNSET_MODELS_VAR");

        assert_eq!(
            models,
            vec!["gemini-1.5-flash", "gemini-1.5-pro", "gemini-1.0"]
        );
    }
}
