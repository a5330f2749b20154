use std::env;
use std::time::Duration;

use crate::api::CompetitionKind;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_LEAGUE_ID: u32 = 1;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub league_id: u32,
    pub competition: CompetitionKind,
    pub request_timeout: Duration,
    // Controller-side bound on an in-flight prediction; expiry is a failure.
    pub predict_deadline: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            league_id: DEFAULT_LEAGUE_ID,
            competition: CompetitionKind::default(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            predict_deadline: Duration::from_secs(DEFAULT_TIMEOUT_SECS + 5),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let opt = |key: &str| {
            lookup(key)
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
        };
        let api_base_url = opt("FORECAST_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let league_id = opt("FORECAST_LEAGUE_ID")
            .and_then(|val| val.parse::<u32>().ok())
            .unwrap_or(DEFAULT_LEAGUE_ID);
        let competition = opt("FORECAST_COMPETITION")
            .and_then(|val| CompetitionKind::parse(&val))
            .unwrap_or_default();
        let timeout_secs = opt("FORECAST_TIMEOUT_SECS")
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, 120);
        let deadline_secs = opt("FORECAST_PREDICT_DEADLINE_SECS")
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(timeout_secs + 5)
            .max(timeout_secs);

        Self {
            api_base_url,
            league_id,
            competition,
            request_timeout: Duration::from_secs(timeout_secs),
            predict_deadline: Duration::from_secs(deadline_secs),
        }
    }
}

pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}
