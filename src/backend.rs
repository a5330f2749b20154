use std::time::Duration;

use reqwest::blocking::Response;
use reqwest::header::ACCEPT;
use tracing::debug;

use crate::api::{
    HEALTH_PATH, HealthStatus, PREDICT_PATH, PredictionRequest, PredictionResult, TEAMS_PATH, Team,
    parse_health_json, parse_prediction_json, parse_teams_json,
};
use crate::config::Config;
use crate::error::BackendError;
use crate::http_client::http_client;

const MAX_ERROR_BODY: usize = 200;

pub trait Backend: Send + Sync {
    fn fetch_teams(&self) -> Result<Vec<Team>, BackendError>;

    fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, BackendError>;

    fn health(&self) -> Result<HealthStatus, BackendError> {
        Err(BackendError::Transport("health probe not supported".to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout: config.request_timeout,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_text(&self, path: &str) -> Result<String, BackendError> {
        let client = http_client().map_err(|err| BackendError::Transport(format!("{err:#}")))?;
        let url = self.url(path);
        debug!(%url, "GET");
        let resp = client
            .get(&url)
            .header(ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()?;
        read_body(resp)
    }
}

impl Backend for HttpBackend {
    fn fetch_teams(&self) -> Result<Vec<Team>, BackendError> {
        let body = self.get_text(TEAMS_PATH)?;
        parse_teams_json(&body).map_err(|err| BackendError::Decode(format!("{err:#}")))
    }

    fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, BackendError> {
        let client = http_client().map_err(|err| BackendError::Transport(format!("{err:#}")))?;
        let url = self.url(PREDICT_PATH);
        debug!(%url, home = request.home_id, away = request.away_id, "POST");
        let resp = client
            .post(&url)
            .header(ACCEPT, "application/json")
            .timeout(self.timeout)
            .json(request)
            .send()?;
        let body = read_body(resp)?;
        parse_prediction_json(&body).map_err(|err| BackendError::Decode(format!("{err:#}")))
    }

    fn health(&self) -> Result<HealthStatus, BackendError> {
        let body = self.get_text(HEALTH_PATH)?;
        parse_health_json(&body).map_err(|err| BackendError::Decode(format!("{err:#}")))
    }
}

fn read_body(resp: Response) -> Result<String, BackendError> {
    let status = resp.status();
    let body = resp.text()?;
    if !status.is_success() {
        return Err(BackendError::Status {
            status: status.as_u16(),
            body: truncate(&body, MAX_ERROR_BODY),
        });
    }
    Ok(body)
}

fn truncate(raw: &str, max_chars: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(max_chars).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate("  oops \n", 10), "oops");
    }

    #[test]
    fn truncate_cuts_on_char_boundary() {
        let out = truncate("confiançaconfiança", 8);
        assert_eq!(out, "confianç…");
    }

    #[test]
    fn url_joins_base() {
        let backend = HttpBackend::new(&Config {
            api_base_url: "http://api.local".to_string(),
            ..Config::default()
        });
        assert_eq!(backend.url(TEAMS_PATH), "http://api.local/api/teams");
    }
}
