#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use forecast_terminal::api::{
    PredictionRequest, PredictionResult, Team, parse_prediction_json, parse_teams_json,
};
use forecast_terminal::backend::Backend;
use forecast_terminal::controller::ForecastSink;
use forecast_terminal::error::BackendError;
use forecast_terminal::projection::ForecastView;
use forecast_terminal::registry::CatalogSource;

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

pub fn fixture_teams() -> Vec<Team> {
    parse_teams_json(&read_fixture("teams.json")).expect("teams fixture should parse")
}

pub fn fixture_prediction() -> PredictionResult {
    parse_prediction_json(&read_fixture("prediction.json")).expect("prediction fixture should parse")
}

pub fn team(id: u32, name: &str) -> Team {
    Team {
        id,
        name: name.to_string(),
        attack: 1.0,
        defense: 1.0,
        confidence: 80.0,
        matches_played: None,
    }
}

pub enum TeamsReply {
    Ok(Vec<Team>),
    Network,
    Status(u16),
}

pub enum PredictReply {
    Ok(PredictionResult),
    Network,
    Status(u16),
    Malformed,
    // Sleeps before answering with the fixture.
    Slow(Duration),
    // Holds the call until the test releases the gate.
    Gated(Mutex<Receiver<()>>),
}

pub struct MockBackend {
    pub teams: TeamsReply,
    pub predict: PredictReply,
    pub predict_calls: AtomicUsize,
    pub requests: Mutex<Vec<PredictionRequest>>,
}

impl MockBackend {
    pub fn new(teams: TeamsReply, predict: PredictReply) -> Arc<Self> {
        Arc::new(Self {
            teams,
            predict,
            predict_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn gated(teams: TeamsReply) -> (Arc<Self>, Sender<()>) {
        let (tx, rx) = mpsc::channel();
        (Self::new(teams, PredictReply::Gated(Mutex::new(rx))), tx)
    }

    pub fn calls(&self) -> usize {
        self.predict_calls.load(Ordering::SeqCst)
    }
}

impl Backend for MockBackend {
    fn fetch_teams(&self) -> Result<Vec<Team>, BackendError> {
        match &self.teams {
            TeamsReply::Ok(teams) => Ok(teams.clone()),
            TeamsReply::Network => Err(BackendError::Transport("connection refused".to_string())),
            TeamsReply::Status(status) => Err(BackendError::Status {
                status: *status,
                body: "internal error".to_string(),
            }),
        }
    }

    fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, BackendError> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        match &self.predict {
            PredictReply::Ok(result) => Ok(result.clone()),
            PredictReply::Network => Err(BackendError::Transport("connection reset".to_string())),
            PredictReply::Status(status) => Err(BackendError::Status {
                status: *status,
                body: "internal error".to_string(),
            }),
            PredictReply::Malformed => {
                let err = parse_prediction_json(r#"{"partida": 3}"#).unwrap_err();
                Err(BackendError::Decode(format!("{err:#}")))
            }
            PredictReply::Slow(delay) => {
                std::thread::sleep(*delay);
                Ok(fixture_prediction())
            }
            PredictReply::Gated(gate) => {
                let _ = gate.lock().unwrap().recv();
                Ok(fixture_prediction())
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub teams_ready: Vec<(Vec<String>, CatalogSource)>,
    pub loading: Vec<bool>,
    pub forecasts: Vec<ForecastView>,
    pub errors: Vec<String>,
}

impl ForecastSink for RecordingSink {
    fn teams_ready(&mut self, teams: &[Team], source: CatalogSource) {
        self.teams_ready
            .push((teams.iter().map(|t| t.name.clone()).collect(), source));
    }

    fn loading(&mut self, active: bool) {
        self.loading.push(active);
    }

    fn forecast_ready(&mut self, view: &ForecastView) {
        self.forecasts.push(view.clone());
    }

    fn prediction_failed(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
