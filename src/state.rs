use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::Local;
use tracing::{info, warn};

use crate::api::{CompetitionKind, PredictionRequest, PredictionResult, Team};
use crate::config::Config;
use crate::error::BackendError;
use crate::projection::{self, ForecastView};
use crate::registry::{CatalogLoad, CatalogSource, TeamRegistry};
use crate::selection::{Role, SelectionState};

pub const PREDICTION_ERROR_MESSAGE: &str = "Erro ao gerar previsão. Tente novamente.";
const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    InFlight,
    Settled,
}

impl LoadState {
    pub fn is_in_flight(self) -> bool {
        self == LoadState::InFlight
    }
}

#[derive(Debug, Clone)]
pub struct PendingPrediction {
    pub seq: u64,
    pub request: PredictionRequest,
    pub started: Instant,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: TeamRegistry,
    pub selection: SelectionState,
    pub competition: CompetitionKind,
    pub league_id: u32,
    pub teams_load: LoadState,
    pub predict_load: LoadState,
    pub pending: Option<PendingPrediction>,
    pub next_seq: u64,
    pub forecast: Option<ForecastView>,
    pub error_notice: Option<String>,
    pub backend_status: Option<String>,
    pub logs: VecDeque<String>,
    pub gallery_selected: usize,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            registry: TeamRegistry::new(),
            selection: SelectionState::new(),
            competition: config.competition,
            league_id: config.league_id,
            teams_load: LoadState::Idle,
            predict_load: LoadState::Idle,
            pending: None,
            next_seq: 1,
            forecast: None,
            error_notice: None,
            backend_status: None,
            logs: VecDeque::with_capacity(MAX_LOGS),
            gallery_selected: 0,
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let stamp = Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn is_loading(&self) -> bool {
        self.predict_load.is_in_flight()
    }

    pub fn team_for(&self, role: Role) -> Option<&Team> {
        self.selection
            .get(role)
            .and_then(|id| self.registry.find_by_id(id))
    }

    pub fn gallery_team(&self) -> Option<&Team> {
        self.registry.teams().get(self.gallery_selected)
    }

    pub fn select_next(&mut self) {
        let len = self.registry.len();
        if len == 0 {
            return;
        }
        self.gallery_selected = (self.gallery_selected + 1) % len;
    }

    pub fn select_prev(&mut self) {
        let len = self.registry.len();
        if len == 0 {
            return;
        }
        self.gallery_selected = (self.gallery_selected + len - 1) % len;
    }

    pub fn clamp_selection(&mut self) {
        let len = self.registry.len();
        if len == 0 {
            self.gallery_selected = 0;
        } else if self.gallery_selected >= len {
            self.gallery_selected = len - 1;
        }
    }

    /// Builds the next request from the current selection and competition setting and
    /// marks it in flight. `None` when the selection is incomplete or a request is pending.
    pub fn begin_prediction(&mut self, now: Instant) -> Option<PendingPrediction> {
        if self.pending.is_some() {
            return None;
        }
        let (home_id, away_id) = self.selection.pair()?;
        let seq = self.next_seq;
        self.next_seq += 1;
        let pending = PendingPrediction {
            seq,
            request: PredictionRequest {
                home_id,
                away_id,
                league_id: self.league_id,
                competition: self.competition,
            },
            started: now,
        };
        self.pending = Some(pending.clone());
        self.predict_load = LoadState::InFlight;
        self.error_notice = None;
        Some(pending)
    }

    /// Fails the pending request if it has outlived `deadline`.
    pub fn expire_pending(&mut self, now: Instant, deadline: Duration) -> Option<Applied> {
        let pending = self.pending.as_ref()?;
        if now.saturating_duration_since(pending.started) < deadline {
            return None;
        }
        let seq = pending.seq;
        Some(apply_delta(
            self,
            Delta::PredictionFailed {
                seq,
                reason: BackendError::Timeout(deadline)
                    .into_prediction_failure()
                    .to_string(),
            },
        ))
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    TeamsLoaded(CatalogLoad),
    PredictionReady {
        seq: u64,
        result: Box<PredictionResult>,
    },
    PredictionFailed {
        seq: u64,
        reason: String,
    },
    BackendStatus(String),
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    LoadTeams,
    Predict {
        seq: u64,
        request: PredictionRequest,
    },
    CheckHealth,
}

/// What a delta changed, so the caller knows which sink to notify.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    TeamsReplaced,
    ForecastReady,
    PredictionFailed(String),
    Stale,
    Logged,
}

pub fn apply_delta(state: &mut AppState, delta: Delta) -> Applied {
    match delta {
        Delta::TeamsLoaded(load) => {
            let source = load.source;
            let error = load.error.clone();
            let previous = state.registry.source();
            state.registry.apply(load);
            if previous.is_some_and(|prev| prev != source) {
                // Fallback and backend ids do not name the same teams.
                state.selection.reset();
            } else {
                let registry = &state.registry;
                state.selection.retain(|id| registry.contains(id));
            }
            state.clamp_selection();
            state.teams_load = LoadState::Settled;
            match (source, error) {
                (CatalogSource::Fallback, Some(err)) => {
                    state.push_log(format!(
                        "[WARN] {err}; using {} fallback teams",
                        state.registry.len()
                    ));
                }
                _ => {
                    state.push_log(format!("[INFO] Loaded {} teams", state.registry.len()));
                }
            }
            Applied::TeamsReplaced
        }
        Delta::PredictionReady { seq, result } => {
            if !is_current(state, seq) {
                // Response for a request that already timed out or was superseded.
                state.push_log(format!("[INFO] Discarded stale prediction #{seq}"));
                return Applied::Stale;
            }
            let view = projection::project(&result);
            info!(seq, label = %view.match_label, "prediction ready");
            state.push_log(format!("[INFO] Forecast ready: {}", view.match_label));
            state.forecast = Some(view);
            state.error_notice = None;
            state.pending = None;
            state.predict_load = LoadState::Settled;
            Applied::ForecastReady
        }
        Delta::PredictionFailed { seq, reason } => {
            if !is_current(state, seq) {
                state.push_log(format!("[INFO] Discarded stale failure #{seq}: {reason}"));
                return Applied::Stale;
            }
            warn!(seq, %reason, "prediction failed");
            state.push_log(format!("[WARN] {reason}"));
            state.error_notice = Some(PREDICTION_ERROR_MESSAGE.to_string());
            state.pending = None;
            state.predict_load = LoadState::Settled;
            Applied::PredictionFailed(PREDICTION_ERROR_MESSAGE.to_string())
        }
        Delta::BackendStatus(status) => {
            state.push_log(format!("[INFO] Backend: {status}"));
            state.backend_status = Some(status);
            Applied::Logged
        }
        Delta::Log(msg) => {
            state.push_log(msg);
            Applied::Logged
        }
    }
}

fn is_current(state: &AppState, seq: u64) -> bool {
    state.pending.as_ref().is_some_and(|p| p.seq == seq)
}
