use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::api::{CompetitionKind, Team, TeamId};
use crate::backend::Backend;
use crate::config::Config;
use crate::error::BackendError;
use crate::projection::ForecastView;
use crate::provider::spawn_provider;
use crate::registry::CatalogSource;
use crate::selection::Role;
use crate::state::{Applied, AppState, Delta, LoadState, ProviderCommand, apply_delta};

pub trait ForecastSink {
    fn teams_ready(&mut self, teams: &[Team], source: CatalogSource);

    fn loading(&mut self, active: bool);

    fn forecast_ready(&mut self, view: &ForecastView);

    fn prediction_failed(&mut self, message: &str);
}

#[derive(Debug, Default)]
pub struct NullSink;

impl ForecastSink for NullSink {
    fn teams_ready(&mut self, _teams: &[Team], _source: CatalogSource) {}
    fn loading(&mut self, _active: bool) {}
    fn forecast_ready(&mut self, _view: &ForecastView) {}
    fn prediction_failed(&mut self, _message: &str) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictOutcome {
    Started { seq: u64 },
    NotReady,
    Busy,
    Failed,
}

pub struct ForecastController<S: ForecastSink> {
    state: AppState,
    sink: S,
    config: Config,
    cmd_tx: Option<Sender<ProviderCommand>>,
    delta_rx: Receiver<Delta>,
}

impl<S: ForecastSink> ForecastController<S> {
    pub fn spawn(config: Config, backend: Arc<dyn Backend>, sink: S) -> Self {
        let (tx, delta_rx) = mpsc::channel();
        let (cmd_tx, cmd_rx) = mpsc::channel();
        spawn_provider(backend, tx, cmd_rx);
        Self::from_channels(config, cmd_tx, delta_rx, sink)
    }

    pub fn from_channels(
        config: Config,
        cmd_tx: Sender<ProviderCommand>,
        delta_rx: Receiver<Delta>,
        sink: S,
    ) -> Self {
        Self {
            state: AppState::with_config(&config),
            sink,
            config,
            cmd_tx: Some(cmd_tx),
            delta_rx,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn load_teams(&mut self) -> bool {
        if self.state.teams_load.is_in_flight() {
            return false;
        }
        if self.send(ProviderCommand::LoadTeams).is_err() {
            self.state.push_log("[WARN] Team load unavailable: worker stopped");
            return false;
        }
        self.state.teams_load = LoadState::InFlight;
        self.state.push_log("[INFO] Loading teams");
        true
    }

    pub fn check_health(&mut self) {
        if self.send(ProviderCommand::CheckHealth).is_err() {
            self.state.push_log("[WARN] Health check unavailable: worker stopped");
        }
    }

    pub fn find_team(&self, id: TeamId) -> Option<&Team> {
        self.state.registry.find_by_id(id)
    }

    pub fn pick(&mut self, id: TeamId) -> Option<Role> {
        if !self.catalog_ready() {
            return None;
        }
        let name = self.find_team(id)?.name.clone();
        let role = self.state.selection.pick(id);
        match role {
            Some(role) => self.state.push_log(format!("[INFO] {}: {name}", role.label())),
            None => self
                .state
                .push_log(format!("[INFO] {name} not assigned (slots full or duplicate)")),
        }
        role
    }

    /// Selector change for one role. `None` clears the role; unknown ids are refused.
    pub fn assign(&mut self, role: Role, id: Option<TeamId>) -> bool {
        if id.is_some() && !self.catalog_ready() {
            return false;
        }
        if let Some(id) = id
            && self.find_team(id).is_none()
        {
            return false;
        }
        self.state.selection.assign(role, id);
        true
    }

    pub fn clear(&mut self, role: Role) {
        self.state.selection.clear(role);
    }

    pub fn reset_selection(&mut self) {
        self.state.selection.reset();
    }

    pub fn can_predict(&self) -> bool {
        self.state.selection.can_predict()
    }

    pub fn competition(&self) -> CompetitionKind {
        self.state.competition
    }

    pub fn set_competition(&mut self, kind: CompetitionKind) {
        self.state.competition = kind;
    }

    pub fn cycle_competition(&mut self) -> CompetitionKind {
        self.state.competition = self.state.competition.next();
        self.state.competition
    }

    pub fn predict(&mut self) -> PredictOutcome {
        if self.state.pending.is_some() {
            self.state
                .push_log("[INFO] Prediction already running; request ignored");
            return PredictOutcome::Busy;
        }
        let Some(pending) = self.state.begin_prediction(Instant::now()) else {
            return PredictOutcome::NotReady;
        };
        self.sink.loading(true);
        info!(
            seq = pending.seq,
            home = pending.request.home_id,
            away = pending.request.away_id,
            competition = pending.request.competition.as_str(),
            "prediction requested"
        );

        let seq = pending.seq;
        let cmd = ProviderCommand::Predict {
            seq,
            request: pending.request,
        };
        if self.send(cmd).is_err() {
            let reason = BackendError::WorkerGone.into_prediction_failure().to_string();
            self.handle(Delta::PredictionFailed { seq, reason });
            return PredictOutcome::Failed;
        }
        PredictOutcome::Started { seq }
    }

    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(delta) = self.delta_rx.try_recv() {
            self.handle(delta);
            applied += 1;
        }
        self.expire(Instant::now());
        applied
    }

    /// Blocks until no team load or prediction is in flight, or `timeout` elapses.
    /// Returns true when idle.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let until = Instant::now() + timeout;
        loop {
            self.pump();
            if !self.busy() {
                return true;
            }
            let now = Instant::now();
            if now >= until {
                return false;
            }
            let mut wait = until - now;
            if let Some(pending) = &self.state.pending {
                let expires = pending.started + self.config.predict_deadline;
                wait = wait.min(expires.saturating_duration_since(now));
            }
            match self.delta_rx.recv_timeout(wait) {
                Ok(delta) => self.handle(delta),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    self.fail_orphans();
                    return !self.busy();
                }
            }
        }
    }

    pub fn shutdown(mut self) -> S {
        self.cmd_tx = None;
        self.sink
    }

    fn catalog_ready(&mut self) -> bool {
        if self.state.registry.is_loaded() {
            return true;
        }
        self.state.push_log("[INFO] Team catalog still loading; selection ignored");
        false
    }

    fn busy(&self) -> bool {
        self.state.teams_load.is_in_flight() || self.state.pending.is_some()
    }

    fn send(&self, cmd: ProviderCommand) -> Result<(), BackendError> {
        let tx = self.cmd_tx.as_ref().ok_or(BackendError::WorkerGone)?;
        tx.send(cmd).map_err(|_| BackendError::WorkerGone)
    }

    fn expire(&mut self, now: Instant) {
        if let Some(applied) = self
            .state
            .expire_pending(now, self.config.predict_deadline)
        {
            self.notify(applied);
        }
    }

    // Worker channel closed with work outstanding: nothing will ever answer it.
    fn fail_orphans(&mut self) {
        if self.state.teams_load.is_in_flight() {
            warn!("team load orphaned by provider shutdown");
            self.state.teams_load = LoadState::Settled;
        }
        if let Some(seq) = self.state.pending.as_ref().map(|p| p.seq) {
            let reason = BackendError::WorkerGone.into_prediction_failure().to_string();
            self.handle(Delta::PredictionFailed { seq, reason });
        }
    }

    fn handle(&mut self, delta: Delta) {
        let applied = apply_delta(&mut self.state, delta);
        self.notify(applied);
    }

    fn notify(&mut self, applied: Applied) {
        match applied {
            Applied::TeamsReplaced => {
                if let Some(source) = self.state.registry.source() {
                    self.sink.teams_ready(self.state.registry.teams(), source);
                }
            }
            Applied::ForecastReady => {
                if let Some(view) = self.state.forecast.as_ref() {
                    self.sink.forecast_ready(view);
                }
                self.sink.loading(false);
            }
            Applied::PredictionFailed(message) => {
                self.sink.prediction_failed(&message);
                self.sink.loading(false);
            }
            Applied::Stale | Applied::Logged => {}
        }
    }
}
