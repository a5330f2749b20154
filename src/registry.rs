use tracing::{info, warn};

use crate::api::{Team, TeamId};
use crate::backend::Backend;
use crate::error::{BackendError, ForecastError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Backend,
    Fallback,
}

/// Result of a catalog load. Always carries a usable, non-empty team list; `error` holds
/// the failure when the fallback catalog had to stand in.
#[derive(Debug, Clone)]
pub struct CatalogLoad {
    pub teams: Vec<Team>,
    pub source: CatalogSource,
    pub error: Option<ForecastError>,
}

#[derive(Debug, Clone)]
pub struct TeamRegistry {
    teams: Vec<Team>,
    // `None` until the first load settles.
    source: Option<CatalogSource>,
}

impl Default for TeamRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamRegistry {
    /// Starts empty. Ids only become valid once a load, or its fallback, has been applied.
    pub fn new() -> Self {
        Self {
            teams: Vec::new(),
            source: None,
        }
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn source(&self) -> Option<CatalogSource> {
        self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.source.is_some()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn find_by_id(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TeamId) -> bool {
        self.find_by_id(id).is_some()
    }

    pub fn replace(&mut self, teams: Vec<Team>, source: CatalogSource) -> bool {
        if teams.is_empty() {
            return false;
        }
        self.teams = teams;
        self.source = Some(source);
        true
    }

    pub fn apply(&mut self, load: CatalogLoad) -> bool {
        self.replace(load.teams, load.source)
    }
}

pub fn load_catalog(backend: &dyn Backend) -> CatalogLoad {
    match backend.fetch_teams() {
        Ok(teams) if !teams.is_empty() => {
            info!(count = teams.len(), "team catalog loaded");
            CatalogLoad {
                teams,
                source: CatalogSource::Backend,
                error: None,
            }
        }
        Ok(_) => fallback_load(BackendError::Decode("no teams in payload".to_string())),
        Err(err) => fallback_load(err),
    }
}

fn fallback_load(err: BackendError) -> CatalogLoad {
    warn!(error = %err, "team catalog unavailable, using fallback teams");
    CatalogLoad {
        teams: fallback_catalog(),
        source: CatalogSource::Fallback,
        error: Some(err.into_load_failure()),
    }
}

pub fn fallback_catalog() -> Vec<Team> {
    vec![
        fallback_team(1, "Flamengo", 1.25, 0.85, 90.0),
        fallback_team(2, "Palmeiras", 1.20, 0.80, 88.0),
        fallback_team(3, "Corinthians", 1.10, 1.05, 85.0),
    ]
}

fn fallback_team(id: TeamId, name: &str, attack: f64, defense: f64, confidence: f64) -> Team {
    Team {
        id,
        name: name.to_string(),
        attack,
        defense,
        confidence,
        matches_played: None,
    }
}
