use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub type TeamId = u32;

pub const TEAMS_PATH: &str = "/api/teams";
pub const PREDICT_PATH: &str = "/api/predict";
pub const HEALTH_PATH: &str = "/api/health";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionKind {
    #[default]
    PontosCorridos,
    MataMata,
    Grupo,
    Amistoso,
}

impl CompetitionKind {
    pub const ALL: [CompetitionKind; 4] = [
        CompetitionKind::PontosCorridos,
        CompetitionKind::MataMata,
        CompetitionKind::Grupo,
        CompetitionKind::Amistoso,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CompetitionKind::PontosCorridos => "pontos_corridos",
            CompetitionKind::MataMata => "mata_mata",
            CompetitionKind::Grupo => "grupo",
            CompetitionKind::Amistoso => "amistoso",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CompetitionKind::PontosCorridos => "Pontos corridos",
            CompetitionKind::MataMata => "Mata-mata",
            CompetitionKind::Grupo => "Fase de grupos",
            CompetitionKind::Amistoso => "Amistoso",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL.into_iter().find(|kind| kind.as_str() == key)
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    #[serde(rename = "nome", alias = "name")]
    pub name: String,
    #[serde(rename = "ataque", alias = "attack")]
    pub attack: f64,
    #[serde(rename = "defesa", alias = "defense")]
    pub defense: f64,
    // Percentage in [0, 100].
    #[serde(rename = "confianca", alias = "confidence")]
    pub confidence: f64,
    #[serde(
        rename = "jogos",
        alias = "matches_played",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub matches_played: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TeamsResponse {
    teams: Vec<Team>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionRequest {
    #[serde(rename = "mandante_id")]
    pub home_id: TeamId,
    #[serde(rename = "visitante_id")]
    pub away_id: TeamId,
    pub league_id: u32,
    #[serde(rename = "tipo_competicao")]
    pub competition: CompetitionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "partida")]
    pub fixture: FixtureIdentity,
    #[serde(rename = "confianca")]
    pub confidence: f64,
    #[serde(rename = "previsao")]
    pub forecast: Forecast,
    #[serde(rename = "com_escalacao", default)]
    pub with_lineup: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureIdentity {
    #[serde(rename = "mandante")]
    pub home: String,
    #[serde(rename = "visitante")]
    pub away: String,
    #[serde(rename = "mandante_id", default)]
    pub home_id: Option<TeamId>,
    #[serde(rename = "visitante_id", default)]
    pub away_id: Option<TeamId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(rename = "simulacoes", default)]
    pub simulations: Option<u64>,
    #[serde(rename = "resultado")]
    pub outcome: OutcomeProbabilities,
    #[serde(rename = "gols")]
    pub goals: GoalStats,
    #[serde(rename = "cartoes")]
    pub cards: CardStats,
    #[serde(rename = "escanteios")]
    pub corners: CornerStats,
    // Sorted by the backend, most likely first.
    #[serde(rename = "placares", default)]
    pub scorelines: Vec<ScorelineProbability>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    #[serde(rename = "vitoria_mandante")]
    pub home_win: f64,
    #[serde(rename = "empate")]
    pub draw: f64,
    #[serde(rename = "vitoria_visitante")]
    pub away_win: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalStats {
    #[serde(rename = "mandante_media")]
    pub home_avg: f64,
    #[serde(rename = "visitante_media")]
    pub away_avg: f64,
    #[serde(rename = "total_media")]
    pub total_avg: f64,
    #[serde(rename = "over_1.5")]
    pub over_1_5: f64,
    #[serde(rename = "over_2.5")]
    pub over_2_5: f64,
    #[serde(rename = "over_3.5", default)]
    pub over_3_5: Option<f64>,
    #[serde(rename = "under_2.5", default)]
    pub under_2_5: Option<f64>,
    pub btts: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardStats {
    #[serde(rename = "mandante_media")]
    pub home_avg: f64,
    #[serde(rename = "visitante_media")]
    pub away_avg: f64,
    #[serde(rename = "total_media", default)]
    pub total_avg: Option<f64>,
    #[serde(rename = "over_3.5", default)]
    pub over_3_5: Option<f64>,
    #[serde(rename = "over_4.5")]
    pub over_4_5: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerStats {
    #[serde(rename = "mandante_media")]
    pub home_avg: f64,
    #[serde(rename = "visitante_media")]
    pub away_avg: f64,
    #[serde(rename = "total_media", default)]
    pub total_avg: Option<f64>,
    #[serde(rename = "over_8.5", default)]
    pub over_8_5: Option<f64>,
    #[serde(rename = "over_10.5")]
    pub over_10_5: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorelineProbability {
    #[serde(rename = "placar")]
    pub scoreline: String,
    #[serde(rename = "probabilidade")]
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}

pub fn parse_teams_json(raw: &str) -> Result<Vec<Team>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        bail!("empty teams payload");
    }
    let parsed: TeamsResponse = serde_json::from_str(trimmed).context("invalid teams json")?;
    if parsed.teams.is_empty() {
        bail!("teams payload has no entries");
    }
    Ok(parsed.teams)
}

pub fn parse_prediction_json(raw: &str) -> Result<PredictionResult> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        bail!("empty prediction payload");
    }
    serde_json::from_str(trimmed).context("invalid prediction json")
}

pub fn parse_health_json(raw: &str) -> Result<HealthStatus> {
    serde_json::from_str(raw.trim()).context("invalid health json")
}
