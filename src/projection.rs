use crate::api::PredictionResult;

pub const MAX_SCORELINES: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastView {
    pub match_label: String,
    pub confidence_label: String,
    pub outcome: OutcomeBars,
    pub goals: GoalsBlock,
    pub cards: CardsBlock,
    pub corners: CornersBlock,
    pub scorelines: Vec<ScorelineCell>,
    pub extras: ForecastExtras,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PercentBar {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeBars {
    pub home: PercentBar,
    pub draw: PercentBar,
    pub away: PercentBar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalsBlock {
    pub home_avg: f64,
    pub away_avg: f64,
    pub total_avg: f64,
    pub over_1_5: String,
    pub over_2_5: String,
    pub btts: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardsBlock {
    pub home_avg: f64,
    pub away_avg: f64,
    pub over_4_5: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CornersBlock {
    pub home_avg: f64,
    pub away_avg: f64,
    pub over_10_5: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScorelineCell {
    pub scoreline: String,
    pub probability: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastExtras {
    pub simulations: Option<u64>,
    pub goals_over_3_5: Option<String>,
    pub goals_under_2_5: Option<String>,
    pub cards_total_avg: Option<f64>,
    pub cards_over_3_5: Option<String>,
    pub corners_total_avg: Option<f64>,
    pub corners_over_8_5: Option<String>,
    pub with_lineup: Option<bool>,
}

pub fn project(result: &PredictionResult) -> ForecastView {
    let forecast = &result.forecast;
    let outcome = &forecast.outcome;
    let goals = &forecast.goals;
    let cards = &forecast.cards;
    let corners = &forecast.corners;

    ForecastView {
        match_label: format!("{} vs {}", result.fixture.home, result.fixture.away),
        confidence_label: format!("{}% confiança", result.confidence),
        outcome: OutcomeBars {
            home: percent_bar(outcome.home_win),
            draw: percent_bar(outcome.draw),
            away: percent_bar(outcome.away_win),
        },
        goals: GoalsBlock {
            home_avg: goals.home_avg,
            away_avg: goals.away_avg,
            total_avg: goals.total_avg,
            over_1_5: percent(goals.over_1_5),
            over_2_5: percent(goals.over_2_5),
            btts: percent(goals.btts),
        },
        cards: CardsBlock {
            home_avg: cards.home_avg,
            away_avg: cards.away_avg,
            over_4_5: percent(cards.over_4_5),
        },
        corners: CornersBlock {
            home_avg: corners.home_avg,
            away_avg: corners.away_avg,
            over_10_5: percent(corners.over_10_5),
        },
        scorelines: forecast
            .scorelines
            .iter()
            .take(MAX_SCORELINES)
            .map(|s| ScorelineCell {
                scoreline: s.scoreline.clone(),
                probability: percent(s.probability),
            })
            .collect(),
        extras: ForecastExtras {
            simulations: forecast.simulations,
            goals_over_3_5: goals.over_3_5.map(percent),
            goals_under_2_5: goals.under_2_5.map(percent),
            cards_total_avg: cards.total_avg,
            cards_over_3_5: cards.over_3_5.map(percent),
            corners_total_avg: corners.total_avg,
            corners_over_8_5: corners.over_8_5.map(percent),
            with_lineup: result.with_lineup,
        },
    }
}

fn percent_bar(value: f64) -> PercentBar {
    PercentBar {
        value,
        label: percent(value),
    }
}

// `Display` for f64 prints 45.0 as "45" and 45.5 as "45.5", matching the backend's own text.
fn percent(value: f64) -> String {
    format!("{value}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_keeps_raw_precision() {
        assert_eq!(percent(45.0), "45%");
        assert_eq!(percent(12.3), "12.3%");
        assert_eq!(percent(0.05), "0.05%");
    }

    #[test]
    fn bar_value_and_label_agree() {
        let bar = percent_bar(37.5);
        assert_eq!(bar.value, 37.5);
        assert_eq!(bar.label, "37.5%");
    }
}
