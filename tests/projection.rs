mod support;

use forecast_terminal::api::ScorelineProbability;
use forecast_terminal::projection::{MAX_SCORELINES, project};

use support::fixture_prediction;

#[test]
fn outcome_percentages_are_copied_verbatim() {
    let mut result = fixture_prediction();
    result.forecast.outcome.home_win = 45.0;
    result.forecast.outcome.draw = 25.0;
    result.forecast.outcome.away_win = 30.0;

    let view = project(&result);
    assert_eq!(view.outcome.home.value, 45.0);
    assert_eq!(view.outcome.home.label, "45%");
    assert_eq!(view.outcome.draw.label, "25%");
    assert_eq!(view.outcome.away.label, "30%");
}

#[test]
fn outcome_is_not_normalised() {
    let mut result = fixture_prediction();
    result.forecast.outcome.home_win = 40.1;
    result.forecast.outcome.draw = 30.2;
    result.forecast.outcome.away_win = 30.0;

    let view = project(&result);
    let sum = view.outcome.home.value + view.outcome.draw.value + view.outcome.away.value;
    assert!((sum - 100.3).abs() < 1e-9);
    assert_eq!(view.outcome.home.label, "40.1%");
}

#[test]
fn labels_use_backend_names_and_confidence() {
    let view = project(&fixture_prediction());
    assert_eq!(view.match_label, "Flamengo vs Palmeiras");
    assert_eq!(view.confidence_label, "88.5% confiança");
}

#[test]
fn stat_blocks_pass_through() {
    let view = project(&fixture_prediction());
    assert_eq!(view.goals.home_avg, 1.52);
    assert_eq!(view.goals.away_avg, 1.08);
    assert_eq!(view.goals.total_avg, 2.6);
    assert_eq!(view.goals.over_1_5, "73.4%");
    assert_eq!(view.goals.over_2_5, "48.9%");
    assert_eq!(view.goals.btts, "52.3%");
    assert_eq!(view.cards.home_avg, 2.1);
    assert_eq!(view.cards.away_avg, 2.4);
    assert_eq!(view.cards.over_4_5, "47.7%");
    assert_eq!(view.corners.home_avg, 5.6);
    assert_eq!(view.corners.away_avg, 4.3);
    assert_eq!(view.corners.over_10_5, "38.5%");
    assert_eq!(view.extras.simulations, Some(50_000));
    assert_eq!(view.extras.corners_over_8_5.as_deref(), Some("61%"));
    assert_eq!(view.extras.with_lineup, Some(false));
}

#[test]
fn ten_scorelines_are_cut_to_first_eight_in_order() {
    let result = fixture_prediction();
    assert_eq!(result.forecast.scorelines.len(), 10);

    let view = project(&result);
    assert_eq!(view.scorelines.len(), MAX_SCORELINES);
    let got = view
        .scorelines
        .iter()
        .map(|s| s.scoreline.as_str())
        .collect::<Vec<_>>();
    assert_eq!(got, ["1x1", "1x0", "2x1", "0x0", "2x0", "0x1", "1x2", "2x2"]);
    assert_eq!(view.scorelines[0].probability, "12.1%");
}

#[test]
fn short_scoreline_list_is_kept_whole_without_resorting() {
    let mut result = fixture_prediction();
    result.forecast.scorelines = [("0x0", 3.0), ("2x2", 9.0), ("1x0", 5.0), ("3x0", 1.5), ("1x1", 7.0)]
        .into_iter()
        .map(|(scoreline, probability)| ScorelineProbability {
            scoreline: scoreline.to_string(),
            probability,
        })
        .collect();

    let view = project(&result);
    let got = view
        .scorelines
        .iter()
        .map(|s| (s.scoreline.as_str(), s.probability.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        got,
        [("0x0", "3%"), ("2x2", "9%"), ("1x0", "5%"), ("3x0", "1.5%"), ("1x1", "7%")]
    );
}

#[test]
fn empty_scoreline_list_projects_empty() {
    let mut result = fixture_prediction();
    result.forecast.scorelines.clear();
    assert!(project(&result).scorelines.is_empty());
}
