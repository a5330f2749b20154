mod support;

use forecast_terminal::api::{parse_health_json, parse_prediction_json, parse_teams_json};

use support::read_fixture;

#[test]
fn parses_teams_fixture_in_backend_order() {
    let teams = parse_teams_json(&read_fixture("teams.json")).expect("fixture should parse");
    let ids = teams.iter().map(|t| t.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![1, 2, 5, 4]);
    assert_eq!(teams[3].name, "Atlético Mineiro");
    assert_eq!(teams[0].attack, 1.31);
    assert_eq!(teams[0].defense, 0.82);
    assert_eq!(teams[0].confidence, 92.0);
    assert_eq!(teams[2].matches_played, Some(37));
}

#[test]
fn parses_full_prediction_fixture() {
    let result = parse_prediction_json(&read_fixture("prediction.json")).expect("fixture should parse");
    assert_eq!(result.fixture.home, "Flamengo");
    assert_eq!(result.fixture.away, "Palmeiras");
    assert_eq!(result.fixture.home_id, Some(1));
    assert_eq!(result.confidence, 88.5);
    assert_eq!(result.with_lineup, Some(false));

    let forecast = &result.forecast;
    assert_eq!(forecast.simulations, Some(50_000));
    assert_eq!(forecast.outcome.home_win, 45.0);
    assert_eq!(forecast.outcome.draw, 25.0);
    assert_eq!(forecast.outcome.away_win, 30.0);
    assert_eq!(forecast.goals.over_1_5, 73.4);
    assert_eq!(forecast.goals.over_2_5, 48.9);
    assert_eq!(forecast.goals.over_3_5, Some(26.1));
    assert_eq!(forecast.goals.btts, 52.3);
    assert_eq!(forecast.cards.over_4_5, 47.7);
    assert_eq!(forecast.corners.over_10_5, 38.5);
    assert_eq!(forecast.corners.over_8_5, Some(61.0));
    assert_eq!(forecast.scorelines.len(), 10);
    assert_eq!(forecast.scorelines[0].scoreline, "1x1");
}

#[test]
fn optional_prediction_fields_default_to_none() {
    let result = parse_prediction_json(&read_fixture("prediction_minimal.json"))
        .expect("minimal fixture should parse");
    assert_eq!(result.fixture.home_id, None);
    assert_eq!(result.with_lineup, None);
    assert_eq!(result.forecast.simulations, None);
    assert_eq!(result.forecast.goals.under_2_5, None);
    assert_eq!(result.forecast.cards.total_avg, None);
    assert_eq!(result.forecast.scorelines.len(), 5);
}

#[test]
fn prediction_missing_required_block_is_rejected() {
    let raw = r#"{
        "partida": {"mandante": "A", "visitante": "B"},
        "confianca": 50,
        "previsao": {"resultado": {"vitoria_mandante": 1, "empate": 1, "vitoria_visitante": 1}}
    }"#;
    assert!(parse_prediction_json(raw).is_err());
    assert!(parse_prediction_json("  ").is_err());
    assert!(parse_prediction_json("<html>502</html>").is_err());
}

#[test]
fn parses_health_payload() {
    let health = parse_health_json(r#"{"status": "ok", "version": "2.0.0"}"#).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version.as_deref(), Some("2.0.0"));
}
