use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use forecast_terminal::api::{CompetitionKind, TeamId};
use forecast_terminal::backend::HttpBackend;
use forecast_terminal::config::{self, Config};
use forecast_terminal::controller::{ForecastController, NullSink, PredictOutcome};
use forecast_terminal::projection::ForecastView;
use forecast_terminal::selection::Role;
use forecast_terminal::telemetry;

fn main() -> Result<()> {
    config::load_dotenv();
    telemetry::init_stderr();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let home = parse_id_arg(&args, "--home").context("missing --home <team id>")?;
    let away = parse_id_arg(&args, "--away").context("missing --away <team id>")?;

    let mut cfg = Config::from_env();
    if let Some(raw) = parse_str_arg(&args, "--competition") {
        cfg.competition = CompetitionKind::parse(&raw)
            .with_context(|| format!("unknown competition type: {raw}"))?;
    }
    let wait = cfg.predict_deadline + Duration::from_secs(1);
    let backend = Arc::new(HttpBackend::new(&cfg));
    let mut controller = ForecastController::spawn(cfg, backend, NullSink);

    controller.load_teams();
    controller.wait_idle(wait);
    for team in controller.state().registry.teams() {
        println!("{:>4}  {}", team.id, team.name);
    }
    println!();

    if !controller.assign(Role::Home, Some(home)) {
        bail!("team {home} is not in the catalog");
    }
    if !controller.assign(Role::Away, Some(away)) {
        bail!("team {away} is not in the catalog");
    }
    if !controller.can_predict() {
        bail!("home and away must be different teams");
    }

    match controller.predict() {
        PredictOutcome::Started { .. } => {}
        other => bail!("prediction not started: {other:?}"),
    }
    controller.wait_idle(wait);

    let state = controller.state();
    match (&state.forecast, &state.error_notice) {
        (Some(view), None) => print_view(view),
        (_, Some(err)) => {
            for line in state.logs.iter().rev().take(1) {
                eprintln!("{line}");
            }
            bail!("{err}");
        }
        (None, None) => bail!("prediction did not finish in time"),
    }
    Ok(())
}

fn print_view(view: &ForecastView) {
    println!("{}  ({})", view.match_label, view.confidence_label);
    println!(
        "Resultado: casa {} | empate {} | fora {}",
        view.outcome.home.label, view.outcome.draw.label, view.outcome.away.label
    );
    let g = &view.goals;
    println!(
        "Gols: casa {} fora {} total {} | over 1.5 {} | over 2.5 {} | ambos marcam {}",
        g.home_avg, g.away_avg, g.total_avg, g.over_1_5, g.over_2_5, g.btts
    );
    let c = &view.cards;
    println!(
        "Cartões: casa {} fora {} | over 4.5 {}",
        c.home_avg, c.away_avg, c.over_4_5
    );
    let k = &view.corners;
    println!(
        "Escanteios: casa {} fora {} | over 10.5 {}",
        k.home_avg, k.away_avg, k.over_10_5
    );
    println!("Placares:");
    for s in &view.scorelines {
        println!("  {:>5}  {}", s.scoreline, s.probability);
    }
}

fn parse_id_arg(args: &[String], flag: &str) -> Option<TeamId> {
    parse_str_arg(args, flag).and_then(|raw| raw.parse::<TeamId>().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
