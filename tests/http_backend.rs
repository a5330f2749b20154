mod support;

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use forecast_terminal::api::{CompetitionKind, PredictionRequest};
use forecast_terminal::backend::{Backend, HttpBackend};
use forecast_terminal::config::Config;
use forecast_terminal::error::{BackendError, ForecastError};
use forecast_terminal::registry::{CatalogSource, load_catalog};

use support::read_fixture;

struct Captured {
    head: String,
    body: String,
}

// Answers exactly one request with `status` and `body`, then hands back what it received.
fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let base = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut raw = Vec::new();
        let mut buf = [0u8; 1024];
        let head_end = loop {
            let n = stream.read(&mut buf).expect("read request");
            assert!(n > 0, "client closed before headers");
            raw.extend_from_slice(&buf[..n]);
            if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&raw[..head_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while raw.len() < head_end + content_length {
            let n = stream.read(&mut buf).expect("read body");
            assert!(n > 0, "client closed before body");
            raw.extend_from_slice(&buf[..n]);
        }
        let request_body = String::from_utf8_lossy(&raw[head_end..head_end + content_length]).to_string();

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write response");
        Captured {
            head,
            body: request_body,
        }
    });
    (base, handle)
}

fn backend_for(base: String) -> HttpBackend {
    HttpBackend::new(&Config {
        api_base_url: base,
        ..Config::default()
    })
}

#[test]
fn predict_posts_wire_body_and_maps_server_error() {
    let (base, server) = serve_once("500 Internal Server Error", "boom".to_string());
    let backend = backend_for(base);
    let request = PredictionRequest {
        home_id: 1,
        away_id: 2,
        league_id: 1,
        competition: CompetitionKind::MataMata,
    };

    let err = backend.predict(&request).unwrap_err();
    match err {
        BackendError::Status { status, ref body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {other:?}"),
    }

    let captured = server.join().unwrap();
    assert!(captured.head.starts_with("POST /api/predict "));
    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(
        sent,
        serde_json::json!({
            "mandante_id": 1,
            "visitante_id": 2,
            "league_id": 1,
            "tipo_competicao": "mata_mata"
        })
    );
}

#[test]
fn predict_parses_successful_response() {
    let (base, server) = serve_once("200 OK", read_fixture("prediction.json"));
    let backend = backend_for(base);
    let request = PredictionRequest {
        home_id: 1,
        away_id: 2,
        league_id: 1,
        competition: CompetitionKind::PontosCorridos,
    };

    let result = backend.predict(&request).expect("fixture should decode");
    assert_eq!(result.fixture.home, "Flamengo");
    assert_eq!(result.forecast.outcome.home_win, 45.0);
    server.join().unwrap();
}

#[test]
fn teams_are_fetched_with_get() {
    let (base, server) = serve_once("200 OK", read_fixture("teams.json"));
    let load = load_catalog(&backend_for(base));
    assert_eq!(load.source, CatalogSource::Backend);
    assert_eq!(load.teams.len(), 4);

    let captured = server.join().unwrap();
    assert!(captured.head.starts_with("GET /api/teams "));
}

#[test]
fn missing_teams_endpoint_falls_back() {
    let (base, server) = serve_once("404 Not Found", "nope".to_string());
    let load = load_catalog(&backend_for(base));
    assert_eq!(load.source, CatalogSource::Fallback);
    assert_eq!(
        load.error,
        Some(ForecastError::LoadFailure("http 404: nope".to_string()))
    );
    server.join().unwrap();
}
