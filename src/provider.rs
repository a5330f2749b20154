use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use tracing::{debug, warn};

use crate::backend::Backend;
use crate::registry;
use crate::state::{Delta, ProviderCommand};

/// Runs each command on its own job thread; each answers with exactly one delta.
pub fn spawn_provider(
    backend: Arc<dyn Backend>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            let backend = backend.clone();
            let tx = tx.clone();
            thread::spawn(move || run_command(backend.as_ref(), cmd, &tx));
        }
        debug!("provider command channel closed");
    })
}

pub fn run_command(backend: &dyn Backend, cmd: ProviderCommand, tx: &Sender<Delta>) {
    match cmd {
        ProviderCommand::LoadTeams => {
            let load = registry::load_catalog(backend);
            let _ = tx.send(Delta::TeamsLoaded(load));
        }
        ProviderCommand::Predict { seq, request } => match backend.predict(&request) {
            Ok(result) => {
                let _ = tx.send(Delta::PredictionReady {
                    seq,
                    result: Box::new(result),
                });
            }
            Err(err) => {
                warn!(seq, error = %err, "prediction request failed");
                let _ = tx.send(Delta::PredictionFailed {
                    seq,
                    reason: err.into_prediction_failure().to_string(),
                });
            }
        },
        ProviderCommand::CheckHealth => match backend.health() {
            Ok(health) => {
                let status = match health.version {
                    Some(version) => format!("{} (v{version})", health.status),
                    None => health.status,
                };
                let _ = tx.send(Delta::BackendStatus(status));
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!("[WARN] Health check failed: {err}")));
            }
        },
    }
}
