use std::collections::HashSet;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::gemini::Predictor;
use crate::inputs::PredictionInputs;
use crate::state::{Delta, ProviderCommand, RequestId};

/// Run one prediction and wrap the outcome for the controller.
pub fn execute(
    predictor: &dyn Predictor,
    request_id: RequestId,
    inputs: PredictionInputs,
) -> Delta {
    match predictor.predict(&inputs) {
        Ok(result) => Delta::PredictionReady {
            request_id,
            inputs,
            result,
        },
        Err(error) => Delta::PredictionFailed { request_id, error },
    }
}

/// Ids of predictions still running, and which of those were cancelled.
/// A cancel for an id that already finished is ignored, so neither set
/// outlives the thread it tracks.
#[derive(Debug, Default)]
pub struct CancelRegistry {
    running: HashSet<RequestId>,
    cancelled: HashSet<RequestId>,
}

impl CancelRegistry {
    pub fn start(&mut self, request_id: RequestId) {
        self.running.insert(request_id);
    }

    /// Returns false when the prediction is no longer running.
    pub fn cancel(&mut self, request_id: RequestId) -> bool {
        if !self.running.contains(&request_id) {
            return false;
        }
        self.cancelled.insert(request_id)
    }

    /// Marks the prediction done; true when its outcome must be dropped.
    pub fn finish(&mut self, request_id: RequestId) -> bool {
        self.running.remove(&request_id);
        self.cancelled.remove(&request_id)
    }

    pub fn tracked(&self) -> usize {
        self.running.len() + self.cancelled.len()
    }
}

/// Command loop. Each prediction runs on its own thread so a `Cancel` can be
/// processed while the HTTP call is still outstanding; cancelled outcomes are
/// never forwarded. Exits when the command channel closes.
pub fn spawn_provider(
    predictor: Arc<dyn Predictor>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let registry = Arc::new(Mutex::new(CancelRegistry::default()));

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Predict { request_id, inputs } => {
                    let predictor = Arc::clone(&predictor);
                    let tx = tx.clone();
                    let registry = Arc::clone(&registry);
                    if let Ok(mut reg) = registry.lock() {
                        reg.start(request_id);
                    }
                    thread::spawn(move || {
                        let started = Instant::now();
                        let delta = execute(predictor.as_ref(), request_id, inputs);
                        let was_cancelled = registry
                            .lock()
                            .map(|mut reg| reg.finish(request_id))
                            .unwrap_or(false);
                        if was_cancelled {
                            let _ = tx.send(Delta::Log(format!(
                                "[INFO] Discarded outcome of cancelled prediction #{request_id}"
                            )));
                            return;
                        }
                        let _ = tx.send(Delta::Log(format!(
                            "[INFO] Prediction #{request_id} answered in {} ms",
                            started.elapsed().as_millis()
                        )));
                        let _ = tx.send(delta);
                    });
                }
                ProviderCommand::Cancel { request_id } => {
                    if let Ok(mut reg) = registry.lock() {
                        reg.cancel(request_id);
                    }
                }
            }
        }
    })
}
