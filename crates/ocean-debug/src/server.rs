//! HTTP tuning server implementation.

use crate::TuningState;
use ocean_scene::{ParamSender, ParamUpdate, SKYBOX_PRESETS, TERRAIN_PRESETS};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use tiny_http::{Header, Method, Request, Response, Server};

#[derive(Debug, thiserror::Error)]
pub enum TuningServerError {
    #[error("Failed to bind to port {port}: {error}")]
    BindError { port: u16, error: String },
    #[error("Failed to spawn server thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// HTTP server for the tuning API.
/// Runs on a background thread to avoid blocking the frame loop.
pub struct TuningServer {
    port: u16,
    actual_port: Option<u16>,
    server: Option<Arc<Server>>,
    handle: Option<JoinHandle<()>>,
}

/// Body of `POST /params`: a single update or a list applied in order.
#[derive(Deserialize)]
#[serde(untagged)]
enum UpdateBatch {
    Many(Vec<ParamUpdate>),
    One(ParamUpdate),
}

impl UpdateBatch {
    fn into_vec(self) -> Vec<ParamUpdate> {
        match self {
            UpdateBatch::Many(updates) => updates,
            UpdateBatch::One(update) => vec![update],
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Command {
    command: String,
}

#[derive(Serialize)]
struct CommandResponse {
    executed: bool,
    command: String,
}

#[derive(Serialize)]
struct ParamsResponse {
    queued: usize,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    uptime_seconds: f64,
}

#[derive(Serialize)]
struct PresetsResponse {
    terrain: Vec<&'static str>,
    skybox: Vec<&'static str>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type JsonResponse = Response<Cursor<Vec<u8>>>;

impl TuningServer {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            actual_port: None,
            server: None,
            handle: None,
        }
    }

    pub fn start(
        &mut self,
        state: Arc<Mutex<TuningState>>,
        sender: ParamSender,
    ) -> Result<(), TuningServerError> {
        let server = Server::http(format!("127.0.0.1:{}", self.port)).map_err(|e| {
            TuningServerError::BindError {
                port: self.port,
                error: e.to_string(),
            }
        })?;

        let actual_port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .unwrap_or(self.port);
        self.actual_port = Some(actual_port);

        let server = Arc::new(server);
        let worker = Arc::clone(&server);
        let handle = thread::Builder::new()
            .name("tuning-server".into())
            .spawn(move || Self::run_server(&worker, &state, &sender))?;

        tracing::info!("Tuning API listening on http://127.0.0.1:{actual_port}");
        self.server = Some(server);
        self.handle = Some(handle);
        Ok(())
    }

    /// Unblocks the accept loop and joins the server thread.
    pub fn stop(&mut self) {
        if let Some(server) = self.server.take() {
            server.unblock();
        }
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("Tuning server thread panicked");
        }
    }

    pub fn actual_port(&self) -> u16 {
        self.actual_port.unwrap_or(self.port)
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    fn run_server(server: &Server, state: &Arc<Mutex<TuningState>>, sender: &ParamSender) {
        for request in server.incoming_requests() {
            if let Err(e) = Self::handle_request(request, state, sender) {
                tracing::warn!("Tuning server error: {e}");
            }
        }
        tracing::debug!("Tuning server stopped");
    }

    fn handle_request(
        mut request: Request,
        state: &Arc<Mutex<TuningState>>,
        sender: &ParamSender,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let response = match (request.method(), request.url()) {
            (&Method::Get, "/health") => {
                let response = HealthResponse {
                    status: "ok".to_string(),
                    uptime_seconds: lock(state).uptime_seconds,
                };
                json(200, &response)?
            }
            (&Method::Get, "/metrics") => {
                let snapshot = lock(state).clone();
                json(200, &snapshot)?
            }
            (&Method::Get, "/params") => {
                let params = lock(state).params.clone();
                json(200, &params)?
            }
            (&Method::Get, "/presets") => {
                let response = PresetsResponse {
                    terrain: TERRAIN_PRESETS.iter().map(|p| p.name).collect(),
                    skybox: SKYBOX_PRESETS.iter().map(|p| p.name).collect(),
                };
                json(200, &response)?
            }
            (&Method::Post, "/params") => {
                let mut body = String::new();
                request.as_reader().read_to_string(&mut body)?;
                match serde_json::from_str::<UpdateBatch>(&body) {
                    Ok(batch) => {
                        let updates = batch.into_vec();
                        let total = updates.len();
                        let queued = updates
                            .into_iter()
                            .take_while(|update| sender.send(update.clone()))
                            .count();
                        if queued < total {
                            json(503, &ErrorResponse {
                                error: "render loop is not accepting updates".to_string(),
                            })?
                        } else {
                            tracing::debug!("Queued {queued} parameter update(s)");
                            json(200, &ParamsResponse { queued })?
                        }
                    }
                    Err(e) => json(400, &ErrorResponse {
                        error: e.to_string(),
                    })?,
                }
            }
            (&Method::Post, "/command") => {
                let mut body = String::new();
                request.as_reader().read_to_string(&mut body)?;
                match serde_json::from_str::<Command>(&body) {
                    Ok(command) => {
                        let executed = match command.command.as_str() {
                            "quit" => {
                                lock(state).quit_requested = true;
                                true
                            }
                            _ => false,
                        };
                        json(200, &CommandResponse {
                            executed,
                            command: command.command,
                        })?
                    }
                    Err(e) => json(400, &ErrorResponse {
                        error: e.to_string(),
                    })?,
                }
            }
            _ => Response::from_string("Not Found").with_status_code(404),
        };

        request.respond(response)?;
        Ok(())
    }
}

impl Drop for TuningServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The snapshot stays readable even if the frame loop panicked mid-write.
fn lock(state: &Mutex<TuningState>) -> MutexGuard<'_, TuningState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn json<T: Serialize>(status: u16, body: &T) -> Result<JsonResponse, serde_json::Error> {
    let mut response = Response::from_string(serde_json::to_string(body)?).with_status_code(status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        response = response.with_header(header);
    }
    Ok(response)
}
