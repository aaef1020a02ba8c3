//! In-process RaftAdmin node for integration tests.
//!
//! Answers JSON-RPC calls from a per-method script, records every call it
//! receives, and reports the leader health service as serving only while
//! marked leader.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use http_body_util::BodyExt;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use raftadmin_common::health::{HealthCheckRequest, HealthCheckResponse, ServingStatus, HEALTH_CHECK_PATH};
use raftadmin_common::protocol::{JsonRpcError, JsonRpcResponse};
use raftadmin_common::transport::{HttpTransport, HyperRequest, HyperResponse};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const LEADER_SERVICE: &str = "quis.RaftLeader";

#[derive(Default)]
struct NodeState {
    script: Mutex<HashMap<String, VecDeque<Result<Value, JsonRpcError>>>>,
    calls: Mutex<Vec<(String, Value)>>,
    health_checks: Mutex<Vec<String>>,
    leader: AtomicBool,
}

pub struct FakeRaftAdmin {
    addr: String,
    state: Arc<NodeState>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl FakeRaftAdmin {
    /// Starts a node on a random port
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let state = Arc::new(NodeState::default());

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel();
        let server_state = state.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        let Ok((stream, _)) = result else { continue };
                        let io = TokioIo::new(stream);
                        let state = server_state.clone();

                        tokio::spawn(async move {
                            let service = service_fn(move |req| {
                                let state = state.clone();
                                async move { Ok::<_, hyper::Error>(handle(state, req).await) }
                            });

                            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                                eprintln!("Server error: {}", err);
                            }
                        });
                    }
                    _ = &mut shutdown_rx => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn set_leader(&self, leader: bool) {
        self.state.leader.store(leader, Ordering::SeqCst);
    }

    /// Queue a successful result for the next call of `method` (e.g. `AddVoter`)
    pub fn reply(&self, method: &str, result: Value) -> &Self {
        self.push(method, Ok(result))
    }

    /// Queue a JSON-RPC error for the next call of `method`
    pub fn reply_error(&self, method: &str, message: &str) -> &Self {
        self.push(method, Err(JsonRpcError::server_error(message)))
    }

    /// Script a complete operation: `method` returns `token`, Await returns
    /// `awaited`, Forget succeeds
    pub fn operation(&self, method: &str, token: &str, awaited: Value) -> &Self {
        self.reply(method, json!({"operation_token": token}))
            .reply("Await", awaited)
            .reply("Forget", json!({}))
    }

    fn push(&self, method: &str, outcome: Result<Value, JsonRpcError>) -> &Self {
        self.state
            .script
            .lock()
            .unwrap()
            .entry(format!("/RaftAdmin/{}", method))
            .or_default()
            .push_back(outcome);
        self
    }

    /// RaftAdmin calls received so far, as (method path, params)
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn called_methods(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|(path, _)| path.trim_start_matches("/RaftAdmin/").to_string())
            .collect()
    }

    /// Service names health-checked so far
    pub fn health_checks(&self) -> Vec<String> {
        self.state.health_checks.lock().unwrap().clone()
    }
}

impl Drop for FakeRaftAdmin {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn handle(state: Arc<NodeState>, req: HyperRequest) -> HyperResponse {
    let path = req.uri().path().to_string();
    let body = req.into_body().collect().await.unwrap().to_bytes();
    let request = match HttpTransport::parse_jsonrpc(body) {
        Ok(request) => request,
        Err(_) => return HttpTransport::to_http_error(Value::Null, JsonRpcError::parse_error()),
    };
    if request.method != path {
        return HttpTransport::to_http_error(request.id, JsonRpcError::invalid_request());
    }

    if path == HEALTH_CHECK_PATH {
        let check: HealthCheckRequest = serde_json::from_value(request.params).unwrap_or_default();
        let serving = check.service.is_empty()
            || (check.service == LEADER_SERVICE && state.leader.load(Ordering::SeqCst));
        state.health_checks.lock().unwrap().push(check.service);
        let status = if serving {
            ServingStatus::Serving
        } else {
            ServingStatus::NotServing
        };
        let result = serde_json::to_value(HealthCheckResponse::new(status)).unwrap();
        return HttpTransport::to_http_response(JsonRpcResponse::success(request.id, result));
    }

    state
        .calls
        .lock()
        .unwrap()
        .push((path.clone(), request.params));

    let scripted = state
        .script
        .lock()
        .unwrap()
        .get_mut(&path)
        .and_then(VecDeque::pop_front);
    match scripted {
        Some(Ok(result)) => HttpTransport::to_http_response(JsonRpcResponse::success(request.id, result)),
        Some(Err(error)) => HttpTransport::to_http_error(request.id, error),
        None => HttpTransport::to_http_error(request.id, JsonRpcError::method_not_found()),
    }
}
