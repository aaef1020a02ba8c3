//! In-memory channel for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use raftadmin_common::protocol::error::{AdminError, Result};
use raftadmin_common::protocol::jsonrpc::METHOD_NOT_FOUND;

use crate::channel::RpcChannel;

/// Channel answering each method path from a script and recording calls.
#[derive(Default)]
pub struct ScriptedChannel {
    script: Mutex<HashMap<String, VecDeque<Result<Value>>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, method_path: &str, result: Value) -> Self {
        self.push(method_path, Ok(result))
    }

    pub fn fail(self, method_path: &str, error: AdminError) -> Self {
        self.push(method_path, Err(error))
    }

    fn push(self, method_path: &str, outcome: Result<Value>) -> Self {
        self.script
            .lock()
            .unwrap()
            .entry(method_path.to_string())
            .or_default()
            .push_back(outcome);
        self
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called_paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|(path, _)| path).collect()
    }
}

#[async_trait]
impl RpcChannel for ScriptedChannel {
    async fn call(&self, method_path: &str, params: Value) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((method_path.to_string(), params));
        self.script
            .lock()
            .unwrap()
            .get_mut(method_path)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(AdminError::Remote {
                    code: METHOD_NOT_FOUND,
                    message: format!("nothing scripted for {}", method_path),
                })
            })
    }
}
