use std::sync::Arc;

use tracing::info;

use raftadmin_common::protocol::error::{AdminError, Result};
use raftadmin_common::raft_admin::{AwaitResponse, ForgetResponse, Future, AWAIT, FORGET};
use raftadmin_common::schema::{DynamicMessage, Message, MethodRegistry, ResolvedMethod};

use crate::channel::RpcChannel;

/// RaftAdmin client for making calls described by a [`MethodRegistry`]
///
/// Every call goes through the same path: the request message is rendered as
/// JSON, sent over the channel, and the response is decoded into a fresh
/// message of the method's output shape.
pub struct RaftAdminClient<C> {
    channel: C,
    registry: Arc<MethodRegistry>,
}

impl<C: RpcChannel> RaftAdminClient<C> {
    pub fn new(channel: C, registry: Arc<MethodRegistry>) -> Self {
        Self { channel, registry }
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Call a resolved method with a bound request
    pub async fn call(&self, method: &ResolvedMethod, request: &DynamicMessage) -> Result<DynamicMessage> {
        if !request.is(method.descriptor.input) {
            return Err(AdminError::SchemaDefect(format!(
                "{} expects {}, got {}",
                method.name(),
                method.descriptor.input,
                request.shape()
            )));
        }

        info!("Invoking {}({})", method.name(), request);
        let result = self.channel.call(&method.path, request.to_json()).await?;
        let response = self
            .registry
            .catalog()
            .decode(method.descriptor.output, &result)?;
        info!("Response: {}", response);

        Ok(response)
    }

    /// Call a method by canonical name with statically typed messages
    pub async fn call_typed<Req: Message, Res: Message>(&self, name: &str, request: &Req) -> Result<Res> {
        let method = self.registry.get(name).ok_or_else(|| {
            AdminError::SchemaDefect(format!("method {} is not registered", name))
        })?;
        let request = self
            .registry
            .catalog()
            .decode(Req::describe(), &serde_json::to_value(request)?)?;
        self.call(method, &request).await?.to_typed()
    }

    /// Block until the operation behind `future` finishes.
    pub async fn await_operation(&self, future: &Future) -> Result<AwaitResponse> {
        self.call_typed(AWAIT, future).await
    }

    /// Release the server-side state of a finished operation.
    pub async fn forget(&self, future: &Future) -> Result<ForgetResponse> {
        self.call_typed(FORGET, future).await
    }
}
