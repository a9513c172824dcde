use std::sync::Arc;

use rst_common::with_http_tokio::axum::body::{to_bytes, Body};
use rst_common::with_http_tokio::axum::extract::State;
use rst_common::with_http_tokio::axum::http::{header, StatusCode};
use rst_common::with_http_tokio::axum::response::{IntoResponse, Response};
use rst_common::with_logging::log::{debug, warn};

use prople_herald_core::agent::types::{AgentAPI, AgentError};

use super::types::{HttpError, CONTENT_TYPE_JSON};

/// `AgentState` is the shared state of the agent endpoint
pub struct AgentState<TAgent>
where
    TAgent: AgentAPI,
{
    agent: Arc<TAgent>,
    body_limit: usize,
}

impl<TAgent> AgentState<TAgent>
where
    TAgent: AgentAPI,
{
    pub fn new(agent: Arc<TAgent>, body_limit: usize) -> Self {
        Self { agent, body_limit }
    }
}

impl<TAgent> Clone for AgentState<TAgent>
where
    TAgent: AgentAPI,
{
    fn clone(&self) -> Self {
        Self {
            agent: self.agent.clone(),
            body_limit: self.body_limit,
        }
    }
}

/// `agent_handler` reads the whole request body and gives it to the agent
///
/// Any failure is answered with a generic message, the details are only logged
pub async fn agent_handler<TAgent>(
    State(state): State<AgentState<TAgent>>,
    body: Body,
) -> Result<Response, HttpError>
where
    TAgent: AgentAPI + 'static,
{
    let payload = to_bytes(body, state.body_limit)
        .await
        .map_err(|err| AgentError::IOError(err.to_string()))
        .map_err(|err| {
            warn!("[http:agent] {}", err);
            HttpError::from(err)
        })?;

    debug!("[http:agent] payload size: {}", payload.len());

    let output = state.agent.handle(payload.to_vec()).await.map_err(|err| {
        warn!("[http:agent] {}", err);
        HttpError::from(err)
    })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, CONTENT_TYPE_JSON)],
        output,
    )
        .into_response())
}
