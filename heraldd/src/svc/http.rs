use std::time::Duration;

use rst_common::with_http_tokio::axum::{self, routing::post, Router};
use rst_common::with_http_tokio::tower_http::timeout::TimeoutLayer;
use rst_common::with_http_tokio::tower_http::trace::TraceLayer;
use rst_common::with_logging::log::info;
use rst_common::with_tokio::tokio;
use rst_common::with_tracing::tracing_subscriber::{
    self, layer::SubscriberExt, util::SubscriberInitExt,
};

use prople_herald_core::agent::Agent;
use prople_herald_http::http::agent_handler;
use prople_herald_http::HeraldHTTP;

use crate::errors::HeraldError;

pub const AGENT_PATH: &str = "/agent";

/// `Http` serves the agent endpoint
pub struct Http {
    config: String,
}

impl Http {
    pub fn new(config: String) -> Http {
        Self { config }
    }

    pub async fn serve(&self) -> Result<(), HeraldError> {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    format!(
                        "{}=debug,prople_herald_core=debug,prople_herald_http=debug,tower_http=debug,axum=trace",
                        env!("CARGO_CRATE_NAME")
                    )
                    .into()
                }),
            )
            .with(tracing_subscriber::fmt::layer().without_time())
            .init();

        let herald = HeraldHTTP::new(&self.config)
            .map_err(|err| HeraldError::ConfigError(err.to_string()))?;

        let config_app = herald.build_app_config();
        let state = herald
            .build_state()
            .map_err(|err| HeraldError::ConfigError(err.to_string()))?;

        let app = Router::new()
            .route(AGENT_PATH, post(agent_handler::<Agent>))
            .with_state(state)
            .layer((
                TraceLayer::new_for_http(),
                TimeoutLayer::new(Duration::from_secs(config_app.get_timeout_secs())),
            ));

        let (host, port) = config_app.get_app_config();
        let addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|err| HeraldError::HttpError(err.to_string()))?;

        info!("[heraldd] listening on: {}", addr);
        axum::serve(listener, app)
            .await
            .map_err(|err| HeraldError::HttpError(err.to_string()))
    }
}
