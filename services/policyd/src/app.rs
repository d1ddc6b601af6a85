//! Policy service HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and assembles the shared
//! application state from configuration.
use crate::api;
use crate::config::{PolicydConfig, StorageBackend};
use anyhow::{Context, ensure};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use warden_policy::{
    FileAdapter, MemoryAdapter, PolicyAdapter, PolicyService, PostgresAdapter, PostgresSettings,
    RoleWhitelist,
};

#[derive(Clone)]
pub struct AppState {
    pub service: PolicyService,
    pub whitelist: RoleWhitelist,
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            )
        });

    Router::new()
        .route("/", axum::routing::get(api::system::root))
        .route("/health", axum::routing::get(api::system::health))
        .route("/enforce", axum::routing::post(api::enforce::enforce))
        .route("/domain", axum::routing::get(api::rules::list_domains))
        .route("/roles", axum::routing::get(api::rules::list_roles))
        .route("/policies", axum::routing::get(api::rules::list_policies))
        .route("/groups", axum::routing::get(api::rules::list_groups))
        .route(
            "/members/:domain",
            axum::routing::get(api::members::list_members)
                .post(api::members::add_member)
                .put(api::members::replace_member)
                .delete(api::members::remove_member),
        )
        .route(
            "/v1/openapi.json",
            axum::routing::get(api::openapi::openapi_json),
        )
        .layer(trace_layer)
        .with_state(state)
}

/// Open the configured storage backend and wrap it in a service.
///
/// # Errors
/// - The file backend requires the policy file to exist.
/// - The postgres backend requires `postgres` settings and a reachable
///   database.
pub async fn build_state(config: &PolicydConfig) -> anyhow::Result<AppState> {
    let adapter: Arc<dyn PolicyAdapter> = match config.storage {
        StorageBackend::File => {
            ensure!(
                config.policy_path.exists(),
                "policy file not found: {}",
                config.policy_path.display()
            );
            Arc::new(FileAdapter::new(config.policy_path.clone()))
        }
        StorageBackend::Memory => Arc::new(MemoryAdapter::default()),
        StorageBackend::Postgres => {
            let pg = config
                .postgres
                .as_ref()
                .context("postgres configuration missing")?;
            let settings = PostgresSettings {
                url: pg.url.clone(),
                max_connections: pg.max_connections,
                acquire_timeout_ms: pg.acquire_timeout_ms,
            };
            Arc::new(
                PostgresAdapter::connect(&settings)
                    .await
                    .context("connect postgres policy store")?,
            )
        }
    };

    let service = PolicyService::new(adapter);
    tracing::info!(
        backend = service.backend_name(),
        durable = service.is_durable(),
        "policy store ready"
    );
    Ok(AppState {
        service,
        whitelist: RoleWhitelist::new(config.assignable_roles.iter().cloned()),
    })
}
