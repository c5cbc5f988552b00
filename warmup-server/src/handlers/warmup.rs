use crate::error::{WarmupError, WarmupResult};
use crate::page::render_holding_page;
use crate::state::AppState;
use crate::warmup::WarmupOutcome;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use common::ServiceRef;
use std::collections::HashMap;

/// Query parameters of a warm-up poll
#[derive(Debug, Default)]
pub struct WarmupQuery {
    pub service: Option<String>,
    pub cluster: Option<String>,
}

impl WarmupQuery {
    /// Pick the parameters out of a raw query map. A repeated parameter
    /// keeps its last value.
    pub fn from_params(mut params: HashMap<String, String>) -> Self {
        Self {
            service: params.remove("service"),
            cluster: params.remove("cluster"),
        }
    }

    /// Validate the parameters, service first, before any control-plane call
    pub fn service_ref(&self) -> WarmupResult<ServiceRef> {
        let service = non_empty(self.service.as_deref()).ok_or(WarmupError::InvalidService)?;
        let cluster = non_empty(self.cluster.as_deref()).ok_or(WarmupError::InvalidCluster)?;

        Ok(ServiceRef::new(cluster, service))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Warm-up handler - one poll of the warm-up state machine
///
/// Process:
/// 1. Validate `service` and `cluster`
/// 2. Read the service state and act on it (scale, wait or redirect)
/// 3. Return the holding page or a 302 to the service's listener
#[axum::debug_handler]
pub async fn warmup_handler(
    State(state): State<AppState>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> WarmupResult<Response> {
    let Query(params) = params.map_err(|e| {
        tracing::warn!("Rejected malformed query string: {}", e);
        WarmupError::InvalidService
    })?;

    let service_ref = WarmupQuery::from_params(params).service_ref().map_err(|e| {
        tracing::warn!("Rejected warm-up request: {}", e);
        e
    })?;

    tracing::info!(
        "Warm-up poll for service {} in cluster {}",
        service_ref.service,
        service_ref.cluster
    );

    let outcome = state
        .orchestrator
        .warm_up(&service_ref)
        .await
        .map_err(|e| {
            tracing::error!("Warm-up of {} failed ({}): {}", service_ref, e.code(), e);
            e
        })?;

    match outcome {
        WarmupOutcome::Holding { phase } => {
            let body = render_holding_page(&service_ref.service, state.refresh_interval_secs)?;
            tracing::debug!("Serving holding page for {} ({})", service_ref, phase);

            Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=UTF-8")],
                body,
            )
                .into_response())
        }
        WarmupOutcome::Redirect { location } => {
            Ok((StatusCode::FOUND, [(header::LOCATION, location)], "{}").into_response())
        }
    }
}
