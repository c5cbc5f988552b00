use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::ErrorResponse;
use thiserror::Error;

pub type WarmupResult<T> = Result<T, WarmupError>;

#[derive(Error, Debug)]
pub enum WarmupError {
    #[error("Missing or empty service parameter")]
    InvalidService,

    #[error("Missing or empty cluster parameter")]
    InvalidCluster,

    #[error("ECS service lookup failed: {0}")]
    ServiceLookup(String),

    #[error("ELBv2 lookup failed: {0}")]
    LoadBalancerLookup(String),

    #[error("Service {0} has no target group binding")]
    MissingTargetGroup(String),

    #[error("Failed to scale service {service}: {detail}")]
    Scale { service: String, detail: String },

    #[error("Listener resolution failed: {0}")]
    ListenerResolution(String),

    #[error("Processing error: {0}")]
    Processing(String),
}

impl WarmupError {
    /// Stable code reported to callers
    pub fn code(&self) -> &'static str {
        match self {
            WarmupError::InvalidService => "invalid_or_null_service",
            WarmupError::InvalidCluster => "invalid_or_null_cluster",
            WarmupError::ServiceLookup(_) => "invalid_key_returned_from_ecs_service_info",
            WarmupError::LoadBalancerLookup(_) => "invalid_key_returned_from_elbv2_describe_info",
            WarmupError::ListenerResolution(_) => {
                "invalid_response_returned_from_elbv2_describe_listeners"
            }
            WarmupError::Scale { .. } => "issue_starting_ecs_task",
            WarmupError::MissingTargetGroup(_) | WarmupError::Processing(_) => {
                "issue_in_processing_ecs_spinup"
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            WarmupError::InvalidService | WarmupError::InvalidCluster => StatusCode::BAD_REQUEST,
            WarmupError::ServiceLookup(_)
            | WarmupError::LoadBalancerLookup(_)
            | WarmupError::ListenerResolution(_)
            | WarmupError::Scale { .. } => StatusCode::BAD_GATEWAY,
            WarmupError::MissingTargetGroup(_) | WarmupError::Processing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for WarmupError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.code()));
        (self.status(), body).into_response()
    }
}

impl From<askama::Error> for WarmupError {
    fn from(err: askama::Error) -> Self {
        WarmupError::Processing(format!("Failed to render holding page: {}", err))
    }
}
