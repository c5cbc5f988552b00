use crate::aws::ServiceOperations;
use crate::error::{WarmupError, WarmupResult};
use common::ServiceRef;

/// Ask ECS to run `desired_count` tasks for the service.
///
/// Fire-and-forget: returns once the request is accepted and never waits
/// for tasks to start. Rejections are reported, not retried; the client's
/// next poll is the retry.
pub async fn scale_up<S: ServiceOperations + ?Sized>(
    services: &S,
    service_ref: &ServiceRef,
    desired_count: i32,
) -> WarmupResult<()> {
    if desired_count <= 0 {
        return Err(WarmupError::Scale {
            service: service_ref.to_string(),
            detail: format!("desired count must be positive, got {}", desired_count),
        });
    }

    services
        .update_desired_count(service_ref, desired_count)
        .await
        .map_err(|e| WarmupError::Scale {
            service: service_ref.to_string(),
            detail: e.to_string(),
        })?;

    tracing::info!(
        "Requested desired count {} for service {}",
        desired_count,
        service_ref
    );
    Ok(())
}
