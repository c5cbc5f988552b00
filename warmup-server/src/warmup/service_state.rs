use crate::aws::ServiceOperations;
use crate::error::{WarmupError, WarmupResult};
use common::{ServiceRef, ServiceState, TargetGroupBinding};

/// Read the desired/running counts and load balancer bindings of a service.
///
/// Fails with a service lookup error when ECS has no such service or the
/// description is missing a count. Bindings are passed through as-is; only
/// the first one is checked, and only once tasks are running. Never mutates
/// the service.
pub async fn read_service_state<S: ServiceOperations + ?Sized>(
    services: &S,
    service_ref: &ServiceRef,
) -> WarmupResult<ServiceState> {
    let description = services
        .describe_service(service_ref)
        .await?
        .ok_or_else(|| WarmupError::ServiceLookup(format!("service {} not found", service_ref)))?;

    let desired_count = description.desired_count.ok_or_else(|| {
        WarmupError::ServiceLookup(format!("service {} has no desiredCount", service_ref))
    })?;
    let running_count = description.running_count.ok_or_else(|| {
        WarmupError::ServiceLookup(format!("service {} has no runningCount", service_ref))
    })?;

    if desired_count < 0 || running_count < 0 {
        return Err(WarmupError::ServiceLookup(format!(
            "service {} reported negative task counts",
            service_ref
        )));
    }

    let load_balancer_bindings = description
        .target_group_arns
        .into_iter()
        .map(|target_group_arn| TargetGroupBinding { target_group_arn })
        .collect();

    Ok(ServiceState {
        desired_count,
        running_count,
        load_balancer_bindings,
    })
}
