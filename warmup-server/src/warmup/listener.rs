use crate::aws::traits::{ListenerAction, ListenerDescription};
use crate::aws::LoadBalancerOperations;
use crate::error::{WarmupError, WarmupResult};
use common::ListenerBinding;

/// Find the listener on a load balancer that forwards to a target group.
///
/// Any failure, including the describe call itself, is a listener
/// resolution error.
pub async fn find_listener<L: LoadBalancerOperations + ?Sized>(
    load_balancers: &L,
    load_balancer_arn: &str,
    target_group_arn: &str,
) -> WarmupResult<ListenerBinding> {
    let listeners = load_balancers
        .describe_listeners(load_balancer_arn)
        .await
        .map_err(|e| WarmupError::ListenerResolution(e.to_string()))?;

    select_listener(&listeners, target_group_arn).map_err(|e| match e {
        WarmupError::ListenerResolution(detail) => WarmupError::ListenerResolution(format!(
            "{} on load balancer {}",
            detail, load_balancer_arn
        )),
        other => other,
    })
}

/// Linear scan over listeners, their default actions and each action's
/// forward targets. The first listener that references the target group wins.
pub fn select_listener(
    listeners: &[ListenerDescription],
    target_group_arn: &str,
) -> WarmupResult<ListenerBinding> {
    let listener = listeners
        .iter()
        .find(|listener| {
            listener
                .default_actions
                .iter()
                .any(|action| forwards_to(action, target_group_arn))
        })
        .ok_or_else(|| {
            WarmupError::ListenerResolution(format!(
                "no listener forwards to {}",
                target_group_arn
            ))
        })?;

    let listener_arn = listener.listener_arn.as_deref().unwrap_or("<unknown>");
    tracing::debug!("Listener {} forwards to {}", listener_arn, target_group_arn);

    let port = listener.port.ok_or_else(|| {
        WarmupError::ListenerResolution(format!("listener {} has no port", listener_arn))
    })?;
    let protocol = listener.protocol.as_deref().ok_or_else(|| {
        WarmupError::ListenerResolution(format!("listener {} has no protocol", listener_arn))
    })?;

    ListenerBinding::from_raw(port, protocol).map_err(|e| {
        WarmupError::ListenerResolution(format!("listener {}: {}", listener_arn, e))
    })
}

fn forwards_to(action: &ListenerAction, target_group_arn: &str) -> bool {
    action.target_group_arn.as_deref() == Some(target_group_arn)
        || action
            .forward_target_group_arns
            .iter()
            .any(|arn| arn == target_group_arn)
}
