use crate::aws::LoadBalancerOperations;
use crate::error::{WarmupError, WarmupResult};
use common::{LoadBalancerInfo, TargetHealth, TargetHealthSnapshot, TargetHealthState};

/// Resolve the load balancer a target group is attached to.
///
/// Uses the target group's first parent load balancer.
pub async fn resolve_load_balancer<L: LoadBalancerOperations + ?Sized>(
    load_balancers: &L,
    target_group_arn: &str,
) -> WarmupResult<LoadBalancerInfo> {
    let target_group = load_balancers
        .describe_target_group(target_group_arn)
        .await?
        .ok_or_else(|| {
            WarmupError::LoadBalancerLookup(format!("target group {} not found", target_group_arn))
        })?;

    let load_balancer_arn = target_group.load_balancer_arns.first().ok_or_else(|| {
        WarmupError::LoadBalancerLookup(format!(
            "target group {} has no load balancer",
            target_group_arn
        ))
    })?;

    let load_balancer = load_balancers
        .describe_load_balancer(load_balancer_arn)
        .await?
        .ok_or_else(|| {
            WarmupError::LoadBalancerLookup(format!(
                "load balancer {} not found",
                load_balancer_arn
            ))
        })?;

    let dns_name = load_balancer.dns_name.ok_or_else(|| {
        WarmupError::LoadBalancerLookup(format!(
            "load balancer {} has no DNSName",
            load_balancer_arn
        ))
    })?;
    let name = load_balancer.name.ok_or_else(|| {
        WarmupError::LoadBalancerLookup(format!(
            "load balancer {} has no LoadBalancerName",
            load_balancer_arn
        ))
    })?;

    Ok(LoadBalancerInfo {
        arn: load_balancer.arn,
        dns_name,
        name,
    })
}

/// Fetch the health of every target in the group.
/// The snapshot is healthy as soon as any one target is.
pub async fn aggregate_health<L: LoadBalancerOperations + ?Sized>(
    load_balancers: &L,
    target_group_arn: &str,
) -> WarmupResult<TargetHealthSnapshot> {
    let descriptions = load_balancers
        .describe_target_health(target_group_arn)
        .await?;

    let mut targets = Vec::with_capacity(descriptions.len());
    for description in descriptions {
        let state = description
            .state
            .ok_or_else(|| {
                WarmupError::LoadBalancerLookup(format!(
                    "target in {} has no health state",
                    target_group_arn
                ))
            })?
            .parse::<TargetHealthState>()
            .map_err(|e| WarmupError::LoadBalancerLookup(e.to_string()))?;

        targets.push(TargetHealth {
            target_id: description.target_id.unwrap_or_default(),
            state,
        });
    }

    let snapshot = TargetHealthSnapshot::new(targets);
    tracing::debug!(
        "Target group {}: {}/{} targets healthy",
        target_group_arn,
        snapshot.healthy_count(),
        snapshot.targets.len()
    );

    Ok(snapshot)
}
