use crate::aws::{LoadBalancerOperations, ServiceOperations};
use crate::error::{WarmupError, WarmupResult};
use crate::warmup::decision::{decide, needs_health, Action, WarmupPhase};
use crate::warmup::health::{aggregate_health, resolve_load_balancer};
use crate::warmup::listener::find_listener;
use crate::warmup::scaler::scale_up;
use crate::warmup::service_state::read_service_state;
use common::{LoadBalancerInfo, ServiceRef, ServiceState, TargetHealthSnapshot};
use std::sync::Arc;

/// Result of a warm-up request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarmupOutcome {
    /// Service is not ready yet; show the holding page
    Holding { phase: WarmupPhase },
    /// Service is healthy; redirect the caller
    Redirect { location: String },
}

/// Load balancer facts gathered once tasks are running
struct HealthProbe {
    target_group_arn: String,
    load_balancer: LoadBalancerInfo,
    snapshot: TargetHealthSnapshot,
}

/// Warm-up state machine over the ECS and ELBv2 control planes
///
/// Holds no per-service state: every call re-reads the service and decides
/// from scratch, so repeated and concurrent polls for the same service are
/// safe.
pub struct WarmupOrchestrator<S: ServiceOperations + ?Sized, L: LoadBalancerOperations + ?Sized> {
    services: Arc<S>,
    load_balancers: Arc<L>,
}

impl<S: ServiceOperations + ?Sized, L: LoadBalancerOperations + ?Sized> Clone
    for WarmupOrchestrator<S, L>
{
    fn clone(&self) -> Self {
        Self {
            services: Arc::clone(&self.services),
            load_balancers: Arc::clone(&self.load_balancers),
        }
    }
}

impl<S: ServiceOperations + ?Sized, L: LoadBalancerOperations + ?Sized> WarmupOrchestrator<S, L> {
    pub fn new(services: Arc<S>, load_balancers: Arc<L>) -> Self {
        Self {
            services,
            load_balancers,
        }
    }

    /// Advance the warm-up of a service by one poll
    pub async fn warm_up(&self, service_ref: &ServiceRef) -> WarmupResult<WarmupOutcome> {
        let state = read_service_state(&*self.services, service_ref).await?;
        tracing::info!(
            "Service {}: desired_count={} running_count={}",
            service_ref,
            state.desired_count,
            state.running_count
        );

        let probe = if needs_health(&state) {
            let target_group_arn = primary_target_group(&state, service_ref)?;
            Some(self.probe(target_group_arn).await?)
        } else {
            None
        };

        let action = decide(&state, probe.as_ref().map(|p| &p.snapshot));
        tracing::info!("Service {} is {}", service_ref, action.phase());

        match (action, probe) {
            (Action::ScaleUp { desired_count }, _) => {
                scale_up(&*self.services, service_ref, desired_count).await?;
                Ok(WarmupOutcome::Holding {
                    phase: WarmupPhase::Dormant,
                })
            }
            (Action::Redirect, Some(probe)) => self.redirect(probe).await,
            // decide only redirects on a healthy snapshot
            (Action::Redirect, None) => Ok(WarmupOutcome::Holding {
                phase: WarmupPhase::Warming,
            }),
            (Action::Hold(phase), _) => Ok(WarmupOutcome::Holding { phase }),
        }
    }

    async fn redirect(&self, probe: HealthProbe) -> WarmupResult<WarmupOutcome> {
        let listener = find_listener(
            &*self.load_balancers,
            &probe.load_balancer.arn,
            &probe.target_group_arn,
        )
        .await?;
        let location = listener.location(&probe.load_balancer.dns_name);

        tracing::info!(
            "Redirecting to {} via load balancer {}",
            location,
            probe.load_balancer.name
        );
        Ok(WarmupOutcome::Redirect { location })
    }

    async fn probe(&self, target_group_arn: &str) -> WarmupResult<HealthProbe> {
        let load_balancer = resolve_load_balancer(&*self.load_balancers, target_group_arn).await?;
        let snapshot = aggregate_health(&*self.load_balancers, target_group_arn).await?;

        Ok(HealthProbe {
            target_group_arn: target_group_arn.to_string(),
            load_balancer,
            snapshot,
        })
    }
}

/// Target group of the first binding. Later bindings are never routed to.
fn primary_target_group<'a>(
    state: &'a ServiceState,
    service_ref: &ServiceRef,
) -> WarmupResult<&'a str> {
    let binding = state
        .primary_binding()
        .ok_or_else(|| WarmupError::MissingTargetGroup(service_ref.to_string()))?;

    binding.target_group_arn.as_deref().ok_or_else(|| {
        WarmupError::ServiceLookup(format!(
            "service {} has a load balancer binding without targetGroupArn",
            service_ref
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::traits::ServiceDescription;
    use crate::aws::MockControlPlane;

    const TG: &str = "arn:tg/web";
    const LB: &str = "arn:lb/web";

    fn web() -> ServiceRef {
        ServiceRef::new("previews", "web")
    }

    fn orchestrator(
        mock: &MockControlPlane,
    ) -> WarmupOrchestrator<MockControlPlane, MockControlPlane> {
        let ops = Arc::new(mock.clone());
        WarmupOrchestrator::new(ops.clone(), ops)
    }

    fn mock_with_load_balancer() -> MockControlPlane {
        let mock = MockControlPlane::new();
        mock.add_target_group(TG, &[LB]);
        mock.add_load_balancer(LB, "lb.example.com", "web-lb");
        mock.add_listener(LB, MockControlPlane::forwarding_listener(443, "HTTPS", TG));
        mock
    }

    #[tokio::test]
    async fn test_dormant_service_is_scaled_once() {
        let mock = mock_with_load_balancer();
        mock.add_service(&web(), 0, 0, &[TG]);

        let outcome = orchestrator(&mock).warm_up(&web()).await.unwrap();

        assert_eq!(
            outcome,
            WarmupOutcome::Holding {
                phase: WarmupPhase::Dormant
            }
        );
        assert_eq!(mock.scale_calls(), vec![(web(), 1)]);
        assert_eq!(mock.desired_count(&web()), Some(1));
    }

    #[tokio::test]
    async fn test_dormant_service_without_binding_still_scales() {
        let mock = MockControlPlane::new();
        mock.add_service(&web(), 0, 0, &[]);

        let outcome = orchestrator(&mock).warm_up(&web()).await.unwrap();
        assert!(matches!(outcome, WarmupOutcome::Holding { .. }));
        assert_eq!(mock.scale_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_dormant_service_with_classic_binding_scales() {
        let mock = mock_with_load_balancer();
        mock.put_service(
            &web(),
            ServiceDescription {
                desired_count: Some(0),
                running_count: Some(0),
                target_group_arns: vec![Some(TG.to_string()), None],
            },
        );

        let outcome = orchestrator(&mock).warm_up(&web()).await.unwrap();

        assert_eq!(
            outcome,
            WarmupOutcome::Holding {
                phase: WarmupPhase::Dormant
            }
        );
        assert_eq!(mock.scale_calls(), vec![(web(), 1)]);
    }

    #[tokio::test]
    async fn test_only_first_binding_is_routed() {
        let mock = mock_with_load_balancer();
        mock.put_service(
            &web(),
            ServiceDescription {
                desired_count: Some(1),
                running_count: Some(1),
                target_group_arns: vec![Some(TG.to_string()), None],
            },
        );
        mock.set_target_health(TG, &[("i-1", "healthy")]);

        let outcome = orchestrator(&mock).warm_up(&web()).await.unwrap();
        assert!(matches!(outcome, WarmupOutcome::Redirect { .. }));
    }

    #[tokio::test]
    async fn test_running_service_with_classic_first_binding_fails_lookup() {
        let mock = mock_with_load_balancer();
        mock.put_service(
            &web(),
            ServiceDescription {
                desired_count: Some(1),
                running_count: Some(1),
                target_group_arns: vec![None, Some(TG.to_string())],
            },
        );

        let err = orchestrator(&mock).warm_up(&web()).await.unwrap_err();
        assert_eq!(err.code(), "invalid_key_returned_from_ecs_service_info");
    }

    #[tokio::test]
    async fn test_starting_service_holds_without_scaling() {
        let mock = mock_with_load_balancer();
        mock.add_service(&web(), 1, 0, &[TG]);

        let outcome = orchestrator(&mock).warm_up(&web()).await.unwrap();

        assert_eq!(
            outcome,
            WarmupOutcome::Holding {
                phase: WarmupPhase::Starting
            }
        );
        assert!(mock.scale_calls().is_empty());
        // Only the service description was read
        assert_eq!(mock.control_plane_calls(), 1);
    }

    #[tokio::test]
    async fn test_warming_service_holds() {
        let mock = mock_with_load_balancer();
        mock.add_service(&web(), 1, 1, &[TG]);
        mock.set_target_health(TG, &[("i-1", "initial")]);

        let outcome = orchestrator(&mock).warm_up(&web()).await.unwrap();

        assert_eq!(
            outcome,
            WarmupOutcome::Holding {
                phase: WarmupPhase::Warming
            }
        );
        assert!(mock.scale_calls().is_empty());
    }

    #[tokio::test]
    async fn test_ready_service_redirects() {
        let mock = mock_with_load_balancer();
        mock.add_service(&web(), 2, 2, &[TG]);
        mock.set_target_health(TG, &[("i-1", "unhealthy"), ("i-2", "healthy")]);

        let outcome = orchestrator(&mock).warm_up(&web()).await.unwrap();

        assert_eq!(
            outcome,
            WarmupOutcome::Redirect {
                location: "https://lb.example.com:443".to_string()
            }
        );
        assert!(mock.scale_calls().is_empty());
    }

    #[tokio::test]
    async fn test_running_service_without_binding_fails() {
        let mock = MockControlPlane::new();
        mock.add_service(&web(), 1, 1, &[]);

        let err = orchestrator(&mock).warm_up(&web()).await.unwrap_err();
        assert!(matches!(err, WarmupError::MissingTargetGroup(_)));
        assert_eq!(err.code(), "issue_in_processing_ecs_spinup");
    }

    #[tokio::test]
    async fn test_ready_service_without_listener_fails() {
        let mock = MockControlPlane::new();
        mock.add_target_group(TG, &[LB]);
        mock.add_load_balancer(LB, "lb.example.com", "web-lb");
        mock.add_service(&web(), 1, 1, &[TG]);
        mock.set_target_health(TG, &[("i-1", "healthy")]);

        let err = orchestrator(&mock).warm_up(&web()).await.unwrap_err();
        assert!(matches!(err, WarmupError::ListenerResolution(_)));
    }

    #[tokio::test]
    async fn test_scale_rejection_is_reported() {
        let mock = MockControlPlane::new();
        mock.add_service(&web(), 0, 0, &[TG]);
        mock.reject_updates(true);

        let err = orchestrator(&mock).warm_up(&web()).await.unwrap_err();
        assert_eq!(err.code(), "issue_starting_ecs_task");
    }

    #[tokio::test]
    async fn test_unknown_service_fails_lookup() {
        let mock = MockControlPlane::new();

        let err = orchestrator(&mock).warm_up(&web()).await.unwrap_err();
        assert_eq!(err.code(), "invalid_key_returned_from_ecs_service_info");
        assert!(mock.scale_calls().is_empty());
    }
}
