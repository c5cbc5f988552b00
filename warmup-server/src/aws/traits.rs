use crate::error::WarmupResult;
use async_trait::async_trait;
use common::ServiceRef;

/// ECS service as described by the control plane.
/// Fields stay optional so the reader can reject incomplete descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDescription {
    pub desired_count: Option<i32>,
    pub running_count: Option<i32>,
    /// One entry per load balancer binding, in service order
    pub target_group_arns: Vec<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetGroupDescription {
    pub target_group_arn: String,
    pub load_balancer_arns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadBalancerDescription {
    pub arn: String,
    pub dns_name: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetHealthDescription {
    pub target_id: Option<String>,
    pub state: Option<String>,
}

/// Default action of a listener. Forward actions name their target
/// groups either directly or through a forward config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenerAction {
    pub target_group_arn: Option<String>,
    pub forward_target_group_arns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenerDescription {
    pub listener_arn: Option<String>,
    pub port: Option<i32>,
    pub protocol: Option<String>,
    pub default_actions: Vec<ListenerAction>,
}

/// Compute control plane operations (ECS)
#[async_trait]
pub trait ServiceOperations: Send + Sync {
    /// Describe a service; `None` when the cluster has no such service
    async fn describe_service(
        &self,
        service_ref: &ServiceRef,
    ) -> WarmupResult<Option<ServiceDescription>>;

    /// Set the service's desired task count. This is a set, not an increment.
    async fn update_desired_count(
        &self,
        service_ref: &ServiceRef,
        desired_count: i32,
    ) -> WarmupResult<()>;
}

/// Load balancer control plane operations (ELBv2)
#[async_trait]
pub trait LoadBalancerOperations: Send + Sync {
    async fn describe_target_group(
        &self,
        target_group_arn: &str,
    ) -> WarmupResult<Option<TargetGroupDescription>>;

    async fn describe_load_balancer(
        &self,
        load_balancer_arn: &str,
    ) -> WarmupResult<Option<LoadBalancerDescription>>;

    async fn describe_target_health(
        &self,
        target_group_arn: &str,
    ) -> WarmupResult<Vec<TargetHealthDescription>>;

    async fn describe_listeners(
        &self,
        load_balancer_arn: &str,
    ) -> WarmupResult<Vec<ListenerDescription>>;
}
