use crate::aws::traits::{
    ListenerAction, ListenerDescription, LoadBalancerDescription, LoadBalancerOperations,
    ServiceDescription, ServiceOperations, TargetGroupDescription, TargetHealthDescription,
};
use crate::error::{WarmupError, WarmupResult};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_ecs::config::Region;
use aws_sdk_ecs::error::DisplayErrorContext;
use common::ServiceRef;

/// Real control plane implementation backed by the AWS SDK
pub struct AwsClient {
    ecs: aws_sdk_ecs::Client,
    elbv2: aws_sdk_elasticloadbalancingv2::Client,
}

impl AwsClient {
    /// Create clients from the default credential chain,
    /// optionally pinned to a region
    pub async fn new(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let sdk_config = loader.load().await;

        Self::from_config(&sdk_config)
    }

    /// Create clients from an explicit SDK configuration
    pub fn from_config(sdk_config: &SdkConfig) -> Self {
        Self {
            ecs: aws_sdk_ecs::Client::new(sdk_config),
            elbv2: aws_sdk_elasticloadbalancingv2::Client::new(sdk_config),
        }
    }
}

fn call_failed<E: std::error::Error>(operation: &str, err: E) -> WarmupError {
    WarmupError::Processing(format!("{} failed: {}", operation, DisplayErrorContext(err)))
}

#[async_trait]
impl ServiceOperations for AwsClient {
    async fn describe_service(
        &self,
        service_ref: &ServiceRef,
    ) -> WarmupResult<Option<ServiceDescription>> {
        let output = self
            .ecs
            .describe_services()
            .cluster(&service_ref.cluster)
            .services(&service_ref.service)
            .send()
            .await
            .map_err(|e| call_failed("DescribeServices", e))?;

        let Some(service) = output.services().first() else {
            return Ok(None);
        };

        let desired_count: Option<i32> = service.desired_count().into();
        let running_count: Option<i32> = service.running_count().into();

        Ok(Some(ServiceDescription {
            desired_count,
            running_count,
            target_group_arns: service
                .load_balancers()
                .iter()
                .map(|lb| lb.target_group_arn().map(str::to_string))
                .collect(),
        }))
    }

    async fn update_desired_count(
        &self,
        service_ref: &ServiceRef,
        desired_count: i32,
    ) -> WarmupResult<()> {
        self.ecs
            .update_service()
            .cluster(&service_ref.cluster)
            .service(&service_ref.service)
            .desired_count(desired_count)
            .send()
            .await
            .map_err(|e| call_failed("UpdateService", e))?;

        Ok(())
    }
}

#[async_trait]
impl LoadBalancerOperations for AwsClient {
    async fn describe_target_group(
        &self,
        target_group_arn: &str,
    ) -> WarmupResult<Option<TargetGroupDescription>> {
        let output = self
            .elbv2
            .describe_target_groups()
            .target_group_arns(target_group_arn)
            .send()
            .await
            .map_err(|e| call_failed("DescribeTargetGroups", e))?;

        Ok(output.target_groups().first().map(|tg| TargetGroupDescription {
            target_group_arn: tg
                .target_group_arn()
                .unwrap_or(target_group_arn)
                .to_string(),
            load_balancer_arns: tg.load_balancer_arns().to_vec(),
        }))
    }

    async fn describe_load_balancer(
        &self,
        load_balancer_arn: &str,
    ) -> WarmupResult<Option<LoadBalancerDescription>> {
        let output = self
            .elbv2
            .describe_load_balancers()
            .load_balancer_arns(load_balancer_arn)
            .send()
            .await
            .map_err(|e| call_failed("DescribeLoadBalancers", e))?;

        Ok(output
            .load_balancers()
            .first()
            .map(|lb| LoadBalancerDescription {
                arn: lb
                    .load_balancer_arn()
                    .unwrap_or(load_balancer_arn)
                    .to_string(),
                dns_name: lb.dns_name().map(str::to_string),
                name: lb.load_balancer_name().map(str::to_string),
            }))
    }

    async fn describe_target_health(
        &self,
        target_group_arn: &str,
    ) -> WarmupResult<Vec<TargetHealthDescription>> {
        let output = self
            .elbv2
            .describe_target_health()
            .target_group_arn(target_group_arn)
            .send()
            .await
            .map_err(|e| call_failed("DescribeTargetHealth", e))?;

        Ok(output
            .target_health_descriptions()
            .iter()
            .map(|description| TargetHealthDescription {
                target_id: description
                    .target()
                    .and_then(|target| target.id())
                    .map(str::to_string),
                state: description
                    .target_health()
                    .and_then(|health| health.state())
                    .map(|state| state.as_str().to_string()),
            })
            .collect())
    }

    async fn describe_listeners(
        &self,
        load_balancer_arn: &str,
    ) -> WarmupResult<Vec<ListenerDescription>> {
        // Single page: listener counts per load balancer are small
        let output = self
            .elbv2
            .describe_listeners()
            .load_balancer_arn(load_balancer_arn)
            .send()
            .await
            .map_err(|e| call_failed("DescribeListeners", e))?;

        Ok(output
            .listeners()
            .iter()
            .map(|listener| ListenerDescription {
                listener_arn: listener.listener_arn().map(str::to_string),
                port: listener.port(),
                protocol: listener.protocol().map(|p| p.as_str().to_string()),
                default_actions: listener
                    .default_actions()
                    .iter()
                    .map(|action| ListenerAction {
                        target_group_arn: action.target_group_arn().map(str::to_string),
                        forward_target_group_arns: action
                            .forward_config()
                            .map(|config| {
                                config
                                    .target_groups()
                                    .iter()
                                    .filter_map(|tg| tg.target_group_arn().map(str::to_string))
                                    .collect()
                            })
                            .unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect())
    }
}
