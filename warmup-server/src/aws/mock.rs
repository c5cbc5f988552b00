use crate::aws::traits::{
    ListenerAction, ListenerDescription, LoadBalancerDescription, LoadBalancerOperations,
    ServiceDescription, ServiceOperations, TargetGroupDescription, TargetHealthDescription,
};
use crate::error::{WarmupError, WarmupResult};
use async_trait::async_trait;
use common::ServiceRef;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockStore {
    services: HashMap<ServiceRef, ServiceDescription>,
    target_groups: HashMap<String, TargetGroupDescription>,
    load_balancers: HashMap<String, LoadBalancerDescription>,
    target_health: HashMap<String, Vec<TargetHealthDescription>>,
    listeners: HashMap<String, Vec<ListenerDescription>>,
    /// Descriptions served instead of `services` while reads are stale
    stale_services: Option<HashMap<ServiceRef, ServiceDescription>>,
    scale_calls: Vec<(ServiceRef, i32)>,
    control_plane_calls: usize,
    reject_updates: bool,
}

/// In-memory ECS and ELBv2 control plane for unit testing
#[derive(Clone)]
pub struct MockControlPlane {
    store: Arc<Mutex<MockStore>>,
}

impl MockControlPlane {
    /// Create a new mock with no services or load balancers
    pub fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(MockStore::default())),
        }
    }

    /// Register a service bound to the given target groups
    pub fn add_service(
        &self,
        service_ref: &ServiceRef,
        desired_count: i32,
        running_count: i32,
        target_group_arns: &[&str],
    ) {
        self.put_service(
            service_ref,
            ServiceDescription {
                desired_count: Some(desired_count),
                running_count: Some(running_count),
                target_group_arns: target_group_arns
                    .iter()
                    .map(|arn| Some(arn.to_string()))
                    .collect(),
            },
        );
    }

    /// Register a raw service description, including incomplete ones
    pub fn put_service(&self, service_ref: &ServiceRef, description: ServiceDescription) {
        self.store
            .lock()
            .unwrap()
            .services
            .insert(service_ref.clone(), description);
    }

    /// Simulate ECS placing (or stopping) tasks
    pub fn set_running_count(&self, service_ref: &ServiceRef, running_count: i32) {
        if let Some(service) = self.store.lock().unwrap().services.get_mut(service_ref) {
            service.running_count = Some(running_count);
        }
    }

    pub fn add_target_group(&self, target_group_arn: &str, load_balancer_arns: &[&str]) {
        self.store.lock().unwrap().target_groups.insert(
            target_group_arn.to_string(),
            TargetGroupDescription {
                target_group_arn: target_group_arn.to_string(),
                load_balancer_arns: load_balancer_arns.iter().map(|a| a.to_string()).collect(),
            },
        );
    }

    pub fn add_load_balancer(&self, arn: &str, dns_name: &str, name: &str) {
        self.put_load_balancer(LoadBalancerDescription {
            arn: arn.to_string(),
            dns_name: Some(dns_name.to_string()),
            name: Some(name.to_string()),
        });
    }

    pub fn put_load_balancer(&self, description: LoadBalancerDescription) {
        self.store
            .lock()
            .unwrap()
            .load_balancers
            .insert(description.arn.clone(), description);
    }

    /// Replace the target health of a target group with `(target_id, state)` pairs
    pub fn set_target_health(&self, target_group_arn: &str, targets: &[(&str, &str)]) {
        let descriptions = targets
            .iter()
            .map(|(id, state)| TargetHealthDescription {
                target_id: Some(id.to_string()),
                state: Some(state.to_string()),
            })
            .collect();

        self.put_target_health(target_group_arn, descriptions);
    }

    pub fn put_target_health(
        &self,
        target_group_arn: &str,
        targets: Vec<TargetHealthDescription>,
    ) {
        self.store
            .lock()
            .unwrap()
            .target_health
            .insert(target_group_arn.to_string(), targets);
    }

    /// Append a listener to a load balancer, preserving registration order
    pub fn add_listener(&self, load_balancer_arn: &str, listener: ListenerDescription) {
        self.store
            .lock()
            .unwrap()
            .listeners
            .entry(load_balancer_arn.to_string())
            .or_default()
            .push(listener);
    }

    /// Helper to create a listener forwarding to one target group
    pub fn forwarding_listener(
        port: i32,
        protocol: &str,
        target_group_arn: &str,
    ) -> ListenerDescription {
        ListenerDescription {
            listener_arn: Some(format!("arn:listener/{}", port)),
            port: Some(port),
            protocol: Some(protocol.to_string()),
            default_actions: vec![ListenerAction {
                target_group_arn: None,
                forward_target_group_arns: vec![target_group_arn.to_string()],
            }],
        }
    }

    /// Make every subsequent update call fail as if ECS rejected it
    pub fn reject_updates(&self, reject: bool) {
        self.store.lock().unwrap().reject_updates = reject;
    }

    /// Serve service descriptions as of now until turned off again, while
    /// updates keep applying underneath. Models DescribeServices lagging
    /// behind UpdateService.
    pub fn stale_describes(&self, stale: bool) {
        let mut store = self.store.lock().unwrap();
        let snapshot = stale.then(|| store.services.clone());
        store.stale_services = snapshot;
    }

    /// Every scale request received, in arrival order
    pub fn scale_calls(&self) -> Vec<(ServiceRef, i32)> {
        self.store.lock().unwrap().scale_calls.clone()
    }

    /// Total number of control-plane calls of any kind
    pub fn control_plane_calls(&self) -> usize {
        self.store.lock().unwrap().control_plane_calls
    }

    pub fn desired_count(&self, service_ref: &ServiceRef) -> Option<i32> {
        self.store
            .lock()
            .unwrap()
            .services
            .get(service_ref)
            .and_then(|service| service.desired_count)
    }
}

impl Default for MockControlPlane {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceOperations for MockControlPlane {
    async fn describe_service(
        &self,
        service_ref: &ServiceRef,
    ) -> WarmupResult<Option<ServiceDescription>> {
        let mut store = self.store.lock().unwrap();
        store.control_plane_calls += 1;

        let services = store.stale_services.as_ref().unwrap_or(&store.services);
        Ok(services.get(service_ref).cloned())
    }

    async fn update_desired_count(
        &self,
        service_ref: &ServiceRef,
        desired_count: i32,
    ) -> WarmupResult<()> {
        let mut store = self.store.lock().unwrap();
        store.control_plane_calls += 1;
        store.scale_calls.push((service_ref.clone(), desired_count));

        if store.reject_updates {
            return Err(WarmupError::Processing(
                "UpdateService failed: AccessDeniedException".to_string(),
            ));
        }

        let service = store.services.get_mut(service_ref).ok_or_else(|| {
            WarmupError::Processing(format!(
                "UpdateService failed: ServiceNotFoundException: {}",
                service_ref
            ))
        })?;
        service.desired_count = Some(desired_count);

        Ok(())
    }
}

#[async_trait]
impl LoadBalancerOperations for MockControlPlane {
    async fn describe_target_group(
        &self,
        target_group_arn: &str,
    ) -> WarmupResult<Option<TargetGroupDescription>> {
        let mut store = self.store.lock().unwrap();
        store.control_plane_calls += 1;

        Ok(store.target_groups.get(target_group_arn).cloned())
    }

    async fn describe_load_balancer(
        &self,
        load_balancer_arn: &str,
    ) -> WarmupResult<Option<LoadBalancerDescription>> {
        let mut store = self.store.lock().unwrap();
        store.control_plane_calls += 1;

        Ok(store.load_balancers.get(load_balancer_arn).cloned())
    }

    async fn describe_target_health(
        &self,
        target_group_arn: &str,
    ) -> WarmupResult<Vec<TargetHealthDescription>> {
        let mut store = self.store.lock().unwrap();
        store.control_plane_calls += 1;

        if !store.target_groups.contains_key(target_group_arn) {
            return Err(WarmupError::Processing(format!(
                "DescribeTargetHealth failed: TargetGroupNotFound: {}",
                target_group_arn
            )));
        }

        Ok(store
            .target_health
            .get(target_group_arn)
            .cloned()
            .unwrap_or_default())
    }

    async fn describe_listeners(
        &self,
        load_balancer_arn: &str,
    ) -> WarmupResult<Vec<ListenerDescription>> {
        let mut store = self.store.lock().unwrap();
        store.control_plane_calls += 1;

        if !store.load_balancers.contains_key(load_balancer_arn) {
            return Err(WarmupError::Processing(format!(
                "DescribeListeners failed: LoadBalancerNotFound: {}",
                load_balancer_arn
            )));
        }

        Ok(store
            .listeners
            .get(load_balancer_arn)
            .cloned()
            .unwrap_or_default())
    }
}
