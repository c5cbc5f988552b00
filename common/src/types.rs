use crate::error::CommonError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies a managed ECS service within a cluster
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceRef {
    pub cluster: String,
    pub service: String,
}

impl ServiceRef {
    pub fn new(cluster: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            service: service.into(),
        }
    }
}

impl fmt::Display for ServiceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.cluster, self.service)
    }
}

/// Load balancer binding of a service.
/// Classic ELB bindings carry no target group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroupBinding {
    pub target_group_arn: Option<String>,
}

/// Snapshot of a service's scaling state, read fresh on every request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceState {
    pub desired_count: i32,
    pub running_count: i32,
    #[serde(default)]
    pub load_balancer_bindings: Vec<TargetGroupBinding>,
}

impl ServiceState {
    /// A service with no desired tasks has no meaningful health
    pub fn is_dormant(&self) -> bool {
        self.desired_count == 0
    }

    /// Only the first binding is ever routed to
    pub fn primary_binding(&self) -> Option<&TargetGroupBinding> {
        self.load_balancer_bindings.first()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerInfo {
    pub arn: String,
    pub dns_name: String,
    pub name: String,
}

/// Per-target health state as reported by ELBv2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetHealthState {
    Healthy,
    Unhealthy,
    Draining,
    Unused,
    Initial,
    Unavailable,
    #[serde(rename = "unhealthy.draining")]
    UnhealthyDraining,
}

impl TargetHealthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetHealthState::Healthy => "healthy",
            TargetHealthState::Unhealthy => "unhealthy",
            TargetHealthState::Draining => "draining",
            TargetHealthState::Unused => "unused",
            TargetHealthState::Initial => "initial",
            TargetHealthState::Unavailable => "unavailable",
            TargetHealthState::UnhealthyDraining => "unhealthy.draining",
        }
    }
}

impl FromStr for TargetHealthState {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "healthy" => Ok(TargetHealthState::Healthy),
            "unhealthy" => Ok(TargetHealthState::Unhealthy),
            "draining" => Ok(TargetHealthState::Draining),
            "unused" => Ok(TargetHealthState::Unused),
            "initial" => Ok(TargetHealthState::Initial),
            "unavailable" => Ok(TargetHealthState::Unavailable),
            "unhealthy.draining" => Ok(TargetHealthState::UnhealthyDraining),
            other => Err(CommonError::UnknownHealthState(other.to_string())),
        }
    }
}

impl fmt::Display for TargetHealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetHealth {
    pub target_id: String,
    pub state: TargetHealthState,
}

/// Health of every registered target in a target group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetHealthSnapshot {
    pub targets: Vec<TargetHealth>,
}

impl TargetHealthSnapshot {
    pub fn new(targets: Vec<TargetHealth>) -> Self {
        Self { targets }
    }

    /// Aggregate readiness: a single healthy target is enough.
    /// An empty target group is never healthy.
    pub fn is_healthy(&self) -> bool {
        self.targets
            .iter()
            .any(|target| target.state == TargetHealthState::Healthy)
    }

    pub fn healthy_count(&self) -> usize {
        self.targets
            .iter()
            .filter(|target| target.state == TargetHealthState::Healthy)
            .count()
    }
}

/// Listener protocols a browser can be redirected to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ListenerProtocol {
    Http,
    Https,
}

impl ListenerProtocol {
    /// Lowercase URL scheme used in redirect locations
    pub fn scheme(&self) -> &'static str {
        match self {
            ListenerProtocol::Http => "http",
            ListenerProtocol::Https => "https",
        }
    }
}

impl FromStr for ListenerProtocol {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HTTP" => Ok(ListenerProtocol::Http),
            "HTTPS" => Ok(ListenerProtocol::Https),
            _ => Err(CommonError::UnsupportedProtocol(s.to_string())),
        }
    }
}

impl fmt::Display for ListenerProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerProtocol::Http => f.write_str("HTTP"),
            ListenerProtocol::Https => f.write_str("HTTPS"),
        }
    }
}

/// Port and protocol of the listener that forwards to a target group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerBinding {
    pub port: u16,
    pub protocol: ListenerProtocol,
}

impl ListenerBinding {
    /// Build a binding from raw control-plane values
    pub fn from_raw(port: i32, protocol: &str) -> Result<Self, CommonError> {
        let port = u16::try_from(port)
            .ok()
            .filter(|port| *port > 0)
            .ok_or_else(|| CommonError::InvalidData(format!("listener port {}", port)))?;

        Ok(Self {
            port,
            protocol: protocol.parse()?,
        })
    }

    /// Redirect target for this listener on the given load balancer host
    pub fn location(&self, dns_name: &str) -> String {
        format!("{}://{}:{}", self.protocol.scheme(), dns_name, self.port)
    }
}

/// Error body returned to callers, `{"error": "<stable_code>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>) -> Self {
        Self { error: code.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(id: &str, state: TargetHealthState) -> TargetHealth {
        TargetHealth {
            target_id: id.to_string(),
            state,
        }
    }

    #[test]
    fn test_service_ref_display() {
        let service_ref = ServiceRef::new("previews", "feature-123");
        assert_eq!(service_ref.to_string(), "previews/feature-123");
    }

    #[test]
    fn test_service_state_dormant() {
        let state = ServiceState {
            desired_count: 0,
            running_count: 0,
            load_balancer_bindings: vec![],
        };
        assert!(state.is_dormant());
        assert!(state.primary_binding().is_none());
    }

    #[test]
    fn test_service_state_primary_binding_is_first() {
        let state = ServiceState {
            desired_count: 1,
            running_count: 1,
            load_balancer_bindings: vec![
                TargetGroupBinding {
                    target_group_arn: Some("arn:tg/first".to_string()),
                },
                TargetGroupBinding {
                    target_group_arn: None,
                },
            ],
        };
        assert!(!state.is_dormant());
        assert_eq!(
            state.primary_binding().unwrap().target_group_arn.as_deref(),
            Some("arn:tg/first")
        );
    }

    #[test]
    fn test_health_state_parse() {
        assert_eq!(
            "healthy".parse::<TargetHealthState>().unwrap(),
            TargetHealthState::Healthy
        );
        assert_eq!(
            "unhealthy.draining".parse::<TargetHealthState>().unwrap(),
            TargetHealthState::UnhealthyDraining
        );
        assert!("HEALTHY".parse::<TargetHealthState>().is_err());
    }

    #[test]
    fn test_snapshot_any_healthy_is_healthy() {
        let snapshot = TargetHealthSnapshot::new(vec![
            target("i-1", TargetHealthState::Unhealthy),
            target("i-2", TargetHealthState::Draining),
            target("i-3", TargetHealthState::Healthy),
        ]);
        assert!(snapshot.is_healthy());
        assert_eq!(snapshot.healthy_count(), 1);
    }

    #[test]
    fn test_snapshot_none_healthy() {
        let snapshot = TargetHealthSnapshot::new(vec![
            target("i-1", TargetHealthState::Initial),
            target("i-2", TargetHealthState::Unavailable),
        ]);
        assert!(!snapshot.is_healthy());
    }

    #[test]
    fn test_empty_snapshot_is_not_healthy() {
        assert!(!TargetHealthSnapshot::default().is_healthy());
    }

    #[test]
    fn test_listener_binding_location_lowercases_protocol() {
        let binding = ListenerBinding::from_raw(443, "HTTPS").unwrap();
        assert_eq!(binding.location("lb.example.com"), "https://lb.example.com:443");
    }

    #[test]
    fn test_listener_binding_rejects_unsupported_protocol() {
        let err = ListenerBinding::from_raw(9000, "TCP").unwrap_err();
        assert_eq!(err, CommonError::UnsupportedProtocol("TCP".to_string()));
    }

    #[test]
    fn test_listener_binding_rejects_invalid_port() {
        assert!(ListenerBinding::from_raw(0, "HTTP").is_err());
        assert!(ListenerBinding::from_raw(70000, "HTTP").is_err());
    }

    #[test]
    fn test_error_response_serialization() {
        let body = ErrorResponse::new("invalid_or_null_service");
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"error":"invalid_or_null_service"}"#);
    }

    #[test]
    fn test_health_state_serialization() {
        let json = serde_json::to_string(&TargetHealthState::UnhealthyDraining).unwrap();
        assert_eq!(json, r#""unhealthy.draining""#);
    }
}
