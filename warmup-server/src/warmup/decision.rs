use common::{ServiceState, TargetHealthSnapshot};
use std::fmt;

/// Desired count requested when waking a dormant service
pub const WAKE_DESIRED_COUNT: i32 = 1;

/// Warm-up phase of a service, derived fresh on every request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmupPhase {
    /// No tasks desired
    Dormant,
    /// Tasks desired but none running yet
    Starting,
    /// Tasks running, no target passing health checks
    Warming,
    /// At least one healthy target
    Ready,
}

impl WarmupPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarmupPhase::Dormant => "dormant",
            WarmupPhase::Starting => "starting",
            WarmupPhase::Warming => "warming",
            WarmupPhase::Ready => "ready",
        }
    }
}

impl fmt::Display for WarmupPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a request should do given the current service state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Set the desired count and show the holding page
    ScaleUp { desired_count: i32 },
    /// Show the holding page without touching the service
    Hold(WarmupPhase),
    /// Resolve the listener and redirect to it
    Redirect,
}

impl Action {
    pub fn phase(&self) -> WarmupPhase {
        match self {
            Action::ScaleUp { .. } => WarmupPhase::Dormant,
            Action::Hold(phase) => *phase,
            Action::Redirect => WarmupPhase::Ready,
        }
    }
}

/// Whether target health has any bearing on the decision
pub fn needs_health(state: &ServiceState) -> bool {
    state.desired_count > 0 && state.running_count >= 1
}

/// Decide the action for a request.
///
/// `health` is only consulted once tasks are running; a running service
/// without a snapshot is treated as still warming.
pub fn decide(state: &ServiceState, health: Option<&TargetHealthSnapshot>) -> Action {
    if state.is_dormant() {
        return Action::ScaleUp {
            desired_count: WAKE_DESIRED_COUNT,
        };
    }

    if !needs_health(state) {
        return Action::Hold(WarmupPhase::Starting);
    }

    match health {
        Some(snapshot) if snapshot.is_healthy() => Action::Redirect,
        _ => Action::Hold(WarmupPhase::Warming),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{TargetHealth, TargetHealthState};

    fn state(desired_count: i32, running_count: i32) -> ServiceState {
        ServiceState {
            desired_count,
            running_count,
            load_balancer_bindings: vec![],
        }
    }

    fn snapshot(states: &[TargetHealthState]) -> TargetHealthSnapshot {
        TargetHealthSnapshot::new(
            states
                .iter()
                .enumerate()
                .map(|(i, state)| TargetHealth {
                    target_id: format!("i-{}", i),
                    state: *state,
                })
                .collect(),
        )
    }

    #[test]
    fn test_dormant_scales_to_one() {
        let healthy = snapshot(&[TargetHealthState::Healthy]);
        assert_eq!(
            decide(&state(0, 0), None),
            Action::ScaleUp { desired_count: 1 }
        );
        // Health of a dormant service is meaningless
        assert_eq!(
            decide(&state(0, 1), Some(&healthy)),
            Action::ScaleUp { desired_count: 1 }
        );
    }

    #[test]
    fn test_starting_holds() {
        assert_eq!(
            decide(&state(1, 0), None),
            Action::Hold(WarmupPhase::Starting)
        );
        assert_eq!(
            decide(&state(3, 0), Some(&snapshot(&[TargetHealthState::Healthy]))),
            Action::Hold(WarmupPhase::Starting)
        );
    }

    #[test]
    fn test_running_without_snapshot_is_warming() {
        assert_eq!(
            decide(&state(1, 1), None),
            Action::Hold(WarmupPhase::Warming)
        );
    }

    #[test]
    fn test_running_unhealthy_is_warming() {
        let health = snapshot(&[
            TargetHealthState::Initial,
            TargetHealthState::Unhealthy,
            TargetHealthState::Draining,
        ]);
        assert_eq!(
            decide(&state(2, 2), Some(&health)),
            Action::Hold(WarmupPhase::Warming)
        );
        assert_eq!(
            decide(&state(2, 2), Some(&snapshot(&[]))),
            Action::Hold(WarmupPhase::Warming)
        );
    }

    #[test]
    fn test_any_healthy_target_redirects() {
        let health = snapshot(&[TargetHealthState::Unhealthy, TargetHealthState::Healthy]);
        assert_eq!(decide(&state(2, 2), Some(&health)), Action::Redirect);
    }

    #[test]
    fn test_needs_health() {
        assert!(!needs_health(&state(0, 0)));
        assert!(!needs_health(&state(1, 0)));
        assert!(needs_health(&state(1, 1)));
    }

    #[test]
    fn test_action_phase() {
        assert_eq!(
            Action::ScaleUp { desired_count: 1 }.phase(),
            WarmupPhase::Dormant
        );
        assert_eq!(Action::Hold(WarmupPhase::Warming).phase(), WarmupPhase::Warming);
        assert_eq!(Action::Redirect.phase(), WarmupPhase::Ready);
    }
}
