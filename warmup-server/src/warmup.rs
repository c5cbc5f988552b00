// Warm-up core: control-plane reads, the scale trigger and the decision
pub mod decision;
pub mod health;
pub mod listener;
pub mod orchestrator;
pub mod scaler;
pub mod service_state;

pub use decision::{decide, Action, WarmupPhase};
pub use orchestrator::{WarmupOrchestrator, WarmupOutcome};
