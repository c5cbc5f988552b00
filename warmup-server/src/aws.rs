// Module declarations for AWS control-plane abstractions
pub mod client;
pub mod mock;
pub mod traits;

// Re-exports for convenience
pub use client::AwsClient;
pub use mock::MockControlPlane;
pub use traits::{LoadBalancerOperations, ServiceOperations};
