pub mod aws;
pub mod config;
pub mod error;
pub mod handlers;
pub mod page;
pub mod server;
pub mod state;
pub mod warmup;

// Re-exports for convenience
pub use config::Config;
pub use error::{WarmupError, WarmupResult};
pub use state::AppState;
