// Module declarations for HTTP handlers
pub mod health;
pub mod warmup;

// Re-exports
pub use health::health_handler;
pub use warmup::warmup_handler;
