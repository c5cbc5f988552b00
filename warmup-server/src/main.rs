use std::sync::Arc;
use warmup_server::aws::{AwsClient, LoadBalancerOperations, ServiceOperations};
use warmup_server::warmup::WarmupOrchestrator;
use warmup_server::{server, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(config.log_level.clone())
        .init();

    tracing::info!("Warm-up server starting");
    tracing::info!("Port: {}", config.port);
    tracing::info!(
        "AWS region: {}",
        config.aws_region.as_deref().unwrap_or("default chain")
    );
    tracing::info!("Holding page refresh: {}s", config.refresh_interval_secs);

    // Initialize AWS clients
    let aws_client = Arc::new(AwsClient::new(config.aws_region.clone()).await);
    tracing::info!("AWS clients ready");

    // One client serves both control planes via dynamic dispatch
    let services: Arc<dyn ServiceOperations> = aws_client.clone();
    let load_balancers: Arc<dyn LoadBalancerOperations> = aws_client;
    let orchestrator = Arc::new(WarmupOrchestrator::new(services, load_balancers));

    // Create application state
    let state = AppState::new(orchestrator, config.refresh_interval_secs);

    // Build HTTP server
    let app = server::build_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Warm-up server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
