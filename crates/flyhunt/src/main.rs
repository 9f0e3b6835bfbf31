use flyhunt::ServerBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let addr = std::env::var("FLYHUNT_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3001".to_string());

    let mut builder = ServerBuilder::new().bind(&addr);
    if let Ok(health_addr) = std::env::var("FLYHUNT_HEALTH_ADDR") {
        builder = builder.health_bind(&health_addr);
    }

    let server = builder.build().await?;
    tracing::info!(%addr, "flyhunt relay listening");
    server.run().await?;
    Ok(())
}
