//! `moodmate serve` — Start the HTTP chat gateway.

use moodmate_config::AppConfig;
use tracing::info;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        info!(port, "Port overridden from command line");
        config.gateway.port = port;
    }

    println!("💬 MoodMate Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model: {}", config.completion.model);
    println!("   Sessions: {}", config.sessions.backend);

    info!(
        model = %config.completion.model,
        sessions = %config.sessions.backend,
        "Gateway configuration loaded"
    );

    moodmate_gateway::start(config).await?;

    Ok(())
}
