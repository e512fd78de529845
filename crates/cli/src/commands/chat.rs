//! `moodmate chat` — Run one turn through the pipeline without HTTP.
//!
//! Uses the same orchestrator and session store as the gateway, so a chat
//! here continues the same durable conversation the UI sees.

use std::sync::Arc;

use moodmate_config::AppConfig;
use moodmate_engine::TurnOrchestrator;

pub async fn run(
    user: &str,
    message: &str,
    region: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if config.completion.api_key.is_none() {
        eprintln!();
        eprintln!("  ERROR: No completion API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    TOGETHER_API_KEY = '...'");
        eprintln!("    MOODMATE_API_KEY = '...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let completion = Arc::new(moodmate_clients::completion_from_config(&config));
    let classifier = Arc::new(moodmate_clients::classifier_from_config(&config));
    let store = moodmate_session::build_from_config(&config);

    let orchestrator = TurnOrchestrator::new(completion, classifier, store).with_config(&config);

    let result = orchestrator.handle_turn(user, message, region).await?;

    println!("{}", result.reply);
    println!();
    println!("  you: {} · bot: {}", result.user_mood, result.bot_mood);

    Ok(())
}
