//! `moodmate onboard` — First-time setup.

use moodmate_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("💬 MoodMate — First-Time Setup");
    println!("==============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if !config_path.exists() {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Wrote default config: {}", config_path.display());
    } else {
        println!("  Config file exists: {}", config_path.display());
    }

    println!();
    println!("Next steps:");
    println!("  1. Set TOGETHER_API_KEY (completion) and HUGGINGFACE_API_KEY (classifier)");
    println!("  2. Run `moodmate doctor` to verify the setup");
    println!("  3. Run `moodmate serve` to start the gateway");

    Ok(())
}
