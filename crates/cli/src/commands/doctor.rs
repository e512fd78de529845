//! `moodmate doctor` — Diagnose configuration health.

use moodmate_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 MoodMate Doctor — Diagnostics");
    println!("================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found");
    } else {
        println!("  ⚠️  No config file — run `moodmate onboard` (defaults will be used)");
    }

    match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");

            if config.completion.api_key.is_some() {
                println!("  ✅ Completion API key configured");
            } else {
                println!("  ❌ No completion API key — set TOGETHER_API_KEY");
                issues += 1;
            }

            if config.classifier.api_key.is_some() {
                println!("  ✅ Classifier API key configured");
            } else {
                println!("  ⚠️  No classifier API key — moods will fall back to neutral");
                issues += 1;
            }

            if config.sessions.backend == "file" {
                let dir = config.sessions_dir();
                match std::fs::create_dir_all(&dir) {
                    Ok(()) => println!("  ✅ Session directory writable: {}", dir.display()),
                    Err(e) => {
                        println!("  ❌ Session directory unusable: {e}");
                        issues += 1;
                    }
                }
            } else {
                println!("  ✅ Session backend: {} (no disk access)", config.sessions.backend);
            }
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
