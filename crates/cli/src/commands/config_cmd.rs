//! `kbscope config` — Configuration management commands.

use kbscope_config::AppConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();

            if config.knowledge.source == "none" {
                warnings.push("knowledge.source = \"none\": every request gets an empty context");
            }

            if config.scoping.preferred_types.is_empty() {
                warnings.push("scoping.preferred_types is empty: content type never affects ranking");
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            let path = config
                .knowledge
                .resolved_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".into());

            println!();
            println!("   Source:    {}", config.knowledge.source);
            println!("   Path:      {path}");
            println!("   Max rows:  {}", config.scoping.max_rows);
            println!("   History:   {} messages", config.scoping.history_limit);
            println!("   Preferred: {}", config.scoping.preferred_types.join(", "));
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
