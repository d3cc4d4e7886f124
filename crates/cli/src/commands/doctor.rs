//! `kbscope doctor` — Diagnose configuration and knowledge source health.

use kbscope_config::AppConfig;
use kbscope_knowledge::{build_source, KnowledgeStore};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 kbscope Doctor — System Diagnostics");
    println!("======================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found");
    } else {
        println!("  ⚠️  No config file — using defaults (run `kbscope onboard`)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  1 blocking issue found. Fix the config and re-run.");
            return Ok(());
        }
    };

    // Query the source directly so the real error is visible
    let source = build_source(&config.knowledge).await;
    match source.fetch_all().await {
        Ok(rows) if rows.is_empty() => {
            println!("  ⚠️  Knowledge source '{}' is reachable but empty", source.name());
            issues += 1;
        }
        Ok(rows) => {
            println!(
                "  ✅ Knowledge source '{}' returned {} rows",
                source.name(),
                rows.len()
            );
        }
        Err(e) => {
            println!("  ❌ Knowledge source unavailable: {e}");
            if config.knowledge.source == "sqlite" {
                println!("     Create the database with `kbscope import <file>`");
            }
            issues += 1;
        }
    }

    // The store path must agree with the direct read
    let store = KnowledgeStore::new(source);
    let cached = store.load().await;
    println!(
        "  ✅ Store over '{}' serves {} rows (cached: {})",
        store.source_name(),
        cached.len(),
        store.is_loaded()
    );

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
