//! `kbscope scope` — Run the scoping pipeline for one query.

use kbscope_config::AppConfig;
use kbscope_engine::{ScopeRequest, ScopingEngine};
use kbscope_knowledge::{build_source, KnowledgeStore};
use std::path::PathBuf;
use std::sync::Arc;

pub async fn run(
    query: String,
    history: Option<PathBuf>,
    instructions: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let history = match history {
        Some(path) => {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| format!("Failed to read history {}: {e}", path.display()))?;
            serde_json::from_str(&raw)
                .map_err(|e| format!("History file is not valid JSON: {e}"))?
        }
        None => serde_json::Value::Null,
    };

    let source = build_source(&config.knowledge).await;
    let store = Arc::new(KnowledgeStore::new(source));
    let engine = ScopingEngine::new(store, &config.scoping);

    let request = ScopeRequest::new(query).with_history(history);
    let output = engine.prepare(&request).await;

    if json {
        let mut body = serde_json::json!({
            "query": request.query,
            "fallback": output.context.is_fallback(),
            "candidates": output.context.total_candidates(),
            "rows": output.context.rows(),
            "context": output.context.text(),
            "history": output.history,
            "estimated_tokens": output.context.estimated_tokens(),
        });
        if let Some(instructions) = &instructions {
            let prompt = output.to_prompt(instructions, &request.query);
            body["prompt"] = serde_json::json!({
                "system": prompt.system_message,
                "messages": prompt.messages,
            });
        }
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    match &instructions {
        Some(instructions) => {
            let prompt = output.to_prompt(instructions, &request.query);
            println!("[system]\n{}\n", prompt.system_message);
            for message in &prompt.messages {
                println!("[{}]\n{}\n", message.role, message.content);
            }
        }
        None => println!("{}", output.context.text()),
    }

    eprintln!(
        "\n📊 {} of {} candidate rows rendered{} (~{} tokens)",
        output.context.rows().len(),
        output.context.total_candidates(),
        if output.context.is_fallback() {
            ", no direct match"
        } else {
            ""
        },
        output.context.estimated_tokens()
    );

    Ok(())
}
