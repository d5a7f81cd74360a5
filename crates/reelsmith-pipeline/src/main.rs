//! Content factory binary.
//!
//! Reads one `ContentFactoryRequest` (or an array of them) as JSON from a
//! file argument or stdin, runs the pipeline, and prints the results.

use std::io::Read;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reelsmith_models::ContentFactoryRequest;
use reelsmith_pipeline::{ContentFactory, FactoryConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("reelsmith=info".parse().context("bad log directive")?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true))
            .with(env_filter)
            .init();
    }

    let raw = read_request_input().context("failed to read request input")?;

    let config = FactoryConfig::from_env();
    let factory = ContentFactory::new(config)?;
    info!(mode = %factory.mode(), "content factory ready");

    let value: serde_json::Value =
        serde_json::from_str(&raw).context("request input is not valid JSON")?;

    let output = if value.is_array() {
        let requests: Vec<ContentFactoryRequest> =
            serde_json::from_value(value).context("bad batch request")?;
        let results = factory.run_batch(&requests).await;

        let items: Vec<serde_json::Value> = results
            .into_iter()
            .map(|r| match r {
                Ok(result) => serde_json::to_value(result).unwrap_or_default(),
                Err(e) => serde_json::json!({ "error": e.to_string() }),
            })
            .collect();
        serde_json::to_string_pretty(&items)?
    } else {
        let request: ContentFactoryRequest =
            serde_json::from_value(value).context("bad request")?;
        let result = factory.run(&request).await?;
        serde_json::to_string_pretty(&result)?
    };

    println!("{output}");
    Ok(())
}

/// Read the request JSON from the first argument (a file path) or stdin.
fn read_request_input() -> anyhow::Result<String> {
    match std::env::args().nth(1) {
        Some(path) => {
            std::fs::read_to_string(&path).with_context(|| format!("cannot read {path}"))
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
