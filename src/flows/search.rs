//! search / suggest / rank commands

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::io::AsyncReadExt;

use crate::client::NotesApi;
use crate::core::model::ResultSet;
use crate::core::render::{RenderConfig, Renderer};
use crate::resolver::{rank_and_group, rank_and_group_for, SearchTrigger};

/// Query the backend and resolve its listing. Network failures yield an empty set.
pub async fn search_remote<A: NotesApi>(
    api: &A,
    trigger: SearchTrigger,
    query: &str,
) -> ResultSet {
    let sent = match trigger {
        SearchTrigger::Submit => query.to_string(),
        SearchTrigger::Keystroke => {
            let trimmed = query.trim();
            if trimmed.is_empty() {
                return ResultSet::new();
            }
            trimmed.to_string()
        }
    };

    match api.search(Some(&sent)).await {
        Ok(raw) => resolve(trigger, &raw, &sent),
        Err(e) => {
            tracing::warn!(error = %e, "search failed");
            ResultSet::new()
        }
    }
}

fn resolve(trigger: SearchTrigger, raw: &Value, query: &str) -> ResultSet {
    match trigger {
        SearchTrigger::Submit => rank_and_group(raw, query),
        SearchTrigger::Keystroke => rank_and_group_for(trigger, raw, query),
    }
}

fn print_results(result_set: &ResultSet, render_config: RenderConfig, query: &str) {
    tracing::debug!(results = result_set.len(), "rendering results");
    let config = if query.trim().is_empty() {
        render_config
    } else {
        render_config.highlighting(query)
    };
    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(result_set));
}

/// Run the search command (explicit search)
pub async fn run_search<A: NotesApi>(
    api: &A,
    query: Option<&str>,
    render_config: RenderConfig,
) -> Result<()> {
    let query = query.unwrap_or_default();
    let result_set = search_remote(api, SearchTrigger::Submit, query).await;
    print_results(&result_set, render_config, query);
    Ok(())
}

/// Run the suggest command (one as-you-type search, no debounce)
pub async fn run_suggest<A: NotesApi>(
    api: &A,
    query: &str,
    render_config: RenderConfig,
) -> Result<()> {
    let result_set = search_remote(api, SearchTrigger::Keystroke, query).await;
    print_results(&result_set, render_config, query);
    Ok(())
}

/// Read a saved listing from a file, or stdin for `-`
pub async fn read_listing(input: &Path) -> Result<Value> {
    let content = if input == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read listing from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read listing: {}", input.display()))?
    };
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON listing: {}", input.display()))
}

/// Run the rank command (offline resolution of a saved listing)
pub async fn run_rank(
    input: &Path,
    query: Option<&str>,
    incremental: bool,
    render_config: RenderConfig,
) -> Result<()> {
    let raw = read_listing(input).await?;
    let query = query.unwrap_or_default();
    let trigger = if incremental {
        SearchTrigger::Keystroke
    } else {
        SearchTrigger::Submit
    };
    let result_set = resolve(trigger, &raw, query);
    print_results(&result_set, render_config, query);
    Ok(())
}
