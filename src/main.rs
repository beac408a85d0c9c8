use std::collections::HashMap;

use chrono::Local;
use clap::{Parser, Subcommand};

use lookout::client::AgentClient;
use lookout::config::CONFIG;
use lookout::models::{DEFAULT_TOP_K, SearchRequest, metrics};

#[derive(Parser)]
#[command(name = "lookout", version, about = "Market-intelligence search front end")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web front end
    Serve {
        /// Port to listen on, defaults to LOOKOUT_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// One-shot search against the agent
    Search {
        query: String,
        /// How many sources to request
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: u32,
    },
    /// Check the agent's health
    Status,
    /// Fetch the agent's canned demo run
    Demo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    // Bridge log crate -> tracing (so log::info! etc. work)
    // tracing_log::LogTracer::init()?;

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { port } => lookout::api::serve(port.unwrap_or(CONFIG.listen_port)).await,
        Command::Search { query, top_k } => run_search(&query, top_k).await,
        Command::Status => run_status().await,
        Command::Demo => run_demo().await,
    }
}

async fn run_search(query: &str, top_k: u32) -> anyhow::Result<()> {
    let query = query.trim();
    if query.is_empty() {
        anyhow::bail!("query must not be empty");
    }

    let client = AgentClient::new();
    println!("🔍 Query: {}", query);
    let request = SearchRequest::new(query).with_top_k(top_k);
    let response = client.search(&request).await?;

    println!(
        "⏱  Completed in {:.2}s, {} result(s)",
        response.execution_time, response.total_results
    );
    println!();

    if !response.results.is_empty() {
        println!("🔗 Top Sources:");
        for (rank, result) in response.results.iter().enumerate() {
            println!(
                "{:>3}. {} {} ({:.3})",
                rank + 1,
                result.relevance().marker(),
                result.title,
                result.cohere_score
            );
            println!(
                "     Source: {} ({} days ago)",
                result.source, result.days_ago
            );
            println!("     URL: {}", result.url);
            println!("     Published: {}", result.published_at);
            let snippet = snippet_of(&result.content, 200);
            if !snippet.is_empty() {
                println!("     {}", snippet);
            }
            println!();
        }
    }

    if !response.ai_analysis.trim().is_empty() {
        println!("🤖 Analysis:");
        println!("{}", response.ai_analysis.trim());
        println!();
    }

    print_metrics(&response.performance_metrics);
    Ok(())
}

async fn run_status() -> anyhow::Result<()> {
    let client = AgentClient::new();
    let status = client.status().await?;
    let stamp = Local::now().format("%H:%M:%S");
    if status.is_operational() {
        println!("✅ {} (as of {})", status.status, stamp);
    } else {
        println!("⚠️  {} (as of {})", status.status, stamp);
    }
    println!("   Agent ready: {}", status.agent_ready);
    println!("   Vector store connected: {}", status.vector_store_connected);
    if let Some(total) = status.total_documents {
        println!("   Documents indexed: {}", total);
    }
    print_metrics(&status.performance_metrics);
    Ok(())
}

async fn run_demo() -> anyhow::Result<()> {
    let client = AgentClient::new();
    let demo = client.demo().await?;
    println!("{}", serde_json::to_string_pretty(&demo)?);
    Ok(())
}

/// Whitespace-collapsed preview of a result's content, cut at a char
/// boundary so multi-byte text never splits.
fn snippet_of(content: &str, max_chars: usize) -> String {
    let cleaned = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.chars().count() <= max_chars {
        return cleaned;
    }
    let cut: String = cleaned.chars().take(max_chars).collect();
    format!("{}...", cut)
}

const KNOWN_METRICS: [&str; 5] = [
    metrics::TOTAL_RESULTS_FOUND,
    metrics::AVERAGE_RELEVANCE_SCORE,
    metrics::UNIQUE_SOURCES,
    metrics::DATA_PIPELINE,
    metrics::SEARCH_METHOD,
];

fn print_metrics(map: &HashMap<String, serde_json::Value>) {
    if map.is_empty() {
        return;
    }
    println!("📊 Metrics:");
    for key in KNOWN_METRICS {
        if let Some(value) = map.get(key) {
            println!("   {}: {}", key, metric_str(value));
        }
    }
    let mut rest: Vec<&String> = map
        .keys()
        .filter(|k| !KNOWN_METRICS.contains(&k.as_str()))
        .collect();
    rest.sort();
    for key in rest {
        if let Some(value) = map.get(key) {
            println!("   {}: {}", key, metric_str(value));
        }
    }
}

/// Strings print bare, everything else as JSON.
fn metric_str(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
