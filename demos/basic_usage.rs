//! Basic usage example
//!
//! Submits one symptom description to a running inference service and prints
//! the candidate species as text cards.
//!
//! The service location is configured via environment variables:
//! - ENVENOM_BASE_URL (default http://localhost:5000)
//!
//! Usage:
//!   ENVENOM_BASE_URL=http://localhost:5000 cargo run --example basic_usage

use envenomation_client::render::{Render, TextRenderer};
use envenomation_client::InferenceClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let client = InferenceClient::from_env()?;
    println!("Endpoint: {}", client.endpoint());

    let (results, stats) = client
        .submit_with_stats("sudden burning pain, red welts, trouble breathing")
        .await?;

    println!("{}", TextRenderer.render(&results));
    println!(
        "\n{} candidates in {} ms (request {})",
        stats.entries, stats.duration_ms, stats.request_id
    );
    Ok(())
}
