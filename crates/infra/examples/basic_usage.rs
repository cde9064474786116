//! Example: Listing nodes and registries of a running server
//!
//! # Setup
//!
//! 1. Point the client at a server: ```bash export
//!    ALACRITY_BASE_DOMAIN=https://alacran.server.demo.alacrity.com ```
//!
//! 2. Provide the dashboard password: ```bash export
//!    ALACRITY_PASSWORD=alacran42 ```
//!
//! 3. Run this example: ```bash cargo run --example basic_usage ```
//!
//! Both variables may also live in a `.env` file.

use std::sync::Arc;

use alacrity_infra::api::{AlacrityApi, SimpleTokenProvider};
use alacrity_infra::config;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::load()?;
    let password = std::env::var("ALACRITY_PASSWORD").unwrap_or_else(|_| "alacran42".into());

    // Starts without a token; the first rejection triggers a login.
    let tokens = Arc::new(SimpleTokenProvider::with_password(password));
    let api = AlacrityApi::new(&config, tokens)?;

    println!("=============================================== getAllNodes:");
    let nodes = api.get_all_nodes().await?;
    for node in &nodes.nodes {
        println!("{} {} ({}) leader={}", node.node_id, node.hostname, node.state, node.is_leader);
    }

    println!("=============================================== getDockerRegistries:");
    let registries = api.get_docker_registries().await?;
    println!("{registries:#?}");

    println!("=============================================== executeGenericApiCommand:");
    let raw = api.execute_generic_api_command("GET", "/user/registries", json!({})).await?;
    println!("{}", serde_json::to_string_pretty(&raw)?);

    api.destroy();
    Ok(())
}
