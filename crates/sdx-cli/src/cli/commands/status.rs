//! `sdx status`: probe the service.

use anyhow::{Context, Result};
use sdx_core::service::ApiClient;

pub async fn run(client: &ApiClient) -> Result<()> {
    let status = client
        .status()
        .await
        .with_context(|| format!("Symptom service at {} is not reachable", client.base_url()))?;

    println!("{}: {}", status.status, client.base_url());
    if !status.message.is_empty() {
        println!("{}", status.message);
    }
    Ok(())
}
