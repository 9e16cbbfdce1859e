//! `sdx symptoms`: print the catalog.

use anyhow::Result;
use sdx_core::service::ApiClient;
use sdx_core::session::SessionState;

pub async fn run(client: &ApiClient) -> Result<()> {
    let mut session = SessionState::new();
    let catalog = session.apply_catalog(client.fetch_symptoms().await)?;

    if catalog.is_empty() {
        eprintln!("The service returned no symptoms.");
    }
    for name in catalog.names() {
        println!("{name}");
    }
    Ok(())
}
