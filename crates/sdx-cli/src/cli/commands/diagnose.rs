//! `sdx diagnose`: one-shot diagnosis for the given symptoms.

use anyhow::Result;
use sdx_core::service::ApiClient;
use sdx_core::session::SessionController;

pub async fn run(client: ApiClient, symptoms: &[String], json: bool) -> Result<()> {
    let mut controller = SessionController::new(client);
    // Arguments are trimmed like REPL input; the session stores text as given
    for symptom in symptoms {
        controller.select_pending_symptom(symptom.trim());
        controller.add_symptom();
    }

    let diagnosis = controller.request_diagnosis().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&diagnosis)?);
    } else {
        println!("{}", diagnosis.diagnosis);
    }
    Ok(())
}
