//! Line-oriented session mode.
//!
//! Reads one command per line and prints transcript entries as the session
//! appends them. Used when stdin is not a terminal, or via `sdx repl`.

use std::io::{BufRead, Write};

use anyhow::Result;
use sdx_core::service::SymptomService;
use sdx_core::session::{ChatEntry, ChatKind, DiagnosisError, SessionController};

const QUIT_COMMAND: &str = ":q";
const NOTICE_PREFIX: &str = "! ";

const HELP_TEXT: &str = "\
Commands:
  add <symptom>     add a symptom to the selection
  remove <symptom>  remove a selected symptom
  list              show selected symptoms
  symptoms          show the symptom catalog
  diagnose          request a diagnosis for the selection
  help              show this help
  :q                quit";

fn entry_prefix(kind: ChatKind) -> &'static str {
    match kind {
        ChatKind::User => "you> ",
        ChatKind::Bot => "bot> ",
        ChatKind::Error => "error> ",
    }
}

/// Prints transcript entries appended since the last call.
struct TranscriptPrinter {
    printed: usize,
}

impl TranscriptPrinter {
    fn flush<W: Write>(&mut self, output: &mut W, history: &[ChatEntry]) -> Result<()> {
        for entry in history.iter().skip(self.printed) {
            writeln!(output, "{}{}", entry_prefix(entry.kind), entry.text)?;
        }
        self.printed = history.len();
        Ok(())
    }
}

/// Runs the line-mode session until `:q` or end of input.
///
/// # Errors
/// Returns an error if reading input or writing output fails. Service
/// failures are reported in the transcript and never end the session.
pub async fn run_repl<R, W, S>(
    input: R,
    output: &mut W,
    controller: &mut SessionController<S>,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    S: SymptomService,
{
    let mut printer = TranscriptPrinter { printed: 0 };

    if let Err(err) = controller.load_catalog().await {
        writeln!(output, "{NOTICE_PREFIX}{err}")?;
    }
    printer.flush(output, controller.state().history())?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed == QUIT_COMMAND {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        let (command, arg) = trimmed
            .split_once(char::is_whitespace)
            .map_or((trimmed, ""), |(c, a)| (c, a.trim()));

        match command {
            "add" => {
                controller.select_pending_symptom(arg);
                if !controller.add_symptom() {
                    let notice = if arg.is_empty() {
                        "Usage: add <symptom>".to_string()
                    } else {
                        format!("{arg} is already selected")
                    };
                    writeln!(output, "{NOTICE_PREFIX}{notice}")?;
                }
            }
            "remove" => {
                if arg.is_empty() {
                    writeln!(output, "{NOTICE_PREFIX}Usage: remove <symptom>")?;
                } else if !controller.remove_symptom(arg) {
                    writeln!(output, "{NOTICE_PREFIX}{arg} is not selected")?;
                }
            }
            "list" => {
                let selected = controller.state().selected();
                if selected.is_empty() {
                    writeln!(output, "No symptoms selected.")?;
                } else {
                    let names: Vec<&str> = selected.iter().collect();
                    writeln!(output, "Selected: {}", names.join(", "))?;
                }
            }
            "symptoms" => {
                let catalog = controller.state().catalog();
                if catalog.is_empty() {
                    writeln!(output, "Symptom catalog is empty.")?;
                }
                for name in catalog.names() {
                    writeln!(output, "  {name}")?;
                }
            }
            "diagnose" => match controller.request_diagnosis().await {
                Ok(_) => {}
                Err(DiagnosisError::Request { message, .. }) => {
                    printer.flush(output, controller.state().history())?;
                    writeln!(output, "{NOTICE_PREFIX}{message}")?;
                }
                Err(err) => writeln!(output, "{NOTICE_PREFIX}{err}")?,
            },
            "help" => writeln!(output, "{HELP_TEXT}")?,
            other => writeln!(
                output,
                "{NOTICE_PREFIX}Unknown command: {other} (type `help`)"
            )?,
        }

        printer.flush(output, controller.state().history())?;
        output.flush()?;
    }

    writeln!(output, "Goodbye!")?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Mutex;

    use sdx_core::service::{Diagnosis, ServiceError, ServiceResult};

    use super::*;

    struct ScriptedService {
        catalog: ServiceResult<Vec<String>>,
        diagnosis: ServiceResult<Diagnosis>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedService {
        fn healthy() -> Self {
            Self {
                catalog: Ok(vec!["fever".to_string(), "cough".to_string()]),
                diagnosis: Ok(Diagnosis {
                    diagnosis: "flu".to_string(),
                    symptoms: vec![],
                }),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl SymptomService for ScriptedService {
        async fn list_symptoms(&self) -> ServiceResult<Vec<String>> {
            self.catalog.clone()
        }

        async fn diagnose(&self, symptoms: &[String]) -> ServiceResult<Diagnosis> {
            self.calls.lock().unwrap().push(symptoms.to_vec());
            self.diagnosis.clone()
        }
    }

    async fn run_script(
        service: ScriptedService,
        script: &str,
    ) -> (String, SessionController<ScriptedService>) {
        let mut controller = SessionController::new(service);
        let mut output = Vec::new();
        run_repl(Cursor::new(script.to_string()), &mut output, &mut controller)
            .await
            .unwrap();
        (String::from_utf8(output).unwrap(), controller)
    }

    fn calls(controller: &SessionController<ScriptedService>) -> Vec<Vec<String>> {
        controller.service().calls.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_full_session() {
        let (output, controller) = run_script(
            ScriptedService::healthy(),
            "add fever\nadd cough\ndiagnose\n:q\n",
        )
        .await;

        assert!(output.starts_with("bot> Welcome!"));
        assert!(output.contains("you> Added symptom: fever\n"));
        assert!(output.contains("you> Added symptom: cough\n"));
        assert!(output.contains("bot> Based on your symptoms, the possible diagnosis is: flu\n"));
        assert!(output.ends_with("Goodbye!\n"));
        assert_eq!(calls(&controller), vec![vec!["fever", "cough"]]);
    }

    #[tokio::test]
    async fn test_diagnose_without_symptoms() {
        let (output, controller) = run_script(ScriptedService::healthy(), "diagnose\n").await;
        assert!(output.contains("! Please add at least one symptom before getting a diagnosis."));
        assert!(calls(&controller).is_empty());
        // EOF also ends the session
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn test_duplicate_and_missing_notices() {
        let (output, _) = run_script(
            ScriptedService::healthy(),
            "add fever\nadd fever\nremove cough\nremove fever\nlist\n",
        )
        .await;

        assert!(output.contains("! fever is already selected"));
        assert!(output.contains("! cough is not selected"));
        assert!(output.contains("you> Removed symptom: fever"));
        assert!(output.contains("No symptoms selected."));
    }

    #[tokio::test]
    async fn test_catalog_failure_then_free_text() {
        let service = ScriptedService {
            catalog: Err(ServiceError::transport("connection refused")),
            ..ScriptedService::healthy()
        };
        let (output, _) = run_script(service, "symptoms\nadd headache\nlist\n").await;

        assert!(output.starts_with("! Failed to load available symptoms: connection refused"));
        assert!(output.contains("Symptom catalog is empty."));
        assert!(output.contains("Selected: headache"));
    }

    #[tokio::test]
    async fn test_diagnosis_failure_prints_entry_and_reason() {
        let service = ScriptedService {
            diagnosis: Err(ServiceError::http_status(
                500,
                r#"{"error":"model unavailable"}"#,
            )),
            ..ScriptedService::healthy()
        };
        let (output, _) = run_script(service, "add fever\ndiagnose\n").await;

        assert!(output.contains("error> Error getting diagnosis. Please try again.\n"));
        assert!(output.contains("! model unavailable\n"));
    }

    #[tokio::test]
    async fn test_unknown_command_and_help() {
        let (output, _) = run_script(ScriptedService::healthy(), "frobnicate\nhelp\n").await;
        assert!(output.contains("! Unknown command: frobnicate"));
        assert!(output.contains("add <symptom>"));
    }
}
