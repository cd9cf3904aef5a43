//! Interactive confirmation on the terminal.

use dialoguer::Input;

use mlws_orchestrator::{Confirmation, OrchestratorError};

/// Reads a free-text answer so that only a typed `YES` approves.
#[derive(Debug, Default)]
pub struct TerminalConfirmation;

impl Confirmation for TerminalConfirmation {
    fn answer(&self, prompt: &str) -> mlws_orchestrator::Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| OrchestratorError::Confirmation(e.to_string()))
    }
}
