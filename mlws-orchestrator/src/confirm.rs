//! Confirmation before destructive, group-wide actions.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::{OrchestratorError, Result};

/// The exact answer that approves resource-group deletion.
pub const CONFIRMATION_TOKEN: &str = "YES";

/// Source of answers for confirmation prompts.
pub trait Confirmation {
    /// Show `prompt` and return the raw answer.
    fn answer(&self, prompt: &str) -> Result<String>;

    /// Only an exact match of [`CONFIRMATION_TOKEN`] approves; surrounding
    /// whitespace is ignored, case is not.
    fn confirm(&self, prompt: &str) -> Result<bool> {
        Ok(self.answer(prompt)?.trim() == CONFIRMATION_TOKEN)
    }
}

/// Pre-recorded answers, for tests and non-interactive runs.
#[derive(Debug, Default)]
pub struct ScriptedConfirmation {
    answers: RefCell<VecDeque<String>>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedConfirmation {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    /// Prompts shown so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl Confirmation for ScriptedConfirmation {
    fn answer(&self, prompt: &str) -> Result<String> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| OrchestratorError::Confirmation("no answer available".to_string()))
    }
}
