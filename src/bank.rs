use crate::question::Question;
use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

static BANK_DIR: Dir = include_dir!("src/banks");

#[derive(Debug, Error)]
pub enum BankError {
    #[error("no built-in question bank named '{0}'")]
    UnknownBank(String),
    #[error("could not read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question bank '{0}' contains no questions")]
    Empty(String),
}

/// An ordered set of interview questions, loaded from an embedded sample
/// bank or a JSON file supplied by the interviewer.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionBank {
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    pub questions: Vec<Question>,
}

impl QuestionBank {
    /// Load one of the sample banks compiled into the binary.
    pub fn builtin(name: &str) -> Result<Self, BankError> {
        let file = BANK_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| BankError::UnknownBank(name.to_string()))?;

        Self::from_slice(name, file.contents())
    }

    /// Load a bank from a JSON file on disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BankError> {
        let label = path.as_ref().display().to_string();
        let bytes = std::fs::read(path)?;
        Self::from_slice(&label, &bytes)
    }

    fn from_slice(label: &str, bytes: &[u8]) -> Result<Self, BankError> {
        let mut bank: QuestionBank = serde_json::from_slice(bytes)?;
        bank.normalize();
        if bank.questions.is_empty() {
            return Err(BankError::Empty(label.to_string()));
        }
        Ok(bank)
    }

    /// Names of the banks compiled into the binary.
    pub fn builtin_names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = BANK_DIR
            .files()
            .filter_map(|f| f.path().file_stem().and_then(|s| s.to_str()))
            .collect();
        names.sort_unstable();
        names
    }

    // Imported sets are often hand-edited; ids may be missing or blank.
    // Every question must carry a stable id before a session can start.
    fn normalize(&mut self) {
        for (index, question) in self.questions.iter_mut().enumerate() {
            if question.id.trim().is_empty() {
                question.id = format!("q-{index}");
            }
        }
    }

    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }
}
