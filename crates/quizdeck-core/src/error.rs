// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::bank::BankError;

#[derive(Debug, PartialEq)]
pub struct ErrorReport {
    message: String,
}

impl ErrorReport {
    pub fn new(msg: impl Into<String>) -> Self {
        ErrorReport {
            message: msg.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for ErrorReport {
    fn from(value: std::io::Error) -> Self {
        ErrorReport {
            message: format!("I/O error: {value:#?}"),
        }
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(value: serde_json::Error) -> Self {
        ErrorReport {
            message: format!("JSON error: {value}"),
        }
    }
}

impl From<toml::de::Error> for ErrorReport {
    fn from(value: toml::de::Error) -> Self {
        ErrorReport {
            message: format!("TOML error: {value}"),
        }
    }
}

impl From<BankError> for ErrorReport {
    fn from(value: BankError) -> Self {
        ErrorReport {
            message: format!("Malformed question bank: {value}"),
        }
    }
}

impl From<SessionError> for ErrorReport {
    fn from(value: SessionError) -> Self {
        ErrorReport {
            message: value.to_string(),
        }
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl Error for ErrorReport {
    fn description(&self) -> &str {
        &self.message
    }
}

pub type Fallible<T> = Result<T, ErrorReport>;

pub fn fail<T>(msg: impl Into<String>) -> Fallible<T> {
    Err(ErrorReport {
        message: msg.into(),
    })
}

/// Why a session command was refused. A refused command never changes the
/// session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The current question already has a submitted answer.
    AlreadyAnswered,
    /// Advancing requires an answer to the current question.
    NotAnswered,
    /// Nothing was selected, or the text was blank.
    EmptyAnswer,
    /// The answer does not fit the current question's type.
    WrongAnswerKind,
    /// The option index does not exist on the current question.
    OptionOutOfRange(usize),
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::AlreadyAnswered => write!(f, "the question was already answered"),
            Rejection::NotAnswered => write!(f, "the question has not been answered yet"),
            Rejection::EmptyAnswer => write!(f, "the answer is empty"),
            Rejection::WrongAnswerKind => {
                write!(f, "the answer does not match the question type")
            }
            Rejection::OptionOutOfRange(index) => write!(f, "option {index} does not exist"),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum SessionError {
    InvalidTransition(Rejection),
    EmptyExportSet,
    ExportFailed(String),
    MalformedQuestionBank(BankError),
}

impl SessionError {
    /// Whether this error is a refused command, as opposed to a failure.
    pub fn is_rejection(&self) -> bool {
        matches!(self, SessionError::InvalidTransition(_))
    }
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::InvalidTransition(rejection) => {
                write!(f, "Invalid transition: {rejection}.")
            }
            SessionError::EmptyExportSet => write!(f, "There are no missed questions to export."),
            SessionError::ExportFailed(message) => write!(f, "Export failed: {message}"),
            SessionError::MalformedQuestionBank(e) => write!(f, "Malformed question bank: {e}"),
        }
    }
}

impl Error for SessionError {}

impl From<Rejection> for SessionError {
    fn from(value: Rejection) -> Self {
        SessionError::InvalidTransition(value)
    }
}

impl From<BankError> for SessionError {
    fn from(value: BankError) -> Self {
        SessionError::MalformedQuestionBank(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ErrorReport::new("directory does not exist.");
        assert_eq!(err.to_string(), "error: directory does not exist.");
    }

    #[test]
    fn test_rejection_display() {
        let err = SessionError::from(Rejection::OptionOutOfRange(7));
        assert_eq!(err.to_string(), "Invalid transition: option 7 does not exist.");
        assert!(err.is_rejection());
        assert!(!SessionError::EmptyExportSet.is_rejection());
    }

    #[test]
    fn test_into_report() {
        let report: ErrorReport = SessionError::EmptyExportSet.into();
        assert_eq!(
            report.message(),
            "There are no missed questions to export."
        );
    }
}
