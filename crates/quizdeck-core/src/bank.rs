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

use std::collections::HashMap;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;

use crate::error::Fallible;
use crate::types::question::Question;

/// A problem with one entry of the question bank.
#[derive(Debug, PartialEq)]
pub struct BankError {
    pub message: String,
    /// Zero-based position in the bank, if the problem is with an entry.
    pub index: Option<usize>,
}

impl BankError {
    fn new(message: impl Into<String>) -> Self {
        BankError {
            message: message.into(),
            index: None,
        }
    }

    fn at(index: usize, message: impl Into<String>) -> Self {
        BankError {
            message: message.into(),
            index: Some(index),
        }
    }
}

impl Display for BankError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.index {
            Some(index) => write!(f, "question #{}: {}", index + 1, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl Error for BankError {}

/// The validated, canonical question list.
///
/// Questions are identified by their prompt text. When two entries share a
/// prompt, lookups resolve to the first of them.
#[derive(Clone, Debug)]
pub struct QuestionBank {
    questions: Vec<Question>,
    by_prompt: HashMap<String, usize>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::new("the question bank is empty"));
        }
        let mut by_prompt = HashMap::new();
        for (index, question) in questions.iter().enumerate() {
            validate(index, question)?;
            if by_prompt.contains_key(question.prompt()) {
                log::warn!(
                    "question #{} repeats the prompt {:?}; both entries share one identity",
                    index + 1,
                    question.prompt()
                );
            } else {
                by_prompt.insert(question.prompt().to_string(), index);
            }
        }
        Ok(Self {
            questions,
            by_prompt,
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Find the canonical question with this prompt.
    pub fn canonical(&self, prompt: &str) -> Option<&Question> {
        self.by_prompt.get(prompt).map(|&i| &self.questions[i])
    }
}

fn validate(index: usize, question: &Question) -> Result<(), BankError> {
    if question.prompt().trim().is_empty() {
        return Err(BankError::at(index, "the prompt is empty"));
    }
    match question {
        Question::MultipleChoice {
            options, correct, ..
        } => {
            check_options(index, options)?;
            check_index(index, options, *correct)?;
        }
        Question::MultiSelect {
            options, correct, ..
        } => {
            check_options(index, options)?;
            if correct.is_empty() {
                return Err(BankError::at(index, "there are no correct options"));
            }
            let mut seen = HashSet::new();
            for &i in correct {
                check_index(index, options, i)?;
                if !seen.insert(i) {
                    return Err(BankError::at(
                        index,
                        format!("correct option {i} is listed twice"),
                    ));
                }
            }
        }
        Question::FillIn { acceptable, .. } => {
            if acceptable.is_empty() {
                return Err(BankError::at(index, "there are no acceptable answers"));
            }
        }
    }
    Ok(())
}

fn check_options(index: usize, options: &[String]) -> Result<(), BankError> {
    if options.is_empty() {
        return Err(BankError::at(index, "there are no options"));
    }
    Ok(())
}

fn check_index(index: usize, options: &[String], i: usize) -> Result<(), BankError> {
    if i >= options.len() {
        return Err(BankError::at(
            index,
            format!(
                "correct option {i} is out of range (there are {} options)",
                options.len()
            ),
        ));
    }
    Ok(())
}

/// A bank file with optional metadata.
#[derive(Debug, Deserialize)]
struct BankDocument {
    title: Option<String>,
    questions: Vec<Question>,
}

/// A parsed question bank file.
#[derive(Debug)]
pub struct BankFile {
    /// The title given in the file, if any.
    pub title: Option<String>,
    pub bank: QuestionBank,
}

/// Parse a question bank file.
///
/// Files ending in `.toml` hold a `title` and a `[[questions]]` array. All
/// other files are JSON: either a bare array of questions, or an object with
/// `title` and `questions` keys.
pub fn parse_bank(source_path: &str, text: &str) -> Fallible<BankFile> {
    let document: BankDocument = if source_path.ends_with(".toml") {
        toml::from_str(text)?
    } else if text.trim_start().starts_with('[') {
        BankDocument {
            title: None,
            questions: serde_json::from_str(text)?,
        }
    } else {
        serde_json::from_str(text)?
    };
    let bank = QuestionBank::new(document.questions)?;
    log::debug!("Loaded {} questions from {source_path}", bank.len());
    Ok(BankFile {
        title: document.title,
        bank,
    })
}
