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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

/// A canonical question, as it appears in the question bank.
///
/// The serialized form is the bank's record format, and it is also what gets
/// written when missed questions are exported.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Question {
    MultipleChoice {
        #[serde(rename = "question")]
        prompt: String,
        options: Vec<String>,
        #[serde(rename = "correctAnswer")]
        correct: usize,
    },
    MultiSelect {
        #[serde(rename = "question")]
        prompt: String,
        options: Vec<String>,
        /// In the order the answers are shown on failure.
        #[serde(rename = "correctAnswer")]
        correct: Vec<usize>,
    },
    FillIn {
        #[serde(rename = "question")]
        prompt: String,
        #[serde(rename = "acceptableAnswers")]
        acceptable: Vec<String>,
        #[serde(rename = "correctAnswer")]
        display: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice,
    MultiSelect,
    FillIn,
}

impl QuestionKind {
    /// Human-readable badge text.
    pub fn label(self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "Multiple choice",
            QuestionKind::MultiSelect => "Multi-select",
            QuestionKind::FillIn => "Fill in the blank",
        }
    }
}

impl Display for QuestionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionKind::MultipleChoice => write!(f, "multiple-choice"),
            QuestionKind::MultiSelect => write!(f, "multi-select"),
            QuestionKind::FillIn => write!(f, "fill-in"),
        }
    }
}

impl Question {
    /// The prompt text. This is also the question's identity.
    pub fn prompt(&self) -> &str {
        match self {
            Question::MultipleChoice { prompt, .. } => prompt,
            Question::MultiSelect { prompt, .. } => prompt,
            Question::FillIn { prompt, .. } => prompt,
        }
    }

    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            Question::MultiSelect { .. } => QuestionKind::MultiSelect,
            Question::FillIn { .. } => QuestionKind::FillIn,
        }
    }

    /// The option texts, empty for fill-in questions.
    pub fn options(&self) -> &[String] {
        match self {
            Question::MultipleChoice { options, .. } => options,
            Question::MultiSelect { options, .. } => options,
            Question::FillIn { .. } => &[],
        }
    }

    /// The correct option indices, empty for fill-in questions.
    pub fn correct_indices(&self) -> Vec<usize> {
        match self {
            Question::MultipleChoice { correct, .. } => vec![*correct],
            Question::MultiSelect { correct, .. } => correct.clone(),
            Question::FillIn { .. } => Vec::new(),
        }
    }
}
