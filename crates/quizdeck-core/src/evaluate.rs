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

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::bank::QuestionBank;
use crate::deck::WorkingQuestion;
use crate::error::Rejection;
use crate::types::answer::Answer;
use crate::types::question::Question;

/// Joins the correct options of a multi-select question when shown.
pub const DISPLAY_SEPARATOR: &str = ", ";

/// The verdict on a submitted answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub correct: bool,
    /// The correct answer, as shown to the user.
    pub canonical_display: String,
}

/// Lowercase and drop all whitespace.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Check that `answer` can be evaluated against `question`.
pub fn check_answer(question: &WorkingQuestion, answer: &Answer) -> Result<(), Rejection> {
    if !answer.fits(question.kind()) {
        return Err(Rejection::WrongAnswerKind);
    }
    if answer.is_empty() {
        return Err(Rejection::EmptyAnswer);
    }
    if let Some(i) = answer.max_index() {
        if i >= question.options().len() {
            return Err(Rejection::OptionOutOfRange(i));
        }
    }
    Ok(())
}

/// Evaluate an answer against a working question.
///
/// The fill-in display answer comes from the canonical question in `bank`.
pub fn evaluate(
    bank: &QuestionBank,
    question: &WorkingQuestion,
    answer: &Answer,
) -> Result<Evaluation, Rejection> {
    check_answer(question, answer)?;
    let evaluation = match (question.question(), answer) {
        (
            Question::MultipleChoice {
                options, correct, ..
            },
            Answer::Choice(selected),
        ) => Evaluation {
            correct: selected == correct,
            canonical_display: options[*correct].clone(),
        },
        (
            Question::MultiSelect {
                options, correct, ..
            },
            Answer::Choices(selected),
        ) => {
            let expected: BTreeSet<usize> = correct.iter().copied().collect();
            Evaluation {
                correct: *selected == expected,
                canonical_display: correct
                    .iter()
                    .map(|&i| options[i].as_str())
                    .collect::<Vec<_>>()
                    .join(DISPLAY_SEPARATOR),
            }
        }
        (
            Question::FillIn {
                prompt,
                acceptable,
                display,
            },
            Answer::Text(text),
        ) => {
            let submitted = normalize(text);
            let canonical_display = match bank.canonical(prompt) {
                Some(Question::FillIn { display, .. }) => display.clone(),
                _ => display.clone(),
            };
            Evaluation {
                correct: acceptable.iter().any(|a| normalize(a) == submitted),
                canonical_display,
            }
        }
        _ => return Err(Rejection::WrongAnswerKind),
    };
    Ok(evaluation)
}
