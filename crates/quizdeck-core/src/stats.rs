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

use std::collections::HashSet;

use serde::Serialize;

use crate::types::question::Question;

/// Running totals for a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_answered: u64,
    pub correct_answers: u64,
}

impl Stats {
    pub fn record(&mut self, correct: bool) {
        self.total_answered += 1;
        if correct {
            self.correct_answers += 1;
        }
    }

    /// Percentage of correct answers, rounded half up. Zero before the first
    /// answer.
    pub fn accuracy(&self) -> u32 {
        if self.total_answered == 0 {
            return 0;
        }
        let (k, n) = (self.correct_answers, self.total_answered);
        ((k * 200 + n) / (2 * n)) as u32
    }
}

/// Canonical questions answered wrong at least once, in the order they were
/// first missed, without repeats.
#[derive(Clone, Debug, Default)]
pub struct MissedSet {
    questions: Vec<Question>,
    prompts: HashSet<String>,
}

impl MissedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a question unless one with the same prompt is already present.
    /// Returns whether it was added.
    pub fn insert(&mut self, question: &Question) -> bool {
        if self.prompts.contains(question.prompt()) {
            return false;
        }
        self.prompts.insert(question.prompt().to_string());
        self.questions.push(question.clone());
        true
    }

    pub fn contains(&self, prompt: &str) -> bool {
        self.prompts.contains(prompt)
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
}
