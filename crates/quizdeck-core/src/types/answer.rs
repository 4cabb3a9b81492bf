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

use crate::types::question::QuestionKind;

/// A submitted answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Answer {
    /// The selected option of a multiple-choice question.
    Choice(usize),
    /// The selected options of a multi-select question.
    Choices(BTreeSet<usize>),
    /// The text typed into a fill-in question.
    Text(String),
}

impl Answer {
    /// Build a text answer, trimming surrounding whitespace.
    pub fn text(s: impl AsRef<str>) -> Self {
        Answer::Text(s.as_ref().trim().to_string())
    }

    pub fn choices(indices: impl IntoIterator<Item = usize>) -> Self {
        Answer::Choices(indices.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Choice(_) => false,
            Answer::Choices(set) => set.is_empty(),
            Answer::Text(s) => s.trim().is_empty(),
        }
    }

    /// Whether this kind of answer can be given to this kind of question.
    pub fn fits(&self, kind: QuestionKind) -> bool {
        matches!(
            (self, kind),
            (Answer::Choice(_), QuestionKind::MultipleChoice)
                | (Answer::Choices(_), QuestionKind::MultiSelect)
                | (Answer::Text(_), QuestionKind::FillIn)
        )
    }

    /// The largest option index referenced, if any.
    pub fn max_index(&self) -> Option<usize> {
        match self {
            Answer::Choice(i) => Some(*i),
            Answer::Choices(set) => set.last().copied(),
            Answer::Text(_) => None,
        }
    }
}
