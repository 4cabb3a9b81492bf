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

use quizdeck_core::Fallible;
use quizdeck_core::QuestionBank;
use quizdeck_core::QuestionKind;

use crate::bank::load_bank;

pub fn check_bank(path: Option<String>) -> Fallible<()> {
    let loaded = load_bank(path)?;
    println!("{}", summarize(&loaded.title, &loaded.bank));
    Ok(())
}

fn summarize(title: &str, bank: &QuestionBank) -> String {
    let count = |kind: QuestionKind| {
        bank.questions()
            .iter()
            .filter(|q| q.kind() == kind)
            .count()
    };
    format!(
        "{title}: {} questions ({} multiple-choice, {} multi-select, {} fill-in).",
        bank.len(),
        count(QuestionKind::MultipleChoice),
        count(QuestionKind::MultiSelect),
        count(QuestionKind::FillIn),
    )
}
