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

use serde::Serialize;

use crate::bank::QuestionBank;
use crate::rng::TinyRng;
use crate::rng::shuffle;
use crate::types::question::Question;
use crate::types::question::QuestionKind;

/// A session's copy of a canonical question, with its options reordered and
/// the correct indices pointing into the new order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WorkingQuestion {
    question: Question,
}

impl WorkingQuestion {
    /// A working copy that keeps the canonical option order.
    pub fn unshuffled(question: &Question) -> Self {
        Self {
            question: question.clone(),
        }
    }

    /// A working copy with the options permuted. Fill-in questions are
    /// copied unchanged.
    pub fn shuffled(question: &Question, rng: &mut TinyRng) -> Self {
        let question = match question {
            Question::MultipleChoice {
                prompt,
                options,
                correct,
            } => {
                let (options, positions) = permute(options, rng);
                Question::MultipleChoice {
                    prompt: prompt.clone(),
                    options,
                    correct: positions[*correct],
                }
            }
            Question::MultiSelect {
                prompt,
                options,
                correct,
            } => {
                let (options, positions) = permute(options, rng);
                Question::MultiSelect {
                    prompt: prompt.clone(),
                    options,
                    correct: correct.iter().map(|&i| positions[i]).collect(),
                }
            }
            Question::FillIn { .. } => question.clone(),
        };
        Self { question }
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn prompt(&self) -> &str {
        self.question.prompt()
    }

    pub fn kind(&self) -> QuestionKind {
        self.question.kind()
    }

    pub fn options(&self) -> &[String] {
        self.question.options()
    }

    pub fn correct_indices(&self) -> Vec<usize> {
        self.question.correct_indices()
    }
}

/// Shuffle the options, returning the new option list together with the
/// new position of each original option.
fn permute(options: &[String], rng: &mut TinyRng) -> (Vec<String>, Vec<usize>) {
    let order: Vec<usize> = shuffle((0..options.len()).collect(), rng);
    let mut positions = vec![0; options.len()];
    for (new, &old) in order.iter().enumerate() {
        positions[old] = new;
    }
    let options = order.iter().map(|&old| options[old].clone()).collect();
    (options, positions)
}

/// Deal a freshly shuffled deck from the bank.
pub fn shuffle_deck(bank: &QuestionBank, rng: &mut TinyRng) -> Vec<WorkingQuestion> {
    let order: Vec<&Question> = shuffle(bank.questions().iter().collect(), rng);
    order
        .into_iter()
        .map(|question| WorkingQuestion::shuffled(question, rng))
        .collect()
}

/// How decks are dealt.
#[derive(Clone, Debug)]
pub enum DeckOrder {
    /// Shuffle questions and options on every deal.
    Shuffled(TinyRng),
    /// Deal the bank as written.
    Canonical,
}

impl DeckOrder {
    pub fn deal(&mut self, bank: &QuestionBank) -> Vec<WorkingQuestion> {
        match self {
            DeckOrder::Shuffled(rng) => shuffle_deck(bank, rng),
            DeckOrder::Canonical => bank
                .questions()
                .iter()
                .map(WorkingQuestion::unshuffled)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::tests::mc;
    use crate::bank::tests::ms;
    use crate::bank::tests::sample_bank;

    fn correct_texts(question: &Question) -> Vec<String> {
        question
            .correct_indices()
            .into_iter()
            .map(|i| question.options()[i].clone())
            .collect()
    }

    fn sorted<T: Ord + Clone>(v: &[T]) -> Vec<T> {
        let mut v = v.to_vec();
        v.sort();
        v
    }

    #[test]
    fn test_deck_is_a_permutation_of_the_bank() {
        let bank = sample_bank();
        for seed in 0..50 {
            let mut rng = TinyRng::from_seed(seed);
            let deck = shuffle_deck(&bank, &mut rng);
            let before: Vec<&str> = bank.questions().iter().map(|q| q.prompt()).collect();
            let after: Vec<&str> = deck.iter().map(|q| q.prompt()).collect();
            assert_eq!(sorted(&before), sorted(&after));
        }
    }

    #[test]
    fn test_options_are_preserved_and_remapped() {
        let bank = QuestionBank::new(vec![
            mc("mc", &["w", "x", "y", "z"], 2),
            ms("ms", &["a", "b", "c", "d", "e"], &[4, 0, 2]),
        ])
        .unwrap();
        for seed in 0..100 {
            let mut rng = TinyRng::from_seed(seed);
            for working in shuffle_deck(&bank, &mut rng) {
                let canonical = bank.canonical(working.prompt()).unwrap();
                assert_eq!(sorted(canonical.options()), sorted(working.options()));
                // Same texts, same order of the correct answers.
                assert_eq!(correct_texts(canonical), correct_texts(working.question()));
            }
        }
    }

    #[test]
    fn test_duplicate_option_texts_still_remap() {
        let question = mc("dup", &["same", "same", "other"], 1);
        for seed in 0..30 {
            let mut rng = TinyRng::from_seed(seed);
            let working = WorkingQuestion::shuffled(&question, &mut rng);
            assert_eq!(correct_texts(working.question()), vec!["same".to_string()]);
        }
    }

    #[test]
    fn test_fill_in_is_unchanged() {
        let bank = sample_bank();
        let fill = &bank.questions()[2];
        let mut rng = TinyRng::from_seed(3);
        assert_eq!(WorkingQuestion::shuffled(fill, &mut rng).question(), fill);
    }

    #[test]
    fn test_options_get_reordered() {
        let question = mc("q", &["1", "2", "3", "4", "5", "6"], 0);
        let mut rng = TinyRng::from_seed(11);
        let moved = (0..20)
            .map(|_| WorkingQuestion::shuffled(&question, &mut rng))
            .any(|w| w.options() != question.options());
        assert!(moved);
    }

    #[test]
    fn test_canonical_order() {
        let bank = sample_bank();
        let deck = DeckOrder::Canonical.deal(&bank);
        let questions: Vec<&Question> = deck.iter().map(|w| w.question()).collect();
        assert_eq!(questions, bank.questions().iter().collect::<Vec<_>>());
    }
}
