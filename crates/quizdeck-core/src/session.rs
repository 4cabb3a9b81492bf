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

//! The quiz session state machine.
//!
//! Each question starts out awaiting input. Submitting an answer locks it and
//! records the result; advancing moves to the next question. Advancing past
//! the last question deals a freshly shuffled deck and starts over, keeping
//! the running totals and the missed set.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::bank::QuestionBank;
use crate::deck::DeckOrder;
use crate::deck::WorkingQuestion;
use crate::error::Rejection;
use crate::error::SessionError;
use crate::evaluate::Evaluation;
use crate::evaluate::evaluate;
use crate::export::ExportArtifact;
use crate::export::Exporter;
use crate::export::build_artifact;
use crate::stats::MissedSet;
use crate::stats::Stats;
use crate::types::answer::Answer;
use crate::types::date::Date;
use crate::types::question::Question;
use crate::types::question::QuestionKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingInput,
    Answered {
        answer: Answer,
        evaluation: Evaluation,
    },
}

/// What an advance did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next question of the deck.
    Next,
    /// Went past the last question and dealt a new deck.
    Wrapped,
}

pub struct Session {
    bank: QuestionBank,
    title: String,
    order: DeckOrder,
    deck: Vec<WorkingQuestion>,
    cursor: usize,
    /// Number of decks dealt since the session started.
    round: usize,
    phase: Phase,
    /// The answer being put together for the current question.
    buffer: Option<Answer>,
    stats: Stats,
    missed: MissedSet,
}

impl Session {
    pub fn new(bank: QuestionBank, title: impl Into<String>, order: DeckOrder) -> Self {
        let mut order = order;
        let deck = order.deal(&bank);
        let title = title.into();
        log::info!("Starting quiz {title:?} with {} questions", deck.len());
        Self {
            bank,
            title,
            order,
            deck,
            cursor: 0,
            round: 1,
            phase: Phase::AwaitingInput,
            buffer: None,
            stats: Stats::default(),
            missed: MissedSet::new(),
        }
    }

    /// Validate the questions and start a session over them.
    pub fn start(
        questions: Vec<Question>,
        title: impl Into<String>,
        order: DeckOrder,
    ) -> Result<Self, SessionError> {
        let bank = QuestionBank::new(questions)?;
        Ok(Self::new(bank, title, order))
    }

    // Queries.

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn current(&self) -> &WorkingQuestion {
        &self.deck[self.cursor]
    }

    pub fn deck(&self) -> &[WorkingQuestion] {
        &self.deck
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_answered(&self) -> bool {
        matches!(self.phase, Phase::Answered { .. })
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn accuracy(&self) -> u32 {
        self.stats.accuracy()
    }

    pub fn missed(&self) -> &MissedSet {
        &self.missed
    }

    /// The answer in the buffer, if it is complete enough to submit.
    pub fn pending(&self) -> Option<Answer> {
        match &self.buffer {
            Some(answer) if !answer.is_empty() => Some(answer.clone()),
            _ => None,
        }
    }

    // Building an answer.

    /// Select an option of a multiple-choice question.
    pub fn choose(&mut self, index: usize) -> Result<(), SessionError> {
        self.check_option(QuestionKind::MultipleChoice, index)?;
        self.buffer = Some(Answer::Choice(index));
        Ok(())
    }

    /// Select or deselect an option of a multi-select question.
    pub fn toggle(&mut self, index: usize) -> Result<(), SessionError> {
        self.check_option(QuestionKind::MultiSelect, index)?;
        let mut selected = match self.buffer.take() {
            Some(Answer::Choices(set)) => set,
            _ => BTreeSet::new(),
        };
        if !selected.remove(&index) {
            selected.insert(index);
        }
        self.buffer = Some(Answer::Choices(selected));
        Ok(())
    }

    /// Set the text of a fill-in question.
    pub fn input(&mut self, text: &str) -> Result<(), SessionError> {
        self.check_editable(QuestionKind::FillIn)?;
        self.buffer = Some(Answer::text(text));
        Ok(())
    }

    fn check_editable(&self, kind: QuestionKind) -> Result<(), Rejection> {
        if self.is_answered() {
            return Err(Rejection::AlreadyAnswered);
        }
        if self.current().kind() != kind {
            return Err(Rejection::WrongAnswerKind);
        }
        Ok(())
    }

    fn check_option(&self, kind: QuestionKind, index: usize) -> Result<(), Rejection> {
        self.check_editable(kind)?;
        if index >= self.current().options().len() {
            return Err(Rejection::OptionOutOfRange(index));
        }
        Ok(())
    }

    // Transitions.

    /// Submit an answer to the current question.
    pub fn submit(&mut self, answer: Answer) -> Result<Evaluation, SessionError> {
        if self.is_answered() {
            return Err(Rejection::AlreadyAnswered.into());
        }
        let evaluation = evaluate(&self.bank, self.current(), &answer)?;
        self.stats.record(evaluation.correct);
        if !evaluation.correct {
            let prompt = self.deck[self.cursor].prompt();
            if let Some(canonical) = self.bank.canonical(prompt) {
                if self.missed.insert(canonical) {
                    log::debug!("Added {prompt:?} to the missed set");
                }
            }
        }
        log::debug!(
            "Answered question {}/{}: correct={}, accuracy={}%",
            self.cursor + 1,
            self.deck.len(),
            evaluation.correct,
            self.stats.accuracy()
        );
        self.buffer = Some(answer.clone());
        self.phase = Phase::Answered {
            answer,
            evaluation: evaluation.clone(),
        };
        Ok(evaluation)
    }

    /// Submit whatever is in the answer buffer.
    pub fn submit_pending(&mut self) -> Result<Evaluation, SessionError> {
        if self.is_answered() {
            return Err(Rejection::AlreadyAnswered.into());
        }
        let answer = self.pending().ok_or(Rejection::EmptyAnswer)?;
        self.submit(answer)
    }

    /// Move on from an answered question.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        if !self.is_answered() {
            return Err(Rejection::NotAnswered.into());
        }
        self.buffer = None;
        self.phase = Phase::AwaitingInput;
        self.cursor += 1;
        if self.cursor < self.deck.len() {
            return Ok(Advance::Next);
        }
        self.deck = self.order.deal(&self.bank);
        self.cursor = 0;
        self.round += 1;
        log::info!("Finished the deck; dealing round {}", self.round);
        Ok(Advance::Wrapped)
    }

    /// Start over with a new deck, clearing the totals and the missed set.
    pub fn restart(&mut self) {
        self.deck = self.order.deal(&self.bank);
        self.cursor = 0;
        self.round = 1;
        self.phase = Phase::AwaitingInput;
        self.buffer = None;
        self.stats = Stats::default();
        self.missed = MissedSet::new();
        log::info!("Restarted quiz {:?}", self.title);
    }

    // Export.

    /// The missed questions as a file, named after the title and `today`.
    pub fn missed_artifact(&self, today: Date) -> Result<ExportArtifact, SessionError> {
        if self.missed.is_empty() {
            return Err(SessionError::EmptyExportSet);
        }
        build_artifact(&self.title, today, self.missed.questions())
            .map_err(|e| SessionError::ExportFailed(e.message().to_string()))
    }

    /// Hand the missed questions to an exporter.
    pub fn export_missed(
        &self,
        exporter: &mut dyn Exporter,
        today: Date,
    ) -> Result<ExportArtifact, SessionError> {
        let artifact = self.missed_artifact(today)?;
        exporter
            .save(&artifact)
            .map_err(|e| SessionError::ExportFailed(e.message().to_string()))?;
        log::info!(
            "Exported {} missed questions as {}",
            artifact.count,
            artifact.file_name
        );
        Ok(artifact)
    }

    /// A read-only snapshot for rendering.
    pub fn view(&self) -> SessionView {
        let question = self.current();
        let (answered, evaluation, correct_indices) = match &self.phase {
            Phase::AwaitingInput => (false, None, Vec::new()),
            Phase::Answered { evaluation, .. } => {
                (true, Some(evaluation.clone()), question.correct_indices())
            }
        };
        SessionView {
            title: self.title.clone(),
            position: self.cursor + 1,
            deck_len: self.deck.len(),
            round: self.round,
            kind: question.kind(),
            prompt: question.prompt().to_string(),
            options: question.options().to_vec(),
            selection: self.buffer.clone(),
            answered,
            evaluation,
            correct_indices,
            can_submit: !answered && self.pending().is_some(),
            total_answered: self.stats.total_answered,
            correct_answers: self.stats.correct_answers,
            accuracy: self.stats.accuracy(),
            missed_count: self.missed.len(),
            progress_percent: ((self.cursor + 1) * 100 / self.deck.len()) as u32,
        }
    }
}

/// Everything a front end needs to draw the current question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub title: String,
    /// One-based position in the deck.
    pub position: usize,
    pub deck_len: usize,
    pub round: usize,
    pub kind: QuestionKind,
    pub prompt: String,
    pub options: Vec<String>,
    pub selection: Option<Answer>,
    pub answered: bool,
    pub evaluation: Option<Evaluation>,
    /// Empty until the question is answered.
    pub correct_indices: Vec<usize>,
    pub can_submit: bool,
    pub total_answered: u64,
    pub correct_answers: u64,
    pub accuracy: u32,
    pub missed_count: usize,
    pub progress_percent: u32,
}

impl SessionView {
    /// Whether option `index` was part of the submitted or pending answer.
    pub fn is_selected(&self, index: usize) -> bool {
        match &self.selection {
            Some(Answer::Choice(i)) => *i == index,
            Some(Answer::Choices(set)) => set.contains(&index),
            _ => false,
        }
    }

    pub fn text(&self) -> &str {
        match &self.selection {
            Some(Answer::Text(s)) => s,
            _ => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::tests::fill;
    use crate::bank::tests::mc;
    use crate::bank::tests::sample_bank;
    use crate::error::ErrorReport;
    use crate::error::Fallible;
    use crate::rng::TinyRng;

    fn canonical_session() -> Session {
        Session::new(sample_bank(), "Test", DeckOrder::Canonical)
    }

    fn shuffled_session(seed: u64) -> Session {
        Session::new(
            sample_bank(),
            "Test",
            DeckOrder::Shuffled(TinyRng::from_seed(seed)),
        )
    }

    fn right_answer(q: &WorkingQuestion) -> Answer {
        match q.question() {
            Question::MultipleChoice { correct, .. } => Answer::Choice(*correct),
            Question::MultiSelect { correct, .. } => Answer::choices(correct.iter().copied()),
            Question::FillIn { acceptable, .. } => Answer::text(&acceptable[0]),
        }
    }

    fn wrong_answer(q: &WorkingQuestion) -> Answer {
        let correct = q.correct_indices();
        let other = (0..q.options().len()).find(|i| !correct.contains(i));
        match q.kind() {
            QuestionKind::MultipleChoice => Answer::Choice(other.unwrap()),
            QuestionKind::MultiSelect => Answer::choices(other),
            QuestionKind::FillIn => Answer::text("definitely wrong"),
        }
    }

    fn answer_and_advance(session: &mut Session, correct: bool) -> Result<Advance, SessionError> {
        let answer = if correct {
            right_answer(session.current())
        } else {
            wrong_answer(session.current())
        };
        let evaluation = session.submit(answer)?;
        assert_eq!(evaluation.correct, correct);
        session.advance()
    }

    struct MemoryExporter {
        saved: Vec<ExportArtifact>,
    }

    impl Exporter for MemoryExporter {
        fn save(&mut self, artifact: &ExportArtifact) -> Fallible<()> {
            self.saved.push(artifact.clone());
            Ok(())
        }
    }

    struct BrokenExporter;

    impl Exporter for BrokenExporter {
        fn save(&mut self, _artifact: &ExportArtifact) -> Fallible<()> {
            Err(ErrorReport::new("disk full"))
        }
    }

    fn today() -> Date {
        Date::try_from("2025-01-31".to_string()).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let session = canonical_session();
        let view = session.view();
        assert_eq!(view.position, 1);
        assert_eq!(view.deck_len, 3);
        assert_eq!(view.round, 1);
        assert!(!view.answered);
        assert!(!view.can_submit);
        assert_eq!(view.total_answered, 0);
        assert_eq!(view.accuracy, 0);
        assert_eq!(view.missed_count, 0);
        assert!(view.correct_indices.is_empty());
    }

    #[test]
    fn test_stats_after_submissions() -> Result<(), SessionError> {
        let mut session = shuffled_session(5);
        let pattern = [true, false, true, true, false, false, true];
        for &correct in &pattern {
            answer_and_advance(&mut session, correct)?;
        }
        let stats = session.stats();
        assert_eq!(stats.total_answered, 7);
        assert_eq!(stats.correct_answers, 4);
        // 57.14
        assert_eq!(session.accuracy(), 57);
        Ok(())
    }

    #[test]
    fn test_submit_twice_is_rejected() -> Result<(), SessionError> {
        let mut session = canonical_session();
        session.submit(Answer::Choice(0))?;
        let stats = session.stats();
        let result = session.submit(Answer::Choice(1));
        assert_eq!(
            result,
            Err(SessionError::InvalidTransition(Rejection::AlreadyAnswered))
        );
        assert_eq!(session.stats(), stats);
        assert_eq!(
            session.phase(),
            &Phase::Answered {
                answer: Answer::Choice(0),
                evaluation: Evaluation {
                    correct: false,
                    canonical_display: "B".to_string(),
                },
            }
        );
        Ok(())
    }

    #[test]
    fn test_advance_before_submit_is_rejected() {
        let mut session = canonical_session();
        let before = session.view();
        assert_eq!(
            session.advance(),
            Err(SessionError::InvalidTransition(Rejection::NotAnswered))
        );
        assert_eq!(session.view(), before);
    }

    #[test]
    fn test_rejected_submission_changes_nothing() {
        let mut session = canonical_session();
        let before = session.view();
        assert_eq!(
            session.submit(Answer::text("B")),
            Err(SessionError::InvalidTransition(Rejection::WrongAnswerKind))
        );
        assert_eq!(
            session.submit(Answer::Choice(3)),
            Err(SessionError::InvalidTransition(Rejection::OptionOutOfRange(3)))
        );
        assert_eq!(session.view(), before);
    }

    #[test]
    fn test_missed_questions_are_canonical() -> Result<(), SessionError> {
        let mut session = shuffled_session(17);
        while session.current().kind() != QuestionKind::MultiSelect {
            answer_and_advance(&mut session, true)?;
        }
        let wrong = wrong_answer(session.current());
        session.submit(wrong)?;
        let canonical = session.bank().canonical("Which are vowels?").cloned();
        assert_eq!(session.missed().questions().first(), canonical.as_ref());
        Ok(())
    }

    #[test]
    fn test_missed_set_dedup_across_wraparound() -> Result<(), SessionError> {
        let mut session = shuffled_session(99);
        // Miss every question in two full rounds.
        for _ in 0..6 {
            answer_and_advance(&mut session, false)?;
        }
        assert_eq!(session.round(), 3);
        assert_eq!(session.missed().len(), 3);
        assert_eq!(session.stats().total_answered, 6);
        assert_eq!(session.stats().correct_answers, 0);
        Ok(())
    }

    #[test]
    fn test_shared_prompt_is_missed_once() -> Result<(), SessionError> {
        let mut session = Session::start(
            vec![fill("Same?", &["yes"], "Yes"), mc("Same?", &["A", "B"], 0)],
            "Test",
            DeckOrder::Canonical,
        )?;
        session.submit(Answer::text("no"))?;
        session.advance()?;
        session.submit(Answer::Choice(1))?;
        assert_eq!(session.missed().len(), 1);
        assert_eq!(
            session.missed().questions(),
            &[fill("Same?", &["yes"], "Yes")]
        );
        Ok(())
    }

    #[test]
    fn test_wraparound_keeps_totals() -> Result<(), SessionError> {
        let mut session = canonical_session();
        assert_eq!(answer_and_advance(&mut session, false)?, Advance::Next);
        assert_eq!(answer_and_advance(&mut session, true)?, Advance::Next);
        let stats = session.stats();
        let missed = session.missed().len();
        assert_eq!(answer_and_advance(&mut session, true)?, Advance::Wrapped);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.round(), 2);
        assert_eq!(session.stats().total_answered, stats.total_answered + 1);
        assert_eq!(session.stats().correct_answers, stats.correct_answers + 1);
        assert_eq!(session.missed().len(), missed);
        assert!(!session.is_answered());
        assert_eq!(session.pending(), None);
        Ok(())
    }

    #[test]
    fn test_wraparound_reshuffles() -> Result<(), SessionError> {
        let questions: Vec<Question> = (0..10)
            .map(|i| fill(&format!("Q{i}"), &["x"], "x"))
            .collect();
        let mut session = Session::start(
            questions,
            "Ten",
            DeckOrder::Shuffled(TinyRng::from_seed(1234)),
        )?;
        let first: Vec<String> = session
            .deck()
            .iter()
            .map(|q| q.prompt().to_string())
            .collect();
        for _ in 0..10 {
            answer_and_advance(&mut session, true)?;
        }
        let second: Vec<String> = session
            .deck()
            .iter()
            .map(|q| q.prompt().to_string())
            .collect();
        assert_eq!(session.round(), 2);
        assert_ne!(first, second);
        let mut a = first.clone();
        let mut b = second.clone();
        a.sort();
        b.sort();
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_answer_buffer() -> Result<(), SessionError> {
        let mut session = canonical_session();
        // Multiple choice: the last choice wins.
        assert_eq!(
            session.toggle(0),
            Err(SessionError::InvalidTransition(Rejection::WrongAnswerKind))
        );
        session.choose(0)?;
        session.choose(1)?;
        assert!(session.view().can_submit);
        assert_eq!(session.pending(), Some(Answer::Choice(1)));
        assert!(session.submit_pending()?.correct);
        assert_eq!(
            session.choose(2),
            Err(SessionError::InvalidTransition(Rejection::AlreadyAnswered))
        );
        session.advance()?;

        // Multi-select: toggling twice removes.
        assert_eq!(session.pending(), None);
        assert_eq!(
            session.submit_pending(),
            Err(SessionError::InvalidTransition(Rejection::EmptyAnswer))
        );
        session.toggle(0)?;
        session.toggle(1)?;
        session.toggle(2)?;
        session.toggle(1)?;
        assert!(session.view().is_selected(2));
        assert!(!session.view().is_selected(1));
        assert_eq!(
            session.toggle(4),
            Err(SessionError::InvalidTransition(Rejection::OptionOutOfRange(4)))
        );
        assert!(session.submit_pending()?.correct);
        session.advance()?;

        // Fill-in: blank text cannot be submitted.
        session.input("   ")?;
        assert!(!session.view().can_submit);
        session.input(" paris ")?;
        assert_eq!(session.view().text(), "paris");
        assert!(session.submit_pending()?.correct);
        Ok(())
    }

    #[test]
    fn test_view_after_answer() -> Result<(), SessionError> {
        let mut session = canonical_session();
        session.submit(Answer::Choice(2))?;
        let view = session.view();
        assert!(view.answered);
        assert!(!view.can_submit);
        assert_eq!(view.correct_indices, vec![1]);
        assert!(view.is_selected(2));
        assert_eq!(view.missed_count, 1);
        assert_eq!(
            view.evaluation.map(|e| e.canonical_display),
            Some("B".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_restart() -> Result<(), SessionError> {
        let mut session = canonical_session();
        answer_and_advance(&mut session, false)?;
        session.submit(right_answer(session.current()))?;
        session.restart();
        let view = session.view();
        assert_eq!(view.position, 1);
        assert_eq!(view.round, 1);
        assert!(!view.answered);
        assert_eq!(view.total_answered, 0);
        assert_eq!(view.missed_count, 0);
        Ok(())
    }

    #[test]
    fn test_export_empty() {
        let session = canonical_session();
        let mut exporter = MemoryExporter { saved: Vec::new() };
        assert_eq!(
            session.export_missed(&mut exporter, today()),
            Err(SessionError::EmptyExportSet)
        );
        assert!(exporter.saved.is_empty());
    }

    #[test]
    fn test_export_missed() -> Result<(), SessionError> {
        let mut session = canonical_session();
        answer_and_advance(&mut session, false)?;
        answer_and_advance(&mut session, true)?;
        session.submit(Answer::text("Rome"))?;
        let mut exporter = MemoryExporter { saved: Vec::new() };
        let artifact = session.export_missed(&mut exporter, today())?;
        assert_eq!(artifact.file_name, "Test_20250131.json");
        assert_eq!(artifact.count, 2);
        // Exporting again is harmless and yields the same file.
        session.export_missed(&mut exporter, today())?;
        assert_eq!(exporter.saved.len(), 2);
        assert_eq!(exporter.saved[0], exporter.saved[1]);
        let exported: Vec<Question> = serde_json::from_str(&artifact.contents).unwrap();
        assert_eq!(exported[0], mc("Which letter is second?", &["A", "B", "C"], 1));
        assert_eq!(
            exported[1],
            fill("Capital of France?", &["Paris", " paris "], "Paris")
        );
        assert!(session.is_answered());
        Ok(())
    }

    #[test]
    fn test_export_failure_is_reported() -> Result<(), SessionError> {
        let mut session = canonical_session();
        session.submit(Answer::Choice(0))?;
        assert_eq!(
            session.export_missed(&mut BrokenExporter, today()),
            Err(SessionError::ExportFailed("disk full".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_start_rejects_malformed_bank() {
        let result = Session::start(vec![mc("Q", &["A"], 1)], "Bad", DeckOrder::Canonical);
        assert!(matches!(
            result,
            Err(SessionError::MalformedQuestionBank(_))
        ));
    }
}
