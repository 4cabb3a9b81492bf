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

//! quizdeck-core: Core library for the quizdeck quiz runner.
//!
//! This library provides WASM-compatible types and algorithms for:
//! - Loading and validating question banks
//! - Shuffling questions and options
//! - Evaluating answers
//! - The quiz session state machine and the missed-question export

pub mod bank;
pub mod deck;
pub mod error;
pub mod evaluate;
pub mod export;
pub mod rng;
pub mod session;
pub mod stats;
pub mod types;

// Re-exports for convenience
pub use bank::{BankFile, QuestionBank, parse_bank};
pub use deck::{DeckOrder, WorkingQuestion, shuffle_deck};
pub use error::{ErrorReport, Fallible, Rejection, SessionError, fail};
pub use evaluate::{Evaluation, evaluate};
pub use export::{ExportArtifact, Exporter};
pub use rng::TinyRng;
pub use session::{Advance, Phase, Session, SessionView};
pub use stats::{MissedSet, Stats};
pub use types::answer::Answer;
pub use types::date::Date;
pub use types::question::{Question, QuestionKind};
