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

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use quizdeck_core::Answer;
use quizdeck_core::QuestionKind;
use quizdeck_core::Rejection;
use quizdeck_core::SessionError;

use crate::cmd::drill::state::ServerState;

#[derive(Debug, PartialEq)]
enum Action {
    Submit,
    Next,
    Restart,
    Shutdown,
}

impl Action {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "Submit" => Some(Action::Submit),
            "Next" => Some(Action::Next),
            "Restart" => Some(Action::Restart),
            "Shutdown" => Some(Action::Shutdown),
            _ => None,
        }
    }
}

/// The fields of a posted form. Checkboxes repeat the `choice` key, so the
/// body is read as a list of pairs.
#[derive(Debug, Default)]
struct ActionForm {
    action: Option<String>,
    choices: Vec<usize>,
    text: Option<String>,
}

impl ActionForm {
    fn from_fields(fields: Vec<(String, String)>) -> Self {
        let mut form = ActionForm::default();
        for (key, value) in fields {
            match key.as_str() {
                "action" => form.action = Some(value),
                "choice" => match value.parse() {
                    Ok(index) => form.choices.push(index),
                    Err(_) => log::debug!("Ignoring malformed choice {value:?}"),
                },
                "text" => form.text = Some(value),
                _ => {}
            }
        }
        form
    }

    /// The answer this form gives to a question of the given kind, or
    /// `None` if a multiple-choice form has no choice.
    fn answer(&self, kind: QuestionKind) -> Option<Answer> {
        match kind {
            QuestionKind::MultipleChoice => self.choices.first().map(|&index| Answer::Choice(index)),
            QuestionKind::MultiSelect => Some(Answer::choices(self.choices.iter().copied())),
            QuestionKind::FillIn => Some(Answer::text(self.text.as_deref().unwrap_or_default())),
        }
    }

    fn submission(&self, kind: QuestionKind) -> Result<Answer, Rejection> {
        self.answer(kind).ok_or(Rejection::EmptyAnswer)
    }
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Redirect {
    let form = ActionForm::from_fields(fields);
    let action = match form.action.as_deref().and_then(Action::parse) {
        Some(action) => action,
        None => {
            log::debug!("Unknown action: {:?}", form.action);
            return Redirect::to("/");
        }
    };
    let result: Result<(), SessionError> = {
        let mut mutable = state.lock();
        match action {
            Action::Submit => form
                .submission(mutable.session.current().kind())
                .map_err(SessionError::from)
                .and_then(|answer| mutable.session.submit(answer).map(|_| ())),
            Action::Next => mutable.session.advance().map(|_| ()),
            Action::Restart => {
                mutable.session.restart();
                Ok(())
            }
            Action::Shutdown => {
                state.shutdown();
                Ok(())
            }
        }
    };
    if let Err(e) = result {
        log::debug!("Rejected {action:?}: {e}");
    }
    Redirect::to("/")
}
