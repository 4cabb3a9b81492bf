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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::html;
use quizdeck_core::QuestionKind;
use quizdeck_core::SessionView;

use crate::cmd::drill::state::ServerState;
use crate::cmd::drill::template::page_template;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let (view, notice) = {
        let mut mutable = state.lock();
        (mutable.session.view(), mutable.notice.take())
    };
    let body = render_session(&view, notice.as_deref());
    let html = page_template(&view.title, body).into_string();
    (StatusCode::OK, Html(html))
}

fn render_session(view: &SessionView, notice: Option<&str>) -> Markup {
    let progress_style = format!("width: {}%;", view.progress_percent);
    let badge_class = format!("question-type-badge {}", view.kind);
    html! {
        div.root {
            div.header {
                div.question-number {
                    "Question " (view.position) "/" (view.deck_len) " "
                    span class=(badge_class) { (view.kind.label()) }
                }
                button #theme-toggle type="button" title="Toggle dark mode" { "Dark" }
            }
            div.progress-bar {
                div.progress-fill style=(progress_style) {}
            }
            @if let Some(notice) = notice {
                div.notice { (notice) }
            }
            div.card-container {
                div.card {
                    div.question-text { (view.prompt) }
                    form #answer-form action="/" method="post" {
                        (render_inputs(view))
                        (render_feedback(view))
                        div.controls {
                            @if view.answered {
                                input #next type="submit" name="action" value="Next" title="Go to the next question. Shortcut: enter.";
                            } @else {
                                input #submit type="submit" name="action" value="Submit" title="Check your answer. Shortcut: enter.";
                            }
                        }
                    }
                }
            }
            div.stats {
                span { "Answered: " span #total-answered { (view.total_answered) } }
                span { "Accuracy: " span #accuracy { (view.accuracy) "%" } }
            }
            div.footer {
                @if view.missed_count > 0 {
                    a #download-errors href="/export" {
                        "Download missed questions (" (view.missed_count) ")"
                    }
                }
                form.footer-actions action="/" method="post" {
                    input #restart type="submit" name="action" value="Restart" title="Start over with a new deck and clear the results.";
                    input #shutdown type="submit" name="action" value="Shutdown" title="Stop the quiz server.";
                }
            }
        }
    }
}

fn render_inputs(view: &SessionView) -> Markup {
    match view.kind {
        QuestionKind::MultipleChoice => render_options(view, "radio"),
        QuestionKind::MultiSelect => render_options(view, "checkbox"),
        QuestionKind::FillIn => {
            let class = match &view.evaluation {
                Some(e) if e.correct => "fill-in-input correct",
                Some(_) => "fill-in-input incorrect",
                None => "fill-in-input",
            };
            html! {
                div.options {
                    input #fill-in-input class=(class) type="text" name="text"
                        value=(view.text()) placeholder="Type your answer..."
                        autocomplete="off" autofocus disabled[view.answered];
                    div.fill-in-hint { "Press Enter or click Submit when you are done." }
                }
            }
        }
    }
}

fn render_options(view: &SessionView, input_type: &str) -> Markup {
    html! {
        div.options {
            @for (index, option) in view.options.iter().enumerate() {
                label class=(option_class(view, index)) {
                    input type=(input_type) name="choice" value=(index)
                        checked[view.is_selected(index)] disabled[view.answered];
                    span { (option) }
                }
            }
        }
    }
}

fn option_class(view: &SessionView, index: usize) -> &'static str {
    if !view.answered {
        "option"
    } else if view.correct_indices.contains(&index) {
        "option correct"
    } else if view.is_selected(index) {
        "option incorrect"
    } else {
        "option"
    }
}

fn render_feedback(view: &SessionView) -> Markup {
    match &view.evaluation {
        None => html! {},
        Some(e) if e.correct => html! {
            div.feedback.correct { "✓ Correct!" }
        },
        Some(e) => html! {
            div.feedback.incorrect {
                "✗ Incorrect. The correct answer is: " (e.canonical_display)
            }
        },
    }
}
