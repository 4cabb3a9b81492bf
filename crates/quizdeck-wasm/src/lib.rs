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

//! WASM bindings for quizdeck - runs the quiz session in the browser.

use wasm_bindgen::prelude::*;
use web_sys::console;

use quizdeck_core::bank::QuestionBank;
use quizdeck_core::bank::parse_bank;
use quizdeck_core::deck::DeckOrder;
use quizdeck_core::error::SessionError;
use quizdeck_core::rng::TinyRng;
use quizdeck_core::session::Session;
use quizdeck_core::types::date::Date;

mod export;
mod storage;

use export::BrowserDownload;
use storage::Storage;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console::log_1(&"quizdeck WASM initialized".into());
}

/// The main application state managed from JavaScript.
#[wasm_bindgen]
pub struct QuizApp {
    /// The loaded question bank
    bank: Option<QuestionBank>,
    /// Title from the bank file, if it had one
    title: Option<String>,
    /// The running session
    session: Option<Session>,
    /// Storage backend
    storage: Storage,
}

#[wasm_bindgen]
impl QuizApp {
    /// Create a new QuizApp instance.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            bank: None,
            title: None,
            session: None,
            storage: Storage::new(),
        }
    }

    /// Load a question bank from the text of a JSON or TOML file.
    /// Returns the number of questions.
    #[wasm_bindgen]
    pub fn load_bank(&mut self, file_name: &str, text: &str) -> Result<usize, JsValue> {
        let file = parse_bank(file_name, text)
            .map_err(|e| JsValue::from_str(&format!("Failed to load questions: {}", e)))?;
        let count = file.bank.len();
        self.bank = Some(file.bank);
        self.title = file.title;
        self.session = None;
        Ok(count)
    }

    /// Start a new session over the loaded bank.
    ///
    /// `default_title` names the export file when the bank has no title;
    /// typically the page title.
    #[wasm_bindgen]
    pub fn start_session(&mut self, default_title: &str, do_shuffle: bool) -> Result<usize, JsValue> {
        let bank = self
            .bank
            .clone()
            .ok_or_else(|| JsValue::from_str("No questions loaded"))?;
        let title = self
            .title
            .clone()
            .unwrap_or_else(|| default_title.to_string());
        let order = if do_shuffle {
            DeckOrder::Shuffled(TinyRng::from_seed(random_seed()?))
        } else {
            DeckOrder::Canonical
        };
        let session = Session::new(bank, title, order);
        let len = session.deck().len();
        self.session = Some(session);
        Ok(len)
    }

    /// Get a snapshot of the current question and stats, as JSON.
    #[wasm_bindgen]
    pub fn view(&self) -> Result<String, JsValue> {
        let view = self.session()?.view();
        serde_json::to_string(&view)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize view: {}", e)))
    }

    /// Select an option of a multiple-choice question.
    #[wasm_bindgen]
    pub fn choose(&mut self, index: usize) -> Result<(), JsValue> {
        self.session_mut()?.choose(index).map_err(to_js)
    }

    /// Select or deselect an option of a multi-select question.
    #[wasm_bindgen]
    pub fn toggle(&mut self, index: usize) -> Result<(), JsValue> {
        self.session_mut()?.toggle(index).map_err(to_js)
    }

    /// Set the text typed into a fill-in question.
    #[wasm_bindgen]
    pub fn input(&mut self, text: &str) -> Result<(), JsValue> {
        self.session_mut()?.input(text).map_err(to_js)
    }

    /// Whether the current answer can be submitted.
    #[wasm_bindgen]
    pub fn can_submit(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| !s.is_answered() && s.pending().is_some())
    }

    /// Submit the current answer. Returns the evaluation as JSON.
    #[wasm_bindgen]
    pub fn submit(&mut self) -> Result<String, JsValue> {
        let evaluation = self.session_mut()?.submit_pending().map_err(to_js)?;
        serde_json::to_string(&evaluation)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize evaluation: {}", e)))
    }

    /// Go to the next question. Returns true if a new deck was dealt.
    #[wasm_bindgen]
    pub fn advance(&mut self) -> Result<bool, JsValue> {
        let advance = self.session_mut()?.advance().map_err(to_js)?;
        Ok(advance == quizdeck_core::session::Advance::Wrapped)
    }

    /// Start over, clearing the results.
    #[wasm_bindgen]
    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.session_mut()?.restart();
        Ok(())
    }

    /// Get the number of missed questions.
    #[wasm_bindgen]
    pub fn missed_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.missed().len())
    }

    /// Download the missed questions. Returns a message for the user.
    #[wasm_bindgen]
    pub fn export_missed(&self, today_str: &str) -> Result<String, JsValue> {
        let today = Date::try_from(today_str.to_string())
            .map_err(|e| JsValue::from_str(&format!("Invalid date: {}", e)))?;
        match self.session()?.export_missed(&mut BrowserDownload, today) {
            Ok(artifact) => Ok(format!(
                "Saved {} missed questions as {}.",
                artifact.count, artifact.file_name
            )),
            Err(SessionError::EmptyExportSet) => Ok(SessionError::EmptyExportSet.to_string()),
            Err(e) => Err(to_js(e)),
        }
    }

    /// Get the saved theme, "light" or "dark".
    #[wasm_bindgen]
    pub fn theme(&self) -> Result<String, JsValue> {
        Ok(self.storage.theme()?.as_str().to_string())
    }

    /// Switch between light and dark, and remember the choice.
    /// Returns the new theme.
    #[wasm_bindgen]
    pub fn toggle_theme(&self) -> Result<String, JsValue> {
        let theme = self.storage.theme()?.toggled();
        self.storage.set_theme(theme)?;
        Ok(theme.as_str().to_string())
    }

    // Private helper methods

    fn session(&self) -> Result<&Session, JsValue> {
        self.session
            .as_ref()
            .ok_or_else(|| JsValue::from_str("No session in progress"))
    }

    fn session_mut(&mut self) -> Result<&mut Session, JsValue> {
        self.session
            .as_mut()
            .ok_or_else(|| JsValue::from_str("No session in progress"))
    }
}

impl Default for QuizApp {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js(e: SessionError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn random_seed() -> Result<u64, JsValue> {
    let mut bytes = [0u8; 8];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| JsValue::from_str(&format!("Failed to seed RNG: {}", e)))?;
    Ok(u64::from_le_bytes(bytes))
}

/// Get today's date as a string (YYYY-MM-DD).
#[wasm_bindgen]
pub fn today_date() -> String {
    let date = js_sys::Date::new_0();
    let year = date.get_full_year();
    let month = date.get_month() + 1;
    let day = date.get_date();
    format!("{:04}-{:02}-{:02}", year, month, day)
}
