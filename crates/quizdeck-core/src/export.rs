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

//! Exporting the missed questions.
//!
//! The core only builds the artifact. Saving it is platform-specific and is
//! done by an [`Exporter`].

use crate::error::Fallible;
use crate::types::date::Date;
use crate::types::question::Question;

pub const EXPORT_CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// Used in file names when the bank has no title.
pub const DEFAULT_TITLE: &str = "Missed Questions";

/// A file ready to be saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub contents: String,
    /// Number of questions in the file.
    pub count: usize,
}

/// Saves an export artifact somewhere the user can get at it.
///
/// Saving the same artifact twice must be harmless.
pub trait Exporter {
    fn save(&mut self, artifact: &ExportArtifact) -> Fallible<()>;
}

/// The suggested file name: `<title>_<YYYYMMDD>.json`.
pub fn export_file_name(title: &str, date: Date) -> String {
    let title = title.trim();
    let title = if title.is_empty() { DEFAULT_TITLE } else { title };
    format!("{}_{}.json", title, date.compact())
}

/// Serialize the questions as a pretty-printed JSON array.
pub fn build_artifact(title: &str, date: Date, questions: &[Question]) -> Fallible<ExportArtifact> {
    let contents = serde_json::to_string_pretty(questions)?;
    Ok(ExportArtifact {
        file_name: export_file_name(title, date),
        content_type: EXPORT_CONTENT_TYPE,
        contents,
        count: questions.len(),
    })
}
