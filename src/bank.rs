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

use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use quizdeck_core::Fallible;
use quizdeck_core::QuestionBank;
use quizdeck_core::fail;
use quizdeck_core::parse_bank;

/// Used when no bank path is given.
pub const DEFAULT_BANK: &str = "questions.json";

/// A question bank read from disk.
pub struct LoadedBank {
    pub path: PathBuf,
    /// The title from the file, or else the file name without its extension.
    pub title: String,
    pub bank: QuestionBank,
}

pub fn load_bank(path: Option<String>) -> Fallible<LoadedBank> {
    let path: PathBuf = PathBuf::from(path.unwrap_or_else(|| DEFAULT_BANK.to_string()));
    if !path.is_file() {
        return fail(format!("question bank does not exist: {}", path.display()));
    }
    let text = read_to_string(&path)?;
    let source = path.display().to_string();
    let file = parse_bank(&source, &text)?;
    let title = match file.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => file_stem(&path),
    };
    Ok(LoadedBank {
        path,
        title,
        bank: file.bank,
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("quiz")
        .to_string()
}
