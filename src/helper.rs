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

use std::fs::write;

use tempfile::TempDir;
use tempfile::tempdir;

use quizdeck_core::Fallible;

/// One question of each kind, in this order.
pub const SAMPLE_BANK: &str = r#"[
  {
    "type": "multiple-choice",
    "question": "Which letter is second?",
    "options": ["A", "B", "C"],
    "correctAnswer": 1
  },
  {
    "type": "multi-select",
    "question": "Which are vowels?",
    "options": ["A", "B", "E", "F"],
    "correctAnswer": [0, 2]
  },
  {
    "type": "fill-in",
    "question": "Capital of France?",
    "acceptableAnswers": ["Paris", " paris "],
    "correctAnswer": "Paris"
  }
]"#;

/// Write a bank file into a fresh temporary directory. The directory lives as
/// long as the returned handle.
pub fn create_tmp_bank(name: &str, contents: &str) -> Fallible<(TempDir, String)> {
    let dir = tempdir()?;
    let path = dir.path().join(name);
    write(&path, contents)?;
    let path = path.display().to_string();
    Ok((dir, path))
}

/// Tests that mix errors from several crates.
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;
