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

use std::fs::create_dir_all;
use std::fs::write;
use std::path::PathBuf;

use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_DISPOSITION;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::utf8_percent_encode;
use quizdeck_core::Date;
use quizdeck_core::ExportArtifact;
use quizdeck_core::Exporter;
use quizdeck_core::Fallible;
use quizdeck_core::SessionError;

use crate::cmd::drill::state::ServerState;

/// Characters left alone in an RFC 5987 `filename*` value.
const FILENAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_');

/// Holds on to the artifact so the handler can send it as a download.
#[derive(Default)]
struct Download {
    artifact: Option<ExportArtifact>,
}

impl Exporter for Download {
    fn save(&mut self, artifact: &ExportArtifact) -> Fallible<()> {
        self.artifact = Some(artifact.clone());
        Ok(())
    }
}

/// Writes the artifact into a directory.
pub struct FileExporter {
    directory: PathBuf,
}

impl FileExporter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl Exporter for FileExporter {
    fn save(&mut self, artifact: &ExportArtifact) -> Fallible<()> {
        create_dir_all(&self.directory)?;
        let file_name = artifact.file_name.replace(['/', '\\'], "_");
        write(self.directory.join(file_name), &artifact.contents)?;
        Ok(())
    }
}

pub async fn export_handler(State(state): State<ServerState>) -> Response {
    let mut mutable = state.lock();
    let mut download = Download::default();
    match mutable.session.export_missed(&mut download, Date::today()) {
        Ok(_) => match download.artifact {
            Some(artifact) => attachment(artifact),
            None => Redirect::to("/").into_response(),
        },
        Err(SessionError::EmptyExportSet) => {
            mutable.notice = Some(SessionError::EmptyExportSet.to_string());
            Redirect::to("/").into_response()
        }
        Err(e) => {
            log::error!("{e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("Internal Server Error".to_string()),
            )
                .into_response()
        }
    }
}

fn attachment(artifact: ExportArtifact) -> Response {
    let disposition = content_disposition(&artifact.file_name);
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, artifact.content_type.to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        artifact.contents,
    )
        .into_response()
}

/// The `Content-Disposition` value, with an ASCII fallback name for old
/// clients and the exact name in `filename*`.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let encoded = utf8_percent_encode(file_name, FILENAME_ENCODE_SET);
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}
