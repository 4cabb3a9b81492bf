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

//! Saving the missed-question file from the browser.

use js_sys::Array;
use quizdeck_core::ErrorReport;
use quizdeck_core::ExportArtifact;
use quizdeck_core::Exporter;
use quizdeck_core::Fallible;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Blob;
use web_sys::BlobPropertyBag;
use web_sys::Document;
use web_sys::HtmlAnchorElement;
use web_sys::Url;
use web_sys::Window;

/// Downloads the file through a temporary link. iOS ignores the `download`
/// attribute, so there the contents are shown in a new window instead.
pub struct BrowserDownload;

impl Exporter for BrowserDownload {
    fn save(&mut self, artifact: &ExportArtifact) -> Fallible<()> {
        let window = web_sys::window().ok_or_else(|| ErrorReport::new("no window"))?;
        let result = if is_ios(&window) {
            show_in_popup(&window, artifact)
        } else {
            download(&window, artifact)
        };
        result.map_err(|e| ErrorReport::new(describe(&e)))
    }
}

fn is_ios(window: &Window) -> bool {
    let agent = window
        .navigator()
        .user_agent()
        .unwrap_or_default()
        .to_lowercase();
    ["ipad", "iphone", "ipod"].iter().any(|d| agent.contains(d))
}

fn document(window: &Window) -> Result<Document, JsValue> {
    window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn download(window: &Window, artifact: &ExportArtifact) -> Result<(), JsValue> {
    let parts = Array::of1(&JsValue::from_str(&artifact.contents));
    let options = BlobPropertyBag::new();
    options.set_type(artifact.content_type);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = document(window)?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(&artifact.file_name);
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;
    Url::revoke_object_url(&url)
}

fn show_in_popup(window: &Window, artifact: &ExportArtifact) -> Result<(), JsValue> {
    let popup = window
        .open()?
        .ok_or_else(|| JsValue::from_str("allow pop-ups to see the missed questions"))?;
    let document = document(&popup)?;
    document.set_title(&artifact.file_name);
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;
    let pre = document.create_element("pre")?;
    pre.set_text_content(Some(&artifact.contents));
    body.append_child(&pre)?;
    Ok(())
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}
