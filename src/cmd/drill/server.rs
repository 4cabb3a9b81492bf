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

use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use quizdeck_core::Date;
use quizdeck_core::DeckOrder;
use quizdeck_core::Fallible;
use quizdeck_core::Session;
use quizdeck_core::SessionError;
use quizdeck_core::TinyRng;
use tokio::net::TcpListener;
use tokio::select;
use tokio::signal;
use tokio::sync::oneshot::Receiver;
use tokio::sync::oneshot::channel;

use crate::bank::LoadedBank;
use crate::bank::load_bank;
use crate::cmd::drill::export::FileExporter;
use crate::cmd::drill::export::export_handler;
use crate::cmd::drill::get::get_handler;
use crate::cmd::drill::post::post_handler;
use crate::cmd::drill::state::MutableState;
use crate::cmd::drill::state::ServerState;
use crate::utils::CACHE_CONTROL_IMMUTABLE;

pub struct ServerConfig {
    pub bank: Option<String>,
    pub host: String,
    pub port: u16,
    pub title: Option<String>,
    pub shuffle: bool,
    pub export_dir: Option<String>,
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    let LoadedBank { path, title, bank } = load_bank(config.bank)?;
    let title = config.title.unwrap_or(title);
    log::debug!("Loaded {} questions from {}", bank.len(), path.display());

    let order = if config.shuffle {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        DeckOrder::Shuffled(TinyRng::from_seed(seed))
    } else {
        DeckOrder::Canonical
    };
    let session = Session::new(bank, title, order);

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = channel();

    let state = ServerState {
        port: config.port,
        mutable: Arc::new(Mutex::new(MutableState {
            session,
            notice: None,
        })),
        shutdown_tx: Arc::new(Mutex::new(Some(shutdown_tx))),
    };
    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/export", get(export_handler));
    let app = app.route("/script.js", get(script_handler));
    let app = app.route("/style.css", get(style_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state.clone());
    let bind = format!("{}:{}", config.host, config.port);

    // Start the server with graceful shutdown on Ctrl+C or shutdown button.
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await?;
    log::debug!("Server on port {} stopped", state.port);

    let mutable = state.lock();
    let session = &mutable.session;
    if let Some(directory) = config.export_dir {
        let mut exporter = FileExporter::new(&directory);
        match session.export_missed(&mut exporter, Date::today()) {
            Ok(artifact) => println!(
                "Saved {} missed questions to {directory}/{}.",
                artifact.count, artifact.file_name
            ),
            Err(SessionError::EmptyExportSet) => println!("No missed questions to save."),
            Err(e) => return Err(e.into()),
        }
    }
    let stats = session.stats();
    println!(
        "Answered {} questions, {} correct ({}%).",
        stats.total_answered,
        stats.correct_answers,
        stats.accuracy()
    );
    Ok(())
}

async fn script_handler() -> (StatusCode, [(HeaderName, &'static str); 1], &'static str) {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/javascript")],
        include_str!("script.js"),
    )
}

async fn style_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}

async fn shutdown_signal(shutdown_rx: Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    let shutdown = async {
        shutdown_rx.await.ok();
    };

    select! {
        _ = ctrl_c => {
            log::debug!("Received Ctrl+C, shutting down gracefully");
        },
        _ = shutdown => {
            log::debug!("Received shutdown signal, shutting down gracefully");
        },
    }
}
