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

use std::process::exit;

use clap::Parser;
use quizdeck_core::Fallible;
use tokio::spawn;

use crate::cmd::check::check_bank;
use crate::cmd::drill::server::ServerConfig;
use crate::cmd::drill::server::start_server;
use crate::utils::wait_for_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Run a quiz through a web interface.
    Drill {
        /// Path to the question bank (JSON or TOML). By default, `questions.json` in the current directory.
        bank: Option<String>,
        /// The host address to bind to. Default is 127.0.0.1.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// The port to use for the web server. Default is 8000.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Title of the quiz, used in the page title and export file names. Defaults to the bank's title.
        #[arg(long)]
        title: Option<String>,
        /// Whether to open the browser automatically. Default is true.
        #[arg(long)]
        open_browser: Option<bool>,
        /// Ask the questions in bank order, with options unshuffled.
        #[arg(long)]
        no_shuffle: bool,
        /// Directory to save the missed questions to when the server shuts down.
        #[arg(long)]
        export_dir: Option<String>,
    },
    /// Check that a question bank is well-formed.
    Check {
        /// Path to the question bank. By default, `questions.json` in the current directory.
        bank: Option<String>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Drill {
            bank,
            host,
            port,
            title,
            open_browser,
            no_shuffle,
            export_dir,
        } => {
            if open_browser.unwrap_or(true) {
                // Start a separate task to open the browser once the server is up.
                let browser_host = host.clone();
                spawn(async move {
                    match wait_for_server(&browser_host, port).await {
                        Ok(_) => {
                            let _ = open::that(format!("http://{browser_host}:{port}/"));
                        }
                        Err(e) => {
                            eprintln!("Failed to connect to server: {e}");
                            exit(-1)
                        }
                    }
                });
            }
            let config = ServerConfig {
                bank,
                host,
                port,
                title,
                shuffle: !no_shuffle,
                export_dir,
            };
            start_server(config).await
        }
        Command::Check { bank } => check_bank(bank),
    }
}
