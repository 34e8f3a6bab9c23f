// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Processos-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Processos and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Processos CLI entrypoint.
//!
//! By default this runs the interactive TUI and serves the CRUD API over HTTP
//! at `http://127.0.0.1:<port>/processes`.
//!
//! Use `--headless` to run the HTTP server alone (intended for a browser or
//! external client doing the editing).

use std::error::Error;
use std::sync::Arc;

use tokio::sync::Mutex;

use processos::api::{router, ApiState};
use processos::service::RecordService;
use processos::store::{JsonFileStore, WriteDurability};

const DEFAULT_DATA_FILE: &str = "processos.json";
const DEFAULT_HTTP_PORT: u16 = 27480;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<data-file>] [--http-port <port>] [--durable-writes] [--headless]\n  {program} [--data <file>] [--http-port <port>] [--durable-writes] [--headless]\n\nTUI mode (default) also serves the CRUD API over HTTP at `http://127.0.0.1:<port>/processes`.\n--http-port selects the port (0 = ephemeral; default {DEFAULT_HTTP_PORT}).\n\nIf data-file/--data is omitted, `{DEFAULT_DATA_FILE}` in the current working directory is used.\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\n--headless runs the HTTP server without the TUI until interrupted."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    data_file: Option<String>,
    http_port: Option<u16>,
    durable_writes: bool,
    headless: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data" => {
                if options.data_file.is_some() {
                    return Err(());
                }
                let file = args.next().ok_or(())?;
                options.data_file = Some(file);
            }
            "--http-port" => {
                if options.http_port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.http_port = Some(port);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            "--headless" => {
                if options.headless {
                    return Err(());
                }
                options.headless = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.data_file.is_some() {
                    return Err(());
                }
                options.data_file = Some(arg);
            }
        }
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "processos".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let data_file = options.data_file.unwrap_or_else(|| DEFAULT_DATA_FILE.to_owned());
        let store = if options.durable_writes {
            JsonFileStore::new(data_file).with_durability(WriteDurability::Durable)
        } else {
            JsonFileStore::new(data_file)
        };
        let service = Arc::new(Mutex::new(RecordService::new(store)));
        let http_port = options.http_port.unwrap_or(DEFAULT_HTTP_PORT);

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", http_port)).await?;
            let addr = listener.local_addr()?;
            let app = router(ApiState {
                service: service.clone(),
            });

            if options.headless {
                eprintln!("processos: serving HTTP at http://{addr}/processes");
                axum::serve(listener, app).await?;
                return Ok::<(), Box<dyn Error>>(());
            }

            let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
            let server_handle = tokio::spawn(async move {
                let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                });
                if let Err(err) = serve.await {
                    eprintln!("processos: HTTP server error: {err}");
                }
            });

            let tui_service = service.clone();
            let tui_join = tokio::task::spawn_blocking(move || {
                processos::tui::run(tui_service).map_err(|err| err.to_string())
            })
            .await;

            let _ = shutdown_tx.send(());
            let _ = server_handle.await;

            let tui_result = tui_join.map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
            tui_result.map_err(|err| {
                Box::new(std::io::Error::new(std::io::ErrorKind::Other, err)) as Box<dyn Error>
            })?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("processos: {err}");
        std::process::exit(1);
    }
}
