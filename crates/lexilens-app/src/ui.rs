use std::io::{BufRead, Write};

use kanal::{AsyncReceiver, AsyncSender};
use lexilens_core::CostEstimator;
use lexilens_types::{AppEvent, UiEvent};
use tokio_util::sync::CancellationToken;

use crate::render;

/// Turn a typed line into a request; `Ok(None)` for blank lines
pub fn parse_input(line: &str) -> Result<Option<UiEvent>, String> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return Ok(None);
    }

    let Some(command) = trimmed.strip_prefix(':') else {
        return Ok(Some(UiEvent::Lookup(line.to_string())));
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("q" | "quit"), None) => Ok(Some(UiEvent::Close)),
        (Some("history"), None) => Ok(Some(UiEvent::ShowHistory)),
        (Some("quota"), None) => Ok(Some(UiEvent::ShowQuota)),
        (Some("again"), Some(n)) => n
            .parse()
            .map(|n| Some(UiEvent::Recall(n)))
            .map_err(|_| format!("Not a history position: {n}")),
        _ => Err(format!("Unknown command: {trimmed}")),
    }
}

/// Text shown for a response from the event loop
pub fn present(event: &AppEvent, estimator: &CostEstimator) -> Option<String> {
    match event {
        AppEvent::ShowResult { query, result } => {
            Some(render::render_result(query, result, estimator))
        }
        AppEvent::ShowError(message) => Some(format!("error: {message}")),
        AppEvent::ShowHistory(entries) => Some(render::render_history(entries)),
        AppEvent::ShowQuota {
            remaining,
            limit,
            resets_at,
        } => Some(render::render_quota(*remaining, *limit, resets_at.as_deref())),
        AppEvent::UiEvent(_) | AppEvent::BackendReady => None,
    }
}

/// Lines typed on stdin, read on a dedicated thread
pub fn spawn_stdin_reader() -> AsyncReceiver<String> {
    let (tx, rx) = kanal::unbounded::<String>();

    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to read stdin: {e}");
                    break;
                }
            }
        }
    });

    rx.to_async()
}

/// Reads input lines and prints answers.
///
/// Each request waits for its answer before the next line is taken, so only
/// one lookup is ever in flight. Lines typed meanwhile stay queued and are
/// submitted in order afterwards.
pub async fn ui_loop(
    input: AsyncReceiver<String>,
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    estimator: CostEstimator,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let interactive = atty::is(atty::Stream::Stdin);

    match app_to_ui_rx.recv().await? {
        AppEvent::BackendReady => tracing::debug!("[UI] Backend ready"),
        other => tracing::warn!("[UI] Unexpected first event: {:?}", std::mem::discriminant(&other)),
    }

    if interactive {
        println!("Type a word to look it up. :history, :quota, :again <n>, :quit");
    }

    let mut close_sent = false;
    loop {
        if interactive {
            print!("> ");
            std::io::stdout().flush()?;
        }

        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = input.recv() => match line {
                Ok(line) => line,
                // EOF
                Err(_) => break,
            },
        };

        let event = match parse_input(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(message) => {
                println!("error: {message}");
                continue;
            }
        };

        let closing = matches!(event, UiEvent::Close);
        ui_to_app_tx.send(AppEvent::UiEvent(event)).await?;
        if closing {
            close_sent = true;
            break;
        }

        let response = tokio::select! {
            _ = cancel.cancelled() => break,
            response = app_to_ui_rx.recv() => response?,
        };

        if let Some(text) = present(&response, &estimator) {
            println!("{text}");
        }
    }

    if !close_sent {
        // The event loop may already be gone
        let _ = ui_to_app_tx.send(AppEvent::UiEvent(UiEvent::Close)).await;
    }

    tracing::debug!("[UI] Stopped");
    Ok(())
}
