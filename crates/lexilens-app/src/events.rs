use kanal::{AsyncReceiver, AsyncSender};
use lexilens_core::{ClientStore, LookupClient};
use lexilens_types::{AppEvent, UiEvent};
use tokio_util::sync::CancellationToken;

pub mod lookup;
pub mod report;

use lookup::{handle_lookup, handle_recall};
use report::{handle_history, handle_quota};

/// Owns the lookup client; handles one UI request at a time
pub async fn event_loop<S: ClientStore>(
    mut client: LookupClient<S>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    app_to_ui_tx.send(AppEvent::BackendReady).await?;

    tracing::debug!("[EVENT_LOOP] Waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = ui_to_app_rx.recv() => match event {
                Ok(event) => event,
                Err(_) => {
                    tracing::debug!("[EVENT_LOOP] UI channel closed");
                    break;
                }
            },
        };

        tracing::debug!(
            "[EVENT_LOOP] Event received: {:?}",
            std::mem::discriminant(&event)
        );

        if !handle_events(&mut client, &app_to_ui_tx, event).await? {
            break;
        }
    }

    tracing::debug!("[EVENT_LOOP] Stopped");
    Ok(())
}

/// Returns false once the session should end
async fn handle_events<S: ClientStore>(
    client: &mut LookupClient<S>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<bool> {
    match event {
        AppEvent::UiEvent(UiEvent::Lookup(raw)) => {
            handle_lookup(client, raw, app_to_ui_tx).await?;
        }
        AppEvent::UiEvent(UiEvent::Recall(position)) => {
            handle_recall(client, position, app_to_ui_tx).await?;
        }
        AppEvent::UiEvent(UiEvent::ShowHistory) => {
            handle_history(client, app_to_ui_tx).await?;
        }
        AppEvent::UiEvent(UiEvent::ShowQuota) => {
            handle_quota(client, app_to_ui_tx).await?;
        }
        AppEvent::UiEvent(UiEvent::Close) => return Ok(false),
        AppEvent::ShowResult { .. }
        | AppEvent::ShowError(_)
        | AppEvent::ShowHistory(_)
        | AppEvent::ShowQuota { .. }
        | AppEvent::BackendReady => {
            // UI-only events
        }
    }

    Ok(true)
}
