use chrono::Utc;
use kanal::AsyncSender;
use lexilens_core::{ClientStore, LookupClient, LookupError};
use lexilens_types::AppEvent;

pub async fn handle_lookup<S: ClientStore>(
    client: &mut LookupClient<S>,
    raw: String,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let event = match client.lookup(&raw, Utc::now()).await {
        Ok(result) => AppEvent::ShowResult {
            query: raw.trim().to_string(),
            result,
        },
        Err(LookupError::Invalid(reason)) => {
            tracing::debug!("Rejected input {raw:?}: {reason}");
            AppEvent::ShowError(reason.to_string())
        }
        Err(e) => AppEvent::ShowError(e.to_string()),
    };

    app_to_ui_tx.send(event).await?;
    Ok(())
}

/// Look up the `position`-th history entry (1-based) again
pub async fn handle_recall<S: ClientStore>(
    client: &mut LookupClient<S>,
    position: usize,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let entry = position
        .checked_sub(1)
        .and_then(|i| client.history().get(i))
        .map(|q| q.as_str().to_string());

    match entry {
        Some(raw) => handle_lookup(client, raw, app_to_ui_tx).await,
        None => {
            app_to_ui_tx
                .send(AppEvent::ShowError(format!("No history entry {position}")))
                .await?;
            Ok(())
        }
    }
}
