use chrono::Utc;
use kanal::AsyncSender;
use lexilens_core::{ClientStore, LookupClient};
use lexilens_types::AppEvent;

pub async fn handle_history<S: ClientStore>(
    client: &LookupClient<S>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let entries = client
        .history()
        .iter()
        .map(|q| q.as_str().to_string())
        .collect();

    app_to_ui_tx.send(AppEvent::ShowHistory(entries)).await?;
    Ok(())
}

pub async fn handle_quota<S: ClientStore>(
    client: &LookupClient<S>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let now = Utc::now();
    let quota = client.quota();

    app_to_ui_tx
        .send(AppEvent::ShowQuota {
            remaining: quota.remaining(now),
            limit: quota.limit(),
            resets_at: quota.window_expiry(now).map(|at| at.to_rfc3339()),
        })
        .await?;
    Ok(())
}
