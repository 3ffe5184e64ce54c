use anyhow::bail;
use chrono::Utc;
use lexilens_config::Config;
use tokio::signal;

use crate::controller::AppController;
use crate::render;
use crate::state;

pub async fn define(config: &Config, profile: &str, raw: &str, json: bool) -> anyhow::Result<()> {
    let backend = state::build_backend(&config.backend)?;
    state::warn_if_no_api_key(config, backend.as_ref());
    let mut client = state::open_client(config, profile, backend)?;
    let estimator = state::cost_estimator(config);

    // Only the Display text reaches the user; details are already logged
    let result = match client.lookup(raw, Utc::now()).await {
        Ok(result) => result,
        Err(e) => bail!("{e}"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render::render_result(raw.trim(), &result, &estimator));
    }

    Ok(())
}

pub async fn repl(config: Config, profile: &str) -> anyhow::Result<()> {
    let backend = state::build_backend(&config.backend)?;
    state::warn_if_no_api_key(&config, backend.as_ref());
    let client = state::open_client(&config, profile, backend)?;
    let estimator = state::cost_estimator(&config);

    let controller = AppController::new();
    let mut tasks = controller.spawn_tasks(client, estimator);

    loop {
        tokio::select! {
            result = signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::error!("failed to listen for ctrl+c: {e}");
                }
                tracing::info!("Shutdown requested");
                controller.shutdown();
            }
            joined = tasks.join_next() => match joined {
                None => break,
                Some(Ok(Ok(()))) => {}
                Some(Ok(Err(e))) => {
                    tracing::error!("session task failed: {e}");
                    controller.shutdown();
                }
                Some(Err(e)) => {
                    tracing::error!("session task panicked: {e}");
                    controller.shutdown();
                }
            },
        }
    }

    Ok(())
}

pub fn history(config: &Config, profile: &str) -> anyhow::Result<()> {
    let backend = state::build_backend(&config.backend)?;
    let client = state::open_client(config, profile, backend)?;

    let entries: Vec<String> = client
        .history()
        .iter()
        .map(|q| q.as_str().to_string())
        .collect();
    println!("{}", render::render_history(&entries));
    Ok(())
}

pub fn quota(config: &Config, profile: &str) -> anyhow::Result<()> {
    let backend = state::build_backend(&config.backend)?;
    let client = state::open_client(config, profile, backend)?;

    let now = Utc::now();
    let quota = client.quota();
    let resets_at = quota.window_expiry(now).map(|at| at.to_rfc3339());
    println!(
        "{}",
        render::render_quota(quota.remaining(now), quota.limit(), resets_at.as_deref())
    );
    Ok(())
}

pub fn reset(config: &Config, profile: &str, history: bool, quota: bool) -> anyhow::Result<()> {
    let backend = state::build_backend(&config.backend)?;
    let mut client = state::open_client(config, profile, backend)?;

    if history {
        client.reset_history()?;
        println!("History cleared");
    }
    if quota {
        client.reset_quota(Utc::now())?;
        println!("Quota reset");
    }
    Ok(())
}
