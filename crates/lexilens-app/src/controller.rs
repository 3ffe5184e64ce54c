use kanal::{AsyncReceiver, AsyncSender};
use lexilens_core::{ClientStore, CostEstimator, LookupClient};
use lexilens_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::ui::{spawn_stdin_reader, ui_loop};

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(16),
            ui_to_app: kanal::bounded_async(16),
        }
    }
}

/// Interactive session controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new() -> Self {
        Self {
            channels: ChannelSet::new(),
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks<S: ClientStore + 'static>(
        &self,
        client: LookupClient<S>,
        estimator: CostEstimator,
    ) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(event_loop(
            client,
            self.channels.ui_to_app.1.clone(),
            self.channels.app_to_ui.0.clone(),
            self.cancel_token.child_token(),
        ));

        // Terminal UI
        tasks.spawn(ui_loop(
            spawn_stdin_reader(),
            self.channels.app_to_ui.1.clone(),
            self.channels.ui_to_app.0.clone(),
            estimator,
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
