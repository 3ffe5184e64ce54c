use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod controller;
mod events;
mod profile;
mod render;
mod server;
mod state;
mod ui;

#[cfg(test)]
mod tests;

#[derive(Parser)]
#[command(name = "lexilens", about = "Explore words with a generative-text backend")]
struct Cli {
    /// Config profile to load
    #[arg(long, global = true, default_value = "main")]
    profile: String,
    /// Directory for client-held state (history, quota)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Log filter, overridden by RUST_LOG
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve GET /lookup?word=<term> over HTTP
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Look up a word or short phrase
    Define {
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive session
    Repl,
    /// Show recent lookups, most recent first
    History,
    /// Show remaining lookups in the current window
    Quota,
    /// Clear client-held state; both history and quota when no flag is given
    Reset {
        #[arg(long)]
        history: bool,
        #[arg(long)]
        quota: bool,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing .env is normal
    let _ = dotenvy::dotenv();

    init_tracing(&cli.log_level, cli.log_json);

    profile::init_user_config()?;
    let mut config = profile::load_user_profile(&cli.profile)?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            server::serve(config).await
        }
        Command::Define { words, json } => {
            commands::define(&config, &cli.profile, &words.join(" "), json).await
        }
        Command::Repl => commands::repl(config, &cli.profile).await,
        Command::History => commands::history(&config, &cli.profile),
        Command::Quota => commands::quota(&config, &cli.profile),
        Command::Reset { history, quota } => {
            let both = !history && !quota;
            commands::reset(&config, &cli.profile, history || both, quota || both)
        }
    }
}
