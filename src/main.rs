//! Terminal chat client
//!
//! Entry point: drives the chat widget from stdin and renders to stdout.
//! `/new` starts a new chat, `/cancel` drops the pending reply, `/quit` exits.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use chat_widget::config::AppConfig;
use chat_widget::surface::TerminalSurface;
use chat_widget::transport::HttpTransport;
use chat_widget::widget::{ChatWidget, WidgetSettings, spawn_widget};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    // Initialize tracing (M-LOG-STRUCTURED). Logs go to stderr so the
    // transcript on stdout stays readable.
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    info!(
        name: "config.loaded",
        base_url = %config.service.base_url,
        timeout_secs = config.service.request_timeout_secs,
        avatar = ?config.content.avatar_path,
        "Chat configuration loaded"
    );

    let transport =
        HttpTransport::from_config(&config.service).context("Invalid chat service URL")?;
    let surface =
        TerminalSurface::new(std::io::stdout()).with_avatar(config.content.avatar_path.clone());

    let mut widget = ChatWidget::new(
        Arc::new(transport),
        surface,
        WidgetSettings::from_config(&config),
    );
    widget.mount();

    let (handle, task) = spawn_widget(widget);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = line.trim();
        match command {
            "/quit" => break,
            "/new" => {
                handle.new_chat();
            }
            "/cancel" => {
                handle.cancel();
            }
            _ => {
                handle.submit(command);
            }
        }
    }

    handle.shutdown();
    task.await.context("Widget task panicked")?;
    Ok(())
}
