//! ERP chat - terminal client for the ERP assistant
//!
//! Keeps a conversation transcript, sends each message to the assistant
//! backend over HTTP, and renders replies as text, tables and batch panels.

mod config;
mod conversation;
mod render;
mod repl;
mod state_machine;
mod transcript;
mod transport;

use config::ClientConfig;
use conversation::ConversationStore;
use state_machine::ConvContext;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transport::{HttpTransport, LoggingTransport};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging; stdout belongs to the transcript
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "erp_chat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Configuration
    let config = ClientConfig::from_env();
    tracing::info!(
        api_url = %config.api_url,
        timeout_secs = config.timeout.as_secs(),
        welcome = config.welcome,
        "Configuration loaded"
    );

    let transport = LoggingTransport::new(HttpTransport::new(&config)?);
    let context = ConvContext::generate();
    let store = if config.welcome {
        ConversationStore::with_welcome(context, transport)
    } else {
        ConversationStore::new(context, transport)
    };

    repl::run(store, BufReader::new(tokio::io::stdin())).await?;

    tracing::info!("Session ended");
    Ok(())
}
