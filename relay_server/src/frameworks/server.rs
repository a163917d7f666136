// Framework bootstrap for the relay server runtime.

use crate::domain::SystemInstruction;
use crate::frameworks::config::RelayConfig;
use crate::interface_adapters::clients::GeminiClient;
use crate::interface_adapters::routes;
use crate::interface_adapters::state::AppState;
use std::io::Result;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener, config: RelayConfig) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state(config)?;

    // Start the web server with the HTTP routes wired up.
    let app = routes::app(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking.
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    // A missing credential is fatal and must surface before the port is bound.
    let config = RelayConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "fatal configuration error");
        std::io::Error::other(e)
    })?;

    let address = SocketAddr::new(config.host, config.port);

    // Bind TCP listener with error handling.
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    let bound = listener.local_addr()?;
    tracing::info!(url = %ready_url(bound), "server is running; solver is ready");

    run(listener, config).await
}

// Browsable URL for the bound socket; wildcard binds are reachable on loopback.
fn ready_url(bound: SocketAddr) -> String {
    let mut shown = bound;
    if bound.ip().is_unspecified() {
        shown.set_ip(IpAddr::from([127, 0, 0, 1]));
    }
    format!("http://{shown}")
}

fn build_state(config: RelayConfig) -> Result<Arc<AppState>> {
    let client = GeminiClient::new(
        &config.api_base_url,
        &config.model,
        config.api_key.expose(),
    )
    .map_err(|e| std::io::Error::other(format!("failed to initialize gemini client: {e}")))?;
    tracing::debug!(
        api_base_url = %config.api_base_url,
        model = %config.model,
        system_instruction = config.system_instruction.is_some(),
        static_dir = %config.static_dir.display(),
        "gemini client configured"
    );

    Ok(Arc::new(AppState {
        provider: Arc::new(client),
        system_instruction: config.system_instruction.map(SystemInstruction::new),
        static_dir: config.static_dir,
    }))
}
