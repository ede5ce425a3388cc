// Framework bootstrap for the client runtime.

use crate::domain::{KeyEvent, Surface};
use crate::frameworks::config::{self, ClientSettings, ConfigError};
use crate::interface_adapters::keyboard::spawn_stdin_keys;
use crate::interface_adapters::net::{ConnectionStats, NetError, connect, run_connection};
use crate::interface_adapters::protocol::codec_for;
use crate::interface_adapters::surface::CommandSurface;
use crate::use_cases::{GridRenderer, Session};

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Net(#[from] NetError),
}

fn init_runtime() {
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

/// Session wired from settings, with the empty grid already drawn.
pub fn build_session<S: Surface>(settings: &ClientSettings, surface: S) -> Session<S> {
    let mut renderer = GridRenderer::new(surface, settings.scale);
    renderer.reset();
    Session::new(
        codec_for(settings.schema),
        renderer,
        settings.greeting.clone(),
    )
}

/// Connects and drives one session to completion. No reconnect.
pub async fn run<S: Surface>(
    settings: &ClientSettings,
    surface: S,
    mut keys: mpsc::Receiver<KeyEvent>,
) -> Result<(Session<S>, ConnectionStats), ClientError> {
    let mut session = build_session(settings, surface);
    info!(
        url = %settings.server_url,
        schema = %settings.schema,
        send_interval_ms = settings.send_interval.as_secs_f64() * 1000.0,
        "connecting"
    );

    let socket = match connect(&settings.server_url).await {
        Ok(socket) => socket,
        Err(e) => {
            session.close();
            return Err(e.into());
        }
    };
    let (mut sink, mut stream) = socket.split();

    let stats = run_connection(
        &mut sink,
        &mut stream,
        &mut session,
        &mut keys,
        settings.send_interval,
    )
    .await?;

    Ok((session, stats))
}

pub async fn run_with_config() -> Result<ConnectionStats, ClientError> {
    init_runtime();

    let settings = ClientSettings::from_env()?;

    let (key_tx, key_rx) = mpsc::channel(config::KEY_CHANNEL_CAPACITY);
    if let Err(e) = spawn_stdin_keys(key_tx) {
        // Still useful as a passive viewer.
        warn!(error = %e, "failed to start key input");
    }

    let surface = CommandSurface::new(settings.surface_width, settings.surface_height);
    let (_session, stats) = run(&settings, surface, key_rx).await?;
    info!(
        snapshots_rendered = stats.snapshots_rendered,
        "connection finished"
    );
    Ok(stats)
}
