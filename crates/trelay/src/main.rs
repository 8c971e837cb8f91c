use std::{net::SocketAddr, sync::Arc};

use teloxide::Bot;
use tokio_util::sync::CancellationToken;

use trelay_core::{config::Config, notify::NotificationSink, port::MessagingPort};
use trelay_http::{build_router, AppState};
use trelay_telegram::{commands, TelegramRelay};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    trelay_core::logging::init("trelay");

    let cfg = Arc::new(Config::load()?);
    let bot = Bot::new(cfg.bot_token.clone());

    let relay = TelegramRelay::new(bot.clone());
    let port: Arc<dyn MessagingPort> = Arc::new(relay);
    let sink = Arc::new(NotificationSink::new(
        port.clone(),
        cfg.log_destination.clone(),
    ));

    let app = build_router(AppState { port, sink });

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        "relay listening on {addr}, public base {}",
        cfg.public_base_url
    );

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        });
    }

    let http = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await
        })
    };

    let poller = tokio::spawn(commands::run_polling(cfg, bot));

    tokio::select! {
        res = http => res??,
        res = poller => res??,
        _ = shutdown.cancelled() => {}
    }

    Ok(())
}
