use crate::config::Config;
use crate::session::SessionManager;
use crate::words::{GeminiWordSource, StaticWordSource, WordSource};
use crate::ws::accept_connection;
use anyhow::Context;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

mod api;
mod client;
mod config;
mod error;
mod game;
mod session;
mod time;
mod words;
mod ws;

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::try_init().ok();

    let config = Config::from_env()?;

    let words: Arc<dyn WordSource> = match &config.gemini_api_key {
        Some(key) => Arc::new(
            GeminiWordSource::new(key.clone(), config.gemini_model.clone(), config.word_timeout)
                .context("could not create the word generation client")?,
        ),
        None => {
            log::warn!("GEMINI_API_KEY is not set, using the built-in word list");
            Arc::new(StaticWordSource::default())
        }
    };
    log::info!("Generating word pairs with the {} source", words.name());

    let manager: &'static SessionManager = Box::leak(Box::new(SessionManager::new(words)));

    if let Some(api_port) = config.api_port {
        let listener = TcpListener::bind(SocketAddrV4::new(Ipv4Addr::LOCALHOST, api_port))
            .await
            .with_context(|| format!("could not bind API to port {}", api_port))?;
        log::info!("API listening on: {:?}", listener.local_addr()?);
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, api::make_router(manager)).await {
                log::error!("API server failed: {}", err);
            }
        });
    }

    let session_ttl = config.session_ttl;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            manager.purge_games(session_ttl);
        }
    });

    let addr = SocketAddrV4::new(Ipv4Addr::LOCALHOST, config.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind to address {:?}", addr))?;
    log::info!("Listening on: {:?}", addr);

    while let Ok((stream, _)) = listener.accept().await {
        tokio::spawn(accept_connection(stream, manager));
    }

    Ok(())
}
