//! In-memory CRUD demo server
//!
//! A throwaway REST backend for trying the crudgrid remote source against:
//! five `/users` routes over a seeded in-memory collection. No auth, no
//! validation, nothing persists across restarts.

mod service;
mod store;

use std::convert::Infallible;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use tokio::net::TcpListener;

use crate::store::UserStore;

const PORT: u16 = 3000;

#[tokio::main]
async fn main() {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .expect("Failed to initialize logger");

    let store = Arc::new(UserStore::seeded());

    let listener = match TcpListener::bind(("127.0.0.1", PORT)).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Failed to bind port {}: {}", PORT, e);
            return;
        }
    };
    log::info!("CRUD server running at http://localhost:{}", PORT);

    loop {
        let (stream, _) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                log::warn!("Failed to accept connection: {}", e);
                continue;
            }
        };

        let store = store.clone();
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| {
                let store = store.clone();
                async move { Ok::<_, Infallible>(service::handle(req, &store).await) }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                log::debug!("Connection error: {}", e);
            }
        });
    }
}
