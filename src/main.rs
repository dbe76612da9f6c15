use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod resolver;
mod server;

#[cfg(test)]
mod test_support;

use error::StartupError;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load().map_err(StartupError::from)?;
    logger::init(&cfg).map_err(StartupError::Logger)?;

    // Worker count follows config, default is one per CPU core
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.performance.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build().map_err(StartupError::Runtime)?;

    runtime.block_on(async_main(cfg)).map_err(|e| {
        logger::log_error(&e.to_string());
        e.into()
    })
}

async fn async_main(cfg: config::Config) -> Result<(), StartupError> {
    // Everything static is validated before the port is taken
    let client = resolver::build_client(&cfg.upstream)?;
    let resolver = resolver::LinkResolver::new(
        handler::SOURCE_PAGE_URL,
        handler::PDF_LINK_PATTERN,
        client,
    )?;
    let router = handler::build_router(Arc::new(resolver));

    let addr = server::listen_addr();
    let listener =
        server::create_listener(addr).map_err(|source| StartupError::Bind { addr, source })?;

    logger::log_server_start(&addr, &cfg);
    router.log_routes();

    let state = Arc::new(config::AppState::new(cfg, router));
    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    server::start_server_loop(
        listener,
        state,
        Arc::new(AtomicUsize::new(0)),
        Arc::clone(&signals.shutdown),
    )
    .await;

    Ok(())
}
