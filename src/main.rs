use clap::Parser;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use sv::config::{AppState, Cli, Config};
use sv::error::StartupError;
use sv::routing::{self, RouteTable};
use sv::{logger, server};

fn main() -> ExitCode {
    // Help, version and usage errors exit inside clap
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), StartupError> {
    let cfg = Config::load(cli)?;
    logger::init(&cfg).map_err(StartupError::Logger)?;
    let addr = cfg.get_socket_addr()?;

    // Every route is registered, and in eager mode loaded, before the listener exists
    let routes = routing::build_route_table(&cfg)?;

    // Create the Tokio runtime, sizing the worker pool from config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers.filter(|w| *w > 0) {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build().map_err(StartupError::Runtime)?;

    runtime.block_on(async_main(cfg, routes, addr))
}

async fn async_main(cfg: Config, routes: RouteTable, addr: SocketAddr) -> Result<(), StartupError> {
    let listener =
        server::create_listener(addr).map_err(|source| StartupError::Bind { addr, source })?;

    logger::log_server_start(&addr, &cfg);
    let state = Arc::new(AppState::new(cfg, routes));

    server::start_server_loop(listener, state, server::shutdown_signal()).await;
    Ok(())
}
