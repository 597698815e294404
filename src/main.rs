mod api;
mod blockchain;
mod config;
mod error;
mod network;
mod transaction;

use actix_web::{App, HttpServer, middleware::Logger, web};
use clap::Parser;
use dotenvy::dotenv;
use log::info;

use api::AppState;
use blockchain::Blockchain;
use config::Config;
use network::PeerClient;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    let node_id = config.node_id();
    let peer_client = PeerClient::new(config.peer_timeout()).map_err(std::io::Error::other)?;

    info!(
        "⛓️ Starting ledger node {node_id} at http://{}:{}",
        config.host, config.port
    );

    let state = web::Data::new(AppState::new(
        Blockchain::new(node_id),
        peer_client,
        config.max_pow_attempts,
    ));

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
