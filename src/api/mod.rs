mod chain;
mod health;
pub mod models;
mod nodes;
mod tx;

use actix_web::web::{self, JsonConfig, ServiceConfig};

pub use models::AppState;

use crate::error::ApiError;

/// Undecodable JSON bodies are answered with the same error shape as every
/// other rejected request.
fn json_config() -> JsonConfig {
    JsonConfig::default().error_handler(|err, _req| ApiError::BadPayload(err.to_string()).into())
}

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(json_config())
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::validate_chain)
            .service(chain::mine_block)
            .service(tx::post_transaction)
            .service(tx::get_pending)
            .service(nodes::list_nodes)
            .service(nodes::register_nodes)
            .service(nodes::resolve_conflicts),
    );
}
