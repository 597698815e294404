use actix_web::{HttpResponse, get, web};
use log::info;

use super::models::{AppState, ChainResponse, MineResponse, ValidateResponse};
use crate::error::ApiError;

/// Get the full chain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let bc = state.lock()?;
    Ok(HttpResponse::Ok().json(ChainResponse {
        chain: bc.chain(),
        length: bc.len(),
    }))
}

/// Validate the whole local chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let bc = state.lock()?;
    Ok(HttpResponse::Ok().json(ValidateResponse {
        valid: bc.is_valid(),
        length: bc.len(),
    }))
}

/// Mine a new block from the pending pool, paying the reward to this node.
/// The search runs on the blocking pool while holding the ledger lock.
#[get("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let block = web::block(move || {
        let mut bc = state.lock()?;
        match state.max_pow_attempts {
            Some(max) => bc
                .mine_bounded(max)
                .cloned()
                .ok_or(ApiError::MiningExhausted(max)),
            None => Ok(bc.mine().clone()),
        }
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    info!(
        "MINER - sealed block #{} (proof={}, previous_hash={})",
        block.index, block.proof, block.previous_hash
    );
    Ok(HttpResponse::Ok().json(MineResponse::from(block)))
}
