use actix_web::{HttpResponse, get, post, web};
use log::info;

use super::models::{AppState, NewTxRequest, NewTxResponse, PendingResponse};
use crate::error::ApiError;

/// Submit a new transaction into the pending pool.
#[post("/transactions/new/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> Result<HttpResponse, ApiError> {
    let tx = body.into_inner().validate()?;

    let index = {
        let mut bc = state.lock()?;
        bc.new_transaction(tx.sender.clone(), tx.recipient.clone(), tx.amount.clone())
    };

    info!(
        "POST /transactions/new/ - {} -> {} ({}) queued for block {}",
        tx.sender, tx.recipient, tx.amount, index
    );
    Ok(HttpResponse::Created().json(NewTxResponse {
        message: format!("Transaction will be added to Block {index}"),
        index,
    }))
}

/// List the pending pool in arrival order.
#[get("/transactions/pending/")]
pub async fn get_pending(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let bc = state.lock()?;
    Ok(HttpResponse::Ok().json(PendingResponse {
        size: bc.pending().len(),
        transactions: bc.pending(),
    }))
}
