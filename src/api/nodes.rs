use actix_web::{HttpResponse, get, post, web};
use log::{debug, info};

use super::models::{
    AppState, NodesResponse, RegisterNodesRequest, RegisterNodesResponse, ResolveResponse,
};
use crate::error::ApiError;
use crate::network::normalize_address;

/// Register peers. The whole list is checked before any of it is stored.
#[post("/nodes/register/")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> Result<HttpResponse, ApiError> {
    let addresses = body.into_inner().validate()?;
    let nodes = addresses
        .iter()
        .map(|a| normalize_address(a))
        .collect::<Result<Vec<_>, _>>()?;

    let mut bc = state.lock()?;
    for node in &nodes {
        bc.register_node(node)?;
    }
    info!("registered {} node(s), {} known", nodes.len(), bc.peers().len());

    Ok(HttpResponse::Created().json(RegisterNodesResponse {
        message: "New nodes have been added",
        total_nodes: bc.peers().to_vec(),
    }))
}

/// List known peers.
#[get("/nodes/")]
pub async fn list_nodes(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let bc = state.lock()?;
    let nodes = bc.peers().to_vec();
    Ok(HttpResponse::Ok().json(NodesResponse {
        length: nodes.len(),
        nodes,
    }))
}

/// Consensus: fetch every peer's chain and adopt the longest valid one.
/// The ledger lock is released while peers are queried.
#[get("/nodes/resolve/")]
pub async fn resolve_conflicts(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let peers = {
        let bc = state.lock()?;
        if bc.peers().is_empty() {
            debug!("RESOLVE - no peers registered");
        }
        bc.peers().to_vec()
    };
    let candidates = state.peer_client.fetch_all(&peers).await;

    let mut bc = state.lock()?;
    let replaced = bc.resolve_conflicts(candidates);
    let message = if replaced {
        "Our chain was replaced"
    } else {
        "Our chain is authoritative"
    };
    info!("RESOLVE - {message} (length={})", bc.len());

    Ok(HttpResponse::Ok().json(ResolveResponse {
        message,
        replaced,
        chain: bc.chain(),
        length: bc.len(),
    }))
}
