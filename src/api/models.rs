use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::sync::{Mutex, MutexGuard};

use crate::blockchain::{Block, Blockchain};
use crate::error::ApiError;
use crate::network::PeerClient;
use crate::transaction::Transaction;

/// Shared application state: the single ledger engine behind one lock, so the
/// chain, pending pool and peer set always change together.
pub struct AppState {
    pub blockchain: Mutex<Blockchain>,
    pub peer_client: PeerClient,
    pub max_pow_attempts: Option<u64>,
}

impl AppState {
    pub fn new(
        blockchain: Blockchain,
        peer_client: PeerClient,
        max_pow_attempts: Option<u64>,
    ) -> Self {
        Self {
            blockchain: Mutex::new(blockchain),
            peer_client,
            max_pow_attempts,
        }
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, Blockchain>, ApiError> {
        self.blockchain
            .lock()
            .map_err(|_| ApiError::Internal("ledger lock poisoned".into()))
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub chain: &'a [Block],
    pub length: usize,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl From<Block> for MineResponse {
    fn from(block: Block) -> Self {
        Self {
            message: "New Block Forged",
            index: block.index,
            transactions: block.transactions,
            proof: block.proof,
            previous_hash: block.previous_hash,
        }
    }
}

/* ---------- TX API Models ---------- */

/// Body of a transaction submission; every field is required.
#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub amount: Option<Number>,
}

impl NewTxRequest {
    pub fn validate(self) -> Result<Transaction, ApiError> {
        match (self.sender, self.recipient, self.amount) {
            (Some(sender), Some(recipient), Some(amount)) => {
                Ok(Transaction::new(sender, recipient, amount))
            }
            (sender, recipient, amount) => {
                let mut missing = Vec::new();
                if sender.is_none() {
                    missing.push("sender");
                }
                if recipient.is_none() {
                    missing.push("recipient");
                }
                if amount.is_none() {
                    missing.push("amount");
                }
                Err(ApiError::MissingFields(missing))
            }
        }
    }
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct PendingResponse<'a> {
    pub size: usize,
    pub transactions: &'a [Transaction],
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

impl RegisterNodesRequest {
    pub fn validate(self) -> Result<Vec<String>, ApiError> {
        self.nodes
            .filter(|nodes| !nodes.is_empty())
            .ok_or(ApiError::MissingNodes)
    }
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: &'static str,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct NodesResponse {
    pub nodes: Vec<String>,
    pub length: usize,
}

#[derive(Serialize)]
pub struct ResolveResponse<'a> {
    pub message: &'static str,
    pub replaced: bool,
    pub chain: &'a [Block],
    pub length: usize,
}
