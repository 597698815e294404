use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A single block in the chain holding the transactions pending at mining time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix timestamp (UTC)
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    /// Create the genesis block (index 1, fixed proof and previous hash).
    pub fn genesis() -> Self {
        Self::new(1, Vec::new(), GENESIS_PROOF, GENESIS_PREVIOUS_HASH.to_string())
    }

    /// Create a block stamped with the current time.
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Self {
        Self {
            index,
            timestamp: Utc::now().timestamp(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// Canonical encoding used as the hash preimage: compact JSON with
    /// object keys in lexicographic order at every level.
    ///
    /// Keys are listed here already sorted, so the output is the same whether
    /// `serde_json` maps keep insertion order or sort.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let transactions: Vec<serde_json::Value> = self
            .transactions
            .iter()
            .map(|tx| {
                serde_json::json!({
                    "amount": tx.amount,
                    "recipient": tx.recipient,
                    "sender": tx.sender,
                })
            })
            .collect();
        let value = serde_json::json!({
            "index": self.index,
            "previous_hash": self.previous_hash,
            "proof": self.proof,
            "timestamp": self.timestamp,
            "transactions": transactions,
        });
        value.to_string().into_bytes()
    }

    /// SHA-256 of the canonical encoding, hex encoded.
    pub fn hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_bytes());
        hex::encode(hasher.finalize())
    }
}
