use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::blockchain::{MINING_REWARD, REWARD_SENDER};

/// A value transfer waiting in the pending pool or embedded in a block.
/// Amounts are not checked against any balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: Number, // integer or fractional, kept as received
}

impl Transaction {
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: impl Into<Number>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount: amount.into(),
        }
    }

    /// Mining reward paid to `miner` (sender "0").
    pub fn reward(miner: impl Into<String>) -> Self {
        Self::new(REWARD_SENDER, miner, MINING_REWARD)
    }
}
