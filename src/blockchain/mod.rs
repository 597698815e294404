pub mod block;
pub mod model;
pub mod pow;

pub use block::Block;
pub use model::Blockchain;
pub use pow::{proof_of_work, proof_of_work_bounded, valid_proof};

/// Proof-of-Work difficulty (number of leading zero hex digits).
pub const DIFFICULTY: usize = 4;

/// Fixed proof carried by the genesis block.
pub const GENESIS_PROOF: u64 = 100;

/// Sentinel `previous_hash` of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Sender id used for mining reward transactions.
pub const REWARD_SENDER: &str = "0";

/// Reward paid to the miner of each block.
pub const MINING_REWARD: u64 = 1;
