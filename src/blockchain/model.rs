use log::{debug, info};
use serde_json::Number;

use super::{Block, proof_of_work, proof_of_work_bounded, valid_proof};
use crate::error::LedgerError;
use crate::network::PeerRegistry;
use crate::transaction::Transaction;

/// Validate a whole chain: every block must link to the hash of its
/// predecessor and carry a proof valid against the predecessor's proof.
/// A chain holding only genesis is valid; an empty one is not.
pub fn is_valid_chain(chain: &[Block]) -> bool {
    if chain.is_empty() {
        return false;
    }

    for pair in chain.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);

        // Check linkage
        if current.previous_hash != prev.hash() {
            return false;
        }

        // Check proof against the previous block
        if !valid_proof(prev.proof, current.proof) {
            return false;
        }
    }

    true
}

/// In-memory ledger: the chain, the pending pool and the known peers.
#[derive(Debug)]
pub struct Blockchain {
    chain: Vec<Block>,
    current_transactions: Vec<Transaction>,
    peers: PeerRegistry,
    node_id: String,
}

impl Blockchain {
    /// Initialize a new ledger with a genesis block and an empty pool.
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            chain: vec![Block::genesis()],
            current_transactions: Vec::new(),
            peers: PeerRegistry::new(),
            node_id: node_id.into(),
        }
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        // The chain is never empty: it starts at genesis and is only ever
        // replaced by a valid (hence non-empty) chain.
        &self.chain[self.chain.len() - 1]
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.current_transactions
    }

    pub fn peers(&self) -> &PeerRegistry {
        &self.peers
    }

    /// Queue a transaction; returns the index of the block that will hold it.
    pub fn new_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: impl Into<Number>,
    ) -> u64 {
        self.push_transaction(Transaction::new(sender, recipient, amount))
    }

    fn push_transaction(&mut self, tx: Transaction) -> u64 {
        self.current_transactions.push(tx);
        debug!("pool size now {}", self.current_transactions.len());
        self.last_block().index + 1
    }

    /// Forge a block from the whole pending pool and append it.
    /// `previous_hash` defaults to the hash of the current last block.
    pub fn new_block(&mut self, proof: u64, previous_hash: Option<String>) -> &Block {
        let previous_hash = previous_hash.unwrap_or_else(|| self.last_block().hash());
        let index = self.last_block().index + 1;
        let transactions = std::mem::take(&mut self.current_transactions);

        self.chain
            .push(Block::new(index, transactions, proof, previous_hash));
        self.last_block()
    }

    /// Mine the next block: solve the puzzle, queue the reward, then forge.
    pub fn mine(&mut self) -> &Block {
        let proof = proof_of_work(self.last_block().proof);
        self.forge(proof)
    }

    /// Like [`Blockchain::mine`] but gives up after `max_attempts` candidate
    /// proofs, leaving the ledger untouched.
    pub fn mine_bounded(&mut self, max_attempts: u64) -> Option<&Block> {
        let proof = proof_of_work_bounded(self.last_block().proof, max_attempts)?;
        Some(self.forge(proof))
    }

    fn forge(&mut self, proof: u64) -> &Block {
        let previous_hash = self.last_block().hash();
        // The reward must be queued before the block is built so it lands in it.
        let reward = Transaction::reward(self.node_id.clone());
        self.push_transaction(reward);

        let block = self.new_block(proof, Some(previous_hash));
        info!(
            "forged block #{} (proof={}, txs={})",
            block.index,
            block.proof,
            block.transactions.len()
        );
        block
    }

    /// Self-check of the local chain.
    pub fn is_valid(&self) -> bool {
        is_valid_chain(&self.chain)
    }

    /// Register a peer address after normalizing it.
    pub fn register_node(&mut self, address: &str) -> Result<String, LedgerError> {
        self.peers.register(address)
    }

    /// Longest-valid-chain rule. Replaces the local chain with the longest
    /// candidate that is strictly longer than it and valid; returns whether
    /// the chain was replaced. The pending pool is kept.
    pub fn resolve_conflicts<I, P>(&mut self, peer_chains: I) -> bool
    where
        I: IntoIterator<Item = (P, Vec<Block>)>,
        P: AsRef<str>,
    {
        let mut max_length = self.chain.len();
        let mut new_chain: Option<Vec<Block>> = None;

        for (peer, candidate) in peer_chains {
            let length = candidate.len();
            if length <= max_length {
                debug!("peer {} chain not longer ({length})", peer.as_ref());
                continue;
            }
            if !is_valid_chain(&candidate) {
                debug!("peer {} chain rejected: invalid", peer.as_ref());
                continue;
            }
            max_length = length;
            new_chain = Some(candidate);
        }

        match new_chain {
            Some(chain) => {
                info!(
                    "chain replaced: {} -> {} blocks",
                    self.chain.len(),
                    chain.len()
                );
                self.chain = chain;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};

    fn mined(n: usize, node: &str) -> Blockchain {
        let mut bc = Blockchain::new(node);
        for _ in 0..n {
            bc.mine();
        }
        bc
    }

    #[test]
    fn starts_with_genesis_only() {
        let bc = Blockchain::new("me");
        assert_eq!(bc.len(), 1);
        let genesis = bc.last_block();
        assert_eq!(genesis.index, 1);
        assert_eq!(genesis.proof, GENESIS_PROOF);
        assert_eq!(genesis.previous_hash, GENESIS_PREVIOUS_HASH);
        assert!(bc.pending().is_empty());
        assert!(bc.is_valid());
    }

    #[test]
    fn new_transaction_returns_next_index() {
        let mut bc = Blockchain::new("me");
        assert_eq!(bc.new_transaction("A", "B", 10), 2);
        assert_eq!(bc.new_transaction("B", "C", -3), 2);
        let fractional = Number::from_f64(0.25).unwrap();
        assert_eq!(bc.new_transaction("C", "D", fractional.clone()), 2);
        assert_eq!(bc.pending()[2].amount, fractional);
        assert_eq!(bc.pending().len(), 3);
    }

    #[test]
    fn new_block_drains_pool_in_order() {
        let mut bc = Blockchain::new("me");
        bc.new_transaction("A", "B", 1);
        bc.new_transaction("C", "D", 2);
        let before = bc.pending().to_vec();
        let expected_prev = bc.last_block().hash();

        let block = bc.new_block(12345, None).clone();
        assert_eq!(block.index, 2);
        assert_eq!(block.transactions, before);
        assert_eq!(block.previous_hash, expected_prev);
        assert!(bc.pending().is_empty());
    }

    #[test]
    fn mine_includes_reward_after_pending() {
        let mut bc = Blockchain::new("miner-1");
        assert_eq!(bc.new_transaction("A", "B", 10), 2);

        let block = bc.mine().clone();
        assert_eq!(block.index, 2);
        assert_eq!(
            block.transactions,
            vec![
                Transaction::new("A", "B", 10),
                Transaction::new("0", "miner-1", 1),
            ]
        );
        assert_eq!(block.transactions[1].sender, crate::blockchain::REWARD_SENDER);
        assert!(is_valid_chain(bc.chain()));
    }

    #[test]
    fn mining_is_gapless_and_linked() {
        let bc = mined(3, "me");
        let indexes: Vec<u64> = bc.chain().iter().map(|b| b.index).collect();
        assert_eq!(indexes, vec![1, 2, 3, 4]);
        for pair in bc.chain().windows(2) {
            assert_eq!(pair[1].previous_hash, pair[0].hash());
            assert!(valid_proof(pair[0].proof, pair[1].proof));
        }
    }

    #[test]
    fn mine_bounded_gives_up_without_mutation() {
        let mut bc = Blockchain::new("me");
        bc.new_transaction("A", "B", 1);
        assert!(bc.mine_bounded(10).is_none());
        assert_eq!(bc.len(), 1);
        assert_eq!(bc.pending().len(), 1);

        let block = bc.mine_bounded(1_000_000).cloned();
        assert_eq!(block.map(|b| b.proof), Some(35293));
    }

    #[test]
    fn tampering_breaks_validity() {
        let mut bc = Blockchain::new("me");
        bc.new_transaction("A", "B", 10);
        bc.mine();
        bc.mine();
        assert!(bc.is_valid());

        bc.chain[1].transactions[0].recipient = "X".into();
        assert!(!bc.is_valid());
    }

    #[test]
    fn bad_proof_breaks_validity() {
        let mut bc = mined(1, "me");
        bc.chain[1].proof += 1;
        assert!(!bc.is_valid());
    }

    #[test]
    fn empty_chain_is_invalid() {
        assert!(!is_valid_chain(&[]));
    }

    #[test]
    fn longer_valid_peer_chain_replaces_local() {
        let mut local = Blockchain::new("me");
        local.new_transaction("A", "B", 10);
        local.mine();
        assert_eq!(local.len(), 2);

        let peer = mined(2, "peer");
        let replaced = local.resolve_conflicts(vec![("peer:5000", peer.chain().to_vec())]);
        assert!(replaced);
        assert_eq!(local.len(), 3);
        assert_eq!(local.chain(), peer.chain());
    }

    #[test]
    fn shorter_or_equal_peer_chain_is_ignored() {
        let mut local = mined(2, "me");
        let snapshot = local.chain().to_vec();

        let genesis_only = Blockchain::new("peer");
        let equal = mined(2, "peer");
        let replaced = local.resolve_conflicts(vec![
            ("a", genesis_only.chain().to_vec()),
            ("b", equal.chain().to_vec()),
        ]);
        assert!(!replaced);
        assert_eq!(local.chain(), snapshot.as_slice());
    }

    #[test]
    fn invalid_longer_chain_is_excluded() {
        let mut local = Blockchain::new("me");
        let mut forged = mined(3, "peer");
        forged.chain[2].transactions[0].amount = 1_000.into();

        assert!(!local.resolve_conflicts(vec![("evil", forged.chain().to_vec())]));
        assert_eq!(local.len(), 1);
    }

    #[test]
    fn longest_candidate_wins_regardless_of_order() {
        let two = mined(1, "two").chain().to_vec();
        let four = mined(3, "four").chain().to_vec();
        let three = mined(2, "three").chain().to_vec();

        let mut local = Blockchain::new("me");
        assert!(local.resolve_conflicts(vec![
            ("two", two.clone()),
            ("four", four.clone()),
            ("three", three.clone()),
        ]));
        assert_eq!(local.chain(), four.as_slice());

        let mut other = Blockchain::new("me");
        assert!(other.resolve_conflicts(vec![
            ("three", three),
            ("four", four.clone()),
            ("two", two),
        ]));
        assert_eq!(other.chain(), four.as_slice());
    }

    #[test]
    fn first_of_equally_long_candidates_wins() {
        let first = mined(2, "first").chain().to_vec();
        let second = mined(2, "second").chain().to_vec();

        let mut local = Blockchain::new("me");
        assert!(local.resolve_conflicts(vec![("first", first.clone()), ("second", second)]));
        assert_eq!(local.chain(), first.as_slice());
    }

    #[test]
    fn resolve_keeps_pending_pool() {
        let mut local = Blockchain::new("me");
        local.new_transaction("A", "B", 5);
        let peer = mined(2, "peer");

        assert!(local.resolve_conflicts(vec![("peer", peer.chain().to_vec())]));
        assert_eq!(local.pending(), &[Transaction::new("A", "B", 5)]);
        assert_eq!(local.new_transaction("B", "C", 1), 4);
    }

    #[test]
    fn register_node_is_idempotent() {
        let mut bc = Blockchain::new("me");
        assert_eq!(bc.register_node("http://192.168.0.5:5000").unwrap(), "192.168.0.5:5000");
        bc.register_node("192.168.0.5:5000").unwrap();
        assert_eq!(bc.peers().len(), 1);
    }
}
